// =============================================================================
// Error Taxonomy
// =============================================================================
//
// Each fallible boundary has its own enum so callers can branch on the
// failure class instead of string-matching messages:
//
//   MarketDataError — a bar failed validation at ingestion
//   FetchError      — HTTP retrieval from the exchange failed
//   EngineError     — indicator / scoring computation fault
//   CycleError      — union of everything one evaluation cycle can fail with
//   NotifyError     — Telegram delivery failed
//
// The run loop decides policy (relay, log, continue) from these classes.
// =============================================================================

use thiserror::Error;

/// A bar carried values that cannot be traded on. Raised once, at the
/// ingestion boundary, so everything downstream can assume clean data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MarketDataError {
    #[error("bar {index}: field `{field}` is not finite")]
    NonFiniteField { index: usize, field: &'static str },

    #[error("bar {index}: high {high} below low {low}")]
    InvertedRange { index: usize, high: f64, low: f64 },

    #[error("bar {index}: negative volume {volume}")]
    NegativeVolume { index: usize, volume: f64 },
}

/// Market-data retrieval failed. `Transport` covers connection and timeout
/// problems, `Api` a non-success HTTP status, `Payload` a response body that
/// does not match the documented shape.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("exchange returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("unexpected payload: {0}")]
    Payload(String),

    #[error(transparent)]
    Invalid(#[from] MarketDataError),
}

/// The indicator pipeline or the scorer could not produce a result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("insufficient data: need at least {required} bars, got {got}")]
    InsufficientData { required: usize, got: usize },

    #[error("non-finite value in `{field}`")]
    NonFinite { field: &'static str },
}

/// Everything a single fetch-compute-score cycle can surface.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Telegram message delivery failed.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("transport: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Telegram returned HTTP {status}: {body}")]
    Api { status: u16, body: String },
}
