// =============================================================================
// Binance REST API Client — public market data
// =============================================================================
//
// Only unauthenticated endpoints are used (klines, depth), so there is no
// key handling and no request signing. Each endpoint carries its own
// timeout: depth gets a tighter one because a stale snapshot is worse than
// no snapshot (the scorer treats a missing book as neutral).
// =============================================================================

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use tracing::{debug, instrument};

use crate::error::FetchError;
use crate::market_data::{Bar, BarSeries, OrderBookSnapshot};

/// Timeout for kline retrieval.
const KLINES_TIMEOUT: Duration = Duration::from_secs(8);
/// Timeout for depth snapshots.
const DEPTH_TIMEOUT: Duration = Duration::from_secs(6);

/// Public market-data client for the Binance spot REST API.
#[derive(Debug, Clone)]
pub struct BinanceClient {
    base_url: String,
    client: reqwest::Client,
}

impl BinanceClient {
    pub fn new() -> Self {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static("helios-bot/1.0"));

        let client = reqwest::Client::builder()
            .default_headers(default_headers)
            .timeout(Duration::from_secs(10))
            .build()
            .expect("failed to build reqwest client");

        debug!("BinanceClient initialised (base_url=https://api.binance.com)");

        Self {
            base_url: "https://api.binance.com".to_string(),
            client,
        }
    }

    // -------------------------------------------------------------------------
    // Public market data
    // -------------------------------------------------------------------------

    /// GET /api/v3/klines — closed candlesticks, oldest first.
    ///
    /// Array indices in each entry:
    ///   [0] openTime, [1] open, [2] high, [3] low, [4] close, [5] volume,
    ///   [6] closeTime, ... (trailing fields unused)
    ///
    /// The returned series is validated bar by bar; a single malformed bar
    /// fails the whole fetch.
    #[instrument(skip(self), name = "binance::get_klines")]
    pub async fn get_klines(
        &self,
        symbol: &str,
        interval: &str,
        limit: u32,
    ) -> Result<BarSeries, FetchError> {
        let url = format!(
            "{}/api/v3/klines?symbol={}&interval={}&limit={}",
            self.base_url, symbol, interval, limit
        );

        let resp = self.client.get(&url).timeout(KLINES_TIMEOUT).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FetchError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body: serde_json::Value = resp.json().await?;
        let series = parse_klines(&body)?;

        debug!(symbol, interval, count = series.len(), "klines fetched");
        Ok(series)
    }

    /// GET /api/v3/depth — top-of-book snapshot with `levels` levels per side.
    #[instrument(skip(self), name = "binance::get_depth")]
    pub async fn get_depth(
        &self,
        symbol: &str,
        levels: u32,
    ) -> Result<OrderBookSnapshot, FetchError> {
        let url = format!(
            "{}/api/v3/depth?symbol={}&limit={}",
            self.base_url, symbol, levels
        );

        let resp = self.client.get(&url).timeout(DEPTH_TIMEOUT).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FetchError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body: serde_json::Value = resp.json().await?;
        let snapshot = parse_depth(&body)?;

        debug!(
            symbol,
            bids = snapshot.bids.len(),
            asks = snapshot.asks.len(),
            "depth fetched"
        );
        Ok(snapshot)
    }
}

impl Default for BinanceClient {
    fn default() -> Self {
        Self::new()
    }
}

// -----------------------------------------------------------------------------
// Payload parsing (pure, testable without a network)
// -----------------------------------------------------------------------------

/// Parse the klines array-of-arrays payload into a validated `BarSeries`.
fn parse_klines(body: &serde_json::Value) -> Result<BarSeries, FetchError> {
    let raw = body
        .as_array()
        .ok_or_else(|| FetchError::Payload("klines response is not an array".to_string()))?;

    let mut bars = Vec::with_capacity(raw.len());
    for entry in raw {
        let arr = entry
            .as_array()
            .ok_or_else(|| FetchError::Payload("kline entry is not an array".to_string()))?;

        if arr.len() < 7 {
            return Err(FetchError::Payload(format!(
                "kline entry has {} elements, expected at least 7",
                arr.len()
            )));
        }

        bars.push(Bar {
            open: parse_str_f64(&arr[1])?,
            high: parse_str_f64(&arr[2])?,
            low: parse_str_f64(&arr[3])?,
            close: parse_str_f64(&arr[4])?,
            volume: parse_str_f64(&arr[5])?,
            close_time: arr[6].as_i64().unwrap_or(0),
        });
    }

    Ok(BarSeries::new(bars)?)
}

/// Parse the depth payload (`{"bids": [["p","q"],...], "asks": [...]}`).
fn parse_depth(body: &serde_json::Value) -> Result<OrderBookSnapshot, FetchError> {
    Ok(OrderBookSnapshot {
        bids: parse_levels(&body["bids"], "bids")?,
        asks: parse_levels(&body["asks"], "asks")?,
    })
}

fn parse_levels(val: &serde_json::Value, side: &str) -> Result<Vec<(f64, f64)>, FetchError> {
    let raw = val
        .as_array()
        .ok_or_else(|| FetchError::Payload(format!("depth response missing '{side}' array")))?;

    let mut levels = Vec::with_capacity(raw.len());
    for entry in raw {
        let pair = entry
            .as_array()
            .filter(|a| a.len() >= 2)
            .ok_or_else(|| {
                FetchError::Payload(format!("{side} level is not a [price, qty] pair"))
            })?;
        levels.push((parse_str_f64(&pair[0])?, parse_str_f64(&pair[1])?));
    }
    Ok(levels)
}

/// Parse a JSON value that may be either a string or a number into `f64`.
/// Binance encodes prices and quantities as strings to dodge float rounding.
fn parse_str_f64(val: &serde_json::Value) -> Result<f64, FetchError> {
    if let Some(s) = val.as_str() {
        s.parse::<f64>()
            .map_err(|_| FetchError::Payload(format!("failed to parse '{s}' as f64")))
    } else if let Some(n) = val.as_f64() {
        Ok(n)
    } else {
        Err(FetchError::Payload(format!(
            "expected string or number, got: {val}"
        )))
    }
}
