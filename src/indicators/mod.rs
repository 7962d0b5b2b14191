// =============================================================================
// Indicator Pipeline
// =============================================================================
//
// Pure, side-effect-free indicator math. `compute_frame` turns a validated
// bar series into an `IndicatorFrame`: five columns (EMA-9, EMA-21, RSI-14,
// session VWAP, ATR-14), each aligned 1:1 with the input bars. Element `i` of
// every column depends only on bars `0..=i` — no look-ahead, ever.

pub mod atr;
pub mod ema;
pub mod rsi;
pub mod vwap;

use crate::error::EngineError;
use crate::market_data::BarSeries;

pub use atr::atr_series;
pub use ema::ema_series;
pub use rsi::rsi_series;
pub use vwap::vwap_series;

/// Fast EMA span for crossover detection.
pub const EMA_FAST_SPAN: usize = 9;
/// Slow EMA span for crossover detection.
pub const EMA_SLOW_SPAN: usize = 21;
/// RSI look-back period.
pub const RSI_PERIOD: usize = 14;
/// ATR smoothing span.
pub const ATR_SPAN: usize = 14;

/// All indicator columns for one bar series, aligned 1:1 with the bars.
#[derive(Debug, Clone)]
pub struct IndicatorFrame {
    pub ema_fast: Vec<f64>,
    pub ema_slow: Vec<f64>,
    pub rsi: Vec<f64>,
    pub vwap: Vec<f64>,
    pub atr: Vec<f64>,
}

/// One row of the frame: every indicator at a single bar index.
#[derive(Debug, Clone, Copy)]
pub struct IndicatorRow {
    pub ema_fast: f64,
    pub ema_slow: f64,
    pub rsi: f64,
    pub vwap: f64,
    pub atr: f64,
}

impl IndicatorFrame {
    pub fn len(&self) -> usize {
        self.ema_fast.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ema_fast.is_empty()
    }

    /// All indicators at bar index `i`.
    pub fn row(&self, i: usize) -> Option<IndicatorRow> {
        Some(IndicatorRow {
            ema_fast: *self.ema_fast.get(i)?,
            ema_slow: *self.ema_slow.get(i)?,
            rsi: *self.rsi.get(i)?,
            vwap: *self.vwap.get(i)?,
            atr: *self.atr.get(i)?,
        })
    }

    /// The most recent row.
    pub fn latest(&self) -> Option<IndicatorRow> {
        self.row(self.len().checked_sub(1)?)
    }

    /// The row before the latest. A single-row frame falls back to that one
    /// row, so crossover tests degenerate to plain trend tests.
    pub fn previous(&self) -> Option<IndicatorRow> {
        match self.len() {
            0 => None,
            1 => self.row(0),
            n => self.row(n - 2),
        }
    }
}

/// Compute every indicator column for `series`.
///
/// # Errors
/// - `InsufficientData` when the series is empty.
/// - `NonFinite` when the latest row (the one decisions are made from)
///   contains a non-finite value, e.g. VWAP over an all-zero-volume session.
pub fn compute_frame(series: &BarSeries) -> Result<IndicatorFrame, EngineError> {
    if series.is_empty() {
        return Err(EngineError::InsufficientData {
            required: 1,
            got: 0,
        });
    }

    let closes = series.closes();
    let bars = series.bars();

    let frame = IndicatorFrame {
        ema_fast: ema_series(&closes, EMA_FAST_SPAN),
        ema_slow: ema_series(&closes, EMA_SLOW_SPAN),
        rsi: rsi_series(&closes, RSI_PERIOD),
        vwap: vwap_series(bars),
        atr: atr_series(bars, ATR_SPAN),
    };

    // Decisions consume the latest row; refuse to hand out a frame whose
    // latest row cannot be trusted.
    let last = frame.len() - 1;
    let checks = [
        ("ema_fast", frame.ema_fast[last]),
        ("ema_slow", frame.ema_slow[last]),
        ("rsi", frame.rsi[last]),
        ("vwap", frame.vwap[last]),
        ("atr", frame.atr[last]),
    ];
    for (field, value) in checks {
        if !value.is_finite() {
            return Err(EngineError::NonFinite { field });
        }
    }

    Ok(frame)
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::Bar;

    fn series(closes: &[f64]) -> BarSeries {
        let bars: Vec<Bar> = closes
            .iter()
            .map(|&c| Bar {
                open: c,
                high: c + 1.0,
                low: c - 1.0,
                close: c,
                volume: 10.0,
                close_time: 0,
            })
            .collect();
        BarSeries::new(bars).unwrap()
    }

    #[test]
    fn frame_columns_align_with_bars() {
        let s = series(&(1..=50).map(|x| x as f64).collect::<Vec<_>>());
        let frame = compute_frame(&s).unwrap();
        assert_eq!(frame.ema_fast.len(), s.len());
        assert_eq!(frame.ema_slow.len(), s.len());
        assert_eq!(frame.rsi.len(), s.len());
        assert_eq!(frame.vwap.len(), s.len());
        assert_eq!(frame.atr.len(), s.len());
    }

    #[test]
    fn frame_empty_series_is_insufficient() {
        let s = BarSeries::new(Vec::new()).unwrap();
        let err = compute_frame(&s).unwrap_err();
        assert_eq!(err, EngineError::InsufficientData { required: 1, got: 0 });
    }

    #[test]
    fn frame_zero_volume_session_is_non_finite_vwap() {
        let bars: Vec<Bar> = (0..5)
            .map(|i| Bar {
                open: 100.0,
                high: 101.0,
                low: 99.0,
                close: 100.0 + i as f64,
                volume: 0.0,
                close_time: 0,
            })
            .collect();
        let s = BarSeries::new(bars).unwrap();
        let err = compute_frame(&s).unwrap_err();
        assert_eq!(err, EngineError::NonFinite { field: "vwap" });
    }

    #[test]
    fn frame_constant_series_values() {
        let s = series(&vec![100.0; 40]);
        let frame = compute_frame(&s).unwrap();
        let row = frame.latest().unwrap();
        assert!((row.ema_fast - 100.0).abs() < 1e-10);
        assert!((row.ema_slow - 100.0).abs() < 1e-10);
        assert!((row.rsi - 50.0).abs() < 1e-10);
        assert!((row.vwap - 100.0).abs() < 1e-10);
        // Bars span low=99, high=101 => TR is 2 throughout => ATR = 2.
        assert!((row.atr - 2.0).abs() < 1e-10);
    }

    #[test]
    fn frame_previous_falls_back_on_single_bar() {
        let s = series(&[100.0]);
        let frame = compute_frame(&s).unwrap();
        let latest = frame.latest().unwrap();
        let previous = frame.previous().unwrap();
        assert_eq!(latest.ema_fast, previous.ema_fast);
        assert_eq!(latest.ema_slow, previous.ema_slow);
    }

    #[test]
    fn frame_previous_is_second_to_last() {
        let s = series(&[100.0, 110.0, 120.0]);
        let frame = compute_frame(&s).unwrap();
        let previous = frame.previous().unwrap();
        assert!((previous.ema_fast - frame.ema_fast[1]).abs() < 1e-12);
    }

    #[test]
    fn frame_empty_accessors() {
        let frame = IndicatorFrame {
            ema_fast: Vec::new(),
            ema_slow: Vec::new(),
            rsi: Vec::new(),
            vwap: Vec::new(),
            atr: Vec::new(),
        };
        assert!(frame.is_empty());
        assert!(frame.latest().is_none());
        assert!(frame.previous().is_none());
    }
}
