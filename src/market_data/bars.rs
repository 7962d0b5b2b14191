// =============================================================================
// Bars — validated OHLCV series
// =============================================================================
//
// A `Bar` is one closed candlestick; a `BarSeries` is a time-ascending run of
// them. All validation happens here, once, when the series is constructed:
// every consumer downstream (indicators, scorer) may assume finite fields,
// high >= low, and non-negative volume.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::error::MarketDataError;

/// One closed OHLCV bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    /// Bar close time, epoch milliseconds (exchange convention).
    pub close_time: i64,
}

impl Bar {
    fn validate(&self, index: usize) -> Result<(), MarketDataError> {
        let fields = [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
            ("volume", self.volume),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(MarketDataError::NonFiniteField { index, field });
            }
        }
        if self.high < self.low {
            return Err(MarketDataError::InvertedRange {
                index,
                high: self.high,
                low: self.low,
            });
        }
        if self.volume < 0.0 {
            return Err(MarketDataError::NegativeVolume {
                index,
                volume: self.volume,
            });
        }
        Ok(())
    }
}

/// Time-ascending, validated bar collection.
#[derive(Debug, Clone, Default)]
pub struct BarSeries {
    bars: Vec<Bar>,
}

impl BarSeries {
    /// Validate and wrap a bar vector (oldest first). The first invalid bar
    /// fails the whole series; partially-trusted data is worse than none.
    pub fn new(bars: Vec<Bar>) -> Result<Self, MarketDataError> {
        for (index, bar) in bars.iter().enumerate() {
            bar.validate(index)?;
        }
        Ok(Self { bars })
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Close prices, oldest first.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Mean volume over the trailing `window` bars, the latest bar included.
    /// Shorter series fall back to the full-series mean.
    ///
    /// # Edge cases
    /// - empty series or `window == 0` => 0.0
    pub fn trailing_mean_volume(&self, window: usize) -> f64 {
        if self.bars.is_empty() || window == 0 {
            return 0.0;
        }
        let take = window.min(self.bars.len());
        let start = self.bars.len() - take;
        let sum: f64 = self.bars[start..].iter().map(|b| b.volume).sum();
        sum / take as f64
    }
}
