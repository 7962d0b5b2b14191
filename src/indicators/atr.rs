// =============================================================================
// Average True Range (ATR) — EMA-smoothed True Range
// =============================================================================
//
// ATR measures volatility by smoothing the True Range of each bar:
//
//   TR_0 = high_0 - low_0                      (no previous close yet)
//   TR_t = max(H - L, |H - prevClose|, |L - prevClose|)
//
//   ATR  = EMA(TR, span)   with alpha = 2 / (span + 1), seeded ATR_0 = TR_0
//
// The |H - prevClose| and |L - prevClose| terms fold overnight gaps into the
// range, so a bar that gaps far from the previous close still reads volatile
// even when its own high-low spread is narrow.
// =============================================================================

use crate::market_data::Bar;

/// Compute the full ATR series for `bars` with the given smoothing `span`.
///
/// The result has exactly `bars.len()` elements; element `i` depends only on
/// bars `0..=i`. Every value is non-negative for valid bars (high >= low).
///
/// # Edge cases
/// - empty input => empty vec
/// - `span == 0` => empty vec (division guard)
pub fn atr_series(bars: &[Bar], span: usize) -> Vec<f64> {
    if bars.is_empty() || span == 0 {
        return Vec::new();
    }

    let alpha = 2.0 / (span as f64 + 1.0);

    let mut result = Vec::with_capacity(bars.len());
    let mut prev_atr = bars[0].high - bars[0].low;
    result.push(prev_atr);

    for i in 1..bars.len() {
        let high = bars[i].high;
        let low = bars[i].low;
        let prev_close = bars[i - 1].close;

        let tr = (high - low)
            .max((high - prev_close).abs())
            .max((low - prev_close).abs());

        let atr = tr * alpha + prev_atr * (1.0 - alpha);
        result.push(atr);
        prev_atr = atr;
    }

    result
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    /// Build a test bar with the given OHLC values.
    fn bar(open: f64, high: f64, low: f64, close: f64) -> Bar {
        Bar {
            open,
            high,
            low,
            close,
            volume: 100.0,
            close_time: 0,
        }
    }

    #[test]
    fn atr_empty_input() {
        assert!(atr_series(&[], 14).is_empty());
    }

    #[test]
    fn atr_span_zero() {
        let bars = vec![bar(100.0, 105.0, 95.0, 102.0); 5];
        assert!(atr_series(&bars, 0).is_empty());
    }

    #[test]
    fn atr_output_aligned_with_input() {
        let bars = vec![bar(100.0, 105.0, 95.0, 102.0); 20];
        assert_eq!(atr_series(&bars, 14).len(), bars.len());
    }

    #[test]
    fn atr_first_value_is_plain_range() {
        let bars = vec![bar(100.0, 104.0, 98.0, 101.0)];
        let atr = atr_series(&bars, 14);
        assert!((atr[0] - 6.0).abs() < 1e-10, "expected 6.0, got {}", atr[0]);
    }

    #[test]
    fn atr_is_non_negative() {
        let bars: Vec<Bar> = (0..50)
            .map(|i| {
                let base = 100.0 + (i as f64 * 0.5).sin() * 10.0;
                bar(base - 0.5, base + 2.0, base - 2.0, base + 0.5)
            })
            .collect();
        for &v in &atr_series(&bars, 14) {
            assert!(v >= 0.0, "ATR must be non-negative, got {v}");
        }
    }

    #[test]
    fn atr_constant_range_converges_to_range() {
        // Every bar spans exactly 10 around a slowly drifting base; TR stays
        // at 10 once the drift is folded in, so ATR converges toward 10.
        let mut bars = Vec::new();
        for i in 0..60 {
            let base = 100.0 + i as f64 * 0.1;
            bars.push(bar(base, base + 5.0, base - 5.0, base));
        }
        let last = *atr_series(&bars, 14).last().unwrap();
        assert!((last - 10.0).abs() < 0.5, "expected ATR near 10.0, got {last}");
    }

    #[test]
    fn atr_true_range_uses_prev_close_on_gaps() {
        // Gap up: |115 - 95| = 20 beats the bar's own 115 - 108 = 7.
        let bars = vec![
            bar(100.0, 105.0, 95.0, 95.0),
            bar(110.0, 115.0, 108.0, 112.0),
        ];
        let atr = atr_series(&bars, 14);
        // alpha = 2/15; ATR_1 = 20*alpha + 10*(1-alpha) > 10.
        assert!(atr[1] > 10.0, "gap must raise ATR, got {}", atr[1]);
    }

    #[test]
    fn atr_no_look_ahead() {
        let bars: Vec<Bar> = (0..40)
            .map(|i| {
                let base = 100.0 + (i as f64 * 0.3).cos() * 5.0;
                bar(base, base + 1.5, base - 1.5, base + 0.3)
            })
            .collect();
        let full = atr_series(&bars, 14);
        let prefix = atr_series(&bars[..25], 14);
        for (a, b) in prefix.iter().zip(full.iter()) {
            assert!((a - b).abs() < 1e-12, "prefix {a} != full {b}");
        }
    }
}
