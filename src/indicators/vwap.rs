// =============================================================================
// Session VWAP — Volume-Weighted Average Price
// =============================================================================
//
// VWAP_t = sum_{i<=t}(close_i * volume_i) / sum_{i<=t}(volume_i)
//
// Cumulative from the start of the series ("session" semantics). This is
// deliberately NOT a rolling window: early bars keep their weight for the
// whole session, which is what makes price-above/below-VWAP a meaningful
// intraday bias test.
// =============================================================================

use crate::market_data::Bar;

/// Compute the full session-VWAP series for `bars`.
///
/// The result has exactly `bars.len()` elements; element `i` depends only on
/// bars `0..=i`.
///
/// # Edge cases
/// - empty input => empty vec
/// - zero cumulative volume => NaN for those indices (0/0); the frame-level
///   finiteness check turns that into a computation error rather than a
///   silently biased score
pub fn vwap_series(bars: &[Bar]) -> Vec<f64> {
    let mut result = Vec::with_capacity(bars.len());
    let mut cum_pv = 0.0;
    let mut cum_v = 0.0;

    for bar in bars {
        cum_pv += bar.close * bar.volume;
        cum_v += bar.volume;
        result.push(cum_pv / cum_v);
    }

    result
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn bar(close: f64, volume: f64) -> Bar {
        Bar {
            open: close,
            high: close,
            low: close,
            close,
            volume,
            close_time: 0,
        }
    }

    #[test]
    fn vwap_empty_input() {
        assert!(vwap_series(&[]).is_empty());
    }

    #[test]
    fn vwap_constant_volume_equals_running_mean() {
        let closes = [10.0, 20.0, 30.0, 40.0];
        let bars: Vec<Bar> = closes.iter().map(|&c| bar(c, 5.0)).collect();
        let vwap = vwap_series(&bars);

        let mut sum = 0.0;
        for (i, (&c, &v)) in closes.iter().zip(vwap.iter()).enumerate() {
            sum += c;
            let mean = sum / (i + 1) as f64;
            assert!((v - mean).abs() < 1e-10, "index {i}: expected {mean}, got {v}");
        }
    }

    #[test]
    fn vwap_weights_by_volume() {
        // A heavy bar at 10 and a light bar at 20: VWAP must sit near 10.
        let bars = vec![bar(10.0, 90.0), bar(20.0, 10.0)];
        let vwap = vwap_series(&bars);
        assert!((vwap[1] - 11.0).abs() < 1e-10, "expected 11.0, got {}", vwap[1]);
    }

    #[test]
    fn vwap_is_cumulative_not_windowed() {
        // An early heavy bar keeps pulling on the session average long after.
        let mut bars = vec![bar(10.0, 1_000.0)];
        for _ in 0..50 {
            bars.push(bar(20.0, 1.0));
        }
        let last = *vwap_series(&bars).last().unwrap();
        assert!(last < 11.0, "early volume should dominate, got {last}");
    }

    #[test]
    fn vwap_zero_volume_is_nan() {
        let bars = vec![bar(10.0, 0.0), bar(20.0, 0.0)];
        let vwap = vwap_series(&bars);
        assert!(vwap[0].is_nan());
        assert!(vwap[1].is_nan());
    }

    #[test]
    fn vwap_no_look_ahead() {
        let bars: Vec<Bar> = (1..=30).map(|i| bar(100.0 + i as f64, i as f64)).collect();
        let full = vwap_series(&bars);
        let prefix = vwap_series(&bars[..15]);
        for (a, b) in prefix.iter().zip(full.iter()) {
            assert!((a - b).abs() < 1e-12, "prefix {a} != full {b}");
        }
    }
}
