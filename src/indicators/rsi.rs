// =============================================================================
// Relative Strength Index (RSI) — exponential averages
// =============================================================================
//
// RSI measures the speed and magnitude of recent price changes to gauge
// overbought / oversold conditions.
//
// Step 1 — split consecutive close deltas into gains and losses.
// Step 2 — smooth both with an exponential average, alpha = 1 / period,
//          seeded with the first delta's gain / loss.
// Step 3 — RS  = avg_gain / (avg_loss + 1e-9)
//          RSI = 100 - 100 / (1 + RS)
//
// When both averages are zero there has been no movement at all; RSI is
// defined as the neutral 50.0 in that case (the raw formula would read 0,
// which would make a flat market look maximally oversold). Index 0 has no
// delta and also reads 50.0.
// =============================================================================

/// Compute the full RSI series for `closes` with the given `period`.
///
/// The result has exactly `closes.len()` elements; element `i` depends only
/// on closes `0..=i`.
///
/// # Edge cases
/// - empty input => empty vec
/// - `period == 0` => empty vec
/// - flat input => 50.0 everywhere
pub fn rsi_series(closes: &[f64], period: usize) -> Vec<f64> {
    if closes.is_empty() || period == 0 {
        return Vec::new();
    }

    let alpha = 1.0 / period as f64;

    let mut result = Vec::with_capacity(closes.len());
    result.push(50.0); // No delta yet.

    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;

    for i in 1..closes.len() {
        let delta = closes[i] - closes[i - 1];
        let gain = delta.max(0.0);
        let loss = (-delta).max(0.0);

        if i == 1 {
            // The first delta seeds both averages.
            avg_gain = gain;
            avg_loss = loss;
        } else {
            avg_gain = gain * alpha + avg_gain * (1.0 - alpha);
            avg_loss = loss * alpha + avg_loss * (1.0 - alpha);
        }

        result.push(rsi_from_averages(avg_gain, avg_loss));
    }

    result
}

/// Convert the smoothed gain / loss averages to an RSI value in [0, 100].
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_gain == 0.0 && avg_loss == 0.0 {
        return 50.0; // No movement at all — neutral.
    }
    let rs = avg_gain / (avg_loss + 1e-9);
    100.0 - 100.0 / (1.0 + rs)
}
