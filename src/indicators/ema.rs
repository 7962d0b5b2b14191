// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// EMA weights recent prices more heavily than old ones, making it more
// responsive to new information than a simple moving average.
//
// Formula (span form):
//   alpha  = 2 / (span + 1)
//   EMA_0  = close_0
//   EMA_t  = close_t * alpha + EMA_{t-1} * (1 - alpha)
//
// Seeding with the first close (rather than an SMA warm-up) keeps the output
// aligned 1:1 with the input: one EMA value per bar, from the first bar on.
// =============================================================================

/// Compute the full EMA series for `closes` with the given `span`.
///
/// The result has exactly `closes.len()` elements; element `i` depends only
/// on closes `0..=i`.
///
/// # Edge cases
/// - empty input => empty vec
/// - `span == 0` => empty vec (division guard)
/// - a non-finite close poisons the series from that index on (NaN
///   propagates); callers validate their inputs upstream
pub fn ema_series(closes: &[f64], span: usize) -> Vec<f64> {
    if closes.is_empty() || span == 0 {
        return Vec::new();
    }

    let alpha = 2.0 / (span as f64 + 1.0);

    let mut result = Vec::with_capacity(closes.len());
    let mut prev = closes[0];
    result.push(prev);

    for &close in &closes[1..] {
        let ema = close * alpha + prev * (1.0 - alpha);
        result.push(ema);
        prev = ema;
    }

    result
}
