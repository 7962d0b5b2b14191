// =============================================================================
// Signal Scorer — additive scoring walk and action gate
// =============================================================================
//
// Scoring starts from a neutral 50 and applies fixed adjustments in a fixed
// order (the order is part of the contract because it determines the order
// of the delivered reasons):
//
//   1. EMA crossover:  fresh bullish cross +15, bearish -15,
//                      otherwise +5 / -5 by which side of the slow EMA
//                      the fast EMA sits on
//   2. RSI bands:      RSI < 40 => +12, RSI > 60 => -12
//   3. Volume spike:   latest volume > 1.6x trailing 30-bar mean => +18
//   4. Book imbalance: > 0.12 => +10, < -0.12 => -10
//   5. VWAP side:      price above session VWAP +4, else -4
//
// Confidence is the score clamped to [0, 100]. The action gate then requires
// confidence >= 55 AND score >= 60 for BUY, confidence >= 55 AND score <= 40
// for SELL. The gate is intentionally asymmetric: scores in (40, 60) stay
// actionless even at passing confidence, and since confidence is the clamped
// score the SELL arm cannot fire from this scorer's own output. Both quirks
// determine which signals fire; do not widen the gate silently.
// =============================================================================

use crate::error::EngineError;
use crate::indicators::IndicatorFrame;
use crate::market_data::BarSeries;
use crate::signal::decision::{Action, SignalDecision};

/// Trailing window for the average-volume baseline.
pub const VOLUME_WINDOW: usize = 30;
/// Latest volume must exceed this multiple of the baseline to count as a spike.
pub const VOLUME_SPIKE_RATIO: f64 = 1.6;
/// Absolute imbalance beyond which the book is considered one-sided.
pub const IMBALANCE_THRESHOLD: f64 = 0.12;

/// Score the latest bar of `series` against its indicator `frame`.
///
/// `imbalance` is the order-book imbalance for the cycle; callers substitute
/// 0.0 when the snapshot was unavailable (soft failure, spec'd as neutral).
///
/// # Errors
/// `InsufficientData` when the series or frame is empty. Indicator values are
/// already finiteness-checked by `compute_frame`.
pub fn score(
    symbol: &str,
    series: &BarSeries,
    frame: &IndicatorFrame,
    imbalance: f64,
) -> Result<SignalDecision, EngineError> {
    let insufficient = EngineError::InsufficientData {
        required: 1,
        got: 0,
    };
    let last_bar = series.last().ok_or(insufficient.clone())?;
    let latest = frame.latest().ok_or(insufficient.clone())?;
    // A one-row frame reuses its only row, degrading the crossover test to a
    // plain trend test.
    let previous = frame.previous().ok_or(insufficient)?;

    let price = last_bar.close;
    let volume = last_bar.volume;
    let avg_volume = series.trailing_mean_volume(VOLUME_WINDOW);

    let mut score: i32 = 50;
    let mut reasons: Vec<String> = Vec::new();

    // 1. EMA crossover / trend side.
    let crossed_up = previous.ema_fast <= previous.ema_slow && latest.ema_fast > latest.ema_slow;
    let crossed_down = previous.ema_fast >= previous.ema_slow && latest.ema_fast < latest.ema_slow;
    if crossed_up {
        score += 15;
        reasons.push("EMA bullish crossover".to_string());
    } else if crossed_down {
        score -= 15;
        reasons.push("EMA bearish crossover".to_string());
    } else if latest.ema_fast > latest.ema_slow {
        score += 5;
    } else {
        score -= 5;
    }

    // 2. RSI bands.
    if latest.rsi < 40.0 {
        score += 12;
        reasons.push("RSI low (buy)".to_string());
    } else if latest.rsi > 60.0 {
        score -= 12;
        reasons.push("RSI high (sell)".to_string());
    }

    // 3. Volume spike.
    if volume > VOLUME_SPIKE_RATIO * avg_volume {
        score += 18;
        reasons.push("Volume spike".to_string());
    }

    // 4. Order-book imbalance.
    if imbalance > IMBALANCE_THRESHOLD {
        score += 10;
        reasons.push("Orderbook bid-heavy".to_string());
    } else if imbalance < -IMBALANCE_THRESHOLD {
        score -= 10;
        reasons.push("Orderbook ask-heavy".to_string());
    }

    // 5. Which side of session VWAP the price sits on.
    if price > latest.vwap {
        score += 4;
    } else {
        score -= 4;
    }

    let confidence = score.clamp(0, 100);
    let action = decide_action(confidence, score);

    let (stop_loss, take_profit) = match action {
        Some(side) => {
            let (sl, tp) = risk_levels(side, price, latest.atr);
            (Some(sl), Some(tp))
        }
        None => (None, None),
    };

    Ok(SignalDecision {
        symbol: symbol.to_string(),
        price,
        action,
        confidence,
        reasons,
        stop_loss,
        take_profit,
        volume,
        avg_volume,
        imbalance,
        rsi: latest.rsi,
        ema_fast: latest.ema_fast,
        ema_slow: latest.ema_slow,
    })
}

/// The action gate. BUY needs `confidence >= 55 && score >= 60`, SELL needs
/// `confidence >= 55 && score <= 40`.
///
/// Scores in (40, 60) clear the confidence bar without picking a direction,
/// and a confidence derived from `score` by clamping can never satisfy the
/// SELL arm. The gate's exact shape determines which historical signals
/// would have fired, so it stays as-is.
pub fn decide_action(confidence: i32, score: i32) -> Option<Action> {
    if confidence >= 55 && score >= 60 {
        Some(Action::Buy)
    } else if confidence >= 55 && score <= 40 {
        Some(Action::Sell)
    } else {
        None
    }
}

/// Stop-loss / take-profit bracket around `price` at an ATR distance with a
/// fixed 1.8 reward-to-risk multiple. The 1e-8 floor keeps the bracket
/// non-degenerate when ATR collapses to zero.
pub fn risk_levels(action: Action, price: f64, atr: f64) -> (f64, f64) {
    let distance = atr.max(1e-8);
    match action {
        Action::Buy => (price - distance, price + 1.8 * distance),
        Action::Sell => (price + distance, price - 1.8 * distance),
    }
}
