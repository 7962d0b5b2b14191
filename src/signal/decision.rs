// =============================================================================
// Signal Decision — the scorer's verdict for one evaluation cycle
// =============================================================================
//
// A decision bundles the verdict (action, confidence, risk levels) with the
// inputs it was reached from (price, volume, imbalance, indicator values) so
// that a reader of the delivered message or the log can audit the call
// without replaying the cycle. Decisions are recomputed fresh every cycle
// and never persisted.
// =============================================================================

use std::fmt;

use serde::Serialize;

/// Trade direction the gate settled on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Buy,
    Sell,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Buy => write!(f, "BUY"),
            Action::Sell => write!(f, "SELL"),
        }
    }
}

/// One scored verdict together with the context it was derived from.
#[derive(Debug, Clone, Serialize)]
pub struct SignalDecision {
    pub symbol: String,

    /// Close of the latest bar at evaluation time.
    pub price: f64,

    /// `None` when the gate did not fire; the decision is still delivered to
    /// the log as a no-trade cycle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<Action>,

    /// Score clamped to [0, 100]. Decision strength, not a probability.
    pub confidence: i32,

    /// Human-readable scoring rationale, in the order the checks fired.
    pub reasons: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_loss: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub take_profit: Option<f64>,

    pub volume: f64,
    pub avg_volume: f64,
    pub imbalance: f64,
    pub rsi: f64,
    pub ema_fast: f64,
    pub ema_slow: f64,
}

impl SignalDecision {
    /// True when the gate produced a tradeable direction.
    pub fn is_actionable(&self) -> bool {
        self.action.is_some()
    }
}
