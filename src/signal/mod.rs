// =============================================================================
// Signal Module
// =============================================================================
//
// Scoring pipeline for the bot:
// - Additive scoring walk over indicator, volume, and order-book components
// - Asymmetric confidence/score action gate
// - ATR-bracketed risk levels for actionable decisions

pub mod decision;
pub mod scorer;

pub use decision::{Action, SignalDecision};
pub use scorer::{decide_action, risk_levels, score};
