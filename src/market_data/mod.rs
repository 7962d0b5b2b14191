pub mod bars;
pub mod orderbook;

// Re-export the core types (e.g. `use crate::market_data::Bar`).
pub use bars::{Bar, BarSeries};
pub use orderbook::OrderBookSnapshot;
