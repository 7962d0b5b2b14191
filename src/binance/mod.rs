// =============================================================================
// Binance Module
// =============================================================================
//
// Public REST market-data access: klines and depth snapshots. No signed
// endpoints; the bot reads the market, it never trades on it.

pub mod client;

pub use client::BinanceClient;
