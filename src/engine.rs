// =============================================================================
// Signal Engine — one fetch-compute-score cycle
// =============================================================================
//
// Pipeline per cycle:
//   1. Fetch klines                  (hard failure: the cycle is lost)
//   2. Compute the indicator frame   (hard failure: the cycle is lost)
//   3. Fetch the depth snapshot      (soft failure: imbalance reads 0.0)
//   4. Score and gate
//
// The engine holds no state between cycles; every evaluation starts from a
// fresh fetch and the decision it returns is complete and discardable.
// =============================================================================

use tracing::{debug, warn};

use crate::binance::BinanceClient;
use crate::config::Config;
use crate::error::CycleError;
use crate::indicators::compute_frame;
use crate::signal::{score, SignalDecision};

pub struct SignalEngine {
    client: BinanceClient,
    symbol: String,
    interval: String,
    kline_limit: u32,
    depth_levels: u32,
}

impl SignalEngine {
    pub fn new(client: BinanceClient, config: &Config) -> Self {
        Self {
            client,
            symbol: config.symbol.clone(),
            interval: config.interval.clone(),
            kline_limit: config.kline_limit,
            depth_levels: config.depth_levels,
        }
    }

    /// Run one full evaluation cycle and return the decision.
    pub async fn evaluate(&self) -> Result<SignalDecision, CycleError> {
        let series = self
            .client
            .get_klines(&self.symbol, &self.interval, self.kline_limit)
            .await?;
        let frame = compute_frame(&series)?;

        // The book is advisory: a failed snapshot degrades to a neutral
        // imbalance instead of failing the cycle.
        let imbalance = match self.client.get_depth(&self.symbol, self.depth_levels).await {
            Ok(snapshot) => snapshot.imbalance(self.depth_levels as usize),
            Err(e) => {
                warn!(symbol = %self.symbol, error = %e, "depth unavailable, imbalance defaults to 0.0");
                0.0
            }
        };

        let decision = score(&self.symbol, &series, &frame, imbalance)?;
        debug!(
            symbol = %self.symbol,
            confidence = decision.confidence,
            actionable = decision.is_actionable(),
            "cycle evaluated"
        );
        Ok(decision)
    }
}
