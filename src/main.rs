// =============================================================================
// Helios Scalper Bot — Main Entry Point
// =============================================================================
//
// Public-data signal bot: fetches klines and depth from Binance on a fixed
// cadence, scores a signal, and delivers actionable decisions to Telegram.
// No API keys, no order placement.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod binance;
mod config;
mod engine;
mod error;
mod indicators;
mod market_data;
mod signal;
mod telegram;

use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::binance::BinanceClient;
use crate::config::Config;
use crate::engine::SignalEngine;
use crate::error::{CycleError, FetchError};
use crate::telegram::TelegramClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & logging ─────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("╔══════════════════════════════════════════════════════════╗");
    info!("║        Helios Scalper Bot — Starting Up                 ║");
    info!("╚══════════════════════════════════════════════════════════╝");

    // ── 2. Configuration ─────────────────────────────────────────────────
    let config = Config::from_env();
    info!(
        symbol = %config.symbol,
        interval = %config.interval,
        kline_limit = config.kline_limit,
        check_seconds = config.check_seconds,
        depth_levels = config.depth_levels,
        "Configuration loaded"
    );
    if config.telegram.is_none() {
        warn!("TELEGRAM_BOT_TOKEN / TELEGRAM_CHAT_ID missing — running in log-only mode");
    }

    // ── 3. Build clients ─────────────────────────────────────────────────
    let binance_client = BinanceClient::new();
    let engine = SignalEngine::new(binance_client, &config);
    let notifier = Arc::new(TelegramClient::new(config.telegram.clone()));

    // ── 4. Spawn the Telegram command listener ───────────────────────────
    if notifier.is_enabled() {
        let listener = notifier.clone();
        tokio::spawn(async move {
            loop {
                if let Err(e) = listener.run_command_listener().await {
                    error!(error = %e, "Telegram listener error — reconnecting in 5s");
                }
                tokio::time::sleep(tokio::time::Duration::from_secs(5)).await;
            }
        });
    }

    // ── 5. Trading loop ──────────────────────────────────────────────────
    info!("Trading loop started. Using public Binance market endpoints (no API key needed).");
    let loop_notifier = notifier.clone();
    let check_seconds = config.check_seconds.max(1);
    let trading = tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(tokio::time::Duration::from_secs(check_seconds));
        loop {
            interval.tick().await;
            run_cycle(&engine, &loop_notifier).await;
        }
    });

    info!("All subsystems running. Press Ctrl+C to stop.");

    // ── 6. Graceful shutdown ─────────────────────────────────────────────
    tokio::signal::ctrl_c().await?;
    warn!("Shutdown signal received — stopping gracefully");
    trading.abort();

    info!("Helios Scalper Bot shut down complete.");
    Ok(())
}

/// One evaluation cycle: log the verdict, deliver actionable signals, relay
/// failures to the chat. Errors never break the loop; the next tick retries.
async fn run_cycle(engine: &SignalEngine, notifier: &TelegramClient) {
    match engine.evaluate().await {
        Ok(decision) => {
            if let Some(action) = decision.action {
                info!(
                    symbol = %decision.symbol,
                    action = %action,
                    confidence = decision.confidence,
                    price = decision.price,
                    "Signal fired"
                );
                if let Err(e) = notifier.send_decision(&decision).await {
                    error!(error = %e, "Failed to deliver signal");
                }
            } else {
                info!(
                    symbol = %decision.symbol,
                    confidence = decision.confidence,
                    "No strong signal"
                );
            }
        }
        Err(CycleError::Fetch(err @ FetchError::Api { .. })) => {
            error!(error = %err, "Market data HTTP error");
            relay(notifier, format!("\u{274C} Market data HTTP error: {err}")).await;
        }
        Err(err) => {
            error!(error = %err, "Trading loop error");
            relay(notifier, format!("\u{274C} Trading loop error: {err}")).await;
        }
    }
}

async fn relay(notifier: &TelegramClient, text: String) {
    if let Err(e) = notifier.send_message(&text).await {
        warn!(error = %e, "Failed to relay error message");
    }
}
