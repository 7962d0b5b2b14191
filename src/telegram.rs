// =============================================================================
// Telegram Client — signal delivery and command front-end
// =============================================================================
//
// Two jobs:
//   1. Push rendered signal cards and error relays to the configured chat
//      (sendMessage, HTML parse mode).
//   2. Long-poll getUpdates and answer operator commands: `/start` gets a
//      greeting, anything else "Unknown command.".
//
// Credentials are optional. Without them the client swallows sends (the bot
// keeps evaluating and logging) and the listener has nothing to poll.
// =============================================================================

use std::time::Duration;

use serde_json::json;
use tracing::{debug, info, warn};

use crate::config::TelegramConfig;
use crate::error::NotifyError;
use crate::signal::SignalDecision;

/// getUpdates long-poll window, seconds. The HTTP timeout is set above it so
/// the server side expires first.
const POLL_TIMEOUT_SECS: u64 = 30;

pub struct TelegramClient {
    creds: Option<TelegramConfig>,
    base_url: String,
    client: reqwest::Client,
}

impl TelegramClient {
    pub fn new(creds: Option<TelegramConfig>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("failed to build reqwest client");

        Self {
            creds,
            base_url: "https://api.telegram.org".to_string(),
            client,
        }
    }

    /// True when credentials are present and sends will actually go out.
    pub fn is_enabled(&self) -> bool {
        self.creds.is_some()
    }

    // -------------------------------------------------------------------------
    // Outbound delivery
    // -------------------------------------------------------------------------

    /// Send `text` to the configured chat (HTML parse mode). A disabled
    /// client drops the message and reports success.
    pub async fn send_message(&self, text: &str) -> Result<(), NotifyError> {
        let Some(creds) = &self.creds else {
            debug!("telegram disabled, message dropped");
            return Ok(());
        };

        let payload = json!({
            "chat_id": creds.chat_id,
            "text": text,
            "parse_mode": "HTML",
        });
        self.post_message(&creds.bot_token, payload).await?;

        debug!("telegram message delivered");
        Ok(())
    }

    /// Render and deliver a signal card for `decision`.
    pub async fn send_decision(&self, decision: &SignalDecision) -> Result<(), NotifyError> {
        self.send_message(&format_decision(decision)).await
    }

    async fn post_message(
        &self,
        token: &str,
        payload: serde_json::Value,
    ) -> Result<(), NotifyError> {
        let url = format!("{}/bot{}/sendMessage", self.base_url, token);
        let resp = self.client.post(&url).json(&payload).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(NotifyError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Command listener
    // -------------------------------------------------------------------------

    /// Long-poll getUpdates and answer operator commands.
    ///
    /// Runs until a transport or API error, then returns so the caller
    /// (main.rs) can handle the respawn. Returns immediately when the client
    /// is disabled.
    pub async fn run_command_listener(&self) -> Result<(), NotifyError> {
        let Some(creds) = &self.creds else {
            return Ok(());
        };

        info!("telegram command listener started");
        let mut offset: i64 = 0;

        loop {
            let url = format!("{}/bot{}/getUpdates", self.base_url, creds.bot_token);
            let resp = self
                .client
                .get(&url)
                .query(&[
                    ("timeout", POLL_TIMEOUT_SECS.to_string()),
                    ("offset", offset.to_string()),
                ])
                .timeout(Duration::from_secs(POLL_TIMEOUT_SECS + 10))
                .send()
                .await?;

            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                return Err(NotifyError::Api {
                    status: status.as_u16(),
                    body,
                });
            }

            let body: serde_json::Value = resp.json().await?;
            // Confirm everything we saw, text or not, or getUpdates will
            // keep resending the same batch.
            offset = next_offset(&body, offset);

            for incoming in parse_updates(&body) {
                let reply = command_reply(&incoming.text);
                debug!(chat_id = incoming.chat_id, text = %incoming.text, "telegram command");

                let payload = json!({
                    "chat_id": incoming.chat_id,
                    "text": reply,
                });
                if let Err(e) = self.post_message(&creds.bot_token, payload).await {
                    warn!(error = %e, "failed to answer telegram command");
                }
            }
        }
    }
}

// -----------------------------------------------------------------------------
// Rendering and update parsing (pure, testable without a network)
// -----------------------------------------------------------------------------

/// Render the HTML signal card for an actionable decision.
pub fn format_decision(decision: &SignalDecision) -> String {
    let header = match decision.action {
        Some(action) => format!("{} {} Signal", decision.symbol, action),
        None => format!("{} Signal", decision.symbol),
    };
    let stamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC");

    format!(
        "\u{1F6A8} <b>{header}</b>\n\
         \u{1F55C} {stamp}\n\
         \u{1F4B0} Price: {price}\n\
         \u{1F50E} Reasons: {reasons}\n\
         \u{1F3AF} TP: {tp}\n\
         \u{1F6D1} SL: {sl}\n\
         \u{2705} Confidence: {confidence}%\n",
        price = decision.price,
        reasons = decision.reasons.join(", "),
        tp = fmt_level(decision.take_profit),
        sl = fmt_level(decision.stop_loss),
        confidence = decision.confidence,
    )
}

fn fmt_level(level: Option<f64>) -> String {
    match level {
        Some(v) => v.to_string(),
        None => "-".to_string(),
    }
}

/// Reply text for an incoming message.
fn command_reply(text: &str) -> &'static str {
    let trimmed = text.trim();
    if trimmed == "/start" || trimmed.starts_with("/start ") || trimmed.starts_with("/start@") {
        "Hello — public-data scalper bot is running."
    } else {
        "Unknown command."
    }
}

struct IncomingMessage {
    chat_id: i64,
    text: String,
}

/// Extract the text messages from a getUpdates response body.
fn parse_updates(body: &serde_json::Value) -> Vec<IncomingMessage> {
    let mut incoming = Vec::new();
    if let Some(results) = body["result"].as_array() {
        for update in results {
            let message = &update["message"];
            let Some(chat_id) = message["chat"]["id"].as_i64() else {
                continue;
            };
            let Some(text) = message["text"].as_str() else {
                continue;
            };
            incoming.push(IncomingMessage {
                chat_id,
                text: text.to_string(),
            });
        }
    }
    incoming
}

/// Advance the getUpdates offset past every update in `body`.
fn next_offset(body: &serde_json::Value, current: i64) -> i64 {
    body["result"]
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|u| u["update_id"].as_i64())
        .map(|id| id + 1)
        .fold(current, i64::max)
}
