// =============================================================================
// Configuration — environment-driven settings
// =============================================================================
//
// Everything tunable comes from environment variables (dotenv-loaded in
// main), with logged defaults for the market-data knobs. Telegram
// credentials are optional: without them the bot still evaluates and logs,
// it just cannot deliver.
// =============================================================================

use tracing::warn;

const DEFAULT_SYMBOL: &str = "BTCUSDT";
const DEFAULT_INTERVAL: &str = "15m";
const DEFAULT_KLINE_LIMIT: u32 = 100;
const DEFAULT_CHECK_SECONDS: u64 = 300;
const DEFAULT_DEPTH_LEVELS: u32 = 20;

/// Telegram delivery credentials. Present only when both variables are set.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
}

/// Bot configuration, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Trading pair, e.g. "BTCUSDT".
    pub symbol: String,
    /// Kline interval, e.g. "1m", "5m", "15m".
    pub interval: String,
    /// Number of klines per fetch.
    pub kline_limit: u32,
    /// Seconds between evaluation cycles.
    pub check_seconds: u64,
    /// Order-book levels per side for the imbalance window.
    pub depth_levels: u32,
    /// `None` puts the bot in log-only mode.
    pub telegram: Option<TelegramConfig>,
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`Config::from_env`], but with an injectable variable source so
    /// tests never mutate the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let symbol = lookup("SYMBOL")
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_SYMBOL.to_string());

        let interval = lookup("INTERVAL")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_INTERVAL.to_string());

        let kline_limit = parse_or_default(&lookup, "KLIMIT", DEFAULT_KLINE_LIMIT);
        let check_seconds = parse_or_default(&lookup, "CHECK_SECONDS", DEFAULT_CHECK_SECONDS);
        let depth_levels = parse_or_default(&lookup, "DEPTH_LEVELS", DEFAULT_DEPTH_LEVELS);

        let telegram = match (lookup("TELEGRAM_BOT_TOKEN"), lookup("TELEGRAM_CHAT_ID")) {
            (Some(bot_token), Some(chat_id))
                if !bot_token.trim().is_empty() && !chat_id.trim().is_empty() =>
            {
                Some(TelegramConfig { bot_token, chat_id })
            }
            _ => None,
        };

        Self {
            symbol,
            interval,
            kline_limit,
            check_seconds,
            depth_levels,
            telegram,
        }
    }
}

/// Parse an env value, falling back (with a warning) when it does not parse.
fn parse_or_default<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display + Copy,
{
    match lookup(key) {
        Some(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                warn!(key, value = %raw, default = %default, "unparseable value, using default");
                default
            }
        },
        None => default,
    }
}
