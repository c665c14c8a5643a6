//! Process configuration read from the environment

use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_SESSION_TTL_SECS: u64 = 24 * 60 * 60;
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 5 * 60;
const DEFAULT_SEND_TIMEOUT_SECS: u64 = 10;

/// Bot configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotConfig {
    pub db_path: PathBuf,
    pub port: u16,
    /// Delivery endpoint for outbound messages; log-only when unset
    pub outbound_url: Option<String>,
    /// Upper bound on one outbound delivery
    pub send_timeout: Duration,
    pub session_ttl: Duration,
    pub sweep_interval: Duration,
}

impl BotConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let db_path = var("MEAL_BOT_DB_PATH").map_or_else(
            || {
                let home = var("HOME").unwrap_or_else(|| "/tmp".to_string());
                PathBuf::from(home).join(".meal-bot").join("meal_bot.db")
            },
            PathBuf::from,
        );

        Self {
            db_path,
            port: parse_or(var("MEAL_BOT_PORT"), DEFAULT_PORT),
            outbound_url: var("MEAL_BOT_OUTBOUND_URL").filter(|url| !url.trim().is_empty()),
            send_timeout: Duration::from_secs(
                parse_or(var("MEAL_BOT_SEND_TIMEOUT_SECS"), DEFAULT_SEND_TIMEOUT_SECS).max(1),
            ),
            session_ttl: Duration::from_secs(parse_or(
                var("MEAL_BOT_SESSION_TTL_SECS"),
                DEFAULT_SESSION_TTL_SECS,
            )),
            sweep_interval: Duration::from_secs(
                parse_or(var("MEAL_BOT_SWEEP_INTERVAL_SECS"), DEFAULT_SWEEP_INTERVAL_SECS).max(1),
            ),
        }
    }
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}
