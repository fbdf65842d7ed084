use anyhow::{anyhow, Result};
use reqwest::Url;
use std::env;

const DEFAULT_DATABASE_URL: &str = "sqlite:./data/nudge.db";
const DEFAULT_TOGGL_API_URL: &str = "https://api.track.toggl.com/api/v9";

/// One year. Longer cooldowns are almost certainly a typo.
pub const MAX_WAKE_COOLDOWN_MINUTES: i64 = 365 * 24 * 60;

#[derive(Debug, Clone)]
pub struct Config {
    pub telegram_bot_token: String,
    pub database_url: String,
    pub http_port: u16,
    pub toggl_api_url: String,
    pub wake_cooldown_minutes: i64,
    pub send_timeout_secs: u64,
    pub webhook: Option<WebhookConfig>,
}

/// Set when updates should arrive through a webhook instead of long polling.
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    pub url: Url,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let token = env::var("TELEGRAM_BOT_TOKEN")
            .map_err(|_| anyhow!("TELEGRAM_BOT_TOKEN must be set"))?;

        if token.trim().is_empty() {
            return Err(anyhow!("TELEGRAM_BOT_TOKEN must be set"));
        }

        let database_url = Self::database_url_from_env();

        let http_port = parse_var("HTTP_PORT", 3000u16)
            .map_err(|_| anyhow!("Invalid HTTP_PORT"))?;

        let toggl_api_url = non_blank_var("TOGGL_API_URL")
            .unwrap_or_else(|| DEFAULT_TOGGL_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let wake_cooldown_minutes = parse_var("WAKE_COOLDOWN_MINUTES", 60i64)
            .ok()
            .filter(|minutes| (1..=MAX_WAKE_COOLDOWN_MINUTES).contains(minutes))
            .ok_or_else(|| {
                anyhow!("Invalid WAKE_COOLDOWN_MINUTES (expected 1 to {})", MAX_WAKE_COOLDOWN_MINUTES)
            })?;

        let send_timeout_secs = parse_var("SEND_TIMEOUT_SECS", 10u64)
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or_else(|| anyhow!("Invalid SEND_TIMEOUT_SECS"))?;

        let webhook = match non_blank_var("WEBHOOK_URL") {
            Some(raw) => {
                let url = Url::parse(raw.trim()).map_err(|e| anyhow!("Invalid WEBHOOK_URL: {}", e))?;
                let port = parse_var("WEBHOOK_PORT", 8443u16)
                    .map_err(|_| anyhow!("Invalid WEBHOOK_PORT"))?;
                if port == http_port {
                    return Err(anyhow!("WEBHOOK_PORT must differ from HTTP_PORT"));
                }
                Some(WebhookConfig { url, port })
            }
            None => None,
        };

        Ok(Config {
            telegram_bot_token: token,
            database_url,
            http_port,
            toggl_api_url,
            wake_cooldown_minutes,
            send_timeout_secs,
            webhook,
        })
    }

    /// Just the database location, for tools that never talk to Telegram.
    pub fn database_url_from_env() -> String {
        non_blank_var("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string())
    }
}

fn non_blank_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_var<T: std::str::FromStr>(key: &str, default: T) -> Result<T, T::Err> {
    match non_blank_var(key) {
        Some(raw) => raw.trim().parse(),
        None => Ok(default),
    }
}
