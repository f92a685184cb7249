use anyhow::{anyhow, Result};
use std::env;

const DEFAULT_DATABASE_URL: &str = "sqlite:./data/proverbs.db";

#[derive(Debug, Clone)]
pub struct Config {
    pub telegram_bot_token: String,
    pub database_url: String,
    pub http_port: u16,
    pub subscription_interval_secs: u64,
    pub subscriptions_enabled: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let token = env::var("TELEGRAM_BOT_TOKEN")
            .map_err(|_| anyhow!("TELEGRAM_BOT_TOKEN must be set"))?;

        if token.trim().is_empty() {
            return Err(anyhow!("TELEGRAM_BOT_TOKEN must be set"));
        }

        let database_url = Self::database_url_from_env();

        let port_str = env::var("HTTP_PORT").unwrap_or_else(|_| "3000".to_string());
        let http_port = port_str
            .trim()
            .parse()
            .map_err(|_| anyhow!("Invalid HTTP_PORT"))?;

        let interval_str =
            env::var("SUBSCRIPTION_INTERVAL_SECS").unwrap_or_else(|_| "10".to_string());
        let subscription_interval_secs: u64 = interval_str
            .trim()
            .parse()
            .map_err(|_| anyhow!("Invalid SUBSCRIPTION_INTERVAL_SECS"))?;
        if subscription_interval_secs == 0 {
            return Err(anyhow!("SUBSCRIPTION_INTERVAL_SECS must be positive"));
        }

        let enabled_str = env::var("ENABLE_SUBSCRIPTIONS").unwrap_or_else(|_| "true".to_string());
        let subscriptions_enabled = match enabled_str.trim().to_lowercase().as_str() {
            "true" | "1" => true,
            "false" | "0" => false,
            other => return Err(anyhow!("Invalid ENABLE_SUBSCRIPTIONS: {other}")),
        };

        Ok(Config {
            telegram_bot_token: token,
            database_url,
            http_port,
            subscription_interval_secs,
            subscriptions_enabled,
        })
    }

    /// Database URL on its own, for tools that don't need a bot token.
    pub fn database_url_from_env() -> String {
        env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string())
    }
}
