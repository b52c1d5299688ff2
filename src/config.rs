use std::time::Duration;

use anyhow::Context;

use crate::poll::POLL_INTERVAL;

/// Application configuration, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the remote admin API.
    pub api_base: String,
    /// The shared secret logins are compared against. Also attached to every
    /// store call by the authenticated session.
    pub admin_secret: String,
    /// Base URL of the messaging platform's bot API.
    pub bot_api_base: String,
    /// Fixed callback URL handed to the platform on webhook registration.
    pub webhook_callback_url: String,
    pub poll_interval: Duration,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let api_base =
            std::env::var("SHOPDESK_API_URL").context("SHOPDESK_API_URL is not set")?;
        let admin_secret = std::env::var("SHOPDESK_ADMIN_SECRET")
            .context("SHOPDESK_ADMIN_SECRET is not set")?;
        let bot_api_base = std::env::var("SHOPDESK_BOT_API_URL")
            .unwrap_or_else(|_| "https://api.telegram.org".to_string());
        let webhook_callback_url =
            std::env::var("SHOPDESK_WEBHOOK_CALLBACK_URL").unwrap_or_default();
        Ok(Self {
            api_base,
            admin_secret,
            bot_api_base,
            webhook_callback_url,
            poll_interval: POLL_INTERVAL,
        })
    }
}
