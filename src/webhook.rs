//! One-shot webhook registration with the messaging platform.
//!
//! Not part of the order/catalog/feedback flow: an operator supplies the bot
//! token once, we register the fixed callback URL, and report the outcome.

use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use crate::error::WebhookError;

#[derive(Debug, Deserialize)]
struct PlatformResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

pub struct WebhookRegistrar {
    client: reqwest::Client,
    api_base: String,
}

impl WebhookRegistrar {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: api_base.into(),
        }
    }

    /// Registers `callback_url` as the bot's webhook.
    #[instrument(skip(self, bot_token))]
    pub async fn register(&self, bot_token: &str, callback_url: &str) -> Result<(), WebhookError> {
        let url = format!("{}/bot{}/setWebhook", self.api_base, bot_token);
        let response = self
            .client
            .post(&url)
            .json(&json!({ "url": callback_url }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(WebhookError::Rejected(status.as_u16()));
        }
        let body: PlatformResponse = response
            .json()
            .await
            .map_err(WebhookError::Transport)?;
        if body.ok {
            info!("Webhook registered");
            Ok(())
        } else {
            Err(WebhookError::Declined(
                body.description.unwrap_or_else(|| "no reason given".to_string()),
            ))
        }
    }
}
