mod clients;
mod config;
mod console;
mod controllers;
mod domain;
mod error;
mod messages;
mod poll;
mod session;
mod store;
mod webhook;

#[cfg(test)]
mod test_http;
#[cfg(test)]
mod test_store;

use std::io::{self, Write};

use tracing::{error, info, warn};

use crate::config::AppConfig;
use crate::console::{ConsoleSystem, Notice, NoticeSender};
use crate::webhook::WebhookRegistrar;

fn prompt_secret() -> anyhow::Result<String> {
    print!("Admin password: ");
    io::stdout().flush()?;
    let mut entered = String::new();
    io::stdin().read_line(&mut entered)?;
    Ok(entered.trim().to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Setup tracing once for the entire application
    console::setup_tracing();

    let config = AppConfig::from_env()?;
    let (notices, mut notice_rx) = NoticeSender::channel();

    let entered = prompt_secret()?;
    let system = match ConsoleSystem::login(&config, &entered, notices).await {
        Ok(system) => system,
        Err(e) => {
            error!(error = %e, "Login rejected");
            anyhow::bail!("login rejected");
        }
    };

    // One-shot webhook registration when the operator supplies a bot token.
    if let Ok(token) = std::env::var("SHOPDESK_BOT_TOKEN") {
        if config.webhook_callback_url.is_empty() {
            warn!("SHOPDESK_BOT_TOKEN set but SHOPDESK_WEBHOOK_CALLBACK_URL is not");
        } else {
            let registrar = WebhookRegistrar::new(config.bot_api_base.clone());
            match registrar
                .register(&token, &config.webhook_callback_url)
                .await
            {
                Ok(()) => info!("Bot webhook registered"),
                Err(e) => warn!(error = %e, "Webhook registration failed"),
            }
        }
    }

    let orders = system.orders.snapshot().await?;
    info!(count = orders.len(), "Order board loaded");
    for order in &orders {
        info!(
            order = %order.order_number,
            status = %order.status,
            customer = %order.customer_name,
            product = %order.product_name,
            "Order"
        );
    }
    let products = system.catalog.snapshot().await?;
    info!(count = products.len(), "Catalog loaded");
    let feedback = system.feedback.snapshot().await?;
    info!(count = feedback.len(), "Feedback loaded");

    info!("Polling for changes; Ctrl-C to log out");
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            Some(notice) = notice_rx.recv() => match notice {
                Notice::NewOrders { count } => info!(count, "New orders arrived"),
                Notice::Error { message } => warn!(%message, "Transient failure"),
            },
        }
    }

    system
        .shutdown()
        .await
        .map_err(|e| anyhow::anyhow!(e))?;
    info!("Logged out");
    Ok(())
}
