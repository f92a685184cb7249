//! # Proverb of the Day Bot Main Entry Point
//!
//! Initializes logging, loads configuration, sets up the database,
//! starts the subscription scheduler, and runs the Telegram bot next to
//! the HTTP health endpoints.

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::prelude::*;
use tokio::sync::Mutex;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod bot;
mod config;
mod database;
mod loader;
mod services;
mod utils;

use crate::bot::handlers::BotHandler;
use crate::config::Config;
use crate::database::connection::DatabaseManager;
use crate::database::store::ProverbStore;
use crate::services::health::HealthService;
use crate::services::subscription::SubscriptionScheduler;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "proverb_bot=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    info!("Starting Proverb of the Day Bot v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration loaded - Database: {}, HTTP Port: {}, Subscriptions: {}",
        config.database_url, config.http_port, config.subscriptions_enabled
    );

    // Initialize database
    info!("Initializing database connection...");
    let db_manager = DatabaseManager::new(&config.database_url).await?;
    db_manager.run_migrations().await?;
    let store = ProverbStore::new(db_manager.pool.clone());
    info!("Database initialized successfully");

    // Initialize bot
    let tg_bot = Bot::new(&config.telegram_bot_token);

    // The scheduler context must be running before the bot accepts input
    let scheduler = Arc::new(Mutex::new(SubscriptionScheduler::new()));
    scheduler
        .lock()
        .await
        .start()
        .map_err(|e| anyhow::anyhow!("Failed to start subscription scheduler: {e}"))?;

    let handler = BotHandler::new(
        store.clone(),
        scheduler.clone(),
        Duration::from_secs(config.subscription_interval_secs),
        config.subscriptions_enabled,
    );

    // Initialize health service
    let health_service = HealthService::new(store, scheduler.clone());
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.http_port))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to port {}: {}", config.http_port, e))?;
    info!("Health check server starting on port {}", config.http_port);

    // Run both the bot and health server concurrently
    let bot_task = tokio::spawn(async move {
        let storage: Arc<InMemStorage<()>> = InMemStorage::new();
        Dispatcher::builder(tg_bot, handler.schema())
            .dependencies(dptree::deps![storage])
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
    });

    let health_task = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, health_service.router).await {
            tracing::error!("Health server error: {}", e);
        }
    });

    tokio::select! {
        result = bot_task => {
            if let Err(e) = result {
                tracing::error!("Bot task error: {}", e);
            }
        }
        result = health_task => {
            if let Err(e) = result {
                tracing::error!("Health task error: {}", e);
            }
        }
    }

    // The ticking context is always torn down before process exit
    scheduler.lock().await.stop();

    info!("Application stopped");
    Ok(())
}
