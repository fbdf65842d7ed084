//! # Nudge Bot Main Entry Point
//!
//! Initializes logging, loads configuration, sets up the database, wires the
//! wake engine and reply router to their collaborators, and runs the Telegram
//! bot next to the health check server.

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use teloxide::dispatching::Dispatcher;
use teloxide::error_handlers::LoggingErrorHandler;
use teloxide::update_listeners::webhooks;
use teloxide::Bot;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nudge_bot::bot::handlers::{BotHandler, BotServices};
use nudge_bot::config::Config;
use nudge_bot::database::connection::DatabaseManager;
use nudge_bot::services::health::HealthService;
use nudge_bot::services::notifier::TelegramNotifier;
use nudge_bot::services::reply_router::ReplyRouter;
use nudge_bot::services::status::StatusChecker;
use nudge_bot::services::toggl::TogglProbe;
use nudge_bot::services::wake::WakeEngine;
use nudge_bot::utils::logging::log_system_event;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nudge_bot=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    info!("Starting Nudge Bot v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration loaded - Database: {}, HTTP Port: {}, Cooldown: {}m",
        config.database_url, config.http_port, config.wake_cooldown_minutes);

    // Initialize database
    info!("Initializing database connection...");
    let db_manager = DatabaseManager::new(&config.database_url).await?;
    info!("Running database migrations...");
    db_manager.run_migrations().await?;
    let db_arc = Arc::new(db_manager);
    info!("Database initialized successfully");

    // Wire the wake engine and reply router
    let bot = Bot::new(&config.telegram_bot_token);
    let probe = Arc::new(TogglProbe::new(config.toggl_api_url.clone())?);
    let notifier = Arc::new(TelegramNotifier::new(
        bot.clone(),
        Duration::from_secs(config.send_timeout_secs),
    ));
    let status = StatusChecker::new(db_arc.clone(), probe.clone());
    let engine = WakeEngine::new(db_arc.clone(), db_arc.clone(), probe, notifier.clone())
        .with_cooldown(chrono::Duration::minutes(config.wake_cooldown_minutes));
    let router = ReplyRouter::new(db_arc.clone(), notifier);

    let handler = BotHandler::new(BotServices {
        db: db_arc.clone(),
        engine: Arc::new(engine),
        router: Arc::new(router),
        status: Arc::new(status),
    });
    info!("Telegram bot initialized successfully");

    // Initialize health service
    let health_service = HealthService::new(db_arc.clone());
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.http_port))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to port {}: {}", config.http_port, e))?;

    info!("Health check server starting on port {}", config.http_port);

    let webhook = config.webhook.clone();

    // Run both the bot and health server concurrently
    let bot_task = tokio::spawn(async move {
        let mut dispatcher = Dispatcher::builder(bot.clone(), handler.schema())
            .enable_ctrlc_handler()
            .build();

        match webhook {
            Some(webhook) => {
                let address = SocketAddr::from(([0, 0, 0, 0], webhook.port));
                log_system_event("Receiving updates by webhook", Some(webhook.url.as_str()));
                match webhooks::axum(bot, webhooks::Options::new(address, webhook.url)).await {
                    Ok(update_listener) => {
                        dispatcher
                            .dispatch_with_listener(
                                update_listener,
                                LoggingErrorHandler::with_custom_text("An error from the update listener"),
                            )
                            .await;
                    }
                    Err(e) => tracing::error!("Failed to start webhook listener: {}", e),
                }
            }
            None => {
                log_system_event("Receiving updates by long polling", None);
                dispatcher.dispatch().await;
            }
        }
    });

    let health_task = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, health_service.router).await {
            tracing::error!("Health server error: {}", e);
        }
    });

    // Wait for either task to complete (which would indicate shutdown)
    tokio::select! {
        result1 = bot_task => {
            if let Err(e) = result1 {
                tracing::error!("Bot task error: {}", e);
            }
        }
        result2 = health_task => {
            if let Err(e) = result2 {
                tracing::error!("Health task error: {}", e);
            }
        }
    }

    info!("Application stopped");
    Ok(())
}
