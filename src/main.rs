use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use rosterbot::config::AppConfig;
use rosterbot::handlers;
use rosterbot::services::ai::ollama::OllamaProvider;
use rosterbot::services::messaging::telegram::TelegramProvider;
use rosterbot::services::scheduling::HttpSchedulingApi;
use rosterbot::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    anyhow::ensure!(
        !config.telegram_bot_token.is_empty(),
        "TELEGRAM_BOT_TOKEN must be set"
    );
    anyhow::ensure!(
        !config.scheduling_api_token.is_empty(),
        "SCHEDULING_API_TOKEN must be set"
    );

    let scheduling = HttpSchedulingApi::new(
        config.scheduling_api_url.clone(),
        config.scheduling_api_token.clone(),
    );
    let messaging = TelegramProvider::new(config.telegram_bot_token.clone());
    let llm = OllamaProvider::new(config.ollama_url.clone(), config.ollama_model.clone());
    tracing::info!(
        scheduling_api = %config.scheduling_api_url,
        ollama = %config.ollama_url,
        "providers configured"
    );

    let state = Arc::new(AppState {
        config: config.clone(),
        scheduling: Box::new(scheduling),
        messaging: Box::new(messaging),
        llm: Box::new(llm),
    });

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/webhook/telegram", post(handlers::webhook::telegram_webhook))
        .route(
            "/api/admin/availability/:platform_id",
            get(handlers::admin::get_availability),
        )
        .route("/api/admin/classify", post(handlers::admin::classify_preview))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
