//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{DbAdapter, FallbackChat, MemoryDatabase, OpenAiChatAdapter},
    config::Config,
    error::ApiError,
    security::TokenService,
    web::{self, rest::ApiDoc, state::AppState},
};
use async_openai::{config::OpenAIConfig, Client};
use axum::http::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    HeaderValue, Method,
};
use mindmatters_core::ports::{ChatResponder, DatabaseService};
use secrecy::ExposeSecret;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Connect to the Store & Run Migrations ---
    let db: Arc<dyn DatabaseService> = if config.uses_memory_store() {
        warn!("Using the in-memory store; all data is lost on shutdown.");
        Arc::new(MemoryDatabase::new())
    } else {
        info!(
            "Connecting to database (max {} connections)...",
            config.db_max_connections
        );
        let db_adapter = DbAdapter::connect(&config.database_url, config.db_max_connections).await?;
        info!("Running database migrations...");
        db_adapter.run_migrations().await?;
        info!("Database migrations complete.");
        Arc::new(db_adapter)
    };

    // --- 3. Initialize Token Service & Chat Companion ---
    let tokens = TokenService::new(config.jwt_secret.expose_secret().as_bytes(), config.token_ttl);

    let upstream = config.chat_api_key.as_ref().map(|key| {
        let openai_config = OpenAIConfig::new()
            .with_api_key(key)
            .with_api_base(&config.chat_api_base);
        let adapter = OpenAiChatAdapter::new(
            Client::with_config(openai_config),
            config.chat_model.clone(),
        );
        Arc::new(adapter) as Arc<dyn ChatResponder>
    });
    if upstream.is_none() {
        info!("CHAT_API_KEY not set; chat will use local fallback replies.");
    }
    let chat = FallbackChat::new(upstream);

    // --- 4. Build the Shared AppState ---
    let app_state = Arc::new(AppState::new(db, tokens, chat));

    let origin = config.cors_origin.parse::<HeaderValue>().map_err(|e| {
        ApiError::Internal(format!("Invalid CORS_ORIGIN '{}': {}", config.cors_origin, e))
    })?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    // --- 5. Create the Web Router ---
    let app = web::app(app_state)
        .layer(cors)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
