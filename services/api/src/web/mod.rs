//! services/api/src/web/mod.rs
//!
//! Route table for the REST API. Public auth routes sit beside a protected
//! group that always runs behind `require_auth`.

pub mod assessment;
pub mod auth;
pub mod chat;
pub mod extract;
pub mod journal;
pub mod middleware;
pub mod rest;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub use middleware::require_auth;
pub use state::{AppState, AuthUser};

const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Builds the full application router (everything except CORS and Swagger UI,
/// which depend on deployment configuration).
pub fn app(state: Arc<AppState>) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/auth/register", post(auth::register_handler))
        .route("/auth/login", post(auth::login_handler));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route("/auth/me", get(auth::me_handler))
        .route(
            "/journal",
            get(journal::list_entries_handler).post(journal::create_entry_handler),
        )
        .route(
            "/journal/{id}",
            get(journal::get_entry_handler)
                .put(journal::update_entry_handler)
                .delete(journal::delete_entry_handler),
        )
        .route("/journal/chat", post(chat::chat_handler))
        .route("/journal/chat/history", get(chat::chat_history_handler))
        .route(
            "/journal/analytics/mood-trends",
            get(journal::mood_trends_handler),
        )
        .route("/assessment", post(assessment::submit_assessment_handler))
        .route(
            "/assessment/history",
            get(assessment::assessment_history_handler),
        )
        .route(
            "/assessment/latest",
            get(assessment::latest_assessment_handler),
        )
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    let api_router = Router::new()
        .merge(public_routes)
        .merge(protected_routes);

    Router::new()
        .route("/health", get(rest::health_handler))
        .nest("/api", api_router)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
