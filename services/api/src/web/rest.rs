//! services/api/src/web/rest.rs
//!
//! The master definition for the OpenAPI specification and the public
//! health endpoint.

use axum::Json;
use serde::Serialize;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi, ToSchema,
};

use crate::{
    error::ErrorBody,
    web::{assessment, auth, chat, journal},
};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        health_handler,
        auth::register_handler,
        auth::login_handler,
        auth::me_handler,
        journal::list_entries_handler,
        journal::get_entry_handler,
        journal::create_entry_handler,
        journal::update_entry_handler,
        journal::delete_entry_handler,
        journal::mood_trends_handler,
        chat::chat_handler,
        chat::chat_history_handler,
        assessment::submit_assessment_handler,
        assessment::assessment_history_handler,
        assessment::latest_assessment_handler,
    ),
    components(
        schemas(
            ErrorBody,
            HealthResponse,
            auth::RegisterRequest,
            auth::LoginRequest,
            auth::UserProfile,
            auth::AuthResponse,
            auth::MeResponse,
            journal::JournalRequest,
            journal::JournalEntryResponse,
            journal::MessageResponse,
            journal::MoodTrendResponse,
            chat::ChatRequest,
            chat::ChatResponse,
            chat::ChatMessageResponse,
            assessment::SubmitAssessmentRequest,
            assessment::SubmitAssessmentResponse,
            assessment::AssessmentResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "auth", description = "Registration, login and the current profile."),
        (name = "journal", description = "Owner-scoped journal entries and mood analytics."),
        (name = "chat", description = "The journal chat companion."),
        (name = "assessment", description = "Mood assessment results.")
    )
)]
pub struct ApiDoc;

/// Registers the `bearer` security scheme referenced by protected paths.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

//=========================================================================================
// Health
//=========================================================================================

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Liveness probe. Does not touch the store.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
