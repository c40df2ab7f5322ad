//! services/api/src/web/assessment.rs
//!
//! Mood assessment results. Append-only and scoped to the caller.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension, Json};
use chrono::{DateTime, Utc};
use mindmatters_core::domain::AssessmentResult;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::{
    error::{ApiError, ErrorBody},
    web::{
        extract::AppJson,
        state::{AppState, AuthUser},
    },
};

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct SubmitAssessmentRequest {
    pub score: Option<i32>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAssessmentResponse {
    pub message: String,
    pub assessment_id: i64,
    pub score: i32,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentResponse {
    pub id: i64,
    pub user_id: i64,
    pub score: i32,
    pub created_at: DateTime<Utc>,
}

impl From<AssessmentResult> for AssessmentResponse {
    fn from(result: AssessmentResult) -> Self {
        Self {
            id: result.id,
            user_id: result.user_id,
            score: result.score,
            created_at: result.created_at,
        }
    }
}

//=========================================================================================
// Handlers
//=========================================================================================

/// Record a new assessment score for the caller.
#[utoipa::path(
    post,
    path = "/api/assessment",
    tag = "assessment",
    security(("bearer" = [])),
    request_body = SubmitAssessmentRequest,
    responses(
        (status = 201, description = "Assessment recorded", body = SubmitAssessmentResponse),
        (status = 400, description = "Missing or negative score", body = ErrorBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody)
    )
)]
pub async fn submit_assessment_handler(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    AppJson(req): AppJson<SubmitAssessmentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let score = req
        .score
        .ok_or_else(|| ApiError::Validation("Score is required".to_string()))?;
    if score < 0 {
        return Err(ApiError::Validation("Score must not be negative".to_string()));
    }

    let result = state.db.create_assessment(auth.id, score).await?;
    Ok((
        StatusCode::CREATED,
        Json(SubmitAssessmentResponse {
            message: "Assessment submitted successfully".to_string(),
            assessment_id: result.id,
            score: result.score,
        }),
    ))
}

/// The caller's assessments, newest first.
#[utoipa::path(
    get,
    path = "/api/assessment/history",
    tag = "assessment",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Assessment history", body = [AssessmentResponse]),
        (status = 401, description = "Missing or invalid token", body = ErrorBody)
    )
)]
pub async fn assessment_history_handler(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<AssessmentResponse>>, ApiError> {
    let results = state.db.list_assessments(auth.id).await?;
    Ok(Json(results.into_iter().map(Into::into).collect()))
}

/// The caller's most recent assessment.
#[utoipa::path(
    get,
    path = "/api/assessment/latest",
    tag = "assessment",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Latest assessment", body = AssessmentResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 404, description = "No assessment submitted yet", body = ErrorBody)
    )
)]
pub async fn latest_assessment_handler(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<AssessmentResponse>, ApiError> {
    let result = state
        .db
        .latest_assessment(auth.id)
        .await
        .map_err(ApiError::not_found_as("No assessment found"))?;
    Ok(Json(result.into()))
}
