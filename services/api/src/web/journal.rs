//! services/api/src/web/journal.rs
//!
//! Journal entry CRUD and mood analytics. Every query is scoped to the
//! authenticated caller; someone else's entry is reported as not found.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension, Json};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use mindmatters_core::domain::{JournalEntry, JournalInput, MoodTrend, Tags};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;

use crate::{
    error::{ApiError, ErrorBody},
    tags,
    web::{
        extract::{AppJson, AppPath},
        state::{AppState, AuthUser},
    },
};

const MOOD_SCORE_RANGE: std::ops::RangeInclusive<i32> = 1..=10;
const TREND_WINDOW_DAYS: i64 = 30;

//=========================================================================================
// Request/Response Types
//=========================================================================================

/// Body of create and update. Updates replace every field.
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JournalRequest {
    pub mood: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    /// A list of strings, or a string holding a JSON array or comma-separated list.
    #[serde(default, deserialize_with = "tags::deserialize")]
    #[schema(value_type = Vec<String>)]
    pub tags: Tags,
    pub mood_score: Option<i32>,
}

impl JournalRequest {
    fn into_input(self) -> Result<JournalInput, ApiError> {
        fn required(value: Option<String>, field: &str) -> Result<String, ApiError> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ApiError::Validation(format!("{} is required", field)))
        }

        if let Some(score) = self.mood_score {
            if !MOOD_SCORE_RANGE.contains(&score) {
                return Err(ApiError::Validation(format!(
                    "moodScore must be between {} and {}",
                    MOOD_SCORE_RANGE.start(),
                    MOOD_SCORE_RANGE.end()
                )));
            }
        }

        Ok(JournalInput {
            mood: required(self.mood, "mood")?,
            title: required(self.title, "title")?,
            content: required(self.content, "content")?,
            tags: self.tags,
            mood_score: self.mood_score,
        })
    }
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntryResponse {
    pub id: i64,
    pub user_id: i64,
    pub mood: String,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub mood_score: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<JournalEntry> for JournalEntryResponse {
    fn from(entry: JournalEntry) -> Self {
        Self {
            id: entry.id,
            user_id: entry.user_id,
            mood: entry.mood,
            title: entry.title,
            content: entry.content,
            tags: entry.tags.into_vec(),
            mood_score: entry.mood_score,
            created_at: entry.created_at,
            updated_at: entry.updated_at,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MoodTrendResponse {
    pub date: NaiveDate,
    pub mood: String,
    pub count: i64,
    pub avg_score: Option<f64>,
}

impl From<MoodTrend> for MoodTrendResponse {
    fn from(trend: MoodTrend) -> Self {
        Self {
            date: trend.date,
            mood: trend.mood,
            count: trend.count,
            avg_score: trend.avg_score,
        }
    }
}

//=========================================================================================
// Handlers
//=========================================================================================

/// List the caller's journal entries, newest first.
#[utoipa::path(
    get,
    path = "/api/journal",
    tag = "journal",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "The caller's entries", body = [JournalEntryResponse]),
        (status = 401, description = "Missing or invalid token", body = ErrorBody)
    )
)]
pub async fn list_entries_handler(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<JournalEntryResponse>>, ApiError> {
    let entries = state.db.list_entries(auth.id).await?;
    Ok(Json(entries.into_iter().map(Into::into).collect()))
}

/// Fetch one of the caller's entries.
#[utoipa::path(
    get,
    path = "/api/journal/{id}",
    tag = "journal",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Entry id")),
    responses(
        (status = 200, description = "The entry", body = JournalEntryResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 404, description = "No such entry for this user", body = ErrorBody)
    )
)]
pub async fn get_entry_handler(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<JournalEntryResponse>, ApiError> {
    let entry = state
        .db
        .get_entry(id, auth.id)
        .await
        .map_err(ApiError::not_found_as("Entry not found"))?;
    Ok(Json(entry.into()))
}

/// Create an entry owned by the caller.
#[utoipa::path(
    post,
    path = "/api/journal",
    tag = "journal",
    security(("bearer" = [])),
    request_body = JournalRequest,
    responses(
        (status = 201, description = "Entry created", body = JournalEntryResponse),
        (status = 400, description = "Missing or invalid fields", body = ErrorBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody)
    )
)]
pub async fn create_entry_handler(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    AppJson(req): AppJson<JournalRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let input = req.into_input()?;
    let entry = state.db.create_entry(auth.id, &input).await?;
    info!("User {} created journal entry {}", auth.id, entry.id);
    Ok((StatusCode::CREATED, Json(JournalEntryResponse::from(entry))))
}

/// Replace the fields of one of the caller's entries.
#[utoipa::path(
    put,
    path = "/api/journal/{id}",
    tag = "journal",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Entry id")),
    request_body = JournalRequest,
    responses(
        (status = 200, description = "Entry updated", body = JournalEntryResponse),
        (status = 400, description = "Missing or invalid fields", body = ErrorBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 404, description = "No such entry for this user", body = ErrorBody)
    )
)]
pub async fn update_entry_handler(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    AppPath(id): AppPath<i64>,
    AppJson(req): AppJson<JournalRequest>,
) -> Result<Json<JournalEntryResponse>, ApiError> {
    let input = req.into_input()?;
    let entry = state
        .db
        .update_entry(id, auth.id, &input)
        .await
        .map_err(ApiError::not_found_as("Entry not found"))?;
    Ok(Json(entry.into()))
}

/// Delete one of the caller's entries.
#[utoipa::path(
    delete,
    path = "/api/journal/{id}",
    tag = "journal",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Entry id")),
    responses(
        (status = 200, description = "Entry deleted", body = MessageResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 404, description = "No such entry for this user", body = ErrorBody)
    )
)]
pub async fn delete_entry_handler(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .db
        .delete_entry(id, auth.id)
        .await
        .map_err(ApiError::not_found_as("Entry not found"))?;
    info!("User {} deleted journal entry {}", auth.id, id);
    Ok(Json(MessageResponse {
        message: "Entry deleted successfully".to_string(),
    }))
}

/// Entry counts and average mood score per day and mood over the last 30 days.
#[utoipa::path(
    get,
    path = "/api/journal/analytics/mood-trends",
    tag = "journal",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Grouped mood statistics, oldest day first", body = [MoodTrendResponse]),
        (status = 401, description = "Missing or invalid token", body = ErrorBody)
    )
)]
pub async fn mood_trends_handler(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<MoodTrendResponse>>, ApiError> {
    let since = Utc::now() - Duration::days(TREND_WINDOW_DAYS);
    let trends = state.db.mood_trends(auth.id, since).await?;
    Ok(Json(trends.into_iter().map(Into::into).collect()))
}
