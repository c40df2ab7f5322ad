//! crates/mindmatters_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases or APIs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    AssessmentResult, ChatMessage, JournalEntry, JournalInput, MoodTrend, User, UserCredentials,
    UserId,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Persistence for users and everything they own.
///
/// Every method that touches an owned resource takes the owner's id and
/// filters by it. A row owned by someone else is reported exactly like a
/// row that does not exist: `PortError::NotFound`.
#[async_trait]
pub trait DatabaseService: Send + Sync {
    // --- Credential Store ---

    /// Fails with `PortError::Conflict` if the email is already registered.
    async fn create_user(&self, name: &str, email: &str, password_hash: &str) -> PortResult<User>;

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials>;

    async fn get_user_by_id(&self, user_id: UserId) -> PortResult<User>;

    // --- Journal Entries ---

    /// Newest first.
    async fn list_entries(&self, owner: UserId) -> PortResult<Vec<JournalEntry>>;

    async fn get_entry(&self, entry_id: i64, owner: UserId) -> PortResult<JournalEntry>;

    async fn create_entry(&self, owner: UserId, input: &JournalInput) -> PortResult<JournalEntry>;

    /// Replaces every mutable field. Last write wins.
    async fn update_entry(
        &self,
        entry_id: i64,
        owner: UserId,
        input: &JournalInput,
    ) -> PortResult<JournalEntry>;

    async fn delete_entry(&self, entry_id: i64, owner: UserId) -> PortResult<()>;

    /// Entries since `since`, grouped by UTC day and mood, oldest day first.
    async fn mood_trends(&self, owner: UserId, since: DateTime<Utc>) -> PortResult<Vec<MoodTrend>>;

    // --- Assessments ---

    async fn create_assessment(&self, owner: UserId, score: i32) -> PortResult<AssessmentResult>;

    /// Newest first.
    async fn list_assessments(&self, owner: UserId) -> PortResult<Vec<AssessmentResult>>;

    async fn latest_assessment(&self, owner: UserId) -> PortResult<AssessmentResult>;

    // --- Chat Log ---

    async fn save_chat_message(
        &self,
        owner: Option<UserId>,
        message: &str,
        response: &str,
    ) -> PortResult<ChatMessage>;

    /// At most `limit` exchanges, newest first.
    async fn chat_history(&self, owner: UserId, limit: i64) -> PortResult<Vec<ChatMessage>>;
}

#[async_trait]
pub trait ChatResponder: Send + Sync {
    /// Produces a supportive reply to a single user message.
    async fn respond(&self, message: &str) -> PortResult<String>;
}
