//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `DatabaseService` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use mindmatters_core::domain::{
    AssessmentResult, ChatMessage, JournalEntry, JournalInput, MoodTrend, User, UserCredentials,
    UserId,
};
use mindmatters_core::ports::{DatabaseService, PortError, PortResult};
use sqlx::{postgres::PgPoolOptions, FromRow, PgPool};

use crate::tags;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `DatabaseService` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a bounded pool. Callers wait for a free connection when it is exhausted.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

const USER_COLUMNS: &str = "id, name, email, created_at, updated_at";
const ENTRY_COLUMNS: &str =
    "id, user_id, mood, title, content, tags, mood_score, created_at, updated_at";
const ASSESSMENT_COLUMNS: &str = "id, user_id, score, created_at";
const CHAT_COLUMNS: &str = "id, user_id, message, response, timestamp";

#[derive(FromRow)]
struct UserRecord {
    id: i64,
    name: String,
    email: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}
impl UserRecord {
    fn to_domain(self) -> User {
        User {
            id: self.id,
            name: self.name,
            email: self.email,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(FromRow)]
struct CredentialsRecord {
    id: i64,
    name: String,
    email: String,
    password_hash: String,
}
impl CredentialsRecord {
    fn to_domain(self) -> UserCredentials {
        UserCredentials {
            id: self.id,
            name: self.name,
            email: self.email,
            password_hash: self.password_hash,
        }
    }
}

#[derive(FromRow)]
struct JournalRecord {
    id: i64,
    user_id: i64,
    mood: String,
    title: String,
    content: String,
    tags: Option<String>,
    mood_score: Option<i32>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}
impl JournalRecord {
    fn to_domain(self) -> JournalEntry {
        JournalEntry {
            id: self.id,
            user_id: self.user_id,
            mood: self.mood,
            title: self.title,
            content: self.content,
            tags: tags::decode_stored(self.tags.as_deref()),
            mood_score: self.mood_score,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(FromRow)]
struct AssessmentRecord {
    id: i64,
    user_id: i64,
    score: i32,
    created_at: DateTime<Utc>,
}
impl AssessmentRecord {
    fn to_domain(self) -> AssessmentResult {
        AssessmentResult {
            id: self.id,
            user_id: self.user_id,
            score: self.score,
            created_at: self.created_at,
        }
    }
}

#[derive(FromRow)]
struct ChatRecord {
    id: i64,
    user_id: Option<i64>,
    message: String,
    response: String,
    timestamp: DateTime<Utc>,
}
impl ChatRecord {
    fn to_domain(self) -> ChatMessage {
        ChatMessage {
            id: self.id,
            user_id: self.user_id,
            message: self.message,
            response: self.response,
            timestamp: self.timestamp,
        }
    }
}

#[derive(FromRow)]
struct MoodTrendRecord {
    date: NaiveDate,
    mood: String,
    count: i64,
    avg_score: Option<f64>,
}
impl MoodTrendRecord {
    fn to_domain(self) -> MoodTrend {
        MoodTrend {
            date: self.date,
            mood: self.mood,
            count: self.count,
            avg_score: self.avg_score,
        }
    }
}

//=========================================================================================
// `DatabaseService` Trait Implementation
//=========================================================================================

#[async_trait]
impl DatabaseService for DbAdapter {
    async fn create_user(&self, name: &str, email: &str, password_hash: &str) -> PortResult<User> {
        let sql = format!(
            "INSERT INTO users (name, email, password_hash) VALUES ($1, $2, $3) RETURNING {}",
            USER_COLUMNS
        );
        let record = sqlx::query_as::<_, UserRecord>(&sql)
            .bind(name)
            .bind(email)
            .bind(password_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                    PortError::Conflict("User already exists".to_string())
                }
                _ => unexpected(e),
            })?;
        Ok(record.to_domain())
    }

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        let record = sqlx::query_as::<_, CredentialsRecord>(
            "SELECT id, name, email, password_hash FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or_else(|| PortError::NotFound("User not found".to_string()))?;
        Ok(record.to_domain())
    }

    async fn get_user_by_id(&self, user_id: UserId) -> PortResult<User> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let record = sqlx::query_as::<_, UserRecord>(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(unexpected)?
            .ok_or_else(|| PortError::NotFound(format!("User {} not found", user_id)))?;
        Ok(record.to_domain())
    }

    async fn list_entries(&self, owner: UserId) -> PortResult<Vec<JournalEntry>> {
        let sql = format!(
            "SELECT {} FROM journal_entries WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
            ENTRY_COLUMNS
        );
        let records = sqlx::query_as::<_, JournalRecord>(&sql)
            .bind(owner)
            .fetch_all(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn get_entry(&self, entry_id: i64, owner: UserId) -> PortResult<JournalEntry> {
        let sql = format!(
            "SELECT {} FROM journal_entries WHERE id = $1 AND user_id = $2",
            ENTRY_COLUMNS
        );
        let record = sqlx::query_as::<_, JournalRecord>(&sql)
            .bind(entry_id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await
            .map_err(unexpected)?
            .ok_or_else(|| PortError::NotFound(format!("Entry {} not found", entry_id)))?;
        Ok(record.to_domain())
    }

    async fn create_entry(&self, owner: UserId, input: &JournalInput) -> PortResult<JournalEntry> {
        let sql = format!(
            "INSERT INTO journal_entries (user_id, mood, title, content, tags, mood_score) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
            ENTRY_COLUMNS
        );
        let record = sqlx::query_as::<_, JournalRecord>(&sql)
            .bind(owner)
            .bind(&input.mood)
            .bind(&input.title)
            .bind(&input.content)
            .bind(tags::encode(&input.tags))
            .bind(input.mood_score)
            .fetch_one(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(record.to_domain())
    }

    async fn update_entry(
        &self,
        entry_id: i64,
        owner: UserId,
        input: &JournalInput,
    ) -> PortResult<JournalEntry> {
        let sql = format!(
            "UPDATE journal_entries \
             SET mood = $1, title = $2, content = $3, tags = $4, mood_score = $5, updated_at = now() \
             WHERE id = $6 AND user_id = $7 RETURNING {}",
            ENTRY_COLUMNS
        );
        let record = sqlx::query_as::<_, JournalRecord>(&sql)
            .bind(&input.mood)
            .bind(&input.title)
            .bind(&input.content)
            .bind(tags::encode(&input.tags))
            .bind(input.mood_score)
            .bind(entry_id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await
            .map_err(unexpected)?
            .ok_or_else(|| PortError::NotFound(format!("Entry {} not found", entry_id)))?;
        Ok(record.to_domain())
    }

    async fn delete_entry(&self, entry_id: i64, owner: UserId) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM journal_entries WHERE id = $1 AND user_id = $2")
            .bind(entry_id)
            .bind(owner)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("Entry {} not found", entry_id)));
        }
        Ok(())
    }

    async fn mood_trends(&self, owner: UserId, since: DateTime<Utc>) -> PortResult<Vec<MoodTrend>> {
        let records = sqlx::query_as::<_, MoodTrendRecord>(
            "SELECT (created_at AT TIME ZONE 'UTC')::date AS date, mood, \
                    COUNT(*) AS count, AVG(mood_score)::float8 AS avg_score \
             FROM journal_entries \
             WHERE user_id = $1 AND created_at >= $2 \
             GROUP BY 1, mood \
             ORDER BY date ASC, mood ASC",
        )
        .bind(owner)
        .bind(since)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn create_assessment(&self, owner: UserId, score: i32) -> PortResult<AssessmentResult> {
        let sql = format!(
            "INSERT INTO assessment_results (user_id, score) VALUES ($1, $2) RETURNING {}",
            ASSESSMENT_COLUMNS
        );
        let record = sqlx::query_as::<_, AssessmentRecord>(&sql)
            .bind(owner)
            .bind(score)
            .fetch_one(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(record.to_domain())
    }

    async fn list_assessments(&self, owner: UserId) -> PortResult<Vec<AssessmentResult>> {
        let sql = format!(
            "SELECT {} FROM assessment_results WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
            ASSESSMENT_COLUMNS
        );
        let records = sqlx::query_as::<_, AssessmentRecord>(&sql)
            .bind(owner)
            .fetch_all(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn latest_assessment(&self, owner: UserId) -> PortResult<AssessmentResult> {
        let sql = format!(
            "SELECT {} FROM assessment_results WHERE user_id = $1 \
             ORDER BY created_at DESC, id DESC LIMIT 1",
            ASSESSMENT_COLUMNS
        );
        let record = sqlx::query_as::<_, AssessmentRecord>(&sql)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await
            .map_err(unexpected)?
            .ok_or_else(|| PortError::NotFound("No assessment found".to_string()))?;
        Ok(record.to_domain())
    }

    async fn save_chat_message(
        &self,
        owner: Option<UserId>,
        message: &str,
        response: &str,
    ) -> PortResult<ChatMessage> {
        let sql = format!(
            "INSERT INTO chat_messages (user_id, message, response) VALUES ($1, $2, $3) RETURNING {}",
            CHAT_COLUMNS
        );
        let record = sqlx::query_as::<_, ChatRecord>(&sql)
            .bind(owner)
            .bind(message)
            .bind(response)
            .fetch_one(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(record.to_domain())
    }

    async fn chat_history(&self, owner: UserId, limit: i64) -> PortResult<Vec<ChatMessage>> {
        let sql = format!(
            "SELECT {} FROM chat_messages WHERE user_id = $1 \
             ORDER BY timestamp DESC, id DESC LIMIT $2",
            CHAT_COLUMNS
        );
        let records = sqlx::query_as::<_, ChatRecord>(&sql)
            .bind(owner)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }
}
