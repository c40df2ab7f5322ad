//! crates/mindmatters_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, NaiveDate, Utc};

/// Numeric identifier assigned to a user by the store on registration.
pub type UserId = i64;

/// Represents a registered user - safe to hand to any layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Only used internally for login - contains sensitive data
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// The canonical tag list of a journal entry.
///
/// Tags keep exactly the order and text they were given in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tags(Vec<String>);

impl Tags {
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(tags.into_iter().map(|t| t.as_ref().to_string()).collect())
    }

    /// Splits a comma-separated list. Items are trimmed and blanks dropped.
    pub fn from_comma_list(text: &str) -> Self {
        Self::new(text.split(',').map(str::trim).filter(|t| !t.is_empty()))
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

/// The mutable fields of a journal entry, as supplied on create and update.
///
/// Updates replace every field, so an omitted `mood_score` or `tags` clears it.
#[derive(Debug, Clone, PartialEq)]
pub struct JournalInput {
    pub mood: String,
    pub title: String,
    pub content: String,
    pub tags: Tags,
    pub mood_score: Option<i32>,
}

/// A journal entry owned by exactly one user.
#[derive(Debug, Clone, PartialEq)]
pub struct JournalEntry {
    pub id: i64,
    pub user_id: UserId,
    pub mood: String,
    pub title: String,
    pub content: String,
    pub tags: Tags,
    pub mood_score: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One submitted mood assessment. Never updated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssessmentResult {
    pub id: i64,
    pub user_id: UserId,
    pub score: i32,
    pub created_at: DateTime<Utc>,
}

/// A single chat exchange. `user_id` is `None` for anonymous chats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: i64,
    pub user_id: Option<UserId>,
    pub message: String,
    pub response: String,
    pub timestamp: DateTime<Utc>,
}

/// Journal entries of one mood on one calendar day (UTC).
#[derive(Debug, Clone, PartialEq)]
pub struct MoodTrend {
    pub date: NaiveDate,
    pub mood: String,
    pub count: i64,
    /// Average of the non-null mood scores, `None` if every score was null.
    pub avg_score: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_kept_as_given() {
        let tags = Tags::new([" work", "", "sleep", "work"]);
        assert_eq!(tags.as_slice(), [" work", "", "sleep", "work"]);
    }

    #[test]
    fn comma_list_is_trimmed_and_drops_blanks() {
        let tags = Tags::from_comma_list("work,  , sleep ,,work");
        assert_eq!(tags.as_slice(), ["work", "sleep", "work"]);
        assert!(Tags::from_comma_list("  ").is_empty());
    }

    #[test]
    fn empty_tags_by_default() {
        assert!(Tags::default().is_empty());
        assert_eq!(Tags::new(Vec::<String>::new()), Tags::default());
    }
}
