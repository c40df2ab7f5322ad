//! services/api/src/adapters/memory.rs
//!
//! An in-process implementation of the `DatabaseService` port with the same
//! ownership and ordering rules as the Postgres adapter. Selected with
//! `DATABASE_URL=memory://` and used by the test suites.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use mindmatters_core::domain::{
    AssessmentResult, ChatMessage, JournalEntry, JournalInput, MoodTrend, User, UserCredentials,
    UserId,
};
use mindmatters_core::ports::{DatabaseService, PortError, PortResult};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, (User, String)>,
    entries: BTreeMap<i64, JournalEntry>,
    assessments: Vec<AssessmentResult>,
    chats: Vec<ChatMessage>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct MemoryDatabase {
    tables: RwLock<Tables>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }
}

fn entry_not_found(entry_id: i64) -> PortError {
    PortError::NotFound(format!("Entry {} not found", entry_id))
}

#[async_trait]
impl DatabaseService for MemoryDatabase {
    async fn create_user(&self, name: &str, email: &str, password_hash: &str) -> PortResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|(u, _)| u.email == email) {
            return Err(PortError::Conflict("User already exists".to_string()));
        }
        let now = Utc::now();
        let user = User {
            id: tables.next_id(),
            name: name.to_string(),
            email: email.to_string(),
            created_at: now,
            updated_at: now,
        };
        tables
            .users
            .insert(user.id, (user.clone(), password_hash.to_string()));
        Ok(user)
    }

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        let tables = self.tables.read().await;
        tables
            .users
            .values()
            .find(|(u, _)| u.email == email)
            .map(|(u, hash)| UserCredentials {
                id: u.id,
                name: u.name.clone(),
                email: u.email.clone(),
                password_hash: hash.clone(),
            })
            .ok_or_else(|| PortError::NotFound("User not found".to_string()))
    }

    async fn get_user_by_id(&self, user_id: UserId) -> PortResult<User> {
        let tables = self.tables.read().await;
        tables
            .users
            .get(&user_id)
            .map(|(u, _)| u.clone())
            .ok_or_else(|| PortError::NotFound(format!("User {} not found", user_id)))
    }

    async fn list_entries(&self, owner: UserId) -> PortResult<Vec<JournalEntry>> {
        let tables = self.tables.read().await;
        let mut entries: Vec<JournalEntry> = tables
            .entries
            .values()
            .filter(|e| e.user_id == owner)
            .cloned()
            .collect();
        entries.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(entries)
    }

    async fn get_entry(&self, entry_id: i64, owner: UserId) -> PortResult<JournalEntry> {
        let tables = self.tables.read().await;
        tables
            .entries
            .get(&entry_id)
            .filter(|e| e.user_id == owner)
            .cloned()
            .ok_or_else(|| entry_not_found(entry_id))
    }

    async fn create_entry(&self, owner: UserId, input: &JournalInput) -> PortResult<JournalEntry> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let entry = JournalEntry {
            id: tables.next_id(),
            user_id: owner,
            mood: input.mood.clone(),
            title: input.title.clone(),
            content: input.content.clone(),
            tags: input.tags.clone(),
            mood_score: input.mood_score,
            created_at: now,
            updated_at: now,
        };
        tables.entries.insert(entry.id, entry.clone());
        Ok(entry)
    }

    async fn update_entry(
        &self,
        entry_id: i64,
        owner: UserId,
        input: &JournalInput,
    ) -> PortResult<JournalEntry> {
        let mut tables = self.tables.write().await;
        let entry = tables
            .entries
            .get_mut(&entry_id)
            .filter(|e| e.user_id == owner)
            .ok_or_else(|| entry_not_found(entry_id))?;
        entry.mood = input.mood.clone();
        entry.title = input.title.clone();
        entry.content = input.content.clone();
        entry.tags = input.tags.clone();
        entry.mood_score = input.mood_score;
        entry.updated_at = Utc::now();
        Ok(entry.clone())
    }

    async fn delete_entry(&self, entry_id: i64, owner: UserId) -> PortResult<()> {
        let mut tables = self.tables.write().await;
        let owned = tables
            .entries
            .get(&entry_id)
            .is_some_and(|e| e.user_id == owner);
        if !owned {
            return Err(entry_not_found(entry_id));
        }
        tables.entries.remove(&entry_id);
        Ok(())
    }

    async fn mood_trends(&self, owner: UserId, since: DateTime<Utc>) -> PortResult<Vec<MoodTrend>> {
        let tables = self.tables.read().await;
        // (day, mood) -> (count, score sum, scored count)
        let mut groups: BTreeMap<(NaiveDate, String), (i64, i64, i64)> = BTreeMap::new();
        for entry in tables
            .entries
            .values()
            .filter(|e| e.user_id == owner && e.created_at >= since)
        {
            let group = groups
                .entry((entry.created_at.date_naive(), entry.mood.clone()))
                .or_default();
            group.0 += 1;
            if let Some(score) = entry.mood_score {
                group.1 += i64::from(score);
                group.2 += 1;
            }
        }
        Ok(groups
            .into_iter()
            .map(|((date, mood), (count, sum, scored))| MoodTrend {
                date,
                mood,
                count,
                avg_score: (scored > 0).then(|| sum as f64 / scored as f64),
            })
            .collect())
    }

    async fn create_assessment(&self, owner: UserId, score: i32) -> PortResult<AssessmentResult> {
        let mut tables = self.tables.write().await;
        let result = AssessmentResult {
            id: tables.next_id(),
            user_id: owner,
            score,
            created_at: Utc::now(),
        };
        tables.assessments.push(result.clone());
        Ok(result)
    }

    async fn list_assessments(&self, owner: UserId) -> PortResult<Vec<AssessmentResult>> {
        let tables = self.tables.read().await;
        let mut results: Vec<AssessmentResult> = tables
            .assessments
            .iter()
            .filter(|a| a.user_id == owner)
            .cloned()
            .collect();
        results.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(results)
    }

    async fn latest_assessment(&self, owner: UserId) -> PortResult<AssessmentResult> {
        self.list_assessments(owner)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| PortError::NotFound("No assessment found".to_string()))
    }

    async fn save_chat_message(
        &self,
        owner: Option<UserId>,
        message: &str,
        response: &str,
    ) -> PortResult<ChatMessage> {
        let mut tables = self.tables.write().await;
        let chat = ChatMessage {
            id: tables.next_id(),
            user_id: owner,
            message: message.to_string(),
            response: response.to_string(),
            timestamp: Utc::now(),
        };
        tables.chats.push(chat.clone());
        Ok(chat)
    }

    async fn chat_history(&self, owner: UserId, limit: i64) -> PortResult<Vec<ChatMessage>> {
        let tables = self.tables.read().await;
        let mut history: Vec<ChatMessage> = tables
            .chats
            .iter()
            .filter(|c| c.user_id == Some(owner))
            .cloned()
            .collect();
        history.sort_by(|a, b| (b.timestamp, b.id).cmp(&(a.timestamp, a.id)));
        history.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(history)
    }
}
