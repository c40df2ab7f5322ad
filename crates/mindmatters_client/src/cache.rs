//! crates/mindmatters_client/src/cache.rs
//!
//! The client's view of who is signed in. The durable store is the source of
//! truth; the watch channel mirrors it for anything that renders state.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::{
    error::ClientResult,
    store::{SessionStore, TOKEN_KEY, USER_KEY},
    types::UserProfile,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: UserProfile,
}

pub struct SessionCache {
    store: Arc<dyn SessionStore>,
    state: watch::Sender<Option<Session>>,
}

impl SessionCache {
    /// Opens the cache over `store` and hydrates the in-memory state from it.
    pub fn open(store: Arc<dyn SessionStore>) -> ClientResult<Self> {
        let cache = Self {
            store,
            state: watch::Sender::new(None),
        };
        cache.hydrate()?;
        Ok(cache)
    }

    /// Reloads the in-memory state from durable storage. A session is only
    /// restored when both the token and a readable profile are present.
    pub fn hydrate(&self) -> ClientResult<Option<Session>> {
        let token = self.store.get(TOKEN_KEY)?.filter(|t| !t.is_empty());
        let user = match self.store.get(USER_KEY)? {
            Some(raw) => match serde_json::from_str::<UserProfile>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    warn!("Ignoring unreadable cached profile: {}", e);
                    None
                }
            },
            None => None,
        };

        let session = match (token, user) {
            (Some(token), Some(user)) => Some(Session { token, user }),
            _ => None,
        };
        debug!("Session hydrated (authenticated: {})", session.is_some());
        self.state.send_replace(session.clone());
        Ok(session)
    }

    /// Persists the session, then publishes it.
    pub fn login(&self, token: &str, user: UserProfile) -> ClientResult<()> {
        self.store.set(TOKEN_KEY, token)?;
        self.store.set(USER_KEY, &serde_json::to_string(&user)?)?;
        self.state.send_replace(Some(Session {
            token: token.to_string(),
            user,
        }));
        Ok(())
    }

    /// Clears both copies. The in-memory state is cleared even when the
    /// store cannot be written.
    pub fn logout(&self) -> ClientResult<()> {
        self.state.send_replace(None);
        self.store.remove(TOKEN_KEY)?;
        self.store.remove(USER_KEY)?;
        Ok(())
    }

    /// Headers for an outgoing request, built from the durable token so they
    /// are right even before hydration.
    pub fn auth_headers(&self) -> ClientResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = self.store.get(TOKEN_KEY)?.filter(|t| !t.is_empty()) {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))?;
            headers.insert(AUTHORIZATION, value);
        }
        Ok(headers)
    }

    pub fn current(&self) -> Option<Session> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.state.subscribe()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_some()
    }
}
