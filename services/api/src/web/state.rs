//! services/api/src/web/state.rs
//!
//! Defines the application's shared state and the identity attached to
//! authenticated requests.

use crate::{adapters::chat::FallbackChat, security::TokenService};
use mindmatters_core::{domain::UserId, ports::DatabaseService};
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
///
/// Nothing in here is mutable: the token service holds the process-wide
/// signing secret, the store holds the connection pool.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn DatabaseService>,
    pub tokens: Arc<TokenService>,
    pub chat: Arc<FallbackChat>,
}

impl AppState {
    pub fn new(db: Arc<dyn DatabaseService>, tokens: TokenService, chat: FallbackChat) -> Self {
        Self {
            db,
            tokens: Arc::new(tokens),
            chat: Arc::new(chat),
        }
    }
}

//=========================================================================================
// AuthUser (Specific to One Request)
//=========================================================================================

/// The verified caller, inserted into request extensions by `require_auth`.
/// Handlers trust it without re-verifying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub id: UserId,
}
