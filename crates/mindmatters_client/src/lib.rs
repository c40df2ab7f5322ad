//! crates/mindmatters_client/src/lib.rs
//!
//! Client side of the MindMatters API: a persisted session cache and a typed
//! HTTP client that keeps it honest.

pub mod cache;
pub mod client;
pub mod error;
pub mod store;
pub mod types;

pub use cache::{Session, SessionCache};
pub use client::ApiClient;
pub use error::{ClientError, ClientResult};
pub use store::{FileSessionStore, MemorySessionStore, SessionStore};
