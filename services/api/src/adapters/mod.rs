pub mod chat;
pub mod db;
pub mod memory;

pub use chat::{FallbackChat, OpenAiChatAdapter};
pub use db::DbAdapter;
pub use memory::MemoryDatabase;
