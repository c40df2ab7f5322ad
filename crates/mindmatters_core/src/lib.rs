pub mod domain;
pub mod ports;

pub use domain::{
    AssessmentResult, ChatMessage, JournalEntry, JournalInput, MoodTrend, Tags, User,
    UserCredentials, UserId,
};
pub use ports::{ChatResponder, DatabaseService, PortError, PortResult};
