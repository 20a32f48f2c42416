//! Data models for the harvester core

pub mod session;
pub mod staging;
pub mod word;

pub use session::{
    SessionOverview, SessionRecord, SessionResult, SessionStatistics, SessionStatus,
    SessionStatusReport,
};
pub use staging::{SessionSummary, StagedCandidate};
pub use word::{Difficulty, Regularity, Tag, VocabularyEntry, WordQuery};
