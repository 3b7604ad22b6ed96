pub mod config;
pub mod session;
pub mod todo;

pub use config::{Config, CorruptFilePolicy, LoggingConfig, ServerConfig, StorageConfig};
pub use session::{
    now_epoch_seconds, EpochSeconds, Session, SessionSummary, StorageStats, StoreDocument,
    StoredSession, TodoStats,
};
pub use todo::{Todo, TodoDraft, TodoPriority, TodoStatus};
