//! Session and store-level domain models.
//!
//! A session is a named, independent todo list. The store keeps sessions in a
//! map ordered by id, and the same shape is what lands on disk when file
//! persistence is enabled:
//!
//! ```json
//! {
//!   "sessions": { "<id>": { "todos": [..], "last_updated": 1700000000.25 } },
//!   "last_saved": 1700000000.5
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::todo::{Todo, TodoPriority, TodoStatus};

/// Seconds since the Unix epoch, with sub-second precision.
pub type EpochSeconds = f64;

/// Current wall-clock time as epoch seconds (microsecond resolution).
pub fn now_epoch_seconds() -> EpochSeconds {
    to_epoch_seconds(Utc::now())
}

#[allow(clippy::cast_precision_loss)]
pub fn to_epoch_seconds(at: DateTime<Utc>) -> EpochSeconds {
    at.timestamp_micros() as f64 / 1_000_000.0
}

#[allow(clippy::cast_possible_truncation)]
pub fn from_epoch_seconds(secs: EpochSeconds) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_micros((secs * 1_000_000.0).round() as i64)
}

/// A session's stored state: its ordered todos and when they last changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSession {
    #[serde(default)]
    pub todos: Vec<Todo>,
    pub last_updated: EpochSeconds,
}

/// A session together with its id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub session_id: String,
    pub todos: Vec<Todo>,
    pub last_updated: EpochSeconds,
}

impl Session {
    pub fn from_stored(session_id: impl Into<String>, stored: StoredSession) -> Self {
        Self {
            session_id: session_id.into(),
            todos: stored.todos,
            last_updated: stored.last_updated,
        }
    }

    /// Whether any todo is pending or in progress.
    pub fn has_open_work(&self) -> bool {
        self.todos.iter().any(|t| t.status.is_open())
    }
}

/// Whole-store snapshot; this is the persistence file format.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreDocument {
    #[serde(default)]
    pub sessions: BTreeMap<String, StoredSession>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_saved: Option<EpochSeconds>,
}

/// Per-status and per-priority counts for a list of todos.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TodoStats {
    pub total: usize,
    /// Only statuses that occur at least once appear here.
    pub status_counts: BTreeMap<TodoStatus, usize>,
    pub priority_counts: BTreeMap<TodoPriority, usize>,
    /// Fraction of todos completed, in `[0, 1]`.
    pub completion_rate: f64,
}

impl TodoStats {
    pub fn count_status(&self, status: TodoStatus) -> usize {
        self.status_counts.get(&status).copied().unwrap_or(0)
    }

    pub fn count_priority(&self, priority: TodoPriority) -> usize {
        self.priority_counts.get(&priority).copied().unwrap_or(0)
    }
}

/// One row of the session listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub todo_count: usize,
    pub completion_rate: f64,
    pub last_updated: EpochSeconds,
    pub status_counts: BTreeMap<TodoStatus, usize>,
}

/// Aggregate statistics over the whole store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageStats {
    pub total_sessions: usize,
    pub total_todos: usize,
    pub status_breakdown: BTreeMap<TodoStatus, usize>,
    pub priority_breakdown: BTreeMap<TodoPriority, usize>,
    pub has_file_persistence: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_file: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch_seconds_round_trip() {
        let at = DateTime::from_timestamp_micros(1_700_000_000_250_000).unwrap();
        let secs = to_epoch_seconds(at);
        assert!((secs - 1_700_000_000.25).abs() < 1e-6);
        assert_eq!(from_epoch_seconds(secs), Some(at));
    }

    #[test]
    fn test_document_tolerates_missing_last_saved() {
        let doc: StoreDocument = serde_json::from_str(
            r#"{"sessions": {"s1": {"todos": [], "last_updated": 10.0}}}"#,
        )
        .unwrap();
        assert_eq!(doc.last_saved, None);
        assert_eq!(doc.sessions["s1"].last_updated, 10.0);
    }

    #[test]
    fn test_open_work_detection() {
        let mut session = Session {
            session_id: "s".to_string(),
            todos: vec![Todo::new("a", "A").with_status(TodoStatus::Completed)],
            last_updated: 1.0,
        };
        assert!(!session.has_open_work());
        session.todos.push(Todo::new("b", "B").with_status(TodoStatus::InProgress));
        assert!(session.has_open_work());
    }
}
