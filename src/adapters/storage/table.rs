//! Lock-free session map shared by the storage adapters.
//!
//! Adapters wrap a [`SessionTable`] in their own lock; everything here assumes
//! the caller already holds it.

use std::collections::BTreeMap;

use crate::domain::models::{
    now_epoch_seconds, EpochSeconds, Session, SessionSummary, StorageStats, StoreDocument,
    StoredSession, Todo,
};
use crate::domain::validation::completion_rate;

#[derive(Debug, Default)]
pub struct SessionTable {
    sessions: BTreeMap<String, StoredSession>,
}

impl SessionTable {
    pub fn from_document(document: StoreDocument) -> Self {
        Self {
            sessions: document.sessions,
        }
    }

    pub fn to_document(&self, last_saved: Option<EpochSeconds>) -> StoreDocument {
        StoreDocument {
            sessions: self.sessions.clone(),
            last_saved,
        }
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn todos(&self, session_id: &str) -> Vec<Todo> {
        self.sessions
            .get(session_id)
            .map(|s| s.todos.clone())
            .unwrap_or_default()
    }

    pub fn session(&self, session_id: &str) -> Option<Session> {
        self.sessions
            .get(session_id)
            .map(|s| Session::from_stored(session_id, s.clone()))
    }

    /// Store a session's todos and stamp it with the current time.
    pub fn put(&mut self, session_id: &str, todos: Vec<Todo>) {
        self.sessions.insert(
            session_id.to_string(),
            StoredSession {
                todos,
                last_updated: now_epoch_seconds(),
            },
        );
    }

    pub fn remove(&mut self, session_id: &str) -> Option<Vec<Todo>> {
        self.sessions.remove(session_id).map(|stored| stored.todos)
    }

    pub fn summaries(&self) -> Vec<SessionSummary> {
        self.sessions
            .iter()
            .map(|(id, stored)| {
                let mut status_counts = BTreeMap::new();
                for todo in &stored.todos {
                    *status_counts.entry(todo.status).or_insert(0) += 1;
                }
                SessionSummary {
                    session_id: id.clone(),
                    todo_count: stored.todos.len(),
                    completion_rate: completion_rate(&stored.todos),
                    last_updated: stored.last_updated,
                    status_counts,
                }
            })
            .collect()
    }

    /// Newest session with open work. Iteration is in id order and only a
    /// strictly newer timestamp replaces the current pick, so ties go to the
    /// smallest id.
    pub fn latest_active(&self) -> Option<Session> {
        let mut latest: Option<(&String, &StoredSession)> = None;
        for (id, stored) in &self.sessions {
            if !stored.todos.iter().any(|t| t.status.is_open()) {
                continue;
            }
            match latest {
                Some((_, best)) if stored.last_updated <= best.last_updated => {}
                _ => latest = Some((id, stored)),
            }
        }
        latest.map(|(id, stored)| Session::from_stored(id.as_str(), stored.clone()))
    }

    pub fn stats(&self, storage_file: Option<String>) -> StorageStats {
        let mut status_breakdown = BTreeMap::new();
        let mut priority_breakdown = BTreeMap::new();
        let mut total_todos = 0;
        for stored in self.sessions.values() {
            total_todos += stored.todos.len();
            for todo in &stored.todos {
                *status_breakdown.entry(todo.status).or_insert(0) += 1;
                *priority_breakdown.entry(todo.priority).or_insert(0) += 1;
            }
        }

        StorageStats {
            total_sessions: self.sessions.len(),
            total_todos,
            status_breakdown,
            priority_breakdown,
            has_file_persistence: storage_file.is_some(),
            storage_file,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::TodoStatus;

    fn stored(todos: Vec<Todo>, last_updated: f64) -> StoredSession {
        StoredSession {
            todos,
            last_updated,
        }
    }

    fn table(entries: Vec<(&str, StoredSession)>) -> SessionTable {
        let mut document = StoreDocument::default();
        for (id, session) in entries {
            document.sessions.insert(id.to_string(), session);
        }
        SessionTable::from_document(document)
    }

    #[test]
    fn test_latest_active_skips_finished_sessions() {
        let done = Todo::new("1", "a").with_status(TodoStatus::Completed);
        let open = Todo::new("1", "b");
        let table = table(vec![
            ("a", stored(vec![done], 100.0)),
            ("b", stored(vec![open], 50.0)),
        ]);

        assert_eq!(table.latest_active().unwrap().session_id, "b");
    }

    #[test]
    fn test_latest_active_tie_breaks_on_smallest_id() {
        let open = Todo::new("1", "x").with_status(TodoStatus::InProgress);
        let table = table(vec![
            ("zeta", stored(vec![open.clone()], 10.0)),
            ("alpha", stored(vec![open.clone()], 10.0)),
            ("mid", stored(vec![open], 5.0)),
        ]);

        assert_eq!(table.latest_active().unwrap().session_id, "alpha");
    }

    #[test]
    fn test_latest_active_none_when_all_closed() {
        let cancelled = Todo::new("1", "x").with_status(TodoStatus::Cancelled);
        let table = table(vec![("a", stored(vec![cancelled], 1.0)), ("b", stored(vec![], 2.0))]);
        assert!(table.latest_active().is_none());
    }

    #[test]
    fn test_summaries_in_id_order() {
        let table = table(vec![("b", stored(vec![], 2.0)), ("a", stored(vec![], 1.0))]);
        let ids: Vec<_> = table.summaries().into_iter().map(|s| s.session_id).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_put_refreshes_timestamp() {
        let mut table = table(vec![("a", stored(vec![], 1.0))]);
        table.put("a", vec![Todo::new("1", "x")]);
        let session = table.session("a").unwrap();
        assert!(session.last_updated > 1.0);
        assert_eq!(session.todos.len(), 1);
    }
}
