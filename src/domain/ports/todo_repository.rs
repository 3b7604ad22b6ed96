/// Todo repository port (trait) for dependency injection.
///
/// Defines the contract for session storage that infrastructure adapters must
/// implement. `TodoService` depends on this trait, not on a concrete store.
use async_trait::async_trait;

use crate::domain::errors::TodoResult;
use crate::domain::models::{Session, SessionSummary, StorageStats, StoreDocument, Todo};

/// Repository trait for session-scoped todo lists
///
/// Implementations must:
/// - serialize access to the session map (one writer or many readers)
/// - refresh a session's `last_updated` on every committed mutation
/// - leave the store untouched when a mutation is rejected
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// Todos of a session, in insertion order; empty if the session is unknown.
    async fn get_todos(&self, session_id: &str) -> Vec<Todo>;

    /// Full session record, if the session exists.
    async fn get_session(&self, session_id: &str) -> Option<Session>;

    /// Replaces a session's whole todo list, creating the session if needed.
    ///
    /// # Errors
    /// Returns `Persistence` if the store is file-backed and the write fails.
    /// The in-memory state is updated regardless.
    async fn set_todos(&self, session_id: &str, todos: Vec<Todo>) -> TodoResult<()>;

    /// Read-modify-write of a session's todo list under the store lock.
    ///
    /// `f` works on a copy of the current list (empty for an unknown session).
    /// On `Ok` the copy is committed as by [`TodoRepository::set_todos`]; on
    /// `Err` nothing changes and no session is created.
    async fn modify_todos<F, T>(&self, session_id: &str, f: F) -> TodoResult<T>
    where
        F: FnOnce(&mut Vec<Todo>) -> TodoResult<T> + Send,
        T: Send;

    /// Removes a session and returns the todos it held, or `None` if it did
    /// not exist.
    async fn delete_session(&self, session_id: &str) -> TodoResult<Option<Vec<Todo>>>;

    /// One summary per session, ordered by session id.
    async fn list_sessions(&self) -> Vec<SessionSummary>;

    /// Most recently updated session that still has pending or in-progress
    /// todos. Equal timestamps resolve to the lexicographically smallest id.
    async fn find_latest_active_session(&self) -> Option<Session>;

    /// Copy of the entire store in its persisted shape.
    async fn snapshot(&self) -> StoreDocument;

    /// Aggregate counts across all sessions.
    async fn storage_stats(&self) -> StorageStats;
}
