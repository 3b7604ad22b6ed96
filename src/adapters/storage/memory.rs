//! In-memory todo repository.

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::table::SessionTable;
use crate::domain::errors::TodoResult;
use crate::domain::models::{Session, SessionSummary, StorageStats, StoreDocument, Todo};
use crate::domain::ports::TodoRepository;

/// Todo repository that lives only as long as the process.
#[derive(Debug, Default)]
pub struct InMemoryTodoRepository {
    table: RwLock<SessionTable>,
}

impl InMemoryTodoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the repository from a snapshot, keeping its timestamps.
    pub fn from_document(document: StoreDocument) -> Self {
        Self {
            table: RwLock::new(SessionTable::from_document(document)),
        }
    }
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn get_todos(&self, session_id: &str) -> Vec<Todo> {
        self.table.read().await.todos(session_id)
    }

    async fn get_session(&self, session_id: &str) -> Option<Session> {
        self.table.read().await.session(session_id)
    }

    async fn set_todos(&self, session_id: &str, todos: Vec<Todo>) -> TodoResult<()> {
        debug!(session_id, count = todos.len(), "replacing session todos");
        self.table.write().await.put(session_id, todos);
        Ok(())
    }

    async fn modify_todos<F, T>(&self, session_id: &str, f: F) -> TodoResult<T>
    where
        F: FnOnce(&mut Vec<Todo>) -> TodoResult<T> + Send,
        T: Send,
    {
        let mut table = self.table.write().await;
        let mut todos = table.todos(session_id);
        let outcome = f(&mut todos)?;
        table.put(session_id, todos);
        Ok(outcome)
    }

    async fn delete_session(&self, session_id: &str) -> TodoResult<Option<Vec<Todo>>> {
        Ok(self.table.write().await.remove(session_id))
    }

    async fn list_sessions(&self) -> Vec<SessionSummary> {
        self.table.read().await.summaries()
    }

    async fn find_latest_active_session(&self) -> Option<Session> {
        self.table.read().await.latest_active()
    }

    async fn snapshot(&self) -> StoreDocument {
        self.table.read().await.to_document(None)
    }

    async fn storage_stats(&self) -> StorageStats {
        self.table.read().await.stats(None)
    }
}
