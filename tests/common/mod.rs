//! Common test utilities for integration tests

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

use todo_mcp::domain::models::{StoreDocument, StoredSession};
use todo_mcp::{InMemoryTodoRepository, Todo, TodoService};

/// Create a temporary directory for test isolation
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// A store path inside a fresh temp directory.
///
/// Keep the `TempDir` alive for as long as the path is used.
pub fn temp_store_path() -> (TempDir, PathBuf) {
    let dir = temp_dir();
    let path = dir.path().join("todos.json");
    (dir, path)
}

/// Service over an empty in-memory store.
pub fn memory_service() -> TodoService<InMemoryTodoRepository> {
    TodoService::new(Arc::new(InMemoryTodoRepository::new()))
}

/// Service over an in-memory store seeded with fixed sessions.
pub fn seeded_service(
    sessions: Vec<(&str, f64, Vec<Todo>)>,
) -> TodoService<InMemoryTodoRepository> {
    let sessions: BTreeMap<String, StoredSession> = sessions
        .into_iter()
        .map(|(id, last_updated, todos)| (id.to_string(), StoredSession { todos, last_updated }))
        .collect();
    let document = StoreDocument {
        sessions,
        last_saved: None,
    };
    TodoService::new(Arc::new(InMemoryTodoRepository::from_document(document)))
}

/// Setup test logging
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
