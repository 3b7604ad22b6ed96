//! todo-mcp - session-scoped todo lists for AI agents
//!
//! Keeps named todo lists keyed by a session id and exposes them to MCP
//! clients as tools (read, write, update status, add, delete, list, find
//! active work). State lives in memory and is optionally mirrored to a JSON
//! file.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): models, errors, validation and the repository port
//! - **Adapters** (`adapters`): storage backends and the MCP stdio server
//! - **Service Layer** (`services`): todo operations and text rendering
//! - **Infrastructure Layer** (`infrastructure`): configuration and logging
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use todo_mcp::{InMemoryTodoRepository, TodoDraft, TodoService};
//!
//! # async fn demo() -> todo_mcp::TodoResult<()> {
//! let service = TodoService::new(Arc::new(InMemoryTodoRepository::new()));
//! service.write("s1", &[TodoDraft::new("A")]).await?;
//! let added = service.add_item("s1", TodoDraft::new("B")).await?;
//! assert_eq!(added.todo_id, "todo-2");
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use adapters::mcp::StdioServer;
pub use adapters::storage::{InMemoryTodoRepository, JsonFileTodoRepository};
pub use domain::models::{
    Config, CorruptFilePolicy, Session, SessionSummary, Todo, TodoDraft, TodoPriority, TodoStatus,
};
pub use domain::ports::TodoRepository;
pub use domain::{ErrorKind, TodoError, TodoResult};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{ActiveWork, ReadOptions, TodoService};
