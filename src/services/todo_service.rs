//! Todo operations over a [`TodoRepository`].
//!
//! Every operation validates its input before touching the repository, so a
//! returned error (other than `Persistence`) means nothing changed.

use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::domain::errors::{TodoError, TodoResult};
use crate::domain::models::{
    EpochSeconds, SessionSummary, StorageStats, Todo, TodoDraft, TodoPriority, TodoStats,
    TodoStatus,
};
use crate::domain::ports::TodoRepository;
use crate::domain::validation::{
    filter_todos, get_todo_stats, next_todo_id, normalize_todos_list, parse_priority,
    parse_status, validate_session_id, validate_todo_item, validate_todos_list,
};

/// How many pending todos `find_active_work` previews.
const NEXT_PENDING_PREVIEW: usize = 3;

/// Filters and options for [`TodoService::read`].
#[derive(Debug, Clone, Default)]
pub struct ReadOptions {
    pub status_filter: Option<String>,
    pub priority_filter: Option<String>,
    pub include_stats: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadResult {
    pub session_id: String,
    pub todos: Vec<Todo>,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<TodoStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<EpochSeconds>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WriteSummary {
    pub session_id: String,
    pub todo_count: usize,
    pub stats: TodoStats,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusChange {
    pub session_id: String,
    pub todo_id: String,
    pub old_status: TodoStatus,
    pub new_status: TodoStatus,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddResult {
    pub session_id: String,
    pub todo_id: String,
    pub total_todos: usize,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteResult {
    pub session_id: String,
    pub deleted: bool,
    pub deleted_todo_count: usize,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionsOverview {
    pub total_sessions: usize,
    pub sessions: Vec<SessionSummary>,
    pub storage: StorageStats,
}

/// Outcome of [`TodoService::find_active_work`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ActiveWork {
    Found {
        session_id: String,
        total_todos: usize,
        pending_count: usize,
        in_progress_count: usize,
        completed_count: usize,
        next_pending: Vec<Todo>,
        current_in_progress: Vec<Todo>,
        last_updated: EpochSeconds,
    },
    NoActiveWork {
        message: String,
    },
}

/// Session-scoped todo operations.
pub struct TodoService<R: TodoRepository> {
    repo: Arc<R>,
}

impl<R: TodoRepository> Clone for TodoService<R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
        }
    }
}

impl<R: TodoRepository> TodoService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repo
    }

    /// Todos of a session, optionally filtered, with optional stats.
    ///
    /// An unknown session is not an error; it reads as an empty list.
    #[instrument(skip_all, fields(session_id = %session_id))]
    pub async fn read(&self, session_id: &str, options: ReadOptions) -> TodoResult<ReadResult> {
        validate_session_id(session_id)?;
        let status = options.status_filter.as_deref().map(parse_status).transpose()?;
        let priority = options
            .priority_filter
            .as_deref()
            .map(parse_priority)
            .transpose()?;

        let session = self.repo.get_session(session_id).await;
        let last_updated = session.as_ref().map(|s| s.last_updated);
        let todos = session.map(|s| s.todos).unwrap_or_default();
        let todos = filter_todos(&todos, status, priority);

        debug!(count = todos.len(), "read todos");
        Ok(ReadResult {
            session_id: session_id.to_string(),
            count: todos.len(),
            stats: options.include_stats.then(|| get_todo_stats(&todos)),
            todos,
            last_updated,
        })
    }

    /// Replace a session's todos wholesale.
    ///
    /// Missing ids, priorities and statuses are filled in before validation.
    /// An empty list clears the session but keeps it.
    #[instrument(skip_all, fields(session_id = %session_id, count = drafts.len()))]
    pub async fn write(&self, session_id: &str, drafts: &[TodoDraft]) -> TodoResult<WriteSummary> {
        validate_session_id(session_id)?;
        let normalized = normalize_todos_list(drafts);
        let todos = validate_todos_list(&normalized)?;
        let stats = get_todo_stats(&todos);
        let todo_count = todos.len();

        self.repo.set_todos(session_id, todos).await?;
        info!(todo_count, "stored todos");

        let message = if todo_count == 0 {
            format!("Successfully cleared todos for session {session_id} (stored empty list).")
        } else {
            format!(
                "Successfully stored {todo_count} todos for session {session_id}.\n{}",
                summarize_counts(&stats)
            )
        };

        Ok(WriteSummary {
            session_id: session_id.to_string(),
            todo_count,
            stats,
            message,
        })
    }

    /// Change one todo's status in place.
    #[instrument(skip_all, fields(session_id = %session_id))]
    pub async fn update_status(
        &self,
        session_id: &str,
        todo_id: &str,
        new_status: &str,
    ) -> TodoResult<StatusChange> {
        validate_session_id(session_id)?;
        let new_status = parse_status(new_status)?;

        let old_status = self
            .repo
            .modify_todos(session_id, |todos| {
                let todo = todos
                    .iter_mut()
                    .find(|t| t.id == todo_id)
                    .ok_or_else(|| TodoError::NotFound {
                        session_id: session_id.to_string(),
                        todo_id: todo_id.to_string(),
                    })?;
                let old = todo.status;
                todo.status = new_status;
                Ok(old)
            })
            .await
            .inspect_err(|e| warn!(error = %e, "status update rejected"))?;

        info!(%old_status, %new_status, "updated todo status");
        Ok(StatusChange {
            session_id: session_id.to_string(),
            todo_id: todo_id.to_string(),
            old_status,
            new_status,
            message: format!(
                "Updated todo '{todo_id}' status from '{old_status}' to '{new_status}'"
            ),
        })
    }

    /// Append one todo, generating a `todo-N` id when none is given.
    ///
    /// `draft.content` is required; priority defaults to `medium` and status
    /// to `pending`. A blank id counts as absent.
    #[instrument(skip_all, fields(session_id = %session_id))]
    pub async fn add_item(&self, session_id: &str, draft: TodoDraft) -> TodoResult<AddResult> {
        validate_session_id(session_id)?;
        let requested_id = draft
            .id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string);

        let (todo_id, total_todos) = self
            .repo
            .modify_todos(session_id, |todos| {
                let id = requested_id.unwrap_or_else(|| next_todo_id(todos));
                let candidate = TodoDraft {
                    id: Some(id.clone()),
                    content: draft.content,
                    status: Some(
                        draft
                            .status
                            .unwrap_or_else(|| TodoStatus::Pending.as_str().to_string()),
                    ),
                    priority: Some(
                        draft
                            .priority
                            .unwrap_or_else(|| TodoPriority::Medium.as_str().to_string()),
                    ),
                };
                let todo = validate_todo_item(&candidate)?;
                if todos.iter().any(|t| t.id == todo.id) {
                    return Err(TodoError::DuplicateId(todo.id));
                }
                todos.push(todo);
                Ok((id, todos.len()))
            })
            .await?;

        info!(%todo_id, total_todos, "added todo");
        Ok(AddResult {
            message: format!("Added todo '{todo_id}' to session {session_id}"),
            session_id: session_id.to_string(),
            todo_id,
            total_todos,
        })
    }

    /// Remove a session and everything in it.
    #[instrument(skip_all, fields(session_id = %session_id))]
    pub async fn delete_session(&self, session_id: &str) -> TodoResult<DeleteResult> {
        validate_session_id(session_id)?;
        let removed = self.repo.delete_session(session_id).await?;
        let deleted = removed.is_some();

        let (deleted_todo_count, message) = if let Some(todos) = removed {
            let deleted_todo_count = todos.len();
            info!(deleted_todo_count, "deleted session");
            (
                deleted_todo_count,
                format!("Deleted session {session_id} and {deleted_todo_count} todos"),
            )
        } else {
            (0, format!("Session {session_id} not found"))
        };

        Ok(DeleteResult {
            session_id: session_id.to_string(),
            deleted,
            deleted_todo_count,
            message,
        })
    }

    /// Summaries of every session plus store-wide counts.
    pub async fn list_sessions(&self) -> SessionsOverview {
        let sessions = self.repo.list_sessions().await;
        SessionsOverview {
            total_sessions: sessions.len(),
            sessions,
            storage: self.repo.storage_stats().await,
        }
    }

    /// The most recently updated session that still has open todos.
    pub async fn find_active_work(&self) -> ActiveWork {
        let Some(session) = self.repo.find_latest_active_session().await else {
            return ActiveWork::NoActiveWork {
                message: "No active sessions with unfinished work found".to_string(),
            };
        };

        let pending = filter_todos(&session.todos, Some(TodoStatus::Pending), None);
        let in_progress = filter_todos(&session.todos, Some(TodoStatus::InProgress), None);

        ActiveWork::Found {
            total_todos: session.todos.len(),
            pending_count: pending.len(),
            in_progress_count: in_progress.len(),
            completed_count: session
                .todos
                .iter()
                .filter(|t| t.status == TodoStatus::Completed)
                .count(),
            next_pending: pending.into_iter().take(NEXT_PENDING_PREVIEW).collect(),
            current_in_progress: in_progress,
            last_updated: session.last_updated,
            session_id: session.session_id,
        }
    }
}

/// `Status: 2 pending, 1 completed; Priority: 3 high`
fn summarize_counts(stats: &TodoStats) -> String {
    let statuses = stats
        .status_counts
        .iter()
        .map(|(status, n)| format!("{n} {status}"))
        .collect::<Vec<_>>()
        .join(", ");
    let priorities = stats
        .priority_counts
        .iter()
        .map(|(priority, n)| format!("{n} {priority}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!("Status: {statuses}; Priority: {priorities}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemoryTodoRepository;
    use crate::domain::errors::ErrorKind;

    fn service() -> TodoService<InMemoryTodoRepository> {
        TodoService::new(Arc::new(InMemoryTodoRepository::new()))
    }

    #[tokio::test]
    async fn test_write_message_lists_counts() {
        let svc = service();
        let drafts = vec![
            TodoDraft::new("A").with_priority("high"),
            TodoDraft::new("B").with_status("completed"),
        ];
        let summary = svc.write("s1", &drafts).await.unwrap();
        assert_eq!(summary.todo_count, 2);
        assert!(summary.message.contains("Successfully stored 2 todos for session s1"));
        assert!(summary.message.contains("1 pending, 1 completed"));
        assert!(summary.message.contains("1 high, 1 medium"));
    }

    #[tokio::test]
    async fn test_write_empty_list_clears() {
        let svc = service();
        svc.write("s1", &[TodoDraft::new("A")]).await.unwrap();
        let summary = svc.write("s1", &[]).await.unwrap();
        assert!(summary.message.contains("cleared"));
        assert_eq!(svc.list_sessions().await.total_sessions, 1);
    }

    #[tokio::test]
    async fn test_read_rejects_bad_filter() {
        let svc = service();
        let err = svc
            .read(
                "s1",
                ReadOptions {
                    status_filter: Some("finished".to_string()),
                    ..ReadOptions::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[tokio::test]
    async fn test_update_status_validates_status_before_lookup() {
        let svc = service();
        let err = svc.update_status("s1", "missing", "done").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[tokio::test]
    async fn test_add_item_rejects_blank_content() {
        let svc = service();
        let err = svc.add_item("s1", TodoDraft::new("  ")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(svc.list_sessions().await.sessions.is_empty());
    }

    #[tokio::test]
    async fn test_add_item_blank_id_is_generated() {
        let svc = service();
        let added = svc
            .add_item("s1", TodoDraft::new("A").with_id(""))
            .await
            .unwrap();
        assert_eq!(added.todo_id, "todo-1");
    }

    #[tokio::test]
    async fn test_delete_unknown_session_reports_false() {
        let svc = service();
        let result = svc.delete_session("ghost").await.unwrap();
        assert!(!result.deleted);
        assert_eq!(result.deleted_todo_count, 0);
        assert_eq!(result.message, "Session ghost not found");
    }

    #[tokio::test]
    async fn test_find_active_work_previews_three_pending() {
        let svc = service();
        let drafts: Vec<_> = (0..5).map(|i| TodoDraft::new(format!("t{i}"))).collect();
        svc.write("s1", &drafts).await.unwrap();
        svc.update_status("s1", "todo-5", "in_progress").await.unwrap();

        match svc.find_active_work().await {
            ActiveWork::Found {
                session_id,
                pending_count,
                in_progress_count,
                next_pending,
                current_in_progress,
                ..
            } => {
                assert_eq!(session_id, "s1");
                assert_eq!(pending_count, 4);
                assert_eq!(in_progress_count, 1);
                assert_eq!(next_pending.len(), 3);
                assert_eq!(next_pending[0].id, "todo-1");
                assert_eq!(current_in_progress[0].id, "todo-5");
            }
            ActiveWork::NoActiveWork { .. } => panic!("expected active work"),
        }
    }

    #[tokio::test]
    async fn test_find_active_work_none() {
        let svc = service();
        assert!(matches!(
            svc.find_active_work().await,
            ActiveWork::NoActiveWork { .. }
        ));
    }
}
