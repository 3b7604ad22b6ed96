//! JSON-file-backed todo repository.
//!
//! The whole store is rewritten on every committed mutation: serialized to a
//! sibling `.tmp` file, synced, then renamed over the target so a crash never
//! leaves a half-written document behind. Writes happen while the store lock
//! is held, so the file always reflects the latest commit.

use async_trait::async_trait;
use std::collections::HashSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use super::table::SessionTable;
use crate::domain::errors::{TodoError, TodoResult};
use crate::domain::models::{
    now_epoch_seconds, CorruptFilePolicy, Session, SessionSummary, StorageStats, StoreDocument,
    Todo,
};
use crate::domain::ports::TodoRepository;
use crate::domain::validation::validate_session_id;

/// Todo repository persisted to a single JSON document.
#[derive(Debug)]
pub struct JsonFileTodoRepository {
    path: PathBuf,
    table: RwLock<SessionTable>,
}

impl JsonFileTodoRepository {
    /// Open the store at `path`, loading it if the file exists.
    ///
    /// A missing file yields an empty store. A file that cannot be read or
    /// parsed is handled according to `policy`: `Abort` returns
    /// [`TodoError::StorageCorrupt`] and leaves the file alone, `Quarantine`
    /// renames it aside and starts empty.
    pub async fn open(path: impl Into<PathBuf>, policy: CorruptFilePolicy) -> TodoResult<Self> {
        let path = path.into();
        let document = match load_document(&path).await {
            Ok(Some(document)) => {
                info!(
                    path = %path.display(),
                    sessions = document.sessions.len(),
                    "loaded todo store"
                );
                document
            }
            Ok(None) => {
                info!(path = %path.display(), "no todo store on disk, starting empty");
                StoreDocument::default()
            }
            Err(err) => match policy {
                CorruptFilePolicy::Abort => {
                    error!(
                        path = %path.display(),
                        error = %err,
                        "refusing to open corrupt todo store"
                    );
                    return Err(err);
                }
                CorruptFilePolicy::Quarantine => {
                    let moved_to = quarantine(&path).await?;
                    warn!(
                        path = %path.display(),
                        quarantined = %moved_to.display(),
                        error = %err,
                        "corrupt todo store moved aside, starting empty"
                    );
                    StoreDocument::default()
                }
            },
        };

        Ok(Self {
            path,
            table: RwLock::new(SessionTable::from_document(document)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, table: &SessionTable) -> TodoResult<()> {
        let document = table.to_document(Some(now_epoch_seconds()));
        write_document(&self.path, &document).await.map_err(|e| {
            error!(path = %self.path.display(), error = %e, "failed to persist todo store");
            e
        })?;
        debug!(
            path = %self.path.display(),
            sessions = table.session_count(),
            "todo store saved"
        );
        Ok(())
    }
}

fn corrupt(path: &Path, reason: impl ToString) -> TodoError {
    TodoError::StorageCorrupt {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

/// Read and check the store document. `Ok(None)` means the file is absent.
async fn load_document(path: &Path) -> TodoResult<Option<StoreDocument>> {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(corrupt(path, e)),
    };

    let document: StoreDocument = serde_json::from_str(&raw).map_err(|e| corrupt(path, e))?;

    for (session_id, session) in &document.sessions {
        if let Err(e) = validate_session_id(session_id) {
            return Err(corrupt(path, format!("invalid session id '{session_id}': {e}")));
        }
        let mut seen = HashSet::new();
        for todo in &session.todos {
            if todo.id.trim().is_empty() {
                let reason = format!("session {session_id} has a todo without an id");
                return Err(corrupt(path, reason));
            }
            if !seen.insert(todo.id.as_str()) {
                return Err(corrupt(
                    path,
                    format!("session {session_id} repeats todo id '{}'", todo.id),
                ));
            }
        }
    }

    Ok(Some(document))
}

fn sibling_with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map_or_else(|| OsString::from("todos.json"), OsString::from);
    name.push(suffix);
    path.with_file_name(name)
}

async fn write_document(path: &Path, document: &StoreDocument) -> TodoResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let bytes = serde_json::to_vec_pretty(document)
        .map_err(|e| TodoError::Persistence(format!("serialization failed: {e}")))?;

    let tmp_path = sibling_with_suffix(path, ".tmp");
    let mut file = tokio::fs::File::create(&tmp_path).await?;
    file.write_all(&bytes).await?;
    file.sync_all().await?;
    drop(file);

    tokio::fs::rename(&tmp_path, path).await?;
    Ok(())
}

async fn quarantine(path: &Path) -> TodoResult<PathBuf> {
    let suffix = format!(".corrupt-{}", chrono::Utc::now().timestamp());
    let target = sibling_with_suffix(path, &suffix);
    tokio::fs::rename(path, &target).await?;
    Ok(target)
}

#[async_trait]
impl TodoRepository for JsonFileTodoRepository {
    async fn get_todos(&self, session_id: &str) -> Vec<Todo> {
        self.table.read().await.todos(session_id)
    }

    async fn get_session(&self, session_id: &str) -> Option<Session> {
        self.table.read().await.session(session_id)
    }

    async fn set_todos(&self, session_id: &str, todos: Vec<Todo>) -> TodoResult<()> {
        let mut table = self.table.write().await;
        table.put(session_id, todos);
        self.persist(&table).await
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
        self.persist(&table).await?;
        Ok(outcome)
    }

    async fn delete_session(&self, session_id: &str) -> TodoResult<Option<Vec<Todo>>> {
        let mut table = self.table.write().await;
        let Some(removed) = table.remove(session_id) else {
            return Ok(None);
        };
        self.persist(&table).await?;
        Ok(Some(removed))
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
        self.table
            .read()
            .await
            .stats(Some(self.path.display().to_string()))
    }
}
