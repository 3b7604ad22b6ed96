//! CLI command implementations.
//!
//! Each command receives a [`TodoService`] over whichever repository the
//! configuration selects: JSON file when `storage.file` is set, in-memory
//! otherwise.

pub mod serve;
pub mod sessions;
pub mod show;

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};

use super::types::Commands;
use crate::adapters::storage::{InMemoryTodoRepository, JsonFileTodoRepository};
use crate::domain::models::Config;
use crate::domain::ports::TodoRepository;
use crate::services::TodoService;

/// Open the configured repository and run `command` against it.
pub async fn dispatch(command: Commands, config: &Config, json: bool) -> Result<()> {
    match config.storage.file {
        Some(ref path) => {
            let repo = JsonFileTodoRepository::open(path, config.storage.on_corrupt)
                .await
                .with_context(|| format!("Failed to open todo store {}", path.display()))?;
            run(command, TodoService::new(Arc::new(repo)), config, json).await
        }
        None => {
            if command != Commands::Serve {
                warn!("no storage file configured; the in-memory store starts empty");
            }
            info!("using in-memory todo store");
            let repo = InMemoryTodoRepository::new();
            run(command, TodoService::new(Arc::new(repo)), config, json).await
        }
    }
}

async fn run<R: TodoRepository + 'static>(
    command: Commands,
    service: TodoService<R>,
    config: &Config,
    json: bool,
) -> Result<()> {
    match command {
        Commands::Serve => serve::execute(service, &config.server).await,
        Commands::Sessions => sessions::execute(&service, json).await,
        Commands::Show(args) => show::execute(&service, args, json).await,
        Commands::Continue => sessions::execute_continue(&service, json).await,
    }
}
