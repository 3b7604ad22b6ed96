//! `sessions` and `continue`: store-wide views.

use anyhow::{Context, Result};

use crate::domain::ports::TodoRepository;
use crate::services::presentation;
use crate::services::TodoService;

pub async fn execute<R: TodoRepository + 'static>(
    service: &TodoService<R>,
    json: bool,
) -> Result<()> {
    let overview = service.list_sessions().await;
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&overview).context("Failed to encode sessions")?
        );
    } else {
        println!("{}", presentation::render_sessions(&overview));
    }
    Ok(())
}

pub async fn execute_continue<R: TodoRepository + 'static>(
    service: &TodoService<R>,
    json: bool,
) -> Result<()> {
    let active = service.find_active_work().await;
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&active).context("Failed to encode active work")?
        );
    } else {
        println!("{}", presentation::render_continuation(&active));
    }
    Ok(())
}
