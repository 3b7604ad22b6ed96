//! `show`: print one session's todos.

use anyhow::{Context, Result};

use crate::cli::types::ShowArgs;
use crate::domain::ports::TodoRepository;
use crate::services::presentation;
use crate::services::{ReadOptions, TodoService};

pub async fn execute<R: TodoRepository + 'static>(
    service: &TodoService<R>,
    args: ShowArgs,
    json: bool,
) -> Result<()> {
    let options = ReadOptions {
        status_filter: args.status,
        priority_filter: args.priority,
        include_stats: args.stats,
    };
    let result = service.read(&args.session_id, options).await?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&result).context("Failed to encode todos")?
        );
    } else {
        let text = presentation::render_read(
            &result,
            !args.no_scorecard,
            presentation::DisplayStyle::Minimalist,
        );
        println!("{text}");
    }
    Ok(())
}
