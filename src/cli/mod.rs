//! Command-line interface.

pub mod commands;
pub mod types;

pub use types::{Cli, Commands, ShowArgs};

use console::style;
use serde_json::json;

use crate::domain::TodoError;

/// Print an error and exit with a non-zero status.
pub fn handle_error(err: anyhow::Error, json_output: bool) -> ! {
    if json_output {
        let kind = err
            .downcast_ref::<TodoError>()
            .map_or("error", |e| e.kind().as_str());
        let payload = json!({
            "error": { "kind": kind, "message": format!("{err:#}") }
        });
        println!("{payload}");
    } else {
        eprintln!("{} {err}", style("Error:").red().bold());
        for cause in err.chain().skip(1) {
            eprintln!("  {} {cause}", style("caused by:").dim());
        }
    }
    std::process::exit(1);
}
