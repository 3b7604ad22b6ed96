//! todo-mcp entry point.

use clap::Parser;

use todo_mcp::cli::{self, Cli};
use todo_mcp::infrastructure::config::ConfigLoader;
use todo_mcp::infrastructure::logging::LoggerImpl;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = run(&cli).await;

    if let Err(err) = result {
        cli::handle_error(err, cli.json);
    }
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    let mut config = ConfigLoader::load(cli.config.as_deref())?;
    if let Some(ref path) = cli.storage_file {
        config.storage.file = Some(path.clone());
    }

    // Held for the lifetime of the process so buffered file logs flush.
    let _logger = LoggerImpl::init(&config.logging)?;

    cli::commands::dispatch(cli.subcommand(), &config, cli.json).await
}
