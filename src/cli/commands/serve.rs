//! `serve`: run the MCP stdio server.

use anyhow::Result;
use tracing::info;

use crate::adapters::mcp::StdioServer;
use crate::domain::models::ServerConfig;
use crate::domain::ports::TodoRepository;
use crate::services::TodoService;

pub async fn execute<R: TodoRepository + 'static>(
    service: TodoService<R>,
    server: &ServerConfig,
) -> Result<()> {
    info!(name = %server.name, "starting MCP stdio server");
    StdioServer::new(service)
        .with_server_name(server.name.clone())
        .run()
        .await
}
