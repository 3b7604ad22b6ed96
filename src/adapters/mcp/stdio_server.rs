//! MCP stdio server implementing JSON-RPC 2.0 over stdin/stdout.
//!
//! Exposes the todo operations as MCP tools. Protocol: newline-delimited
//! JSON-RPC 2.0 on stdin/stdout. Logging goes to stderr (stdout is reserved
//! for protocol messages).
//!
//! Tool failures are not JSON-RPC errors: they come back as a normal tool
//! result with `isError: true` and a body of
//! `{"error": {"kind": "not_found", "message": "..."}}`.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::tools::{
    self, AddItemArgs, FormatArgs, OutputFormat, ReadArgs, SessionArgs, UpdateStatusArgs,
    WriteArgs,
};
use crate::domain::errors::{TodoError, TodoResult};
use crate::domain::models::Todo;
use crate::domain::ports::TodoRepository;
use crate::services::presentation;
use crate::services::{ReadOptions, TodoService};

const PROTOCOL_VERSION: &str = "2024-11-05";

const PARSE_ERROR: i32 = -32700;
const INVALID_REQUEST: i32 = -32600;
const METHOD_NOT_FOUND: i32 = -32601;

/// MCP stdio server that exposes todo operations as tools.
pub struct StdioServer<R: TodoRepository + 'static> {
    service: TodoService<R>,
    server_name: String,
    /// Stored todos per session as of its last `todo_read`, used to pick the
    /// display style of the next one.
    previous_reads: Mutex<HashMap<String, Vec<Todo>>>,
}

impl<R: TodoRepository + 'static> StdioServer<R> {
    pub fn new(service: TodoService<R>) -> Self {
        Self {
            service,
            server_name: "todo-mcp".to_string(),
            previous_reads: Mutex::new(HashMap::new()),
        }
    }

    /// Name reported in the `initialize` response.
    pub fn with_server_name(mut self, name: impl Into<String>) -> Self {
        self.server_name = name.into();
        self
    }

    /// Run the stdio server loop until stdin closes.
    pub async fn run(&self) -> anyhow::Result<()> {
        let reader = BufReader::new(tokio::io::stdin());
        let writer = tokio::io::stdout();
        self.serve(reader, writer).await
    }

    /// Serve requests from any line-oriented reader, one at a time.
    ///
    /// A line that is not valid UTF-8 gets a parse error response and the
    /// loop carries on with the next line.
    pub async fn serve<Rd, W>(&self, mut reader: Rd, mut writer: W) -> anyhow::Result<()>
    where
        Rd: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut buf = Vec::new();
        info!(server = %self.server_name, "stdio server started");

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf).await? == 0 {
                break;
            }

            let response = match std::str::from_utf8(&buf) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    self.handle_message(line).await
                }
                Err(e) => {
                    warn!(error = %e, "request is not valid UTF-8");
                    let message = format!("Parse error: invalid UTF-8: {e}");
                    Some(error_response(Value::Null, PARSE_ERROR, &message))
                }
            };

            if let Some(response) = response {
                let mut bytes = response.into_bytes();
                bytes.push(b'\n');
                writer.write_all(&bytes).await?;
                writer.flush().await?;
            }
        }

        info!("stdio server stopped");
        Ok(())
    }

    /// Handle one JSON-RPC message. Notifications produce no response.
    pub async fn handle_message(&self, line: &str) -> Option<String> {
        let request: Value = match serde_json::from_str(line) {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "unparsable request");
                let message = format!("Parse error: {e}");
                return Some(error_response(Value::Null, PARSE_ERROR, &message));
            }
        };

        let Some(method) = request.get("method").and_then(Value::as_str) else {
            let id = request.get("id").cloned().unwrap_or(Value::Null);
            return Some(error_response(id, INVALID_REQUEST, "Invalid request: missing method"));
        };

        // Requests without an id are notifications.
        let Some(id) = request.get("id").cloned() else {
            debug!(method, "notification received");
            return None;
        };

        let params = request.get("params").cloned().unwrap_or_else(|| json!({}));
        debug!(method, "request received");

        let response = match method {
            "initialize" => success_response(id, self.initialize_result()),
            "ping" => success_response(id, json!({})),
            "tools/list" => success_response(id, tools::tool_definitions()),
            "tools/call" => self.handle_tools_call(id, &params).await,
            _ => error_response(id, METHOD_NOT_FOUND, &format!("Method not found: {method}")),
        };
        Some(response)
    }

    fn initialize_result(&self) -> Value {
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "tools": {}
            },
            "serverInfo": {
                "name": self.server_name,
                "version": env!("CARGO_PKG_VERSION")
            }
        })
    }

    async fn handle_tools_call(&self, id: Value, params: &Value) -> String {
        let tool_name = params.get("name").and_then(Value::as_str).unwrap_or("");
        let arguments = params
            .get("arguments")
            .filter(|a| !a.is_null())
            .cloned()
            .unwrap_or_else(|| json!({}));

        let result = self.call_tool(tool_name, arguments).await;

        let body = match result {
            Ok(text) => json!({
                "content": [{ "type": "text", "text": text }]
            }),
            Err(err) => {
                warn!(tool = tool_name, kind = %err.kind(), error = %err, "tool call failed");
                let payload = json!({
                    "error": { "kind": err.kind(), "message": err.to_string() }
                });
                json!({
                    "content": [{ "type": "text", "text": payload.to_string() }],
                    "isError": true
                })
            }
        };
        success_response(id, body)
    }

    /// Dispatch a tool by name and render its result as text.
    pub async fn call_tool(&self, name: &str, arguments: Value) -> TodoResult<String> {
        match name {
            tools::TODO_READ => {
                let args: ReadArgs = decode(name, arguments)?;
                let result = self
                    .service
                    .read(
                        &args.session_id,
                        ReadOptions {
                            status_filter: args.status_filter,
                            priority_filter: args.priority_filter,
                            include_stats: args.include_stats,
                        },
                    )
                    .await?;
                let style = self.record_read(&args.session_id).await;
                match args.format {
                    OutputFormat::Text => Ok(presentation::render_read(
                        &result,
                        args.show_scorecard,
                        style,
                    )),
                    OutputFormat::Json => to_json(&result),
                }
            }
            tools::TODO_WRITE => {
                let args: WriteArgs = decode(name, arguments)?;
                let summary = self.service.write(&args.session_id, &args.todos).await?;
                to_json(&summary)
            }
            tools::TODO_UPDATE_STATUS => {
                let args: UpdateStatusArgs = decode(name, arguments)?;
                let change = self
                    .service
                    .update_status(&args.session_id, &args.todo_id, &args.new_status)
                    .await?;
                to_json(&change)
            }
            tools::TODO_ADD_ITEM => {
                let args: AddItemArgs = decode(name, arguments)?;
                let session_id = args.session_id.clone();
                let added = self.service.add_item(&session_id, args.into()).await?;
                to_json(&added)
            }
            tools::TODO_DELETE_SESSION => {
                let args: SessionArgs = decode(name, arguments)?;
                let deleted = self.service.delete_session(&args.session_id).await?;
                to_json(&deleted)
            }
            tools::TODO_GET_SESSIONS => {
                let args: FormatArgs = decode(name, arguments)?;
                let overview = self.service.list_sessions().await;
                match args.format {
                    OutputFormat::Text => Ok(presentation::render_sessions(&overview)),
                    OutputFormat::Json => to_json(&overview),
                }
            }
            tools::TODO_FIND_ACTIVE_WORK => to_json(&self.service.find_active_work().await),
            tools::TODO_CONTINUE => Ok(presentation::render_continuation(
                &self.service.find_active_work().await,
            )),
            _ => Err(TodoError::invalid(format!("Unknown tool: {name}"))),
        }
    }

    /// Remember the session's stored todos and return the style implied by
    /// the change since its previous read.
    async fn record_read(&self, session_id: &str) -> presentation::DisplayStyle {
        let current = self.service.repository().get_todos(session_id).await;
        let mut previous_reads = self.previous_reads.lock().await;
        let previous = previous_reads.get(session_id).map(Vec::as_slice);
        let style = presentation::detect_style(&current, previous);
        previous_reads.insert(session_id.to_string(), current);
        style
    }
}

fn decode<T: DeserializeOwned>(tool: &str, arguments: Value) -> TodoResult<T> {
    serde_json::from_value(arguments)
        .map_err(|e| TodoError::invalid(format!("Invalid arguments for {tool}: {e}")))
}

fn to_json<T: Serialize>(value: &T) -> TodoResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| TodoError::Persistence(format!("failed to encode result: {e}")))
}

fn success_response(id: Value, result: Value) -> String {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": result
    })
    .to_string()
}

fn error_response(id: Value, code: i32, message: &str) -> String {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": {
            "code": code,
            "message": message
        }
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemoryTodoRepository;
    use std::sync::Arc;

    fn server() -> StdioServer<InMemoryTodoRepository> {
        StdioServer::new(TodoService::new(Arc::new(InMemoryTodoRepository::new())))
    }

    #[tokio::test]
    async fn test_parse_error() {
        let response = server().handle_message("{not json").await.unwrap();
        let value: Value = serde_json::from_str(&response).unwrap();
        assert_eq!(value["error"]["code"], PARSE_ERROR);
        assert!(value["id"].is_null());
    }

    #[tokio::test]
    async fn test_notification_has_no_response() {
        let msg = r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#;
        assert!(server().handle_message(msg).await.is_none());
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let msg = r#"{"jsonrpc":"2.0","id":3,"method":"resources/list"}"#;
        let value: Value =
            serde_json::from_str(&server().handle_message(msg).await.unwrap()).unwrap();
        assert_eq!(value["error"]["code"], METHOD_NOT_FOUND);
        assert_eq!(value["id"], 3);
    }

    #[tokio::test]
    async fn test_initialize_reports_server_name() {
        let srv = server().with_server_name("my-todos");
        let msg = r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#;
        let value: Value = serde_json::from_str(&srv.handle_message(msg).await.unwrap()).unwrap();
        assert_eq!(value["result"]["serverInfo"]["name"], "my-todos");
        assert_eq!(value["result"]["protocolVersion"], PROTOCOL_VERSION);
    }

    #[tokio::test]
    async fn test_bad_arguments_are_invalid_input() {
        let err = server()
            .call_tool(tools::TODO_WRITE, json!({"session_id": "s1"}))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), crate::domain::ErrorKind::InvalidInput);
    }

    #[tokio::test]
    async fn test_read_style_follows_progress_since_last_read() {
        let srv = server();
        let write = json!({
            "session_id": "s1",
            "todos": [{"id": "a", "content": "A"}, {"id": "b", "content": "B"}]
        });
        srv.call_tool(tools::TODO_WRITE, write).await.unwrap();
        let read = || json!({"session_id": "s1"});

        let first = srv.call_tool(tools::TODO_READ, read()).await.unwrap();
        assert!(first.contains("Style:   MINIMALIST"));
        assert!(first.contains("Achievement Level"));

        let start = json!({"session_id": "s1", "todo_id": "a", "new_status": "in_progress"});
        srv.call_tool(tools::TODO_UPDATE_STATUS, start).await.unwrap();
        let second = srv.call_tool(tools::TODO_READ, read()).await.unwrap();
        assert!(second.contains("Style:   TERMINAL"));
        assert!(second.contains("░▒▓"));

        let done = json!({"session_id": "s1", "todo_id": "a", "new_status": "completed"});
        srv.call_tool(tools::TODO_UPDATE_STATUS, done).await.unwrap();
        let third = srv.call_tool(tools::TODO_READ, read()).await.unwrap();
        assert!(third.contains("Style:   BRUTALIST"));
        assert!(third.contains("▓▓ [✓] A"));

        let fourth = srv.call_tool(tools::TODO_READ, read()).await.unwrap();
        assert!(fourth.contains("Style:   MINIMALIST"));
    }

    #[test]
    fn test_unencodable_result_maps_to_existing_kind() {
        let value = std::collections::BTreeMap::from([((1, 2), 3)]);
        let err = to_json(&value).unwrap_err();
        assert_eq!(err.kind(), crate::domain::ErrorKind::Persistence);
        assert!(err.to_string().contains("failed to encode result"));
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let err = server().call_tool("todo_explode", json!({})).await.unwrap_err();
        assert!(err.to_string().contains("Unknown tool: todo_explode"));
    }
}
