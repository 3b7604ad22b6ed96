//! Tool catalogue and argument types for the MCP server.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::domain::models::TodoDraft;

pub const TODO_READ: &str = "todo_read";
pub const TODO_WRITE: &str = "todo_write";
pub const TODO_UPDATE_STATUS: &str = "todo_update_status";
pub const TODO_ADD_ITEM: &str = "todo_add_item";
pub const TODO_DELETE_SESSION: &str = "todo_delete_session";
pub const TODO_GET_SESSIONS: &str = "todo_get_sessions";
pub const TODO_FIND_ACTIVE_WORK: &str = "todo_find_active_work";
pub const TODO_CONTINUE: &str = "todo_continue_from_last_conversation";

/// Output encoding for tools that support both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

const fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct ReadArgs {
    pub session_id: String,
    #[serde(default)]
    pub status_filter: Option<String>,
    #[serde(default)]
    pub priority_filter: Option<String>,
    #[serde(default)]
    pub include_stats: bool,
    #[serde(default = "default_true")]
    pub show_scorecard: bool,
    #[serde(default)]
    pub format: OutputFormat,
}

#[derive(Debug, Deserialize)]
pub struct WriteArgs {
    pub session_id: String,
    pub todos: Vec<TodoDraft>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusArgs {
    pub session_id: String,
    pub todo_id: String,
    pub new_status: String,
}

#[derive(Debug, Deserialize)]
pub struct AddItemArgs {
    pub session_id: String,
    pub content: String,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub todo_id: Option<String>,
}

impl From<AddItemArgs> for TodoDraft {
    fn from(args: AddItemArgs) -> Self {
        Self {
            id: args.todo_id,
            content: Some(args.content),
            status: args.status,
            priority: args.priority,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SessionArgs {
    pub session_id: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct FormatArgs {
    #[serde(default)]
    pub format: OutputFormat,
}

fn status_enum() -> Value {
    json!(["pending", "in_progress", "completed", "cancelled"])
}

fn priority_enum() -> Value {
    json!(["high", "medium", "low"])
}

fn format_property() -> Value {
    json!({
        "type": "string",
        "enum": ["text", "json"],
        "description": "Rendered text (default) or the raw JSON result",
        "default": "text"
    })
}

/// The `tools/list` payload.
pub fn tool_definitions() -> Value {
    json!({
        "tools": [
            {
                "name": TODO_READ,
                "description": "Read the current todo list for a session. Use it at the start of work, before picking the next task, and whenever you are unsure what is left. Returns an empty list for a session that has no todos.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "session_id": { "type": "string", "description": "Identifier of the work session (letters, digits, '.', '-', '_')" },
                        "status_filter": { "type": "string", "enum": status_enum(), "description": "Only return todos with this status" },
                        "priority_filter": { "type": "string", "enum": priority_enum(), "description": "Only return todos with this priority" },
                        "include_stats": { "type": "boolean", "description": "Include status and priority counts", "default": false },
                        "show_scorecard": { "type": "boolean", "description": "Append the evaluation scorecard to the text output", "default": true },
                        "format": format_property()
                    },
                    "required": ["session_id"]
                }
            },
            {
                "name": TODO_WRITE,
                "description": "Replace the whole todo list of a session. Missing ids become todo-N (N = position), missing priority becomes medium and missing status becomes pending. An empty list clears the session.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "session_id": { "type": "string", "description": "Identifier of the work session" },
                        "todos": {
                            "type": "array",
                            "description": "The complete todo list to store for this session",
                            "items": {
                                "type": "object",
                                "properties": {
                                    "content": { "type": "string", "description": "What needs to be done" },
                                    "status": { "type": "string", "enum": status_enum() },
                                    "priority": { "type": "string", "enum": priority_enum() },
                                    "id": { "type": "string", "description": "Unique id within the session (generated if omitted)" }
                                },
                                "required": ["content"]
                            }
                        }
                    },
                    "required": ["session_id", "todos"]
                }
            },
            {
                "name": TODO_UPDATE_STATUS,
                "description": "Change the status of one todo. Mark a task in_progress when you start it and completed as soon as it is done.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "session_id": { "type": "string", "description": "Identifier of the work session" },
                        "todo_id": { "type": "string", "description": "Id of the todo to update" },
                        "new_status": { "type": "string", "enum": status_enum() }
                    },
                    "required": ["session_id", "todo_id", "new_status"]
                }
            },
            {
                "name": TODO_ADD_ITEM,
                "description": "Append a single todo to a session without rewriting the list.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "session_id": { "type": "string", "description": "Identifier of the work session" },
                        "content": { "type": "string", "description": "What needs to be done" },
                        "priority": { "type": "string", "enum": priority_enum(), "default": "medium" },
                        "status": { "type": "string", "enum": status_enum(), "default": "pending" },
                        "todo_id": { "type": "string", "description": "Custom id (generated if omitted)" }
                    },
                    "required": ["session_id", "content"]
                }
            },
            {
                "name": TODO_DELETE_SESSION,
                "description": "Delete a session and all of its todos.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "session_id": { "type": "string", "description": "Identifier of the session to delete" }
                    },
                    "required": ["session_id"]
                }
            },
            {
                "name": TODO_GET_SESSIONS,
                "description": "List every session with its todo count, completion rate and last update.",
                "inputSchema": {
                    "type": "object",
                    "properties": { "format": format_property() },
                    "additionalProperties": false
                }
            },
            {
                "name": TODO_FIND_ACTIVE_WORK,
                "description": "Find the most recently updated session that still has pending or in-progress todos.",
                "inputSchema": {
                    "type": "object",
                    "properties": {},
                    "additionalProperties": false
                }
            },
            {
                "name": TODO_CONTINUE,
                "description": "Pick up where you left off: shows the most recent session with unfinished work, its in-progress tasks and the next pending ones.",
                "inputSchema": {
                    "type": "object",
                    "properties": {},
                    "additionalProperties": false
                }
            }
        ]
    })
}
