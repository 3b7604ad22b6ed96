//! MCP (Model Context Protocol) stdio adapter.
//!
//! Exposes the todo operations as tools to an MCP client speaking
//! newline-delimited JSON-RPC 2.0 over stdin/stdout.

pub mod stdio_server;
pub mod tools;

pub use stdio_server::StdioServer;
pub use tools::{tool_definitions, OutputFormat};
