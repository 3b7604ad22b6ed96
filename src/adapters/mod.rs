//! Adapters for external systems: the MCP transport and todo storage.

pub mod mcp;
pub mod storage;
