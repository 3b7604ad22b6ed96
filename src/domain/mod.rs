//! Domain layer for todo-mcp
//!
//! Models, errors, validation rules and the storage port. Nothing in here
//! knows about files, JSON-RPC or the terminal.

pub mod errors;
pub mod models;
pub mod ports;
pub mod validation;

pub use errors::{ErrorKind, TodoError, TodoResult};
