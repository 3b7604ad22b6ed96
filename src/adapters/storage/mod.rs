//! Todo repository adapters.
//!
//! - [`InMemoryTodoRepository`]: process-lifetime store
//! - [`JsonFileTodoRepository`]: same semantics, mirrored to a JSON file

pub mod json_file;
pub mod memory;
mod table;

pub use json_file::JsonFileTodoRepository;
pub use memory::InMemoryTodoRepository;
