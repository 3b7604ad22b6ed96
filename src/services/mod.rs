//! Service layer: todo operations and their text rendering.

pub mod presentation;
pub mod todo_service;

pub use todo_service::{
    ActiveWork, AddResult, DeleteResult, ReadOptions, ReadResult, SessionsOverview, StatusChange,
    TodoService, WriteSummary,
};
