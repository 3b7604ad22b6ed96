pub mod todo_repository;

pub use todo_repository::TodoRepository;
