pub mod memory_repository;
pub mod task_dto;
pub mod task_handlers;
pub mod task_models;
pub mod task_repository;
pub mod task_service;

pub use memory_repository::InMemoryTaskRepository;
pub use task_dto::{CreateTaskRequest, ListTasksParams};
pub use task_handlers::{create_task, delete_task, get_tasks, mark_done, mark_undone};
pub use task_models::{NewTask, Task, TaskFilter, TaskQuery};
pub use task_repository::{TaskRepository, TaskStore};
pub use task_service::TaskService;
