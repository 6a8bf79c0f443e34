//! Service layer: orchestration facade over the typed and native query paths.

pub mod task_service;

pub use task_service::TaskService;
