#![allow(clippy::doc_markdown)] // Allow technical terms like PostgreSQL, SQLx in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Taskboard
//!
//! Task-management backend over PostgreSQL with two query surfaces:
//!
//! - a **typed repository** on the [`models::task::Task`] model — portable CRUD
//!   and filter operations expressed with parameterized SQL and `FromRow`
//!   mapping, and
//! - a **native query executor** in [`database::native`] — a fixed set of
//!   Postgres-dialect statements (string truncation, date formatting, epoch
//!   arithmetic, `STRPOS` matching, anonymous `DO` blocks) that bypass the
//!   typed mapping and return generic row mappings instead.
//!
//! The [`services::task_service::TaskService`] facade combines both behind one
//! API: typed operations run directly against the pool, native operations each
//! run inside their own transaction so a mid-statement failure rolls back
//! completely. The service is also the only layer that converts a lookup miss
//! into [`error::TaskboardError::TaskNotFound`] — the repository itself treats
//! absence as a normal `Option::None` outcome.
//!
//! The [`web`] module is a thin axum surface over the service; it carries no
//! business logic of its own.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use taskboard::models::task::NewTask;
//! use taskboard::services::task_service::TaskService;
//! use sqlx::PgPool;
//!
//! # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
//! let service = TaskService::new(pool);
//! let task = service
//!     .create_task(NewTask {
//!         title: "write the report".to_string(),
//!         description: None,
//!         completed: false,
//!         priority: 5,
//!         due_date: None,
//!     })
//!     .await?;
//! assert_eq!(task.created_at, task.updated_at);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod database;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod web;

pub use config::Config;
pub use error::{Result, TaskboardError};
pub use models::task::{NewTask, Task};
pub use services::task_service::TaskService;
