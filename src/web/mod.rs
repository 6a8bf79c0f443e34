//! HTTP surface: thin axum dispatch over [`crate::services::task_service::TaskService`].
//!
//! No business logic lives here. Handlers translate query/path/body inputs
//! into service calls and service errors into the JSON error envelope.

pub mod errors;
pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::AppState;
