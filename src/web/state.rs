//! Shared application state for the web API.

use crate::services::task_service::TaskService;
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub service: TaskService,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        Self {
            service: TaskService::new(pool),
        }
    }
}
