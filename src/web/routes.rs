//! HTTP route definitions.
//!
//! Static segments are registered alongside the `{id}` capture; axum prefers
//! the static match, so `/tasks/overdue` never shadows into `/tasks/{id}`.

use crate::web::handlers;
use crate::web::state::AppState;
use axum::routing::{delete, get, post, put};
use axum::Router;

/// API v1 routes, mounted under `/v1`.
pub fn api_v1_routes() -> Router<AppState> {
    Router::new()
        // Tasks CRUD
        .route("/tasks", get(handlers::tasks::list_tasks))
        .route("/tasks", post(handlers::tasks::create_task))
        .route("/tasks/{id}", get(handlers::tasks::get_task))
        .route("/tasks/{id}", put(handlers::tasks::update_task))
        .route("/tasks/{id}", delete(handlers::tasks::delete_task))
        // Filtered queries (typed layer)
        .route("/tasks/completed", get(handlers::tasks::tasks_by_completed))
        .route(
            "/tasks/high-priority",
            get(handlers::tasks::high_priority_tasks),
        )
        .route("/tasks/search", get(handlers::tasks::search_tasks))
        .route(
            "/tasks/top-priority",
            get(handlers::tasks::top_priority_tasks),
        )
        // Native-query operations
        .route("/tasks/overdue", get(handlers::tasks::overdue_tasks))
        .route(
            "/tasks/update-priority",
            put(handlers::tasks::reprioritize_tasks),
        )
        .route("/tasks/native-search", get(handlers::tasks::native_search))
        .route("/tasks/lob-search", get(handlers::tasks::lob_search))
        .route("/tasks/maintenance", post(handlers::tasks::run_maintenance))
}

/// Full application router with state attached.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/v1", api_v1_routes())
        .route("/health", get(handlers::health::health))
        .with_state(state)
}

