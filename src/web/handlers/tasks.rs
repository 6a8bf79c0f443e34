//! Task endpoints: CRUD, filtered queries, and the native-query demos.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDateTime;
use serde::Deserialize;
use serde_json::json;

use crate::database::native::NativeRow;
use crate::models::task::{NewTask, Task};
use crate::web::errors::{ApiError, ApiResult};
use crate::web::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CompletedQuery {
    pub completed: bool,
}

#[derive(Debug, Deserialize)]
pub struct HighPriorityQuery {
    #[serde(default = "default_min_priority")]
    pub min_priority: i32,
}

fn default_min_priority() -> i32 {
    5
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub keyword: String,
}

#[derive(Debug, Deserialize)]
pub struct TopPriorityQuery {
    #[serde(default = "default_top_priority_threshold")]
    pub priority: i32,
    #[serde(default = "default_top_priority_limit")]
    pub limit: i64,
}

fn default_top_priority_threshold() -> i32 {
    3
}

fn default_top_priority_limit() -> i64 {
    5
}

#[derive(Debug, Deserialize)]
pub struct ReprioritizeQuery {
    pub cutoff: NaiveDateTime,
    pub new_priority: i32,
}

#[derive(Debug, Deserialize)]
pub struct NativeSearchQuery {
    #[serde(default)]
    pub keyword: String,
    #[serde(default)]
    pub min_priority: i32,
}

#[derive(Debug, Deserialize)]
pub struct LobSearchQuery {
    pub term: String,
}

pub async fn list_tasks(State(state): State<AppState>) -> ApiResult<Json<Vec<Task>>> {
    Ok(Json(state.service.list_tasks().await?))
}

pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Task>> {
    state
        .service
        .get_task(id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

pub async fn create_task(
    State(state): State<AppState>,
    Json(new_task): Json<NewTask>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let task = state.service.create_task(new_task).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(fields): Json<NewTask>,
) -> ApiResult<Json<Task>> {
    Ok(Json(state.service.update_task(id, fields).await?))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.service.delete_task(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn tasks_by_completed(
    State(state): State<AppState>,
    Query(query): Query<CompletedQuery>,
) -> ApiResult<Json<Vec<Task>>> {
    Ok(Json(state.service.tasks_by_completed(query.completed).await?))
}

pub async fn high_priority_tasks(
    State(state): State<AppState>,
    Query(query): Query<HighPriorityQuery>,
) -> ApiResult<Json<Vec<Task>>> {
    Ok(Json(
        state.service.high_priority_tasks(query.min_priority).await?,
    ))
}

pub async fn search_tasks(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<Vec<Task>>> {
    Ok(Json(state.service.search_tasks(&query.keyword).await?))
}

pub async fn top_priority_tasks(
    State(state): State<AppState>,
    Query(query): Query<TopPriorityQuery>,
) -> ApiResult<Json<Vec<Task>>> {
    if query.limit < 1 {
        return Err(ApiError::bad_request("limit must be positive"));
    }
    Ok(Json(
        state
            .service
            .top_priority_tasks(query.priority, query.limit)
            .await?,
    ))
}

pub async fn overdue_tasks(State(state): State<AppState>) -> ApiResult<Json<Vec<Task>>> {
    Ok(Json(state.service.overdue_tasks().await?))
}

pub async fn reprioritize_tasks(
    State(state): State<AppState>,
    Query(query): Query<ReprioritizeQuery>,
) -> ApiResult<Json<serde_json::Value>> {
    let affected = state
        .service
        .bulk_reprioritize(query.cutoff, query.new_priority)
        .await?;
    Ok(Json(json!({ "affected": affected })))
}

pub async fn native_search(
    State(state): State<AppState>,
    Query(query): Query<NativeSearchQuery>,
) -> ApiResult<Json<Vec<NativeRow>>> {
    Ok(Json(
        state
            .service
            .raw_search(&query.keyword, query.min_priority)
            .await?,
    ))
}

pub async fn lob_search(
    State(state): State<AppState>,
    Query(query): Query<LobSearchQuery>,
) -> ApiResult<Json<Vec<Task>>> {
    Ok(Json(state.service.lob_search(&query.term).await?))
}

pub async fn run_maintenance(State(state): State<AppState>) -> ApiResult<Json<serde_json::Value>> {
    state.service.run_maintenance().await?;
    Ok(Json(json!({ "status": "maintenance completed" })))
}
