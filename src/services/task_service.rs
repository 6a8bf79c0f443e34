//! # Task Service
//!
//! Orchestration facade combining the typed repository and the native query
//! executor behind one API.
//!
//! Responsibilities, and nothing beyond them:
//!
//! - **Delegation**: portable CRUD and filter calls pass straight through to
//!   the [`Task`] repository operations.
//! - **Absence mapping**: this is the only layer that turns a lookup miss into
//!   [`TaskboardError::TaskNotFound`]. The repository signals absence with
//!   `Option`/`bool`, so a genuine store failure is never conflated with a
//!   missing record.
//! - **Validation**: field invariants are checked before any write statement
//!   is issued, surfacing [`TaskboardError::Validation`] with no partial
//!   write.
//! - **Transaction boundaries for native operations**: each native call runs
//!   inside exactly one transaction — begin, execute, commit. On failure the
//!   transaction is dropped (rolled back), the store error is logged under
//!   the operation name, and the caller sees a generic
//!   [`TaskboardError::NativeExecution`] without the raw store text.
//!
//! The service has no lifecycle or internal state beyond the pool handle; every
//! call acquires and releases its connection through sqlx's scoped pool
//! checkout, on every exit path including failure.

use crate::database::native::{NativeQueryExecutor, NativeRow};
use crate::error::{Result, TaskboardError};
use crate::models::task::{NewTask, Task};
use chrono::NaiveDateTime;
use sqlx::PgPool;
use tracing::error;

#[derive(Clone)]
pub struct TaskService {
    pool: PgPool,
    native: NativeQueryExecutor,
}

impl TaskService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            native: NativeQueryExecutor::new(),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // ------------------------------------------------------------------
    // Typed operations
    // ------------------------------------------------------------------

    pub async fn list_tasks(&self) -> Result<Vec<Task>> {
        Ok(Task::list_all(&self.pool).await?)
    }

    /// Absence is a normal outcome here; callers that need a not-found
    /// condition (the HTTP edge) map `None` themselves.
    pub async fn get_task(&self, id: i64) -> Result<Option<Task>> {
        Ok(Task::find_by_id(&self.pool, id).await?)
    }

    pub async fn tasks_by_completed(&self, completed: bool) -> Result<Vec<Task>> {
        Ok(Task::list_by_completed(&self.pool, completed).await?)
    }

    pub async fn high_priority_tasks(&self, min_priority: i32) -> Result<Vec<Task>> {
        Ok(Task::list_by_minimum_priority(&self.pool, min_priority).await?)
    }

    pub async fn search_tasks(&self, keyword: &str) -> Result<Vec<Task>> {
        Ok(Task::search_by_keyword(&self.pool, keyword).await?)
    }

    pub async fn top_priority_tasks(&self, min_priority: i32, limit: i64) -> Result<Vec<Task>> {
        Ok(Task::list_top_priority(&self.pool, min_priority, limit).await?)
    }

    pub async fn create_task(&self, new_task: NewTask) -> Result<Task> {
        new_task.validate().map_err(TaskboardError::Validation)?;
        Ok(Task::create(&self.pool, new_task).await?)
    }

    /// Full-field replace. Fails with `TaskNotFound` when the id is absent;
    /// a store failure during the update stays a `Database` error.
    pub async fn update_task(&self, id: i64, fields: NewTask) -> Result<Task> {
        fields.validate().map_err(TaskboardError::Validation)?;
        Task::update(&self.pool, id, fields)
            .await?
            .ok_or(TaskboardError::TaskNotFound(id))
    }

    /// Delete by id. The repository is silent about absence; this layer
    /// reports it so HTTP callers can answer 404.
    pub async fn delete_task(&self, id: i64) -> Result<()> {
        if Task::delete(&self.pool, id).await? {
            Ok(())
        } else {
            Err(TaskboardError::TaskNotFound(id))
        }
    }

    // ------------------------------------------------------------------
    // Native operations — one transaction each
    // ------------------------------------------------------------------

    pub async fn raw_search(&self, keyword: &str, min_priority: i32) -> Result<Vec<NativeRow>> {
        let mut tx = self.pool.begin().await?;
        let rows = self
            .native
            .raw_search(&mut *tx, keyword, min_priority)
            .await
            .map_err(|e| Self::native_failure("raw_search", &e))?;
        tx.commit().await?;
        Ok(rows)
    }

    pub async fn overdue_tasks(&self) -> Result<Vec<Task>> {
        let mut tx = self.pool.begin().await?;
        let tasks = self
            .native
            .find_overdue(&mut *tx)
            .await
            .map_err(|e| Self::native_failure("find_overdue", &e))?;
        tx.commit().await?;
        Ok(tasks)
    }

    /// Returns the number of tasks reprioritized. Runs as one atomic
    /// predicate-based statement inside its own transaction.
    pub async fn bulk_reprioritize(&self, cutoff: NaiveDateTime, new_priority: i32) -> Result<u64> {
        let mut tx = self.pool.begin().await?;
        let affected = self
            .native
            .bulk_reprioritize(&mut *tx, cutoff, new_priority)
            .await
            .map_err(|e| Self::native_failure("bulk_reprioritize", &e))?;
        tx.commit().await?;
        Ok(affected)
    }

    pub async fn lob_search(&self, term: &str) -> Result<Vec<Task>> {
        let mut tx = self.pool.begin().await?;
        let tasks = self
            .native
            .lob_search(&mut *tx, term)
            .await
            .map_err(|e| Self::native_failure("lob_search", &e))?;
        tx.commit().await?;
        Ok(tasks)
    }

    pub async fn run_maintenance(&self) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        self.native
            .run_maintenance_procedure(&mut *tx)
            .await
            .map_err(|e| Self::native_failure("run_maintenance_procedure", &e))?;
        tx.commit().await?;
        Ok(())
    }

    /// Log the raw store error under the operation name and hand the caller a
    /// generic failure. The open transaction is dropped by `?` in the caller,
    /// which rolls it back.
    fn native_failure(operation: &str, err: &sqlx::Error) -> TaskboardError {
        error!(
            operation = operation,
            error = %err,
            "native query execution failed, rolling back"
        );
        TaskboardError::NativeExecution {
            operation: operation.to_string(),
        }
    }
}
