//! # Task Model
//!
//! The sole persisted entity plus its portable repository operations.
//!
//! ## Database Schema
//!
//! Maps to the `tasks` table:
//! - `id`: Primary key (BIGSERIAL), store-assigned, immutable
//! - `title`: Required, bounded text (VARCHAR(200))
//! - `description`: Optional, bounded text (VARCHAR(4000))
//! - `completed`: Completion flag (BOOLEAN)
//! - `priority`: Urgency ordering, higher = more urgent (INTEGER)
//! - `due_date`: Optional deadline (TIMESTAMP)
//! - `created_at` / `updated_at`: Audit timestamps (TIMESTAMP)
//!
//! ## Timestamp Invariants
//!
//! Both audit timestamps are stamped inside the write statement itself, from
//! the same statement clock: `created_at == updated_at` immediately after
//! insert, and every successful update refreshes `updated_at` so
//! `created_at <= updated_at` holds for the row's entire lifetime. There are
//! no out-of-band lifecycle hooks; the write path is the only stamping path.
//!
//! ## Error Semantics
//!
//! Every operation returns `sqlx::Error` only for genuine store failures.
//! Absence is a normal outcome: `find_by_id` and `update` return `Option`,
//! `delete` returns whether a row was removed. Converting absence into a
//! domain error is the service layer's job.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

/// Maximum length accepted for `title`, mirroring the column bound.
pub const TITLE_MAX_LEN: usize = 200;

/// Maximum length accepted for `description`, mirroring the column bound.
pub const DESCRIPTION_MAX_LEN: usize = 4000;

/// A persisted task row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub priority: i32,
    pub due_date: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Field set for creation and for full-field replacement on update.
///
/// Mutation is replace, not patch: every mutable field is re-supplied on each
/// update, so the same struct serves both write paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub priority: i32,
    pub due_date: Option<NaiveDateTime>,
}

impl NewTask {
    /// Check the field invariants the store would reject anyway, so a
    /// constraint violation aborts before any statement is issued.
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("title must not be empty".to_string());
        }
        // Character counts, not byte lengths: the columns are VARCHAR(n) and
        // the store counts characters.
        if self.title.chars().count() > TITLE_MAX_LEN {
            return Err(format!("title exceeds {TITLE_MAX_LEN} characters"));
        }
        if let Some(description) = &self.description {
            if description.chars().count() > DESCRIPTION_MAX_LEN {
                return Err(format!("description exceeds {DESCRIPTION_MAX_LEN} characters"));
            }
        }
        Ok(())
    }
}

impl Task {
    /// Insert a new task. Both audit timestamps come from the same NOW(), so
    /// they are equal on the returned row.
    pub async fn create(pool: &PgPool, new_task: NewTask) -> Result<Task, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, description, completed, priority, due_date, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, NOW(), NOW())
            RETURNING id, title, description, completed, priority, due_date, created_at, updated_at
            "#,
        )
        .bind(&new_task.title)
        .bind(&new_task.description)
        .bind(new_task.completed)
        .bind(new_task.priority)
        .bind(new_task.due_date)
        .fetch_one(pool)
        .await
    }

    /// Find a task by id. Absence is `Ok(None)`, never an error.
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Task>, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, completed, priority, due_date, created_at, updated_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// All tasks, ordered by id for a stable listing.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Task>, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, completed, priority, due_date, created_at, updated_at
            FROM tasks
            ORDER BY id ASC
            "#,
        )
        .fetch_all(pool)
        .await
    }

    /// Tasks matching the completion flag exactly.
    pub async fn list_by_completed(pool: &PgPool, completed: bool) -> Result<Vec<Task>, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, completed, priority, due_date, created_at, updated_at
            FROM tasks
            WHERE completed = $1
            ORDER BY id ASC
            "#,
        )
        .bind(completed)
        .fetch_all(pool)
        .await
    }

    /// Tasks with `priority >= threshold`, most urgent first.
    pub async fn list_by_minimum_priority(
        pool: &PgPool,
        threshold: i32,
    ) -> Result<Vec<Task>, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, completed, priority, due_date, created_at, updated_at
            FROM tasks
            WHERE priority >= $1
            ORDER BY priority DESC, id ASC
            "#,
        )
        .bind(threshold)
        .fetch_all(pool)
        .await
    }

    /// Case-sensitive substring search over title or description.
    pub async fn search_by_keyword(pool: &PgPool, keyword: &str) -> Result<Vec<Task>, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, completed, priority, due_date, created_at, updated_at
            FROM tasks
            WHERE title LIKE '%' || $1 || '%' OR description LIKE '%' || $1 || '%'
            ORDER BY id ASC
            "#,
        )
        .bind(keyword)
        .fetch_all(pool)
        .await
    }

    /// The newest `limit` tasks strictly above the priority threshold.
    pub async fn list_top_priority(
        pool: &PgPool,
        min_priority: i32,
        limit: i64,
    ) -> Result<Vec<Task>, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, completed, priority, due_date, created_at, updated_at
            FROM tasks
            WHERE priority > $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(min_priority)
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Full-field replace of a task's mutable fields, refreshing `updated_at`.
    ///
    /// Returns `Ok(None)` when no row has this id; the single
    /// UPDATE ... RETURNING statement keeps the write atomic and lets the
    /// caller tell a lookup miss apart from a store failure.
    pub async fn update(
        pool: &PgPool,
        id: i64,
        fields: NewTask,
    ) -> Result<Option<Task>, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET title = $2, description = $3, completed = $4, priority = $5, due_date = $6,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, description, completed, priority, due_date, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(fields.completed)
        .bind(fields.priority)
        .bind(fields.due_date)
        .fetch_optional(pool)
        .await
    }

    /// Delete by id. Returns whether a row was actually removed; deleting an
    /// absent id is idempotent at this layer.
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
