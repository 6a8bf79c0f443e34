//! # Native Query Executor
//!
//! Postgres-dialect statements executed directly against a borrowed
//! connection, outside the typed entity mapping.
//!
//! ## Why bypass the typed layer
//!
//! Each operation here leans on store functions with no portable equivalent in
//! the repository surface: string truncation (`LEFT`), date-to-text formatting
//! (`TO_CHAR`), epoch arithmetic (`EXTRACT(EPOCH FROM ...)`), substring
//! position over large text values (`STRPOS`), and anonymous multi-statement
//! procedural blocks (`DO $$ ... $$`). Pushing that computation into the store
//! also avoids dragging the full table into memory for what is ultimately
//! predicate filtering.
//!
//! ## Contract
//!
//! Every method borrows a `PgConnection`; the caller owns the surrounding
//! transaction. Nothing here begins, commits, or rolls back. All caller input
//! is bound as statement parameters, never concatenated into SQL text; the
//! one procedural block takes no caller input at all.
//!
//! Search results that carry store-computed columns come back as
//! [`NativeRow`] — an ordered column-name → [`RowValue`] mapping — instead of
//! entity structs, so the dialect-coupled shape never leaks into the typed
//! model.

use crate::models::task::Task;
use chrono::NaiveDateTime;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::{PgConnection, Row};
use tracing::info;

/// A single value in a generic row mapping.
///
/// Serializes untagged, so a row renders as plain JSON
/// (`{"id": 7, "title": "foobar", ...}`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RowValue {
    Null,
    Bool(bool),
    Int(i64),
    Text(String),
    Timestamp(NaiveDateTime),
}

impl RowValue {
    fn from_opt_text(value: Option<String>) -> Self {
        value.map_or(RowValue::Null, RowValue::Text)
    }
}

/// An ordered column-name → value mapping for one result row.
///
/// Column order follows the SELECT list, which is part of the operation's
/// contract (consumers render rows in that order).
#[derive(Debug, Clone, PartialEq)]
pub struct NativeRow {
    columns: Vec<(String, RowValue)>,
}

impl NativeRow {
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
        }
    }

    pub fn push(&mut self, column: impl Into<String>, value: RowValue) {
        self.columns.push((column.into(), value));
    }

    pub fn get(&self, column: &str) -> Option<&RowValue> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RowValue)> {
        self.columns
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl Default for NativeRow {
    fn default() -> Self {
        Self::new()
    }
}

impl Serialize for NativeRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (name, value) in &self.columns {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Length of the description preview carried by [`raw_search`] rows; previews
/// longer than this are truncated and flagged via `is_long_description`.
///
/// [`raw_search`]: NativeQueryExecutor::raw_search
pub const DESCRIPTION_PREVIEW_LEN: i32 = 50;

/// Priority threshold the maintenance procedure counts as "high priority".
pub const HIGH_PRIORITY_THRESHOLD: i32 = 8;

/// Anonymous procedural block recreating the scratch statistics table.
///
/// Drop-and-recreate makes the whole operation idempotent: two consecutive
/// runs leave exactly four rows, not eight. Runs as one block so a failure in
/// any statement rolls the caller's transaction back cleanly. Interpolates
/// only [`HIGH_PRIORITY_THRESHOLD`], never caller input.
fn maintenance_block() -> String {
    format!(
        r#"
DO $$
BEGIN
    DROP TABLE IF EXISTS task_stats_scratch;

    CREATE TABLE task_stats_scratch (
        category VARCHAR(100),
        count_value BIGINT,
        last_updated TIMESTAMP
    );

    INSERT INTO task_stats_scratch (category, count_value, last_updated)
    SELECT 'TOTAL', COUNT(*), NOW() FROM tasks;

    INSERT INTO task_stats_scratch (category, count_value, last_updated)
    SELECT 'COMPLETED', COUNT(*), NOW() FROM tasks WHERE completed = true;

    INSERT INTO task_stats_scratch (category, count_value, last_updated)
    SELECT 'PENDING', COUNT(*), NOW() FROM tasks WHERE completed = false;

    INSERT INTO task_stats_scratch (category, count_value, last_updated)
    SELECT 'HIGH_PRIORITY', COUNT(*), NOW() FROM tasks WHERE priority >= {HIGH_PRIORITY_THRESHOLD};
END
$$
"#
    )
}

/// Executor for the fixed set of dialect-specific operations.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeQueryExecutor;

impl NativeQueryExecutor {
    pub fn new() -> Self {
        Self
    }

    /// Case-insensitive keyword search with store-computed columns.
    ///
    /// Matches `keyword` as a substring of title or description (both sides
    /// upper-cased in the store), filtered to `priority >= min_priority`,
    /// ordered by priority descending then due date ascending. Each row
    /// carries a truncated description preview, a flag for whether the full
    /// description exceeds the preview length, a formatted due date, and the
    /// whole days elapsed since creation.
    pub async fn raw_search(
        &self,
        conn: &mut PgConnection,
        keyword: &str,
        min_priority: i32,
    ) -> Result<Vec<NativeRow>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT
                id,
                title,
                LEFT(description, $3) AS short_description,
                COALESCE(LENGTH(description), 0) > $3 AS is_long_description,
                priority,
                TO_CHAR(due_date, 'YYYY-MM-DD HH24:MI:SS') AS formatted_due_date,
                ROUND(EXTRACT(EPOCH FROM (NOW() - created_at)) / 86400)::BIGINT AS days_since_creation
            FROM tasks
            WHERE
                (UPPER(title) LIKE UPPER('%' || $1 || '%')
                 OR UPPER(description) LIKE UPPER('%' || $1 || '%'))
                AND priority >= $2
            ORDER BY priority DESC, due_date ASC
            "#,
        )
        .bind(keyword)
        .bind(min_priority)
        .bind(DESCRIPTION_PREVIEW_LEN)
        .fetch_all(&mut *conn)
        .await?;

        let results: Vec<NativeRow> = rows.iter().map(Self::map_search_row).collect::<Result<_, _>>()?;

        info!(
            operation = "raw_search",
            keyword = %keyword,
            min_priority = min_priority,
            result_count = results.len(),
            "executed native search query"
        );
        Ok(results)
    }

    fn map_search_row(row: &PgRow) -> Result<NativeRow, sqlx::Error> {
        let mut mapped = NativeRow::new();
        mapped.push("id", RowValue::Int(row.try_get::<i64, _>("id")?));
        mapped.push("title", RowValue::Text(row.try_get("title")?));
        mapped.push(
            "short_description",
            RowValue::from_opt_text(row.try_get("short_description")?),
        );
        mapped.push(
            "is_long_description",
            RowValue::Bool(row.try_get("is_long_description")?),
        );
        mapped.push(
            "priority",
            RowValue::Int(i64::from(row.try_get::<i32, _>("priority")?)),
        );
        mapped.push(
            "formatted_due_date",
            RowValue::from_opt_text(row.try_get("formatted_due_date")?),
        );
        mapped.push(
            "days_since_creation",
            RowValue::Int(row.try_get::<i64, _>("days_since_creation")?),
        );
        Ok(mapped)
    }

    /// Incomplete tasks whose due date is strictly in the past, most urgent
    /// first.
    pub async fn find_overdue(&self, conn: &mut PgConnection) -> Result<Vec<Task>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, completed, priority, due_date, created_at, updated_at
            FROM tasks
            WHERE due_date < NOW() AND completed = false
            ORDER BY priority DESC, due_date ASC
            "#,
        )
        .fetch_all(&mut *conn)
        .await?;

        info!(
            operation = "find_overdue",
            result_count = tasks.len(),
            "executed native overdue query"
        );
        Ok(tasks)
    }

    /// Reset priority for every incomplete task due before `cutoff`, as one
    /// predicate-based UPDATE so concurrent writes cannot be half-applied.
    /// Returns the affected-row count.
    pub async fn bulk_reprioritize(
        &self,
        conn: &mut PgConnection,
        cutoff: NaiveDateTime,
        new_priority: i32,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE tasks
            SET priority = $1, updated_at = NOW()
            WHERE due_date < $2 AND completed = false
            "#,
        )
        .bind(new_priority)
        .bind(cutoff)
        .execute(&mut *conn)
        .await?;

        let affected = result.rows_affected();
        info!(
            operation = "bulk_reprioritize",
            cutoff = %cutoff,
            new_priority = new_priority,
            affected_rows = affected,
            "executed native bulk update"
        );
        Ok(affected)
    }

    /// Case-sensitive substring match on title or description using the
    /// store's position facility, which works on text of any length rather
    /// than pattern-matching in application memory.
    pub async fn lob_search(
        &self,
        conn: &mut PgConnection,
        term: &str,
    ) -> Result<Vec<Task>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, completed, priority, due_date, created_at, updated_at
            FROM tasks
            WHERE STRPOS(title, $1) > 0 OR STRPOS(COALESCE(description, ''), $1) > 0
            ORDER BY id ASC
            "#,
        )
        .bind(term)
        .fetch_all(&mut *conn)
        .await?;

        info!(
            operation = "lob_search",
            result_count = tasks.len(),
            "executed native large-object search"
        );
        Ok(tasks)
    }

    /// Recreate and repopulate the scratch statistics table.
    ///
    /// Uses the simple query protocol (`raw_sql`) because `DO` blocks cannot
    /// be prepared.
    pub async fn run_maintenance_procedure(
        &self,
        conn: &mut PgConnection,
    ) -> Result<(), sqlx::Error> {
        let block = maintenance_block();
        // Called through the `Executor` side rather than `RawSql::execute` to
        // keep the returned future `Send` (rustc HRTB limitation).
        sqlx::Executor::execute(conn, sqlx::raw_sql(&block)).await?;

        info!(
            operation = "run_maintenance_procedure",
            "recreated and populated task_stats_scratch"
        );
        Ok(())
    }
}
