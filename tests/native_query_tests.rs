//! Native query executor tests, driven through the service facade so each
//! operation runs inside its real transaction boundary.

use chrono::{Duration, Utc};
use sqlx::PgPool;
use taskboard::database::native::RowValue;
use taskboard::error::TaskboardError;
use taskboard::models::task::{NewTask, Task};
use taskboard::services::task_service::TaskService;

fn draft(title: &str, priority: i32) -> NewTask {
    NewTask {
        title: title.to_string(),
        description: None,
        completed: false,
        priority,
        due_date: None,
    }
}

#[sqlx::test]
async fn test_raw_search_filters_by_keyword_and_priority(pool: PgPool) -> sqlx::Result<()> {
    let service = TaskService::new(pool);

    let mut foobar = draft("foobar", 5);
    foobar.description = Some("x".repeat(120));
    foobar.due_date = Some(Utc::now().naive_utc() + Duration::days(1));
    service.create_task(foobar).await.unwrap();
    service.create_task(draft("bar", 1)).await.unwrap();

    let rows = service.raw_search("foo", 3).await.unwrap();
    assert_eq!(rows.len(), 1);

    let row = &rows[0];
    assert_eq!(row.get("title"), Some(&RowValue::Text("foobar".to_string())));
    assert_eq!(row.get("priority"), Some(&RowValue::Int(5)));

    // Preview is exactly the first 50 characters, flagged as truncated.
    assert_eq!(
        row.get("short_description"),
        Some(&RowValue::Text("x".repeat(50)))
    );
    assert_eq!(row.get("is_long_description"), Some(&RowValue::Bool(true)));

    match row.get("days_since_creation") {
        Some(RowValue::Int(days)) => assert!(*days >= 0),
        other => panic!("unexpected days_since_creation: {other:?}"),
    }

    // TO_CHAR output for a set due date: 'YYYY-MM-DD HH24:MI:SS'.
    match row.get("formatted_due_date") {
        Some(RowValue::Text(formatted)) => {
            assert_eq!(formatted.len(), 19);
            assert_eq!(&formatted[4..5], "-");
            assert_eq!(&formatted[10..11], " ");
        }
        other => panic!("unexpected formatted_due_date: {other:?}"),
    }
    Ok(())
}

#[sqlx::test]
async fn test_raw_search_is_case_insensitive_and_ordered(pool: PgPool) -> sqlx::Result<()> {
    let service = TaskService::new(pool);

    let mut urgent = draft("REPORT due soon", 9);
    urgent.due_date = Some(Utc::now().naive_utc() + Duration::days(1));
    service.create_task(urgent).await.unwrap();
    service.create_task(draft("minor report cleanup", 2)).await.unwrap();

    let rows = service.raw_search("report", 0).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].get("priority"), Some(&RowValue::Int(9)));
    assert_eq!(rows[1].get("priority"), Some(&RowValue::Int(2)));
    Ok(())
}

#[sqlx::test]
async fn test_raw_search_short_description_is_not_flagged(pool: PgPool) -> sqlx::Result<()> {
    let service = TaskService::new(pool);

    let mut task = draft("short desc", 4);
    task.description = Some("fits in one preview".to_string());
    service.create_task(task).await.unwrap();

    let rows = service.raw_search("short", 0).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(
        rows[0].get("short_description"),
        Some(&RowValue::Text("fits in one preview".to_string()))
    );
    assert_eq!(rows[0].get("is_long_description"), Some(&RowValue::Bool(false)));
    Ok(())
}

#[sqlx::test]
async fn test_find_overdue_excludes_completed_and_future(pool: PgPool) -> sqlx::Result<()> {
    let service = TaskService::new(pool);
    let yesterday = Utc::now().naive_utc() - Duration::days(1);
    let tomorrow = Utc::now().naive_utc() + Duration::days(1);

    let mut overdue = draft("overdue incomplete", 5);
    overdue.due_date = Some(yesterday);
    service.create_task(overdue).await.unwrap();

    let mut finished = draft("overdue but done", 5);
    finished.due_date = Some(yesterday);
    finished.completed = true;
    service.create_task(finished).await.unwrap();

    let mut future = draft("due tomorrow", 5);
    future.due_date = Some(tomorrow);
    service.create_task(future).await.unwrap();

    let overdue_tasks = service.overdue_tasks().await.unwrap();
    assert_eq!(overdue_tasks.len(), 1);
    assert_eq!(overdue_tasks[0].title, "overdue incomplete");
    Ok(())
}

#[sqlx::test]
async fn test_find_overdue_orders_by_priority_then_due_date(pool: PgPool) -> sqlx::Result<()> {
    let service = TaskService::new(pool);
    let base = Utc::now().naive_utc();

    for (title, priority, days_ago) in [
        ("low urgency", 2, 3),
        ("high urgency late", 8, 1),
        ("high urgency later still", 8, 2),
    ] {
        let mut task = draft(title, priority);
        task.due_date = Some(base - Duration::days(days_ago));
        service.create_task(task).await.unwrap();
    }

    let tasks = service.overdue_tasks().await.unwrap();
    let titles: Vec<&str> = tasks.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(
        titles,
        vec!["high urgency later still", "high urgency late", "low urgency"]
    );
    Ok(())
}

#[sqlx::test]
async fn test_bulk_reprioritize_applies_predicate_exactly(pool: PgPool) -> sqlx::Result<()> {
    let service = TaskService::new(pool.clone());
    let yesterday = Utc::now().naive_utc() - Duration::days(1);
    let tomorrow = Utc::now().naive_utc() + Duration::days(1);

    let mut stale = draft("stale incomplete", 2);
    stale.due_date = Some(yesterday);
    let stale = service.create_task(stale).await.unwrap();

    let mut done = draft("stale but done", 2);
    done.due_date = Some(yesterday);
    done.completed = true;
    let done = service.create_task(done).await.unwrap();

    let mut fresh = draft("not due yet", 2);
    fresh.due_date = Some(tomorrow);
    let fresh = service.create_task(fresh).await.unwrap();

    let affected = service
        .bulk_reprioritize(Utc::now().naive_utc(), 10)
        .await
        .unwrap();
    assert_eq!(affected, 1);

    let stale_after = Task::find_by_id(&pool, stale.id).await?.unwrap();
    assert_eq!(stale_after.priority, 10);
    assert!(stale_after.updated_at > stale.updated_at);

    // Tasks outside the predicate are untouched, timestamps included.
    assert_eq!(Task::find_by_id(&pool, done.id).await?.unwrap(), done);
    assert_eq!(Task::find_by_id(&pool, fresh.id).await?.unwrap(), fresh);
    Ok(())
}

#[sqlx::test]
async fn test_bulk_reprioritize_empty_predicate_affects_nothing(pool: PgPool) -> sqlx::Result<()> {
    let service = TaskService::new(pool);
    service.create_task(draft("no due date", 3)).await.unwrap();

    let affected = service
        .bulk_reprioritize(Utc::now().naive_utc(), 10)
        .await
        .unwrap();
    assert_eq!(affected, 0);
    Ok(())
}

#[sqlx::test]
async fn test_lob_search_matches_inside_long_descriptions(pool: PgPool) -> sqlx::Result<()> {
    let service = TaskService::new(pool);

    // Bury the term deep in a description far past the preview window.
    let mut haystack = "y".repeat(3000);
    haystack.push_str("UniqueTerm");
    haystack.push_str(&"y".repeat(500));
    let mut long_task = draft("unassuming title", 0);
    long_task.description = Some(haystack);
    service.create_task(long_task).await.unwrap();

    let mut title_task = draft("UniqueTerm in the title", 0);
    title_task.description = None;
    service.create_task(title_task).await.unwrap();

    service.create_task(draft("uniqueterm lowercase", 0)).await.unwrap();

    // Case-sensitive: the lowercase row does not match.
    let hits = service.lob_search("UniqueTerm").await.unwrap();
    assert_eq!(hits.len(), 2);
    Ok(())
}

#[sqlx::test]
async fn test_maintenance_failure_rolls_back_and_hides_store_error(
    pool: PgPool,
) -> sqlx::Result<()> {
    let service = TaskService::new(pool.clone());
    let task = service.create_task(draft("survivor", 5)).await.unwrap();

    // A view squatting on the scratch name makes the block's DROP TABLE fail
    // with wrong_object_type, partway through the procedural block.
    sqlx::query("CREATE VIEW task_stats_scratch AS SELECT 1 AS one")
        .execute(&pool)
        .await?;

    let err = service.run_maintenance().await.unwrap_err();
    assert_eq!(
        err,
        TaskboardError::NativeExecution {
            operation: "run_maintenance_procedure".to_string(),
        }
    );
    // The surfaced error carries the operation name, never the store text.
    assert!(!err.to_string().contains("task_stats_scratch"));

    // The transaction rolled back: the view is still in place, no scratch
    // table replaced it, and the entity table is untouched.
    let still_a_view: bool = sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM information_schema.views WHERE table_name = 'task_stats_scratch')",
    )
    .fetch_one(&pool)
    .await?;
    assert!(still_a_view);
    assert_eq!(Task::find_by_id(&pool, task.id).await?.unwrap(), task);
    Ok(())
}

#[sqlx::test]
async fn test_maintenance_is_idempotent_with_four_rows(pool: PgPool) -> sqlx::Result<()> {
    let service = TaskService::new(pool.clone());

    let mut done = draft("done", 9);
    done.completed = true;
    service.create_task(done).await.unwrap();
    service.create_task(draft("pending low", 1)).await.unwrap();
    service.create_task(draft("pending high", 8)).await.unwrap();

    service.run_maintenance().await.unwrap();
    service.run_maintenance().await.unwrap();

    let row_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM task_stats_scratch")
        .fetch_one(&pool)
        .await?;
    assert_eq!(row_count, 4);

    let counts: Vec<(String, i64)> = sqlx::query_as(
        "SELECT category, count_value FROM task_stats_scratch ORDER BY category",
    )
    .fetch_all(&pool)
    .await?;

    assert_eq!(
        counts,
        vec![
            ("COMPLETED".to_string(), 1),
            ("HIGH_PRIORITY".to_string(), 2),
            ("PENDING".to_string(), 2),
            ("TOTAL".to_string(), 3),
        ]
    );
    Ok(())
}
