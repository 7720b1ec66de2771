//! Task repository for SQLite operations
//!
//! All read operations support optional caching. Pass `Some(cache)` to enable caching,
//! or `None` to bypass cache. Every mutation drops the whole `tasks` cache tag.

use std::future::Future;

use serde::Serialize;
use serde::de::DeserializeOwned;
use sqlx::{Sqlite, SqliteConnection, SqlitePool, QueryBuilder};

use crate::core::constants::CACHE_TAG_TASKS;
use crate::data::cache::{CacheKey, CacheService};
use crate::data::filters::{BuildContext, ColumnConfig, columns::tasks};
use crate::data::sqlite::SqliteError;
use crate::data::sqlite::table::{self, TablePage};
use crate::data::types::{NewTask, TaskRow, TaskUpdate};
use crate::domain::QueryStateSnapshot;
use crate::utils::sql::placeholders;
use crate::utils::time::now_millis;

const CODE_PREFIX: &str = "TASK-";

/// Serve from cache when possible, otherwise load and populate
async fn read_through<T, F, Fut>(
    cache: Option<&CacheService>,
    key: String,
    load: F,
) -> Result<T, SqliteError>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, SqliteError>>,
{
    let Some(cache) = cache else {
        return load().await;
    };

    match cache.get::<T>(&key).await {
        Ok(Some(value)) => {
            tracing::trace!(%key, "Task cache hit");
            return Ok(value);
        }
        Ok(None) => {}
        Err(e) => tracing::warn!(%key, error = %e, "Cache get error"),
    }

    let value = load().await?;
    if let Err(e) = cache.set(&key, &value, Some(cache.ttl())).await {
        tracing::warn!(%key, error = %e, "Cache set error");
    }
    Ok(value)
}

async fn invalidate(cache: Option<&CacheService>) {
    if let Some(cache) = cache {
        cache.invalidate_tag(CACHE_TAG_TASKS).await;
    }
}

/// One page of tasks for a query-state snapshot (with optional caching)
pub async fn list_tasks(
    pool: &SqlitePool,
    cache: Option<&CacheService>,
    snapshot: &QueryStateSnapshot,
    ctx: &BuildContext,
) -> Result<TablePage<TaskRow>, SqliteError> {
    let key = CacheKey::task_table(&snapshot.cache_key(ctx));
    read_through(cache, key, || table::fetch_table_page(pool, snapshot, ctx)).await
}

/// Get a task by ID (with optional caching)
///
/// Misses are not cached.
pub async fn get_task(
    pool: &SqlitePool,
    cache: Option<&CacheService>,
    id: &str,
) -> Result<Option<TaskRow>, SqliteError> {
    if let Some(cache) = cache {
        let key = CacheKey::task(id);
        match cache.get::<TaskRow>(&key).await {
            Ok(Some(task)) => {
                tracing::trace!(%id, "Task cache hit");
                return Ok(Some(task));
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(%id, error = %e, "Cache get error"),
        }

        let result = get_task_from_db(pool, id).await?;
        if let Some(ref task) = result
            && let Err(e) = cache.set(&key, task, Some(cache.ttl())).await
        {
            tracing::warn!(%id, error = %e, "Cache set error");
        }
        Ok(result)
    } else {
        get_task_from_db(pool, id).await
    }
}

async fn get_task_from_db(pool: &SqlitePool, id: &str) -> Result<Option<TaskRow>, SqliteError> {
    let row = sqlx::query_as::<_, TaskRow>("SELECT * FROM tasks WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Create a task with a generated CUID2 ID and the next `TASK-<n>` code
pub async fn create_task(
    pool: &SqlitePool,
    cache: Option<&CacheService>,
    task: &NewTask,
) -> Result<TaskRow, SqliteError> {
    let id = cuid2::create_id();
    let now = now_millis();

    // Single statement so the code allocation cannot race another insert
    let row = sqlx::query_as::<_, TaskRow>(
        r#"
        INSERT INTO tasks (id, code, title, status, label, priority, estimated_hours, archived, created_at, updated_at)
        VALUES (
            ?,
            ? || (SELECT COALESCE(MAX(CAST(SUBSTR(code, 6) AS INTEGER)), 0) + 1 FROM tasks),
            ?, ?, ?, ?, ?, ?, ?, ?
        )
        RETURNING *
        "#,
    )
    .bind(&id)
    .bind(CODE_PREFIX)
    .bind(&task.title)
    .bind(task.status)
    .bind(task.label)
    .bind(task.priority)
    .bind(task.estimated_hours)
    .bind(task.archived)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
    .map_err(|e| SqliteError::from_write(e, "task"))?;

    invalidate(cache).await;
    tracing::debug!(id = %row.id, code = %row.code, "Created task");
    Ok(row)
}

/// Apply a partial update; returns `None` when the task does not exist
pub async fn update_task(
    pool: &SqlitePool,
    cache: Option<&CacheService>,
    id: &str,
    update: &TaskUpdate,
) -> Result<Option<TaskRow>, SqliteError> {
    if update.is_empty() {
        return get_task(pool, cache, id).await;
    }

    let mut qb = QueryBuilder::<Sqlite>::new("UPDATE tasks SET updated_at = ");
    qb.push_bind(now_millis());
    if let Some(title) = &update.title {
        qb.push(", title = ").push_bind(title.clone());
    }
    if let Some(status) = update.status {
        qb.push(", status = ").push_bind(status);
    }
    if let Some(label) = update.label {
        qb.push(", label = ").push_bind(label);
    }
    if let Some(priority) = update.priority {
        qb.push(", priority = ").push_bind(priority);
    }
    if let Some(hours) = update.estimated_hours {
        qb.push(", estimated_hours = ").push_bind(hours);
    }
    if let Some(archived) = update.archived {
        qb.push(", archived = ").push_bind(archived);
    }
    qb.push(" WHERE id = ").push_bind(id).push(" RETURNING *");

    let row = qb
        .build_query_as::<TaskRow>()
        .fetch_optional(pool)
        .await?;

    if row.is_some() {
        invalidate(cache).await;
    }
    Ok(row)
}

/// Delete tasks by ID; returns the number of deleted rows
pub async fn delete_tasks(
    pool: &SqlitePool,
    cache: Option<&CacheService>,
    ids: &[String],
) -> Result<u64, SqliteError> {
    if ids.is_empty() {
        return Ok(0);
    }

    let query = format!("DELETE FROM tasks WHERE id IN ({})", placeholders(ids.len()));
    let mut query_builder = sqlx::query(&query);
    for id in ids {
        query_builder = query_builder.bind(id);
    }
    let result = query_builder.execute(pool).await?;

    if result.rows_affected() > 0 {
        invalidate(cache).await;
    }
    Ok(result.rows_affected())
}

async fn insert_row(conn: &mut SqliteConnection, row: &TaskRow) -> Result<(), SqliteError> {
    sqlx::query(
        r#"
        INSERT INTO tasks (id, code, title, status, label, priority, estimated_hours, archived, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&row.id)
    .bind(&row.code)
    .bind(&row.title)
    .bind(row.status)
    .bind(row.label)
    .bind(row.priority)
    .bind(row.estimated_hours)
    .bind(row.archived)
    .bind(row.created_at)
    .bind(row.updated_at)
    .execute(conn)
    .await
    .map_err(|e| SqliteError::from_write(e, "task"))?;
    Ok(())
}

/// Replace every task with `rows` atomically
pub async fn replace_tasks(
    pool: &SqlitePool,
    cache: Option<&CacheService>,
    rows: &[TaskRow],
) -> Result<u64, SqliteError> {
    let mut tx = pool.begin().await?;
    let deleted = sqlx::query("DELETE FROM tasks")
        .execute(&mut *tx)
        .await?
        .rows_affected();
    for row in rows {
        insert_row(&mut tx, row).await?;
    }
    tx.commit().await?;

    invalidate(cache).await;
    tracing::debug!(deleted, inserted = rows.len(), "Replaced tasks");
    Ok(rows.len() as u64)
}

/// Per-value task counts for a select column (with optional caching)
pub async fn task_counts(
    pool: &SqlitePool,
    cache: Option<&CacheService>,
    column: &ColumnConfig,
) -> Result<Vec<(String, i64)>, SqliteError> {
    read_through(cache, CacheKey::task_counts(column.column), || {
        table::count_by(pool, &tasks::TABLE, column)
    })
    .await
}

/// Min/max for a numeric task column (with optional caching)
pub async fn task_range(
    pool: &SqlitePool,
    cache: Option<&CacheService>,
    column: &ColumnConfig,
) -> Result<Option<(f64, f64)>, SqliteError> {
    read_through(cache, CacheKey::task_range(column.column), || {
        table::fetch_range(pool, &tasks::TABLE, column)
    })
    .await
}
