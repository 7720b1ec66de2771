//! Table query orchestration
//!
//! Runs the page read and the matching-row count for a query-state snapshot
//! inside one transaction so both observe the same data.

use serde::{Deserialize, Serialize};
use sqlx::query::QueryAs;
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{FromRow, Sqlite, SqlitePool};

use super::error::SqliteError;
use crate::data::filters::{
    BuildContext, ColumnConfig, ColumnVariant, SortItem, SqlValue, TableConfig,
};
use crate::domain::QueryStateSnapshot;

/// One page of rows plus totals for the whole filtered set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TablePage<T> {
    pub rows: Vec<T>,
    pub total_count: u64,
    pub page_count: u64,
}

fn bind_values<'q, O>(
    mut query: QueryAs<'q, Sqlite, O, SqliteArguments<'q>>,
    binds: &[SqlValue],
) -> QueryAs<'q, Sqlite, O, SqliteArguments<'q>> {
    for value in binds {
        query = match value {
            SqlValue::Text(s) => query.bind(s.clone()),
            SqlValue::Integer(i) => query.bind(*i),
            SqlValue::Real(f) => query.bind(*f),
        };
    }
    query
}

/// ORDER BY clause: requested sort keys, then the primary key descending
///
/// Unknown or unsortable columns are skipped. The primary key tiebreaker keeps
/// pagination deterministic when sort keys repeat.
fn order_by(table: &TableConfig, sort: &[SortItem]) -> String {
    let mut parts = Vec::with_capacity(sort.len() + 1);
    let mut has_primary_key = false;
    for item in sort {
        let Some(column) = table.sortable(&item.id) else {
            continue;
        };
        has_primary_key |= column.column == table.primary_key;
        let direction = if item.desc { "DESC" } else { "ASC" };
        parts.push(format!("{} {}", column.column, direction));
    }
    if !has_primary_key {
        parts.push(format!("{} DESC", table.primary_key));
    }
    parts.join(", ")
}

/// Fetch one page and the total count for `snapshot`
///
/// Errors propagate unchanged; the transaction rolls back when dropped.
pub async fn fetch_table_page<T>(
    pool: &SqlitePool,
    snapshot: &QueryStateSnapshot,
    ctx: &BuildContext,
) -> Result<TablePage<T>, SqliteError>
where
    T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    let table = snapshot.table;
    let predicate = snapshot.predicate(ctx);
    let (where_sql, binds) = match &predicate {
        Some(p) => (format!(" WHERE {}", p.sql), p.binds.as_slice()),
        None => (String::new(), &[][..]),
    };

    let page_sql = format!(
        "SELECT * FROM {}{} ORDER BY {} LIMIT ? OFFSET ?",
        table.table,
        where_sql,
        order_by(table, &snapshot.sort)
    );
    let count_sql = format!("SELECT COUNT(*) FROM {}{}", table.table, where_sql);
    tracing::trace!(sql = %page_sql, binds = binds.len(), "Table page query");

    let pagination = snapshot.pagination;
    let mut tx = pool.begin().await?;

    let rows: Vec<T> = bind_values(sqlx::query_as::<_, T>(&page_sql), binds)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&mut *tx)
        .await?;

    let (total,): (i64,) = bind_values(sqlx::query_as::<_, (i64,)>(&count_sql), binds)
        .fetch_one(&mut *tx)
        .await?;

    tx.commit().await?;

    let total_count = u64::try_from(total).unwrap_or(0);
    Ok(TablePage {
        rows,
        total_count,
        page_count: pagination.page_count(total_count),
    })
}

/// Row count per distinct value of `column`, ordered by value
pub async fn count_by(
    pool: &SqlitePool,
    table: &TableConfig,
    column: &ColumnConfig,
) -> Result<Vec<(String, i64)>, SqliteError> {
    let sql = format!(
        "SELECT {col}, COUNT(*) FROM {table} WHERE {col} IS NOT NULL GROUP BY {col} ORDER BY {col}",
        col = column.column,
        table = table.table,
    );
    let rows = sqlx::query_as::<_, (String, i64)>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Minimum and maximum of a number or date column; `None` for an empty table
pub async fn fetch_range(
    pool: &SqlitePool,
    table: &TableConfig,
    column: &ColumnConfig,
) -> Result<Option<(f64, f64)>, SqliteError> {
    if !matches!(column.variant, ColumnVariant::Number | ColumnVariant::Date) {
        return Ok(None);
    }
    let sql = format!(
        "SELECT CAST(MIN({col}) AS REAL), CAST(MAX({col}) AS REAL) FROM {table}",
        col = column.column,
        table = table.table,
    );
    let (min, max): (Option<f64>, Option<f64>) =
        sqlx::query_as(&sql).fetch_one(pool).await?;
    Ok(min.zip(max))
}
