//! Database session
//!
//! This module provides the process-wide query surface: a pooled PostgreSQL
//! session with positional-parameter primitives, transaction control, and a
//! lenient compatibility wrapper that swallows driver errors into neutral
//! values for callers that only test truthiness.

use crate::record::{decode_column, row_to_record, Record};
use crate::DbPool;
use serde_json::Value;
use sqlx::postgres::PgArguments;
use sqlx::{Postgres, Row, Transaction};

// Shared parameter binding logic: JSON values are dispatched to concrete
// PostgreSQL binds so the server sees properly typed parameters. Strings are
// probed for timestamp, date and UUID forms before falling back to text.
macro_rules! bind_json_param {
    ($query:expr, $param:expr) => {
        match $param {
            serde_json::Value::String(s) => {
                // Try to parse as RFC3339 timestamp first
                if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(&s) {
                    $query.bind(dt.with_timezone(&chrono::Utc))
                // Try to parse as calendar date
                } else if let Ok(date) = chrono::NaiveDate::parse_from_str(&s, "%Y-%m-%d") {
                    $query.bind(date)
                // Try to parse as UUID
                } else if let Ok(uuid) = uuid::Uuid::parse_str(&s) {
                    $query.bind(uuid)
                } else {
                    $query.bind(s)
                }
            }
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    if i >= i32::MIN as i64 && i <= i32::MAX as i64 {
                        $query.bind(i as i32)
                    } else {
                        $query.bind(i)
                    }
                } else if let Some(f) = n.as_f64() {
                    $query.bind(f)
                } else {
                    $query.bind(n.to_string())
                }
            }
            serde_json::Value::Bool(b) => $query.bind(b),
            serde_json::Value::Null => $query.bind(Option::<String>::None),
            other => $query.bind(other.to_string()),
        }
    };
}

fn bind_value<'q>(
    query: sqlx::query::Query<'q, Postgres, PgArguments>,
    param: Value,
) -> sqlx::query::Query<'q, Postgres, PgArguments> {
    bind_json_param!(query, param)
}

fn build_query<'q>(
    sql: &'q str,
    params: Vec<Value>,
) -> sqlx::query::Query<'q, Postgres, PgArguments> {
    let mut query = sqlx::query(sql);
    for param in params {
        query = bind_value(query, param);
    }
    query
}

/// The one shared database session for the process
///
/// Holds the connection pool and exposes typed query primitives. Constructed
/// once at startup and handed to every gateway; cloning shares the same pool.
#[derive(Clone)]
pub struct DbSession {
    pool: DbPool,
}

impl DbSession {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get database pool reference
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Wrap this session in the error-swallowing compatibility surface
    pub fn lenient(&self) -> LenientSession {
        LenientSession::new(self.clone())
    }

    /// Run a query and return every matching row
    pub async fn select_many(&self, sql: &str, params: Vec<Value>) -> Result<Vec<Record>, sqlx::Error> {
        let rows = build_query(sql, params).fetch_all(&self.pool).await?;
        Ok(rows.iter().map(row_to_record).collect())
    }

    /// Run a query and return the first matching row, if any
    pub async fn select_one(&self, sql: &str, params: Vec<Value>) -> Result<Option<Record>, sqlx::Error> {
        let row = build_query(sql, params).fetch_optional(&self.pool).await?;
        Ok(row.as_ref().map(row_to_record))
    }

    /// Run an INSERT that returns the generated key
    ///
    /// The statement must yield one row whose first column is the generated
    /// key, which a `RETURNING <primary key>` clause provides.
    pub async fn insert(&self, sql: &str, params: Vec<Value>) -> Result<Value, sqlx::Error> {
        let row = build_query(sql, params).fetch_one(&self.pool).await?;
        let generated = row
            .columns()
            .first()
            .map(|column| decode_column(&row, column))
            .unwrap_or(Value::Null);
        Ok(generated)
    }

    /// Run an UPDATE; Ok(true) means at least one row changed
    ///
    /// Ok(false) is an empty success: the statement ran but matched nothing.
    pub async fn update(&self, sql: &str, params: Vec<Value>) -> Result<bool, sqlx::Error> {
        let result = build_query(sql, params).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    /// Run a DELETE; Ok(true) means at least one row was removed
    pub async fn delete(&self, sql: &str, params: Vec<Value>) -> Result<bool, sqlx::Error> {
        let result = build_query(sql, params).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    /// Run any statement and return the number of rows it affected
    pub async fn execute(&self, sql: &str, params: Vec<Value>) -> Result<u64, sqlx::Error> {
        let result = build_query(sql, params).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    /// Number of rows a statement affected or matched
    pub async fn row_count(&self, sql: &str, params: Vec<Value>) -> Result<i64, sqlx::Error> {
        let result = build_query(sql, params).execute(&self.pool).await?;
        Ok(result.rows_affected() as i64)
    }

    /// Begin a new database transaction
    pub async fn begin(&self) -> Result<SessionTransaction<'static>, sqlx::Error> {
        let tx = self.pool.begin().await?;
        Ok(SessionTransaction { tx })
    }

    /// Check database connection health with a trivial round trip
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }

    /// Whether the database currently answers a trivial round trip
    pub async fn is_healthy(&self) -> bool {
        self.ping().await.is_ok()
    }
}

impl std::fmt::Debug for DbSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbSession")
            .field("pool_size", &self.pool.size())
            .finish()
    }
}

/// A transactional context over the session
///
/// Wraps a sqlx transaction and provides commit/rollback plus the same query
/// primitives as the session, executed inside the transaction. Dropping the
/// value without committing rolls the transaction back.
///
/// # Example
/// ```ignore
/// let mut tx = session.begin().await?;
///
/// tx.execute("UPDATE invoices SET status = $1 WHERE id = $2", params_a).await?;
/// tx.execute("INSERT INTO payments (invoice_id, amount_cents) VALUES ($1, $2)", params_b).await?;
///
/// tx.commit().await?;
/// ```
pub struct SessionTransaction<'a> {
    tx: Transaction<'a, Postgres>,
}

impl<'a> SessionTransaction<'a> {
    /// Commit the transaction
    pub async fn commit(self) -> Result<(), sqlx::Error> {
        self.tx.commit().await
    }

    /// Rollback the transaction
    pub async fn rollback(self) -> Result<(), sqlx::Error> {
        self.tx.rollback().await
    }

    /// Get a mutable reference to the underlying transaction
    pub fn as_mut(&mut self) -> &mut Transaction<'a, Postgres> {
        &mut self.tx
    }

    /// Run a query inside the transaction and return every matching row
    pub async fn select_many(&mut self, sql: &str, params: Vec<Value>) -> Result<Vec<Record>, sqlx::Error> {
        let rows = build_query(sql, params).fetch_all(&mut *self.tx).await?;
        Ok(rows.iter().map(row_to_record).collect())
    }

    /// Run a query inside the transaction and return the first row, if any
    pub async fn select_one(&mut self, sql: &str, params: Vec<Value>) -> Result<Option<Record>, sqlx::Error> {
        let row = build_query(sql, params).fetch_optional(&mut *self.tx).await?;
        Ok(row.as_ref().map(row_to_record))
    }

    /// Run an INSERT with a RETURNING clause inside the transaction
    pub async fn insert(&mut self, sql: &str, params: Vec<Value>) -> Result<Value, sqlx::Error> {
        let row = build_query(sql, params).fetch_one(&mut *self.tx).await?;
        let generated = row
            .columns()
            .first()
            .map(|column| decode_column(&row, column))
            .unwrap_or(Value::Null);
        Ok(generated)
    }

    /// Run an UPDATE inside the transaction; Ok(true) means rows changed
    pub async fn update(&mut self, sql: &str, params: Vec<Value>) -> Result<bool, sqlx::Error> {
        let result = build_query(sql, params).execute(&mut *self.tx).await?;
        Ok(result.rows_affected() > 0)
    }

    /// Run a DELETE inside the transaction; Ok(true) means rows were removed
    pub async fn delete(&mut self, sql: &str, params: Vec<Value>) -> Result<bool, sqlx::Error> {
        let result = build_query(sql, params).execute(&mut *self.tx).await?;
        Ok(result.rows_affected() > 0)
    }

    /// Run any statement inside the transaction
    pub async fn execute(&mut self, sql: &str, params: Vec<Value>) -> Result<u64, sqlx::Error> {
        let result = build_query(sql, params).execute(&mut *self.tx).await?;
        Ok(result.rows_affected())
    }
}

/// Error-swallowing compatibility surface over [`DbSession`]
///
/// Collapses every driver failure into a neutral value: empty sequence, no
/// row, `false`, or zero. Each swallowed failure writes one warning with the
/// operation kind and driver message; the failing SQL is only logged at
/// debug level. New callers should prefer the strict [`DbSession`] surface,
/// which keeps failures distinguishable from empty results.
pub struct LenientSession {
    inner: DbSession,
}

impl LenientSession {
    pub fn new(session: DbSession) -> Self {
        Self { inner: session }
    }

    /// The strict session underneath
    pub fn inner(&self) -> &DbSession {
        &self.inner
    }

    fn swallow<T>(op: &'static str, sql: &str, fallback: T, result: Result<T, sqlx::Error>) -> T {
        match result {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("[{}] database error swallowed: {}", op, e);
                tracing::debug!("[{}] failing statement: {}", op, sql);
                fallback
            }
        }
    }

    /// All matching rows, or an empty sequence on failure
    pub async fn select_many(&self, sql: &str, params: Vec<Value>) -> Vec<Record> {
        let result = self.inner.select_many(sql, params).await;
        Self::swallow("SELECT_MANY", sql, Vec::new(), result)
    }

    /// The first matching row, or None on failure
    pub async fn select_one(&self, sql: &str, params: Vec<Value>) -> Option<Record> {
        let result = self.inner.select_one(sql, params).await;
        Self::swallow("SELECT_ONE", sql, None, result)
    }

    /// The generated key, or None on failure
    pub async fn insert(&self, sql: &str, params: Vec<Value>) -> Option<Value> {
        let result = self.inner.insert(sql, params).await;
        Self::swallow("INSERT", sql, None, result.map(Some))
    }

    /// Whether the statement executed, regardless of rows matched
    pub async fn update(&self, sql: &str, params: Vec<Value>) -> bool {
        let result = self.inner.update(sql, params).await;
        Self::swallow("UPDATE", sql, false, result.map(|_| true))
    }

    /// Whether the statement executed, regardless of rows matched
    pub async fn delete(&self, sql: &str, params: Vec<Value>) -> bool {
        let result = self.inner.delete(sql, params).await;
        Self::swallow("DELETE", sql, false, result.map(|_| true))
    }

    /// Whether the statement executed
    pub async fn execute(&self, sql: &str, params: Vec<Value>) -> bool {
        let result = self.inner.execute(sql, params).await;
        Self::swallow("EXECUTE", sql, false, result.map(|_| true))
    }

    /// Rows affected or matched, or zero on failure
    pub async fn row_count(&self, sql: &str, params: Vec<Value>) -> i64 {
        let result = self.inner.row_count(sql, params).await;
        Self::swallow("ROW_COUNT", sql, 0, result)
    }

    /// Whether the database currently answers a trivial round trip
    pub async fn is_healthy(&self) -> bool {
        self.inner.is_healthy().await
    }
}
