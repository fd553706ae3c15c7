//! Trait definitions
//!
//! This module defines the common surface every record store exposes.

use crate::errors::GatewayError;
use crate::query::{Conditions, OrderBy, Page};
use crate::record::Record;
use async_trait::async_trait;
use serde_json::Value;

/// Common data-access operations for one table
///
/// Rows travel as dynamic [`Record`] maps, so one implementation serves any
/// table; per-table behavior comes from its metadata rather than from
/// per-entity subtypes.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// The table this store serves
    fn table_name(&self) -> &str;

    /// List rows matching the conditions, with optional ordering and row cap
    async fn list_all(
        &self,
        conditions: &Conditions,
        order_by: &OrderBy,
        limit: Option<i64>,
    ) -> Result<Vec<Record>, GatewayError>;

    /// Look up a single row by primary key
    async fn get_by_id(&self, id: &Value) -> Result<Option<Record>, GatewayError>;

    /// First row matching the conditions, if any
    async fn get_one(&self, conditions: &Conditions) -> Result<Option<Record>, GatewayError>;

    /// One page of rows plus total and page counters
    async fn paginate(
        &self,
        page: i64,
        per_page: Option<i64>,
        conditions: &Conditions,
        order_by: &OrderBy,
    ) -> Result<Page, GatewayError>;

    /// Insert a row and return its generated key
    async fn create(&self, data: Record) -> Result<Value, GatewayError>;

    /// Update a row by primary key; Ok(true) when a row changed
    async fn update(&self, id: &Value, data: Record) -> Result<bool, GatewayError>;

    /// Delete a row by primary key; Ok(true) when a row was removed
    async fn remove(&self, id: &Value) -> Result<bool, GatewayError>;

    /// Count rows matching the conditions
    async fn count(&self, conditions: &Conditions) -> Result<i64, GatewayError>;

    /// Whether any row matches the conditions
    async fn exists(&self, conditions: &Conditions) -> Result<bool, GatewayError>;

    /// Run a raw statement against this store's session
    async fn run_query(&self, sql: &str, params: Vec<Value>) -> Result<Vec<Record>, GatewayError>;

    /// Run a raw statement and keep only the first row
    async fn run_query_one(
        &self,
        sql: &str,
        params: Vec<Value>,
    ) -> Result<Option<Record>, GatewayError>;
}
