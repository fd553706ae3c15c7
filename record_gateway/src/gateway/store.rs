//! Record gateway
//!
//! The [`RecordStore`] implementation: every read and write the gateway
//! offers, assembled from validated fragments and executed on the shared
//! session.

use super::core::RecordGateway;
use crate::errors::GatewayError;
use crate::query::pagination::{clamp_page, offset_for, resolve_per_page};
use crate::query::{Conditions, OrderBy, Page, SqlGenerator};
use crate::record::Record;
use crate::traits::RecordStore;
use async_trait::async_trait;
use serde_json::Value;

impl RecordGateway {
    // Clauses arrive with their keywords included; empty ones are skipped
    fn select_sql(&self, where_clause: &str, order_clause: &str, limit_clause: &str) -> String {
        let table = self.meta().table_name();
        let mut sql = String::with_capacity(
            14 + table.len() + where_clause.len() + order_clause.len() + limit_clause.len() + 3,
        );
        sql.push_str("SELECT * FROM ");
        sql.push_str(table);
        if !where_clause.is_empty() {
            sql.push(' ');
            sql.push_str(where_clause);
        }
        if !order_clause.is_empty() {
            sql.push(' ');
            sql.push_str(order_clause);
        }
        if !limit_clause.is_empty() {
            sql.push(' ');
            sql.push_str(limit_clause);
        }
        sql
    }
}

#[async_trait]
impl RecordStore for RecordGateway {
    fn table_name(&self) -> &str {
        self.meta().table_name()
    }

    async fn list_all(
        &self,
        conditions: &Conditions,
        order_by: &OrderBy,
        limit: Option<i64>,
    ) -> Result<Vec<Record>, GatewayError> {
        let (where_clause, params) = SqlGenerator::build_where_clause(conditions);
        let order_clause = SqlGenerator::build_order_clause(order_by);
        let limit_clause = SqlGenerator::build_limit_clause(limit, None);
        let sql = self.select_sql(&where_clause, &order_clause, &limit_clause);

        tracing::debug!("[LIST_ALL] Table: {}", self.meta().table_name());
        tracing::debug!("[LIST_ALL] SQL: {}", sql);

        self.session()
            .select_many(&sql, params)
            .await
            .map_err(|e| GatewayError::database_operation(self.meta().table_name(), "list_all", e))
    }

    async fn get_by_id(&self, id: &Value) -> Result<Option<Record>, GatewayError> {
        let sql = format!(
            "SELECT * FROM {} WHERE {} = $1",
            self.meta().table_name(),
            self.meta().primary_key().as_str()
        );

        self.session()
            .select_one(&sql, vec![id.clone()])
            .await
            .map_err(|e| GatewayError::database_operation(self.meta().table_name(), "get_by_id", e))
    }

    async fn get_one(&self, conditions: &Conditions) -> Result<Option<Record>, GatewayError> {
        let (where_clause, params) = SqlGenerator::build_where_clause(conditions);
        let limit_clause = SqlGenerator::build_limit_clause(Some(1), None);
        let sql = self.select_sql(&where_clause, "", &limit_clause);

        self.session()
            .select_one(&sql, params)
            .await
            .map_err(|e| GatewayError::database_operation(self.meta().table_name(), "get_one", e))
    }

    async fn paginate(
        &self,
        page: i64,
        per_page: Option<i64>,
        conditions: &Conditions,
        order_by: &OrderBy,
    ) -> Result<Page, GatewayError> {
        let current_page = clamp_page(page);
        let per_page = resolve_per_page(
            per_page,
            self.defaults().default_page_size,
            self.defaults().max_page_size,
        );
        let offset = offset_for(current_page, per_page);

        // Total first, then the page slice; both share the same conditions
        let total = self.count(conditions).await?;

        let (where_clause, params) = SqlGenerator::build_where_clause(conditions);
        let order_clause = SqlGenerator::build_order_clause(order_by);
        let limit_clause = SqlGenerator::build_limit_clause(Some(per_page), Some(offset));
        let sql = self.select_sql(&where_clause, &order_clause, &limit_clause);

        tracing::debug!("[PAGINATE] Table: {}", self.meta().table_name());
        tracing::debug!("[PAGINATE] SQL: {}", sql);

        let rows = self
            .session()
            .select_many(&sql, params)
            .await
            .map_err(|e| GatewayError::database_operation(self.meta().table_name(), "paginate", e))?;

        Ok(Page::new(rows, total, per_page, current_page))
    }

    async fn create(&self, data: Record) -> Result<Value, GatewayError> {
        let pairs = self.fillable_pairs(&data)?;
        if pairs.is_empty() {
            return Err(GatewayError::no_fillable_columns(self.meta().table_name()));
        }

        let (sql, params) =
            SqlGenerator::build_insert(self.meta().table(), self.meta().primary_key(), &pairs);

        tracing::debug!("[CREATE] Table: {}", self.meta().table_name());
        tracing::debug!("[CREATE] SQL: {}", sql);

        self.session()
            .insert(&sql, params)
            .await
            .map_err(|e| GatewayError::database_operation(self.meta().table_name(), "create", e))
    }

    async fn update(&self, id: &Value, data: Record) -> Result<bool, GatewayError> {
        let pairs = self.fillable_pairs(&data)?;
        if pairs.is_empty() {
            return Err(GatewayError::no_fillable_columns(self.meta().table_name()));
        }

        let (sql, params) = SqlGenerator::build_update_by_id(
            self.meta().table(),
            self.meta().primary_key(),
            &pairs,
            id,
        );

        tracing::debug!("[UPDATE] Table: {}", self.meta().table_name());
        tracing::debug!("[UPDATE] SQL: {}", sql);

        self.session()
            .update(&sql, params)
            .await
            .map_err(|e| GatewayError::database_operation(self.meta().table_name(), "update", e))
    }

    async fn remove(&self, id: &Value) -> Result<bool, GatewayError> {
        let (sql, params) =
            SqlGenerator::build_delete_by_id(self.meta().table(), self.meta().primary_key(), id);

        self.session()
            .delete(&sql, params)
            .await
            .map_err(|e| GatewayError::database_operation(self.meta().table_name(), "remove", e))
    }

    async fn count(&self, conditions: &Conditions) -> Result<i64, GatewayError> {
        let (where_clause, params) = SqlGenerator::build_where_clause(conditions);
        let table = self.meta().table_name();
        let mut sql = String::with_capacity(30 + table.len() + where_clause.len() + 1);
        sql.push_str("SELECT COUNT(*) AS total FROM ");
        sql.push_str(table);
        if !where_clause.is_empty() {
            sql.push(' ');
            sql.push_str(&where_clause);
        }

        let row = self
            .session()
            .select_one(&sql, params)
            .await
            .map_err(|e| GatewayError::database_operation(table, "count", e))?;

        let total = row
            .and_then(|record| record.get("total").and_then(Value::as_i64))
            .unwrap_or(0);

        Ok(total)
    }

    async fn exists(&self, conditions: &Conditions) -> Result<bool, GatewayError> {
        let total = self.count(conditions).await?;
        Ok(total > 0)
    }

    async fn run_query(&self, sql: &str, params: Vec<Value>) -> Result<Vec<Record>, GatewayError> {
        tracing::debug!("[RUN_QUERY] Table: {}", self.meta().table_name());
        tracing::debug!("[RUN_QUERY] SQL: {}", sql);

        self.session()
            .select_many(sql, params)
            .await
            .map_err(|e| GatewayError::database_operation(self.meta().table_name(), "run_query", e))
    }

    async fn run_query_one(
        &self,
        sql: &str,
        params: Vec<Value>,
    ) -> Result<Option<Record>, GatewayError> {
        self.session()
            .select_one(sql, params)
            .await
            .map_err(|e| {
                GatewayError::database_operation(self.meta().table_name(), "run_query_one", e)
            })
    }
}
