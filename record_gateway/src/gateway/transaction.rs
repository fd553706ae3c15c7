//! Record gateway
//!
//! Transactional variants of the write operations. The caller owns the
//! transaction; several gateways can write into the same one before a
//! single commit.

use super::core::RecordGateway;
use crate::errors::GatewayError;
use crate::query::SqlGenerator;
use crate::record::Record;
use crate::session::SessionTransaction;
use serde_json::Value;

impl RecordGateway {
    /// Begin a transaction on the underlying session
    pub async fn begin_transaction(&self) -> Result<SessionTransaction<'static>, GatewayError> {
        self.session()
            .begin()
            .await
            .map_err(|e| GatewayError::database_operation(self.meta().table_name(), "begin", e))
    }

    /// Insert inside a caller-managed transaction
    ///
    /// Same payload handling as `create`; the row only becomes visible once
    /// the caller commits.
    pub async fn create_tx(
        &self,
        tx: &mut SessionTransaction<'_>,
        data: Record,
    ) -> Result<Value, GatewayError> {
        let pairs = self.fillable_pairs(&data)?;
        if pairs.is_empty() {
            return Err(GatewayError::no_fillable_columns(self.meta().table_name()));
        }

        let (sql, params) =
            SqlGenerator::build_insert(self.meta().table(), self.meta().primary_key(), &pairs);

        tracing::debug!("[CREATE_TX] Table: {}", self.meta().table_name());
        tracing::debug!("[CREATE_TX] SQL: {}", sql);

        tx.insert(&sql, params)
            .await
            .map_err(|e| GatewayError::database_operation(self.meta().table_name(), "create", e))
    }

    /// Update inside a caller-managed transaction
    pub async fn update_tx(
        &self,
        tx: &mut SessionTransaction<'_>,
        id: &Value,
        data: Record,
    ) -> Result<bool, GatewayError> {
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

        tx.update(&sql, params)
            .await
            .map_err(|e| GatewayError::database_operation(self.meta().table_name(), "update", e))
    }

    /// Delete inside a caller-managed transaction
    pub async fn remove_tx(
        &self,
        tx: &mut SessionTransaction<'_>,
        id: &Value,
    ) -> Result<bool, GatewayError> {
        let (sql, params) =
            SqlGenerator::build_delete_by_id(self.meta().table(), self.meta().primary_key(), id);

        tx.delete(&sql, params)
            .await
            .map_err(|e| GatewayError::database_operation(self.meta().table_name(), "remove", e))
    }
}
