//! Record gateway
//!
//! Gateway construction and payload handling.

use crate::record::Record;
use crate::rules::{FieldErrors, RuleSet};
use crate::session::DbSession;
use crate::table_meta::TableMeta;
use crate::validation::{ValidatedFieldName, ValidationError};
use config::GatewayConfig;
use serde_json::Value;

/// Data-access gateway for a single table
///
/// Pairs the shared [`DbSession`] with one table's metadata. The same
/// implementation serves every table; construct one gateway per
/// [`TableMeta`] and clone it freely, clones share the session pool.
#[derive(Clone)]
pub struct RecordGateway {
    session: DbSession,
    meta: TableMeta,
    defaults: GatewayConfig,
}

impl RecordGateway {
    /// Create a gateway with stock pagination defaults
    pub fn new(session: DbSession, meta: TableMeta) -> Self {
        Self::with_defaults(session, meta, GatewayConfig::default())
    }

    /// Create a gateway with explicit pagination defaults
    pub fn with_defaults(session: DbSession, meta: TableMeta, defaults: GatewayConfig) -> Self {
        Self {
            session,
            meta,
            defaults,
        }
    }

    pub fn session(&self) -> &DbSession {
        &self.session
    }

    pub fn meta(&self) -> &TableMeta {
        &self.meta
    }

    pub fn defaults(&self) -> &GatewayConfig {
        &self.defaults
    }

    /// Drop payload keys that are not on the fillable whitelist
    ///
    /// An empty whitelist lets the whole payload through unchanged.
    pub fn filter_fillable(&self, data: &Record) -> Record {
        if self.meta.fillable().is_empty() {
            return data.clone();
        }

        let mut filtered = Record::new();
        for column in self.meta.fillable() {
            if let Some(value) = data.get(column.as_str()) {
                filtered.insert(column.as_str().to_string(), value.clone());
            }
        }
        filtered
    }

    /// Payload as validated column/value pairs ready for statement assembly
    ///
    /// With a whitelist the pairs follow its declaration order and already
    /// carry validated names. Without one, every payload key is validated
    /// here so arbitrary keys still cannot smuggle SQL into a statement.
    pub(crate) fn fillable_pairs(
        &self,
        data: &Record,
    ) -> Result<Vec<(ValidatedFieldName, Value)>, ValidationError> {
        if self.meta.fillable().is_empty() {
            return data
                .iter()
                .map(|(key, value)| Ok((ValidatedFieldName::new(key)?, value.clone())))
                .collect();
        }

        let mut pairs = Vec::with_capacity(self.meta.fillable().len());
        for column in self.meta.fillable() {
            if let Some(value) = data.get(column.as_str()) {
                pairs.push((column.clone(), value.clone()));
            }
        }
        Ok(pairs)
    }

    /// Validate a payload against a rule set
    ///
    /// Returns one message per failing field; an empty map means the payload
    /// passed.
    pub fn validate_fields(&self, data: &Record, rules: &RuleSet) -> FieldErrors {
        rules.validate(data)
    }
}

impl std::fmt::Debug for RecordGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordGateway")
            .field("table", &self.meta.table_name())
            .field("primary_key", &self.meta.primary_key().as_str())
            .finish()
    }
}
