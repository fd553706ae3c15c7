//! Table metadata
//!
//! Static description of one table: its name, primary key column, and the
//! fillable whitelist applied to write payloads. Identifiers are validated at
//! construction so a gateway never interpolates an unchecked name into SQL.

use crate::validation::{ValidatedFieldName, ValidatedTableName, ValidationError};

/// Configuration for a single table served by a gateway
///
/// # Example
/// ```ignore
/// let meta = TableMeta::new("students")?
///     .with_fillable(&["first_name", "last_name", "email", "phone"])?;
/// ```
#[derive(Debug, Clone)]
pub struct TableMeta {
    table: ValidatedTableName,
    primary_key: ValidatedFieldName,
    fillable: Vec<ValidatedFieldName>,
}

impl TableMeta {
    /// Describe a table with the default `id` primary key and no whitelist
    pub fn new(table: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            table: ValidatedTableName::new(table)?,
            primary_key: ValidatedFieldName::new("id")?,
            fillable: Vec::new(),
        })
    }

    /// Use a primary key column other than `id`
    pub fn with_primary_key(mut self, primary_key: &str) -> Result<Self, ValidationError> {
        self.primary_key = ValidatedFieldName::new(primary_key)?;
        Ok(self)
    }

    /// Restrict write payloads to the given columns
    ///
    /// An empty whitelist means every payload key is accepted.
    pub fn with_fillable(mut self, fillable: &[&str]) -> Result<Self, ValidationError> {
        self.fillable = fillable
            .iter()
            .map(|name| ValidatedFieldName::new(name))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self)
    }

    pub fn table(&self) -> &ValidatedTableName {
        &self.table
    }

    pub fn table_name(&self) -> &str {
        self.table.as_str()
    }

    pub fn primary_key(&self) -> &ValidatedFieldName {
        &self.primary_key
    }

    pub fn fillable(&self) -> &[ValidatedFieldName] {
        &self.fillable
    }

    /// Whether a payload key survives the fillable filter
    pub fn is_fillable(&self, column: &str) -> bool {
        self.fillable.is_empty() || self.fillable.iter().any(|f| f.as_str() == column)
    }
}
