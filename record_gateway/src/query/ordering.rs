//! Query construction
//!
//! Typed ORDER BY specifications.

use crate::validation::{ValidatedFieldName, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Ordered list of sort columns with validated names
#[derive(Debug, Clone, Default)]
pub struct OrderBy {
    columns: Vec<(ValidatedFieldName, SortOrder)>,
}

impl OrderBy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sort column
    pub fn column(mut self, column: &str, order: SortOrder) -> Result<Self, ValidationError> {
        self.columns.push((ValidatedFieldName::new(column)?, order));
        Ok(self)
    }

    /// Add an ascending sort column
    pub fn asc(self, column: &str) -> Result<Self, ValidationError> {
        self.column(column, SortOrder::Asc)
    }

    /// Add a descending sort column
    pub fn desc(self, column: &str) -> Result<Self, ValidationError> {
        self.column(column, SortOrder::Desc)
    }

    pub fn columns(&self) -> &[(ValidatedFieldName, SortOrder)] {
        &self.columns
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }
}
