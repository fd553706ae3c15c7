use crate::validation::ValidationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Database error during {operation} on {table}: {source}")]
    Database {
        table: String,
        operation: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("No fillable columns in payload for table {0}")]
    NoFillableColumns(String),

    #[error("Invalid identifier: {0}")]
    Identifier(#[from] ValidationError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl GatewayError {
    /// Wrap a driver error with the table and operation it came from
    pub fn database_operation(table: &str, operation: &'static str, source: sqlx::Error) -> Self {
        Self::Database {
            table: table.to_string(),
            operation,
            source,
        }
    }

    pub fn no_fillable_columns(table: &str) -> Self {
        Self::NoFillableColumns(table.to_string())
    }
}
