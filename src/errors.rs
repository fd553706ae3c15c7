//! Error types for the Rowhaus crate
//!
//! This module contains all error types that can be returned by Rowhaus operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RowhausError {
    #[error("Database connection error: {0}")]
    DatabaseConnection(#[from] sqlx::Error),

    #[error("Gateway not found: {0}")]
    GatewayNotFound(String),

    #[error("Gateway already registered: {0}")]
    GatewayAlreadyRegistered(String),

    #[error("Configuration error: {0}")]
    Configuration(#[from] config::ConfigError),
}
