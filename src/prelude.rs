//! Convenience re-exports for common Rowhaus usage
//!
//! This prelude re-exports the most commonly used items from the Rowhaus
//! ecosystem, making it easier to import everything you need with a single
//! use statement.
//!
//! # Example
//!
//! ```rust
//! use rowhaus::prelude::*;
//!
//! // Now you have access to all the common Rowhaus types and traits
//! ```

// Core Rowhaus components
pub use crate::core::Rowhaus;
pub use crate::errors::RowhausError;

// Re-export centralized config
pub use config::{AppConfig, ConfigError, DatabaseConfig, GatewayConfig};

// Re-export commonly used record-gateway types for convenience
pub use record_gateway::prelude::*;

// Re-export the gateway crate itself
pub use record_gateway;

// Common external dependencies
pub use anyhow;
pub use async_trait;
pub use sqlx;
pub use tokio;

// Commonly used sqlx types
pub use sqlx::{PgPool, Postgres, Row, Transaction};
