//! # Rowhaus
//!
//! A PostgreSQL data-access layer built around one shared database session
//! and per-table record gateways: dynamic records, filtered listing,
//! pagination, fillable write filtering and pipe-delimited field rules.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rowhaus::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig {
//!         database: DatabaseConfig::new(
//!             "localhost".to_string(), 5432, "driving_school".to_string(),
//!             "postgres".to_string(), "password".to_string(),
//!             1, 5, 30, 600, 3600,
//!         ),
//!         gateway: GatewayConfig::default(),
//!     };
//!
//!     let mut rowhaus = Rowhaus::new(config).await?;
//!
//!     let students = TableMeta::new("students")?
//!         .with_fillable(&["first_name", "last_name", "email"])?;
//!     rowhaus.register_gateway("students".to_string(), students)?;
//!
//!     let students = rowhaus.gateway("students")?;
//!
//!     let mut record = Record::new();
//!     record.insert("first_name".to_string(), json!("Anna"));
//!     record.insert("last_name".to_string(), json!("Jansen"));
//!     record.insert("email".to_string(), json!("anna@example.com"));
//!
//!     let id = students.create(record).await?;
//!     println!("Created student: {}", id);
//!
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod errors;
pub mod prelude;

// Re-export the main public types for convenience
pub use core::Rowhaus;
pub use errors::RowhausError;

// Re-export centralized config
pub use config::{AppConfig, ConfigError, DatabaseConfig, GatewayConfig};

// Re-export the gateway crate that carries the public data-access API
pub use record_gateway;

// Re-export external dependencies used in public API
pub use async_trait;
pub use sqlx;
