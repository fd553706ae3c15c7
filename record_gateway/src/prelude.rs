//! Convenience re-exports for common record-gateway usage

// Core trait
pub use crate::traits::RecordStore;

// Error types
pub use crate::errors::GatewayError;

// Gateway and its configuration
pub use crate::gateway::RecordGateway;
pub use crate::table_meta::TableMeta;

// Session surfaces
pub use crate::session::{DbSession, LenientSession, SessionTransaction};

// Records
pub use crate::record::{from_record, to_record, Record};

// Query building
pub use crate::query::{Conditions, OrderBy, Page, SortOrder};

// Field rules
pub use crate::rules::{FieldErrors, RuleSet};

// Validation
pub use crate::validation::{ValidatedFieldName, ValidatedTableName, ValidationError};

// Common external dependencies that are frequently used
pub use async_trait::async_trait;
pub use serde::{Deserialize, Serialize};
pub use serde_json::json;
pub use sqlx::PgPool;
pub use uuid::Uuid;
