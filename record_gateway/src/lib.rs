//! Record Gateway - Core data-access layer for Rowhaus
//!
//! This crate provides the foundational types for table-oriented database
//! access: a pooled session with typed query primitives, a generic per-table
//! gateway, a condition compiler, and validation utilities.

pub mod errors;
pub mod gateway;
pub mod prelude;
pub mod query;
pub mod record;
pub mod rules;
pub mod session;
pub mod table_meta;
pub mod traits;
pub mod validation;

pub use errors::GatewayError;
pub use gateway::RecordGateway;
pub use query::{Conditions, Op, OrderBy, Page, Predicate, SortOrder, SqlGenerator};
pub use record::{from_record, to_record, Record};
pub use rules::{FieldErrors, FieldRules, Rule, RuleParseError, RuleSet};
pub use session::{DbSession, LenientSession, SessionTransaction};
pub use table_meta::TableMeta;
pub use traits::RecordStore;
pub use validation::{ValidatedFieldName, ValidatedTableName, ValidationError};

use sqlx::PgPool;

pub type DbPool = PgPool;
