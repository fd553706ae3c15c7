//! Query construction
//!
//! This module turns typed condition, ordering and pagination inputs into
//! SQL fragments with numbered placeholders. Identifiers are validated
//! before they reach a statement; values only ever travel as bound
//! parameters.

pub mod conditions;
pub mod ordering;
pub mod pagination;
pub mod sql;


pub use conditions::{Conditions, Op, Predicate};
pub use ordering::{OrderBy, SortOrder};
pub use pagination::Page;
pub use sql::SqlGenerator;
