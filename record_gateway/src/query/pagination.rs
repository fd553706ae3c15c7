//! Query construction
//!
//! Pagination bookkeeping.

use crate::record::Record;
use serde::Serialize;

/// One page of rows plus the counters a paginated listing needs
///
/// `last_page` is the ceiling of `total / per_page`; an empty result set has
/// `last_page` zero while `current_page` stays at the requested page.
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    pub rows: Vec<Record>,
    pub total: i64,
    pub per_page: i64,
    pub current_page: i64,
    pub last_page: i64,
}

impl Page {
    pub fn new(rows: Vec<Record>, total: i64, per_page: i64, current_page: i64) -> Self {
        let last_page = if total == 0 {
            0
        } else {
            (total + per_page - 1) / per_page
        };

        Self {
            rows,
            total,
            per_page,
            current_page,
            last_page,
        }
    }

    /// Whether pages beyond the current one exist
    pub fn has_more(&self) -> bool {
        self.current_page < self.last_page
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

/// Page numbers below one are treated as the first page
pub(crate) fn clamp_page(page: i64) -> i64 {
    page.max(1)
}

/// Resolve a requested page size against the configured default and ceiling
pub(crate) fn resolve_per_page(requested: Option<i64>, default_size: i64, max_size: i64) -> i64 {
    requested.unwrap_or(default_size).clamp(1, max_size.max(1))
}

pub(crate) fn offset_for(page: i64, per_page: i64) -> i64 {
    (page - 1) * per_page
}
