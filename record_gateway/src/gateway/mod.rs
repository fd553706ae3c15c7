//! Record gateway
//!
//! One configurable gateway per table: filtered listing, pagination, CRUD,
//! raw passthrough and transactional writes over the shared session.

pub mod core;
pub mod store;
pub mod transaction;

#[cfg(test)]
mod tests;

pub use core::RecordGateway;
