//! Service layer providing the store repository on top of models.
//! - Separates persistence from the HTTP handlers.
//! - Reuses validation and document definitions in the `models` crate.
//! - Provides clear error types and a trait boundary for tests.

pub mod errors;
pub mod store;
