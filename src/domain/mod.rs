//! Domain layer types and invariants.

pub mod error;
pub mod forms;
pub mod routes;
pub mod session;
