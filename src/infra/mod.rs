//! Infrastructure adapters: HTTP transport, credential storage and telemetry.

pub mod credentials;
pub mod error;
pub mod telemetry;
pub mod transport;
