//! SolSync domain core.
//!
//! Pure business logic for the solar installation management system:
//! pipeline stage transitions, windowed production metrics, and the
//! operational alert lifecycle. No storage access: callers fetch records
//! from the `solsync-store` crate and pass them in.

pub mod alerts;
pub mod clients;
pub mod dashboard;
pub mod error;
pub mod metrics;
pub mod pipeline;
pub mod types;
pub mod validate;

pub use error::CoreError;
