//! Flat in-memory record store and glue for the SolSync domain core.
//!
//! Four independent, insertion-ordered record sets with synchronous
//! accessors. Identity comes from UUIDv7 strings; time-dependent
//! operations take an explicit `now` so tests stay deterministic
//! (production callers use [`time::now`]).

pub mod ids;
pub mod models;
pub mod seed;
pub mod store;
pub mod time;

pub use store::RecordStore;
