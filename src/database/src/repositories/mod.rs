//! Repository pattern implementation for the MediaMind database layer
//!
//! The log is append-only: repositories expose inserts and reads, never
//! updates or deletes.

pub mod activity_logs;

pub use activity_logs::*;
