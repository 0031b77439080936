//! Database connection management
//!
//! Pool construction for the SQLite activity log.

pub mod sqlite;

pub use sqlite::SqliteConnection;
