//! Database abstraction layer
//!
//! This module provides the interface for schema discovery, row retrieval
//! and row mutation, with a SQLite implementation.

pub mod sqlite;
pub mod traits;

// Re-export the main trait
pub use traits::{DatabaseError, DatabaseProvider};
