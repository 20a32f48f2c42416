//! Database module
//!
//! Initialization and schema for the SQLite database shared by the
//! vocabulary and staging stores.

pub mod init;

pub use init::{apply_schema, init_database, init_memory_database};
