//! # Wortschatz Common Library
//!
//! Shared code for the Wortschatz vocabulary harvester:
//! - Error types
//! - Configuration loading and data directory resolution
//! - Database initialization and schema

pub mod config;
pub mod db;
pub mod error;

pub use config::StoreConfig;
pub use error::{Error, Result};
