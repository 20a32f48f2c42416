//! # Wortschatz Harvest
//!
//! Staging and approval core for the German vocabulary harvester:
//! - Vocabulary store (permanent words, tags, difficulty)
//! - Staging store (session-scoped candidates awaiting review)
//! - Approval workflow (atomic promotion or rejection)
//! - Session lifecycle manager and multi-session coordinator
//! - Harvest pipeline and translation lookup

pub mod db;
pub mod models;
pub mod pipeline;
pub mod review;
pub mod services;
pub mod session;

pub use wortschatz_common::{Error, Result};
