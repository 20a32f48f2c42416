//! Session lifecycle
//!
//! A processing session owns the identity, status and statistics of one
//! text submission. Session metadata is durable — one JSON record per
//! session — independent of whether the session's staged candidates still
//! exist.

pub mod lifecycle;
pub mod manager;
pub mod store;

pub use lifecycle::ProcessingSession;
pub use manager::SessionManager;
pub use store::SessionStore;
