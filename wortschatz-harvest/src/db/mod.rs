//! Store operations over the shared SQLite pool
//!
//! One module per entity. Every function is a single transaction-scoped
//! unit of work; nothing here holds a connection across network I/O.

pub mod staging;
pub mod tags;
pub mod vocabulary;
