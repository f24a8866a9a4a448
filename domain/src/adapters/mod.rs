//! Adapters that live inside the domain crate.
//!
//! The in-memory registry is the production store: short links only need to
//! live as long as the process. DNS resolution is IO and lives in the app.

pub mod memory_repo;
