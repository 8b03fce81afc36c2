//! Core modules for the simulated file system.
//!
//! Everything with real behavior lives here: the arena tree model, the
//! mode-gated store orchestrator, the audit log, and shared primitives.

pub mod error;
pub mod log;
pub mod store;
pub mod time;
pub mod tree;
