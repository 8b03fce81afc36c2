//! rofsim: an in-memory read-only file system simulator.
//!
//! **rofsim models the immutability guarantees of read-only media**
//! (SquashFS, ISO 9660, CRAMFS) as a mode-gated hierarchical store.
//!
//! Clients mutate a tree of named items (files and folders) through a
//! [`Store`], which can be flipped between read-write and read-only at any
//! time. Every attempted mutation, successful or blocked, produces
//! exactly one record in an append-only [`OperationLog`], mirrored to a
//! durable plain-text sink.
//!
//! # Core Principles
//!
//! - **Gated**: every mutating call passes one permission gate first;
//!   blocked calls leave the tree untouched and are still audited.
//! - **Audited**: the tree mutation and its log record form one atomic
//!   unit; a reader never observes one without the other.
//! - **Derived, never cached**: paths and sizes are recomputed from the
//!   current tree on every query.
//! - **In-memory**: there is no block device and no crash recovery of the
//!   tree; only the audit log is persisted.
//!
//! # Architecture
//!
//! The tree lives in an arena: nodes are stored in a flat id-keyed table
//! ([`core::tree::Tree`]), folders hold child *ids*, and parent links are
//! plain ids used only for path derivation. Deleting a node drops its
//! whole subtree from the table; ids are never reused.
//!
//! The [`Store`] owns the tree, the read-only flag, and the log. The log
//! writes through an injected [`core::log::LogSink`], so tests can swap
//! the file sink for an in-memory double.
//!
//! # Example
//!
//! ```no_run
//! use rofsim::Store;
//!
//! let mut store = Store::with_log_file("acciones.log");
//! let docs = store.create_folder("documents", None).unwrap();
//! store.create_file("readme.txt", "hello", Some(docs)).unwrap();
//!
//! store.set_read_only(true);
//! assert!(store.create_file("nope.txt", "", None).is_err());
//! ```

pub mod core;

pub use crate::core::error::FsError;
pub use crate::core::log::{FileSink, LogRecord, LogSink, MemorySink, OpKind, OperationLog};
pub use crate::core::store::{ItemInfo, Statistics, Store};
pub use crate::core::tree::{ItemKind, Node, NodeId};
