use std::io;
use thiserror::Error;

/// Error taxonomy for the simulated file system.
///
/// Every variant is recoverable by the caller; nothing in the core
/// aborts the process. `Io` is raised only by explicit log exports;
/// routine sink writes absorb their own failures (see
/// [`crate::core::log::OperationLog::record`]).
#[derive(Error, Debug)]
pub enum FsError {
    /// A mutating operation was attempted while the read-only flag is
    /// set. Counterpart of EROFS on a real read-only mount.
    #[error(
        "operation '{operation}' not allowed: file system is mounted as read-only (SquashFS / ISO 9660 behavior)"
    )]
    ReadOnly { operation: String },
    /// A create or rename collided with an existing sibling name (EEXIST).
    #[error("item '{0}' already exists")]
    AlreadyExists(String),
    /// A lookup by name, path, or id failed to resolve (ENOENT).
    #[error("item '{0}' not found in file system")]
    NotFound(String),
    /// Structurally disallowed request, e.g. deleting root (EINVAL).
    #[error("invalid operation: {0}")]
    InvalidOperation(String),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl FsError {
    /// Name of the gated operation, when this is a read-only rejection.
    pub fn blocked_operation(&self) -> Option<&str> {
        match self {
            FsError::ReadOnly { operation } => Some(operation),
            _ => None,
        }
    }
}
