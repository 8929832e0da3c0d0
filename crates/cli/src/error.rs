//! CLI error types.

use std::path::PathBuf;
use thiserror::Error;

/// CLI errors.
///
/// Only setup failures end up here; a run itself reports through the
/// terminal and never fails.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The grant database file does not exist.
    #[error("database not found at {path}. Run 'ctpm-installer run' first")]
    DatabaseNotFound { path: PathBuf },

    /// The manifest could not be read or parsed.
    #[error(transparent)]
    Manifest(#[from] grants::Error),

    /// An error occurred in the storage layer.
    #[error(transparent)]
    Storage(#[from] storage::Error),

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
