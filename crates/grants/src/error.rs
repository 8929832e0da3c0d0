//! Grant error types.

use thiserror::Error;

/// Errors raised while normalizing entries or loading a manifest.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The entry's domain could not be turned into an origin.
    #[error("invalid origin '{domain}': {reason}")]
    InvalidOrigin { domain: String, reason: String },

    /// Failed to parse a manifest file.
    #[error("failed to parse manifest: {0}")]
    Parse(String),

    /// An I/O error occurred while reading a manifest.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
