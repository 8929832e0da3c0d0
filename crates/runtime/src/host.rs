//! Host collaborator traits.
//!
//! These are the boundary between the installer and the application hosting
//! it: the prompt surface and the component registry used for self-removal.

use thiserror::Error;

/// Failure inside a host collaborator.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Unavailable(String),
}

/// User-facing dialogs.
pub trait Prompt {
    /// Show a blocking yes/no question. `Ok(true)` means accepted.
    fn confirm(&self, title: &str, message: &str) -> Result<bool, HostError>;

    /// Show a blocking, dismissible notice.
    fn alert(&self, title: &str, message: &str);
}

/// An installed component that can remove itself.
pub trait Component {
    fn uninstall(self: Box<Self>) -> Result<(), HostError>;
}

/// Looks up installed components by identifier.
pub trait ComponentRegistry {
    fn lookup(&self, id: &str) -> Result<Option<Box<dyn Component>>, HostError>;
}
