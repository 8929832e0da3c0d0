use thiserror::Error;

/// The step of a run an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Confirming,
    Applying,
    Finalizing,
}

/// Errors caught and reported during a run.
///
/// None of these escape [`ApplicationEngine::run`](crate::ApplicationEngine::run).
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid origin for entry {index} ('{domain}'): {reason}")]
    InvalidOrigin {
        index: usize,
        domain: String,
        reason: String,
    },

    #[error("failed to write {grant} for {origin} (entry {index}): {source}")]
    StoreWrite {
        index: usize,
        origin: String,
        grant: String,
        #[source]
        source: storage::Error,
    },

    #[error("could not remove {id}: {reason}")]
    Uninstall { id: String, reason: String },

    #[error("confirmation prompt failed: {0}")]
    Prompt(String),

    #[error("host lifecycle error: {0}")]
    Lifecycle(String),
}

impl Error {
    pub fn phase(&self) -> Phase {
        match self {
            Error::InvalidOrigin { .. } | Error::StoreWrite { .. } => Phase::Applying,
            Error::Prompt(_) | Error::Lifecycle(_) => Phase::Confirming,
            Error::Uninstall { .. } => Phase::Finalizing,
        }
    }

    /// Attach an entry index to a normalization failure.
    pub(crate) fn from_grants(index: usize, err: grants::Error) -> Self {
        match err {
            grants::Error::InvalidOrigin { domain, reason } => Error::InvalidOrigin {
                index,
                domain,
                reason,
            },
            other => Error::InvalidOrigin {
                index,
                domain: String::new(),
                reason: other.to_string(),
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
