//! Self-removal by deleting the installer manifest.

use std::path::PathBuf;

use runtime::{Component, ComponentRegistry, HostError};
use tracing::debug;

/// Knows one component: the manifest this process was started with.
pub struct ManifestRegistry {
    id: String,
    manifest: PathBuf,
}

impl ManifestRegistry {
    pub fn new(id: impl Into<String>, manifest: impl Into<PathBuf>) -> Self {
        Self {
            id: id.into(),
            manifest: manifest.into(),
        }
    }
}

impl ComponentRegistry for ManifestRegistry {
    fn lookup(&self, id: &str) -> Result<Option<Box<dyn Component>>, HostError> {
        if id != self.id || !self.manifest.try_exists()? {
            return Ok(None);
        }
        Ok(Some(Box::new(ManifestComponent {
            path: self.manifest.clone(),
        })))
    }
}

struct ManifestComponent {
    path: PathBuf,
}

impl Component for ManifestComponent {
    fn uninstall(self: Box<Self>) -> Result<(), HostError> {
        std::fs::remove_file(&self.path)?;
        debug!(path = %self.path.display(), "manifest removed");
        Ok(())
    }
}
