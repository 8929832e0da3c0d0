//! Installer manifest loaded from TOML.

use crate::{Error, PermissionEntry, Result};
use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_TITLE: &str = "Click-to-Play Manager";

pub const DEFAULT_WARNING: &str = "The following list of permissions will be added to your \
Click-to-Play whitelist. Select OK to accept.\nWARNING: Plugins can be unstable or insecure \
and should only be enabled when necessary.";

pub const DEFAULT_COMPONENT_ID: &str = "ctpm-installer";

/// Everything a single run needs. Built once, never mutated.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RunConfig {
    #[serde(default)]
    pub installer: InstallerSettings,

    /// Entries to apply, in manifest order.
    #[serde(default)]
    pub permissions: Vec<PermissionEntry>,
}

/// The `[installer]` table.
#[derive(Debug, Clone, Deserialize)]
pub struct InstallerSettings {
    /// Identifier used to locate this installer for self-removal.
    #[serde(default = "default_id")]
    pub id: String,

    /// Skip the confirmation prompt.
    #[serde(default)]
    pub silent: bool,

    #[serde(default = "default_title")]
    pub title: String,

    /// Overrides `title` when non-empty.
    #[serde(default)]
    pub title_localized: Option<String>,

    #[serde(default = "default_warning")]
    pub warning: String,

    /// Overrides `warning` when non-empty.
    #[serde(default)]
    pub warning_localized: Option<String>,
}

impl Default for InstallerSettings {
    fn default() -> Self {
        Self {
            id: default_id(),
            silent: false,
            title: default_title(),
            title_localized: None,
            warning: default_warning(),
            warning_localized: None,
        }
    }
}

fn default_id() -> String {
    DEFAULT_COMPONENT_ID.to_string()
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

fn default_warning() -> String {
    DEFAULT_WARNING.to_string()
}

fn pick<'a>(localized: &'a Option<String>, fallback: &'a str) -> &'a str {
    match localized.as_deref() {
        Some(s) if !s.is_empty() => s,
        _ => fallback,
    }
}

impl RunConfig {
    /// Load a manifest from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parse a manifest from a TOML string.
    pub fn parse(toml: &str) -> Result<Self> {
        toml::from_str(toml).map_err(|e| Error::Parse(e.to_string()))
    }

    pub fn new(permissions: Vec<PermissionEntry>) -> Self {
        Self {
            installer: InstallerSettings::default(),
            permissions,
        }
    }

    pub fn silent(mut self, silent: bool) -> Self {
        self.installer.silent = silent;
        self
    }

    pub fn is_silent(&self) -> bool {
        self.installer.silent
    }

    pub fn component_id(&self) -> &str {
        &self.installer.id
    }

    /// Title for prompts and alerts.
    pub fn effective_title(&self) -> &str {
        pick(&self.installer.title_localized, &self.installer.title)
    }

    /// Warning shown above the entry list.
    pub fn effective_warning(&self) -> &str {
        pick(&self.installer.warning_localized, &self.installer.warning)
    }
}
