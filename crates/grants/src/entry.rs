//! Permission entries and their normalization into concrete grants.

use crate::{Error, Result};
use serde::Deserialize;
use url::Url;

/// Grant key for the coarse-grained "any plugin" permission.
pub const SINGLE_PERMISSION_NAME: &str = "plugins";

/// Prefix for a capability-specific grant key.
pub const PERMISSION_PREFIX: &str = "plugin:";

/// Prefix for the insecure variant of a capability grant key.
pub const INSECURE_PERMISSION_PREFIX: &str = "plugin-vulnerable:";

const DEFAULT_SCHEME: &str = "http://";

/// One declarative permission to grant.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PermissionEntry {
    /// Origin or bare host; may lack a scheme.
    pub domain: String,

    /// Capability (plugin) name. Absent means the generic permission.
    #[serde(default, rename = "plugin")]
    pub capability: Option<String>,

    /// Label shown in the confirmation summary only.
    #[serde(default, rename = "name")]
    pub display_name: Option<String>,
}

impl PermissionEntry {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            capability: None,
            display_name: None,
        }
    }

    pub fn with_capability(mut self, capability: impl Into<String>) -> Self {
        self.capability = Some(capability.into());
        self
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// The line this entry contributes to the confirmation summary.
    pub fn summary_line(&self) -> String {
        match &self.display_name {
            Some(name) => format!("{}, {}", self.domain, name),
            None => self.domain.clone(),
        }
    }
}

/// The concrete grants derived from one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedGrant {
    /// ASCII-serialized origin, e.g. `http://example.com`.
    pub origin: String,

    /// One key for generic entries, two for capability entries.
    pub keys: Vec<String>,
}

impl NormalizedGrant {
    /// Iterate `(origin, key)` pairs in write order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.keys.iter().map(|k| (self.origin.as_str(), k.as_str()))
    }
}

/// Prepend `http://` unless the domain already carries an http(s) scheme.
///
/// The prefix check is literal and case-sensitive.
pub fn with_default_scheme(domain: &str) -> String {
    if domain.starts_with("http://") || domain.starts_with("https://") {
        domain.to_string()
    } else {
        format!("{DEFAULT_SCHEME}{domain}")
    }
}

/// Grant keys for an optional capability name.
pub fn grant_keys(capability: Option<&str>) -> Vec<String> {
    match capability {
        None => vec![SINGLE_PERMISSION_NAME.to_string()],
        Some(name) => vec![
            format!("{PERMISSION_PREFIX}{name}"),
            format!("{INSECURE_PERMISSION_PREFIX}{name}"),
        ],
    }
}

/// Validate and canonicalize an entry. Pure; performs no I/O.
pub fn normalize(entry: &PermissionEntry) -> Result<NormalizedGrant> {
    if entry.domain.is_empty() {
        return Err(Error::InvalidOrigin {
            domain: String::new(),
            reason: "domain is empty".to_string(),
        });
    }

    let spec = with_default_scheme(&entry.domain);
    let url = Url::parse(&spec).map_err(|e| Error::InvalidOrigin {
        domain: entry.domain.clone(),
        reason: e.to_string(),
    })?;

    let origin = url.origin();
    if !origin.is_tuple() {
        return Err(Error::InvalidOrigin {
            domain: entry.domain.clone(),
            reason: "URL has an opaque origin".to_string(),
        });
    }

    Ok(NormalizedGrant {
        origin: origin.ascii_serialization(),
        keys: grant_keys(entry.capability.as_deref()),
    })
}
