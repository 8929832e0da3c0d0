//! Permission entries for the click-to-play installer.
//!
//! Core principle: **an entry becomes grants only through [`normalize`].**
//!
//! An entry names an origin (scheme optional) and, optionally, a plugin
//! capability. Normalization turns it into an origin identifier plus the
//! grant keys to write: `plugins` for a generic entry, or
//! `plugin:<name>` and `plugin-vulnerable:<name>` for a capability entry.

mod entry;
mod error;
mod manifest;

pub use entry::{
    INSECURE_PERMISSION_PREFIX, NormalizedGrant, PERMISSION_PREFIX, PermissionEntry,
    SINGLE_PERMISSION_NAME, grant_keys, normalize, with_default_scheme,
};
pub use error::{Error, Result};
pub use manifest::{
    DEFAULT_COMPONENT_ID, DEFAULT_TITLE, DEFAULT_WARNING, InstallerSettings, RunConfig,
};
