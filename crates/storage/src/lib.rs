//! Persistent permission storage for the click-to-play installer.
//!
//! A grant store maps `(origin, grant key)` to a [`Permission`]. The
//! installer only ever writes [`Permission::Allow`], and writing a grant that
//! is already present with the same value changes nothing.
//!
//! # Overview
//!
//! - [`GrantStore`] — the store contract the installer writes through.
//! - [`SqliteGrantStore`] — durable store in a `permissions` table keyed by
//!   `(origin, type)`.
//! - [`MemoryGrantStore`] — map-backed store for tests and dry runs.
//!
//! # Example
//!
//! ```no_run
//! use storage::{GrantStore, Permission, SqliteGrantStore};
//!
//! let store = SqliteGrantStore::open("permissions.db")?;
//! store.add("http://example.com", "plugins", Permission::Allow)?;
//!
//! for grant in store.list()? {
//!     println!("{} {} {:?}", grant.origin, grant.key, grant.permission);
//! }
//! # Ok::<(), storage::Error>(())
//! ```

mod error;
mod grant;
mod memory;
mod store;

pub use error::{Error, Result};
pub use grant::{Permission, StoredGrant};
pub use memory::MemoryGrantStore;
pub use store::SqliteGrantStore;

/// A key-value permission store addressed by origin and grant key.
pub trait GrantStore {
    /// Set the value for `(origin, key)`. Repeating an identical write is a no-op.
    fn add(&self, origin: &str, key: &str, permission: Permission) -> Result<()>;

    fn get(&self, origin: &str, key: &str) -> Result<Option<Permission>>;

    /// All grants, ordered by origin then key.
    fn list(&self) -> Result<Vec<StoredGrant>>;
}
