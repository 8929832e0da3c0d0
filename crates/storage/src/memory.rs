//! In-memory grant store.

use std::collections::BTreeMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};

use crate::{Error, GrantStore, Permission, Result, StoredGrant};

type Grants = BTreeMap<(String, String), (Permission, DateTime<Utc>)>;

/// Map-backed grant store. Holds nothing across processes.
#[derive(Default)]
pub struct MemoryGrantStore {
    grants: Mutex<Grants>,
}

impl MemoryGrantStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Grants>> {
        self.grants
            .lock()
            .map_err(|_| Error::Rejected("grant map poisoned".to_string()))
    }
}

impl GrantStore for MemoryGrantStore {
    fn add(&self, origin: &str, key: &str, permission: Permission) -> Result<()> {
        let mut grants = self.lock()?;
        let slot = (origin.to_string(), key.to_string());
        match grants.get(&slot) {
            Some((existing, _)) if *existing == permission => {}
            _ => {
                grants.insert(slot, (permission, Utc::now()));
            }
        }
        Ok(())
    }

    fn get(&self, origin: &str, key: &str) -> Result<Option<Permission>> {
        let grants = self.lock()?;
        Ok(grants
            .get(&(origin.to_string(), key.to_string()))
            .map(|(p, _)| *p))
    }

    fn list(&self) -> Result<Vec<StoredGrant>> {
        let grants = self.lock()?;
        Ok(grants
            .iter()
            .map(|((origin, key), (permission, modified_at))| StoredGrant {
                origin: origin.clone(),
                key: key.clone(),
                permission: *permission,
                modified_at: *modified_at,
            })
            .collect())
    }
}
