//! Stored grant values.

use chrono::{DateTime, Utc};

use crate::{Error, Result};

/// The value stored for an (origin, grant key) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    Allow,
    Deny,
}

impl Permission {
    pub const ALLOW: u32 = 1;
    pub const DENY: u32 = 2;

    pub fn as_u32(self) -> u32 {
        match self {
            Permission::Allow => Self::ALLOW,
            Permission::Deny => Self::DENY,
        }
    }

    pub fn from_u32(value: u32) -> Result<Self> {
        match value {
            Self::ALLOW => Ok(Permission::Allow),
            Self::DENY => Ok(Permission::Deny),
            other => Err(Error::UnknownPermission(other)),
        }
    }
}

/// A grant as read back from a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredGrant {
    pub origin: String,
    pub key: String,
    pub permission: Permission,
    pub modified_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_values() {
        assert_eq!(Permission::Allow.as_u32(), 1);
        assert_eq!(Permission::from_u32(2).unwrap(), Permission::Deny);
        assert!(matches!(
            Permission::from_u32(7),
            Err(Error::UnknownPermission(7))
        ));
    }
}
