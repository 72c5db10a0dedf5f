//! Guild permission bits
//!
//! Mirrors the chat platform's permission bitfield for the few bits the
//! ledger cares about. Admin evaluation needs `MANAGE_GUILD`; the rest are
//! carried so a caller snapshot can be passed through unchanged.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Permission bitfield as reported by the chat platform for a member
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Permissions: u64 {
        const ADMINISTRATOR = 1 << 3;
        const MANAGE_GUILD = 1 << 5;
        const MANAGE_ROLES = 1 << 28;
        const MODERATE_MEMBERS = 1 << 40;
    }
}

impl Permissions {
    /// Whether this set carries guild-management rights
    #[inline]
    pub fn can_manage_guild(&self) -> bool {
        self.intersects(Self::ADMINISTRATOR | Self::MANAGE_GUILD)
    }

    /// Parse from the decimal string form the platform uses on the wire
    pub fn parse(s: &str) -> Result<Self, PermissionsParseError> {
        s.parse::<u64>()
            .map(Self::from_bits_truncate)
            .map_err(|_| PermissionsParseError::InvalidFormat)
    }
}

/// Error when parsing permissions from string
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PermissionsParseError {
    #[error("invalid permissions format")]
    InvalidFormat,
}

impl std::fmt::Display for Permissions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.bits())
    }
}

impl Serialize for Permissions {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.bits().to_string())
    }
}

impl<'de> Deserialize<'de> for Permissions {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Permissions::parse(&s).map_err(serde::de::Error::custom)
    }
}
