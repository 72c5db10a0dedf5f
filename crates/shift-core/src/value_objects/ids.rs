//! Record identifiers assigned by the store
//!
//! Shift and LoA rows get monotonic integer ids from the database. The
//! newtypes keep the two id spaces from being mixed up in signatures.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a shift record
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ShiftId(i64);

impl ShiftId {
    #[inline]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn into_inner(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ShiftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ShiftId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<ShiftId> for i64 {
    fn from(id: ShiftId) -> Self {
        id.0
    }
}

/// Identifier of a leave-of-absence record
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct LoaId(i64);

impl LoaId {
    #[inline]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn into_inner(self) -> i64 {
        self.0
    }
}

impl fmt::Display for LoaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for LoaId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<LoaId> for i64 {
    fn from(id: LoaId) -> Self {
        id.0
    }
}
