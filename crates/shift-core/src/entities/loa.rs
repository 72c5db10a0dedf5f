//! Leave-of-absence entity and the duration grammar of `/loa request`

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;
use crate::value_objects::{LoaId, Snowflake};

/// Reason recorded when the requester leaves it blank
pub const DEFAULT_LOA_REASON: &str = "No reason given";

const DAY_SECS: i64 = 86_400;

/// Approval state of a leave request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoaStatus {
    Pending,
    Approved,
    Denied,
}

impl LoaStatus {
    /// Storage representation
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Denied => "denied",
        }
    }

    /// Parse the storage representation
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "denied" => Some(Self::Denied),
            _ => None,
        }
    }

    /// Whether an admin decision has been recorded
    #[inline]
    pub const fn is_resolved(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for LoaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Requested leave length, parsed from the `<n>d` / `<n>w` grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeaveDuration(i64);

impl LeaveDuration {
    /// Parse a duration expression.
    ///
    /// `"3d"` is three days, `"2w"` two weeks (case-insensitive); a bare
    /// integer is a day count. Anything else does not parse — the caller
    /// falls back to a zero-length range, which is accepted, not an error.
    pub fn parse(expr: &str) -> Option<Self> {
        let expr = expr.trim();
        if let Some(last) = expr.chars().last() {
            let unit = last.to_ascii_lowercase();
            if unit == 'd' || unit == 'w' {
                let digits = &expr[..expr.len() - 1];
                if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
                    let value: i64 = digits.parse().ok()?;
                    let per_unit = if unit == 'w' { 7 * DAY_SECS } else { DAY_SECS };
                    return Some(Self(value * per_unit));
                }
            }
        }
        expr.parse::<i64>().ok().map(|days| Self(days * DAY_SECS))
    }

    /// Length in seconds
    #[inline]
    pub const fn as_secs(self) -> i64 {
        self.0
    }

    /// End timestamp for a leave starting at `start_ts` described by `expr`;
    /// an unparseable expression yields the zero-length range
    pub fn end_ts(start_ts: i64, expr: &str) -> i64 {
        start_ts + Self::parse(expr).map_or(0, Self::as_secs)
    }
}

/// Leave-of-absence entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loa {
    pub id: LoaId,
    pub user_id: Snowflake,
    pub guild_id: Snowflake,
    pub start_ts: i64,
    pub end_ts: i64,
    pub reason: String,
    pub status: LoaStatus,
    /// Admin who resolved the request; `None` while pending
    pub actor_id: Option<Snowflake>,
}

impl Loa {
    /// Record the admin decision. A request resolves exactly once.
    pub fn resolve(&mut self, decision: LoaStatus, actor_id: Snowflake) -> Result<(), DomainError> {
        debug_assert!(decision.is_resolved());
        if self.status.is_resolved() {
            return Err(DomainError::LoaAlreadyResolved {
                status: self.status,
            });
        }
        self.status = decision;
        self.actor_id = Some(actor_id);
        Ok(())
    }
}
