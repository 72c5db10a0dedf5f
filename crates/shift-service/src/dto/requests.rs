//! Request DTOs for ledger actions
//!
//! All request DTOs implement `Validate`; the dispatcher validates before any
//! service call so malformed input never reaches a repository.

use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use validator::Validate;

use shift_core::{BulkShiftFilter, DomainError, ShiftId, Snowflake};

/// Start a new shift
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct StartShiftRequest {
    /// Free-form label; the ledger falls back to "normal"
    #[validate(length(min = 1, max = 64, message = "Shift type must be 1-64 characters"))]
    pub shift_type: Option<String>,
}

/// Request a leave of absence
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoaRequestInput {
    /// Duration expression: `3d`, `2w`, or a bare day count
    #[validate(length(min = 1, max = 16, message = "Duration must be 1-16 characters"))]
    pub duration: String,

    #[validate(length(max = 500, message = "Reason must be at most 500 characters"))]
    pub reason: Option<String>,
}

/// Filter for bulk shift operations
///
/// `before` is a `YYYY-MM-DD` date matched against `start_ts`; `ids` is a
/// comma-separated id list. Both arrive as the raw strings the slash command
/// delivers and are parsed by [`BulkFilterRequest::into_filter`].
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct BulkFilterRequest {
    pub user_id: Option<Snowflake>,

    #[validate(length(min = 1, max = 10, message = "Date must be YYYY-MM-DD"))]
    pub before: Option<String>,

    #[validate(length(min = 1, max = 200, message = "Id list must be 1-200 characters"))]
    pub ids: Option<String>,
}

impl BulkFilterRequest {
    /// Resolve the raw strings into a typed filter.
    ///
    /// An unparseable date is a `ValidationError`; an id list with no valid
    /// entries is `InvalidIdList`. Invalid entries inside an otherwise valid
    /// list are dropped, matching the lenient comma parsing of the command
    /// surface.
    pub fn into_filter(self, guild_id: Snowflake) -> Result<BulkShiftFilter, DomainError> {
        let before_ts = match self.before.as_deref() {
            Some(raw) => Some(parse_before_date(raw)?),
            None => None,
        };

        let ids = match self.ids.as_deref() {
            Some(raw) => Some(parse_id_list(raw)?),
            None => None,
        };

        Ok(BulkShiftFilter {
            guild_id,
            user_id: self.user_id,
            before_ts,
            ids,
        })
    }
}

/// Parse a `YYYY-MM-DD` date into the epoch second of its UTC midnight
fn parse_before_date(raw: &str) -> Result<i64, DomainError> {
    let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| DomainError::ValidationError(format!("Invalid date: {raw}")))?;
    Ok(date.and_time(NaiveTime::MIN).and_utc().timestamp())
}

/// Parse a comma-separated id list, dropping entries that are not positive
/// integers; an empty result is an error
fn parse_id_list(raw: &str) -> Result<Vec<ShiftId>, DomainError> {
    let ids: Vec<ShiftId> = raw
        .split(',')
        .filter_map(|part| part.trim().parse::<i64>().ok())
        .filter(|&id| id > 0)
        .map(ShiftId::new)
        .collect();

    if ids.is_empty() {
        return Err(DomainError::InvalidIdList);
    }
    Ok(ids)
}
