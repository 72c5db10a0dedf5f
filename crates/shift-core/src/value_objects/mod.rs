//! Value objects - identifiers and permission bits

mod ids;
mod permissions;
mod snowflake;

pub use ids::{LoaId, ShiftId};
pub use permissions::Permissions;
pub use snowflake::{Snowflake, SnowflakeParseError};
