use uuid::Uuid;

use crate::errors::{AppError, AppResult, ErrorCode};

/// Parse an opaque record id supplied by a client.
///
/// Ids travel as strings in paths and bodies; anything that is not a UUID is
/// rejected with `InvalidId` (400).
pub fn parse_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| AppError::new(ErrorCode::InvalidId, "invalid id format"))
}

/// Order-independent key for a pair of records.
pub fn pair_key(a: &Uuid, b: &Uuid) -> String {
    let (lo, hi) = if a < b { (a, b) } else { (b, a) };
    format!("{lo}:{hi}")
}
