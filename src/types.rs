//! Shared type aliases and small helpers.
//!
//! - [`UserId`]: User account identifier
//! - [`abbrev_uuid`]: Abbreviate UUIDs to first 8 chars for logging

use uuid::Uuid;

/// Identifier for a user account.
pub type UserId = Uuid;

/// Abbreviate a UUID to its first 8 characters for log output.
///
/// Full UUIDs make log lines hard to scan; the first group is enough to
/// correlate entries within a single trace.
pub fn abbrev_uuid(uuid: &Uuid) -> String {
    uuid.to_string().chars().take(8).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abbrev_uuid() {
        let uuid = Uuid::parse_str("a1b2c3d4-e5f6-7890-abcd-ef1234567890").unwrap();
        assert_eq!(abbrev_uuid(&uuid), "a1b2c3d4");
    }
}
