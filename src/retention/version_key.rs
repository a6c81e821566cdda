//! Comparable `(major, minor, patch)` keys derived from version names
//!
//! Only plain numeric names are understood, optionally carrying a
//! case-insensitive `-SNAPSHOT` suffix:
//! - "1" -> (1, 0, 0)
//! - "1.2" -> (1, 2, 0)
//! - "1.2.3-SNAPSHOT" -> (1, 2, 3), snapshot
//!
//! Anything else is an error instead of a silently defaulted key.

use crate::retention::error::VersionKeyError;

const SNAPSHOT_SUFFIX: &str = "-snapshot";
const COMPONENTS: [&str; 3] = ["major", "minor", "patch"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VersionKey {
    pub major: i64,
    pub minor: i64,
    pub patch: i64,
    pub is_snapshot: bool,
}

impl VersionKey {
    /// Parses a registry version name; `id` is only used for error reporting.
    pub fn parse(name: &str, id: u64) -> Result<Self, VersionKeyError> {
        let lowercase = name.to_lowercase();
        let (numeric, is_snapshot) = match lowercase.strip_suffix(SNAPSHOT_SUFFIX) {
            Some(rest) => (rest, true),
            None => (lowercase.as_str(), false),
        };

        let segments: Vec<&str> = numeric.split('.').collect();
        if segments.len() > COMPONENTS.len() {
            return Err(VersionKeyError::TooManySegments {
                name: name.to_string(),
                id,
            });
        }

        let mut parts = [0i64; 3];
        for (index, segment) in segments.iter().enumerate() {
            parts[index] =
                segment
                    .parse()
                    .map_err(|source| VersionKeyError::InvalidComponent {
                        component: COMPONENTS[index],
                        name: name.to_string(),
                        id,
                        source,
                    })?;
        }

        Ok(Self {
            major: parts[0],
            minor: parts[1],
            patch: parts[2],
            is_snapshot,
        })
    }
}
