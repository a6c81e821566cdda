//! Retention rules deciding which versions qualify for deletion
//!
//! "Keep N" is evaluated as "delete if at least N other non-snapshot versions
//! are ordinally greater". Counts are over raw entries, not distinct values,
//! so versions sharing the top major/minor/patch are retained as a group.

use std::fmt;

use crate::retention::version_key::VersionKey;

/// Active deletion policy. A keep count of `0` disables that rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetentionPolicy {
    /// Exact version name to delete, compared case-insensitively
    pub version_name_to_delete: Option<String>,
    pub delete_snapshots: bool,
    pub keep_major: usize,
    pub keep_minor: usize,
    pub keep_patch: usize,
}

/// First rule that selected a version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionReason {
    NameMatch,
    Snapshot,
    Major,
    Minor,
    Patch,
}

impl fmt::Display for DeletionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DeletionReason::NameMatch => "matches version name to delete",
            DeletionReason::Snapshot => "snapshot",
            DeletionReason::Major => "older major version",
            DeletionReason::Minor => "older minor version",
            DeletionReason::Patch => "older patch version",
        };
        f.write_str(text)
    }
}

impl RetentionPolicy {
    /// Returns true if no rule is configured at all
    pub fn is_empty(&self) -> bool {
        self.name_to_delete().is_none()
            && !self.delete_snapshots
            && self.keep_major == 0
            && self.keep_minor == 0
            && self.keep_patch == 0
    }

    /// Checks whether the version at `index` is to be deleted
    pub fn is_candidate(&self, index: usize, keys: &[VersionKey], names: &[String]) -> bool {
        self.deletion_reason(index, keys, names).is_some()
    }

    /// Returns the first rule that selects the version at `index`, if any
    ///
    /// # Panics
    /// If `index` is out of bounds for `keys` or `names`.
    pub fn deletion_reason(
        &self,
        index: usize,
        keys: &[VersionKey],
        names: &[String],
    ) -> Option<DeletionReason> {
        let key = &keys[index];

        if self
            .name_to_delete()
            .is_some_and(|target| target.to_lowercase() == names[index].to_lowercase())
        {
            return Some(DeletionReason::NameMatch);
        }

        if key.is_snapshot {
            return self.delete_snapshots.then_some(DeletionReason::Snapshot);
        }

        let greater_major = count_released(keys, |other| other.major > key.major);
        if exceeds(self.keep_major, greater_major) {
            return Some(DeletionReason::Major);
        }

        let greater_minor = count_released(keys, |other| {
            other.major == key.major && other.minor > key.minor
        });
        if exceeds(self.keep_minor, greater_minor) {
            return Some(DeletionReason::Minor);
        }

        let greater_patch = count_released(keys, |other| {
            other.major == key.major && other.minor == key.minor && other.patch > key.patch
        });
        if exceeds(self.keep_patch, greater_patch) {
            return Some(DeletionReason::Patch);
        }

        None
    }

    fn name_to_delete(&self) -> Option<&str> {
        self.version_name_to_delete
            .as_deref()
            .filter(|name| !name.is_empty())
    }
}

/// Counts non-snapshot keys matching `greater`
fn count_released(keys: &[VersionKey], greater: impl Fn(&VersionKey) -> bool) -> usize {
    keys.iter()
        .filter(|other| !other.is_snapshot && greater(other))
        .count()
}

fn exceeds(keep: usize, greater_count: usize) -> bool {
    keep > 0 && greater_count >= keep
}
