use std::num::ParseIntError;

use thiserror::Error;

use crate::registry::RegistryError;

/// A version name that cannot be split into `major.minor.patch`
#[derive(Debug, Error)]
pub enum VersionKeyError {
    #[error(
        "there are more items than 'major.minor.patch' or 'major.minor.patch-SNAPSHOT' at version name '{name}' with id {id}"
    )]
    TooManySegments { name: String, id: u64 },

    #[error("failed to parse {component} version to int at version name '{name}' with id {id}: {source}")]
    InvalidComponent {
        component: &'static str,
        name: String,
        id: u64,
        #[source]
        source: ParseIntError,
    },
}

#[derive(Debug, Error)]
pub enum RetentionError {
    #[error(transparent)]
    Parse(#[from] VersionKeyError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("delete execution with errors: {failed} of {total} deletions failed")]
    DeletionFailed { failed: usize, total: usize },
}
