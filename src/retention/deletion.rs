//! Concurrent execution of deletions

use std::sync::Arc;

use futures::future::join_all;
use tracing::{error, info};

use crate::registry::{Registry, RegistryError};
use crate::retention::candidates::{Candidate, CandidateKind, CandidateSelector};
use crate::retention::error::RetentionError;
use crate::retention::policy::RetentionPolicy;

pub struct Deleter {
    registry: Arc<dyn Registry>,
    selector: CandidateSelector,
}

impl Deleter {
    pub fn new(registry: Arc<dyn Registry>) -> Self {
        Self {
            selector: CandidateSelector::new(Arc::clone(&registry)),
            registry,
        }
    }

    /// Determines the candidates of a package and deletes them concurrently.
    ///
    /// Candidates are always logged; with `dry_run` nothing is deleted.
    /// Selection errors abort before any deletion is attempted.
    pub async fn delete_versions(
        &self,
        package_name: &str,
        policy: &RetentionPolicy,
        dry_run: bool,
    ) -> Result<(), RetentionError> {
        let candidates = self
            .selector
            .determine_candidates(package_name, policy)
            .await?;

        log_candidates(&candidates);

        if dry_run {
            info!("Skip deletion because of dry run");
            return Ok(());
        }

        self.delete_candidates(package_name, &candidates).await
    }

    /// Deletes all candidates concurrently.
    ///
    /// Every deletion runs to completion regardless of the others; failures
    /// are logged individually and reported as one aggregate error.
    pub async fn delete_candidates(
        &self,
        package_name: &str,
        candidates: &[Candidate],
    ) -> Result<(), RetentionError> {
        let results = join_all(
            candidates
                .iter()
                .map(|candidate| self.delete_candidate(package_name, candidate)),
        )
        .await;

        let failed = results.iter().filter(|result| result.is_err()).count();
        if failed > 0 {
            return Err(RetentionError::DeletionFailed {
                failed,
                total: candidates.len(),
            });
        }

        info!("Deleted {} elements of {}", candidates.len(), package_name);
        Ok(())
    }

    async fn delete_candidate(
        &self,
        package_name: &str,
        candidate: &Candidate,
    ) -> Result<(), RegistryError> {
        let result = match candidate.kind {
            CandidateKind::Version => {
                self.registry
                    .delete_version(package_name, candidate.id)
                    .await
            }
            CandidateKind::Package => self.registry.delete_package(package_name).await,
        };

        result.inspect_err(|e| {
            error!(
                "Failed to delete {} '{}' with id {}: {}",
                candidate.kind.as_str(),
                candidate.name,
                candidate.id,
                e
            )
        })
    }
}

fn log_candidates(candidates: &[Candidate]) {
    if candidates.is_empty() {
        info!("There is nothing to delete");
        return;
    }

    info!("The following elements will be deleted");
    for (i, candidate) in candidates.iter().enumerate() {
        info!("  {}. {}", i + 1, candidate);
    }
}
