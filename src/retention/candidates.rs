//! Selection of the versions, or the whole package, to delete

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::registry::{Package, PackageVersion, Registry};
use crate::retention::error::{RetentionError, VersionKeyError};
use crate::retention::policy::RetentionPolicy;
use crate::retention::version_key::VersionKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateKind {
    Version,
    Package,
}

impl CandidateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CandidateKind::Version => "version",
            CandidateKind::Package => "package",
        }
    }
}

/// A version or package selected for deletion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub name: String,
    pub id: u64,
    pub description: String,
    pub created_at: String,
    pub updated_at: String,
    pub kind: CandidateKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_url: Option<String>,
}

impl Candidate {
    pub fn from_version(version: &PackageVersion) -> Self {
        Self {
            name: version.name.clone(),
            id: version.id,
            description: version.description.clone(),
            created_at: version.created_at.clone(),
            updated_at: version.updated_at.clone(),
            kind: CandidateKind::Version,
            html_url: version.html_url.clone(),
        }
    }

    /// Packages carry no description, so the name is used instead
    pub fn from_package(package: &Package) -> Self {
        Self {
            name: package.name.clone(),
            id: package.id,
            description: package.name.clone(),
            created_at: package.created_at.clone(),
            updated_at: package.updated_at.clone(),
            kind: CandidateKind::Package,
            html_url: package.html_url.clone(),
        }
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "type: {} name: '{}' id: {} created: {} updated: {} description: '{}'",
            self.kind.as_str(),
            self.name,
            self.id,
            self.created_at,
            self.updated_at,
            self.description
        )?;
        if let Some(url) = &self.html_url {
            write!(f, " url: {}", url)?;
        }
        Ok(())
    }
}

/// Determines deletion candidates for a package under a retention policy
pub struct CandidateSelector {
    registry: Arc<dyn Registry>,
}

impl CandidateSelector {
    pub fn new(registry: Arc<dyn Registry>) -> Self {
        Self { registry }
    }

    /// Determine all candidates to delete.
    ///
    /// Returns an empty list if the package does not exist. If every version
    /// of the package qualifies, a single package candidate replaces the
    /// version candidates so no empty package is left behind.
    pub async fn determine_candidates(
        &self,
        package_name: &str,
        policy: &RetentionPolicy,
    ) -> Result<Vec<Candidate>, RetentionError> {
        if !self.package_exists(package_name).await? {
            warn!(
                "There does not exist a package with name {}: skip deletion",
                package_name
            );
            return Ok(Vec::new());
        }

        let versions = self.registry.list_versions(package_name).await?;
        debug!("Found {} versions of {}", versions.len(), package_name);

        let candidates = select_versions(&versions, policy)?;
        if candidates.is_empty() || candidates.len() != versions.len() {
            return Ok(candidates);
        }

        info!(
            "All {} versions of {} are to be deleted: deleting the package instead",
            versions.len(),
            package_name
        );
        let package = self.registry.get_package(package_name).await?;
        Ok(vec![Candidate::from_package(&package)])
    }

    async fn package_exists(&self, package_name: &str) -> Result<bool, RetentionError> {
        let packages = self.registry.list_packages().await?;
        Ok(packages.iter().any(|p| p.name == package_name))
    }
}

/// Evaluates every version against the policy, in registry order.
///
/// Fails on the first version name that is not `major.minor.patch`.
pub fn select_versions(
    versions: &[PackageVersion],
    policy: &RetentionPolicy,
) -> Result<Vec<Candidate>, VersionKeyError> {
    let keys = versions
        .iter()
        .map(|v| VersionKey::parse(&v.name, v.id))
        .collect::<Result<Vec<_>, _>>()?;
    let names: Vec<String> = versions.iter().map(|v| v.name.clone()).collect();

    let candidates = versions
        .iter()
        .enumerate()
        .filter_map(|(index, version)| {
            let reason = policy.deletion_reason(index, &keys, &names)?;
            debug!("Version '{}' selected: {}", version.name, reason);
            Some(Candidate::from_version(version))
        })
        .collect();

    Ok(candidates)
}
