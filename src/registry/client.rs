//! Registry trait for listing and deleting packages and their versions

#[cfg(test)]
use mockall::automock;

use crate::registry::error::RegistryError;
use crate::registry::types::{Package, PackageVersion};

/// Operations the retention engine needs from a package registry.
///
/// Implementations are bound to one owner and package type, so only the
/// package name and version id vary per call.
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait Registry: Send + Sync {
    /// Lists every package of the configured type owned by the configured account
    async fn list_packages(&self) -> Result<Vec<Package>, RegistryError>;

    /// Fetches a single package
    async fn get_package(&self, package_name: &str) -> Result<Package, RegistryError>;

    /// Lists all versions of a package
    ///
    /// # Returns
    /// * `Ok(Vec<PackageVersion>)` - Versions in registry order (newest first on GitHub)
    /// * `Err(RegistryError)` - If the fetch fails
    async fn list_versions(&self, package_name: &str)
    -> Result<Vec<PackageVersion>, RegistryError>;

    /// Deletes one version of a package
    async fn delete_version(&self, package_name: &str, version_id: u64)
    -> Result<(), RegistryError>;

    /// Deletes a package together with all of its versions
    async fn delete_package(&self, package_name: &str) -> Result<(), RegistryError>;
}
