//! Registry test utilities

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::StatusCode;

use packages_retention::registry::{Package, PackageVersion, Registry, RegistryError};

#[derive(Default)]
struct State {
    packages: Vec<Package>,
    versions: Vec<PackageVersion>,
    deleted_versions: Vec<u64>,
    deleted_packages: Vec<String>,
}

/// In-memory registry holding a single package, recording every deletion
pub struct InMemoryRegistry {
    state: Mutex<State>,
    failing_ids: HashSet<u64>,
}

impl InMemoryRegistry {
    /// Registry with one package whose versions get ids 1, 2, 3, ... in the given order
    pub fn with_package(package_name: &str, version_names: &[&str]) -> Self {
        let versions = version_names
            .iter()
            .enumerate()
            .map(|(i, name)| PackageVersion {
                id: i as u64 + 1,
                name: name.to_string(),
                description: format!("{} {}", package_name, name),
                created_at: "2024-03-12T20:00:00Z".to_string(),
                updated_at: "2024-03-13T16:00:00Z".to_string(),
                ..Default::default()
            })
            .collect();

        Self {
            state: Mutex::new(State {
                packages: vec![Package {
                    id: 100,
                    name: package_name.to_string(),
                    created_at: "2024-03-01T10:00:00Z".to_string(),
                    updated_at: "2024-03-13T16:00:00Z".to_string(),
                    ..Default::default()
                }],
                versions,
                ..Default::default()
            }),
            failing_ids: HashSet::new(),
        }
    }

    pub fn empty() -> Self {
        Self {
            state: Mutex::new(State::default()),
            failing_ids: HashSet::new(),
        }
    }

    /// Deleting any of these version ids answers with 500
    pub fn failing_on(mut self, ids: &[u64]) -> Self {
        self.failing_ids.extend(ids);
        self
    }

    pub fn deleted_versions(&self) -> Vec<u64> {
        let mut ids = self.state.lock().unwrap().deleted_versions.clone();
        ids.sort();
        ids
    }

    pub fn deleted_packages(&self) -> Vec<String> {
        self.state.lock().unwrap().deleted_packages.clone()
    }

    pub fn remaining_versions(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .versions
            .iter()
            .map(|v| v.name.clone())
            .collect()
    }

    fn not_found(package_name: &str) -> RegistryError {
        RegistryError::Status {
            status: StatusCode::NOT_FOUND,
            url: format!("/users/test/packages/maven/{}", package_name),
        }
    }
}

#[async_trait]
impl Registry for InMemoryRegistry {
    async fn list_packages(&self) -> Result<Vec<Package>, RegistryError> {
        Ok(self.state.lock().unwrap().packages.clone())
    }

    async fn get_package(&self, package_name: &str) -> Result<Package, RegistryError> {
        self.state
            .lock()
            .unwrap()
            .packages
            .iter()
            .find(|p| p.name == package_name)
            .cloned()
            .ok_or_else(|| Self::not_found(package_name))
    }

    async fn list_versions(
        &self,
        package_name: &str,
    ) -> Result<Vec<PackageVersion>, RegistryError> {
        let state = self.state.lock().unwrap();
        if !state.packages.iter().any(|p| p.name == package_name) {
            return Err(Self::not_found(package_name));
        }
        Ok(state.versions.clone())
    }

    async fn delete_version(
        &self,
        package_name: &str,
        version_id: u64,
    ) -> Result<(), RegistryError> {
        let mut state = self.state.lock().unwrap();
        state.deleted_versions.push(version_id);

        if self.failing_ids.contains(&version_id) {
            return Err(RegistryError::Status {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                url: format!(
                    "/users/test/packages/maven/{}/versions/{}",
                    package_name, version_id
                ),
            });
        }
        state.versions.retain(|v| v.id != version_id);
        Ok(())
    }

    async fn delete_package(&self, package_name: &str) -> Result<(), RegistryError> {
        let mut state = self.state.lock().unwrap();
        state.deleted_packages.push(package_name.to_string());
        state.packages.retain(|p| p.name != package_name);
        state.versions.clear();
        Ok(())
    }
}
