//! GitHub Packages REST API registry implementation

use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::Config;
use crate::registry::client::Registry;
use crate::registry::error::RegistryError;
use crate::registry::types::{Owner, Package, PackageType, PackageVersion};

/// Default base URL for GitHub API
pub const DEFAULT_BASE_URL: &str = "https://api.github.com";

const API_VERSION: &str = "2022-11-28";
const ACCEPT_JSON: &str = "application/vnd.github+json";

/// Page size requested from list endpoints (GitHub maximum)
const PAGE_SIZE: usize = 100;

/// Registry implementation for the GitHub Packages REST API
pub struct GitHubRegistry {
    client: reqwest::Client,
    base_url: String,
    owner: Owner,
    package_type: PackageType,
    token: String,
}

impl GitHubRegistry {
    /// Creates a new GitHubRegistry with a custom base URL
    pub fn new(
        base_url: &str,
        owner: Owner,
        package_type: PackageType,
        token: &str,
        timeout: Duration,
    ) -> Result<Self, RegistryError> {
        let client = reqwest::Client::builder()
            .user_agent("packages-retention")
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            owner,
            package_type,
            token: token.to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, RegistryError> {
        Self::new(
            &config.rest_url,
            config.owner.clone(),
            config.package_type,
            &config.token,
            config.timeout,
        )
    }

    fn packages_url(&self) -> String {
        format!("{}/{}/packages", self.base_url, self.owner.scope_path())
    }

    /// Container and docker names may be namespaced: repo/image -> repo%2Fimage
    fn encode_package_name(package_name: &str) -> String {
        package_name.replace('/', "%2F")
    }

    fn package_url(&self, package_name: &str) -> String {
        format!(
            "{}/{}/{}",
            self.packages_url(),
            self.package_type,
            Self::encode_package_name(package_name)
        )
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("Accept", ACCEPT_JSON)
            .header("X-GitHub-Api-Version", API_VERSION)
            .bearer_auth(&self.token)
    }

    async fn send(&self, method: Method, url: &str) -> Result<Response, RegistryError> {
        debug!("{} {}", method, url);
        let response = self.request(method, url).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!("GitHub API returned status {}: {}", status, url);
            return Err(RegistryError::Status {
                status,
                url: url.to_string(),
            });
        }

        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, RegistryError> {
        let response = self.send(Method::GET, url).await?;

        response.json().await.map_err(|e| {
            warn!("Failed to parse GitHub response from {}: {}", url, e);
            RegistryError::InvalidResponse(e.to_string())
        })
    }

    /// Follows `page=N` until the registry returns a page shorter than `PAGE_SIZE`
    async fn get_all_pages<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &str,
    ) -> Result<Vec<T>, RegistryError> {
        let mut items = Vec::new();
        let mut page = 1u32;

        loop {
            let separator = if query.is_empty() { "" } else { "&" };
            let page_url = format!(
                "{}?{}{}per_page={}&page={}",
                url, query, separator, PAGE_SIZE, page
            );
            let batch: Vec<T> = self.get_json(&page_url).await?;
            let batch_len = batch.len();
            items.extend(batch);

            if batch_len < PAGE_SIZE {
                return Ok(items);
            }
            page += 1;
        }
    }
}

#[async_trait::async_trait]
impl Registry for GitHubRegistry {
    async fn list_packages(&self) -> Result<Vec<Package>, RegistryError> {
        let query = format!("package_type={}", self.package_type);
        self.get_all_pages(&self.packages_url(), &query).await
    }

    async fn get_package(&self, package_name: &str) -> Result<Package, RegistryError> {
        self.get_json(&self.package_url(package_name)).await
    }

    async fn list_versions(
        &self,
        package_name: &str,
    ) -> Result<Vec<PackageVersion>, RegistryError> {
        let url = format!("{}/versions", self.package_url(package_name));
        self.get_all_pages(&url, "").await
    }

    async fn delete_version(
        &self,
        package_name: &str,
        version_id: u64,
    ) -> Result<(), RegistryError> {
        let url = format!("{}/versions/{}", self.package_url(package_name), version_id);
        self.send(Method::DELETE, &url).await.map(|_| ())
    }

    async fn delete_package(&self, package_name: &str) -> Result<(), RegistryError> {
        self.send(Method::DELETE, &self.package_url(package_name))
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn user_registry(url: &str) -> GitHubRegistry {
        GitHubRegistry::new(
            url,
            Owner::User("octo".to_string()),
            PackageType::Maven,
            "secret-token",
            Duration::from_secs(3),
        )
        .unwrap()
    }

    fn page_query(page: &str) -> Matcher {
        Matcher::AllOf(vec![
            Matcher::UrlEncoded("per_page".into(), "100".into()),
            Matcher::UrlEncoded("page".into(), page.into()),
        ])
    }

    #[tokio::test]
    async fn list_packages_sends_github_headers_and_package_type() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/users/octo/packages")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("package_type".into(), "maven".into()),
                Matcher::UrlEncoded("per_page".into(), "100".into()),
                Matcher::UrlEncoded("page".into(), "1".into()),
            ]))
            .match_header("authorization", "Bearer secret-token")
            .match_header("accept", ACCEPT_JSON)
            .match_header("x-github-api-version", API_VERSION)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[
                    {"id": 1, "name": "app", "package_type": "maven", "version_count": 3,
                     "created_at": "2024-03-12T20:00:00Z", "updated_at": "2024-03-20T20:00:00Z"}
                ]"#,
            )
            .create_async()
            .await;

        let registry = user_registry(&server.url());
        let packages = registry.list_packages().await.unwrap();

        mock.assert_async().await;
        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0].name, "app");
        assert_eq!(packages[0].version_count, Some(3));
    }

    #[tokio::test]
    async fn list_packages_uses_orgs_scope_for_organizations() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/orgs/octo-org/packages")
            .match_query(Matcher::UrlEncoded("package_type".into(), "npm".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async()
            .await;

        let registry = GitHubRegistry::new(
            &server.url(),
            Owner::Organization("octo-org".to_string()),
            PackageType::Npm,
            "secret-token",
            Duration::from_secs(3),
        )
        .unwrap();
        let packages = registry.list_packages().await.unwrap();

        mock.assert_async().await;
        assert!(packages.is_empty());
    }

    #[tokio::test]
    async fn list_versions_follows_pagination_until_short_page() {
        let mut server = Server::new_async().await;

        let full_page: Vec<serde_json::Value> = (0..PAGE_SIZE)
            .map(|i| serde_json::json!({"id": i, "name": format!("1.0.{}", i)}))
            .collect();

        let first = server
            .mock("GET", "/users/octo/packages/maven/app/versions")
            .match_query(page_query("1"))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(serde_json::to_string(&full_page).unwrap())
            .create_async()
            .await;
        let second = server
            .mock("GET", "/users/octo/packages/maven/app/versions")
            .match_query(page_query("2"))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"id": 1000, "name": "2.0.0", "description": "latest"}]"#)
            .create_async()
            .await;

        let registry = user_registry(&server.url());
        let versions = registry.list_versions("app").await.unwrap();

        first.assert_async().await;
        second.assert_async().await;
        assert_eq!(versions.len(), PAGE_SIZE + 1);
        assert_eq!(versions[PAGE_SIZE].name, "2.0.0");
        assert_eq!(versions[PAGE_SIZE].description, "latest");
    }

    #[tokio::test]
    async fn list_versions_returns_status_error_for_error_response() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/users/octo/packages/maven/app/versions")
            .match_query(page_query("1"))
            .with_status(404)
            .with_header("content-type", "application/json")
            .with_body(r#"{"message": "Package not found."}"#)
            .create_async()
            .await;

        let registry = user_registry(&server.url());
        let result = registry.list_versions("app").await;

        mock.assert_async().await;
        let err = result.unwrap_err();
        assert!(matches!(err, RegistryError::Status { .. }));
        assert_eq!(err.status(), Some(reqwest::StatusCode::NOT_FOUND));
    }

    #[tokio::test]
    async fn get_package_returns_invalid_response_for_malformed_json() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/users/octo/packages/maven/app")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id": "not-a-number""#)
            .create_async()
            .await;

        let registry = user_registry(&server.url());
        let result = registry.get_package("app").await;

        mock.assert_async().await;
        assert!(matches!(result, Err(RegistryError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn get_package_returns_package() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/users/octo/packages/maven/app")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"id": 7, "name": "app", "visibility": "private",
                    "created_at": "2024-03-12T20:00:00Z", "updated_at": "2024-03-17T20:00:00Z"}"#,
            )
            .create_async()
            .await;

        let registry = user_registry(&server.url());
        let package = registry.get_package("app").await.unwrap();

        mock.assert_async().await;
        assert_eq!(package.id, 7);
        assert_eq!(package.visibility.as_deref(), Some("private"));
        assert_eq!(package.updated_at, "2024-03-17T20:00:00Z");
    }

    #[tokio::test]
    async fn delete_version_succeeds_on_no_content() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("DELETE", "/users/octo/packages/maven/app/versions/42")
            .match_header("authorization", "Bearer secret-token")
            .with_status(204)
            .create_async()
            .await;

        let registry = user_registry(&server.url());
        let result = registry.delete_version("app", 42).await;

        mock.assert_async().await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn delete_package_returns_status_error_for_forbidden() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("DELETE", "/users/octo/packages/maven/app")
            .with_status(403)
            .create_async()
            .await;

        let registry = user_registry(&server.url());
        let result = registry.delete_package("app").await;

        mock.assert_async().await;
        assert_eq!(
            result.unwrap_err().status(),
            Some(reqwest::StatusCode::FORBIDDEN)
        );
    }

    #[tokio::test]
    async fn namespaced_container_name_is_sent_as_single_path_segment() {
        let mut server = Server::new_async().await;

        let versions = server
            .mock("GET", "/users/octo/packages/container/repo%2Fimage/versions")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"id": 7, "name": "1.0.0"}]"#)
            .create_async()
            .await;
        let delete_version = server
            .mock("DELETE", "/users/octo/packages/container/repo%2Fimage/versions/7")
            .with_status(204)
            .create_async()
            .await;
        let delete_package = server
            .mock("DELETE", "/users/octo/packages/container/repo%2Fimage")
            .with_status(204)
            .create_async()
            .await;

        let registry = GitHubRegistry::new(
            &server.url(),
            Owner::User("octo".to_string()),
            PackageType::Container,
            "secret-token",
            Duration::from_secs(3),
        )
        .unwrap();

        let listed = registry.list_versions("repo/image").await.unwrap();
        registry.delete_version("repo/image", 7).await.unwrap();
        registry.delete_package("repo/image").await.unwrap();

        versions.assert_async().await;
        delete_version.assert_async().await;
        delete_package.assert_async().await;
        assert_eq!(listed[0].id, 7);
    }

    #[tokio::test]
    async fn unreachable_registry_returns_network_error() {
        // Nothing listens on port 9 (discard) in the test environment
        let registry = GitHubRegistry::new(
            "http://127.0.0.1:9",
            Owner::User("octo".to_string()),
            PackageType::Maven,
            "secret-token",
            Duration::from_millis(500),
        )
        .unwrap();

        let result = registry.delete_package("app").await;

        assert!(matches!(result, Err(RegistryError::Network(_))));
    }
}
