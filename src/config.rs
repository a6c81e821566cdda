use std::fmt;
use std::time::Duration;

use thiserror::Error;
use tracing::{info, warn};

use crate::registry::github::DEFAULT_BASE_URL;
use crate::registry::{Owner, PackageType};
use crate::retention::RetentionPolicy;

// =============================================================================
// Environment variables
// =============================================================================

/// GitHub Actions passes action inputs with this prefix
pub const ENV_INPUT_PREFIX: &str = "INPUT_";

pub const ENV_REST_API_URL: &str = "GITHUB_REST_API_URL";
pub const ENV_ORGANIZATION: &str = "GITHUB_ORGANIZATION";
pub const ENV_USER: &str = "GITHUB_USER";
pub const ENV_PACKAGE_TYPE: &str = "PACKAGE_TYPE";
pub const ENV_PACKAGE_NAME: &str = "PACKAGE_NAME";
pub const ENV_VERSION_NAME_TO_DELETE: &str = "VERSION_NAME_TO_DELETE";
pub const ENV_DELETE_SNAPSHOTS: &str = "DELETE_SNAPSHOTS";
pub const ENV_NUMBER_MAJOR_TO_KEEP: &str = "NUMBER_MAJOR_TO_KEEP";
pub const ENV_NUMBER_MINOR_TO_KEEP: &str = "NUMBER_MINOR_TO_KEEP";
pub const ENV_NUMBER_PATCH_TO_KEEP: &str = "NUMBER_PATCH_TO_KEEP";
pub const ENV_GITHUB_TOKEN: &str = "GITHUB_TOKEN";
pub const ENV_DRY_RUN: &str = "DRY_RUN";
pub const ENV_DEBUG: &str = "DEBUG_LOGS";
pub const ENV_TIMEOUT: &str = "REST_TIMEOUT";

// =============================================================================
// Defaults
// =============================================================================

/// Timeout for REST calls in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 3;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Fill exactly one: either user or organization")]
    InvalidOwner,

    #[error("The package type '{0}' is unknown")]
    UnknownPackageType(String),

    #[error("Missing package name")]
    MissingPackageName,

    #[error("Missing GitHub token")]
    MissingToken,

    #[error(
        "Nothing configured to delete: set a concrete version name, snapshot deletion or major, minor or patch to keep"
    )]
    NothingToDelete,
}

/// Configuration of a retention run
#[derive(Clone, PartialEq)]
pub struct Config {
    /// Base URL of the GitHub REST API
    pub rest_url: String,
    pub owner: Owner,
    pub package_type: PackageType,
    pub package_name: String,
    pub policy: RetentionPolicy,
    /// Token to authenticate against the REST API
    pub token: String,
    /// Only log candidates, delete nothing. Defaults to true
    pub dry_run: bool,
    pub debug: bool,
    /// Timeout per REST call
    pub timeout: Duration,
}

impl Config {
    /// Reads the configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through `lookup`, which resolves one variable name.
    ///
    /// Every variable falls back to its `INPUT_` prefixed name when empty.
    /// The values read are logged before validation, so a rejected
    /// configuration still shows what was received.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw = RawConfig::read(&EnvReader { lookup });
        raw.log_summary();
        raw.validate()
    }
}

/// Configuration values as read from the environment, not yet validated
#[derive(Debug, Clone, PartialEq)]
pub struct RawConfig {
    pub rest_url: String,
    pub user: String,
    pub organization: String,
    pub package_type: String,
    pub package_name: String,
    pub version_name_to_delete: String,
    pub delete_snapshots: bool,
    pub keep_major: Option<u64>,
    pub keep_minor: Option<u64>,
    pub keep_patch: Option<u64>,
    pub token: String,
    pub dry_run: bool,
    pub debug: bool,
    pub timeout: Duration,
}

impl RawConfig {
    fn read<F>(env: &EnvReader<F>) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            rest_url: env.string_or(ENV_REST_API_URL, DEFAULT_BASE_URL),
            user: env.string(ENV_USER),
            organization: env.string(ENV_ORGANIZATION),
            package_type: env.string(ENV_PACKAGE_TYPE),
            package_name: env.string(ENV_PACKAGE_NAME),
            version_name_to_delete: env.string(ENV_VERSION_NAME_TO_DELETE),
            delete_snapshots: env.flag(ENV_DELETE_SNAPSHOTS, false),
            keep_major: env.positive(ENV_NUMBER_MAJOR_TO_KEEP),
            keep_minor: env.positive(ENV_NUMBER_MINOR_TO_KEEP),
            keep_patch: env.positive(ENV_NUMBER_PATCH_TO_KEEP),
            token: env.string(ENV_GITHUB_TOKEN),
            dry_run: env.flag(ENV_DRY_RUN, true),
            debug: env.flag(ENV_DEBUG, false),
            timeout: Duration::from_secs(
                env.positive(ENV_TIMEOUT).unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
        }
    }

    pub fn validate(self) -> Result<Config, ConfigError> {
        let owner = match (self.user.is_empty(), self.organization.is_empty()) {
            (false, true) => Owner::User(self.user),
            (true, false) => Owner::Organization(self.organization),
            _ => return Err(ConfigError::InvalidOwner),
        };

        let package_type: PackageType = self
            .package_type
            .parse()
            .map_err(|_| ConfigError::UnknownPackageType(self.package_type.clone()))?;

        if self.package_name.is_empty() {
            return Err(ConfigError::MissingPackageName);
        }
        if self.token.is_empty() {
            return Err(ConfigError::MissingToken);
        }

        let policy = RetentionPolicy {
            version_name_to_delete: Some(self.version_name_to_delete)
                .filter(|name| !name.is_empty()),
            delete_snapshots: self.delete_snapshots,
            keep_major: self.keep_major.unwrap_or(0) as usize,
            keep_minor: self.keep_minor.unwrap_or(0) as usize,
            keep_patch: self.keep_patch.unwrap_or(0) as usize,
        };
        if policy.is_empty() {
            return Err(ConfigError::NothingToDelete);
        }

        Ok(Config {
            rest_url: self.rest_url,
            owner,
            package_type,
            package_name: self.package_name,
            policy,
            token: self.token,
            dry_run: self.dry_run,
            debug: self.debug,
            timeout: self.timeout,
        })
    }

    /// Summary lines of the values read, with the token masked
    pub fn summary(&self) -> Vec<String> {
        let token = if self.token.is_empty() { "" } else { "***" };
        vec![
            format!("  GitHubRestUrl:       {}", self.rest_url),
            format!("  GitHubUser:          {}", self.user),
            format!("  GitHubOrganization:  {}", self.organization),
            format!("  PackageType:         {}", self.package_type),
            format!("  PackageName:         {}", self.package_name),
            format!("  VersionNameToDelete: {}", self.version_name_to_delete),
            format!("  DeleteSnapshots:     {}", self.delete_snapshots),
            format!("  MajorVersionsToKeep: {}", count_or_blank(self.keep_major)),
            format!("  MinorVersionsToKeep: {}", count_or_blank(self.keep_minor)),
            format!("  PatchVersionsToKeep: {}", count_or_blank(self.keep_patch)),
            format!("  GithubToken:         {}", token),
            format!("  DryRun:              {}", self.dry_run),
            format!("  DebugLog:            {}", self.debug),
            format!("  RestTimeout:         {}s", self.timeout.as_secs()),
        ]
    }

    pub fn log_summary(&self) {
        info!("Read configuration");
        for line in self.summary() {
            info!("{}", line);
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("rest_url", &self.rest_url)
            .field("owner", &self.owner)
            .field("package_type", &self.package_type)
            .field("package_name", &self.package_name)
            .field("policy", &self.policy)
            .field("token", &"***")
            .field("dry_run", &self.dry_run)
            .field("debug", &self.debug)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Returns whether debug logging is requested, before the full configuration is read
pub fn debug_logs_enabled() -> bool {
    EnvReader {
        lookup: |name: &str| std::env::var(name).ok(),
    }
    .flag(ENV_DEBUG, false)
}

fn count_or_blank(value: Option<u64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

struct EnvReader<F> {
    lookup: F,
}

impl<F> EnvReader<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Trimmed value of `name`, retried with the `INPUT_` prefix when empty
    fn string(&self, name: &str) -> String {
        let value = self.trimmed(name);
        if !value.is_empty() {
            return value;
        }
        self.trimmed(&format!("{}{}", ENV_INPUT_PREFIX, name))
    }

    fn trimmed(&self, name: &str) -> String {
        (self.lookup)(name)
            .map(|v| v.trim().to_string())
            .unwrap_or_default()
    }

    fn string_or(&self, name: &str, default: &str) -> String {
        let value = self.string(name);
        if value.is_empty() {
            default.to_string()
        } else {
            value
        }
    }

    fn flag(&self, name: &str, default: bool) -> bool {
        let value = self.string(name);
        if value.is_empty() {
            default
        } else {
            value.eq_ignore_ascii_case("true")
        }
    }

    /// Positive integer value; missing, unparseable and non-positive values yield `None`
    fn positive(&self, name: &str) -> Option<u64> {
        let value = self.string(name);
        if value.is_empty() {
            return None;
        }

        match value.parse::<i64>() {
            Ok(number) if number > 0 => Some(number as u64),
            Ok(number) => {
                warn!(
                    "Only positive values are allowed but found {} for environment variable {}",
                    number, name
                );
                None
            }
            Err(e) => {
                warn!("Invalid number '{}' for environment variable {}: {}", value, name, e);
                None
            }
        }
    }
}
