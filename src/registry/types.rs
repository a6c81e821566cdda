//! GitHub Packages models and owner/type selectors

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Type of package hosted by GitHub Packages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackageType {
    Npm,
    Maven,
    Rubygems,
    Docker,
    Nuget,
    Container,
}

impl PackageType {
    /// Returns the path/query representation used by the REST API
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageType::Npm => "npm",
            PackageType::Maven => "maven",
            PackageType::Rubygems => "rubygems",
            PackageType::Docker => "docker",
            PackageType::Nuget => "nuget",
            PackageType::Container => "container",
        }
    }
}

impl FromStr for PackageType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "npm" => Ok(PackageType::Npm),
            "maven" => Ok(PackageType::Maven),
            "rubygems" => Ok(PackageType::Rubygems),
            "docker" => Ok(PackageType::Docker),
            "nuget" => Ok(PackageType::Nuget),
            "container" => Ok(PackageType::Container),
            _ => Err(()),
        }
    }
}

impl fmt::Display for PackageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account owning the packages
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Owner {
    User(String),
    Organization(String),
}

impl Owner {
    /// REST path prefix for the owner, e.g. `users/octocat`
    pub fn scope_path(&self) -> String {
        match self {
            Owner::User(login) => format!("users/{}", login),
            Owner::Organization(org) => format!("orgs/{}", org),
        }
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Owner::User(name) => write!(f, "user {}", name),
            Owner::Organization(name) => write!(f, "organization {}", name),
        }
    }
}

/// Package as returned by `GET /users/{user}/packages/{type}/{name}`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Package {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub package_type: Option<String>,
    #[serde(default)]
    pub version_count: Option<u64>,
    #[serde(default)]
    pub visibility: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// Package version as returned by `GET .../packages/{type}/{name}/versions`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PackageVersion {
    pub id: u64,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

// GitHub sends `"description": null` for most maven versions
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
