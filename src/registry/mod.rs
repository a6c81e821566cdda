//! Package registry access
//!
//! - [`client`]: `Registry` trait consumed by the retention engine
//! - [`github`]: GitHub Packages REST implementation
//! - [`types`]: JSON models, package types and owners
//! - [`error`]: Transport, status and decoding errors

pub mod client;
pub mod error;
pub mod github;
pub mod types;

pub use client::Registry;
pub use error::RegistryError;
pub use github::GitHubRegistry;
pub use types::{Owner, Package, PackageType, PackageVersion};
