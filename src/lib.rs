//! Retention policy engine for GitHub Packages
//!
//! Selects outdated versions of a package (keep the N newest major, minor or
//! patch lines, drop snapshots, drop one named version) and deletes them
//! concurrently. When every version qualifies, the package itself is deleted.

pub mod config;
pub mod logging;
pub mod registry;
pub mod retention;
