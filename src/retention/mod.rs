//! Retention engine deciding and executing package version deletions
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Deleter   │────▶│  Selector   │────▶│   Policy    │
//! │ (fan-out)   │     │ (candidates)│     │  (rules)    │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        │                   │                   │
//!        ▼                   ▼                   ▼
//! ┌─────────────────────────────────┐     ┌─────────────┐
//! │            Registry             │     │ VersionKey  │
//! │   (list, get, delete via REST)  │     │  (parsing)  │
//! └─────────────────────────────────┘     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`version_key`]: `major.minor.patch[-SNAPSHOT]` parsing
//! - [`policy`]: Keep-N and snapshot/name rules
//! - [`candidates`]: Candidate selection, including the whole-package fallback
//! - [`deletion`]: Concurrent deletion with aggregated failures
//! - [`error`]: Parse and retention errors

pub mod candidates;
pub mod deletion;
pub mod error;
pub mod policy;
pub mod version_key;

pub use candidates::{Candidate, CandidateKind, CandidateSelector};
pub use deletion::Deleter;
pub use error::{RetentionError, VersionKeyError};
pub use policy::RetentionPolicy;
pub use version_key::VersionKey;
