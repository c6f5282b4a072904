//! Mutated Ownership
//!
//! Which fields of a resource were set only by manually-operated field
//! managers.
//!
//! # Core Concepts
//!
//! - [`OwnershipRecord`]: One `metadata.managedFields` entry
//! - [`ClassifierRules`]: Injectable manual/automated rules (YAML or TOML)
//! - [`Classifier`]: Manual vs automated decision per record
//! - [`OwnershipResolver`]: Solely-manually-managed field set per document
//!
//! # Example
//!
//! ```rust
//! use mutated_ownership::{OwnershipRecord, OwnershipResolver};
//! use serde_json::json;
//!
//! let records = vec![
//!     OwnershipRecord::new("kube-controller-manager", json!({"f:spec": {"f:replicas": {}}})),
//!     OwnershipRecord::new("kubectl-edit", json!({"f:spec": {"f:paused": {}}})),
//! ];
//! let resolution = OwnershipResolver::default().resolve(&records).unwrap();
//! assert_eq!(resolution.managers, vec!["kubectl-edit"]);
//! assert_eq!(resolution.fields.size(), 1);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod classifier;
mod error;
mod record;
mod resolver;
mod rules;

// Re-exports
pub use classifier::{ActorClass, Classifier};
pub use error::{RecordError, ResolveError, RulesError};
pub use record::OwnershipRecord;
pub use resolver::{OwnershipResolver, Resolution};
pub use rules::ClassifierRules;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
