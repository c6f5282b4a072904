//! Mutated Field Paths
//!
//! Field-path sets as used by server-side-apply ownership tracking.
//!
//! # Core Concepts
//!
//! - [`PathElement`]: One step of a path (field name, list key, list value, index)
//! - [`Path`]: Sequence of elements from the document root
//! - [`FieldPathSet`]: Trie of paths with union/difference/leaves algebra
//! - FieldsV1: the `managedFields[].fieldsV1` JSON encoding of a set
//!
//! # Example
//!
//! ```rust
//! use mutated_fieldpath::{FieldPathSet, Path};
//!
//! let raw = br#"{"f:spec":{"f:replicas":{}}}"#;
//! let set = FieldPathSet::from_fields_v1_slice(raw).unwrap();
//! assert!(set.has(&Path::from_fields(["spec", "replicas"])));
//! ```

#![warn(unreachable_pub)]

mod element;
mod fields_v1;
mod path;
mod set;
mod value;

// Re-exports
pub use element::{key_matches, ElementKeyError, KeyField, PathElement};
pub use fields_v1::{DecodeError, MAX_DEPTH};
pub use path::Path;
pub use set::FieldPathSet;
pub use value::{compare_values, values_equal};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
