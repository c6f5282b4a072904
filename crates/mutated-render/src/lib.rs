//! Mutated Render
//!
//! Presents solely-manually-managed fields of a resource.
//!
//! # Core Concepts
//!
//! - [`project`] / [`filter_resource`]: Reduce a data tree to a field-path set
//! - [`SyntaxTree`]: Format-preserving YAML document
//! - [`highlight`]: Mark a field-path set in a [`SyntaxTree`]
//! - [`Printer`]: Table, filtered YAML/JSON and highlighted YAML output
//!
//! # Example
//!
//! ```rust
//! use mutated_fieldpath::{FieldPathSet, Path};
//! use mutated_render::{highlight, Marker, SyntaxTree};
//!
//! let mut tree = SyntaxTree::parse("spec:\n  replicas: 3\n  paused: true\n").unwrap();
//! let set = FieldPathSet::from_paths(&[Path::from_fields(["spec", "paused"])]);
//! highlight(&mut tree, &set).unwrap();
//!
//! let out = tree.render_marked(&Marker::PLAIN);
//! assert_eq!(out, "spec:\n  replicas: 3\n  «paused»«:» «true»\n");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod error;
mod highlight;
mod project;
mod resource;
mod summary;

pub mod printers;
pub mod syntax;

// Re-exports
pub use error::{HighlightError, ProjectError, RenderError, ResourceError, SyntaxError};
pub use highlight::{highlight, Marker};
pub use printers::{printer_for, OutputFormat, PrintOptions, Printer};
pub use project::{filter_resource, project};
pub use resource::{
    expand_lists, strip_managed_fields, strip_namespace, LabelSelector, ResourceIdentity,
};
pub use summary::Summary;
pub use syntax::SyntaxTree;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
