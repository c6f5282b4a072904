//! Mutated CLI
//!
//! Local driver behind the `kubectl-mutated` binary: reads resources from
//! files or stdin and prints the fields only manual field managers set.
//!
//! # Core Concepts
//!
//! - [`Source`] / [`read_resources`]: YAML or JSON document streams
//! - [`Driver`]: Filter, resolve and print each resource
//! - [`command`] / [`Settings`]: Command line

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod cli;
mod driver;
mod error;
mod input;

// Re-exports
pub use cli::{command, Settings};
pub use driver::{Driver, RunStats};
pub use error::{DocumentError, InputError};
pub use input::{parse_documents, read_resources, Source};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
