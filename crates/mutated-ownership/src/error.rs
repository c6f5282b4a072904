//! Error types for ownership resolution
//!
//! - Rules loading (file → [`ClassifierRules`](crate::ClassifierRules))
//! - Record extraction (`metadata.managedFields` → records)
//! - Resolution (records → field-path set)

use mutated_fieldpath::DecodeError;
use std::path::PathBuf;

/// Errors loading classifier rules
#[derive(Debug, thiserror::Error)]
pub enum RulesError {
    /// IO error during file read
    #[error("io error reading {path}: {source}")]
    Io {
        /// Rules file
        path: PathBuf,
        /// Underlying failure
        #[source]
        source: std::io::Error,
    },

    /// Rules file extension is neither YAML nor TOML
    #[error("unsupported rules format: {0} (expected .yaml, .yml or .toml)")]
    UnsupportedFormat(PathBuf),

    /// YAML syntax or shape error
    #[error("invalid YAML rules: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// TOML syntax or shape error
    #[error("invalid TOML rules: {0}")]
    Toml(#[from] toml::de::Error),

    /// A reconcile trigger path has no elements
    #[error("reconcile trigger path #{0} is empty")]
    EmptyTriggerPath(usize),
}

impl RulesError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors reading ownership records from a resource
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// `metadata.managedFields` exists but is not a list
    #[error("metadata.managedFields must be a list, found {0}")]
    NotAList(&'static str),

    /// One entry does not have the managed-fields shape
    #[error("invalid managedFields entry #{index}: {source}")]
    InvalidEntry {
        /// Position in `metadata.managedFields`
        index: usize,
        /// Shape mismatch
        #[source]
        source: serde_json::Error,
    },
}

/// Errors during ownership resolution
///
/// Malformed FieldsV1 payloads never surface here; they are logged and
/// handled by the fail-open / skip policies.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// The decoder refused a payload for a reason other than bad input
    #[error("cannot decode fields owned by {manager:?}: {source}")]
    Decode {
        /// Manager owning the payload
        manager: String,
        /// Decoder refusal
        #[source]
        source: DecodeError,
    },
}

impl ResolveError {
    /// Create decode error for a manager
    pub fn decode(manager: impl Into<String>, source: DecodeError) -> Self {
        Self::Decode {
            manager: manager.into(),
            source,
        }
    }
}
