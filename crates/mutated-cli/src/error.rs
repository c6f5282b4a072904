//! Error types for the driver
//!
//! - Input (file or stdin → resource documents)
//! - Per-document processing (records, resolution, printing)

use mutated_ownership::{RecordError, ResolveError};
use mutated_render::RenderError;

/// Errors reading resource documents
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    /// Source could not be read
    #[error("cannot read {origin}: {source}")]
    Io {
        /// File path, or `<stdin>`
        origin: String,
        /// Underlying failure
        #[source]
        source: std::io::Error,
    },

    /// Source is not a YAML or JSON document stream
    #[error("cannot parse {origin}: {source}")]
    Parse {
        /// File path, or `<stdin>`
        origin: String,
        /// Parser failure
        #[source]
        source: serde_yaml::Error,
    },
}

/// Errors processing one resource
///
/// The driver logs these and moves on to the next resource, except for
/// output write failures.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// `metadata.managedFields` has the wrong shape
    #[error(transparent)]
    Records(#[from] RecordError),

    /// Ownership could not be resolved
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// Resource could not be printed
    #[error(transparent)]
    Render(#[from] RenderError),
}

impl DocumentError {
    /// Output itself failed; later resources would fail the same way
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Render(RenderError::Io(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_failures_are_fatal() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed");
        assert!(DocumentError::from(RenderError::from(io)).is_fatal());
        assert!(!DocumentError::from(RecordError::NotAList("string")).is_fatal());
    }

    #[test]
    fn input_errors_name_the_origin() {
        let err = InputError::Io {
            origin: "pods.yaml".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        assert_eq!(err.to_string(), "cannot read pods.yaml: no such file");
    }
}
