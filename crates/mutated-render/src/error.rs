//! Error types for rendering
//!
//! - Projection of a field-path set onto a data tree
//! - Parsing the YAML syntax tree
//! - Highlighting a syntax tree
//! - Reading resource identity and label selectors
//! - Printing (combines all of the above)

use mutated_fieldpath::Path;

/// Errors while projecting a set onto a data tree
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    /// Map lacks a field the set addresses
    #[error("missing field: {path}")]
    MissingField {
        /// Path of the absent field
        path: Path,
    },

    /// Map addressed by something other than a field name
    #[error("path of unexpected type: {path}")]
    UnexpectedPathElement {
        /// Path ending in the offending element
        path: Path,
    },

    /// Tree node has the wrong shape for the set
    #[error("unexpected type {found} at {path}, expecting {expected}")]
    UnexpectedType {
        /// Shape the set requires
        expected: &'static str,
        /// Shape the tree has
        found: &'static str,
        /// Where the shapes disagree
        path: Path,
    },

    /// No list element satisfies the selector
    #[error("no match for path: {path}")]
    NoMatch {
        /// Path ending in the selector
        path: Path,
    },
}

impl ProjectError {
    /// Create unexpected type error
    pub fn unexpected_type(expected: &'static str, found: &'static str, path: Path) -> Self {
        Self::UnexpectedType {
            expected,
            found,
            path,
        }
    }
}

/// Errors while parsing YAML into a syntax tree
#[derive(Debug, thiserror::Error)]
pub enum SyntaxError {
    /// Quoted scalar or flow collection never closed
    #[error("unterminated {what} starting at line {line}, column {column}")]
    Unterminated {
        /// Construct left open
        what: &'static str,
        /// One-based line of the opening character
        line: usize,
        /// One-based column of the opening character
        column: usize,
    },

    /// Token that does not fit the surrounding structure
    #[error("unexpected {found:?} at line {line}, column {column}")]
    Unexpected {
        /// Source text of the token
        found: String,
        /// One-based line of the token
        line: usize,
        /// One-based column of the token
        column: usize,
    },

    /// Quoted mapping key that does not decode to a string
    #[error("invalid mapping key at line {line}: {source}")]
    InvalidKey {
        /// One-based line of the key
        line: usize,
        /// Decoder failure
        #[source]
        source: serde_yaml::Error,
    },
}

/// Errors while highlighting a syntax tree
#[derive(Debug, thiserror::Error)]
pub enum HighlightError {
    /// Node has the wrong kind for the path element
    #[error("unexpected {found} at {path}, expecting {expected}")]
    UnexpectedKind {
        /// Node kind the path element requires
        expected: &'static str,
        /// Node kind in the tree
        found: &'static str,
        /// Path up to the element
        path: Path,
    },

    /// No key or entry matches
    #[error("no match for {path}")]
    NoMatch {
        /// Path up to the unmatched element
        path: Path,
    },

    /// Candidate node text could not be decoded for comparison
    #[error("cannot decode node at {path}: {source}")]
    Decode {
        /// Path of the candidate
        path: Path,
        /// Decoder failure
        #[source]
        source: serde_yaml::Error,
    },
}

impl HighlightError {
    /// Create unexpected kind error
    pub fn unexpected_kind(expected: &'static str, found: &'static str, path: Path) -> Self {
        Self::UnexpectedKind {
            expected,
            found,
            path,
        }
    }
}

/// Errors reading resource metadata or selectors
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    /// Required identity field absent or not a string
    #[error("resource has no {0}")]
    MissingIdentity(&'static str),

    /// Label selector requirement does not parse
    #[error("invalid label selector requirement: '{0}'")]
    InvalidSelector(String),
}

/// Errors while printing a resource
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Output write failed
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failed
    #[error("cannot marshal JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization failed
    #[error("cannot marshal YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Filtering failed
    #[error("cannot filter resource: {0}")]
    Project(#[from] ProjectError),

    /// Rendered YAML could not be re-parsed
    #[error("cannot parse rendered YAML: {0}")]
    Syntax(#[from] SyntaxError),

    /// Highlighting failed
    #[error("cannot highlight resource: {0}")]
    Highlight(#[from] HighlightError),

    /// Resource metadata problem
    #[error(transparent)]
    Resource(#[from] ResourceError),
}
