//! Resource input
//!
//! Resources are read as a YAML document stream; a JSON document is accepted
//! as the YAML it also is. Empty documents are ignored and `*List` documents
//! are replaced by their items.

use crate::error::InputError;
use mutated_render::expand_lists;
use serde::Deserialize;
use serde_json::Value;
use std::fmt::{self, Display, Formatter};
use std::io::Read;
use std::path::PathBuf;

/// Where resources come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Standard input
    Stdin,
    /// File on disk
    File(PathBuf),
}

impl Source {
    /// Source named on the command line; `-` is stdin
    #[must_use]
    pub fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            Self::Stdin
        } else {
            Self::File(PathBuf::from(arg))
        }
    }

    fn read_to_string(&self) -> std::io::Result<String> {
        match self {
            Self::Stdin => {
                let mut text = String::new();
                std::io::stdin().read_to_string(&mut text)?;
                Ok(text)
            }
            Self::File(path) => std::fs::read_to_string(path),
        }
    }
}

impl Display for Source {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdin => f.write_str("<stdin>"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Read every resource of a source
///
/// # Errors
/// Returns [`InputError`] if the source cannot be read or parsed
pub fn read_resources(source: &Source) -> Result<Vec<Value>, InputError> {
    let text = source.read_to_string().map_err(|source_err| InputError::Io {
        origin: source.to_string(),
        source: source_err,
    })?;
    parse_documents(&text).map_err(|source_err| InputError::Parse {
        origin: source.to_string(),
        source: source_err,
    })
}

/// Split a document stream into resources
///
/// # Errors
/// Returns the YAML error of the first document that does not parse
pub fn parse_documents(text: &str) -> Result<Vec<Value>, serde_yaml::Error> {
    let mut resources = Vec::new();
    if text.trim().is_empty() {
        return Ok(resources);
    }
    for document in serde_yaml::Deserializer::from_str(text) {
        let value = Value::deserialize(document)?;
        if value.is_null() {
            continue;
        }
        resources.extend(expand_lists(value));
    }
    tracing::debug!("read {} resources", resources.len());
    Ok(resources)
}
