//! Resource helpers
//!
//! Identity of a resource document, metadata clean-up before printing, list
//! expansion and label selection.

use crate::error::ResourceError;
use serde_json::Value;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Identifying fields of a resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceIdentity {
    /// `apiVersion`, empty when absent
    pub api_version: String,
    /// `kind`
    pub kind: String,
    /// `metadata.name`
    pub name: String,
    /// Non-empty `metadata.namespace`
    pub namespace: Option<String>,
}

impl ResourceIdentity {
    /// Read identity from a resource document
    ///
    /// # Errors
    /// Returns [`ResourceError::MissingIdentity`] if `kind` or
    /// `metadata.name` is absent
    pub fn of(resource: &Value) -> Result<Self, ResourceError> {
        let text = |pointer: &str| resource.pointer(pointer).and_then(Value::as_str);
        Ok(Self {
            api_version: text("/apiVersion").unwrap_or_default().to_string(),
            kind: text("/kind")
                .ok_or(ResourceError::MissingIdentity("kind"))?
                .to_string(),
            name: text("/metadata/name")
                .ok_or(ResourceError::MissingIdentity("metadata.name"))?
                .to_string(),
            namespace: text("/metadata/namespace")
                .filter(|ns| !ns.is_empty())
                .map(str::to_string),
        })
    }

    /// API group; `None` for the core group
    #[must_use]
    pub fn group(&self) -> Option<&str> {
        self.api_version
            .split_once('/')
            .map(|(group, _)| group)
            .filter(|group| !group.is_empty())
    }

    /// Table name column: `kind[.group]/name`, lowercased kind and group
    #[must_use]
    pub fn name_column(&self) -> String {
        let group_kind = match self.group() {
            Some(group) => format!("{}.{}", self.kind, group),
            None => self.kind.clone(),
        };
        format!("{}/{}", group_kind.to_lowercase(), self.name)
    }
}

impl Display for ResourceIdentity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(namespace) => write!(f, "{} in namespace {}", self.name_column(), namespace),
            None => f.write_str(&self.name_column()),
        }
    }
}

/// Remove `metadata.managedFields`
pub fn strip_managed_fields(resource: &mut Value) {
    if let Some(metadata) = resource.get_mut("metadata").and_then(Value::as_object_mut) {
        metadata.remove("managedFields");
    }
}

/// Remove `metadata.namespace`
pub fn strip_namespace(resource: &mut Value) {
    if let Some(metadata) = resource.get_mut("metadata").and_then(Value::as_object_mut) {
        metadata.remove("namespace");
    }
}

/// Flatten `*List` documents into their items, recursively
///
/// Anything else is returned as the only element.
#[must_use]
pub fn expand_lists(document: Value) -> Vec<Value> {
    let is_list = document
        .get("kind")
        .and_then(Value::as_str)
        .is_some_and(|kind| kind.ends_with("List"))
        && document.get("items").is_some_and(Value::is_array);
    if !is_list {
        return vec![document];
    }

    match document {
        Value::Object(mut map) => match map.remove("items") {
            Some(Value::Array(items)) => items.into_iter().flat_map(expand_lists).collect(),
            _ => Vec::new(),
        },
        other => vec![other],
    }
}

/// One label requirement
#[derive(Debug, Clone, PartialEq, Eq)]
enum Requirement {
    Equals(String, String),
    NotEquals(String, String),
    Exists(String),
    NotExists(String),
}

impl Requirement {
    fn matches(&self, labels: Option<&serde_json::Map<String, Value>>) -> bool {
        let label = |key: &str| labels.and_then(|l| l.get(key)).and_then(Value::as_str);
        match self {
            Self::Equals(key, value) => label(key) == Some(value.as_str()),
            Self::NotEquals(key, value) => label(key) != Some(value.as_str()),
            Self::Exists(key) => labels.is_some_and(|l| l.contains_key(key)),
            Self::NotExists(key) => !labels.is_some_and(|l| l.contains_key(key)),
        }
    }
}

impl FromStr for Requirement {
    type Err = ResourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ResourceError::InvalidSelector(s.to_string());
        let word = |part: &str| {
            let part = part.trim();
            if part.is_empty() || part.contains(char::is_whitespace) {
                Err(invalid())
            } else {
                Ok(part.to_string())
            }
        };
        let value = |part: &str| {
            let part = part.trim();
            if part.contains(char::is_whitespace) {
                Err(invalid())
            } else {
                Ok(part.to_string())
            }
        };

        let s = s.trim();
        if let Some(key) = s.strip_prefix('!') {
            return Ok(Self::NotExists(word(key)?));
        }
        if let Some((key, v)) = s.split_once("!=") {
            return Ok(Self::NotEquals(word(key)?, value(v)?));
        }
        if let Some((key, v)) = s.split_once("==") {
            return Ok(Self::Equals(word(key)?, value(v)?));
        }
        if let Some((key, v)) = s.split_once('=') {
            return Ok(Self::Equals(word(key)?, value(v)?));
        }
        Ok(Self::Exists(word(s)?))
    }
}

/// Equality-based label selector
///
/// Comma-separated requirements: `k=v`, `k==v`, `k!=v`, `k`, `!k`. The empty
/// selector matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSelector {
    requirements: Vec<Requirement>,
}

impl LabelSelector {
    /// Whether the resource's `metadata.labels` satisfy every requirement
    #[must_use]
    pub fn matches(&self, resource: &Value) -> bool {
        let labels = resource
            .pointer("/metadata/labels")
            .and_then(Value::as_object);
        self.requirements.iter().all(|r| r.matches(labels))
    }

    /// Selector without requirements
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty()
    }
}

impl FromStr for LabelSelector {
    type Err = ResourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Ok(Self::default());
        }
        let requirements = s
            .split(',')
            .map(str::parse)
            .collect::<Result<_, _>>()?;
        Ok(Self { requirements })
    }
}
