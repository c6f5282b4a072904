//! FieldsV1 codec
//!
//! The `managedFields[].fieldsV1` encoding is a JSON object whose keys are
//! path elements (`f:`, `k:`, `v:`, `i:`) and whose values are nested objects
//! of the same shape. A `"."` key marks the enclosing element as a member
//! even though it also has children; an object with no decodable children is
//! a member. Keys with unknown prefixes are skipped.

use crate::element::{ElementKeyError, PathElement};
use crate::set::FieldPathSet;
use serde_json::{Map, Value};

/// Maximum nesting accepted while decoding
pub const MAX_DEPTH: usize = 64;

/// Errors decoding a FieldsV1 payload
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// No payload present on the record
    #[error("fieldsV1 is missing")]
    Missing,

    /// Payload is not valid JSON
    #[error("invalid fieldsV1 JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    /// A level of the payload is not a JSON object
    #[error("fieldsV1 must be made of JSON objects, found {found}")]
    NotAnObject {
        /// JSON type found instead
        found: &'static str,
    },

    /// A key with a known prefix could not be parsed
    #[error(transparent)]
    InvalidPathElement(ElementKeyError),

    /// Payload nests deeper than [`MAX_DEPTH`]
    #[error("fieldsV1 nesting exceeds {limit} levels")]
    DepthExceeded {
        /// Nesting limit in effect
        limit: usize,
    },
}

impl DecodeError {
    /// Whether the payload itself is bad, as opposed to the decoder refusing it
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        !matches!(self, Self::DepthExceeded { .. })
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl FieldPathSet {
    /// Decode a FieldsV1 payload given as JSON bytes
    ///
    /// # Errors
    /// Returns [`DecodeError`] if the bytes are not a valid FieldsV1 document
    pub fn from_fields_v1_slice(bytes: &[u8]) -> Result<Self, DecodeError> {
        let value: Value = serde_json::from_slice(bytes).map_err(DecodeError::InvalidJson)?;
        Self::from_fields_v1(&value)
    }

    /// Decode a FieldsV1 payload already parsed into a JSON value
    ///
    /// # Errors
    /// Returns [`DecodeError`] if the value is not a valid FieldsV1 document
    pub fn from_fields_v1(value: &Value) -> Result<Self, DecodeError> {
        let object = value.as_object().ok_or(DecodeError::NotAnObject {
            found: json_kind(value),
        })?;
        let (children, _) = read_level(object, 1)?;
        Ok(children.unwrap_or_default())
    }

    /// Encode as a FieldsV1 JSON object
    #[must_use]
    pub fn to_fields_v1(&self) -> Value {
        Value::Object(write_level(self))
    }
}

/// Decode one object level; returns the subset below it and whether the
/// enclosing element is itself a member
fn read_level(
    object: &Map<String, Value>,
    depth: usize,
) -> Result<(Option<FieldPathSet>, bool), DecodeError> {
    if depth > MAX_DEPTH {
        return Err(DecodeError::DepthExceeded { limit: MAX_DEPTH });
    }

    let mut children: Option<FieldPathSet> = None;
    let mut is_member = false;

    for (key, nested) in object {
        if key == "." {
            is_member = true;
            continue;
        }

        let element = match PathElement::from_fields_v1_key(key) {
            Ok(element) => element,
            Err(ElementKeyError::UnknownPrefix(_)) => continue,
            Err(e) => return Err(DecodeError::InvalidPathElement(e)),
        };

        let nested = nested.as_object().ok_or(DecodeError::NotAnObject {
            found: json_kind(nested),
        })?;
        let (grandchildren, child_is_member) = read_level(nested, depth + 1)?;

        let set = children.get_or_insert_with(FieldPathSet::new);
        if child_is_member {
            set.members.insert(element.clone());
        }
        if let Some(grandchildren) = grandchildren {
            let merged = match set.children.remove(&element) {
                Some(existing) => existing.union(&grandchildren),
                None => grandchildren,
            };
            set.children.insert(element, merged);
        }
    }

    if children.is_none() {
        is_member = true;
    }
    Ok((children, is_member))
}

fn write_level(set: &FieldPathSet) -> Map<String, Value> {
    let mut elements: Vec<&PathElement> = set.members.iter().chain(set.children.keys()).collect();
    elements.sort();
    elements.dedup();

    let mut out = Map::new();
    for element in elements {
        let mut entry = Map::new();
        if let Some(child) = set.children.get(element).filter(|c| !c.is_empty()) {
            if set.members.contains(element) {
                entry.insert(".".to_string(), Value::Object(Map::new()));
            }
            entry.extend(write_level(child));
        }
        out.insert(element.to_fields_v1_key(), Value::Object(entry));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::Path;
    use serde_json::json;

    const POD_FIELDS: &str = r#"{
        "f:metadata": {"f:labels": {".": {}, "f:app": {}}},
        "f:spec": {
            "f:containers": {
                "k:{\"name\":\"test\"}": {
                    ".": {},
                    "f:image": {},
                    "f:name": {}
                }
            }
        }
    }"#;

    fn container(field: &str) -> Path {
        Path::new(vec![
            PathElement::field("spec"),
            PathElement::field("containers"),
            PathElement::key([("name", json!("test"))]),
            PathElement::field(field),
        ])
    }

    #[test]
    fn decode_pod_fields() {
        let set = FieldPathSet::from_fields_v1_slice(POD_FIELDS.as_bytes()).unwrap();
        assert!(set.has(&container("image")));
        assert!(set.has(&container("name")));
        assert!(set.has(&Path::from_fields(["metadata", "labels"])));
        assert!(set.has(&Path::from_fields(["metadata", "labels", "app"])));
        assert_eq!(set.size(), 5);
        assert_eq!(set.leaves().size(), 3);
    }

    #[test]
    fn empty_object_is_empty_set() {
        let set = FieldPathSet::from_fields_v1(&json!({})).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn unknown_prefixes_are_skipped() {
        let set = FieldPathSet::from_fields_v1(&json!({
            "f:spec": {"x:future": {}, "f:replicas": {}}
        }))
        .unwrap();
        assert_eq!(set.paths(), vec![Path::from_fields(["spec", "replicas"])]);
    }

    #[test]
    fn only_unknown_children_make_a_member() {
        let set = FieldPathSet::from_fields_v1(&json!({"f:spec": {"x:future": {}}})).unwrap();
        assert!(set.has(&Path::from_fields(["spec"])));
    }

    #[test]
    fn invalid_json_is_malformed() {
        let err = FieldPathSet::from_fields_v1_slice(b"{not json").unwrap_err();
        assert!(matches!(err, DecodeError::InvalidJson(_)));
        assert!(err.is_malformed());
    }

    #[test]
    fn non_object_is_malformed() {
        let err = FieldPathSet::from_fields_v1(&json!({"f:spec": []})).unwrap_err();
        assert!(matches!(err, DecodeError::NotAnObject { found: "array" }));
        assert!(err.is_malformed());
    }

    #[test]
    fn bad_key_payload_is_malformed() {
        let err = FieldPathSet::from_fields_v1(&json!({"k:{oops": {}})).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidPathElement(_)));
        assert!(err.is_malformed());
    }

    #[test]
    fn excessive_nesting_is_not_malformed() {
        let mut value = json!({});
        for _ in 0..=MAX_DEPTH {
            value = json!({ "f:a": value });
        }
        let err = FieldPathSet::from_fields_v1(&value).unwrap_err();
        assert!(matches!(err, DecodeError::DepthExceeded { .. }));
        assert!(!err.is_malformed());
    }

    #[test]
    fn encode_marks_member_prefixes_with_dot() {
        let set = FieldPathSet::from_fields_v1_slice(POD_FIELDS.as_bytes()).unwrap();
        let encoded = set.to_fields_v1();
        assert_eq!(
            encoded["f:metadata"]["f:labels"],
            json!({".": {}, "f:app": {}})
        );
        assert_eq!(
            encoded["f:spec"]["f:containers"][r#"k:{"name":"test"}"#]["f:image"],
            json!({})
        );
        assert_eq!(FieldPathSet::from_fields_v1(&encoded).unwrap(), set);
    }
}
