//! Path elements
//!
//! Provides [`PathElement`], one step of a field path: a map key, a list
//! element selected by key fields, a list element selected by value, or a
//! list position.

use crate::value::{compare_values, values_equal};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};

/// Named sub-field used to select a map-typed list element
#[derive(Debug, Clone)]
pub struct KeyField {
    /// Sub-field name
    pub name: String,
    /// Required value of the sub-field
    pub value: Value,
}

impl KeyField {
    /// Create key field
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// One step of a field path
///
/// # Examples
/// - `FieldName("spec")` → `.spec`
/// - `Key([name="app"])` → `[name="app"]`
/// - `Value("x")` → `[="x"]`
/// - `Index(2)` → `[2]`
#[derive(Debug, Clone)]
pub enum PathElement {
    /// Map key
    FieldName(String),

    /// List element whose named sub-fields all equal the given values.
    /// Fields are kept sorted by name.
    Key(Vec<KeyField>),

    /// List element equal to the given value
    Value(Value),

    /// List element at a position
    Index(i64),
}

impl PathElement {
    /// Field-name element
    #[inline]
    #[must_use]
    pub fn field(name: impl Into<String>) -> Self {
        Self::FieldName(name.into())
    }

    /// Key element from `(name, value)` pairs; pairs are sorted by name
    #[must_use]
    pub fn key<N: Into<String>>(fields: impl IntoIterator<Item = (N, Value)>) -> Self {
        let mut fields: Vec<KeyField> = fields
            .into_iter()
            .map(|(name, value)| KeyField::new(name, value))
            .collect();
        fields.sort_by(|a, b| a.name.cmp(&b.name));
        Self::Key(fields)
    }

    /// Value element
    #[inline]
    #[must_use]
    pub fn value(value: Value) -> Self {
        Self::Value(value)
    }

    /// Index element
    #[inline]
    #[must_use]
    pub fn index(index: i64) -> Self {
        Self::Index(index)
    }

    /// Field name, if this is a `FieldName` element
    #[inline]
    #[must_use]
    pub fn as_field_name(&self) -> Option<&str> {
        match self {
            Self::FieldName(name) => Some(name),
            _ => None,
        }
    }

    /// Short name of the element kind, used in diagnostics
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::FieldName(_) => "field",
            Self::Key(_) => "key",
            Self::Value(_) => "value",
            Self::Index(_) => "index",
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::FieldName(_) => 0,
            Self::Key(_) => 1,
            Self::Value(_) => 2,
            Self::Index(_) => 3,
        }
    }

    /// Parse a FieldsV1 object key (`f:`, `k:`, `v:` or `i:` prefixed)
    ///
    /// # Errors
    /// Returns [`ElementKeyError::UnknownPrefix`] for prefixes this version
    /// does not know, and [`ElementKeyError::Invalid`] for known prefixes
    /// whose payload cannot be parsed.
    pub fn from_fields_v1_key(key: &str) -> Result<Self, ElementKeyError> {
        let Some((prefix, payload)) = key.split_once(':') else {
            return Err(ElementKeyError::UnknownPrefix(key.to_string()));
        };

        match prefix {
            "f" => Ok(Self::FieldName(payload.to_string())),
            "k" => {
                let fields: Map<String, Value> = serde_json::from_str(payload)
                    .map_err(|e| ElementKeyError::invalid(key, e.to_string()))?;
                if fields.is_empty() {
                    return Err(ElementKeyError::invalid(key, "key selector has no fields"));
                }
                Ok(Self::key(fields))
            }
            "v" => serde_json::from_str(payload)
                .map(Self::Value)
                .map_err(|e| ElementKeyError::invalid(key, e.to_string())),
            "i" => payload
                .parse::<i64>()
                .map(Self::Index)
                .map_err(|e| ElementKeyError::invalid(key, e.to_string())),
            _ => Err(ElementKeyError::UnknownPrefix(key.to_string())),
        }
    }

    /// Render as a FieldsV1 object key
    #[must_use]
    pub fn to_fields_v1_key(&self) -> String {
        match self {
            Self::FieldName(name) => format!("f:{name}"),
            Self::Key(fields) => {
                let map: Map<String, Value> = fields
                    .iter()
                    .map(|f| (f.name.clone(), f.value.clone()))
                    .collect();
                format!("k:{}", Value::Object(map))
            }
            Self::Value(value) => format!("v:{value}"),
            Self::Index(index) => format!("i:{index}"),
        }
    }
}

impl Ord for PathElement {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank()).then_with(|| match (self, other) {
            (Self::FieldName(a), Self::FieldName(b)) => a.cmp(b),
            (Self::Key(a), Self::Key(b)) => {
                for (x, y) in a.iter().zip(b) {
                    let ord = x
                        .name
                        .cmp(&y.name)
                        .then_with(|| compare_values(&x.value, &y.value));
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
                a.len().cmp(&b.len())
            }
            (Self::Value(a), Self::Value(b)) => compare_values(a, b),
            (Self::Index(a), Self::Index(b)) => a.cmp(b),
            _ => Ordering::Equal,
        })
    }
}

impl PartialOrd for PathElement {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for PathElement {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PathElement {}

impl Display for PathElement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::FieldName(name) => write!(f, ".{name}"),
            Self::Key(fields) => {
                f.write_str("[")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}={}", field.name, field.value)?;
                }
                f.write_str("]")
            }
            Self::Value(value) => write!(f, "[={value}]"),
            Self::Index(index) => write!(f, "[{index}]"),
        }
    }
}

/// Whether a map matches every field of a key selector
#[must_use]
pub fn key_matches(fields: &[KeyField], candidate: &Map<String, Value>) -> bool {
    fields.iter().all(|field| {
        candidate
            .get(&field.name)
            .is_some_and(|v| values_equal(v, &field.value))
    })
}

/// Errors parsing a FieldsV1 object key
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ElementKeyError {
    /// Prefix is not one of `f`, `k`, `v`, `i`
    #[error("unknown path element prefix in {0:?}")]
    UnknownPrefix(String),

    /// Known prefix, unparsable payload
    #[error("invalid path element {key:?}: {reason}")]
    Invalid {
        /// Complete key text
        key: String,
        /// Why the payload was refused
        reason: String,
    },
}

impl ElementKeyError {
    fn invalid(key: &str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn element_display() {
        assert_eq!(PathElement::field("spec").to_string(), ".spec");
        assert_eq!(
            PathElement::key([("name", json!("test"))]).to_string(),
            r#"[name="test"]"#
        );
        assert_eq!(PathElement::value(json!("x")).to_string(), r#"[="x"]"#);
        assert_eq!(PathElement::index(3).to_string(), "[3]");
    }

    #[test]
    fn key_fields_are_sorted() {
        let pe = PathElement::key([("port", json!(80)), ("name", json!("http"))]);
        let PathElement::Key(fields) = &pe else {
            panic!("expected key element");
        };
        assert_eq!(fields[0].name, "name");
        assert_eq!(fields[1].name, "port");
    }

    #[test]
    fn parse_fields_v1_keys() {
        assert_eq!(
            PathElement::from_fields_v1_key("f:metadata").unwrap(),
            PathElement::field("metadata")
        );
        assert_eq!(
            PathElement::from_fields_v1_key(r#"k:{"name":"test"}"#).unwrap(),
            PathElement::key([("name", json!("test"))])
        );
        assert_eq!(
            PathElement::from_fields_v1_key(r#"v:"--verbose""#).unwrap(),
            PathElement::value(json!("--verbose"))
        );
        assert_eq!(
            PathElement::from_fields_v1_key("i:4").unwrap(),
            PathElement::index(4)
        );
    }

    #[test]
    fn field_names_may_contain_colons() {
        let pe = PathElement::from_fields_v1_key("f:example.com/a:b").unwrap();
        assert_eq!(pe.as_field_name(), Some("example.com/a:b"));
    }

    #[test]
    fn parse_unknown_prefix() {
        assert!(matches!(
            PathElement::from_fields_v1_key("z:whatever"),
            Err(ElementKeyError::UnknownPrefix(_))
        ));
        assert!(matches!(
            PathElement::from_fields_v1_key("noprefix"),
            Err(ElementKeyError::UnknownPrefix(_))
        ));
    }

    #[test]
    fn parse_invalid_payload() {
        assert!(matches!(
            PathElement::from_fields_v1_key("k:{not json"),
            Err(ElementKeyError::Invalid { .. })
        ));
        assert!(matches!(
            PathElement::from_fields_v1_key("k:{}"),
            Err(ElementKeyError::Invalid { .. })
        ));
        assert!(matches!(
            PathElement::from_fields_v1_key("i:x"),
            Err(ElementKeyError::Invalid { .. })
        ));
    }

    #[test]
    fn fields_v1_key_round_trip() {
        let pe = PathElement::key([("containerPort", json!(80)), ("protocol", json!("TCP"))]);
        let key = pe.to_fields_v1_key();
        assert_eq!(key, r#"k:{"containerPort":80,"protocol":"TCP"}"#);
        assert_eq!(PathElement::from_fields_v1_key(&key).unwrap(), pe);
    }

    #[test]
    fn ordering_by_kind_then_content() {
        let mut elements = vec![
            PathElement::index(0),
            PathElement::value(json!("a")),
            PathElement::field("b"),
            PathElement::key([("name", json!("x"))]),
            PathElement::field("a"),
        ];
        elements.sort();
        assert_eq!(elements[0], PathElement::field("a"));
        assert_eq!(elements[1], PathElement::field("b"));
        assert_eq!(elements[2].kind_name(), "key");
        assert_eq!(elements[3].kind_name(), "value");
        assert_eq!(elements[4].kind_name(), "index");
    }

    #[test]
    fn key_matches_requires_all_fields() {
        let PathElement::Key(fields) =
            PathElement::key([("name", json!("a")), ("port", json!(80))])
        else {
            panic!("expected key element");
        };
        let hit = json!({"name": "a", "port": 80, "extra": true});
        let miss = json!({"name": "a"});
        assert!(key_matches(&fields, hit.as_object().unwrap()));
        assert!(!key_matches(&fields, miss.as_object().unwrap()));
    }
}
