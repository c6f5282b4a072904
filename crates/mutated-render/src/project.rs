//! Tree projector
//!
//! Reduces a data tree to the parts a field-path set addresses. Maps are
//! addressed by field name; list elements by key, value or index. Addressed
//! list elements keep their original relative order, map fields keep the
//! document's field order.

use crate::error::ProjectError;
use mutated_fieldpath::{key_matches, values_equal, FieldPathSet, Path, PathElement};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Project `tree` onto `set`
///
/// # Errors
/// Returns [`ProjectError`] naming the offending path when the set does not
/// fit the tree
pub fn project(tree: &Value, set: &FieldPathSet) -> Result<Value, ProjectError> {
    project_at(tree, set, &Path::root())
}

/// Project a resource and re-attach its identifying fields
///
/// `apiVersion`, `kind`, `metadata.name` and a non-empty `metadata.namespace`
/// are always present in the result.
///
/// # Errors
/// See [`project`]
pub fn filter_resource(resource: &Value, set: &FieldPathSet) -> Result<Value, ProjectError> {
    let projected = match project(resource, set)? {
        Value::Object(map) => map,
        other => {
            return Err(ProjectError::unexpected_type(
                "map",
                type_name(&other),
                Path::root(),
            ))
        }
    };

    let mut out = Map::new();
    for key in ["apiVersion", "kind"] {
        if let Some(value) = resource.get(key) {
            out.insert(key.to_string(), value.clone());
        }
    }

    let mut metadata = Map::new();
    if let Some(name) = resource.pointer("/metadata/name") {
        metadata.insert("name".to_string(), name.clone());
    }
    if let Some(namespace) = resource
        .pointer("/metadata/namespace")
        .filter(|ns| ns.as_str().is_some_and(|ns| !ns.is_empty()))
    {
        metadata.insert("namespace".to_string(), namespace.clone());
    }

    let mut rest = Map::new();
    for (key, value) in projected {
        match (key.as_str(), value) {
            ("apiVersion" | "kind", _) => {}
            ("metadata", Value::Object(fields)) => metadata.extend(fields),
            ("metadata", _) => {}
            (_, value) => {
                rest.insert(key, value);
            }
        }
    }

    out.insert("metadata".to_string(), Value::Object(metadata));
    out.extend(rest);
    Ok(Value::Object(out))
}

fn project_at(tree: &Value, set: &FieldPathSet, at: &Path) -> Result<Value, ProjectError> {
    match tree {
        Value::Object(map) => project_map(map, set, at).map(Value::Object),
        Value::Array(items) => project_list(items, set, at).map(Value::Array),
        scalar if set.is_empty() => Ok(scalar.clone()),
        scalar => Err(ProjectError::unexpected_type(
            "map or list",
            type_name(scalar),
            at.clone(),
        )),
    }
}

fn project_map(
    map: &Map<String, Value>,
    set: &FieldPathSet,
    at: &Path,
) -> Result<Map<String, Value>, ProjectError> {
    let mut picked: HashMap<&str, Value> = HashMap::new();

    for element in set.members() {
        let (name, value) = field(map, element, at)?;
        picked.insert(name, value.clone());
    }
    for (element, child) in set.children() {
        let (name, value) = field(map, element, at)?;
        let projected = project_at(value, child, &at.child(element.clone()))?;
        picked.insert(name, projected);
    }

    Ok(map
        .keys()
        .filter_map(|key| picked.remove(key.as_str()).map(|value| (key.clone(), value)))
        .collect())
}

fn field<'t, 's>(
    map: &'t Map<String, Value>,
    element: &'s PathElement,
    at: &Path,
) -> Result<(&'s str, &'t Value), ProjectError> {
    let path = || at.child(element.clone());
    let name = element
        .as_field_name()
        .ok_or_else(|| ProjectError::UnexpectedPathElement { path: path() })?;
    let value = map
        .get(name)
        .ok_or_else(|| ProjectError::MissingField { path: path() })?;
    Ok((name, value))
}

fn project_list(
    items: &[Value],
    set: &FieldPathSet,
    at: &Path,
) -> Result<Vec<Value>, ProjectError> {
    let mut slots: Vec<Option<Value>> = vec![None; items.len()];

    for element in set.members() {
        let i = find_index(items, element, at)?;
        slots[i] = Some(items[i].clone());
    }
    for (element, child) in set.children() {
        let i = find_index(items, element, at)?;
        slots[i] = Some(project_at(&items[i], child, &at.child(element.clone()))?);
    }

    Ok(slots.into_iter().flatten().collect())
}

/// Position of the first list element the path element selects
fn find_index(items: &[Value], element: &PathElement, at: &Path) -> Result<usize, ProjectError> {
    let path = || at.child(element.clone());
    let found = match element {
        PathElement::Key(fields) => {
            let mut found = None;
            for (i, item) in items.iter().enumerate() {
                let Value::Object(candidate) = item else {
                    return Err(ProjectError::unexpected_type("map", type_name(item), path()));
                };
                if key_matches(fields, candidate) {
                    found = Some(i);
                    break;
                }
            }
            found
        }
        PathElement::Value(value) => items.iter().position(|item| values_equal(item, value)),
        PathElement::Index(index) => usize::try_from(*index)
            .ok()
            .filter(|&i| i < items.len()),
        PathElement::FieldName(_) => {
            return Err(ProjectError::UnexpectedPathElement { path: path() })
        }
    };
    found.ok_or_else(|| ProjectError::NoMatch { path: path() })
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "map",
    }
}
