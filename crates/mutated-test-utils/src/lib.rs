//! Testing utilities for the mutated workspace
//!
//! Shared fixtures: ownership records, container paths, sample resources.

#![allow(missing_docs)]

use mutated_fieldpath::{FieldPathSet, Path, PathElement};
use mutated_ownership::OwnershipRecord;
use serde_json::{json, Map, Value};

pub const MANUAL_MANAGER: &str = "kubectl";
pub const MACHINE_MANAGER: &str = "kustomize-controller";

/// FieldsV1 payload owning `spec.containers[name=<container>].<field>` for each field
pub fn container_fields(container: &str, fields: &[&str]) -> Value {
    let mut entry = Map::new();
    entry.insert(".".to_string(), json!({}));
    for field in fields {
        entry.insert(format!("f:{field}"), json!({}));
    }
    let key = format!("k:{}", json!({ "name": container }));
    json!({ "f:spec": { "f:containers": { key: Value::Object(entry) } } })
}

/// Path `spec.containers[name=<container>].<field>`
pub fn container_path(container: &str, field: &str) -> Path {
    Path::new(vec![
        PathElement::field("spec"),
        PathElement::field("containers"),
        PathElement::key([("name", json!(container))]),
        PathElement::field(field),
    ])
}

pub fn record(manager: &str, fields_v1: Value) -> OwnershipRecord {
    OwnershipRecord::new(manager, fields_v1)
}

/// Set addressing every leaf of a tree
///
/// Maps are addressed by field name and lists by index; empty maps and
/// lists are leaves.
pub fn leaf_set_of(tree: &Value) -> FieldPathSet {
    let mut set = FieldPathSet::new();
    collect_leaves(tree, &Path::root(), &mut set);
    set
}

fn collect_leaves(tree: &Value, at: &Path, set: &mut FieldPathSet) {
    match tree {
        Value::Object(map) if !map.is_empty() => {
            for (key, child) in map {
                collect_leaves(child, &at.child(PathElement::field(key.as_str())), set);
            }
        }
        Value::Array(items) if !items.is_empty() => {
            for (i, child) in items.iter().enumerate() {
                let index = i64::try_from(i).unwrap_or(i64::MAX);
                collect_leaves(child, &at.child(PathElement::index(index)), set);
            }
        }
        _ => set.insert(at),
    }
}

/// Pod created by an automated manager, then re-applied by kubectl with a new image
pub fn mixed_pod() -> Value {
    json!({
        "apiVersion": "v1",
        "kind": "Pod",
        "metadata": {
            "name": "test",
            "namespace": "default",
            "labels": {"app": "test"},
            "managedFields": [
                {
                    "manager": MACHINE_MANAGER,
                    "operation": "Update",
                    "apiVersion": "v1",
                    "time": "2025-05-01T10:00:00Z",
                    "fieldsType": "FieldsV1",
                    "fieldsV1": {
                        "f:metadata": {"f:labels": {".": {}, "f:app": {}}},
                        "f:spec": {"f:containers": {"k:{\"name\":\"test\"}": {
                            ".": {}, "f:name": {}, "f:imagePullPolicy": {}
                        }}}
                    }
                },
                {
                    "manager": MANUAL_MANAGER,
                    "operation": "Apply",
                    "apiVersion": "v1",
                    "time": "2025-05-01T10:05:00Z",
                    "fieldsType": "FieldsV1",
                    "fieldsV1": {
                        "f:spec": {"f:containers": {"k:{\"name\":\"test\"}": {
                            ".": {}, "f:name": {}, "f:image": {}
                        }}}
                    }
                }
            ]
        },
        "spec": {
            "containers": [
                {"name": "sidecar", "image": "busybox:1.36", "imagePullPolicy": "IfNotPresent"},
                {"name": "test", "image": "alpine:3.22", "imagePullPolicy": "Always"}
            ],
            "restartPolicy": "Always"
        },
        "status": {"phase": "Running"}
    })
}

/// Deployment owned only by a controller
pub fn controller_deployment() -> Value {
    json!({
        "apiVersion": "apps/v1",
        "kind": "Deployment",
        "metadata": {
            "name": "web",
            "namespace": "prod",
            "managedFields": [{
                "manager": MACHINE_MANAGER,
                "operation": "Apply",
                "apiVersion": "apps/v1",
                "fieldsType": "FieldsV1",
                "fieldsV1": {"f:spec": {"f:replicas": {}}}
            }]
        },
        "spec": {"replicas": 3}
    })
}

/// Cluster-scoped resource edited by kubectl
pub fn edited_namespace() -> Value {
    json!({
        "apiVersion": "v1",
        "kind": "Namespace",
        "metadata": {
            "name": "sandbox",
            "labels": {"team": "infra", "tier": "dev"},
            "managedFields": [{
                "manager": "kubectl-label",
                "operation": "Update",
                "apiVersion": "v1",
                "fieldsType": "FieldsV1",
                "fieldsV1": {"f:metadata": {"f:labels": {"f:tier": {}}}}
            }]
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn container_fields_decode_to_container_paths() {
        let set = FieldPathSet::from_fields_v1(&container_fields("test", &["image"])).unwrap();
        assert!(set.has(&container_path("test", "image")));
        assert_eq!(set.leaves().size(), 1);
    }

    #[test]
    fn leaf_set_covers_every_leaf() {
        let set = leaf_set_of(&json!({"a": {"b": 1, "c": []}, "d": [1, {"e": null}]}));
        assert_eq!(set.size(), 4);
    }
}
