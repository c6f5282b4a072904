//! Properties of projection and highlighting over generated documents

use mutated_fieldpath::{FieldPathSet, Path, PathElement};
use mutated_render::{highlight, project, Marker, ProjectError, SyntaxTree};
use mutated_test_utils::leaf_set_of;
use proptest::prelude::*;
use serde_json::{json, Map, Value};

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-1000i64..1000).prop_map(|n| json!(n)),
        "[ a-z#:\\n-]{0,12}".prop_map(Value::String),
    ]
}

fn tree() -> impl Strategy<Value = Value> {
    scalar().prop_recursive(4, 48, 5, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..5).prop_map(Value::Array),
            prop::collection::vec(("[a-z]{1,5}", inner), 0..5)
                .prop_map(|pairs| Value::Object(pairs.into_iter().collect::<Map<_, _>>())),
        ]
    })
}

fn document() -> impl Strategy<Value = Value> {
    prop::collection::vec(("[a-z]{1,5}", tree()), 1..5)
        .prop_map(|pairs| Value::Object(pairs.into_iter().collect()))
}

proptest! {
    #[test]
    fn projecting_every_leaf_is_identity(doc in tree()) {
        prop_assert_eq!(project(&doc, &leaf_set_of(&doc)).unwrap(), doc);
    }

    #[test]
    fn projecting_nothing_is_empty(doc in document()) {
        prop_assert_eq!(project(&doc, &FieldPathSet::new()).unwrap(), json!({}));
    }

    #[test]
    fn highlighting_preserves_source(doc in document()) {
        let yaml = serde_yaml::to_string(&doc).unwrap();
        let mut tree = SyntaxTree::parse(&yaml).unwrap();
        prop_assert_eq!(tree.render(), yaml.clone());

        let set = leaf_set_of(&doc);
        highlight(&mut tree, &set).unwrap();
        let once = tree.render_marked(&Marker::PLAIN);
        highlight(&mut tree, &set).unwrap();
        let twice = tree.render_marked(&Marker::PLAIN);

        prop_assert_eq!(&once, &twice);
        prop_assert_eq!(Marker::PLAIN.strip(&once), yaml);
    }

    #[test]
    fn syntax_tree_decodes_like_serde(doc in document()) {
        let yaml = serde_yaml::to_string(&doc).unwrap();
        let tree = SyntaxTree::parse(&yaml).unwrap();
        prop_assert_eq!(tree.node_value(tree.root()).unwrap(), doc);
    }
}

#[test]
fn missing_field_error() {
    let doc = json!({"spec": {"replicas": 1}});
    let set = FieldPathSet::from_paths(&[Path::from_fields(["spec", "paused"])]);
    assert!(matches!(
        project(&doc, &set),
        Err(ProjectError::MissingField { .. })
    ));
}

#[test]
fn key_selector_without_match() {
    let doc = json!({"containers": [{"name": "a"}, {"name": "b"}]});
    let path = Path::from_fields(["containers"]).child(PathElement::key([("name", json!("c"))]));
    assert!(matches!(
        project(&doc, &FieldPathSet::from_paths(&[path])),
        Err(ProjectError::NoMatch { .. })
    ));
}

#[test]
fn indented_multiline_strings_survive_parsing() {
    let doc = json!({
        "data": {
            "lead": "  indented\nline\n",
            "blank": "\nafter",
            "kept": "one\n\n",
            "spaced": "a \nb",
            "items": ["  a\nb", ["- x\n# y\n"]]
        },
        "other": "x"
    });
    let yaml = serde_yaml::to_string(&doc).unwrap();
    let mut tree = SyntaxTree::parse(&yaml).unwrap();
    assert_eq!(tree.render(), yaml);
    assert_eq!(tree.node_value(tree.root()).unwrap(), doc);

    highlight(&mut tree, &leaf_set_of(&doc)).unwrap();
    assert_eq!(Marker::PLAIN.strip(&tree.render_marked(&Marker::PLAIN)), yaml);
}
