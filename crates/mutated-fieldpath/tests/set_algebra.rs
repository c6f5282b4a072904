//! Property tests for the field-path set algebra.
//!
//! Sets are generated from small random path vocabularies so that unions and
//! differences actually overlap. Laws are checked against the flattened path
//! domain (`paths()`), not the trie layout.

use mutated_fieldpath::{FieldPathSet, Path, PathElement};
use proptest::prelude::*;
use serde_json::json;
use std::collections::BTreeSet;

fn element() -> impl Strategy<Value = PathElement> {
    prop_oneof![
        prop::sample::select(vec!["metadata", "spec", "labels", "image", "name"])
            .prop_map(PathElement::field),
        prop::sample::select(vec!["a", "b"])
            .prop_map(|name| PathElement::key([("name", json!(name))])),
        (0i64..3).prop_map(|v| PathElement::value(json!(v))),
        (0i64..2).prop_map(PathElement::index),
    ]
}

fn path() -> impl Strategy<Value = Path> {
    prop::collection::vec(element(), 1..4).prop_map(Path::new)
}

fn set() -> impl Strategy<Value = FieldPathSet> {
    prop::collection::vec(path(), 0..8).prop_map(|paths| FieldPathSet::from_paths(&paths))
}

fn flat(set: &FieldPathSet) -> BTreeSet<Path> {
    set.paths().into_iter().collect()
}

proptest! {
    #[test]
    fn union_then_difference_leaves_only_new_paths(a in set(), b in set()) {
        let result = flat(&a.union(&b).difference(&a));
        let expected: BTreeSet<Path> = flat(&b).difference(&flat(&a)).cloned().collect();
        prop_assert_eq!(result, expected);
    }

    #[test]
    fn union_is_commutative(a in set(), b in set()) {
        prop_assert_eq!(flat(&a.union(&b)), flat(&b.union(&a)));
    }

    #[test]
    fn union_is_associative(a in set(), b in set(), c in set()) {
        prop_assert_eq!(
            flat(&a.union(&b).union(&c)),
            flat(&a.union(&b.union(&c)))
        );
    }

    #[test]
    fn empty_is_union_identity(a in set()) {
        let empty = FieldPathSet::new();
        prop_assert_eq!(flat(&a.union(&empty)), flat(&a));
        prop_assert_eq!(flat(&empty.union(&a)), flat(&a));
    }

    #[test]
    fn empty_is_absorbing_for_difference(a in set()) {
        let empty = FieldPathSet::new();
        prop_assert!(empty.difference(&a).is_empty());
        prop_assert_eq!(flat(&a.difference(&empty)), flat(&a));
    }

    #[test]
    fn leaves_is_idempotent(a in set()) {
        let once = a.leaves();
        prop_assert_eq!(once.leaves(), once);
    }

    #[test]
    fn leaves_hold_no_strict_prefixes(a in set()) {
        let leaves = a.leaves().paths();
        for x in &leaves {
            for y in &leaves {
                prop_assert!(x == y || !x.is_prefix_of(y));
            }
        }
    }

    #[test]
    fn size_matches_flattened_paths(a in set()) {
        prop_assert_eq!(a.size(), flat(&a).len());
        prop_assert_eq!(a.is_empty(), flat(&a).is_empty());
    }

    #[test]
    fn difference_with_self_is_empty(a in set()) {
        prop_assert!(a.difference(&a).is_empty());
    }

    #[test]
    fn fields_v1_round_trip_preserves_paths(a in set()) {
        let decoded = FieldPathSet::from_fields_v1(&a.to_fields_v1()).unwrap();
        prop_assert_eq!(flat(&decoded), flat(&a));
    }
}
