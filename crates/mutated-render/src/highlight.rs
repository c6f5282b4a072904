//! Syntax highlighter
//!
//! Marks the parts of a [`SyntaxTree`] addressed by a field-path set. Members
//! mark their whole entry (key, colon and value, or dash and value); children
//! are descended into. Matching mirrors the tree projector, over syntax nodes:
//! list keys and values are compared after decoding the candidate's source
//! text.

use crate::error::HighlightError;
use crate::syntax::{NodeId, NodeKind, SyntaxTree};
use colored::Colorize;
use mutated_fieldpath::{values_equal, FieldPathSet, KeyField, Path, PathElement};
use serde_json::Value;
use std::ops::Range;

/// How marked tokens are set apart in rendered text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Marker {
    /// Bold italic terminal styling; plain text when colors are disabled
    #[default]
    Styled,
    /// Literal text around each marked token
    Plain {
        /// Text before a marked token
        start: &'static str,
        /// Text after a marked token
        end: &'static str,
    },
}

impl Marker {
    /// Guillemets, for output without escape sequences
    pub const PLAIN: Self = Self::new("«", "»");

    /// Create plain marker
    #[inline]
    #[must_use]
    pub const fn new(start: &'static str, end: &'static str) -> Self {
        Self::Plain { start, end }
    }

    /// Marked token text
    #[must_use]
    pub fn wrap(&self, text: &str) -> String {
        match self {
            Self::Styled => text.bold().italic().to_string(),
            Self::Plain { start, end } => format!("{start}{text}{end}"),
        }
    }

    /// Remove every occurrence of a plain marker from rendered text
    ///
    /// Styled text is returned unchanged.
    #[must_use]
    pub fn strip(&self, rendered: &str) -> String {
        match self {
            Self::Styled => rendered.to_string(),
            Self::Plain { start, end } => rendered.replace(*start, "").replace(*end, ""),
        }
    }
}

/// Entry located for one path element
#[derive(Debug, Clone)]
struct Located {
    span: Range<usize>,
    value: NodeId,
}

/// Mark every path of `set` in `tree`
///
/// Marking is idempotent: highlighting the same set twice renders the same
/// text as highlighting it once.
///
/// # Errors
/// Returns [`HighlightError`] when a path element matches nothing or meets a
/// node of the wrong kind. `Index` elements are skipped with a warning.
pub fn highlight(tree: &mut SyntaxTree, set: &FieldPathSet) -> Result<(), HighlightError> {
    let root = tree.root();
    visit(tree, root, set, &Path::root())
}

fn visit(
    tree: &mut SyntaxTree,
    node: NodeId,
    set: &FieldPathSet,
    at: &Path,
) -> Result<(), HighlightError> {
    for element in set.members() {
        if let Some(found) = locate(tree, node, element, at)? {
            tree.mark(found.span);
        }
    }
    for (element, child) in set.children() {
        if let Some(found) = locate(tree, node, element, at)? {
            visit(tree, found.value, child, &at.child(element.clone()))?;
        }
    }
    Ok(())
}

fn locate(
    tree: &SyntaxTree,
    node: NodeId,
    element: &PathElement,
    at: &Path,
) -> Result<Option<Located>, HighlightError> {
    let found = match element {
        PathElement::FieldName(name) => {
            let NodeKind::Mapping(entries) = &tree.node(node).kind else {
                return Err(wrong_kind(tree, node, "mapping", at));
            };
            entries
                .iter()
                .find(|entry| entry.name == *name)
                .map(|entry| Located {
                    span: entry.span.clone(),
                    value: entry.value,
                })
        }
        PathElement::Key(fields) => {
            let NodeKind::Sequence(entries) = &tree.node(node).kind else {
                return Err(wrong_kind(tree, node, "sequence", at));
            };
            let mut found = None;
            for entry in entries {
                if key_matches(tree, entry.value, fields, at)? {
                    found = Some(Located {
                        span: entry.span.clone(),
                        value: entry.value,
                    });
                    break;
                }
            }
            found
        }
        PathElement::Value(expected) => {
            let NodeKind::Sequence(entries) = &tree.node(node).kind else {
                return Err(wrong_kind(tree, node, "sequence", at));
            };
            let mut found = None;
            for entry in entries {
                if values_equal(&decode(tree, entry.value, at)?, expected) {
                    found = Some(Located {
                        span: entry.span.clone(),
                        value: entry.value,
                    });
                    break;
                }
            }
            found
        }
        PathElement::Index(index) => {
            tracing::warn!("skipping unsupported index path element [{}] under {}", index, at);
            return Ok(None);
        }
    };

    found
        .map(Some)
        .ok_or_else(|| HighlightError::NoMatch {
            path: at.child(element.clone()),
        })
}

/// Whether a sequence entry is a mapping holding every key field
///
/// Entries that are not mappings never match.
fn key_matches(
    tree: &SyntaxTree,
    entry: NodeId,
    fields: &[KeyField],
    at: &Path,
) -> Result<bool, HighlightError> {
    let NodeKind::Mapping(pairs) = &tree.node(entry).kind else {
        return Ok(false);
    };
    for field in fields {
        let Some(pair) = pairs.iter().find(|pair| pair.name == field.name) else {
            return Ok(false);
        };
        if !values_equal(&decode(tree, pair.value, at)?, &field.value) {
            return Ok(false);
        }
    }
    Ok(true)
}

fn decode(tree: &SyntaxTree, node: NodeId, at: &Path) -> Result<Value, HighlightError> {
    tree.node_value(node).map_err(|source| HighlightError::Decode {
        path: at.clone(),
        source,
    })
}

fn wrong_kind(tree: &SyntaxTree, node: NodeId, expected: &'static str, at: &Path) -> HighlightError {
    HighlightError::unexpected_kind(expected, tree.node(node).kind.name(), at.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const DEPLOYMENT: &str = "\
metadata:
  name: web
spec:
  replicas: 2 # scaled by hand
  template:
    spec:
      containers:
      - name: app
        image: nginx
      - name: sidecar
        image: envoy
      args:
      - --a
      - --b
";

    fn marked(src: &str, paths: &[Path]) -> String {
        let mut tree = SyntaxTree::parse(src).unwrap();
        highlight(&mut tree, &FieldPathSet::from_paths(paths)).unwrap();
        tree.render_marked(&Marker::new("<", ">"))
    }

    fn containers() -> Path {
        Path::from_fields(["spec", "template", "spec", "containers"])
    }

    #[test]
    fn marks_mapping_entry() {
        let out = marked(DEPLOYMENT, &[Path::from_fields(["spec", "replicas"])]);
        assert!(out.contains("  <replicas><:> <2> # scaled by hand\n"));
        assert!(out.contains("  name: web\n"));
    }

    #[test]
    fn marks_keyed_sequence_entry_field() {
        let path = containers()
            .child(PathElement::key([("name", json!("sidecar"))]))
            .child(PathElement::field("image"));
        let out = marked(DEPLOYMENT, &[path]);
        assert!(out.contains("        <image><:> <envoy>\n"));
        assert!(out.contains("        image: nginx\n"));
    }

    #[test]
    fn marks_whole_sequence_entry() {
        let path = containers().child(PathElement::key([("name", json!("app"))]));
        let out = marked(DEPLOYMENT, &[path]);
        assert!(out.contains("      <-> <name><:> <app>\n        <image><:> <nginx>\n"));
        assert!(out.contains("      - name: sidecar\n"));
    }

    #[test]
    fn marks_value_entry() {
        let path = Path::from_fields(["spec", "template", "spec", "args"])
            .child(PathElement::value(json!("--b")));
        let out = marked(DEPLOYMENT, &[path]);
        assert!(out.contains("      - --a\n      <-> <--b>\n"));
    }

    #[test]
    fn preserves_source_and_is_idempotent() {
        let set = FieldPathSet::from_paths(&[
            Path::from_fields(["spec", "replicas"]),
            containers()
                .child(PathElement::key([("name", json!("app"))]))
                .child(PathElement::field("image")),
        ]);
        let mut tree = SyntaxTree::parse(DEPLOYMENT).unwrap();
        highlight(&mut tree, &set).unwrap();
        let once = tree.render_marked(&Marker::PLAIN);
        highlight(&mut tree, &set).unwrap();
        let twice = tree.render_marked(&Marker::PLAIN);

        assert_eq!(once, twice);
        assert_eq!(Marker::PLAIN.strip(&once), DEPLOYMENT);
    }

    #[test]
    fn styled_marker_is_bold_italic() {
        colored::control::set_override(true);
        let mut tree = SyntaxTree::parse("a: 1\nb: 2\n").unwrap();
        highlight(&mut tree, &FieldPathSet::from_paths(&[Path::from_fields(["b"])])).unwrap();
        let out = tree.render_marked(&Marker::Styled);

        assert_eq!(
            out,
            format!(
                "a: 1\n{}{} {}\n",
                "b".bold().italic(),
                ":".bold().italic(),
                "2".bold().italic()
            )
        );
        assert!(out.contains("\x1b[1;3mb\x1b[0m"));
        assert_eq!(Marker::Styled.strip(&out), out);
    }

    #[test]
    fn missing_key_is_no_match() {
        let mut tree = SyntaxTree::parse(DEPLOYMENT).unwrap();
        let set = FieldPathSet::from_paths(&[Path::from_fields(["spec", "paused"])]);
        let err = highlight(&mut tree, &set).unwrap_err();
        assert!(matches!(err, HighlightError::NoMatch { ref path } if *path == Path::from_fields(["spec", "paused"])));
    }

    #[test]
    fn field_into_sequence_is_wrong_kind() {
        let mut tree = SyntaxTree::parse(DEPLOYMENT).unwrap();
        let path = containers().child(PathElement::field("name"));
        let err = highlight(&mut tree, &FieldPathSet::from_paths(&[path])).unwrap_err();
        assert!(matches!(
            err,
            HighlightError::UnexpectedKind { expected: "mapping", found: "sequence", .. }
        ));
    }

    #[test]
    fn index_elements_are_skipped() {
        let path = Path::from_fields(["spec", "template", "spec", "args"])
            .child(PathElement::index(0));
        let out = marked(DEPLOYMENT, &[path]);
        assert_eq!(out, DEPLOYMENT);
    }

    #[test]
    fn key_selectors_skip_scalar_entries() {
        let src = "items:\n- plain\n- name: x\n";
        let path = Path::from_fields(["items"]).child(PathElement::key([("name", json!("x"))]));
        let out = marked(src, &[path]);
        assert_eq!(out, "items:\n- plain\n<-> <name><:> <x>\n");
    }

    #[test]
    fn numbers_compare_by_value() {
        let src = "ports:\n- port: 80\n  protocol: TCP\n- port: 443\n  protocol: TCP\n";
        let path = Path::from_fields(["ports"])
            .child(PathElement::key([("port", json!(443)), ("protocol", json!("TCP"))]));
        let out = marked(src, &[path]);
        assert!(out.ends_with("<-> <port><:> <443>\n  <protocol><:> <TCP>\n"));
    }
}
