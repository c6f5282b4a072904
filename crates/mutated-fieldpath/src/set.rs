//! Field-path sets
//!
//! Provides [`FieldPathSet`], a trie of [`PathElement`]s. Each level holds the
//! paths that end there (members) and the paths that continue below
//! (children). All set operations return new sets.

use crate::element::PathElement;
use crate::path::Path;
use std::collections::{BTreeMap, BTreeSet};

/// Sparse set of field paths
///
/// # Invariants
/// - Children never hold an empty set once produced by [`FieldPathSet::insert`],
///   [`FieldPathSet::difference`], [`FieldPathSet::intersection`] or
///   [`FieldPathSet::leaves`]
/// - A path may be both a member and a prefix of other members
///   (FieldsV1 `"."` entries); [`FieldPathSet::leaves`] removes such prefixes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPathSet {
    pub(crate) members: BTreeSet<PathElement>,
    pub(crate) children: BTreeMap<PathElement, FieldPathSet>,
}

impl FieldPathSet {
    /// Create empty set
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create set from paths
    #[must_use]
    pub fn from_paths<'a>(paths: impl IntoIterator<Item = &'a Path>) -> Self {
        let mut set = Self::new();
        for path in paths {
            set.insert(path);
        }
        set
    }

    /// Insert a path; the root path is ignored
    pub fn insert(&mut self, path: &Path) {
        let Some((last, prefix)) = path.elements().split_last() else {
            return;
        };
        let mut node = self;
        for element in prefix {
            node = node.children.entry(element.clone()).or_default();
        }
        node.members.insert(last.clone());
    }

    /// Check if the set holds exactly this path as a member
    #[must_use]
    pub fn has(&self, path: &Path) -> bool {
        let Some((last, prefix)) = path.elements().split_last() else {
            return false;
        };
        let mut node = self;
        for element in prefix {
            match node.children.get(element) {
                Some(child) => node = child,
                None => return false,
            }
        }
        node.members.contains(last)
    }

    /// Elements whose paths end at this level
    #[inline]
    pub fn members(&self) -> impl Iterator<Item = &PathElement> {
        self.members.iter()
    }

    /// Elements whose paths continue below this level, with their subsets
    #[inline]
    pub fn children(&self) -> impl Iterator<Item = (&PathElement, &FieldPathSet)> {
        self.children.iter()
    }

    /// Subset below one element
    #[inline]
    #[must_use]
    pub fn child(&self, element: &PathElement) -> Option<&FieldPathSet> {
        self.children.get(element)
    }

    /// Paths in either set
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let mut out = self.clone();
        out.members.extend(other.members.iter().cloned());
        for (element, theirs) in &other.children {
            let merged = match out.children.get(element) {
                Some(mine) => mine.union(theirs),
                None => theirs.clone(),
            };
            out.children.insert(element.clone(), merged);
        }
        out
    }

    /// Paths in `self` but not in `other`
    #[must_use]
    pub fn difference(&self, other: &Self) -> Self {
        let members = self
            .members
            .difference(&other.members)
            .cloned()
            .collect();

        let mut children = BTreeMap::new();
        for (element, mine) in &self.children {
            let rest = match other.children.get(element) {
                Some(theirs) => mine.difference(theirs),
                None => mine.clone(),
            };
            if !rest.is_empty() {
                children.insert(element.clone(), rest);
            }
        }

        Self { members, children }
    }

    /// Paths in both sets
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        let members = self
            .members
            .intersection(&other.members)
            .cloned()
            .collect();

        let mut children = BTreeMap::new();
        for (element, mine) in &self.children {
            if let Some(theirs) = other.children.get(element) {
                let common = mine.intersection(theirs);
                if !common.is_empty() {
                    children.insert(element.clone(), common);
                }
            }
        }

        Self { members, children }
    }

    /// Only the deepest paths
    ///
    /// A member that is also a (non-empty) child is a strict prefix of other
    /// paths and is dropped.
    #[must_use]
    pub fn leaves(&self) -> Self {
        let members = self
            .members
            .iter()
            .filter(|element| {
                !self
                    .children
                    .get(*element)
                    .is_some_and(|child| !child.is_empty())
            })
            .cloned()
            .collect();

        let children = self
            .children
            .iter()
            .map(|(element, child)| (element.clone(), child.leaves()))
            .filter(|(_, child)| !child.is_empty())
            .collect();

        Self { members, children }
    }

    /// Number of member paths
    #[must_use]
    pub fn size(&self) -> usize {
        self.members.len() + self.children.values().map(Self::size).sum::<usize>()
    }

    /// No members at any depth
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty() && self.children.values().all(Self::is_empty)
    }

    /// All member paths, in element order
    #[must_use]
    pub fn paths(&self) -> Vec<Path> {
        let mut out = Vec::with_capacity(self.size());
        self.collect_paths(&Path::root(), &mut out);
        out.sort();
        out
    }

    fn collect_paths(&self, prefix: &Path, out: &mut Vec<Path>) {
        for element in &self.members {
            out.push(prefix.child(element.clone()));
        }
        for (element, child) in &self.children {
            child.collect_paths(&prefix.child(element.clone()), out);
        }
    }
}

impl<'a> FromIterator<&'a Path> for FieldPathSet {
    fn from_iter<I: IntoIterator<Item = &'a Path>>(iter: I) -> Self {
        Self::from_paths(iter)
    }
}
