// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Building hierarchies from flat records.

use alloc::boxed::Box;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use hashbrown::HashMap;
use hashbrown::hash_map::Entry;
use thiserror::Error;
use tracing::debug;

use crate::hierarchy::Hierarchy;
use crate::types::NodeId;

/// Structural problems found while stratifying records.
///
/// Each message contains a stable keyword (`no root`, `multiple roots`,
/// `missing`, `ambiguous`, `cycle`) that callers may match on.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum StratifyError {
    /// No record lacks a parent.
    #[error("no root")]
    NoRoot,
    /// More than one record lacks a parent.
    #[error("multiple roots")]
    MultipleRoots,
    /// A parent id matches no record.
    #[error("missing: {0}")]
    Missing(String),
    /// A parent id matches more than one record.
    #[error("ambiguous: {0}")]
    Ambiguous(String),
    /// Some records are not descendants of the root.
    #[error("cycle")]
    Cycle,
}

type Accessor<T> = Box<dyn Fn(&T) -> Option<String>>;

/// Builds a [`Hierarchy`] from records that name their parent by id.
///
/// Ids are compared as strings. `None` and the empty string both mean "no
/// id": such a record cannot be a parent but may still be a leaf. Ids need
/// not be unique unless a duplicated id is used as a parent.
///
/// ## Example
///
/// ```rust
/// use understory_hierarchy::Stratify;
///
/// let records = [("eve", ""), ("cain", "eve"), ("seth", "eve"), ("enos", "seth")];
/// let tree = Stratify::new(
///     |r: &(&str, &str)| Some(r.0.to_string()),
///     |r: &(&str, &str)| Some(r.1.to_string()),
/// )
/// .stratify(records)
/// .unwrap();
///
/// let root = &tree[tree.root()];
/// assert_eq!(root.id(), Some("eve"));
/// assert_eq!(root.height(), 2);
/// assert_eq!(root.children().len(), 2);
/// ```
pub struct Stratify<T> {
    id: Accessor<T>,
    parent_id: Accessor<T>,
}

impl<T> Stratify<T> {
    /// Create a stratifier from an id accessor and a parent-id accessor.
    pub fn new(
        id: impl Fn(&T) -> Option<String> + 'static,
        parent_id: impl Fn(&T) -> Option<String> + 'static,
    ) -> Self {
        Self {
            id: Box::new(id),
            parent_id: Box::new(parent_id),
        }
    }

    /// Link `records` into a hierarchy.
    ///
    /// Siblings keep the order in which they appear in `records`.
    pub fn stratify(
        &self,
        records: impl IntoIterator<Item = T>,
    ) -> Result<Hierarchy<T>, StratifyError> {
        let records: Vec<T> = records.into_iter().collect();
        let keys = records
            .iter()
            .map(|r| Keys {
                id: coerce((self.id)(r)),
                parent: coerce((self.parent_id)(r)),
            })
            .collect();
        let imputed_from = records.len();
        link(records, keys, imputed_from)
    }
}

impl<T> fmt::Debug for Stratify<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stratify").finish_non_exhaustive()
    }
}

/// Builds a [`Hierarchy`] from records identified by slash-separated paths.
///
/// A record's parent is its path without the last segment. Intermediate paths
/// that no record names are imputed as nodes with `None` data; an imputed root
/// with a single child is dropped in favour of that child. A slash preceded by
/// an odd number of backslashes is part of a segment, not a separator.
///
/// ```rust
/// use understory_hierarchy::StratifyPath;
///
/// let files = ["/src/lib.rs", "/src/util/mod.rs", "/Cargo.toml"];
/// let tree = StratifyPath::new(|f: &&str| f.to_string()).stratify(files).unwrap();
///
/// let root = &tree[tree.root()];
/// assert_eq!(root.id(), Some("/"));
/// assert!(root.data().is_none(), "the root was imputed");
/// assert_eq!(tree.node_count(), 6);
/// ```
pub struct StratifyPath<T> {
    path: Box<dyn Fn(&T) -> String>,
}

impl<T> StratifyPath<T> {
    /// Create a stratifier from a path accessor.
    pub fn new(path: impl Fn(&T) -> String + 'static) -> Self {
        Self {
            path: Box::new(path),
        }
    }

    /// Link `records` into a hierarchy, imputing missing ancestors.
    pub fn stratify(
        &self,
        records: impl IntoIterator<Item = T>,
    ) -> Result<Hierarchy<Option<T>>, StratifyError> {
        let mut data: Vec<Option<T>> = records.into_iter().map(Some).collect();
        let imputed_from = data.len();
        let mut keys: Vec<Keys> = data
            .iter()
            .flatten()
            .map(|r| {
                let id = normalize_path(&(self.path)(r));
                let parent = coerce(Some(parent_path(&id).to_string()));
                Keys {
                    id: Some(id),
                    parent,
                }
            })
            .collect();

        // Impute every ancestor path that no record names. `keys` grows while
        // it is scanned, so imputed paths get their own parents imputed too.
        let mut known: hashbrown::HashSet<String> =
            keys.iter().filter_map(|k| k.id.clone()).collect();
        let mut i = 0;
        while i < keys.len() {
            if let Some(parent) = keys[i].parent.clone()
                && known.insert(parent.clone())
            {
                let grandparent = coerce(Some(parent_path(&parent).to_string()));
                keys.push(Keys {
                    id: Some(parent),
                    parent: grandparent,
                });
                data.push(None);
            }
            i += 1;
        }

        link(data, keys, imputed_from)
    }
}

impl<T> fmt::Debug for StratifyPath<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StratifyPath").finish_non_exhaustive()
    }
}

#[derive(Debug)]
struct Keys {
    id: Option<String>,
    parent: Option<String>,
}

fn coerce(key: Option<String>) -> Option<String> {
    key.filter(|k| !k.is_empty())
}

#[derive(Clone, Copy)]
enum Slot {
    Unique(usize),
    Ambiguous,
}

/// Link pre-keyed data into a hierarchy.
///
/// Entries at or after `imputed_from` are imputed path nodes, which may be
/// collapsed away when they form a single-child chain at the root.
fn link<D>(
    data: Vec<D>,
    keys: Vec<Keys>,
    imputed_from: usize,
) -> Result<Hierarchy<D>, StratifyError> {
    let n = keys.len();
    debug!(records = n, "stratify");

    let mut children: Vec<Vec<usize>> = (0..n).map(|_| Vec::new()).collect();
    let mut parents: Vec<Option<usize>> = alloc::vec![None; n];
    let mut root = None;
    {
        let mut by_id: HashMap<&str, Slot> = HashMap::with_capacity(n);
        for (i, k) in keys.iter().enumerate() {
            if let Some(id) = k.id.as_deref() {
                match by_id.entry(id) {
                    Entry::Occupied(mut e) => {
                        e.insert(Slot::Ambiguous);
                    }
                    Entry::Vacant(e) => {
                        e.insert(Slot::Unique(i));
                    }
                }
            }
        }

        for (i, k) in keys.iter().enumerate() {
            match k.parent.as_deref() {
                Some(parent) => match by_id.get(parent) {
                    None => return Err(StratifyError::Missing(parent.to_string())),
                    Some(Slot::Ambiguous) => {
                        return Err(StratifyError::Ambiguous(parent.to_string()));
                    }
                    Some(&Slot::Unique(p)) => {
                        children[p].push(i);
                        parents[i] = Some(p);
                    }
                },
                None => {
                    if root.is_some() {
                        return Err(StratifyError::MultipleRoots);
                    }
                    root = Some(i);
                }
            }
        }
    }
    let Some(mut root) = root else {
        return Err(StratifyError::NoRoot);
    };

    let mut expected = n;
    while root >= imputed_from && children[root].len() == 1 {
        root = children[root][0];
        expected -= 1;
    }

    // Everything reachable from the root, in pre-order. Records on an
    // ancestry cycle are never reached.
    let mut order = Vec::with_capacity(expected);
    let mut stack = alloc::vec![root];
    while let Some(i) = stack.pop() {
        order.push(i);
        stack.extend(children[i].iter().rev().copied());
    }
    if order.len() < expected {
        return Err(StratifyError::Cycle);
    }

    let mut slots: Vec<Option<D>> = data.into_iter().map(Some).collect();
    let mut ids: Vec<Option<String>> = keys.into_iter().map(|k| k.id).collect();
    let mut placed: Vec<Option<NodeId>> = alloc::vec![None; n];

    let Some(datum) = slots[root].take() else {
        unreachable!("the root has not been placed yet");
    };
    let mut tree = Hierarchy::new(datum);
    tree.set_key(tree.root(), ids[root].take());
    placed[root] = Some(tree.root());
    for &i in &order[1..] {
        let Some(datum) = slots[i].take() else {
            unreachable!("pre-order visits each record once");
        };
        let Some(parent) = parents[i].and_then(|p| placed[p]) else {
            unreachable!("pre-order places parents first");
        };
        placed[i] = Some(tree.push(parent, datum, ids[i].take()));
    }

    tree.compute_heights();
    debug!(
        nodes = tree.node_count(),
        height = tree[tree.root()].height(),
        "stratified"
    );
    Ok(tree)
}

/// Whether byte `i` of `path` is an unescaped slash.
fn is_slash(path: &[u8], i: usize) -> bool {
    if path.get(i) != Some(&b'/') {
        return false;
    }
    let escapes = path[..i].iter().rev().take_while(|&&b| b == b'\\').count();
    escapes % 2 == 0
}

/// Drop one trailing unescaped slash and ensure a leading slash.
fn normalize_path(path: &str) -> String {
    let bytes = path.as_bytes();
    let len = bytes.len();
    let trimmed = if len > 0 && is_slash(bytes, len - 1) && !(len > 1 && is_slash(bytes, len - 2))
    {
        &path[..len - 1]
    } else {
        path
    };
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        let mut out = String::with_capacity(trimmed.len() + 1);
        out.push('/');
        out.push_str(trimmed);
        out
    }
}

/// The path of the parent of a normalized path; empty for the root `/`.
fn parent_path(path: &str) -> &str {
    let bytes = path.as_bytes();
    if bytes.len() < 2 {
        return "";
    }
    let mut i = bytes.len();
    loop {
        i -= 1;
        if i <= 1 || is_slash(bytes, i) {
            break;
        }
    }
    &path[..i]
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[derive(Clone, Debug)]
    struct Rec {
        id: &'static str,
        parent: &'static str,
    }

    fn rec(id: &'static str, parent: &'static str) -> Rec {
        Rec { id, parent }
    }

    fn stratifier() -> Stratify<Rec> {
        Stratify::new(|r: &Rec| Some(r.id.into()), |r: &Rec| Some(r.parent.into()))
    }

    /// (id, depth, height) in pre-order.
    fn shape(tree: &Hierarchy<Rec>) -> Vec<(&'static str, usize, usize)> {
        tree.pre_order(tree.root())
            .map(|n| (tree[n].data().id, tree[n].depth(), tree[n].height()))
            .collect()
    }

    #[test]
    fn links_records_regardless_of_order() {
        let records = vec![rec("a", ""), rec("aa", "a"), rec("ab", "a"), rec("aaa", "aa")];
        let tree = stratifier().stratify(records.clone()).unwrap();
        assert_eq!(
            shape(&tree),
            [("a", 0, 2), ("aa", 1, 1), ("aaa", 2, 0), ("ab", 1, 0)]
        );

        let reordered = vec![
            records[3].clone(),
            records[1].clone(),
            records[2].clone(),
            records[0].clone(),
        ];
        let tree = stratifier().stratify(reordered).unwrap();
        assert_eq!(
            shape(&tree),
            [("a", 0, 2), ("aa", 1, 1), ("aaa", 2, 0), ("ab", 1, 0)],
            "children follow input order, parents may come later"
        );
    }

    #[test]
    fn sibling_order_follows_input() {
        let tree = stratifier()
            .stratify([rec("ab", "a"), rec("a", ""), rec("aa", "a")])
            .unwrap();
        let kids: Vec<_> = tree[tree.root()]
            .children()
            .iter()
            .map(|&c| tree[c].data().id)
            .collect();
        assert_eq!(kids, ["ab", "aa"]);
    }

    #[test]
    fn errors_carry_keywords() {
        let cases = [
            (vec![rec("a", ""), rec("b", "")], "multiple roots"),
            (vec![rec("a", "a")], "no root"),
            (vec![rec("a", ""), rec("b", "c")], "missing: c"),
            (vec![rec("a", ""), rec("b", "a"), rec("b", "a"), rec("c", "b")], "ambiguous: b"),
            (vec![rec("r", ""), rec("a", "b"), rec("b", "a")], "cycle"),
        ];
        for (records, keyword) in cases {
            let err = stratifier().stratify(records).unwrap_err();
            assert!(
                err.to_string().contains(keyword),
                "expected {keyword:?}, got {err}"
            );
        }
    }

    #[test]
    fn empty_input_has_no_root() {
        let err = stratifier().stratify(Vec::new()).unwrap_err();
        assert_eq!(err, StratifyError::NoRoot);
    }

    #[test]
    fn duplicate_leaf_ids_and_missing_ids_are_allowed() {
        let tree = stratifier()
            .stratify([rec("a", ""), rec("b", "a"), rec("b", "a"), rec("", "a")])
            .unwrap();
        assert_eq!(tree.node_count(), 4);
        assert_eq!(tree[tree.root()].children().len(), 3);
        let unnamed = tree[tree.root()].children()[2];
        assert_eq!(tree[unnamed].id(), None, "empty ids are coerced to none");
    }

    #[test]
    fn path_helpers() {
        assert_eq!(normalize_path("a/b/"), "/a/b");
        assert_eq!(normalize_path("/a/b"), "/a/b");
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("/a//"), "/a//", "only one unescaped trailing slash");
        assert_eq!(parent_path("/a/b"), "/a");
        assert_eq!(parent_path("/a"), "/");
        assert_eq!(parent_path("/"), "");
        assert_eq!(parent_path("/a\\/b"), "/", "escaped slashes do not split");
    }

    #[test]
    fn path_stratify_imputes_ancestors() {
        let tree = StratifyPath::new(|p: &&str| (*p).to_string())
            .stratify(["a/b/c", "a/d"])
            .unwrap();
        let ids: Vec<_> = tree
            .pre_order(tree.root())
            .map(|n| (tree[n].id().unwrap(), tree[n].data().is_some()))
            .collect();
        assert_eq!(
            ids,
            [
                ("/a", false),
                ("/a/d", true),
                ("/a/b", false),
                ("/a/b/c", true),
            ],
            "imputed nodes follow the records; the single-child `/` root is dropped"
        );
    }

    #[test]
    fn path_stratify_keeps_named_root() {
        let tree = StratifyPath::new(|p: &&str| (*p).to_string())
            .stratify(["/", "/x"])
            .unwrap();
        assert_eq!(tree.node_count(), 2);
        assert_eq!(tree[tree.root()].data(), &Some("/"));
    }
}
