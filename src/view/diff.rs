//! Tree diffing between two resolved view trees.
//!
//! Children are matched by key when every child on both sides carries a key
//! unique among its siblings, otherwise by position. Handlers never count as
//! changes.
//!
//! Paths index into the *new* tree for `Insert`/`Replace`/`Update`/`Move`
//! and into the *old* tree for `Remove` and a move's `from`.

use std::collections::{HashMap, HashSet};
use std::mem::discriminant;

use super::node::ViewNode;
use crate::reactive::Key;

/// One difference between two trees.
#[derive(Debug, Clone, PartialEq)]
pub enum Patch {
    Insert { path: Vec<usize>, node: ViewNode },
    Remove { path: Vec<usize> },
    /// Kind or key changed; the subtree is rebuilt.
    Replace { path: Vec<usize>, node: ViewNode },
    /// Same kind, different props or modifiers. Children are diffed
    /// separately.
    Update { path: Vec<usize>, node: ViewNode },
    /// A keyed child changed place among its siblings. `from` indexes the
    /// old tree.
    Move { from: Vec<usize>, path: Vec<usize> },
}

impl Patch {
    pub fn path(&self) -> &[usize] {
        match self {
            Patch::Insert { path, .. }
            | Patch::Remove { path }
            | Patch::Replace { path, .. }
            | Patch::Update { path, .. }
            | Patch::Move { path, .. } => path,
        }
    }
}

/// Compute the patches that turn `old` into `new`.
pub fn diff(old: &ViewNode, new: &ViewNode) -> Vec<Patch> {
    let mut patches = Vec::new();
    diff_node(old, new, &mut Vec::new(), &mut patches);
    patches
}

fn diff_node(old: &ViewNode, new: &ViewNode, path: &mut Vec<usize>, out: &mut Vec<Patch>) {
    if discriminant(&old.kind) != discriminant(&new.kind) || old.key != new.key {
        out.push(Patch::Replace {
            path: path.clone(),
            node: new.clone(),
        });
        return;
    }

    if old.kind != new.kind || old.modifier != new.modifier {
        out.push(Patch::Update {
            path: path.clone(),
            node: shallow(new),
        });
    }

    if all_keyed(&old.children) && all_keyed(&new.children) {
        diff_keyed(&old.children, &new.children, path, out);
    } else {
        diff_positional(&old.children, &new.children, path, out);
    }
}

fn shallow(node: &ViewNode) -> ViewNode {
    ViewNode {
        kind: node.kind.clone(),
        modifier: node.modifier.clone(),
        key: node.key.clone(),
        children: Vec::new(),
    }
}

/// Every child carries a key and no key repeats.
fn all_keyed(children: &[ViewNode]) -> bool {
    let mut seen = HashSet::with_capacity(children.len());
    !children.is_empty()
        && children
            .iter()
            .all(|child| child.key.as_ref().is_some_and(|key| seen.insert(key)))
}

fn diff_positional(old: &[ViewNode], new: &[ViewNode], path: &mut Vec<usize>, out: &mut Vec<Patch>) {
    let common = old.len().min(new.len());
    for index in 0..common {
        path.push(index);
        diff_node(&old[index], &new[index], path, out);
        path.pop();
    }
    for (index, node) in new.iter().enumerate().skip(common) {
        out.push(Patch::Insert {
            path: child_path(path, index),
            node: node.clone(),
        });
    }
    // Highest index first so earlier removals don't shift later ones.
    for index in (common..old.len()).rev() {
        out.push(Patch::Remove {
            path: child_path(path, index),
        });
    }
}

fn diff_keyed(old: &[ViewNode], new: &[ViewNode], path: &mut Vec<usize>, out: &mut Vec<Patch>) {
    let old_by_key: HashMap<&Key, usize> = old
        .iter()
        .enumerate()
        .filter_map(|(index, node)| node.key.as_ref().map(|key| (key, index)))
        .collect();

    let mut kept: Vec<(usize, usize)> = Vec::new();
    for (index, node) in new.iter().enumerate() {
        let matched = node.key.as_ref().and_then(|key| old_by_key.get(key));
        match matched {
            Some(&old_index) => {
                kept.push((old_index, index));
                path.push(index);
                diff_node(&old[old_index], node, path, out);
                path.pop();
            }
            None => out.push(Patch::Insert {
                path: child_path(path, index),
                node: node.clone(),
            }),
        }
    }

    // Survivors whose rank among survivors changed were reordered.
    let mut old_order: Vec<usize> = kept.iter().map(|&(old_index, _)| old_index).collect();
    old_order.sort_unstable();
    for (rank, &(old_index, index)) in kept.iter().enumerate() {
        if old_order[rank] != old_index {
            out.push(Patch::Move {
                from: child_path(path, old_index),
                path: child_path(path, index),
            });
        }
    }

    let new_keys: Vec<&Key> = new.iter().filter_map(|node| node.key.as_ref()).collect();
    for (index, node) in old.iter().enumerate().rev() {
        if let Some(key) = &node.key {
            if !new_keys.contains(&key) {
                out.push(Patch::Remove {
                    path: child_path(path, index),
                });
            }
        }
    }
}

fn child_path(path: &[usize], index: usize) -> Vec<usize> {
    let mut child = path.to_vec();
    child.push(index);
    child
}
