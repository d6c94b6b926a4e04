//! Trie nodes and the sorted sibling store.
//!
//! A node represents exactly one simplex, identified by the vertex labels on
//! the path from the root. It carries the last vertex of that path, the
//! simplex's filtration value, and a sibling store mapping child labels to
//! arena keys. Child labels are unique, strictly greater than the node's own
//! label, and kept sorted for deterministic iteration.

use crate::core::collections::{INLINE_CHILDREN, SmallBuffer};
use crate::core::simplex::Vertex;
use slotmap::new_key_type;

new_key_type! {
    /// Key type for accessing trie nodes in the storage map.
    ///
    /// This creates a unique, type-safe identifier for nodes stored in the
    /// tree's node arena. Each `NodeKey` corresponds to exactly one node and
    /// provides efficient, stable access as nodes are added.
    pub struct NodeKey;
}

/// Sorted mapping from child vertex label to node key.
///
/// Backed by a small vector of `(label, key)` pairs kept in ascending label
/// order; lookups are binary searches. The root of the tree holds one of
/// these directly, so the store also works without an owning node.
#[derive(Clone, Debug, Default)]
pub(crate) struct SiblingStore {
    entries: SmallBuffer<(Vertex, NodeKey), INLINE_CHILDREN>,
}

impl SiblingStore {
    /// Looks up the child with the given label.
    pub(crate) fn find(&self, label: Vertex) -> Option<NodeKey> {
        self.entries
            .binary_search_by_key(&label, |&(l, _)| l)
            .ok()
            .map(|i| self.entries[i].1)
    }

    /// Inserts a new child at its sorted position.
    ///
    /// The label must not already be present; the caller checks with
    /// [`SiblingStore::find`] first.
    pub(crate) fn insert(&mut self, label: Vertex, key: NodeKey) {
        match self.entries.binary_search_by_key(&label, |&(l, _)| l) {
            Ok(_) => debug_assert!(false, "duplicate child label {label}"),
            Err(pos) => self.entries.insert(pos, (label, key)),
        }
    }

    /// Returns the entry at `index` in ascending label order.
    pub(crate) fn get_index(&self, index: usize) -> Option<(Vertex, NodeKey)> {
        self.entries.get(index).copied()
    }

    /// Iterates over `(label, key)` pairs in ascending label order.
    ///
    /// The iterator is lazy, finite, and a fresh one can be created at any
    /// time, so traversals are restartable.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (Vertex, NodeKey)> + '_ {
        self.entries.iter().copied()
    }

    /// Number of children.
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

/// A single trie node: one simplex of the complex.
#[derive(Clone, Debug)]
pub struct Node {
    /// Last vertex of the simplex this node represents.
    label: Vertex,
    /// Filtration value of the represented simplex.
    filtration: f64,
    /// Children, keyed by vertex label, all strictly greater than `label`.
    children: SiblingStore,
}

impl Node {
    pub(crate) fn new(label: Vertex, filtration: f64) -> Self {
        Self {
            label,
            filtration,
            children: SiblingStore::default(),
        }
    }

    /// The last vertex of the simplex this node represents.
    #[must_use]
    pub const fn label(&self) -> Vertex {
        self.label
    }

    /// The filtration value of the represented simplex.
    #[must_use]
    pub const fn filtration(&self) -> f64 {
        self.filtration
    }

    pub(crate) const fn set_filtration(&mut self, filtration: f64) {
        self.filtration = filtration;
    }

    pub(crate) const fn children(&self) -> &SiblingStore {
        &self.children
    }

    pub(crate) const fn children_mut(&mut self) -> &mut SiblingStore {
        &mut self.children
    }
}
