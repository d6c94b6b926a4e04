//! Data and operations on filtered simplicial complexes stored as a simplex tree.
//!
//! This module provides the [`SimplexTree`] struct: a trie keyed by strictly
//! increasing vertex labels that stores exactly the set of simplices present
//! in a filtered complex, each tagged with its filtration value. Complex
//! builders (Vietoris-Rips, Čech, alpha, or any geometric front end) populate
//! the tree through [`SimplexTree::insert`] and
//! [`SimplexTree::assign_filtration`]; persistent-homology engines consume
//! [`SimplexTree::filtration_order`] and rely on its face-before-coface
//! ordering contract.
//!
//! # Key Features
//!
//! - **Closure insertion**: Inserting a simplex automatically inserts every
//!   missing face, so the stored set is always downward closed under
//!   face-taking
//! - **Arena storage**: Nodes live in a slotmap arena referenced by stable
//!   keys; each node holds a sorted sibling list, keeping traversal
//!   deterministic and cache-friendly
//! - **Constant-time scalar queries**: Simplex and vertex counts and the
//!   complex dimension are maintained incrementally
//! - **Deterministic enumeration**: A lazy post-order skeleton traversal and
//!   a filtration-sorted snapshot enumeration with a dimension-then-lex
//!   tie-break
//! - **Monotonicity repair**: A single pass in dimension order restores
//!   `filtration(τ) ≤ filtration(σ)` for every face τ of every simplex σ
//! - **Serialization support**: Serde support for persistence; the trie is
//!   reconstructed from the flat simplex list during deserialization
//!
//! # Structural Invariants
//!
//! | Invariant | Maintained by |
//! |---|---|
//! | Downward closure | `insert` walks every non-empty subset of the new simplex |
//! | Uniqueness | one node per canonical vertex path, enforced by the sibling stores |
//! | Monotonicity | *not* automatic; `assign_filtration` may break it, `make_filtration_non_decreasing` repairs it on demand |
//!
//! # Concurrency
//!
//! The tree is a single-threaded, CPU-bound structure with no internal
//! locking. Read-only queries take `&self` and may run in parallel; the
//! mutating operations take `&mut self`, so the borrow checker enforces the
//! single-writer discipline.
//!
//! # Examples
//!
//! ```rust
//! use simplex_tree::prelude::*;
//!
//! let mut tree = SimplexTree::new();
//!
//! // Inserting a triangle creates all 7 faces
//! assert!(tree.insert(&[0, 1, 2], 0.5).unwrap());
//! assert_eq!(tree.number_of_simplices(), 7);
//! assert_eq!(tree.number_of_vertices(), 3);
//! assert_eq!(tree.dim(), Some(2));
//!
//! // Re-inserting an existing simplex reports `false` and changes nothing
//! assert!(!tree.insert(&[1, 2], 9.0).unwrap());
//! assert_eq!(tree.filtration(&[1, 2]).unwrap(), 0.5);
//! ```

// =============================================================================
// IMPORTS
// =============================================================================

// External crate imports
use ordered_float::OrderedFloat;
use serde::de::Error as DeError;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

// Crate-internal imports
use crate::core::collections::StorageMap;
use crate::core::node::{Node, NodeKey, SiblingStore};
use crate::core::simplex::{
    SimplexValidationError, Vertex, VertexBuffer, canonicalize, facets, is_face_of, subsets,
};

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur during simplex tree operations.
///
/// "Already present" on [`SimplexTree::insert`] is signaled through the
/// boolean return value, not an error; error kinds are reserved for invalid
/// input and references to absent simplices. Every mutating operation
/// validates its input before touching the tree, so a failed call leaves the
/// structure unchanged.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SimplexTreeError {
    /// The given vertex set is not a valid simplex.
    #[error("Invalid simplex: {source}")]
    InvalidSimplex {
        /// The underlying validation error.
        #[from]
        source: SimplexValidationError,
    },
    /// A query or assignment referenced a simplex absent from the tree.
    #[error("Simplex {simplex:?} is not in the complex")]
    SimplexNotFound {
        /// The canonical vertex sequence that was not found.
        simplex: Vec<Vertex>,
    },
}

// =============================================================================
// SIMPLEX TREE
// =============================================================================

/// A filtered simplicial complex stored as a simplex tree.
///
/// The tree owns a node arena and the root's sibling store; all nodes are
/// owned transitively through this single root, no node is shared between
/// two parents, and there are no cycles. Each node represents the simplex
/// spelled by the vertex labels on its root path.
///
/// # Usage
///
/// ```rust
/// use simplex_tree::prelude::*;
///
/// let mut tree = SimplexTree::new();
/// tree.insert(&[0, 1], 0.0).unwrap();
/// tree.insert(&[1, 2], 0.0).unwrap();
///
/// assert!(tree.find(&[1]));
/// assert!(!tree.find(&[0, 2]));
/// assert_eq!(tree.number_of_simplices(), 5);
/// ```
#[derive(Clone, Debug, Default)]
pub struct SimplexTree {
    /// Node arena, providing stable keys and efficient access.
    nodes: StorageMap<NodeKey, Node>,

    /// Sibling store of the sentinel root; its entries are exactly the
    /// depth-1 nodes, i.e. the vertices of the complex.
    root: SiblingStore,

    /// Count of all nodes, updated on every node creation.
    num_simplices: usize,

    /// Largest root-path length over all nodes; 0 on the empty tree.
    max_depth: usize,
}

impl SimplexTree {
    /// Creates an empty complex: root only, zero simplices.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the complex contains no simplices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.num_simplices == 0
    }

    /// Dimension of the complex: the largest dimension over all present
    /// simplices, or `None` on the empty tree.
    ///
    /// Maintained incrementally, so the query is O(1).
    #[must_use]
    pub fn dim(&self) -> Option<usize> {
        self.max_depth.checked_sub(1)
    }

    /// Number of vertices (0-simplices) in the complex.
    #[must_use]
    pub fn number_of_vertices(&self) -> usize {
        self.root.len()
    }

    /// Number of simplices of all dimensions in the complex.
    #[must_use]
    pub const fn number_of_simplices(&self) -> usize {
        self.num_simplices
    }

    // =========================================================================
    // INSERTION
    // =========================================================================

    /// Inserts a simplex and every missing face of it, all at filtration
    /// value `filtration`.
    ///
    /// The vertex set is canonicalized first. Nodes that already exist keep
    /// their prior filtration value untouched; insertion never lowers or
    /// raises an existing value. Returns `true` iff the simplex itself was
    /// newly created by this call, `false` if it was already present (in
    /// which case nothing is mutated).
    ///
    /// Cost is exponential only in the size of the *inserted* simplex (all
    /// 2^(k+1) − 1 subsets are visited), not in the size of the complex.
    ///
    /// # Errors
    ///
    /// Returns [`SimplexTreeError::InvalidSimplex`] if the vertex set is
    /// empty or exceeds the supported dimension bound. No node is created or
    /// modified in that case.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use simplex_tree::prelude::*;
    ///
    /// let mut tree = SimplexTree::new();
    /// assert!(tree.insert(&[1, 0], 0.25).unwrap());
    /// assert!(tree.find(&[0]));
    /// assert!(tree.find(&[1]));
    /// assert_eq!(tree.filtration(&[0, 1]).unwrap(), 0.25);
    /// assert!(tree.insert(&[], 0.0).is_err());
    /// ```
    pub fn insert(
        &mut self,
        vertices: &[Vertex],
        filtration: f64,
    ) -> Result<bool, SimplexTreeError> {
        let sigma = canonicalize(vertices)?;

        // Downward closure: if the simplex is present, so is every face, and
        // no filtration value may change. Nothing to do.
        if self.find_node(&sigma).is_some() {
            return Ok(false);
        }

        for subset in subsets(&sigma) {
            let mut parent = None;
            for &label in &subset {
                let (key, _created) = self.get_or_create_child(parent, label, filtration);
                parent = Some(key);
            }
        }
        self.max_depth = self.max_depth.max(sigma.len());

        tracing::trace!(
            "inserted simplex {:?} (dim {}) at filtration {}",
            sigma.as_slice(),
            sigma.len() - 1,
            filtration,
        );
        Ok(true)
    }

    // =========================================================================
    // MEMBERSHIP AND FILTRATION QUERIES
    // =========================================================================

    /// Returns `true` iff the simplex spelled by `vertices` is present.
    ///
    /// Total: an empty vertex set is treated as "not found" rather than an
    /// error, as is a vertex set beyond the supported dimension bound (no
    /// such simplex can ever have been inserted).
    #[must_use]
    pub fn find(&self, vertices: &[Vertex]) -> bool {
        let Ok(sigma) = canonicalize(vertices) else {
            return false;
        };
        self.find_node(&sigma).is_some()
    }

    /// Returns the filtration value of a present simplex.
    ///
    /// # Errors
    ///
    /// Returns [`SimplexTreeError::InvalidSimplex`] on an invalid vertex set
    /// and [`SimplexTreeError::SimplexNotFound`] if the simplex is absent.
    pub fn filtration(&self, vertices: &[Vertex]) -> Result<f64, SimplexTreeError> {
        let sigma = canonicalize(vertices)?;
        let key = self
            .find_node(&sigma)
            .ok_or_else(|| SimplexTreeError::SimplexNotFound {
                simplex: sigma.to_vec(),
            })?;
        Ok(self.nodes[key].filtration())
    }

    /// Overwrites the filtration value of a present simplex unconditionally.
    ///
    /// Monotonicity with faces and cofaces is *not* checked or enforced; the
    /// complex may afterwards violate the filtration property until
    /// [`SimplexTree::make_filtration_non_decreasing`] is called.
    ///
    /// # Errors
    ///
    /// Returns [`SimplexTreeError::InvalidSimplex`] on an invalid vertex set
    /// and [`SimplexTreeError::SimplexNotFound`] if the simplex is absent;
    /// the tree is unchanged in both cases.
    pub fn assign_filtration(
        &mut self,
        vertices: &[Vertex],
        filtration: f64,
    ) -> Result<(), SimplexTreeError> {
        let sigma = canonicalize(vertices)?;
        let key = self
            .find_node(&sigma)
            .ok_or_else(|| SimplexTreeError::SimplexNotFound {
                simplex: sigma.to_vec(),
            })?;
        self.nodes[key].set_filtration(filtration);
        Ok(())
    }

    /// Assigns `filtration` to every simplex of dimension ≥ `min_dim`.
    ///
    /// Like [`SimplexTree::assign_filtration`] this is a blind overwrite and
    /// may leave the filtration non-monotone; repair on demand with
    /// [`SimplexTree::make_filtration_non_decreasing`].
    pub fn reset_filtration(&mut self, filtration: f64, min_dim: usize) {
        let keys: Vec<NodeKey> = self
            .collect_simplices()
            .into_iter()
            .filter(|(path, _)| path.len() > min_dim)
            .map(|(_, key)| key)
            .collect();
        let reset = keys.len();
        for key in keys {
            self.nodes[key].set_filtration(filtration);
        }
        tracing::debug!(
            "reset filtration of {} simplices (min_dim {}) to {}",
            reset,
            min_dim,
            filtration,
        );
    }

    // =========================================================================
    // ENUMERATION
    // =========================================================================

    /// Enumerates every simplex of dimension ≤ `max_dim` together with its
    /// filtration value.
    ///
    /// The traversal is a lazy depth-first walk: siblings are visited in
    /// ascending label order and all of a node's children are emitted
    /// *before* the node itself (post-order). This order is a deterministic
    /// structural contract but is **not** sorted by filtration value; use
    /// [`SimplexTree::filtration_order`] for the filtration-sorted stream.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use simplex_tree::prelude::*;
    ///
    /// let mut tree = SimplexTree::new();
    /// tree.insert(&[0, 1], 0.0).unwrap();
    ///
    /// let vertices: Vec<_> = tree.skeleton(0).map(|(s, _)| s).collect();
    /// assert_eq!(vertices, vec![vec![0], vec![1]]);
    /// ```
    #[must_use]
    pub fn skeleton(&self, max_dim: usize) -> SkeletonIter<'_> {
        SkeletonIter {
            tree: self,
            max_depth: max_dim.saturating_add(1),
            stack: Vec::new(),
            path: VertexBuffer::new(),
            next_root: 0,
        }
    }

    /// Enumerates every simplex sorted by filtration value ascending, ties
    /// broken by dimension ascending, then lexicographic order of the
    /// canonical vertex sequence.
    ///
    /// On a monotone filtration the tie-break guarantees that every face
    /// appears before each of its cofaces, which is the contract
    /// persistent-homology consumers rely on. The returned iterator is a snapshot of the tree
    /// state at call time; later mutations are not reflected.
    #[must_use]
    pub fn filtration_order(&self) -> FiltrationOrderIter {
        let mut simplices = self.simplex_filtration_pairs();
        simplices.sort_by(|a, b| {
            OrderedFloat(a.1)
                .cmp(&OrderedFloat(b.1))
                .then(a.0.len().cmp(&b.0.len()))
                .then_with(|| a.0.cmp(&b.0))
        });
        FiltrationOrderIter {
            inner: simplices.into_iter(),
        }
    }

    /// Returns the star of a simplex: every coface (including the simplex
    /// itself) with its filtration value, in the deterministic traversal
    /// order of [`SimplexTree::skeleton`].
    ///
    /// Returns an empty list when the simplex is absent from the tree.
    ///
    /// # Errors
    ///
    /// Returns [`SimplexTreeError::InvalidSimplex`] on an invalid vertex set.
    pub fn star(
        &self,
        vertices: &[Vertex],
    ) -> Result<Vec<(Vec<Vertex>, f64)>, SimplexTreeError> {
        let sigma = canonicalize(vertices)?;
        if self.find_node(&sigma).is_none() {
            return Ok(Vec::new());
        }
        let max_dim = self.dim().unwrap_or(0);
        Ok(self
            .skeleton(max_dim)
            .filter(|(coface, _)| is_face_of(&sigma, coface))
            .collect())
    }

    /// Returns the boundary of a present simplex: its codimension-1 faces
    /// with their filtration values, in order of the omitted vertex. Empty
    /// for a vertex.
    ///
    /// # Errors
    ///
    /// Returns [`SimplexTreeError::InvalidSimplex`] on an invalid vertex set
    /// and [`SimplexTreeError::SimplexNotFound`] if the simplex is absent.
    pub fn boundary(
        &self,
        vertices: &[Vertex],
    ) -> Result<Vec<(Vec<Vertex>, f64)>, SimplexTreeError> {
        let sigma = canonicalize(vertices)?;
        if self.find_node(&sigma).is_none() {
            return Err(SimplexTreeError::SimplexNotFound {
                simplex: sigma.to_vec(),
            });
        }
        let mut faces = Vec::with_capacity(sigma.len());
        for face in facets(&sigma) {
            // Every facet is present by downward closure.
            if let Some(key) = self.find_node(&face) {
                faces.push((face.to_vec(), self.nodes[key].filtration()));
            }
        }
        Ok(faces)
    }

    // =========================================================================
    // FILTRATION REPAIR
    // =========================================================================

    /// Restores filtration monotonicity: afterwards every face has a value ≤
    /// each of its cofaces.
    ///
    /// Simplices are processed strictly in order of non-decreasing dimension;
    /// for each simplex of dimension > 0 the value is raised to the maximum
    /// over its codimension-1 faces, each located by an independent root
    /// walk. Values only ever increase and faces are always processed before
    /// their cofaces, so a single pass suffices.
    ///
    /// Returns `true` iff at least one filtration value changed. Idempotent:
    /// a second consecutive call always returns `false`.
    pub fn make_filtration_non_decreasing(&mut self) -> bool {
        let mut simplices = self.collect_simplices();
        simplices.sort_by(|a, b| a.0.len().cmp(&b.0.len()).then_with(|| a.0.cmp(&b.0)));

        let mut updated = 0usize;
        for (path, key) in simplices {
            if path.len() < 2 {
                continue;
            }
            let mut max_face = f64::NEG_INFINITY;
            for face in facets(&path) {
                // Present by downward closure; most faces live on a
                // different branch than the node itself.
                if let Some(face_key) = self.find_node(&face) {
                    max_face = max_face.max(self.nodes[face_key].filtration());
                }
            }
            let node = &mut self.nodes[key];
            if max_face > node.filtration() {
                node.set_filtration(max_face);
                updated += 1;
            }
        }

        tracing::debug!("filtration repair updated {} simplices", updated);
        updated > 0
    }

    // =========================================================================
    // INTERNAL HELPERS
    // =========================================================================

    /// Walks the root path for a canonical vertex sequence; `None` as soon as
    /// a label is missing, or for the empty sequence.
    fn find_node(&self, canonical: &[Vertex]) -> Option<NodeKey> {
        let mut store = &self.root;
        let mut found = None;
        for &label in canonical {
            let key = store.find(label)?;
            store = self.nodes[key].children();
            found = Some(key);
        }
        found
    }

    /// Returns the child of `parent` (the root when `None`) with the given
    /// label, creating it at `filtration` if missing. Existing children keep
    /// their filtration untouched. The boolean reports whether a node was
    /// created.
    fn get_or_create_child(
        &mut self,
        parent: Option<NodeKey>,
        label: Vertex,
        filtration: f64,
    ) -> (NodeKey, bool) {
        let store = match parent {
            Some(p) => self.nodes[p].children(),
            None => &self.root,
        };
        if let Some(existing) = store.find(label) {
            return (existing, false);
        }

        let key = self.nodes.insert(Node::new(label, filtration));
        let store = match parent {
            Some(p) => self.nodes[p].children_mut(),
            None => &mut self.root,
        };
        store.insert(label, key);
        self.num_simplices += 1;
        (key, true)
    }

    /// Collects every node as `(root path, key)`, in unspecified order.
    fn collect_simplices(&self) -> Vec<(VertexBuffer, NodeKey)> {
        let mut out = Vec::with_capacity(self.num_simplices);
        let mut stack: Vec<(NodeKey, VertexBuffer)> = self
            .root
            .iter()
            .map(|(label, key)| {
                let mut path = VertexBuffer::new();
                path.push(label);
                (key, path)
            })
            .collect();
        while let Some((key, path)) = stack.pop() {
            for (label, child) in self.nodes[key].children().iter() {
                let mut child_path = path.clone();
                child_path.push(label);
                stack.push((child, child_path));
            }
            out.push((path, key));
        }
        out
    }

    /// All `(simplex, filtration)` pairs, in unspecified order.
    fn simplex_filtration_pairs(&self) -> Vec<(Vec<Vertex>, f64)> {
        self.collect_simplices()
            .into_iter()
            .map(|(path, key)| (path.to_vec(), self.nodes[key].filtration()))
            .collect()
    }
}

// =============================================================================
// ITERATORS
// =============================================================================

/// Lazy post-order skeleton traversal, created by [`SimplexTree::skeleton`].
///
/// Yields `(canonical vertex sequence, filtration)` pairs. Siblings are
/// visited in ascending label order and a node's children are fully emitted
/// before the node itself.
#[derive(Debug)]
pub struct SkeletonIter<'a> {
    tree: &'a SimplexTree,
    /// `max_dim + 1`: only nodes at root-path length ≤ this are visited.
    max_depth: usize,
    /// `(node, index of the next child to descend into)`.
    stack: Vec<(NodeKey, usize)>,
    path: VertexBuffer,
    next_root: usize,
}

impl Iterator for SkeletonIter<'_> {
    type Item = (Vec<Vertex>, f64);

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.tree;
        loop {
            if self.stack.is_empty() {
                let (label, key) = tree.root.get_index(self.next_root)?;
                self.next_root += 1;
                self.stack.push((key, 0));
                self.path.push(label);
                continue;
            }

            let &(key, next_child) = self.stack.last()?;
            let node = &tree.nodes[key];
            if self.path.len() < self.max_depth {
                if let Some((label, child)) = node.children().get_index(next_child) {
                    if let Some(top) = self.stack.last_mut() {
                        top.1 = next_child + 1;
                    }
                    self.stack.push((child, 0));
                    self.path.push(label);
                    continue;
                }
            }

            let item = (self.path.to_vec(), node.filtration());
            self.stack.pop();
            self.path.pop();
            return Some(item);
        }
    }
}

/// Snapshot enumeration in filtration order, created by
/// [`SimplexTree::filtration_order`].
#[derive(Clone, Debug)]
pub struct FiltrationOrderIter {
    inner: std::vec::IntoIter<(Vec<Vertex>, f64)>,
}

impl Iterator for FiltrationOrderIter {
    type Item = (Vec<Vertex>, f64);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for FiltrationOrderIter {}

// =============================================================================
// SERIALIZATION
// =============================================================================

/// Flat wire form: the simplex list in dimension-then-lexicographic order,
/// so every face precedes its cofaces and re-insertion reproduces each
/// stored filtration value exactly, monotone or not.
#[derive(Deserialize)]
struct RawSimplexTree {
    simplices: Vec<(Vec<Vertex>, f64)>,
}

impl Serialize for SimplexTree {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut simplices = self.simplex_filtration_pairs();
        simplices.sort_by(|a, b| a.0.len().cmp(&b.0.len()).then_with(|| a.0.cmp(&b.0)));

        let mut state = serializer.serialize_struct("SimplexTree", 1)?;
        state.serialize_field("simplices", &simplices)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for SimplexTree {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Arena keys and sibling stores are not serialized; the trie is
        // reconstructed by re-inserting the flat simplex list.
        let raw = RawSimplexTree::deserialize(deserializer)?;
        let mut tree = Self::new();
        for (vertices, filtration) in raw.simplices {
            tree.insert(&vertices, filtration).map_err(D::Error::custom)?;
        }
        Ok(tree)
    }
}

// =============================================================================
// TESTS
// =============================================================================
