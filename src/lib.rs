//! # simplex-tree
//!
//! A library for storing and querying **filtered simplicial complexes**, an
//! increasing family of [simplicial complexes](https://en.wikipedia.org/wiki/Simplicial_complex)
//! indexed by a real-valued filtration, through a **simplex tree**: a trie
//! keyed by increasing vertex labels in which each node represents exactly
//! one simplex together with its filtration value.
//!
//! # Features
//!
//! - Insertion with automatic face closure: the stored simplex set is always
//!   downward closed under face-taking
//! - Membership and filtration queries by vertex set
//! - Constant-time simplex/vertex counts and complex dimension
//! - Deterministic skeleton enumeration and a filtration-sorted stream with
//!   the face-before-coface ordering contract persistent-homology engines
//!   rely on
//! - A single-pass repair algorithm restoring filtration monotonicity after
//!   direct assignments
//! - Serialization/Deserialization with [serde](https://serde.rs)
//!
//! # Basic Usage
//!
//! ```rust
//! use simplex_tree::prelude::*;
//!
//! let mut tree = SimplexTree::new();
//!
//! // Insert edges; vertices appear automatically
//! assert!(tree.insert(&[0, 1], 0.0).unwrap());
//! assert!(tree.insert(&[1, 2], 0.0).unwrap());
//! assert!(tree.insert(&[3, 1], 0.0).unwrap());
//! assert!(!tree.insert(&[3, 1], 0.0).unwrap()); // already present
//!
//! assert_eq!(tree.number_of_vertices(), 4);
//! assert_eq!(tree.number_of_simplices(), 7);
//! assert_eq!(tree.dim(), Some(1));
//! assert!(!tree.find(&[2, 4]));
//! ```
//!
//! # Filtration Repair
//!
//! Direct filtration assignment may leave a face with a larger value than
//! one of its cofaces; [`SimplexTree::make_filtration_non_decreasing`]
//! repairs this in a single pass over the simplices in dimension order:
//!
//! ```rust
//! use simplex_tree::prelude::*;
//!
//! let mut tree = SimplexTree::new();
//! tree.insert(&[0, 1, 2], 0.1).unwrap();
//!
//! tree.assign_filtration(&[2], 0.8).unwrap(); // breaks monotonicity
//! assert!(tree.make_filtration_non_decreasing());
//!
//! assert_eq!(tree.filtration(&[1, 2]).unwrap(), 0.8);
//! assert_eq!(tree.filtration(&[0, 1, 2]).unwrap(), 0.8);
//! assert!(!tree.make_filtration_non_decreasing()); // idempotent
//! ```
//!
//! # Scope
//!
//! The crate is the combinatorial core only. Geometric construction of
//! complexes from point clouds or distance matrices (Rips/Čech/alpha
//! builders), persistent-homology computation, and visualization are
//! external collaborators that populate and consume the tree through its
//! public operations.
//!
//! # References
//!
//! - Boissonnat, J.-D. & Maria, C. "The Simplex Tree: An Efficient Data
//!   Structure for General Simplicial Complexes." Algorithmica 70 (2014):
//!   406-427
//! - Edelsbrunner, H. & Harer, J. "Computational Topology: An Introduction."
//!   AMS, 2010

// Forbid unsafe code throughout the entire crate
#![forbid(unsafe_code)]

/// The `core` module contains the primary data structures and algorithms for
/// building and querying filtered simplicial complexes.
///
/// It includes the `SimplexTree` struct, which owns the trie, as well as the
/// `Node` component and the canonical simplex utilities. The crate also
/// includes a `prelude` module for convenient access to commonly used types.
pub mod core {
    /// Backing collection types (arena storage, small buffers)
    pub mod collections;
    pub mod node;
    pub mod simplex;
    pub mod simplex_tree;
    // Re-export the `core` modules.
    pub use node::*;
    pub use simplex::*;
    pub use simplex_tree::*;
    // Note: collections module not re-exported here to avoid namespace pollution
}

/// A prelude module that re-exports commonly used types.
/// This makes it easier to import the most commonly used items from the crate.
pub mod prelude {
    // Re-export from core
    pub use crate::core::{
        node::{Node, NodeKey},
        simplex::{
            MAX_SIMPLEX_DIMENSION, SimplexValidationError, Vertex, VertexBuffer, canonicalize,
            facets, is_face_of, subsets,
        },
        simplex_tree::{FiltrationOrderIter, SimplexTree, SimplexTreeError, SkeletonIter},
    };

    // Re-export commonly used collection types
    pub use crate::core::collections::{SmallBuffer, StorageMap};
}

/// The function `is_normal` checks that structs implement `auto` traits.
/// Traits are checked at compile time, so this function is only used for
/// testing.
#[must_use]
pub const fn is_normal<T: Sized + Send + Sync + Unpin>() -> bool {
    true
}

// =============================================================================
// TESTS
// =============================================================================
