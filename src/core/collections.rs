//! Backing collection types for the simplex tree.
//!
//! This module centralizes the storage aliases used throughout the crate so
//! the concrete backends can be swapped in one place: the slotmap arena that
//! owns trie nodes and the small-vector buffers used for vertex sequences and
//! sibling lists.

use smallvec::SmallVec;

// Import slotmap types for the storage backend
#[cfg(not(feature = "dense-slotmap"))]
use slotmap::SlotMap;

#[cfg(feature = "dense-slotmap")]
use slotmap::DenseSlotMap;

// =============================================================================
// STORAGE BACKEND
// =============================================================================

/// Internal storage backend for trie nodes.
///
/// This type alias abstracts over the concrete arena implementation, allowing
/// the choice between `DenseSlotMap` (**default**) and `SlotMap` (when built
/// with `--no-default-features`) without exposing the choice in public APIs.
///
/// # Feature Flags
///
/// - **default**: Uses `DenseSlotMap` (enabled via the default `dense-slotmap` feature)
/// - **--no-default-features**: Uses `SlotMap` for comparison and experimentation
///
/// # Internal Use Only
///
/// This type should not be exposed in public API signatures. Public methods
/// return iterators or plain values that hide the concrete storage backend.
#[cfg(not(feature = "dense-slotmap"))]
pub type StorageMap<K, V> = SlotMap<K, V>;

#[cfg(feature = "dense-slotmap")]
pub type StorageMap<K, V> = DenseSlotMap<K, V>;

// =============================================================================
// SMALL BUFFERS
// =============================================================================

/// Small-optimized Vec that uses stack allocation for small collections.
/// Generic size parameter allows customization per use case, with heap
/// fallback for larger collections.
///
/// # Size Guidelines
///
/// - **N=[`INLINE_SIMPLEX_VERTICES`]**: canonical vertex sequences
/// - **N=[`INLINE_CHILDREN`]**: sibling lists of interior trie nodes
///
/// # Examples
///
/// ```rust
/// use simplex_tree::core::collections::SmallBuffer;
///
/// // Stack-allocated for ≤8 elements, heap for more
/// let mut buffer: SmallBuffer<u32, 8> = SmallBuffer::new();
/// for i in 0..5 {
///     buffer.push(i); // All stack allocated
/// }
/// assert!(!buffer.spilled());
/// ```
pub type SmallBuffer<T, const N: usize> = SmallVec<[T; N]>;

// =============================================================================
// SEMANTIC SIZE CONSTANTS
// =============================================================================

/// Inline capacity for canonical vertex sequences.
///
/// Filtered complexes built from point clouds rarely carry simplices above
/// dimension 7, so 8 vertices of inline storage keeps the hot path
/// allocation-free while still spilling gracefully for larger simplices.
pub const INLINE_SIMPLEX_VERTICES: usize = 8;

/// Inline capacity for the sibling list of an interior trie node.
///
/// Vertex-level nodes can have thousands of siblings and always spill to the
/// heap; deeper nodes typically hold only a handful of children.
pub const INLINE_CHILDREN: usize = 4;
