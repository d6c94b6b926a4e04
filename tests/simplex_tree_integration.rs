//! Basic integration tests for simplex tree construction, queries, and
//! filtration repair.
//!
//! This module contains fundamental integration tests that verify correct
//! end-to-end behavior of the tree across operation sequences:
//! - Closure insertion across several overlapping simplices
//! - Incremental counter and dimension tracking
//! - Skeleton and filtration-order enumeration contracts
//! - Filtration repair after direct assignment
//! - Serde round trips
//!
//! These tests focus on small, fully-understood complexes so every expected
//! count and filtration value can be written out explicitly.

use simplex_tree::prelude::*;

// =============================================================================
// CONSTRUCTION AND REPAIR SCENARIO
// =============================================================================

/// Builds three edges, grows them into three triangles at increasing
/// filtration values, breaks monotonicity through a vertex assignment, and
/// repairs it. Every intermediate count and value is checked.
#[test]
fn test_three_triangles_with_filtration_repair() {
    let mut tree = SimplexTree::new();

    // Three edges on four vertices; re-insertion reports "already present"
    assert!(tree.insert(&[0, 1], 0.0).unwrap());
    assert!(tree.insert(&[1, 2], 0.0).unwrap());
    assert!(tree.insert(&[3, 1], 0.0).unwrap());
    assert!(!tree.insert(&[3, 1], 0.0).unwrap());

    assert_eq!(tree.number_of_vertices(), 4);
    assert_eq!(tree.number_of_simplices(), 7);
    assert_eq!(tree.dim(), Some(1));
    assert!(!tree.find(&[2, 4]));

    // First triangle: only the missing edge and the triangle are created
    assert!(tree.insert(&[0, 1, 2], 0.1).unwrap());
    assert_eq!(tree.number_of_simplices(), 9);
    assert_eq!(tree.filtration(&[0, 2]).unwrap(), 0.1);
    assert_eq!(tree.filtration(&[0, 1, 2]).unwrap(), 0.1);
    for unchanged in [&[0][..], &[1], &[2], &[0, 1], &[1, 2]] {
        assert_eq!(tree.filtration(unchanged).unwrap(), 0.0);
    }

    // Second triangle
    assert!(tree.insert(&[1, 2, 3], 0.2).unwrap());
    assert_eq!(tree.number_of_simplices(), 11);
    assert_eq!(tree.filtration(&[2, 3]).unwrap(), 0.2);
    assert_eq!(tree.filtration(&[1, 2, 3]).unwrap(), 0.2);
    assert_eq!(tree.filtration(&[1, 2]).unwrap(), 0.0);
    assert_eq!(tree.filtration(&[1, 3]).unwrap(), 0.0);

    // Third triangle
    assert!(tree.insert(&[0, 1, 3], 0.4).unwrap());
    assert_eq!(tree.number_of_simplices(), 13);
    assert_eq!(tree.filtration(&[0, 3]).unwrap(), 0.4);
    assert_eq!(tree.filtration(&[0, 1, 3]).unwrap(), 0.4);
    assert_eq!(tree.filtration(&[0, 1]).unwrap(), 0.0);
    assert_eq!(tree.filtration(&[1, 3]).unwrap(), 0.0);
    assert_eq!(tree.dim(), Some(2));

    // Raising a vertex above its cofaces breaks monotonicity
    tree.assign_filtration(&[3], 0.8).unwrap();
    assert_eq!(tree.filtration(&[3]).unwrap(), 0.8);
    assert!(tree.filtration(&[2, 3]).unwrap() < 0.8);

    // One repair pass propagates the value through every coface of [3]
    assert!(tree.make_filtration_non_decreasing());
    assert_eq!(tree.filtration(&[2, 3]).unwrap(), 0.8);
    assert_eq!(tree.filtration(&[1, 3]).unwrap(), 0.8);
    assert_eq!(tree.filtration(&[0, 3]).unwrap(), 0.8);
    assert_eq!(tree.filtration(&[0, 1, 3]).unwrap(), 0.8);
    assert_eq!(tree.filtration(&[1, 2, 3]).unwrap(), 0.8);
    // Simplices not above [3] are untouched
    assert_eq!(tree.filtration(&[0, 1, 2]).unwrap(), 0.1);
    assert_eq!(tree.filtration(&[0, 1]).unwrap(), 0.0);

    // Idempotent
    assert!(!tree.make_filtration_non_decreasing());
}

// =============================================================================
// ENUMERATION CONTRACTS
// =============================================================================

#[test]
fn test_skeleton_walks_children_before_self_in_label_order() {
    let mut tree = SimplexTree::new();
    tree.insert(&[0, 1, 2], 0.0).unwrap();
    tree.insert(&[1, 3], 0.0).unwrap();

    let order: Vec<Vec<Vertex>> = tree.skeleton(2).map(|(s, _)| s).collect();
    assert_eq!(
        order,
        vec![
            vec![0, 1, 2],
            vec![0, 1],
            vec![0, 2],
            vec![0],
            vec![1, 2],
            vec![1, 3],
            vec![1],
            vec![2],
            vec![3],
        ]
    );
}

#[test]
fn test_filtration_order_puts_faces_before_cofaces() {
    let mut tree = SimplexTree::new();
    tree.insert(&[0, 1, 2], 0.1).unwrap();
    tree.insert(&[1, 2, 3], 0.2).unwrap();
    tree.assign_filtration(&[3], 0.8).unwrap();
    tree.make_filtration_non_decreasing();

    let stream: Vec<(Vec<Vertex>, f64)> = tree.filtration_order().collect();
    assert_eq!(stream.len(), tree.number_of_simplices());

    // Values ascend, and every face precedes each of its cofaces
    for window in stream.windows(2) {
        assert!(window[0].1 <= window[1].1, "filtration values must ascend");
    }
    for (i, (face, _)) in stream.iter().enumerate() {
        for (coface, _) in &stream[..i] {
            assert!(
                !is_face_of(face, coface) || face == coface,
                "face {face:?} appears after coface {coface:?}"
            );
        }
    }
}

#[test]
fn test_star_and_boundary_agree_with_definitions() {
    let mut tree = SimplexTree::new();
    tree.insert(&[0, 1, 2], 0.3).unwrap();
    tree.insert(&[2, 3], 0.6).unwrap();

    let mut star: Vec<Vec<Vertex>> = tree
        .star(&[2])
        .unwrap()
        .into_iter()
        .map(|(s, _)| s)
        .collect();
    star.sort();
    assert_eq!(
        star,
        vec![vec![0, 1, 2], vec![0, 2], vec![1, 2], vec![2], vec![2, 3]]
    );

    let boundary = tree.boundary(&[0, 1, 2]).unwrap();
    assert_eq!(
        boundary,
        vec![(vec![1, 2], 0.3), (vec![0, 2], 0.3), (vec![0, 1], 0.3)]
    );
}

// =============================================================================
// SERIALIZATION
// =============================================================================

#[test]
fn test_serde_round_trip_preserves_non_monotone_filtrations() {
    let mut tree = SimplexTree::new();
    tree.insert(&[0, 1, 2], 0.1).unwrap();
    tree.insert(&[2, 3, 4], 0.2).unwrap();
    tree.assign_filtration(&[2], 9.0).unwrap(); // deliberately non-monotone

    let json = serde_json::to_string(&tree).unwrap();
    let restored: SimplexTree = serde_json::from_str(&json).unwrap();

    assert_eq!(restored.number_of_simplices(), tree.number_of_simplices());
    assert_eq!(restored.number_of_vertices(), tree.number_of_vertices());
    assert_eq!(restored.dim(), tree.dim());

    let original: Vec<_> = tree.filtration_order().collect();
    let round_tripped: Vec<_> = restored.filtration_order().collect();
    assert_eq!(original, round_tripped);
    assert_eq!(restored.filtration(&[2]).unwrap(), 9.0);
}

#[test]
fn test_independent_trees_do_not_share_state() {
    let mut a = SimplexTree::new();
    let mut b = SimplexTree::new();

    a.insert(&[0, 1], 0.0).unwrap();
    b.insert(&[5], 1.0).unwrap();

    assert_eq!(a.number_of_simplices(), 3);
    assert_eq!(b.number_of_simplices(), 1);
    assert!(!b.find(&[0, 1]));
    assert!(!a.find(&[5]));
}
