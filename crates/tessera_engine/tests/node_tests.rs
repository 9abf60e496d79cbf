//! Tests for the tile node model

use tessera_engine::{grid_positions, TileNode, GRID_DIM};

#[test]
fn test_variations_grid_keeps_source_at_center() {
    let node = TileNode::random();
    let grid = node.variations_grid();
    assert_eq!(*grid.get(GRID_DIM / 2, GRID_DIM / 2), node);
}

#[test]
fn test_variations_grid_is_full() {
    let grid = TileNode::random().variations_grid();
    assert_eq!(grid_positions().map(|(r, c)| grid.get(r, c)).count(), 25);
}

#[test]
fn test_mutation_preserves_color_root() {
    let node = TileNode::random();
    for _ in 0..20 {
        assert!(matches!(node.mutate(0.9), TileNode::Rgb(..)));
    }
}

#[test]
fn test_zero_strength_mutation_is_identity() {
    let node = TileNode::random();
    assert_eq!(node.mutate(0.0), node);
}

#[test]
fn test_node_round_trips_through_json() {
    let node = TileNode::random();
    let json = serde_json::to_string_pretty(&node).unwrap();
    let back: TileNode = serde_json::from_str(&json).unwrap();
    assert_eq!(back, node);
}
