use serde::{Deserialize, Serialize};

use crate::{Grid, GRID_DIM};

/// Depth of freshly generated scalar expressions.
const SEED_DEPTH: u32 = 3;

/// Depth of replacement subtrees introduced by mutation.
const MUTATION_DEPTH: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    Sin,
    Cos,
    Abs,
    Neg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Min,
    Max,
}

/// One tile's content definition: a small expression tree over the
/// parameter-space position and time, combined into a color at the root.
///
/// Immutable from the grid's perspective except at cell replacement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TileNode {
    Const(f32),
    X,
    Y,
    Time,
    Unary(UnaryOp, Box<TileNode>),
    Binary(BinaryOp, Box<TileNode>, Box<TileNode>),
    Rgb(Box<TileNode>, Box<TileNode>, Box<TileNode>),
}

impl TileNode {
    /// A fresh random tile definition; always an `Rgb` root over three
    /// scalar expressions.
    pub fn random() -> Self {
        TileNode::Rgb(
            Box::new(Self::random_scalar(SEED_DEPTH)),
            Box::new(Self::random_scalar(SEED_DEPTH)),
            Box::new(Self::random_scalar(SEED_DEPTH)),
        )
    }

    fn random_leaf() -> Self {
        match fastrand::u32(0..5) {
            0 => TileNode::Const(fastrand::f32() * 2.0 - 1.0),
            1 | 2 => TileNode::X,
            3 => TileNode::Y,
            _ => TileNode::Time,
        }
    }

    fn random_scalar(depth: u32) -> Self {
        if depth == 0 {
            return Self::random_leaf();
        }
        match fastrand::u32(0..6) {
            0 => Self::random_leaf(),
            1 | 2 => {
                let op = match fastrand::u32(0..4) {
                    0 => UnaryOp::Sin,
                    1 => UnaryOp::Cos,
                    2 => UnaryOp::Abs,
                    _ => UnaryOp::Neg,
                };
                TileNode::Unary(op, Box::new(Self::random_scalar(depth - 1)))
            }
            _ => {
                let op = match fastrand::u32(0..5) {
                    0 => BinaryOp::Add,
                    1 => BinaryOp::Sub,
                    2 => BinaryOp::Mul,
                    3 => BinaryOp::Min,
                    _ => BinaryOp::Max,
                };
                TileNode::Binary(
                    op,
                    Box::new(Self::random_scalar(depth - 1)),
                    Box::new(Self::random_scalar(depth - 1)),
                )
            }
        }
    }

    /// A structural variation of this node. `strength` in `[0, 1]` is the
    /// per-subtree probability of being regrown; the `Rgb` root is kept.
    pub fn mutate(&self, strength: f32) -> Self {
        match self {
            TileNode::Rgb(r, g, b) => TileNode::Rgb(
                Box::new(r.mutate_scalar(strength)),
                Box::new(g.mutate_scalar(strength)),
                Box::new(b.mutate_scalar(strength)),
            ),
            other => other.mutate_scalar(strength),
        }
    }

    fn mutate_scalar(&self, strength: f32) -> Self {
        if fastrand::f32() < strength {
            return Self::random_scalar(MUTATION_DEPTH);
        }
        match self {
            TileNode::Unary(op, a) => TileNode::Unary(*op, Box::new(a.mutate_scalar(strength))),
            TileNode::Binary(op, a, b) => TileNode::Binary(
                *op,
                Box::new(a.mutate_scalar(strength)),
                Box::new(b.mutate_scalar(strength)),
            ),
            TileNode::Rgb(r, g, b) => TileNode::Rgb(
                Box::new(r.mutate_scalar(strength)),
                Box::new(g.mutate_scalar(strength)),
                Box::new(b.mutate_scalar(strength)),
            ),
            leaf => leaf.clone(),
        }
    }

    /// The 5×5 grid a "variations" drill-down navigates into: this node at
    /// the center, neighbors mutated harder with distance.
    pub fn variations_grid(&self) -> Grid<TileNode> {
        let mid = GRID_DIM / 2;
        Grid::from_fn(|row, col| {
            let dist = row.abs_diff(mid).max(col.abs_diff(mid));
            if dist == 0 {
                self.clone()
            } else {
                self.mutate(0.12 * dist as f32)
            }
        })
    }

    /// The grid a session starts with: unrelated random tiles.
    pub fn seed_grid() -> Grid<TileNode> {
        Grid::from_fn(|_, _| Self::random())
    }
}
