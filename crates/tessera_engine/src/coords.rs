//! The three coordinate spaces of the grid view and the conversions
//! between them.
//!
//! - *screen-pixel*: pointer offsets in `[0, client_size)`, y down.
//! - *grid-cell*: normalized `[0, 1)` destination rects, 1/5 per cell.
//! - *parameter-space*: the continuous 2D domain the tiles sample,
//!   navigated via zoom/pan.

use crate::{ViewportState, GRID_DIM};

/// Axis-aligned rectangle, used both for normalized destination rects and
/// for parameter-space windows.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl Rect {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }
}

/// Render-target area in physical pixels, GL window coordinates
/// (origin bottom-left).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelBounds {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Maps a pointer offset to the grid cell under it.
///
/// Offset components are expected in `[0, client]`. Pointer rects are
/// inclusive of their far edge, so `offset == client` is a legal input
/// and maps to the last cell; coordinates outside the canvas are a
/// caller precondition, not defended against here.
pub fn cell_at(offset: (f32, f32), client: (f32, f32)) -> (usize, usize) {
    let col = (offset.0 / client.0 * GRID_DIM as f32).floor() as usize;
    let row = (offset.1 / client.1 * GRID_DIM as f32).floor() as usize;
    (row.min(GRID_DIM - 1), col.min(GRID_DIM - 1))
}

/// Normalized destination rect of cell `(row, col)`: a uniform
/// `1/5 × 1/5` tile at `(col/5, row/5)`.
pub fn cell_rect(row: usize, col: usize) -> Rect {
    let size = 1.0 / GRID_DIM as f32;
    let x = col as f32 * size;
    let y = row as f32 * size;
    Rect::new(x, y, x + size, y + size)
}

/// Parameter-space window of cell `(row, col)` for the given viewport.
///
/// All cells share `center ± zoom_radius`; in continuous mode each cell is
/// additionally offset outward by `radius * 2` per step from the center
/// cell, previewing the neighboring translations at the current zoom.
pub fn cell_window(viewport: &ViewportState, row: usize, col: usize) -> Rect {
    let radius = viewport.zoom_radius();
    let (mut cx, mut cy) = viewport.center;
    if viewport.continuous {
        let mid = (GRID_DIM / 2) as f32;
        cx += radius * 2.0 * (col as f32 - mid);
        cy += radius * 2.0 * (row as f32 - mid);
    }
    Rect::new(cx - radius, cy - radius, cx + radius, cy + radius)
}
