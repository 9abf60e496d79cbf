use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

pub const ZOOM_MIN: f32 = -2.0;
pub const ZOOM_MAX: f32 = 2.0;

/// Zoom change applied per wheel event.
pub const ZOOM_STEP: f32 = 0.1;

/// Synthetic time advance per controller tick (not wall-clock).
pub const FRAME_TIME_STEP: f32 = 0.01;

/// Meaning of a grid click. Pan is interpreted by the controller's drag
/// handling instead; it is the no-op arm of click dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Operation {
    #[default]
    Pan,
    Variations,
    Save,
    Open,
    Inspect,
}

/// Shared, mutable view parameters. One instance per session, read and
/// written by the input handlers and the renderer every frame.
/// Last-write-wins, no buffering.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportState {
    zoom: f32,
    pub center: (f32, f32),
    pub operation: Operation,
    pub continuous: bool,
    frame_rate_reduction: u64,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            zoom: 0.0,
            center: (0.0, 0.0),
            operation: Operation::default(),
            continuous: false,
            frame_rate_reduction: 1,
        }
    }
}

impl ViewportState {
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom.clamp(ZOOM_MIN, ZOOM_MAX);
    }

    pub fn zoom_by(&mut self, delta: f32) {
        self.set_zoom(self.zoom + delta);
    }

    /// Half-width of the parameter-space window currently visible.
    pub fn zoom_radius(&self) -> f32 {
        (-self.zoom).exp() * 2.0
    }

    /// Translates the pan center by a pointer movement delta, scaled so
    /// panning feels speed-consistent across zoom levels.
    ///
    /// Precondition: `client` is non-zero on both axes; a zero-size canvas
    /// produces non-finite deltas.
    pub fn pan_by(&mut self, delta: (f32, f32), client: (f32, f32)) {
        let scale = 2.0 * crate::GRID_DIM as f32 * self.zoom_radius();
        self.center.0 -= delta.0 * scale / client.0;
        self.center.1 -= delta.1 * scale / client.1;
    }

    pub fn frame_rate_reduction(&self) -> u64 {
        self.frame_rate_reduction
    }

    pub fn set_frame_rate_reduction(&mut self, reduction: u64) {
        self.frame_rate_reduction = reduction.max(1);
    }

    pub fn shared(self) -> SharedViewport {
        Arc::new(Mutex::new(self))
    }
}

/// The viewport is shared by reference between the controller and every
/// active display; nobody owns it exclusively.
pub type SharedViewport = Arc<Mutex<ViewportState>>;
