use glow::HasContext as _;
use tessera_engine::{PixelBounds, Surface};

use crate::check_gl_error;

/// Frame-begin hook for the grid panel: scissors to the panel bounds and
/// clears them, leaving the rest of the UI untouched.
#[derive(Default)]
pub struct GlSurface;

impl Surface<glow::Context> for GlSurface {
    fn start_frame(&mut self, gl: &glow::Context, bounds: PixelBounds) {
        unsafe {
            gl.enable(glow::SCISSOR_TEST);
            gl.scissor(bounds.x, bounds.y, bounds.width, bounds.height);
            gl.clear_color(0.0, 0.0, 0.0, 1.0);
            gl.clear(glow::COLOR_BUFFER_BIT);
        }
        check_gl_error!(gl, "surface.start_frame");
    }
}
