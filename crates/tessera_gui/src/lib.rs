#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_precision_loss,
    clippy::module_name_repetitions
)]

pub mod glerror;

mod tile_program;
pub use tile_program::*;

mod surface;
pub use surface::*;

/// Fullscreen-quad vertex shader; positions derived from `gl_VertexID`,
/// no vertex buffer needed.
pub const VERTEX_SHADER_SOURCE: &str = r"
const vec2 VERTS[6] = vec2[6](
    vec2(-1.0,  1.0),
    vec2( 1.0,  1.0),
    vec2( 1.0, -1.0),
    vec2(-1.0,  1.0),
    vec2(-1.0, -1.0),
    vec2( 1.0, -1.0)
);

void main() {
    gl_Position = vec4(VERTS[gl_VertexID], 0.0, 1.0);
}
";

pub fn get_shader_version(_gl: &glow::Context) -> &str {
    "#version 330"
}
