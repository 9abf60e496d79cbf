use glow::HasContext as _;
use tessera_engine::{Compile, EngineResult, PixelBounds, Rect, TesseraError, Thumbnail, Tile};

use crate::{check_gl_error, get_shader_version, VERTEX_SHADER_SOURCE};

/// Parameter-space window rendered into save thumbnails (the default
/// zoom-0 window around the origin).
const THUMBNAIL_WINDOW: Rect = Rect {
    x0: -2.0,
    y0: -2.0,
    x1: 2.0,
    y1: 2.0,
};

/// One compiled tile: a GL program plus the empty vertex array the
/// fullscreen quad is drawn with.
pub struct TileProgram {
    program: glow::Program,
    vertex_array: glow::VertexArray,
}

impl TileProgram {
    pub fn compile(gl: &glow::Context, tile_source: &str) -> EngineResult<Self> {
        let fragment_source = wrap_fragment_source(get_shader_version(gl), tile_source);
        let program = unsafe { link_program(gl, VERTEX_SHADER_SOURCE, &fragment_source)? };
        let vertex_array = unsafe {
            gl.create_vertex_array()
                .map_err(|log| TesseraError::ShaderLink { log })?
        };
        check_gl_error!(gl, "tile_program.compile");
        Ok(Self {
            program,
            vertex_array,
        })
    }

    unsafe fn draw_into(
        &self,
        gl: &glow::Context,
        viewport: (i32, i32, i32, i32),
        time: f32,
        src: Rect,
    ) {
        let (x, y, width, height) = viewport;
        gl.viewport(x, y, width, height);
        gl.use_program(Some(self.program));
        gl.uniform_1_f32(gl.get_uniform_location(self.program, "u_time").as_ref(), time);
        gl.uniform_4_f32(
            gl.get_uniform_location(self.program, "u_window").as_ref(),
            src.x0,
            src.y0,
            src.x1,
            src.y1,
        );
        gl.uniform_4_f32(
            gl.get_uniform_location(self.program, "u_dest").as_ref(),
            x as f32,
            y as f32,
            width as f32,
            height as f32,
        );
        gl.bind_vertex_array(Some(self.vertex_array));
        gl.draw_arrays(glow::TRIANGLES, 0, 6);
    }
}

impl Tile<glow::Context> for TileProgram {
    fn draw(
        &mut self,
        gl: &glow::Context,
        bounds: PixelBounds,
        time: f32,
        dst: Rect,
        src: Rect,
    ) {
        // dst has y pointing down, the GL viewport origin is bottom-left
        let x = bounds.x + (dst.x0 * bounds.width as f32) as i32;
        let y = bounds.y + ((1.0 - dst.y1) * bounds.height as f32) as i32;
        let width = (dst.width() * bounds.width as f32) as i32;
        let height = (dst.height() * bounds.height as f32) as i32;
        unsafe {
            self.draw_into(gl, (x, y, width, height), time, src);
        }
        check_gl_error!(gl, "tile_program.draw");
    }

    fn thumbnail(&mut self, gl: &glow::Context, size: u32) -> Option<Thumbnail> {
        let side = size as i32;
        unsafe {
            let framebuffer = gl.create_framebuffer().ok()?;
            let texture = gl.create_texture().ok()?;
            gl.bind_framebuffer(glow::FRAMEBUFFER, Some(framebuffer));
            gl.bind_texture(glow::TEXTURE_2D, Some(texture));
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGBA as i32,
                side,
                side,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                None,
            );
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, glow::LINEAR as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, glow::LINEAR as i32);
            gl.framebuffer_texture(glow::FRAMEBUFFER, glow::COLOR_ATTACHMENT0, Some(texture), 0);
            if gl.check_framebuffer_status(glow::FRAMEBUFFER) != glow::FRAMEBUFFER_COMPLETE {
                log::error!("thumbnail framebuffer is not complete");
                gl.bind_framebuffer(glow::FRAMEBUFFER, None);
                gl.delete_texture(texture);
                gl.delete_framebuffer(framebuffer);
                return None;
            }
            gl.disable(glow::SCISSOR_TEST);
            gl.clear_color(0.0, 0.0, 0.0, 1.0);
            gl.clear(glow::COLOR_BUFFER_BIT);

            self.draw_into(gl, (0, 0, side, side), 0.0, THUMBNAIL_WINDOW);

            let mut rgba = vec![0_u8; (size * size * 4) as usize];
            gl.read_pixels(
                0,
                0,
                side,
                side,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                glow::PixelPackData::Slice(&mut rgba),
            );
            gl.bind_framebuffer(glow::FRAMEBUFFER, None);
            gl.delete_texture(texture);
            gl.delete_framebuffer(framebuffer);
            check_gl_error!(gl, "tile_program.thumbnail");

            // GL reads bottom-up, image rows go top-down
            let stride = (size * 4) as usize;
            let mut flipped = Vec::with_capacity(rgba.len());
            for row in rgba.chunks_exact(stride).rev() {
                flipped.extend_from_slice(row);
            }
            Some(Thumbnail {
                width: size,
                height: size,
                rgba: flipped,
            })
        }
    }

    fn dispose(&mut self, gl: &glow::Context) {
        unsafe {
            gl.delete_program(self.program);
            gl.delete_vertex_array(self.vertex_array);
        }
        check_gl_error!(gl, "tile_program.dispose");
    }
}

/// The shader compiler collaborator over a real GL context.
#[derive(Default)]
pub struct GlCompiler;

impl Compile<glow::Context> for GlCompiler {
    fn compile(
        &mut self,
        gl: &glow::Context,
        source: &str,
    ) -> EngineResult<Box<dyn Tile<glow::Context>>> {
        Ok(Box::new(TileProgram::compile(gl, source)?))
    }
}

/// Wraps the generated `tile_color` function into a complete fragment
/// shader sampling the parameter-space window.
fn wrap_fragment_source(version: &str, tile_source: &str) -> String {
    format!(
        r"{version}
precision highp float;

uniform float u_time;
uniform vec4 u_window; // x0, y0, x1, y1 in parameter space
uniform vec4 u_dest;   // destination viewport in pixels

out vec4 color;

{tile_source}
void main() {{
    vec2 uv = (gl_FragCoord.xy - u_dest.xy) / u_dest.zw;
    vec2 p = mix(u_window.xy, u_window.zw, vec2(uv.x, 1.0 - uv.y));
    color = vec4(clamp(0.5 + 0.5 * tile_color(p, u_time), 0.0, 1.0), 1.0);
}}
"
    )
}

unsafe fn link_program(
    gl: &glow::Context,
    vertex_source: &str,
    fragment_source: &str,
) -> EngineResult<glow::Program> {
    let program = gl
        .create_program()
        .map_err(|log| TesseraError::ShaderLink { log })?;
    let shader_sources = [
        (glow::VERTEX_SHADER, vertex_source),
        (glow::FRAGMENT_SHADER, fragment_source),
    ];
    let mut shaders = Vec::with_capacity(shader_sources.len());
    for (shader_type, shader_source) in shader_sources {
        let shader = gl
            .create_shader(shader_type)
            .map_err(|log| TesseraError::ShaderCompile { log })?;
        let source = if shader_source.starts_with("#version") {
            shader_source.to_string()
        } else {
            format!("{}\n{}", get_shader_version(gl), shader_source)
        };
        gl.shader_source(shader, &source);
        gl.compile_shader(shader);
        if !gl.get_shader_compile_status(shader) {
            let log = gl.get_shader_info_log(shader);
            gl.delete_shader(shader);
            for shader in shaders {
                gl.delete_shader(shader);
            }
            gl.delete_program(program);
            return Err(TesseraError::ShaderCompile { log }.into());
        }
        gl.attach_shader(program, shader);
        shaders.push(shader);
    }

    gl.link_program(program);
    let linked = gl.get_program_link_status(program);
    let link_log = gl.get_program_info_log(program);
    for shader in shaders {
        gl.detach_shader(program, shader);
        gl.delete_shader(shader);
    }
    if !linked {
        gl.delete_program(program);
        return Err(TesseraError::ShaderLink { log: link_log }.into());
    }
    Ok(program)
}

#[cfg(test)]
mod tests {
    use super::wrap_fragment_source;

    #[test]
    fn wrapped_source_declares_the_uniform_contract() {
        let source = wrap_fragment_source("#version 330", "vec3 tile_color(vec2 p, float t) { return vec3(p, t); }\n");
        assert!(source.starts_with("#version 330"));
        assert!(source.contains("uniform float u_time;"));
        assert!(source.contains("uniform vec4 u_window;"));
        assert!(source.contains("uniform vec4 u_dest;"));
        assert!(source.contains("tile_color(p, u_time)"));
    }
}
