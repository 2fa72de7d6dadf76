use log::info;
use wasm_bindgen::JsCast;
use web_sys::{
	HtmlCanvasElement, WebGlBuffer, WebGlContextAttributes, WebGlPowerPreference, WebGlProgram,
	WebGlRenderingContext as Gl, WebGlShader,
};

use super::geometry::{ColorBuffer, FrameGeometry, PointBuffer};

const POINT_VS: &str = r#"
attribute vec2 aPos;
attribute float aSize;
attribute vec4 aColor;
varying vec4 vColor;
void main() {
	gl_Position = vec4(aPos, 0.0, 1.0);
	gl_PointSize = aSize;
	vColor = aColor;
}"#;

// Soft glow: faint outer haze, brighter inner halo, near-white core.
const POINT_FS: &str = r#"
precision highp float;
varying vec4 vColor;
void main() {
	vec2 uv = gl_PointCoord - vec2(0.5);
	float d = length(uv);
	if (d > 0.5) discard;
	float haze = smoothstep(0.5, 0.2, d);
	float glow = smoothstep(0.28, 0.04, d);
	float core = smoothstep(0.1, 0.0, d);
	vec3 col = vColor.rgb * 0.12 * haze
		+ vColor.rgb * 0.55 * glow
		+ (vColor.rgb + vec3(0.35)) * core;
	gl_FragColor = vec4(col, haze * vColor.a);
}"#;

const FLAT_VS: &str = r#"
attribute vec2 aPos;
attribute vec4 aColor;
varying vec4 vColor;
void main() {
	gl_Position = vec4(aPos, 0.0, 1.0);
	vColor = aColor;
}"#;

const FLAT_FS: &str = r#"
precision highp float;
varying vec4 vColor;
void main() {
	gl_FragColor = vColor;
}"#;

/// WebGL setup failures.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
	/// The canvas has no WebGL 1 context.
	#[error("WebGL is not available on this canvas")]
	NoContext,
	/// A GL object could not be allocated.
	#[error("failed to create {0}")]
	Create(&'static str),
	/// Shader info log.
	#[error("shader compile failed: {0}")]
	Compile(String),
	/// Program info log.
	#[error("program link failed: {0}")]
	Link(String),
}

/// Attribute location; `None` when the linker optimized it out.
type Attrib = Option<u32>;

struct PointProgram {
	program: WebGlProgram,
	pos: Attrib,
	size: Attrib,
	color: Attrib,
}

struct FlatProgram {
	program: WebGlProgram,
	pos: Attrib,
	color: Attrib,
}

/// WebGL backend for [`FrameGeometry`]. Uploads the flat buffers every frame
/// and draws with additive blending over a transparent clear.
pub struct MeshRenderer {
	gl: Gl,
	points: PointProgram,
	flat: FlatProgram,
	pos_buf: WebGlBuffer,
	size_buf: WebGlBuffer,
	color_buf: WebGlBuffer,
}

impl MeshRenderer {
	/// Opens a WebGL context on `canvas` and builds both shader programs.
	pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, RenderError> {
		let attrs = WebGlContextAttributes::new();
		attrs.set_alpha(true);
		attrs.set_antialias(true);
		attrs.set_premultiplied_alpha(false);
		attrs.set_power_preference(WebGlPowerPreference::HighPerformance);
		let gl: Gl = canvas
			.get_context_with_context_options("webgl", &attrs)
			.ok()
			.flatten()
			.and_then(|ctx| ctx.dyn_into().ok())
			.ok_or(RenderError::NoContext)?;

		let program = link(&gl, POINT_VS, POINT_FS)?;
		let points = PointProgram {
			pos: attrib(&gl, &program, "aPos"),
			size: attrib(&gl, &program, "aSize"),
			color: attrib(&gl, &program, "aColor"),
			program,
		};
		let program = link(&gl, FLAT_VS, FLAT_FS)?;
		let flat = FlatProgram {
			pos: attrib(&gl, &program, "aPos"),
			color: attrib(&gl, &program, "aColor"),
			program,
		};
		let buffer = || gl.create_buffer().ok_or(RenderError::Create("buffer"));
		let (pos_buf, size_buf, color_buf) = (buffer()?, buffer()?, buffer()?);

		info!("WebGL mesh renderer ready");
		Ok(Self {
			gl,
			points,
			flat,
			pos_buf,
			size_buf,
			color_buf,
		})
	}

	/// Sets the GL viewport to the drawing buffer size.
	pub fn resize(&self, width: i32, height: i32) {
		self.gl.viewport(0, 0, width, height);
	}

	/// Clears and draws one frame.
	pub fn render(&self, geometry: &FrameGeometry) {
		let gl = &self.gl;
		gl.clear_color(0.0, 0.0, 0.0, 0.0);
		gl.clear(Gl::COLOR_BUFFER_BIT);
		gl.enable(Gl::BLEND);
		gl.blend_func(Gl::SRC_ALPHA, Gl::ONE);

		self.draw_flat(&geometry.triangles, Gl::TRIANGLES);
		self.draw_flat(&geometry.lines, Gl::LINES);
		self.draw_points(&geometry.nodes);
		self.draw_points(&geometry.packets);
	}

	fn draw_flat(&self, buf: &ColorBuffer, mode: u32) {
		if buf.is_empty() {
			return;
		}
		self.gl.use_program(Some(&self.flat.program));
		self.upload(&self.pos_buf, &buf.positions, self.flat.pos, 2);
		self.upload(&self.color_buf, &buf.colors, self.flat.color, 4);
		self.gl.draw_arrays(mode, 0, buf.vertex_count() as i32);
	}

	fn draw_points(&self, buf: &PointBuffer) {
		if buf.is_empty() {
			return;
		}
		self.gl.use_program(Some(&self.points.program));
		self.upload(&self.pos_buf, &buf.positions, self.points.pos, 2);
		self.upload(&self.size_buf, &buf.sizes, self.points.size, 1);
		self.upload(&self.color_buf, &buf.colors, self.points.color, 4);
		self.gl.draw_arrays(Gl::POINTS, 0, buf.vertex_count() as i32);
	}

	fn upload(&self, buffer: &WebGlBuffer, data: &[f32], location: Attrib, components: i32) {
		let Some(location) = location else {
			return;
		};
		let gl = &self.gl;
		gl.bind_buffer(Gl::ARRAY_BUFFER, Some(buffer));
		let array = js_sys::Float32Array::from(data);
		gl.buffer_data_with_array_buffer_view(Gl::ARRAY_BUFFER, &array, Gl::DYNAMIC_DRAW);
		gl.enable_vertex_attrib_array(location);
		gl.vertex_attrib_pointer_with_i32(location, components, Gl::FLOAT, false, 0, 0);
	}
}

fn attrib(gl: &Gl, program: &WebGlProgram, name: &str) -> Attrib {
	u32::try_from(gl.get_attrib_location(program, name)).ok()
}

fn compile(gl: &Gl, kind: u32, source: &str) -> Result<WebGlShader, RenderError> {
	let shader = gl
		.create_shader(kind)
		.ok_or(RenderError::Create("shader"))?;
	gl.shader_source(&shader, source);
	gl.compile_shader(&shader);
	let ok = gl
		.get_shader_parameter(&shader, Gl::COMPILE_STATUS)
		.as_bool()
		.unwrap_or(false);
	if ok {
		Ok(shader)
	} else {
		Err(RenderError::Compile(
			gl.get_shader_info_log(&shader).unwrap_or_default(),
		))
	}
}

fn link(gl: &Gl, vs: &str, fs: &str) -> Result<WebGlProgram, RenderError> {
	let program = gl
		.create_program()
		.ok_or(RenderError::Create("program"))?;
	gl.attach_shader(&program, &compile(gl, Gl::VERTEX_SHADER, vs)?);
	gl.attach_shader(&program, &compile(gl, Gl::FRAGMENT_SHADER, fs)?);
	gl.link_program(&program);
	let ok = gl
		.get_program_parameter(&program, Gl::LINK_STATUS)
		.as_bool()
		.unwrap_or(false);
	if ok {
		Ok(program)
	} else {
		Err(RenderError::Link(
			gl.get_program_info_log(&program).unwrap_or_default(),
		))
	}
}
