//! Flat per-frame vertex buffers.

use super::types::Rgb;

/// Point sprites: xy position, size in pixels, rgba color per vertex.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointBuffer {
	/// `[x, y]` per vertex.
	pub positions: Vec<f32>,
	/// One size per vertex.
	pub sizes: Vec<f32>,
	/// `[r, g, b, a]` per vertex.
	pub colors: Vec<f32>,
}

impl PointBuffer {
	/// Empties the buffer, keeping its allocation.
	pub fn clear(&mut self) {
		self.positions.clear();
		self.sizes.clear();
		self.colors.clear();
	}

	/// Appends one sprite.
	pub fn push(&mut self, x: f32, y: f32, size: f32, color: Rgb, alpha: f32) {
		self.positions.extend_from_slice(&[x, y]);
		self.sizes.push(size);
		self.colors.extend_from_slice(&[color.r, color.g, color.b, alpha]);
	}

	/// Number of sprites.
	pub fn vertex_count(&self) -> usize {
		self.sizes.len()
	}

	/// No sprites.
	pub fn is_empty(&self) -> bool {
		self.sizes.is_empty()
	}
}

/// Flat-colored primitives (lines or triangles): xy position and rgba per vertex.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColorBuffer {
	/// `[x, y]` per vertex.
	pub positions: Vec<f32>,
	/// `[r, g, b, a]` per vertex.
	pub colors: Vec<f32>,
}

impl ColorBuffer {
	/// Empties the buffer, keeping its allocation.
	pub fn clear(&mut self) {
		self.positions.clear();
		self.colors.clear();
	}

	/// Appends one vertex.
	pub fn push(&mut self, x: f32, y: f32, color: Rgb, alpha: f32) {
		self.positions.extend_from_slice(&[x, y]);
		self.colors.extend_from_slice(&[color.r, color.g, color.b, alpha]);
	}

	/// Number of vertices.
	pub fn vertex_count(&self) -> usize {
		self.positions.len() / 2
	}

	/// No vertices.
	pub fn is_empty(&self) -> bool {
		self.positions.is_empty()
	}
}

/// Everything the renderer draws for one frame, in draw order:
/// triangles, lines, nodes, packets.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameGeometry {
	/// Three vertices per triangle.
	pub triangles: ColorBuffer,
	/// Two vertices per edge.
	pub lines: ColorBuffer,
	/// One sprite per node.
	pub nodes: PointBuffer,
	/// One sprite per live packet.
	pub packets: PointBuffer,
}

impl FrameGeometry {
	/// Empties every buffer, keeping allocations.
	pub fn clear(&mut self) {
		self.triangles.clear();
		self.lines.clear();
		self.nodes.clear();
		self.packets.clear();
	}
}
