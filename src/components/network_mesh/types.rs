//! Shared mesh data types.

/// Index into the node field. Stable for the lifetime of a mesh.
pub type NodeIdx = usize;

/// Linear RGB color, components in `[0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rgb {
	/// Red.
	pub r: f32,
	/// Green.
	pub g: f32,
	/// Blue.
	pub b: f32,
}

impl Rgb {
	/// Color from components.
	pub const fn new(r: f32, g: f32, b: f32) -> Self {
		Self { r, g, b }
	}

	/// Component-wise mean.
	pub fn average(colors: &[Rgb]) -> Rgb {
		if colors.is_empty() {
			return Rgb::default();
		}
		let n = colors.len() as f32;
		let (r, g, b) = colors
			.iter()
			.fold((0.0, 0.0, 0.0), |(r, g, b), c| (r + c.r, g + c.g, b + c.b));
		Rgb::new(r / n, g / n, b / n)
	}
}

/// Visual prominence class. Leaves never connect to other leaves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tier {
	/// Largest and brightest.
	Hub = 0,
	/// Mid-size.
	Relay = 1,
	/// Smallest and dimmest.
	Leaf = 2,
}

impl Tier {
	/// Position in per-tier tables.
	pub fn index(self) -> usize {
		self as usize
	}
}

/// One simulated particle.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	/// Position, within `[-1, 1]`.
	pub x: f32,
	/// Position, within `[-1, 1]`.
	pub y: f32,
	/// Displacement per tick.
	pub vx: f32,
	/// Displacement per tick.
	pub vy: f32,
	/// Fixed at creation.
	pub tier: Tier,
	/// Base sprite size before pulse and viewport scale.
	pub size: f32,
	/// Base opacity before pulse.
	pub alpha: f32,
	/// Palette color.
	pub color: Rgb,
	/// Pulse phase offset in radians.
	pub phase: f32,
	/// Pulse angular rate.
	pub pulse_speed: f32,
}

impl Node {
	/// Brightness/size multiplier in `[0.8, 1.0]` at simulation time `t`.
	pub fn pulse(&self, t: f64) -> f32 {
		((t * self.pulse_speed as f64 + self.phase as f64).sin() * 0.1 + 0.9) as f32
	}

	/// Velocity magnitude.
	pub fn speed(&self) -> f32 {
		self.vx.hypot(self.vy)
	}
}

/// Proximity relation between two nodes, `a < b`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
	/// Lower endpoint index.
	pub a: NodeIdx,
	/// Higher endpoint index.
	pub b: NodeIdx,
	/// `1` at zero distance, falling linearly to `0` at the connect distance.
	pub strength: f32,
}

/// Closed triangle, `a < b < c`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Triangle {
	/// Smallest index.
	pub a: NodeIdx,
	/// Middle index.
	pub b: NodeIdx,
	/// Largest index.
	pub c: NodeIdx,
}

impl Triangle {
	/// Canonical (sorted) triangle over three distinct indices.
	pub fn sorted(a: NodeIdx, b: NodeIdx, c: NodeIdx) -> Self {
		let mut v = [a, b, c];
		v.sort_unstable();
		Self {
			a: v[0],
			b: v[1],
			c: v[2],
		}
	}
}

/// Dot travelling from one node to another. Endpoints are looked up
/// each frame so the packet follows moving nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct Packet {
	/// Source node.
	pub from: NodeIdx,
	/// Destination node.
	pub to: NodeIdx,
	/// Fraction of the traversal done, `[0, 1)` while live.
	pub progress: f32,
	/// Progress per step.
	pub speed: f32,
	/// Source color at spawn.
	pub color: Rgb,
}

/// Pointer snapshot in normalized coordinates, read once per tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pointer {
	/// Normalized x.
	pub x: f32,
	/// Normalized y, up positive.
	pub y: f32,
}

impl Pointer {
	/// Far outside the simulation bounds so no node is ever repelled.
	pub const ABSENT: Pointer = Pointer { x: 999.0, y: 999.0 };

	/// Maps CSS client coordinates to the normalized plane (y up).
	pub fn from_client(x: f64, y: f64, width: f64, height: f64) -> Self {
		if width <= 0.0 || height <= 0.0 {
			return Self::ABSENT;
		}
		Self {
			x: ((x / width) * 2.0 - 1.0) as f32,
			y: (-((y / height) * 2.0 - 1.0)) as f32,
		}
	}
}

impl Default for Pointer {
	fn default() -> Self {
		Self::ABSENT
	}
}

/// Per-frame viewport inputs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
	/// Width over height; scales the x axis for isotropic connection radius.
	pub aspect: f32,
	/// Sprite size multiplier derived from resolution.
	pub scale: f32,
}

impl Viewport {
	/// From the drawing buffer size in device pixels.
	pub fn from_size(width: f64, height: f64, reference_width: f32) -> Self {
		let aspect = if height > 0.0 { width / height } else { 1.0 };
		Self {
			aspect: aspect as f32,
			scale: width as f32 / reference_width,
		}
	}
}

impl Default for Viewport {
	fn default() -> Self {
		Self {
			aspect: 1.0,
			scale: 1.0,
		}
	}
}
