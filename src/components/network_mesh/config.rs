//! Display profiles, constants and startup validation.

use std::ops::Range;

use super::types::Rgb;

/// Viewports narrower than this (CSS px) use [`Profile::Compact`].
pub const COMPACT_BREAKPOINT: f64 = 768.0;

/// Brand palette nodes draw their color from.
pub const PALETTE: [Rgb; 5] = [
	Rgb::new(0.243, 0.812, 0.557), // green
	Rgb::new(0.957, 0.447, 0.714), // pink
	Rgb::new(0.984, 0.573, 0.235), // orange
	Rgb::new(0.133, 0.827, 0.933), // cyan
	Rgb::new(0.655, 0.545, 0.988), // purple
];

/// Display profile selecting node count and sprite sizes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Profile {
	/// Full-size desktop layout.
	Desktop,
	/// Reduced node count and smaller sprites for narrow screens.
	Compact,
}

impl Profile {
	/// Picks a profile from the viewport width in CSS pixels.
	pub fn for_viewport_width(width: f64) -> Self {
		if width < COMPACT_BREAKPOINT {
			Self::Compact
		} else {
			Self::Desktop
		}
	}
}

/// How packet progress advances each tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PacketMotion {
	/// One `speed` increment per tick regardless of `dt`.
	PerTick,
	/// `speed * dt / reference_dt` per tick.
	TimeScaled {
		/// Frame duration at which one tick advances by exactly `speed`.
		reference_dt: f32,
	},
}

/// Per-tier rendering class.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TierStyle {
	/// Base sprite size in pixels at reference width.
	pub size: f32,
	/// Base opacity before pulsing.
	pub alpha: f32,
}

/// Node physics constants.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Physics {
	/// Pointer distance inside which nodes are pushed away.
	pub repulsion_radius: f32,
	/// Below this distance the pointer has no effect.
	pub repulsion_epsilon: f32,
	/// `k` in `k / distance²`.
	pub repulsion_strength: f32,
	/// Pull toward the origin per unit of displacement.
	pub centering_strength: f32,
	/// Maximum velocity magnitude per tick.
	pub speed_cap: f32,
	/// `|x|` or `|y|` beyond which a node bounces.
	pub bounce_threshold: f32,
	/// Velocity multiplier on bounce.
	pub bounce_damping: f32,
}

impl Default for Physics {
	fn default() -> Self {
		Self {
			repulsion_radius: 0.3,
			repulsion_epsilon: 0.001,
			repulsion_strength: 0.000025,
			centering_strength: 0.000012,
			speed_cap: 0.0006,
			bounce_threshold: 0.98,
			bounce_damping: -0.8,
		}
	}
}

/// Everything fixed at initialization.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshConfig {
	/// Profile these values were derived from.
	pub profile: Profile,
	/// Number of nodes, fixed for the mesh lifetime.
	pub node_count: usize,
	/// Aspect-corrected distance under which two nodes link.
	pub connect_distance: f32,
	/// Maximum live packets.
	pub packet_capacity: usize,
	/// Colors nodes draw from.
	pub palette: Vec<Rgb>,
	/// Indices below `tier_thresholds[0]` are hubs, below `[1]` mid-tier, the rest leaves.
	pub tier_thresholds: [usize; 2],
	/// Size and opacity per tier.
	pub tiers: [TierStyle; 3],
	/// Initial positions fall in `[-spawn_extent, spawn_extent]²`.
	pub spawn_extent: f32,
	/// Initial velocity components fall in `[-initial_speed, initial_speed]`.
	pub initial_speed: f32,
	/// Angular rate of the per-node pulse.
	pub pulse_speed: Range<f32>,
	/// Node physics constants.
	pub physics: Physics,
	/// Seconds between packet spawn attempts.
	pub spawn_interval: f64,
	/// Edges at or below this strength never carry packets.
	pub spawn_strength_threshold: f32,
	/// Progress per step of a new packet.
	pub packet_speed: Range<f32>,
	/// Whether packet progress scales with `dt`.
	pub packet_motion: PacketMotion,
	/// Packet sprite size in pixels at reference width.
	pub packet_size: f32,
	/// Packet opacity at mid-traversal.
	pub packet_alpha: f32,
	/// Line opacity of a full-strength edge.
	pub edge_alpha: f32,
	/// Fill opacity of triangles.
	pub triangle_alpha: f32,
	/// Longest simulated step in seconds.
	pub max_dt: f64,
	/// Drawing buffer width (device px) at which sprites have their base size.
	pub size_reference_width: f32,
}

impl MeshConfig {
	/// Constants for the given display profile.
	pub fn for_profile(profile: Profile) -> Self {
		let compact = profile == Profile::Compact;
		let size = |desktop: f32, small: f32| if compact { small } else { desktop };
		Self {
			profile,
			node_count: if compact { 45 } else { 90 },
			connect_distance: size(0.22, 0.24),
			packet_capacity: if compact { 10 } else { 24 },
			palette: PALETTE.to_vec(),
			tier_thresholds: [6, 22],
			tiers: [
				TierStyle {
					size: size(12.0, 7.0),
					alpha: 0.75,
				},
				TierStyle {
					size: size(6.0, 3.5),
					alpha: 0.45,
				},
				TierStyle {
					size: size(2.5, 1.5),
					alpha: 0.12,
				},
			],
			spawn_extent: 0.93,
			initial_speed: 0.000175,
			pulse_speed: 0.15..0.40,
			physics: Physics::default(),
			spawn_interval: 0.3,
			spawn_strength_threshold: 0.15,
			packet_speed: 0.003..0.010,
			packet_motion: PacketMotion::PerTick,
			packet_size: size(5.5, 4.0),
			packet_alpha: 0.65,
			edge_alpha: 0.06,
			triangle_alpha: 0.018,
			max_dt: 0.05,
			size_reference_width: 900.0,
		}
	}

	/// Rejects setups that could not produce a sane frame.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.node_count == 0 {
			return Err(ConfigError::NoNodes);
		}
		if !(self.connect_distance.is_finite() && self.connect_distance > 0.0) {
			return Err(ConfigError::ConnectDistance(self.connect_distance));
		}
		if self.packet_capacity == 0 {
			return Err(ConfigError::NoPacketCapacity);
		}
		if self.palette.is_empty() {
			return Err(ConfigError::EmptyPalette);
		}
		if !(self.physics.speed_cap > 0.0) {
			return Err(ConfigError::SpeedCap(self.physics.speed_cap));
		}
		if !(self.spawn_interval > 0.0) {
			return Err(ConfigError::SpawnInterval(self.spawn_interval));
		}
		if !(self.max_dt.is_finite() && self.max_dt > 0.0) {
			return Err(ConfigError::MaxDt(self.max_dt));
		}
		if !sampleable(&self.packet_speed) || !(self.packet_speed.start > 0.0) {
			return Err(ConfigError::PacketSpeed(self.packet_speed.clone()));
		}
		if !sampleable(&self.pulse_speed) {
			return Err(ConfigError::PulseSpeed(self.pulse_speed.clone()));
		}
		if !symmetric_extent(self.spawn_extent) {
			return Err(ConfigError::SpawnExtent(self.spawn_extent));
		}
		if !symmetric_extent(self.initial_speed) {
			return Err(ConfigError::InitialSpeed(self.initial_speed));
		}
		if let PacketMotion::TimeScaled { reference_dt } = self.packet_motion {
			if !(reference_dt > 0.0) {
				return Err(ConfigError::ReferenceDt(reference_dt));
			}
		}
		Ok(())
	}
}

/// Non-empty with finite bounds and span, so uniform sampling cannot fail.
fn sampleable(range: &Range<f32>) -> bool {
	range.start.is_finite()
		&& range.end.is_finite()
		&& range.start < range.end
		&& (range.end - range.start).is_finite()
}

/// Usable as `-v..=v`.
fn symmetric_extent(v: f32) -> bool {
	v.is_finite() && v >= 0.0 && (v * 2.0).is_finite()
}

impl Default for MeshConfig {
	fn default() -> Self {
		Self::for_profile(Profile::Desktop)
	}
}

/// Setup defects caught before the first tick.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
	/// `node_count` is zero.
	#[error("node count must be positive")]
	NoNodes,
	/// `connect_distance` is not positive and finite.
	#[error("connect distance must be positive and finite, got {0}")]
	ConnectDistance(f32),
	/// `packet_capacity` is zero.
	#[error("packet pool capacity must be positive")]
	NoPacketCapacity,
	/// `palette` is empty.
	#[error("palette must contain at least one color")]
	EmptyPalette,
	/// `physics.speed_cap` is not positive.
	#[error("speed cap must be positive, got {0}")]
	SpeedCap(f32),
	/// `spawn_interval` is not positive.
	#[error("spawn interval must be positive, got {0}")]
	SpawnInterval(f64),
	/// `max_dt` is not positive and finite.
	#[error("max dt must be positive and finite, got {0}")]
	MaxDt(f64),
	/// `packet_speed` is empty, non-finite or not positive.
	#[error("packet speed range must be non-empty, finite and positive, got {0:?}")]
	PacketSpeed(Range<f32>),
	/// `pulse_speed` is empty or non-finite.
	#[error("pulse speed range must be non-empty and finite, got {0:?}")]
	PulseSpeed(Range<f32>),
	/// `spawn_extent` is negative or non-finite.
	#[error("spawn extent must be finite and non-negative, got {0}")]
	SpawnExtent(f32),
	/// `initial_speed` is negative or non-finite.
	#[error("initial speed must be finite and non-negative, got {0}")]
	InitialSpeed(f32),
	/// Time-scaled packet motion with a non-positive reference step.
	#[error("packet reference dt must be positive, got {0}")]
	ReferenceDt(f32),
}
