//! Per-frame orchestration of the mesh pipeline.

use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::config::{ConfigError, MeshConfig};
use super::edges::build_edges;
use super::field::NodeField;
use super::geometry::FrameGeometry;
use super::packets::PacketPool;
use super::triangles::TriangleFinder;
use super::types::{Edge, Pointer, Rgb, Triangle, Viewport};

/// Simulation state for one mesh instance, advanced once per frame.
pub struct MeshState {
	config: MeshConfig,
	field: NodeField,
	edges: Vec<Edge>,
	triangles: Vec<Triangle>,
	finder: TriangleFinder,
	packets: PacketPool,
	rng: SmallRng,
	time: f64,
	spawn_timer: f64,
	last_timestamp: Option<f64>,
	geometry: FrameGeometry,
}

impl MeshState {
	/// Validates `config` and scatters the nodes from `seed`.
	pub fn new(config: MeshConfig, seed: u64) -> Result<Self, ConfigError> {
		config.validate()?;
		let mut rng = SmallRng::seed_from_u64(seed);
		let field = NodeField::initialize(&config, &mut rng);
		Ok(Self::with_field(config, field, rng))
	}

	/// Uses an existing field instead of a random one.
	pub fn with_nodes(config: MeshConfig, field: NodeField, seed: u64) -> Result<Self, ConfigError> {
		config.validate()?;
		Ok(Self::with_field(config, field, SmallRng::seed_from_u64(seed)))
	}

	fn with_field(config: MeshConfig, field: NodeField, rng: SmallRng) -> Self {
		let packets = PacketPool::new(
			config.packet_capacity,
			config.spawn_strength_threshold,
			config.packet_speed.clone(),
			config.packet_motion,
		);
		Self {
			config,
			field,
			edges: Vec::new(),
			triangles: Vec::new(),
			finder: TriangleFinder::new(),
			packets,
			rng,
			time: 0.0,
			spawn_timer: 0.0,
			last_timestamp: None,
			geometry: FrameGeometry::default(),
		}
	}

	/// Configuration the mesh was built with.
	pub fn config(&self) -> &MeshConfig {
		&self.config
	}

	/// Nodes as of the last tick.
	pub fn field(&self) -> &NodeField {
		&self.field
	}

	/// Edges built on the last tick.
	pub fn edges(&self) -> &[Edge] {
		&self.edges
	}

	/// Triangles found on the last tick.
	pub fn triangles(&self) -> &[Triangle] {
		&self.triangles
	}

	/// Live packets.
	pub fn packets(&self) -> &PacketPool {
		&self.packets
	}

	/// Accumulated simulation time in seconds.
	pub fn time(&self) -> f64 {
		self.time
	}

	/// Advances one frame and returns its draw lists.
	///
	/// `now` is a monotonic timestamp in seconds. The step is clamped to
	/// `max_dt` so a stalled tab does not jump on resume; the first call and
	/// any backwards timestamp step by zero.
	pub fn tick(&mut self, now: f64, pointer: Pointer, viewport: Viewport) -> &FrameGeometry {
		let dt = match self.last_timestamp {
			Some(last) => (now - last).clamp(0.0, self.config.max_dt),
			None => 0.0,
		};
		self.last_timestamp = Some(now);
		self.time += dt;
		self.spawn_timer += dt;

		self.field.advance(pointer);
		build_edges(
			self.field.nodes(),
			viewport.aspect,
			self.config.connect_distance,
			&mut self.edges,
		);
		self.finder
			.find(&self.edges, self.field.len(), &mut self.triangles);

		if self.spawn_timer > self.config.spawn_interval && !self.edges.is_empty() {
			self.spawn_timer = 0.0;
			self.packets
				.try_spawn(&self.edges, self.field.nodes(), &mut self.rng);
		}
		self.packets.advance(dt as f32);

		self.assemble(viewport.scale);
		&self.geometry
	}

	fn assemble(&mut self, scale: f32) {
		let nodes = self.field.nodes();
		let geometry = &mut self.geometry;
		geometry.clear();

		let fill = self.config.triangle_alpha;
		for tri in &self.triangles {
			let (a, b, c) = (&nodes[tri.a], &nodes[tri.b], &nodes[tri.c]);
			let color = Rgb::average(&[a.color, b.color, c.color]);
			for n in [a, b, c] {
				geometry.triangles.push(n.x, n.y, color, fill);
			}
		}

		for edge in &self.edges {
			let (a, b) = (&nodes[edge.a], &nodes[edge.b]);
			let color = Rgb::average(&[a.color, b.color]);
			let alpha = edge.strength * self.config.edge_alpha;
			geometry.lines.push(a.x, a.y, color, alpha);
			geometry.lines.push(b.x, b.y, color, alpha);
		}

		for n in nodes {
			let pulse = n.pulse(self.time);
			geometry
				.nodes
				.push(n.x, n.y, n.size * pulse * scale, n.color, n.alpha * pulse);
		}

		let size = self.config.packet_size * scale;
		for sprite in self.packets.sprites(nodes) {
			geometry.packets.push(
				sprite.x,
				sprite.y,
				size,
				sprite.color,
				sprite.fade * self.config.packet_alpha,
			);
		}
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::components::network_mesh::config::{Physics, Profile};
	use crate::components::network_mesh::field::tests::node_at;
	use crate::components::network_mesh::types::Tier;

	fn still_field(points: &[(f32, f32, Tier)]) -> NodeField {
		let physics = Physics {
			centering_strength: 0.0,
			..Physics::default()
		};
		NodeField::from_nodes(
			points.iter().map(|&(x, y, t)| node_at(x, y, t)).collect(),
			physics,
		)
	}

	#[test]
	fn rejects_invalid_config() {
		let mut config = MeshConfig::default();
		config.node_count = 0;
		assert!(matches!(MeshState::new(config, 1), Err(ConfigError::NoNodes)));
	}

	#[test]
	fn configs_that_would_panic_mid_tick_are_refused() {
		let mut config = MeshConfig::default();
		config.max_dt = -1.0;
		assert!(matches!(MeshState::new(config, 1), Err(ConfigError::MaxDt(_))));

		let mut config = MeshConfig::default();
		config.packet_speed = 0.003..f32::INFINITY;
		config.connect_distance = 0.8;
		assert!(matches!(MeshState::new(config, 1), Err(ConfigError::PacketSpeed(_))));

		let mut config = MeshConfig::default();
		config.pulse_speed = 0.15..f32::INFINITY;
		assert!(matches!(MeshState::new(config, 1), Err(ConfigError::PulseSpeed(_))));
	}

	#[test]
	fn first_tick_has_zero_dt_and_large_gaps_are_clamped() {
		let mut state = MeshState::new(MeshConfig::default(), 5).unwrap();
		state.tick(10.0, Pointer::ABSENT, Viewport::default());
		assert_eq!(state.time(), 0.0);
		state.tick(10.02, Pointer::ABSENT, Viewport::default());
		assert!((state.time() - 0.02).abs() < 1e-9);
		state.tick(60.0, Pointer::ABSENT, Viewport::default());
		assert!((state.time() - 0.07).abs() < 1e-9);
		state.tick(59.0, Pointer::ABSENT, Viewport::default());
		assert!((state.time() - 0.07).abs() < 1e-9);
	}

	#[test]
	fn triangle_is_drawn_from_three_close_nodes() {
		let field = still_field(&[
			(0.9, 0.9, Tier::Leaf),
			(0.0, 0.0, Tier::Hub),
			(0.05, 0.0, Tier::Relay),
			(-0.9, -0.9, Tier::Leaf),
			(0.9, -0.9, Tier::Leaf),
			(0.0, 0.05, Tier::Relay),
		]);
		let mut state = MeshState::with_nodes(MeshConfig::default(), field, 3).unwrap();
		let geometry = state.tick(0.0, Pointer::ABSENT, Viewport::default()).clone();
		assert_eq!(state.triangles(), &[Triangle { a: 1, b: 2, c: 5 }]);
		assert_eq!(state.edges().len(), 3);
		assert_eq!(geometry.triangles.vertex_count(), 3);
		assert_eq!(geometry.lines.vertex_count(), 6);
		assert_eq!(geometry.nodes.vertex_count(), 6);
		assert!(geometry.triangles.colors.chunks(4).all(|c| c[3] == 0.018));
	}

	#[test]
	fn edge_alpha_scales_with_strength() {
		let field = still_field(&[(0.0, 0.0, Tier::Hub), (0.1, 0.0, Tier::Hub)]);
		let mut state = MeshState::with_nodes(MeshConfig::default(), field, 3).unwrap();
		let geometry = state.tick(0.0, Pointer::ABSENT, Viewport::default());
		let alpha = geometry.lines.colors[3];
		assert!((alpha - (1.0 - 0.1 / 0.22) * 0.06).abs() < 1e-5);
	}

	#[test]
	fn node_sprites_pulse_within_range() {
		let config = MeshConfig::for_profile(Profile::Compact);
		let mut state = MeshState::new(config.clone(), 11).unwrap();
		let viewport = Viewport {
			aspect: 1.5,
			scale: 2.0,
		};
		let mut now = 0.0;
		for _ in 0..50 {
			let geometry = state.tick(now, Pointer::ABSENT, viewport).clone();
			for (n, (&size, rgba)) in state
				.field()
				.nodes()
				.iter()
				.zip(geometry.nodes.sizes.iter().zip(geometry.nodes.colors.chunks(4)))
			{
				let base = n.size * viewport.scale;
				assert!(size >= base * 0.8 - 1e-4 && size <= base + 1e-4);
				assert!(rgba[3] >= n.alpha * 0.8 - 1e-4 && rgba[3] <= n.alpha + 1e-4);
			}
			now += 0.016;
		}
		assert_eq!(state.field().len(), config.node_count);
	}

	#[test]
	fn packets_spawn_over_time_and_respect_capacity() {
		let mut config = MeshConfig::default();
		config.packet_capacity = 3;
		config.connect_distance = 0.6;
		let mut state = MeshState::new(config, 21).unwrap();
		let mut now = 0.0;
		let mut seen = 0;
		for _ in 0..2000 {
			state.tick(now, Pointer::ABSENT, Viewport::default());
			assert!(state.packets().len() <= 3);
			seen = seen.max(state.packets().len());
			now += 0.05;
		}
		assert!(seen > 0);
	}

	#[test]
	fn unreachable_threshold_gives_empty_graph() {
		let mut config = MeshConfig::default();
		config.connect_distance = 1e-9;
		let mut state = MeshState::new(config, 2).unwrap();
		let geometry = state.tick(0.0, Pointer::ABSENT, Viewport::default());
		assert!(geometry.lines.is_empty());
		assert!(geometry.triangles.is_empty());
		assert!(geometry.packets.is_empty());
		assert_eq!(geometry.nodes.vertex_count(), 90);
	}
}
