//! Node particles and their per-tick motion.

use std::f32::consts::TAU;

use log::debug;
use rand::Rng;

use super::config::{MeshConfig, Physics};
use super::types::{Node, Pointer, Tier};

/// Owns every node for the lifetime of the mesh. Nodes are never added or
/// removed, so indices into [`NodeField::nodes`] stay valid.
#[derive(Clone, Debug)]
pub struct NodeField {
	nodes: Vec<Node>,
	physics: Physics,
}

impl NodeField {
	/// Scatters `config.node_count` nodes with random position, drift,
	/// color and pulse. Tiers follow fixed index thresholds.
	pub fn initialize<R: Rng + ?Sized>(config: &MeshConfig, rng: &mut R) -> Self {
		let extent = config.spawn_extent;
		let drift = config.initial_speed;
		let nodes = (0..config.node_count)
			.map(|i| {
				let tier = tier_for_index(i, config.tier_thresholds);
				let style = config.tiers[tier.index()];
				let color = config.palette[rng.random_range(0..config.palette.len())];
				Node {
					x: rng.random_range(-extent..=extent),
					y: rng.random_range(-extent..=extent),
					vx: rng.random_range(-drift..=drift),
					vy: rng.random_range(-drift..=drift),
					tier,
					size: style.size,
					alpha: style.alpha,
					color,
					phase: rng.random_range(0.0..TAU),
					pulse_speed: rng.random_range(config.pulse_speed.clone()),
				}
			})
			.collect::<Vec<_>>();
		debug!(
			"node field initialized: {} nodes ({:?} profile)",
			nodes.len(),
			config.profile
		);
		Self {
			nodes,
			physics: config.physics,
		}
	}

	/// Wraps prepared nodes as-is.
	pub fn from_nodes(nodes: Vec<Node>, physics: Physics) -> Self {
		Self { nodes, physics }
	}

	/// All nodes, indexed by [`NodeIdx`](super::types::NodeIdx).
	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	/// Node count.
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	/// No nodes.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// One integration step. Velocities are per-tick displacements, so
	/// `dt` does not scale the step.
	pub fn advance(&mut self, pointer: Pointer) {
		let p = &self.physics;
		for node in &mut self.nodes {
			node.x += node.vx;
			node.y += node.vy;

			let (dx, dy) = (node.x - pointer.x, node.y - pointer.y);
			let dist = dx.hypot(dy);
			if dist < p.repulsion_radius && dist > p.repulsion_epsilon {
				let force = p.repulsion_strength / (dist * dist);
				node.vx += dx / dist * force;
				node.vy += dy / dist * force;
			}

			node.vx -= node.x * p.centering_strength;
			node.vy -= node.y * p.centering_strength;

			let speed = node.speed();
			if speed > p.speed_cap {
				node.vx = node.vx / speed * p.speed_cap;
				node.vy = node.vy / speed * p.speed_cap;
			}

			if node.x.abs() > p.bounce_threshold {
				node.vx *= p.bounce_damping;
			}
			if node.y.abs() > p.bounce_threshold {
				node.vy *= p.bounce_damping;
			}
			node.x = node.x.clamp(-1.0, 1.0);
			node.y = node.y.clamp(-1.0, 1.0);
		}
	}
}

fn tier_for_index(i: usize, [hub, relay]: [usize; 2]) -> Tier {
	if i < hub {
		Tier::Hub
	} else if i < relay {
		Tier::Relay
	} else {
		Tier::Leaf
	}
}

#[cfg(test)]
pub(crate) mod tests {
	use proptest::prelude::*;
	use rand::SeedableRng;
	use rand::rngs::SmallRng;

	use super::*;
	use crate::components::network_mesh::types::Rgb;

	pub(crate) fn node_at(x: f32, y: f32, tier: Tier) -> Node {
		Node {
			x,
			y,
			vx: 0.0,
			vy: 0.0,
			tier,
			size: 1.0,
			alpha: 1.0,
			color: Rgb::new(1.0, 1.0, 1.0),
			phase: 0.0,
			pulse_speed: 0.2,
		}
	}

	#[test]
	fn tiers_follow_fixed_thresholds() {
		let mut rng = SmallRng::seed_from_u64(7);
		let field = NodeField::initialize(&MeshConfig::default(), &mut rng);
		let tiers: Vec<_> = field.nodes().iter().map(|n| n.tier).collect();
		assert_eq!(tiers.len(), 90);
		assert!(tiers[..6].iter().all(|&t| t == Tier::Hub));
		assert!(tiers[6..22].iter().all(|&t| t == Tier::Relay));
		assert!(tiers[22..].iter().all(|&t| t == Tier::Leaf));
	}

	#[test]
	fn small_fields_keep_absolute_thresholds() {
		let mut config = MeshConfig::default();
		config.node_count = 10;
		let field = NodeField::initialize(&config, &mut SmallRng::seed_from_u64(1));
		assert_eq!(field.nodes()[5].tier, Tier::Hub);
		assert!(field.nodes()[6..].iter().all(|n| n.tier == Tier::Relay));
	}

	#[test]
	fn initial_positions_in_spawn_region() {
		let config = MeshConfig::default();
		let field = NodeField::initialize(&config, &mut SmallRng::seed_from_u64(3));
		for n in field.nodes() {
			assert!(n.x.abs() <= 0.93 && n.y.abs() <= 0.93);
			assert!(config.palette.contains(&n.color));
		}
	}

	#[test]
	fn same_seed_same_field() {
		let config = MeshConfig::default();
		let a = NodeField::initialize(&config, &mut SmallRng::seed_from_u64(42));
		let b = NodeField::initialize(&config, &mut SmallRng::seed_from_u64(42));
		assert_eq!(a.nodes(), b.nodes());
	}

	#[test]
	fn bounce_flips_and_damps_at_edge() {
		let mut node = node_at(0.99, 0.0, Tier::Hub);
		node.vx = 0.001;
		let mut field = NodeField::from_nodes(vec![node], Physics::default());
		field.advance(Pointer::ABSENT);
		let n = &field.nodes()[0];
		assert!(n.vx < 0.0);
		assert!(n.vx.abs() < 0.001);
		assert!(n.x <= 1.0);
	}

	#[test]
	fn pointer_repels_nearby_node() {
		let mut field = NodeField::from_nodes(vec![node_at(0.1, 0.0, Tier::Hub)], Physics::default());
		field.advance(Pointer { x: 0.0, y: 0.0 });
		assert!(field.nodes()[0].vx > 0.0);
	}

	#[test]
	fn pointer_at_node_center_is_ignored() {
		let mut field = NodeField::from_nodes(vec![node_at(0.0, 0.0, Tier::Hub)], Physics::default());
		field.advance(Pointer { x: 0.0, y: 0.0 });
		assert_eq!(field.nodes()[0].vx, 0.0);
	}

	#[test]
	fn centering_pulls_toward_origin() {
		let mut field = NodeField::from_nodes(vec![node_at(0.5, -0.5, Tier::Leaf)], Physics::default());
		field.advance(Pointer::ABSENT);
		let n = &field.nodes()[0];
		assert!(n.vx < 0.0 && n.vy > 0.0);
	}

	proptest! {
		#[test]
		fn stays_in_bounds_and_under_cap(
			seed in any::<u64>(),
			px in -1.2f32..1.2,
			py in -1.2f32..1.2,
			ticks in 1usize..200,
		) {
			let mut config = MeshConfig::default();
			config.node_count = 30;
			let cap = config.physics.speed_cap;
			let mut field = NodeField::initialize(&config, &mut SmallRng::seed_from_u64(seed));
			for _ in 0..ticks {
				field.advance(Pointer { x: px, y: py });
				for n in field.nodes() {
					prop_assert!((-1.0..=1.0).contains(&n.x));
					prop_assert!((-1.0..=1.0).contains(&n.y));
					prop_assert!(n.speed() <= cap * 1.0001);
				}
			}
		}
	}
}
