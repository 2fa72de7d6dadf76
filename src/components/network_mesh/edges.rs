//! Proximity graph construction.

use super::types::{Edge, Node, Tier};

/// Rebuilds `out` with every pair closer than `connect_distance`.
///
/// Distances are measured with the x component scaled by `aspect`, so the
/// connection radius looks circular on a non-square viewport. Leaf-leaf
/// pairs are skipped. The pass is exhaustive; node counts are small.
pub fn build_edges(nodes: &[Node], aspect: f32, connect_distance: f32, out: &mut Vec<Edge>) {
	out.clear();
	if !(connect_distance > 0.0) {
		return;
	}
	for (i, ni) in nodes.iter().enumerate() {
		for (j, nj) in nodes.iter().enumerate().skip(i + 1) {
			if ni.tier == Tier::Leaf && nj.tier == Tier::Leaf {
				continue;
			}
			let dx = (ni.x - nj.x) * aspect;
			let dy = ni.y - nj.y;
			let dist = dx.hypot(dy);
			if dist < connect_distance {
				out.push(Edge {
					a: i,
					b: j,
					strength: 1.0 - dist / connect_distance,
				});
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use std::collections::HashSet;

	use proptest::prelude::*;

	use super::*;
	use crate::components::network_mesh::field::tests::node_at;

	fn edges_of(nodes: &[Node], aspect: f32, dist: f32) -> Vec<Edge> {
		let mut out = Vec::new();
		build_edges(nodes, aspect, dist, &mut out);
		out
	}

	#[test]
	fn close_pair_gets_linear_strength() {
		let nodes = [node_at(0.0, 0.0, Tier::Hub), node_at(0.1, 0.0, Tier::Relay)];
		let edges = edges_of(&nodes, 1.0, 0.22);
		assert_eq!(edges.len(), 1);
		assert_eq!((edges[0].a, edges[0].b), (0, 1));
		assert!((edges[0].strength - 0.545_454).abs() < 1e-4);
	}

	#[test]
	fn leaves_never_link_to_leaves() {
		let nodes = [node_at(0.0, 0.0, Tier::Leaf), node_at(0.01, 0.0, Tier::Leaf)];
		assert!(edges_of(&nodes, 1.0, 0.22).is_empty());
	}

	#[test]
	fn aspect_stretches_horizontal_distance() {
		let nodes = [node_at(0.0, 0.0, Tier::Hub), node_at(0.15, 0.0, Tier::Hub)];
		assert_eq!(edges_of(&nodes, 1.0, 0.22).len(), 1);
		assert!(edges_of(&nodes, 2.0, 0.22).is_empty());

		let vertical = [node_at(0.0, 0.0, Tier::Hub), node_at(0.0, 0.15, Tier::Hub)];
		assert_eq!(edges_of(&vertical, 2.0, 0.22).len(), 1);
	}

	#[test]
	fn pair_at_threshold_is_excluded() {
		let nodes = [node_at(0.0, 0.0, Tier::Hub), node_at(0.0, 0.25, Tier::Hub)];
		assert!(edges_of(&nodes, 1.0, 0.25).is_empty());
	}

	#[test]
	fn non_positive_distance_yields_nothing() {
		let nodes = [node_at(0.0, 0.0, Tier::Hub), node_at(0.0, 0.0, Tier::Hub)];
		assert!(edges_of(&nodes, 1.0, 0.0).is_empty());
	}

	#[test]
	fn buffer_is_reused() {
		let nodes = [node_at(0.0, 0.0, Tier::Hub), node_at(0.05, 0.0, Tier::Hub)];
		let mut out = vec![Edge { a: 7, b: 9, strength: 0.5 }];
		build_edges(&nodes, 1.0, 0.22, &mut out);
		assert_eq!(out.len(), 1);
		assert_eq!(out[0].a, 0);
	}

	fn tier_strategy() -> impl Strategy<Value = Tier> {
		prop_oneof![Just(Tier::Hub), Just(Tier::Relay), Just(Tier::Leaf)]
	}

	proptest! {
		#[test]
		fn edges_are_unique_ordered_and_valid(
			pts in prop::collection::vec((-1.0f32..1.0, -1.0f32..1.0, tier_strategy()), 0..40),
			aspect in 0.5f32..2.5,
		) {
			let nodes: Vec<_> = pts.iter().map(|&(x, y, t)| node_at(x, y, t)).collect();
			let edges = edges_of(&nodes, aspect, 0.3);
			let mut seen = HashSet::new();
			for e in &edges {
				prop_assert!(e.a < e.b);
				prop_assert!(seen.insert((e.a, e.b)));
				prop_assert!(!(nodes[e.a].tier == Tier::Leaf && nodes[e.b].tier == Tier::Leaf));
				prop_assert!(e.strength > 0.0 && e.strength <= 1.0);
			}
		}
	}
}
