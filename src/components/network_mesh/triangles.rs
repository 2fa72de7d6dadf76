//! Closed-triangle enumeration over the edge set.

use std::collections::HashSet;

use super::types::{Edge, NodeIdx, Triangle};

/// Closed-triangle finder with adjacency and dedup storage kept across
/// ticks to avoid reallocating every frame.
#[derive(Debug, Default)]
pub struct TriangleFinder {
	adjacency: Vec<HashSet<NodeIdx>>,
	seen: HashSet<Triangle>,
}

impl TriangleFinder {
	/// Finder with empty scratch storage.
	pub fn new() -> Self {
		Self::default()
	}

	/// Rebuilds `out` with every triple whose three pairs are all edges.
	///
	/// Each triangle is reported once, in `a < b < c` order. Edges naming
	/// an index outside `node_count` or a self-loop are ignored.
	pub fn find(&mut self, edges: &[Edge], node_count: usize, out: &mut Vec<Triangle>) {
		out.clear();
		self.seen.clear();
		for set in &mut self.adjacency {
			set.clear();
		}
		if self.adjacency.len() < node_count {
			self.adjacency.resize_with(node_count, HashSet::new);
		}

		let valid = |e: &&Edge| e.a != e.b && e.a < node_count && e.b < node_count;
		for e in edges.iter().filter(valid) {
			self.adjacency[e.a].insert(e.b);
			self.adjacency[e.b].insert(e.a);
		}

		for e in edges.iter().filter(valid) {
			let (a, b) = (e.a.min(e.b), e.a.max(e.b));
			for &c in &self.adjacency[a] {
				if c > b && self.adjacency[b].contains(&c) {
					let tri = Triangle { a, b, c };
					if self.seen.insert(tri) {
						out.push(tri);
					}
				}
			}
		}
	}
}

/// One-shot convenience over [`TriangleFinder::find`].
pub fn find_triangles(edges: &[Edge], node_count: usize) -> Vec<Triangle> {
	let mut out = Vec::new();
	TriangleFinder::new().find(edges, node_count, &mut out);
	out
}
