//! Packets travelling along edges.

use std::f32::consts::PI;

use log::trace;
use rand::Rng;

use super::config::PacketMotion;
use super::types::{Edge, Node, Packet, Rgb};

/// Drawable state of one live packet.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PacketSprite {
	/// Interpolated x.
	pub x: f32,
	/// Interpolated y.
	pub y: f32,
	/// Source node color at spawn.
	pub color: Rgb,
	/// `sin(progress * PI)`: zero at both endpoints, one halfway.
	pub fade: f32,
}

/// Bounded pool of packets travelling along edges.
#[derive(Debug)]
pub struct PacketPool {
	packets: Vec<Packet>,
	capacity: usize,
	min_strength: f32,
	speed: std::ops::Range<f32>,
	motion: PacketMotion,
}

impl PacketPool {
	/// Empty pool. Spawns need an edge stronger than `min_strength`; new
	/// packets draw their speed from `speed`.
	pub fn new(
		capacity: usize,
		min_strength: f32,
		speed: std::ops::Range<f32>,
		motion: PacketMotion,
	) -> Self {
		Self {
			packets: Vec::with_capacity(capacity),
			capacity,
			min_strength,
			speed,
			motion,
		}
	}

	/// Live packets in spawn order.
	pub fn packets(&self) -> &[Packet] {
		&self.packets
	}

	/// Number of live packets.
	pub fn len(&self) -> usize {
		self.packets.len()
	}

	/// No packets in flight.
	pub fn is_empty(&self) -> bool {
		self.packets.is_empty()
	}

	/// At capacity; further spawns are dropped.
	pub fn is_full(&self) -> bool {
		self.packets.len() >= self.capacity
	}

	/// Picks one edge at random and launches a packet along it in a random
	/// direction. Weak edges and a full pool turn the attempt into a no-op.
	pub fn try_spawn<R: Rng + ?Sized>(&mut self, edges: &[Edge], nodes: &[Node], rng: &mut R) -> bool {
		if edges.is_empty() {
			return false;
		}
		let edge = edges[rng.random_range(0..edges.len())];
		if edge.strength <= self.min_strength {
			trace!("packet spawn skipped: edge strength {:.3}", edge.strength);
			return false;
		}
		let (from, to) = if rng.random_bool(0.5) {
			(edge.a, edge.b)
		} else {
			(edge.b, edge.a)
		};
		let Some(source) = nodes.get(from) else {
			return false;
		};
		let speed = if self.speed.is_empty() {
			self.speed.start
		} else {
			rng.random_range(self.speed.clone())
		};
		self.push(Packet {
			from,
			to,
			progress: 0.0,
			speed,
			color: source.color,
		})
	}

	/// Adds a packet unless the pool is at capacity.
	pub fn push(&mut self, packet: Packet) -> bool {
		if self.is_full() {
			trace!("packet spawn dropped: pool full ({})", self.capacity);
			return false;
		}
		self.packets.push(packet);
		true
	}

	/// Moves every packet forward and retires those that arrived.
	pub fn advance(&mut self, dt: f32) {
		let step_scale = match self.motion {
			PacketMotion::PerTick => 1.0,
			PacketMotion::TimeScaled { reference_dt } => dt / reference_dt,
		};
		self.packets.retain_mut(|p| {
			p.progress += p.speed * step_scale;
			p.progress < 1.0
		});
	}

	/// Interpolated positions against the nodes' current locations.
	/// Packets whose endpoints are out of range are skipped.
	pub fn sprites<'a>(&'a self, nodes: &'a [Node]) -> impl Iterator<Item = PacketSprite> + 'a {
		self.packets.iter().filter_map(move |p| {
			let (from, to) = (nodes.get(p.from)?, nodes.get(p.to)?);
			Some(PacketSprite {
				x: from.x + (to.x - from.x) * p.progress,
				y: from.y + (to.y - from.y) * p.progress,
				color: p.color,
				fade: (p.progress * PI).sin(),
			})
		})
	}
}
