//! Ambient network mesh background: drifting nodes linked by proximity,
//! triangle fills and packets travelling along the links.
//!
//! The simulation core (`field`, `edges`, `triangles`, `packets`, `state`)
//! has no web dependencies and produces flat vertex arrays; `render` and
//! `component` hook it up to WebGL and the browser frame loop.

mod component;
pub mod config;
pub mod edges;
pub mod field;
pub mod geometry;
pub mod packets;
mod render;
pub mod state;
pub mod triangles;
pub mod types;

pub use component::NetworkMeshCanvas;
pub use config::{ConfigError, MeshConfig, PacketMotion, Profile};
pub use geometry::FrameGeometry;
pub use render::{MeshRenderer, RenderError};
pub use state::MeshState;
pub use types::{Edge, Node, Packet, Pointer, Rgb, Tier, Triangle, Viewport};
