//! WebGPU rendering module
//!
//! Vertex-colored triangles built on the CPU each frame from the game state.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use vertex::{Vertex, colors};
