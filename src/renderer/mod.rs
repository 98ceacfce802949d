//! WebGPU rendering module
//!
//! Vector-style rendering: the scene is rebuilt as a flat-colored triangle
//! list every frame and drawn in a single pass.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::build_scene;
