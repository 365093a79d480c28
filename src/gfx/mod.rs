//! # Graphics Module
//!
//! Everything between the input queue and the GPU.
//!
//! - **Camera System** ([`camera`]) - orbit rig and the input resolver that drives it
//! - **Rendering** ([`rendering`]) - surface, pipelines, shaders and the per-frame binding context
//! - **Scene** ([`scene`]) - scene objects, the pause overlay and the frame orchestrator
//! - **Resources** ([`resources`]) - handle-based GPU resource factory
//! - [`math`] - view, projection and model matrix helpers
//! - [`material`] - Phong material and light descriptors

pub mod camera;
pub mod material;
pub mod math;
pub mod rendering;
pub mod resources;
pub mod scene;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use camera::orbit_camera::OrbitCamera;
pub use rendering::render_engine::RenderEngine;
