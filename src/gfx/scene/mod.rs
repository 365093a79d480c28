//! # Scene
//!
//! The frame orchestrator and everything it draws.
//!
//! - [`Scene`] - owns the camera, the object list and the pause overlay, and
//!   runs the per-frame sequence
//! - [`SceneObject`] - a textured, lit mesh with a public transform
//! - [`PauseOverlay`] - the banner drawn while movement is paused
//! - [`Vertex3D`] / [`Vertex2D`] - vertex formats for meshes and the overlay

pub mod object;
pub mod pause_overlay;
pub mod scene;
pub mod vertex;

// Re-export main types
pub use object::{MeshData, ObjectUniform, SceneObject, TextureImage};
pub use pause_overlay::PauseOverlay;
pub use scene::{FrameReport, Scene};
pub use vertex::{Vertex2D, Vertex3D};
