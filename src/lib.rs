//! Diorama
//!
//! An interactive viewer for a small, fixed scene of textured OBJ meshes,
//! built on wgpu and winit. The camera orbits a target point with the mouse,
//! zooms with the wheel and pans with the keyboard; Escape pauses movement
//! and shows a banner until the next click.

pub mod app;
pub mod assets;
pub mod config;
pub mod error;
pub mod gfx;
pub mod input;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::ViewerApp;
pub use config::ViewerConfig;
pub use error::ViewerError;
