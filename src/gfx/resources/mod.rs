//! GPU resource management
//!
//! Programs, textures and geometry are created through a [`ResourceFactory`]
//! and referred to by handle everywhere else.

pub mod gpu_resources;
pub mod handles;
pub mod texture_resource;

// Re-export main types
pub use gpu_resources::GpuResources;
pub use handles::{GeometryHandle, ProgramHandle, ResourceFactory, TextureHandle};
pub use texture_resource::TextureResource;
