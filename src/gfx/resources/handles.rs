//! GPU resource handles and the factory that hands them out
//!
//! Scene objects never hold wgpu objects directly. They hold small copyable
//! handles issued by a [`ResourceFactory`], and give them back exactly once
//! when they are destroyed.

use crate::{
    error::ViewerError,
    gfx::{rendering::shaders::ShaderSpec, scene::object::TextureImage},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProgramHandle(pub(crate) u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureHandle(pub(crate) u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeometryHandle(pub(crate) u32);

macro_rules! impl_handle {
    ($($handle:ident),*) => {
        $(
            impl $handle {
                pub fn from_raw(id: u32) -> Self {
                    Self(id)
                }

                pub fn raw(self) -> u32 {
                    self.0
                }
            }
        )*
    };
}

impl_handle!(ProgramHandle, TextureHandle, GeometryHandle);

/// Creates and releases GPU-resident resources.
///
/// Creation failures are load-time errors; there is no recovery path at
/// this layer.
pub trait ResourceFactory {
    /// Compiles the shader stages and links them into a program with its own
    /// uniform storage.
    fn create_program(&mut self, spec: &ShaderSpec) -> Result<ProgramHandle, ViewerError>;

    /// Uploads an interleaved vertex buffer and a `u32` index buffer.
    fn create_geometry(&mut self, label: &str, vertices: &[u8], indices: &[u32]) -> GeometryHandle;

    /// Uploads an RGBA8 image as an sRGB texture with a full mip chain.
    fn create_texture(
        &mut self,
        label: &str,
        image: &TextureImage,
    ) -> Result<TextureHandle, ViewerError>;

    fn destroy_program(&mut self, program: ProgramHandle);

    fn destroy_geometry(&mut self, geometry: GeometryHandle);

    fn destroy_texture(&mut self, texture: TextureHandle);
}
