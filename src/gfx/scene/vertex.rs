//! # Vertex Data Structures
//!
//! GPU-compatible vertex formats: [`Vertex3D`] for scene meshes and
//! [`Vertex2D`] for the screen-space pause overlay.

use std::mem;

/// A 3D vertex with position, normal and texture coordinates.
///
/// The `#[repr(C)]` layout is interleaved exactly as the vertex buffer
/// expects it: `position` (3 floats), `normal` (3 floats), `tex_coords`
/// (2 floats).
///
/// # Examples
///
/// ```no_run
/// use diorama::gfx::scene::vertex::Vertex3D;
///
/// let vertex = Vertex3D {
///     position: [0.0, 1.0, 0.0],
///     normal: [0.0, 1.0, 0.0],
///     tex_coords: [0.5, 0.5],
/// };
/// ```
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex3D {
    /// 3D position coordinates [x, y, z]
    pub position: [f32; 3],
    /// 3D normal vector [nx, ny, nz] for lighting calculations
    pub normal: [f32; 3],
    /// Texture coordinates [u, v], origin at the top-left of the image
    pub tex_coords: [f32; 2],
}

const VERTEX_3D_ATTRIBUTES: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
    0 => Float32x3,
    1 => Float32x3,
    2 => Float32x2,
];

impl Vertex3D {
    /// Returns the vertex buffer layout for wgpu rendering.
    ///
    /// - Location 0: `position` (Float32x3)
    /// - Location 1: `normal` (Float32x3)
    /// - Location 2: `tex_coords` (Float32x2)
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<Vertex3D>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &VERTEX_3D_ATTRIBUTES,
        }
    }
}

/// Screen-space vertex used by the pause overlay quad.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex2D {
    pub position: [f32; 2],
    pub color: [f32; 3],
    pub tex_coords: [f32; 2],
}

const VERTEX_2D_ATTRIBUTES: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
    0 => Float32x2,
    1 => Float32x3,
    2 => Float32x2,
];

impl Vertex2D {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<Vertex2D>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &VERTEX_2D_ATTRIBUTES,
        }
    }
}
