//! wgpu-backed resource factory
//!
//! Owns every program, texture and geometry the scene creates and resolves
//! handles back to GPU objects while a frame is being recorded.

use std::{collections::HashMap, sync::Arc};

use wgpu::util::DeviceExt;

use crate::{
    error::ViewerError,
    gfx::{
        rendering::{
            pipeline_manager::PipelineManager,
            shaders::{ProgramKind, ShaderSpec},
        },
        scene::{object::ObjectUniform, object::TextureImage, pause_overlay::OverlayUniform},
    },
    wgpu_utils::{BindGroupBuilder, UniformBuffer},
};

use super::{
    handles::{GeometryHandle, ProgramHandle, ResourceFactory, TextureHandle},
    texture_resource::TextureResource,
};

/// A linked pipeline plus its own uniform storage (bind group 0).
pub struct GpuProgram {
    pub pipeline: wgpu::RenderPipeline,
    pub uniforms: UniformBuffer,
    pub bind_group: wgpu::BindGroup,
}

/// A sampled texture and its bind group (bind group 1).
pub struct GpuTexture {
    pub resource: TextureResource,
    pub bind_group: wgpu::BindGroup,
}

pub struct GpuGeometry {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

pub struct GpuResources {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    pipeline_manager: PipelineManager,
    programs: HashMap<ProgramHandle, GpuProgram>,
    textures: HashMap<TextureHandle, GpuTexture>,
    geometries: HashMap<GeometryHandle, GpuGeometry>,
    next_id: u32,
}

impl GpuResources {
    pub fn new(device: Arc<wgpu::Device>, queue: Arc<wgpu::Queue>, color_format: wgpu::TextureFormat) -> Self {
        let pipeline_manager =
            PipelineManager::new(device.clone(), color_format, TextureResource::DEPTH_FORMAT);
        Self {
            device,
            queue,
            pipeline_manager,
            programs: HashMap::new(),
            textures: HashMap::new(),
            geometries: HashMap::new(),
            next_id: 0,
        }
    }

    fn allocate_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    pub fn program(&self, handle: ProgramHandle) -> Option<&GpuProgram> {
        self.programs.get(&handle)
    }

    pub fn texture(&self, handle: TextureHandle) -> Option<&GpuTexture> {
        self.textures.get(&handle)
    }

    pub fn geometry(&self, handle: GeometryHandle) -> Option<&GpuGeometry> {
        self.geometries.get(&handle)
    }

    /// Stages a write of the program's uniform block for this frame.
    pub fn write_uniforms(&mut self, handle: ProgramHandle, data: &[u8]) -> bool {
        match self.programs.get_mut(&handle) {
            Some(program) => program.uniforms.update_content(&self.queue, data),
            None => false,
        }
    }

    pub fn live_count(&self) -> usize {
        self.programs.len() + self.textures.len() + self.geometries.len()
    }
}

fn uniform_size(kind: ProgramKind) -> usize {
    match kind {
        ProgramKind::Mesh => std::mem::size_of::<ObjectUniform>(),
        ProgramKind::Overlay => std::mem::size_of::<OverlayUniform>(),
    }
}

impl ResourceFactory for GpuResources {
    fn create_program(&mut self, spec: &ShaderSpec) -> Result<ProgramHandle, ViewerError> {
        let pipeline = self.pipeline_manager.create_pipeline(spec)?;

        let uniforms = UniformBuffer::new(&self.device, spec.label, uniform_size(spec.kind));
        let bind_group = BindGroupBuilder::new(self.pipeline_manager.uniform_layout())
            .resource(uniforms.binding_resource())
            .create(&self.device, &format!("{} Uniforms", spec.label));

        let handle = ProgramHandle(self.allocate_id());
        self.programs.insert(
            handle,
            GpuProgram {
                pipeline,
                uniforms,
                bind_group,
            },
        );
        log::debug!("Linked program '{}' as {:?}", spec.label, handle);
        Ok(handle)
    }

    fn create_geometry(&mut self, label: &str, vertices: &[u8], indices: &[u32]) -> GeometryHandle {
        let vertex_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Vertex Buffer", label)),
            contents: vertices,
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Index Buffer", label)),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let handle = GeometryHandle(self.allocate_id());
        self.geometries.insert(
            handle,
            GpuGeometry {
                vertex_buffer,
                index_buffer,
                index_count: indices.len() as u32,
            },
        );
        handle
    }

    fn create_texture(&mut self, label: &str, image: &TextureImage) -> Result<TextureHandle, ViewerError> {
        let max = self.device.limits().max_texture_dimension_2d;
        if image.width > max || image.height > max {
            return Err(ViewerError::TextureTooLarge {
                width: image.width,
                height: image.height,
                max,
            });
        }

        let resource = TextureResource::create_from_image(&self.device, &self.queue, image, label);
        let bind_group = BindGroupBuilder::new(self.pipeline_manager.texture_layout())
            .texture(&resource.view)
            .sampler(&resource.sampler)
            .create(&self.device, &format!("{} Texture", label));

        let handle = TextureHandle(self.allocate_id());
        self.textures.insert(handle, GpuTexture { resource, bind_group });
        Ok(handle)
    }

    fn destroy_program(&mut self, program: ProgramHandle) {
        if self.programs.remove(&program).is_none() {
            log::warn!("Destroying unknown program {:?}", program);
        }
    }

    fn destroy_geometry(&mut self, geometry: GeometryHandle) {
        match self.geometries.remove(&geometry) {
            Some(geometry) => {
                geometry.vertex_buffer.destroy();
                geometry.index_buffer.destroy();
            }
            None => log::warn!("Destroying unknown geometry {:?}", geometry),
        }
    }

    fn destroy_texture(&mut self, texture: TextureHandle) {
        match self.textures.remove(&texture) {
            Some(texture) => texture.resource.texture.destroy(),
            None => log::warn!("Destroying unknown texture {:?}", texture),
        }
    }
}
