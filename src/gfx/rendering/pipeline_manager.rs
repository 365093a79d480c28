//! Render pipeline creation
//!
//! Turns a [`ShaderSpec`] into a linked `wgpu::RenderPipeline`. Shader
//! modules are compiled once per source and shared by every program built
//! from it. All programs use the same two bind group layouts: the program's
//! uniform block at group 0 and a texture with its sampler at group 1.

use std::{collections::HashMap, sync::Arc};
use wgpu::*;

use crate::{
    error::ViewerError,
    gfx::{
        rendering::shaders::{ProgramKind, ShaderSpec},
        scene::vertex::{Vertex2D, Vertex3D},
    },
    wgpu_utils::{binding_types, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
};

/// Configuration for creating a render pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub label: String,
    pub vertex_entry: String,
    pub fragment_entry: String,
    pub vertex_layout: VertexBufferLayout<'static>,
    pub cull_mode: Option<Face>,
    pub depth_write_enabled: bool,
    pub depth_compare: CompareFunction,
    pub blend: Option<BlendState>,
}

impl PipelineConfig {
    /// Fixed-function state implied by the program kind.
    pub fn for_shader(spec: &ShaderSpec) -> Self {
        let base = Self {
            label: spec.label.to_string(),
            vertex_entry: spec.vertex_entry.to_string(),
            fragment_entry: spec.fragment_entry.to_string(),
            vertex_layout: Vertex3D::desc(),
            cull_mode: Some(Face::Back),
            depth_write_enabled: true,
            depth_compare: CompareFunction::Less,
            blend: Some(BlendState::REPLACE),
        };

        match spec.kind {
            ProgramKind::Mesh => base,
            ProgramKind::Overlay => base
                .with_vertex_layout(Vertex2D::desc())
                .with_cull_mode(None)
                .with_depth(false, CompareFunction::Always)
                .with_blend(BlendState::ALPHA_BLENDING),
        }
    }

    pub fn with_vertex_layout(mut self, layout: VertexBufferLayout<'static>) -> Self {
        self.vertex_layout = layout;
        self
    }

    pub fn with_cull_mode(mut self, face: Option<Face>) -> Self {
        self.cull_mode = face;
        self
    }

    pub fn with_depth(mut self, write_enabled: bool, compare: CompareFunction) -> Self {
        self.depth_write_enabled = write_enabled;
        self.depth_compare = compare;
        self
    }

    pub fn with_blend(mut self, blend: BlendState) -> Self {
        self.blend = Some(blend);
        self
    }
}

/// Compiles shaders and links render pipelines against the shared layouts.
pub struct PipelineManager {
    device: Arc<Device>,
    color_format: TextureFormat,
    depth_format: TextureFormat,
    shader_modules: HashMap<&'static str, ShaderModule>,
    uniform_layout: BindGroupLayoutWithDesc,
    texture_layout: BindGroupLayoutWithDesc,
    pipeline_layout: PipelineLayout,
}

impl PipelineManager {
    pub fn new(device: Arc<Device>, color_format: TextureFormat, depth_format: TextureFormat) -> Self {
        let uniform_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform())
            .create(&device, "Program Uniforms");

        let texture_layout = BindGroupLayoutBuilder::new()
            .next_binding_fragment(binding_types::texture_2d())
            .next_binding_fragment(binding_types::sampler(SamplerBindingType::Filtering))
            .create(&device, "Object Texture");

        let pipeline_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some("Program Layout"),
            bind_group_layouts: &[&uniform_layout.layout, &texture_layout.layout],
            push_constant_ranges: &[],
        });

        Self {
            device,
            color_format,
            depth_format,
            shader_modules: HashMap::new(),
            uniform_layout,
            texture_layout,
            pipeline_layout,
        }
    }

    pub fn uniform_layout(&self) -> &BindGroupLayoutWithDesc {
        &self.uniform_layout
    }

    pub fn texture_layout(&self) -> &BindGroupLayoutWithDesc {
        &self.texture_layout
    }

    /// Compiles (or reuses) the shader module and links a pipeline.
    ///
    /// Compilation and link problems are reported by wgpu as validation
    /// errors; they are captured in an error scope and returned.
    pub fn create_pipeline(&mut self, spec: &ShaderSpec) -> Result<RenderPipeline, ViewerError> {
        let config = PipelineConfig::for_shader(spec);

        self.device.push_error_scope(ErrorFilter::Validation);

        let device = &self.device;
        let shader: &ShaderModule = self.shader_modules.entry(spec.source).or_insert_with(|| {
            log::debug!("Compiling shader module for '{}'", spec.label);
            device.create_shader_module(ShaderModuleDescriptor {
                label: Some(spec.label),
                source: ShaderSource::Wgsl(spec.source.into()),
            })
        });

        let color_targets = [Some(ColorTargetState {
            format: self.color_format,
            blend: config.blend,
            write_mask: ColorWrites::ALL,
        })];

        let pipeline = self.device.create_render_pipeline(&RenderPipelineDescriptor {
            label: Some(&config.label),
            layout: Some(&self.pipeline_layout),
            vertex: VertexState {
                module: shader,
                entry_point: Some(&config.vertex_entry),
                buffers: &[config.vertex_layout.clone()],
                compilation_options: PipelineCompilationOptions::default(),
            },
            fragment: Some(FragmentState {
                module: shader,
                entry_point: Some(&config.fragment_entry),
                targets: &color_targets,
                compilation_options: PipelineCompilationOptions::default(),
            }),
            primitive: PrimitiveState {
                topology: PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: FrontFace::Ccw,
                cull_mode: config.cull_mode,
                polygon_mode: PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(DepthStencilState {
                format: self.depth_format,
                depth_write_enabled: config.depth_write_enabled,
                depth_compare: config.depth_compare,
                stencil: StencilState::default(),
                bias: DepthBiasState::default(),
            }),
            multisample: MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        if let Some(error) = pollster::block_on(self.device.pop_error_scope()) {
            return Err(ViewerError::ShaderLink {
                label: spec.label.to_string(),
                message: error.to_string(),
            });
        }

        Ok(pipeline)
    }
}
