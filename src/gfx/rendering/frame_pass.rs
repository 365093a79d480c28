//! wgpu implementation of [`BindingContext`]
//!
//! A `FramePass` records one frame into a command encoder. The render pass
//! is opened by [`BindingContext::clear`], which also clears color and depth;
//! every later call resolves handles through [`GpuResources`] and forwards
//! them to the pass. Draws with an incomplete binding are skipped with a
//! warning.

use crate::gfx::resources::{GeometryHandle, GpuResources, ProgramHandle, TextureHandle};

use super::binding::{BindingContext, BindingState};

pub struct FramePass<'a> {
    resources: &'a mut GpuResources,
    encoder: wgpu::CommandEncoder,
    pass: Option<wgpu::RenderPass<'static>>,
    color_view: wgpu::TextureView,
    depth_view: wgpu::TextureView,
    state: BindingState,
}

impl<'a> FramePass<'a> {
    pub fn new(
        resources: &'a mut GpuResources,
        encoder: wgpu::CommandEncoder,
        color_view: wgpu::TextureView,
        depth_view: wgpu::TextureView,
    ) -> Self {
        Self {
            resources,
            encoder,
            pass: None,
            color_view,
            depth_view,
            state: BindingState::default(),
        }
    }

    /// Ends the render pass and returns the recorded commands.
    pub fn finish(mut self) -> wgpu::CommandBuffer {
        self.pass.take();
        self.encoder.finish()
    }
}

impl BindingContext for FramePass<'_> {
    fn clear(&mut self, color: wgpu::Color) {
        // A second clear ends the current pass and starts a fresh one.
        self.pass.take();
        self.state.reset();

        let pass = self.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Main Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &self.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(color),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });
        self.pass = Some(pass.forget_lifetime());
    }

    fn bind_program(&mut self, program: ProgramHandle) {
        self.state.bind_program(program);
        let (Some(pass), Some(gpu)) = (self.pass.as_mut(), self.resources.program(program)) else {
            return;
        };
        pass.set_pipeline(&gpu.pipeline);
        pass.set_bind_group(0, &gpu.bind_group, &[]);
    }

    fn upload_uniforms(&mut self, data: &[u8]) {
        let Ok(program) = self.state.require_program() else {
            log::warn!("Uniform upload without a bound program");
            return;
        };
        if !self.resources.write_uniforms(program, data) {
            log::warn!("Uniform upload of {} bytes rejected for {:?}", data.len(), program);
        }
    }

    fn bind_texture(&mut self, texture: TextureHandle) {
        self.state.bind_texture(texture);
        if let (Some(pass), Some(gpu)) = (self.pass.as_mut(), self.resources.texture(texture)) {
            pass.set_bind_group(1, &gpu.bind_group, &[]);
        }
    }

    fn bind_geometry(&mut self, geometry: GeometryHandle) {
        self.state.bind_geometry(geometry);
        if let (Some(pass), Some(gpu)) = (self.pass.as_mut(), self.resources.geometry(geometry)) {
            pass.set_vertex_buffer(0, gpu.vertex_buffer.slice(..));
            pass.set_index_buffer(gpu.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        }
    }

    fn draw_indexed(&mut self, index_count: u32) {
        let Some(pass) = self.pass.as_mut() else {
            log::warn!("Draw before the frame was cleared, skipping");
            return;
        };
        let (_, _, geometry) = match self.state.validate_draw() {
            Ok(bound) => bound,
            Err(err) => {
                log::warn!("Skipping draw: {}", err);
                return;
            }
        };
        let available = self
            .resources
            .geometry(geometry)
            .map(|gpu| gpu.index_count)
            .unwrap_or(0);
        if index_count > available {
            log::warn!("Skipping draw of {} indices, geometry has {}", index_count, available);
            return;
        }

        pass.draw_indexed(0..index_count, 0, 0..1);
    }
}
