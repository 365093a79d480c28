//! WGPU-based rendering engine for the viewer
//!
//! Owns the surface, device, queue and depth buffer, plus the
//! [`GpuResources`] every scene resource lives in. Each frame is recorded
//! through a [`FramePass`] handed to a caller-supplied closure.

use std::sync::Arc;

use anyhow::Context;

use crate::gfx::resources::{GpuResources, TextureResource};

use super::frame_pass::FramePass;

/// Core rendering engine managing GPU resources and frame submission
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    resources: GpuResources,
}

impl RenderEngine {
    /// Creates a new render engine for the given window
    ///
    /// Picks an sRGB surface format when one is available so that lit
    /// colors are written in linear space and encoded on store.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> anyhow::Result<RenderEngine> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .context("Failed to create a surface for the window")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("Failed to find a graphics adapter")?;

        let info = adapter.get_info();
        log::info!("Using adapter '{}' ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits::downlevel_defaults()
                    .using_resolution(adapter.limits()),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("Failed to request a device")?;
        let device = Arc::new(device);
        let queue = Arc::new(queue);

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .context("Surface reports no supported formats")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_capabilities.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture = TextureResource::create_depth_texture(&device, &config, "depth_texture");
        let resources = GpuResources::new(device.clone(), queue.clone(), format);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            depth_texture,
            resources,
        })
    }

    /// Records and presents one frame.
    ///
    /// Returns `None` when no surface texture could be acquired; a lost or
    /// outdated surface is reconfigured and the frame is skipped.
    pub fn render_frame<R>(&mut self, record: impl FnOnce(&mut FramePass) -> R) -> Option<R> {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return None;
            }
            Err(err) => {
                log::warn!("Skipping frame: {}", err);
                return None;
            }
        };

        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        let mut pass = FramePass::new(
            &mut self.resources,
            encoder,
            surface_texture_view,
            self.depth_texture.view.clone(),
        );
        let result = record(&mut pass);
        let commands = pass.finish();

        self.queue.submit(std::iter::once(commands));
        surface_texture.present();
        Some(result)
    }

    /// Resizes the surface and recreates the depth buffer
    ///
    /// A zero-sized window (minimized) is ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
    }

    pub fn resources_mut(&mut self) -> &mut GpuResources {
        &mut self.resources
    }
}
