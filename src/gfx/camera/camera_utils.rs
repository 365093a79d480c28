use cgmath::{Matrix4, Vector3};

use crate::{config::CameraConfig, input::InputEvent};

use super::{
    camera_controller::{CameraController, FrameInput},
    orbit_camera::OrbitCamera,
};

/// Camera rig plus the input resolver that drives it.
pub struct CameraManager {
    pub camera: OrbitCamera,
    pub controller: CameraController,
}

impl CameraManager {
    pub fn new(camera: OrbitCamera, controller: CameraController) -> Self {
        Self { camera, controller }
    }

    pub fn from_config(config: &CameraConfig) -> Self {
        Self::new(OrbitCamera::new(config), CameraController::new(config))
    }

    pub fn process_event(&mut self, event: &InputEvent) {
        self.controller.process_event(event, &mut self.camera);
    }

    /// Resolves this frame's input and applies it to the rig.
    ///
    /// Each rig operation checks the movement-enabled flag itself, so a
    /// paused rig stays put even if the resolver reported motion.
    pub fn update(&mut self) -> FrameInput {
        let input = self.controller.resolve(self.camera.movement_enabled());

        let (delta_azimuth, delta_polar) = input.orbit_delta;
        self.camera.apply_orbit_delta(delta_azimuth, delta_polar);
        self.camera.apply_zoom(input.zoom_delta);
        self.camera.apply_pan(input.displacement);

        input
    }

    pub fn is_paused(&self) -> bool {
        !self.camera.movement_enabled()
    }
}

/// Camera output for one frame.
#[derive(Debug, Clone, Copy)]
pub struct ViewState {
    /// Eye position in world space.
    pub position: Vector3<f32>,
    pub view: Matrix4<f32>,
}

/// Drawable size in physical pixels, read once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width over height, with the height clamped to at least one pixel.
    pub fn aspect(&self) -> f32 {
        self.width.max(1) as f32 / self.height.max(1) as f32
    }
}

impl From<winit::dpi::PhysicalSize<u32>> for Viewport {
    fn from(size: winit::dpi::PhysicalSize<u32>) -> Self {
        Self::new(size.width, size.height)
    }
}
