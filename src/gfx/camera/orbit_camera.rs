use std::f32::consts::{FRAC_PI_2, PI, TAU};

use cgmath::{Deg, Matrix4, Rad, Vector3};

use crate::{
    config::CameraConfig,
    gfx::math::{look_at, perspective, rotation_y, OPENGL_TO_WGPU_MATRIX},
};

use super::camera_utils::{ViewState, Viewport};

/// Orbit camera rig.
///
/// The camera sits on a sphere of `radius` around `target`, placed by an
/// azimuth (around +Y, from +X towards +Z) and a polar elevation angle.
/// Every mutation is gated on the movement-enabled flag; while the viewer is
/// paused the rig is frozen.
#[derive(Debug, Clone, Copy)]
pub struct OrbitCamera {
    azimuth: f32,
    polar: f32,
    radius: f32,
    target: Vector3<f32>,
    pub bounds: OrbitCameraBounds,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
    zoom_sensitivity: f32,
    movement_enabled: bool,
}

impl OrbitCamera {
    pub fn new(config: &CameraConfig) -> Self {
        let bounds = OrbitCameraBounds {
            min_radius: config.min_radius,
            max_radius: config.max_radius,
            polar_epsilon: config.polar_epsilon,
        };

        Self {
            azimuth: wrap_azimuth(config.azimuth),
            polar: bounds.clamp_polar(config.polar),
            radius: bounds.clamp_radius(config.radius),
            target: config.target,
            bounds,
            fovy: Rad::from(Deg(config.fovy_degrees)),
            znear: config.znear,
            zfar: config.zfar,
            zoom_sensitivity: config.zoom_sensitivity,
            movement_enabled: true,
        }
    }

    pub fn azimuth(&self) -> f32 {
        self.azimuth
    }

    pub fn polar(&self) -> f32 {
        self.polar
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn target(&self) -> Vector3<f32> {
        self.target
    }

    pub fn movement_enabled(&self) -> bool {
        self.movement_enabled
    }

    pub fn set_movement_enabled(&mut self, enabled: bool) {
        self.movement_enabled = enabled;
    }

    pub fn toggle_movement(&mut self) {
        self.movement_enabled = !self.movement_enabled;
    }

    /// Orbits around the target. Azimuth wraps into `(-π, π]`, the polar
    /// angle saturates short of the poles.
    pub fn apply_orbit_delta(&mut self, delta_azimuth: f32, delta_polar: f32) {
        if !self.movement_enabled {
            return;
        }
        self.azimuth = wrap_azimuth(self.azimuth + delta_azimuth);
        self.polar = self.bounds.clamp_polar(self.polar + delta_polar);
    }

    /// Moves along the view ray; negative deltas zoom in.
    pub fn apply_zoom(&mut self, scroll_delta: f32) {
        if !self.movement_enabled {
            return;
        }
        self.radius = self
            .bounds
            .clamp_radius(self.radius + scroll_delta * self.zoom_sensitivity);
    }

    /// Moves the target by a camera-relative displacement.
    ///
    /// `displacement.x` runs along the horizontal direction pointing away
    /// from the camera at azimuth zero; the vector is rotated by the current
    /// azimuth first so that "forward" always follows the camera.
    pub fn apply_pan(&mut self, displacement: Vector3<f32>) {
        if !self.movement_enabled {
            return;
        }
        self.target += rotate_by_azimuth(self.azimuth, displacement);
    }

    /// World position on the orbit sphere and the matching view matrix.
    pub fn compute_view_state(&self) -> ViewState {
        let position = self.target
            + Vector3::new(
                self.radius * self.polar.cos() * self.azimuth.cos(),
                self.radius * self.polar.sin(),
                self.radius * self.polar.cos() * self.azimuth.sin(),
            );

        ViewState {
            position,
            view: look_at(position, self.target, Vector3::unit_y()),
        }
    }

    /// Projection for the current viewport, remapped to wgpu clip depth.
    pub fn projection(&self, viewport: Viewport) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, viewport.aspect(), self.znear, self.zfar)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OrbitCameraBounds {
    pub min_radius: f32,
    pub max_radius: f32,
    pub polar_epsilon: f32,
}

impl Default for OrbitCameraBounds {
    fn default() -> Self {
        Self {
            min_radius: 1.0,
            max_radius: 500.0,
            polar_epsilon: 0.01,
        }
    }
}

impl OrbitCameraBounds {
    fn clamp_radius(&self, radius: f32) -> f32 {
        radius.clamp(self.min_radius, self.max_radius)
    }

    fn clamp_polar(&self, polar: f32) -> f32 {
        polar.clamp(-FRAC_PI_2 + self.polar_epsilon, FRAC_PI_2 - self.polar_epsilon)
    }
}

/// Wraps an angle into `(-π, π]`.
pub fn wrap_azimuth(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    // rem_euclid may round up to TAU itself, and -π belongs to the other end.
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped.min(PI)
    }
}

fn rotate_by_azimuth(azimuth: f32, v: Vector3<f32>) -> Vector3<f32> {
    rotation_y(azimuth) * v
}
