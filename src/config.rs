//! Viewer configuration
//!
//! Everything the viewer needs to know before the first frame: window
//! size, camera rig parameters, the directional light and the list of
//! objects to place in the world. [`ViewerConfig::default`] describes the
//! bundled diner-table scene.

use std::path::{Path, PathBuf};

use cgmath::Vector3;

use crate::gfx::{material::LightConfig, rendering::shaders::ShaderSpec};

#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 960,
            title: "Diorama".to_string(),
        }
    }
}

/// Orbit camera and input tuning.
#[derive(Debug, Clone)]
pub struct CameraConfig {
    pub radius: f32,
    /// Initial azimuth in radians, measured from +X towards +Z.
    pub azimuth: f32,
    /// Initial polar (elevation) angle in radians.
    pub polar: f32,
    pub target: Vector3<f32>,
    pub fovy_degrees: f32,
    pub znear: f32,
    pub zfar: f32,
    pub min_radius: f32,
    pub max_radius: f32,
    /// Margin kept between the polar angle and the poles.
    pub polar_epsilon: f32,
    /// Radians of orbit per pixel of cursor drag.
    pub orbit_sensitivity: f32,
    /// Radius change per scroll line.
    pub zoom_sensitivity: f32,
    /// Target displacement per frame while a movement key is held.
    pub movement_speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            radius: 50.0,
            azimuth: std::f32::consts::FRAC_PI_2,
            polar: 0.0,
            target: Vector3::new(0.0, 15.0, 0.0),
            fovy_degrees: 55.0,
            znear: 0.01,
            zfar: 500.0,
            min_radius: 1.0,
            max_radius: 500.0,
            polar_epsilon: 0.01,
            orbit_sensitivity: 0.005,
            zoom_sensitivity: 0.5,
            movement_speed: 0.1,
        }
    }
}

/// One object to load and place in the world.
#[derive(Debug, Clone)]
pub struct ObjectDescriptor {
    pub name: String,
    pub shader: ShaderSpec,
    /// OBJ path, relative to the asset root.
    pub mesh: PathBuf,
    /// Texture path, relative to the asset root.
    pub texture: PathBuf,
    pub translation: Vector3<f32>,
    /// Rotation about +Y in radians.
    pub angle: f32,
    pub scale: Vector3<f32>,
}

impl ObjectDescriptor {
    pub fn new(name: &str, mesh: impl Into<PathBuf>, texture: impl Into<PathBuf>) -> Self {
        Self {
            name: name.to_string(),
            shader: ShaderSpec::standard(),
            mesh: mesh.into(),
            texture: texture.into(),
            translation: Vector3::new(0.0, 0.0, 0.0),
            angle: 0.0,
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    pub fn with_shader(mut self, shader: ShaderSpec) -> Self {
        self.shader = shader;
        self
    }

    pub fn with_translation(mut self, x: f32, y: f32, z: f32) -> Self {
        self.translation = Vector3::new(x, y, z);
        self
    }

    pub fn with_angle(mut self, angle: f32) -> Self {
        self.angle = angle;
        self
    }

    pub fn with_uniform_scale(mut self, scale: f32) -> Self {
        self.scale = Vector3::new(scale, scale, scale);
        self
    }
}

#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub light: LightConfig,
    /// Directory every relative asset path is resolved against.
    pub asset_root: PathBuf,
    pub objects: Vec<ObjectDescriptor>,
    /// Texture of the paused banner, relative to the asset root.
    pub overlay_texture: PathBuf,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        let objects = vec![
            ObjectDescriptor::new(
                "table",
                "Obj/Meshes/dinertable.obj",
                "Obj/Textures/dinertable01_nv.png",
            )
            .with_uniform_scale(0.5),
            ObjectDescriptor::new("apple", "Obj/Meshes/apple.obj", "Obj/Textures/apple.png")
                .with_shader(ShaderSpec::blink())
                .with_translation(0.0, 34.0, 5.0),
            ObjectDescriptor::new(
                "book",
                "Obj/Meshes/Book.obj",
                "Obj/Textures/bookgeneric01.png",
            )
            .with_shader(ShaderSpec::shake())
            .with_translation(15.0, 29.0, 0.0)
            .with_angle(45.0),
            ObjectDescriptor::new("ragout", "Obj/Meshes/ragout.obj", "Obj/Textures/ratstew.png")
                .with_translation(-14.0, 30.0, -3.0),
        ];

        Self {
            window: WindowConfig::default(),
            camera: CameraConfig::default(),
            light: LightConfig::default(),
            asset_root: PathBuf::from("assets"),
            objects,
            overlay_texture: PathBuf::from("paused.png"),
        }
    }
}

impl ViewerConfig {
    pub fn with_asset_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.asset_root = root.into();
        self
    }

    /// Resolves an asset path against [`ViewerConfig::asset_root`].
    pub fn asset_path(&self, relative: &Path) -> PathBuf {
        self.asset_root.join(relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scene_matches_bundled_assets() {
        let config = ViewerConfig::default();
        let names: Vec<_> = config.objects.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["table", "apple", "book", "ragout"]);

        let table = &config.objects[0];
        assert_eq!(table.scale, Vector3::new(0.5, 0.5, 0.5));
        assert_eq!(config.objects[1].shader, ShaderSpec::blink());
        assert_eq!(config.objects[2].shader, ShaderSpec::shake());
        // Authored as a raw yaw value, not degrees.
        assert_eq!(config.objects[2].angle, 45.0);
    }

    #[test]
    fn test_asset_paths_resolve_against_root() {
        let config = ViewerConfig::default().with_asset_root("/data/scene");
        assert_eq!(
            config.asset_path(Path::new("paused.png")),
            PathBuf::from("/data/scene/paused.png")
        );
    }
}
