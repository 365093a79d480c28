//! Phong material and light descriptors
//!
//! A [`Material`] is read once from the MTL record of a mesh and stays
//! read-only for the lifetime of its scene object. [`LightConfig`] is the
//! single directional light shared by every object.

/// Phong material: three color triples and a specular exponent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub ambient: [f32; 3],
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
    pub shininess: f32,
}

impl Default for Material {
    /// MTL defaults for a record with no color statements.
    fn default() -> Self {
        Self {
            ambient: [0.0; 3],
            diffuse: [0.0; 3],
            specular: [0.0; 3],
            shininess: 1.0,
        }
    }
}

impl From<&tobj::Material> for Material {
    fn from(mtl: &tobj::Material) -> Self {
        let defaults = Material::default();
        Self {
            ambient: mtl.ambient.unwrap_or(defaults.ambient),
            diffuse: mtl.diffuse.unwrap_or(defaults.diffuse),
            specular: mtl.specular.unwrap_or(defaults.specular),
            shininess: mtl.shininess.unwrap_or(defaults.shininess),
        }
    }
}

/// Directional light configuration
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LightConfig {
    /// Direction the light travels in (not the direction towards it)
    pub direction: [f32; 3],
    pub ambient: [f32; 3],
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            direction: [1.0, -1.0, -1.0],
            ambient: [0.1, 0.1, 0.1],
            diffuse: [1.0, 1.0, 1.0],
            specular: [0.5, 0.5, 0.5],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_from_mtl_record() {
        let mtl = tobj::Material {
            ambient: Some([0.1, 0.2, 0.3]),
            diffuse: Some([0.6, 0.5, 0.4]),
            specular: None,
            shininess: Some(96.0),
            ..Default::default()
        };

        let material = Material::from(&mtl);
        assert_eq!(material.ambient, [0.1, 0.2, 0.3]);
        assert_eq!(material.diffuse, [0.6, 0.5, 0.4]);
        assert_eq!(material.specular, [0.0; 3]);
        assert_eq!(material.shininess, 96.0);
    }
}
