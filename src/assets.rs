//! Asset loading: Wavefront OBJ/MTL meshes and RGBA textures.
//!
//! Meshes are authored Z-up; everything is converted to the viewer's Y-up
//! frame on load with `(x, y, z) -> (x, z, -y)`. Texture coordinates are
//! kept as authored: images are uploaded top row first, so `v = 0` samples
//! the top of the image.

use std::path::Path;

use crate::{
    error::ViewerError,
    gfx::{
        material::Material,
        scene::{
            object::{MeshData, TextureImage},
            vertex::Vertex3D,
        },
    },
};

/// Geometry plus the material it is shaded with.
#[derive(Debug, Clone)]
pub struct LoadedMesh {
    pub mesh: MeshData,
    pub material: Material,
}

fn load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        triangulate: true,
        single_index: true,
        ..Default::default()
    }
}

pub fn load_mesh(path: &Path) -> Result<LoadedMesh, ViewerError> {
    let (models, materials) = tobj::load_obj(path, &load_options()).map_err(|source| {
        ViewerError::MeshLoad {
            path: path.to_path_buf(),
            source,
        }
    })?;
    mesh_from_models(path, &models, materials)
}

/// Merges every shape into one mesh and picks the first material.
pub fn mesh_from_models(
    path: &Path,
    models: &[tobj::Model],
    materials: Result<Vec<tobj::Material>, tobj::LoadError>,
) -> Result<LoadedMesh, ViewerError> {
    let materials = materials.map_err(|source| ViewerError::MaterialLoad {
        path: path.to_path_buf(),
        source,
    })?;
    let material = materials
        .first()
        .map(Material::from)
        .ok_or_else(|| ViewerError::MissingMaterial {
            path: path.to_path_buf(),
        })?;

    let mut mesh = MeshData::default();

    for model in models {
        let mut part = shape_to_mesh(&model.mesh);
        if part.vertices.is_empty() {
            continue;
        }
        if model.mesh.normals.len() != model.mesh.positions.len() {
            log::debug!("Shape '{}' has no normals, computing them from faces", model.name);
            part.calculate_normals();
        }

        let base = mesh.vertices.len() as u32;
        mesh.vertices.extend(part.vertices);
        mesh.indices.extend(part.indices.iter().map(|&index| base + index));
    }

    if mesh.is_empty() {
        return Err(ViewerError::EmptyMesh {
            path: path.to_path_buf(),
        });
    }

    log::debug!(
        "Loaded {}: {} shapes, {} vertices, material '{}'",
        path.display(),
        models.len(),
        mesh.vertices.len(),
        materials[0].name
    );

    Ok(LoadedMesh { mesh, material })
}

/// Converts one single-indexed shape to the Y-up frame.
fn shape_to_mesh(source: &tobj::Mesh) -> MeshData {
    let vertex_count = source.positions.len() / 3;
    let has_normals = source.normals.len() == source.positions.len();
    let has_tex_coords = source.texcoords.len() / 2 == vertex_count;

    let vertices = (0..vertex_count)
        .map(|i| {
            let p = &source.positions[i * 3..i * 3 + 3];
            let normal = if has_normals {
                let n = &source.normals[i * 3..i * 3 + 3];
                [n[0], n[2], -n[1]]
            } else {
                [0.0; 3]
            };
            let tex_coords = if has_tex_coords {
                [source.texcoords[i * 2], source.texcoords[i * 2 + 1]]
            } else {
                [0.0; 2]
            };
            Vertex3D {
                position: [p[0], p[2], -p[1]],
                normal,
                tex_coords,
            }
        })
        .collect();

    MeshData::new(vertices, source.indices.clone())
}

pub fn load_texture(path: &Path) -> Result<TextureImage, ViewerError> {
    let image = image::open(path).map_err(|source| ViewerError::TextureDecode {
        path: path.to_path_buf(),
        source,
    })?;
    let texture = TextureImage::from_rgba(image.into_rgba8())?;
    log::debug!("Loaded texture {} ({}x{})", path.display(), texture.width, texture.height);
    Ok(texture)
}
