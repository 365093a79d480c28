use std::path::PathBuf;

use thiserror::Error;

/// Load-time failures. Any of these aborts scene construction.
#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("failed to load mesh {path}: {source}")]
    MeshLoad {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },

    #[error("failed to load materials for {path}: {source}")]
    MaterialLoad {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },

    #[error("mesh {path} has no material")]
    MissingMaterial { path: PathBuf },

    #[error("mesh {path} contains no geometry")]
    EmptyMesh { path: PathBuf },

    #[error("failed to decode texture {path}: {source}")]
    TextureDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("texture has zero width or height")]
    EmptyTexture,

    #[error("texture data is {actual} bytes, expected {expected}")]
    TextureSize { expected: usize, actual: usize },

    #[error("texture is {width}x{height}, device limit is {max}")]
    TextureTooLarge { width: u32, height: u32, max: u32 },

    #[error("shader program '{label}' failed to link: {message}")]
    ShaderLink { label: String, message: String },
}
