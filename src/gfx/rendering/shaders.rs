//! Shader program descriptions
//!
//! WGSL sources are embedded at compile time. A [`ShaderSpec`] picks the
//! source, the vertex and fragment entry points, and the kind of program
//! (which fixes the vertex layout, uniform block and raster state).

pub const OBJECT_SHADER: &str = include_str!("shaders/object.wgsl");
pub const OVERLAY_SHADER: &str = include_str!("shaders/overlay.wgsl");

/// Fixed-function configuration a program is linked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgramKind {
    /// Lit, textured, depth-tested mesh using `Vertex3D` and `ObjectUniform`.
    Mesh,
    /// Alpha-blended screen-space quad using `Vertex2D` and `OverlayUniform`,
    /// drawn over everything.
    Overlay,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSpec {
    pub label: &'static str,
    pub source: &'static str,
    pub vertex_entry: &'static str,
    pub fragment_entry: &'static str,
    pub kind: ProgramKind,
}

impl ShaderSpec {
    /// Phong-lit textured mesh.
    pub fn standard() -> Self {
        Self {
            label: "standard",
            source: OBJECT_SHADER,
            vertex_entry: "vs_main",
            fragment_entry: "fs_main",
            kind: ProgramKind::Mesh,
        }
    }

    /// Standard vertex stage with a brightness pulse over time.
    pub fn blink() -> Self {
        Self {
            label: "blink",
            fragment_entry: "fs_blink",
            ..Self::standard()
        }
    }

    /// Vertices jitter over time; standard fragment stage.
    pub fn shake() -> Self {
        Self {
            label: "shake",
            vertex_entry: "vs_shake",
            ..Self::standard()
        }
    }

    pub fn overlay() -> Self {
        Self {
            label: "overlay",
            source: OVERLAY_SHADER,
            vertex_entry: "vs_main",
            fragment_entry: "fs_main",
            kind: ProgramKind::Overlay,
        }
    }
}
