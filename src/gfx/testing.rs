//! GPU-free stand-ins for the resource factory and binding context.

use std::collections::BTreeSet;

use crate::{
    error::ViewerError,
    gfx::{
        rendering::{
            binding::{BindingContext, BindingState},
            shaders::ShaderSpec,
        },
        resources::{GeometryHandle, ProgramHandle, ResourceFactory, TextureHandle},
        scene::object::TextureImage,
    },
};

/// Hands out sequential ids and remembers which ones are still alive.
#[derive(Debug, Default)]
pub struct MockFactory {
    next_id: u32,
    pub programs: BTreeSet<u32>,
    pub textures: BTreeSet<u32>,
    pub geometries: BTreeSet<u32>,
    pub program_labels: Vec<&'static str>,
    /// Makes `create_program` fail for this shader label.
    pub fail_program: Option<&'static str>,
}

impl MockFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_program(label: &'static str) -> Self {
        Self {
            fail_program: Some(label),
            ..Self::default()
        }
    }

    pub fn live_count(&self) -> usize {
        self.programs.len() + self.textures.len() + self.geometries.len()
    }

    fn allocate(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }
}

impl ResourceFactory for MockFactory {
    fn create_program(&mut self, spec: &ShaderSpec) -> Result<ProgramHandle, ViewerError> {
        if self.fail_program == Some(spec.label) {
            return Err(ViewerError::ShaderLink {
                label: spec.label.to_string(),
                message: "mock link failure".to_string(),
            });
        }
        let id = self.allocate();
        self.programs.insert(id);
        self.program_labels.push(spec.label);
        Ok(ProgramHandle(id))
    }

    fn create_geometry(&mut self, _label: &str, _vertices: &[u8], _indices: &[u32]) -> GeometryHandle {
        let id = self.allocate();
        self.geometries.insert(id);
        GeometryHandle(id)
    }

    fn create_texture(
        &mut self,
        _label: &str,
        _image: &TextureImage,
    ) -> Result<TextureHandle, ViewerError> {
        let id = self.allocate();
        self.textures.insert(id);
        Ok(TextureHandle(id))
    }

    fn destroy_program(&mut self, program: ProgramHandle) {
        assert!(self.programs.remove(&program.0), "program {program:?} released twice");
    }

    fn destroy_geometry(&mut self, geometry: GeometryHandle) {
        assert!(self.geometries.remove(&geometry.0), "geometry {geometry:?} released twice");
    }

    fn destroy_texture(&mut self, texture: TextureHandle) {
        assert!(self.textures.remove(&texture.0), "texture {texture:?} released twice");
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Clear,
    BindProgram(ProgramHandle),
    Upload(Vec<u8>),
    BindTexture(TextureHandle),
    BindGeometry(GeometryHandle),
    Draw(u32),
}

/// Records every call and checks that draws see a complete binding.
#[derive(Debug, Default)]
pub struct RecordingContext {
    pub ops: Vec<Op>,
    state: BindingState,
}

impl RecordingContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draws(&self) -> Vec<(ProgramHandle, TextureHandle, GeometryHandle, u32)> {
        let mut state = BindingState::default();
        let mut draws = Vec::new();
        for op in &self.ops {
            match op {
                Op::Clear => state.reset(),
                Op::BindProgram(p) => state.bind_program(*p),
                Op::BindTexture(t) => state.bind_texture(*t),
                Op::BindGeometry(g) => state.bind_geometry(*g),
                Op::Upload(_) => {}
                Op::Draw(count) => {
                    if let Ok((p, t, g)) = state.validate_draw() {
                        draws.push((p, t, g, *count));
                    }
                }
            }
        }
        draws
    }
}

impl BindingContext for RecordingContext {
    fn clear(&mut self, _color: wgpu::Color) {
        self.state.reset();
        self.ops.push(Op::Clear);
    }

    fn bind_program(&mut self, program: ProgramHandle) {
        self.state.bind_program(program);
        self.ops.push(Op::BindProgram(program));
    }

    fn upload_uniforms(&mut self, data: &[u8]) {
        assert!(self.state.require_program().is_ok(), "upload without a program");
        self.ops.push(Op::Upload(data.to_vec()));
    }

    fn bind_texture(&mut self, texture: TextureHandle) {
        self.state.bind_texture(texture);
        self.ops.push(Op::BindTexture(texture));
    }

    fn bind_geometry(&mut self, geometry: GeometryHandle) {
        self.state.bind_geometry(geometry);
        self.ops.push(Op::BindGeometry(geometry));
    }

    fn draw_indexed(&mut self, index_count: u32) {
        assert!(
            self.state.validate_draw().is_ok(),
            "draw with incomplete binding: {:?}",
            self.state
        );
        self.ops.push(Op::Draw(index_count));
    }
}
