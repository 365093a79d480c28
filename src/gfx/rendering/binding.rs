//! Per-frame binding context
//!
//! All draw-time GPU state goes through a [`BindingContext`]: it is reset
//! when the frame is cleared, mutated by each render call, and discarded
//! when the frame ends. Render code never assumes a binding survives from a
//! previous call; every object binds its own program, texture and geometry.

use thiserror::Error;

use crate::gfx::resources::{GeometryHandle, ProgramHandle, TextureHandle};

pub const CLEAR_COLOR: wgpu::Color = wgpu::Color::BLACK;

pub trait BindingContext {
    /// Starts the frame: clears color and depth and forgets every binding.
    fn clear(&mut self, color: wgpu::Color);

    fn bind_program(&mut self, program: ProgramHandle);

    /// Writes the uniform block of the currently bound program.
    fn upload_uniforms(&mut self, data: &[u8]);

    fn bind_texture(&mut self, texture: TextureHandle);

    fn bind_geometry(&mut self, geometry: GeometryHandle);

    /// Indexed draw over `0..index_count` of the bound geometry.
    fn draw_indexed(&mut self, index_count: u32);
}

/// What is currently bound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BindingState {
    pub program: Option<ProgramHandle>,
    pub texture: Option<TextureHandle>,
    pub geometry: Option<GeometryHandle>,
}

/// Reason a draw or upload cannot be issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BindingError {
    #[error("no program bound")]
    NoProgram,
    #[error("no texture bound")]
    NoTexture,
    #[error("no geometry bound")]
    NoGeometry,
}

impl BindingState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Binding a new program invalidates the texture binding: textures are
    /// bound against a program's layout.
    pub fn bind_program(&mut self, program: ProgramHandle) {
        if self.program != Some(program) {
            self.texture = None;
        }
        self.program = Some(program);
    }

    pub fn bind_texture(&mut self, texture: TextureHandle) {
        self.texture = Some(texture);
    }

    pub fn bind_geometry(&mut self, geometry: GeometryHandle) {
        self.geometry = Some(geometry);
    }

    pub fn require_program(&self) -> Result<ProgramHandle, BindingError> {
        self.program.ok_or(BindingError::NoProgram)
    }

    /// Checks that a draw has exactly one program, texture and geometry.
    pub fn validate_draw(&self) -> Result<(ProgramHandle, TextureHandle, GeometryHandle), BindingError> {
        let program = self.require_program()?;
        let texture = self.texture.ok_or(BindingError::NoTexture)?;
        let geometry = self.geometry.ok_or(BindingError::NoGeometry)?;
        Ok((program, texture, geometry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_requires_every_binding() {
        let mut state = BindingState::default();
        assert_eq!(state.validate_draw(), Err(BindingError::NoProgram));

        state.bind_program(ProgramHandle(1));
        assert_eq!(state.validate_draw(), Err(BindingError::NoTexture));

        state.bind_texture(TextureHandle(2));
        assert_eq!(state.validate_draw(), Err(BindingError::NoGeometry));

        state.bind_geometry(GeometryHandle(3));
        assert_eq!(
            state.validate_draw(),
            Ok((ProgramHandle(1), TextureHandle(2), GeometryHandle(3)))
        );
    }

    #[test]
    fn test_switching_program_drops_texture() {
        let mut state = BindingState::default();
        state.bind_program(ProgramHandle(1));
        state.bind_texture(TextureHandle(1));
        state.bind_geometry(GeometryHandle(1));

        state.bind_program(ProgramHandle(1));
        assert_eq!(state.texture, Some(TextureHandle(1)));

        state.bind_program(ProgramHandle(2));
        assert_eq!(state.texture, None);
        assert_eq!(state.validate_draw(), Err(BindingError::NoTexture));
    }

    #[test]
    fn test_binding_errors_name_the_missing_binding() {
        assert_eq!(BindingError::NoProgram.to_string(), "no program bound");
        assert_eq!(BindingError::NoTexture.to_string(), "no texture bound");
        assert_eq!(BindingError::NoGeometry.to_string(), "no geometry bound");
    }

    #[test]
    fn test_reset_forgets_everything() {
        let mut state = BindingState::default();
        state.bind_program(ProgramHandle(1));
        state.bind_texture(TextureHandle(1));
        state.bind_geometry(GeometryHandle(1));
        state.reset();
        assert_eq!(state, BindingState::default());
    }
}
