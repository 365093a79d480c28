//! "Paused" banner drawn over the scene while movement is disabled.

use crate::{
    error::ViewerError,
    gfx::{
        rendering::{binding::BindingContext, shaders::ShaderSpec},
        resources::{GeometryHandle, ProgramHandle, ResourceFactory, TextureHandle},
    },
};

use super::{object::TextureImage, vertex::Vertex2D};

const WHITE: [f32; 3] = [1.0, 1.0, 1.0];

/// Banner quad in normalized device coordinates, near the top of the screen.
const QUAD_VERTICES: [Vertex2D; 4] = [
    Vertex2D {
        position: [-0.265, 0.8],
        color: WHITE,
        tex_coords: [0.0, 0.0],
    },
    Vertex2D {
        position: [-0.265, 0.7],
        color: WHITE,
        tex_coords: [0.0, 1.0],
    },
    Vertex2D {
        position: [0.265, 0.7],
        color: WHITE,
        tex_coords: [1.0, 1.0],
    },
    Vertex2D {
        position: [0.265, 0.8],
        color: WHITE,
        tex_coords: [1.0, 0.0],
    },
];

const QUAD_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

/// The banner is static; `time` is always uploaded as zero.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct OverlayUniform {
    pub time: f32,
    pub _padding: [f32; 3],
}

pub struct PauseOverlay {
    program: ProgramHandle,
    texture: TextureHandle,
    geometry: GeometryHandle,
}

impl PauseOverlay {
    pub fn load(factory: &mut impl ResourceFactory, image: &TextureImage) -> Result<Self, ViewerError> {
        let program = factory.create_program(&ShaderSpec::overlay())?;
        let texture = match factory.create_texture("pause overlay", image) {
            Ok(texture) => texture,
            Err(err) => {
                factory.destroy_program(program);
                return Err(err);
            }
        };
        let geometry = factory.create_geometry(
            "pause overlay",
            bytemuck::cast_slice(&QUAD_VERTICES),
            &QUAD_INDICES,
        );

        Ok(Self {
            program,
            texture,
            geometry,
        })
    }

    pub fn render(&self, ctx: &mut impl BindingContext) {
        let uniform = OverlayUniform::default();
        ctx.bind_program(self.program);
        ctx.upload_uniforms(bytemuck::bytes_of(&uniform));
        ctx.bind_texture(self.texture);
        ctx.bind_geometry(self.geometry);
        ctx.draw_indexed(QUAD_INDICES.len() as u32);
    }

    pub fn program(&self) -> ProgramHandle {
        self.program
    }

    pub fn destroy(self, factory: &mut impl ResourceFactory) {
        factory.destroy_geometry(self.geometry);
        factory.destroy_texture(self.texture);
        factory.destroy_program(self.program);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::testing::{MockFactory, Op, RecordingContext};

    #[test]
    fn test_quad_spans_banner_area() {
        let xs: Vec<_> = QUAD_VERTICES.iter().map(|v| v.position[0]).collect();
        let ys: Vec<_> = QUAD_VERTICES.iter().map(|v| v.position[1]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::MAX, f32::min), -0.265);
        assert_eq!(xs.iter().cloned().fold(f32::MIN, f32::max), 0.265);
        assert_eq!(ys.iter().cloned().fold(f32::MAX, f32::min), 0.7);
        assert_eq!(ys.iter().cloned().fold(f32::MIN, f32::max), 0.8);
        assert!(QUAD_VERTICES.iter().all(|v| v.color == WHITE));
    }

    #[test]
    fn test_overlay_draws_six_indices_with_overlay_program() {
        let mut factory = MockFactory::new();
        let image = TextureImage::new(1, 1, vec![255; 4]).unwrap();
        let overlay = PauseOverlay::load(&mut factory, &image).unwrap();
        assert_eq!(factory.program_labels, vec!["overlay"]);

        let mut ctx = RecordingContext::new();
        overlay.render(&mut ctx);
        assert_eq!(ctx.ops.first(), Some(&Op::BindProgram(overlay.program())));
        assert_eq!(ctx.ops[1], Op::Upload(vec![0; std::mem::size_of::<OverlayUniform>()]));
        assert_eq!(ctx.ops.last(), Some(&Op::Draw(6)));

        overlay.destroy(&mut factory);
        assert_eq!(factory.live_count(), 0);
    }
}
