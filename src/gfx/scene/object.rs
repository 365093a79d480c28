//! Scene objects
//!
//! A [`SceneObject`] is a textured, lit mesh with its own shader program and
//! a public per-frame transform (scale, yaw angle, translation). It owns its
//! GPU handles and releases them when destroyed.

use cgmath::{InnerSpace, Matrix4, Vector3, Zero};
use image::{imageops, Rgba, Rgba32FImage, RgbaImage};

use crate::{
    error::ViewerError,
    gfx::{
        camera::ViewState,
        material::{LightConfig, Material},
        math,
        rendering::{binding::BindingContext, shaders::ShaderSpec},
        resources::{GeometryHandle, ProgramHandle, ResourceFactory, TextureHandle},
    },
};

use super::vertex::Vertex3D;

/// CPU-side mesh, interleaved and indexed, ready for upload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<Vertex3D>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new(vertices: Vec<Vertex3D>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.indices.is_empty()
    }

    /// Replaces every vertex normal with the average of the face normals of
    /// the triangles that use it.
    pub fn calculate_normals(&mut self) {
        let mut sums = vec![Vector3::<f32>::zero(); self.vertices.len()];
        let mut counts = vec![0u32; self.vertices.len()];

        for triangle in self.indices.chunks_exact(3) {
            let [i0, i1, i2] = [triangle[0] as usize, triangle[1] as usize, triangle[2] as usize];
            if i0 >= self.vertices.len() || i1 >= self.vertices.len() || i2 >= self.vertices.len() {
                continue;
            }

            let v0 = Vector3::from(self.vertices[i0].position);
            let v1 = Vector3::from(self.vertices[i1].position);
            let v2 = Vector3::from(self.vertices[i2].position);
            let face_normal = (v1 - v0).cross(v2 - v0);

            for index in [i0, i1, i2] {
                sums[index] += face_normal;
                counts[index] += 1;
            }
        }

        for (vertex, (sum, count)) in self.vertices.iter_mut().zip(sums.into_iter().zip(counts)) {
            if count == 0 {
                continue;
            }
            let average = sum / count as f32;
            if average.magnitude2() > 0.0 {
                vertex.normal = average.normalize().into();
            }
        }
    }
}

/// RGBA8 image with the origin at the top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl TextureImage {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, ViewerError> {
        if width == 0 || height == 0 {
            return Err(ViewerError::EmptyTexture);
        }
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(ViewerError::TextureSize {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn from_rgba(image: RgbaImage) -> Result<Self, ViewerError> {
        let (width, height) = image.dimensions();
        Self::new(width, height, image.into_raw())
    }

    /// Number of levels in a full chain down to 1x1.
    pub fn mip_level_count(&self) -> u32 {
        32 - self.width.max(self.height).max(1).leading_zeros()
    }

    /// Mip levels below the base image, largest first. Each level halves
    /// the previous one (rounding down, never below one pixel).
    ///
    /// Pixels are sRGB encoded, so filtering happens on linear color and the
    /// result is encoded again. Alpha is filtered as stored.
    pub fn mip_levels(&self) -> Vec<TextureImage> {
        let to_linear: [f32; 256] = std::array::from_fn(|i| srgb_to_linear(i as f32 / 255.0));
        let linear = Rgba32FImage::from_fn(self.width, self.height, |x, y| {
            let offset = (y as usize * self.width as usize + x as usize) * 4;
            let p = &self.pixels[offset..offset + 4];
            Rgba([
                to_linear[p[0] as usize],
                to_linear[p[1] as usize],
                to_linear[p[2] as usize],
                p[3] as f32 / 255.0,
            ])
        });

        (1..self.mip_level_count())
            .map(|level| {
                let width = (self.width >> level).max(1);
                let height = (self.height >> level).max(1);
                let resized = imageops::resize(&linear, width, height, imageops::FilterType::Triangle);
                let pixels = resized
                    .pixels()
                    .flat_map(|Rgba([r, g, b, a])| {
                        [
                            encode_unit(linear_to_srgb(*r)),
                            encode_unit(linear_to_srgb(*g)),
                            encode_unit(linear_to_srgb(*b)),
                            encode_unit(*a),
                        ]
                    })
                    .collect();
                TextureImage {
                    width,
                    height,
                    pixels,
                }
            })
            .collect()
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn linear_to_srgb(c: f32) -> f32 {
    if c <= 0.0031308 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

fn encode_unit(c: f32) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    pub direction: [f32; 4],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
}

impl From<&LightConfig> for LightUniform {
    fn from(light: &LightConfig) -> Self {
        Self {
            direction: extend(light.direction),
            ambient: extend(light.ambient),
            diffuse: extend(light.diffuse),
            specular: extend(light.specular),
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
}

impl From<&Material> for MaterialUniform {
    fn from(material: &Material) -> Self {
        Self {
            ambient: extend(material.ambient),
            diffuse: extend(material.diffuse),
            specular: extend(material.specular),
        }
    }
}

/// Per-object uniform block. Layout mirrors `ObjectUniform` in `object.wgsl`
/// (WGSL `vec3` members are padded to 16 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub transform_with_projection: [[f32; 4]; 4],
    pub transform: [[f32; 4]; 4],
    pub transform_normal: [[f32; 4]; 4],
    /// Camera position in world space.
    pub view: [f32; 3],
    pub time: f32,
    pub light: LightUniform,
    pub material: MaterialUniform,
    pub shininess: f32,
    pub _padding: [f32; 3],
}

fn extend(v: [f32; 3]) -> [f32; 4] {
    [v[0], v[1], v[2], 0.0]
}

pub struct SceneObject {
    pub name: String,
    program: ProgramHandle,
    texture: TextureHandle,
    geometry: GeometryHandle,
    index_count: u32,
    material: Material,
    pub scale: Vector3<f32>,
    /// Rotation about +Y, in radians.
    pub angle: f32,
    pub translation: Vector3<f32>,
}

impl SceneObject {
    /// Links the program and uploads geometry and texture.
    ///
    /// On failure, anything already created is released before returning.
    pub fn load(
        factory: &mut impl ResourceFactory,
        name: &str,
        shader: &ShaderSpec,
        mesh: &MeshData,
        texture: &TextureImage,
        material: Material,
    ) -> Result<Self, ViewerError> {
        let program = factory.create_program(shader)?;
        let texture = match factory.create_texture(name, texture) {
            Ok(texture) => texture,
            Err(err) => {
                factory.destroy_program(program);
                return Err(err);
            }
        };
        let geometry = factory.create_geometry(
            name,
            bytemuck::cast_slice(&mesh.vertices),
            &mesh.indices,
        );

        log::debug!(
            "Loaded object '{}': {} vertices, {} triangles, shader '{}'",
            name,
            mesh.vertices.len(),
            mesh.indices.len() / 3,
            shader.label
        );

        Ok(Self {
            name: name.to_string(),
            program,
            texture,
            geometry,
            index_count: mesh.indices.len() as u32,
            material,
            scale: Vector3::new(1.0, 1.0, 1.0),
            angle: 0.0,
            translation: Vector3::zero(),
        })
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    pub fn program(&self) -> ProgramHandle {
        self.program
    }

    pub fn texture(&self) -> TextureHandle {
        self.texture
    }

    pub fn geometry(&self) -> GeometryHandle {
        self.geometry
    }

    pub fn model_matrix(&self) -> Matrix4<f32> {
        math::compose(self.translation, self.angle, self.scale)
    }

    pub fn normal_matrix(&self) -> Matrix4<f32> {
        let s = self.scale;
        if s.x == s.y && s.y == s.z {
            math::uniform_scale_normal_matrix(self.angle, s.x)
        } else {
            math::normal_matrix(self.model_matrix())
        }
    }

    pub fn uniforms(
        &self,
        view_state: &ViewState,
        projection: Matrix4<f32>,
        elapsed: f32,
        light: &LightConfig,
    ) -> ObjectUniform {
        let model = self.model_matrix();
        ObjectUniform {
            transform_with_projection: math::matrix4_to_array(projection * view_state.view * model),
            transform: math::matrix4_to_array(model),
            transform_normal: math::matrix4_to_array(self.normal_matrix()),
            view: view_state.position.into(),
            time: elapsed,
            light: LightUniform::from(light),
            material: MaterialUniform::from(&self.material),
            shininess: self.material.shininess,
            _padding: [0.0; 3],
        }
    }

    /// Issues the complete bind/upload/draw sequence for this object.
    pub fn render(
        &self,
        ctx: &mut impl BindingContext,
        view_state: &ViewState,
        projection: Matrix4<f32>,
        elapsed: f32,
        light: &LightConfig,
    ) {
        let uniforms = self.uniforms(view_state, projection, elapsed, light);
        ctx.bind_program(self.program);
        ctx.upload_uniforms(bytemuck::bytes_of(&uniforms));
        ctx.bind_texture(self.texture);
        ctx.bind_geometry(self.geometry);
        ctx.draw_indexed(self.index_count);
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
    use crate::gfx::{
        math::tests::{assert_close, assert_vec3_close},
        testing::{MockFactory, Op, RecordingContext},
    };
    use cgmath::{Deg, Matrix, Rad, SquareMatrix, Vector4};

    fn triangle() -> MeshData {
        let vertex = |x: f32, z: f32| Vertex3D {
            position: [x, 0.0, z],
            ..Default::default()
        };
        MeshData::new(vec![vertex(0.0, 0.0), vertex(0.0, 1.0), vertex(1.0, 0.0)], vec![0, 1, 2])
    }

    fn checker() -> TextureImage {
        TextureImage::new(2, 2, vec![255; 16]).unwrap()
    }

    fn load(factory: &mut MockFactory) -> SceneObject {
        SceneObject::load(
            factory,
            "triangle",
            &ShaderSpec::standard(),
            &triangle(),
            &checker(),
            Material::default(),
        )
        .unwrap()
    }

    fn view_state() -> ViewState {
        ViewState {
            position: Vector3::new(0.0, 0.0, 10.0),
            view: Matrix4::identity(),
        }
    }

    #[test]
    fn test_uniform_layout_matches_shader() {
        assert_eq!(std::mem::size_of::<LightUniform>(), 64);
        assert_eq!(std::mem::size_of::<MaterialUniform>(), 48);
        assert_eq!(std::mem::size_of::<ObjectUniform>(), 336);
        assert_eq!(std::mem::offset_of!(ObjectUniform, view), 192);
        assert_eq!(std::mem::offset_of!(ObjectUniform, light), 208);
        assert_eq!(std::mem::offset_of!(ObjectUniform, material), 272);
        assert_eq!(std::mem::offset_of!(ObjectUniform, shininess), 320);
    }

    #[test]
    fn test_calculate_normals_faces_up() {
        let mut mesh = triangle();
        mesh.calculate_normals();
        for vertex in &mesh.vertices {
            assert_vec3_close(Vector3::from(vertex.normal), Vector3::new(0.0, 1.0, 0.0));
        }
    }

    #[test]
    fn test_texture_image_rejects_bad_buffers() {
        assert!(matches!(
            TextureImage::new(2, 2, vec![0; 15]),
            Err(ViewerError::TextureSize {
                expected: 16,
                actual: 15
            })
        ));
        assert!(matches!(TextureImage::new(0, 4, vec![]), Err(ViewerError::EmptyTexture)));
    }

    #[test]
    fn test_mip_levels_halve_down_to_one_pixel() {
        let image = TextureImage::new(8, 2, vec![128; 8 * 2 * 4]).unwrap();
        let levels = image.mip_levels();
        let sizes: Vec<_> = levels.iter().map(|l| (l.width, l.height)).collect();
        assert_eq!(sizes, vec![(4, 1), (2, 1), (1, 1)]);
        assert_eq!(levels.len() as u32 + 1, image.mip_level_count());
        for level in &levels {
            assert_eq!(level.pixels.len(), (level.width * level.height * 4) as usize);
        }
    }

    #[test]
    fn test_mip_levels_average_in_linear_space() {
        // One black and one white pixel, both opaque.
        let image = TextureImage::new(2, 1, vec![0, 0, 0, 255, 255, 255, 255, 255]).unwrap();
        let levels = image.mip_levels();
        assert_eq!(levels.len(), 1);

        // Linear 0.5 encodes to about 188; averaging the encoded bytes would give 128.
        let pixel = &levels[0].pixels;
        for channel in &pixel[..3] {
            assert!((*channel as i32 - 188).abs() <= 1, "got {channel}");
        }
        assert_eq!(pixel[3], 255);
    }

    #[test]
    fn test_mip_levels_keep_flat_colors() {
        let image = TextureImage::new(4, 4, [200, 30, 90, 64].repeat(16)).unwrap();
        for level in image.mip_levels() {
            for pixel in level.pixels.chunks_exact(4) {
                for (got, want) in pixel.iter().zip([200u8, 30, 90, 64]) {
                    assert!((*got as i32 - want as i32).abs() <= 1, "got {got}, want {want}");
                }
            }
        }
    }

    #[test]
    fn test_model_matrix_scales_rotates_then_translates() {
        let mut factory = MockFactory::new();
        let mut object = load(&mut factory);
        object.scale = Vector3::new(2.0, 2.0, 2.0);
        object.angle = Rad::from(Deg(90.0)).0;
        object.translation = Vector3::new(1.0, 2.0, 3.0);

        let p = object.model_matrix() * Vector4::new(1.0, 0.0, 0.0, 1.0);
        // (1,0,0) scaled to (2,0,0), yawed to (0,0,2), then moved.
        assert_vec3_close(p.truncate(), Vector3::new(1.0, 2.0, 5.0));
    }

    #[test]
    fn test_normal_matrix_paths_agree_for_uniform_scale() {
        let mut factory = MockFactory::new();
        let mut object = load(&mut factory);
        object.scale = Vector3::new(0.5, 0.5, 0.5);
        object.angle = 0.7;
        object.translation = Vector3::new(4.0, -2.0, 9.0);

        let fast = object.normal_matrix();
        let general = math::normal_matrix(object.model_matrix());
        for col in 0..3 {
            for row in 0..3 {
                assert_close(fast[col][row], general[col][row]);
            }
        }
    }

    #[test]
    fn test_normal_matrix_for_non_uniform_scale_is_inverse_transpose() {
        let mut factory = MockFactory::new();
        let mut object = load(&mut factory);
        object.scale = Vector3::new(1.0, 2.0, 4.0);
        let expected = object.model_matrix().invert().unwrap().transpose();
        assert_eq!(object.normal_matrix(), expected);
    }

    #[test]
    fn test_render_sequence() {
        let mut factory = MockFactory::new();
        let object = load(&mut factory);
        let mut ctx = RecordingContext::new();

        object.render(&mut ctx, &view_state(), Matrix4::identity(), 1.5, &LightConfig::default());

        assert_eq!(ctx.ops.len(), 5);
        assert_eq!(ctx.ops[0], Op::BindProgram(object.program()));
        assert!(matches!(&ctx.ops[1], Op::Upload(bytes) if bytes.len() == 336));
        assert_eq!(ctx.ops[2], Op::BindTexture(object.texture()));
        assert_eq!(ctx.ops[3], Op::BindGeometry(object.geometry()));
        assert_eq!(ctx.ops[4], Op::Draw(3));
    }

    #[test]
    fn test_uniforms_carry_camera_light_and_material() {
        let mut factory = MockFactory::new();
        let mut object = load(&mut factory);
        object.translation = Vector3::new(0.0, 5.0, 0.0);
        let light = LightConfig::default();

        let uniforms = object.uniforms(&view_state(), Matrix4::from_scale(2.0), 3.0, &light);
        assert_eq!(uniforms.view, [0.0, 0.0, 10.0]);
        assert_eq!(uniforms.time, 3.0);
        assert_eq!(uniforms.light.direction, [1.0, -1.0, -1.0, 0.0]);
        assert_eq!(uniforms.shininess, 1.0);
        assert_eq!(uniforms.transform[3], [0.0, 5.0, 0.0, 1.0]);
        // P * V * M with P scaling xyz by 2 and V = I.
        assert_eq!(uniforms.transform_with_projection[3], [0.0, 10.0, 0.0, 1.0]);
    }

    #[test]
    fn test_destroy_releases_every_handle() {
        let mut factory = MockFactory::new();
        let object = load(&mut factory);
        assert_eq!(factory.live_count(), 3);
        object.destroy(&mut factory);
        assert_eq!(factory.live_count(), 0);
    }

    #[test]
    fn test_link_failure_is_reported() {
        let mut factory = MockFactory::failing_program("standard");
        let result = SceneObject::load(
            &mut factory,
            "triangle",
            &ShaderSpec::standard(),
            &triangle(),
            &checker(),
            Material::default(),
        );
        assert!(matches!(result, Err(ViewerError::ShaderLink { .. })));
        assert_eq!(factory.live_count(), 0);
    }
}
