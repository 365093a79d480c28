/// Uniform buffer holding one program's uniform block.
///
/// The block layout is owned by the program, so the buffer is sized in
/// bytes rather than by a Rust type.
pub struct UniformBuffer {
    buffer: wgpu::Buffer,
    previous_content: Vec<u8>,
}

impl UniformBuffer {
    pub fn new(device: &wgpu::Device, label: &str, size: usize) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("UniformBuffer: {}", label)),
            size: size as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        UniformBuffer {
            buffer,
            previous_content: Vec::new(),
        }
    }

    /// Writes `content` unless it matches what was written last.
    ///
    /// Returns `false` when the content does not fit the buffer.
    pub fn update_content(&mut self, queue: &wgpu::Queue, content: &[u8]) -> bool {
        if content.len() as u64 > self.buffer.size() {
            return false;
        }
        if self.previous_content == content {
            return true;
        }
        queue.write_buffer(&self.buffer, 0, content);
        self.previous_content = content.to_vec();
        true
    }

    pub fn binding_resource(&self) -> wgpu::BindingResource<'_> {
        self.buffer.as_entire_binding()
    }
}
