use rand::Rng;

pub const PARTICLE_COUNT: usize = 10_000;

/// Per-particle attributes interleaved for the instance buffer
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ParticleInstance {
    pub position: [f32; 3],
    pub size: f32,
    pub random: [f32; 3],
    pub _pad: f32,
}

/// Get the instance buffer layout for ParticleInstance
pub fn particle_instance_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<ParticleInstance>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &[
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x3,
                offset: 0,
                shader_location: 1, // position
            },
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32,
                offset: 12,
                shader_location: 2, // size
            },
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x3,
                offset: 16,
                shader_location: 3, // random
            },
        ],
    }
}

/// Attribute arrays for the particle cloud, generated once at startup and
/// never mutated. Each particle is an independent uniform draw: position
/// components in [-0.5, 0.5], a random 3-vector in [0, 1] used as shader
/// entropy, and a size in [0.5, 1.0].
#[derive(Debug, Clone)]
pub struct ParticleCloud {
    pub positions: Vec<f32>,
    pub randoms: Vec<f32>,
    pub sizes: Vec<f32>,
}

impl ParticleCloud {
    pub fn generate(count: usize, rng: &mut impl Rng) -> Self {
        let mut positions = Vec::with_capacity(count * 3);
        let mut randoms = Vec::with_capacity(count * 3);
        let mut sizes = Vec::with_capacity(count);

        for _ in 0..count {
            positions.push(rng.gen::<f32>() - 0.5);
            positions.push(rng.gen::<f32>() - 0.5);
            positions.push(rng.gen::<f32>() - 0.5);

            randoms.push(rng.gen::<f32>());
            randoms.push(rng.gen::<f32>());
            randoms.push(rng.gen::<f32>());

            sizes.push(0.5 + 0.5 * rng.gen::<f32>());
        }

        Self {
            positions,
            randoms,
            sizes,
        }
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// Interleave the attribute arrays for GPU upload.
    pub fn instances(&self) -> Vec<ParticleInstance> {
        (0..self.len())
            .map(|i| ParticleInstance {
                position: [
                    self.positions[i * 3],
                    self.positions[i * 3 + 1],
                    self.positions[i * 3 + 2],
                ],
                size: self.sizes[i],
                random: [
                    self.randoms[i * 3],
                    self.randoms[i * 3 + 1],
                    self.randoms[i * 3 + 2],
                ],
                _pad: 0.0,
            })
            .collect()
    }
}
