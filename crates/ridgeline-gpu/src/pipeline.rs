use ridgeline_core::constants::{shader_preamble, CHUNK_SIZE, GEN_WORKGROUP_SIZE};
use ridgeline_world::dispatch::{GenUniforms, GenerationBatch, GenerationRequest};

use crate::buffers::TerrainPool;

/// Stride between per-request uniform blocks. Dynamic uniform offsets must be
/// multiples of `min_uniform_buffer_offset_alignment` (256 on every backend).
pub const UNIFORM_STRIDE: u64 = 256;

/// Compute pipeline that fills pool slots with height-field vertices.
///
/// One uniform block per request is written into a dynamic-offset uniform
/// buffer sized for a full pool, so a cold start fits in a single submission.
pub struct TerrainGenerator {
    pipeline: wgpu::ComputePipeline,
    bind_group: wgpu::BindGroup,
    uniform_buffer: wgpu::Buffer,
    /// Uniform blocks available per submission.
    capacity: u32,
    /// Staging bytes reused across dispatches.
    staging: Vec<u8>,
    dispatched: u64,
}

impl TerrainGenerator {
    /// Build the pipeline and bind it to the pool buffer (all at init time).
    pub fn new(device: &wgpu::Device, pool: &TerrainPool) -> Self {
        let capacity = pool.slot_count().max(1);

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("terrain-gen-uniforms"),
            size: capacity as u64 * UNIFORM_STRIDE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("terrain-gen-bind-group-layout"),
            entries: &[
                // binding 0: vertex pool (storage, read_write)
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: false },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                // binding 1: per-request parameters (uniform, dynamic offset)
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: wgpu::BufferSize::new(
                            std::mem::size_of::<GenUniforms>() as u64,
                        ),
                    },
                    count: None,
                },
            ],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("terrain-gen-bind-group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: pool.buffer().as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                        buffer: &uniform_buffer,
                        offset: 0,
                        size: wgpu::BufferSize::new(std::mem::size_of::<GenUniforms>() as u64),
                    }),
                },
            ],
        });

        // Compose shader: constants + noise + kernel
        let noise_wgsl = include_str!("../../../shaders/common/noise.wgsl");
        let generate_wgsl = include_str!("../../../shaders/terrain/generate.wgsl");
        let source = format!("{}\n{noise_wgsl}\n{generate_wgsl}", shader_preamble());

        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("terrain-gen-shader"),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("terrain-gen-pipeline-layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("terrain-gen-pipeline"),
            layout: Some(&layout),
            module: &module,
            entry_point: Some("main"),
            compilation_options: Default::default(),
            cache: None,
        });

        Self {
            pipeline,
            bind_group,
            uniform_buffer,
            capacity,
            staging: Vec::with_capacity((capacity as u64 * UNIFORM_STRIDE) as usize),
            dispatched: 0,
        }
    }

    /// Generate every chunk named by `batch` into its slot.
    ///
    /// Work is submitted before this returns. Later submissions on the same
    /// queue (the frame's draw calls) observe the finished vertex data.
    pub fn dispatch(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        pool: &mut TerrainPool,
        batch: &GenerationBatch,
    ) {
        if batch.is_empty() {
            return;
        }

        for requests in batch.requests.chunks(self.capacity as usize) {
            self.stage_uniforms(requests);
            queue.write_buffer(&self.uniform_buffer, 0, &self.staging);

            let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("terrain-gen-encoder"),
            });
            {
                let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                    label: Some("terrain-gen-pass"),
                    timestamp_writes: None,
                });
                pass.set_pipeline(&self.pipeline);
                for i in 0..requests.len() {
                    let offset = (i as u64 * UNIFORM_STRIDE) as u32;
                    pass.set_bind_group(0, &self.bind_group, &[offset]);
                    pass.dispatch_workgroups(Self::workgroups(), Self::workgroups(), 1);
                }
            }
            queue.submit(std::iter::once(encoder.finish()));

            for request in requests {
                pool.set_slot_origin(request.slot, request.origin);
            }
        }

        self.dispatched += batch.len() as u64;
        log::debug!("TerrainGenerator: dispatched {} chunks", batch.len());
    }

    /// Workgroups per axis for one chunk: 256 / 8 = 32.
    pub fn workgroups() -> u32 {
        CHUNK_SIZE / GEN_WORKGROUP_SIZE
    }

    /// Total chunks generated since creation.
    pub fn dispatched_count(&self) -> u64 {
        self.dispatched
    }

    fn stage_uniforms(&mut self, requests: &[GenerationRequest]) {
        self.staging.clear();
        self.staging
            .resize(requests.len() * UNIFORM_STRIDE as usize, 0);
        for (i, request) in requests.iter().enumerate() {
            let uniforms = request.uniforms();
            let start = i * UNIFORM_STRIDE as usize;
            let bytes = bytemuck::bytes_of(&uniforms);
            self.staging[start..start + bytes.len()].copy_from_slice(bytes);
        }
    }
}
