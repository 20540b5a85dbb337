use glam::{Mat4, Vec3};
use ridgeline_core::constants::{CHUNK_INDEX_COUNT, CHUNK_SPAN, VERTEX_BYTES};
use ridgeline_core::types::{ChunkCoord, Slot};
use ridgeline_gpu::TerrainPool;
use ridgeline_world::heightmap::generate_chunk_indices;
use wgpu::util::DeviceExt;

use crate::shading::ShadingParams;

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// GPU-uploadable per-frame uniforms. Must match FrameUniforms in terrain.wgsl.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 4],
    pub sky_color: [f32; 4],
    pub height_scale: f32,
    pub height_power: f32,
    pub fog_near: f32,
    pub fog_far: f32,
}

impl FrameUniforms {
    /// `camera_pos` is relative to the current view center, like the vertices.
    pub fn new(view_proj: Mat4, camera_pos: Vec3, shading: &ShadingParams) -> Self {
        let [r, g, b] = shading.sky_color;
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            camera_pos: camera_pos.extend(1.0).to_array(),
            sky_color: [r, g, b, 1.0],
            height_scale: shading.height_scale,
            height_power: shading.height_power,
            fog_near: shading.fog_distance[0],
            fog_far: shading.fog_distance[1],
        }
    }
}

/// Draws every occupied pool slot as one indexed grid.
/// All GPU resources are created at init time; per frame only uniforms and
/// slot offsets are rewritten.
pub struct TerrainRenderer {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    frame_buffer: wgpu::Buffer,
    slot_offset_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    depth_view: wgpu::TextureView,
    /// Staging for slot offsets, one entry per pool slot.
    slot_offsets: Vec<[f32; 2]>,
    clear_color: wgpu::Color,
}

impl TerrainRenderer {
    pub fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        slot_count: u32,
    ) -> Self {
        let slot_count = slot_count.max(1);

        // Compose shader: constants + terrain
        let terrain_wgsl = include_str!("../../../shaders/render/terrain.wgsl");
        let source = format!(
            "{}\n{terrain_wgsl}",
            ridgeline_core::constants::shader_preamble()
        );
        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("terrain-render-shader"),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });

        // -- Buffers --
        let frame_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("terrain-frame-uniforms"),
            size: std::mem::size_of::<FrameUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let slot_offset_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("terrain-slot-offsets"),
            size: slot_count as u64 * std::mem::size_of::<[f32; 2]>() as u64,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let indices = generate_chunk_indices();
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("terrain-index-buffer"),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        // -- Bind group --
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("terrain-render-bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("terrain-render-bg"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: frame_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: slot_offset_buffer.as_entire_binding(),
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("terrain-render-pipeline-layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("terrain-render-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &module,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: VERTEX_BYTES as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &[
                        wgpu::VertexAttribute {
                            format: wgpu::VertexFormat::Float32x3,
                            offset: 0,
                            shader_location: 0,
                        },
                        wgpu::VertexAttribute {
                            format: wgpu::VertexFormat::Float32x2,
                            offset: 12,
                            shader_location: 1,
                        },
                    ],
                }],
                compilation_options: Default::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &module,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: color_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            multiview: None,
            cache: None,
        });

        log::info!(
            "TerrainRenderer: {} slots, {} indices per chunk",
            slot_count,
            indices.len()
        );

        Self {
            pipeline,
            bind_group,
            frame_buffer,
            slot_offset_buffer,
            index_buffer,
            depth_view: Self::create_depth_view(device, width, height),
            slot_offsets: vec![[0.0; 2]; slot_count as usize],
            clear_color: wgpu::Color::BLACK,
        }
    }

    /// Recreate the depth target after the output size changes.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_view = Self::create_depth_view(device, width, height);
    }

    /// Upload frame uniforms and the per-slot translation to `center`.
    pub fn prepare(
        &mut self,
        queue: &wgpu::Queue,
        view_proj: Mat4,
        camera_pos: Vec3,
        shading: &ShadingParams,
        pool: &TerrainPool,
        center: ChunkCoord,
    ) {
        let uniforms = FrameUniforms::new(view_proj, camera_pos, shading);
        queue.write_buffer(&self.frame_buffer, 0, bytemuck::bytes_of(&uniforms));

        for (entry, shift) in self.slot_offsets.iter_mut().zip(pool.slot_shifts(center)) {
            *entry = (shift.as_vec2() * CHUNK_SPAN as f32).to_array();
        }
        queue.write_buffer(
            &self.slot_offset_buffer,
            0,
            bytemuck::cast_slice(&self.slot_offsets),
        );
        self.clear_color = shading.clear_color();
    }

    /// Record one indexed draw per occupied slot into an open pass.
    /// Returns the number of draw calls issued.
    pub fn draw(
        &self,
        pass: &mut wgpu::RenderPass<'_>,
        pool: &TerrainPool,
        slots: impl IntoIterator<Item = Slot>,
    ) -> u32 {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.set_vertex_buffer(0, pool.buffer().slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);

        let mut draws = 0;
        for slot in slots {
            if slot >= pool.slot_count() {
                log::error!("TerrainRenderer: slot {} outside pool", slot);
                continue;
            }
            pass.draw_indexed(
                0..CHUNK_INDEX_COUNT,
                TerrainPool::slot_base_vertex(slot),
                slot..slot + 1,
            );
            draws += 1;
        }
        draws
    }

    /// Clear `target` to the sky color and draw the terrain into it.
    pub fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        pool: &TerrainPool,
        slots: impl IntoIterator<Item = Slot>,
    ) -> u32 {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("terrain-pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.clear_color),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Discard,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        self.draw(&mut pass, pool, slots)
    }

    fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("terrain-depth"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }
}
