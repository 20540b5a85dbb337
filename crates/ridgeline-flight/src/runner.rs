use std::time::Instant;

use ridgeline_core::error::RidgelineError;
use ridgeline_gpu::{TerrainGenerator, TerrainPool};
use ridgeline_render::TerrainRenderer;
use ridgeline_world::heightmap::sample_height;
use ridgeline_world::ChunkStreamer;

use crate::camera::FlyCamera;
use crate::config::ViewerConfig;
use crate::error::FlightError;
use crate::input::{process_keyboard, process_mouse, InputState};
use crate::report::{FlightResult, FlightStats, FrameRecord};
use crate::routes::{Route, RouteEvent};

/// Fixed simulation step so runs are reproducible regardless of GPU speed.
pub const FRAME_DT: f32 = 1.0 / 60.0;

/// Minimum height kept between the camera and the terrain below it.
pub const GROUND_CLEARANCE: f32 = 2.0;

const TARGET_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

/// Flies scripted routes over streamed terrain on a headless GPU device,
/// rendering every frame to an offscreen target.
pub struct FlightRunner {
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: ViewerConfig,
    target_view: wgpu::TextureView,
}

impl FlightRunner {
    /// Initialize wgpu natively. Blocks on async adapter and device requests.
    pub fn new(config: ViewerConfig) -> Result<Self, FlightError> {
        config.validate()?;

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: None,
            force_fallback_adapter: false,
        }))
        .ok_or_else(|| RidgelineError::AdapterNotFound("no suitable GPU adapter".into()))?;

        log::info!("Flight adapter: {}", adapter.get_info().name);

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("flight-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::Performance,
            },
            None,
        ))
        .map_err(|e| RidgelineError::DeviceRequestFailed(e.to_string()))?;

        let [width, height] = config.viewport;
        let target = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("flight-target"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TARGET_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let target_view = target.create_view(&wgpu::TextureViewDescriptor::default());

        Ok(Self {
            device,
            queue,
            config,
            target_view,
        })
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Fly `route` for `frames` frames from the configured start position.
    pub fn fly(&self, route: Route, frames: u32) -> Result<FlightResult, FlightError> {
        let config = &self.config;
        log::info!(
            "Flying route '{}' for {} frames (radius {})...",
            route.name(),
            frames,
            config.render_radius
        );

        let mut streamer = ChunkStreamer::new(config.render_radius)?;
        streamer.set_config(config.generation)?;

        let mut pool = TerrainPool::new(&self.device, streamer.chunk_count())?;
        let mut generator = TerrainGenerator::new(&self.device, &pool);
        let [width, height] = config.viewport;
        let mut renderer = TerrainRenderer::new(
            &self.device,
            TARGET_FORMAT,
            width,
            height,
            pool.slot_count(),
        );

        let mut camera = FlyCamera::new(config.start_position(), config.aspect());
        let mut input = InputState::new();
        let mut stats = FlightStats::with_capacity(frames as usize);

        for frame in 0..frames {
            match route.drive(frame, frames, config.mouse_sensitivity, &mut input) {
                RouteEvent::None => {}
                RouteEvent::Regenerate(generation) => streamer.set_config(generation)?,
                RouteEvent::Teleport(offset) => camera.position += offset,
            }

            process_mouse(&mut input, &mut camera, config.mouse_sensitivity);
            process_keyboard(&input, &mut camera, FRAME_DT, &config.speeds);
            camera.update();
            self.keep_above_ground(&mut camera, &streamer);

            let center = camera.chunk_position();
            let frame_start = Instant::now();

            let batch = streamer.update(center)?;
            let update_ms = frame_start.elapsed().as_secs_f64() * 1000.0;

            generator.dispatch(&self.device, &self.queue, &mut pool, &batch);

            let view_proj = camera.proj() * camera.view_relative_to(center);
            renderer.prepare(
                &self.queue,
                view_proj,
                camera.relative_position(center),
                &config.shading,
                &pool,
                center,
            );

            let mut encoder = self
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("flight-encoder"),
                });
            let draws = renderer.render(
                &mut encoder,
                &self.target_view,
                &pool,
                streamer.occupied_slots(),
            );
            self.queue.submit(std::iter::once(encoder.finish()));
            self.device.poll(wgpu::Maintain::Wait);

            let frame_ms = frame_start.elapsed().as_secs_f64() * 1000.0;
            stats.record(FrameRecord {
                center: center.to_array(),
                requests: batch.len() as u32,
                cold_start: batch.cold_start,
                draws,
                update_ms,
                frame_ms,
            });
        }

        let result = stats.finish(route.name(), config.render_radius);
        log::info!(
            "  Done: {} requests ({} cold starts), mean={:.2}ms, p95={:.2}ms",
            result.total_requests,
            result.cold_starts,
            result.frame_timings.mean_ms,
            result.frame_timings.p95_ms
        );
        Ok(result)
    }

    fn keep_above_ground(&self, camera: &mut FlyCamera, streamer: &ChunkStreamer) {
        let pos = camera.position;
        let normalized = sample_height(
            pos.x.floor() as i32,
            pos.z.floor() as i32,
            streamer.config(),
        );
        let floor = self.config.shading.world_height(normalized) + GROUND_CLEARANCE;
        if pos.y < floor {
            camera.position.y = floor;
        }
    }
}
