//! Renderer: wgpu init + depth + one textured, indexed mesh.
//! wgpu = 26.x, winit = 0.30.x

pub mod error;
pub mod pipeline;
pub mod shader_types;
pub mod texture;

use std::sync::Arc;

use asset::{mesh::MeshData, texture::TextureData};
use glam::Mat4;
use wgpu::{
    BindGroup, Buffer, BufferDescriptor, BufferUsages, CommandEncoderDescriptor, Device,
    DeviceDescriptor, DownlevelFlags, Extent3d, Instance, InstanceDescriptor, Limits, LoadOp,
    Operations, PowerPreference, PresentMode, Queue, RenderPassColorAttachment,
    RenderPassDescriptor, RenderPipeline, Surface, SurfaceConfiguration, SurfaceError,
    TextureDescriptor, TextureDimension, TextureUsages, TextureView, TextureViewDescriptor,
    util::DeviceExt,
};
use winit::{dpi::PhysicalSize, window::Window};

pub use error::{RendererError, RendererResult};
use pipeline::{DEPTH_FORMAT, MESH_SHADERS, binding};
use shader_types::{GpuVertex, TransformUniform, transform_block_size};
use texture::GpuTexture;

/// Background as displayed (sRGB-encoded).
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.26,
    g: 0.33,
    b: 0.46,
    a: 1.0,
};

/// Clear values are written as linear and encoded on store for sRGB
/// targets; decode first so the displayed color stays `CLEAR_COLOR`.
fn clear_color_for(format: wgpu::TextureFormat) -> wgpu::Color {
    if !format.is_srgb() {
        return CLEAR_COLOR;
    }
    let decode = |c: f64| {
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    wgpu::Color {
        r: decode(CLEAR_COLOR.r),
        g: decode(CLEAR_COLOR.g),
        b: decode(CLEAR_COLOR.b),
        a: CLEAR_COLOR.a,
    }
}

pub struct GpuState {
    window: Arc<Window>,

    // Surface
    surface: Surface<'static>,
    surface_config: SurfaceConfiguration,

    // Device/queue
    device: Device,
    queue: Queue,

    // Pipeline & geometry
    pipeline: RenderPipeline,
    bind_group: BindGroup,
    #[allow(dead_code)]
    vertex_buf: Buffer,
    index_buf: Buffer,
    index_count: u32,
    clear_color: wgpu::Color,

    // Per-frame transform
    transform_buf: Buffer,

    #[allow(dead_code)]
    texture: GpuTexture,

    // Depth
    depth_view: TextureView,

    // Size cache
    width: u32,
    height: u32,
}

impl GpuState {
    /// Create GPU state bound to an Arc<Window> and upload the static mesh
    /// and texture.
    pub async fn new(
        window: Arc<Window>,
        backends: wgpu::Backends,
        mesh: &MeshData,
        texture: &TextureData,
    ) -> RendererResult<Self> {
        let PhysicalSize { width, height } = window.inner_size();
        let width = width.max(1);
        let height = height.max(1);

        // Instance & surface
        let instance = Instance::new(&InstanceDescriptor {
            backends,
            ..Default::default()
        });
        let surface: Surface<'static> = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        let adapter_info = adapter.get_info();
        log::info!(
            "Using adapter '{}' ({:?})",
            adapter_info.name,
            adapter_info.backend
        );

        // Vertices are pulled from a storage buffer in the vertex stage.
        if !adapter
            .get_downlevel_capabilities()
            .flags
            .contains(DownlevelFlags::VERTEX_STORAGE)
        {
            return Err(RendererError::NoVertexStorage(adapter_info.name));
        }

        let (device, queue) = adapter
            .request_device(&DeviceDescriptor {
                label: Some("Viewer Device"),
                required_features: wgpu::Features::empty(),
                required_limits: Limits::downlevel_defaults().using_resolution(adapter.limits()),
                ..Default::default()
            })
            .await?;

        // Surface format (prefer sRGB)
        let caps = surface.get_capabilities(&adapter);
        let surface_format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or(RendererError::NoSurfaceFormat)?;

        let surface_config = SurfaceConfiguration {
            usage: TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: PresentMode::AutoVsync,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        let depth_view = create_depth_view(&device, &surface_config);

        let mesh_pipeline =
            pipeline::build_mesh_pipeline(&device, MESH_SHADERS, surface_format).await?;

        // ==== Geometry: immutable storage + index buffers ====
        let index_count =
            u32::try_from(mesh.indices.len()).map_err(|_| RendererError::MeshTooLarge {
                indices: mesh.indices.len(),
            })?;
        let mut vertices: Vec<GpuVertex> = mesh.vertices.iter().map(GpuVertex::from).collect();
        if vertices.is_empty() {
            // Storage bindings cannot be zero-sized.
            vertices.push(GpuVertex::default());
        }
        let vertex_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Vertices"),
            contents: bytemuck::cast_slice(&vertices),
            usage: BufferUsages::STORAGE,
        });
        let index_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Indices"),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: BufferUsages::INDEX,
        });

        // ==== Transform UBO, rewritten every frame ====
        let transform_buf = device.create_buffer(&BufferDescriptor {
            label: Some("Transform UBO"),
            size: transform_block_size(device.limits().min_uniform_buffer_offset_alignment),
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let texture = GpuTexture::upload(&device, &queue, texture);

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Mesh BG"),
            layout: &mesh_pipeline.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: binding::VERTICES,
                    resource: vertex_buf.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: binding::TRANSFORM,
                    resource: transform_buf.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: binding::TEXTURE,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: binding::SAMPLER,
                    resource: wgpu::BindingResource::Sampler(&texture.sampler),
                },
            ],
        });

        log::info!(
            "GPU resources ready: {} vertices, {} indices, {}x{} surface",
            mesh.vertices.len(),
            mesh.indices.len(),
            width,
            height
        );

        Ok(Self {
            window,
            surface,
            surface_config,
            device,
            queue,
            pipeline: mesh_pipeline.pipeline,
            bind_group,
            vertex_buf,
            index_buf,
            index_count,
            clear_color: clear_color_for(surface_format),
            transform_buf,
            texture,
            depth_view,
            width,
            height,
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Resize: reconfigure surface & recreate depth view.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width.max(1);
        self.height = height.max(1);
        self.surface_config.width = self.width;
        self.surface_config.height = self.height;
        self.surface.configure(&self.device, &self.surface_config);
        self.depth_view = create_depth_view(&self.device, &self.surface_config);
    }

    /// Render one frame: write the transform, clear, draw the mesh, present.
    ///
    /// The transform goes through `Queue::write_buffer`, which is ordered
    /// before this frame's submission, so the GPU never reads a half-written
    /// matrix.
    pub fn render(&mut self, mvp: Mat4) -> Result<(), SurfaceError> {
        let transform = TransformUniform::new(mvp);
        self.queue
            .write_buffer(&self.transform_buf, 0, bytemuck::bytes_of(&transform));

        let frame = self.surface.get_current_texture()?;
        let view = frame.texture.create_view(&TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&CommandEncoderDescriptor {
                label: Some("MainEncoder"),
            });

        {
            let mut rpass = encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some("MainPass"),
                color_attachments: &[Some(RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: Operations {
                        load: LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(Operations {
                        load: LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if self.index_count > 0 {
                rpass.set_pipeline(&self.pipeline);
                rpass.set_bind_group(0, &self.bind_group, &[]);
                rpass.set_index_buffer(self.index_buf.slice(..), wgpu::IndexFormat::Uint32);
                rpass.draw_indexed(0..self.index_count, 0, 0..1);
            }
        }

        self.queue.submit(Some(encoder.finish()));
        self.window.pre_present_notify();
        frame.present();
        Ok(())
    }

    pub fn is_surface_lost(err: &SurfaceError) -> bool {
        matches!(err, SurfaceError::Lost | SurfaceError::Outdated)
    }

    pub fn recreate_surface(&mut self) {
        self.resize(self.width, self.height);
    }
}

/// Create a depth texture view matching the surface config.
fn create_depth_view(device: &Device, sc: &SurfaceConfiguration) -> TextureView {
    let tex = device.create_texture(&TextureDescriptor {
        label: Some("DepthTex"),
        size: Extent3d {
            width: sc.width.max(1),
            height: sc.height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    tex.create_view(&TextureViewDescriptor::default())
}
