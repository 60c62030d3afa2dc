//! Shader program builder: compiles the vertex and fragment sources into
//! separate modules and links them into one render pipeline.

use std::num::NonZeroU64;

use wgpu::{
    BindGroupLayout, BindGroupLayoutDescriptor, BindGroupLayoutEntry, BindingType, BlendState,
    BufferBindingType, ColorTargetState, ColorWrites, CompilationMessageType, DepthBiasState,
    DepthStencilState, Device, ErrorFilter, FragmentState, PipelineLayoutDescriptor,
    RenderPipeline, RenderPipelineDescriptor, SamplerBindingType, ShaderModule,
    ShaderModuleDescriptor, ShaderSource, ShaderStages, TextureFormat, TextureSampleType,
    TextureViewDimension, VertexState,
};

use crate::error::{RendererError, RendererResult};
use crate::shader_types::TransformUniform;

pub const DEPTH_FORMAT: TextureFormat = TextureFormat::Depth32Float;

/// Fixed binding slots shared by both stages.
pub mod binding {
    pub const VERTICES: u32 = 0;
    pub const TRANSFORM: u32 = 1;
    pub const TEXTURE: u32 = 2;
    pub const SAMPLER: u32 = 3;
}

/// Vertex and fragment stage sources (WGSL).
#[derive(Clone, Copy, Debug)]
pub struct ShaderSources<'a> {
    pub vertex: &'a str,
    pub fragment: &'a str,
}

pub const MESH_SHADERS: ShaderSources<'static> = ShaderSources {
    vertex: include_str!("shaders/mesh.vert.wgsl"),
    fragment: include_str!("shaders/mesh.frag.wgsl"),
};

pub struct MeshPipeline {
    pub pipeline: RenderPipeline,
    pub bind_group_layout: BindGroupLayout,
}

/// Compile both stages and link the mesh pipeline. Any validation error is
/// returned with the full diagnostic text.
pub async fn build_mesh_pipeline(
    device: &Device,
    sources: ShaderSources<'_>,
    color_format: TextureFormat,
) -> RendererResult<MeshPipeline> {
    let vs = compile_stage(device, "vertex", sources.vertex).await?;
    let fs = compile_stage(device, "fragment", sources.fragment).await?;

    let bind_group_layout = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
        label: Some("Mesh BGL"),
        entries: &[
            BindGroupLayoutEntry {
                binding: binding::VERTICES,
                visibility: ShaderStages::VERTEX,
                ty: BindingType::Buffer {
                    ty: BufferBindingType::Storage { read_only: true },
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            },
            BindGroupLayoutEntry {
                binding: binding::TRANSFORM,
                visibility: ShaderStages::VERTEX,
                ty: BindingType::Buffer {
                    ty: BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: NonZeroU64::new(
                        std::mem::size_of::<TransformUniform>() as u64
                    ),
                },
                count: None,
            },
            BindGroupLayoutEntry {
                binding: binding::TEXTURE,
                visibility: ShaderStages::FRAGMENT,
                ty: BindingType::Texture {
                    sample_type: TextureSampleType::Float { filterable: true },
                    view_dimension: TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            },
            BindGroupLayoutEntry {
                binding: binding::SAMPLER,
                visibility: ShaderStages::FRAGMENT,
                ty: BindingType::Sampler(SamplerBindingType::Filtering),
                count: None,
            },
        ],
    });

    device.push_error_scope(ErrorFilter::Validation);
    let pipeline_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
        label: Some("Mesh PipelineLayout"),
        bind_group_layouts: &[&bind_group_layout],
        push_constant_ranges: &[],
    });
    let pipeline = device.create_render_pipeline(&RenderPipelineDescriptor {
        label: Some("Mesh Pipeline"),
        layout: Some(&pipeline_layout),
        vertex: VertexState {
            module: &vs,
            entry_point: Some("vs_main"),
            buffers: &[],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(FragmentState {
            module: &fs,
            entry_point: Some("fs_main"),
            targets: &[Some(ColorTargetState {
                format: color_format,
                blend: Some(BlendState::REPLACE),
                write_mask: ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            ..Default::default()
        },
        // LessEqual lets repeated passes over the same static mesh pass.
        depth_stencil: Some(DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::LessEqual,
            stencil: wgpu::StencilState::default(),
            bias: DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    });
    if let Some(err) = device.pop_error_scope().await {
        return Err(RendererError::PipelineLink(err.to_string()));
    }

    log::info!("Mesh pipeline linked ({:?})", color_format);
    Ok(MeshPipeline {
        pipeline,
        bind_group_layout,
    })
}

async fn compile_stage(
    device: &Device,
    stage: &'static str,
    source: &str,
) -> RendererResult<ShaderModule> {
    device.push_error_scope(ErrorFilter::Validation);
    let module = device.create_shader_module(ShaderModuleDescriptor {
        label: Some(stage),
        source: ShaderSource::Wgsl(source.into()),
    });
    let scope_error = device.pop_error_scope().await;

    let info = module.get_compilation_info().await;
    for msg in &info.messages {
        match msg.message_type {
            CompilationMessageType::Error => log::error!("{stage} shader: {}", msg.message),
            CompilationMessageType::Warning => log::warn!("{stage} shader: {}", msg.message),
            CompilationMessageType::Info => log::debug!("{stage} shader: {}", msg.message),
        }
    }

    match scope_error {
        Some(err) => Err(RendererError::ShaderCompile {
            stage,
            diagnostics: err.to_string(),
        }),
        None => Ok(module),
    }
}
