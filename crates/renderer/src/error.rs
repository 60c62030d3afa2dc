//! Renderer errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    #[error("No suitable GPU adapter: {0}")]
    RequestAdapter(#[from] wgpu::RequestAdapterError),
    #[error("Failed to request device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[error("Adapter '{0}' cannot read storage buffers from the vertex stage")]
    NoVertexStorage(String),
    #[error("Mesh has {indices} indices, more than a 32-bit draw can address")]
    MeshTooLarge { indices: usize },
    #[error("Surface reports no supported formats")]
    NoSurfaceFormat,
    #[error("Error compiling {stage} shader:\n{diagnostics}")]
    ShaderCompile {
        stage: &'static str,
        diagnostics: String,
    },
    #[error("Error linking pipeline:\n{0}")]
    PipelineLink(String),
}

pub type RendererResult<T> = Result<T, RendererError>;
