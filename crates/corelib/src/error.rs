//! Core shared errors (renderer-agnostic).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid value '{value}' for option --{option}")]
    InvalidOption { option: String, value: String },
    #[error("Invalid viewport {width}x{height}")]
    InvalidViewport { width: u32, height: u32 },
    #[error("Invalid vertical field of view {fov} (expected 0 < fov < 180 degrees)")]
    InvalidFov { fov: f32 },
    #[error("Invalid clip planes: near={near}, far={far}")]
    InvalidClipPlanes { near: f32, far: f32 },
}

pub type CoreResult<T> = Result<T, CoreError>;
