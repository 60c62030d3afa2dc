//! Asset loading errors.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("Failed to load OBJ {path}: {source}")]
    Obj {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },
    #[error("OBJ {attribute} index {index} out of range (len={len}) in shape '{shape}'")]
    IndexOutOfRange {
        shape: String,
        attribute: &'static str,
        index: usize,
        len: usize,
    },
    #[error("OBJ face on line {line} has no texture coordinate while the file declares some")]
    MixedTexcoords { line: usize },
    #[error("Too many vertices in OBJ (>{})", u32::MAX)]
    TooManyVertices,
    #[error("Failed to open image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("Texture data is {actual} bytes, expected {expected} for {width}x{height}")]
    TextureSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

pub type AssetResult<T> = Result<T, AssetError>;
