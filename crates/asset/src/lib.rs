//! Asset loading/parsers (meshes, textures).
//! OBJ meshes go through `tobj` and are deduplicated into an indexed
//! triangle list; textures are decoded with `image` and get a full mip chain.

pub mod error;
pub mod mesh;
pub mod obj;
pub mod texture;

pub use error::{AssetError, AssetResult};
