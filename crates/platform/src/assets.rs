//! Startup asset loading under the configured asset policy.

use anyhow::{Context, Result, bail};
use asset::{
    mesh::MeshData,
    obj::load_obj_from_path,
    texture::{Channels, TextureData},
};
use corelib::config::ViewerConfig;

/// Side of the checkerboard used when the texture cannot be loaded.
const PLACEHOLDER_TEXTURE_SIZE: u32 = 64;

pub fn load_mesh(config: &ViewerConfig) -> Result<MeshData> {
    let path = &config.mesh_path;
    match load_obj_from_path(path) {
        Ok(mesh) if mesh.is_valid() => Ok(mesh),
        Ok(mesh) => {
            if config.strict_assets {
                bail!("Mesh {} contains no triangles", path.display());
            }
            log::warn!("Mesh {:?} contains no triangles; nothing will be drawn", path);
            Ok(mesh)
        }
        Err(e) if config.strict_assets => {
            Err(e).with_context(|| format!("Failed to load mesh {}", path.display()))
        }
        Err(e) => {
            log::error!("{e}; continuing with an empty mesh");
            Ok(MeshData::default())
        }
    }
}

pub fn load_texture(config: &ViewerConfig) -> Result<TextureData> {
    let path = &config.texture_path;
    match TextureData::load(path, Channels::Rgba) {
        Ok(texture) => Ok(texture),
        Err(e) if config.strict_assets => {
            Err(e).with_context(|| format!("Failed to load texture {}", path.display()))
        }
        Err(e) => {
            log::error!("{e}; continuing with a placeholder texture");
            Ok(TextureData::create_test_texture(PLACEHOLDER_TEXTURE_SIZE))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn config(strict: bool) -> ViewerConfig {
        ViewerConfig {
            mesh_path: PathBuf::from("no/such/mesh.obj"),
            texture_path: PathBuf::from("no/such/texture.jpg"),
            strict_assets: strict,
            ..ViewerConfig::default()
        }
    }

    #[test]
    fn strict_policy_fails_on_missing_assets() {
        let cfg = config(true);
        assert!(load_mesh(&cfg).is_err());
        assert!(load_texture(&cfg).is_err());
    }

    #[test]
    fn lenient_policy_substitutes_placeholders() {
        let cfg = config(false);
        let mesh = load_mesh(&cfg).expect("lenient mesh");
        assert!(mesh.vertices.is_empty() && mesh.indices.is_empty());
        let texture = load_texture(&cfg).expect("lenient texture");
        assert!(texture.is_valid());
        assert_eq!(texture.width, PLACEHOLDER_TEXTURE_SIZE);
    }

    #[test]
    fn strict_policy_loads_real_mesh() {
        let mut cfg = config(true);
        cfg.mesh_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../asset/testdata/quad.obj");
        let mesh = load_mesh(&cfg).expect("quad");
        assert_eq!(mesh.indices.len(), 6);
    }
}
