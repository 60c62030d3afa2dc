//! OBJ mesh loader: parses through `tobj` and deduplicates corners into an
//! indexed triangle list.

use std::{
    collections::{HashMap, hash_map::Entry},
    fs,
    io::{self, BufRead, Read},
    path::{Path, PathBuf},
};

use crate::{
    error::{AssetError, AssetResult},
    mesh::{MeshData, MeshVertex},
};

fn load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        triangulate: true,
        single_index: false,
        ignore_points: true,
        ignore_lines: true,
        ..Default::default()
    }
}

/// Load an OBJ mesh from a file path. Material libraries are resolved next
/// to the file.
pub fn load_obj_from_path(path: impl AsRef<Path>) -> AssetResult<MeshData> {
    let path = path.as_ref();
    log::info!("Loading mesh from {:?}", path);
    let obj_error = |source| AssetError::Obj {
        path: path.to_path_buf(),
        source,
    };
    let source = fs::read_to_string(path).map_err(|e| {
        obj_error(match e.kind() {
            io::ErrorKind::InvalidData => tobj::LoadError::ReadError,
            _ => tobj::LoadError::OpenFileFailed,
        })
    })?;
    check_texcoord_refs(&source)?;

    let dir = path.parent().unwrap_or_else(|| Path::new(""));
    let (models, materials) = tobj::load_obj_buf(
        &mut io::Cursor::new(source.as_bytes()),
        &load_options(),
        |mtl| tobj::load_mtl(dir.join(mtl)),
    )
    .map_err(obj_error)?;
    if let Err(e) = materials {
        // Only geometry and texcoords are used; a broken mtllib is harmless.
        log::warn!("Ignoring materials of {:?}: {}", path, e);
    }
    let mesh = build_mesh(&models)?;
    log::info!(
        "Loaded mesh {:?}: {} vertices, {} triangles",
        path,
        mesh.vertices.len(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

/// Load an OBJ mesh from a [`BufRead`] implementation. Material libraries
/// are not resolved.
pub fn load_obj_from_reader<R: BufRead>(mut reader: R) -> AssetResult<MeshData> {
    let reader_error = |source| AssetError::Obj {
        path: PathBuf::from("<reader>"),
        source,
    };
    let mut source = String::new();
    reader
        .read_to_string(&mut source)
        .map_err(|_| reader_error(tobj::LoadError::ReadError))?;
    check_texcoord_refs(&source)?;

    let (models, _) = tobj::load_obj_buf(
        &mut io::Cursor::new(source.as_bytes()),
        &load_options(),
        |_| Err(tobj::LoadError::OpenFileFailed),
    )
    .map_err(reader_error)?;
    build_mesh(&models)
}

/// Convenience helper to parse an OBJ string literal.
pub fn load_obj_from_str(contents: &str) -> AssetResult<MeshData> {
    load_obj_from_reader(io::Cursor::new(contents))
}

/// Walk every corner (shape, face, vertex-in-face order) and emit one index
/// per corner, reusing the index of an identical vertex seen earlier.
pub fn build_mesh(models: &[tobj::Model]) -> AssetResult<MeshData> {
    let corner_count: usize = models.iter().map(|m| m.mesh.indices.len()).sum();

    let mut unique: HashMap<MeshVertex, u32> = HashMap::new();
    let mut vertices: Vec<MeshVertex> = Vec::new();
    let mut indices: Vec<u32> = Vec::with_capacity(corner_count);

    for model in models {
        let mesh = &model.mesh;
        let has_texcoords = !mesh.texcoord_indices.is_empty();
        if !has_texcoords {
            log::warn!("Shape '{}' has no texture coordinates", model.name);
        }

        for (corner, &vi) in mesh.indices.iter().enumerate() {
            let position = fetch::<3>(&mesh.positions, vi as usize, "position", &model.name)?;
            let texcoord = if has_texcoords {
                let ti = *mesh.texcoord_indices.get(corner).ok_or_else(|| {
                    AssetError::IndexOutOfRange {
                        shape: model.name.clone(),
                        attribute: "texcoord index",
                        index: corner,
                        len: mesh.texcoord_indices.len(),
                    }
                })?;
                fetch::<2>(&mesh.texcoords, ti as usize, "texcoord", &model.name)?
            } else {
                [0.0, 0.0]
            };

            let vertex = MeshVertex::new(position, texcoord);
            let index = match unique.entry(vertex) {
                Entry::Occupied(e) => *e.get(),
                Entry::Vacant(e) => {
                    let idx =
                        u32::try_from(vertices.len()).map_err(|_| AssetError::TooManyVertices)?;
                    vertices.push(vertex);
                    *e.insert(idx)
                }
            };
            indices.push(index);
        }
    }

    log::debug!(
        "Deduplicated {} corners into {} vertices",
        indices.len(),
        vertices.len()
    );
    Ok(MeshData::new(vertices, indices))
}

/// tobj gives a corner without `vt` the texcoord of the corner before it, which
/// would merge it with an unrelated vertex. Files declaring texcoords must
/// reference one on every face corner.
fn check_texcoord_refs(source: &str) -> AssetResult<()> {
    let mut has_texcoords = false;
    let mut first_bare_face = None;
    for (n, line) in source.lines().enumerate() {
        let mut words = line.split_whitespace();
        match words.next() {
            Some("vt") => has_texcoords = true,
            Some("f") if first_bare_face.is_none() => {
                if words.any(|corner| corner.split('/').nth(1).is_none_or(str::is_empty)) {
                    first_bare_face = Some(n + 1);
                }
            }
            _ => {}
        }
    }
    match first_bare_face {
        Some(line) if has_texcoords => Err(AssetError::MixedTexcoords { line }),
        _ => Ok(()),
    }
}

fn fetch<const N: usize>(
    data: &[f32],
    index: usize,
    attribute: &'static str,
    shape: &str,
) -> AssetResult<[f32; N]> {
    index
        .checked_mul(N)
        .and_then(|start| data.get(start..start.checked_add(N)?))
        .and_then(|slice| <[f32; N]>::try_from(slice).ok())
        .ok_or_else(|| AssetError::IndexOutOfRange {
            shape: shape.to_owned(),
            attribute,
            index,
            len: data.len() / N,
        })
}
