//! CPU-side mesh representation used by loaders.

use std::hash::{Hash, Hasher};

/// Vertex with homogeneous position, color and uv. Values are in object space.
///
/// Equality is exact per component (`-0.0 == 0.0`, NaN never equal), and the
/// hash agrees with it, so the type can key a `HashMap` for deduplication.
#[derive(Clone, Copy, Debug, Default)]
pub struct MeshVertex {
    pub position: [f32; 4],
    pub color: [f32; 4],
    pub texcoord: [f32; 2],
}

impl MeshVertex {
    pub const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

    pub fn new(position: [f32; 3], texcoord: [f32; 2]) -> Self {
        let [x, y, z] = position;
        Self {
            position: [x, y, z, 1.0],
            color: Self::WHITE,
            texcoord,
        }
    }

    fn components(&self) -> impl Iterator<Item = f32> + '_ {
        self.position
            .iter()
            .chain(&self.color)
            .chain(&self.texcoord)
            .copied()
    }
}

impl PartialEq for MeshVertex {
    fn eq(&self, other: &Self) -> bool {
        self.position == other.position
            && self.color == other.color
            && self.texcoord == other.texcoord
    }
}

impl Eq for MeshVertex {}

impl Hash for MeshVertex {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for c in self.components() {
            // Fold -0.0 onto 0.0 to stay consistent with `==`.
            let bits = if c == 0.0 { 0 } else { c.to_bits() };
            bits.hash(state);
        }
    }
}

/// Indexed triangle mesh with tightly-packed vertices.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new(vertices: Vec<MeshVertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// Returns `true` if both vertex and index buffers are non-empty.
    pub fn is_valid(&self) -> bool {
        !self.vertices.is_empty() && !self.indices.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}
