//! Slice quad generation.
//!
//! Every slice of the volume becomes one quad in the xy plane. All quads live
//! in a single vertex buffer with a matching index buffer, so the whole stack
//! is drawn with one indexed call of `6 * depth` indices.

/// Vertices per slice quad.
pub const VERTICES_PER_SLICE: u32 = 4;

/// Indices per slice quad (two triangles).
pub const INDICES_PER_SLICE: u32 = 6;

/// Triangle pattern shared by every quad, relative to its first vertex.
pub const QUAD_INDEX_PATTERN: [u32; 6] = [0, 1, 3, 1, 2, 3];

/// Corner layout in the xy plane paired with its (u, v), top-right first.
const QUAD_CORNERS: [([f32; 2], [f32; 2]); 4] = [
    ([0.5, 0.5], [1.0, 1.0]),
    ([0.5, -0.5], [1.0, 0.0]),
    ([-0.5, -0.5], [0.0, 0.0]),
    ([-0.5, 0.5], [0.0, 1.0]),
];

/// Vertex layout for slice quads.
/// Must match the vertex attributes of `slice.wgsl` (locations 0 and 1).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SliceVertex {
    /// Object-space position; z is the slice depth.
    pub position: [f32; 3],
    /// Volume texture coordinate; w selects the slice.
    pub tex_coord: [f32; 3],
}

/// The four vertices of one slice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliceQuad {
    /// Index of the slice in the stack.
    pub index: u32,
    /// Depth of the quad in object space.
    pub z: f32,
    /// Vertices in winding order.
    pub vertices: [SliceVertex; 4],
}

/// Object-space depth of slice `index` out of `depth` slices.
///
/// Slices are evenly spaced over `[-1, 1)`: `z = -1 + 2 * index / depth`.
#[must_use]
pub fn slice_depth(index: u32, depth: u32) -> f32 {
    -1.0 + 2.0 * index as f32 / depth as f32
}

/// Builds the quad for slice `index`.
///
/// The w texture coordinate is the slice depth offset by one half.
#[must_use]
pub fn slice_quad(index: u32, depth: u32) -> SliceQuad {
    let z = slice_depth(index, depth);
    let w = z + 0.5;
    let vertices = QUAD_CORNERS.map(|([x, y], [u, v])| SliceVertex {
        position: [x, y, z],
        tex_coord: [u, v, w],
    });
    SliceQuad { index, z, vertices }
}

/// Indices of slice `index` within the combined vertex buffer.
#[must_use]
pub fn quad_indices(index: u32) -> [u32; 6] {
    let base = index * VERTICES_PER_SLICE;
    QUAD_INDEX_PATTERN.map(|i| base + i)
}

/// Combined geometry for every slice of a volume.
#[derive(Debug, Clone)]
pub struct SliceMesh {
    quads: Vec<SliceQuad>,
    vertices: Vec<SliceVertex>,
    indices: Vec<u32>,
}

impl SliceMesh {
    /// Generates one quad per slice, in ascending slice order.
    #[must_use]
    pub fn generate(depth: u32) -> Self {
        let quads: Vec<SliceQuad> = (0..depth).map(|i| slice_quad(i, depth)).collect();
        let vertices = quads.iter().flat_map(|q| q.vertices).collect();
        let indices = (0..depth).flat_map(quad_indices).collect();

        Self {
            quads,
            vertices,
            indices,
        }
    }

    /// Number of slices.
    #[must_use]
    pub fn slice_count(&self) -> u32 {
        self.quads.len() as u32
    }

    #[must_use]
    pub fn quads(&self) -> &[SliceQuad] {
        &self.quads
    }

    /// Vertex data for the combined buffer, six floats per vertex.
    #[must_use]
    pub fn vertices(&self) -> &[SliceVertex] {
        &self.vertices
    }

    /// Index data for the combined buffer.
    #[must_use]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Number of indices a full draw of the stack consumes.
    #[must_use]
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }
}
