//! Slice stack GPU buffers.

use std::mem;

use slicevol_core::{SliceMesh, SliceVertex};
use wgpu::util::DeviceExt;

/// Vertex attributes of [`SliceVertex`]: location 0 = position, 1 = texcoord.
const SLICE_VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

/// Vertex buffer layout matching `slice.wgsl`.
#[must_use]
pub fn slice_vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: mem::size_of::<SliceVertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &SLICE_VERTEX_ATTRIBUTES,
    }
}

/// Combined vertex and index buffers for every slice quad.
pub struct SliceRenderData {
    /// Vertex buffer, four vertices per slice.
    pub vertex_buffer: wgpu::Buffer,
    /// Index buffer, six indices per slice.
    pub index_buffer: wgpu::Buffer,
    /// Number of indices in the buffer.
    pub index_count: u32,
    /// Number of slices.
    pub slice_count: u32,
}

impl SliceRenderData {
    /// Uploads generated slice geometry. The buffers are never rewritten.
    #[must_use]
    pub fn new(device: &wgpu::Device, mesh: &SliceMesh) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("slice vertices"),
            contents: bytemuck::cast_slice(mesh.vertices()),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("slice indices"),
            contents: bytemuck::cast_slice(mesh.indices()),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.index_count(),
            slice_count: mesh.slice_count(),
        }
    }

    /// Frees both buffers.
    pub fn release(self) {
        self.vertex_buffer.destroy();
        self.index_buffer.destroy();
        log::debug!("released slice buffers ({} slices)", self.slice_count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_layout_matches_slice_vertex() {
        let layout = slice_vertex_layout();
        assert_eq!(layout.array_stride, 24);
        assert_eq!(layout.attributes[0].shader_location, 0);
        assert_eq!(layout.attributes[0].offset, 0);
        assert_eq!(layout.attributes[1].shader_location, 1);
        assert_eq!(layout.attributes[1].offset, 12);
        assert_eq!(layout.attributes[1].format, wgpu::VertexFormat::Float32x3);
    }
}
