use wgpu::util::DeviceExt;

use crate::gpu::GpuContext;
use crate::layout::VertexMode;
use crate::mesh::{Mesh, ShaderId, TextureId};

/// A mesh's buffers on the GPU.
///
/// Dropping a `GpuMesh` releases its buffers.
#[derive(Debug)]
pub struct GpuMesh {
    pub(crate) vertex_buffer: wgpu::Buffer,
    pub(crate) index_buffer: wgpu::Buffer,
    pub index_count: u32,
    pub mode: VertexMode,
    pub texture_ids: Vec<TextureId>,
    pub shader: Option<ShaderId>,
}

impl GpuMesh {
    /// Copies a generated mesh's vertices and indices into new GPU buffers.
    pub fn upload(gpu: &GpuContext, mesh: &Mesh) -> Self {
        let vertex_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Vertex Buffer"),
                contents: bytemuck::cast_slice(mesh.vertices()),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let index_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Index Buffer"),
                contents: bytemuck::cast_slice(mesh.indices()),
                usage: wgpu::BufferUsages::INDEX,
            });

        log::trace!(
            "uploaded {:?} mesh: {} bytes of vertices, {} indices",
            mesh.vertex_mode(),
            mesh.vertex_buffer_size(),
            mesh.element_count()
        );

        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.element_count() as u32,
            mode: mesh.vertex_mode(),
            texture_ids: mesh.texture_ids().to_vec(),
            shader: mesh.shader_id(),
        }
    }
}
