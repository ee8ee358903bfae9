//! Draws a [`DeskScene`] with depth testing.
//!
//! Every visible mesh becomes a draw item with its own model uniform buffer and texture bind
//! group, so meshes never overwrite each other's uniforms within a frame. The frame uniforms
//! (camera and lights) are written once per frame.

use wgpu::util::DeviceExt;

use crate::error::MeshError;
use crate::gpu::GpuContext;
use crate::gpu_mesh::GpuMesh;
use crate::mesh::{Mesh, ShaderId, TextureId};
use crate::scene::DeskScene;
use crate::shader::{FrameUniforms, ModelUniforms, ShaderRegistry};
use crate::texture::{self, BLACK, Texture, TextureStore, WHITE};

struct DrawItem {
    mesh: GpuMesh,
    shader: ShaderId,
    model_buffer: wgpu::Buffer,
    model_bind_group: wgpu::BindGroup,
    texture_bind_group: wgpu::BindGroup,
}

pub struct SceneRenderer {
    shaders: ShaderRegistry,
    textures: TextureStore,
    sampler: wgpu::Sampler,
    white: Texture,
    black: Texture,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    depth_view: wgpu::TextureView,
    depth_size: (u32, u32),
    clear_color: wgpu::Color,
    items: Vec<DrawItem>,
}

impl SceneRenderer {
    /// Uploads every visible mesh in `scene`. `textures` must hold the ids the scene was built
    /// with.
    pub fn new(
        gpu: &GpuContext,
        textures: TextureStore,
        scene: &DeskScene,
        clear_color: [f64; 3],
    ) -> Result<Self, MeshError> {
        let shaders = ShaderRegistry::new(gpu);

        let frame_buffer = gpu.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Frame Uniforms"),
            size: std::mem::size_of::<FrameUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let frame_bind_group = gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame Bind Group"),
            layout: &shaders.frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        let [r, g, b] = clear_color;
        let mut renderer = Self {
            shaders,
            textures,
            sampler: texture::create_sampler(&gpu.device),
            white: Texture::solid(gpu, WHITE),
            black: Texture::solid(gpu, BLACK),
            frame_buffer,
            frame_bind_group,
            depth_view: Self::create_depth_view(gpu),
            depth_size: (gpu.width(), gpu.height()),
            clear_color: wgpu::Color { r, g, b, a: 1.0 },
            items: Vec::new(),
        };

        for mesh in scene.visible() {
            let item = renderer.prepare(gpu, mesh)?;
            renderer.items.push(item);
        }
        log::info!(
            "renderer ready: {} draw items, {} textures",
            renderer.items.len(),
            renderer.textures.len()
        );
        Ok(renderer)
    }

    fn prepare(&mut self, gpu: &GpuContext, mesh: &Mesh) -> Result<DrawItem, MeshError> {
        let shader = match mesh.shader_id() {
            Some(id) => id,
            None => self.shaders.shader_for(gpu, mesh.vertex_mode())?,
        };

        let model_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Model Uniforms"),
                contents: bytemuck::cast_slice(&[ModelUniforms::new(mesh)]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });

        let model_bind_group = gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Model Bind Group"),
            layout: &self.shaders.model_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: model_buffer.as_entire_binding(),
            }],
        });

        let texture_bind_group = self.texture_bind_group(gpu, mesh.texture_ids());

        Ok(DrawItem {
            mesh: GpuMesh::upload(gpu, mesh),
            shader,
            model_buffer,
            model_bind_group,
            texture_bind_group,
        })
    }

    /// Binds the first two textures, substituting white for a missing base map and black for a
    /// missing second map.
    fn texture_bind_group(&self, gpu: &GpuContext, ids: &[TextureId]) -> wgpu::BindGroup {
        let base = self.view_or(ids.first(), &self.white);
        let second = self.view_or(ids.get(1), &self.black);

        gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Mesh Texture Bind Group"),
            layout: &self.shaders.texture_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(base),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(second),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        })
    }

    fn view_or<'a>(&'a self, id: Option<&TextureId>, fallback: &'a Texture) -> &'a wgpu::TextureView {
        id.and_then(|&id| self.textures.get(id))
            .map_or(&fallback.view, |texture| &texture.view)
    }

    fn create_depth_view(gpu: &GpuContext) -> wgpu::TextureView {
        let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: gpu.width(),
                height: gpu.height(),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    /// Recreates the depth buffer if the surface was resized.
    fn ensure_depth_size(&mut self, gpu: &GpuContext) {
        if self.depth_size != (gpu.width(), gpu.height()) {
            self.depth_view = Self::create_depth_view(gpu);
            self.depth_size = (gpu.width(), gpu.height());
        }
    }

    /// Draws one frame. Surface errors are returned for the caller to recover from.
    pub fn render(&mut self, gpu: &GpuContext, scene: &DeskScene) -> Result<(), wgpu::SurfaceError> {
        self.ensure_depth_size(gpu);

        let frame = FrameUniforms::new(
            &scene.camera,
            gpu.aspect(),
            &scene.directional,
            &scene.flashlight,
            scene.lights(),
        );
        gpu.queue
            .write_buffer(&self.frame_buffer, 0, bytemuck::cast_slice(&[frame]));

        for (item, mesh) in self.items.iter().zip(scene.visible()) {
            gpu.queue.write_buffer(
                &item.model_buffer,
                0,
                bytemuck::cast_slice(&[ModelUniforms::new(mesh)]),
            );
        }

        let output = gpu.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Scene Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_bind_group(0, &self.frame_bind_group, &[]);

            for item in &self.items {
                let Some(pipeline) = self.shaders.pipeline(item.shader) else {
                    continue;
                };
                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(1, &item.model_bind_group, &[]);
                render_pass.set_bind_group(2, &item.texture_bind_group, &[]);
                render_pass.set_vertex_buffer(0, item.mesh.vertex_buffer.slice(..));
                render_pass.set_index_buffer(item.mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..item.mesh.index_count, 0, 0..1);
            }
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}
