//! Render pipelines per vertex mode, and the uniforms they read.
//!
//! Every pipeline shares one pipeline layout:
//! - **Group 0**: [`FrameUniforms`], written once per frame (camera and all lights)
//! - **Group 1**: [`ModelUniforms`], one buffer per drawn mesh
//! - **Group 2**: two texture views and a sampler
//!
//! | Mode               | Shading                                            |
//! |--------------------|----------------------------------------------------|
//! | `PositionColor`    | Flat vertex color                                  |
//! | `PositionUv`       | Base texture, overlay mixed in by its alpha        |
//! | `PositionNormalUv` | Phong: directional, point and camera spot lights   |
//! | `PositionColorUv`  | None; asking for it is an error                    |

use std::collections::HashMap;

use glam::{Mat3, Mat4, Vec3};

use crate::camera::Camera;
use crate::error::MeshError;
use crate::gpu::GpuContext;
use crate::layout::VertexMode;
use crate::light::{CubeLight, DirectionalLight, SpotLight};
use crate::mesh::{Mesh, ShaderId};

/// Point lights beyond this count are ignored by the lit shader.
pub const MAX_POINT_LIGHTS: usize = 16;

/// Specular exponent of every lit surface.
pub const SHININESS: f32 = 32.0;

const COMMON_WGSL: &str = include_str!("shaders/common.wgsl");

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointLightUniform {
    pub position: [f32; 4],
    pub color: [f32; 4],
    /// Ambient, diffuse and specular strength.
    pub strengths: [f32; 4],
    /// Constant, linear and quadratic attenuation.
    pub attenuation: [f32; 4],
}

impl PointLightUniform {
    pub fn from_cube_light(light: &CubeLight) -> Self {
        let record = light.light();
        Self {
            position: light.position().extend(1.0).to_array(),
            color: light.light_color().extend(1.0).to_array(),
            strengths: [record.ambient, record.diffuse, record.specular, 0.0],
            attenuation: record.attenuation().extend(0.0).to_array(),
        }
    }
}

/// Per-frame uniforms: the camera and every light in the scene.
///
/// All vectors are padded to `vec4` so the layout matches WGSL without explicit padding.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 4],
    pub camera_front: [f32; 4],
    pub dir_direction: [f32; 4],
    pub dir_ambient: [f32; 4],
    pub dir_diffuse: [f32; 4],
    pub dir_specular: [f32; 4],
    /// Cosines of the cut-off and outer cut-off, then shininess.
    pub spot_params: [f32; 4],
    pub spot_attenuation: [f32; 4],
    pub spot_ambient: [f32; 4],
    pub spot_diffuse: [f32; 4],
    pub spot_specular: [f32; 4],
    pub point_lights: [PointLightUniform; MAX_POINT_LIGHTS],
    /// `x` is the number of point lights in use.
    pub counts: [u32; 4],
}

fn padded(v: Vec3) -> [f32; 4] {
    v.extend(0.0).to_array()
}

impl FrameUniforms {
    pub fn new<'a>(
        camera: &Camera,
        aspect: f32,
        directional: &DirectionalLight,
        spot: &SpotLight,
        lights: impl IntoIterator<Item = &'a CubeLight>,
    ) -> Self {
        let mut point_lights = [PointLightUniform::default(); MAX_POINT_LIGHTS];
        let mut count = 0;
        for light in lights {
            if count == MAX_POINT_LIGHTS {
                log::warn!("more than {MAX_POINT_LIGHTS} point lights; the rest are ignored");
                break;
            }
            point_lights[count] = PointLightUniform::from_cube_light(light);
            count += 1;
        }

        Self {
            view_proj: camera.view_projection(aspect).to_cols_array_2d(),
            camera_pos: camera.position.extend(1.0).to_array(),
            camera_front: padded(camera.front()),
            dir_direction: padded(directional.direction),
            dir_ambient: padded(directional.ambient),
            dir_diffuse: padded(directional.diffuse),
            dir_specular: padded(directional.specular),
            spot_params: [
                spot.cut_off.to_radians().cos(),
                spot.outer_cut_off.to_radians().cos(),
                SHININESS,
                0.0,
            ],
            spot_attenuation: padded(spot.attenuation),
            spot_ambient: padded(spot.ambient),
            spot_diffuse: padded(spot.diffuse),
            spot_specular: padded(spot.specular),
            point_lights,
            counts: [count as u32, 0, 0, 0],
        }
    }
}

/// Per-mesh uniforms.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelUniforms {
    pub model: [[f32; 4]; 4],
    /// Inverse transpose of the model matrix's upper 3x3.
    pub normal_matrix: [[f32; 4]; 4],
    pub color: [f32; 4],
    /// `x` is the number of textures bound.
    pub params: [u32; 4],
}

impl ModelUniforms {
    pub fn new(mesh: &Mesh) -> Self {
        let model = mesh.model();
        let normal_matrix = Mat4::from_mat3(Mat3::from_mat4(model).inverse().transpose());
        Self {
            model: model.to_cols_array_2d(),
            normal_matrix: normal_matrix.to_cols_array_2d(),
            color: mesh.color_value().unwrap_or(glam::Vec4::ONE).to_array(),
            params: [mesh.texture_ids().len() as u32, 0, 0, 0],
        }
    }
}

/// WGSL source for a mode's pipeline: the shared bindings followed by the mode's stages.
fn shader_source(mode: VertexMode) -> Result<String, MeshError> {
    let body = match mode {
        VertexMode::PositionColor => include_str!("shaders/position_color.wgsl"),
        VertexMode::PositionUv => include_str!("shaders/position_uv.wgsl"),
        VertexMode::PositionNormalUv => include_str!("shaders/position_normal_uv.wgsl"),
        VertexMode::PositionColorUv => return Err(MeshError::UnsupportedVertexMode(mode)),
    };
    Ok(format!("{COMMON_WGSL}\n{body}"))
}

fn uniform_layout_entry() -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding: 0,
        visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn texture_layout_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

/// Compiles pipelines on first use and hands out a [`ShaderId`] per vertex mode.
pub struct ShaderRegistry {
    pub(crate) frame_layout: wgpu::BindGroupLayout,
    pub(crate) model_layout: wgpu::BindGroupLayout,
    pub(crate) texture_layout: wgpu::BindGroupLayout,
    pipeline_layout: wgpu::PipelineLayout,
    pipelines: Vec<wgpu::RenderPipeline>,
    by_mode: HashMap<VertexMode, ShaderId>,
}

impl ShaderRegistry {
    pub fn new(gpu: &GpuContext) -> Self {
        let device = &gpu.device;

        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Frame Bind Group Layout"),
            entries: &[uniform_layout_entry()],
        });

        let model_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Model Bind Group Layout"),
            entries: &[uniform_layout_entry()],
        });

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Texture Bind Group Layout"),
            entries: &[
                texture_layout_entry(0),
                texture_layout_entry(1),
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&frame_layout, &model_layout, &texture_layout],
            push_constant_ranges: &[],
        });

        Self {
            frame_layout,
            model_layout,
            texture_layout,
            pipeline_layout,
            pipelines: Vec::new(),
            by_mode: HashMap::new(),
        }
    }

    /// Returns the shader for `mode`, compiling its pipeline the first time.
    pub fn shader_for(&mut self, gpu: &GpuContext, mode: VertexMode) -> Result<ShaderId, MeshError> {
        if let Some(&id) = self.by_mode.get(&mode) {
            return Ok(id);
        }

        let source = shader_source(mode)?;
        let pipeline = self.create_pipeline(gpu, mode, source);
        self.pipelines.push(pipeline);

        let id = ShaderId(self.pipelines.len() - 1);
        self.by_mode.insert(mode, id);
        log::debug!("compiled pipeline for {mode:?}");
        Ok(id)
    }

    pub fn pipeline(&self, id: ShaderId) -> Option<&wgpu::RenderPipeline> {
        self.pipelines.get(id.0)
    }

    fn create_pipeline(
        &self,
        gpu: &GpuContext,
        mode: VertexMode,
        source: String,
    ) -> wgpu::RenderPipeline {
        let device = &gpu.device;
        let label = format!("{mode:?} Pipeline");

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&label),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(&label),
            layout: Some(&self.pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs"),
                buffers: &[mode.layout().buffer_layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: gpu.config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(wgpu::Face::Back),
                front_face: wgpu::FrontFace::Ccw,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
    }
}
