//! # Deskscape
//!
//! **Procedural meshes for a small desk scene, rendered with wgpu.**
//!
//! Every object in the scene is generated from numbers: primitives (plane, cube, pyramid,
//! frustum, cylinder, sphere, torus) and composites built from them (a soda can, a game
//! controller, a headset and a back scratcher). The mesh engine is CPU-only and has no GPU or
//! file dependencies. The driver side uploads the meshes, lights them and lets you walk
//! around the desk with a first-person camera.
//!
//! ## Quick Start
//!
//! ```
//! use deskscape::{Mesh, RotationOrder, Shape, SodaCan, VertexMode};
//! use glam::Vec4;
//!
//! let base = Mesh::new(VertexMode::PositionNormalUv).color(Vec4::new(0.5, 0.5, 0.5, 1.0));
//! let mut can = SodaCan::new(base, 3.31, 12.4, 50);
//! can.generate_vertices()?;
//! can.translate_mesh(22.0, 0.0, -13.0);
//! can.rotate_mesh(0.0, 120.0, 0.0, RotationOrder::default());
//!
//! let mesh = can.into_mesh();
//! assert!(mesh.is_generated());
//! assert_eq!(mesh.indices().len() % 3, 0);
//! # Ok::<(), deskscape::MeshError>(())
//! ```
//!
//! ## Layout
//!
//! - [`VertexLayout`], [`Transform`], [`Mesh`] and [`Shape`] form the mesh core
//! - the shapes and composites generate geometry
//! - [`CubeLight`] adds a point light to a cube
//! - [`GpuContext`], [`GpuMesh`], [`ShaderRegistry`], [`TextureStore`] and [`SceneRenderer`]
//!   put it on screen; [`DeskScene`], [`Camera`] and [`InputHandler`] drive the binary

mod camera;
mod composite;
mod config;
mod error;
mod gpu;
mod gpu_mesh;
mod input;
mod layout;
mod light;
mod mesh;
mod renderer;
mod scene;
mod shader;
mod shapes;
mod texture;
mod transform;

pub use camera::{Camera, Movement, Projection};
pub use composite::{BackScratcher, Headset, Ps5Controller, SodaCan};
pub use config::AppConfig;
pub use error::{MeshError, SceneError, TextureError};
pub use gpu::GpuContext;
pub use gpu_mesh::GpuMesh;
pub use input::InputHandler;
pub use layout::{UnitOfMeasure, VertexLayout, VertexMode};
pub use light::{CubeLight, Direction, DirectionalLight, PingPong, PointLight, SpotLight};
pub use mesh::{ClampRange, Mesh, ShaderId, Shape, TextureId, VertexWriter, calculate_normal};
pub use renderer::SceneRenderer;
pub use scene::DeskScene;
pub use shader::{
    FrameUniforms, MAX_POINT_LIGHTS, ModelUniforms, PointLightUniform, SHININESS, ShaderRegistry,
};
pub use shapes::{Cube, Cylinder, Frustum, Plane, Pyramid, Sphere, Torus};
pub use texture::{Texture, TextureLoader, TextureSource, TextureStore};
pub use transform::{RotationOrder, Transform, rotation_in_order};
