use glam::{Vec2, Vec3};

use crate::error::MeshError;
use crate::layout::VertexMode;
use crate::mesh::{Mesh, Shape, require_positive};

/// A flat rectangle in the XZ plane at y = 0, facing +Y.
#[derive(Clone, Debug)]
pub struct Plane {
    mesh: Mesh,
    width: f32,
    length: f32,
}

impl Plane {
    pub const DEFAULT_WIDTH: f32 = 1.0;
    pub const DEFAULT_LENGTH: f32 = 1.0;

    /// Creates a plane `width` along X by `length` along Z.
    pub fn new(mesh: Mesh, width: f32, length: f32) -> Self {
        Self {
            mesh,
            width,
            length,
        }
    }

    /// Creates a 1 × 1 plane.
    pub fn with_defaults(mesh: Mesh) -> Self {
        Self::new(mesh, Self::DEFAULT_WIDTH, Self::DEFAULT_LENGTH)
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn length(&self) -> f32 {
        self.length
    }
}

impl Shape for Plane {
    fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    fn mesh_mut(&mut self) -> &mut Mesh {
        &mut self.mesh
    }

    fn into_mesh(self) -> Mesh {
        self.mesh
    }

    fn generate_vertices(&mut self) -> Result<(), MeshError> {
        require_positive("plane", "width", self.width)?;
        require_positive("plane", "length", self.length)?;

        let mut writer = self.mesh.begin()?;

        let right = self.width / 2.0;
        let left = -right;
        let front = self.length / 2.0;
        let back = -front;

        let left_front = Vec3::new(left, 0.0, front);
        let left_back = Vec3::new(left, 0.0, back);
        let right_back = Vec3::new(right, 0.0, back);
        let right_front = Vec3::new(right, 0.0, front);

        match writer.mode() {
            VertexMode::PositionColor => {
                for corner in [left_front, left_back, right_back, right_front] {
                    writer.point(corner);
                }
                writer.indices(&[0, 1, 2, 0, 3, 2]);
            }
            VertexMode::PositionUv => {
                writer.triangle([
                    (left_front, Vec2::new(0.0, 0.0)),
                    (left_back, Vec2::new(0.0, 1.0)),
                    (right_back, Vec2::new(1.0, 1.0)),
                ]);
                writer.triangle([
                    (left_front, Vec2::new(0.0, 0.0)),
                    (right_front, Vec2::new(1.0, 0.0)),
                    (right_back, Vec2::new(1.0, 1.0)),
                ]);
            }
            VertexMode::PositionNormalUv => {
                writer.triangle([
                    (left_front, Vec2::new(0.0, 0.0)),
                    (left_back, Vec2::new(0.0, 1.0)),
                    (right_back, Vec2::new(1.0, 1.0)),
                ]);
                writer.triangle([
                    (right_back, Vec2::new(1.0, 1.0)),
                    (right_front, Vec2::new(1.0, 0.0)),
                    (left_front, Vec2::new(0.0, 0.0)),
                ]);
            }
            mode => return Err(MeshError::UnsupportedVertexMode(mode)),
        }

        self.mesh.finish("plane", writer);
        Ok(())
    }
}
