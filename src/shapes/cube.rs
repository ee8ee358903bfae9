use glam::{Vec2, Vec3};

use crate::error::MeshError;
use crate::layout::VertexMode;
use crate::mesh::{Mesh, Shape, require_positive};

/// An axis-aligned box centered on the origin.
///
/// In the UV modes every face samples one cell of a 3 × 2 texture atlas:
///
/// | V \ U     | 0 – ⅓  | ⅓ – ⅔  | ⅔ – 1 |
/// |-----------|--------|--------|-------|
/// | 0.5 – 1   | bottom | back   | top   |
/// | 0 – 0.5   | left   | front  | right |
#[derive(Clone, Debug)]
pub struct Cube {
    mesh: Mesh,
    width: f32,
    height: f32,
    length: f32,
}

impl Cube {
    pub const DEFAULT_SIZE: f32 = 1.0;

    pub fn new(mesh: Mesh, width: f32, height: f32, length: f32) -> Self {
        Self {
            mesh,
            width,
            height,
            length,
        }
    }

    /// Creates a unit cube.
    pub fn with_defaults(mesh: Mesh) -> Self {
        Self::new(
            mesh,
            Self::DEFAULT_SIZE,
            Self::DEFAULT_SIZE,
            Self::DEFAULT_SIZE,
        )
    }

    pub fn dimensions(&self) -> Vec3 {
        Vec3::new(self.width, self.height, self.length)
    }
}

const THIRD: f32 = 1.0 / 3.0;
const TWO_THIRDS: f32 = 2.0 / 3.0;

impl Shape for Cube {
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
        require_positive("cube", "width", self.width)?;
        require_positive("cube", "height", self.height)?;
        require_positive("cube", "length", self.length)?;

        let mut writer = self.mesh.begin()?;

        let right = self.width / 2.0;
        let left = -right;
        let top = self.height / 2.0;
        let bottom = -top;
        let front = self.length / 2.0;
        let back = -front;

        // left/right, bottom/top, front/back
        let lbf = Vec3::new(left, bottom, front);
        let lbb = Vec3::new(left, bottom, back);
        let rbb = Vec3::new(right, bottom, back);
        let rbf = Vec3::new(right, bottom, front);
        let ltf = Vec3::new(left, top, front);
        let ltb = Vec3::new(left, top, back);
        let rtb = Vec3::new(right, top, back);
        let rtf = Vec3::new(right, top, front);

        match writer.mode() {
            VertexMode::PositionColor => {
                for corner in [lbf, lbb, rbb, rbf, ltf, ltb, rtb, rtf] {
                    writer.point(corner);
                }
                #[rustfmt::skip]
                let indices: [u32; 36] = [
                    0, 1, 2,  0, 3, 2, // bottom
                    4, 0, 3,  4, 7, 3, // front
                    5, 1, 0,  5, 4, 0, // left
                    6, 2, 1,  6, 5, 1, // back
                    7, 3, 2,  7, 6, 2, // right
                    5, 4, 7,  5, 6, 7, // top
                ];
                writer.indices(&indices);
            }
            VertexMode::PositionUv | VertexMode::PositionNormalUv => {
                let uv = Vec2::new;
                let faces = [
                    // bottom
                    [(lbf, uv(0.0, 0.5)), (lbb, uv(THIRD, 0.5)), (rbb, uv(THIRD, 1.0))],
                    [(lbf, uv(0.0, 0.5)), (rbf, uv(0.0, 1.0)), (rbb, uv(THIRD, 1.0))],
                    // front
                    [(ltf, uv(THIRD, 0.5)), (lbf, uv(THIRD, 0.0)), (rbf, uv(TWO_THIRDS, 0.0))],
                    [(ltf, uv(THIRD, 0.5)), (rtf, uv(TWO_THIRDS, 0.5)), (rbf, uv(TWO_THIRDS, 0.0))],
                    // left
                    [(ltb, uv(0.0, 0.5)), (lbb, uv(0.0, 0.0)), (lbf, uv(THIRD, 0.0))],
                    [(ltb, uv(0.0, 0.5)), (ltf, uv(THIRD, 0.5)), (lbf, uv(THIRD, 0.0))],
                    // back
                    [(rtb, uv(TWO_THIRDS, 1.0)), (rbb, uv(THIRD, 1.0)), (lbb, uv(THIRD, 0.5))],
                    [(rtb, uv(TWO_THIRDS, 1.0)), (ltb, uv(TWO_THIRDS, 0.5)), (lbb, uv(THIRD, 0.5))],
                    // right
                    [(rtf, uv(TWO_THIRDS, 0.5)), (rbf, uv(TWO_THIRDS, 0.0)), (rbb, uv(1.0, 0.0))],
                    [(rtf, uv(TWO_THIRDS, 0.5)), (rtb, uv(1.0, 0.5)), (rbb, uv(1.0, 0.0))],
                    // top
                    [(ltb, uv(TWO_THIRDS, 0.5)), (ltf, uv(1.0, 0.5)), (rtf, uv(1.0, 1.0))],
                    [(ltb, uv(TWO_THIRDS, 0.5)), (rtb, uv(TWO_THIRDS, 1.0)), (rtf, uv(1.0, 1.0))],
                ];
                for triangle in faces {
                    writer.triangle(triangle);
                }
            }
            mode => return Err(MeshError::UnsupportedVertexMode(mode)),
        }

        self.mesh.finish("cube", writer);
        Ok(())
    }
}
