use glam::{Vec2, Vec3};

use crate::error::MeshError;
use crate::layout::VertexMode;
use crate::mesh::{Mesh, Shape, require_positive};

/// A square-based pyramid with its apex at `(0, height / 2, 0)`.
///
/// Each side is textured with the full `[0, 1]` square, apex at the top center. The left and
/// back sides mirror U so the texture wraps continuously around the corners.
#[derive(Clone, Debug)]
pub struct Pyramid {
    mesh: Mesh,
    width: f32,
    height: f32,
    length: f32,
}

impl Pyramid {
    pub const DEFAULT_SIZE: f32 = 1.0;

    pub fn new(mesh: Mesh, width: f32, height: f32, length: f32) -> Self {
        Self {
            mesh,
            width,
            height,
            length,
        }
    }

    pub fn with_defaults(mesh: Mesh) -> Self {
        Self::new(
            mesh,
            Self::DEFAULT_SIZE,
            Self::DEFAULT_SIZE,
            Self::DEFAULT_SIZE,
        )
    }
}

impl Shape for Pyramid {
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
        require_positive("pyramid", "width", self.width)?;
        require_positive("pyramid", "height", self.height)?;
        require_positive("pyramid", "length", self.length)?;

        let mut writer = self.mesh.begin()?;

        let right = self.width / 2.0;
        let left = -right;
        let top = self.height / 2.0;
        let bottom = -top;
        let front = self.length / 2.0;
        let back = -front;

        let lbf = Vec3::new(left, bottom, front);
        let lbb = Vec3::new(left, bottom, back);
        let rbb = Vec3::new(right, bottom, back);
        let rbf = Vec3::new(right, bottom, front);
        let apex = Vec3::new(0.0, top, 0.0);

        let uv = Vec2::new;
        let peak = uv(0.5, 1.0);

        match writer.mode() {
            VertexMode::PositionColor => {
                for corner in [lbf, lbb, rbb, rbf, apex] {
                    writer.point(corner);
                }
                writer.indices(&[0, 1, 2, 2, 3, 0, 0, 4, 3, 1, 4, 0, 2, 4, 1, 3, 4, 2]);
            }
            mode @ (VertexMode::PositionUv | VertexMode::PositionNormalUv) => {
                writer.triangle([(lbf, uv(0.0, 0.0)), (lbb, uv(0.0, 1.0)), (rbb, uv(1.0, 1.0))]);

                // The lit variant keeps the first base triangle's UVs for the second.
                let second_base = if mode == VertexMode::PositionNormalUv {
                    [uv(0.0, 0.0), uv(0.0, 1.0), uv(1.0, 1.0)]
                } else {
                    [uv(0.0, 0.0), uv(1.0, 0.0), uv(1.0, 1.0)]
                };
                writer.triangle([
                    (lbf, second_base[0]),
                    (rbf, second_base[1]),
                    (rbb, second_base[2]),
                ]);

                writer.triangle([(lbf, uv(0.0, 0.0)), (apex, peak), (rbf, uv(1.0, 0.0))]);
                writer.triangle([(lbb, uv(1.0, 0.0)), (apex, peak), (lbf, uv(0.0, 0.0))]);
                writer.triangle([(lbb, uv(1.0, 0.0)), (apex, peak), (rbb, uv(0.0, 0.0))]);
                writer.triangle([(rbb, uv(0.0, 0.0)), (apex, peak), (rbf, uv(1.0, 0.0))]);
            }
            mode => return Err(MeshError::UnsupportedVertexMode(mode)),
        }

        self.mesh.finish("pyramid", writer);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::test_support::*;

    #[test]
    fn color_pyramid_has_five_corners() {
        let mut pyramid = Pyramid::with_defaults(Mesh::new(VertexMode::PositionColor));
        pyramid.generate_vertices().unwrap();
        let mesh = pyramid.mesh();

        assert_well_formed(mesh);
        assert_eq!(mesh.vertex_count(), 5);
        assert_eq!(mesh.element_count(), 18);
        assert_eq!(mesh.position(4), Vec3::new(0.0, 0.5, 0.0));
    }

    #[test]
    fn uv_pyramid_has_eighteen_vertices() {
        for mode in [VertexMode::PositionUv, VertexMode::PositionNormalUv] {
            let mut pyramid = Pyramid::new(Mesh::new(mode), 2.0, 3.0, 2.0);
            pyramid.generate_vertices().unwrap();

            assert_well_formed(pyramid.mesh());
            assert_uvs_within_clamps(pyramid.mesh());
            assert_eq!(pyramid.mesh().vertex_count(), 18);
        }
    }

    #[test]
    fn side_normals_lean_outwards() {
        let mut pyramid = Pyramid::with_defaults(Mesh::new(VertexMode::PositionNormalUv));
        pyramid.generate_vertices().unwrap();

        let mesh = pyramid.mesh();
        // front side starts at vertex 6
        let front = Vec3::from_slice(&mesh.vertices()[6 * 8 + 3..6 * 8 + 6]);
        assert!(front.z > 0.0 && front.y > 0.0);
        // base faces down
        let base = Vec3::from_slice(&mesh.vertices()[3..6]);
        assert!(base.y < 0.0);
    }

    #[test]
    fn lit_base_reuses_uvs() {
        let mut lit = Pyramid::with_defaults(Mesh::new(VertexMode::PositionNormalUv));
        lit.generate_vertices().unwrap();
        let mut flat = Pyramid::with_defaults(Mesh::new(VertexMode::PositionUv));
        flat.generate_vertices().unwrap();

        // vertex 4 is the right-front base corner
        assert_eq!(&lit.mesh().vertices()[4 * 8 + 6..4 * 8 + 8], &[0.0, 1.0]);
        assert_eq!(&flat.mesh().vertices()[4 * 5 + 3..4 * 5 + 5], &[1.0, 0.0]);
    }
}
