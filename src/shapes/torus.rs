use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};

use crate::error::MeshError;
use crate::mesh::{Mesh, Shape, require_count, require_positive};
use crate::shapes::grid_indices;

/// A ring torus lying in the XY plane, centered on the origin.
///
/// `outer_radius` and `inner_radius` bound the ring: the tube is centered halfway between them
/// and its radius is half their difference. Stacks run around the ring and slices around the
/// tube.
///
/// Normals use the tube direction `(cos h cos v, cos h sin v, sin h)`, which ignores the ring's
/// own curvature. This matches the shading the rest of the scene was authored against.
#[derive(Clone, Debug)]
pub struct Torus {
    mesh: Mesh,
    outer_radius: f32,
    inner_radius: f32,
    slices: u32,
    stacks: u32,
}

impl Torus {
    pub const DEFAULT_OUTER_RADIUS: f32 = 0.5;
    pub const DEFAULT_INNER_RADIUS: f32 = 0.25;
    pub const DEFAULT_SLICES: u32 = 100;
    pub const DEFAULT_STACKS: u32 = 100;

    pub fn new(mesh: Mesh, outer_radius: f32, inner_radius: f32, slices: u32, stacks: u32) -> Self {
        Self {
            mesh,
            outer_radius,
            inner_radius,
            slices,
            stacks,
        }
    }

    pub fn with_defaults(mesh: Mesh) -> Self {
        Self::new(
            mesh,
            Self::DEFAULT_OUTER_RADIUS,
            Self::DEFAULT_INNER_RADIUS,
            Self::DEFAULT_SLICES,
            Self::DEFAULT_STACKS,
        )
    }

    /// Distance from the origin to the middle of the tube.
    pub fn center_radius(&self) -> f32 {
        (self.inner_radius + self.outer_radius) / 2.0
    }

    pub fn tube_radius(&self) -> f32 {
        self.outer_radius - self.center_radius()
    }
}

impl Shape for Torus {
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
        require_positive("torus", "outer_radius", self.outer_radius)?;
        require_positive("torus", "inner_radius", self.inner_radius)?;
        if self.inner_radius >= self.outer_radius {
            return Err(MeshError::InvalidParameter {
                shape: "torus",
                name: "inner_radius",
                value: self.inner_radius,
            });
        }
        require_count("torus", "slices", self.slices, 1)?;
        require_count("torus", "stacks", self.stacks, 1)?;

        let mut writer = self.mesh.begin()?;

        let horizontal_step = TAU / self.slices as f32;
        let vertical_step = TAU / self.stacks as f32;
        let center_radius = self.center_radius();
        let tube_radius = self.tube_radius();

        for stack in 0..=self.stacks {
            let (v_sin, v_cos) = (-PI + stack as f32 * vertical_step).sin_cos();
            for slice in 0..=self.slices {
                let (h_sin, h_cos) = (slice as f32 * horizontal_step).sin_cos();

                let ring = center_radius + tube_radius * h_cos;
                let position = Vec3::new(ring * v_cos, ring * v_sin, tube_radius * h_sin);
                let normal = Vec3::new(h_cos * v_cos, h_cos * v_sin, h_sin);
                let uv = Vec2::new(
                    slice as f32 / self.slices as f32,
                    stack as f32 / self.stacks as f32,
                );
                writer.vertex(position, normal, uv);
            }
        }

        grid_indices(&mut writer, self.slices, self.stacks);

        self.mesh.finish("torus", writer);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::VertexMode;
    use crate::shapes::test_support::*;
    use approx::assert_relative_eq;

    #[test]
    fn grid_counts() {
        for mode in VertexMode::SUPPORTED {
            let mut torus = Torus::new(Mesh::new(mode), 1.0, 0.5, 10, 20);
            torus.generate_vertices().unwrap();
            let mesh = torus.mesh();

            assert_well_formed(mesh);
            assert_uvs_within_clamps(mesh);
            assert_eq!(mesh.vertex_count(), 11 * 21);
            assert_eq!(mesh.element_count(), 6 * 10 * 20);
        }
    }

    #[test]
    fn radii_split_between_ring_and_tube() {
        let torus = Torus::with_defaults(Mesh::default());
        assert_relative_eq!(torus.center_radius(), 0.375);
        assert_relative_eq!(torus.tube_radius(), 0.125);
    }

    #[test]
    fn vertices_stay_within_the_ring() {
        let mut torus = Torus::new(Mesh::new(VertexMode::PositionNormalUv), 2.0, 1.0, 16, 16);
        torus.generate_vertices().unwrap();

        for vertex in torus.mesh().vertex_chunks() {
            let position = Vec3::from_slice(&vertex[0..3]);
            let planar = position.truncate().length();
            assert!((1.0 - 1e-4..=2.0 + 1e-4).contains(&planar));
            assert!(position.z.abs() <= 0.5 + 1e-5);

            let normal = Vec3::from_slice(&vertex[3..6]);
            assert_relative_eq!(normal.length(), 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn inner_must_be_smaller_than_outer() {
        let mut torus = Torus::new(Mesh::new(VertexMode::PositionColor), 1.0, 1.0, 8, 8);
        assert!(matches!(
            torus.generate_vertices(),
            Err(MeshError::InvalidParameter { name: "inner_radius", .. })
        ));
    }
}
