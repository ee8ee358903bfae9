use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::{Vec2, Vec3};

use crate::error::MeshError;
use crate::mesh::{Mesh, Shape, require_count, require_positive};
use crate::shapes::grid_indices;

/// A UV sphere centered on the origin with its poles on the Z axis.
///
/// Vertices form a `(slices + 1) × (stacks + 1)` grid, with the seam and the poles duplicated
/// so texture coordinates can run the full `[0, 1]` range. All modes share vertices.
#[derive(Clone, Debug)]
pub struct Sphere {
    mesh: Mesh,
    radius: f32,
    slices: u32,
    stacks: u32,
}

impl Sphere {
    pub const DEFAULT_RADIUS: f32 = 0.5;
    pub const DEFAULT_SLICES: u32 = 32;
    pub const DEFAULT_STACKS: u32 = 16;

    pub fn new(mesh: Mesh, radius: f32, slices: u32, stacks: u32) -> Self {
        Self {
            mesh,
            radius,
            slices,
            stacks,
        }
    }

    pub fn with_defaults(mesh: Mesh) -> Self {
        Self::new(
            mesh,
            Self::DEFAULT_RADIUS,
            Self::DEFAULT_SLICES,
            Self::DEFAULT_STACKS,
        )
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }
}

impl Shape for Sphere {
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
        require_positive("sphere", "radius", self.radius)?;
        require_count("sphere", "slices", self.slices, 1)?;
        require_count("sphere", "stacks", self.stacks, 1)?;

        let mut writer = self.mesh.begin()?;

        let horizontal_step = TAU / self.slices as f32;
        let vertical_step = PI / self.stacks as f32;

        for stack in 0..=self.stacks {
            let vertical = -FRAC_PI_2 + stack as f32 * vertical_step;
            for slice in 0..=self.slices {
                let horizontal = slice as f32 * horizontal_step;

                let direction = Vec3::new(
                    horizontal.cos() * vertical.cos(),
                    horizontal.sin() * vertical.cos(),
                    vertical.sin(),
                );
                let uv = Vec2::new(
                    slice as f32 / self.slices as f32,
                    stack as f32 / self.stacks as f32,
                );
                writer.vertex(direction * self.radius, direction, uv);
            }
        }

        grid_indices(&mut writer, self.slices, self.stacks);

        self.mesh.finish("sphere", writer);
        Ok(())
    }
}
