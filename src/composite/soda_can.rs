use crate::composite::Assembly;
use crate::error::MeshError;
use crate::mesh::{Mesh, Shape, require_count, require_positive};
use crate::shapes::{Cylinder, Frustum};

/// Proportions of a standard 12 oz can, in centimeters.
const STANDARD_HEIGHT: f32 = 12.4;
const STANDARD_RADIUS: f32 = 3.31;
const BASE_HEIGHT: f32 = 0.74;
const BODY_HEIGHT: f32 = 10.3;
const TOP_HEIGHT: f32 = 1.16;
const RING_HEIGHT: f32 = 0.2;
const TAPERED_RADIUS: f32 = 2.6;
const RING_RADIUS: f32 = 2.65;

/// A beverage can: tapered base, straight body, tapered shoulder and a rim ring.
///
/// All four sections scale with the given radius and height using the proportions of a
/// standard 12 oz can. The body uses the lower 227/256 of the label texture; the caps and the
/// rim share the upper-left quadrant.
#[derive(Clone, Debug)]
pub struct SodaCan {
    mesh: Mesh,
    radius: f32,
    height: f32,
    sectors: u32,
}

impl SodaCan {
    pub const DEFAULT_RADIUS: f32 = STANDARD_RADIUS;
    pub const DEFAULT_HEIGHT: f32 = STANDARD_HEIGHT;
    pub const DEFAULT_SECTORS: u32 = 50;

    pub fn new(mesh: Mesh, radius: f32, height: f32, sectors: u32) -> Self {
        Self {
            mesh,
            radius,
            height,
            sectors,
        }
    }

    pub fn with_defaults(mesh: Mesh) -> Self {
        Self::new(
            mesh,
            Self::DEFAULT_RADIUS,
            Self::DEFAULT_HEIGHT,
            Self::DEFAULT_SECTORS,
        )
    }
}

impl Shape for SodaCan {
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
        require_positive("soda can", "radius", self.radius)?;
        require_positive("soda can", "height", self.height)?;
        require_count("soda can", "sectors", self.sectors, 3)?;

        let mut assembly = Assembly::begin("soda can", &mut self.mesh)?;

        let scale = self.height / STANDARD_HEIGHT;
        let base_height = BASE_HEIGHT * scale;
        let body_height = BODY_HEIGHT * scale;
        let top_height = TOP_HEIGHT * scale;
        let ring_height = RING_HEIGHT * scale;

        let small_radius = TAPERED_RADIUS / STANDARD_RADIUS * self.radius;
        let ring_radius = RING_RADIUS / STANDARD_RADIUS * self.radius;
        let n = self.sectors;

        let mut base = Frustum::new(
            assembly.part().u_clamp(0.0, 0.5).v_clamp(0.5, 1.0),
            self.radius,
            small_radius,
            base_height,
            n,
        );
        base.translate_mesh(0.0, -body_height / 2.0 - base_height / 2.0, 0.0);
        assembly.add("base", base)?;

        let body = Cylinder::new(
            assembly.part().v_clamp(0.0, 227.0 / 256.0),
            self.radius,
            body_height,
            n,
        );
        assembly.add("body", body)?;

        let mut top = Frustum::new(
            assembly.part().v_clamp(227.0 / 512.0, 285.0 / 512.0),
            small_radius,
            self.radius,
            top_height,
            n,
        );
        top.translate_mesh(0.0, body_height / 2.0 + top_height / 2.0, 0.0);
        assembly.add("top", top)?;

        let mut ring = Cylinder::new(
            assembly.part().u_clamp(0.0, 0.5).v_clamp(0.5, 1.0),
            ring_radius,
            ring_height,
            n,
        );
        ring.translate_mesh(0.0, body_height / 2.0 + top_height + ring_height / 2.0, 0.0);
        assembly.add("ring", ring)?;

        assembly.finish(&mut self.mesh, |rest| {
            rest.translate_mesh(0.0, base_height + body_height / 2.0, 0.0);
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composite::test_support::*;
    use crate::layout::VertexMode;
    use crate::shapes::test_support::*;
    use approx::assert_relative_eq;

    #[test]
    fn four_sections_merge() {
        let mut can = SodaCan::new(Mesh::new(VertexMode::PositionColor), 3.31, 12.4, 16);
        can.generate_vertices().unwrap();
        let mesh = can.mesh();

        assert_well_formed(mesh);
        assert_eq!(mesh.vertex_count(), 4 * (2 * 16 + 2));
        assert_eq!(mesh.element_count(), 4 * 4 * 16 * 3);
    }

    #[test]
    fn stands_on_the_ground() {
        let mut can = SodaCan::new(Mesh::new(VertexMode::PositionNormalUv), 3.31, 12.4, 24);
        can.generate_vertices().unwrap();

        let (lo, hi) = y_extent(can.mesh());
        assert_relative_eq!(lo, 0.0, epsilon = 1e-4);
        // base, body, shoulder and rim stack up to the full height
        assert_relative_eq!(hi, 0.74 + 10.3 + 1.16 + 0.2, epsilon = 1e-3);
    }

    #[test]
    fn scales_with_height() {
        let mut can = SodaCan::new(Mesh::new(VertexMode::PositionUv), 3.31, 24.8, 12);
        can.generate_vertices().unwrap();

        let (lo, hi) = y_extent(can.mesh());
        assert_relative_eq!(lo, 0.0, epsilon = 1e-4);
        assert_relative_eq!(hi, 24.8, epsilon = 1e-3);
        assert_uvs_within_clamps(can.mesh());
    }
}
