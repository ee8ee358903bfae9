use crate::composite::Assembly;
use crate::error::MeshError;
use crate::mesh::{Mesh, Shape, require_count};
use crate::shapes::{Cube, Cylinder, Torus};
use crate::transform::RotationOrder;

const FRAME_THICKNESS: f32 = 1.0;
const FRAME_DEPTH: f32 = 3.75;
const UPPER_SEGMENT_WIDTH: f32 = 4.8;
const FOAM_RADIUS: f32 = 0.8;
const LOWER_SEGMENT_WIDTH: f32 = 7.2;
const CONNECTOR_RADIUS: f32 = 0.55;
const CONNECTOR_HEIGHT: f32 = 1.5;
const UPPER_EARPIECE_WIDTH: f32 = 2.5;
const OUTER_EARPIECE_RADIUS: f32 = 4.0;
const OUTER_EARPIECE_THICKNESS: f32 = 2.5;
const INNER_EARPIECE_RADIUS: f32 = 4.15;
const INNER_EARPIECE_THICKNESS: f32 = 2.5;

/// Atlas columns are sevenths of the texture width.
const SEVENTH: f32 = 1.0 / 7.0;

/// Over-ear headphones lying on their back.
///
/// The headband is five flat segments (with foam under the upper three), bent around the head
/// by yaw alone. Connectors and short upright segments lead down to the earcups, each an outer
/// shell cylinder with a torus cushion. The headset is then tipped back slightly so it rests on
/// the cushions and the headband.
#[derive(Clone, Debug)]
pub struct Headset {
    mesh: Mesh,
    sectors: u32,
}

impl Headset {
    pub const DEFAULT_SECTORS: u32 = 50;

    pub fn new(mesh: Mesh, sectors: u32) -> Self {
        Self { mesh, sectors }
    }

    pub fn with_defaults(mesh: Mesh) -> Self {
        Self::new(mesh, Self::DEFAULT_SECTORS)
    }

    fn frame_segment(assembly: &Assembly, width: f32, u: (f32, f32), v: (f32, f32)) -> Cube {
        Cube::new(
            assembly.part().u_clamp(u.0, u.1).v_clamp(v.0, v.1),
            width,
            FRAME_DEPTH,
            FRAME_THICKNESS,
        )
    }

    /// A foam roll lying along X under the band's inner face, before it is moved onto its
    /// segment.
    fn foam(assembly: &Assembly, sectors: u32) -> Cylinder {
        let mut foam = Cylinder::new(
            assembly.part().u_clamp(0.0, SEVENTH).v_clamp(0.5, 1.0),
            FOAM_RADIUS,
            UPPER_SEGMENT_WIDTH,
            sectors,
        );
        foam.translate_mesh(0.0, 0.0, FRAME_THICKNESS / 2.0);
        foam.rotate_mesh(0.0, 0.0, 90.0, RotationOrder::ZYX);
        foam
    }

    fn cushion(assembly: &Assembly, sectors: u32) -> Torus {
        Torus::new(
            assembly.part().u_clamp(SEVENTH, 3.0 * SEVENTH).v_clamp(0.5, 1.0),
            INNER_EARPIECE_RADIUS,
            INNER_EARPIECE_RADIUS - INNER_EARPIECE_THICKNESS,
            sectors,
            sectors,
        )
    }
}

impl Shape for Headset {
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
        require_count("headset", "sectors", self.sectors, 3)?;

        let mut assembly = Assembly::begin("headset", &mut self.mesh)?;
        let n = self.sectors;
        let half_frame = FRAME_THICKNESS / 2.0;
        let upper_x = UPPER_SEGMENT_WIDTH - 0.5;
        let lower_x = UPPER_SEGMENT_WIDTH + 3.58;
        let ear_x = UPPER_SEGMENT_WIDTH + 5.4;

        // Headband, centre then left then right.
        let mut center = Self::frame_segment(
            &assembly,
            UPPER_SEGMENT_WIDTH,
            (2.0 * SEVENTH, 5.0 * SEVENTH),
            (0.0, 0.5),
        );
        center.rotate_mesh(0.0, 180.0, 0.0, RotationOrder::ZYX);
        center.translate_mesh(0.0, 0.0, -10.75 + half_frame);
        assembly.add("upper headband center", center)?;

        assembly.add_staged("upper headband center foam", Self::foam(&assembly, n), |foam| {
            foam.translate_mesh(0.0, 0.0, -10.75 + half_frame);
        })?;

        let mut upper_left = Self::frame_segment(
            &assembly,
            UPPER_SEGMENT_WIDTH,
            (3.0 * SEVENTH, 6.0 * SEVENTH),
            (0.0, 0.5),
        );
        upper_left.rotate_mesh(0.0, 207.0, 0.0, RotationOrder::ZYX);
        upper_left.translate_mesh(-upper_x, 0.0, -9.71 + half_frame);
        assembly.add("upper headband left", upper_left)?;

        assembly.add_staged("upper headband left foam", Self::foam(&assembly, n), |foam| {
            foam.rotate_mesh(0.0, 27.0, 0.0, RotationOrder::ZYX);
            foam.translate_mesh(-upper_x, 0.0, -9.71 + half_frame);
        })?;

        let mut lower_left = Self::frame_segment(
            &assembly,
            LOWER_SEGMENT_WIDTH,
            (4.0 * SEVENTH, 1.0),
            (0.0, 0.5),
        );
        lower_left.rotate_mesh(0.0, 234.0, 0.0, RotationOrder::ZYX);
        lower_left.translate_mesh(-lower_x, 0.0, -5.86 + half_frame);
        assembly.add("lower headband left", lower_left)?;

        let mut upper_right = Self::frame_segment(
            &assembly,
            UPPER_SEGMENT_WIDTH,
            (SEVENTH, 4.0 * SEVENTH),
            (0.0, 0.5),
        );
        upper_right.rotate_mesh(0.0, -207.0, 0.0, RotationOrder::ZYX);
        upper_right.translate_mesh(upper_x, 0.0, -9.71 + half_frame);
        assembly.add("upper headband right", upper_right)?;

        assembly.add_staged("upper headband right foam", Self::foam(&assembly, n), |foam| {
            foam.rotate_mesh(0.0, -27.0, 0.0, RotationOrder::ZYX);
            foam.translate_mesh(upper_x, 0.0, -9.71 + half_frame);
        })?;

        let mut lower_right = Self::frame_segment(
            &assembly,
            LOWER_SEGMENT_WIDTH,
            (0.0, 3.0 * SEVENTH),
            (0.0, 0.5),
        );
        lower_right.rotate_mesh(0.0, -234.0, 0.0, RotationOrder::ZYX);
        lower_right.translate_mesh(lower_x, 0.0, -5.86 + half_frame);
        assembly.add("lower headband right", lower_right)?;

        // Connectors and the short segments above each earcup.
        for (name, side) in [("left connector", -1.0), ("right connector", 1.0)] {
            let mut connector = Cylinder::new(
                assembly.part().u_clamp(0.0, 3.0 * SEVENTH).v_clamp(0.25, 0.5),
                CONNECTOR_RADIUS,
                CONNECTOR_HEIGHT,
                n,
            );
            connector.rotate_mesh(0.0, -side * 80.0, 90.0, RotationOrder::ZYX);
            connector.translate_mesh(side * 10.3, 0.0, -2.1);
            assembly.add(name, connector)?;
        }

        for (name, side) in [("upper earpiece left", -1.0), ("upper earpiece right", 1.0)] {
            let mut segment = Self::frame_segment(
                &assembly,
                UPPER_EARPIECE_WIDTH,
                (0.0, 3.0 * SEVENTH),
                (0.25, 0.5),
            );
            segment.rotate_mesh(0.0, -side * 286.0, 0.0, RotationOrder::ZYX);
            segment.translate_mesh(side * ear_x, 0.0, -1.05 + half_frame);
            assembly.add(name, segment)?;
        }

        // Earcups.
        let cushion_x = 8.2 - INNER_EARPIECE_THICKNESS / 2.0;

        let mut outer_left = Cylinder::new(
            assembly.part().u_clamp(3.0 * SEVENTH, 5.0 * SEVENTH).v_clamp(0.5, 1.0),
            OUTER_EARPIECE_RADIUS,
            OUTER_EARPIECE_THICKNESS,
            n,
        );
        outer_left.rotate_mesh(0.0, 90.0, 0.0, RotationOrder::ZYX);
        outer_left.rotate_mesh(0.0, 10.0, 90.0, RotationOrder::ZYX);
        outer_left.translate_mesh(-8.8, 0.0, 3.9);
        assembly.add("outer earpiece left", outer_left)?;

        let mut inner_left = Self::cushion(&assembly, n);
        inner_left.rotate_mesh(0.0, 100.0, 0.0, RotationOrder::ZYX);
        inner_left.translate_mesh(-cushion_x, 0.0, 3.57);
        assembly.add("inner earpiece left", inner_left)?;

        let mut outer_right = Cylinder::new(
            assembly.part().u_clamp(5.0 * SEVENTH, 1.0).v_clamp(0.5, 1.0),
            OUTER_EARPIECE_RADIUS,
            OUTER_EARPIECE_THICKNESS,
            n,
        );
        outer_right.rotate_mesh(0.0, -90.0, 180.0, RotationOrder::ZYX);
        outer_right.rotate_mesh(0.0, -10.0, 90.0, RotationOrder::ZYX);
        outer_right.translate_mesh(8.8, 0.0, 3.9);
        assembly.add("outer earpiece right", outer_right)?;

        let mut inner_right = Self::cushion(&assembly, n);
        inner_right.rotate_mesh(0.0, -100.0, 0.0, RotationOrder::ZYX);
        inner_right.translate_mesh(cushion_x, 0.0, 3.57);
        assembly.add("inner earpiece right", inner_right)?;

        assembly.finish(&mut self.mesh, |rest| {
            rest.translate_mesh(0.0, 3.45, 0.0);
            rest.rotate_mesh(-8.55, 0.0, 0.0, RotationOrder::ZYX);
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composite::test_support::{bounds, centroid};
    use crate::layout::VertexMode;
    use glam::Vec3;
    use crate::shapes::test_support::*;

    #[test]
    fn sixteen_parts_merge() {
        let n = 12;
        let mut headset = Headset::new(Mesh::new(VertexMode::PositionColor), n);
        headset.generate_vertices().unwrap();
        let mesh = headset.mesh();

        // seven frame cubes, seven cylinders, two cushions
        let n = n as usize;
        let expected = 7 * 8 + 7 * (2 * n + 2) + 2 * (n + 1).pow(2);
        assert_well_formed(mesh);
        assert_eq!(mesh.vertex_count(), expected);
    }

    #[test]
    fn earcups_mirror_across_x() {
        let mut headset = Headset::new(Mesh::new(VertexMode::PositionNormalUv), 24);
        headset.generate_vertices().unwrap();
        assert_uvs_within_clamps(headset.mesh());

        let (lo, hi) = bounds(headset.mesh());
        assert!((lo.x + hi.x).abs() < 0.3, "x bounds {lo} .. {hi}");
        assert!(hi.x > 10.0);
    }

    const SECTORS: u32 = 12;
    const CUBE: usize = 8;
    const CYLINDER: usize = 2 * SECTORS as usize + 2;

    /// Vertex ranges of the upper band segments and their foam, in merge order.
    fn band_and_foam() -> [(std::ops::Range<usize>, std::ops::Range<usize>); 3] {
        let center = 0..CUBE;
        let center_foam = center.end..center.end + CYLINDER;
        let left = center_foam.end..center_foam.end + CUBE;
        let left_foam = left.end..left.end + CYLINDER;
        let lower_left = left_foam.end..left_foam.end + CUBE;
        let right = lower_left.end..lower_left.end + CUBE;
        let right_foam = right.end..right.end + CYLINDER;
        [(center, center_foam), (left, left_foam), (right, right_foam)]
    }

    fn generated() -> Mesh {
        let mut headset = Headset::new(Mesh::new(VertexMode::PositionColor), SECTORS);
        headset.generate_vertices().unwrap();
        headset.into_mesh()
    }

    #[test]
    fn foam_sits_under_its_band_segment() {
        let mesh = generated();

        for (band, foam) in band_and_foam() {
            let band_center = centroid(&mesh, band);
            let foam_center = centroid(&mesh, foam);
            // half the frame thickness inward, along the segment's own normal
            let gap = band_center.distance(foam_center);
            assert!((gap - FRAME_THICKNESS / 2.0).abs() < 1e-3, "{band_center} .. {foam_center}");
        }
    }

    #[test]
    fn side_foam_turns_with_its_segment() {
        let mesh = generated();
        let [_, (_, left_foam), (_, right_foam)] = band_and_foam();

        // The roll is pushed under the band before the 27 degree yaw, then the whole headset
        // is tipped 8.55 degrees onto its cushions.
        let left = centroid(&mesh, left_foam);
        let right = centroid(&mesh, right_foam);
        assert!(left.abs_diff_eq(Vec3::new(-4.073, 2.147, -8.667), 2e-3), "left {left}");
        assert!(right.abs_diff_eq(Vec3::new(4.073, 2.147, -8.667), 2e-3), "right {right}");
    }

    #[test]
    fn foam_rolls_run_along_their_segments() {
        let mesh = generated();
        let n = SECTORS as usize;

        for (band, foam) in band_and_foam() {
            // cylinder vertex 0 is the top cap center, n + 1 the bottom one
            let axis = mesh.position(foam.start) - mesh.position(foam.start + n + 1);
            // cube vertices 0 and 3 are the left and right ends of the bottom front edge
            let along = mesh.position(band.start + 3) - mesh.position(band.start);
            assert!(
                axis.normalize().cross(along.normalize()).length() < 1e-4,
                "foam axis {axis} against band {along}"
            );
            assert!((axis.length() - UPPER_SEGMENT_WIDTH).abs() < 1e-4);
        }
    }

    #[test]
    fn unsupported_mode_is_reported() {
        let mut headset = Headset::with_defaults(Mesh::new(VertexMode::PositionColorUv));
        assert!(matches!(
            headset.generate_vertices(),
            Err(MeshError::UnsupportedVertexMode(VertexMode::PositionColorUv))
        ));
    }
}
