use crate::composite::Assembly;
use crate::error::MeshError;
use crate::mesh::{Mesh, Shape, require_count};
use crate::shapes::{Cube, Cylinder, Sphere, Torus};
use crate::transform::RotationOrder;

const BODY_WIDTH: f32 = 14.0;
const BODY_HEIGHT: f32 = 4.0;
const BODY_LENGTH: f32 = 6.5;
const BODY_CURVE_RADIUS: f32 = BODY_HEIGHT / 2.0;
const HANDLE_RADIUS: f32 = BODY_CURVE_RADIUS;
const HANDLE_LENGTH: f32 = 6.5;

const STICK_OPENING_RADIUS: f32 = 0.8;
const STICK_OPENING_THICKNESS: f32 = 0.4;
const STICK_STEM_HEIGHT: f32 = 0.6;
const STICK_STEM_RADIUS: f32 = 0.4;
const STICK_TOP_HEIGHT: f32 = 0.4;
const STICK_TOP_RADIUS: f32 = 0.9;

/// The body curves are long and always get a fine subdivision.
const CURVE_SECTORS: u32 = 100;

/// A game controller: a tilted body block rounded by three cylinders, two handles capped with
/// spheres, and two thumbsticks (ring, stem and cap each).
///
/// `sectors` drives the spheres, tori and thumbstick cylinders. The texture is a 3x2 atlas: the
/// body and handles use the left two thirds, the thumbsticks the left third.
#[derive(Clone, Debug)]
pub struct Ps5Controller {
    mesh: Mesh,
    sectors: u32,
}

impl Ps5Controller {
    pub const DEFAULT_SECTORS: u32 = 50;

    pub fn new(mesh: Mesh, sectors: u32) -> Self {
        Self { mesh, sectors }
    }

    pub fn with_defaults(mesh: Mesh) -> Self {
        Self::new(mesh, Self::DEFAULT_SECTORS)
    }
}

impl Shape for Ps5Controller {
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
        require_count("ps5 controller", "sectors", self.sectors, 3)?;

        let mut assembly = Assembly::begin("ps5 controller", &mut self.mesh)?;
        let n = self.sectors;

        let mut body = Cube::new(
            assembly.part(),
            BODY_WIDTH - BODY_CURVE_RADIUS * 2.0,
            BODY_HEIGHT,
            BODY_LENGTH - BODY_CURVE_RADIUS,
        );
        body.rotate_mesh(-10.0, 0.0, 0.0, RotationOrder::ZYX);
        assembly.add("body", body)?;

        for (name, side) in [("left body curve", -1.0), ("right body curve", 1.0)] {
            let mut curve = Cylinder::new(
                assembly.part().u_clamp(0.0, 2.0 / 3.0).v_clamp(0.0, 0.5),
                BODY_CURVE_RADIUS,
                BODY_LENGTH - BODY_CURVE_RADIUS - 0.001,
                CURVE_SECTORS,
            );
            curve.translate_mesh(side * (BODY_WIDTH / 2.0 - BODY_CURVE_RADIUS), 0.0, 0.0);
            curve.rotate_mesh(-100.0, 180.0, 0.0, RotationOrder::ZYX);
            assembly.add(name, curve)?;
        }

        let mut front = Cylinder::new(
            assembly.part().u_clamp(1.0 / 3.0, 1.0),
            BODY_CURVE_RADIUS,
            BODY_WIDTH - BODY_CURVE_RADIUS * 2.0,
            CURVE_SECTORS,
        );
        front.translate_mesh(0.0, 0.4, BODY_LENGTH / 2.0 - 1.0);
        front.rotate_mesh(0.0, -80.0, -90.0, RotationOrder::YZX);
        assembly.add("front body curve", front)?;

        let handle_offset = BODY_LENGTH / 2.0 + (HANDLE_LENGTH - HANDLE_RADIUS) / 2.0;
        for (handle_name, end_name, side) in [
            ("left handle", "left handle end", -1.0),
            ("right handle", "right handle end", 1.0),
        ] {
            let mut handle = Cylinder::new(
                assembly.part().u_clamp(0.0, 2.0 / 3.0),
                BODY_CURVE_RADIUS,
                HANDLE_LENGTH - HANDLE_RADIUS,
                CURVE_SECTORS,
            );
            handle.translate_mesh(
                side * (BODY_WIDTH / 2.0 - BODY_CURVE_RADIUS + 0.45),
                0.0,
                handle_offset - 1.7,
            );
            handle.rotate_mesh(-80.0, 180.0, side * 15.0, RotationOrder::YZX);
            assembly.add(handle_name, handle)?;

            let mut end = Sphere::new(
                assembly.part().u_clamp(0.0, 2.0 / 3.0).v_clamp(0.0, 0.5),
                BODY_CURVE_RADIUS - 0.001,
                n,
                n,
            );
            end.translate_mesh(
                side * (BODY_WIDTH / 2.0 - BODY_CURVE_RADIUS + 1.0),
                -0.3561,
                handle_offset + 0.32,
            );
            end.rotate_mesh(10.0, 0.0, 0.0, RotationOrder::ZYX);
            assembly.add(end_name, end)?;
        }

        let opening_outer = STICK_OPENING_RADIUS + STICK_OPENING_THICKNESS;
        let stick_y = BODY_HEIGHT - 1.7;
        let stick_z = BODY_LENGTH / 1.5 - opening_outer / 2.0;
        for (names, side) in [
            (["left stick opening", "left stick stem", "left stick top"], -1.0),
            (["right stick opening", "right stick stem", "right stick top"], 1.0),
        ] {
            let x = side * BODY_WIDTH / 6.0;

            let mut opening = Torus::new(
                assembly.part().u_clamp(0.0, 1.0 / 3.0).v_clamp(0.0, 0.5),
                opening_outer,
                STICK_OPENING_RADIUS,
                n,
                n,
            );
            opening.translate_mesh(x, stick_y, stick_z - 1.8);
            opening.rotate_mesh(-100.0, 0.0, 0.0, RotationOrder::ZYX);
            assembly.add(names[0], opening)?;

            let mut stem = Cylinder::new(
                assembly.part().u_clamp(0.0, 1.0 / 3.0).v_clamp(0.0, 0.5),
                STICK_STEM_RADIUS,
                STICK_STEM_HEIGHT,
                n,
            );
            stem.translate_mesh(x, stick_y + STICK_STEM_HEIGHT / 2.0, stick_z - 1.85);
            stem.rotate_mesh(-10.0, 0.0, 0.0, RotationOrder::ZYX);
            assembly.add(names[1], stem)?;

            let mut top = Cylinder::new(
                assembly.part().u_clamp(0.0, 1.0 / 3.0).v_clamp(0.5, 1.0),
                STICK_TOP_RADIUS,
                STICK_TOP_HEIGHT,
                n,
            );
            top.translate_mesh(
                x,
                stick_y + STICK_STEM_HEIGHT + STICK_TOP_HEIGHT / 2.0,
                stick_z - 1.95,
            );
            top.rotate_mesh(-10.0, 0.0, 0.0, RotationOrder::ZYX);
            assembly.add(names[2], top)?;
        }

        assembly.finish(&mut self.mesh, |rest| rest.translate_mesh(0.0, 2.35, 0.0));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composite::test_support::centroid;
    use crate::layout::{UnitOfMeasure, VertexMode};
    use crate::shapes::test_support::*;
    use crate::transform::{Transform, rotation_in_order};
    use approx::assert_relative_eq;
    use glam::{Vec3, Vec4};

    fn generated(base: Mesh, sectors: u32) -> Mesh {
        let mut controller = Ps5Controller::new(base, sectors);
        controller.generate_vertices().unwrap();
        controller.into_mesh()
    }

    #[test]
    fn fourteen_parts_merge() {
        let n = 8;
        let mesh = generated(Mesh::new(VertexMode::PositionColor), n);

        // body cube, five fine cylinders, two spheres, two tori, four thumbstick cylinders
        let grid = (n as usize + 1).pow(2);
        let expected = 8 + 5 * (2 * CURVE_SECTORS as usize + 2) + 4 * grid + 4 * (2 * n as usize + 2);
        assert_well_formed(&mesh);
        assert_eq!(mesh.vertex_count(), expected);
    }

    #[test]
    fn handles_are_placed_then_angled_about_their_own_center() {
        let n = 6;
        let mesh = generated(Mesh::new(VertexMode::PositionColor), n);

        let curve = 2 * CURVE_SECTORS as usize + 2;
        let end = (n as usize + 1).pow(2);
        let left = 8 + 3 * curve;
        let right = left + curve + end;

        let handle_offset = BODY_LENGTH / 2.0 + (HANDLE_LENGTH - HANDLE_RADIUS) / 2.0;
        for (start, side) in [(left, -1.0), (right, 1.0)] {
            let center = centroid(&mesh, start..start + curve);
            let expected = Vec3::new(
                side * (BODY_WIDTH / 2.0 - BODY_CURVE_RADIUS + 0.45),
                2.35,
                handle_offset - 1.7,
            );
            assert!(center.abs_diff_eq(expected, 1e-3), "center {center}");

            // top cap center minus bottom cap center
            let axis = mesh.position(start) - mesh.position(start + CURVE_SECTORS as usize + 1);
            let expected_axis = rotation_in_order(-80.0, 180.0, side * 15.0, RotationOrder::YZX)
                .transform_vector3(Vec3::Y * (HANDLE_LENGTH - HANDLE_RADIUS));
            assert!(axis.abs_diff_eq(expected_axis, 1e-4), "axis {axis}");
        }
    }

    #[test]
    fn textured_parts_stay_in_their_atlas_cells() {
        let mesh = generated(Mesh::new(VertexMode::PositionNormalUv), 6);
        assert_well_formed(&mesh);
        assert_uvs_within_clamps(&mesh);
    }

    #[test]
    fn inch_conversion_scales_about_the_rest_offset() {
        let color = Vec4::new(0.1, 0.2, 0.3, 1.0);
        let cm = generated(Mesh::new(VertexMode::PositionColor).color(color), 6);
        let inch = generated(
            Mesh::new(VertexMode::PositionColor)
                .color(color)
                .unit(UnitOfMeasure::Inch),
            6,
        );

        let rest = Vec3::new(0.0, 2.35, 0.0);
        for i in 0..cm.vertex_count() {
            let expected = (cm.position(i) - rest) * UnitOfMeasure::CENTIMETERS_TO_INCHES + rest;
            assert!(inch.position(i).abs_diff_eq(expected, 1e-4), "vertex {i}");
        }
    }

    #[test]
    fn own_placement_survives_generation() {
        let placement = Transform::new().with_translation(0.0, 0.0, 3.0);
        let mesh = generated(
            Mesh::new(VertexMode::PositionUv).transform(placement),
            4,
        );
        assert_relative_eq!(mesh.placement().position().z, 3.0);
    }

    #[test]
    fn too_few_sectors() {
        let mut controller = Ps5Controller::new(Mesh::new(VertexMode::PositionColor), 2);
        assert!(matches!(
            controller.generate_vertices(),
            Err(MeshError::InvalidParameter { name: "sectors", .. })
        ));
    }
}
