use crate::composite::Assembly;
use crate::error::MeshError;
use crate::mesh::{Mesh, Shape, require_count};
use crate::shapes::{Cube, Cylinder, Pyramid};
use crate::transform::RotationOrder;

const GRIP_RADIUS: f32 = 0.6;
const GRIP_LENGTH: f32 = 11.5;

/// Telescoping tube sections from the grip to the paw, as (radius, length).
const TUBES: [(&str, f32, f32); 5] = [
    ("tube 1", 0.45, 3.7),
    ("tube 2", 0.4, 12.2),
    ("tube 3", 0.35, 12.2),
    ("tube 4", 0.3, 6.1),
    ("paw connector", 0.5, 0.7),
];

const PAW_RADIUS: f32 = 3.0;
const PAW_THICKNESS: f32 = 0.6;
const CLAW_WIDTH: f32 = 0.3;
const CLAW_HEIGHT: f32 = 0.3;
const CLAW_LENGTH: f32 = 1.0;
const CLAW_TIP_LENGTH: f32 = 0.3;

/// A telescoping back scratcher with a bear-paw head and five claws.
///
/// The shaft is built upward along Y from a rubber grip, the paw disc sits on top facing +Z and
/// the claws fan out from its upper edge. At rest the scratcher lies on its side along X,
/// centered on the origin, with the claws pointing up.
#[derive(Clone, Debug)]
pub struct BackScratcher {
    mesh: Mesh,
    sectors: u32,
}

impl BackScratcher {
    pub const DEFAULT_SECTORS: u32 = 50;

    pub fn new(mesh: Mesh, sectors: u32) -> Self {
        Self { mesh, sectors }
    }

    pub fn with_defaults(mesh: Mesh) -> Self {
        Self::new(mesh, Self::DEFAULT_SECTORS)
    }
}

impl Shape for BackScratcher {
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
        require_count("back scratcher", "sectors", self.sectors, 3)?;

        let mut assembly = Assembly::begin("back scratcher", &mut self.mesh)?;
        let n = self.sectors;
        let mut length = 0.0;

        let mut grip = Cylinder::new(
            assembly.part().u_clamp(0.5, 1.0),
            GRIP_RADIUS,
            GRIP_LENGTH,
            n,
        );
        grip.translate_mesh(0.0, length + GRIP_LENGTH / 2.0, 0.0);
        assembly.add("rubber grip", grip)?;
        length += GRIP_LENGTH;

        for (name, radius, tube_length) in TUBES {
            let mut tube = Cylinder::new(assembly.part().u_clamp(0.0, 0.5), radius, tube_length, n);
            tube.translate_mesh(0.0, length + tube_length / 2.0, 0.0);
            assembly.add(name, tube)?;
            length += tube_length;
        }

        let mut paw = Cylinder::new(
            assembly.part().u_clamp(0.0, 0.5),
            PAW_RADIUS,
            PAW_THICKNESS,
            n,
        );
        paw.translate_mesh(0.0, length + PAW_RADIUS, 0.0);
        paw.rotate_mesh(90.0, 0.0, 0.0, RotationOrder::ZYX);
        assembly.add("paw", paw)?;
        length += PAW_RADIUS * 2.0;

        // Claws hang just below the top of the paw, their bases flush with its front face.
        let claw_y = length - CLAW_HEIGHT / 2.0;
        let claw_z = PAW_THICKNESS / 2.0 + CLAW_LENGTH / 2.0;
        let tip_z = PAW_THICKNESS / 2.0 + CLAW_LENGTH + CLAW_TIP_LENGTH / 2.0;
        let claws = [
            ("center claw", "center claw tip", 0.0, 0.0, 0.0),
            ("left claw 1", "left claw 1 tip", -(PAW_RADIUS / 2.5), 0.25, 25.0),
            ("left claw 2", "left claw 2 tip", -(PAW_RADIUS / 1.25 - 0.25), 1.0, 50.0),
            ("right claw 1", "right claw 1 tip", PAW_RADIUS / 2.5, 0.25, -25.0),
            ("right claw 2", "right claw 2 tip", PAW_RADIUS / 1.25 - 0.25, 1.0, -50.0),
        ];

        for (claw_name, tip_name, x, drop, angle) in claws {
            let mut claw = Cube::new(
                assembly.part().u_clamp(0.0, 0.5),
                CLAW_WIDTH,
                CLAW_HEIGHT,
                CLAW_LENGTH,
            );
            if angle != 0.0 {
                claw.rotate_mesh(0.0, 0.0, angle, RotationOrder::ZYX);
            }
            claw.translate_mesh(x, claw_y - drop, claw_z);
            assembly.add(claw_name, claw)?;

            let mut tip = Pyramid::new(
                assembly.part().u_clamp(0.0, 0.5),
                CLAW_WIDTH,
                CLAW_TIP_LENGTH,
                CLAW_HEIGHT,
            );
            tip.rotate_mesh(90.0, 0.0, angle, RotationOrder::XYZ);
            tip.translate_mesh(x, claw_y - drop, tip_z);
            assembly.add(tip_name, tip)?;
        }

        assembly.finish(&mut self.mesh, |rest| {
            rest.translate_mesh(0.0, -(length / 2.0), 0.0);
            rest.bake();

            rest.rotate_mesh(0.0, 90.0, 90.2, RotationOrder::YZX);
            rest.translate_mesh(0.0, GRIP_RADIUS - 0.05, 0.0);
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composite::test_support::{bounds, centroid};
    use crate::layout::VertexMode;
    use crate::shapes::test_support::*;
    use crate::transform::rotation_in_order;
    use approx::assert_abs_diff_eq;
    use glam::{Mat4, Vec3};

    /// Grip, tubes and paw laid end to end.
    const TOTAL_LENGTH: f32 = 11.5 + 3.7 + 12.2 + 12.2 + 6.1 + 0.7 + 6.0;

    #[test]
    fn shaft_head_and_claws_merge() {
        let n = 10;
        let mut scratcher = BackScratcher::new(Mesh::new(VertexMode::PositionColor), n);
        scratcher.generate_vertices().unwrap();
        let mesh = scratcher.mesh();

        // seven cylinders, five claw cubes, five claw tip pyramids
        let n = n as usize;
        assert_well_formed(mesh);
        assert_eq!(mesh.vertex_count(), 7 * (2 * n + 2) + 5 * 8 + 5 * 5);
    }

    #[test]
    fn lies_along_x_centered_on_the_origin() {
        let mut scratcher = BackScratcher::new(Mesh::new(VertexMode::PositionNormalUv), 16);
        scratcher.generate_vertices().unwrap();
        assert_uvs_within_clamps(scratcher.mesh());

        let (lo, hi) = bounds(scratcher.mesh());
        assert_abs_diff_eq!(hi.x - lo.x, TOTAL_LENGTH, epsilon = 0.05);
        assert_abs_diff_eq!(lo.x, -TOTAL_LENGTH / 2.0, epsilon = 0.05);
        // the grip rests on the ground and the claws point up
        assert!(lo.y > -0.5 && lo.y < 0.2, "lowest point {}", lo.y);
        assert!(hi.y > 1.5);
    }

    const SECTORS: usize = 10;
    const CYLINDER: usize = 2 * SECTORS + 2;

    fn generated() -> Mesh {
        let mut scratcher = BackScratcher::new(Mesh::new(VertexMode::PositionColor), SECTORS as u32);
        scratcher.generate_vertices().unwrap();
        scratcher.into_mesh()
    }

    fn rest_rotation() -> Mat4 {
        rotation_in_order(0.0, 90.0, 90.2, RotationOrder::YZX)
    }

    #[test]
    fn shaft_is_centered_before_it_is_laid_down() {
        let mesh = generated();
        let rest = rest_rotation();

        let grip = centroid(&mesh, 0..CYLINDER);
        let expected = rest.transform_point3(Vec3::new(0.0, (GRIP_LENGTH - TOTAL_LENGTH) / 2.0, 0.0))
            + Vec3::new(0.0, GRIP_RADIUS - 0.05, 0.0);
        assert!(grip.abs_diff_eq(expected, 1e-3), "grip {grip}, expected {expected}");

        let axis = mesh.position(0) - mesh.position(SECTORS + 1);
        assert!(axis.abs_diff_eq(rest.transform_vector3(Vec3::Y * GRIP_LENGTH), 5e-4));
    }

    #[test]
    fn claw_tips_cap_their_claws() {
        let mesh = generated();
        let reach = rest_rotation().transform_vector3(Vec3::Z * (CLAW_LENGTH / 2.0 + CLAW_TIP_LENGTH));

        // seven cylinders, then a cube and a pyramid per claw
        for claw in 0..5 {
            let start = 7 * CYLINDER + 13 * claw;
            let center = centroid(&mesh, start..start + 8);
            let apex = mesh.position(start + 8 + 4);
            assert!((apex - center).abs_diff_eq(reach, 5e-4), "claw {claw}");
        }
    }

    #[test]
    fn default_sectors_generate() {
        let mut scratcher = BackScratcher::with_defaults(Mesh::new(VertexMode::PositionUv));
        assert!(scratcher.generate_vertices().is_ok());
        assert!(scratcher.mesh().is_generated());
    }
}
