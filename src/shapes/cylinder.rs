use crate::error::MeshError;
use crate::mesh::{Mesh, Shape, require_count, require_positive};
use crate::shapes::Frustum;

/// A capped cylinder around the Y axis.
///
/// Generated as a [`Frustum`] with equal radii, so the buffers (and texture layout) are exactly
/// the frustum's.
#[derive(Clone, Debug)]
pub struct Cylinder {
    mesh: Mesh,
    radius: f32,
    height: f32,
    sectors: u32,
}

impl Cylinder {
    pub const DEFAULT_RADIUS: f32 = 1.0;
    pub const DEFAULT_HEIGHT: f32 = 1.0;
    pub const DEFAULT_SECTORS: u32 = 100;

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

impl Shape for Cylinder {
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
        require_positive("cylinder", "radius", self.radius)?;
        require_positive("cylinder", "height", self.height)?;
        require_count("cylinder", "sectors", self.sectors, 3)?;

        let mode = self.mesh.vertex_mode();
        if !mode.is_supported() {
            return Err(MeshError::UnsupportedVertexMode(mode));
        }

        // Resolve here so the cylinder keeps the color its frustum was built with.
        self.mesh.resolve_color();

        let mut frustum = Frustum::new(
            self.mesh.clone(),
            self.radius,
            self.radius,
            self.height,
            self.sectors,
        );
        frustum.generate_vertices()?;

        self.mesh.copy_buffers_from(frustum.mesh());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::VertexMode;
    use crate::shapes::test_support::*;
    use glam::Vec4;

    #[test]
    fn matches_equal_radius_frustum() {
        for mode in VertexMode::SUPPORTED {
            let base = Mesh::new(mode)
                .color(Vec4::new(0.2, 0.4, 0.6, 1.0))
                .u_clamp(0.0, 0.5)
                .v_clamp(0.25, 0.75);

            let mut cylinder = Cylinder::new(base.clone(), 1.5, 3.0, 20);
            cylinder.generate_vertices().unwrap();
            let mut frustum = Frustum::new(base, 1.5, 1.5, 3.0, 20);
            frustum.generate_vertices().unwrap();

            assert_well_formed(cylinder.mesh());
            assert_eq!(cylinder.mesh().vertices(), frustum.mesh().vertices());
            assert_eq!(cylinder.mesh().indices(), frustum.mesh().indices());
        }
    }

    #[test]
    fn keeps_resolved_color() {
        let mut cylinder = Cylinder::with_defaults(Mesh::new(VertexMode::PositionColor));
        cylinder.generate_vertices().unwrap();

        let color = cylinder.mesh().color_value().unwrap();
        assert_eq!(&cylinder.mesh().vertices()[3..7], &color.to_array());
    }

    #[test]
    fn unsupported_mode_propagates() {
        let mut cylinder = Cylinder::with_defaults(Mesh::new(VertexMode::PositionColorUv));
        assert!(matches!(
            cylinder.generate_vertices(),
            Err(MeshError::UnsupportedVertexMode(VertexMode::PositionColorUv))
        ));
        assert!(cylinder.mesh().color_value().is_none());
        assert!(!cylinder.mesh().is_generated());
    }
}
