//! Multi-part meshes assembled from primitives.
//!
//! A composite is a single [`Mesh`] whose geometry is the concatenation of many placed
//! primitives. Generation follows the same steps for every composite:
//!
//! 1. Check the vertex mode and resolve the composite's color once
//! 2. For each part, in a fixed order: build it in centimeters with the composite's mode and
//!    color plus its own texture clamps, apply its placement, generate, bake (some parts are
//!    placed and baked a second time)
//! 3. Append every part's vertices and its indices rebased by the vertices merged so far
//! 4. Bake a "rest" placement that stands the object on the ground at the origin, converting
//!    to inches if asked, without disturbing the composite's own placement
//!
//! ```
//! use deskscape::{Mesh, Shape, SodaCan, UnitOfMeasure, VertexMode};
//!
//! let base = Mesh::new(VertexMode::PositionNormalUv).unit(UnitOfMeasure::Inch);
//! let mut can = SodaCan::new(base, 3.31, 12.4, 32);
//! can.generate_vertices()?;
//! # Ok::<(), deskscape::MeshError>(())
//! ```

mod back_scratcher;
mod headset;
mod ps5_controller;
mod soda_can;

pub use back_scratcher::BackScratcher;
pub use headset::Headset;
pub use ps5_controller::Ps5Controller;
pub use soda_can::SodaCan;

use glam::Vec4;

use crate::error::MeshError;
use crate::layout::{UnitOfMeasure, VertexMode};
use crate::mesh::{Mesh, Shape};

/// Collects the parts of one composite into a merged vertex and index buffer.
pub(crate) struct Assembly {
    name: &'static str,
    mode: VertexMode,
    color: Vec4,
    merged: Mesh,
    parts: usize,
}

impl Assembly {
    /// Starts assembling into `composite`, resolving its color if unset.
    pub(crate) fn begin(name: &'static str, composite: &mut Mesh) -> Result<Self, MeshError> {
        let mode = composite.vertex_mode();
        if !mode.is_supported() {
            return Err(MeshError::UnsupportedVertexMode(mode));
        }

        Ok(Self {
            name,
            mode,
            color: composite.resolve_color(),
            merged: Mesh::new(mode),
            parts: 0,
        })
    }

    /// A fresh base mesh for the next part: centimeters, the composite's mode and color.
    pub(crate) fn part(&self) -> Mesh {
        Mesh::new(self.mode)
            .unit(UnitOfMeasure::Centimeter)
            .color(self.color)
    }

    /// Generates and bakes a placed part, then appends it to the merged buffers.
    pub(crate) fn add(&mut self, part: &'static str, mut shape: impl Shape) -> Result<(), MeshError> {
        shape
            .generate_vertices()
            .map_err(|err| err.in_part(part))?;
        shape.bake();
        self.merge(part, &shape);
        Ok(())
    }

    /// Like [`add`](Self::add), with a second placement stage.
    ///
    /// The part's own placement is baked first. `restage` then places the baked geometry, and
    /// that placement is baked before merging. Two stages differ from one combined placement
    /// whenever the second rotation does not commute with the first translation.
    pub(crate) fn add_staged<S: Shape>(
        &mut self,
        part: &'static str,
        mut shape: S,
        restage: impl FnOnce(&mut S),
    ) -> Result<(), MeshError> {
        shape
            .generate_vertices()
            .map_err(|err| err.in_part(part))?;
        shape.bake();
        restage(&mut shape);
        shape.bake();
        self.merge(part, &shape);
        Ok(())
    }

    fn merge(&mut self, part: &'static str, shape: &impl Shape) {
        let offset = self.merged.vertex_count();
        self.merged.append(shape.mesh());
        self.parts += 1;

        log::trace!(
            "{}: merged `{part}` at vertex {offset} ({} vertices)",
            self.name,
            shape.mesh().vertex_count()
        );
    }

    /// Moves the merged buffers into `composite` and bakes the rest placement.
    ///
    /// `rest` receives the merged mesh with an identity placement and moves it into its resting
    /// pose. It may bake intermediate steps itself. The inch conversion is applied after it. The
    /// composite's own placement is saved beforehand and restored afterwards, so it stays
    /// available for later adjustments.
    pub(crate) fn finish(self, composite: &mut Mesh, rest: impl FnOnce(&mut Mesh)) {
        composite.copy_buffers_from(&self.merged);

        let saved = *composite.placement();
        composite.placement_mut().reset();
        rest(composite);

        if composite.unit_of_measure() == UnitOfMeasure::Inch {
            let factor = UnitOfMeasure::Inch.scale_factor();
            composite.scale_mesh(factor, factor, factor);
        }
        composite.bake();
        *composite.placement_mut() = saved;

        log::debug!(
            "assembled {} from {} parts: {} vertices, {} indices",
            self.name,
            self.parts,
            composite.vertex_count(),
            composite.element_count()
        );
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Cube, Cylinder, Pyramid, Torus};
    use crate::shapes::test_support::assert_well_formed;
    use crate::transform::{RotationOrder, Transform};
    use approx::assert_relative_eq;

    fn assemble(mode: VertexMode, unit: UnitOfMeasure) -> Result<Mesh, MeshError> {
        let mut composite = Mesh::new(mode)
            .unit(unit)
            .transform(Transform::new().with_translation(5.0, 0.0, 0.0));
        let mut assembly = Assembly::begin("test", &mut composite)?;

        let mut cube = Cube::with_defaults(assembly.part());
        cube.translate_mesh(0.0, 1.0, 0.0);
        assembly.add("cube", cube)?;
        assembly.add("pyramid", Pyramid::with_defaults(assembly.part()))?;

        assembly.finish(&mut composite, |rest| rest.translate_mesh(0.0, 0.5, 0.0));
        Ok(composite)
    }

    #[test]
    fn merge_rebases_indices_by_running_vertex_count() {
        let mesh = assemble(VertexMode::PositionColor, UnitOfMeasure::Centimeter).unwrap();

        assert_well_formed(&mesh);
        assert_eq!(mesh.vertex_count(), 8 + 5);
        assert_eq!(mesh.element_count(), 36 + 18);
        // the pyramid's first triangle (0, 1, 2) lands after the cube's 8 vertices
        assert_eq!(&mesh.indices()[36..39], &[8, 9, 10]);
    }

    #[test]
    fn every_part_index_is_offset_by_earlier_vertices() {
        for mode in VertexMode::SUPPORTED {
            let mut composite = Mesh::new(mode);
            let mut assembly = Assembly::begin("test", &mut composite).unwrap();

            let mut cube = Cube::with_defaults(assembly.part());
            cube.translate_mesh(3.0, 0.0, 0.0);
            let cylinder = Cylinder::new(assembly.part(), 0.5, 2.0, 9);
            let mut torus = Torus::new(assembly.part(), 1.0, 0.25, 7, 5);
            torus.rotate_mesh(90.0, 0.0, 0.0, RotationOrder::ZYX);

            let standalone: [Box<dyn Shape>; 3] = [
                Box::new(cube.clone()),
                Box::new(cylinder.clone()),
                Box::new(torus.clone()),
            ];
            let parts: Vec<Mesh> = standalone
                .into_iter()
                .map(|mut shape| {
                    shape.generate_vertices().unwrap();
                    shape.mesh().clone()
                })
                .collect();

            assembly.add("cube", cube).unwrap();
            assembly.add("cylinder", cylinder).unwrap();
            assembly.add("torus", torus).unwrap();
            assembly.finish(&mut composite, |_| {});

            assert_well_formed(&composite);
            let mut vertex_offset = 0;
            let mut index_offset = 0;
            for part in &parts {
                let merged = &composite.indices()[index_offset..index_offset + part.element_count()];
                for (&local, &global) in part.indices().iter().zip(merged) {
                    assert_eq!(global, local + vertex_offset, "{mode:?}");
                }
                vertex_offset += part.vertex_count() as u32;
                index_offset += part.element_count();
            }
            assert_eq!(vertex_offset as usize, composite.vertex_count());
            assert_eq!(index_offset, composite.element_count());
        }
    }

    #[test]
    fn staged_parts_bake_between_placements() {
        let mut composite = Mesh::new(VertexMode::PositionColor);
        let mut assembly = Assembly::begin("test", &mut composite).unwrap();

        let mut cube = Cube::with_defaults(assembly.part());
        cube.translate_mesh(0.0, 0.0, 1.0);
        assembly
            .add_staged("cube", cube, |cube| {
                cube.rotate_mesh(0.0, 90.0, 0.0, RotationOrder::ZYX);
            })
            .unwrap();
        assembly.finish(&mut composite, |_| {});

        // The offset is baked first, so the second rotation swings it from +Z onto +X.
        let center = test_support::centroid(&composite, 0..8);
        assert!(center.abs_diff_eq(glam::Vec3::X, 1e-5), "center {center}");
    }

    #[test]
    fn parts_share_the_composite_color() {
        let mesh = assemble(VertexMode::PositionColor, UnitOfMeasure::Centimeter).unwrap();
        let color = mesh.color_value().unwrap().to_array();

        for vertex in mesh.vertex_chunks() {
            assert_eq!(&vertex[3..7], &color);
        }
    }

    #[test]
    fn rest_placement_is_baked_and_placement_restored() {
        let mesh = assemble(VertexMode::PositionUv, UnitOfMeasure::Centimeter).unwrap();

        // cube spans y 0.5..1.5 and pyramid -0.5..0.5, both lifted by 0.5
        let (lo, hi) = test_support::y_extent(&mesh);
        assert_relative_eq!(lo, 0.0, epsilon = 1e-5);
        assert_relative_eq!(hi, 2.0, epsilon = 1e-5);
        assert_eq!(mesh.placement().position().x, 5.0);
    }

    #[test]
    fn inch_scale_joins_the_scale_component() {
        let mesh = assemble(VertexMode::PositionUv, UnitOfMeasure::Inch).unwrap();

        // The model is translation * rotation * scale, so the rest offset itself stays in
        // centimeters while the geometry shrinks.
        let (lo, hi) = test_support::y_extent(&mesh);
        assert_relative_eq!(lo, -0.5 * 0.394 + 0.5, epsilon = 1e-5);
        assert_relative_eq!(hi, 1.5 * 0.394 + 0.5, epsilon = 1e-5);
    }

    #[test]
    fn part_failures_name_the_part() {
        let mut composite = Mesh::new(VertexMode::PositionColor);
        let mut assembly = Assembly::begin("test", &mut composite).unwrap();
        let bad = Cube::new(assembly.part(), 1.0, 0.0, 1.0);

        let err = assembly.add("lid", bad).unwrap_err();
        assert!(matches!(err, MeshError::Part { part: "lid", .. }));
    }

    #[test]
    fn unsupported_mode_fails_before_any_part() {
        let mut composite = Mesh::new(VertexMode::PositionColorUv);
        assert!(matches!(
            Assembly::begin("test", &mut composite),
            Err(MeshError::UnsupportedVertexMode(_))
        ));
        assert!(composite.color_value().is_none());
    }
}
