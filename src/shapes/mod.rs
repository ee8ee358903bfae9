//! Parametric primitive generators.
//!
//! Each primitive wraps a base [`Mesh`](crate::Mesh) and implements
//! [`Shape`](crate::Shape). Dimensions are fixed at construction; geometry is produced by
//! `generate_vertices`, which reads the base mesh's vertex mode, color and texture clamps.
//!
//! | Shape      | Defaults                      | `PositionColor`          | UV modes (unshared)  |
//! |------------|-------------------------------|--------------------------|----------------------|
//! | [`Plane`]    | 1 × 1                       | 4 vertices, 2 triangles  | 6 vertices           |
//! | [`Cube`]     | 1 × 1 × 1                   | 8 vertices, 12 triangles | 36 vertices          |
//! | [`Pyramid`]  | 1 × 1 × 1                   | 5 vertices, 6 triangles  | 18 vertices          |
//! | [`Frustum`]  | r 1 / 1, h 1, 100 sectors   | 2N + 2 vertices, 4N triangles | 15N vertices    |
//! | [`Cylinder`] | r 1, h 1, 100 sectors       | as [`Frustum`]           | as [`Frustum`]       |
//! | [`Sphere`]   | r 0.5, 32 slices, 16 stacks | shared grid              | shared grid          |
//! | [`Torus`]    | 0.5 / 0.25, 100 × 100       | shared grid              | shared grid          |
//!
//! All shapes are centered on the origin; the Y axis is up.
//!
//! In the UV modes, triangles that share a corner still get their own vertex so each face can
//! carry its own texture coordinates and normal. The sphere and torus are the exception: their
//! grids share vertices in every mode.

mod cube;
mod cylinder;
mod frustum;
mod plane;
mod pyramid;
mod sphere;
mod torus;

pub use cube::Cube;
pub use cylinder::Cylinder;
pub use frustum::Frustum;
pub use plane::Plane;
pub use pyramid::Pyramid;
pub use sphere::Sphere;
pub use torus::Torus;

use crate::mesh::VertexWriter;

/// Emits the shared index pattern of a `(slices + 1) × (stacks + 1)` vertex grid.
///
/// Each cell becomes the triangles `(r1+s, r2+s+1, r2+s)` and `(r1+s, r1+s+1, r2+s+1)`, where
/// `r1` and `r2` are the first indices of the cell's lower and upper rows.
fn grid_indices(writer: &mut VertexWriter, slices: u32, stacks: u32) {
    for stack in 0..stacks {
        let r1 = stack * (slices + 1);
        let r2 = (stack + 1) * (slices + 1);

        for slice in 0..slices {
            writer.indices(&[
                r1 + slice,
                r2 + slice + 1,
                r2 + slice,
                r1 + slice,
                r1 + slice + 1,
                r2 + slice + 1,
            ]);
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::mesh::Mesh;

    /// Asserts the buffer invariants every generator must uphold.
    pub fn assert_well_formed(mesh: &Mesh) {
        let floats = mesh.layout().floats_per_vertex();
        assert_eq!(mesh.vertices().len() % floats, 0, "partial vertex");
        assert_eq!(mesh.element_count() % 3, 0, "partial triangle");
        assert!(mesh.is_generated());

        let count = mesh.vertex_count() as u32;
        for &index in mesh.indices() {
            assert!(index < count, "index {index} out of {count}");
        }
        for value in mesh.vertices() {
            assert!(value.is_finite());
        }
    }

    /// Asserts every UV lies within the mesh's clamp rectangle.
    pub fn assert_uvs_within_clamps(mesh: &Mesh) {
        if !mesh.layout().has_uv() {
            return;
        }
        let offset = mesh.layout().uv_offset();
        let (u, v) = (mesh.texture_u_clamp(), mesh.texture_v_clamp());
        for vertex in mesh.vertex_chunks() {
            let (s, t) = (vertex[offset], vertex[offset + 1]);
            assert!(s >= u.min - 1e-5 && s <= u.max + 1e-5, "u {s} outside {u:?}");
            assert!(t >= v.min - 1e-5 && t <= v.max + 1e-5, "v {t} outside {v:?}");
        }
    }
}
