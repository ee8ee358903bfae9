use std::f32::consts::{FRAC_PI_2, TAU};

use glam::{Vec2, Vec3};

use crate::error::MeshError;
use crate::layout::VertexMode;
use crate::mesh::{Mesh, Shape, VertexWriter, require_count, require_positive};

/// A truncated cone around the Y axis, with capped ends.
///
/// The circumference is split into `sectors` wedges. In the UV modes each wedge is five
/// triangles: a top cap slice, three side triangles meeting at the midpoint of the bottom
/// edge, and a bottom cap slice. Triangles are grouped by kind in the buffer (all top slices,
/// then every left side, middle side, right side and finally bottom slice).
///
/// The texture layout packs both caps into the upper half of the image and wraps the side
/// around the lower half:
///
/// | Region          | UV area                                |
/// |-----------------|----------------------------------------|
/// | top cap         | circle of radius 0.25 at (0.25, 0.75)  |
/// | bottom cap      | circle of radius 0.25 at (0.75, 0.75)  |
/// | side            | `u` across the full width, `v` 0 – 0.5  |
#[derive(Clone, Debug)]
pub struct Frustum {
    mesh: Mesh,
    top_radius: f32,
    bottom_radius: f32,
    height: f32,
    sectors: u32,
}

impl Frustum {
    pub const DEFAULT_RADIUS: f32 = 1.0;
    pub const DEFAULT_HEIGHT: f32 = 1.0;
    pub const DEFAULT_SECTORS: u32 = 100;

    pub fn new(mesh: Mesh, top_radius: f32, bottom_radius: f32, height: f32, sectors: u32) -> Self {
        Self {
            mesh,
            top_radius,
            bottom_radius,
            height,
            sectors,
        }
    }

    pub fn with_defaults(mesh: Mesh) -> Self {
        Self::new(
            mesh,
            Self::DEFAULT_RADIUS,
            Self::DEFAULT_RADIUS,
            Self::DEFAULT_HEIGHT,
            Self::DEFAULT_SECTORS,
        )
    }

    pub fn sectors(&self) -> u32 {
        self.sectors
    }

    /// Point `index` of a ring of the given radius, at y = 0.
    fn sector_vertex(&self, index: u32, radius: f32) -> Vec3 {
        let angle = index as f32 / self.sectors as f32 * TAU;
        Vec3::new(radius * angle.cos(), 0.0, radius * angle.sin())
    }

    /// Texture coordinate of point `index` on one of the cap circles.
    fn sector_uv(&self, index: u32, top: bool) -> Vec2 {
        let (u_offset, rotation) = if top {
            (0.25, FRAC_PI_2)
        } else {
            (0.75, -FRAC_PI_2)
        };
        let angle = index as f32 / self.sectors as f32 * TAU + rotation;
        Vec2::new(0.25 * angle.cos() + u_offset, 0.25 * angle.sin() + 0.75)
    }

    fn shared_rings(&self, writer: &mut VertexWriter, top: f32, bottom: f32) {
        let n = self.sectors;
        let top_center = 0;
        let bottom_center = n + 1;

        writer.point(Vec3::new(0.0, top, 0.0));
        for i in 0..n {
            writer.point(self.sector_vertex(i, self.top_radius).with_y(top));
        }
        writer.point(Vec3::new(0.0, bottom, 0.0));
        for i in 0..n {
            writer.point(self.sector_vertex(i, self.bottom_radius).with_y(bottom));
        }

        // Wedge i joins ring points i and i + 1, with the first wedge closing the seam.
        let wedges: Vec<[u32; 4]> = (0..n)
            .map(|i| {
                if i == 0 {
                    [n, top_center + 1, 2 * n + 1, bottom_center + 1]
                } else {
                    [i, i + 1, i + n + 1, bottom_center + i + 1]
                }
            })
            .collect();

        for &[top_index, next_top, _, _] in &wedges {
            writer.indices(&[top_center, top_index, next_top]);
        }
        for &[top_index, next_top, bottom_index, _] in &wedges {
            writer.indices(&[top_index, next_top, bottom_index]);
        }
        for &[_, next_top, bottom_index, next_bottom] in &wedges {
            writer.indices(&[bottom_index, next_bottom, next_top]);
        }
        for &[_, _, bottom_index, next_bottom] in &wedges {
            writer.indices(&[bottom_center, bottom_index, next_bottom]);
        }
    }

    fn unshared_wedges(&self, writer: &mut VertexWriter, top: f32, bottom: f32) {
        let n = self.sectors;
        let top_center = Vec3::new(0.0, top, 0.0);
        let bottom_center = Vec3::new(0.0, bottom, 0.0);

        let mut tops = Vec::with_capacity(n as usize);
        let mut lefts = Vec::with_capacity(n as usize);
        let mut middles = Vec::with_capacity(n as usize);
        let mut rights = Vec::with_capacity(n as usize);
        let mut bottoms = Vec::with_capacity(n as usize);

        for i in 0..n {
            let t = self.sector_vertex(i, self.top_radius).with_y(top);
            let next_t = self.sector_vertex(i + 1, self.top_radius).with_y(top);
            let b = self.sector_vertex(i, self.bottom_radius).with_y(bottom);
            let next_b = self.sector_vertex(i + 1, self.bottom_radius).with_y(bottom);
            let mid_b = ((b + next_b) * 0.5).with_y(bottom);

            // The top cap is seen from above, so it walks the circle backwards.
            let top_uv = self.sector_uv(n - i, true);
            let next_top_uv = self.sector_uv(n - i - 1, true);

            let side_u = (n - i) as f32 / n as f32;
            let next_side_u = (n - i - 1) as f32 / n as f32;
            let mid_side_u = (side_u + next_side_u) * 0.5;

            let bottom_uv = self.sector_uv(i, false);
            let next_bottom_uv = self.sector_uv(i + 1, false);

            tops.push([
                (top_center, Vec2::new(0.25, 0.75)),
                (t, top_uv),
                (next_t, next_top_uv),
            ]);
            lefts.push([
                (t, Vec2::new(side_u, 0.5)),
                (mid_b, Vec2::new(mid_side_u, 0.0)),
                (b, Vec2::new(side_u, 0.0)),
            ]);
            middles.push([
                (t, Vec2::new(side_u, 0.5)),
                (mid_b, Vec2::new(mid_side_u, 0.0)),
                (next_t, Vec2::new(next_side_u, 0.5)),
            ]);
            rights.push([
                (next_t, Vec2::new(next_side_u, 0.5)),
                (mid_b, Vec2::new(mid_side_u, 0.0)),
                (next_b, Vec2::new(next_side_u, 0.0)),
            ]);
            bottoms.push([
                (bottom_center, Vec2::new(0.75, 0.75)),
                (b, bottom_uv),
                (next_b, next_bottom_uv),
            ]);
        }

        for triangle in [tops, lefts, middles, rights, bottoms].into_iter().flatten() {
            writer.triangle(triangle);
        }
    }
}

impl Shape for Frustum {
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
        require_positive("frustum", "top_radius", self.top_radius)?;
        require_positive("frustum", "bottom_radius", self.bottom_radius)?;
        require_positive("frustum", "height", self.height)?;
        require_count("frustum", "sectors", self.sectors, 3)?;

        let mut writer = self.mesh.begin()?;

        let top = self.height / 2.0;
        let bottom = -top;

        match writer.mode() {
            VertexMode::PositionColor => self.shared_rings(&mut writer, top, bottom),
            VertexMode::PositionUv | VertexMode::PositionNormalUv => {
                self.unshared_wedges(&mut writer, top, bottom)
            }
            mode => return Err(MeshError::UnsupportedVertexMode(mode)),
        }

        self.mesh.finish("frustum", writer);
        Ok(())
    }
}
