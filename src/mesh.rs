//! CPU-side mesh data and the [`Shape`] contract every generator implements.
//!
//! This module provides the building blocks shared by all procedural geometry:
//!
//! - [`Mesh`]: flat vertex and index buffers plus everything that shapes how they are
//!   produced and drawn: vertex layout, placement, color, texture clamps and handles
//! - [`Shape`]: the trait with the single required operation, `generate_vertices`
//! - [`VertexWriter`]: the helper generators use to emit vertices in the mesh's layout
//! - [`calculate_normal`]: the outward-facing triangle normal used by every generator
//!
//! # Lifecycle
//!
//! 1. Construct a shape around a base [`Mesh`] (vertex mode, units, shader, initial placement)
//! 2. Optionally set a color and texture clamps
//! 3. Call [`Shape::generate_vertices`]
//! 4. Adjust the placement and optionally [`bake`](Mesh::bake) it into the vertices
//! 5. Upload with [`GpuMesh::upload`](crate::GpuMesh::upload)
//!
//! ```
//! use deskscape::{Cube, Mesh, Shape, VertexMode};
//!
//! let mut cube = Cube::new(Mesh::new(VertexMode::PositionColor), 2.0, 2.0, 2.0);
//! cube.generate_vertices()?;
//! assert_eq!(cube.mesh().vertex_count(), 8);
//! assert_eq!(cube.mesh().element_count(), 36);
//! # Ok::<(), deskscape::MeshError>(())
//! ```

use glam::{Mat3, Mat4, Vec2, Vec3, Vec4};
use rand::Rng;

use crate::error::MeshError;
use crate::layout::{UnitOfMeasure, VertexLayout, VertexMode};
use crate::transform::{RotationOrder, Transform};

/// Opaque handle to a compiled shader program, issued by
/// [`ShaderRegistry`](crate::ShaderRegistry).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ShaderId(pub(crate) usize);

/// Opaque handle to a loaded texture, issued by [`TextureStore`](crate::TextureStore).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureId(pub(crate) usize);

/// A sub-range of texture space that a generator's natural `[0, 1]` output is remapped into.
///
/// Used to pack several parts of a composite into one texture atlas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClampRange {
    pub min: f32,
    pub max: f32,
}

impl Default for ClampRange {
    fn default() -> Self {
        Self { min: 0.0, max: 1.0 }
    }
}

impl ClampRange {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Remaps `value` from `[0, 1]` into `[min, max]`.
    pub fn apply(&self, value: f32) -> f32 {
        value * (self.max - self.min) + self.min
    }
}

/// Normal of the triangle `(v1, v2, v3)`, flipped to point away from the origin.
///
/// The direction test compares against the vector from `v1` to the origin, so the result is
/// only meaningful for convex shapes centered near the origin. Every generator builds its
/// geometry around the origin before any placement is baked.
pub fn calculate_normal(v1: Vec3, v2: Vec3, v3: Vec3) -> Vec3 {
    let mut normal = (v2 - v1).cross(v3 - v1);
    if normal.dot(-v1) >= 0.0 {
        normal = -normal;
    }
    normal.normalize()
}

/// Mesh geometry and the state that controls how it is generated, placed and drawn.
///
/// A `Mesh` on its own holds no geometry; shapes own one and fill it from
/// [`Shape::generate_vertices`]. Builder methods configure the base before a shape wraps it:
///
/// ```
/// use deskscape::{Mesh, Transform, UnitOfMeasure, VertexMode};
///
/// let base = Mesh::new(VertexMode::PositionNormalUv)
///     .unit(UnitOfMeasure::Inch)
///     .transform(Transform::new().with_translation(0.0, 1.0, 0.0))
///     .color(glam::Vec4::new(0.5, 0.5, 0.5, 1.0));
/// ```
#[derive(Clone, Debug)]
pub struct Mesh {
    layout: VertexLayout,
    unit: UnitOfMeasure,
    transform: Transform,
    color: Option<Vec4>,
    u_clamp: ClampRange,
    v_clamp: ClampRange,
    texture_ids: Vec<TextureId>,
    shader: Option<ShaderId>,
    vertices: Vec<f32>,
    indices: Vec<u32>,
    generated: bool,
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new(VertexMode::default())
    }
}

impl Mesh {
    /// Creates an empty mesh for the given vertex mode, in centimeters, with an identity
    /// placement, an unset color and full-range texture clamps.
    pub fn new(mode: VertexMode) -> Self {
        Self {
            layout: mode.layout(),
            unit: UnitOfMeasure::default(),
            transform: Transform::default(),
            color: None,
            u_clamp: ClampRange::default(),
            v_clamp: ClampRange::default(),
            texture_ids: Vec::new(),
            shader: None,
            vertices: Vec::new(),
            indices: Vec::new(),
            generated: false,
        }
    }

    pub fn unit(mut self, unit: UnitOfMeasure) -> Self {
        self.unit = unit;
        self
    }

    pub fn shader(mut self, shader: ShaderId) -> Self {
        self.shader = Some(shader);
        self
    }

    /// Sets the initial placement.
    pub fn transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn color(mut self, color: Vec4) -> Self {
        self.color = Some(color);
        self
    }

    pub fn u_clamp(mut self, min: f32, max: f32) -> Self {
        self.u_clamp = ClampRange::new(min, max);
        self
    }

    pub fn v_clamp(mut self, min: f32, max: f32) -> Self {
        self.v_clamp = ClampRange::new(min, max);
        self
    }

    // Layout

    pub fn layout(&self) -> VertexLayout {
        self.layout
    }

    pub fn vertex_mode(&self) -> VertexMode {
        self.layout.mode()
    }

    pub fn unit_of_measure(&self) -> UnitOfMeasure {
        self.unit
    }

    pub fn floats_per_position(&self) -> usize {
        self.layout.floats_per_position
    }

    pub fn floats_per_color(&self) -> usize {
        self.layout.floats_per_color
    }

    pub fn floats_per_normal(&self) -> usize {
        self.layout.floats_per_normal
    }

    pub fn floats_per_uv(&self) -> usize {
        self.layout.floats_per_uv
    }

    /// Bytes between consecutive vertices.
    pub fn stride(&self) -> usize {
        self.layout.stride()
    }

    // Buffers

    pub fn vertices(&self) -> &[f32] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Number of logical vertices (buffer length divided by floats per vertex).
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / self.layout.floats_per_vertex()
    }

    /// Number of indices.
    pub fn element_count(&self) -> usize {
        self.indices.len()
    }

    /// Size of the vertex buffer in bytes.
    pub fn vertex_buffer_size(&self) -> usize {
        std::mem::size_of_val(self.vertices.as_slice())
    }

    /// Size of the index buffer in bytes.
    pub fn element_buffer_size(&self) -> usize {
        std::mem::size_of_val(self.indices.as_slice())
    }

    /// Returns true once a generator has filled the buffers.
    pub fn is_generated(&self) -> bool {
        self.generated
    }

    /// Position of the vertex at `index`.
    pub fn position(&self, index: usize) -> Vec3 {
        let start = index * self.layout.floats_per_vertex();
        Vec3::from_slice(&self.vertices[start..start + 3])
    }

    /// Iterates over the vertices as slices of `floats_per_vertex` scalars.
    pub fn vertex_chunks(&self) -> std::slice::ChunksExact<'_, f32> {
        self.vertices.chunks_exact(self.layout.floats_per_vertex())
    }

    // Appearance

    /// The mesh color, or `None` while it is still unset.
    pub fn color_value(&self) -> Option<Vec4> {
        self.color
    }

    pub fn set_color(&mut self, color: Vec4) {
        self.color = Some(color);
    }

    pub fn texture_u_clamp(&self) -> ClampRange {
        self.u_clamp
    }

    pub fn texture_v_clamp(&self) -> ClampRange {
        self.v_clamp
    }

    /// Sets the U clamp range. Fails once vertices have been generated.
    pub fn set_texture_u_clamp(&mut self, min: f32, max: f32) -> Result<(), MeshError> {
        if self.generated {
            return Err(MeshError::ClampAfterGeneration);
        }
        self.u_clamp = ClampRange::new(min, max);
        Ok(())
    }

    /// Sets the V clamp range. Fails once vertices have been generated.
    pub fn set_texture_v_clamp(&mut self, min: f32, max: f32) -> Result<(), MeshError> {
        if self.generated {
            return Err(MeshError::ClampAfterGeneration);
        }
        self.v_clamp = ClampRange::new(min, max);
        Ok(())
    }

    /// Appends a texture handle. The first is the base (diffuse) map, the second the
    /// specular map or overlay.
    pub fn add_texture_id(&mut self, id: TextureId) {
        self.texture_ids.push(id);
    }

    pub fn texture_ids(&self) -> &[TextureId] {
        &self.texture_ids
    }

    pub fn shader_id(&self) -> Option<ShaderId> {
        self.shader
    }

    pub fn set_shader(&mut self, shader: ShaderId) {
        self.shader = Some(shader);
    }

    // Placement

    pub fn placement(&self) -> &Transform {
        &self.transform
    }

    pub fn placement_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    /// The model matrix `translation * rotation * scale`.
    pub fn model(&self) -> Mat4 {
        self.transform.model()
    }

    pub fn set_scale(&mut self, x: f32, y: f32, z: f32) {
        self.transform.set_scale(x, y, z);
    }

    pub fn set_rotation(&mut self, rx: f32, ry: f32, rz: f32, order: RotationOrder) {
        self.transform.set_rotation(rx, ry, rz, order);
    }

    pub fn set_translation(&mut self, x: f32, y: f32, z: f32) {
        self.transform.set_translation(x, y, z);
    }

    pub fn scale_mesh(&mut self, x: f32, y: f32, z: f32) {
        self.transform.scale_mesh(x, y, z);
    }

    pub fn rotate_mesh(&mut self, rx: f32, ry: f32, rz: f32, order: RotationOrder) {
        self.transform.rotate_mesh(rx, ry, rz, order);
    }

    pub fn translate_mesh(&mut self, x: f32, y: f32, z: f32) {
        self.transform.translate_mesh(x, y, z);
    }

    /// Writes the current placement into the vertex data and resets it to identity.
    ///
    /// Positions are transformed by the model matrix. Normals, when the layout has them, are
    /// transformed by the inverse-transpose of the model matrix so they stay perpendicular
    /// under non-uniform scale. They are not renormalized.
    pub fn bake(&mut self) {
        let model = self.transform.model();
        let normal_matrix = Mat3::from_mat4(model.inverse().transpose());
        let stride = self.layout.floats_per_vertex();
        let normal_offset = self.layout.normal_offset();
        let has_normal = self.layout.has_normal();

        for vertex in self.vertices.chunks_exact_mut(stride) {
            let position = model.transform_point3(Vec3::from_slice(&vertex[0..3]));
            vertex[0..3].copy_from_slice(&position.to_array());

            if has_normal {
                let normals = &mut vertex[normal_offset..normal_offset + 3];
                let normal = normal_matrix * Vec3::from_slice(normals);
                normals.copy_from_slice(&normal.to_array());
            }
        }

        self.transform.reset();
    }

    /// Appends another mesh's geometry, shifting its indices past the current vertices.
    ///
    /// Both meshes must share a vertex layout.
    pub fn append(&mut self, other: &Mesh) {
        debug_assert_eq!(self.layout, other.layout, "appending mismatched vertex layouts");

        let offset = self.vertex_count() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.indices
            .extend(other.indices.iter().map(|index| index + offset));
    }

    /// Starts a generation pass.
    ///
    /// Rejects unsupported vertex modes, resolves an unset color to a random opaque one
    /// (stored back on the mesh) and returns a writer that emits vertices in this mesh's
    /// layout with its clamps applied.
    pub fn begin(&mut self) -> Result<VertexWriter, MeshError> {
        let mode = self.vertex_mode();
        if !mode.is_supported() {
            return Err(MeshError::UnsupportedVertexMode(mode));
        }

        let color = self.resolve_color();

        Ok(VertexWriter {
            layout: self.layout,
            color,
            u_clamp: self.u_clamp,
            v_clamp: self.v_clamp,
            vertices: Vec::new(),
            indices: Vec::new(),
        })
    }

    /// Returns the mesh color, first picking a random opaque one if it is unset.
    pub fn resolve_color(&mut self) -> Vec4 {
        *self.color.get_or_insert_with(random_color)
    }

    /// Finishes a generation pass, replacing the buffers with the writer's output.
    pub fn finish(&mut self, shape: &'static str, writer: VertexWriter) {
        self.vertices = writer.vertices;
        self.indices = writer.indices;
        self.generated = true;

        log::debug!(
            "generated {shape} ({:?}): {} vertices, {} indices",
            self.vertex_mode(),
            self.vertex_count(),
            self.element_count()
        );
    }

    /// Replaces the buffers with another mesh's, as when a shape delegates to another.
    pub(crate) fn copy_buffers_from(&mut self, other: &Mesh) {
        self.vertices = other.vertices.clone();
        self.indices = other.indices.clone();
        self.generated = true;
    }
}

fn random_color() -> Vec4 {
    let mut rng = rand::rng();
    Vec4::new(rng.random(), rng.random(), rng.random(), 1.0)
}

/// Emits vertices in a mesh's layout during generation.
///
/// Each call writes only the attributes the layout carries, in storage order, so a single
/// triangulation routine serves every supported vertex mode. Texture coordinates are passed
/// in their natural `[0, 1]` range and remapped through the mesh's clamps here.
#[derive(Debug)]
pub struct VertexWriter {
    layout: VertexLayout,
    color: Vec4,
    u_clamp: ClampRange,
    v_clamp: ClampRange,
    vertices: Vec<f32>,
    indices: Vec<u32>,
}

impl VertexWriter {
    pub fn mode(&self) -> VertexMode {
        self.layout.mode()
    }

    /// The resolved color written into color layouts.
    pub fn color(&self) -> Vec4 {
        self.color
    }

    /// Index the next emitted vertex will get.
    pub fn next_index(&self) -> u32 {
        (self.vertices.len() / self.layout.floats_per_vertex()) as u32
    }

    /// Writes one vertex. Attributes the layout lacks are ignored.
    pub fn vertex(&mut self, position: Vec3, normal: Vec3, uv: Vec2) {
        self.vertices.extend_from_slice(&position.to_array());
        if self.layout.has_color() {
            self.vertices.extend_from_slice(&self.color.to_array());
        }
        if self.layout.has_normal() {
            self.vertices.extend_from_slice(&normal.to_array());
        }
        if self.layout.has_uv() {
            self.vertices
                .extend_from_slice(&[self.u_clamp.apply(uv.x), self.v_clamp.apply(uv.y)]);
        }
    }

    /// Writes a position-only vertex (color layouts fill in the mesh color).
    pub fn point(&mut self, position: Vec3) {
        self.vertex(position, Vec3::ZERO, Vec2::ZERO);
    }

    /// Writes an unshared triangle with its own three vertices and sequential indices.
    ///
    /// The face normal comes from [`calculate_normal`] and is shared by all three vertices.
    pub fn triangle(&mut self, corners: [(Vec3, Vec2); 3]) {
        let normal = if self.layout.has_normal() {
            calculate_normal(corners[0].0, corners[1].0, corners[2].0)
        } else {
            Vec3::ZERO
        };

        let base = self.next_index();
        for (position, uv) in corners {
            self.vertex(position, normal, uv);
        }
        self.indices.extend_from_slice(&[base, base + 1, base + 2]);
    }

    pub fn indices(&mut self, indices: &[u32]) {
        self.indices.extend_from_slice(indices);
    }

    pub fn push_index(&mut self, index: u32) {
        self.indices.push(index);
    }
}

/// Checks that a dimension is finite and strictly positive.
pub(crate) fn require_positive(
    shape: &'static str,
    name: &'static str,
    value: f32,
) -> Result<(), MeshError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(MeshError::InvalidParameter { shape, name, value })
    }
}

/// Checks that a subdivision count is at least `min`.
pub(crate) fn require_count(
    shape: &'static str,
    name: &'static str,
    value: u32,
    min: u32,
) -> Result<(), MeshError> {
    if value >= min {
        Ok(())
    } else {
        Err(MeshError::InvalidParameter {
            shape,
            name,
            value: value as f32,
        })
    }
}

/// A procedurally generated mesh.
///
/// Implementors own a base [`Mesh`] and fill it from their parameters in
/// [`generate_vertices`](Shape::generate_vertices). The provided methods forward the common
/// mesh operations so callers rarely need [`mesh_mut`](Shape::mesh_mut) directly.
pub trait Shape {
    /// The underlying mesh.
    fn mesh(&self) -> &Mesh;

    fn mesh_mut(&mut self) -> &mut Mesh;

    /// Consumes the shape, keeping only its mesh.
    fn into_mesh(self) -> Mesh
    where
        Self: Sized;

    /// Fills the vertex and index buffers from the shape's parameters.
    ///
    /// Reads the current vertex mode, color and texture clamps. Fails with
    /// [`MeshError::UnsupportedVertexMode`] for `PositionColorUv` and with
    /// [`MeshError::InvalidParameter`] for out-of-range dimensions or subdivision counts.
    fn generate_vertices(&mut self) -> Result<(), MeshError>;

    fn set_color(&mut self, color: Vec4) {
        self.mesh_mut().set_color(color);
    }

    fn set_texture_u_clamp(&mut self, min: f32, max: f32) -> Result<(), MeshError> {
        self.mesh_mut().set_texture_u_clamp(min, max)
    }

    fn set_texture_v_clamp(&mut self, min: f32, max: f32) -> Result<(), MeshError> {
        self.mesh_mut().set_texture_v_clamp(min, max)
    }

    fn add_texture_id(&mut self, id: TextureId) {
        self.mesh_mut().add_texture_id(id);
    }

    fn scale_mesh(&mut self, x: f32, y: f32, z: f32) {
        self.mesh_mut().scale_mesh(x, y, z);
    }

    fn rotate_mesh(&mut self, rx: f32, ry: f32, rz: f32, order: RotationOrder) {
        self.mesh_mut().rotate_mesh(rx, ry, rz, order);
    }

    fn translate_mesh(&mut self, x: f32, y: f32, z: f32) {
        self.mesh_mut().translate_mesh(x, y, z);
    }

    fn bake(&mut self) {
        self.mesh_mut().bake();
    }
}
