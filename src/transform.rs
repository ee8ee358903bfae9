//! Scale, rotation and translation matrices with configurable rotation order.
//!
//! A [`Transform`] keeps the three components of a mesh's placement as separate 4×4
//! matrices so that each can be replaced outright or adjusted relative to its current value:
//!
//! | Operation          | Effect                                     |
//! |--------------------|--------------------------------------------|
//! | `set_scale`        | `scale = S(x, y, z)`                       |
//! | `set_rotation`     | `rotation = R(rx, ry, rz, order)`          |
//! | `set_translation`  | `translation = T(x, y, z)`                 |
//! | `scale_mesh`       | `scale = S(x, y, z) * scale`               |
//! | `rotate_mesh`      | `rotation = R(rx, ry, rz, order) * rotation` |
//! | `translate_mesh`   | `translation = T(x, y, z) * translation`   |
//!
//! The combined model matrix is always `translation * rotation * scale`, so a vertex is
//! scaled first, then rotated, then translated, no matter in which order the operations
//! above were called.
//!
//! # Example
//!
//! ```
//! use deskscape::{RotationOrder, Transform};
//!
//! let mut transform = Transform::new();
//! transform.translate_mesh(0.0, 2.0, 0.0);
//! transform.rotate_mesh(0.0, 90.0, 0.0, RotationOrder::default());
//! let model = transform.model();
//! ```

use glam::{Mat4, Vec3};

/// The order in which per-axis rotations are applied to a vertex.
///
/// Matrix products apply right-to-left, so each variant multiplies the axis matrices in the
/// reverse of its name: `ZYX` applies Z first and yields `X * Y * Z`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RotationOrder {
    /// Z, then Y, then X: `X * Y * Z`.
    #[default]
    ZYX,
    /// Z, then X, then Y: `Y * X * Z`.
    ZXY,
    /// Y, then Z, then X: `X * Z * Y`.
    YZX,
    /// Y, then X, then Z: `Z * X * Y`.
    YXZ,
    /// X, then Y, then Z: `Z * Y * X`.
    XYZ,
    /// X, then Z, then Y: `Y * Z * X`.
    XZY,
}

impl RotationOrder {
    pub const ALL: [RotationOrder; 6] = [
        RotationOrder::ZYX,
        RotationOrder::ZXY,
        RotationOrder::YZX,
        RotationOrder::YXZ,
        RotationOrder::XYZ,
        RotationOrder::XZY,
    ];
}

/// Builds the combined rotation for the given per-axis angles (in degrees).
///
/// # Example
///
/// ```
/// use deskscape::{RotationOrder, rotation_in_order};
/// use glam::Mat4;
///
/// let r = rotation_in_order(30.0, 0.0, 0.0, RotationOrder::XYZ);
/// let expected = Mat4::from_rotation_x(30.0_f32.to_radians());
/// assert!(r.abs_diff_eq(expected, 1e-6));
/// ```
pub fn rotation_in_order(rx: f32, ry: f32, rz: f32, order: RotationOrder) -> Mat4 {
    let x = Mat4::from_rotation_x(rx.to_radians());
    let y = Mat4::from_rotation_y(ry.to_radians());
    let z = Mat4::from_rotation_z(rz.to_radians());

    match order {
        RotationOrder::ZYX => x * y * z,
        RotationOrder::ZXY => y * x * z,
        RotationOrder::YZX => x * z * y,
        RotationOrder::YXZ => z * x * y,
        RotationOrder::XYZ => z * y * x,
        RotationOrder::XZY => y * z * x,
    }
}

/// Placement of a mesh as separate scale, rotation and translation matrices.
///
/// Unlike a position/quaternion/scale triple, each component here is a full matrix so that
/// repeated relative operations compose exactly the way they were issued. See the
/// [module docs](self) for the operation table.
///
/// # Default Values
///
/// All three components start as the identity matrix.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub scale: Mat4,
    pub rotation: Mat4,
    pub translation: Mat4,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            scale: Mat4::IDENTITY,
            rotation: Mat4::IDENTITY,
            translation: Mat4::IDENTITY,
        }
    }
}

impl Transform {
    /// Creates an identity transform.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`set_scale`](Self::set_scale).
    pub fn with_scale(mut self, x: f32, y: f32, z: f32) -> Self {
        self.set_scale(x, y, z);
        self
    }

    /// Builder form of [`set_rotation`](Self::set_rotation).
    pub fn with_rotation(mut self, rx: f32, ry: f32, rz: f32, order: RotationOrder) -> Self {
        self.set_rotation(rx, ry, rz, order);
        self
    }

    /// Builder form of [`set_translation`](Self::set_translation).
    pub fn with_translation(mut self, x: f32, y: f32, z: f32) -> Self {
        self.set_translation(x, y, z);
        self
    }

    /// Replaces the scale component.
    pub fn set_scale(&mut self, x: f32, y: f32, z: f32) {
        self.scale = Mat4::from_scale(Vec3::new(x, y, z));
    }

    /// Replaces the rotation component. Angles are in degrees.
    pub fn set_rotation(&mut self, rx: f32, ry: f32, rz: f32, order: RotationOrder) {
        self.rotation = rotation_in_order(rx, ry, rz, order);
    }

    /// Replaces the translation component.
    pub fn set_translation(&mut self, x: f32, y: f32, z: f32) {
        self.translation = Mat4::from_translation(Vec3::new(x, y, z));
    }

    /// Scales on top of the current scale.
    pub fn scale_mesh(&mut self, x: f32, y: f32, z: f32) {
        self.scale = Mat4::from_scale(Vec3::new(x, y, z)) * self.scale;
    }

    /// Rotates on top of the current rotation. Angles are in degrees.
    ///
    /// The new rotation is applied after the existing one, so successive calls read in the
    /// order the rotations happen to the mesh.
    pub fn rotate_mesh(&mut self, rx: f32, ry: f32, rz: f32, order: RotationOrder) {
        self.rotation = rotation_in_order(rx, ry, rz, order) * self.rotation;
    }

    /// Translates on top of the current translation.
    pub fn translate_mesh(&mut self, x: f32, y: f32, z: f32) {
        self.translation = Mat4::from_translation(Vec3::new(x, y, z)) * self.translation;
    }

    /// Resets all three components to identity.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Returns true if every component is (exactly) the identity.
    pub fn is_identity(&self) -> bool {
        self.scale == Mat4::IDENTITY
            && self.rotation == Mat4::IDENTITY
            && self.translation == Mat4::IDENTITY
    }

    /// The model matrix `translation * rotation * scale`.
    pub fn model(&self) -> Mat4 {
        self.translation * self.rotation * self.scale
    }

    /// World position of the local origin, i.e. the translation column.
    pub fn position(&self) -> Vec3 {
        self.translation.w_axis.truncate()
    }
}
