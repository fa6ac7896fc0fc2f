#![warn(missing_docs)]

//! Math types for thingsmith models.
//!
//! Thin wrappers around nalgebra providing the few geometric pieces the
//! model builders need: affine transforms in the renderer's conventions,
//! axis-aligned bounds, the overlap constant, elementwise vector/area
//! arithmetic and direction-to-rotation derivation.

use nalgebra::{Matrix3, Matrix4, Vector2, Vector3, Vector4};

pub mod rotation;
pub mod vector;

pub use rotation::point_to_rotation;
pub use vector::{
    area_to_size, size_to_area_xy, size_to_area_xz, size_to_area_yz, vector_difference,
    vector_extend, vector_length, vector_ratio, vector_scale, Area, Size, X, Y, Z,
};

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A vector in 2D space.
pub type Vec2 = Vector2<f64>;

/// Offset used to force two solids to overlap before a boolean subtraction.
///
/// Coincident faces make the renderer produce zero-thickness skins, so cutting
/// tools are extended by this amount past the faces they cut through.
pub const OVERLAP: f64 = 0.001;

/// Errors returned by the math helpers.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum MathError {
    /// The input vector has no direction.
    #[error("zero or non-finite direction vector")]
    ZeroVector,
    /// The direction is parallel to Z, so yaw is undefined.
    #[error("direction is vertical (pitch {pitch} degrees), yaw is undefined")]
    VerticalDirection {
        /// Pitch in degrees, still well defined for a vertical direction.
        pitch: f64,
    },
}

/// A 4x4 affine transformation matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// The underlying 4x4 matrix.
    pub matrix: Matrix4<f64>,
}

impl Transform {
    /// Identity transform.
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Build from row-major rows, as written in `multmatrix`.
    pub fn from_rows(rows: &[[f64; 4]; 4]) -> Self {
        let mut m = Matrix4::zeros();
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                m[(r, c)] = *value;
            }
        }
        Self { matrix: m }
    }

    /// Translation by `(dx, dy, dz)`.
    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        let mut m = Matrix4::identity();
        m[(0, 3)] = dx;
        m[(1, 3)] = dy;
        m[(2, 3)] = dz;
        Self { matrix: m }
    }

    /// Non-uniform scale by `(sx, sy, sz)`.
    pub fn scale(sx: f64, sy: f64, sz: f64) -> Self {
        let mut m = Matrix4::identity();
        m[(0, 0)] = sx;
        m[(1, 1)] = sy;
        m[(2, 2)] = sz;
        Self { matrix: m }
    }

    /// Rotation about the X axis by `angle` radians.
    pub fn rotation_x(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Matrix4::identity();
        m[(1, 1)] = c;
        m[(1, 2)] = -s;
        m[(2, 1)] = s;
        m[(2, 2)] = c;
        Self { matrix: m }
    }

    /// Rotation about the Y axis by `angle` radians.
    pub fn rotation_y(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Matrix4::identity();
        m[(0, 0)] = c;
        m[(0, 2)] = s;
        m[(2, 0)] = -s;
        m[(2, 2)] = c;
        Self { matrix: m }
    }

    /// Rotation about the Z axis by `angle` radians.
    pub fn rotation_z(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Matrix4::identity();
        m[(0, 0)] = c;
        m[(0, 1)] = -s;
        m[(1, 0)] = s;
        m[(1, 1)] = c;
        Self { matrix: m }
    }

    /// Euler rotation in degrees, applied about X, then Y, then Z.
    ///
    /// Matches the renderer's `rotate(a = [x, y, z])`.
    pub fn rotation_euler_deg(x_deg: f64, y_deg: f64, z_deg: f64) -> Self {
        let rx = Self::rotation_x(x_deg.to_radians());
        let ry = Self::rotation_y(y_deg.to_radians());
        let rz = Self::rotation_z(z_deg.to_radians());
        rz.then(&ry).then(&rx)
    }

    /// Reflection through the plane through the origin with normal `normal`.
    ///
    /// A zero normal yields the identity, as the renderer does.
    pub fn mirror(normal: &Vec3) -> Self {
        let len2 = normal.norm_squared();
        if len2 == 0.0 {
            return Self::identity();
        }
        let reflect = Matrix3::identity() - (normal * normal.transpose()) * (2.0 / len2);
        let mut m = Matrix4::identity();
        m.fixed_view_mut::<3, 3>(0, 0).copy_from(&reflect);
        Self { matrix: m }
    }

    /// Compose: `self` then `other` (self * other).
    ///
    /// The resulting transform applies `other` first.
    pub fn then(&self, other: &Transform) -> Self {
        Self {
            matrix: self.matrix * other.matrix,
        }
    }

    /// Transform a point.
    pub fn apply_point(&self, p: &Point3) -> Point3 {
        let v = self.matrix * Vector4::new(p.x, p.y, p.z, 1.0);
        Point3::new(v.x, v.y, v.z)
    }

    /// Transform a direction vector (ignores translation, applies rotation/scale).
    pub fn apply_vec(&self, v: &Vec3) -> Vec3 {
        let r = self.matrix * Vector4::new(v.x, v.y, v.z, 0.0);
        Vec3::new(r.x, r.y, r.z)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Point3,
    /// Maximum corner.
    pub max: Point3,
}

impl Aabb {
    /// Box spanning two opposite corners, in any order.
    pub fn new(a: Point3, b: Point3) -> Self {
        Self {
            min: Point3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: Point3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    /// Smallest box containing all points, `None` for an empty iterator.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point3>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        Some(iter.fold(Self::new(first, first), |acc, p| acc.including(&p)))
    }

    /// This box grown to contain `p`.
    pub fn including(&self, p: &Point3) -> Self {
        Self {
            min: Point3::new(self.min.x.min(p.x), self.min.y.min(p.y), self.min.z.min(p.z)),
            max: Point3::new(self.max.x.max(p.x), self.max.y.max(p.y), self.max.z.max(p.z)),
        }
    }

    /// Smallest box containing both.
    pub fn union(&self, other: &Aabb) -> Self {
        self.including(&other.min).including(&other.max)
    }

    /// Overlap of both boxes, `None` when they are disjoint.
    pub fn intersection(&self, other: &Aabb) -> Option<Self> {
        let min = Point3::new(
            self.min.x.max(other.min.x),
            self.min.y.max(other.min.y),
            self.min.z.max(other.min.z),
        );
        let max = Point3::new(
            self.max.x.min(other.max.x),
            self.max.y.min(other.max.y),
            self.max.z.min(other.max.z),
        );
        if min.x > max.x || min.y > max.y || min.z > max.z {
            None
        } else {
            Some(Self { min, max })
        }
    }

    /// Extent along each axis.
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Center point.
    pub fn center(&self) -> Point3 {
        nalgebra::center(&self.min, &self.max)
    }

    /// The eight corners.
    pub fn corners(&self) -> [Point3; 8] {
        let (a, b) = (self.min, self.max);
        [
            Point3::new(a.x, a.y, a.z),
            Point3::new(b.x, a.y, a.z),
            Point3::new(a.x, b.y, a.z),
            Point3::new(b.x, b.y, a.z),
            Point3::new(a.x, a.y, b.z),
            Point3::new(b.x, a.y, b.z),
            Point3::new(a.x, b.y, b.z),
            Point3::new(b.x, b.y, b.z),
        ]
    }

    /// Bounds of this box after an affine transform (conservative).
    pub fn transformed(&self, t: &Transform) -> Self {
        let corners = self.corners().map(|c| t.apply_point(&c));
        let first = corners[0];
        corners[1..]
            .iter()
            .fold(Self::new(first, first), |acc, p| acc.including(p))
    }
}
