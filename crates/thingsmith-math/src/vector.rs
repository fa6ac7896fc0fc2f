//! Elementwise arithmetic over sizes, areas and points.
//!
//! Tuples of fixed arity are nalgebra `SVector`s, so mixing a 2D area with a
//! 3D size is a type error instead of a runtime failure.

use nalgebra::{SVector, Vector2, Vector3};

/// Index of the X component.
pub const X: usize = 0;
/// Index of the Y component.
pub const Y: usize = 1;
/// Index of the Z component.
pub const Z: usize = 2;

/// Width, depth and height of a box.
pub type Size = Vector3<f64>;

/// Two extents of a box, a size with one axis dropped.
pub type Area = Vector2<f64>;

/// Elementwise `a - b`.
pub fn vector_difference<const D: usize>(
    a: &SVector<f64, D>,
    b: &SVector<f64, D>,
) -> SVector<f64, D> {
    a - b
}

/// Elementwise `numerator / denominator`.
///
/// A zero element in `denominator` yields a non-finite element.
pub fn vector_ratio<const D: usize>(
    numerator: &SVector<f64, D>,
    denominator: &SVector<f64, D>,
) -> SVector<f64, D> {
    numerator.component_div(denominator)
}

/// Add `increment` to every element.
pub fn vector_extend<const D: usize>(vector: &SVector<f64, D>, increment: f64) -> SVector<f64, D> {
    vector.add_scalar(increment)
}

/// Multiply every element by `scale`.
pub fn vector_scale<const D: usize>(vector: &SVector<f64, D>, scale: f64) -> SVector<f64, D> {
    vector * scale
}

/// Euclidean magnitude.
pub fn vector_length<const D: usize>(vector: &SVector<f64, D>) -> f64 {
    vector.norm()
}

/// Project a size onto the XY plane.
pub fn size_to_area_xy(size: &Size) -> Area {
    Area::new(size[X], size[Y])
}

/// Project a size onto the XZ plane.
pub fn size_to_area_xz(size: &Size) -> Area {
    Area::new(size[X], size[Z])
}

/// Project a size onto the YZ plane.
pub fn size_to_area_yz(size: &Size) -> Area {
    Area::new(size[Y], size[Z])
}

/// Extend an area back into a size with the given height.
pub fn area_to_size(area: &Area, height: f64) -> Size {
    Size::new(area[X], area[Y], height)
}
