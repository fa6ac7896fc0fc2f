//! Deformations built from booleans and affine transforms.
//!
//! The renderer only knows affine maps, so bending and tapering are
//! approximated by cutting a part into slabs and moving each slab on its own.

pub mod bend;
pub mod taper;

pub use bend::{Bend, BendCompensation};
pub use taper::AxialScale;

use thingsmith_math::Size;

use crate::{CadError, Part};

/// Bend `part` (contained in the box `bounds` at the origin) around a
/// cylinder of `radius`, approximated by `segments` rigid pieces.
pub fn bend(part: &Part, bounds: Size, radius: f64, segments: u32) -> Result<Part, CadError> {
    Ok(Bend::new(bounds, radius, segments)?.apply(part))
}

/// Scale `part` in X and Y progressively along Z, reaching roughly
/// `factor` at `height`.
pub fn scale_along_z(part: &Part, slice: Size, height: f64, factor: f64) -> Result<Part, CadError> {
    Ok(AxialScale::new(slice, height, factor)?.apply(part))
}
