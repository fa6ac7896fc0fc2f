//! Orienting a solid along a direction.

use crate::{MathError, Vec3};

/// Euler angles `(0, pitch, yaw)` in degrees that turn the +X axis onto `direction`.
///
/// Pitch comes from the out-of-plane component over the full length and is
/// negated because a positive rotation about Y tilts +X downwards. Yaw comes
/// from the Y component over the length of the XY projection, mirrored into
/// the left half-plane when X is negative.
///
/// The result only depends on the direction, not the length, of the input.
///
/// # Errors
///
/// [`MathError::ZeroVector`] for a zero or non-finite vector, and
/// [`MathError::VerticalDirection`] for a vector along Z, where the XY
/// projection vanishes and yaw has no meaning.
pub fn point_to_rotation(direction: &Vec3) -> Result<Vec3, MathError> {
    let length = direction.norm();
    if !length.is_finite() || length == 0.0 {
        return Err(MathError::ZeroVector);
    }

    let pitch = -(direction.z / length).clamp(-1.0, 1.0).asin().to_degrees();

    let planar = direction.x.hypot(direction.y);
    if planar <= length * f64::EPSILON {
        return Err(MathError::VerticalDirection { pitch });
    }

    let mut yaw = (direction.y / planar).clamp(-1.0, 1.0).asin().to_degrees();
    if direction.x < 0.0 {
        yaw = 180.0 - yaw;
    }

    Ok(Vec3::new(0.0, pitch, yaw))
}
