//! Segmented bend around the Y axis.

use std::f64::consts::PI;

use thingsmith_math::{Size, X, Y, Z};

use crate::{ensure_positive, CadError, Part};

/// Whether bent segments are stretched to close the wedge gaps between them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BendCompensation {
    /// Segments keep their size; the outer face shows small gaps.
    #[default]
    None,
    /// Each segment is widened in X by [`Bend::stretch_factor`].
    Stretch,
}

/// Piecewise bend of a part lying in a box at the origin.
///
/// The box is cut along X into equal slabs. Slab `i` is moved so that it sits
/// above the origin at height `radius`, then rotated about Y by
/// `i * rotation_step`, so consecutive slabs follow a circle of `radius`.
#[derive(Debug, Clone, PartialEq)]
pub struct Bend {
    bounds: Size,
    radius: f64,
    segments: u32,
    compensation: BendCompensation,
}

impl Bend {
    /// Validated bend parameters.
    pub fn new(bounds: Size, radius: f64, segments: u32) -> Result<Self, CadError> {
        ensure_positive("bend bounds x", bounds[X])?;
        ensure_positive("bend bounds y", bounds[Y])?;
        ensure_positive("bend bounds z", bounds[Z])?;
        ensure_positive("bend radius", radius)?;
        if segments == 0 {
            return Err(CadError::InvalidParameter {
                name: "bend segments",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(Self {
            bounds,
            radius,
            segments,
            compensation: BendCompensation::None,
        })
    }

    /// Select how segment gaps are handled.
    pub fn with_compensation(mut self, compensation: BendCompensation) -> Self {
        self.compensation = compensation;
        self
    }

    /// Width of one slab along X.
    pub fn segment_step(&self) -> f64 {
        self.bounds[X] / f64::from(self.segments)
    }

    /// Rotation between consecutive slabs, in degrees.
    pub fn rotation_step(&self) -> f64 {
        360.0 * self.segment_step() / (2.0 * PI * self.radius)
    }

    /// Relative X stretch that closes the gap a slab leaves after rotation.
    pub fn stretch_factor(&self) -> f64 {
        (self.rotation_step() / 2.0).to_radians().tan() * self.segment_step() / self.bounds[Z]
    }

    /// Total angle covered by all slabs, in degrees.
    pub fn sweep_angle(&self) -> f64 {
        f64::from(self.segments) * self.rotation_step()
    }

    /// Length of the arc at `radius` covered by the sweep; equals the box width.
    pub fn arc_length(&self) -> f64 {
        2.0 * PI * self.radius * self.sweep_angle() / 360.0
    }

    /// Bend `part`. The result is a union with exactly `segments` children.
    pub fn apply(&self, part: &Part) -> Part {
        let step = self.segment_step();
        let rotation = self.rotation_step();
        let slab = Part::cube("bend-slab", step, self.bounds[Y], self.bounds[Z]);

        tracing::debug!(
            segments = self.segments,
            step,
            rotation,
            compensation = ?self.compensation,
            "bending part"
        );

        let pieces = (0..self.segments).map(|index| {
            let offset = f64::from(index) * step;
            let mut piece = part
                .intersection(&slab.translate(offset, 0.0, 0.0))
                .translate(-offset - step / 2.0, 0.0, self.radius - self.bounds[Z] / 2.0);
            if self.compensation == BendCompensation::Stretch {
                piece = piece.scale(1.0 + self.stretch_factor(), 1.0, 1.0);
            }
            piece.rotate(0.0, f64::from(index) * rotation, 0.0)
        });
        Part::union_all(format!("{}-bent", part.name), pieces)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use thingsmith_ir::{Node, TransformOp};

    fn bounds() -> Size {
        Size::new(30.0, 5.0, 2.0)
    }

    #[test]
    fn derived_quantities() {
        let bend = Bend::new(bounds(), 10.0, 12).unwrap();
        assert_relative_eq!(bend.segment_step(), 2.5);
        assert_relative_eq!(bend.rotation_step(), 360.0 * 2.5 / (20.0 * PI));
        assert_relative_eq!(bend.sweep_angle(), 360.0 * 30.0 / (20.0 * PI), epsilon = 1e-9);
        assert_relative_eq!(bend.arc_length(), 30.0, epsilon = 1e-9);
        let expected = (bend.rotation_step() / 2.0).to_radians().tan() * 2.5 / 2.0;
        assert_relative_eq!(bend.stretch_factor(), expected);
    }

    #[test]
    fn one_child_per_segment() {
        let strip = Part::cube("strip", 30.0, 5.0, 2.0);
        for segments in [1, 4, 24] {
            let bent = Bend::new(bounds(), 10.0, segments).unwrap().apply(&strip);
            assert_eq!(bent.solid().children().len(), segments as usize);
            assert_eq!(bent.stats().primitives, 2 * segments as usize);
        }
    }

    #[test]
    fn first_segment_sits_above_origin() {
        let strip = Part::cube("strip", 30.0, 5.0, 2.0);
        let bent = Bend::new(bounds(), 10.0, 6).unwrap().apply(&strip);
        let first = &bent.solid().children()[0];
        let bb = crate::analysis::bounds(first).unwrap();
        assert_relative_eq!(bb.min.x, -2.5, epsilon = 1e-9);
        assert_relative_eq!(bb.max.x, 2.5, epsilon = 1e-9);
        assert_relative_eq!(bb.min.z, 9.0, epsilon = 1e-9);
        assert_relative_eq!(bb.max.z, 11.0, epsilon = 1e-9);
    }

    #[test]
    fn stretch_adds_scale_only_when_requested() {
        let strip = Part::cube("strip", 30.0, 5.0, 2.0);
        let plain = Bend::new(bounds(), 10.0, 3).unwrap();
        let stretched = plain.clone().with_compensation(BendCompensation::Stretch);

        let has_scale = |part: &Part| {
            part.solid().children().iter().all(|piece| match piece.children()[0].node() {
                Node::Transform { op: TransformOp::Scale { factor }, .. } => {
                    (factor.x - 1.0 - stretched.stretch_factor()).abs() < 1e-12
                }
                _ => false,
            })
        };
        assert!(!has_scale(&plain.apply(&strip)));
        assert!(has_scale(&stretched.apply(&strip)));
    }

    #[test]
    fn rejects_bad_parameters() {
        assert!(Bend::new(bounds(), 0.0, 4).is_err());
        assert!(Bend::new(bounds(), 10.0, 0).is_err());
        assert!(Bend::new(Size::new(0.0, 1.0, 1.0), 10.0, 4).is_err());
        assert!(crate::transform::bend(&Part::empty("e"), bounds(), -1.0, 4).is_err());
    }
}
