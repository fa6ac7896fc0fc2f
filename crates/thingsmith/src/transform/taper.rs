//! Progressive XY scaling along Z.

use thingsmith_math::{Size, X, Y, Z};

use crate::{ensure_positive, CadError, Part};

/// Most slabs a single taper may produce.
pub const MAX_TAPER_STEPS: usize = 10_000;

/// Scales a part in X and Y by a factor that grows slice by slice along Z.
///
/// The part is cut into horizontal slabs of `slice` size centered on the Z
/// axis. Slab `k` is scaled by `1 + k * increment`, so the bottom slab is
/// untouched and the factor approaches `factor` at the top. Z is never
/// scaled, so slabs stay stacked without gaps.
#[derive(Debug, Clone, PartialEq)]
pub struct AxialScale {
    slice: Size,
    height: f64,
    factor: f64,
}

impl AxialScale {
    /// Validated taper parameters.
    pub fn new(slice: Size, height: f64, factor: f64) -> Result<Self, CadError> {
        ensure_positive("taper slice x", slice[X])?;
        ensure_positive("taper slice y", slice[Y])?;
        ensure_positive("taper slice z", slice[Z])?;
        ensure_positive("taper height", height)?;
        ensure_positive("taper factor", factor)?;
        let steps = (height / slice[Z]).ceil();
        if steps > MAX_TAPER_STEPS as f64 {
            return Err(CadError::InvalidParameter {
                name: "taper slice z",
                reason: format!(
                    "{height} / {} needs {steps} slabs, at most {MAX_TAPER_STEPS} are allowed",
                    slice[Z]
                ),
            });
        }
        Ok(Self {
            slice,
            height,
            factor,
        })
    }

    /// Number of slabs; the last one may reach past `height`.
    pub fn steps(&self) -> usize {
        (self.height / self.slice[Z]).ceil() as usize
    }

    /// Scale added per slab.
    pub fn increment(&self) -> f64 {
        (self.factor - 1.0) / self.steps() as f64
    }

    /// XY scale of slab `step`.
    pub fn scale_at(&self, step: usize) -> f64 {
        1.0 + self.increment() * step as f64
    }

    /// Taper `part`. The result is a union with one child per slab.
    pub fn apply(&self, part: &Part) -> Part {
        let steps = self.steps();
        tracing::debug!(steps, increment = self.increment(), "tapering part");

        let slab = Part::cube("taper-slab", self.slice[X], self.slice[Y], self.slice[Z])
            .translate(-self.slice[X] / 2.0, -self.slice[Y] / 2.0, 0.0);
        let pieces = (0..steps).map(|step| {
            let scale = self.scale_at(step);
            part.intersection(&slab.translate(0.0, 0.0, step as f64 * self.slice[Z]))
                .scale(scale, scale, 1.0)
        });
        Part::union_all(format!("{}-tapered", part.name), pieces)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn steps_and_increment() {
        let taper = AxialScale::new(Size::new(40.0, 40.0, 2.0), 9.0, 2.0).unwrap();
        assert_eq!(taper.steps(), 5);
        assert_relative_eq!(taper.increment(), 0.2);
        assert_relative_eq!(taper.scale_at(0), 1.0);
        assert_relative_eq!(taper.scale_at(4), 1.8, epsilon = 1e-12);
    }

    #[test]
    fn slabs_stack_from_zero() {
        let column = Part::cylinder("column", 5.0, 10.0, 0);
        let taper = AxialScale::new(Size::new(20.0, 20.0, 2.5), 10.0, 0.5).unwrap();
        let tapered = taper.apply(&column);
        let pieces = tapered.solid().children();
        assert_eq!(pieces.len(), 4);

        let bottom = crate::analysis::bounds(&pieces[0]).unwrap();
        assert_relative_eq!(bottom.min.z, 0.0);
        assert_relative_eq!(bottom.max.z, 2.5);
        assert_relative_eq!(bottom.max.x, 5.0);

        let top = crate::analysis::bounds(&pieces[3]).unwrap();
        assert_relative_eq!(top.min.z, 7.5);
        assert_relative_eq!(top.max.z, 10.0);
        assert_relative_eq!(top.max.x, 5.0 * taper.scale_at(3));
    }

    #[test]
    fn unit_factor_is_identity_scale() {
        let taper = AxialScale::new(Size::new(1.0, 1.0, 1.0), 3.0, 1.0).unwrap();
        assert_eq!(taper.increment(), 0.0);
        assert!((0..taper.steps()).all(|s| taper.scale_at(s) == 1.0));
    }

    #[test]
    fn rejects_bad_parameters() {
        assert!(AxialScale::new(Size::new(1.0, 1.0, 0.0), 3.0, 1.0).is_err());
        assert!(AxialScale::new(Size::new(1.0, 1.0, 1.0), 0.0, 1.0).is_err());
        assert!(AxialScale::new(Size::new(1.0, 1.0, 1.0), 3.0, -1.0).is_err());
        let unit = Size::new(1.0, 1.0, 1.0);
        assert!(crate::transform::scale_along_z(&Part::empty("e"), unit, 3.0, 2.0).is_ok());
    }

    #[test]
    fn slab_count_is_bounded() {
        let thin = Size::new(10.0, 10.0, 1e-9);
        assert!(matches!(
            AxialScale::new(thin, 1e6, 2.0),
            Err(CadError::InvalidParameter { name: "taper slice z", .. })
        ));

        let limit = MAX_TAPER_STEPS as f64;
        let at_limit = AxialScale::new(Size::new(1.0, 1.0, 1.0), limit, 2.0).unwrap();
        assert_eq!(at_limit.steps(), MAX_TAPER_STEPS);
        assert!(AxialScale::new(Size::new(1.0, 1.0, 1.0), limit + 0.5, 2.0).is_err());
    }
}
