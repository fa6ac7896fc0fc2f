//! Small shape helpers used across models.

use thingsmith_ir::{Primitive, Solid};
use thingsmith_math::{Size, X, Y, Z};

use crate::{ensure_non_negative, ensure_positive, CadError, Part};

/// Coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// The X axis.
    X,
    /// The Y axis.
    Y,
    /// The Z axis.
    Z,
}

/// Cylinder centered at the origin along Z.
pub fn centered_cylinder(name: impl Into<String>, radius: f64, height: f64, segments: u32) -> Part {
    Part::new(
        name,
        Solid::primitive(Primitive::Cylinder {
            r1: radius,
            r2: radius,
            height,
            segments: (segments > 0).then_some(segments),
            center: true,
        }),
    )
}

/// Rod of diameter `thickness` starting at the origin and running `length`
/// along `axis` in the positive direction.
pub fn cylinder_along(axis: Axis, length: f64, thickness: f64) -> Part {
    let rod = Part::cylinder("rod", thickness / 2.0, length, 0);
    match axis {
        Axis::X => rod.rotate(0.0, 90.0, 0.0),
        Axis::Y => rod.rotate(-90.0, 0.0, 0.0),
        Axis::Z => rod,
    }
}

/// Cone from `radius` down to a point over `length`.
pub fn thorn(radius: f64, length: f64) -> Part {
    Part::cone("thorn", radius, 0.0, length, 0)
}

/// Box with vertical edges rounded to `radius`: the hull of four corner
/// cylinders. `size` includes the rounding.
pub fn rounded_box(size: &Size, radius: f64) -> Result<Part, CadError> {
    ensure_positive("rounded box radius", radius)?;
    ensure_positive("rounded box height", size[Z])?;
    if 2.0 * radius > size[X].min(size[Y]) {
        return Err(CadError::InvalidParameter {
            name: "rounded box radius",
            reason: format!("{radius} is too large for {} x {}", size[X], size[Y]),
        });
    }
    let corner = Part::cylinder("corner", radius, size[Z], 0);
    let (near, far_x, far_y) = (radius, size[X] - radius, size[Y] - radius);
    Ok(Part::hull_all(
        "rounded-box",
        [
            corner.translate(near, near, 0.0),
            corner.translate(far_x, near, 0.0),
            corner.translate(near, far_y, 0.0),
            corner.translate(far_x, far_y, 0.0),
        ],
    ))
}

/// Open-top box with the given outer size, `floor` thick at the bottom and
/// `wall` thick on the sides.
pub fn hollow_box(
    width: f64,
    depth: f64,
    height: f64,
    floor: f64,
    wall: f64,
    overlap: f64,
) -> Result<Part, CadError> {
    ensure_positive("box floor", floor)?;
    ensure_positive("box wall", wall)?;
    ensure_positive("overlap", overlap)?;
    if width <= 2.0 * wall || depth <= 2.0 * wall || height <= floor {
        return Err(CadError::InvalidParameter {
            name: "box size",
            reason: format!(
                "{width} x {depth} x {height} leaves no cavity with wall {wall} and floor {floor}"
            ),
        });
    }
    let outer = Part::cube("box", width, depth, height);
    let cavity = Part::cube(
        "box-cavity",
        width - 2.0 * wall,
        depth - 2.0 * wall,
        height - floor + overlap,
    )
    .translate(wall, wall, floor);
    Ok(outer - cavity)
}

/// `count` plates `wall` thick spread evenly across `width`, each spanning
/// `depth` along Y and `height` along Z.
pub fn spacers(
    width: f64,
    depth: f64,
    height: f64,
    count: usize,
    wall: f64,
) -> Result<Part, CadError> {
    ensure_positive("spacer wall", wall)?;
    ensure_non_negative("spacer depth", depth)?;
    ensure_non_negative("spacer height", height)?;
    let distance = (width - count as f64 * wall) / (count + 1) as f64;
    if distance < 0.0 {
        return Err(CadError::InvalidParameter {
            name: "spacer count",
            reason: format!("{count} spacers of {wall} do not fit in {width}"),
        });
    }
    let plate = Part::cube("spacer", wall, depth, height);
    Ok(Part::union_all(
        "spacers",
        (0..count).map(|index| {
            plate.translate(distance + index as f64 * (distance + wall), 0.0, 0.0)
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use thingsmith_math::Point3;

    #[test]
    fn centered_cylinder_bounds() {
        let bb = centered_cylinder("c", 2.0, 6.0, 12).bounding_box().unwrap();
        assert_relative_eq!(bb.min, Point3::new(-2.0, -2.0, -3.0));
        assert_relative_eq!(bb.max, Point3::new(2.0, 2.0, 3.0));
    }

    #[test]
    fn rods_run_along_positive_axis() {
        let x = cylinder_along(Axis::X, 10.0, 2.0).bounding_box().unwrap();
        assert_relative_eq!(x.max.x, 10.0, epsilon = 1e-9);
        assert_relative_eq!(x.min.x, 0.0, epsilon = 1e-9);

        let y = cylinder_along(Axis::Y, 10.0, 2.0).bounding_box().unwrap();
        assert_relative_eq!(y.max.y, 10.0, epsilon = 1e-9);
        assert_relative_eq!(y.min.y, 0.0, epsilon = 1e-9);

        let z = cylinder_along(Axis::Z, 10.0, 2.0).bounding_box().unwrap();
        assert_relative_eq!(z.max.z, 10.0);
        assert_relative_eq!(z.max.x, 1.0);
    }

    #[test]
    fn rounded_box_fills_size() {
        let part = rounded_box(&Size::new(30.0, 20.0, 3.0), 4.0).unwrap();
        assert_eq!(part.solid().children().len(), 4);
        let bb = part.bounding_box().unwrap();
        assert_relative_eq!(bb.min, Point3::origin());
        assert_relative_eq!(bb.max, Point3::new(30.0, 20.0, 3.0));
        assert!(rounded_box(&Size::new(6.0, 20.0, 3.0), 4.0).is_err());
    }

    #[test]
    fn hollow_box_cavity() {
        let part = hollow_box(40.0, 30.0, 20.0, 2.0, 1.5, 0.001).unwrap();
        let cavity = &part.solid().children()[1];
        let bb = crate::analysis::bounds(cavity).unwrap();
        assert_relative_eq!(bb.min, Point3::new(1.5, 1.5, 2.0));
        assert_relative_eq!(bb.max, Point3::new(38.5, 28.5, 20.001), epsilon = 1e-12);
        assert!(hollow_box(3.0, 30.0, 20.0, 2.0, 1.5, 0.001).is_err());
    }

    #[test]
    fn spacers_are_evenly_spread() {
        let part = spacers(100.0, 10.0, 5.0, 3, 2.0).unwrap();
        let plates = part.solid().children();
        assert_eq!(plates.len(), 3);
        let distance = (100.0 - 6.0) / 4.0;
        let first = crate::analysis::bounds(&plates[0]).unwrap();
        let last = crate::analysis::bounds(&plates[2]).unwrap();
        assert_relative_eq!(first.min.x, distance);
        assert_relative_eq!(100.0 - last.max.x, distance, epsilon = 1e-9);

        assert!(spacers(100.0, 10.0, 5.0, 0, 2.0).unwrap().is_empty());
        assert!(spacers(5.0, 10.0, 5.0, 3, 2.0).is_err());
    }
}
