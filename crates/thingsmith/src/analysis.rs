//! Static queries over an expression tree: bounds and node statistics.
//!
//! Bounds are conservative boxes computed from the tree alone, without
//! evaluating any boolean. They are meant for placing parts next to each
//! other and for sanity checks in tests, not for exact measurement.

use thingsmith_ir::{BooleanOp, Extrusion, Node, Primitive, Solid, TransformOp, Vec3};
use thingsmith_math::{Aabb, Point3, Transform};

fn point(v: &Vec3) -> Point3 {
    Point3::new(v.x, v.y, v.z)
}

fn op_matrix(op: &TransformOp) -> Transform {
    match op {
        TransformOp::Translate { offset } => Transform::translation(offset.x, offset.y, offset.z),
        TransformOp::Rotate { angles } => {
            Transform::rotation_euler_deg(angles.x, angles.y, angles.z)
        }
        TransformOp::Scale { factor } => Transform::scale(factor.x, factor.y, factor.z),
        TransformOp::Mirror { normal } => {
            Transform::mirror(&thingsmith_math::Vec3::new(normal.x, normal.y, normal.z))
        }
        TransformOp::MultMatrix { rows } => Transform::from_rows(rows),
    }
}

fn primitive_bounds(shape: &Primitive) -> Option<Aabb> {
    match shape {
        Primitive::Cube { size, center } => {
            let corner = point(size);
            let b = Aabb::new(Point3::origin(), corner);
            Some(if *center {
                b.transformed(&Transform::translation(
                    -size.x / 2.0,
                    -size.y / 2.0,
                    -size.z / 2.0,
                ))
            } else {
                b
            })
        }
        Primitive::Cylinder {
            r1,
            r2,
            height,
            center,
            ..
        } => {
            let r = r1.abs().max(r2.abs());
            let (z0, z1) = if *center {
                (-height / 2.0, height / 2.0)
            } else {
                (0.0, *height)
            };
            Some(Aabb::new(Point3::new(-r, -r, z0), Point3::new(r, r, z1)))
        }
        Primitive::Sphere { radius, .. } => {
            let r = radius.abs();
            Some(Aabb::new(Point3::new(-r, -r, -r), Point3::new(r, r, r)))
        }
        Primitive::Polyhedron { points, .. } => Aabb::from_points(points.iter().map(point)),
        Primitive::Square { size, center } => {
            let b = Aabb::new(Point3::origin(), Point3::new(size.x, size.y, 0.0));
            Some(if *center {
                b.transformed(&Transform::translation(-size.x / 2.0, -size.y / 2.0, 0.0))
            } else {
                b
            })
        }
        Primitive::Circle { radius, .. } => {
            let r = radius.abs();
            Some(Aabb::new(Point3::new(-r, -r, 0.0), Point3::new(r, r, 0.0)))
        }
        Primitive::Polygon { points } => {
            Aabb::from_points(points.iter().map(|p| Point3::new(p.x, p.y, 0.0)))
        }
        // Glyph outlines and imported files are only known to the renderer.
        Primitive::Text { .. } | Primitive::Import { .. } => None,
    }
}

fn extrusion_bounds(op: &Extrusion, outline: Aabb) -> Aabb {
    match op {
        Extrusion::Linear {
            height,
            twist,
            scale,
            center,
        } => {
            let (z0, z1) = if *center {
                (-height / 2.0, height / 2.0)
            } else {
                (0.0, *height)
            };
            let (min, max) = if *twist != 0.0 {
                // Any rotation of the outline stays inside its circumscribed disc.
                let reach = outline
                    .corners()
                    .iter()
                    .map(|c| c.x.hypot(c.y))
                    .fold(0.0, f64::max)
                    * scale.abs().max(1.0);
                ((-reach, -reach), (reach, reach))
            } else {
                let top = outline.transformed(&Transform::scale(*scale, *scale, 1.0));
                let xy = outline.union(&top);
                ((xy.min.x, xy.min.y), (xy.max.x, xy.max.y))
            };
            Aabb::new(Point3::new(min.0, min.1, z0), Point3::new(max.0, max.1, z1))
        }
        Extrusion::Rotate { .. } => {
            let reach = outline.min.x.abs().max(outline.max.x.abs());
            Aabb::new(
                Point3::new(-reach, -reach, outline.min.y),
                Point3::new(reach, reach, outline.max.y),
            )
        }
    }
}

/// Conservative axis-aligned bounds of `solid`.
///
/// - union and hull: the box around every child with known bounds
/// - difference: the bounds of the first child
/// - intersection: the overlap of the children's bounds
///
/// Returns `None` for empty geometry, for intersections whose boxes are
/// disjoint, and for subtrees made only of text or imported outlines.
pub fn bounds(solid: &Solid) -> Option<Aabb> {
    match solid.node() {
        Node::Primitive { shape } => primitive_bounds(shape),
        Node::Boolean { op, children } => match op {
            BooleanOp::Union | BooleanOp::Hull => children
                .iter()
                .filter_map(bounds)
                .reduce(|acc, b| acc.union(&b)),
            BooleanOp::Difference => children.first().and_then(bounds),
            BooleanOp::Intersection => {
                let mut known = children.iter().filter_map(bounds);
                let first = known.next()?;
                known.try_fold(first, |acc, b| acc.intersection(&b))
            }
        },
        Node::Transform { op, child } => bounds(child).map(|b| b.transformed(&op_matrix(op))),
        Node::Extrude { op, child } => bounds(child).map(|b| extrusion_bounds(op, b)),
    }
}

/// Node counts of an expression tree.
///
/// Shared subtrees are counted once per appearance, matching what the
/// renderer has to evaluate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeStats {
    /// Leaf shapes.
    pub primitives: usize,
    /// Boolean nodes (union, difference, intersection, hull).
    pub booleans: usize,
    /// Affine transform nodes.
    pub transforms: usize,
    /// Extrusion nodes.
    pub extrusions: usize,
    /// Longest root-to-leaf path, counting nodes.
    pub depth: usize,
}

impl TreeStats {
    /// Total number of nodes.
    pub fn nodes(&self) -> usize {
        self.primitives + self.booleans + self.transforms + self.extrusions
    }
}

/// Compute [`TreeStats`] for `solid`.
pub fn stats(solid: &Solid) -> TreeStats {
    let mut acc = TreeStats::default();
    match solid.node() {
        Node::Primitive { .. } => acc.primitives += 1,
        Node::Boolean { .. } => acc.booleans += 1,
        Node::Transform { .. } => acc.transforms += 1,
        Node::Extrude { .. } => acc.extrusions += 1,
    }
    let mut deepest = 0;
    for child in solid.children() {
        let s = stats(child);
        acc.primitives += s.primitives;
        acc.booleans += s.booleans;
        acc.transforms += s.transforms;
        acc.extrusions += s.extrusions;
        deepest = deepest.max(s.depth);
    }
    acc.depth = deepest + 1;
    acc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Part;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    #[test]
    fn centered_primitives() {
        let b = Part::cube_centered("c", 2.0, 4.0, 6.0).bounding_box().unwrap();
        assert_relative_eq!(b.min, Point3::new(-1.0, -2.0, -3.0));
        assert_relative_eq!(b.max, Point3::new(1.0, 2.0, 3.0));

        let b = Part::cone("k", 3.0, 1.0, 5.0, 0).bounding_box().unwrap();
        assert_relative_eq!(b.min, Point3::new(-3.0, -3.0, 0.0));
        assert_relative_eq!(b.max, Point3::new(3.0, 3.0, 5.0));
    }

    #[test]
    fn difference_keeps_first_child() {
        let body = Part::cube("body", 10.0, 10.0, 10.0);
        let tool = Part::cube("tool", 30.0, 2.0, 2.0).translate(-10.0, 4.0, 4.0);
        assert_eq!((&body - &tool).bounding_box(), body.bounding_box());
    }

    #[test]
    fn intersection_overlap() {
        let a = Part::cube("a", 10.0, 10.0, 10.0);
        let b = Part::cube("b", 10.0, 10.0, 10.0).translate(5.0, 5.0, 5.0);
        let bb = (&a & &b).bounding_box().unwrap();
        assert_relative_eq!(bb.min, Point3::new(5.0, 5.0, 5.0));
        assert_relative_eq!(bb.max, Point3::new(10.0, 10.0, 10.0));

        let far = Part::cube("far", 1.0, 1.0, 1.0).translate(50.0, 0.0, 0.0);
        assert!((&a & &far).bounding_box().is_none());
    }

    #[test]
    fn rotation_bounds() {
        let bar = Part::cube("bar", 10.0, 1.0, 1.0).rotate(0.0, 0.0, 90.0);
        let bb = bar.bounding_box().unwrap();
        assert_relative_eq!(bb.size(), Vector3::new(1.0, 10.0, 1.0), epsilon = 1e-9);
    }

    #[test]
    fn extrusion_bounds_cover_profile() {
        let plate = Part::square("s", 4.0, 2.0).linear_extrude(3.0);
        let bb = plate.bounding_box().unwrap();
        assert_relative_eq!(bb.max, Point3::new(4.0, 2.0, 3.0));

        let flared = Part::square("s", 4.0, 2.0).linear_extrude_with(3.0, 0.0, 2.0, true);
        let bb = flared.bounding_box().unwrap();
        assert_relative_eq!(bb.max, Point3::new(8.0, 4.0, 1.5));
        assert_relative_eq!(bb.min.z, -1.5);

        let ring = Part::circle("c", 1.0, 0).translate(5.0, 0.0, 0.0).rotate_extrude(360.0, 0);
        let bb = ring.bounding_box().unwrap();
        assert_relative_eq!(bb.max, Point3::new(6.0, 6.0, 1.0));
        assert_relative_eq!(bb.min, Point3::new(-6.0, -6.0, -1.0));
    }

    #[test]
    fn text_and_imports_have_no_known_extent() {
        assert!(Part::text("t", "hi", 5.0).bounding_box().is_none());
        assert!(Part::import("i", "outline.dxf").linear_extrude(2.0).bounding_box().is_none());
        assert!(Part::empty("e").bounding_box().is_none());

        let label = Part::text("t", "x", 1.0).linear_extrude(1.0);
        let labelled = Part::cube("c", 1.0, 1.0, 1.0) + label;
        assert_eq!(labelled.bounding_box(), Part::cube("c", 1.0, 1.0, 1.0).bounding_box());
    }

    #[test]
    fn stats_count_shared_subtrees_per_use() {
        let peg = Part::cylinder("peg", 1.0, 2.0, 0);
        let row = Part::union_all("row", (0..3).map(|i| peg.translate(i as f64, 0.0, 0.0)));
        let s = row.stats();
        assert_eq!(s.primitives, 3);
        assert_eq!(s.transforms, 3);
        assert_eq!(s.booleans, 1);
        assert_eq!(s.depth, 3);
        assert_eq!(s.nodes(), 7);
    }
}
