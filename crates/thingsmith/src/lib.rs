#![warn(missing_docs)]

//! thingsmith — parametric solid models for 3D printing
//!
//! Models are built from primitives, boolean operations and transforms,
//! then written as OpenSCAD programs for an external renderer.
//!
//! # Example
//!
//! ```rust,no_run
//! use thingsmith::{ModelConfig, Part};
//!
//! let config = ModelConfig::default();
//! let block = Part::cube("block", 20.0, 10.0, 5.0);
//! let hole = Part::cylinder("hole", 3.0, 5.0 + 2.0 * config.overlap(), 0)
//!     .translate(10.0, 5.0, -config.overlap());
//! let result = block - hole;
//! result.write_scad("block_with_hole.scad", &config).unwrap();
//! ```

use nalgebra::{Point2, Point3, Vector3};
use thingsmith_ir::{
    BooleanOp, Document, Extrusion, Model, Primitive, Solid, TransformOp, Vec2 as IrVec2,
    Vec3 as IrVec3,
};
use thingsmith_math::Aabb;
use thiserror::Error;

pub mod analysis;
pub mod components;
pub mod config;
pub mod export;
pub mod transform;

pub use analysis::TreeStats;
pub use config::{ConfigError, ModelConfig};
pub use thingsmith_ir as ir;
pub use thingsmith_math as math;

/// Errors returned by CAD operations.
#[derive(Error, Debug)]
pub enum CadError {
    /// An I/O error occurred while writing output.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The tree could not be written as OpenSCAD.
    #[error("OpenSCAD output failed: {0}")]
    Scad(#[from] thingsmith_ir::ScadError),
    /// A math helper rejected its input.
    #[error(transparent)]
    Math(#[from] thingsmith_math::MathError),
    /// The configuration is unusable.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A builder parameter is out of range.
    #[error("invalid {name}: {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

/// Fail with [`CadError::InvalidParameter`] unless `value` is finite and > 0.
pub(crate) fn ensure_positive(name: &'static str, value: f64) -> Result<(), CadError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(CadError::InvalidParameter {
            name,
            reason: format!("must be a positive number, got {value}"),
        })
    }
}

/// Fail with [`CadError::InvalidParameter`] unless `value` is finite and >= 0.
pub(crate) fn ensure_non_negative(name: &'static str, value: f64) -> Result<(), CadError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(CadError::InvalidParameter {
            name,
            reason: format!("must be a non-negative number, got {value}"),
        })
    }
}

fn ir_vec3(x: f64, y: f64, z: f64) -> IrVec3 {
    IrVec3::new(x, y, z)
}

fn segments_or_default(segments: u32) -> Option<u32> {
    (segments > 0).then_some(segments)
}

/// A named part with geometry.
///
/// Parts are the primary building block. Create primitives with
/// [`Part::cube`], [`Part::cylinder`], [`Part::sphere`], etc., then combine
/// them with CSG operations ([`Part::union`], [`Part::difference`],
/// [`Part::intersection`]) or the operator shorthands (`+`, `-`, `&`).
///
/// Every operation returns a new part; the underlying expression tree is
/// shared, never copied or mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Part {
    /// Human-readable name for this part (used for output file names).
    pub name: String,
    solid: Solid,
}

impl Part {
    /// Wrap an existing tree.
    pub fn new(name: impl Into<String>, solid: Solid) -> Self {
        Self {
            name: name.into(),
            solid,
        }
    }

    fn primitive(name: impl Into<String>, shape: Primitive) -> Self {
        Self::new(name, Solid::primitive(shape))
    }

    fn with_solid(&self, solid: Solid) -> Self {
        Self::new(self.name.clone(), solid)
    }

    fn transformed(&self, op: TransformOp) -> Self {
        self.with_solid(self.solid.transformed(op))
    }

    /// The expression tree of this part.
    pub fn solid(&self) -> &Solid {
        &self.solid
    }

    // =========================================================================
    // Primitives
    // =========================================================================

    /// Create an empty part.
    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(name, Solid::empty())
    }

    /// Create a box with one corner at the origin.
    pub fn cube(name: impl Into<String>, x: f64, y: f64, z: f64) -> Self {
        Self::primitive(
            name,
            Primitive::Cube {
                size: ir_vec3(x, y, z),
                center: false,
            },
        )
    }

    /// Create a box centered at the origin.
    pub fn cube_centered(name: impl Into<String>, x: f64, y: f64, z: f64) -> Self {
        Self::primitive(
            name,
            Primitive::Cube {
                size: ir_vec3(x, y, z),
                center: true,
            },
        )
    }

    /// Create a cylinder along Z with its base at the origin.
    ///
    /// `segments = 0` uses the document-wide resolution.
    pub fn cylinder(name: impl Into<String>, radius: f64, height: f64, segments: u32) -> Self {
        Self::cone(name, radius, radius, height, segments)
    }

    /// Create a cone/tapered cylinder along Z with its base at the origin.
    pub fn cone(
        name: impl Into<String>,
        radius_bottom: f64,
        radius_top: f64,
        height: f64,
        segments: u32,
    ) -> Self {
        Self::primitive(
            name,
            Primitive::Cylinder {
                r1: radius_bottom,
                r2: radius_top,
                height,
                segments: segments_or_default(segments),
                center: false,
            },
        )
    }

    /// Create a sphere centered at origin.
    pub fn sphere(name: impl Into<String>, radius: f64, segments: u32) -> Self {
        Self::primitive(
            name,
            Primitive::Sphere {
                radius,
                segments: segments_or_default(segments),
            },
        )
    }

    /// Create a polyhedron from vertices and faces (vertex indices per face).
    pub fn polyhedron(
        name: impl Into<String>,
        points: &[Point3<f64>],
        faces: Vec<Vec<usize>>,
    ) -> Self {
        Self::primitive(
            name,
            Primitive::Polyhedron {
                points: points.iter().map(|p| ir_vec3(p.x, p.y, p.z)).collect(),
                faces,
            },
        )
    }

    /// Create a 2D rectangle with one corner at the origin.
    pub fn square(name: impl Into<String>, x: f64, y: f64) -> Self {
        Self::primitive(
            name,
            Primitive::Square {
                size: IrVec2::new(x, y),
                center: false,
            },
        )
    }

    /// Create a 2D circle centered at the origin.
    pub fn circle(name: impl Into<String>, radius: f64, segments: u32) -> Self {
        Self::primitive(
            name,
            Primitive::Circle {
                radius,
                segments: segments_or_default(segments),
            },
        )
    }

    /// Create a 2D polygon.
    pub fn polygon(name: impl Into<String>, points: &[Point2<f64>]) -> Self {
        Self::primitive(
            name,
            Primitive::Polygon {
                points: points.iter().map(|p| IrVec2::new(p.x, p.y)).collect(),
            },
        )
    }

    /// Create a 2D text outline.
    pub fn text(name: impl Into<String>, text: impl Into<String>, size: f64) -> Self {
        Self::primitive(
            name,
            Primitive::Text {
                text: text.into(),
                size,
                font: None,
            },
        )
    }

    /// Reference an external 2D outline file, resolved by the renderer.
    pub fn import(name: impl Into<String>, file: impl Into<String>) -> Self {
        Self::primitive(name, Primitive::Import { file: file.into() })
    }

    // =========================================================================
    // CSG operations
    // =========================================================================

    fn combine(name: String, op: BooleanOp, children: Vec<Solid>) -> Self {
        Self::new(name, Solid::boolean(op, children))
    }

    /// Boolean difference (self - other).
    pub fn difference(&self, other: &Part) -> Self {
        Self::combine(
            format!("{}-diff", self.name),
            BooleanOp::Difference,
            vec![self.solid.clone(), other.solid.clone()],
        )
    }

    /// Boolean difference of every cutter from self, as one node.
    pub fn difference_all<'a, I>(&self, cutters: I) -> Self
    where
        I: IntoIterator<Item = &'a Part>,
    {
        let mut children = vec![self.solid.clone()];
        children.extend(cutters.into_iter().map(|c| c.solid.clone()));
        Self::combine(format!("{}-diff", self.name), BooleanOp::Difference, children)
    }

    /// Boolean union (self + other).
    pub fn union(&self, other: &Part) -> Self {
        Self::combine(
            format!("{}-union", self.name),
            BooleanOp::Union,
            vec![self.solid.clone(), other.solid.clone()],
        )
    }

    /// Boolean union of any number of parts, as one node.
    pub fn union_all<I>(name: impl Into<String>, parts: I) -> Self
    where
        I: IntoIterator<Item = Part>,
    {
        let children = parts.into_iter().map(|p| p.solid).collect();
        Self::combine(name.into(), BooleanOp::Union, children)
    }

    /// Boolean intersection.
    pub fn intersection(&self, other: &Part) -> Self {
        Self::combine(
            format!("{}-intersect", self.name),
            BooleanOp::Intersection,
            vec![self.solid.clone(), other.solid.clone()],
        )
    }

    /// Convex hull of self and other.
    pub fn hull(&self, other: &Part) -> Self {
        Self::combine(
            format!("{}-hull", self.name),
            BooleanOp::Hull,
            vec![self.solid.clone(), other.solid.clone()],
        )
    }

    /// Convex hull of any number of parts, as one node.
    pub fn hull_all<I>(name: impl Into<String>, parts: I) -> Self
    where
        I: IntoIterator<Item = Part>,
    {
        let children = parts.into_iter().map(|p| p.solid).collect();
        Self::combine(name.into(), BooleanOp::Hull, children)
    }

    // =========================================================================
    // Transforms
    // =========================================================================

    /// Translate the part.
    pub fn translate(&self, x: f64, y: f64, z: f64) -> Self {
        self.transformed(TransformOp::Translate {
            offset: ir_vec3(x, y, z),
        })
    }

    /// Translate by vector.
    pub fn translate_vec(&self, v: Vector3<f64>) -> Self {
        self.translate(v.x, v.y, v.z)
    }

    /// Rotate the part (angles in degrees, applied about X, then Y, then Z).
    pub fn rotate(&self, x_deg: f64, y_deg: f64, z_deg: f64) -> Self {
        self.transformed(TransformOp::Rotate {
            angles: ir_vec3(x_deg, y_deg, z_deg),
        })
    }

    /// Rotate by an Euler angle vector, as returned by
    /// [`math::point_to_rotation`].
    pub fn rotate_vec(&self, angles: Vector3<f64>) -> Self {
        self.rotate(angles.x, angles.y, angles.z)
    }

    /// Scale the part about the origin.
    pub fn scale(&self, x: f64, y: f64, z: f64) -> Self {
        self.transformed(TransformOp::Scale {
            factor: ir_vec3(x, y, z),
        })
    }

    /// Uniform scale.
    pub fn scale_uniform(&self, s: f64) -> Self {
        self.scale(s, s, s)
    }

    /// Mirror through the plane through the origin with normal `(x, y, z)`.
    pub fn mirror(&self, x: f64, y: f64, z: f64) -> Self {
        self.transformed(TransformOp::Mirror {
            normal: ir_vec3(x, y, z),
        })
    }

    /// Mirror across the YZ plane (negate X).
    pub fn mirror_x(&self) -> Self {
        self.mirror(1.0, 0.0, 0.0)
    }

    /// Mirror across the XZ plane (negate Y).
    pub fn mirror_y(&self) -> Self {
        self.mirror(0.0, 1.0, 0.0)
    }

    /// Mirror across the XY plane (negate Z).
    pub fn mirror_z(&self) -> Self {
        self.mirror(0.0, 0.0, 1.0)
    }

    /// Apply an affine matrix given as rows.
    pub fn multmatrix(&self, rows: [[f64; 4]; 4]) -> Self {
        self.transformed(TransformOp::MultMatrix { rows })
    }

    /// Extrude a 2D part straight up along Z.
    pub fn linear_extrude(&self, height: f64) -> Self {
        self.linear_extrude_with(height, 0.0, 1.0, false)
    }

    /// Extrude a 2D part along Z with twist (degrees) and top scale.
    pub fn linear_extrude_with(&self, height: f64, twist: f64, scale: f64, center: bool) -> Self {
        self.with_solid(self.solid.extruded(Extrusion::Linear {
            height,
            twist,
            scale,
            center,
        }))
    }

    /// Revolve a 2D part around Z.
    pub fn rotate_extrude(&self, angle_deg: f64, segments: u32) -> Self {
        self.with_solid(self.solid.extruded(Extrusion::Rotate {
            angle: angle_deg,
            segments: segments_or_default(segments),
        }))
    }

    // =========================================================================
    // Patterns
    // =========================================================================

    /// Union of `count` copies spaced by `(dx, dy, dz)`.
    ///
    /// The first copy is at the original position; each subsequent copy
    /// is offset by an additional `(dx, dy, dz)`.
    pub fn linear_pattern(&self, dx: f64, dy: f64, dz: f64, count: usize) -> Part {
        let copies = (0..count).map(|i| {
            let n = i as f64;
            self.translate(dx * n, dy * n, dz * n)
        });
        Self::union_all(format!("{}-pattern", self.name), copies)
    }

    /// Union of `count` copies rotated evenly around the Z axis.
    ///
    /// Each copy is moved outward along X by `radius`, then rotated by
    /// `360° / count` increments.
    pub fn circular_pattern(&self, radius: f64, count: usize) -> Part {
        let copies = (0..count).map(|i| {
            let angle = 360.0 * (i as f64) / (count as f64);
            self.translate(radius, 0.0, 0.0).rotate(0.0, 0.0, angle)
        });
        Self::union_all(format!("{}-pattern", self.name), copies)
    }

    // =========================================================================
    // Queries and output
    // =========================================================================

    /// Conservative axis-aligned bounds of the geometry.
    ///
    /// `None` when the part is empty or contains shapes whose extent only
    /// the renderer knows (text, imported outlines).
    pub fn bounding_box(&self) -> Option<Aabb> {
        analysis::bounds(&self.solid)
    }

    /// Node counts and depth of the expression tree.
    pub fn stats(&self) -> TreeStats {
        analysis::stats(&self.solid)
    }

    /// Whether the part has no geometry at all.
    pub fn is_empty(&self) -> bool {
        self.solid.is_empty()
    }

    /// OpenSCAD program for this part.
    pub fn to_scad(&self, config: &ModelConfig) -> Result<String, CadError> {
        Ok(thingsmith_ir::to_scad(&self.solid, Some(config.segments()))?)
    }

    /// Write the OpenSCAD program to a file (delegates to [`export::write_part`]).
    pub fn write_scad(
        &self,
        path: impl AsRef<std::path::Path>,
        config: &ModelConfig,
    ) -> Result<(), CadError> {
        export::write_part(self, path, config)
    }

    /// Document with this part as its only model.
    pub fn to_document(&self, config: &ModelConfig) -> Document {
        let mut doc = Document::new();
        doc.segments = Some(config.segments());
        doc.models.push(Model {
            name: self.name.clone(),
            solid: self.solid.clone(),
        });
        doc
    }
}

// =============================================================================
// Operator overloads for ergonomic CSG
// =============================================================================

/// Union: `&a + &b`
impl std::ops::Add for &Part {
    type Output = Part;
    fn add(self, rhs: &Part) -> Part {
        self.union(rhs)
    }
}

/// Union: `a + b`
impl std::ops::Add for Part {
    type Output = Part;
    fn add(self, rhs: Part) -> Part {
        self.union(&rhs)
    }
}

/// Difference: `&a - &b`
impl std::ops::Sub for &Part {
    type Output = Part;
    fn sub(self, rhs: &Part) -> Part {
        self.difference(rhs)
    }
}

/// Difference: `a - b`
impl std::ops::Sub for Part {
    type Output = Part;
    fn sub(self, rhs: Part) -> Part {
        self.difference(&rhs)
    }
}

/// Intersection: `&a & &b`
impl std::ops::BitAnd for &Part {
    type Output = Part;
    fn bitand(self, rhs: &Part) -> Part {
        self.intersection(rhs)
    }
}

/// Intersection: `a & b`
impl std::ops::BitAnd for Part {
    type Output = Part;
    fn bitand(self, rhs: Part) -> Part {
        self.intersection(&rhs)
    }
}

// =============================================================================
// Scene (several output files from one object)
// =============================================================================

/// A set of parts rendered together, one output file per part.
///
/// Typical use is a part and its mirror image, or a box and its lid.
pub struct Scene {
    /// Name of the scene.
    pub name: String,
    /// Parts in output order.
    pub parts: Vec<Part>,
}

impl Scene {
    /// Create a new empty scene.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parts: Vec::new(),
        }
    }

    /// Add a part; its name becomes the output file name.
    pub fn add(&mut self, part: Part) {
        self.parts.push(part);
    }

    /// Get total number of parts
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Check if scene is empty
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Document with one model per part.
    pub fn to_document(&self, config: &ModelConfig) -> Document {
        let mut doc = Document::new();
        doc.segments = Some(config.segments());
        doc.models = self
            .parts
            .iter()
            .map(|part| Model {
                name: part.name.clone(),
                solid: part.solid.clone(),
            })
            .collect();
        doc
    }

    /// `(file name, OpenSCAD text)` for every part.
    pub fn render(&self, config: &ModelConfig) -> Result<Vec<(String, String)>, CadError> {
        Ok(self.to_document(config).render()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use thingsmith_ir::Node;

    #[test]
    fn test_cube_creation() {
        let cube = Part::cube("test", 10.0, 10.0, 10.0);
        assert!(!cube.is_empty());
        assert_eq!(cube.name, "test");
    }

    #[test]
    fn test_difference_tree() {
        let cube = Part::cube("cube", 10.0, 10.0, 10.0);
        let hole = Part::cylinder("hole", 3.0, 15.0, 32).translate(5.0, 5.0, -1.0);
        let result = cube.difference(&hole);
        assert_eq!(result.name, "cube-diff");
        match result.solid().node() {
            Node::Boolean { op, children } => {
                assert_eq!(*op, BooleanOp::Difference);
                assert!(children[0].ptr_eq(cube.solid()));
                assert!(children[1].ptr_eq(hole.solid()));
            }
            other => panic!("expected Difference, got {other:?}"),
        }
    }

    #[test]
    fn test_operator_overloads() {
        let a = Part::cube("a", 10.0, 10.0, 10.0);
        let b = Part::cube("b", 10.0, 10.0, 10.0).translate(5.0, 0.0, 0.0);

        let union = &a + &b;
        let diff = &a - &b;
        let isect = &a & &b;
        assert_eq!(union.stats().booleans, 1);
        assert_eq!(diff.name, "a-diff");
        assert_eq!(isect.name, "a-intersect");

        let owned = Part::cube("a", 1.0, 1.0, 1.0) + Part::cube("b", 1.0, 1.0, 1.0);
        assert_eq!(owned.solid().children().len(), 2);
    }

    #[test]
    fn test_operands_are_left_untouched() {
        let a = Part::cube("a", 10.0, 10.0, 10.0);
        let before = a.clone();
        let _moved = a.translate(1.0, 2.0, 3.0);
        let _cut = &a - &Part::sphere("s", 2.0, 0);
        assert_eq!(a, before);
    }

    #[test]
    fn test_union_all_is_one_node() {
        let parts =
            (0..5).map(|i| Part::cube("c", 1.0, 1.0, 1.0).translate(2.0 * i as f64, 0.0, 0.0));
        let row = Part::union_all("row", parts);
        assert_eq!(row.solid().children().len(), 5);
        assert_eq!(row.stats().booleans, 1);
        assert_eq!(row.stats().primitives, 5);
    }

    #[test]
    fn test_bounding_box() {
        let cube = Part::cube("cube", 10.0, 20.0, 30.0);
        let bb = cube.bounding_box().unwrap();
        assert_relative_eq!(bb.size(), Vector3::new(10.0, 20.0, 30.0));
        assert_eq!(bb.min, Point3::origin());
    }

    #[test]
    fn test_mirror() {
        let cube = Part::cube("cube", 10.0, 10.0, 10.0).translate(5.0, 0.0, 0.0);
        let mirrored = cube.mirror_x();
        let bb = mirrored.bounding_box().unwrap();
        // Original is at x=[5,15], mirrored should be at x=[-15,-5]
        assert_relative_eq!(bb.min.x, -15.0, epsilon = 1e-12);
        assert_relative_eq!(bb.max.x, -5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_linear_pattern() {
        let cube = Part::cube("cube", 5.0, 5.0, 5.0);
        let pattern = cube.linear_pattern(10.0, 0.0, 0.0, 3);
        let bb = pattern.bounding_box().unwrap();
        // 3 copies at x=0, x=10, x=20 each 5 wide → spans 0..25
        assert_relative_eq!(bb.size().x, 25.0, epsilon = 1e-12);
    }

    #[test]
    fn test_circular_pattern() {
        let cube = Part::cube("cube", 2.0, 2.0, 2.0);
        let pattern = cube.circular_pattern(10.0, 4);
        assert_eq!(pattern.solid().children().len(), 4);
        let bb = pattern.bounding_box().unwrap();
        assert!(bb.max.x >= 12.0 - 1e-9);
        assert!(bb.min.x <= -10.0 + 1e-9);
    }

    #[test]
    fn test_to_scad_uses_config_segments() {
        let config = ModelConfig::new(111, 0.01).unwrap();
        let text = Part::cylinder("c", 1.0, 2.0, 0).to_scad(&config).unwrap();
        assert!(text.starts_with("$fn = 111;\n"));
        assert!(text.contains("cylinder(h = 2, r1 = 1, r2 = 1, center = false);"));
    }

    #[test]
    fn test_document_roundtrip() {
        let config = ModelConfig::default();
        let part = Part::cube("box", 10.0, 20.0, 30.0) - Part::cylinder("hole", 3.0, 40.0, 32);
        let doc = part.to_document(&config);
        let json = doc.to_json().expect("serialize");
        let restored = Document::from_json(&json).expect("deserialize");
        assert_eq!(doc, restored);
        assert_eq!(restored.models[0].name, "box-diff");
    }

    #[test]
    fn test_scene_renders_each_part() {
        let config = ModelConfig::default();
        let holder = Part::cube("holder_direct", 4.0, 2.0, 1.0);
        let mut scene = Scene::new("holder");
        scene.add(holder.clone());
        let mut mirrored = holder.mirror_x();
        mirrored.name = "holder_mirror".to_string();
        scene.add(mirrored);

        assert_eq!(scene.len(), 2);
        let files = scene.render(&config).unwrap();
        assert_eq!(files[0].0, "holder_direct.scad");
        assert_eq!(files[1].0, "holder_mirror.scad");
        assert!(files[1].1.contains("mirror(v = [1, 0, 0]) {"));
    }

    #[test]
    fn test_invalid_numbers_fail_at_output() {
        let config = ModelConfig::default();
        let broken = Part::cube("b", 1.0, 1.0, 1.0).scale(f64::NAN, 1.0, 1.0);
        assert!(matches!(broken.to_scad(&config), Err(CadError::Scad(_))));
    }

    #[test]
    fn test_parameter_checks() {
        assert!(ensure_positive("radius", 1.0).is_ok());
        assert!(ensure_positive("radius", 0.0).is_err());
        assert!(ensure_positive("radius", f64::INFINITY).is_err());
        assert!(ensure_non_negative("gap", 0.0).is_ok());
        assert!(ensure_non_negative("gap", -0.1).is_err());
    }
}
