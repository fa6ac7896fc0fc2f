//! Solid-geometry expression tree for thingsmith models.
//!
//! A model is an immutable tree: leaves are primitive shapes, inner nodes
//! are boolean combinators, affine transforms or extrusions. Subtrees are
//! shared by cloning a [`Solid`] handle; nothing is mutated after
//! construction.
//!
//! The tree is purely declarative, no mesh data. Rendering it into a mesh
//! is the job of the external OpenSCAD renderer; [`scad`] writes the tree
//! in that renderer's language.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub mod scad;

pub use scad::{to_scad, write_scad, ScadError};

/// 3D vector with f64 components (conventionally millimeters).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
    /// Z component.
    pub z: f64,
}

impl Vec3 {
    /// Create a new Vec3.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// 2D vector with f64 components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
}

impl Vec2 {
    /// Create a new Vec2.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Leaf shapes.
///
/// Circular shapes carry an optional segment count; `None` defers to the
/// document-wide `$fn`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Primitive {
    /// Box with one corner at the origin, or centered on it.
    Cube {
        /// Size along each axis.
        size: Vec3,
        /// Center on the origin instead of sitting in the positive octant.
        center: bool,
    },
    /// Cylinder or truncated cone along Z, base at `z = 0` unless centered.
    Cylinder {
        /// Bottom radius.
        r1: f64,
        /// Top radius.
        r2: f64,
        /// Height along Z.
        height: f64,
        /// Circular segments.
        segments: Option<u32>,
        /// Center along Z.
        center: bool,
    },
    /// Sphere centered at the origin.
    Sphere {
        /// Radius.
        radius: f64,
        /// Circular segments.
        segments: Option<u32>,
    },
    /// Closed polyhedron.
    Polyhedron {
        /// Vertex positions.
        points: Vec<Vec3>,
        /// Faces as vertex indices, clockwise seen from outside.
        faces: Vec<Vec<usize>>,
    },
    /// 2D rectangle.
    Square {
        /// Width and height.
        size: Vec2,
        /// Center on the origin.
        center: bool,
    },
    /// 2D circle centered at the origin.
    Circle {
        /// Radius.
        radius: f64,
        /// Circular segments.
        segments: Option<u32>,
    },
    /// 2D polygon.
    Polygon {
        /// Outline vertices.
        points: Vec<Vec2>,
    },
    /// 2D text outline.
    Text {
        /// The string to render.
        text: String,
        /// Nominal font size.
        size: f64,
        /// Font name, renderer default when absent.
        font: Option<String>,
    },
    /// 2D profile loaded by the renderer from an external outline file.
    Import {
        /// File name as the renderer should resolve it.
        file: String,
    },
}

/// Boolean combinators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BooleanOp {
    /// Everything in any child.
    Union,
    /// The first child minus all the others.
    Difference,
    /// Only what every child shares.
    Intersection,
    /// Convex hull of all children.
    Hull,
}

/// Affine transforms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TransformOp {
    /// Translation by an offset vector.
    Translate {
        /// Translation offset.
        offset: Vec3,
    },
    /// Rotation by Euler angles in degrees (applied as X, then Y, then Z).
    Rotate {
        /// Rotation angles in degrees.
        angles: Vec3,
    },
    /// Non-uniform scale about the origin.
    Scale {
        /// Scale factors per axis.
        factor: Vec3,
    },
    /// Reflection through the plane with the given normal.
    Mirror {
        /// Plane normal, need not be unit length.
        normal: Vec3,
    },
    /// Arbitrary affine matrix, row-major.
    MultMatrix {
        /// Matrix rows.
        rows: [[f64; 4]; 4],
    },
}

/// Turning a 2D child into a solid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Extrusion {
    /// Straight extrusion along Z.
    Linear {
        /// Extrusion height.
        height: f64,
        /// Twist in degrees over the full height.
        twist: f64,
        /// Scale of the top outline relative to the bottom one.
        scale: f64,
        /// Center along Z.
        center: bool,
    },
    /// Revolution of the XY outline around Z.
    Rotate {
        /// Swept angle in degrees.
        angle: f64,
        /// Circular segments.
        segments: Option<u32>,
    },
}

/// A node of the expression tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Node {
    /// A leaf shape.
    Primitive {
        /// The shape.
        shape: Primitive,
    },
    /// A boolean combination of children.
    Boolean {
        /// The combinator.
        op: BooleanOp,
        /// Operands in order.
        children: Vec<Solid>,
    },
    /// A transformed child.
    Transform {
        /// The transform.
        op: TransformOp,
        /// Transformed subtree.
        child: Solid,
    },
    /// An extruded 2D child.
    Extrude {
        /// The extrusion.
        op: Extrusion,
        /// 2D subtree.
        child: Solid,
    },
}

/// Shared, immutable handle to a tree [`Node`].
///
/// Cloning is cheap and shares the subtree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Solid(Arc<Node>);

impl Solid {
    /// Wrap a node.
    pub fn new(node: Node) -> Self {
        Self(Arc::new(node))
    }

    /// A primitive leaf.
    pub fn primitive(shape: Primitive) -> Self {
        Self::new(Node::Primitive { shape })
    }

    /// A boolean node over `children`.
    pub fn boolean(op: BooleanOp, children: Vec<Solid>) -> Self {
        Self::new(Node::Boolean { op, children })
    }

    /// Empty geometry, the identity for union.
    pub fn empty() -> Self {
        Self::boolean(BooleanOp::Union, Vec::new())
    }

    /// This solid under `op`.
    pub fn transformed(&self, op: TransformOp) -> Self {
        Self::new(Node::Transform {
            op,
            child: self.clone(),
        })
    }

    /// This 2D outline extruded by `op`.
    pub fn extruded(&self, op: Extrusion) -> Self {
        Self::new(Node::Extrude {
            op,
            child: self.clone(),
        })
    }

    /// The node behind the handle.
    pub fn node(&self) -> &Node {
        &self.0
    }

    /// Direct children of this node, in order.
    pub fn children(&self) -> &[Solid] {
        match self.node() {
            Node::Primitive { .. } => &[],
            Node::Boolean { children, .. } => children,
            Node::Transform { child, .. } | Node::Extrude { child, .. } => {
                std::slice::from_ref(child)
            }
        }
    }

    /// Whether both handles point at the same shared subtree.
    pub fn ptr_eq(&self, other: &Solid) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Union with no children.
    pub fn is_empty(&self) -> bool {
        matches!(
            self.node(),
            Node::Boolean { op: BooleanOp::Union, children } if children.is_empty()
        )
    }
}

/// A named top-level solid, rendered into its own output file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    /// Output name, without extension.
    pub name: String,
    /// Root of the tree.
    pub solid: Solid,
}

/// A thingsmith document: the models of one object and the render settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Format version string (e.g. "0.1").
    pub version: String,
    /// Document-wide `$fn`, emitted as the file header.
    pub segments: Option<u32>,
    /// Models in output order.
    pub models: Vec<Model>,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            version: "0.1".to_string(),
            segments: None,
            models: Vec::new(),
        }
    }
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON string.
    ///
    /// Trees built by repeated cuts nest one node per cut, so the nesting
    /// limit is lifted and the stack grows on demand instead.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut de = serde_json::Deserializer::from_str(json);
        de.disable_recursion_limit();
        let doc = Self::deserialize(serde_stacker::Deserializer::new(&mut de))?;
        de.end()?;
        Ok(doc)
    }

    /// Render every model, yielding `(file name, OpenSCAD text)` pairs.
    pub fn render(&self) -> Result<Vec<(String, String)>, ScadError> {
        self.models
            .iter()
            .map(|model| {
                let text = to_scad(&model.solid, self.segments)?;
                Ok((format!("{}.scad", model.name), text))
            })
            .collect()
    }
}
