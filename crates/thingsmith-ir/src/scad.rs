//! OpenSCAD output for expression trees.
//!
//! The tree is written depth-first, one statement per line, children of a
//! combinator or transform in an indented block:
//!
//! ```text
//! $fn = 33;
//!
//! difference() {
//! 	cube(size = [10, 20, 30], center = false);
//! 	translate(v = [5, 10, -1]) {
//! 		cylinder(h = 40, r1 = 3, r2 = 3, center = false);
//! 	}
//! }
//! ```
//!
//! Nothing is read back; the renderer is the only consumer.

use crate::{BooleanOp, Extrusion, Node, Primitive, Solid, TransformOp, Vec2, Vec3};
use std::fmt::{self, Write as FmtWrite};

/// Errors raised while writing OpenSCAD text.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ScadError {
    /// A parameter is NaN or infinite; the renderer would reject the file.
    #[error("non-finite value {value} in {context}")]
    NonFinite {
        /// The offending number.
        value: f64,
        /// Statement being written.
        context: &'static str,
    },
    /// The underlying writer failed.
    #[error("formatting failed")]
    Fmt(#[from] fmt::Error),
}

/// Render `solid` as an OpenSCAD program.
///
/// With `segments` set, the program starts with a `$fn` header that applies
/// to every circular shape without its own segment count.
pub fn to_scad(solid: &Solid, segments: Option<u32>) -> Result<String, ScadError> {
    let mut output = String::new();
    write_scad(&mut output, solid, segments)?;
    Ok(output)
}

/// Write `solid` as an OpenSCAD program into `out`.
pub fn write_scad<W: FmtWrite>(
    out: &mut W,
    solid: &Solid,
    segments: Option<u32>,
) -> Result<(), ScadError> {
    if let Some(n) = segments {
        writeln!(out, "$fn = {};", n)?;
        writeln!(out)?;
    }
    write_node(out, solid, 0)
}

fn write_node<W: FmtWrite>(out: &mut W, solid: &Solid, depth: usize) -> Result<(), ScadError> {
    let indent = "\t".repeat(depth);
    let head = match solid.node() {
        Node::Primitive { shape } => {
            writeln!(out, "{}{};", indent, format_primitive(shape)?)?;
            return Ok(());
        }
        Node::Boolean { op, .. } => format_boolean(*op).to_string(),
        Node::Transform { op, .. } => format_transform(op)?,
        Node::Extrude { op, .. } => format_extrusion(op)?,
    };

    let children = solid.children();
    if children.is_empty() {
        writeln!(out, "{}{};", indent, head)?;
        return Ok(());
    }

    writeln!(out, "{}{} {{", indent, head)?;
    for child in children {
        write_node(out, child, depth + 1)?;
    }
    writeln!(out, "{}}}", indent)?;
    Ok(())
}

fn format_primitive(shape: &Primitive) -> Result<String, ScadError> {
    match shape {
        Primitive::Cube { size, center } => Ok(format!(
            "cube(size = {}, center = {})",
            format_vec3(size, "cube")?,
            center
        )),

        Primitive::Cylinder {
            r1,
            r2,
            height,
            segments,
            center,
        } => Ok(format!(
            "cylinder(h = {}, r1 = {}, r2 = {}, center = {}{})",
            format_num(*height, "cylinder")?,
            format_num(*r1, "cylinder")?,
            format_num(*r2, "cylinder")?,
            center,
            format_segments(*segments)
        )),

        Primitive::Sphere { radius, segments } => Ok(format!(
            "sphere(r = {}{})",
            format_num(*radius, "sphere")?,
            format_segments(*segments)
        )),

        Primitive::Polyhedron { points, faces } => {
            let points = points
                .iter()
                .map(|p| format_vec3(p, "polyhedron"))
                .collect::<Result<Vec<_>, _>>()?;
            let faces = faces
                .iter()
                .map(|face| {
                    let indices: Vec<String> = face.iter().map(|i| i.to_string()).collect();
                    format!("[{}]", indices.join(", "))
                })
                .collect::<Vec<_>>();
            Ok(format!(
                "polyhedron(points = [{}], faces = [{}])",
                points.join(", "),
                faces.join(", ")
            ))
        }

        Primitive::Square { size, center } => Ok(format!(
            "square(size = {}, center = {})",
            format_vec2(size, "square")?,
            center
        )),

        Primitive::Circle { radius, segments } => Ok(format!(
            "circle(r = {}{})",
            format_num(*radius, "circle")?,
            format_segments(*segments)
        )),

        Primitive::Polygon { points } => {
            let points = points
                .iter()
                .map(|p| format_vec2(p, "polygon"))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(format!("polygon(points = [{}])", points.join(", ")))
        }

        Primitive::Text { text, size, font } => {
            let font = font
                .as_deref()
                .map(|f| format!(", font = {}", format_quoted_string(f)))
                .unwrap_or_default();
            Ok(format!(
                "text(text = {}, size = {}{})",
                format_quoted_string(text),
                format_num(*size, "text")?,
                font
            ))
        }

        Primitive::Import { file } => {
            Ok(format!("import(file = {})", format_quoted_string(file)))
        }
    }
}

fn format_boolean(op: BooleanOp) -> &'static str {
    match op {
        BooleanOp::Union => "union()",
        BooleanOp::Difference => "difference()",
        BooleanOp::Intersection => "intersection()",
        BooleanOp::Hull => "hull()",
    }
}

fn format_transform(op: &TransformOp) -> Result<String, ScadError> {
    match op {
        TransformOp::Translate { offset } => {
            Ok(format!("translate(v = {})", format_vec3(offset, "translate")?))
        }
        TransformOp::Rotate { angles } => {
            Ok(format!("rotate(a = {})", format_vec3(angles, "rotate")?))
        }
        TransformOp::Scale { factor } => {
            Ok(format!("scale(v = {})", format_vec3(factor, "scale")?))
        }
        TransformOp::Mirror { normal } => {
            Ok(format!("mirror(v = {})", format_vec3(normal, "mirror")?))
        }
        TransformOp::MultMatrix { rows } => {
            let rows = rows
                .iter()
                .map(|row| -> Result<String, ScadError> {
                    let cells = row
                        .iter()
                        .map(|v| format_num(*v, "multmatrix"))
                        .collect::<Result<Vec<_>, _>>()?;
                    Ok(format!("[{}]", cells.join(", ")))
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(format!("multmatrix(m = [{}])", rows.join(", ")))
        }
    }
}

fn format_extrusion(op: &Extrusion) -> Result<String, ScadError> {
    match op {
        Extrusion::Linear {
            height,
            twist,
            scale,
            center,
        } => Ok(format!(
            "linear_extrude(height = {}, center = {}, twist = {}, scale = {})",
            format_num(*height, "linear_extrude")?,
            center,
            format_num(*twist, "linear_extrude")?,
            format_num(*scale, "linear_extrude")?
        )),
        Extrusion::Rotate { angle, segments } => Ok(format!(
            "rotate_extrude(angle = {}{})",
            format_num(*angle, "rotate_extrude")?,
            format_segments(*segments)
        )),
    }
}

/// Shortest decimal that reads back to the same f64.
fn format_num(value: f64, context: &'static str) -> Result<String, ScadError> {
    if !value.is_finite() {
        return Err(ScadError::NonFinite { value, context });
    }
    // Avoid "-0", which reads oddly in generated files.
    if value == 0.0 {
        return Ok("0".to_string());
    }
    Ok(value.to_string())
}

fn format_vec3(v: &Vec3, context: &'static str) -> Result<String, ScadError> {
    Ok(format!(
        "[{}, {}, {}]",
        format_num(v.x, context)?,
        format_num(v.y, context)?,
        format_num(v.z, context)?
    ))
}

fn format_vec2(v: &Vec2, context: &'static str) -> Result<String, ScadError> {
    Ok(format!(
        "[{}, {}]",
        format_num(v.x, context)?,
        format_num(v.y, context)?
    ))
}

fn format_segments(segments: Option<u32>) -> String {
    segments
        .map(|n| format!(", $fn = {}", n))
        .unwrap_or_default()
}

fn format_quoted_string(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube(x: f64, y: f64, z: f64) -> Solid {
        Solid::primitive(Primitive::Cube {
            size: Vec3::new(x, y, z),
            center: false,
        })
    }

    #[test]
    fn header_and_nesting() {
        let hole = Solid::primitive(Primitive::Cylinder {
            r1: 3.0,
            r2: 3.0,
            height: 40.0,
            segments: None,
            center: false,
        })
        .transformed(TransformOp::Translate {
            offset: Vec3::new(5.0, 10.0, -1.0),
        });
        let part = Solid::boolean(BooleanOp::Difference, vec![cube(10.0, 20.0, 30.0), hole]);

        let text = to_scad(&part, Some(33)).unwrap();
        let expected = "$fn = 33;\n\
                        \n\
                        difference() {\n\
                        \tcube(size = [10, 20, 30], center = false);\n\
                        \ttranslate(v = [5, 10, -1]) {\n\
                        \t\tcylinder(h = 40, r1 = 3, r2 = 3, center = false);\n\
                        \t}\n\
                        }\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn no_header_without_segments() {
        let text = to_scad(&cube(1.0, 1.0, 1.0), None).unwrap();
        assert_eq!(text, "cube(size = [1, 1, 1], center = false);\n");
    }

    #[test]
    fn fractional_and_negative_zero() {
        let moved = cube(0.5, 1.0, 1.0).transformed(TransformOp::Translate {
            offset: Vec3::new(-0.0, 0.001, -2.25),
        });
        let text = to_scad(&moved, None).unwrap();
        assert!(text.starts_with("translate(v = [0, 0.001, -2.25]) {\n"));
        assert!(text.contains("cube(size = [0.5, 1, 1], center = false);"));
    }

    #[test]
    fn per_shape_segments() {
        let hex = Solid::primitive(Primitive::Cylinder {
            r1: 2.0,
            r2: 2.0,
            height: 1.0,
            segments: Some(6),
            center: false,
        });
        let text = to_scad(&hex, Some(64)).unwrap();
        assert!(text.contains("cylinder(h = 1, r1 = 2, r2 = 2, center = false, $fn = 6);"));
    }

    #[test]
    fn polyhedron_and_polygon() {
        let tetra = Solid::primitive(Primitive::Polyhedron {
            points: vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(0.0, 0.0, 1.0),
            ],
            faces: vec![vec![0, 1, 2], vec![0, 3, 1], vec![1, 3, 2], vec![2, 3, 0]],
        });
        let text = to_scad(&tetra, None).unwrap();
        assert!(text.contains("points = [[0, 0, 0], [1, 0, 0], [0, 1, 0], [0, 0, 1]]"));
        assert!(text.contains("faces = [[0, 1, 2], [0, 3, 1], [1, 3, 2], [2, 3, 0]]"));

        let triangle = Solid::primitive(Primitive::Polygon {
            points: vec![Vec2::new(0.0, 0.0), Vec2::new(2.0, 0.0), Vec2::new(0.0, 1.5)],
        });
        let text = to_scad(&triangle, None).unwrap();
        assert_eq!(text, "polygon(points = [[0, 0], [2, 0], [0, 1.5]]);\n");
    }

    #[test]
    fn extrusion_of_imported_profile() {
        let logo = Solid::primitive(Primitive::Import {
            file: "paw.dxf".to_string(),
        })
        .extruded(Extrusion::Linear {
            height: 1.0,
            twist: 0.0,
            scale: 1.0,
            center: false,
        });
        let text = to_scad(&logo, None).unwrap();
        assert_eq!(
            text,
            "linear_extrude(height = 1, center = false, twist = 0, scale = 1) {\n\
             \timport(file = \"paw.dxf\");\n\
             }\n"
        );
    }

    #[test]
    fn text_is_quoted_and_escaped() {
        let label = Solid::primitive(Primitive::Text {
            text: "say \"hi\"".to_string(),
            size: 5.0,
            font: Some("Liberation Sans:style=Bold".to_string()),
        });
        let text = to_scad(&label, None).unwrap();
        assert_eq!(
            text,
            "text(text = \"say \\\"hi\\\"\", size = 5, font = \"Liberation Sans:style=Bold\");\n"
        );
    }

    #[test]
    fn empty_union() {
        assert_eq!(to_scad(&Solid::empty(), None).unwrap(), "union();\n");
    }

    #[test]
    fn multmatrix_rows() {
        let sheared = cube(1.0, 1.0, 1.0).transformed(TransformOp::MultMatrix {
            rows: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [-0.4, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        });
        let text = to_scad(&sheared, None).unwrap();
        assert!(text.starts_with(
            "multmatrix(m = [[1, 0, 0, 0], [0, 1, 0, 0], [-0.4, 0, 1, 0], [0, 0, 0, 1]]) {\n"
        ));
    }

    #[test]
    fn non_finite_is_rejected() {
        let broken = cube(f64::NAN, 1.0, 1.0);
        match to_scad(&broken, None) {
            Err(ScadError::NonFinite { context, .. }) => assert_eq!(context, "cube"),
            other => panic!("expected NonFinite, got {other:?}"),
        }

        let far = cube(1.0, 1.0, 1.0).transformed(TransformOp::Scale {
            factor: Vec3::new(f64::INFINITY, 1.0, 1.0),
        });
        assert!(matches!(
            to_scad(&far, None),
            Err(ScadError::NonFinite { context: "scale", .. })
        ));
    }
}
