//! Interlocking relief tiles.
//!
//! A tile is a pair of sloped ribs: one carries a ball pin on its side, the
//! other a matching dip. Tiles placed in a checkerboard let two printed parts
//! snap together along a seam.

use nalgebra::Point3;

use crate::{ensure_positive, CadError, Part};

/// Tile dimensions, in millimetres and degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileParams {
    /// Height of one rib along Y.
    pub height_pin: f64,
    /// Width of one rib along X.
    pub width_pin: f64,
    /// Space between the two ribs of a tile.
    pub width_gap: f64,
    /// How far a rib stands out along Z.
    pub depth: f64,
    /// Slope of the rib ends, in degrees.
    pub slope: f64,
    /// Radius of the ball pin.
    pub pin_radius: f64,
    /// Radius of the dip that receives a pin.
    pub dip_radius: f64,
    /// Clearance added around each rib.
    pub slack: f64,
}

impl Default for TileParams {
    fn default() -> Self {
        Self {
            height_pin: 5.0,
            width_pin: 0.86,
            width_gap: 0.43,
            depth: 1.67,
            slope: 40.0,
            pin_radius: 0.37,
            dip_radius: 0.48,
            slack: 0.08,
        }
    }
}

/// Checkerboard of interlocking tiles.
#[derive(Debug, Clone, PartialEq)]
pub struct TilePattern {
    params: TileParams,
}

impl TilePattern {
    /// Validated pattern; the ribs must be tall enough for both slopes.
    pub fn new(params: TileParams) -> Result<Self, CadError> {
        ensure_positive("tile pin height", params.height_pin)?;
        ensure_positive("tile pin width", params.width_pin)?;
        ensure_positive("tile gap width", params.width_gap)?;
        ensure_positive("tile depth", params.depth)?;
        ensure_positive("tile pin radius", params.pin_radius)?;
        ensure_positive("tile dip radius", params.dip_radius)?;
        ensure_positive("tile slack", params.slack)?;
        if !(params.slope > 0.0 && params.slope < 90.0) {
            return Err(CadError::InvalidParameter {
                name: "tile slope",
                reason: format!("must be between 0 and 90 degrees, got {}", params.slope),
            });
        }
        let pattern = Self { params };
        if 2.0 * pattern.height_sub() >= params.height_pin {
            return Err(CadError::InvalidParameter {
                name: "tile pin height",
                reason: format!(
                    "{} is too short for a {}° slope at depth {}",
                    params.height_pin, params.slope, params.depth
                ),
            });
        }
        Ok(pattern)
    }

    /// The tile dimensions.
    pub fn params(&self) -> &TileParams {
        &self.params
    }

    /// Column step of the pattern.
    pub fn width(&self) -> f64 {
        let p = &self.params;
        p.width_pin * 2.0 + p.width_gap + p.slack * 2.0
    }

    /// How much each sloped rib end falls short of the full height.
    pub fn height_sub(&self) -> f64 {
        self.params.depth * self.params.slope.to_radians().tan()
    }

    /// Row step of the pattern.
    pub fn height_all(&self) -> f64 {
        self.params.height_pin - self.height_sub() + self.params.slack * 2.0
    }

    /// Width of the seam between two parts joined by the pattern.
    pub fn seam(&self) -> f64 {
        self.params.depth + self.params.slack
    }

    /// Height of a pattern of `rows` rows, sloped ends included.
    pub fn pattern_height(&self, rows: usize) -> f64 {
        self.height_all() * rows as f64 + self.height_sub()
    }

    /// Round a stand dimension up so that it plus the seam is a whole number
    /// of tile pairs, letting the pattern continue across the seam.
    pub fn rounded_stand_dimension(&self, dimension: f64) -> f64 {
        let pair = self.width() * 2.0;
        let count = ((dimension + self.seam()) / pair).ceil();
        count * pair - self.seam()
    }

    fn rib(&self) -> Part {
        let p = &self.params;
        let sub = self.height_sub();
        let points = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(p.width_pin, 0.0, 0.0),
            Point3::new(p.width_pin, p.height_pin, 0.0),
            Point3::new(0.0, p.height_pin, 0.0),
            Point3::new(0.0, sub, p.depth),
            Point3::new(p.width_pin, sub, p.depth),
            Point3::new(p.width_pin, p.height_pin - sub, p.depth),
            Point3::new(0.0, p.height_pin - sub, p.depth),
        ];
        let faces = vec![
            vec![0, 1, 2, 3],
            vec![0, 4, 5, 1],
            vec![1, 5, 6, 2],
            vec![2, 6, 7, 3],
            vec![3, 7, 4, 0],
            vec![4, 7, 6, 5],
        ];
        Part::polyhedron("tile-rib", &points, faces)
    }

    /// One tile: a rib with a dip next to a rib with a pin.
    pub fn tile(&self) -> Part {
        let p = &self.params;
        let rib = self.rib();
        let middle = p.height_pin / 2.0;

        let groove = Part::sphere("tile-groove", p.dip_radius, 0).translate(0.0, middle, p.depth);
        let dip = Part::sphere("tile-dip", p.dip_radius, 0).translate(
            0.0,
            middle,
            p.pin_radius + p.slack,
        );
        let pin = Part::sphere("tile-pin", p.pin_radius, 0).translate(
            p.width_pin,
            middle,
            p.depth - p.pin_radius,
        );

        let with_dip = rib.difference_all([&groove, &dip]).translate(p.slack, p.slack, 0.0);
        let with_pin = (&rib + &pin).translate(p.slack + p.width_pin + p.width_gap, p.slack, 0.0);
        let mut tile = with_dip + with_pin;
        tile.name = "tile".to_string();
        tile
    }

    /// Number of tiles in a `rows` x `columns` checkerboard.
    pub fn instance_count(rows: usize, columns: usize) -> usize {
        (rows * columns).div_ceil(2)
    }

    /// Tiles at every `(row, column)` with `(row + column)` even, stepping
    /// [`TilePattern::width`] along X and [`TilePattern::height_all`] along Y.
    pub fn pattern(&self, rows: usize, columns: usize) -> Part {
        let tile = self.tile();
        let (step_x, step_y) = (self.width(), self.height_all());
        let tiles = (0..rows)
            .flat_map(|row| (0..columns).map(move |column| (row, column)))
            .filter(|(row, column)| (row + column) % 2 == 0)
            .map(|(row, column)| tile.translate(column as f64 * step_x, row as f64 * step_y, 0.0));
        tracing::trace!(rows, columns, "tile pattern");
        Part::union_all("tile-pattern", tiles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn pattern() -> TilePattern {
        TilePattern::new(TileParams::default()).unwrap()
    }

    #[test]
    fn derived_dimensions() {
        let t = pattern();
        assert_relative_eq!(t.width(), 2.31, epsilon = 1e-12);
        assert_relative_eq!(t.seam(), 1.75, epsilon = 1e-12);
        assert_relative_eq!(t.height_sub(), 1.67 * 40f64.to_radians().tan());
        assert_relative_eq!(t.height_all(), 5.0 - t.height_sub() + 0.16, epsilon = 1e-12);
        assert_relative_eq!(t.pattern_height(2), 2.0 * t.height_all() + t.height_sub());
    }

    #[test]
    fn checkerboard_counts() {
        let t = pattern();
        for (rows, columns) in [(2, 4), (2, 5), (3, 3), (1, 1), (0, 7)] {
            let part = t.pattern(rows, columns);
            let expected = TilePattern::instance_count(rows, columns);
            assert_eq!(part.solid().children().len(), expected, "{rows} x {columns}");
        }
        assert_eq!(TilePattern::instance_count(2, 4), 4);
        assert_eq!(TilePattern::instance_count(3, 3), 5);
    }

    #[test]
    fn tile_shares_rib_geometry() {
        let t = pattern();
        let tile = t.tile();
        // two ribs, two dip spheres, one pin sphere
        assert_eq!(tile.stats().primitives, 5);
        let bb = tile.bounding_box().unwrap();
        assert_relative_eq!(bb.min.x, 0.08, epsilon = 1e-12);
        assert_relative_eq!(bb.max.z, 1.67, epsilon = 1e-12);
    }

    #[test]
    fn stand_dimension_rounds_up_to_pattern() {
        let t = pattern();
        let pair = 2.0 * t.width();
        for d in [22.0, 62.0, 125.0] {
            let rounded = t.rounded_stand_dimension(d);
            assert!(rounded >= d - 1e-9);
            assert!(rounded - d < pair);
            let pairs = (rounded + t.seam()) / pair;
            assert_relative_eq!(pairs, pairs.round(), epsilon = 1e-9);
        }
        assert_relative_eq!(t.rounded_stand_dimension(62.0), 14.0 * 4.62 - 1.75, epsilon = 1e-9);
    }

    #[test]
    fn rejects_impossible_slopes() {
        let steep = TileParams {
            slope: 80.0,
            ..TileParams::default()
        };
        assert!(TilePattern::new(steep).is_err());
        let flat = TileParams {
            slope: 0.0,
            ..TileParams::default()
        };
        assert!(TilePattern::new(flat).is_err());
    }
}
