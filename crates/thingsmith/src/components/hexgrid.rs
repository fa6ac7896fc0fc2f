//! Hexagonal grid tiling.
//!
//! Cells are pointy-top hexagons (a 6-segment cylinder turned by 30°), laid
//! out in interleaved rows: even rows hold `cols` cells, odd rows hold
//! `cols - 1` cells shifted by half a column. The first cell's bounding box
//! touches the origin and the grid grows towards +X and +Y.

use nalgebra::Point2;
use thingsmith_math::{Size, X, Y, Z};

use crate::{ensure_non_negative, ensure_positive, CadError, Part};

/// `cos(30°)`, the apothem of a unit hexagon.
pub const COS_30: f64 = 0.866_025_403_784_438_6;

/// How [`HexGrid::fit`] sizes a grid for a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridFit {
    /// Every cell lies inside the rectangle.
    Inside,
    /// The grid overfills the rectangle on all sides, to be clipped.
    Bleed,
}

/// Hexagon radius and gap between neighbouring cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HexGrid {
    radius: f64,
    gap: f64,
}

impl HexGrid {
    /// Validated grid parameters; `radius` is the circumradius of a cell.
    pub fn new(radius: f64, gap: f64) -> Result<Self, CadError> {
        ensure_positive("hexagon radius", radius)?;
        ensure_non_negative("hexagon gap", gap)?;
        Ok(Self { radius, gap })
    }

    /// Circumradius of a cell.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Edge-to-edge distance between neighbouring cells.
    pub fn gap(&self) -> f64 {
        self.gap
    }

    /// Center-to-flat distance of a cell.
    pub fn apothem(&self) -> f64 {
        self.radius * COS_30
    }

    /// Pitch between adjacent (interleaved) rows.
    pub fn spacing_vertical(&self) -> f64 {
        (3.0 * self.radius + 2.0 * self.gap * COS_30) / 2.0
    }

    /// Pitch between neighbours in one row.
    pub fn spacing_horizontal(&self) -> f64 {
        2.0 * self.radius * COS_30 + self.gap
    }

    /// One cell centered at the origin.
    pub fn hexagon(&self, thickness: f64) -> Part {
        Part::cylinder("hexagon", self.radius, thickness, 6).rotate(0.0, 0.0, 30.0)
    }

    /// A hexagonal ring of width `rim` around a cell-sized hole.
    pub fn framed_hexagon(&self, rim: f64, thickness: f64, overlap: f64) -> Part {
        let outer = Part::cylinder("hexagon-frame", self.radius + rim / COS_30, thickness, 6);
        let inner = Part::cylinder("hexagon-hole", self.radius, thickness + 2.0 * overlap, 6)
            .translate(0.0, 0.0, -overlap);
        (outer - inner).rotate(0.0, 0.0, 30.0)
    }

    /// Cell centers in row order.
    ///
    /// Odd rows hold one cell less than even rows, so with a single column
    /// only the even rows carry cells.
    pub fn centers(&self, rows: usize, cols: usize) -> Vec<Point2<f64>> {
        let (sv, sh) = (self.spacing_vertical(), self.spacing_horizontal());
        let mut centers = Vec::new();
        for row in 0..rows {
            let y = self.radius + row as f64 * sv;
            let (count, shift) = if row % 2 == 0 {
                (cols, 0.0)
            } else {
                (cols.saturating_sub(1), sh / 2.0)
            };
            centers.extend(
                (0..count).map(|col| Point2::new(self.apothem() + shift + col as f64 * sh, y)),
            );
        }
        centers
    }

    fn layout(&self, rows: usize, cols: usize, cell: Part, name: &str) -> Part {
        let (sv, sh) = (self.spacing_vertical(), self.spacing_horizontal());
        let longer = Part::union_all(
            "hex-row",
            (0..cols).map(|col| cell.translate(col as f64 * sh, 0.0, 0.0)),
        );
        let shorter = Part::union_all(
            "hex-row",
            (0..cols.saturating_sub(1))
                .map(|col| cell.translate(col as f64 * sh + sh / 2.0, 0.0, 0.0)),
        );

        let longer_rows =
            (0..rows.div_ceil(2)).map(|k| longer.translate(0.0, 2.0 * k as f64 * sv, 0.0));
        let shorter_rows =
            (0..rows / 2).map(|k| shorter.translate(0.0, (2 * k + 1) as f64 * sv, 0.0));

        tracing::trace!(rows, cols, "laid out hexagon grid");
        Part::union_all(name, longer_rows.chain(shorter_rows))
    }

    /// Union of cells at [`HexGrid::centers`].
    pub fn grid(&self, rows: usize, cols: usize, thickness: f64) -> Part {
        let cell = self
            .hexagon(thickness)
            .translate(self.apothem(), self.radius, 0.0);
        self.layout(rows, cols, cell, "hexgrid")
    }

    /// Union of framed cells; the first frame's outer box touches the origin.
    ///
    /// With `gap == rim` neighbouring frames share their walls.
    pub fn framed_grid(
        &self,
        rows: usize,
        cols: usize,
        rim: f64,
        thickness: f64,
        overlap: f64,
    ) -> Part {
        let cell = self
            .framed_hexagon(rim, thickness, overlap)
            .translate(rim + self.apothem(), rim / COS_30 + self.radius, 0.0);
        self.layout(rows, cols, cell, "hexgrid-framed")
    }

    /// Rows and columns for a `width` x `height` rectangle.
    ///
    /// With [`GridFit::Inside`] both are 0 when not even one cell fits.
    pub fn fit(&self, width: f64, height: f64, fit: GridFit) -> (usize, usize) {
        let (sv, sh) = (self.spacing_vertical(), self.spacing_horizontal());
        match fit {
            GridFit::Inside => {
                let cols = (width / sh).floor().max(0.0) as usize;
                let rows = if height < 2.0 * self.radius {
                    0
                } else {
                    ((height - 2.0 * self.radius) / sv).floor() as usize + 1
                };
                match (rows, cols) {
                    (0, _) | (_, 0) => (0, 0),
                    // Odd rows of a single column are empty and would leave
                    // a gap wider than `gap` between the stacked cells.
                    (_, 1) => (1, 1),
                    _ => (rows, cols),
                }
            }
            GridFit::Bleed => {
                let cols = (width / sh).floor().max(0.0) as usize + 2;
                let rows = (height / sv).floor().max(0.0) as usize + 1;
                (rows, cols)
            }
        }
    }

    /// Width and height covered by a grid's cells.
    pub fn extent(&self, rows: usize, cols: usize) -> (f64, f64) {
        if rows == 0 || cols == 0 {
            return (0.0, 0.0);
        }
        // Last row that holds a cell.
        let last = if cols == 1 { (rows - 1) & !1 } else { rows - 1 };
        (
            (cols - 1) as f64 * self.spacing_horizontal() + 2.0 * self.apothem(),
            last as f64 * self.spacing_vertical() + 2.0 * self.radius,
        )
    }

    /// The cutting grid used by [`HexGrid::pierced_panel`]: a bleed grid
    /// centered on a `size` slab and `overlap` taller on both faces.
    pub fn panel_piercing(&self, size: &Size, overlap: f64) -> Part {
        let (rows, cols) = self.fit(size[X], size[Y], GridFit::Bleed);
        let (width, height) = self.extent(rows, cols);
        self.grid(rows, cols, size[Z] + 2.0 * overlap).translate(
            (size[X] - width) / 2.0,
            (size[Y] - height) / 2.0,
            -overlap,
        )
    }

    /// A `size` slab in XY pierced by hexagons, keeping a solid edge of
    /// width `rim` all around.
    pub fn pierced_panel(&self, size: &Size, rim: f64, overlap: f64) -> Result<Part, CadError> {
        ensure_positive("panel width", size[X])?;
        ensure_positive("panel depth", size[Y])?;
        ensure_positive("panel thickness", size[Z])?;
        ensure_non_negative("panel rim", rim)?;
        ensure_positive("overlap", overlap)?;
        if 2.0 * rim >= size[X].min(size[Y]) {
            return Err(CadError::InvalidParameter {
                name: "panel rim",
                reason: format!("rim {rim} leaves no room inside {} x {}", size[X], size[Y]),
            });
        }

        let body = Part::cube("panel", size[X], size[Y], size[Z]);
        let window = Part::cube(
            "panel-window",
            size[X] - 2.0 * rim,
            size[Y] - 2.0 * rim,
            size[Z] + 2.0 * overlap,
        )
        .translate(rim, rim, -overlap);

        let pierced = &body - &self.panel_piercing(size, overlap);
        let frame = &body - &window;
        let mut panel = pierced + frame;
        panel.name = "pierced-panel".to_string();
        Ok(panel)
    }

    /// [`HexGrid::pierced_panel`] standing upright: `size` is width (X),
    /// thickness (Y) and height (Z), with the back face at `y = 0`.
    pub fn pierced_wall(&self, size: &Size, rim: f64, overlap: f64) -> Result<Part, CadError> {
        let panel = self.pierced_panel(&Size::new(size[X], size[Z], size[Y]), rim, overlap)?;
        Ok(panel.rotate(90.0, 0.0, 0.0).translate(0.0, size[Y], 0.0))
    }
}
