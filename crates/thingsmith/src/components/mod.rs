//! Reusable model components.
//!
//! Higher-level shapes shared between models: hexagonal grids, pins,
//! interlocking tiles and a handful of box helpers.

pub mod hexgrid;
pub mod pin;
pub mod shapes;
pub mod tiles;

pub use hexgrid::{GridFit, HexGrid};
pub use pin::Pin;
pub use shapes::{
    centered_cylinder, cylinder_along, hollow_box, rounded_box, spacers, thorn, Axis,
};
pub use tiles::{TileParams, TilePattern};
