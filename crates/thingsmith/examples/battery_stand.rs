//! Battery stands that snap together along their sides.
//!
//! Writes `stand-square-aa.scad`, `stand-square-aaa.scad` and
//! `stand-long-aaa.scad` into the directory given as the first argument
//! (default: current directory). An optional second argument names a TOML
//! file with `segments`/`overlap` settings.

use std::path::PathBuf;

use anyhow::Context;
use thingsmith::components::{TileParams, TilePattern};
use thingsmith::export::write_scene;
use thingsmith::{ModelConfig, Part, Scene};

const STAND_FLOOR_THICKNESS: f64 = 2.0;
const STAND_FLOOR_RATIO: f64 = 3.0 / 4.0;
const STAND_HEIGHT: f64 = 12.34;
const STAND_PATTERN_ROWS: usize = 2;

struct Stand<'a> {
    rows: usize,
    columns: usize,
    radius: f64,
    width: f64,
    height: f64,
    tiles: &'a TilePattern,
}

impl Stand<'_> {
    fn build(&self, name: &str, config: &ModelConfig) -> Part {
        let diameter = self.radius * 2.0;
        let gap_horizontal =
            (self.width - self.columns as f64 * diameter) / (self.columns + 1) as f64;
        let gap_vertical = (self.height - self.rows as f64 * diameter) / (self.rows + 1) as f64;
        let step_horizontal = gap_horizontal + diameter;
        let step_vertical = gap_vertical + diameter;

        let body = Part::cube(name, self.width, self.height, STAND_HEIGHT);

        // Battery well with a narrower through hole under it.
        let drill = Part::cylinder("well", self.radius, STAND_HEIGHT, 0)
            .translate(0.0, 0.0, STAND_FLOOR_THICKNESS)
            + Part::cylinder("vent", self.radius * STAND_FLOOR_RATIO, STAND_HEIGHT, 0);
        let drill = drill.translate(
            gap_horizontal + self.radius,
            gap_vertical + self.radius,
            -config.overlap(),
        );
        let wells: Vec<Part> = (0..self.rows)
            .flat_map(|row| (0..self.columns).map(move |column| (row, column)))
            .map(|(row, column)| {
                drill.translate(step_horizontal * column as f64, step_vertical * row as f64, 0.0)
            })
            .collect();
        let body = body.difference_all(&wells);

        let width = self.tiles.width();
        let columns_ew = ((self.height / width / 2.0).floor() * 2.0) as usize;
        let offset_ew = (self.height - columns_ew as f64 * width) / 2.0;
        let columns_ns = ((self.width / width / 2.0).floor() * 2.0) as usize;
        let offset_ns = (self.width - columns_ns as f64 * width) / 2.0;
        let lift = (STAND_HEIGHT - self.tiles.pattern_height(STAND_PATTERN_ROWS)) / 2.0;

        let pattern_ew = self.tiles.pattern(STAND_PATTERN_ROWS, columns_ew);
        let pattern_ns = self.tiles.pattern(STAND_PATTERN_ROWS, columns_ns);
        let sides = [
            pattern_ns.rotate(90.0, 0.0, 0.0).translate(offset_ns, 0.0, lift),
            pattern_ew.rotate(90.0, 0.0, 90.0).translate(self.width, offset_ew, lift),
            pattern_ns
                .rotate(90.0, 0.0, 180.0)
                .translate(self.width - offset_ns, self.height, lift),
            pattern_ew
                .rotate(90.0, 0.0, 270.0)
                .translate(0.0, self.height - offset_ew, lift),
        ];

        let mut stand = Part::union_all(name, std::iter::once(body).chain(sides));
        stand.name = name.to_string();
        stand
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let mut args = std::env::args().skip(1);
    let out_dir = PathBuf::from(args.next().unwrap_or_else(|| ".".to_string()));
    let config = match args.next() {
        Some(path) => ModelConfig::load(&path).with_context(|| format!("loading {path}"))?,
        None => ModelConfig::default(),
    };

    let tiles = TilePattern::new(TileParams::default())?;
    let square = tiles.rounded_stand_dimension(62.0);
    let long_width = tiles.rounded_stand_dimension(125.0);
    let long_height = tiles.rounded_stand_dimension(22.0);

    let stands = [
        ("stand-square-aa", 4, 4, 15.0 / 2.0, square, square),
        ("stand-square-aaa", 5, 5, 11.0 / 2.0, square, square),
        ("stand-long-aaa", 2, 10, 11.0 / 2.0, long_width, long_height),
    ];

    let mut scene = Scene::new("battery-stands");
    for (name, rows, columns, radius, width, height) in stands {
        let stand = Stand {
            rows,
            columns,
            radius,
            width,
            height,
            tiles: &tiles,
        };
        scene.add(stand.build(name, &config));
    }

    for path in write_scene(&scene, &out_dir, &config)? {
        println!("wrote {}", path.display());
    }
    Ok(())
}
