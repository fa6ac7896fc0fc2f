//! Honeycomb sheet holder with a bent clip, plus a tapered pin.
//!
//! Shows the hexagon panel, the segmented bend and the axial taper. Output
//! goes to the directory given as the first argument (default: current
//! directory).

use std::path::PathBuf;

use thingsmith::components::{rounded_box, HexGrid, Pin};
use thingsmith::export::write_scene;
use thingsmith::math::Size;
use thingsmith::transform::{AxialScale, Bend, BendCompensation};
use thingsmith::{ModelConfig, Part, Scene};

const HEX_RADIUS: f64 = 6.0;
const HEX_GAP: f64 = 1.67;
const HEX_RIM: f64 = 1.67;

const BACK_WIDTH: f64 = 120.0;
const BACK_HEIGHT: f64 = 90.0;
const BACK_THICKNESS: f64 = 3.0;

const CLIP_LENGTH: f64 = 40.0;
const CLIP_WIDTH: f64 = 20.0;
const CLIP_THICKNESS: f64 = 2.0;
const CLIP_RADIUS: f64 = 15.0;
const CLIP_SEGMENTS: u32 = 24;

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let out_dir = PathBuf::from(std::env::args().nth(1).unwrap_or_else(|| ".".to_string()));
    let config = ModelConfig::new(66, thingsmith::math::OVERLAP)?;

    let hex = HexGrid::new(HEX_RADIUS, HEX_GAP)?;
    let back = hex.pierced_wall(
        &Size::new(BACK_WIDTH, BACK_THICKNESS, BACK_HEIGHT),
        HEX_RIM,
        config.overlap(),
    )?;

    // A flat strip bent into a hook over the top edge.
    let strip = rounded_box(&Size::new(CLIP_LENGTH, CLIP_WIDTH, CLIP_THICKNESS), 1.0)?;
    let clip = Bend::new(
        Size::new(CLIP_LENGTH, CLIP_WIDTH, CLIP_THICKNESS),
        CLIP_RADIUS,
        CLIP_SEGMENTS,
    )?
    .with_compensation(BendCompensation::Stretch)
    .apply(&strip);
    let clip = clip
        .rotate(90.0, 0.0, 90.0)
        .translate(BACK_WIDTH / 2.0, -CLIP_RADIUS, BACK_HEIGHT);

    let mut holder = back + clip;
    holder.name = "sheet-holder".to_string();

    let mut mirrored = holder.mirror_x();
    mirrored.name = "sheet-holder-mirrored".to_string();

    let pin = Pin::new(4.0, 1.67, 12.0)?.taper_up(true).build();
    let mut flared = AxialScale::new(Size::new(10.0, 10.0, 0.5), 12.0, 0.6)?.apply(&pin);
    flared.name = "pin-tapered".to_string();

    let mut scene = Scene::new("sheet-holder");
    scene.add(holder);
    scene.add(mirrored);
    scene.add(flared);

    for part in &scene.parts {
        let stats = part.stats();
        tracing::info!(part = %part.name, nodes = stats.nodes(), depth = stats.depth, "built");
    }
    for path in write_scene(&scene, &out_dir, &config)? {
        println!("wrote {}", path.display());
    }
    Ok(())
}
