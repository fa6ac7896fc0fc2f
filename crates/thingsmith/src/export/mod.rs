//! Writing models to disk as OpenSCAD programs.
//!
//! One `.scad` file per part; the renderer turns each into a mesh.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Component, Path, PathBuf};

use crate::{CadError, ModelConfig, Part, Scene};

/// Write one part as an OpenSCAD program to `path`.
pub fn write_part(
    part: &Part,
    path: impl AsRef<Path>,
    config: &ModelConfig,
) -> Result<(), CadError> {
    let path = path.as_ref();
    let file = File::create(path)?;
    write_part_to_writer(part, BufWriter::new(file), config)?;
    tracing::debug!(part = %part.name, path = %path.display(), "wrote OpenSCAD file");
    Ok(())
}

/// Write one part as an OpenSCAD program to any writer.
pub fn write_part_to_writer(
    part: &Part,
    mut writer: impl Write,
    config: &ModelConfig,
) -> Result<(), CadError> {
    let text = part.to_scad(config)?;
    writer.write_all(text.as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// A file name that stays inside the output directory.
fn check_file_name(name: &str) -> Result<(), CadError> {
    let mut components = Path::new(name).components();
    let plain = !name.contains(['/', '\\'])
        && matches!(components.next(), Some(Component::Normal(_)))
        && components.next().is_none();
    if plain {
        Ok(())
    } else {
        Err(CadError::InvalidParameter {
            name: "part name",
            reason: format!("{name:?} is not a plain file name"),
        })
    }
}

/// Write every part of a scene into `dir`, creating it if needed.
///
/// Returns the written paths in scene order. Nothing is written if any part
/// fails to render or has a name that is not a plain file name.
pub fn write_scene(
    scene: &Scene,
    dir: impl AsRef<Path>,
    config: &ModelConfig,
) -> Result<Vec<PathBuf>, CadError> {
    let dir = dir.as_ref();
    let files = scene.render(config)?;
    for (name, _) in &files {
        check_file_name(name)?;
    }
    fs::create_dir_all(dir)?;

    let mut written = Vec::with_capacity(files.len());
    for (name, text) in files {
        let path = dir.join(name);
        let mut writer = BufWriter::new(File::create(&path)?);
        writer.write_all(text.as_bytes())?;
        writer.flush()?;
        written.push(path);
    }
    tracing::info!(
        scene = %scene.name,
        files = written.len(),
        dir = %dir.display(),
        "scene written"
    );
    Ok(written)
}
