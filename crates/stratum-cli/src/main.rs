//! `stratum`: generate or load a seamless heightmap and write it out.

mod colormap;
mod error;
mod export;
mod params;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use stratum_config::{CliArgs, Config};
use stratum_terrain::TileMap;
use stratum_terrain::serial::{read_archive, write_archive};
use tracing::{error, info, warn};

use crate::error::CliError;

const ARCHIVE_FILE: &str = "map.strm";
const TEXT_FILE: &str = "map.txt";
const SEA_TEXT_FILE: &str = "sea_map.txt";
const PNG_FILE: &str = "map.png";

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let config_dir = args.config.clone().unwrap_or_else(Config::default_dir);

    // Load or create config, then apply CLI overrides
    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    stratum_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    match run(&args, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "stratum failed");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &CliArgs, config: &Config) -> Result<(), CliError> {
    let start = Instant::now();

    let map = match &args.load {
        Some(path) => load_map(path)?,
        None => generate_map(config)?,
    };

    let written = write_outputs(&map, config)?;
    let (min, max) = map.altitude().min_max().unwrap_or((0.0, 0.0));
    let (width, height) = map.altitude().dimensions();
    info!(
        map_width = map.map_width(),
        map_height = map.map_height(),
        tile_width = map.tile_width(),
        tile_height = map.tile_height(),
        width,
        height,
        min,
        max,
        files = written.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "done"
    );
    Ok(())
}

fn load_map(path: &Path) -> Result<TileMap, CliError> {
    let bytes = std::fs::read(path).map_err(CliError::io("read", path))?;
    let map = read_archive(&bytes)?;
    info!(path = %path.display(), "loaded map archive");
    Ok(map)
}

fn generate_map(config: &Config) -> Result<TileMap, CliError> {
    let params = params::map_params(config)?;
    let ctx = params::generation_context(config);
    info!(seed = ctx.seed(), "generating map");
    let (map, skipped) = TileMap::generate(&params, &ctx)?;
    for (slot, graft) in &skipped {
        warn!(
            ?slot,
            direction = %graft.direction,
            expected = graft.expected,
            actual = graft.actual,
            "neighbor graft skipped"
        );
    }
    Ok(map)
}

/// Write every enabled output into the configured directory.
fn write_outputs(map: &TileMap, config: &Config) -> Result<Vec<PathBuf>, CliError> {
    let dir = &config.output.directory;
    std::fs::create_dir_all(dir).map_err(CliError::io("create", dir))?;
    let sea_level = config.render.sea_level;
    let mut written = Vec::new();

    if config.output.write_archive {
        let path = dir.join(ARCHIVE_FILE);
        let bytes = write_archive(map)?;
        std::fs::write(&path, bytes).map_err(CliError::io("write", &path))?;
        written.push(path);
    }

    if config.output.write_text {
        let path = dir.join(TEXT_FILE);
        write_text(&path, |out| export::write_map(out, map))?;
        written.push(path);

        let path = dir.join(SEA_TEXT_FILE);
        let sea = colormap::sea_values(map.altitude(), sea_level);
        write_text(&path, |out| export::write_sea_map(out, map, sea_level, &sea))?;
        written.push(path);
    }

    if config.output.write_png {
        let path = dir.join(PNG_FILE);
        colormap::color_map(map.altitude(), sea_level, config.render.mark_zero).save(&path)?;
        written.push(path);
    }

    for path in &written {
        info!(path = %path.display(), "wrote output");
    }
    Ok(written)
}

fn write_text(
    path: &Path,
    body: impl FnOnce(&mut BufWriter<File>) -> std::io::Result<()>,
) -> Result<(), CliError> {
    let file = File::create(path).map_err(CliError::io("create", path))?;
    let mut out = BufWriter::new(file);
    body(&mut out)
        .and_then(|()| out.flush())
        .map_err(CliError::io("write", path))
}
