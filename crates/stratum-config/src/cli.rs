//! Command-line argument parsing for the `stratum` binary.

use std::path::PathBuf;

use clap::Parser;

use crate::{Config, IndexingMode};

/// Seamless tileable heightmap synthesizer.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "stratum", about = "Seamless tileable heightmap synthesizer")]
pub struct CliArgs {
    /// Map seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Map width in tiles.
    #[arg(long)]
    pub map_width: Option<usize>,

    /// Map height in tiles.
    #[arg(long)]
    pub map_height: Option<usize>,

    /// Sea level used by the color map.
    #[arg(long, allow_hyphen_values = true)]
    pub sea_level: Option<f64>,

    /// Macro-field indexing.
    #[arg(long, value_enum)]
    pub indexing: Option<IndexingMode>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Output directory.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Load a map archive instead of generating one.
    #[arg(long)]
    pub load: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(seed) = args.seed {
            self.generation.seed = Some(seed);
        }
        if let Some(w) = args.map_width {
            self.generation.map_width = w;
        }
        if let Some(h) = args.map_height {
            self.generation.map_height = h;
        }
        if let Some(level) = args.sea_level {
            self.render.sea_level = level;
        }
        if let Some(indexing) = args.indexing {
            self.blending.indexing = indexing;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
        if let Some(ref dir) = args.output {
            self.output.directory = dir.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            seed: Some(7),
            map_width: Some(6),
            indexing: Some(IndexingMode::Bordered),
            ..CliArgs::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.generation.seed, Some(7));
        assert_eq!(config.generation.map_width, 6);
        assert_eq!(config.blending.indexing, IndexingMode::Bordered);
        // Non-overridden fields retain defaults
        assert_eq!(config.generation.map_height, 4);
        assert_eq!(config.render.sea_level, -0.3);
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_parse_flags() {
        let args = CliArgs::parse_from([
            "stratum",
            "--seed",
            "12",
            "--sea-level",
            "-0.5",
            "--indexing",
            "bordered",
            "--load",
            "map.strm",
        ]);
        assert_eq!(args.seed, Some(12));
        assert_eq!(args.sea_level, Some(-0.5));
        assert_eq!(args.indexing, Some(IndexingMode::Bordered));
        assert_eq!(args.load, Some(PathBuf::from("map.strm")));
    }
}
