//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level synthesizer configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Map size, seed and octaves.
    pub generation: GenerationConfig,
    /// Macro-altitude blending.
    pub blending: BlendingConfig,
    /// Color mapping.
    pub render: RenderConfig,
    /// Output files.
    pub output: OutputConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// One octave: a square lattice of `grid_size` cells per tile side.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct OctaveConfig {
    pub grid_size: usize,
    pub weight: f64,
}

/// Map generation parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GenerationConfig {
    /// Map seed. A random seed is drawn when absent.
    pub seed: Option<u64>,
    /// Map width in tiles.
    pub map_width: usize,
    /// Map height in tiles.
    pub map_height: usize,
    /// Octaves, coarsest first. Densities are derived so all octaves share one tile size.
    pub octaves: Vec<OctaveConfig>,
}

/// Which macro-field layout the blend uses.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
pub enum IndexingMode {
    /// Reference layout.
    #[default]
    Direct,
    /// Every tile feeds the macro field and corners follow the pixel axes.
    Bordered,
}

/// Base altitude policy for a kind of tile.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum BaseAltitudeConfig {
    Fixed(f64),
    Uniform { min: f64, max: f64 },
}

/// Macro-altitude blending configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BlendingConfig {
    pub indexing: IndexingMode,
    /// Base altitude of ordinary tiles.
    pub tile_base_altitude: BaseAltitudeConfig,
    /// Base altitude of virtual border tiles.
    pub virtual_base_altitude: BaseAltitudeConfig,
}

/// Color mapping configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Altitudes at or below this are drawn as water.
    pub sea_level: f64,
    /// Paint cells with an altitude of exactly zero red.
    pub mark_zero: bool,
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving every output file.
    pub directory: PathBuf,
    /// Write `map.strm`.
    pub write_archive: bool,
    /// Write `map.txt` and `sea_map.txt`.
    pub write_text: bool,
    /// Write `map.png`.
    pub write_png: bool,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            seed: None,
            map_width: 4,
            map_height: 4,
            octaves: vec![
                OctaveConfig {
                    grid_size: 3,
                    weight: 1.0,
                },
                OctaveConfig {
                    grid_size: 5,
                    weight: 0.1,
                },
                OctaveConfig {
                    grid_size: 9,
                    weight: 0.01,
                },
            ],
        }
    }
}

impl Default for BlendingConfig {
    fn default() -> Self {
        Self {
            indexing: IndexingMode::Direct,
            tile_base_altitude: BaseAltitudeConfig::Fixed(0.0),
            virtual_base_altitude: BaseAltitudeConfig::Fixed(0.5),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            sea_level: -0.3,
            mark_zero: true,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("output"),
            write_archive: true,
            write_text: false,
            write_png: true,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Default configuration directory, `<platform config dir>/stratum`.
    pub fn default_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("stratum")
    }

    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let config = read_config(&config_path)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        let config_path = config_dir.join("config.ron");
        let write_error = |source| ConfigError::Write {
            path: config_path.clone(),
            source,
        };
        std::fs::create_dir_all(config_dir).map_err(write_error)?;

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(4)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::Serialize)?;

        std::fs::write(&config_path, serialized).map_err(write_error)?;
        Ok(())
    }

    /// Returns `Some(new_config)` if the file on disk differs from `self`, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let new_config = read_config(&config_dir.join("config.ron"))?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}

fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    ron::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
