//! Translation from the persisted configuration to generation parameters.

use stratum_config::{BaseAltitudeConfig, Config, IndexingMode};
use stratum_terrain::sizing::square_octaves;
use stratum_terrain::{BaseAltitude, GenerationContext, MacroIndexing, MapParams, TerrainError};

fn base_altitude(config: BaseAltitudeConfig) -> BaseAltitude {
    match config {
        BaseAltitudeConfig::Fixed(value) => BaseAltitude::Fixed(value),
        BaseAltitudeConfig::Uniform { min, max } => BaseAltitude::Uniform { min, max },
    }
}

fn indexing(mode: IndexingMode) -> MacroIndexing {
    match mode {
        IndexingMode::Direct => MacroIndexing::Direct,
        IndexingMode::Bordered => MacroIndexing::Bordered,
    }
}

/// Map parameters with square octaves sharing one tile size.
pub fn map_params(config: &Config) -> Result<MapParams, TerrainError> {
    let generation = &config.generation;
    let grid_sizes: Vec<usize> = generation.octaves.iter().map(|o| o.grid_size).collect();
    let weights: Vec<f64> = generation.octaves.iter().map(|o| o.weight).collect();
    let octaves = square_octaves(&grid_sizes, &weights)?;

    let mut params = MapParams::new(generation.map_width, generation.map_height, octaves);
    params.tile_base = base_altitude(config.blending.tile_base_altitude);
    params.virtual_base = base_altitude(config.blending.virtual_base_altitude);
    params.indexing = indexing(config.blending.indexing);
    Ok(params)
}

/// Context seeded from the config, or from entropy when no seed is set.
pub fn generation_context(config: &Config) -> GenerationContext {
    config
        .generation
        .seed
        .map_or_else(GenerationContext::from_entropy, GenerationContext::new)
}
