//! Seamless tileable heightmap synthesis: gradient vector fields, noise
//! layers, octave composition and macro-blended tile maps.

mod context;
mod error;
mod grid;
mod neighbors;
mod noise_layer;
mod tile;
mod tile_map;
mod vector_field;

pub mod serial;
pub mod sizing;

pub use context::{GenerationContext, TileSlot, derive_slot_seed};
pub use error::TerrainError;
pub use grid::Grid;
pub use neighbors::{Direction, Neighbors};
pub use noise_layer::{MAX_LAYER_SAMPLES, NoiseLayer, evaluate, interpolate, smoothstep};
pub use serial::{Persist, SerialError};
pub use tile::{
    BaseAltitude, DEFAULT_TILE_BASE_ALTITUDE, DEFAULT_VIRTUAL_BASE_ALTITUDE, OctaveParams,
    RealTile, Tile, VirtualTile,
};
pub use tile_map::{
    BorderedTile, MacroIndexing, MapParams, TileMap, interpolate_2d, ring_index, ring_len,
};
pub use vector_field::{SkippedGraft, UNIT_TOLERANCE, VectorField};
