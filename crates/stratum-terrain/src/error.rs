//! Validation errors raised while building fields, layers, tiles and maps.

/// A violated construction invariant.
///
/// Every variant names the invariant and, where a list is involved, the
/// offending index. An error means no entity was produced.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TerrainError {
    /// Vector fields need at least two lattice points on each axis.
    #[error("vector field must be at least 2 x 2, got {width} x {height}")]
    FieldTooSmall {
        /// Requested width.
        width: usize,
        /// Requested height.
        height: usize,
    },

    /// The number of supplied vectors does not match `width * height`.
    #[error("expected {expected} vectors, got {actual}")]
    VectorCount {
        /// `width * height`.
        expected: usize,
        /// Number supplied.
        actual: usize,
    },

    /// A supplied vector is not unit length.
    #[error("vector at ({row}, {col}) has squared length {length_squared}, expected 1")]
    NonUnitVector {
        /// Row of the vector.
        row: usize,
        /// Column of the vector.
        col: usize,
        /// Its squared length.
        length_squared: f64,
    },

    /// Sampling density must be strictly greater than one.
    #[error("density must be > 1, got {0}")]
    InvalidDensity(usize),

    /// The materialized matrix would exceed the sample cap.
    #[error(
        "{grid_width} x {grid_height} field at density {density} exceeds {max} samples",
        max = crate::noise_layer::MAX_LAYER_SAMPLES
    )]
    LayerTooLarge {
        /// Field width in lattice points.
        grid_width: usize,
        /// Field height in lattice points.
        grid_height: usize,
        /// Requested density.
        density: usize,
    },

    /// A composition was requested with no layers.
    #[error("a tile needs at least one layer")]
    NoLayers,

    /// Parallel parameter lists differ in length.
    #[error("`{list}` has {actual} entries, expected {expected}")]
    LengthMismatch {
        /// Name of the list that disagrees with the first one.
        list: &'static str,
        /// Length of the reference list.
        expected: usize,
        /// Length of the offending list.
        actual: usize,
    },

    /// A weight is NaN or infinite.
    #[error("weight {value} at index {index} is not finite")]
    NonFiniteWeight {
        /// Index into the weight list.
        index: usize,
        /// The weight.
        value: f64,
    },

    /// Weights sum to zero, so the weighted average is undefined.
    #[error("layer weights sum to 0")]
    ZeroWeightSum,

    /// A layer's dimensions differ from the first layer's.
    #[error("layer {index} is {actual:?} (width, height), expected {expected:?}")]
    LayerDimensionMismatch {
        /// Index of the offending layer.
        index: usize,
        /// Dimensions of the first layer.
        expected: (usize, usize),
        /// Dimensions of this layer.
        actual: (usize, usize),
    },

    /// An octave's `(grid - 1) * density` differs from the first octave's.
    #[error("octave {index} yields a {actual:?} tile, expected {expected:?}")]
    OctaveSizeMismatch {
        /// Index of the offending octave.
        index: usize,
        /// Tile size of the first octave.
        expected: (usize, usize),
        /// Tile size of this octave.
        actual: (usize, usize),
    },

    /// Map dimensions must both be at least one tile.
    #[error("map must be at least 1 x 1 tiles, got {width} x {height}")]
    EmptyMap {
        /// Requested map width in tiles.
        width: usize,
        /// Requested map height in tiles.
        height: usize,
    },

    /// The number of tiles does not match `map_width * map_height`.
    #[error("expected {expected} tiles, got {actual}")]
    TileCount {
        /// `map_width * map_height`.
        expected: usize,
        /// Number supplied.
        actual: usize,
    },

    /// The virtual ring has the wrong length.
    #[error("expected {expected} virtual tiles, got {actual}")]
    VirtualTileCount {
        /// `2 * (map_width + 2) + 2 * (map_height + 2) - 4`.
        expected: usize,
        /// Number supplied.
        actual: usize,
    },

    /// A tile's dimensions differ from the map's common tile size.
    #[error("tile {index} is {actual:?} (width, height), expected {expected:?}")]
    TileDimensionMismatch {
        /// Row-major index of the tile (virtual tiles are offset past the real ones).
        index: usize,
        /// The common tile size.
        expected: (usize, usize),
        /// This tile's size.
        actual: (usize, usize),
    },

    /// Sizing helpers only accept strictly positive integers.
    #[error("grid size at index {index} must be > 0")]
    ZeroGridSize {
        /// Index of the zero entry.
        index: usize,
    },
}
