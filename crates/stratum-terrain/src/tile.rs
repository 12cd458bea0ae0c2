//! Tiles: weighted octave compositions and border-only ghost tiles.

use rand::Rng;

use crate::context::GenerationContext;
use crate::error::TerrainError;
use crate::grid::Grid;
use crate::neighbors::Neighbors;
use crate::noise_layer::NoiseLayer;
use crate::vector_field::SkippedGraft;

/// Base altitude of an ordinary tile unless configured otherwise.
pub const DEFAULT_TILE_BASE_ALTITUDE: f64 = 0.0;

/// Base altitude of a virtual border tile unless configured otherwise.
pub const DEFAULT_VIRTUAL_BASE_ALTITUDE: f64 = 0.5;

/// How a tile's macro scalar is chosen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BaseAltitude {
    /// Always the given value.
    Fixed(f64),
    /// Uniform in `[min, max)`, drawn from the generation context.
    Uniform { min: f64, max: f64 },
}

impl BaseAltitude {
    /// Produce a value. An empty uniform range yields `min`.
    pub fn sample(&self, ctx: &mut GenerationContext) -> f64 {
        match *self {
            BaseAltitude::Fixed(value) => value,
            BaseAltitude::Uniform { min, max } if min < max => ctx.rng().random_range(min..max),
            BaseAltitude::Uniform { min, .. } => min,
        }
    }
}

impl Default for BaseAltitude {
    fn default() -> Self {
        BaseAltitude::Fixed(DEFAULT_TILE_BASE_ALTITUDE)
    }
}

/// Parameters of one octave: lattice size, sampling density and weight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OctaveParams {
    pub grid_width: usize,
    pub grid_height: usize,
    pub density: usize,
    pub weight: f64,
}

impl OctaveParams {
    /// Zip four parallel lists into octave records.
    pub fn zip(
        grid_widths: &[usize],
        grid_heights: &[usize],
        densities: &[usize],
        weights: &[f64],
    ) -> Result<Vec<OctaveParams>, TerrainError> {
        let expected = grid_widths.len();
        for (list, actual) in [
            ("grid_heights", grid_heights.len()),
            ("densities", densities.len()),
            ("weights", weights.len()),
        ] {
            if actual != expected {
                return Err(TerrainError::LengthMismatch {
                    list,
                    expected,
                    actual,
                });
            }
        }
        Ok((0..expected)
            .map(|k| OctaveParams {
                grid_width: grid_widths[k],
                grid_height: grid_heights[k],
                density: densities[k],
                weight: weights[k],
            })
            .collect())
    }

    /// `(width, height)` in samples of the layer this octave produces.
    pub fn tile_size(&self) -> (usize, usize) {
        (
            self.grid_width.saturating_sub(1) * self.density,
            self.grid_height.saturating_sub(1) * self.density,
        )
    }

    /// Check that every octave is well formed and yields the same tile size.
    /// Returns that size.
    pub fn validate(octaves: &[OctaveParams]) -> Result<(usize, usize), TerrainError> {
        let first = octaves.first().ok_or(TerrainError::NoLayers)?;
        let expected = first.tile_size();
        for (index, octave) in octaves.iter().enumerate() {
            if octave.grid_width < 2 || octave.grid_height < 2 {
                return Err(TerrainError::FieldTooSmall {
                    width: octave.grid_width,
                    height: octave.grid_height,
                });
            }
            if octave.density <= 1 {
                return Err(TerrainError::InvalidDensity(octave.density));
            }
            let actual = octave.tile_size();
            if actual != expected {
                return Err(TerrainError::OctaveSizeMismatch {
                    index,
                    expected,
                    actual,
                });
            }
        }
        let weights: Vec<f64> = octaves.iter().map(|o| o.weight).collect();
        check_weights(&weights)?;
        Ok(expected)
    }
}

/// A tile composed from one or more weighted noise layers.
#[derive(Clone, Debug, PartialEq)]
pub struct RealTile {
    layers: Vec<NoiseLayer>,
    weights: Vec<f64>,
    altitude: Grid<f64>,
    base_altitude: f64,
}

impl RealTile {
    /// Weighted average of `layers`. The base altitude starts at 0.
    pub fn compose(layers: Vec<NoiseLayer>, weights: Vec<f64>) -> Result<Self, TerrainError> {
        if layers.is_empty() {
            return Err(TerrainError::NoLayers);
        }
        if weights.len() != layers.len() {
            return Err(TerrainError::LengthMismatch {
                list: "weights",
                expected: layers.len(),
                actual: weights.len(),
            });
        }
        let total = check_weights(&weights)?;

        let expected = layers[0].altitude().dimensions();
        for (index, layer) in layers.iter().enumerate() {
            let actual = layer.altitude().dimensions();
            if actual != expected {
                return Err(TerrainError::LayerDimensionMismatch {
                    index,
                    expected,
                    actual,
                });
            }
        }

        let (width, height) = expected;
        let mut altitude = Grid::filled(width, height, 0.0);
        for (layer, &weight) in layers.iter().zip(&weights) {
            for (out, &value) in altitude.cells_mut().iter_mut().zip(layer.altitude().cells()) {
                *out += weight * value;
            }
        }
        for value in altitude.cells_mut() {
            *value /= total;
        }

        Ok(Self {
            layers,
            weights,
            altitude,
            base_altitude: DEFAULT_TILE_BASE_ALTITUDE,
        })
    }

    /// Generate one layer per octave, each grafted onto the same-index layer
    /// of the neighboring tiles, then compose them.
    pub fn generate(
        octaves: &[OctaveParams],
        neighbors: Neighbors<&RealTile>,
        base_altitude: BaseAltitude,
        ctx: &mut GenerationContext,
    ) -> Result<(Self, Vec<SkippedGraft>), TerrainError> {
        OctaveParams::validate(octaves)?;

        let mut layers = Vec::with_capacity(octaves.len());
        let mut skipped = Vec::new();
        for (index, octave) in octaves.iter().enumerate() {
            let sources = neighbors.filter_map(|tile| tile.layers.get(index));
            let (layer, missed) = NoiseLayer::generate(
                octave.grid_width,
                octave.grid_height,
                octave.density,
                sources,
                ctx,
            )?;
            layers.push(layer);
            skipped.extend(missed);
        }

        let weights = octaves.iter().map(|o| o.weight).collect();
        let base = base_altitude.sample(ctx);
        let tile = Self::compose(layers, weights)?.with_base_altitude(base);
        Ok((tile, skipped))
    }

    /// Replace the base altitude.
    pub fn with_base_altitude(mut self, base_altitude: f64) -> Self {
        self.base_altitude = base_altitude;
        self
    }

    pub fn layers(&self) -> &[NoiseLayer] {
        &self.layers
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// The composed altitude matrix.
    pub fn altitude(&self) -> &Grid<f64> {
        &self.altitude
    }

    pub fn base_altitude(&self) -> f64 {
        self.base_altitude
    }

    pub fn width(&self) -> usize {
        self.altitude.width()
    }

    pub fn height(&self) -> usize {
        self.altitude.height()
    }
}

/// A border placeholder carrying only a macro altitude.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VirtualTile {
    pub width: usize,
    pub height: usize,
    pub base_altitude: f64,
}

impl VirtualTile {
    pub fn new(width: usize, height: usize, base_altitude: f64) -> Self {
        Self {
            width,
            height,
            base_altitude,
        }
    }
}

/// Either kind of tile.
#[derive(Clone, Debug, PartialEq)]
pub enum Tile {
    Real(RealTile),
    Virtual(VirtualTile),
}

impl Tile {
    pub fn width(&self) -> usize {
        match self {
            Tile::Real(tile) => tile.width(),
            Tile::Virtual(tile) => tile.width,
        }
    }

    pub fn height(&self) -> usize {
        match self {
            Tile::Real(tile) => tile.height(),
            Tile::Virtual(tile) => tile.height,
        }
    }

    pub fn base_altitude(&self) -> f64 {
        match self {
            Tile::Real(tile) => tile.base_altitude(),
            Tile::Virtual(tile) => tile.base_altitude,
        }
    }

    /// Composed altitude, `None` for virtual tiles.
    pub fn altitude(&self) -> Option<&Grid<f64>> {
        match self {
            Tile::Real(tile) => Some(tile.altitude()),
            Tile::Virtual(_) => None,
        }
    }
}

impl From<RealTile> for Tile {
    fn from(tile: RealTile) -> Self {
        Tile::Real(tile)
    }
}

impl From<VirtualTile> for Tile {
    fn from(tile: VirtualTile) -> Self {
        Tile::Virtual(tile)
    }
}

/// Validate weights and return their sum.
fn check_weights(weights: &[f64]) -> Result<f64, TerrainError> {
    for (index, &value) in weights.iter().enumerate() {
        if !value.is_finite() {
            return Err(TerrainError::NonFiniteWeight { index, value });
        }
    }
    let total: f64 = weights.iter().sum();
    if total == 0.0 {
        return Err(TerrainError::ZeroWeightSum);
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer(gw: usize, gh: usize, density: usize, seed: u64) -> NoiseLayer {
        let mut ctx = GenerationContext::new(seed);
        NoiseLayer::generate(gw, gh, density, Neighbors::none(), &mut ctx)
            .unwrap()
            .0
    }

    fn octaves() -> Vec<OctaveParams> {
        OctaveParams::zip(&[3, 5], &[3, 5], &[8, 4], &[1.0, 0.1]).unwrap()
    }

    #[test]
    fn test_weights_one_zero_equals_first_layer() {
        let a = layer(3, 3, 8, 1);
        let b = layer(5, 5, 4, 2);
        let tile = RealTile::compose(vec![a.clone(), b], vec![1.0, 0.0]).unwrap();
        assert_eq!(tile.altitude(), a.altitude(), "weights [1, 0] must reproduce layer A");
    }

    #[test]
    fn test_compose_is_weighted_average() {
        let a = layer(3, 3, 4, 1);
        let b = layer(3, 3, 4, 2);
        let tile = RealTile::compose(vec![a.clone(), b.clone()], vec![3.0, 1.0]).unwrap();
        for ((&t, &x), &y) in tile
            .altitude()
            .cells()
            .iter()
            .zip(a.altitude().cells())
            .zip(b.altitude().cells())
        {
            assert!((t - (3.0 * x + y) / 4.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_compose_validation_errors() {
        let a = layer(3, 3, 4, 1);
        let small = layer(3, 3, 2, 2);
        assert_eq!(
            RealTile::compose(vec![], vec![]).unwrap_err(),
            TerrainError::NoLayers
        );
        assert_eq!(
            RealTile::compose(vec![a.clone()], vec![1.0, 2.0]).unwrap_err(),
            TerrainError::LengthMismatch {
                list: "weights",
                expected: 1,
                actual: 2
            }
        );
        assert_eq!(
            RealTile::compose(vec![a.clone(), a.clone()], vec![1.0, -1.0]).unwrap_err(),
            TerrainError::ZeroWeightSum
        );
        assert!(matches!(
            RealTile::compose(vec![a.clone()], vec![f64::NAN]),
            Err(TerrainError::NonFiniteWeight { index: 0, .. })
        ));
        assert_eq!(
            RealTile::compose(vec![a, small], vec![1.0, 1.0]).unwrap_err(),
            TerrainError::LayerDimensionMismatch {
                index: 1,
                expected: (8, 8),
                actual: (4, 4)
            }
        );
    }

    #[test]
    fn test_zip_rejects_mismatched_lengths() {
        let err = OctaveParams::zip(&[3, 5], &[3, 5], &[8], &[1.0, 0.1]).unwrap_err();
        assert_eq!(
            err,
            TerrainError::LengthMismatch {
                list: "densities",
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn test_validate_octave_sizes() {
        assert_eq!(OctaveParams::validate(&octaves()), Ok((16, 16)));
        let bad = OctaveParams::zip(&[3, 5], &[3, 5], &[8, 3], &[1.0, 0.1]).unwrap();
        assert_eq!(
            OctaveParams::validate(&bad),
            Err(TerrainError::OctaveSizeMismatch {
                index: 1,
                expected: (16, 16),
                actual: (12, 12)
            })
        );
    }

    #[test]
    fn test_generate_grafts_each_octave() {
        let mut ctx = GenerationContext::new(1);
        let (north, _) =
            RealTile::generate(&octaves(), Neighbors::none(), BaseAltitude::default(), &mut ctx)
                .unwrap();
        let neighbors = Neighbors {
            north: Some(&north),
            ..Neighbors::none()
        };
        let (tile, skipped) =
            RealTile::generate(&octaves(), neighbors, BaseAltitude::Fixed(2.5), &mut ctx).unwrap();
        assert!(skipped.is_empty());
        assert_eq!(tile.base_altitude(), 2.5);
        for (mine, theirs) in tile.layers().iter().zip(north.layers()) {
            assert_eq!(mine.field().row(0), theirs.field().last_row());
        }
        // The shared lattice row evaluates identically from both sides.
        for (mine, theirs) in tile.layers().iter().zip(north.layers()) {
            let far = (theirs.field().height() - 1) as f64;
            for step in 0..=8 {
                let y = step as f64 * 0.25;
                let a = mine.evaluate(0.0, y).unwrap();
                let b = theirs.evaluate(far, y).unwrap();
                assert!((a - b).abs() < 1e-12, "edge mismatch at y={y}: {a} vs {b}");
            }
        }
    }

    #[test]
    fn test_uniform_base_altitude_in_range() {
        let mut ctx = GenerationContext::new(3);
        let policy = BaseAltitude::Uniform {
            min: -1.0,
            max: 1.0,
        };
        for _ in 0..100 {
            let v = policy.sample(&mut ctx);
            assert!((-1.0..1.0).contains(&v), "{v} outside [-1, 1)");
        }
        let empty = BaseAltitude::Uniform { min: 2.0, max: 2.0 };
        assert_eq!(empty.sample(&mut ctx), 2.0);
    }

    #[test]
    fn test_virtual_tile_has_no_altitude() {
        let tile = Tile::from(VirtualTile::new(16, 16, DEFAULT_VIRTUAL_BASE_ALTITUDE));
        assert_eq!(tile.width(), 16);
        assert_eq!(tile.base_altitude(), 0.5);
        assert!(tile.altitude().is_none());
    }
}
