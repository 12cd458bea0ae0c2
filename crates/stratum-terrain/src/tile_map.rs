//! A lattice of tiles assembled into one seamless altitude matrix.
//!
//! Tiles are generated row-major, each grafted onto the tile above and the
//! tile to its left. The assembled matrix is the raw concatenation of the
//! tile altitudes plus a smooth macro correction: a bilinear smoothstep blend
//! over a `(map_height + 2) x (map_width + 2)` field of base altitudes whose
//! outer ring comes from virtual border tiles.
//!
//! Coordinates in the bordered space are `(w, h)`: `w` in `[0, map_width + 1]`
//! is the column, `h` in `[0, map_height + 1]` the row. Interior pairs map to
//! real tile `(h - 1, w - 1)`.

use tracing::{debug, instrument};

use crate::context::{GenerationContext, TileSlot};
use crate::error::TerrainError;
use crate::grid::Grid;
use crate::neighbors::Neighbors;
use crate::noise_layer::smoothstep;
use crate::tile::{
    BaseAltitude, DEFAULT_VIRTUAL_BASE_ALTITUDE, OctaveParams, RealTile, VirtualTile,
};
use crate::vector_field::SkippedGraft;

/// How tiles populate the macro field and which corners feed the blend.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MacroIndexing {
    /// Tile `(i, j)` fills macro cell `(i, j)` for `i in 1..map_height-1`,
    /// `j in 1..map_width-1` only, and the blend takes `a2` from the next row
    /// and `a3` from the next column.
    #[default]
    Direct,
    /// Tile `(i, j)` fills macro cell `(i + 1, j + 1)` and the blend corners
    /// follow the pixel axes.
    Bordered,
}

/// Everything needed to generate a map from scratch.
#[derive(Clone, Debug, PartialEq)]
pub struct MapParams {
    pub map_width: usize,
    pub map_height: usize,
    pub octaves: Vec<OctaveParams>,
    pub tile_base: BaseAltitude,
    pub virtual_base: BaseAltitude,
    pub indexing: MacroIndexing,
}

impl MapParams {
    /// Parameters with default base altitude policies and indexing.
    pub fn new(map_width: usize, map_height: usize, octaves: Vec<OctaveParams>) -> Self {
        Self {
            map_width,
            map_height,
            octaves,
            tile_base: BaseAltitude::default(),
            virtual_base: BaseAltitude::Fixed(DEFAULT_VIRTUAL_BASE_ALTITUDE),
            indexing: MacroIndexing::default(),
        }
    }
}

/// A tile looked up in the bordered coordinate space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BorderedTile<'a> {
    Real(&'a RealTile),
    Virtual(&'a VirtualTile),
}

impl BorderedTile<'_> {
    pub fn base_altitude(&self) -> f64 {
        match self {
            BorderedTile::Real(tile) => tile.base_altitude(),
            BorderedTile::Virtual(tile) => tile.base_altitude,
        }
    }
}

/// Number of virtual tiles surrounding a `map_width x map_height` map.
pub fn ring_len(map_width: usize, map_height: usize) -> usize {
    2 * (map_width + 2) + 2 * (map_height + 2) - 4
}

/// Position in the virtual ring of bordered pair `(w, h)`, or `None` for
/// interior pairs and pairs outside the bordered space.
///
/// The ring is the west column, then the east column (both top to bottom,
/// corners included), then the top row and the bottom row without corners.
pub fn ring_index(map_width: usize, map_height: usize, w: usize, h: usize) -> Option<usize> {
    let bw = map_width + 2;
    let bh = map_height + 2;
    if w >= bw || h >= bh {
        return None;
    }
    if w == 0 {
        Some(h)
    } else if w == bw - 1 {
        Some(bh + h)
    } else if h == 0 {
        Some(2 * bh + w - 1)
    } else if h == bh - 1 {
        Some(2 * bh + bw - 2 + w - 1)
    } else {
        None
    }
}

/// Bilinear smoothstep blend of four corner values.
///
/// `a1` sits at `(0, 0)`, `a2` at `x = 1`, `a3` at `y = 1`, `a4` at both.
pub fn interpolate_2d(a1: f64, a2: f64, a3: f64, a4: f64, x: f64, y: f64) -> f64 {
    let sx = smoothstep(x);
    let sy = smoothstep(y);
    a1 + (a2 - a1) * sx + (a3 - a1) * sy + (a1 + a4 - a2 - a3) * sx * sy
}

/// An assembled map of tiles.
#[derive(Clone, Debug, PartialEq)]
pub struct TileMap {
    map_width: usize,
    map_height: usize,
    tile_width: usize,
    tile_height: usize,
    tiles: Vec<RealTile>,
    virtual_tiles: Vec<VirtualTile>,
    indexing: MacroIndexing,
    altitude: Grid<f64>,
}

impl TileMap {
    /// Build a map from row-major tiles and the virtual ring, then assemble it.
    pub fn new(
        map_width: usize,
        map_height: usize,
        tiles: Vec<RealTile>,
        virtual_tiles: Vec<VirtualTile>,
        indexing: MacroIndexing,
    ) -> Result<Self, TerrainError> {
        if map_width == 0 || map_height == 0 {
            return Err(TerrainError::EmptyMap {
                width: map_width,
                height: map_height,
            });
        }
        if tiles.len() != map_width * map_height {
            return Err(TerrainError::TileCount {
                expected: map_width * map_height,
                actual: tiles.len(),
            });
        }
        let ring = ring_len(map_width, map_height);
        if virtual_tiles.len() != ring {
            return Err(TerrainError::VirtualTileCount {
                expected: ring,
                actual: virtual_tiles.len(),
            });
        }

        let expected = (tiles[0].width(), tiles[0].height());
        let sizes = tiles
            .iter()
            .map(|t| (t.width(), t.height()))
            .chain(virtual_tiles.iter().map(|t| (t.width, t.height)));
        for (index, actual) in sizes.enumerate() {
            if actual != expected {
                return Err(TerrainError::TileDimensionMismatch {
                    index,
                    expected,
                    actual,
                });
            }
        }

        let (tile_width, tile_height) = expected;
        let mut map = Self {
            map_width,
            map_height,
            tile_width,
            tile_height,
            tiles,
            virtual_tiles,
            indexing,
            altitude: Grid::filled(0, 0, 0.0),
        };
        map.altitude = map.assemble();
        Ok(map)
    }

    /// Generate every tile and the virtual ring from `ctx`'s seed, then assemble.
    ///
    /// Each tile draws from a child context forked for its slot, so a tile
    /// depends only on the map seed and its position. Skipped grafts are
    /// returned with the slot of the tile they belong to.
    #[instrument(skip_all, fields(seed = ctx.seed(), width = params.map_width, height = params.map_height))]
    pub fn generate(
        params: &MapParams,
        ctx: &GenerationContext,
    ) -> Result<(Self, Vec<(TileSlot, SkippedGraft)>), TerrainError> {
        let MapParams {
            map_width,
            map_height,
            ..
        } = *params;
        if map_width == 0 || map_height == 0 {
            return Err(TerrainError::EmptyMap {
                width: map_width,
                height: map_height,
            });
        }
        let (tile_width, tile_height) = OctaveParams::validate(&params.octaves)?;

        let mut tiles: Vec<RealTile> = Vec::with_capacity(map_width * map_height);
        let mut skipped = Vec::new();
        for row in 0..map_height {
            for col in 0..map_width {
                let neighbors = Neighbors {
                    north: row.checked_sub(1).map(|r| &tiles[r * map_width + col]),
                    west: col.checked_sub(1).map(|c| &tiles[row * map_width + c]),
                    ..Neighbors::none()
                };
                let (tile, missed) = generate_tile(params, row, col, neighbors, ctx)?;
                skipped.extend(missed);
                tiles.push(tile);
            }
        }

        let mut ring_ctx = ctx.fork(TileSlot::VirtualRing);
        let virtual_tiles = (0..ring_len(map_width, map_height))
            .map(|_| {
                let base = params.virtual_base.sample(&mut ring_ctx);
                VirtualTile::new(tile_width, tile_height, base)
            })
            .collect();

        let map = Self::new(map_width, map_height, tiles, virtual_tiles, params.indexing)?;
        Ok((map, skipped))
    }

    /// The virtual tile at bordered pair `(w, h)`.
    pub fn lookup_virtual_tile(&self, w: usize, h: usize) -> Option<&VirtualTile> {
        ring_index(self.map_width, self.map_height, w, h).and_then(|i| self.virtual_tiles.get(i))
    }

    /// The real or virtual tile at bordered pair `(w, h)`.
    pub fn bordered_tile(&self, w: usize, h: usize) -> Option<BorderedTile<'_>> {
        if let Some(tile) = self.lookup_virtual_tile(w, h) {
            return Some(BorderedTile::Virtual(tile));
        }
        if (1..=self.map_width).contains(&w) && (1..=self.map_height).contains(&h) {
            return self.tile(h - 1, w - 1).map(BorderedTile::Real);
        }
        None
    }

    /// The macro field of base altitudes, `(map_height + 2) x (map_width + 2)`.
    pub fn macro_field(&self) -> Grid<f64> {
        let bw = self.map_width + 2;
        let bh = self.map_height + 2;
        let mut field = Grid::filled(bw, bh, 0.0);

        match self.indexing {
            MacroIndexing::Direct => {
                for i in 1..self.map_height.saturating_sub(1) {
                    for j in 1..self.map_width.saturating_sub(1) {
                        if let (Some(cell), Some(tile)) = (field.get_mut(i, j), self.tile(i, j)) {
                            *cell = tile.base_altitude();
                        }
                    }
                }
            }
            MacroIndexing::Bordered => {
                for i in 0..self.map_height {
                    for j in 0..self.map_width {
                        if let (Some(cell), Some(tile)) =
                            (field.get_mut(i + 1, j + 1), self.tile(i, j))
                        {
                            *cell = tile.base_altitude();
                        }
                    }
                }
            }
        }

        for (h, w) in (0..bh)
            .flat_map(|h| [(h, 0), (h, bw - 1)])
            .chain((0..bw).flat_map(|w| [(0, w), (bh - 1, w)]))
        {
            if let (Some(cell), Some(tile)) = (field.get_mut(h, w), self.lookup_virtual_tile(w, h))
            {
                *cell = tile.base_altitude;
            }
        }
        field
    }

    /// Tile altitudes copied into one global matrix, without correction.
    pub fn concatenate_tiles(&self) -> Grid<f64> {
        let (tw, th) = (self.tile_width, self.tile_height);
        Grid::from_fn(self.map_width * tw, self.map_height * th, |row, col| {
            self.tile(row / th, col / tw)
                .and_then(|tile| tile.altitude().get(row % th, col % tw))
                .copied()
                .unwrap_or(0.0)
        })
    }

    /// Concatenate the tiles and add the macro correction.
    #[instrument(skip_all, fields(indexing = ?self.indexing))]
    pub fn assemble(&self) -> Grid<f64> {
        let mut altitude = self.concatenate_tiles();
        let macro_field = self.macro_field();
        let (tw, th) = (self.tile_width, self.tile_height);
        let total_rows = (self.map_height * th) as i64;
        let total_cols = (self.map_width * tw) as i64;
        if total_rows == 0 || total_cols == 0 {
            return altitude;
        }
        let m = |r: usize, c: usize| macro_field.get(r, c).copied().unwrap_or(0.0);

        for i in 0..self.map_height {
            for j in 0..self.map_width {
                let a1 = m(i, j);
                let a4 = m(i + 1, j + 1);
                let (a2, a3) = match self.indexing {
                    MacroIndexing::Direct => (m(i + 1, j), m(i, j + 1)),
                    MacroIndexing::Bordered => (m(i, j + 1), m(i + 1, j)),
                };
                let row_offset = ((i as f64 - 0.5) * th as f64).floor() as i64;
                let col_offset = ((j as f64 - 0.5) * tw as f64).floor() as i64;

                for pi in 0..th {
                    let y = pi as f64 / th as f64;
                    let row = (pi as i64 + row_offset).rem_euclid(total_rows) as usize;
                    for pj in 0..tw {
                        let x = pj as f64 / tw as f64;
                        let col = (pj as i64 + col_offset).rem_euclid(total_cols) as usize;
                        if let Some(cell) = altitude.get_mut(row, col) {
                            *cell += interpolate_2d(a1, a2, a3, a4, x, y);
                        }
                    }
                }
            }
        }
        altitude
    }

    /// Switch the macro indexing and reassemble.
    pub fn set_indexing(&mut self, indexing: MacroIndexing) {
        self.indexing = indexing;
        self.altitude = self.assemble();
    }

    /// Real tile at `(row, col)`.
    pub fn tile(&self, row: usize, col: usize) -> Option<&RealTile> {
        if row < self.map_height && col < self.map_width {
            self.tiles.get(row * self.map_width + col)
        } else {
            None
        }
    }

    /// Real tiles, row-major.
    pub fn tiles(&self) -> &[RealTile] {
        &self.tiles
    }

    /// The virtual ring.
    pub fn virtual_tiles(&self) -> &[VirtualTile] {
        &self.virtual_tiles
    }

    pub fn map_width(&self) -> usize {
        self.map_width
    }

    pub fn map_height(&self) -> usize {
        self.map_height
    }

    pub fn tile_width(&self) -> usize {
        self.tile_width
    }

    pub fn tile_height(&self) -> usize {
        self.tile_height
    }

    pub fn indexing(&self) -> MacroIndexing {
        self.indexing
    }

    /// The assembled altitude, `(map_height * tile_height) x (map_width * tile_width)`.
    pub fn altitude(&self) -> &Grid<f64> {
        &self.altitude
    }
}

/// Generate the real tile at `(row, col)` from the context forked for its slot.
#[instrument(level = "debug", skip(params, neighbors, ctx))]
fn generate_tile(
    params: &MapParams,
    row: usize,
    col: usize,
    neighbors: Neighbors<&RealTile>,
    ctx: &GenerationContext,
) -> Result<(RealTile, Vec<(TileSlot, SkippedGraft)>), TerrainError> {
    let slot = TileSlot::Real { row, col };
    let mut tile_ctx = ctx.fork(slot);
    let (tile, missed) =
        RealTile::generate(&params.octaves, neighbors, params.tile_base, &mut tile_ctx)?;
    debug!(
        neighbors = neighbors.count(),
        base_altitude = tile.base_altitude(),
        skipped = missed.len(),
        "tile generated"
    );
    Ok((tile, missed.into_iter().map(|graft| (slot, graft)).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::neighbors::Direction;

    fn octaves() -> Vec<OctaveParams> {
        OctaveParams::zip(&[3, 5], &[3, 5], &[8, 4], &[1.0, 0.1]).unwrap()
    }

    fn generated(map_width: usize, map_height: usize, indexing: MacroIndexing) -> TileMap {
        let mut params = MapParams::new(map_width, map_height, octaves());
        params.indexing = indexing;
        TileMap::generate(&params, &GenerationContext::new(2024))
            .unwrap()
            .0
    }

    #[test]
    fn test_ring_len_and_indexing() {
        assert_eq!(ring_len(3, 2), 14);
        assert_eq!(ring_index(3, 2, 0, 0), Some(0));
        assert_eq!(ring_index(3, 2, 0, 3), Some(3));
        assert_eq!(ring_index(3, 2, 4, 0), Some(4));
        assert_eq!(ring_index(3, 2, 4, 3), Some(7));
        assert_eq!(ring_index(3, 2, 1, 0), Some(8));
        assert_eq!(ring_index(3, 2, 3, 0), Some(10));
        assert_eq!(ring_index(3, 2, 1, 3), Some(11));
        assert_eq!(ring_index(3, 2, 3, 3), Some(13));
        assert_eq!(ring_index(3, 2, 2, 1), None, "interior pair");
        assert_eq!(ring_index(3, 2, 5, 0), None, "outside bordered space");
    }

    #[test]
    fn test_ring_index_covers_ring_exactly_once() {
        let (mw, mh) = (3, 2);
        let mut seen = vec![0; ring_len(mw, mh)];
        for h in 0..mh + 2 {
            for w in 0..mw + 2 {
                if let Some(i) = ring_index(mw, mh, w, h) {
                    seen[i] += 1;
                }
            }
        }
        assert!(seen.iter().all(|&n| n == 1), "ring coverage {seen:?}");
    }

    #[test]
    fn test_generated_dimensions() {
        let map = generated(3, 2, MacroIndexing::Direct);
        assert_eq!((map.tile_width(), map.tile_height()), (16, 16));
        assert_eq!(map.altitude().dimensions(), (48, 32));
        assert_eq!(map.virtual_tiles().len(), 14);
        assert!(map.virtual_tiles().iter().all(|t| t.base_altitude == 0.5));
    }

    #[test]
    fn test_skipped_grafts_carry_tile_slot() {
        let coarse = OctaveParams::zip(&[4], &[4], &[2], &[1.0]).unwrap();
        let mut ctx = GenerationContext::new(5);
        let (neighbor, _) =
            RealTile::generate(&coarse, Neighbors::none(), BaseAltitude::Fixed(0.0), &mut ctx)
                .unwrap();

        let fine = OctaveParams::zip(&[3], &[3], &[3], &[1.0]).unwrap();
        let params = MapParams::new(2, 2, fine);
        let neighbors = Neighbors {
            north: Some(&neighbor),
            west: Some(&neighbor),
            ..Neighbors::none()
        };
        let (tile, skipped) =
            generate_tile(&params, 1, 1, neighbors, &GenerationContext::new(5)).unwrap();

        assert_eq!(tile.altitude().dimensions(), (6, 6));
        let slot = TileSlot::Real { row: 1, col: 1 };
        assert_eq!(
            skipped,
            vec![
                (
                    slot,
                    SkippedGraft {
                        direction: Direction::North,
                        expected: 3,
                        actual: 4,
                    }
                ),
                (
                    slot,
                    SkippedGraft {
                        direction: Direction::West,
                        expected: 3,
                        actual: 4,
                    }
                ),
            ]
        );
    }

    #[test]
    fn test_neighbors_are_grafted() {
        let map = generated(2, 2, MacroIndexing::Direct);
        let (top_left, top_right, bottom_left) = (
            map.tile(0, 0).unwrap(),
            map.tile(0, 1).unwrap(),
            map.tile(1, 0).unwrap(),
        );
        for k in 0..2 {
            assert_eq!(
                top_right.layers()[k].field().column(0).collect::<Vec<_>>(),
                top_left.layers()[k].field().column(2 + 2 * k).collect::<Vec<_>>()
            );
            assert_eq!(
                bottom_left.layers()[k].field().row(0),
                top_left.layers()[k].field().last_row()
            );
        }
    }

    #[test]
    fn test_generation_is_deterministic_per_seed() {
        let a = generated(2, 2, MacroIndexing::Direct);
        let b = generated(2, 2, MacroIndexing::Direct);
        assert_eq!(a.altitude(), b.altitude());
    }

    #[test]
    fn test_bordered_tile_lookup() {
        let map = generated(2, 1, MacroIndexing::Direct);
        assert!(matches!(map.bordered_tile(0, 0), Some(BorderedTile::Virtual(_))));
        assert!(matches!(map.bordered_tile(2, 1), Some(BorderedTile::Real(_))));
        assert!(map.bordered_tile(4, 0).is_none());
        assert!(map.lookup_virtual_tile(1, 1).is_none());
    }

    #[test]
    fn test_uniform_bases_shift_raw_by_constant() {
        let mut params = MapParams::new(2, 2, octaves());
        params.tile_base = BaseAltitude::Fixed(0.5);
        params.indexing = MacroIndexing::Bordered;
        let (map, _) = TileMap::generate(&params, &GenerationContext::new(1)).unwrap();
        let raw = map.concatenate_tiles();
        for (&assembled, &r) in map.altitude().cells().iter().zip(raw.cells()) {
            assert!((assembled - (r + 0.5)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_direct_and_bordered_macro_fields() {
        let mut params = MapParams::new(3, 3, octaves());
        params.tile_base = BaseAltitude::Fixed(2.0);
        params.virtual_base = BaseAltitude::Fixed(0.0);
        let (mut map, _) = TileMap::generate(&params, &GenerationContext::new(5)).unwrap();

        let direct = map.macro_field();
        assert_eq!(direct.get(1, 1), Some(&2.0));
        assert_eq!(direct.get(1, 2), Some(&0.0), "only i, j in 1..2 are filled");
        assert_eq!(direct.get(3, 3), Some(&0.0));

        map.set_indexing(MacroIndexing::Bordered);
        let bordered = map.macro_field();
        for i in 1..4 {
            for j in 1..4 {
                assert_eq!(bordered.get(i, j), Some(&2.0));
            }
        }
        assert_eq!(bordered.get(0, 2), Some(&0.0));
        assert_eq!(bordered.get(4, 4), Some(&0.0));
    }

    #[test]
    fn test_interpolate_2d_corners() {
        assert_eq!(interpolate_2d(1.0, 2.0, 3.0, 4.0, 0.0, 0.0), 1.0);
        assert_eq!(interpolate_2d(1.0, 2.0, 3.0, 4.0, 1.0, 0.0), 2.0);
        assert_eq!(interpolate_2d(1.0, 2.0, 3.0, 4.0, 0.0, 1.0), 3.0);
        assert_eq!(interpolate_2d(1.0, 2.0, 3.0, 4.0, 1.0, 1.0), 4.0);
    }

    #[test]
    fn test_new_validation() {
        let map = generated(1, 1, MacroIndexing::Direct);
        let tile = map.tile(0, 0).unwrap().clone();
        let ring = map.virtual_tiles().to_vec();
        assert_eq!(
            TileMap::new(0, 1, vec![], vec![], MacroIndexing::Direct).unwrap_err(),
            TerrainError::EmptyMap {
                width: 0,
                height: 1
            }
        );
        assert_eq!(
            TileMap::new(2, 1, vec![tile.clone()], ring.clone(), MacroIndexing::Direct)
                .unwrap_err(),
            TerrainError::TileCount {
                expected: 2,
                actual: 1
            }
        );
        assert_eq!(
            TileMap::new(1, 1, vec![tile.clone()], ring[..7].to_vec(), MacroIndexing::Direct)
                .unwrap_err(),
            TerrainError::VirtualTileCount {
                expected: 8,
                actual: 7
            }
        );
        let mut wrong = ring.clone();
        wrong[2] = VirtualTile::new(4, 4, 0.5);
        assert_eq!(
            TileMap::new(1, 1, vec![tile], wrong, MacroIndexing::Direct).unwrap_err(),
            TerrainError::TileDimensionMismatch {
                index: 3,
                expected: (16, 16),
                actual: (4, 4)
            }
        );
    }
}
