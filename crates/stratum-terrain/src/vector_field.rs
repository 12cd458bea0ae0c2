//! Lattice of unit gradient vectors with edge grafting from neighbors.

use glam::DVec2;
use rand::Rng;

use crate::context::GenerationContext;
use crate::error::TerrainError;
use crate::grid::Grid;
use crate::neighbors::{Direction, Neighbors};

/// Maximum deviation of a supplied vector's squared length from 1.
pub const UNIT_TOLERANCE: f64 = 1e-4;

/// A neighbor edge that could not be copied because its length differs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SkippedGraft {
    /// Side of this field the graft targeted.
    pub direction: Direction,
    /// Length of this field's edge on that side.
    pub expected: usize,
    /// Length of the neighbor's opposite edge.
    pub actual: usize,
}

/// A `height x width` lattice of unit vectors, indexed `(row, col)`.
#[derive(Clone, Debug, PartialEq)]
pub struct VectorField {
    vectors: Grid<DVec2>,
}

impl VectorField {
    /// Fill a new field with random unit vectors, then graft the edges of
    /// any neighbors present.
    ///
    /// Each vector is `x = uniform(-1, 1)`, `y = +-sqrt(1 - x^2)` with a
    /// random sign. Mismatched neighbors are skipped and returned.
    pub fn generate(
        width: usize,
        height: usize,
        neighbors: Neighbors<&VectorField>,
        ctx: &mut GenerationContext,
    ) -> Result<(Self, Vec<SkippedGraft>), TerrainError> {
        check_size(width, height)?;
        let rng = ctx.rng();
        let vectors = Grid::from_fn(width, height, |_, _| random_unit(rng));
        let mut field = Self { vectors };
        let skipped = field.graft(neighbors);
        Ok((field, skipped))
    }

    /// Build a field from explicit row-major vectors.
    pub fn from_vectors(
        width: usize,
        height: usize,
        vectors: Vec<DVec2>,
    ) -> Result<Self, TerrainError> {
        check_size(width, height)?;
        let actual = vectors.len();
        let vectors = Grid::from_cells(width, height, vectors).ok_or(TerrainError::VectorCount {
            expected: width * height,
            actual,
        })?;
        for (index, v) in vectors.cells().iter().enumerate() {
            let length_squared = v.length_squared();
            if !((length_squared - 1.0).abs() <= UNIT_TOLERANCE) {
                return Err(TerrainError::NonUnitVector {
                    row: index / width,
                    col: index % width,
                    length_squared,
                });
            }
        }
        Ok(Self { vectors })
    }

    /// Rescale every vector to exact unit length.
    pub(crate) fn normalized(mut self) -> Self {
        for v in self.vectors.cells_mut() {
            *v = v.try_normalize().unwrap_or(DVec2::X);
        }
        self
    }

    /// Regenerate every vector in place, then graft. Previous vectors are discarded.
    pub fn regenerate(
        &mut self,
        neighbors: Neighbors<&VectorField>,
        ctx: &mut GenerationContext,
    ) -> Vec<SkippedGraft> {
        let rng = ctx.rng();
        for v in self.vectors.cells_mut() {
            *v = random_unit(rng);
        }
        self.graft(neighbors)
    }

    /// Copy each present neighbor's opposite edge onto this field, in the
    /// order north, east, south, west.
    pub fn graft(&mut self, neighbors: Neighbors<&VectorField>) -> Vec<SkippedGraft> {
        let mut skipped = Vec::new();
        for direction in Direction::ALL {
            let Some(&neighbor) = neighbors.get(direction) else {
                continue;
            };
            let (expected, actual) = match direction {
                Direction::North | Direction::South => (self.width(), neighbor.width()),
                Direction::East | Direction::West => (self.height(), neighbor.height()),
            };
            if expected != actual {
                tracing::warn!(
                    %direction,
                    expected,
                    actual,
                    "neighbor edge length mismatch, graft skipped"
                );
                skipped.push(SkippedGraft {
                    direction,
                    expected,
                    actual,
                });
                continue;
            }
            match direction {
                Direction::North => {
                    let edge = neighbor.last_row().to_vec();
                    self.vectors.row_mut(0).copy_from_slice(&edge);
                }
                Direction::South => {
                    let edge = neighbor.row(0).to_vec();
                    let last = self.height() - 1;
                    self.vectors.row_mut(last).copy_from_slice(&edge);
                }
                Direction::East => {
                    let last = self.width() - 1;
                    self.vectors.set_column(last, neighbor.column(0));
                }
                Direction::West => {
                    let last = neighbor.width() - 1;
                    self.vectors.set_column(0, neighbor.column(last));
                }
            }
        }
        skipped
    }

    /// Number of lattice columns.
    pub fn width(&self) -> usize {
        self.vectors.width()
    }

    /// Number of lattice rows.
    pub fn height(&self) -> usize {
        self.vectors.height()
    }

    /// Vector at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> Option<DVec2> {
        self.vectors.get(row, col).copied()
    }

    /// One lattice row.
    pub fn row(&self, row: usize) -> &[DVec2] {
        self.vectors.row(row)
    }

    /// The southernmost row.
    pub fn last_row(&self) -> &[DVec2] {
        self.vectors.row(self.height() - 1)
    }

    /// One lattice column, top to bottom.
    pub fn column(&self, col: usize) -> impl Iterator<Item = DVec2> + '_ {
        self.vectors.column(col).copied()
    }

    /// All vectors, row-major.
    pub fn vectors(&self) -> &[DVec2] {
        self.vectors.cells()
    }
}

fn check_size(width: usize, height: usize) -> Result<(), TerrainError> {
    if width < 2 || height < 2 {
        return Err(TerrainError::FieldTooSmall { width, height });
    }
    Ok(())
}

fn random_unit(rng: &mut impl Rng) -> DVec2 {
    let x: f64 = rng.random_range(-1.0..1.0);
    let y = (1.0 - x * x).sqrt();
    if rng.random_bool(0.5) {
        DVec2::new(x, y)
    } else {
        DVec2::new(x, -y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(width: usize, height: usize, seed: u64) -> VectorField {
        let mut ctx = GenerationContext::new(seed);
        VectorField::generate(width, height, Neighbors::none(), &mut ctx)
            .unwrap()
            .0
    }

    #[test]
    fn test_generated_vectors_are_unit_length() {
        let f = field(9, 7, 1);
        for v in f.vectors() {
            assert!(
                (v.length() - 1.0).abs() < 1e-12,
                "vector {v:?} is not unit length"
            );
        }
    }

    #[test]
    fn test_generate_rejects_small_fields() {
        let mut ctx = GenerationContext::new(0);
        let err = VectorField::generate(1, 4, Neighbors::none(), &mut ctx).unwrap_err();
        assert_eq!(err, TerrainError::FieldTooSmall { width: 1, height: 4 });
    }

    #[test]
    fn test_north_graft_copies_last_row() {
        let north = field(5, 4, 10);
        let mut ctx = GenerationContext::new(11);
        let (f, skipped) =
            VectorField::generate(5, 6, Neighbors::none().with(Direction::North, &north), &mut ctx)
                .unwrap();
        assert!(skipped.is_empty());
        assert_eq!(f.row(0), north.last_row(), "first row must equal north's last row");
    }

    #[test]
    fn test_all_four_grafts() {
        let north = field(4, 3, 1);
        let south = field(4, 3, 2);
        let east = field(3, 5, 3);
        let west = field(3, 5, 4);
        let neighbors = Neighbors {
            north: Some(&north),
            east: Some(&east),
            south: Some(&south),
            west: Some(&west),
        };
        let mut ctx = GenerationContext::new(5);
        let (f, skipped) = VectorField::generate(4, 5, neighbors, &mut ctx).unwrap();
        assert!(skipped.is_empty());
        // Later grafts own the shared corners: south beats east, west beats everything.
        assert_eq!(&f.last_row()[1..], &south.row(0)[1..]);
        assert_eq!(
            f.column(3).take(4).collect::<Vec<_>>(),
            east.column(0).take(4).collect::<Vec<_>>()
        );
        assert_eq!(
            f.column(0).collect::<Vec<_>>(),
            west.column(2).collect::<Vec<_>>()
        );
        assert_eq!(&f.row(0)[1..3], &north.last_row()[1..3]);
    }

    #[test]
    fn test_mismatched_graft_is_skipped() {
        let north = field(6, 3, 1);
        let mut ctx = GenerationContext::new(2);
        let (f, skipped) =
            VectorField::generate(4, 4, Neighbors::none().with(Direction::North, &north), &mut ctx)
                .unwrap();
        assert_eq!(
            skipped,
            vec![SkippedGraft {
                direction: Direction::North,
                expected: 4,
                actual: 6
            }]
        );
        assert_eq!(f.width(), 4);
    }

    #[test]
    fn test_same_seed_same_field() {
        assert_eq!(field(8, 8, 42), field(8, 8, 42));
        assert_ne!(field(8, 8, 42), field(8, 8, 43));
    }

    #[test]
    fn test_regenerate_overwrites() {
        let mut f = field(4, 4, 1);
        let before = f.clone();
        let mut ctx = GenerationContext::new(99);
        f.regenerate(Neighbors::none(), &mut ctx);
        assert_ne!(f, before);
        assert_eq!(f.width(), 4);
    }

    #[test]
    fn test_from_vectors_validation() {
        let unit = DVec2::new(0.6, 0.8);
        assert!(VectorField::from_vectors(2, 2, vec![unit; 4]).is_ok());
        assert_eq!(
            VectorField::from_vectors(2, 2, vec![unit; 3]).unwrap_err(),
            TerrainError::VectorCount {
                expected: 4,
                actual: 3
            }
        );
        let mut bad = vec![unit; 4];
        bad[3] = DVec2::new(1.0, 1.0);
        assert!(matches!(
            VectorField::from_vectors(2, 2, bad),
            Err(TerrainError::NonUnitVector { row: 1, col: 1, .. })
        ));
    }
}
