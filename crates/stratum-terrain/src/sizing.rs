//! Integer helpers for choosing octave densities that share one tile size.

use crate::error::TerrainError;
use crate::tile::OctaveParams;

/// Greatest common divisor.
pub fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Least common multiple, `None` when either input is zero.
pub fn lcm(a: usize, b: usize) -> Option<usize> {
    if a == 0 || b == 0 {
        return None;
    }
    (a / gcd(a, b)).checked_mul(b)
}

/// Least common multiple of every value.
pub fn lcm_of(values: &[usize]) -> Result<usize, TerrainError> {
    let mut acc = 1usize;
    for (index, &value) in values.iter().enumerate() {
        acc = lcm(acc, value).ok_or(TerrainError::ZeroGridSize { index })?;
    }
    Ok(acc)
}

/// Square octaves sharing a tile of side `lcm(grid_sizes)`.
///
/// Octave `k` gets a `(grid_sizes[k] + 1)`-point lattice per side and
/// density `lcm / grid_sizes[k]`.
pub fn square_octaves(
    grid_sizes: &[usize],
    weights: &[f64],
) -> Result<Vec<OctaveParams>, TerrainError> {
    if weights.len() != grid_sizes.len() {
        return Err(TerrainError::LengthMismatch {
            list: "weights",
            expected: grid_sizes.len(),
            actual: weights.len(),
        });
    }
    let side = lcm_of(grid_sizes)?;
    Ok(grid_sizes
        .iter()
        .zip(weights)
        .map(|(&grid, &weight)| OctaveParams {
            grid_width: grid + 1,
            grid_height: grid + 1,
            density: side / grid,
            weight,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gcd_lcm() {
        assert_eq!(gcd(12, 18), 6);
        assert_eq!(gcd(7, 0), 7);
        assert_eq!(lcm(4, 6), Some(12));
        assert_eq!(lcm(0, 6), None);
        assert_eq!(lcm_of(&[2, 4, 8]), Ok(8));
        assert_eq!(lcm_of(&[3, 0]), Err(TerrainError::ZeroGridSize { index: 1 }));
    }

    #[test]
    fn test_square_octaves_share_tile_size() {
        let octaves = square_octaves(&[3, 5, 9], &[1.0, 0.1, 0.01]).unwrap();
        assert_eq!(octaves[0].density, 15);
        assert_eq!(octaves[2].density, 5);
        assert_eq!(octaves[2].grid_width, 10);
        assert_eq!(OctaveParams::validate(&octaves), Ok((45, 45)));
    }

    #[test]
    fn test_square_octaves_largest_grid_has_density_one() {
        let octaves = square_octaves(&[2, 4], &[1.0, 1.0]).unwrap();
        assert_eq!(octaves[1].density, 1);
        assert_eq!(
            OctaveParams::validate(&octaves),
            Err(TerrainError::InvalidDensity(1))
        );
    }
}
