//! Sea level clamping and altitude-to-color mapping.

use image::{Rgb, RgbImage};
use stratum_terrain::Grid;

/// Color of cells whose altitude is exactly zero.
pub const ZERO_MARK: Rgb<u8> = Rgb([255, 0, 0]);

/// Every altitude clamped from below at `sea_level`.
pub fn sea_values(altitude: &Grid<f64>, sea_level: f64) -> Grid<f64> {
    Grid::from_fn(altitude.width(), altitude.height(), |row, col| {
        altitude
            .get(row, col)
            .map_or(sea_level, |&value| value.max(sea_level))
    })
}

/// Scale `numerator / denominator` into a channel, saturating at both ends.
fn channel(numerator: f64, denominator: f64, scale: f64) -> u8 {
    if denominator == 0.0 || !denominator.is_finite() {
        return 0;
    }
    (numerator * scale / denominator).clamp(0.0, 255.0) as u8
}

/// Color of one altitude: blue shades at or below the sea, green above.
///
/// Brightness is relative to the map's `min` and `max`.
pub fn colorize(value: f64, sea_level: f64, min: f64, max: f64, mark_zero: bool) -> Rgb<u8> {
    if mark_zero && value == 0.0 {
        ZERO_MARK
    } else if value <= sea_level {
        Rgb([50, 50, channel(value - min, sea_level - min, 200.0)])
    } else {
        Rgb([50, channel(value - min, max - min, 255.0), 50])
    }
}

/// Render an altitude matrix as an RGB image, one pixel per cell.
pub fn color_map(altitude: &Grid<f64>, sea_level: f64, mark_zero: bool) -> RgbImage {
    let (min, max) = altitude.min_max().unwrap_or((0.0, 0.0));
    let (width, height) = altitude.dimensions();
    RgbImage::from_fn(width as u32, height as u32, |x, y| {
        altitude
            .get(y as usize, x as usize)
            .map_or(Rgb([0, 0, 0]), |&value| {
                colorize(value, sea_level, min, max, mark_zero)
            })
    })
}
