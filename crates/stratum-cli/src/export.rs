//! Plain-text altitude dumps.
//!
//! ```text
//! Map
//! map_width=3
//! map_height=2
//! tile_width=45
//! tile_height=45
//!  0.12345678	-0.50000000	...
//! ```

use std::io::{self, Write};

use stratum_terrain::{Grid, TileMap};

fn write_header(out: &mut impl Write, title: &str, map: &TileMap) -> io::Result<()> {
    writeln!(out, "{title}")?;
    writeln!(out, "map_width={}", map.map_width())?;
    writeln!(out, "map_height={}", map.map_height())?;
    writeln!(out, "tile_width={}", map.tile_width())?;
    writeln!(out, "tile_height={}", map.tile_height())
}

/// Eight decimals with a leading space in place of a plus sign.
fn format_value(value: f64) -> String {
    if value.is_sign_negative() {
        format!("{value:.8}")
    } else {
        format!(" {value:.8}")
    }
}

fn write_rows(out: &mut impl Write, altitude: &Grid<f64>) -> io::Result<()> {
    for row in altitude.rows() {
        let line = row
            .iter()
            .map(|&value| format_value(value))
            .collect::<Vec<_>>()
            .join("\t");
        writeln!(out, "{line}")?;
    }
    Ok(())
}

/// Write the assembled altitude with its size header.
pub fn write_map(out: &mut impl Write, map: &TileMap) -> io::Result<()> {
    write_header(out, "Map", map)?;
    write_rows(out, map.altitude())
}

/// Write sea-clamped altitudes with the size header and the sea level.
pub fn write_sea_map(
    out: &mut impl Write,
    map: &TileMap,
    sea_level: f64,
    sea_values: &Grid<f64>,
) -> io::Result<()> {
    write_header(out, "Sea Map", map)?;
    writeln!(out, "sea_level={sea_level:.8}")?;
    write_rows(out, sea_values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratum_terrain::{GenerationContext, MapParams, OctaveParams};

    fn map() -> TileMap {
        let octaves = OctaveParams::zip(&[2], &[2], &[2], &[1.0]).unwrap();
        TileMap::generate(&MapParams::new(2, 1, octaves), &GenerationContext::new(1))
            .unwrap()
            .0
    }

    #[test]
    fn test_map_header_and_shape() {
        let map = map();
        let mut out = Vec::new();
        write_map(&mut out, &map).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            &lines[..5],
            &[
                "Map",
                "map_width=2",
                "map_height=1",
                "tile_width=2",
                "tile_height=2"
            ]
        );
        assert_eq!(lines.len(), 5 + 2);
        assert_eq!(lines[5].split('\t').count(), 4);
    }

    #[test]
    fn test_value_format() {
        let grid = Grid::from_cells(2, 1, vec![0.5, -0.25]).unwrap();
        let mut out = Vec::new();
        write_rows(&mut out, &grid).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), " 0.50000000\t-0.25000000\n");
    }

    #[test]
    fn test_sea_map_header() {
        let map = map();
        let mut out = Vec::new();
        write_sea_map(&mut out, &map, -0.3, map.altitude()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Sea Map\n"));
        assert!(text.contains("\nsea_level=-0.30000000\n"));
    }
}
