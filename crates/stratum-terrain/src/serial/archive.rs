//! Standalone map archives.
//!
//! ## Binary Layout
//!
//! | Offset | Size | Field |
//! |--------|------|-------|
//! | 0 | 4 | Magic bytes `[0x53, 0x54, 0x52, 0x4D]` ("STRM") |
//! | 4 | 1 | Format version (`u8`, currently 1) |
//! | 5 | N | Tagged [`TileMap`] |

use super::SerialError;
use super::entity::Persist;
use super::io::Writer;
use crate::tile_map::TileMap;

/// Magic bytes identifying a map archive.
pub const MAGIC: [u8; 4] = *b"STRM";

/// Current archive version.
pub const FORMAT_VERSION: u8 = 1;

/// Wrap a serialized map in the archive header.
pub fn write_archive(map: &TileMap) -> Result<Vec<u8>, SerialError> {
    let mut w = Writer::new();
    w.write_bytes(&MAGIC);
    w.write_u8(FORMAT_VERSION);
    map.write_to(&mut w)?;
    Ok(w.into_bytes())
}

/// Read a map archive. The buffer must hold exactly one archived map.
pub fn read_archive(data: &[u8]) -> Result<TileMap, SerialError> {
    if data.len() < MAGIC.len() || data[..MAGIC.len()] != MAGIC {
        return Err(SerialError::InvalidMagic);
    }
    let Some(&version) = data.get(MAGIC.len()) else {
        return Err(SerialError::Truncated {
            expected: 1,
            actual: 0,
        });
    };
    if version != FORMAT_VERSION {
        return Err(SerialError::UnsupportedVersion(version));
    }
    let (map, rest) = TileMap::deserialize(&data[MAGIC.len() + 1..])?;
    if !rest.is_empty() {
        return Err(SerialError::TrailingBytes(rest.len()));
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::GenerationContext;
    use crate::tile::OctaveParams;
    use crate::tile_map::MapParams;

    fn small_map() -> TileMap {
        let octaves = OctaveParams::zip(&[3], &[3], &[4], &[1.0]).unwrap();
        TileMap::generate(&MapParams::new(2, 2, octaves), &GenerationContext::new(3))
            .unwrap()
            .0
    }

    #[test]
    fn test_archive_header() {
        let bytes = write_archive(&small_map()).unwrap();
        assert_eq!(&bytes[..4], b"STRM");
        assert_eq!(bytes[4], FORMAT_VERSION);
        assert_eq!(read_archive(&bytes).unwrap().map_width(), 2);
    }

    #[test]
    fn test_invalid_magic() {
        assert_eq!(read_archive(b"NOPE\x01").unwrap_err(), SerialError::InvalidMagic);
        assert_eq!(read_archive(b"ST").unwrap_err(), SerialError::InvalidMagic);
    }

    #[test]
    fn test_unsupported_version() {
        let mut bytes = write_archive(&small_map()).unwrap();
        bytes[4] = 9;
        assert_eq!(read_archive(&bytes).unwrap_err(), SerialError::UnsupportedVersion(9));
    }

    #[test]
    fn test_missing_version_and_trailing_bytes() {
        assert!(matches!(
            read_archive(b"STRM"),
            Err(SerialError::Truncated { .. })
        ));
        let mut bytes = write_archive(&small_map()).unwrap();
        bytes.push(0);
        assert_eq!(read_archive(&bytes).unwrap_err(), SerialError::TrailingBytes(1));
    }
}
