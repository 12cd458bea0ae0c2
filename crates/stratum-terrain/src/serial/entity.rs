//! Tagged encodings of each entity kind.

use glam::DVec2;

use super::io::{Reader, Writer};
use super::{
    SerialError, TAG_NOISE_LAYER, TAG_REAL_TILE, TAG_TILE_MAP, TAG_VECTOR_FIELD, TAG_VIRTUAL_TILE,
    is_known_tag,
};
use crate::noise_layer::NoiseLayer;
use crate::tile::{RealTile, Tile, VirtualTile};
use crate::tile_map::{MacroIndexing, TileMap};
use crate::vector_field::VectorField;

/// An entity with a type tag and a binary body.
pub trait Persist: Sized {
    /// One-byte type tag written before the body.
    const TAG: u8;

    fn write_body(&self, w: &mut Writer) -> Result<(), SerialError>;

    fn read_body(r: &mut Reader<'_>) -> Result<Self, SerialError>;

    /// Tag followed by body.
    fn serialize(&self) -> Result<Vec<u8>, SerialError> {
        let mut w = Writer::new();
        self.write_to(&mut w)?;
        Ok(w.into_bytes())
    }

    fn write_to(&self, w: &mut Writer) -> Result<(), SerialError> {
        w.write_u8(Self::TAG);
        self.write_body(w)
    }

    /// Decode one entity and return the bytes that follow it.
    fn deserialize(bytes: &[u8]) -> Result<(Self, &[u8]), SerialError> {
        let mut r = Reader::new(bytes);
        let value = Self::read_from(&mut r)?;
        Ok((value, r.rest()))
    }

    fn read_from(r: &mut Reader<'_>) -> Result<Self, SerialError> {
        let tag = r.read_u8()?;
        check_tag(Self::TAG, tag)?;
        Self::read_body(r)
    }
}

fn check_tag(expected: u8, actual: u8) -> Result<(), SerialError> {
    if actual == expected {
        Ok(())
    } else if is_known_tag(actual) {
        Err(SerialError::UnexpectedTag { expected, actual })
    } else {
        Err(SerialError::UnknownTag(actual))
    }
}

/// Encode a list as an is-list marker, a count and each element.
pub fn serialize_list<T: Persist>(items: &[T]) -> Result<Vec<u8>, SerialError> {
    let mut w = Writer::new();
    write_list(items, &mut w)?;
    Ok(w.into_bytes())
}

/// Decode a list. A `false` marker is followed by exactly one element.
pub fn deserialize_list<T: Persist>(bytes: &[u8]) -> Result<(Vec<T>, &[u8]), SerialError> {
    let mut r = Reader::new(bytes);
    let items = read_list(&mut r)?;
    Ok((items, r.rest()))
}

fn write_list<T: Persist>(items: &[T], w: &mut Writer) -> Result<(), SerialError> {
    w.write_bool(true);
    w.write_len(items.len())?;
    items.iter().try_for_each(|item| item.write_to(w))
}

fn read_list<T: Persist>(r: &mut Reader<'_>) -> Result<Vec<T>, SerialError> {
    if !r.read_bool()? {
        return Ok(vec![T::read_from(r)?]);
    }
    let count = r.read_len()?;
    // Each element needs at least a tag byte.
    let mut items = Vec::with_capacity(count.min(r.rest().len()));
    for _ in 0..count {
        items.push(T::read_from(r)?);
    }
    Ok(items)
}

/// Encode either kind of tile under its own tag.
pub fn serialize_tile(tile: &Tile) -> Result<Vec<u8>, SerialError> {
    match tile {
        Tile::Real(tile) => tile.serialize(),
        Tile::Virtual(tile) => tile.serialize(),
    }
}

/// Decode either kind of tile, dispatching on the tag.
pub fn deserialize_tile(bytes: &[u8]) -> Result<(Tile, &[u8]), SerialError> {
    let mut r = Reader::new(bytes);
    let tile = match r.peek_u8()? {
        TAG_REAL_TILE => Tile::Real(RealTile::read_from(&mut r)?),
        TAG_VIRTUAL_TILE => Tile::Virtual(VirtualTile::read_from(&mut r)?),
        tag if is_known_tag(tag) => {
            return Err(SerialError::UnexpectedTag {
                expected: TAG_REAL_TILE,
                actual: tag,
            });
        }
        tag => return Err(SerialError::UnknownTag(tag)),
    };
    Ok((tile, r.rest()))
}

impl Persist for VectorField {
    const TAG: u8 = TAG_VECTOR_FIELD;

    fn write_body(&self, w: &mut Writer) -> Result<(), SerialError> {
        w.write_len(self.width())?;
        w.write_len(self.height())?;
        for v in self.vectors() {
            w.write_float(v.x)?;
            w.write_float(v.y)?;
        }
        Ok(())
    }

    fn read_body(r: &mut Reader<'_>) -> Result<Self, SerialError> {
        let width = r.read_len()?;
        let height = r.read_len()?;
        let count = width.saturating_mul(height);
        let mut vectors = Vec::with_capacity(count.min(r.rest().len() / 6));
        for _ in 0..count {
            let x = r.read_float()?;
            let y = r.read_float()?;
            vectors.push(DVec2::new(x, y));
        }
        Ok(VectorField::from_vectors(width, height, vectors)?.normalized())
    }
}

impl Persist for NoiseLayer {
    const TAG: u8 = TAG_NOISE_LAYER;

    fn write_body(&self, w: &mut Writer) -> Result<(), SerialError> {
        w.write_len(self.density())?;
        self.field().write_to(w)
    }

    fn read_body(r: &mut Reader<'_>) -> Result<Self, SerialError> {
        let density = r.read_len()?;
        let field = VectorField::read_from(r)?;
        Ok(NoiseLayer::new(field, density)?)
    }
}

impl Persist for RealTile {
    const TAG: u8 = TAG_REAL_TILE;

    fn write_body(&self, w: &mut Writer) -> Result<(), SerialError> {
        w.write_float(self.base_altitude())?;
        w.write_len(self.weights().len())?;
        for &weight in self.weights() {
            w.write_float(weight)?;
        }
        write_list(self.layers(), w)
    }

    fn read_body(r: &mut Reader<'_>) -> Result<Self, SerialError> {
        let base_altitude = r.read_float()?;
        let count = r.read_len()?;
        let mut weights = Vec::with_capacity(count.min(r.rest().len() / 3));
        for _ in 0..count {
            weights.push(r.read_float()?);
        }
        let layers = read_list(r)?;
        Ok(RealTile::compose(layers, weights)?.with_base_altitude(base_altitude))
    }
}

impl Persist for VirtualTile {
    const TAG: u8 = TAG_VIRTUAL_TILE;

    fn write_body(&self, w: &mut Writer) -> Result<(), SerialError> {
        w.write_len(self.width)?;
        w.write_len(self.height)?;
        w.write_float(self.base_altitude)
    }

    fn read_body(r: &mut Reader<'_>) -> Result<Self, SerialError> {
        let width = r.read_len()?;
        let height = r.read_len()?;
        let base_altitude = r.read_float()?;
        Ok(VirtualTile::new(width, height, base_altitude))
    }
}

impl Persist for TileMap {
    const TAG: u8 = TAG_TILE_MAP;

    fn write_body(&self, w: &mut Writer) -> Result<(), SerialError> {
        w.write_len(self.map_width())?;
        w.write_len(self.map_height())?;
        w.write_bool(self.indexing() == MacroIndexing::Bordered);
        write_list(self.tiles(), w)?;
        write_list(self.virtual_tiles(), w)
    }

    fn read_body(r: &mut Reader<'_>) -> Result<Self, SerialError> {
        let map_width = r.read_len()?;
        let map_height = r.read_len()?;
        let indexing = if r.read_bool()? {
            MacroIndexing::Bordered
        } else {
            MacroIndexing::Direct
        };
        let tiles = read_list(r)?;
        let virtual_tiles = read_list(r)?;
        Ok(TileMap::new(
            map_width,
            map_height,
            tiles,
            virtual_tiles,
            indexing,
        )?)
    }
}
