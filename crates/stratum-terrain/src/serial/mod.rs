//! Compact binary persistence for fields, layers, tiles and maps.
//!
//! Every entity is written as a one-byte type tag followed by its body.
//! Numbers use a 3-byte encoding:
//!
//! | Kind | Layout |
//! |------|--------|
//! | integer | sign bit + 23-bit magnitude, big-endian |
//! | float | sign bit, 5-bit exponent (bias 16), 18-bit mantissa; value = mantissa * 2^exponent |
//! | boolean | one byte, `0` or `1` |
//!
//! Derived altitudes are never stored. Decoding rebuilds each entity through
//! its validating constructor, which recomputes them.

mod archive;
mod entity;
mod io;
mod numeric;

pub use archive::{FORMAT_VERSION, MAGIC, read_archive, write_archive};
pub use entity::{Persist, deserialize_list, deserialize_tile, serialize_list, serialize_tile};
pub use io::{Reader, Writer};
pub use numeric::{
    FLOAT_MAX, INT_MAX, decode_bool, decode_float, decode_int, encode_bool, encode_float,
    encode_int,
};

use crate::error::TerrainError;

/// Type tag of a vector field.
pub const TAG_VECTOR_FIELD: u8 = 0x01;
/// Type tag of a noise layer.
pub const TAG_NOISE_LAYER: u8 = 0x02;
/// Type tag of a real tile.
pub const TAG_REAL_TILE: u8 = 0x03;
/// Type tag of a tile map.
pub const TAG_TILE_MAP: u8 = 0x04;
/// Type tag of a virtual tile.
pub const TAG_VIRTUAL_TILE: u8 = 0x05;

pub(crate) fn is_known_tag(tag: u8) -> bool {
    matches!(tag, TAG_VECTOR_FIELD..=TAG_VIRTUAL_TILE)
}

/// Errors raised while encoding or decoding.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SerialError {
    /// The type tag does not name any entity kind.
    #[error("unknown type tag 0x{0:02x}")]
    UnknownTag(u8),
    /// The type tag names a different entity kind than the one requested.
    #[error("expected type tag 0x{expected:02x}, found 0x{actual:02x}")]
    UnexpectedTag {
        /// Tag of the requested kind.
        expected: u8,
        /// Tag found in the buffer.
        actual: u8,
    },
    /// The buffer ended early.
    #[error("data truncated: expected {expected} more bytes, got {actual}")]
    Truncated {
        /// Bytes needed by the next field.
        expected: usize,
        /// Bytes left in the buffer.
        actual: usize,
    },
    /// A boolean byte other than 0 or 1.
    #[error("invalid boolean byte {0}")]
    InvalidBool(u8),
    /// A count or dimension decoded as negative.
    #[error("negative length {0}")]
    NegativeLength(i64),
    /// An integer does not fit in 23 bits of magnitude.
    #[error("integer {0} out of encodable range")]
    IntOutOfRange(i64),
    /// A float is too large for the 3-byte encoding.
    #[error("float {0} out of encodable range")]
    FloatOutOfRange(f64),
    /// NaN or infinity cannot be encoded.
    #[error("float {0} is not finite")]
    NonFiniteFloat(f64),
    /// The archive does not start with the expected magic bytes.
    #[error("invalid magic bytes")]
    InvalidMagic,
    /// The archive format version is not supported by this build.
    #[error("unsupported format version: {0}")]
    UnsupportedVersion(u8),
    /// Bytes remain after the archived map.
    #[error("{0} trailing bytes after archive")]
    TrailingBytes(usize),
    /// The decoded values violate an entity invariant.
    #[error("invalid content: {0}")]
    InvalidContent(#[from] TerrainError),
}
