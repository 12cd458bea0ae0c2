//! Byte-level writer and cursor used by entity codecs.

use super::SerialError;
use super::numeric::{decode_bool, decode_float, decode_int, encode_bool, encode_float, encode_int};

/// Append-only output buffer.
#[derive(Debug, Default)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_u8(&mut self, byte: u8) {
        self.buf.push(byte);
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn write_int(&mut self, value: i64) -> Result<(), SerialError> {
        self.buf.extend_from_slice(&encode_int(value)?);
        Ok(())
    }

    /// Write a count or dimension.
    pub fn write_len(&mut self, value: usize) -> Result<(), SerialError> {
        let value = i64::try_from(value).map_err(|_| SerialError::IntOutOfRange(i64::MAX))?;
        self.write_int(value)
    }

    pub fn write_float(&mut self, value: f64) -> Result<(), SerialError> {
        self.buf.extend_from_slice(&encode_float(value)?);
        Ok(())
    }

    pub fn write_bool(&mut self, value: bool) {
        self.buf.push(encode_bool(value));
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// Forward-only cursor over an input buffer.
#[derive(Debug, Clone, Copy)]
pub struct Reader<'a> {
    rest: &'a [u8],
}

impl<'a> Reader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { rest: bytes }
    }

    /// Take the next `n` bytes.
    pub fn take(&mut self, n: usize) -> Result<&'a [u8], SerialError> {
        if self.rest.len() < n {
            return Err(SerialError::Truncated {
                expected: n,
                actual: self.rest.len(),
            });
        }
        let (head, tail) = self.rest.split_at(n);
        self.rest = tail;
        Ok(head)
    }

    fn take3(&mut self) -> Result<[u8; 3], SerialError> {
        let bytes = self.take(3)?;
        Ok([bytes[0], bytes[1], bytes[2]])
    }

    pub fn read_u8(&mut self) -> Result<u8, SerialError> {
        Ok(self.take(1)?[0])
    }

    /// Look at the next byte without consuming it.
    pub fn peek_u8(&self) -> Result<u8, SerialError> {
        self.rest.first().copied().ok_or(SerialError::Truncated {
            expected: 1,
            actual: 0,
        })
    }

    pub fn read_int(&mut self) -> Result<i64, SerialError> {
        Ok(decode_int(self.take3()?))
    }

    /// Read a count or dimension, rejecting negative values.
    pub fn read_len(&mut self) -> Result<usize, SerialError> {
        let value = self.read_int()?;
        usize::try_from(value).map_err(|_| SerialError::NegativeLength(value))
    }

    pub fn read_float(&mut self) -> Result<f64, SerialError> {
        Ok(decode_float(self.take3()?))
    }

    pub fn read_bool(&mut self) -> Result<bool, SerialError> {
        decode_bool(self.read_u8()?)
    }

    /// Bytes not yet consumed.
    pub fn rest(&self) -> &'a [u8] {
        self.rest
    }

    /// Advance past bytes consumed by a nested decoder.
    pub fn set_rest(&mut self, rest: &'a [u8]) {
        self.rest = rest;
    }
}
