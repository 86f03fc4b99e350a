/*! NATIVE encoding helpers layered on top of [`crate::endian`].
 *
 * NATIVE nvlist payloads use the host's endianness and naturally align each
 * value to its own width, unlike XDR's fixed big-endian, 4-byte-aligned
 * representation. Strings are length-prefixed with an 8 byte count and are
 * not padded.
 */

use core::fmt;
use core::result::Result;
use core::result::Result::{Err, Ok};

#[cfg(feature = "std")]
use std::error;

#[cfg(feature = "std")]
use std::vec::Vec;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::endian::{Decoder, Endian};

pub use crate::endian::DecodeError;

/** Decodes a NATIVE length-prefixed string.
 *
 * NATIVE strings are prefixed with an 8 byte length and carry no padding.
 *
 * # Errors
 *
 * Returns [`DecodeError`] if there are not enough bytes, the length does not
 * fit in a [`usize`], or the bytes are not valid UTF8.
 */
pub fn get_str<'a>(decoder: &Decoder<'a>) -> Result<&'a str, StrError> {
    let len = decoder.get_u64().map_err(StrError::Decode)?;
    let len = usize::try_from(len).map_err(|_| StrError::LengthOverflow { len })?;
    let bytes = decoder.get_bytes(len).map_err(StrError::Decode)?;
    core::str::from_utf8(bytes).map_err(StrError::Utf8)
}

/** Errors from decoding a NATIVE string. */
#[derive(Debug)]
pub enum StrError {
    Decode(DecodeError),
    LengthOverflow { len: u64 },
    Utf8(core::str::Utf8Error),
}

impl fmt::Display for StrError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrError::Decode(e) => write!(f, "Native string decode error: {e}"),
            StrError::LengthOverflow { len } => {
                write!(f, "Native string length {len} does not fit in usize")
            }
            StrError::Utf8(e) => write!(f, "Native string is not valid UTF8: {e}"),
        }
    }
}

#[cfg(feature = "std")]
impl error::Error for StrError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            StrError::Decode(e) => Some(e),
            StrError::Utf8(e) => Some(e),
            _ => None,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////

/** A growable NATIVE encoder.
 *
 * Unlike [`crate::endian::Encoder`], which writes into a caller-supplied,
 * fixed-size slice, [`Writer`] owns a growable buffer: nvlist pair bodies are
 * encoded before their size is known, so there is no pre-sized destination to
 * borrow.
 */
#[derive(Debug)]
pub struct Writer {
    data: Vec<u8>,
    endian: Endian,
}

impl Writer {
    /// Creates an empty [`Writer`] for the given [`Endian`].
    pub fn new(endian: Endian) -> Writer {
        Writer {
            data: Vec::new(),
            endian,
        }
    }

    /// Returns the encoded bytes so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the [`Writer`], returning the encoded bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Returns the number of bytes written so far.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the [`Endian`] this writer encodes in.
    pub fn endian(&self) -> Endian {
        self.endian
    }

    /// Pads with zeros to align the next value to `width` bytes.
    pub fn align(&mut self, width: usize) {
        let remainder = self.data.len() % width;
        if remainder != 0 {
            for _ in 0..(width - remainder) {
                self.data.push(0);
            }
        }
    }

    pub fn put_u8(&mut self, value: u8) {
        self.data.push(value);
    }

    pub fn put_i8(&mut self, value: i8) {
        self.put_u8(value as u8);
    }

    pub fn put_bool(&mut self, value: bool) {
        self.put_u8(if value { 1 } else { 0 });
    }

    pub fn put_u16(&mut self, value: u16) {
        self.align(2);
        match self.endian {
            Endian::Big => self.data.extend_from_slice(&value.to_be_bytes()),
            Endian::Little => self.data.extend_from_slice(&value.to_le_bytes()),
        }
    }

    pub fn put_i16(&mut self, value: i16) {
        self.put_u16(value as u16);
    }

    pub fn put_u32(&mut self, value: u32) {
        self.align(4);
        match self.endian {
            Endian::Big => self.data.extend_from_slice(&value.to_be_bytes()),
            Endian::Little => self.data.extend_from_slice(&value.to_le_bytes()),
        }
    }

    pub fn put_i32(&mut self, value: i32) {
        self.put_u32(value as u32);
    }

    pub fn put_u64(&mut self, value: u64) {
        self.align(8);
        match self.endian {
            Endian::Big => self.data.extend_from_slice(&value.to_be_bytes()),
            Endian::Little => self.data.extend_from_slice(&value.to_le_bytes()),
        }
    }

    pub fn put_i64(&mut self, value: i64) {
        self.put_u64(value as u64);
    }

    pub fn put_f32(&mut self, value: f32) {
        self.put_u32(value.to_bits());
    }

    pub fn put_f64(&mut self, value: f64) {
        self.put_u64(value.to_bits());
    }

    /// Appends raw bytes with no alignment or length prefix.
    pub fn put_raw_bytes(&mut self, value: &[u8]) {
        self.data.extend_from_slice(value);
    }

    /// Encodes an 8 byte length prefix followed by the raw, unpadded bytes.
    pub fn put_bytes(&mut self, value: &[u8]) {
        self.put_u64(value.len() as u64);
        self.data.extend_from_slice(value);
    }

    /// Encodes an 8 byte length prefix followed by the raw, unpadded string.
    pub fn put_str(&mut self, value: &str) {
        self.put_bytes(value.as_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writer_aligns_natural_width() {
        let mut w = Writer::new(Endian::Big);
        w.put_u8(1);
        w.put_u32(2);
        assert_eq!(w.as_bytes(), &[1, 0, 0, 0, 0, 0, 0, 2]);
    }

    #[test]
    fn writer_string_has_no_padding() {
        let mut w = Writer::new(Endian::Big);
        w.put_str("ab");
        assert_eq!(
            w.as_bytes(),
            &[0, 0, 0, 0, 0, 0, 0, 2, b'a', b'b']
        );
    }

    #[test]
    fn round_trip_string() {
        let mut w = Writer::new(Endian::Little);
        w.put_str("hello");
        let bytes = w.into_bytes();
        let decoder = Decoder::from_bytes(&bytes, Endian::Little);
        assert_eq!(get_str(&decoder).unwrap(), "hello");
    }
}
