/*! The nvlist wire codec: stream header, list prologue, and pair framing,
 * for both the XDR and NATIVE encodings.
 *
 * Header
 * ======
 * The first four bytes of the top-level stream are:
 * - [`kind::Encoding`]
 * - endian byte (NATIVE only; ignored, but stamped on encode, for XDR)
 * - two reserved zero bytes
 *
 * List
 * ====
 * A list starts with a version ([`i32`], default 0) and flags ([`u32`]),
 * followed by a sequence of pair records, terminated by a record whose
 * `encoded_size` is zero.
 *
 * Pair
 * ====
 * A pair record is:
 * - `encoded_size` (of the entire record, including itself and `decoded_size`)
 * - `decoded_size` (opaque; preserved on round-trip but not otherwise
 *   consumed by this decoder)
 * - name (length-prefixed string)
 * - [`kind::DataType`] code
 * - element count (0 for [`kind::DataType::Boolean`], 1 for scalars, N for
 *   arrays)
 * - value bytes, shaped by the data type and count
 */

use core::fmt;
use core::result::Result;
use core::result::Result::{Err, Ok};

#[cfg(feature = "std")]
use std::error;
#[cfg(feature = "std")]
use std::string::String;
#[cfg(feature = "std")]
use std::vec::Vec;

#[cfg(not(feature = "std"))]
use alloc::string::String;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::endian::{self, Endian};
use crate::kind::{DataType, Encoding, InvalidCountError, Unique};
use crate::limits::Limits;
use crate::native;
use crate::value::{NvList, Value};
use crate::xdr;

////////////////////////////////////////////////////////////////////////////////
// Decoding
////////////////////////////////////////////////////////////////////////////////

/// Decodes a complete nvlist stream (stream header + top-level list) using
/// [`Limits::default`].
pub fn decode(data: &[u8]) -> Result<NvList, DecodeError> {
    decode_with_limits(data, Limits::default())
}

/// Decodes a complete nvlist stream under explicit [`Limits`].
pub fn decode_with_limits(data: &[u8], limits: Limits) -> Result<NvList, DecodeError> {
    if let Some(max_size) = limits.max_size {
        if data.len() > max_size {
            return Err(DecodeError::OversizedInput {
                length: data.len(),
                max_size,
            });
        }
    }

    if data.len() < 4 {
        return Err(DecodeError::EndOfInput {
            offset: 0,
            length: data.len(),
            count: 4,
            detail: "stream header is truncated",
        });
    }

    let (header, rest) = data.split_at(4);

    let encoding = match num::FromPrimitive::from_u8(header[0]) {
        Some(v) => v,
        None => return Err(DecodeError::BadEncoding { encoding: header[0] }),
    };

    let endian_byte = header[1];

    if header[2] != 0 || header[3] != 0 {
        return Err(DecodeError::InvalidReservedBytes {
            reserved: [header[2], header[3]],
        });
    }

    match encoding {
        Encoding::Xdr => {
            let decoder = xdr::Decoder::from_bytes(rest);
            decode_list_body_xdr(&decoder, 0, &limits)
        }
        Encoding::Native => {
            let endian = match endian_byte {
                0 => Endian::Big,
                1 => Endian::Little,
                _ => return Err(DecodeError::BadEndian { endian: endian_byte }),
            };
            let decoder = endian::Decoder::from_bytes(rest, endian);
            decode_list_body_native(&decoder, 0, &limits)
        }
    }
}

fn check_depth(depth: usize, limits: &Limits) -> Result<(), DecodeError> {
    if depth > limits.max_depth {
        Err(DecodeError::DepthExceeded {
            depth,
            max_depth: limits.max_depth,
        })
    } else {
        Ok(())
    }
}

fn check_name_length(name: &str, limits: &Limits) -> Result<(), DecodeError> {
    if let Some(max_name_length) = limits.max_name_length {
        if name.len() > max_name_length {
            return Err(DecodeError::NameTooLong {
                length: name.len(),
                max_name_length,
            });
        }
    }
    Ok(())
}

fn decode_unique(flags: u32) -> Result<Unique, DecodeError> {
    let unique_flags = flags & 0x3;
    if unique_flags != flags {
        return Err(DecodeError::InvalidFlags { flags });
    }
    match num::FromPrimitive::from_u32(unique_flags) {
        Some(v) => Ok(v),
        None => Err(DecodeError::InvalidFlags { flags }),
    }
}

/** Decodes one list body (version, flags, pairs, terminator) from an XDR
 * decoder.
 *
 * Used both for the top-level list (after the stream header) and for every
 * nested list, which inherits the outer encoding and omits its own stream
 * header.
 */
fn decode_list_body_xdr(
    decoder: &xdr::Decoder,
    depth: usize,
    limits: &Limits,
) -> Result<NvList, DecodeError> {
    check_depth(depth, limits)?;

    let version = decoder.get_i32()?;
    let flags = decoder.get_u32()?;
    let unique = decode_unique(flags)?;

    let mut list = NvList::with_unique(unique);
    list.version = version;

    loop {
        let starting_length = decoder.len();

        let encoded_size = decoder.get_usize()?;
        if encoded_size == 0 {
            // Resolved ambiguity: the terminator is a single zero
            // `encoded_size` field, matching the literal `empty` fixture
            // bytes. `decoded_size` is only read for real pairs below.
            break;
        }
        let decoded_size = decoder.get_usize()?;
        let _ = decoded_size;

        let name = decoder.get_str()?;
        check_name_length(name, limits)?;
        let name = String::from(name);

        let data_type_code = decoder.get_u32()?;
        let data_type: DataType = match num::FromPrimitive::from_u32(data_type_code) {
            Some(v) => v,
            None => {
                return Err(DecodeError::UnknownKind {
                    code: data_type_code,
                })
            }
        };

        let count = decoder.get_usize()?;

        let bytes_used = starting_length - decoder.len();
        let bytes_rem = match encoded_size.checked_sub(bytes_used) {
            Some(v) => v,
            None => {
                return Err(DecodeError::FramingMismatch {
                    encoded_size,
                    used: bytes_used,
                })
            }
        };

        data_type.check_count(count)?;

        let value = decode_value_xdr(decoder, data_type, count, bytes_rem, depth, limits)?;

        let bytes_used = starting_length - decoder.len();
        if bytes_used != encoded_size {
            return Err(DecodeError::FramingMismatch {
                encoded_size,
                used: bytes_used,
            });
        }

        list.push(name, value);
    }

    Ok(list)
}

/// Width in bytes of one XDR-encoded array element for the given data type.
fn xdr_array_width(data_type: DataType) -> usize {
    match data_type {
        DataType::Int64Array | DataType::Uint64Array => 8,
        _ => 4,
    }
}

fn decode_value_xdr(
    decoder: &xdr::Decoder,
    data_type: DataType,
    count: usize,
    bytes_rem: usize,
    depth: usize,
    limits: &Limits,
) -> Result<Value, DecodeError> {
    Ok(match data_type {
        DataType::Boolean => Value::Boolean,

        DataType::Byte => Value::Byte(decoder.get_u8()?),
        DataType::Int16 => Value::Int16(decoder.get_i16()?),
        DataType::Uint16 => Value::Uint16(decoder.get_u16()?),
        DataType::Int32 => Value::Int32(decoder.get_i32()?),
        DataType::Uint32 => Value::Uint32(decoder.get_u32()?),
        DataType::Int64 => Value::Int64(decoder.get_i64()?),
        DataType::Uint64 => Value::Uint64(decoder.get_u64()?),
        DataType::String => Value::String(String::from(decoder.get_str()?)),

        DataType::ByteArray => {
            check_array_bounds(count, 1, bytes_rem)?;
            Value::ByteArray(decoder.get_bytes()?.to_vec())
        }
        DataType::Int16Array => {
            let sub = bounded_sub_decoder(decoder, data_type, count, bytes_rem)?;
            Value::Int16Array(array_from_xdr(&sub, count, xdr::Decoder::get_i16)?)
        }
        DataType::Uint16Array => {
            let sub = bounded_sub_decoder(decoder, data_type, count, bytes_rem)?;
            Value::Uint16Array(array_from_xdr(&sub, count, xdr::Decoder::get_u16)?)
        }
        DataType::Int32Array => {
            let sub = bounded_sub_decoder(decoder, data_type, count, bytes_rem)?;
            Value::Int32Array(array_from_xdr(&sub, count, xdr::Decoder::get_i32)?)
        }
        DataType::Uint32Array => {
            let sub = bounded_sub_decoder(decoder, data_type, count, bytes_rem)?;
            Value::Uint32Array(array_from_xdr(&sub, count, xdr::Decoder::get_u32)?)
        }
        DataType::Int64Array => {
            let sub = bounded_sub_decoder(decoder, data_type, count, bytes_rem)?;
            Value::Int64Array(array_from_xdr(&sub, count, xdr::Decoder::get_i64)?)
        }
        DataType::Uint64Array => {
            let sub = bounded_sub_decoder(decoder, data_type, count, bytes_rem)?;
            Value::Uint64Array(array_from_xdr(&sub, count, xdr::Decoder::get_u64)?)
        }
        DataType::StringArray => {
            // Each element consumes at least a 4 byte XDR length prefix;
            // bound the reserved capacity before allocating so a fabricated
            // count can't force a multi-gigabyte allocation on its own.
            check_array_bounds(count, 4, bytes_rem)?;
            let sub = xdr::Decoder::from_bytes(decoder.get_n_bytes(bytes_rem)?);
            let mut strings = Vec::with_capacity(count);
            for _ in 0..count {
                strings.push(String::from(sub.get_str()?));
            }
            if !sub.is_empty() {
                return Err(DecodeError::FramingMismatch {
                    encoded_size: bytes_rem,
                    used: bytes_rem - sub.len(),
                });
            }
            Value::StringArray(strings)
        }

        DataType::HrTime => Value::HrTime(decoder.get_i64()?),

        DataType::NvList => {
            let sub = xdr::Decoder::from_bytes(decoder.get_n_bytes(bytes_rem)?);
            let nested = decode_list_body_xdr(&sub, depth + 1, limits)?;
            if !sub.is_empty() {
                return Err(DecodeError::FramingMismatch {
                    encoded_size: bytes_rem,
                    used: bytes_rem - sub.len(),
                });
            }
            Value::Nvlist(nested)
        }
        DataType::NvListArray => {
            // Each nested list consumes at least a 4 byte version + 4 byte
            // flags + 4 byte terminator prologue.
            check_array_bounds(count, 12, bytes_rem)?;
            let sub = xdr::Decoder::from_bytes(decoder.get_n_bytes(bytes_rem)?);
            let mut lists = Vec::with_capacity(count);
            for _ in 0..count {
                lists.push(decode_list_body_xdr(&sub, depth + 1, limits)?);
            }
            if !sub.is_empty() {
                return Err(DecodeError::FramingMismatch {
                    encoded_size: bytes_rem,
                    used: bytes_rem - sub.len(),
                });
            }
            Value::NvlistArray(lists)
        }

        DataType::BooleanValue => Value::BooleanValue(decoder.get_bool()?),

        DataType::Int8 => Value::Int8(decoder.get_i8()?),
        DataType::Uint8 => Value::Uint8(decoder.get_u8()?),

        DataType::BooleanArray => {
            let sub = bounded_sub_decoder(decoder, data_type, count, bytes_rem)?;
            let mut values = Vec::with_capacity(count);
            for _ in 0..count {
                values.push(sub.get_bool()?);
            }
            Value::BooleanArray(values)
        }
        DataType::Int8Array => {
            let sub = bounded_sub_decoder(decoder, data_type, count, bytes_rem)?;
            Value::Int8Array(array_from_xdr(&sub, count, xdr::Decoder::get_i8)?)
        }
        DataType::Uint8Array => {
            let sub = bounded_sub_decoder(decoder, data_type, count, bytes_rem)?;
            Value::Uint8Array(array_from_xdr(&sub, count, xdr::Decoder::get_u8)?)
        }

        DataType::Double => Value::Double(decoder.get_f64()?),
    })
}

fn check_array_bounds(count: usize, width: usize, bytes_rem: usize) -> Result<(), DecodeError> {
    let needed = match count.checked_mul(width) {
        Some(v) => v,
        None => {
            return Err(DecodeError::OversizedArray {
                needed: usize::MAX,
                available: bytes_rem,
            })
        }
    };
    if needed > bytes_rem {
        return Err(DecodeError::OversizedArray {
            needed,
            available: bytes_rem,
        });
    }
    Ok(())
}

/// Slices exactly `count * xdr_array_width(data_type)` bytes for an array
/// payload, after checking the claimed size against what remains in this
/// pair's record -- before any element storage is allocated.
fn bounded_sub_decoder<'a>(
    decoder: &xdr::Decoder<'a>,
    data_type: DataType,
    count: usize,
    bytes_rem: usize,
) -> Result<xdr::Decoder<'a>, DecodeError> {
    let width = xdr_array_width(data_type);
    check_array_bounds(count, width, bytes_rem)?;
    Ok(xdr::Decoder::from_bytes(
        decoder.get_n_bytes(count * width)?,
    ))
}

fn array_from_xdr<T>(
    decoder: &xdr::Decoder,
    count: usize,
    get: fn(&xdr::Decoder) -> Result<T, xdr::DecodeError>,
) -> Result<Vec<T>, DecodeError> {
    let mut values = Vec::with_capacity(count);
    for _ in 0..count {
        values.push(get(decoder)?);
    }
    Ok(values)
}

/** Decodes one list body from a NATIVE decoder. See [`decode_list_body_xdr`]
 * for the shared shape; NATIVE differs in element width and string framing.
 */
fn decode_list_body_native(
    decoder: &endian::Decoder,
    depth: usize,
    limits: &Limits,
) -> Result<NvList, DecodeError> {
    check_depth(depth, limits)?;

    let version = decoder.get_i32()?;
    let flags = decoder.get_u32()?;
    let unique = decode_unique(flags)?;

    let mut list = NvList::with_unique(unique);
    list.version = version;

    loop {
        let encoded_size = decoder.get_u32()? as usize;
        if encoded_size == 0 {
            break;
        }
        let decoded_size = decoder.get_u32()? as usize;
        let _ = decoded_size;

        // The encoder writes name/kind/count/value into a writer of its own,
        // starting at a local offset of zero (see `encode_pair_native`), so
        // every `align()` call it makes is relative to that local origin,
        // not the continuous stream offset. Decode the rest of this record
        // from a matching sub-decoder so alignment lines up the same way.
        let body_len = match encoded_size.checked_sub(8) {
            Some(v) => v,
            None => {
                return Err(DecodeError::FramingMismatch {
                    encoded_size,
                    used: 8,
                })
            }
        };
        let body = endian::Decoder::from_bytes(decoder.get_bytes(body_len)?, decoder.endian());

        let name = native::get_str(&body).map_err(DecodeError::NativeStr)?;
        check_name_length(name, limits)?;
        let name = String::from(name);

        body.align(4)?;
        let data_type_code = body.get_u32()?;
        let data_type: DataType = match num::FromPrimitive::from_u32(data_type_code) {
            Some(v) => v,
            None => {
                return Err(DecodeError::UnknownKind {
                    code: data_type_code,
                })
            }
        };

        body.align(4)?;
        let count = body.get_u32()? as usize;

        let bytes_rem = body.len();

        data_type.check_count(count)?;

        let value = decode_value_native(&body, data_type, count, bytes_rem, depth, limits)?;

        if !body.is_empty() {
            return Err(DecodeError::FramingMismatch {
                encoded_size,
                used: encoded_size - body.len(),
            });
        }

        list.push(name, value);
    }

    Ok(list)
}

fn decode_value_native(
    decoder: &endian::Decoder,
    data_type: DataType,
    count: usize,
    bytes_rem: usize,
    depth: usize,
    limits: &Limits,
) -> Result<Value, DecodeError> {
    Ok(match data_type {
        DataType::Boolean => Value::Boolean,

        DataType::Byte => Value::Byte(decoder.get_u8()?),
        DataType::Int16 => {
            decoder.align(2)?;
            Value::Int16(decoder.get_i16()?)
        }
        DataType::Uint16 => {
            decoder.align(2)?;
            Value::Uint16(decoder.get_u16()?)
        }
        DataType::Int32 => {
            decoder.align(4)?;
            Value::Int32(decoder.get_i32()?)
        }
        DataType::Uint32 => {
            decoder.align(4)?;
            Value::Uint32(decoder.get_u32()?)
        }
        DataType::Int64 => {
            decoder.align(8)?;
            Value::Int64(decoder.get_i64()?)
        }
        DataType::Uint64 => {
            decoder.align(8)?;
            Value::Uint64(decoder.get_u64()?)
        }
        DataType::String => {
            Value::String(String::from(native::get_str(decoder).map_err(DecodeError::NativeStr)?))
        }

        DataType::ByteArray => {
            check_array_bounds(count, 1, bytes_rem)?;
            Value::ByteArray(decoder.get_bytes(count)?.to_vec())
        }
        DataType::Int16Array => {
            check_array_bounds(count, 2, bytes_rem)?;
            decoder.align(2)?;
            let mut values = Vec::with_capacity(count);
            for _ in 0..count {
                values.push(decoder.get_i16()?);
            }
            Value::Int16Array(values)
        }
        DataType::Uint16Array => {
            check_array_bounds(count, 2, bytes_rem)?;
            decoder.align(2)?;
            let mut values = Vec::with_capacity(count);
            for _ in 0..count {
                values.push(decoder.get_u16()?);
            }
            Value::Uint16Array(values)
        }
        DataType::Int32Array => {
            check_array_bounds(count, 4, bytes_rem)?;
            decoder.align(4)?;
            let mut values = Vec::with_capacity(count);
            for _ in 0..count {
                values.push(decoder.get_i32()?);
            }
            Value::Int32Array(values)
        }
        DataType::Uint32Array => {
            check_array_bounds(count, 4, bytes_rem)?;
            decoder.align(4)?;
            let mut values = Vec::with_capacity(count);
            for _ in 0..count {
                values.push(decoder.get_u32()?);
            }
            Value::Uint32Array(values)
        }
        DataType::Int64Array => {
            check_array_bounds(count, 8, bytes_rem)?;
            decoder.align(8)?;
            let mut values = Vec::with_capacity(count);
            for _ in 0..count {
                values.push(decoder.get_i64()?);
            }
            Value::Int64Array(values)
        }
        DataType::Uint64Array => {
            check_array_bounds(count, 8, bytes_rem)?;
            decoder.align(8)?;
            let mut values = Vec::with_capacity(count);
            for _ in 0..count {
                values.push(decoder.get_u64()?);
            }
            Value::Uint64Array(values)
        }
        DataType::StringArray => {
            // Each element consumes at least an 8 byte NATIVE length prefix;
            // bound the reserved capacity before allocating.
            check_array_bounds(count, 8, bytes_rem)?;
            let mut strings = Vec::with_capacity(count);
            for _ in 0..count {
                strings.push(String::from(
                    native::get_str(decoder).map_err(DecodeError::NativeStr)?,
                ));
            }
            Value::StringArray(strings)
        }

        DataType::HrTime => {
            decoder.align(8)?;
            Value::HrTime(decoder.get_i64()?)
        }

        DataType::NvList => {
            check_array_bounds(1, 1, bytes_rem)?;
            let sub_bytes = decoder.get_bytes(bytes_rem)?;
            let sub = endian::Decoder::from_bytes(sub_bytes, decoder.endian());
            let nested = decode_list_body_native(&sub, depth + 1, limits)?;
            Value::Nvlist(nested)
        }
        DataType::NvListArray => {
            // Each nested list consumes at least a 4 byte version + 4 byte
            // flags + 4 byte terminator prologue.
            check_array_bounds(count, 12, bytes_rem)?;
            let sub_bytes = decoder.get_bytes(bytes_rem)?;
            let sub = endian::Decoder::from_bytes(sub_bytes, decoder.endian());
            let mut lists = Vec::with_capacity(count);
            for _ in 0..count {
                lists.push(decode_list_body_native(&sub, depth + 1, limits)?);
            }
            Value::NvlistArray(lists)
        }

        DataType::BooleanValue => {
            decoder.align(4)?;
            Value::BooleanValue(decoder.get_u32()? != 0)
        }

        DataType::Int8 => Value::Int8(decoder.get_i8()?),
        DataType::Uint8 => Value::Uint8(decoder.get_u8()?),

        DataType::BooleanArray => {
            check_array_bounds(count, 4, bytes_rem)?;
            decoder.align(4)?;
            let mut values = Vec::with_capacity(count);
            for _ in 0..count {
                values.push(decoder.get_u32()? != 0);
            }
            Value::BooleanArray(values)
        }
        DataType::Int8Array => {
            check_array_bounds(count, 1, bytes_rem)?;
            let mut values = Vec::with_capacity(count);
            for _ in 0..count {
                values.push(decoder.get_i8()?);
            }
            Value::Int8Array(values)
        }
        DataType::Uint8Array => {
            check_array_bounds(count, 1, bytes_rem)?;
            let mut values = Vec::with_capacity(count);
            for _ in 0..count {
                values.push(decoder.get_u8()?);
            }
            Value::Uint8Array(values)
        }

        DataType::Double => {
            decoder.align(8)?;
            Value::Double(decoder.get_f64()?)
        }
    })
}

////////////////////////////////////////////////////////////////////////////////
// Encoding
////////////////////////////////////////////////////////////////////////////////

/// Encodes a complete nvlist stream (stream header + top-level list) under
/// the given [`Encoding`].
///
/// # Examples
///
/// ```
/// use nvpair::kind::Encoding;
/// use nvpair::nv;
/// use nvpair::value::NvList;
///
/// let list = NvList::new();
/// let bytes = nv::encode(&list, Encoding::Xdr);
/// assert_eq!(bytes, vec![0x01, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00]);
///
/// let decoded = nv::decode(&bytes).unwrap();
/// assert_eq!(decoded, list);
/// ```
pub fn encode(list: &NvList, encoding: Encoding) -> Vec<u8> {
    let mut out = Vec::new();
    match encoding {
        Encoding::Xdr => {
            out.push(Encoding::Xdr as u8);
            // XDR ignores the endian byte on decode; stamp little, matching
            // the reference encoder's observed behavior.
            out.push(1);
            out.push(0);
            out.push(0);
            out.extend(encode_list_body_xdr(list));
        }
        Encoding::Native => {
            out.push(Encoding::Native as u8);
            out.push(match endian::NATIVE {
                Endian::Big => 0,
                Endian::Little => 1,
            });
            out.push(0);
            out.push(0);
            out.extend(encode_list_body_native(list));
        }
    }
    out
}

fn unique_flags(unique: Unique) -> u32 {
    unique as u32
}

fn encode_list_body_xdr(list: &NvList) -> Vec<u8> {
    let mut enc = xdr::Encoder::new();
    enc.put_i32(list.version);
    enc.put_u32(unique_flags(list.unique));

    for pair in list.pairs() {
        encode_pair_xdr(&mut enc, &pair.name, &pair.value);
    }

    // Terminator: a single 4 byte zero `encoded_size`.
    enc.put_u32(0);

    enc.into_bytes()
}

fn encode_pair_xdr(enc: &mut xdr::Encoder, name: &str, value: &Value) {
    let mut body = xdr::Encoder::new();
    body.put_str(name);
    body.put_i32(value.data_type() as i32);
    body.put_usize(value.element_count());
    encode_value_xdr(&mut body, value);
    let body_bytes = body.into_bytes();

    // encoded_size covers itself, decoded_size, and the body.
    let encoded_size = 4 + 4 + body_bytes.len();
    // decoded_size is opaque to this decoder; a self-produced stream only
    // needs encode-decode-encode stability, not reproduction of the
    // reference allocator's in-memory size arithmetic.
    let decoded_size = encoded_size;

    enc.put_usize(encoded_size);
    enc.put_usize(decoded_size);
    enc.extend_encoded(&body_bytes);
}

fn encode_value_xdr(body: &mut xdr::Encoder, value: &Value) {
    match value {
        Value::Boolean => {}

        Value::Byte(v) => body.put_u8(*v),
        Value::Int16(v) => body.put_i16(*v),
        Value::Uint16(v) => body.put_u16(*v),
        Value::Int32(v) => body.put_i32(*v),
        Value::Uint32(v) => body.put_u32(*v),
        Value::Int64(v) => body.put_i64(*v),
        Value::Uint64(v) => body.put_u64(*v),
        Value::String(v) => body.put_str(v),

        Value::ByteArray(v) => body.put_bytes(v),
        Value::Int16Array(v) => v.iter().for_each(|x| body.put_i16(*x)),
        Value::Uint16Array(v) => v.iter().for_each(|x| body.put_u16(*x)),
        Value::Int32Array(v) => v.iter().for_each(|x| body.put_i32(*x)),
        Value::Uint32Array(v) => v.iter().for_each(|x| body.put_u32(*x)),
        Value::Int64Array(v) => v.iter().for_each(|x| body.put_i64(*x)),
        Value::Uint64Array(v) => v.iter().for_each(|x| body.put_u64(*x)),
        Value::StringArray(v) => v.iter().for_each(|s| body.put_str(s)),

        Value::HrTime(v) => body.put_i64(*v),

        Value::Nvlist(v) => body.extend_encoded(&encode_list_body_xdr(v)),
        Value::NvlistArray(v) => v
            .iter()
            .for_each(|nested| body.extend_encoded(&encode_list_body_xdr(nested))),

        Value::BooleanValue(v) => body.put_bool(*v),

        Value::Int8(v) => body.put_i8(*v),
        Value::Uint8(v) => body.put_u8(*v),

        Value::BooleanArray(v) => v.iter().for_each(|b| body.put_bool(*b)),
        Value::Int8Array(v) => v.iter().for_each(|x| body.put_i8(*x)),
        Value::Uint8Array(v) => v.iter().for_each(|x| body.put_u8(*x)),

        Value::Double(v) => body.put_f64(*v),
    }
}

fn encode_list_body_native(list: &NvList) -> Vec<u8> {
    let mut w = native::Writer::new(endian::NATIVE);
    w.put_i32(list.version);
    w.put_u32(unique_flags(list.unique));

    for pair in list.pairs() {
        encode_pair_native(&mut w, &pair.name, &pair.value);
    }

    w.put_u32(0);

    w.into_bytes()
}

fn encode_pair_native(w: &mut native::Writer, name: &str, value: &Value) {
    let mut body = native::Writer::new(w.endian());
    body.put_str(name);
    body.put_i32(value.data_type() as i32);
    body.put_u32(value.element_count() as u32);
    encode_value_native(&mut body, value);
    let body_bytes = body.into_bytes();

    let encoded_size = 4 + 4 + body_bytes.len();
    let decoded_size = encoded_size;

    w.put_u32(encoded_size as u32);
    w.put_u32(decoded_size as u32);
    w.put_raw_bytes(&body_bytes);
}

fn encode_value_native(body: &mut native::Writer, value: &Value) {
    match value {
        Value::Boolean => {}

        Value::Byte(v) => body.put_u8(*v),
        Value::Int16(v) => body.put_i16(*v),
        Value::Uint16(v) => body.put_u16(*v),
        Value::Int32(v) => body.put_i32(*v),
        Value::Uint32(v) => body.put_u32(*v),
        Value::Int64(v) => body.put_i64(*v),
        Value::Uint64(v) => body.put_u64(*v),
        Value::String(v) => body.put_str(v),

        Value::ByteArray(v) => body.put_raw_bytes(v),
        Value::Int16Array(v) => v.iter().for_each(|x| body.put_i16(*x)),
        Value::Uint16Array(v) => v.iter().for_each(|x| body.put_u16(*x)),
        Value::Int32Array(v) => v.iter().for_each(|x| body.put_i32(*x)),
        Value::Uint32Array(v) => v.iter().for_each(|x| body.put_u32(*x)),
        Value::Int64Array(v) => v.iter().for_each(|x| body.put_i64(*x)),
        Value::Uint64Array(v) => v.iter().for_each(|x| body.put_u64(*x)),
        Value::StringArray(v) => v.iter().for_each(|s| body.put_str(s)),

        Value::HrTime(v) => body.put_i64(*v),

        Value::Nvlist(v) => body.put_raw_bytes(&encode_list_body_native(v)),
        Value::NvlistArray(v) => v
            .iter()
            .for_each(|nested| body.put_raw_bytes(&encode_list_body_native(nested))),

        // Matches boolean_t's traditional `int` representation.
        Value::BooleanValue(v) => body.put_u32(if *v { 1 } else { 0 }),

        Value::Int8(v) => body.put_i8(*v),
        Value::Uint8(v) => body.put_u8(*v),

        Value::BooleanArray(v) => v
            .iter()
            .for_each(|b| body.put_u32(if *b { 1 } else { 0 })),
        Value::Int8Array(v) => v.iter().for_each(|x| body.put_i8(*x)),
        Value::Uint8Array(v) => v.iter().for_each(|x| body.put_u8(*x)),

        Value::Double(v) => body.put_f64(*v),
    }
}

////////////////////////////////////////////////////////////////////////////////
// Lookup convenience
////////////////////////////////////////////////////////////////////////////////

/// Returns the first value for `name`, if present.
pub fn find<'a>(list: &'a NvList, name: &str) -> Option<&'a Value> {
    list.get(name)
}

/// Returns the first value for `name`, erroring with [`DecodeError::MissingField`]
/// if absent.
pub fn find_require<'a>(list: &'a NvList, name: &str) -> Result<&'a Value, DecodeError> {
    list.get(name)
        .ok_or_else(|| DecodeError::MissingField { name: name.into() })
}

/// Returns the first value for `name`, if present; alias for [`find`] kept
/// for call sites that read better naming the field optional.
pub fn find_optional<'a>(list: &'a NvList, name: &str) -> Option<&'a Value> {
    list.get(name)
}

/// Returns the nested list for `name`, requiring both presence and that the
/// value is a [`DataType::NvList`].
pub fn find_nested<'a>(list: &'a NvList, name: &str) -> Result<&'a NvList, DecodeError> {
    let value = find_require(list, name)?;
    value.as_nvlist().ok_or_else(|| DecodeError::TypeMismatch {
        pair: name.into(),
        target: "Nvlist",
    })
}

/// Returns the nested list for `name` if present, requiring that it is a
/// [`DataType::NvList`] when it is.
pub fn find_option_nested<'a>(
    list: &'a NvList,
    name: &str,
) -> Result<Option<&'a NvList>, DecodeError> {
    match list.get(name) {
        None => Ok(None),
        Some(value) => match value.as_nvlist() {
            Some(nested) => Ok(Some(nested)),
            None => Err(DecodeError::TypeMismatch {
                pair: name.into(),
                target: "Nvlist",
            }),
        },
    }
}

/// Looks up `name` in `$list`, returning `Option<&Value>`.
#[macro_export]
macro_rules! find {
    ($list:expr, $name:expr) => {
        $crate::nv::find($list, $name)
    };
}

/// Looks up `name` in `$list`, returning `Result<&Value, DecodeError>` and
/// failing with [`DecodeError::MissingField`] if absent.
#[macro_export]
macro_rules! find_require {
    ($list:expr, $name:expr) => {
        $crate::nv::find_require($list, $name)
    };
}

/// Looks up `name` in `$list`, returning `Option<&Value>`.
#[macro_export]
macro_rules! find_optional {
    ($list:expr, $name:expr) => {
        $crate::nv::find_optional($list, $name)
    };
}

/// Looks up the nested list `name` in `$list`, requiring it to be present.
#[macro_export]
macro_rules! find_nested {
    ($list:expr, $name:expr) => {
        $crate::nv::find_nested($list, $name)
    };
}

/// Looks up the nested list `name` in `$list` if present.
#[macro_export]
macro_rules! find_option_nested {
    ($list:expr, $name:expr) => {
        $crate::nv::find_option_nested($list, $name)
    };
}

////////////////////////////////////////////////////////////////////////////////

#[derive(Debug)]
pub enum DecodeError {
    /** Unrecognized `encoding` byte in the stream header.
     *
     * - `encoding` - Raw byte value.
     */
    BadEncoding { encoding: u8 },

    /** Unrecognized `endian` byte in the stream header (NATIVE only).
     *
     * - `endian` - Raw byte value.
     */
    BadEndian { endian: u8 },

    /** Nesting depth exceeded [`Limits::max_depth`].
     *
     * - `depth`     - Depth that triggered the error.
     * - `max_depth` - Configured limit.
     */
    DepthExceeded { depth: usize, max_depth: usize },

    /** End of input data.
     *
     * - `offset` - Byte offset of data.
     * - `length` - Total length of data.
     * - `count`  - Number of bytes needed.
     * - `detail` - Human-readable context.
     */
    EndOfInput {
        offset: usize,
        length: usize,
        count: usize,
        detail: &'static str,
    },

    /** The bytes actually consumed by a pair did not match its declared
     * `encoded_size`.
     *
     * - `encoded_size` - Declared size.
     * - `used`         - Bytes actually consumed.
     */
    FramingMismatch { encoded_size: usize, used: usize },

    /** A [`DataType`]/count combination is invalid for that type. */
    InvalidCount(InvalidCountError),

    /** Invalid, unrecognized flags word. */
    InvalidFlags { flags: u32 },

    /** Invalid reserved bytes in the stream header. */
    InvalidReservedBytes { reserved: [u8; 2] },

    /** A lookup found a pair whose value is not of the requested type.
     *
     * - `pair`   - Name of the offending pair.
     * - `target` - Name of the requested target type.
     */
    TypeMismatch {
        pair: String,
        target: &'static str,
    },

    /** A required pair was absent.
     *
     * - `name` - Name that was looked up.
     */
    MissingField { name: String },

    /** A pair name exceeded [`Limits::max_name_length`]. */
    NameTooLong {
        length: usize,
        max_name_length: usize,
    },

    /** NATIVE string decoding error. */
    NativeStr(native::StrError),

    /** Decoding error from the NATIVE primitive codec. */
    Native(endian::DecodeError),

    /** An array's claimed size would exceed the bytes remaining in its
     * pair record. Checked before any element storage is allocated.
     *
     * - `needed`    - Bytes the array claims to need.
     * - `available` - Bytes actually remaining.
     */
    OversizedArray { needed: usize, available: usize },

    /** The input exceeded [`Limits::max_size`]. */
    OversizedInput { length: usize, max_size: usize },

    /** Unrecognized data type code. */
    UnknownKind { code: u32 },

    /** Decoding error from the XDR primitive codec. */
    Xdr(xdr::DecodeError),
}

impl From<xdr::DecodeError> for DecodeError {
    fn from(value: xdr::DecodeError) -> Self {
        DecodeError::Xdr(value)
    }
}

impl From<endian::DecodeError> for DecodeError {
    fn from(value: endian::DecodeError) -> Self {
        DecodeError::Native(value)
    }
}

impl From<InvalidCountError> for DecodeError {
    fn from(value: InvalidCountError) -> Self {
        DecodeError::InvalidCount(value)
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::BadEncoding { encoding } => {
                write!(f, "nvlist bad encoding byte 0x{encoding:02x}")
            }
            DecodeError::BadEndian { endian } => {
                write!(f, "nvlist bad endian byte 0x{endian:02x}")
            }
            DecodeError::DepthExceeded { depth, max_depth } => {
                write!(f, "nvlist nesting depth {depth} exceeds limit {max_depth}")
            }
            DecodeError::EndOfInput {
                offset,
                length,
                count,
                detail,
            } => write!(
                f,
                "nvlist end of input at offset {offset}, need {count} bytes, total length {length}, detail: {detail}"
            ),
            DecodeError::FramingMismatch { encoded_size, used } => write!(
                f,
                "nvlist pair declared encoded_size {encoded_size} but consumed {used}"
            ),
            DecodeError::InvalidCount(e) => write!(f, "nvlist {e}"),
            DecodeError::InvalidFlags { flags } => write!(f, "nvlist invalid flags {flags:#x}"),
            DecodeError::InvalidReservedBytes { reserved } => write!(
                f,
                "nvlist invalid reserved bytes 0x{:02x} 0x{:02x}",
                reserved[0], reserved[1]
            ),
            DecodeError::TypeMismatch { pair, target } => {
                write!(f, "nvlist pair {pair:?} is not a {target}")
            }
            DecodeError::MissingField { name } => write!(f, "nvlist missing field {name:?}"),
            DecodeError::NameTooLong {
                length,
                max_name_length,
            } => write!(
                f,
                "nvlist pair name length {length} exceeds limit {max_name_length}"
            ),
            DecodeError::NativeStr(e) => write!(f, "nvlist native string error: {e}"),
            DecodeError::Native(e) => write!(f, "nvlist native decoding error: {e}"),
            DecodeError::OversizedArray { needed, available } => write!(
                f,
                "nvlist array needs {needed} bytes but only {available} remain"
            ),
            DecodeError::OversizedInput { length, max_size } => write!(
                f,
                "nvlist input length {length} exceeds limit {max_size}"
            ),
            DecodeError::UnknownKind { code } => write!(f, "nvlist unknown data type code {code}"),
            DecodeError::Xdr(e) => write!(f, "nvlist XDR decoding error: {e}"),
        }
    }
}

#[cfg(feature = "std")]
impl error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            DecodeError::Xdr(e) => Some(e),
            DecodeError::Native(e) => Some(e),
            DecodeError::NativeStr(e) => Some(e),
            DecodeError::InvalidCount(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::Encoding;

    #[test]
    fn empty_list_round_trips_xdr() {
        let list = NvList::new();
        let bytes = encode(&list, Encoding::Xdr);
        assert_eq!(
            bytes,
            vec![
                0x01, 0x01, 0x00, 0x00, // stream header
                0x00, 0x00, 0x00, 0x00, // version
                0x00, 0x00, 0x00, 0x01, // flags
                0x00, 0x00, 0x00, 0x00, // terminator
            ]
        );
        assert_eq!(decode(&bytes).unwrap(), list);
    }

    #[test]
    fn empty_list_round_trips_native() {
        let list = NvList::new();
        let bytes = encode(&list, Encoding::Native);
        assert_eq!(decode(&bytes).unwrap(), list);
    }

    #[test]
    fn native_round_trips_with_odd_length_names_and_wide_values() {
        // Regression test: odd-length names ("127" is 3 bytes, "0" is 1)
        // leave the per-pair body writer's local offset unaligned before the
        // kind code, and an 8 byte value in a later pair starts at a stream
        // offset that isn't itself 8 aligned. Both must still round trip.
        let mut list = NvList::new();
        list.push("0", Value::Uint8(0));
        list.push("127", Value::Uint64(0x1122334455667788));
        list.push("false", Value::BooleanValue(false));

        let bytes = encode(&list, Encoding::Native);
        assert_eq!(decode(&bytes).unwrap(), list);
    }

    #[test]
    fn bools_round_trip_both_encodings() {
        let mut list = NvList::new();
        list.push("false", Value::BooleanValue(false));
        list.push("true", Value::BooleanValue(true));

        for encoding in [Encoding::Xdr, Encoding::Native] {
            let bytes = encode(&list, encoding);
            let decoded = decode(&bytes).unwrap();
            assert_eq!(decoded, list);
            assert_eq!(decoded.pairs()[0].name, "false");
            assert_eq!(decoded.pairs()[1].name, "true");
        }
    }

    #[test]
    fn nested_lists_round_trip() {
        let mut inner_a = NvList::new();
        inner_a.push("false", Value::BooleanValue(false));
        inner_a.push("true", Value::BooleanValue(true));

        let mut inner_b = NvList::new();
        inner_b.push("0", Value::Uint8(0));
        inner_b.push("1", Value::Uint8(1));

        let mut outer = NvList::new();
        outer.push("2", Value::Nvlist(inner_a));
        outer.push("4", Value::Nvlist(inner_b));

        for encoding in [Encoding::Xdr, Encoding::Native] {
            let bytes = encode(&outer, encoding);
            assert_eq!(decode(&bytes).unwrap(), outer);
        }
    }

    #[test]
    fn nvlist_array_round_trips() {
        let mut a = NvList::new();
        a.push("x", Value::Int32(1));
        let mut b = NvList::new();
        b.push("y", Value::Int32(2));

        let mut list = NvList::new();
        list.push("arr", Value::NvlistArray(vec![a, b]));

        for encoding in [Encoding::Xdr, Encoding::Native] {
            let bytes = encode(&list, encoding);
            assert_eq!(decode(&bytes).unwrap(), list);
        }
    }

    #[test]
    fn empty_arrays_round_trip() {
        let mut list = NvList::new();
        list.push("bytes", Value::ByteArray(vec![]));
        list.push("int8s", Value::Int8Array(vec![]));
        list.push("strings", Value::StringArray(vec![]));
        list.push("bools", Value::BooleanArray(vec![]));
        list.push("lists", Value::NvlistArray(vec![]));

        for encoding in [Encoding::Xdr, Encoding::Native] {
            let bytes = encode(&list, encoding);
            assert_eq!(decode(&bytes).unwrap(), list);
        }
    }

    #[test]
    fn doubles_preserve_bits_exactly() {
        let mut list = NvList::new();
        list.push("pi", Value::Double(core::f64::consts::PI));
        list.push("e", Value::Double(core::f64::consts::E));
        list.push("min", Value::Double(f64::MIN));
        list.push("max", Value::Double(f64::MAX));

        for encoding in [Encoding::Xdr, Encoding::Native] {
            let bytes = encode(&list, encoding);
            assert_eq!(decode(&bytes).unwrap(), list);
        }
    }

    #[test]
    fn truncated_input_is_a_decode_error_not_a_panic() {
        let mut list = NvList::new();
        list.push("abcdefgh", Value::String(String::from("01234567")));
        let bytes = encode(&list, Encoding::Xdr);

        assert!(decode(&bytes[..20]).is_err());
    }

    #[test]
    fn corrupted_terminator_is_rejected() {
        let list = NvList::new();
        let mut bytes = encode(&list, Encoding::Xdr);
        let last = bytes.len() - 1;
        bytes[last] = 0xff;
        assert!(decode(&bytes).is_err());
    }

    #[test]
    fn fabricated_array_count_is_rejected_before_allocating() {
        // A Uint8Array pair claiming an absurd element count, but an
        // encoded_size far too small to actually hold it.
        let mut enc = xdr::Encoder::new();
        enc.put_str("x");
        enc.put_i32(DataType::Uint8Array as i32);
        enc.put_usize(usize::MAX / 2);
        let body = enc.into_bytes();

        let mut pair = xdr::Encoder::new();
        pair.put_usize(4 + 4 + body.len());
        pair.put_usize(4 + 4 + body.len());
        pair.extend_encoded(&body);

        let mut stream = Vec::new();
        stream.push(Encoding::Xdr as u8);
        stream.push(1);
        stream.push(0);
        stream.push(0);
        stream.extend([0, 0, 0, 0]); // version
        stream.extend([0, 0, 0, 1]); // flags
        stream.extend(pair.into_bytes());
        stream.extend([0, 0, 0, 0]); // terminator

        match decode(&stream) {
            Err(DecodeError::OversizedArray { .. }) => {}
            other => panic!("expected OversizedArray, got {other:?}"),
        }
    }

    #[test]
    fn depth_limit_is_enforced() {
        let mut inner = NvList::new();
        inner.push("leaf", Value::Boolean);
        for _ in 0..40 {
            let mut outer = NvList::new();
            outer.push("n", Value::Nvlist(inner));
            inner = outer;
        }
        let bytes = encode(&inner, Encoding::Xdr);

        match decode_with_limits(&bytes, Limits::default()) {
            Err(DecodeError::DepthExceeded { .. }) => {}
            other => panic!("expected DepthExceeded, got {other:?}"),
        }
    }
}
