/*! The closed set of nvlist value kinds, and the list-level encoding and
 * uniqueness flags that accompany them on the wire.
 */

use core::result::Result;
use core::result::Result::{Err, Ok};

extern crate strum;

////////////////////////////////////////////////////////////////////////////////

/// Name Value Pair Data Type.
///
/// Discriminants match the on-disk kind codes exactly; do not reorder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, FromPrimitive, strum::Display)]
pub enum DataType {
    Boolean = 1,

    Byte,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Int64,
    Uint64,
    String,

    ByteArray,
    Int16Array,
    Uint16Array,
    Int32Array,
    Uint32Array,
    Int64Array,
    Uint64Array,
    StringArray,

    HrTime,

    NvList,
    NvListArray,

    BooleanValue,

    Int8,
    Uint8,

    BooleanArray,
    Int8Array,
    Uint8Array,

    Double,
}

impl DataType {
    /** Checks that `count` is a valid element count for this data type.
     *
     * - [`DataType::Boolean`] (the bare flag form) must have a count of 0.
     * - Scalar types must have a count of exactly 1.
     * - Array types may have any count, including 0.
     */
    pub fn check_count(self, count: usize) -> Result<(), InvalidCountError> {
        match self {
            DataType::Boolean => match count {
                0 => Ok(()),
                _ => Err(InvalidCountError {
                    data_type: self,
                    count,
                }),
            },
            DataType::Byte
            | DataType::Int16
            | DataType::Uint16
            | DataType::Int32
            | DataType::Uint32
            | DataType::Int64
            | DataType::Uint64
            | DataType::String
            | DataType::HrTime
            | DataType::NvList
            | DataType::BooleanValue
            | DataType::Int8
            | DataType::Uint8
            | DataType::Double => match count {
                1 => Ok(()),
                _ => Err(InvalidCountError {
                    data_type: self,
                    count,
                }),
            },
            DataType::ByteArray
            | DataType::Int16Array
            | DataType::Uint16Array
            | DataType::Int32Array
            | DataType::Uint32Array
            | DataType::Int64Array
            | DataType::Uint64Array
            | DataType::StringArray
            | DataType::NvListArray
            | DataType::BooleanArray
            | DataType::Int8Array
            | DataType::Uint8Array => Ok(()),
        }
    }
}

/** A [`DataType`] was paired with an element count it cannot hold. */
#[derive(Debug)]
pub struct InvalidCountError {
    pub data_type: DataType,
    pub count: usize,
}

impl core::fmt::Display for InvalidCountError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "invalid count {} for data type {}",
            self.count, self.data_type
        )
    }
}

#[cfg(feature = "std")]
impl std::error::Error for InvalidCountError {}

////////////////////////////////////////////////////////////////////////////////

/// Name Value List wire encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, FromPrimitive, strum::Display)]
pub enum Encoding {
    Native = 0,
    Xdr,
}

/// Name Value List uniqueness policy.
///
/// Decoder-advisory only: a decoder never enforces this against duplicate
/// names, it only reports what the encoder claimed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, FromPrimitive, strum::Display, Default)]
pub enum Unique {
    None = 0,
    #[default]
    Name = 1,
    NameType = 2,
}
