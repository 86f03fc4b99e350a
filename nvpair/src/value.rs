/*! The owned value tree: [`Value`], the tagged union of every nvpair kind,
 * and [`NvList`], the ordered name→value container.
 *
 * Everything here is owned: decoding copies every string, byte array, and
 * nested list out of the input slice, so a [`NvList`] never borrows from the
 * bytes it was decoded from.
 */

#[cfg(feature = "std")]
use std::string::String;
#[cfg(feature = "std")]
use std::vec::Vec;

#[cfg(not(feature = "std"))]
use alloc::string::String;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use enum_as_inner::EnumAsInner;

use crate::kind::{DataType, Unique};

////////////////////////////////////////////////////////////////////////////////

/// A single nvpair value, owning all of its data.
#[derive(Clone, Debug, PartialEq, EnumAsInner)]
pub enum Value {
    Boolean,

    Byte(u8),
    Int16(i16),
    Uint16(u16),
    Int32(i32),
    Uint32(u32),
    Int64(i64),
    Uint64(u64),
    String(String),

    ByteArray(Vec<u8>),
    Int16Array(Vec<i16>),
    Uint16Array(Vec<u16>),
    Int32Array(Vec<i32>),
    Uint32Array(Vec<u32>),
    Int64Array(Vec<i64>),
    Uint64Array(Vec<u64>),
    StringArray(Vec<String>),

    HrTime(i64),

    Nvlist(NvList),
    NvlistArray(Vec<NvList>),

    BooleanValue(bool),

    Int8(i8),
    Uint8(u8),

    BooleanArray(Vec<bool>),
    Int8Array(Vec<i8>),
    Uint8Array(Vec<u8>),

    Double(f64),
}

impl Value {
    /// Returns the [`DataType`] kind code for this value.
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Boolean => DataType::Boolean,

            Value::Byte(_) => DataType::Byte,
            Value::Int16(_) => DataType::Int16,
            Value::Uint16(_) => DataType::Uint16,
            Value::Int32(_) => DataType::Int32,
            Value::Uint32(_) => DataType::Uint32,
            Value::Int64(_) => DataType::Int64,
            Value::Uint64(_) => DataType::Uint64,
            Value::String(_) => DataType::String,

            Value::ByteArray(_) => DataType::ByteArray,
            Value::Int16Array(_) => DataType::Int16Array,
            Value::Uint16Array(_) => DataType::Uint16Array,
            Value::Int32Array(_) => DataType::Int32Array,
            Value::Uint32Array(_) => DataType::Uint32Array,
            Value::Int64Array(_) => DataType::Int64Array,
            Value::Uint64Array(_) => DataType::Uint64Array,
            Value::StringArray(_) => DataType::StringArray,

            Value::HrTime(_) => DataType::HrTime,

            Value::Nvlist(_) => DataType::NvList,
            Value::NvlistArray(_) => DataType::NvListArray,

            Value::BooleanValue(_) => DataType::BooleanValue,

            Value::Int8(_) => DataType::Int8,
            Value::Uint8(_) => DataType::Uint8,

            Value::BooleanArray(_) => DataType::BooleanArray,
            Value::Int8Array(_) => DataType::Int8Array,
            Value::Uint8Array(_) => DataType::Uint8Array,

            Value::Double(_) => DataType::Double,
        }
    }

    /// Returns the on-wire element count for this value.
    pub fn element_count(&self) -> usize {
        match self {
            Value::Boolean => 0,

            Value::ByteArray(v) => v.len(),
            Value::Int16Array(v) => v.len(),
            Value::Uint16Array(v) => v.len(),
            Value::Int32Array(v) => v.len(),
            Value::Uint32Array(v) => v.len(),
            Value::Int64Array(v) => v.len(),
            Value::Uint64Array(v) => v.len(),
            Value::StringArray(v) => v.len(),
            Value::NvlistArray(v) => v.len(),
            Value::BooleanArray(v) => v.len(),
            Value::Int8Array(v) => v.len(),
            Value::Uint8Array(v) => v.len(),

            _ => 1,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////

/// A single (name, value) record inside an [`NvList`].
#[derive(Clone, Debug, PartialEq)]
pub struct Pair {
    pub name: String,
    pub value: Value,
}

impl Pair {
    pub fn new(name: impl Into<String>, value: Value) -> Pair {
        Pair {
            name: name.into(),
            value,
        }
    }
}

/// An ordered name→value container.
///
/// Duplicate names are preserved in order; [`Unique`] only records the
/// encoder's stated intent, it is never enforced.
#[derive(Clone, Debug, PartialEq)]
pub struct NvList {
    pub version: i32,
    pub unique: Unique,
    pairs: Vec<Pair>,
}

impl NvList {
    /// Creates an empty list with the default `unique-names` flag, matching
    /// the reference allocator.
    pub fn new() -> NvList {
        NvList {
            version: 0,
            unique: Unique::Name,
            pairs: Vec::new(),
        }
    }

    /// Creates an empty list with an explicit [`Unique`] policy.
    pub fn with_unique(unique: Unique) -> NvList {
        NvList {
            version: 0,
            unique,
            pairs: Vec::new(),
        }
    }

    /// Appends a pair, preserving insertion order.
    pub fn push(&mut self, name: impl Into<String>, value: Value) {
        self.pairs.push(Pair::new(name, value));
    }

    /// Returns all pairs in on-wire order.
    pub fn pairs(&self) -> &[Pair] {
        &self.pairs
    }

    /// Returns a mutable view of all pairs.
    pub fn pairs_mut(&mut self) -> &mut Vec<Pair> {
        &mut self.pairs
    }

    /// Returns the number of pairs, including duplicate names.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns true if the list has no pairs.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Returns the first pair matching `name`, if any.
    ///
    /// Matches spec's duplicate-preserving model: later pairs with the same
    /// name are not shadowed, only the first is returned here.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.pairs.iter().find(|p| p.name == name).map(|p| &p.value)
    }

    /// Returns all pairs matching `name`, in order.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Value> + 'a {
        self.pairs
            .iter()
            .filter(move |p| p.name == name)
            .map(|p| &p.value)
    }
}

impl Default for NvList {
    fn default() -> NvList {
        NvList::new()
    }
}

impl FromIterator<Pair> for NvList {
    fn from_iter<I: IntoIterator<Item = Pair>>(iter: I) -> NvList {
        let mut list = NvList::new();
        list.pairs.extend(iter);
        list
    }
}
