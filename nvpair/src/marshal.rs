/*! Reflective binding between [`NvList`] and user structs.
 *
 * Rust has no runtime reflection, so the struct↔value-tree mapping is
 * generated at compile time, either by hand (implement [`NvValue`] directly)
 * or via `#[derive(NvValue)]` from the `nvpair-derive` crate (enabled by the
 * `derive` feature). Either way callers only ever see [`encode`]/[`decode`].
 *
 * Field tags
 * ==========
 * A derived field reads its tag from `#[nv(name = "...", byte)]`:
 * - `name` overrides the nvpair name; if absent, the field's Rust identifier
 *   is used, matched case-insensitively on decode.
 * - `byte` selects the raw-byte kind ([`kind::DataType::Byte`] /
 *   [`kind::DataType::ByteArray`]) over the default unsigned kind
 *   ([`kind::DataType::Uint8`] / [`kind::DataType::Uint8Array`]) for `u8`
 *   scalar and array fields.
 *
 * [`FieldTag::parse`] implements this grammar directly, so hand-written
 * [`NvValue`] impls can reuse it too.
 */

use core::fmt;
use core::result::Result;
use core::result::Result::{Err, Ok};

#[cfg(feature = "std")]
use std::error;
#[cfg(feature = "std")]
use std::string::String;
#[cfg(feature = "std")]
use std::string::ToString;
#[cfg(feature = "std")]
use std::vec::Vec;

#[cfg(not(feature = "std"))]
use alloc::string::String;
#[cfg(not(feature = "std"))]
use alloc::string::ToString;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::value::{NvList, Value};

////////////////////////////////////////////////////////////////////////////////

/// Implemented by any type that can be built from, and flattened into, an
/// [`NvList`]. Hand-write this, or derive it with `#[derive(NvValue)]`.
pub trait NvValue: Sized {
    /// Appends this value's pairs to `list`, in field declaration order.
    fn to_pairs(&self, list: &mut NvList);

    /// Builds a value from `list`'s pairs.
    ///
    /// # Errors
    ///
    /// Returns [`MarshalError`] if a required field is missing, or a pair's
    /// value kind is not compatible with its destination field type.
    fn from_pairs(list: &NvList) -> Result<Self, MarshalError>;
}

/// Returns the first pair in `list` whose name matches `name`
/// case-insensitively, per spec.md §4.4's field-tag matching rule.
///
/// Used by `#[derive(NvValue)]`-generated `from_pairs` impls; hand-written
/// impls can call it directly too.
pub fn lookup_field<'a>(list: &'a NvList, name: &str) -> Option<&'a Value> {
    list.pairs()
        .iter()
        .find(|pair| pair.name.eq_ignore_ascii_case(name))
        .map(|pair| &pair.value)
}

/// Encodes `value` into a fresh [`NvList`].
pub fn encode<T: NvValue>(value: &T) -> NvList {
    let mut list = NvList::new();
    value.to_pairs(&mut list);
    list
}

/// Decodes a `T` from `list`.
///
/// # Errors
///
/// Returns [`MarshalError`] per [`NvValue::from_pairs`].
pub fn decode<T: NvValue>(list: &NvList) -> Result<T, MarshalError> {
    T::from_pairs(list)
}

impl NvValue for NvList {
    fn to_pairs(&self, list: &mut NvList) {
        for pair in self.pairs() {
            list.push(pair.name.clone(), pair.value.clone());
        }
    }

    fn from_pairs(list: &NvList) -> Result<Self, MarshalError> {
        Ok(list.clone())
    }
}

////////////////////////////////////////////////////////////////////////////////

/// A parsed `name[,option...]` field tag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldTag {
    /// The nvpair name to match. Matched case-insensitively on decode.
    pub name: String,
    /// Forces the raw-byte kind ([`kind::DataType::Byte`]/[`kind::DataType::ByteArray`])
    /// over the default unsigned kind for `u8` fields.
    pub byte: bool,
}

impl FieldTag {
    /** Parses a tag string of the form `name[,option...]`.
     *
     * An empty `name` component falls back to `field_ident`.
     *
     * # Examples
     *
     * ```
     * use nvpair::marshal::FieldTag;
     *
     * let tag = FieldTag::parse("count,byte", "ignored");
     * assert_eq!(tag.name, "count");
     * assert!(tag.byte);
     *
     * let tag = FieldTag::parse("", "my_field");
     * assert_eq!(tag.name, "my_field");
     * assert!(!tag.byte);
     * ```
     */
    pub fn parse(tag: &str, field_ident: &str) -> FieldTag {
        let mut parts = tag.split(',');
        let name = parts.next().unwrap_or("").trim();
        let name = if name.is_empty() {
            field_ident.to_string()
        } else {
            name.to_string()
        };

        let mut byte = false;
        for option in parts {
            if option.trim() == "byte" {
                byte = true;
            }
        }

        FieldTag { name, byte }
    }

    /// Returns true if `candidate` matches this tag's name, case-insensitively.
    pub fn matches(&self, candidate: &str) -> bool {
        self.name.eq_ignore_ascii_case(candidate)
    }
}

////////////////////////////////////////////////////////////////////////////////
// Compatibility matrix
////////////////////////////////////////////////////////////////////////////////

/// Converts a typed field value into its nvpair [`Value`] representation.
pub trait ToValue {
    fn to_value(&self) -> Value;
}

/// Converts an nvpair [`Value`] into a typed field value, per the
/// one-way-widening compatibility matrix.
pub trait FromValue: Sized {
    /// # Errors
    ///
    /// Returns [`MarshalError::TypeMismatch`] if `value`'s kind cannot widen
    /// into `Self`.
    fn from_value(pair: &str, value: &Value) -> Result<Self, MarshalError>;
}

fn type_mismatch<T>(pair: &str, target: &'static str) -> Result<T, MarshalError> {
    Err(MarshalError::TypeMismatch {
        pair: pair.to_string(),
        target,
    })
}

impl ToValue for bool {
    fn to_value(&self) -> Value {
        Value::BooleanValue(*self)
    }
}

impl FromValue for bool {
    fn from_value(pair: &str, value: &Value) -> Result<Self, MarshalError> {
        match value {
            Value::BooleanValue(v) => Ok(*v),
            _ => type_mismatch(pair, "bool"),
        }
    }
}

impl ToValue for i8 {
    fn to_value(&self) -> Value {
        Value::Int8(*self)
    }
}

impl FromValue for i8 {
    fn from_value(pair: &str, value: &Value) -> Result<Self, MarshalError> {
        match value {
            Value::Int8(v) => Ok(*v),
            _ => type_mismatch(pair, "i8"),
        }
    }
}

impl ToValue for i16 {
    fn to_value(&self) -> Value {
        Value::Int16(*self)
    }
}

impl FromValue for i16 {
    fn from_value(pair: &str, value: &Value) -> Result<Self, MarshalError> {
        match value {
            Value::Int8(v) => Ok(*v as i16),
            Value::Int16(v) => Ok(*v),
            _ => type_mismatch(pair, "i16"),
        }
    }
}

impl ToValue for i32 {
    fn to_value(&self) -> Value {
        Value::Int32(*self)
    }
}

impl FromValue for i32 {
    fn from_value(pair: &str, value: &Value) -> Result<Self, MarshalError> {
        match value {
            Value::Int8(v) => Ok(*v as i32),
            Value::Int16(v) => Ok(*v as i32),
            Value::Int32(v) => Ok(*v),
            _ => type_mismatch(pair, "i32"),
        }
    }
}

impl ToValue for i64 {
    fn to_value(&self) -> Value {
        Value::Int64(*self)
    }
}

impl FromValue for i64 {
    fn from_value(pair: &str, value: &Value) -> Result<Self, MarshalError> {
        match value {
            Value::Int8(v) => Ok(*v as i64),
            Value::Int16(v) => Ok(*v as i64),
            Value::Int32(v) => Ok(*v as i64),
            Value::Int64(v) => Ok(*v),
            Value::HrTime(v) => Ok(*v),
            _ => type_mismatch(pair, "i64"),
        }
    }
}

impl ToValue for u8 {
    fn to_value(&self) -> Value {
        Value::Uint8(*self)
    }
}

impl FromValue for u8 {
    fn from_value(pair: &str, value: &Value) -> Result<Self, MarshalError> {
        match value {
            Value::Byte(v) => Ok(*v),
            Value::Uint8(v) => Ok(*v),
            _ => type_mismatch(pair, "u8"),
        }
    }
}

impl ToValue for u16 {
    fn to_value(&self) -> Value {
        Value::Uint16(*self)
    }
}

impl FromValue for u16 {
    fn from_value(pair: &str, value: &Value) -> Result<Self, MarshalError> {
        match value {
            Value::Byte(v) => Ok(*v as u16),
            Value::Uint8(v) => Ok(*v as u16),
            Value::Uint16(v) => Ok(*v),
            _ => type_mismatch(pair, "u16"),
        }
    }
}

impl ToValue for u32 {
    fn to_value(&self) -> Value {
        Value::Uint32(*self)
    }
}

impl FromValue for u32 {
    fn from_value(pair: &str, value: &Value) -> Result<Self, MarshalError> {
        match value {
            Value::Byte(v) => Ok(*v as u32),
            Value::Uint8(v) => Ok(*v as u32),
            Value::Uint16(v) => Ok(*v as u32),
            Value::Uint32(v) => Ok(*v),
            _ => type_mismatch(pair, "u32"),
        }
    }
}

impl ToValue for u64 {
    fn to_value(&self) -> Value {
        Value::Uint64(*self)
    }
}

impl FromValue for u64 {
    fn from_value(pair: &str, value: &Value) -> Result<Self, MarshalError> {
        match value {
            Value::Byte(v) => Ok(*v as u64),
            Value::Uint8(v) => Ok(*v as u64),
            Value::Uint16(v) => Ok(*v as u64),
            Value::Uint32(v) => Ok(*v as u64),
            Value::Uint64(v) => Ok(*v),
            _ => type_mismatch(pair, "u64"),
        }
    }
}

impl ToValue for f64 {
    fn to_value(&self) -> Value {
        Value::Double(*self)
    }
}

impl FromValue for f64 {
    fn from_value(pair: &str, value: &Value) -> Result<Self, MarshalError> {
        match value {
            Value::Double(v) => Ok(*v),
            _ => type_mismatch(pair, "f64"),
        }
    }
}

impl ToValue for String {
    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }
}

impl FromValue for String {
    fn from_value(pair: &str, value: &Value) -> Result<Self, MarshalError> {
        match value {
            Value::String(v) => Ok(v.clone()),
            Value::ByteArray(v) => core::str::from_utf8(v)
                .map(String::from)
                .map_err(|_| MarshalError::TypeMismatch {
                    pair: pair.to_string(),
                    target: "String",
                }),
            _ => type_mismatch(pair, "String"),
        }
    }
}

impl ToValue for Vec<u8> {
    fn to_value(&self) -> Value {
        Value::ByteArray(self.clone())
    }
}

impl FromValue for Vec<u8> {
    fn from_value(pair: &str, value: &Value) -> Result<Self, MarshalError> {
        match value {
            Value::ByteArray(v) => Ok(v.clone()),
            Value::Uint8Array(v) => Ok(v.clone()),
            Value::String(v) => Ok(v.as_bytes().to_vec()),
            _ => type_mismatch(pair, "Vec<u8>"),
        }
    }
}

/// Encodes a `u8` scalar, selecting [`Value::Byte`] over [`Value::Uint8`]
/// when the field's tag carries the `byte` option.
pub fn encode_u8(value: u8, as_byte: bool) -> Value {
    if as_byte {
        Value::Byte(value)
    } else {
        Value::Uint8(value)
    }
}

/// Encodes a `Vec<u8>` array, selecting [`Value::ByteArray`] over
/// [`Value::Uint8Array`] when the field's tag carries the `byte` option.
pub fn encode_u8_array(value: &[u8], as_byte: bool) -> Value {
    if as_byte {
        Value::ByteArray(value.to_vec())
    } else {
        Value::Uint8Array(value.to_vec())
    }
}

macro_rules! impl_array_value {
    ($t:ty, $variant:ident) => {
        impl ToValue for Vec<$t> {
            fn to_value(&self) -> Value {
                Value::$variant(self.clone())
            }
        }

        impl FromValue for Vec<$t> {
            fn from_value(pair: &str, value: &Value) -> Result<Self, MarshalError> {
                match value {
                    Value::$variant(v) => Ok(v.clone()),
                    _ => type_mismatch(pair, core::stringify!(Vec<$t>)),
                }
            }
        }
    };
}

impl_array_value!(i16, Int16Array);
impl_array_value!(u16, Uint16Array);
impl_array_value!(i32, Int32Array);
impl_array_value!(u32, Uint32Array);
impl_array_value!(i64, Int64Array);
impl_array_value!(u64, Uint64Array);
impl_array_value!(String, StringArray);
impl_array_value!(bool, BooleanArray);
impl_array_value!(i8, Int8Array);

impl ToValue for NvList {
    fn to_value(&self) -> Value {
        Value::Nvlist(self.clone())
    }
}

impl FromValue for NvList {
    fn from_value(pair: &str, value: &Value) -> Result<Self, MarshalError> {
        match value {
            Value::Nvlist(v) => Ok(v.clone()),
            _ => type_mismatch(pair, "NvList"),
        }
    }
}

impl ToValue for Vec<NvList> {
    fn to_value(&self) -> Value {
        Value::NvlistArray(self.clone())
    }
}

impl FromValue for Vec<NvList> {
    fn from_value(pair: &str, value: &Value) -> Result<Self, MarshalError> {
        match value {
            Value::NvlistArray(v) => Ok(v.clone()),
            _ => type_mismatch(pair, "Vec<NvList>"),
        }
    }
}

impl ToValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl FromValue for Value {
    fn from_value(_pair: &str, value: &Value) -> Result<Self, MarshalError> {
        Ok(value.clone())
    }
}

/// Convenience for nested struct fields and any other [`NvValue`]
/// implementer reached via [`Value::Nvlist`].
pub fn nested_to_value<T: NvValue>(value: &T) -> Value {
    Value::Nvlist(encode(value))
}

/// # Errors
///
/// Returns [`MarshalError`] if `value` is not [`Value::Nvlist`], or the
/// nested list fails to decode into `T`.
pub fn nested_from_value<T: NvValue>(pair: &str, value: &Value) -> Result<T, MarshalError> {
    match value {
        Value::Nvlist(list) => T::from_pairs(list),
        _ => type_mismatch(pair, "nested struct"),
    }
}

/// Convenience for fields holding a sequence of nested [`NvValue`]
/// implementers, encoded as [`Value::NvlistArray`].
pub fn nested_array_to_value<T: NvValue>(values: &[T]) -> Value {
    Value::NvlistArray(values.iter().map(encode).collect())
}

/// # Errors
///
/// Returns [`MarshalError`] if `value` is not [`Value::NvlistArray`], or any
/// element fails to decode into `T`.
pub fn nested_array_from_value<T: NvValue>(
    pair: &str,
    value: &Value,
) -> Result<Vec<T>, MarshalError> {
    match value {
        Value::NvlistArray(lists) => lists.iter().map(T::from_pairs).collect(),
        _ => type_mismatch(pair, "Vec<nested struct>"),
    }
}

////////////////////////////////////////////////////////////////////////////////

#[derive(Debug)]
pub enum MarshalError {
    /** A required field's nvpair was absent from the list.
     *
     * - `pair` - Field tag name that was looked up.
     */
    MissingField { pair: String },

    /** A pair's value kind could not widen into the destination field type.
     *
     * - `pair`   - Pair name.
     * - `target` - Destination field type name.
     */
    TypeMismatch { pair: String, target: &'static str },

    /** A field's static type has no defined nvpair kind mapping.
     *
     * - `field` - Field name.
     */
    UnsupportedFieldType { field: String },
}

impl fmt::Display for MarshalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarshalError::MissingField { pair } => write!(f, "marshal missing field {pair:?}"),
            MarshalError::TypeMismatch { pair, target } => {
                write!(f, "marshal pair {pair:?} is not compatible with {target}")
            }
            MarshalError::UnsupportedFieldType { field } => {
                write!(f, "marshal field {field:?} has no supported nvpair kind")
            }
        }
    }
}

#[cfg(feature = "std")]
impl error::Error for MarshalError {}

#[cfg(test)]
mod tests {
    use super::*;

    struct Flags {
        enabled: bool,
        count: u32,
    }

    impl NvValue for Flags {
        fn to_pairs(&self, list: &mut NvList) {
            list.push("enabled", self.enabled.to_value());
            list.push("count", self.count.to_value());
        }

        fn from_pairs(list: &NvList) -> Result<Self, MarshalError> {
            let enabled = list
                .get("enabled")
                .ok_or_else(|| MarshalError::MissingField {
                    pair: "enabled".to_string(),
                })?;
            let count = list.get("count").ok_or_else(|| MarshalError::MissingField {
                pair: "count".to_string(),
            })?;

            Ok(Flags {
                enabled: bool::from_value("enabled", enabled)?,
                count: u32::from_value("count", count)?,
            })
        }
    }

    #[test]
    fn struct_round_trips_through_nvlist() {
        let original = Flags {
            enabled: true,
            count: 7,
        };

        let list = encode(&original);
        let decoded: Flags = decode(&list).unwrap();

        assert_eq!(decoded.enabled, original.enabled);
        assert_eq!(decoded.count, original.count);
    }

    #[test]
    fn widening_conversions_succeed() {
        let v = Value::Int8(-5);
        assert_eq!(i16::from_value("x", &v).unwrap(), -5);
        assert_eq!(i32::from_value("x", &v).unwrap(), -5);
        assert_eq!(i64::from_value("x", &v).unwrap(), -5);
    }

    #[test]
    fn narrowing_conversions_are_rejected() {
        let v = Value::Int32(5);
        assert!(i8::from_value("x", &v).is_err());
    }

    #[test]
    fn field_tag_parses_name_and_options() {
        let tag = FieldTag::parse("raw,byte", "field");
        assert_eq!(tag.name, "raw");
        assert!(tag.byte);
        assert!(tag.matches("RAW"));
    }

    #[test]
    fn field_tag_falls_back_to_identifier() {
        let tag = FieldTag::parse("", "my_field");
        assert_eq!(tag.name, "my_field");
        assert!(!tag.byte);
    }

    #[test]
    fn lookup_field_is_case_insensitive() {
        let mut list = NvList::new();
        list.push("Enabled", Value::BooleanValue(true));
        assert!(lookup_field(&list, "enabled").is_some());
        assert!(lookup_field(&list, "ENABLED").is_some());
        assert!(lookup_field(&list, "other").is_none());
    }

    #[test]
    fn missing_field_is_reported() {
        let list = NvList::new();
        let result: Result<Flags, MarshalError> = decode(&list);
        assert!(matches!(result, Err(MarshalError::MissingField { .. })));
    }
}
