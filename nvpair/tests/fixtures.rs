//! Shared fixture builders for the named test cases from spec.md §8.
//!
//! Each `pub fn` here builds the value-tree side of one named fixture.
//! Included (not `mod`'d as its own crate) by every other integration test
//! file via `#[path = "fixtures.rs"] mod fixtures;`, since there is no
//! library-internal place for cross-file test helpers without a `tests/`
//! support crate.

#![allow(dead_code)]

use nvpair::value::{NvList, Value};

pub fn empty() -> NvList {
    NvList::new()
}

pub fn bools() -> NvList {
    let mut list = NvList::new();
    list.push("false", Value::BooleanValue(false));
    list.push("true", Value::BooleanValue(true));
    list
}

pub fn bytes() -> NvList {
    let mut list = NvList::new();
    list.push("0", Value::Byte(0x00));
    list.push("1", Value::Byte(0x01));
    list.push("127", Value::Byte(0x7f));
    list
}

pub fn int8s() -> NvList {
    let mut list = NvList::new();
    for (key, value) in [
        ("-128", -128i8),
        ("-127", -127),
        ("-64", -64),
        ("-1", -1),
        ("0", 0),
        ("1", 1),
        ("63", 63),
        ("126", 126),
        ("127", 127),
    ] {
        list.push(key, Value::Int8(value));
    }
    list
}

pub fn uint64s() -> NvList {
    let mut list = NvList::new();
    for (key, value) in [
        ("0", 0u64),
        ("1", 1),
        ("9223372036854775807", 9223372036854775807),
        ("18446744073709551614", 18446744073709551614),
        ("18446744073709551615", 18446744073709551615),
    ] {
        list.push(key, Value::Uint64(value));
    }
    list
}

pub fn strings() -> NvList {
    let mut list = NvList::new();
    // "0", "01", "012", ..., "01234567": each key maps to itself.
    let mut s = String::new();
    for digit in 0..8 {
        s.push(core::char::from_digit(digit, 10).unwrap());
        list.push(s.clone(), Value::String(s.clone()));
    }
    // A non-printable, quote-containing key/value pair.
    let weird = "\u{ff}\"";
    list.push(weird, Value::String(weird.to_string()));
    list
}

pub fn nvlist() -> NvList {
    let mut inner_2 = NvList::new();
    inner_2.push("false", Value::BooleanValue(false));
    inner_2.push("true", Value::BooleanValue(true));

    let mut inner_4 = NvList::new();
    inner_4.push("0", Value::Uint8(0));
    inner_4.push("1", Value::Uint8(1));
    inner_4.push("false", Value::BooleanValue(false));
    inner_4.push("true", Value::BooleanValue(true));

    let mut list = NvList::new();
    list.push("2", Value::Nvlist(inner_2));
    list.push("4", Value::Nvlist(inner_4));
    list
}

pub fn nvlist_array() -> NvList {
    let mut a = NvList::new();
    a.push("x", Value::Int32(1));
    a.push("y", Value::Int32(2));

    let mut b = NvList::new();
    b.push("name", Value::String("b".to_string()));

    let mut list = NvList::new();
    list.push("arr", Value::NvlistArray(vec![a, b]));
    list
}

pub fn empty_arrays() -> NvList {
    let mut list = NvList::new();
    list.push("byte_array", Value::ByteArray(vec![]));
    list.push("int8_array", Value::Int8Array(vec![]));
    list.push("uint8_array", Value::Uint8Array(vec![]));
    list.push("int16_array", Value::Int16Array(vec![]));
    list.push("uint16_array", Value::Uint16Array(vec![]));
    list.push("int32_array", Value::Int32Array(vec![]));
    list.push("uint32_array", Value::Uint32Array(vec![]));
    list.push("int64_array", Value::Int64Array(vec![]));
    list.push("uint64_array", Value::Uint64Array(vec![]));
    list.push("string_array", Value::StringArray(vec![]));
    list.push("boolean_array", Value::BooleanArray(vec![]));
    list.push("nvlist_array", Value::NvlistArray(vec![]));
    list
}

pub fn doubles() -> NvList {
    let mut list = NvList::new();
    list.push("pi", Value::Double(core::f64::consts::PI));
    list.push("e", Value::Double(core::f64::consts::E));
    list.push("min", Value::Double(f64::MIN));
    list.push("max", Value::Double(f64::MAX));
    list.push("zero", Value::Double(0.0));
    list.push("neg_zero", Value::Double(-0.0));
    list.push("epsilon", Value::Double(f64::EPSILON));
    list
}

/// Fixed-length integer arrays (length 4 and 5) of every signed/unsigned
/// width, per the reference test-vector generator's fixture set.
pub fn fixed_length_arrays() -> NvList {
    let mut list = NvList::new();
    list.push("i8_4", Value::Int8Array(vec![1, -2, 3, -4]));
    list.push("u8_5", Value::Uint8Array(vec![1, 2, 3, 4, 5]));
    list.push("i16_4", Value::Int16Array(vec![1, -2, 3, -4]));
    list.push("u16_5", Value::Uint16Array(vec![1, 2, 3, 4, 5]));
    list.push("i32_4", Value::Int32Array(vec![1, -2, 3, -4]));
    list.push("u32_5", Value::Uint32Array(vec![1, 2, 3, 4, 5]));
    list.push("i64_4", Value::Int64Array(vec![1, -2, 3, -4]));
    list.push("u64_5", Value::Uint64Array(vec![1, 2, 3, 4, 5]));
    list
}
