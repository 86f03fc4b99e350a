//! Integration tests for `#[derive(NvValue)]`, exercised against the named
//! fixtures from spec.md §8.

#[path = "fixtures.rs"]
mod fixtures;

use nvpair::kind::Encoding;
use nvpair::marshal::{self, MarshalError};
use nvpair::nv;
use nvpair::value::{NvList, Value};

#[derive(nvpair::NvValue)]
struct Bools {
    #[nv(name = "false")]
    a: bool,
    #[nv(name = "true")]
    b: bool,
}

#[test]
fn marshals_struct_to_the_bools_fixture_exactly() {
    let original = Bools { a: false, b: true };
    let encoded = marshal::encode(&original);

    assert_eq!(
        nv::encode(&encoded, Encoding::Xdr),
        nv::encode(&fixtures::bools(), Encoding::Xdr)
    );
}

#[derive(nvpair::NvValue)]
struct Int8s {
    #[nv(name = "-128")]
    min: i8,
    #[nv(name = "-127")]
    near_min: i8,
    #[nv(name = "-64")]
    neg_half: i8,
    #[nv(name = "-1")]
    neg_one: i8,
    #[nv(name = "0")]
    zero: i8,
    #[nv(name = "1")]
    one: i8,
    #[nv(name = "63")]
    pos_half: i8,
    #[nv(name = "126")]
    near_max: i8,
    #[nv(name = "127")]
    max: i8,
}

#[test]
fn unmarshals_the_int8s_fixture_with_exact_values() {
    let list = fixtures::int8s();
    let decoded: Int8s = marshal::decode(&list).unwrap();

    assert_eq!(decoded.min, -128);
    assert_eq!(decoded.near_min, -127);
    assert_eq!(decoded.neg_half, -64);
    assert_eq!(decoded.neg_one, -1);
    assert_eq!(decoded.zero, 0);
    assert_eq!(decoded.one, 1);
    assert_eq!(decoded.pos_half, 63);
    assert_eq!(decoded.near_max, 126);
    assert_eq!(decoded.max, 127);
}

#[derive(nvpair::NvValue, PartialEq, Debug)]
struct Point {
    x: i32,
    y: i32,
}

#[derive(nvpair::NvValue)]
struct Labeled {
    name: String,
    #[nv(name = "location")]
    point: Point,
}

#[test]
fn nested_struct_field_round_trips() {
    let original = Labeled {
        name: "origin".to_string(),
        point: Point { x: 1, y: 2 },
    };

    let list = marshal::encode(&original);
    let decoded: Labeled = marshal::decode(&list).unwrap();

    assert_eq!(decoded.name, "origin");
    assert_eq!(decoded.point, Point { x: 1, y: 2 });
}

#[test]
fn nested_struct_field_wrong_kind_is_type_mismatch() {
    let mut list = NvList::new();
    list.push("name", Value::String("x".to_string()));
    list.push("location", Value::Int32(5)); // not an Nvlist

    let result: Result<Labeled, MarshalError> = marshal::decode(&list);
    assert!(matches!(result, Err(MarshalError::TypeMismatch { .. })));
}

#[derive(nvpair::NvValue)]
struct WithOptional {
    required: u32,
    nickname: Option<String>,
}

#[test]
fn option_field_round_trips_present_and_absent() {
    let present = WithOptional {
        required: 1,
        nickname: Some("bob".to_string()),
    };
    let list = marshal::encode(&present);
    assert!(list.get("nickname").is_some());
    let decoded: WithOptional = marshal::decode(&list).unwrap();
    assert_eq!(decoded.nickname.as_deref(), Some("bob"));

    let absent = WithOptional {
        required: 2,
        nickname: None,
    };
    let list = marshal::encode(&absent);
    assert!(list.get("nickname").is_none());
    let decoded: WithOptional = marshal::decode(&list).unwrap();
    assert_eq!(decoded.nickname, None);
}

#[derive(nvpair::NvValue)]
struct Missing {
    #[allow(dead_code)]
    required: u32,
}

#[test]
fn missing_required_field_is_reported() {
    let list = NvList::new();
    let result: Result<Missing, MarshalError> = marshal::decode(&list);
    assert!(matches!(result, Err(MarshalError::MissingField { .. })));
}

#[derive(nvpair::NvValue)]
struct RawBytes {
    #[nv(name = "tag", byte)]
    tag: u8,
    #[nv(name = "payload", byte)]
    payload: Vec<u8>,
}

#[test]
fn byte_option_selects_raw_byte_kind() {
    let original = RawBytes {
        tag: 0x41,
        payload: vec![0xde, 0xad, 0xbe, 0xef],
    };
    let list = marshal::encode(&original);

    assert!(matches!(list.get("tag"), Some(Value::Byte(0x41))));
    assert!(matches!(list.get("payload"), Some(Value::ByteArray(v)) if v == &[0xde, 0xad, 0xbe, 0xef]));

    let decoded: RawBytes = marshal::decode(&list).unwrap();
    assert_eq!(decoded.tag, 0x41);
    assert_eq!(decoded.payload, vec![0xde, 0xad, 0xbe, 0xef]);
}

#[derive(nvpair::NvValue)]
struct Vectors {
    points: Vec<Point>,
}

#[test]
fn vec_of_nested_struct_round_trips_as_nvlist_array() {
    let original = Vectors {
        points: vec![Point { x: 1, y: 2 }, Point { x: 3, y: 4 }],
    };
    let list = marshal::encode(&original);
    assert!(matches!(list.get("points"), Some(Value::NvlistArray(v)) if v.len() == 2));

    let decoded: Vectors = marshal::decode(&list).unwrap();
    assert_eq!(decoded.points.len(), 2);
    assert_eq!(decoded.points[0], Point { x: 1, y: 2 });
    assert_eq!(decoded.points[1], Point { x: 3, y: 4 });
}
