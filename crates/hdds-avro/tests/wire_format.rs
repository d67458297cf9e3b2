// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//
// Wire format: byte-exact encodings and encode -> decode -> re-encode
// stability for strings, arrays and records.

#![allow(clippy::unreadable_literal)]
#![allow(clippy::missing_panics_doc)]

use hdds_avro::{parse, Cursor, Error, TypeRef, Value};
use serde_json::json;

fn string_array() -> TypeRef {
    parse(&json!({"type": "array", "items": "string"})).unwrap()
}

fn roundtrip_long(n: i64) -> i64 {
    let mut buf = [0u8; 10];
    let mut writer = Cursor::new(&mut buf[..]);
    writer.write_long(n);
    assert!(writer.is_valid());
    let len = writer.position();

    let mut reader = Cursor::new(&buf[..len]);
    let out = reader.read_long();
    assert!(reader.is_valid());
    assert_eq!(reader.position(), len);
    out
}

#[test]
fn test_long_boundaries() {
    let p30 = 1i64 << 30;
    let p53 = (1i64 << 53) - 1;
    for n in [
        0,
        1,
        -1,
        63,
        -64,
        64,
        -65,
        p30 - 1,
        p30,
        p30 + 1,
        -p30 - 1,
        -p30,
        -p30 + 1,
        p53,
        -p53,
        p53 + 1,
        -p53 - 1,
        i64::MAX,
        i64::MIN,
    ] {
        assert_eq!(roundtrip_long(n), n, "long {}", n);
    }
}

#[test]
fn test_long_random() {
    let mut rng = fastrand::Rng::with_seed(0x5eed);
    for _ in 0..2000 {
        let n = rng.i64(..);
        assert_eq!(roundtrip_long(n), n);
        let shift = rng.u32(0..63);
        let small = n >> shift;
        assert_eq!(roundtrip_long(small), small);
    }
}

#[test]
fn test_string_length_is_byte_count() {
    let ty = parse("string").unwrap();
    // 4 chars, 10 bytes.
    let s = "aé€😀";
    assert_eq!(s.chars().count(), 4);
    assert_eq!(s.len(), 10);
    let bytes = ty.encode(&Value::from(s)).unwrap();
    assert_eq!(bytes[0], 20);
    assert_eq!(&bytes[1..], s.as_bytes());
    assert_eq!(ty.decode(&bytes).unwrap(), Value::from(s));
}

#[test]
fn test_string_random() {
    let ty = parse("string").unwrap();
    let mut rng = fastrand::Rng::with_seed(7);
    for _ in 0..500 {
        let len = rng.usize(0..40);
        let s: String = (0..len)
            .map(|_| match rng.u8(0..3) {
                0 => rng.alphanumeric(),
                1 => rng.char('\u{80}'..='\u{7ff}'),
                _ => rng.char('\u{1f300}'..='\u{1f5ff}'),
            })
            .collect();
        let bytes = ty.encode(&Value::from(s.as_str())).unwrap();
        assert_eq!(ty.decode(&bytes).unwrap().as_str(), Some(s.as_str()));
    }
}

#[test]
fn test_empty_array_is_single_terminator() {
    let ty = string_array();
    assert_eq!(ty.encode(&Value::Array(Vec::new())).unwrap(), vec![0x00]);
}

#[test]
fn test_array_ends_with_zero_block() {
    let ty = string_array();
    let bytes = ty.encode(&Value::from(vec!["a", "bc"])).unwrap();
    assert_eq!(bytes, vec![0x04, 0x02, b'a', 0x04, b'b', b'c', 0x00]);
}

#[test]
fn test_array_accepts_multi_block_and_sized_blocks() {
    let ty = string_array();
    let expected = Value::from(vec!["a", "b", "c"]);

    // Two positive blocks.
    let multi = [0x02, 0x02, b'a', 0x04, 0x02, b'b', 0x02, b'c', 0x00];
    assert_eq!(ty.decode(&multi).unwrap(), expected);

    // Negative count (-2) with byte size 4, then a positive block.
    let sized = [0x03, 0x08, 0x02, b'a', 0x02, b'b', 0x02, 0x02, b'c', 0x00];
    assert_eq!(ty.decode(&sized).unwrap(), expected);

    // Re-encoding normalizes to a single block.
    assert_eq!(
        ty.encode(&expected).unwrap(),
        vec![0x06, 0x02, b'a', 0x02, b'b', 0x02, b'c', 0x00]
    );
}

#[test]
fn test_truncated_array() {
    let ty = string_array();
    let err = ty.decode(&[0x04, 0x02, b'a']).unwrap_err();
    assert!(matches!(err, Error::TruncatedBuffer));
}

#[test]
fn test_record_fields_in_declared_order() {
    let ty = parse(&json!({
        "type": "record",
        "name": "Pair",
        "fields": [
            {"name": "z", "type": "string"},
            {"name": "a", "type": "string"}
        ]
    }))
    .unwrap();

    // Supplied out of declaration order.
    let value = Value::from(json!({"a": "second", "z": "first"}));
    let bytes = ty.encode(&value).unwrap();
    let mut expected = vec![0x0A];
    expected.extend_from_slice(b"first");
    expected.push(0x0C);
    expected.extend_from_slice(b"second");
    assert_eq!(bytes, expected);

    let decoded = ty.decode(&bytes).unwrap();
    assert_eq!(ty.encode(&decoded).unwrap(), bytes);
    assert_eq!(ty.to_text(&decoded).unwrap(), r#"{"z":"first","a":"second"}"#);
}

#[test]
fn test_record_instance_set_out_of_order() {
    let ty = parse(&json!({
        "type": "record",
        "name": "Pair",
        "fields": [
            {"name": "z", "type": "string"},
            {"name": "a", "type": "string"}
        ]
    }))
    .unwrap();
    let record_type = ty.as_record().unwrap();

    let mut record = record_type.new_record();
    record.set("a", "2").unwrap();
    record.set("z", "1").unwrap();
    assert_eq!(record.encode().unwrap(), vec![0x02, b'1', 0x02, b'2']);
    assert!(record.set("missing", "x").is_err());
}

#[test]
fn test_random_record_roundtrip() {
    let ty = parse(&json!({
        "type": "record",
        "name": "Doc",
        "namespace": "test",
        "fields": [
            {"name": "title", "type": "string"},
            {"name": "tags", "type": {"type": "array", "items": "string"}},
            {"name": "matrix", "type": {
                "type": "array",
                "items": {"type": "array", "items": "string"}
            }}
        ]
    }))
    .unwrap();

    fn word(rng: &mut fastrand::Rng) -> String {
        let len = rng.usize(0..8);
        (0..len).map(|_| rng.alphanumeric()).collect()
    }

    let mut rng = fastrand::Rng::with_seed(42);

    for _ in 0..200 {
        let title = word(&mut rng);
        let tags: Vec<String> = (0..rng.usize(0..5)).map(|_| word(&mut rng)).collect();
        let matrix: Vec<Vec<String>> = (0..rng.usize(0..4))
            .map(|_| (0..rng.usize(0..4)).map(|_| word(&mut rng)).collect())
            .collect();
        let value = Value::from(json!({"title": title, "tags": tags, "matrix": matrix}));

        assert!(ty.is_valid(&value));
        let bytes = ty.encode(&value).unwrap();
        let decoded = ty.decode(&bytes).unwrap();
        assert_eq!(decoded, value);
        assert_eq!(ty.encode(&decoded).unwrap(), bytes);
    }
}

#[test]
fn test_object_value_roundtrip() {
    let ty = parse(&json!({
        "type": "record",
        "name": "One",
        "fields": [{"name": "a", "type": "string"}]
    }))
    .unwrap();
    let value = Value::from(json!({"a": "x"}));
    assert!(ty.is_valid(&value));
    let decoded = ty.decode(&ty.encode(&value).unwrap()).unwrap();
    assert!(matches!(decoded, Value::Record(_)));
    assert_eq!(decoded, value);
}
