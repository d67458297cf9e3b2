// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use hdds_avro::{parse_str, DecodeOptions, TypeRef};
use libfuzzer_sys::fuzz_target;
use std::sync::OnceLock;

const SCHEMA: &str = r#"{
    "type": "record",
    "name": "Envelope",
    "namespace": "fuzz",
    "fields": [
        {"name": "topic", "type": "string"},
        {"name": "tags", "type": {"type": "array", "items": "string"}, "default": []},
        {"name": "rows", "type": {"type": "array", "items": {
            "type": "record",
            "name": "Row",
            "fields": [
                {"name": "key", "type": "string"},
                {"name": "cells", "type": {"type": "array", "items": "string"}}
            ]
        }}}
    ]
}"#;

fn envelope() -> &'static TypeRef {
    static TYPE: OnceLock<TypeRef> = OnceLock::new();
    TYPE.get_or_init(|| parse_str(SCHEMA).expect("fuzz schema parses"))
}

fuzz_target!(|data: &[u8]| {
    let ty = envelope();

    // Skipping must never panic, whatever the input.
    let mut cursor = hdds_avro::Cursor::new(data);
    ty.skip(&mut cursor);

    let options = DecodeOptions {
        allow_trailing_data: true,
        ..Default::default()
    };
    if let Ok((value, _)) = ty.decode_with(data, options) {
        // Whatever decodes must re-encode and decode to the same value.
        assert!(ty.is_valid(&value));
        let bytes = ty.encode(&value).expect("decoded value encodes");
        assert_eq!(ty.decode(&bytes).expect("re-encoded value decodes"), value);
    }
});
