// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Schema compilation must reject malformed input with an error, not a panic.
    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(ty) = hdds_avro::parse_str(text) {
            let _ = ty.to_text(&hdds_avro::Value::Null);
        }
    }
});
