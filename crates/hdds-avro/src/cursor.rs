// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Sequential byte cursor with zigzag varint and string primitives.
//!
//! # Encoding Rules
//!
//! - Integers are zigzag-mapped (`n >= 0 -> 2n`, `n < 0 -> -2n - 1`) and then
//!   written as ULEB128: 7 data bits per byte, bit 7 set while more bytes follow
//! - Strings are a varint UTF-8 byte length followed by the raw bytes
//!
//! # Overflow discipline
//!
//! Reads and writes past the end of the buffer never panic and never fail
//! inline: writes are dropped, reads yield zero bytes (or no value for
//! strings), and in every case the position still advances. Callers check
//! [`Cursor::is_valid`] once after a complete operation sequence.
//!
//! ```
//! use hdds_avro::Cursor;
//!
//! let mut buf = [0u8; 4];
//! let mut cursor = Cursor::new(&mut buf[..]);
//! cursor.write_long(-3);
//! cursor.write_string("hi");
//! assert!(cursor.is_valid());
//! assert_eq!(&buf, &[0x05, 0x04, b'h', b'i']);
//! ```

/// Continuation bit mask (bit 7).
const CONTINUATION_BIT: u8 = 0x80;

/// Data bits mask (bits 0-6).
const DATA_MASK: u8 = 0x7F;

/// Maximum bytes needed to encode an i64 as a zigzag varint.
pub const MAX_VARINT_LEN: usize = 10;

/// Cursor over a byte buffer.
///
/// `Cursor<&[u8]>` reads, `Cursor<&mut [u8]>` (or any `AsMut<[u8]>` buffer)
/// also writes.
#[derive(Debug, Clone)]
pub struct Cursor<B> {
    buf: B,
    pos: usize,
}

/// Cursor used by readers.
pub type ReadCursor<'a> = Cursor<&'a [u8]>;

/// Cursor used by writers.
pub type WriteCursor<'a> = Cursor<&'a mut [u8]>;

#[inline]
fn zigzag(n: i64) -> u64 {
    ((n << 1) ^ (n >> 63)) as u64
}

#[inline]
fn unzigzag(n: u64) -> i64 {
    ((n >> 1) as i64) ^ -((n & 1) as i64)
}

impl<B: AsRef<[u8]>> Cursor<B> {
    /// Create a cursor at position zero.
    pub fn new(buf: B) -> Self {
        Self { buf, pos: 0 }
    }

    /// Current position (may exceed the buffer length after an overflow).
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Move to an absolute position.
    pub fn set_position(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// Buffer length in bytes.
    pub fn capacity(&self) -> usize {
        self.buf.as_ref().len()
    }

    /// Bytes left between the position and the end of the buffer.
    pub fn remaining(&self) -> usize {
        self.capacity().saturating_sub(self.pos)
    }

    /// `true` while every operation so far stayed within the buffer.
    pub fn is_valid(&self) -> bool {
        self.pos <= self.capacity()
    }

    /// Consume the cursor, returning the underlying buffer.
    pub fn into_inner(self) -> B {
        self.buf
    }

    /// Advance by `len` bytes without reading them.
    pub fn advance(&mut self, len: usize) {
        self.pos = self.pos.saturating_add(len);
    }

    /// Park the cursor past the end so `is_valid` reports a failure.
    pub fn invalidate(&mut self) {
        self.pos = self.capacity().saturating_add(1);
    }

    #[inline]
    fn next_byte(&mut self) -> u8 {
        let byte = self.buf.as_ref().get(self.pos).copied().unwrap_or(0);
        self.pos = self.pos.saturating_add(1);
        byte
    }

    /// Read a zigzag varint.
    ///
    /// Bytes past the end read as zero, which terminates the varint; the
    /// overflow then shows up in [`is_valid`](Self::is_valid).
    pub fn read_long(&mut self) -> i64 {
        let mut result: u64 = 0;
        let mut shift: u32 = 0;
        loop {
            let byte = self.next_byte();
            // Bits beyond 64 are dropped; well-formed input never has them.
            if shift < 64 {
                result |= u64::from(byte & DATA_MASK) << shift;
            }
            if byte & CONTINUATION_BIT == 0 {
                return unzigzag(result);
            }
            shift = shift.saturating_add(7);
        }
    }

    /// Advance past a varint without decoding it.
    pub fn skip_long(&mut self) {
        while self.next_byte() & CONTINUATION_BIT != 0 {}
    }

    /// Read `len` raw bytes, or `None` if they run past the buffer end.
    pub fn read_fixed(&mut self, len: usize) -> Option<&[u8]> {
        let start = self.pos;
        let end = start.saturating_add(len);
        self.pos = end;
        self.buf.as_ref().get(start..end)
    }

    /// Read a length-prefixed UTF-8 string.
    ///
    /// Returns `None` (and leaves the cursor invalid) when the indicated
    /// length runs past the buffer end. Invalid UTF-8 sequences are replaced
    /// with U+FFFD.
    pub fn read_string(&mut self) -> Option<String> {
        let len = self.read_long();
        let Ok(len) = usize::try_from(len) else {
            self.invalidate();
            return None;
        };
        self.read_fixed(len)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    /// Advance past a length-prefixed string.
    pub fn skip_string(&mut self) {
        let len = self.read_long();
        match usize::try_from(len) {
            Ok(len) => self.advance(len),
            Err(_) => self.invalidate(),
        }
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> Cursor<B> {
    #[inline]
    fn put_byte(&mut self, byte: u8) {
        if let Some(slot) = self.buf.as_mut().get_mut(self.pos) {
            *slot = byte;
        }
        self.pos = self.pos.saturating_add(1);
    }

    /// Write a zigzag varint.
    ///
    /// ```text
    /// -3 -> zigzag 5 -> 0x05
    /// 64 -> zigzag 128 = 0b1_0000000 -> [0x80, 0x01]
    /// ```
    pub fn write_long(&mut self, n: i64) {
        let mut value = zigzag(n);
        loop {
            let byte = (value & u64::from(DATA_MASK)) as u8;
            value >>= 7;
            if value == 0 {
                self.put_byte(byte);
                return;
            }
            self.put_byte(byte | CONTINUATION_BIT);
        }
    }

    /// Write raw bytes (dropped, but counted, if they do not fit).
    pub fn write_fixed(&mut self, bytes: &[u8]) {
        let start = self.pos;
        let end = start.saturating_add(bytes.len());
        if let Some(dst) = self.buf.as_mut().get_mut(start..end) {
            dst.copy_from_slice(bytes);
        }
        self.pos = end;
    }

    /// Write a length-prefixed UTF-8 string (length = UTF-8 byte count).
    pub fn write_string(&mut self, s: &str) {
        let bytes = s.as_bytes();
        self.write_long(bytes.len() as i64);
        self.write_fixed(bytes);
    }
}
