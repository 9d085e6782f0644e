/***************************************************************************************************
 * Copyright (c) 2021-2023 Qualcomm Innovation Center, Inc. All rights reserved.
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy of this software
 * and associated documentation files (the “Software”), to deal in the Software without
 * restriction, including without limitation the rights to use, copy, modify, merge, publish,
 * distribute, sublicense, and/or sell copies of the Software, and to permit persons to whom the
 * Software is furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice (including the next
 * paragraph) shall be included in all copies or substantial portions of the
 * Software.
 *
 * THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING
 * BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
 * NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
 * DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.
 **************************************************************************************************/
/***************************************************************************************************
 * cbor_canon byte writer (C1, write side)
 *
 * The teacher's `EncodeBuffer` writes into a caller-supplied fixed-size slice and patches array
 * and map item counts in after the fact, because its builder closures don't know the final count
 * until they finish. This encoder always knows its counts up front (they come straight from
 * `Vec::len`/`CborMap::len` on an already-built value graph), so the writer only needs to grow
 * and append - the teacher's `move_items` fixup has no counterpart here.
 **************************************************************************************************/
#[cfg(feature = "trace")]
use func_trace::trace;

use crate::constants::*;

#[cfg(feature = "trace")]
func_trace::init_depth_var!();

/// An append-only growing byte buffer used to serialize tokens into CBOR bytes.
#[derive(Default)]
pub struct Writer {
    bytes: Vec<u8>,
}

impl Writer {
    /// A new, empty writer.
    pub fn new() -> Writer {
        Writer { bytes: Vec::new() }
    }

    /// Append a single byte.
    #[cfg_attr(feature = "trace", trace)]
    pub fn write_byte(&mut self, b: u8) {
        self.bytes.push(b);
    }

    /// Append raw bytes.
    #[cfg_attr(feature = "trace", trace)]
    pub fn write_slice(&mut self, s: &[u8]) {
        self.bytes.extend_from_slice(s);
    }

    /// Append a big-endian `u16`.
    pub fn write_u16(&mut self, v: u16) {
        self.write_slice(&v.to_be_bytes());
    }

    /// Append a big-endian `u32`.
    pub fn write_u32(&mut self, v: u32) {
        self.write_slice(&v.to_be_bytes());
    }

    /// Append a big-endian `u64`.
    pub fn write_u64(&mut self, v: u64) {
        self.write_slice(&v.to_be_bytes());
    }

    /// Write `major | additional_info` followed by `argument` in its smallest legal form (§4.1).
    /// This is the single place that implements the "smallest form" invariant (§3.3 invariants
    /// 3 and 4) for every integer-argument-bearing major type (0, 1, 2, 3, 4, 5 and the tag
    /// number of major 6).
    #[cfg_attr(feature = "trace", trace)]
    pub fn write_argument(&mut self, major: u8, argument: u64) {
        if argument <= PAYLOAD_AI_BITS as u64 {
            self.write_byte(major | argument as u8);
        } else if argument <= u8::MAX as u64 {
            self.write_byte(major | PAYLOAD_ONE_BYTE);
            self.write_byte(argument as u8);
        } else if argument <= u16::MAX as u64 {
            self.write_byte(major | PAYLOAD_TWO_BYTES);
            self.write_u16(argument as u16);
        } else if argument <= u32::MAX as u64 {
            self.write_byte(major | PAYLOAD_FOUR_BYTES);
            self.write_u32(argument as u32);
        } else {
            self.write_byte(major | PAYLOAD_EIGHT_BYTES);
            self.write_u64(argument);
        }
    }

    /// Consume the writer, returning the accumulated bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// The number of bytes written so far.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True if nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argument_bytes(major: u8, argument: u64) -> Vec<u8> {
        let mut w = Writer::new();
        w.write_argument(major, argument);
        w.into_bytes()
    }

    #[test]
    fn smallest_form_is_chosen_at_every_boundary() {
        assert_eq!(argument_bytes(MT_UINT, 23), vec![0x17]);
        assert_eq!(argument_bytes(MT_UINT, 24), vec![0x18, 24]);
        assert_eq!(argument_bytes(MT_UINT, 255), vec![0x18, 255]);
        assert_eq!(argument_bytes(MT_UINT, 256), vec![0x19, 0x01, 0x00]);
        assert_eq!(argument_bytes(MT_UINT, 65535), vec![0x19, 0xff, 0xff]);
        assert_eq!(
            argument_bytes(MT_UINT, 65536),
            vec![0x1a, 0x00, 0x01, 0x00, 0x00]
        );
        assert_eq!(
            argument_bytes(MT_UINT, u32::MAX as u64),
            vec![0x1a, 0xff, 0xff, 0xff, 0xff]
        );
        assert_eq!(
            argument_bytes(MT_UINT, u32::MAX as u64 + 1),
            vec![0x1b, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00]
        );
    }
}
