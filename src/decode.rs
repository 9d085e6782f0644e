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
 * cbor_canon strict decoder (C5, §4.5)
 *
 * A recursive-descent reader that reconstructs a `Value` graph from bytes, dispatching majors
 * through the decode jump table (§4.3 / `jump_table.rs`) and, when asked, rejecting every
 * non-canonical encoding rather than silently accepting it. `strict` exists so that
 * `encode(decode(bytes)) == bytes` holds for anything this decoder accepts under it (§8.1
 * "Canonical decode").
 **************************************************************************************************/
use std::cmp::Ordering;

#[cfg(feature = "trace")]
use func_trace::trace;

use crate::constants::*;
use crate::encode::{
    canonical_key_bytes, f16_roundtrip_bits, f32_roundtrip_bits, CANONICAL_NAN_F16,
    INT_NORMALIZATION_UPPER_BOUND,
};
use crate::error::{CodecError, Result};
use crate::jump_table::{decode_spec, ArgSize};
use crate::ordering::compare_encoded_keys;
use crate::reader::Reader;
use crate::registry::TagDecoders;
use crate::value::{CborMap, Integer, Value};

#[cfg(feature = "trace")]
func_trace::init_depth_var!();

/// The default maximum value-graph nesting depth (§5), matched to [`crate::encode::DEFAULT_MAX_DEPTH`].
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Options controlling [`decode`] (§4.5).
#[derive(Clone)]
pub struct DecodeOptions {
    /// Accept indefinite-length items and `break`. Default `true`.
    pub allow_indefinite: bool,
    /// Accept major 7 minor 23 (`undefined`). Default `true`.
    pub allow_undefined: bool,
    /// Accept integers outside native signed-64-bit range (promoting to [`Integer::Big`]).
    /// Default `true`.
    pub allow_big_int: bool,
    /// Reject any argument (integer value, or container/string length) that is not in its
    /// smallest legal form, any non-canonical float width or NaN pattern, and any map whose
    /// encoded-key bytes are not strictly ascending. Default `false`.
    pub strict: bool,
    /// If `true`, decoded maps may use any [`Value`] as a key. If `false`, every key must decode
    /// to [`Value::Text`], failing with `NonStringMapKey` otherwise. Default `false`.
    pub use_maps: bool,
    /// Tag-number-keyed decoders (§4.7, §6.3). Default: empty, so every tagged item fails with
    /// `UnknownTag`.
    pub tags: TagDecoders,
    /// Reject a map with a repeated key (by logical value equality). Default `true`.
    pub reject_duplicate_map_keys: bool,
    /// Maximum value nesting depth before failing with `MaxDepthExceeded`. Default 64.
    pub max_depth: usize,
}

impl Default for DecodeOptions {
    fn default() -> DecodeOptions {
        DecodeOptions {
            allow_indefinite: true,
            allow_undefined: true,
            allow_big_int: true,
            strict: false,
            use_maps: false,
            tags: TagDecoders::new(),
            reject_duplicate_map_keys: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Decode a single top-level CBOR item from `bytes` (§4.5, §6.1).
///
/// Fails with [`CodecError::TrailingBytes`] if `bytes` holds more than one top-level item
/// (§3.3 invariant 1) - this codec never streams multiple items from one call (§1 Non-goals).
#[cfg_attr(feature = "trace", trace)]
pub fn decode(bytes: &[u8], options: &DecodeOptions) -> Result<Value> {
    let mut reader = Reader::new(bytes);
    let value = decode_value(&mut reader, options, 0)?;
    if reader.remaining() > 0 {
        return Err(CodecError::TrailingBytes(reader.position()));
    }
    Ok(value)
}

/// Decode `bytes` with [`DecodeOptions::default`].
pub fn decode_default(bytes: &[u8]) -> Result<Value> {
    decode(bytes, &DecodeOptions::default())
}

#[cfg_attr(feature = "trace", trace)]
fn decode_value(r: &mut Reader, opts: &DecodeOptions, depth: usize) -> Result<Value> {
    if depth > opts.max_depth {
        return Err(CodecError::MaxDepthExceeded(r.position()));
    }
    let start = r.position();
    let initial = r.read_byte()?;
    let spec = decode_spec(initial);

    // Additional info 31 must be resolved before the major-7 dispatch below: for major 7 itself
    // it names `break`, not a float/simple-value shape, and `decode_indefinite` already routes
    // major 7 to `StrayBreak` when encountered outside an indefinite-length container.
    match spec.arg {
        ArgSize::Reserved => Err(CodecError::ReservedAdditionalInfo(start)),
        ArgSize::Indefinite => decode_indefinite(spec.major, r, opts, depth, start),
        other if spec.major == 7 => decode_major7(other, r, opts, start),
        other => {
            let argument = read_argument(r, other)?;
            check_minimal(opts.strict, start, other, argument)?;
            decode_by_major(spec.major, argument, r, opts, depth, start)
        }
    }
}

/// Read the argument bytes for a definite (non-reserved, non-indefinite) additional-information
/// shape (§4.1, the inverse of `Writer::write_argument`).
fn read_argument(r: &mut Reader, arg: ArgSize) -> Result<u64> {
    match arg {
        ArgSize::Inline(v) => Ok(v as u64),
        ArgSize::One => Ok(r.read_u8()? as u64),
        ArgSize::Two => Ok(r.read_u16()? as u64),
        ArgSize::Four => Ok(r.read_u32()? as u64),
        ArgSize::Eight => r.read_u64(),
        ArgSize::Reserved | ArgSize::Indefinite => {
            unreachable!("caller dispatches Reserved/Indefinite before calling read_argument")
        }
    }
}

/// Under `strict`, reject any argument that was not written in its smallest legal form
/// (§3.3 invariants 3-5, the inverse of `Writer::write_argument`'s form selection).
fn check_minimal(strict: bool, start: usize, arg: ArgSize, value: u64) -> Result<()> {
    if !strict {
        return Ok(());
    }
    let is_minimal = match arg {
        ArgSize::Inline(_) => true,
        ArgSize::One => value > PAYLOAD_AI_BITS as u64,
        ArgSize::Two => value > u8::MAX as u64,
        ArgSize::Four => value > u16::MAX as u64,
        ArgSize::Eight => value > u32::MAX as u64,
        ArgSize::Reserved | ArgSize::Indefinite => true,
    };
    if is_minimal {
        Ok(())
    } else {
        Err(CodecError::NonCanonicalEncoding(start))
    }
}

fn decode_by_major(
    major: u8,
    argument: u64,
    r: &mut Reader,
    opts: &DecodeOptions,
    depth: usize,
    start: usize,
) -> Result<Value> {
    match major {
        0 => {
            let integer = Integer::from_uint_argument(argument);
            check_big_int_allowed(&integer, opts, start)?;
            Ok(Value::Integer(integer))
        }
        1 => {
            let integer = Integer::from_negint_argument(argument);
            check_big_int_allowed(&integer, opts, start)?;
            Ok(Value::Integer(integer))
        }
        2 => {
            let bytes = r.read_slice(argument as usize)?.to_vec();
            Ok(Value::Bytes(bytes))
        }
        3 => {
            let raw = r.read_slice(argument as usize)?;
            let text = std::str::from_utf8(raw)
                .map_err(|_| CodecError::InvalidUtf8(start))?
                .to_owned();
            Ok(Value::Text(text))
        }
        4 => {
            let mut items = Vec::new();
            for _ in 0..argument {
                items.push(decode_value(r, opts, depth + 1)?);
            }
            Ok(Value::array(items))
        }
        5 => decode_map_entries(argument, r, opts, depth),
        6 => {
            let inner = decode_value(r, opts, depth + 1)?;
            match opts.tags.get(argument) {
                Some(decoder) => decoder(inner),
                None => Err(CodecError::UnknownTag {
                    tag: argument,
                    offset: start,
                }),
            }
        }
        _ => unreachable!("major 7 is dispatched by decode_major7 before reaching here"),
    }
}

fn decode_major7(arg: ArgSize, r: &mut Reader, opts: &DecodeOptions, start: usize) -> Result<Value> {
    match arg {
        ArgSize::Inline(ai) => match ai {
            SIMPLE_FALSE => Ok(Value::Bool(false)),
            SIMPLE_TRUE => Ok(Value::Bool(true)),
            SIMPLE_NULL => Ok(Value::Null),
            SIMPLE_UNDEFINED => {
                if opts.allow_undefined {
                    Ok(Value::Undefined)
                } else {
                    Err(CodecError::UndefinedNotAllowed(start))
                }
            }
            // Minor 0-19: unassigned.
            _ => Err(CodecError::UnassignedSimpleValue(start)),
        },
        // Minor 24: one byte of simple-value payload follows. Bytes < 32 are a redundant
        // (non-canonical) re-encoding of an inline value; bytes >= 32 name a simple value this
        // codec does not represent (§1 Non-goals: only false/true/null/undefined). Either way
        // there is no value for this decoder to produce.
        ArgSize::One => {
            r.read_u8()?;
            Err(CodecError::UnassignedSimpleValue(start))
        }
        ArgSize::Two => decode_float(r.read_u16()? as u64, 16, opts, start),
        ArgSize::Four => decode_float(r.read_u32()? as u64, 32, opts, start),
        ArgSize::Eight => decode_float(r.read_u64()?, 64, opts, start),
        ArgSize::Reserved | ArgSize::Indefinite => {
            unreachable!("caller dispatches Reserved/Indefinite before calling decode_major7")
        }
    }
}

fn decode_float(bits: u64, width: u8, opts: &DecodeOptions, start: usize) -> Result<Value> {
    let value = match width {
        16 => half::f16::from_bits(bits as u16).to_f64(),
        32 => f32::from_bits(bits as u32) as f64,
        64 => f64::from_bits(bits),
        _ => unreachable!("width is always 16, 32 or 64"),
    };
    check_float_strict(opts.strict, start, value, width, bits)?;
    Ok(Value::Float(value))
}

/// Under `strict`, reject any float encoding the default encoder (§4.4) would never produce:
/// a non-canonical NaN bit pattern, a whole-number value in `i64` range (the encoder normalizes
/// those to an integer major type instead), or a width wider than the value needs.
fn check_float_strict(strict: bool, start: usize, value: f64, width: u8, bits: u64) -> Result<()> {
    if !strict {
        return Ok(());
    }
    if value.is_nan() {
        return if width == 16 && bits as u16 == CANONICAL_NAN_F16 {
            Ok(())
        } else {
            Err(CodecError::NonCanonicalEncoding(start))
        };
    }
    if value.is_finite()
        && value.fract() == 0.0
        && value >= i64::MIN as f64
        && value < INT_NORMALIZATION_UPPER_BOUND
    {
        return Err(CodecError::NonCanonicalEncoding(start));
    }
    let minimal = match width {
        16 => true,
        32 => f16_roundtrip_bits(value).is_none(),
        64 => f16_roundtrip_bits(value).is_none() && f32_roundtrip_bits(value).is_none(),
        _ => unreachable!("width is always 16, 32 or 64"),
    };
    if minimal {
        Ok(())
    } else {
        Err(CodecError::NonCanonicalEncoding(start))
    }
}

fn check_big_int_allowed(integer: &Integer, opts: &DecodeOptions, start: usize) -> Result<()> {
    if !opts.allow_big_int && integer.to_i64().is_none() {
        Err(CodecError::IntOutOfRange(start))
    } else {
        Ok(())
    }
}

fn decode_map_entries(count: u64, r: &mut Reader, opts: &DecodeOptions, depth: usize) -> Result<Value> {
    let mut map = CborMap::new();
    let mut last_key_bytes: Option<Vec<u8>> = None;
    for _ in 0..count {
        let entry_start = r.position();
        let key = decode_value(r, opts, depth + 1)?;
        let value = decode_value(r, opts, depth + 1)?;
        insert_map_entry(&mut map, &mut last_key_bytes, key, value, opts, entry_start)?;
    }
    Ok(Value::map(map))
}

/// Apply `rejectDuplicateMapKeys`, the `strict` ascending-order check, and `useMaps` to one
/// decoded `(key, value)` pair before it joins the map (§4.5).
fn insert_map_entry(
    map: &mut CborMap,
    last_key_bytes: &mut Option<Vec<u8>>,
    key: Value,
    value: Value,
    opts: &DecodeOptions,
    entry_start: usize,
) -> Result<()> {
    if opts.reject_duplicate_map_keys && map.get(&key).is_some() {
        return Err(CodecError::DuplicateMapKey(entry_start));
    }
    if opts.strict {
        let key_bytes = canonical_key_bytes(&key)?;
        if let Some(previous) = last_key_bytes {
            if compare_encoded_keys(previous, &key_bytes) != Ordering::Less {
                return Err(CodecError::MapKeysOutOfOrder(entry_start));
            }
        }
        *last_key_bytes = Some(key_bytes);
    }
    if !opts.use_maps && !matches!(key, Value::Text(_)) {
        return Err(CodecError::NonStringMapKey(entry_start));
    }
    map.push(key, value);
    Ok(())
}

/// Dispatch an indefinite-length item (additional info 31), only reachable when
/// `allow_indefinite` is set (§4.5). A `break` encountered outside this function - i.e. major 7
/// minor 31 where an ordinary item was expected - is a [`CodecError::StrayBreak`]; inside it is
/// the normal terminator these loops watch for via [`peek_is_break`].
fn decode_indefinite(
    major: u8,
    r: &mut Reader,
    opts: &DecodeOptions,
    depth: usize,
    start: usize,
) -> Result<Value> {
    if !opts.allow_indefinite {
        return Err(CodecError::IndefiniteNotAllowed(start));
    }
    match major {
        2 | 3 => decode_indefinite_string(major, r, opts, start),
        4 => {
            let mut items = Vec::new();
            while !peek_is_break(r)? {
                items.push(decode_value(r, opts, depth + 1)?);
            }
            r.read_byte()?; // consume break
            Ok(Value::array(items))
        }
        5 => {
            let mut map = CborMap::new();
            let mut last_key_bytes: Option<Vec<u8>> = None;
            while !peek_is_break(r)? {
                let entry_start = r.position();
                let key = decode_value(r, opts, depth + 1)?;
                let value = decode_value(r, opts, depth + 1)?;
                insert_map_entry(&mut map, &mut last_key_bytes, key, value, opts, entry_start)?;
            }
            r.read_byte()?; // consume break
            Ok(Value::map(map))
        }
        7 => Err(CodecError::StrayBreak(start)),
        // Majors 0, 1 and 6 have no meaning for additional info 31.
        _ => Err(CodecError::ReservedAdditionalInfo(start)),
    }
}

/// `true` if the next byte is a `break` (major 7, additional info 31), without consuming it.
fn peek_is_break(r: &Reader) -> Result<bool> {
    let byte = r.peek_byte()?;
    let spec = decode_spec(byte);
    Ok(spec.major == 7 && matches!(spec.arg, ArgSize::Indefinite))
}

/// Concatenate the chunks of an indefinite-length byte or text string (§4.5): every chunk must be
/// a definite-length item sharing `major`, else [`CodecError::IndefiniteChunkTypeMismatch`].
fn decode_indefinite_string(major: u8, r: &mut Reader, opts: &DecodeOptions, outer_start: usize) -> Result<Value> {
    let mut combined = Vec::new();
    loop {
        if peek_is_break(r)? {
            r.read_byte()?;
            break;
        }
        let chunk_start = r.position();
        let chunk_initial = r.peek_byte()?;
        let chunk_spec = decode_spec(chunk_initial);
        if chunk_spec.major != major || matches!(chunk_spec.arg, ArgSize::Indefinite) {
            return Err(CodecError::IndefiniteChunkTypeMismatch(chunk_start));
        }
        r.read_byte()?;
        let length = match chunk_spec.arg {
            ArgSize::Reserved => return Err(CodecError::ReservedAdditionalInfo(chunk_start)),
            other => {
                let length = read_argument(r, other)?;
                check_minimal(opts.strict, chunk_start, other, length)?;
                length
            }
        };
        combined.extend_from_slice(r.read_slice(length as usize)?);
    }
    if major == 2 {
        Ok(Value::Bytes(combined))
    } else {
        let text = String::from_utf8(combined).map_err(|_| CodecError::InvalidUtf8(outer_start))?;
        Ok(Value::Text(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unhex(s: &str) -> Vec<u8> {
        hex::decode(s).unwrap()
    }

    #[test]
    fn scenario_three_non_minimal_uint_is_rejected_only_under_strict() {
        let bytes = unhex("1b0000000000000001");
        let strict = DecodeOptions {
            strict: true,
            ..Default::default()
        };
        assert_eq!(
            decode(&bytes, &strict).unwrap_err(),
            CodecError::NonCanonicalEncoding(0)
        );

        let lenient = DecodeOptions::default();
        assert_eq!(decode(&bytes, &lenient).unwrap(), Value::int(1));
    }

    #[test]
    fn scenario_five_indefinite_array_gated_by_allow_indefinite() {
        let bytes = unhex("9fff");
        let disallowed = DecodeOptions {
            allow_indefinite: false,
            ..Default::default()
        };
        assert_eq!(
            decode(&bytes, &disallowed).unwrap_err(),
            CodecError::IndefiniteNotAllowed(0)
        );

        let allowed = DecodeOptions::default();
        assert_eq!(decode(&bytes, &allowed).unwrap(), Value::array(vec![]));
    }

    #[test]
    fn rejects_trailing_bytes_after_top_level_item() {
        let bytes = unhex("0101");
        assert_eq!(decode_default(&bytes).unwrap_err(), CodecError::TrailingBytes(1));
    }

    #[test]
    fn rejects_invalid_utf8_surrogate_half() {
        // The 3-byte sequence that would encode U+D800 if lone surrogate halves were legal in
        // UTF-8 (they are not - RFC 3629 excludes the surrogate range).
        let mut bytes = vec![0x63]; // tstr, length 3
        bytes.extend_from_slice(&[0xed, 0xa0, 0x80]);
        assert!(matches!(decode_default(&bytes).unwrap_err(), CodecError::InvalidUtf8(_)));
    }

    #[test]
    fn rejects_duplicate_map_keys_by_default() {
        // {"a": 1, "a": 2}
        let bytes = unhex("a2616101616102");
        assert!(matches!(
            decode_default(&bytes).unwrap_err(),
            CodecError::DuplicateMapKey(_)
        ));
    }

    #[test]
    fn strict_rejects_out_of_order_map_keys() {
        // {"b": 1, "a": 2} - valid to decode, but strict requires ascending encoded-key order.
        let bytes = unhex("a2616201616102");
        let strict = DecodeOptions {
            strict: true,
            ..Default::default()
        };
        assert!(matches!(
            decode(&bytes, &strict).unwrap_err(),
            CodecError::MapKeysOutOfOrder(_)
        ));
    }

    #[test]
    fn non_string_map_key_rejected_unless_use_maps() {
        // {1: "x"}
        let bytes = unhex("a1016178");
        assert!(matches!(
            decode_default(&bytes).unwrap_err(),
            CodecError::NonStringMapKey(_)
        ));
        let use_maps = DecodeOptions {
            use_maps: true,
            ..Default::default()
        };
        assert!(decode(&bytes, &use_maps).is_ok());
    }

    #[test]
    fn empty_containers_round_trip() {
        assert_eq!(decode_default(&[0x80]).unwrap(), Value::array(vec![]));
        assert_eq!(decode_default(&[0xa0]).unwrap(), Value::map(CborMap::new()));
        assert_eq!(decode_default(&[0x40]).unwrap(), Value::Bytes(vec![]));
        assert_eq!(decode_default(&[0x60]).unwrap(), Value::Text(String::new()));
    }

    #[test]
    fn unknown_tag_without_decoder_fails() {
        let bytes = unhex("c001"); // tag 0, value 1
        assert!(matches!(
            decode_default(&bytes).unwrap_err(),
            CodecError::UnknownTag { tag: 0, .. }
        ));
    }

    #[test]
    fn max_depth_exceeded_on_deeply_nested_array() {
        let mut bytes = Vec::new();
        for _ in 0..100 {
            bytes.push(0x81); // array of 1 element
        }
        bytes.push(0x00);
        assert!(matches!(
            decode_default(&bytes).unwrap_err(),
            CodecError::MaxDepthExceeded(_)
        ));
    }

    #[test]
    fn allow_big_int_false_rejects_magnitudes_outside_i64() {
        let bytes = unhex("1bffffffffffffffff"); // u64::MAX
        let opts = DecodeOptions {
            allow_big_int: false,
            ..Default::default()
        };
        assert!(matches!(decode(&bytes, &opts).unwrap_err(), CodecError::IntOutOfRange(_)));
        assert!(decode_default(&bytes).is_ok());
    }

    #[test]
    fn allow_undefined_false_rejects_undefined() {
        let bytes = [0xf7];
        let opts = DecodeOptions {
            allow_undefined: false,
            ..Default::default()
        };
        assert!(matches!(
            decode(&bytes, &opts).unwrap_err(),
            CodecError::UndefinedNotAllowed(_)
        ));
        assert_eq!(decode_default(&bytes).unwrap(), Value::Undefined);
    }

    #[test]
    fn indefinite_text_string_chunks_concatenate() {
        // (_ "ab", "cd")
        let bytes = vec![0x7f, 0x62, b'a', b'b', 0x62, b'c', b'd', 0xff];
        assert_eq!(decode_default(&bytes).unwrap(), Value::Text("abcd".to_string()));
    }

    #[test]
    fn indefinite_chunk_type_mismatch_is_rejected() {
        // (_ "ab", h'ff') - a bytestring chunk inside a text-string stream.
        let bytes = vec![0x7f, 0x62, b'a', b'b', 0x41, 0xff, 0xff];
        assert!(matches!(
            decode_default(&bytes).unwrap_err(),
            CodecError::IndefiniteChunkTypeMismatch(_)
        ));
    }

    #[test]
    fn stray_break_outside_indefinite_item_is_rejected() {
        assert!(matches!(decode_default(&[0xff]).unwrap_err(), CodecError::StrayBreak(_)));
    }

    #[test]
    fn stray_break_nested_in_a_definite_length_array_is_rejected_not_a_panic() {
        // A definite-length array of 1 element whose element is a bare `break`.
        let bytes = [0x81, 0xff];
        assert!(matches!(decode_default(&bytes).unwrap_err(), CodecError::StrayBreak(_)));
    }

    #[test]
    fn float_exactly_two_pow_63_stays_a_float_under_strict() {
        // 2^63 is not representable as i64 (i64::MAX is 2^63 - 1), so the encoder must not
        // normalize it to an integer, and strict decode must not reject it as non-canonical.
        let value = Value::Float(9223372036854775808.0);
        let bytes = crate::encode::encode_default(&value).unwrap();
        assert_eq!(bytes[0] & MT_MASK, MT_FLOAT);
        let strict = DecodeOptions {
            strict: true,
            ..Default::default()
        };
        assert_eq!(decode(&bytes, &strict).unwrap(), value);
    }

    #[test]
    fn reserved_additional_info_is_rejected() {
        assert!(matches!(
            decode_default(&[0x1c]).unwrap_err(),
            CodecError::ReservedAdditionalInfo(_)
        ));
    }
}
