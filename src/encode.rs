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
 * cbor_canon deterministic encoder (C4, §4.4)
 *
 * Walks a [`Value`] graph and produces the single canonical byte sequence RFC 8949 allows for it:
 * smallest-form arguments everywhere (§3.3 invariants 3-5), maps re-sorted by encoded-key bytes
 * (§3.3 invariant 6, via [`crate::ordering`]), and a cycle check over the shared `Array`/`Map`
 * containers that makes self-reference representable in the first place (§3.3 invariant 7).
 **************************************************************************************************/
use std::rc::Rc;

#[cfg(feature = "trace")]
use func_trace::trace;

use crate::constants::*;
use crate::error::{CodecError, Result};
use crate::ordering::compare_encoded_keys;
use crate::registry::TypeEncoders;
use crate::token::Token;
use crate::value::{classify, Integer, Value};
use crate::writer::Writer;

#[cfg(feature = "trace")]
func_trace::init_depth_var!();

/// The default maximum value-graph nesting depth (§5): encode guards against stack overflow on
/// pathologically deep (but acyclic) input the same way decode guards against deep input bytes.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Options controlling [`encode`] (§4.4).
#[derive(Clone)]
pub struct EncodeOptions {
    /// Skip float minimization; always emit `f64` for non-integer-valued floats. Default `false`.
    pub float64: bool,
    /// Per-logical-type encoder overrides (§4.4 step 2, §4.7). Default: empty, i.e. every value
    /// falls through to the default emitter.
    pub type_encoders: TypeEncoders,
    /// Maximum value-graph nesting depth before failing with `MaxDepthExceeded` (§5). Default 64.
    pub max_depth: usize,
}

impl Default for EncodeOptions {
    fn default() -> EncodeOptions {
        EncodeOptions {
            float64: false,
            type_encoders: TypeEncoders::new(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Encode a [`Value`] graph to its canonical CBOR byte sequence (§4.4, §6.1).
///
/// Two structurally equal value graphs produce byte-identical output under default options
/// (§8.1 "Determinism"). Encoding the same graph twice, or on two different implementations of
/// this spec, converges to the same bytes - that convergence is the entire point of the codec.
#[cfg_attr(feature = "trace", trace)]
pub fn encode(value: &Value, options: &EncodeOptions) -> Result<Vec<u8>> {
    let mut writer = Writer::new();
    let mut ancestors = Vec::new();
    encode_value(value, &mut writer, options, &mut ancestors, 0)?;
    Ok(writer.into_bytes())
}

/// Encode `value` with [`EncodeOptions::default`]. A convenience wrapper over [`encode`] for the
/// overwhelmingly common case: deterministic output, no custom tag encoders.
pub fn encode_default(value: &Value) -> Result<Vec<u8>> {
    encode(value, &EncodeOptions::default())
}

/// Encode `value` into canonical bytes using the default rules only (no `type_encoders`, no
/// cycle-carrying ancestor context beyond this call). Used by the decoder to re-derive a map
/// key's canonical byte form for duplicate-key and strict ordering checks (§4.5) - the decoder
/// has no `typeEncoders` of its own to consult, so the default emitter is exactly what the spec's
/// "encoded-key bytes" comparator operates on.
pub(crate) fn canonical_key_bytes(value: &Value) -> Result<Vec<u8>> {
    let mut writer = Writer::new();
    let mut ancestors = Vec::new();
    let opts = EncodeOptions::default();
    encode_value(value, &mut writer, &opts, &mut ancestors, 0)?;
    Ok(writer.into_bytes())
}

#[cfg_attr(feature = "trace", trace)]
fn encode_value(
    value: &Value,
    w: &mut Writer,
    opts: &EncodeOptions,
    ancestors: &mut Vec<usize>,
    depth: usize,
) -> Result<()> {
    if depth > opts.max_depth {
        return Err(CodecError::MaxDepthExceeded(w.len()));
    }

    if let Some(encoder) = opts.type_encoders.get(classify(value)) {
        if let Some(tokens) = encoder(value) {
            for token in &tokens {
                write_token(w, token, opts.float64)?;
            }
            return Ok(());
        }
    }

    match value {
        Value::Integer(i) => encode_integer(w, i),
        Value::Float(f) => encode_float(w, *f, opts.float64),
        Value::Bool(b) => w.write_byte(MT_SIMPLE | if *b { SIMPLE_TRUE } else { SIMPLE_FALSE }),
        Value::Null => w.write_byte(MT_SIMPLE | SIMPLE_NULL),
        Value::Undefined => w.write_byte(MT_SIMPLE | SIMPLE_UNDEFINED),
        Value::Bytes(b) => {
            w.write_argument(MT_BSTR, b.len() as u64);
            w.write_slice(b);
        }
        Value::Text(s) => {
            w.write_argument(MT_TSTR, s.len() as u64);
            w.write_slice(s.as_bytes());
        }
        Value::Array(items) => {
            let identity = Rc::as_ptr(items) as usize;
            push_ancestor(ancestors, identity)?;
            let borrowed = items.borrow();
            w.write_argument(MT_ARRAY, borrowed.len() as u64);
            for item in borrowed.iter() {
                encode_value(item, w, opts, ancestors, depth + 1)?;
            }
            drop(borrowed);
            ancestors.pop();
        }
        Value::Map(entries) => {
            let identity = Rc::as_ptr(entries) as usize;
            push_ancestor(ancestors, identity)?;
            let borrowed = entries.borrow();
            let mut encoded_entries: Vec<(Vec<u8>, Vec<u8>)> = Vec::with_capacity(borrowed.len());
            for (key, val) in borrowed.iter() {
                let mut key_writer = Writer::new();
                encode_value(key, &mut key_writer, opts, ancestors, depth + 1)?;
                let mut val_writer = Writer::new();
                encode_value(val, &mut val_writer, opts, ancestors, depth + 1)?;
                encoded_entries.push((key_writer.into_bytes(), val_writer.into_bytes()));
            }
            drop(borrowed);
            ancestors.pop();

            // §3.3 invariant 6: ascending order of encoded-key bytes under the §4.6 comparator.
            encoded_entries.sort_by(|a, b| compare_encoded_keys(&a.0, &b.0));
            w.write_argument(MT_MAP, encoded_entries.len() as u64);
            for (key_bytes, val_bytes) in &encoded_entries {
                w.write_slice(key_bytes);
                w.write_slice(val_bytes);
            }
        }
        Value::Tag(tag, inner) => {
            w.write_argument(MT_TAG, *tag);
            encode_value(inner, w, opts, ancestors, depth + 1)?;
        }
    }
    Ok(())
}

/// Push `identity` onto the ancestor stack, failing with `CircularReference` if it is already
/// present (Design Notes: "Cycle detection without a garbage collector" - an O(depth) ancestor
/// stack keyed by container identity, pushed on descent and popped on return).
fn push_ancestor(ancestors: &mut Vec<usize>, identity: usize) -> Result<()> {
    if ancestors.contains(&identity) {
        return Err(CodecError::CircularReference);
    }
    ancestors.push(identity);
    Ok(())
}

fn encode_integer(w: &mut Writer, i: &Integer) {
    let (negative, magnitude) = i.to_wire_argument();
    w.write_argument(if negative { MT_NINT } else { MT_UINT }, magnitude);
}

/// A single canonical NaN bit pattern, used regardless of the `float64` option so that every NaN
/// input converges to the same bytes (§4.4 "NaN canonicalization").
pub(crate) const CANONICAL_NAN_F16: u16 = 0x7e00;
const CANONICAL_NAN_F64: u64 = 0x7ff8_0000_0000_0000;

/// `i64::MAX as f64` rounds up to `2^63` (`i64::MAX` is not exactly representable in `f64`), so a
/// range test against `i64::MAX as f64` would let `2^63` itself through as "fits signed 64-bit" -
/// it does not, `i64::MAX` is `2^63 - 1`. Used as an exclusive upper bound instead (§4.4 integer
/// normalization, also checked by the decoder's `strict` float validator in `decode.rs`).
pub(crate) const INT_NORMALIZATION_UPPER_BOUND: f64 = 9223372036854775808.0;

/// Implements §4.4's float-minimization decision, including the deliberate integer normalization
/// ("a float with no fractional part that fits in signed 64-bit range is encoded as an integer")
/// and NaN canonicalization.
fn encode_float(w: &mut Writer, f: f64, force_f64: bool) {
    if f.is_nan() {
        if force_f64 {
            w.write_byte(MT_FLOAT | FLOAT64);
            w.write_u64(CANONICAL_NAN_F64);
        } else {
            w.write_byte(MT_FLOAT | FLOAT16);
            w.write_u16(CANONICAL_NAN_F16);
        }
        return;
    }

    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < INT_NORMALIZATION_UPPER_BOUND {
        encode_integer(w, &Integer::from(f as i64));
        return;
    }

    if force_f64 {
        write_f64(w, f);
        return;
    }

    if let Some(bits) = f16_roundtrip_bits(f) {
        w.write_byte(MT_FLOAT | FLOAT16);
        w.write_u16(bits);
    } else if let Some(bits) = f32_roundtrip_bits(f) {
        w.write_byte(MT_FLOAT | FLOAT32);
        w.write_u32(bits);
    } else {
        write_f64(w, f);
    }
}

fn write_f64(w: &mut Writer, f: f64) {
    w.write_byte(MT_FLOAT | FLOAT64);
    w.write_u64(f.to_bits());
}

/// Write `f` using the same width-minimization and NaN-canonicalization rules as the default
/// encoder (§4.4), for callers working at the token layer (`crate::tokenize::serialize`) that have
/// no `float64` option of their own.
pub(crate) fn write_minimized_float(w: &mut Writer, f: f64) {
    encode_float(w, f, false);
}

/// `Some(bits)` if `f` round-trips bit-exactly through `f16` (RFC 8949's half-precision rules,
/// including subnormals and signed zero, via the `half` crate). Also used by the decoder's
/// `strict` float-width check (§4.5) to confirm a wider-than-necessary width was not used.
pub(crate) fn f16_roundtrip_bits(f: f64) -> Option<u16> {
    let narrowed = half::f16::from_f64(f);
    if narrowed.to_f64().to_bits() == f.to_bits() {
        Some(narrowed.to_bits())
    } else {
        None
    }
}

/// `Some(bits)` if `f` round-trips bit-exactly through `f32`. See [`f16_roundtrip_bits`].
pub(crate) fn f32_roundtrip_bits(f: f64) -> Option<u32> {
    let narrowed = f as f32;
    if (narrowed as f64).to_bits() == f.to_bits() {
        Some(narrowed.to_bits())
    } else {
        None
    }
}

/// Serialize a single [`Token`] directly to bytes (§4.2 `token_to_bytes`), with no recursion: this
/// is the emitter a registered `typeEncoders` callback's returned token list is played through
/// (§6.2 - "Returning null defers to the default", a non-null list is emitted token-by-token).
fn write_token(w: &mut Writer, token: &Token, force_f64: bool) -> Result<()> {
    match token {
        Token::Uint(v) => w.write_argument(MT_UINT, *v),
        Token::NegInt(v) => w.write_argument(MT_NINT, *v),
        Token::Bytes(b) => {
            w.write_argument(MT_BSTR, b.len() as u64);
            w.write_slice(b);
        }
        Token::String(s) => {
            w.write_argument(MT_TSTR, s.len() as u64);
            w.write_slice(s.as_bytes());
        }
        Token::Array(n) => w.write_argument(MT_ARRAY, *n),
        Token::Map(n) => w.write_argument(MT_MAP, *n),
        Token::Tag(n) => w.write_argument(MT_TAG, *n),
        Token::Float(f) => encode_float(w, *f, force_f64),
        Token::False => w.write_byte(MT_SIMPLE | SIMPLE_FALSE),
        Token::True => w.write_byte(MT_SIMPLE | SIMPLE_TRUE),
        Token::Null => w.write_byte(MT_SIMPLE | SIMPLE_NULL),
        Token::Undefined => w.write_byte(MT_SIMPLE | SIMPLE_UNDEFINED),
        Token::Break => return Err(CodecError::UnsupportedType),
    }
    Ok(())
}
