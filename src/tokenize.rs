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
 * cbor_canon low-level token stream API (§6.1)
 *
 * `tokenize`/`serialize` let a caller intercept at the token layer instead of the value-graph
 * layer - useful for e.g. re-emitting a stream with one tag rewritten, without paying for a full
 * decode into `Value` and back. Both are scoped to definite-length input: `Token::Array`/
 * `Token::Map` only carry a wire-ready count, so there is no token shape for "length not yet
 * known" the way there is for a `Value` built incrementally by `decode`'s indefinite-length path.
 **************************************************************************************************/
use crate::constants::*;
use crate::error::{CodecError, Result};
use crate::jump_table::{decode_spec, ArgSize};
use crate::reader::Reader;
use crate::writer::Writer;

/// Flatten one top-level CBOR item into its constituent tokens, depth-first, pre-order (§6.1).
///
/// Fails with [`CodecError::IndefiniteNotAllowed`] on any indefinite-length item or `break`, and
/// with [`CodecError::TrailingBytes`] if bytes remain after the top-level item.
pub fn tokenize(bytes: &[u8]) -> Result<Vec<crate::token::Token>> {
    let mut reader = Reader::new(bytes);
    let mut tokens = Vec::new();
    tokenize_value(&mut reader, &mut tokens)?;
    if reader.remaining() > 0 {
        return Err(CodecError::TrailingBytes(reader.position()));
    }
    Ok(tokens)
}

fn tokenize_value(r: &mut Reader, out: &mut Vec<crate::token::Token>) -> Result<()> {
    use crate::token::Token;

    let start = r.position();
    let initial = r.read_byte()?;
    let spec = decode_spec(initial);

    if matches!(spec.arg, ArgSize::Indefinite) {
        return Err(CodecError::IndefiniteNotAllowed(start));
    }
    if matches!(spec.arg, ArgSize::Reserved) {
        return Err(CodecError::ReservedAdditionalInfo(start));
    }

    if spec.major == 7 {
        return tokenize_major7(spec.arg, r, out, start);
    }

    let argument = read_argument(r, spec.arg)?;
    match spec.major {
        0 => out.push(Token::Uint(argument)),
        1 => out.push(Token::NegInt(argument)),
        2 => out.push(Token::Bytes(r.read_slice(argument as usize)?.to_vec())),
        3 => {
            let raw = r.read_slice(argument as usize)?;
            let text = std::str::from_utf8(raw)
                .map_err(|_| CodecError::InvalidUtf8(start))?
                .to_owned();
            out.push(Token::String(text));
        }
        4 => {
            out.push(Token::Array(argument));
            for _ in 0..argument {
                tokenize_value(r, out)?;
            }
        }
        5 => {
            out.push(Token::Map(argument));
            for _ in 0..(argument * 2) {
                tokenize_value(r, out)?;
            }
        }
        6 => {
            out.push(Token::Tag(argument));
            tokenize_value(r, out)?;
        }
        _ => unreachable!("major 7 is dispatched by tokenize_major7 before reaching here"),
    }
    Ok(())
}

fn tokenize_major7(
    arg: ArgSize,
    r: &mut Reader,
    out: &mut Vec<crate::token::Token>,
    start: usize,
) -> Result<()> {
    use crate::token::Token;

    match arg {
        ArgSize::Inline(ai) => {
            match ai {
                SIMPLE_FALSE => out.push(Token::False),
                SIMPLE_TRUE => out.push(Token::True),
                SIMPLE_NULL => out.push(Token::Null),
                SIMPLE_UNDEFINED => out.push(Token::Undefined),
                _ => return Err(CodecError::UnassignedSimpleValue(start)),
            }
            Ok(())
        }
        ArgSize::One => Err(CodecError::UnassignedSimpleValue(start)),
        ArgSize::Two => {
            out.push(Token::Float(half::f16::from_bits(r.read_u16()?).to_f64()));
            Ok(())
        }
        ArgSize::Four => {
            out.push(Token::Float(f32::from_bits(r.read_u32()?) as f64));
            Ok(())
        }
        ArgSize::Eight => {
            out.push(Token::Float(f64::from_bits(r.read_u64()?)));
            Ok(())
        }
        ArgSize::Reserved | ArgSize::Indefinite => {
            unreachable!("caller rejects Reserved/Indefinite before calling tokenize_major7")
        }
    }
}

fn read_argument(r: &mut Reader, arg: ArgSize) -> Result<u64> {
    match arg {
        ArgSize::Inline(v) => Ok(v as u64),
        ArgSize::One => Ok(r.read_u8()? as u64),
        ArgSize::Two => Ok(r.read_u16()? as u64),
        ArgSize::Four => Ok(r.read_u32()? as u64),
        ArgSize::Eight => r.read_u64(),
        ArgSize::Reserved | ArgSize::Indefinite => {
            unreachable!("caller rejects Reserved/Indefinite before calling read_argument")
        }
    }
}

/// Serialize a flat token stream back to bytes (§6.1, §4.2 `token_to_bytes`), with no validation
/// of structural well-formedness (a malformed stream, e.g. a `Token::Array(2)` followed by only
/// one item, produces truncated or misleading bytes rather than an error - the same contract a
/// caller gets from `Writer::write_argument` at the byte layer).
pub fn serialize(tokens: &[crate::token::Token]) -> Result<Vec<u8>> {
    use crate::token::Token;

    let mut w = Writer::new();
    for token in tokens {
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
            Token::Float(f) => {
                // The low-level stream API has no `float64` option of its own; it always writes
                // the narrowest width the value round-trips through, matching the encoder's
                // default minimization (§4.4).
                crate::encode::write_minimized_float(&mut w, *f);
            }
            Token::False => w.write_byte(MT_SIMPLE | SIMPLE_FALSE),
            Token::True => w.write_byte(MT_SIMPLE | SIMPLE_TRUE),
            Token::Null => w.write_byte(MT_SIMPLE | SIMPLE_NULL),
            Token::Undefined => w.write_byte(MT_SIMPLE | SIMPLE_UNDEFINED),
            Token::Break => return Err(CodecError::UnsupportedType),
        }
    }
    Ok(w.into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Token;

    #[test]
    fn tokenize_flattens_a_nested_array_depth_first() {
        // [1, [2, 3]]
        let bytes = vec![0x82, 0x01, 0x82, 0x02, 0x03];
        let tokens = tokenize(&bytes).unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Array(2),
                Token::Uint(1),
                Token::Array(2),
                Token::Uint(2),
                Token::Uint(3),
            ]
        );
    }

    #[test]
    fn tokenize_rejects_indefinite_length_items() {
        let bytes = vec![0x9f, 0xff];
        assert!(matches!(
            tokenize(&bytes).unwrap_err(),
            CodecError::IndefiniteNotAllowed(_)
        ));
    }

    #[test]
    fn serialize_round_trips_tokenize_output() {
        let bytes = vec![0x82, 0x01, 0x61, b'a'];
        let tokens = tokenize(&bytes).unwrap();
        assert_eq!(serialize(&tokens).unwrap(), bytes);
    }
}
