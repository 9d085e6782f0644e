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
 * cbor_canon token model (C2)
 *
 * The neutral intermediate representation bridging raw bytes and logical values. A `Token` is
 * produced one at a time by the decoder's jump table and consumed one at a time by the encoder's
 * type dispatch; tokens never outlive a single `encode`/`decode` call.
 **************************************************************************************************/
use std::fmt;

/// A single CBOR wire item reduced to its type and argument/payload, independent of both the raw
/// bytes it came from and the logical value it will become.
///
/// `Uint`/`NegInt` carry the raw wire argument (the value for major 0, `-1 - value` for major 1);
/// whether that argument is ultimately modeled as a machine `i64` or promoted to the `big`
/// variant of [`crate::value::Integer`] is a decision for the value layer, not this one — see
/// the Design Notes on big integers.
#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    /// Major 0: an unsigned integer argument.
    Uint(u64),
    /// Major 1: a negative integer; the logical value is `-1 - argument`.
    NegInt(u64),
    /// Major 2: a byte string.
    Bytes(Vec<u8>),
    /// Major 3: a text string whose payload has already been validated as UTF-8.
    String(String),
    /// Major 4: an array holding `count` elements, which follow as `count` further tokens.
    Array(u64),
    /// Major 5: a map holding `count` entries (`2 * count` further tokens: key, value, ...).
    Map(u64),
    /// Major 6: a tag number; the tagged item follows as the next token (recursively).
    Tag(u64),
    /// Major 7, minor 25/26/27: an IEEE-754 binary64 value, already widened from whatever width
    /// it was encoded in.
    Float(f64),
    /// Major 7, minor 20.
    False,
    /// Major 7, minor 21.
    True,
    /// Major 7, minor 22.
    Null,
    /// Major 7, minor 23.
    Undefined,
    /// Major 7, minor 31: the indefinite-length terminator. Produced only by the decode path when
    /// `allow_indefinite` is set; never emitted by the encoder (indefinite-length items are an
    /// encode-path non-goal).
    Break,
}

/// The thirteen token kinds named in the wire-level data model, independent of any carried value.
/// Used where only the shape of a token matters (e.g. indefinite-length chunk-type checks).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Kind {
    Uint,
    NegInt,
    Bytes,
    String,
    Array,
    Map,
    Tag,
    Float,
    False,
    True,
    Null,
    Undefined,
    Break,
}

impl Token {
    /// The kind of this token, discarding its payload.
    pub fn kind(&self) -> Kind {
        match self {
            Token::Uint(_) => Kind::Uint,
            Token::NegInt(_) => Kind::NegInt,
            Token::Bytes(_) => Kind::Bytes,
            Token::String(_) => Kind::String,
            Token::Array(_) => Kind::Array,
            Token::Map(_) => Kind::Map,
            Token::Tag(_) => Kind::Tag,
            Token::Float(_) => Kind::Float,
            Token::False => Kind::False,
            Token::True => Kind::True,
            Token::Null => Kind::Null,
            Token::Undefined => Kind::Undefined,
            Token::Break => Kind::Break,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Uint(v) => write!(f, "uint({v})"),
            Token::NegInt(v) => write!(f, "negint({v})"),
            Token::Bytes(b) => write!(f, "bytes[{}]", b.len()),
            Token::String(s) => write!(f, "string({s:?})"),
            Token::Array(n) => write!(f, "array({n})"),
            Token::Map(n) => write!(f, "map({n})"),
            Token::Tag(t) => write!(f, "tag({t})"),
            Token::Float(v) => write!(f, "float({v})"),
            Token::False => write!(f, "false"),
            Token::True => write!(f, "true"),
            Token::Null => write!(f, "null"),
            Token::Undefined => write!(f, "undefined"),
            Token::Break => write!(f, "break"),
        }
    }
}
