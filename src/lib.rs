/***************************************************************************************************
 * Copyright (c) 2020-2023 Qualcomm Innovation Center, Inc. All rights reserved.
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy of this software
 * and associated documentation files (the “Software”), to deal in the Software without
 * restriction, including without limitation the rights to use, copy, modify, merge, publish,
 * distribute, sublicense, and/or sell copies of the Software, and to permit persons to whom the
 * Software is furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all copies or
 * substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING
 * BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
 * NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
 * DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.
 **************************************************************************************************/
/***************************************************************************************************
 * cbor_canon module definition
 *
 * A deterministic CBOR (RFC 8949) tokenizer, canonical encoder and strict decoder, built around
 * content-addressed storage: the same logical value always encodes to the same bytes, so encoded
 * bytes can be hashed and compared directly without a normalization pass.
 **************************************************************************************************/
#![warn(missing_docs)]

//! # cbor_canon
//!
//! `cbor_canon` encodes a closed [`value::Value`] graph to a single canonical CBOR byte sequence
//! and decodes bytes back into that graph, optionally rejecting every non-canonical encoding along
//! the way. It targets systems that hash or compare encoded bytes directly - content-addressed
//! stores, Merkle structures, signed payloads - where two semantically equal inputs must never
//! produce two different byte strings.
//!
//! ## What "canonical" means here
//!
//! - Every integer, string length and container count is written in its smallest legal form.
//! - Floats are minimized to the narrowest IEEE-754 width that round-trips exactly, except that a
//!   float with no fractional part in signed 64-bit range is written as an integer instead; every
//!   `NaN` collapses to one bit pattern.
//! - Map keys are sorted by their own encoded bytes, shortest first, then lexicographically -
//!   RFC 7049's length-first rule, kept deliberately rather than RFC 8949's bytewise-only
//!   successor (see `DESIGN.md`).
//! - Indefinite-length items are never produced by the encoder, though the decoder can accept them
//!   on the way in.
//!
//! ## Quick start
//!
//! ```
//! use cbor_canon::{decode_default, encode_default, CborMap, Value};
//!
//! let mut map = CborMap::new();
//! map.push(Value::from("yay"), Value::from(true));
//! let bytes = encode_default(&Value::map(map)).unwrap();
//! let decoded = decode_default(&bytes).unwrap();
//! assert_eq!(encode_default(&decoded).unwrap(), bytes);
//! ```
//!
//! ## Extension points
//!
//! [`EncodeOptions::type_encoders`] and [`DecodeOptions::tags`] let a caller override how a
//! logical type is emitted, or teach the decoder a new tag number, without forking the codec. The
//! `chrono` feature (on by default) registers RFC 8949 tags 0 and 1 (date/time, epoch) through
//! exactly this mechanism - see [`tags`].

pub mod constants;
mod decode;
mod encode;
pub mod error;
mod jump_table;
mod ordering;
pub mod registry;
#[cfg(feature = "chrono")]
pub mod tags;
mod token;
mod tokenize;
mod reader;
mod value;
mod writer;

pub use decode::{decode, decode_default, DecodeOptions};
pub use encode::{encode, encode_default, EncodeOptions};
pub use error::{CodecError, Result};
pub use ordering::{compare_encoded_keys, is_strictly_ascending};
pub use registry::{TagDecoders, TypeEncoders};
pub use token::{Kind, Token};
pub use tokenize::{serialize, tokenize};
pub use value::{classify, CborMap, Integer, LogicalType, SharedArray, SharedMap, Value};
