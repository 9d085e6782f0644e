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
 * cbor_canon error API
 *
 * Error kinds for the tokenizer, deterministic encoder and strict decoder. Every decode error
 * carries the byte offset at which the condition was detected; encode errors do not, since there
 * is no byte stream yet to point into.
 **************************************************************************************************/
use std::result;

use thiserror::Error;

/// An alias for `Result<T, CodecError>` used throughout this crate.
pub type Result<T> = result::Result<T, CodecError>;

/// `CodecError` enumerates every way tokenizing, encoding or decoding can fail.
///
/// Every error is fatal to the call that produced it: there is no recovery or partial result, and
/// nothing is swallowed or logged on this path (callers that want logging wrap the `Result`
/// themselves).
#[derive(Clone, Debug, Error, PartialEq)]
pub enum CodecError {
    // --- Structural ---
    /// The reader ran out of bytes before an item was fully consumed.
    #[error("unexpected end of input at offset {0}")]
    UnexpectedEof(usize),
    /// A complete top-level item decoded successfully, but bytes remain.
    #[error("trailing bytes after the top-level item at offset {0}")]
    TrailingBytes(usize),
    /// Additional information 28, 29 or 30, which RFC 8949 reserves, appeared in the initial byte.
    #[error("reserved additional information value at offset {0}")]
    ReservedAdditionalInfo(usize),
    /// An indefinite-length item or a `break` was encountered while `allow_indefinite` is false.
    #[error("indefinite-length item not allowed at offset {0}")]
    IndefiniteNotAllowed(usize),
    /// The chunks of an indefinite-length byte or text string did not share one major type.
    #[error("indefinite-length chunk type mismatch at offset {0}")]
    IndefiniteChunkTypeMismatch(usize),
    /// A `break` token (major 7, additional info 31) appeared outside an indefinite-length item.
    #[error("stray break at offset {0}")]
    StrayBreak(usize),
    /// The value graph nests deeper than the configured maximum (default 64).
    #[error("maximum nesting depth exceeded at offset {0}")]
    MaxDepthExceeded(usize),

    // --- Content ---
    /// A text-string payload was not valid UTF-8.
    #[error("invalid UTF-8 in text string at offset {0}")]
    InvalidUtf8(usize),
    /// A major-7 simple value has no assigned meaning (minor 0-19 unassigned, or minor 24 encoding
    /// a byte below 32 that is already representable inline).
    #[error("unassigned simple value at offset {0}")]
    UnassignedSimpleValue(usize),
    /// A tag number had no registered decoder.
    #[error("unknown tag {tag} at offset {offset}")]
    UnknownTag {
        /// The unrecognized tag number.
        tag: u64,
        /// Offset of the tag's initial byte.
        offset: usize,
    },
    /// `use_maps` is false and a decoded map key does not coerce to a string.
    #[error("non-string map key at offset {0}")]
    NonStringMapKey(usize),
    /// `reject_duplicate_map_keys` is true and a map had a repeated key.
    #[error("duplicate map key at offset {0}")]
    DuplicateMapKey(usize),

    // --- Strictness ---
    /// `strict` is true and an argument (integer, length or count) was not in its smallest form.
    #[error("non-canonical encoding at offset {0}")]
    NonCanonicalEncoding(usize),
    /// `strict` is true and successive map keys were not strictly ascending under the canonical
    /// comparator.
    #[error("map keys out of canonical order at offset {0}")]
    MapKeysOutOfOrder(usize),
    /// `allow_big_int` is false and a decoded integer falls outside native signed 64-bit range.
    #[error("integer out of range at offset {0}")]
    IntOutOfRange(usize),
    /// `allow_undefined` is false and major 7 minor 23 (`undefined`) was encountered.
    #[error("undefined not allowed at offset {0}")]
    UndefinedNotAllowed(usize),

    // --- Encoder ---
    /// The value graph being encoded contains a cycle.
    #[error("circular reference in value graph")]
    CircularReference,
    /// No default rule and no registered type encoder could handle a value.
    #[error("unsupported type for encoding")]
    UnsupportedType,
    /// An arbitrary-precision integer outside +/-(2^64) was encoded without a type encoder that
    /// wraps it in an explicit bignum tag (RFC 8949 tags 2/3).
    #[error("big integer requires an explicit tag encoder")]
    BigIntRequiresTag,
}

impl CodecError {
    /// The byte offset at which this error was detected, if any (encode errors have none).
    pub fn offset(&self) -> Option<usize> {
        use CodecError::*;
        match *self {
            UnexpectedEof(p)
            | TrailingBytes(p)
            | ReservedAdditionalInfo(p)
            | IndefiniteNotAllowed(p)
            | IndefiniteChunkTypeMismatch(p)
            | StrayBreak(p)
            | MaxDepthExceeded(p)
            | InvalidUtf8(p)
            | UnassignedSimpleValue(p)
            | NonStringMapKey(p)
            | DuplicateMapKey(p)
            | NonCanonicalEncoding(p)
            | MapKeysOutOfOrder(p)
            | IntOutOfRange(p)
            | UndefinedNotAllowed(p) => Some(p),
            UnknownTag { offset, .. } => Some(offset),
            CircularReference | UnsupportedType | BigIntRequiresTag => None,
        }
    }
}
