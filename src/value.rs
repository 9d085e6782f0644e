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
 * cbor_canon logical value model (§3.3)
 *
 * The closed, owned value graph that `encode` consumes and `decode` produces. Unlike the token
 * model this is a sum type the caller actually builds and walks, so it is exposed as a plain
 * `enum` rather than an open trait hierarchy (Design Notes: "Value polymorphism").
 **************************************************************************************************/
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// A decoded integer, modeled as a tagged `small`/`big` variant rather than a single polymorphic
/// primitive (Design Notes: "Big integers"). `Small` covers the native signed 64-bit range;
/// `Big` covers everything else representable in CBOR's native (non-tagged) integer majors, i.e.
/// magnitudes up to 2^64. Integers whose true magnitude exceeds 2^64 are out of scope for this
/// type and require an explicit bignum tag encoder (RFC 8949 tags 2/3), which fails with
/// [`crate::error::CodecError::BigIntRequiresTag`] if none is registered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Integer {
    /// Fits in `i64`.
    Small(i64),
    /// Does not fit in `i64`. `negative` selects major 1 vs major 0 on the wire; `magnitude` is
    /// the wire argument (for negative values, `logical value = -1 - magnitude`, so the true
    /// value is `-(magnitude + 1)`).
    Big { negative: bool, magnitude: u64 },
}

impl Integer {
    /// Build an `Integer` from a decoded major-0 argument.
    pub fn from_uint_argument(argument: u64) -> Integer {
        match i64::try_from(argument) {
            Ok(v) => Integer::Small(v),
            Err(_) => Integer::Big {
                negative: false,
                magnitude: argument,
            },
        }
    }

    /// Build an `Integer` from a decoded major-1 argument (logical value `-1 - argument`).
    pub fn from_negint_argument(argument: u64) -> Integer {
        // -1 - argument fits i64 iff argument <= i64::MAX as u64 (argument == i64::MAX gives
        // i64::MIN, still representable).
        if argument <= i64::MAX as u64 {
            Integer::Small(-1 - argument as i64)
        } else {
            Integer::Big {
                negative: true,
                magnitude: argument,
            }
        }
    }

    /// True if this integer is negative.
    pub fn is_negative(&self) -> bool {
        match *self {
            Integer::Small(v) => v < 0,
            Integer::Big { negative, .. } => negative,
        }
    }

    /// Decompose into the `(major_is_negint, wire_argument)` pair the encoder needs to write
    /// this integer in its smallest form.
    pub fn to_wire_argument(&self) -> (bool, u64) {
        match *self {
            Integer::Small(v) if v >= 0 => (false, v as u64),
            Integer::Small(v) => (true, (-1 - v) as u64),
            Integer::Big {
                negative,
                magnitude,
            } => (negative, magnitude),
        }
    }

    /// Returns the value as `i64` if it fits, for callers that only care about the machine range.
    pub fn to_i64(&self) -> Option<i64> {
        match *self {
            Integer::Small(v) => Some(v),
            Integer::Big { .. } => None,
        }
    }
}

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Integer::Small(v) => write!(f, "{v}"),
            Integer::Big {
                negative: false,
                magnitude,
            } => write!(f, "{magnitude}"),
            Integer::Big {
                negative: true,
                magnitude,
            } => write!(f, "-{}", magnitude as u128 + 1),
        }
    }
}

impl From<i64> for Integer {
    fn from(v: i64) -> Integer {
        Integer::Small(v)
    }
}

/// A decoded or to-be-encoded mapping. Entries preserve insertion (decode) order internally;
/// canonical order is imposed only at encode time (Design Notes: "Map representation"). Lookups
/// are a linear scan, which is the right tradeoff for the small, mostly-string-keyed maps this
/// codec targets, and keeps the container free of any `Hash`/`Ord` bound on `Value` (floats and
/// `NaN` make both awkward to define correctly).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CborMap(Vec<(Value, Value)>);

impl CborMap {
    /// An empty map.
    pub fn new() -> CborMap {
        CborMap(Vec::new())
    }

    /// Append an entry, preserving insertion order. Does not check for duplicate keys; callers
    /// building a map from a trusted source (e.g. the decoder, which applies
    /// `reject_duplicate_map_keys` itself) may rely on that, but [`CborMap::push_checked`] is
    /// available when duplicates must be rejected.
    pub fn push(&mut self, key: Value, value: Value) {
        self.0.push((key, value));
    }

    /// Append an entry, failing if `key` already equals an existing key.
    pub fn push_checked(&mut self, key: Value, value: Value) -> bool {
        if self.0.iter().any(|(k, _)| *k == key) {
            return false;
        }
        self.0.push((key, value));
        true
    }

    /// Look up a value by key (structural equality).
    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// The number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &(Value, Value)> {
        self.0.iter()
    }

    /// Consume the map, yielding its entries in insertion order.
    pub fn into_entries(self) -> Vec<(Value, Value)> {
        self.0
    }
}

impl FromIterator<(Value, Value)> for CborMap {
    fn from_iter<I: IntoIterator<Item = (Value, Value)>>(iter: I) -> CborMap {
        CborMap(iter.into_iter().collect())
    }
}

impl IntoIterator for CborMap {
    type Item = (Value, Value);
    type IntoIter = std::vec::IntoIter<(Value, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// `Array` and `Map` hold their contents behind `Rc<RefCell<_>>` rather than owning them
/// directly. A plain owned tree (`Vec<Value>` holding `Value` holding `Vec<Value>`, ...) can
/// never contain a cycle - the same `Vec` cannot be reachable from two places, because ownership
/// is not shared - so it would make §3.3 invariant 7 ("no cycles in the input value graph") and
/// the Design Notes' ancestor-stack cycle detector unreachable dead code. Reference-counted,
/// interior-mutable containers restore the sharing (and therefore the possibility of
/// self-reference) that the source model assumes, the same way
/// `other_examples/.../bc-dcbor-rust` represents its value graph as `CBOR(RefCounted<CBORCase>)`
/// for O(1)-clone structure sharing. Two `Value`s still compare structurally equal when their
/// contents match, since `Rc<T>: PartialEq` and `RefCell<T>: PartialEq` both compare through to
/// `T`, not by pointer.
pub type SharedArray = Rc<RefCell<Vec<Value>>>;
/// See [`SharedArray`].
pub type SharedMap = Rc<RefCell<CborMap>>;

/// The logical value domain (§3.3): a closed, ten-variant tagged union. This is the type callers
/// build to encode and receive on decode.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// A signed integer, promoted to the `big` variant outside the native 64-bit range.
    Integer(Integer),
    /// An IEEE-754 binary64 floating-point number.
    Float(f64),
    /// `true` or `false`.
    Bool(bool),
    /// CBOR `null`.
    Null,
    /// CBOR `undefined`.
    Undefined,
    /// A byte sequence.
    Bytes(Vec<u8>),
    /// Valid UTF-8 text.
    Text(String),
    /// An ordered list of values.
    Array(SharedArray),
    /// A mapping from value to value.
    Map(SharedMap),
    /// A tagged value: a tag number plus the inner value it annotates.
    Tag(u64, Box<Value>),
}

/// The closed set of logical-type names used by the encoder's type classifier and the
/// `typeEncoders`/tag registries (§4.7). Distinguishes `uint`/`negint`/`bigint` even though all
/// three are carried by [`Value::Integer`], because the spec's type-encoder dispatch is keyed on
/// these names, not on the `Value` variant.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum LogicalType {
    Uint,
    NegInt,
    Float,
    BigInt,
    Bool,
    Null,
    Undefined,
    Bytes,
    String,
    Array,
    Map,
    Tag,
}

impl LogicalType {
    /// The registry key for this type, exactly as named in §4.7.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalType::Uint => "uint",
            LogicalType::NegInt => "negint",
            LogicalType::Float => "float",
            LogicalType::BigInt => "bigint",
            LogicalType::Bool => "bool",
            LogicalType::Null => "null",
            LogicalType::Undefined => "undefined",
            LogicalType::Bytes => "bytes",
            LogicalType::String => "string",
            LogicalType::Array => "array",
            LogicalType::Map => "map",
            LogicalType::Tag => "tag",
        }
    }
}

impl fmt::Display for LogicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a value into its logical-type name (§4.7 type classifier). This is the fixed
/// classifier step of the encoder algorithm (§4.4 step 1).
pub fn classify(value: &Value) -> LogicalType {
    match value {
        Value::Integer(Integer::Small(v)) if *v < 0 => LogicalType::NegInt,
        Value::Integer(Integer::Small(_)) => LogicalType::Uint,
        Value::Integer(Integer::Big { .. }) => LogicalType::BigInt,
        Value::Float(_) => LogicalType::Float,
        Value::Bool(_) => LogicalType::Bool,
        Value::Null => LogicalType::Null,
        Value::Undefined => LogicalType::Undefined,
        Value::Bytes(_) => LogicalType::Bytes,
        Value::Text(_) => LogicalType::String,
        Value::Array(_) => LogicalType::Array,
        Value::Map(_) => LogicalType::Map,
        Value::Tag(..) => LogicalType::Tag,
    }
}

impl Value {
    /// Convenience constructor for `Value::Integer(Integer::Small(v))`.
    pub fn int(v: i64) -> Value {
        Value::Integer(Integer::Small(v))
    }

    /// Build an array value from an owned `Vec`, wrapping it in the shared-container
    /// representation `Array` requires.
    pub fn array(items: Vec<Value>) -> Value {
        Value::Array(Rc::new(RefCell::new(items)))
    }

    /// Build a map value from an owned [`CborMap`], wrapping it in the shared-container
    /// representation `Map` requires.
    pub fn map(entries: CborMap) -> Value {
        Value::Map(Rc::new(RefCell::new(entries)))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Value {
        Value::int(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Value {
        Value::Bool(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Value {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Value {
        Value::Text(v.to_owned())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Value {
        Value::Bytes(v)
    }
}
