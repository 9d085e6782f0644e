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
//! Property-based coverage of the two universal invariants in §8.1: round-trip and determinism.

use cbor_canon::{decode, decode_default, encode_default, CborMap, DecodeOptions, Value};
use proptest::prelude::*;

/// Build an arbitrary acyclic `Value` tree, bounded in depth and breadth so shrinking stays fast.
fn arb_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        any::<i64>().prop_map(Value::int),
        any::<bool>().prop_map(Value::from),
        "[a-z]{0,8}".prop_map(|s| Value::from(s)),
        proptest::collection::vec(any::<u8>(), 0..8).prop_map(Value::from),
        Just(Value::Null),
    ];
    leaf.prop_recursive(4, 64, 8, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 0..4).prop_map(Value::array),
            proptest::collection::vec(("[a-z]{1,6}", inner), 0..4).prop_map(|entries| {
                let mut map = CborMap::new();
                for (k, v) in entries {
                    // Duplicate keys are possible from random generation; `push` (unlike
                    // `push_checked`) allows it, matching decode's own pre-dedup insertion.
                    if map.get(&Value::from(k.clone())).is_none() {
                        map.push(Value::from(k), v);
                    }
                }
                Value::map(map)
            }),
        ]
    })
}

proptest! {
    #[test]
    fn round_trip_holds_for_arbitrary_acyclic_values(value in arb_value()) {
        let bytes = encode_default(&value).unwrap();
        let decoded = decode_default(&bytes).unwrap();
        prop_assert_eq!(decoded, value);
    }

    #[test]
    fn encoding_is_deterministic_across_two_calls(value in arb_value()) {
        let first = encode_default(&value).unwrap();
        let second = encode_default(&value).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn strict_decode_then_encode_reproduces_the_original_bytes(value in arb_value()) {
        let bytes = encode_default(&value).unwrap();
        let strict = DecodeOptions { strict: true, allow_indefinite: false, ..Default::default() };
        let decoded = decode(&bytes, &strict).unwrap();
        let re_encoded = encode_default(&decoded).unwrap();
        prop_assert_eq!(re_encoded, bytes);
    }
}
