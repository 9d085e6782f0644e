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
//! End-to-end hex-vector scenarios, one test per numbered scenario.

use cbor_canon::{decode, decode_default, encode_default, CborMap, CodecError, DecodeOptions, Value};

fn unhex(s: &str) -> Vec<u8> {
    hex::decode(s).unwrap()
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[test]
fn scenario_1_nested_map_matches_reference_hex() {
    let mut inner = CborMap::new();
    inner.push(Value::from("is"), Value::from("CBOR!"));
    inner.push(Value::from("yay"), Value::from(true));
    let mut outer = CborMap::new();
    outer.push(Value::from("this"), Value::map(inner));

    let bytes = encode_default(&Value::map(outer)).unwrap();
    assert_eq!(to_hex(&bytes), "a16474686973a26269736543424f522163796179f5");
}

#[test]
fn scenario_2_mixed_array_matches_reference_hex() {
    let value = Value::array(vec![
        Value::from("a"),
        Value::from("b"),
        Value::int(1),
        Value::from("\u{1f600}"),
    ]);
    let bytes = encode_default(&value).unwrap();
    assert_eq!(to_hex(&bytes), "84616161620164f09f9880");
}

#[test]
fn scenario_3_non_minimal_uint_strict_vs_lenient() {
    let bytes = unhex("1b0000000000000001");
    let strict = DecodeOptions {
        strict: true,
        ..Default::default()
    };
    assert_eq!(
        decode(&bytes, &strict).unwrap_err(),
        CodecError::NonCanonicalEncoding(0)
    );
    assert_eq!(decode_default(&bytes).unwrap(), Value::int(1));
}

#[test]
fn scenario_4_map_key_order_is_independent_of_insertion_order() {
    let mut first = CborMap::new();
    first.push(Value::from("b"), Value::int(1));
    first.push(Value::from("a"), Value::int(2));
    let mut second = CborMap::new();
    second.push(Value::from("a"), Value::int(2));
    second.push(Value::from("b"), Value::int(1));

    let a = encode_default(&Value::map(first)).unwrap();
    let b = encode_default(&Value::map(second)).unwrap();
    assert_eq!(a, b);
    assert_eq!(to_hex(&a[..7]), "a2616102616201");
}

#[test]
fn scenario_5_indefinite_array_gated_by_option() {
    let bytes = unhex("9fff");
    let disallowed = DecodeOptions {
        allow_indefinite: false,
        ..Default::default()
    };
    assert_eq!(
        decode(&bytes, &disallowed).unwrap_err(),
        CodecError::IndefiniteNotAllowed(0)
    );
    assert_eq!(decode_default(&bytes).unwrap(), Value::array(vec![]));
}

#[test]
fn scenario_6_cyclic_value_graph_fails_to_encode() {
    use std::cell::RefCell;
    use std::rc::Rc;

    let array = Rc::new(RefCell::new(Vec::new()));
    array.borrow_mut().push(Value::Array(array.clone()));
    let err = cbor_canon::encode_default(&Value::Array(array)).unwrap_err();
    assert_eq!(err, CodecError::CircularReference);
}
