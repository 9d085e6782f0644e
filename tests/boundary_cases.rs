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
//! Boundary-value coverage for integers, floats, empty containers, UTF-8 and map keys (§8.2).

use cbor_canon::{decode_default, encode, encode_default, CborMap, CodecError, EncodeOptions, Integer, Value};

#[test]
fn integer_boundaries_round_trip() {
    for &n in &[23i64, 24, 255, 256, 65535, 65536] {
        let bytes = encode_default(&Value::int(n)).unwrap();
        assert_eq!(decode_default(&bytes).unwrap(), Value::int(n));
    }
}

#[test]
fn uint_boundaries_at_32_and_64_bit_limits_round_trip() {
    let u32_max = Value::Integer(Integer::from_uint_argument(u32::MAX as u64));
    let bytes = encode_default(&u32_max).unwrap();
    assert_eq!(decode_default(&bytes).unwrap(), u32_max);

    let two_pow_32 = Value::Integer(Integer::from_uint_argument(1u64 << 32));
    let bytes = encode_default(&two_pow_32).unwrap();
    assert_eq!(decode_default(&bytes).unwrap(), two_pow_32);

    let u64_max = Value::Integer(Integer::from_uint_argument(u64::MAX));
    let bytes = encode_default(&u64_max).unwrap();
    assert_eq!(decode_default(&bytes).unwrap(), u64_max);
}

#[test]
fn big_integer_beyond_i64_requires_allow_big_int() {
    let value = Value::Integer(Integer::from_uint_argument(u64::MAX));
    let bytes = encode_default(&value).unwrap();

    let opts = cbor_canon::DecodeOptions {
        allow_big_int: false,
        ..Default::default()
    };
    assert!(matches!(
        cbor_canon::decode(&bytes, &opts).unwrap_err(),
        CodecError::IntOutOfRange(_)
    ));
}

#[test]
fn signed_zero_and_infinities_round_trip() {
    for f in [0.0f64, -0.0, f64::INFINITY, f64::NEG_INFINITY] {
        let bytes = encode_default(&Value::Float(f)).unwrap();
        let Value::Float(decoded) = decode_default(&bytes).unwrap() else {
            panic!("expected float");
        };
        assert_eq!(decoded.to_bits(), f.to_bits());
    }
}

#[test]
fn nan_canonicalizes_regardless_of_input_bit_pattern() {
    let a = encode_default(&Value::Float(f64::NAN)).unwrap();
    let b = encode_default(&Value::Float(f64::from_bits(0x7ff8_0000_0000_0001))).unwrap();
    assert_eq!(a, b);
}

#[test]
fn smallest_subnormal_f16_round_trips() {
    // 2^-24, the smallest positive f16 subnormal.
    let value = Value::Float(f64::from_bits(half::f16::from_bits(1).to_f64().to_bits()));
    let bytes = encode_default(&value).unwrap();
    assert_eq!(bytes[0] & cbor_canon::constants::AI_MASK, 25); // FLOAT16
    assert_eq!(decode_default(&bytes).unwrap(), value);
}

#[test]
fn value_exact_in_f32_but_not_f16_uses_f32_width() {
    let pi32 = std::f32::consts::PI as f64;
    let bytes = encode_default(&Value::Float(pi32)).unwrap();
    assert_eq!(bytes[0] & cbor_canon::constants::AI_MASK, 26); // FLOAT32
}

#[test]
fn value_only_exact_in_f64_uses_f64_width() {
    let bytes = encode_default(&Value::Float(std::f64::consts::PI)).unwrap();
    assert_eq!(bytes[0] & cbor_canon::constants::AI_MASK, 27); // FLOAT64
}

#[test]
fn empty_byte_string_text_list_and_map_round_trip() {
    assert_eq!(decode_default(&encode_default(&Value::Bytes(vec![])).unwrap()).unwrap(), Value::Bytes(vec![]));
    assert_eq!(
        decode_default(&encode_default(&Value::Text(String::new())).unwrap()).unwrap(),
        Value::Text(String::new())
    );
    assert_eq!(
        decode_default(&encode_default(&Value::array(vec![])).unwrap()).unwrap(),
        Value::array(vec![])
    );
    assert_eq!(
        decode_default(&encode_default(&Value::map(CborMap::new())).unwrap()).unwrap(),
        Value::map(CborMap::new())
    );
}

#[test]
fn lone_utf8_surrogate_half_fails_to_decode() {
    let mut bytes = vec![0x63];
    bytes.extend_from_slice(&[0xed, 0xa0, 0x80]);
    assert!(matches!(decode_default(&bytes).unwrap_err(), CodecError::InvalidUtf8(_)));
}

#[test]
fn map_keys_differing_only_in_length_sort_shorter_first() {
    let mut map = CborMap::new();
    map.push(Value::from("aa"), Value::int(1));
    map.push(Value::from("a"), Value::int(2));
    let bytes = encode_default(&Value::map(map)).unwrap();
    // "a" (length 1) must precede "aa" (length 2) regardless of content.
    assert_eq!(bytes[1], 0x61); // tstr len 1 header
}

#[test]
fn map_keys_differing_only_in_content_sort_lexicographically() {
    let mut map = CborMap::new();
    map.push(Value::from("b"), Value::int(1));
    map.push(Value::from("a"), Value::int(2));
    let bytes = encode_default(&Value::map(map)).unwrap();
    assert_eq!(&bytes[1..4], &[0x61, b'a', 0x02]);
}

#[test]
fn float64_option_forces_full_width_for_non_integer_values() {
    let opts = EncodeOptions {
        float64: true,
        ..Default::default()
    };
    let bytes = encode(&Value::Float(0.1), &opts).unwrap();
    assert_eq!(bytes[0] & cbor_canon::constants::AI_MASK, 27);
}
