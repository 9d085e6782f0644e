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
 * cbor_canon canonical-order comparator (C6)
 *
 * Length-first-then-bytewise ordering over encoded map keys: this is the original RFC 7049 rule,
 * retained intentionally (§4.6, §9 Open Questions — RFC 8949's bytewise-only rule is a known,
 * deliberately unimplemented, future option. See DESIGN.md for why this codec keeps RFC 7049's
 * rule rather than RFC 8949's.)
 **************************************************************************************************/
use std::cmp::Ordering;

/// Compare two already-encoded byte sequences under the canonical map-key ordering: shorter
/// sorts before longer regardless of content; equal-length sequences compare byte-by-byte,
/// unsigned, lexicographically.
pub fn compare_encoded_keys(a: &[u8], b: &[u8]) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// True if `keys` is strictly ascending under [`compare_encoded_keys`] - the condition the
/// decoder enforces in `strict` mode (§4.5, `MapKeysOutOfOrder`) and the condition the encoder
/// guarantees it produces (§3.3 invariant 6).
pub fn is_strictly_ascending<'a, I: IntoIterator<Item = &'a [u8]>>(keys: I) -> bool {
    let mut iter = keys.into_iter();
    let Some(mut previous) = iter.next() else {
        return true;
    };
    for key in iter {
        if compare_encoded_keys(previous, key) != Ordering::Less {
            return false;
        }
        previous = key;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shorter_key_sorts_before_longer_regardless_of_content() {
        assert_eq!(compare_encoded_keys(b"z", b"aa"), Ordering::Less);
    }

    #[test]
    fn equal_length_keys_compare_bytewise() {
        assert_eq!(compare_encoded_keys(b"ab", b"ac"), Ordering::Less);
        assert_eq!(compare_encoded_keys(b"ac", b"ab"), Ordering::Greater);
        assert_eq!(compare_encoded_keys(b"ab", b"ab"), Ordering::Equal);
    }

    #[test]
    fn ascending_check_matches_scenario_four_key_order() {
        // encode({a: 2, b: 1}) must sort "a" before "b" - both length 1.
        let a_key: &[u8] = &[0x61, 0x61]; // tstr "a"
        let b_key: &[u8] = &[0x61, 0x62]; // tstr "b"
        assert!(is_strictly_ascending(vec![a_key, b_key]));
        assert!(!is_strictly_ascending(vec![b_key, a_key]));
    }

    #[test]
    fn single_or_empty_key_set_is_trivially_ascending() {
        assert!(is_strictly_ascending(Vec::<&[u8]>::new()));
        assert!(is_strictly_ascending(vec![b"x".as_slice()]));
    }
}
