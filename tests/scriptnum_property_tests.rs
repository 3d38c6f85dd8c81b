//! Script-number codec properties

use proptest::prelude::*;
use rxdvm::scriptnum::{decode, encode, is_minimally_encoded, to_bool};

proptest! {
    #[test]
    fn round_trip(n in (-(i64::MAX))..=i64::MAX) {
        prop_assert_eq!(decode(&encode(n)).unwrap(), n);
    }

    #[test]
    fn encodings_are_minimal(n in (-(i64::MAX))..=i64::MAX) {
        prop_assert!(is_minimally_encoded(&encode(n)));
    }

    #[test]
    fn bool_coercion_matches_value(n in (-(i64::MAX))..=i64::MAX) {
        prop_assert_eq!(to_bool(&encode(n)), n != 0);
    }

    #[test]
    fn width_is_bounded(n in (-(i64::MAX))..=i64::MAX) {
        prop_assert!(encode(n).len() <= 9);
        // Values within 56 bits fit the 8-byte cap and re-decode.
        if n.unsigned_abs() < (1u64 << 55) {
            prop_assert!(encode(n).len() <= 8);
        }
    }
}

#[test]
fn zero_is_empty() {
    assert!(encode(0).is_empty());
    assert!(!to_bool(&encode(0)));
}

#[test]
fn negative_zero_is_false() {
    assert!(!to_bool(&[0x80]));
    assert!(!to_bool(&[0x00, 0x00, 0x80]));
}

#[test]
fn sign_bit_placement() {
    assert_eq!(encode(-1), vec![0x81]);
    assert_eq!(encode(-127), vec![0xff]);
    assert_eq!(encode(-128), vec![0x80, 0x80]);
    assert_eq!(encode(-255), vec![0xff, 0x80]);
}

#[test]
fn oversized_decode_rejected() {
    assert!(decode(&[0u8; 9]).is_err());
    assert!(decode(&[0u8; 8]).is_ok());
}
