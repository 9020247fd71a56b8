//! Property tests for bit-vector arithmetic.

use proptest::prelude::*;

use clock_kernel::{unsigned, vector, zero, BitVector, Error};

fn width_and_value() -> impl Strategy<Value = (usize, u64)> {
    (1usize..=16).prop_flat_map(|w| (Just(w), 0u64..(1u64 << w)))
}

fn bits(max: usize) -> impl Strategy<Value = BitVector> {
    prop::collection::vec(any::<bool>(), 0..=max).prop_map(|b| vector(&b))
}

proptest! {
    #[test]
    fn addition_is_modular((w, x) in width_and_value(), y in any::<u64>()) {
        let y = y % (1u64 << w);
        let sum = unsigned(w, x).unwrap().add(&unsigned(w, y).unwrap()).unwrap();
        prop_assert_eq!(sum, unsigned(w, (x + y) % (1u64 << w)).unwrap());
    }

    #[test]
    fn operations_preserve_width(a in bits(24)) {
        let w = a.width();
        prop_assert_eq!(a.add(&a).unwrap().width(), w);
        prop_assert_eq!(a.not().width(), w);
        prop_assert_eq!(a.negate().unwrap().width(), w);
    }

    #[test]
    fn subtract_self_is_zero(a in bits(24)) {
        prop_assert_eq!(a.subtract(&a).unwrap(), zero(a.width()));
    }

    #[test]
    fn negate_is_not_plus_one((w, x) in width_and_value()) {
        let a = unsigned(w, x).unwrap();
        let expected = ((1u64 << w) - x) % (1u64 << w);
        prop_assert_eq!(a.negate().unwrap().to_u64().unwrap(), expected);
        prop_assert_eq!(a.negate().unwrap().negate().unwrap(), a);
    }

    #[test]
    fn subtract_then_add_round_trips((w, x) in width_and_value(), y in any::<u64>()) {
        let a = unsigned(w, x).unwrap();
        let b = unsigned(w, y % (1u64 << w)).unwrap();
        prop_assert_eq!(a.subtract(&b).unwrap().add(&b).unwrap(), a);
    }

    #[test]
    fn concat_places_receiver_high(a in bits(12), b in bits(12)) {
        let c = a.concat(&b);
        prop_assert_eq!(c.width(), a.width() + b.width());
        let low: Vec<bool> = c.iter().take(b.width()).collect();
        let high: Vec<bool> = c.iter().skip(b.width()).collect();
        prop_assert_eq!(low, b.iter().collect::<Vec<_>>());
        prop_assert_eq!(high, a.iter().collect::<Vec<_>>());
    }

    #[test]
    fn range_selects_inclusive_bits(a in bits(16), lo in 0usize..16, len in 1usize..16) {
        let hi = lo + len - 1;
        let r = a.range(hi as isize, lo as isize);
        if hi < a.width() {
            let r = r.unwrap();
            prop_assert_eq!(r.width(), len);
            for i in 0..len {
                prop_assert_eq!(r.get(i as isize).unwrap(), a.get((lo + i) as isize).unwrap());
            }
        } else {
            prop_assert!(matches!(r, Err(Error::RangeConstruction(_))));
        }
    }

    #[test]
    fn text_form_round_trips(a in bits(32)) {
        prop_assert_eq!(a.to_string().parse::<BitVector>().unwrap(), a);
    }
}

#[test]
fn mismatched_widths_are_dimension_errors() {
    let err = zero(3).add(&zero(4)).unwrap_err();
    assert!(matches!(err, Error::Dimension { left: 3, right: 4, .. }));
}

#[test]
fn index_bounds() {
    let v = zero(4);
    assert!(matches!(v.get(-1), Err(Error::Index { index: -1, width: 4 })));
    assert!(matches!(v.get(4), Err(Error::Index { index: 4, width: 4 })));
}

#[test]
fn unsigned_width_cap() {
    assert!(matches!(unsigned(51, 0), Err(Error::RangeConstruction(_))));
}
