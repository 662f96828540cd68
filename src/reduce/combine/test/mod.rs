//! Tests for the combine ladder.
//!
//! Every rung is checked against the baseline rather than against its own
//! loop shape: same result, identity on empty input, no mutation.

use super::code::*;
use super::ladder::Ladder;
use crate::reduce::config::{Product, Reduction, Sum};
use crate::vector::{Vector, ELEMENT_READS};
use approx::assert_relative_eq;
use proptest::prelude::*;
use std::cell::RefCell;

fn run<R: Reduction>(technique: Technique, cfg: &R, v: &Vector<R::Elem>) -> R::Elem {
    let mut dest = cfg.identity();
    (technique.function::<R>())(cfg, v, &mut dest);
    dest
}

fn all_results<R: Reduction>(cfg: &R, v: &Vector<R::Elem>) -> Vec<(Technique, R::Elem)> {
    Technique::ALL
        .into_iter()
        .map(|t| (t, run(t, cfg, v)))
        .collect()
}

fn assert_all_equal_i64(data: &[i64], expected: i64) {
    let v = Vector::from_slice(data);
    for (technique, got) in all_results(&Sum::new(), &v) {
        assert_eq!(got, expected, "{} on {:?}", technique, data);
    }
}

#[test]
fn test_sum_scenario() {
    assert_all_equal_i64(&[3, 1, 4, 1, 5, 9, 2, 6], 31);
}

#[test]
fn test_sum_empty_is_identity() {
    assert_all_equal_i64(&[], 0);
}

#[test]
fn test_sum_seven_elements() {
    // unroll_x3 runs two full passes and leaves one element for the tail
    assert_eq!(7 % Technique::UnrollX3.unroll_factor(), 1);
    assert_all_equal_i64(&[1, 2, 3, 4, 5, 6, 7], 28);
}

#[test]
fn test_product_empty_is_identity() {
    let v: Vector<f64> = Vector::zeroed(0);
    for (technique, got) in all_results(&Product::new(), &v) {
        assert_eq!(got, 1.0, "{}", technique);
    }
}

#[test]
fn test_singleton() {
    let v = Vector::from_vec(vec![-17i32]);
    for (technique, got) in all_results(&Sum::new(), &v) {
        assert_eq!(got, -17, "{}", technique);
    }

    let v = Vector::from_vec(vec![2.5f32]);
    for (technique, got) in all_results(&Product::new(), &v) {
        assert_eq!(got, 2.5, "{}", technique);
    }
}

#[test]
fn test_overwrites_destination() {
    let v = Vector::from_vec(vec![1i64, 2, 3]);
    for technique in Technique::ALL {
        let mut dest = 999;
        (technique.function::<Sum<i64>>())(&Sum::new(), &v, &mut dest);
        assert_eq!(dest, 6, "{} must not fold into the old destination", technique);
    }
}

#[test]
fn test_unroll_boundaries_match_baseline() {
    let sum = Sum::<i64>::new();
    let product = Product::<i64>::new();

    for technique in [
        Technique::UnrollX2,
        Technique::UnrollX3,
        Technique::UnrollX2Parallel,
    ] {
        let max_len = 2 * technique.unroll_factor() + 1;
        for len in 0..=max_len {
            let v: Vector<i64> = (1..=len as i64).collect();
            assert_eq!(
                run(technique, &sum, &v),
                run(Technique::Original, &sum, &v),
                "{} sum at length {}",
                technique,
                len
            );
            assert_eq!(
                run(technique, &product, &v),
                run(Technique::Original, &product, &v),
                "{} product at length {}",
                technique,
                len
            );
        }
    }
}

#[test]
fn test_partial_sum_overflow_matches_baseline() {
    // acc0 = i64::MAX + 1 overflows, acc1 = -1 + 0; the total is in range
    let data = [i64::MAX, -1, 1, 0];
    let v = Vector::from_slice(&data);
    assert_eq!(run(Technique::Original, &Sum::new(), &v), i64::MAX);
    assert_all_equal_i64(&data, i64::MAX);

    let v = Vector::from_vec(vec![i64::MIN, 1, -1, 1, 1]);
    for (technique, got) in all_results(&Sum::new(), &v) {
        assert_eq!(got, i64::MIN + 2, "{}", technique);
    }
}

#[test]
fn test_partial_product_overflow_matches_baseline() {
    // the even-index partial product overflows i32 before the trailing zero
    let v = Vector::from_vec(vec![1 << 20, 1, 1 << 20, 1, 0]);
    for (technique, got) in all_results(&Product::<i32>::new(), &v) {
        assert_eq!(got, 0, "{}", technique);
    }
}

#[test]
fn test_accessor_rungs_skip_empty_input() {
    let empty: Vector<i64> = Vector::zeroed(0);
    let five: Vector<i64> = (1..=5).collect();

    for technique in [Technique::Original, Technique::CodeMotion] {
        ELEMENT_READS.with(|reads| reads.set(0));
        assert_eq!(run(technique, &Sum::new(), &empty), 0);
        assert_eq!(ELEMENT_READS.with(|reads| reads.get()), 0, "{}", technique);

        run(technique, &Sum::new(), &five);
        assert_eq!(ELEMENT_READS.with(|reads| reads.get()), 5, "{}", technique);
    }
}

#[test]
fn test_float_sum_within_tolerance() {
    let data: Vec<f32> = (0..1023).map(|i| ((i * 37 % 101) as f32 - 50.0) / 7.0).collect();
    let v = Vector::from_vec(data);
    let sum = Sum::<f32>::new();
    let expected = run(Technique::Original, &sum, &v);

    for technique in Technique::ALL {
        assert_relative_eq!(run(technique, &sum, &v), expected, epsilon = 5e-2, max_relative = 1e-4);
    }
}

#[test]
fn test_float_product_within_tolerance() {
    let data: Vec<f64> = (0..1000).map(|i| 1.0 + ((i % 13) as f64 - 6.0) * 1e-4).collect();
    let v = Vector::from_vec(data);
    let product = Product::<f64>::new();
    let expected = run(Technique::Original, &product, &v);

    for technique in Technique::ALL {
        assert_relative_eq!(run(technique, &product, &v), expected, max_relative = 1e-12);
    }
}

#[test]
fn test_does_not_mutate_input() {
    let v = Vector::from_vec(vec![5i64, -3, 8, 0, 2]);
    let snapshot = v.clone();

    for technique in Technique::ALL {
        run(technique, &Sum::new(), &v);
        assert_eq!(v, snapshot, "{} changed the input", technique);
        assert_eq!(v.len(), 5);
    }
}

#[test]
fn test_observer_called_once_per_run() {
    let seen = RefCell::new(Vec::new());
    let ladder = Ladder::new(Sum::<i64>::new()).with_observer(|t: Technique| seen.borrow_mut().push(t));
    let v = Vector::from_vec(vec![3, 1, 4, 1, 5, 9, 2, 6]);

    let mut dest = 0;
    ladder.reduce(Technique::Accumulator, &v, &mut dest);
    assert_eq!(dest, 31);
    assert_eq!(*seen.borrow(), vec![Technique::Accumulator]);

    let results = ladder.reduce_all(&v);
    assert!(results.iter().all(|&(_, r)| r == 31));
    assert_eq!(seen.borrow().len(), 1 + Technique::ALL.len());
    assert_eq!(&seen.borrow()[1..], &Technique::ALL[..]);
}

#[test]
fn test_observer_called_on_empty_input() {
    let calls = RefCell::new(0);
    let ladder = Ladder::new(Sum::<u32>::new()).with_observer(|_: Technique| *calls.borrow_mut() += 1);
    let results = ladder.reduce_all(&Vector::zeroed(0));

    assert!(results.iter().all(|&(_, r)| r == 0));
    assert_eq!(*calls.borrow(), Technique::ALL.len());
}

#[test]
fn test_technique_names_round_trip() {
    for technique in Technique::ALL {
        assert_eq!(Technique::from_name(technique.name()), Some(technique));
    }
    assert_eq!(Technique::from_name("unroll_x4"), None);
}

#[test]
fn test_available_variants_in_ladder_order() {
    let names: Vec<_> = available_variants::<Sum<i64>>().iter().map(|v| v.name).collect();
    assert_eq!(
        names,
        vec![
            "original",
            "code_motion",
            "direct_access",
            "accumulator",
            "unroll_x2",
            "unroll_x3",
            "unroll_x2_parallel",
        ]
    );
}

#[test]
fn test_c_variants_match_rust() {
    let v: Vector<i64> = (-500..523).collect();
    let sum = Sum::<i64>::new();
    let expected = run(Technique::Original, &sum, &v);

    for variant in c_variants() {
        let mut dest = 0;
        (variant.function)(&sum, &v, &mut dest);
        assert_eq!(dest, expected, "{}", variant.name);
    }
}

fn off_by_one(cfg: &Sum<i64>, v: &Vector<i64>, dest: &mut i64) {
    combine_accumulator(cfg, v, dest);
    *dest += 1;
}

#[test]
fn test_verify_checks_extra_variants() {
    use crate::registry::{AlgorithmRunner, VerifyError};
    use crate::utils::VariantInfo;
    use rand::rngs::StdRng;

    let runner = super::sum_i64_runner();
    assert!(runner.verify().is_ok());

    let broken = super::CombineRunner::new("broken", "", Sum::<i64>::new(), |_: &mut StdRng| 1).with_extra_variants(|| {
        vec![VariantInfo {
            name: "off_by_one",
            description: "",
            function: off_by_one as CombineFn<Sum<i64>>,
        }]
    });
    match broken.verify() {
        Err(VerifyError::Mismatch { variant, size, .. }) => {
            assert_eq!(variant, "off_by_one");
            assert_eq!(size, 0);
        }
        other => panic!("expected a mismatch, got {:?}", other),
    }
}

proptest! {
    #[test]
    fn prop_integer_rungs_bit_exact(data in prop::collection::vec(-1_000_000i64..1_000_000, 0..200)) {
        let v = Vector::from_vec(data.clone());
        let expected: i64 = data.iter().sum();
        for (technique, got) in all_results(&Sum::new(), &v) {
            prop_assert_eq!(got, expected, "{}", technique);
        }
        prop_assert_eq!(v.start(), &data[..]);
    }

    #[test]
    fn prop_wrapping_free_product_bit_exact(data in prop::collection::vec(-3i64..=3, 0..30)) {
        let v = Vector::from_vec(data);
        let product = Product::<i64>::new();
        let expected = run(Technique::Original, &product, &v);
        for technique in Technique::ALL {
            prop_assert_eq!(run(technique, &product, &v), expected, "{}", technique);
        }
    }

    #[test]
    fn prop_float_rungs_within_tolerance(data in prop::collection::vec(-1.0e3f64..1.0e3, 0..256)) {
        let scale: f64 = data.iter().map(|x| x.abs()).sum::<f64>().max(1.0);
        let v = Vector::from_vec(data);
        let sum = Sum::<f64>::new();
        let expected = run(Technique::Original, &sum, &v);
        for technique in Technique::ALL {
            let got = run(technique, &sum, &v);
            prop_assert!((got - expected).abs() <= 1e-12 * scale, "{}: {} vs {}", technique, got, expected);
        }
    }
}
