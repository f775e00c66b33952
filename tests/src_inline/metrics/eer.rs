use super::*;

fn eer(scores: &[f64], labels: &[i64]) -> EerResult {
    compute_eer(scores, labels).unwrap()
}

#[test]
fn test_perfect_separation() {
    let r = eer(&[0.1, 0.2, 0.9, 0.95], &[0, 0, 1, 1]);
    assert_eq!(r.eer, 0.0);
    assert_eq!(r.threshold, 0.9);
}

#[test]
fn test_no_separation() {
    let r = eer(&[0.5, 0.5, 0.5, 0.5], &[0, 1, 0, 1]);
    assert_eq!(r.eer, 0.5);
    assert_eq!(r.threshold, 0.5);
}

#[test]
fn test_reversed_separation_is_total_error() {
    let r = eer(&[0.9, 0.95, 0.1, 0.2], &[0, 0, 1, 1]);
    assert_eq!(r.eer, 1.0);
}

#[test]
fn test_exact_crossing() {
    let scores = [0.4, 0.6, 0.8, 0.1, 0.5, 0.7];
    let labels = [1, 1, 1, 0, 0, 0];
    let r = eer(&scores, &labels);
    assert!((r.eer - 1.0 / 3.0).abs() < 1e-12);
    assert_eq!(r.threshold, 0.6);
}

#[test]
fn test_gap_tie_prefers_lower_mean() {
    // t=0.6 -> (frr 0.5, far 1.0), t=0.7 -> (frr 0.5, far 0.0)
    let r = eer(&[0.5, 0.7, 0.6], &[1, 1, 0]);
    assert_eq!(r.eer, 0.25);
    assert_eq!(r.threshold, 0.7);
}

#[test]
fn test_det_curve_is_monotonic() {
    let scores = [0.3, 0.1, 0.8, 0.8, 0.45, 0.2, 0.9, 0.6, 0.6];
    let labels = [0, 0, 1, 0, 1, 0, 1, 1, 0];
    let curve = det_curve(&scores, &labels).unwrap();
    assert_eq!(curve.len(), 7);
    assert_eq!(curve[0].frr, 0.0);
    assert_eq!(curve[0].far, 1.0);
    for w in curve.windows(2) {
        assert!(w[0].threshold < w[1].threshold);
        assert!(w[0].frr <= w[1].frr);
        assert!(w[0].far >= w[1].far);
    }
}

#[test]
fn test_eer_within_unit_interval() {
    let cases: [(&[f64], &[i64]); 4] = [
        (&[0.0, 1.0], &[0, 1]),
        (&[1.0, 0.0], &[0, 1]),
        (&[-3.0, 2.5, 2.5, 7.0, -1.0], &[1, 0, 1, 0, 0]),
        (&[0.2, 0.2, 0.3, 0.1, 0.4, 0.4], &[1, 0, 0, 1, 1, 0]),
    ];
    for (scores, labels) in cases {
        let r = eer(scores, labels);
        assert!((0.0..=1.0).contains(&r.eer), "eer {} out of range", r.eer);
    }
}

#[test]
fn test_deterministic_and_order_independent() {
    let scores = [0.31, 0.72, 0.72, 0.05, 0.66, 0.49, 0.88, 0.12];
    let labels = [0, 1, 0, 0, 1, 1, 1, 0];
    let a = eer(&scores, &labels);
    let b = eer(&scores, &labels);
    assert_eq!(a.eer.to_bits(), b.eer.to_bits());
    assert_eq!(a.threshold.to_bits(), b.threshold.to_bits());

    let mut pairs: Vec<(f64, i64)> = scores.iter().copied().zip(labels).collect();
    pairs.reverse();
    pairs.rotate_left(3);
    let (s, l): (Vec<f64>, Vec<i64>) = pairs.into_iter().unzip();
    let c = eer(&s, &l);
    assert_eq!(a.eer.to_bits(), c.eer.to_bits());
    assert_eq!(a.threshold.to_bits(), c.threshold.to_bits());
}

#[test]
fn test_class_swap_symmetry() {
    let cases: [(&[f64], &[i64]); 4] = [
        (&[0.4, 0.6, 0.8, 0.1, 0.5, 0.7], &[1, 1, 1, 0, 0, 0]),
        (&[0.5, 0.7, 0.6], &[1, 1, 0]),
        (&[0.2, 0.2, 0.3, 0.1, 0.4, 0.4, 0.0], &[1, 0, 0, 1, 1, 0, 0]),
        (&[0.5, 0.5, 0.5, 0.5], &[0, 1, 0, 1]),
    ];
    for (scores, labels) in cases {
        let flipped_scores: Vec<f64> = scores.iter().map(|s| -s).collect();
        let flipped_labels: Vec<i64> = labels.iter().map(|l| 1 - l).collect();
        let a = eer(scores, labels);
        let b = eer(&flipped_scores, &flipped_labels);
        assert_eq!(a.eer.to_bits(), b.eer.to_bits());
    }
}

#[test]
fn test_signed_zero_is_one_threshold() {
    let curve = det_curve(&[-0.0, 0.0, 1.0], &[0, 1, 1]).unwrap();
    assert_eq!(curve.len(), 2);
}

#[test]
fn test_degenerate_input() {
    assert_eq!(
        compute_eer(&[0.1, 0.4], &[0, 0]),
        Err(EerError::DegenerateInput {
            positives: 0,
            negatives: 2
        })
    );
    assert_eq!(
        compute_eer(&[0.1], &[1]),
        Err(EerError::DegenerateInput {
            positives: 1,
            negatives: 0
        })
    );
}

#[test]
fn test_length_mismatch() {
    assert_eq!(
        compute_eer(&[0.1, 0.2, 0.3], &[0, 1]),
        Err(EerError::LengthMismatch {
            scores: 3,
            labels: 2
        })
    );
}

#[test]
fn test_empty_input() {
    assert_eq!(compute_eer(&[], &[]), Err(EerError::EmptyInput));
}

#[test]
fn test_invalid_label() {
    assert_eq!(
        compute_eer(&[0.1, 0.2, 0.3], &[0, 2, 1]),
        Err(EerError::InvalidLabel { index: 1, value: 2 })
    );
}

#[test]
fn test_non_finite_score() {
    assert_eq!(
        compute_eer(&[0.1, f64::NAN, 0.3], &[0, 1, 1]),
        Err(EerError::NonFiniteScore { index: 1 })
    );
}
