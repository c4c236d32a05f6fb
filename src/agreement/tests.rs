use super::*;
use crate::error::KappaError;
use crate::model::{CodeSet, RaterDataset};

fn dataset(raw: Vec<Vec<Vec<i64>>>) -> RaterDataset {
    RaterDataset::from_indices(raw, None).expect("fixture dataset should build")
}

#[test]
fn pair_agreement_is_undefined_when_either_side_is_empty() {
    let coded = CodeSet::from([0, 1]);
    assert_eq!(pair_agreement(&coded, &CodeSet::new()), None);
    assert_eq!(pair_agreement(&CodeSet::new(), &coded), None);
    assert_eq!(pair_agreement(&CodeSet::new(), &CodeSet::new()), None);
}

#[test]
fn pair_agreement_distinguishes_disjoint_from_undefined() {
    assert_eq!(pair_agreement(&CodeSet::from([0]), &CodeSet::from([1])), Some(0.0));
}

#[test]
fn pair_agreement_is_intersection_over_union() {
    let a = CodeSet::from([0, 1, 2]);
    let b = CodeSet::from([1, 2, 3, 4]);
    let value = pair_agreement(&a, &b).expect("both sides coded");
    assert!((value - 2.0 / 5.0).abs() < 1e-12, "unexpected agreement: {value}");
    assert_eq!(pair_agreement(&a, &a), Some(1.0));
}

#[test]
fn aggregate_fails_on_segment_no_pair_scored() {
    let data = dataset(vec![
        vec![vec![0], vec![0, 1], vec![]],
        vec![vec![0], vec![1], vec![]],
    ]);
    let err = aggregate(&data).expect_err("segment 2 has no coded pair");
    assert_eq!(err, KappaError::UndefinedSegmentAgreement { segment: 2 });
}

#[test]
fn aggregate_reports_po_pc_and_scheme_count() {
    let data = dataset(vec![
        vec![vec![0], vec![1, 2], vec![0, 1]],
        vec![vec![0], vec![1], vec![0, 1]],
    ]);
    let summary = aggregate(&data).expect("all segments coded");

    assert_eq!(summary.segment_count, 3);
    assert_eq!(summary.coding_scheme_count, 6);
    assert_eq!(summary.segment_agreements, vec![1.0, 0.5, 1.0]);
    assert_eq!(summary.valid_pairs, vec![1, 1, 1]);
    assert!((summary.total_proportional_agreement - 2.5).abs() < 1e-12);
    assert!((summary.observed_agreement - 2.5 / 3.0).abs() < 1e-12);
    assert!((summary.expected_agreement - 2.5 / 6.0).abs() < 1e-12);
}

#[test]
fn aggregate_skips_pairs_with_an_unscored_side() {
    // Rater 2 skips segment 0, leaving one defined pair out of three.
    let data = dataset(vec![
        vec![vec![0], vec![1]],
        vec![vec![0, 1], vec![1]],
        vec![vec![], vec![1]],
    ]);
    let summary = aggregate(&data).expect("each segment has a coded pair");

    assert_eq!(summary.valid_pairs, vec![1, 3]);
    assert_eq!(summary.segment_agreements, vec![0.5, 1.0]);
    assert_eq!(summary.coding_scheme_count, 5);
}

#[test]
fn aggregate_rejects_all_empty_dataset() {
    let data = dataset(vec![vec![vec![], vec![]], vec![vec![]]]);
    assert_eq!(aggregate(&data), Err(KappaError::NoCodingSchemesRecorded));

    assert_eq!(
        aggregate(&RaterDataset::default()),
        Err(KappaError::NoCodingSchemesRecorded)
    );
}

#[test]
fn aggregate_needs_two_raters() {
    let data = dataset(vec![vec![vec![0], vec![1]]]);
    assert_eq!(
        aggregate(&data),
        Err(KappaError::UndefinedSegmentAgreement { segment: 0 })
    );
}
