use tracing::debug;

use crate::agreement::aggregate;
use crate::error::Result;
use crate::kappa::{agreement_strength, estimate};
use crate::model::{KappaConfig, KappaReport, RaterDataset, SegmentDetail};
use crate::significance;

/// Runs the whole pipeline on one dataset.
///
/// Pure function of its inputs; the first failing stage aborts the run.
pub fn compute(dataset: &RaterDataset, config: &KappaConfig) -> Result<KappaReport> {
    config.validate()?;

    let summary = aggregate(dataset)?;
    let kappa_result = estimate(&summary)?;
    let degrees_of_freedom = summary.segment_count as i64 - 1;
    let significance = significance::test(
        kappa_result.kappa,
        kappa_result.standard_error,
        degrees_of_freedom,
        config.confidence_level,
    )?;

    let segments = summary
        .segment_agreements
        .iter()
        .zip(&summary.valid_pairs)
        .enumerate()
        .map(|(index, (agreement, valid_pairs))| SegmentDetail {
            index,
            rater_codes: dataset.segment_labels(index),
            agreement: *agreement,
            valid_pairs: *valid_pairs,
        })
        .collect();

    debug!(
        raters = dataset.rater_count(),
        segments = summary.segment_count,
        kappa = kappa_result.kappa,
        p_value = significance.p_value,
        "kappa pipeline complete"
    );

    Ok(KappaReport {
        rater_count: dataset.rater_count(),
        segment_count: summary.segment_count,
        coding_scheme_count: summary.coding_scheme_count,
        total_proportional_agreement: summary.total_proportional_agreement,
        observed_agreement: summary.observed_agreement,
        expected_agreement: summary.expected_agreement,
        kappa: kappa_result.kappa,
        standard_error: kappa_result.standard_error,
        agreement_strength: agreement_strength(kappa_result.kappa).to_string(),
        degrees_of_freedom: significance.degrees_of_freedom,
        t_statistic: significance.t_statistic,
        p_value: significance.p_value,
        confidence_level: significance.confidence_level,
        confidence_interval: significance.confidence_interval,
        segments,
    })
}
