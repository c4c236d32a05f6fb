use tracing::debug;

use super::pair_agreement;
use crate::error::{KappaError, Result};
use crate::model::{AgreementSummary, RaterDataset};

/// Folds every defined rater pair of every segment into Po and Pc.
pub fn aggregate(dataset: &RaterDataset) -> Result<AgreementSummary> {
    let coding_scheme_count = dataset.coding_scheme_count();
    if coding_scheme_count == 0 {
        return Err(KappaError::NoCodingSchemesRecorded);
    }

    let segment_count = dataset.segment_count();
    let raters = dataset.raters();
    let mut segment_agreements = Vec::with_capacity(segment_count);
    let mut valid_pairs = Vec::with_capacity(segment_count);

    for segment in 0..segment_count {
        let mut sum = 0.0_f64;
        let mut count = 0usize;

        for (j, left) in raters.iter().enumerate() {
            for right in &raters[j + 1..] {
                if let Some(value) = pair_agreement(left.entry(segment), right.entry(segment)) {
                    sum += value;
                    count += 1;
                }
            }
        }

        if count == 0 {
            return Err(KappaError::UndefinedSegmentAgreement { segment });
        }

        let agreement = sum / count as f64;
        debug!(segment, valid_pairs = count, agreement, "segment agreement");
        segment_agreements.push(agreement);
        valid_pairs.push(count);
    }

    let total_proportional_agreement: f64 = segment_agreements.iter().sum();
    let observed_agreement = total_proportional_agreement / segment_count as f64;
    let expected_agreement = total_proportional_agreement / coding_scheme_count as f64;

    debug!(
        segments = segment_count,
        coding_schemes = coding_scheme_count,
        total = total_proportional_agreement,
        po = observed_agreement,
        pc = expected_agreement,
        "aggregated agreement"
    );

    Ok(AgreementSummary {
        segment_count,
        coding_scheme_count,
        segment_agreements,
        valid_pairs,
        total_proportional_agreement,
        observed_agreement,
        expected_agreement,
    })
}
