use tracing::debug;

use crate::error::{KappaError, Result};
use crate::model::{AgreementSummary, KappaResult};

/// Mezzich's kappa and its standard error from aggregated agreement.
pub fn estimate(summary: &AgreementSummary) -> Result<KappaResult> {
    let po = summary.observed_agreement;
    let pc = summary.expected_agreement;
    let denominator = 1.0 - pc;
    if denominator == 0.0 {
        return Err(KappaError::DegenerateExpectedAgreement { expected: pc });
    }

    let kappa = (po - pc) / denominator;
    let standard_error = (po - pc) / ((summary.segment_count as f64).sqrt() * denominator);
    debug!(kappa, standard_error, "estimated kappa");

    Ok(KappaResult {
        kappa,
        standard_error,
    })
}

/// Landis & Koch reading of a kappa value.
pub fn agreement_strength(kappa: f64) -> &'static str {
    if kappa < 0.0 {
        "Less than chance agreement"
    } else if kappa < 0.20 {
        "Slight agreement"
    } else if kappa < 0.40 {
        "Fair agreement"
    } else if kappa < 0.60 {
        "Moderate agreement"
    } else if kappa < 0.80 {
        "Substantial agreement"
    } else {
        "Almost perfect agreement"
    }
}
