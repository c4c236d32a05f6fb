//! One-sample t-test of the kappa estimate against zero.
//!
//! Tail probabilities and quantiles come from statrs' Student's t, which is
//! backed by the regularized incomplete beta function and its inverse.

use statrs::distribution::{ContinuousCDF, StudentsT};
use tracing::debug;

use crate::error::{KappaError, Result};
use crate::model::{ConfidenceInterval, KappaConfig, SignificanceResult};

pub fn test(
    kappa: f64,
    std_error: f64,
    degrees_of_freedom: i64,
    confidence_level: f64,
) -> Result<SignificanceResult> {
    if degrees_of_freedom < 1 {
        return Err(KappaError::InvalidDegreesOfFreedom { degrees_of_freedom });
    }
    KappaConfig { confidence_level }.validate()?;
    if std_error == 0.0 || !std_error.is_finite() {
        return Err(KappaError::DegenerateStandardError {
            standard_error: std_error,
        });
    }

    let distribution = students_t(degrees_of_freedom)?;
    let t_statistic = kappa / std_error;
    let p_value = (2.0 * distribution.cdf(-t_statistic.abs())).clamp(0.0, 1.0);
    let critical_t = two_tailed_quantile(&distribution, confidence_level);
    let margin = critical_t * std_error.abs();

    debug!(t_statistic, degrees_of_freedom, p_value, critical_t, "t-test");

    Ok(SignificanceResult {
        t_statistic,
        degrees_of_freedom: degrees_of_freedom as usize,
        p_value,
        critical_t,
        confidence_level,
        confidence_interval: ConfidenceInterval {
            lower: kappa - margin,
            upper: kappa + margin,
        },
    })
}

/// Two-tailed critical value of Student's t at `confidence_level`.
pub fn critical_t(degrees_of_freedom: i64, confidence_level: f64) -> Result<f64> {
    if degrees_of_freedom < 1 {
        return Err(KappaError::InvalidDegreesOfFreedom { degrees_of_freedom });
    }
    KappaConfig { confidence_level }.validate()?;
    let distribution = students_t(degrees_of_freedom)?;
    Ok(two_tailed_quantile(&distribution, confidence_level))
}

fn two_tailed_quantile(distribution: &StudentsT, confidence_level: f64) -> f64 {
    distribution.inverse_cdf(1.0 - (1.0 - confidence_level) / 2.0)
}

fn students_t(degrees_of_freedom: i64) -> Result<StudentsT> {
    StudentsT::new(0.0, 1.0, degrees_of_freedom as f64)
        .map_err(|err| KappaError::Distribution(err.to_string()))
}
