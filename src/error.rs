use thiserror::Error;

/// Terminal failures of a kappa run. No partial results accompany any of them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KappaError {
    /// A code index is negative or outside the declared vocabulary.
    #[error("malformed code set for rater {rater} segment {segment}: code {code} {reason}")]
    MalformedCodeSet {
        rater: usize,
        segment: usize,
        code: i64,
        reason: String,
    },

    #[error("segment {segment} has no rater pair where both raters applied a code")]
    UndefinedSegmentAgreement { segment: usize },

    #[error("expected agreement is {expected}, kappa denominator (1 - Pc) is zero")]
    DegenerateExpectedAgreement { expected: f64 },

    #[error("no coding schemes recorded: every rater left every segment empty")]
    NoCodingSchemesRecorded,

    #[error("degrees of freedom must be at least 1, got {degrees_of_freedom}")]
    InvalidDegreesOfFreedom { degrees_of_freedom: i64 },

    /// Raised when the standard error is zero or non-finite, which happens whenever kappa is 0.
    #[error("standard error {standard_error} does not admit a t-statistic")]
    DegenerateStandardError { standard_error: f64 },

    #[error("confidence level must lie strictly between 0 and 1, got {level}")]
    InvalidConfidenceLevel { level: f64 },

    #[error("t-distribution rejected its parameters: {0}")]
    Distribution(String),
}

impl KappaError {
    /// Stable identifier used in reports and manifests.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedCodeSet { .. } => "malformed_code_set",
            Self::UndefinedSegmentAgreement { .. } => "undefined_segment_agreement",
            Self::DegenerateExpectedAgreement { .. } => "degenerate_expected_agreement",
            Self::NoCodingSchemesRecorded => "no_coding_schemes_recorded",
            Self::InvalidDegreesOfFreedom { .. } => "invalid_degrees_of_freedom",
            Self::DegenerateStandardError { .. } => "degenerate_standard_error",
            Self::InvalidConfidenceLevel { .. } => "invalid_confidence_level",
            Self::Distribution(_) => "distribution",
        }
    }

    /// Plain-language explanation rendered by the report writer.
    pub fn explanation(&self) -> &'static str {
        match self {
            Self::MalformedCodeSet { .. } => {
                "A code index was negative or did not match any column of the header row."
            }
            Self::UndefinedSegmentAgreement { .. } => {
                "At least two raters must apply a code to every segment; otherwise the segment's agreement cannot be averaged."
            }
            Self::DegenerateExpectedAgreement { .. } => {
                "Chance agreement equals 1, so kappa is undefined."
            }
            Self::NoCodingSchemesRecorded => {
                "None of the raters applied any code, so there is nothing to compare."
            }
            Self::InvalidDegreesOfFreedom { .. } => {
                "The t-test needs at least two segments."
            }
            Self::DegenerateStandardError { .. } => {
                "Kappa is exactly zero, so its standard error is zero and the t-statistic is undefined."
            }
            Self::InvalidConfidenceLevel { .. } => {
                "Confidence levels are fractions such as 0.95."
            }
            Self::Distribution(_) => "The Student's t distribution could not be constructed.",
        }
    }
}

pub type Result<T> = std::result::Result<T, KappaError>;
