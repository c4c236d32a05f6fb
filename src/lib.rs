//! Mezzich's kappa for multi-rater, multi-code agreement.
//!
//! Each rater supplies one set of codes per segment. [`engine::compute`]
//! turns a [`RaterDataset`] into a [`KappaReport`] carrying observed and
//! expected agreement, kappa with its standard error, and a t-test of kappa
//! against zero.

pub mod agreement;
pub mod engine;
pub mod error;
pub mod kappa;
pub mod model;
pub mod significance;

pub use engine::compute;
pub use error::{KappaError, Result};
pub use model::{
    AgreementSummary, CodeSet, CodeVocabulary, ConfidenceInterval, KappaConfig, KappaReport,
    KappaResult, Rater, RaterDataset, SegmentDetail, SignificanceResult,
};
