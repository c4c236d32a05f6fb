use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{KappaError, Result};

pub const DEFAULT_CONFIDENCE_LEVEL: f64 = 0.95;

/// Codes one rater marked present on one segment.
///
/// An empty set covers both "not scored" and "no code applied".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeSet(BTreeSet<u32>);

impl CodeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn codes(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().copied()
    }

    pub fn intersection_len(&self, other: &CodeSet) -> usize {
        self.0.intersection(&other.0).count()
    }

    pub(crate) fn max_code(&self) -> Option<u32> {
        self.0.last().copied()
    }
}

impl FromIterator<u32> for CodeSet {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[u32; N]> for CodeSet {
    fn from(codes: [u32; N]) -> Self {
        codes.into_iter().collect()
    }
}

/// One rater's entries, indexed by segment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rater {
    segments: Vec<CodeSet>,
}

impl Rater {
    pub fn new(segments: Vec<CodeSet>) -> Self {
        Self { segments }
    }

    pub fn segment_len(&self) -> usize {
        self.segments.len()
    }

    /// Entry for `segment`, or an empty set past the end of this rater's table.
    pub fn entry(&self, segment: usize) -> &CodeSet {
        static EMPTY: CodeSet = CodeSet(BTreeSet::new());
        self.segments.get(segment).unwrap_or(&EMPTY)
    }

    pub fn entries(&self) -> &[CodeSet] {
        &self.segments
    }

    pub fn coding_scheme_count(&self) -> usize {
        self.segments.iter().filter(|set| !set.is_empty()).count()
    }
}

/// Ordered code names, usually taken from a table's header row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeVocabulary {
    labels: Vec<String>,
}

impl CodeVocabulary {
    pub fn new(labels: Vec<String>) -> Self {
        Self { labels }
    }

    pub(crate) fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn label(&self, code: u32) -> Option<&str> {
        self.labels.get(code as usize).map(String::as_str)
    }
}

/// Fallback label for a code with no vocabulary entry.
pub fn numeric_label(code: u32) -> String {
    format!("c{}", u64::from(code) + 1)
}

/// The full, validated input of one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RaterDataset {
    raters: Vec<Rater>,
    vocabulary: Option<CodeVocabulary>,
}

impl RaterDataset {
    /// Builds a dataset, rejecting codes outside a supplied vocabulary.
    pub fn new(raters: Vec<Rater>, vocabulary: Option<CodeVocabulary>) -> Result<Self> {
        if let Some(vocab) = &vocabulary {
            for (rater_idx, rater) in raters.iter().enumerate() {
                for (segment_idx, set) in rater.entries().iter().enumerate() {
                    let Some(code) = set.max_code() else {
                        continue;
                    };
                    if code as usize >= vocab.len() {
                        return Err(out_of_vocabulary(rater_idx, segment_idx, i64::from(code), vocab));
                    }
                }
            }
        }

        Ok(Self { raters, vocabulary })
    }

    /// Builds a dataset from raw integer indices as they arrive from an external source.
    pub fn from_indices(
        raw: Vec<Vec<Vec<i64>>>,
        vocabulary: Option<CodeVocabulary>,
    ) -> Result<Self> {
        let mut raters = Vec::with_capacity(raw.len());
        for (rater_idx, segments) in raw.into_iter().enumerate() {
            let mut sets = Vec::with_capacity(segments.len());
            for (segment_idx, codes) in segments.into_iter().enumerate() {
                let mut set = BTreeSet::new();
                for code in codes {
                    let index = u32::try_from(code).map_err(|_| KappaError::MalformedCodeSet {
                        rater: rater_idx,
                        segment: segment_idx,
                        code,
                        reason: "is not a non-negative code index".to_string(),
                    })?;
                    set.insert(index);
                }
                sets.push(CodeSet(set));
            }
            raters.push(Rater::new(sets));
        }

        Self::new(raters, vocabulary)
    }

    pub fn raters(&self) -> &[Rater] {
        &self.raters
    }

    pub fn rater_count(&self) -> usize {
        self.raters.len()
    }

    /// Length of the segment axis: the longest rater table.
    pub fn segment_count(&self) -> usize {
        self.raters
            .iter()
            .map(Rater::segment_len)
            .max()
            .unwrap_or(0)
    }

    pub fn coding_scheme_count(&self) -> usize {
        self.raters.iter().map(Rater::coding_scheme_count).sum()
    }

    pub fn label_for(&self, code: u32) -> String {
        self.vocabulary
            .as_ref()
            .and_then(|vocab| vocab.label(code))
            .map(ToOwned::to_owned)
            .unwrap_or_else(|| numeric_label(code))
    }

    /// Resolved labels of every rater's entry for `segment`, in rater order.
    pub fn segment_labels(&self, segment: usize) -> Vec<Vec<String>> {
        self.raters
            .iter()
            .map(|rater| {
                rater
                    .entry(segment)
                    .codes()
                    .map(|code| self.label_for(code))
                    .collect()
            })
            .collect()
    }
}

fn out_of_vocabulary(rater: usize, segment: usize, code: i64, vocab: &CodeVocabulary) -> KappaError {
    KappaError::MalformedCodeSet {
        rater,
        segment,
        code,
        reason: format!("is outside the {}-code vocabulary", vocab.len()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KappaConfig {
    pub confidence_level: f64,
}

impl Default for KappaConfig {
    fn default() -> Self {
        Self {
            confidence_level: DEFAULT_CONFIDENCE_LEVEL,
        }
    }
}

impl KappaConfig {
    pub fn validate(&self) -> Result<()> {
        let level = self.confidence_level;
        if !(level > 0.0 && level < 1.0) {
            return Err(KappaError::InvalidConfidenceLevel { level });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgreementSummary {
    pub segment_count: usize,
    pub coding_scheme_count: usize,
    pub segment_agreements: Vec<f64>,
    pub valid_pairs: Vec<usize>,
    pub total_proportional_agreement: f64,
    pub observed_agreement: f64,
    pub expected_agreement: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KappaResult {
    pub kappa: f64,
    pub standard_error: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SignificanceResult {
    pub t_statistic: f64,
    pub degrees_of_freedom: usize,
    pub p_value: f64,
    pub critical_t: f64,
    pub confidence_level: f64,
    pub confidence_interval: ConfidenceInterval,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentDetail {
    pub index: usize,
    pub rater_codes: Vec<Vec<String>>,
    pub agreement: f64,
    pub valid_pairs: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KappaReport {
    pub rater_count: usize,
    pub segment_count: usize,
    pub coding_scheme_count: usize,
    pub total_proportional_agreement: f64,
    pub observed_agreement: f64,
    pub expected_agreement: f64,
    pub kappa: f64,
    pub standard_error: f64,
    pub agreement_strength: String,
    pub degrees_of_freedom: usize,
    pub t_statistic: f64,
    pub p_value: f64,
    pub confidence_level: f64,
    pub confidence_interval: ConfidenceInterval,
    pub segments: Vec<SegmentDetail>,
}
