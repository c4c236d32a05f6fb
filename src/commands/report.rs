use std::fmt;

use mezzich_kappa::{KappaError, KappaReport};
use serde::Serialize;

use super::load::InputFile;

const MANIFEST_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize)]
pub struct RunFailure {
    pub kind: String,
    pub message: String,
    pub explanation: String,
}

impl From<&KappaError> for RunFailure {
    fn from(err: &KappaError) -> Self {
        Self {
            kind: err.kind().to_string(),
            message: err.to_string(),
            explanation: err.explanation().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunManifest {
    pub manifest_version: u32,
    pub generated_at: String,
    pub confidence_level: f64,
    pub inputs: Vec<InputFile>,
    pub labels: Option<Vec<String>>,
    pub result: Option<KappaReport>,
    pub failure: Option<RunFailure>,
}

impl RunManifest {
    pub fn new(
        generated_at: String,
        confidence_level: f64,
        inputs: Vec<InputFile>,
        labels: Option<Vec<String>>,
        outcome: &Result<KappaReport, KappaError>,
    ) -> Self {
        let (result, failure) = match outcome {
            Ok(report) => (Some(report.clone()), None),
            Err(err) => (None, Some(RunFailure::from(err))),
        };

        Self {
            manifest_version: MANIFEST_VERSION,
            generated_at,
            confidence_level,
            inputs,
            labels,
            result,
            failure,
        }
    }
}

/// Human-readable report for one run, successful or not.
pub fn render_text(manifest: &RunManifest) -> String {
    TextReport(manifest).to_string()
}

struct TextReport<'a>(&'a RunManifest);

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let manifest = self.0;
        writeln!(f, "Mezzich's Kappa Report")?;
        writeln!(f, "Generated: {}", manifest.generated_at)?;
        writeln!(f)?;

        writeln!(f, "Rater files: {}", manifest.inputs.len())?;
        for (idx, input) in manifest.inputs.iter().enumerate() {
            writeln!(
                f,
                "  rater {}\t{}\tsegments={}\tcoding_schemes={}\tsha256={}",
                idx + 1,
                input.path,
                input.segment_count,
                input.coding_scheme_count,
                input.sha256
            )?;
        }
        match &manifest.labels {
            Some(labels) => writeln!(f, "Codes: {}", labels.join(", "))?,
            None => writeln!(f, "Codes: numbered (no header row)")?,
        }
        writeln!(f)?;

        if let Some(failure) = &manifest.failure {
            writeln!(f, "Kappa could not be computed.")?;
            writeln!(f, "Error ({}): {}", failure.kind, failure.message)?;
            writeln!(f, "{}", failure.explanation)?;
            return Ok(());
        }

        let Some(report) = &manifest.result else {
            return Ok(());
        };

        writeln!(f, "Segments: {}", report.segment_count)?;
        writeln!(f, "Coding schemes: {}", report.coding_scheme_count)?;
        writeln!(
            f,
            "Total proportional agreement: {:.6}",
            report.total_proportional_agreement
        )?;
        writeln!(f, "Observed agreement (Po): {:.6}", report.observed_agreement)?;
        writeln!(f, "Expected agreement (Pc): {:.6}", report.expected_agreement)?;
        writeln!(f, "Mezzich's Kappa: {:.6}", report.kappa)?;
        writeln!(f, "Standard error: {:.6}", report.standard_error)?;
        writeln!(f, "Strength: {}", report.agreement_strength)?;
        writeln!(
            f,
            "t({}) = {:.6}, p = {:.6}",
            report.degrees_of_freedom, report.t_statistic, report.p_value
        )?;
        writeln!(
            f,
            "{:.0}% CI: [{:.6}, {:.6}]",
            report.confidence_level * 100.0,
            report.confidence_interval.lower,
            report.confidence_interval.upper
        )?;
        writeln!(f)?;

        for segment in &report.segments {
            writeln!(
                f,
                "Segment {}\tagreement={:.6}\tvalid_pairs={}",
                segment.index + 1,
                segment.agreement,
                segment.valid_pairs
            )?;
            for (rater, codes) in segment.rater_codes.iter().enumerate() {
                let rendered = if codes.is_empty() {
                    "-".to_string()
                } else {
                    codes.join(", ")
                };
                writeln!(f, "\trater {}: {}", rater + 1, rendered)?;
            }
        }

        Ok(())
    }
}
