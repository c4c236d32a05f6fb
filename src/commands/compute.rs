use std::io::{self, Write};

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use mezzich_kappa::{KappaConfig, compute};
use tracing::{info, warn};

use super::load::{display_paths, load_raters};
use super::report::{RunManifest, render_text};
use crate::cli::ComputeArgs;
use crate::util::{timestamped_path, write_json_pretty, write_text};

pub fn run(args: ComputeArgs) -> Result<()> {
    let config = KappaConfig {
        confidence_level: args.confidence_level,
    };
    config
        .validate()
        .context("invalid --confidence-level")?;

    info!(
        raters = args.rater_paths.len(),
        paths = %display_paths(&args.rater_paths),
        header_row = args.header_row.as_str(),
        confidence_level = config.confidence_level,
        "computing mezzich kappa"
    );

    let loaded = load_raters(&args.rater_paths, args.header_row)?;
    let started = Utc::now();
    let outcome = compute(&loaded.dataset, &config);

    match &outcome {
        Ok(report) => info!(
            segments = report.segment_count,
            coding_schemes = report.coding_scheme_count,
            po = report.observed_agreement,
            pc = report.expected_agreement,
            kappa = report.kappa,
            standard_error = report.standard_error,
            t = report.t_statistic,
            df = report.degrees_of_freedom,
            p_value = report.p_value,
            ci_lower = report.confidence_interval.lower,
            ci_upper = report.confidence_interval.upper,
            "kappa computed"
        ),
        Err(err) => warn!(kind = err.kind(), error = %err, "kappa computation failed"),
    }

    let manifest = RunManifest::new(
        started.to_rfc3339_opts(SecondsFormat::Secs, true),
        config.confidence_level,
        loaded.inputs,
        loaded.labels,
        &outcome,
    );
    let text = render_text(&manifest);

    if args.dry_run {
        info!("dry-run: no report written");
    } else {
        let report_path = args
            .report_path
            .clone()
            .unwrap_or_else(|| timestamped_path(&args.report_dir, started, "txt"));
        write_text(&report_path, &text)?;
        info!(path = %report_path.display(), "wrote report");

        if let Some(json_path) = &args.json_path {
            write_json_pretty(json_path, &manifest)?;
            info!(path = %json_path.display(), "wrote run manifest");
        }
    }

    let mut output = io::BufWriter::new(io::stdout().lock());
    if args.json {
        serde_json::to_writer_pretty(&mut output, &manifest)
            .context("failed to serialize run manifest")?;
        writeln!(output)?;
    } else {
        output.write_all(text.as_bytes())?;
    }
    output.flush()?;

    outcome.context("mezzich kappa could not be computed")?;
    Ok(())
}
