use std::collections::BTreeSet;

use anyhow::Result;
use tracing::{info, warn};

use super::load::load_raters;
use crate::cli::InspectArgs;

pub fn run(args: InspectArgs) -> Result<()> {
    let loaded = load_raters(&args.rater_paths, args.header_row)?;
    let dataset = &loaded.dataset;

    match &loaded.labels {
        Some(labels) => info!(codes = labels.len(), labels = %labels.join(","), "header row"),
        None => warn!("no header row found; codes will be numbered"),
    }

    for (idx, (rater, input)) in dataset.raters().iter().zip(&loaded.inputs).enumerate() {
        let distinct: BTreeSet<u32> = rater.entries().iter().flat_map(|set| set.codes()).collect();
        info!(
            rater = idx + 1,
            path = %input.path,
            sha256 = %input.sha256,
            segments = rater.segment_len(),
            coding_schemes = rater.coding_scheme_count(),
            distinct_codes = distinct.len(),
            "rater table"
        );
    }

    let segment_count = dataset.segment_count();
    let short_raters = dataset
        .raters()
        .iter()
        .filter(|rater| rater.segment_len() < segment_count)
        .count();
    if short_raters > 0 {
        warn!(
            short_raters,
            segment_count, "some raters cover fewer segments; missing entries read as unscored"
        );
    }

    info!(
        raters = dataset.rater_count(),
        segments = segment_count,
        coding_schemes = dataset.coding_scheme_count(),
        "dataset summary"
    );

    Ok(())
}
