use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use mezzich_kappa::{CodeSet, CodeVocabulary, Rater, RaterDataset};
use regex::Regex;
use serde::Serialize;
use tracing::{info, warn};

use crate::cli::HeaderRow;
use crate::util::sha256_file;

pub fn numeric_cell_pattern() -> Result<Regex> {
    Regex::new(r"^[+-]?(\d+(\.\d*)?|\.\d+)([eE][+-]?\d+)?$")
        .context("failed to compile numeric cell regex")
}

/// One parsed rater table.
#[derive(Debug, Clone)]
pub struct RaterTable {
    pub header: Option<Vec<String>>,
    pub rater: Rater,
    pub coerced_cells: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct InputFile {
    pub path: String,
    pub sha256: String,
    pub segment_count: usize,
    pub coding_scheme_count: usize,
}

#[derive(Debug)]
pub struct LoadedInputs {
    pub dataset: RaterDataset,
    pub inputs: Vec<InputFile>,
    pub labels: Option<Vec<String>>,
}

pub fn load_raters(paths: &[PathBuf], header_row: HeaderRow) -> Result<LoadedInputs> {
    let mut raters = Vec::with_capacity(paths.len());
    let mut inputs = Vec::with_capacity(paths.len());
    let mut labels: Option<Vec<String>> = None;
    let numeric = numeric_cell_pattern()?;

    for path in paths {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read rater table {}", path.display()))?;
        let table = parse_rater_table(&raw, header_row, &numeric)
            .with_context(|| format!("failed to parse rater table {}", path.display()))?;

        if table.coerced_cells > 0 {
            warn!(
                path = %path.display(),
                cells = table.coerced_cells,
                "non-numeric cells treated as code absent"
            );
        }

        if let Some(header) = table.header {
            if labels.is_none() {
                labels = Some(header);
            } else if labels.as_ref() != Some(&header) {
                warn!(
                    path = %path.display(),
                    "header row differs from the first table's header; keeping the first"
                );
            }
        }

        info!(
            path = %path.display(),
            segments = table.rater.segment_len(),
            coding_schemes = table.rater.coding_scheme_count(),
            "loaded rater table"
        );

        inputs.push(InputFile {
            path: path.display().to_string(),
            sha256: sha256_file(path)?,
            segment_count: table.rater.segment_len(),
            coding_scheme_count: table.rater.coding_scheme_count(),
        });
        raters.push(table.rater);
    }

    let vocabulary = labels.clone().map(CodeVocabulary::new);
    let dataset = RaterDataset::new(raters, vocabulary)
        .with_context(|| format!("invalid code in rater tables (header_row={})", header_row.as_str()))?;

    Ok(LoadedInputs {
        dataset,
        inputs,
        labels,
    })
}

/// Parses one code-presence table: one row per segment, one column per code.
/// A cell with a positive numeric value marks the column's code present.
pub fn parse_rater_table(raw: &str, header_row: HeaderRow, numeric: &Regex) -> Result<RaterTable> {
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    let mut rows = raw
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(split_cells)
        .peekable();

    let header = match rows.peek() {
        Some(first) if is_header(first, header_row, numeric) => rows.next(),
        _ => None,
    };

    let mut coerced_cells = 0usize;
    let mut segments = Vec::new();
    for row in rows {
        let mut codes = Vec::new();
        for (column, cell) in row.iter().enumerate() {
            match coerce_cell(cell, numeric) {
                Some(value) if value > 0.0 => codes.push(column_code(column)?),
                Some(_) => {}
                None => coerced_cells += 1,
            }
        }
        segments.push(codes.into_iter().collect::<CodeSet>());
    }

    Ok(RaterTable {
        header,
        rater: Rater::new(segments),
        coerced_cells,
    })
}

fn column_code(column: usize) -> Result<u32> {
    u32::try_from(column).with_context(|| format!("column {column} is past the largest code index"))
}

/// Splits one CSV record. Commas inside double quotes stay in the cell and
/// `""` inside quotes reads as a literal quote.
fn split_cells(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut quoted = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if quoted && chars.peek() == Some(&'"') => {
                cell.push('"');
                chars.next();
            }
            '"' => quoted = !quoted,
            ',' if !quoted => cells.push(std::mem::take(&mut cell).trim().to_string()),
            _ => cell.push(ch),
        }
    }
    cells.push(cell.trim().to_string());
    cells
}

fn is_header(row: &[String], header_row: HeaderRow, numeric: &Regex) -> bool {
    match header_row {
        HeaderRow::Present => true,
        HeaderRow::Absent => false,
        HeaderRow::Auto => row
            .iter()
            .any(|cell| !cell.is_empty() && !numeric.is_match(cell)),
    }
}

/// Blank cells read as 0; non-numeric cells are `None`.
fn coerce_cell(cell: &str, numeric: &Regex) -> Option<f64> {
    if cell.is_empty() {
        return Some(0.0);
    }
    if !numeric.is_match(cell) {
        return None;
    }
    cell.parse::<f64>().ok()
}

pub fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str, header_row: HeaderRow) -> RaterTable {
        let numeric = numeric_cell_pattern().expect("pattern compiles");
        parse_rater_table(raw, header_row, &numeric).expect("table parses")
    }

    fn codes(table: &RaterTable, segment: usize) -> Vec<u32> {
        table.rater.entry(segment).codes().collect()
    }

    #[test]
    fn auto_detects_textual_header_row() {
        let table = parse("anger,joy,fear\n1,0,0\n0,1,1\n", HeaderRow::Auto);
        assert_eq!(
            table.header,
            Some(vec!["anger".to_string(), "joy".to_string(), "fear".to_string()])
        );
        assert_eq!(table.rater.segment_len(), 2);
        assert_eq!(codes(&table, 0), vec![0]);
        assert_eq!(codes(&table, 1), vec![1, 2]);
    }

    #[test]
    fn auto_treats_numeric_first_row_as_data() {
        let table = parse("1,0\n0,1\n", HeaderRow::Auto);
        assert!(table.header.is_none());
        assert_eq!(table.rater.segment_len(), 2);
    }

    #[test]
    fn forced_header_modes_override_detection() {
        let present = parse("1,2\n0,1\n", HeaderRow::Present);
        assert_eq!(present.header, Some(vec!["1".to_string(), "2".to_string()]));
        assert_eq!(present.rater.segment_len(), 1);

        let absent = parse("a,b\n0,1\n", HeaderRow::Absent);
        assert!(absent.header.is_none());
        assert_eq!(absent.rater.segment_len(), 2);
        assert_eq!(absent.coerced_cells, 2);
    }

    #[test]
    fn cells_are_coerced_and_blank_rows_skipped() {
        let raw = "code1,code2,code3\n\"1\", ,x\n\n0,2.5,-1\n0,0,0\n";
        let table = parse(raw, HeaderRow::Auto);

        assert_eq!(table.rater.segment_len(), 3);
        assert_eq!(codes(&table, 0), vec![0]);
        assert_eq!(codes(&table, 1), vec![1]);
        assert!(table.rater.entry(2).is_empty());
        assert_eq!(table.coerced_cells, 1);
    }

    #[test]
    fn leading_byte_order_mark_is_ignored() {
        let auto = parse("\u{feff}1,0\n0,1\n", HeaderRow::Auto);
        assert!(auto.header.is_none());
        assert_eq!(auto.rater.segment_len(), 2);
        assert_eq!(codes(&auto, 0), vec![0]);

        let absent = parse("\u{feff}1,0\n0,1\n", HeaderRow::Absent);
        assert_eq!(codes(&absent, 0), vec![0]);
        assert_eq!(absent.coerced_cells, 0);

        let labelled = parse("\u{feff}anger,joy\n1,0\n", HeaderRow::Auto);
        assert_eq!(
            labelled.header,
            Some(vec!["anger".to_string(), "joy".to_string()])
        );
    }

    #[test]
    fn quoted_labels_keep_embedded_commas() {
        let table = parse("\"anger, rage\",joy\n0,1\n", HeaderRow::Auto);
        assert_eq!(
            table.header,
            Some(vec!["anger, rage".to_string(), "joy".to_string()])
        );
        assert_eq!(table.rater.segment_len(), 1);
        assert_eq!(codes(&table, 0), vec![1]);
    }

    #[test]
    fn split_cells_unescapes_doubled_quotes() {
        assert_eq!(
            split_cells(r#""say ""hi""", b ,"""#),
            vec!["say \"hi\"".to_string(), "b".to_string(), String::new()]
        );
        assert_eq!(split_cells("1,,0"), vec!["1", "", "0"]);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn column_code_rejects_indices_past_u32() {
        assert_eq!(column_code(7).expect("small column"), 7);
        assert!(column_code(usize::MAX).is_err());
    }

    #[test]
    fn load_raters_rejects_codes_past_header_width() {
        let dir = tempfile::tempdir().expect("tempdir");
        let first = dir.path().join("r1.csv");
        let second = dir.path().join("r2.csv");
        fs::write(&first, "a,b\n1,0\n").expect("write fixture");
        fs::write(&second, "1,0,1\n").expect("write fixture");

        let err = load_raters(&[first, second], HeaderRow::Auto)
            .expect_err("column 2 has no header label");
        let root = err
            .downcast_ref::<mezzich_kappa::KappaError>()
            .expect("kappa error should be preserved in the chain");
        assert_eq!(root.kind(), "malformed_code_set");
    }

    #[test]
    fn load_raters_records_hashes_and_labels() {
        let dir = tempfile::tempdir().expect("tempdir");
        let first = dir.path().join("r1.csv");
        let second = dir.path().join("r2.csv");
        fs::write(&first, "a,b\n1,0\n0,1\n").expect("write fixture");
        fs::write(&second, "1,1\n").expect("write fixture");

        let loaded = load_raters(&[first, second], HeaderRow::Auto).expect("tables load");
        assert_eq!(loaded.labels, Some(vec!["a".to_string(), "b".to_string()]));
        assert_eq!(loaded.dataset.segment_count(), 2);
        assert_eq!(loaded.inputs[0].sha256.len(), 64);
        assert_eq!(loaded.inputs[1].segment_count, 1);
        assert_eq!(loaded.inputs[1].coding_scheme_count, 1);
    }
}
