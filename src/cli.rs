use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "mezzich-kappa",
    version,
    about = "Mezzich's kappa for multi-rater, multi-code agreement"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute kappa from one code-presence table per rater.
    Compute(ComputeArgs),
    /// Load rater tables and log what they contain.
    Inspect(InspectArgs),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum HeaderRow {
    Auto,
    Present,
    Absent,
}

impl HeaderRow {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Present => "present",
            Self::Absent => "absent",
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct ComputeArgs {
    /// One CSV per rater; rows are segments, columns are codes.
    #[arg(required = true)]
    pub rater_paths: Vec<PathBuf>,

    #[arg(long, value_enum, default_value_t = HeaderRow::Auto)]
    pub header_row: HeaderRow,

    #[arg(long, default_value_t = 0.95)]
    pub confidence_level: f64,

    #[arg(long, default_value = "reports")]
    pub report_dir: PathBuf,

    #[arg(long)]
    pub report_path: Option<PathBuf>,

    #[arg(long)]
    pub json_path: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub json: bool,

    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    #[arg(required = true)]
    pub rater_paths: Vec<PathBuf>,

    #[arg(long, value_enum, default_value_t = HeaderRow::Auto)]
    pub header_row: HeaderRow,
}
