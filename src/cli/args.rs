//! Command-line arguments.

use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

/// Parse VERES .re1 motion transfer functions into tables and workbooks
#[derive(Parser, Debug, Clone)]
#[command(
    name = "re1-processor",
    version,
    about = "Parse VERES .re1 RAO files into tidy tables, xlsx workbooks and peak summaries"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Args {
    pub fn get_log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Print the header and speed blocks of a .re1 file
    Inspect(InspectArgs),
    /// Write the tidy table of one speed to CSV or Parquet
    Tidy(TidyArgs),
    /// Export headings to a formatted xlsx workbook
    Export(ExportArgs),
    /// Report peak amplitude per study and heading
    Peaks(PeaksArgs),
    /// Load every study under a folder
    Load(LoadArgs),
}

#[derive(ClapArgs, Debug, Clone)]
pub struct InspectArgs {
    /// Path to the .re1 file
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct TidyArgs {
    /// Path to the .re1 file
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Output table (.csv or .parquet); prints a preview when omitted
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Speed block to convert (zero-based)
    #[arg(short, long, default_value_t = 0)]
    pub speed: usize,

    /// Keep rotational amplitudes in rad/m
    #[arg(long)]
    pub rad_per_m: bool,

    /// Zero phases at negligible amplitude, as the VERES viewer does
    #[arg(long)]
    pub zero_phases: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ExportArgs {
    /// Path to the .re1 file
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Output workbook, defaults to `<stem>_rao.xlsx` next to the input
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Speed block to export (zero-based)
    #[arg(short, long, default_value_t = 0)]
    pub speed: usize,

    /// Heading indices to export (comma-separated, zero-based); all when omitted
    #[arg(long, value_delimiter = ',', value_name = "LIST")]
    pub headings: Option<Vec<usize>>,

    /// Prefix for sheet names (`<prefix>_H<heading>`)
    #[arg(long)]
    pub prefix: Option<String>,

    /// Keep the exact atan2 phase everywhere
    #[arg(long)]
    pub no_phase_zeroing: bool,

    /// Always report a zero surge phase
    #[arg(long)]
    pub force_surge_zero: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct PeaksArgs {
    /// A .re1 file or a folder of studies
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Degree of freedom to analyse
    #[arg(long, default_value = "Roll")]
    pub dof: String,

    /// Only this heading [deg]; all headings when omitted
    #[arg(long)]
    pub heading: Option<f64>,

    /// Lower bound of the period window [s]
    #[arg(long, requires = "max_period")]
    pub min_period: Option<f64>,

    /// Upper bound of the period window [s]
    #[arg(long, requires = "min_period")]
    pub max_period: Option<f64>,

    /// Apply the three-point smoother before peak finding
    #[arg(long)]
    pub smooth: bool,

    /// Number of files parsed concurrently
    #[arg(short, long)]
    pub workers: Option<usize>,
}

impl PeaksArgs {
    pub fn window(&self) -> Option<(f64, f64)> {
        self.min_period.zip(self.max_period)
    }
}

#[derive(ClapArgs, Debug, Clone)]
pub struct LoadArgs {
    /// Folder with one run per subfolder, or a parameter study folder
    #[arg(value_name = "DIR")]
    pub folder: PathBuf,

    /// Combined tidy table for all studies (.csv or .parquet)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Speed block used for every study (zero-based)
    #[arg(short, long, default_value_t = 0)]
    pub speed: usize,

    /// Number of files parsed concurrently
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,
}
