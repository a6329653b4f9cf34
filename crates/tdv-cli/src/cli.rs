//! Command-line arguments for `tdv`.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::builder::RangedU64ValueParser;
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use tdv_export::ChartFailure;
use tdv_model::ExportFormat;
use tdv_screens::Screen;

#[derive(Parser)]
#[command(
    name = "tdv",
    version,
    about = "Search, filter, page and export the quality assurance dashboard tables",
    long_about = "Search, filter, page and export the quality assurance dashboard tables.\n\n\
                  Each screen ships with sample data; pass --input to work on your own \
                  JSON records instead."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(long = "log-format", value_enum, default_value = "pretty", global = true)]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Settings file (default: settings.toml in the platform config directory).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the available screens.
    Screens,

    /// Print one page of a screen's filtered records.
    List(ListArgs),

    /// Export a screen's filtered records to CSV or PDF.
    Export(ExportArgs),
}

/// Which records to load and how to filter them.
#[derive(Args)]
pub struct ViewArgs {
    /// Screen to open (users, feedback, trainers, assessments, audit, standards, evidence).
    #[arg(long = "screen", short = 's', value_name = "SCREEN")]
    pub screen: Screen,

    /// JSON array of records to use instead of the bundled sample data ("-" for stdin).
    #[arg(long = "input", short = 'i', value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Case-insensitive search across the screen's search fields.
    #[arg(long = "search", value_name = "TERM", default_value = "")]
    pub search: String,

    /// Exact field filter, repeatable (e.g. --filter status=active).
    #[arg(long = "filter", value_name = "FIELD=VALUE", value_parser = parse_filter)]
    pub filters: Vec<(String, String)>,

    /// First day of the date range (inclusive, YYYY-MM-DD).
    #[arg(long = "from", value_name = "DATE")]
    pub from: Option<NaiveDate>,

    /// Last day of the date range (inclusive, YYYY-MM-DD).
    #[arg(long = "to", value_name = "DATE")]
    pub to: Option<NaiveDate>,
}

#[derive(Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub view: ViewArgs,

    /// Page to show, starting at 1.
    #[arg(long = "page", short = 'p', default_value_t = 1, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    pub page: usize,

    /// Rows per page (default: the screen's page size or the settings file).
    #[arg(long = "page-size", value_name = "ROWS", value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    pub page_size: Option<usize>,
}

#[derive(Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub view: ViewArgs,

    /// Artifact format.
    #[arg(long = "format", short = 'f', value_enum, default_value = "csv")]
    pub format: ExportFormatArg,

    /// Directory the artifact is written to (default: settings file, then ".").
    #[arg(long = "output-dir", short = 'o', value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Base filename (default: the screen's export label).
    #[arg(long = "label", value_name = "LABEL")]
    pub label: Option<String>,

    /// PDF document title (default: the label).
    #[arg(long = "title", value_name = "TITLE")]
    pub title: Option<String>,

    /// Chart image (PNG) to place above the tables in a PDF, repeatable.
    #[arg(long = "chart", value_name = "PNG")]
    pub charts: Vec<PathBuf>,

    /// Fail the export when a chart cannot be read instead of leaving it out.
    #[arg(long = "strict-charts")]
    pub strict_charts: bool,

    /// Append the export date to the filename (overrides the screen default).
    #[arg(long = "date-suffix", conflicts_with = "no_date_suffix")]
    pub date_suffix: bool,

    /// Never append the export date to the filename.
    #[arg(long = "no-date-suffix")]
    pub no_date_suffix: bool,
}

impl ExportArgs {
    pub fn date_suffix(&self) -> Option<bool> {
        if self.date_suffix {
            Some(true)
        } else if self.no_date_suffix {
            Some(false)
        } else {
            None
        }
    }

    pub fn chart_failure(&self) -> ChartFailure {
        if self.strict_charts {
            ChartFailure::Abort
        } else {
            ChartFailure::Skip
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ExportFormatArg {
    Csv,
    Pdf,
}

impl From<ExportFormatArg> for ExportFormat {
    fn from(value: ExportFormatArg) -> Self {
        match value {
            ExportFormatArg::Csv => ExportFormat::Csv,
            ExportFormatArg::Pdf => ExportFormat::Pdf,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

fn parse_filter(input: &str) -> Result<(String, String), String> {
    let (field, value) = input
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got {input:?}"))?;
    let field = field.trim();
    if field.is_empty() {
        return Err(format!("missing field name in {input:?}"));
    }
    Ok((field.to_string(), value.to_string()))
}
