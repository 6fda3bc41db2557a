use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use cmpcvf::commands::compare_command;
use cmpcvf::init_tracing;
use cmpcvf_core::config::{load_report_config, ReportConfig};
use cmpcvf_core::report::LookupMode;

/// Compare the result reports of two numerical test harnesses, function by function.
///
/// This CLI is a thin wrapper around `cmpcvf-core` (exposed in code as `cmpcvf_core`).
/// The report goes to stdout; logs (see `RUST_LOG`) go to stderr.
#[derive(Parser, Debug)]
#[command(
    name = "cmpcvf",
    version,
    about = "Compare per-function results reported by two test harnesses",
    long_about = None
)]
struct Cli {
    /// Reference report. Its functions, in order, drive the comparison.
    report_a: PathBuf,

    /// Report to compare against the reference.
    report_b: PathBuf,

    /// JSON config file with report settings. Flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Library or suite name shown in the banner.
    #[arg(long)]
    title: Option<String>,

    /// Short name of the harness behind REPORT_A (e.g., C++).
    #[arg(long)]
    label_a: Option<String>,

    /// Short name of the harness behind REPORT_B (e.g., FOR).
    #[arg(long)]
    label_b: Option<String>,

    /// How function headers are searched for.
    #[arg(long, value_enum)]
    lookup: Option<LookupArg>,

    /// Only compare this function (repeatable).
    #[arg(long = "only", value_name = "FUNCTION")]
    only: Vec<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum LookupArg {
    /// Search every report from the top for each function.
    Rewind,
    /// Continue from where the previous lookup stopped; repeated names match successive blocks.
    Resume,
}

impl From<LookupArg> for LookupMode {
    fn from(arg: LookupArg) -> Self {
        match arg {
            LookupArg::Rewind => LookupMode::Rewind,
            LookupArg::Resume => LookupMode::Resume,
        }
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    let stdout = io::stdout();
    compare_command(&cli.report_a, &cli.report_b, &config, stdout.lock())
}

/// Load the config file (if any) and apply flag overrides.
fn resolve_config(cli: &Cli) -> Result<ReportConfig> {
    let mut config = match &cli.config {
        Some(path) => load_report_config(path)?,
        None => ReportConfig::default(),
    };

    if let Some(title) = &cli.title {
        config.title = Some(title.clone());
    }
    if let Some(label) = &cli.label_a {
        config.label_a = label.clone();
    }
    if let Some(label) = &cli.label_b {
        config.label_b = label.clone();
    }
    if let Some(lookup) = cli.lookup {
        config.lookup = lookup.into();
    }
    if !cli.only.is_empty() {
        config.only = cli.only.clone();
    }

    Ok(config)
}
