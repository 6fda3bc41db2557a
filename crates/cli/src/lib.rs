use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Result;
use cmpcvf_core::report::{LookupMode, ResultReport};
use tracing_subscriber::EnvFilter;

pub mod commands;

/// Install the stderr log subscriber. `RUST_LOG` overrides the default `warn` level.
///
/// Logs never go to stdout, which carries the report itself.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Open a report file for comparison.
pub fn open_report(path: &Path, mode: LookupMode) -> Result<ResultReport<BufReader<File>>> {
    Ok(ResultReport::open(path)?.with_lookup_mode(mode))
}
