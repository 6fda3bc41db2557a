use std::io::{BufRead, Seek, Write};
use std::path::Path;

use anyhow::{Context, Result};
use cmpcvf_core::compare::compare_function;
use cmpcvf_core::config::ReportConfig;
use cmpcvf_core::format::ReportWriter;
use cmpcvf_core::report::{build_index, ResultReport};

use crate::open_report;

/// Compare the reports at `path_a` and `path_b`, writing the report to `out`.
///
/// Report B is only opened once report A opened successfully. Nothing is
/// written if either open fails.
pub fn compare_command<W: Write>(
    path_a: &Path,
    path_b: &Path,
    config: &ReportConfig,
    out: W,
) -> Result<()> {
    let mut report_a = open_report(path_a, config.lookup)?;
    let mut report_b = open_report(path_b, config.lookup)?;

    compare_reports(&mut report_a, &mut report_b, config, out)
}

/// Run the full index → align → format pipeline over two open reports.
pub fn compare_reports<A, B, W>(
    report_a: &mut ResultReport<A>,
    report_b: &mut ResultReport<B>,
    config: &ReportConfig,
    out: W,
) -> Result<()>
where
    A: BufRead + Seek,
    B: BufRead + Seek,
    W: Write,
{
    let index = build_index(report_a)
        .with_context(|| format!("Failed to index functions in {}", report_a.name()))?;

    let mut writer = ReportWriter::new(out, config.clone());
    writer.banner().context("Failed to write report banner")?;

    for function in index.iter().filter(|f| config.selects(f)) {
        let events = compare_function(report_a, report_b, function)
            .with_context(|| format!("Failed to compare function `{function}`"))?;
        writer.events(&events).context("Failed to write report")?;
    }

    writer.finish().context("Failed to write report")?;
    Ok(())
}
