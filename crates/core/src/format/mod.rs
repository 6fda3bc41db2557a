//! Plain-text comparison report.
//!
//! Layout:
//!
//! ```text
//! ---------------------------------------------------------------------------
//! Analysis of test results for libiers10++
//! Generated by cmpcvf
//! Comparison of C++ and FOR results per function
//! ARGUMENT     TEST-C++  TEST-FOR  C++-FOR
//! ========== : ========= ========= =========
//! Function pmsdnut2
//! pm(1)      : 1.329e-07 1.329e-07 0.000e+00      microarcseconds
//! ## failed to locate function `fundarg` in file for.out
//! ---------------------------------------------------------------------------
//! ```

use std::io::{self, Write};

use crate::compare::ReportEvent;
use crate::config::ReportConfig;
use crate::model::ComparisonRow;

const RULE: &str = "---------------------------------------------------------------------------";
const COLUMN_RULE: &str = "========== : ========= ========= =========";
const WARNING_PREFIX: &str = "##";

/// Width of the argument label column.
pub const LABEL_WIDTH: usize = 10;
/// Width of the (right-aligned) unit column.
pub const UNIT_WIDTH: usize = 20;

/// Writes the report to any `Write` sink, one event at a time.
pub struct ReportWriter<W: Write> {
    out: W,
    config: ReportConfig,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(out: W, config: ReportConfig) -> Self {
        Self { out, config }
    }

    /// Title lines, column header and column rule.
    pub fn banner(&mut self) -> io::Result<()> {
        let a = &self.config.label_a;
        let b = &self.config.label_b;
        writeln!(self.out, "{RULE}")?;
        match &self.config.title {
            Some(title) => writeln!(self.out, "Analysis of test results for {title}")?,
            None => writeln!(self.out, "Analysis of test results")?,
        }
        writeln!(self.out, "Generated by cmpcvf")?;
        writeln!(self.out, "Comparison of {a} and {b} results per function")?;
        writeln!(
            self.out,
            "{:<13}{:<10}{:<10}{}",
            "ARGUMENT",
            format!("TEST-{a}"),
            format!("TEST-{b}"),
            format!("{a}-{b}")
        )?;
        writeln!(self.out, "{COLUMN_RULE}")
    }

    pub fn event(&mut self, event: &ReportEvent) -> io::Result<()> {
        match event {
            ReportEvent::Warning(warning) => writeln!(self.out, "{WARNING_PREFIX} {warning}"),
            ReportEvent::Function(name) => writeln!(self.out, "Function {name}"),
            ReportEvent::Row(row) => writeln!(self.out, "{}", format_row(row)),
        }
    }

    pub fn events<'a>(
        &mut self,
        events: impl IntoIterator<Item = &'a ReportEvent>,
    ) -> io::Result<()> {
        for event in events {
            self.event(event)?;
        }
        Ok(())
    }

    /// Closing rule. Flushes the sink.
    pub fn finish(&mut self) -> io::Result<()> {
        writeln!(self.out, "{RULE}")?;
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// One comparison line: label, both diffs, their absolute difference, unit.
pub fn format_row(row: &ComparisonRow) -> String {
    format!(
        "{:<LABEL_WIDTH$} : {} {} {} {:>UNIT_WIDTH$}",
        row.label,
        format_sci(row.diff_a),
        format_sci(row.diff_b),
        format_sci(row.abs_diff),
        row.unit
    )
}

/// Scientific notation with three decimals and a signed, at least two-digit
/// exponent (`1.500e-10`, `2.000e+00`), the way C's `%.3e` prints it.
pub fn format_sci(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let formatted = format!("{value:.3e}");
    let Some((mantissa, exponent)) = formatted.split_once('e') else {
        return formatted;
    };
    match exponent.parse::<i32>() {
        Ok(exp) => {
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{mantissa}e{sign}{:02}", exp.unsigned_abs())
        }
        Err(_) => formatted,
    }
}
