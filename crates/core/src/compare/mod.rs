//! Aligning function blocks from two reports and diffing their rows.
//!
//! Every per-function failure is turned into a [`Warning`] so one malformed
//! or missing entry never stops the remaining functions from being compared.
//! Only read errors on the reports themselves are propagated.

use std::io::{BufRead, Seek};

use thiserror::Error;

use crate::model::{ComparisonRow, FunctionBlock, FunctionName};
use crate::report::{BlockError, ReportError, ResultReport};

/// A recoverable, per-function problem reported inline with the results.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Warning {
    #[error("failed to locate function `{function}` in file {report}")]
    NotFound { function: FunctionName, report: String },

    #[error("failed to read result block for function `{function}` in file {report}: {source}")]
    MalformedBlock {
        function: FunctionName,
        report: String,
        #[source]
        source: BlockError,
    },

    #[error("failed to resolve diffs for function `{function}`")]
    UnresolvedDiffs { function: FunctionName },

    #[error("row counts differ for function `{function}` (A: {rows_a}, B: {rows_b})")]
    RowCountMismatch { function: FunctionName, rows_a: usize, rows_b: usize },

    #[error("result values do not match for function `{function}` (`{label_a}` vs `{label_b}`)")]
    ValueMismatch { function: FunctionName, label_a: String, label_b: String },
}

/// One unit of report output, in the order it was produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportEvent {
    Warning(Warning),
    /// Start of a function section.
    Function(FunctionName),
    Row(ComparisonRow),
}

impl From<Warning> for ReportEvent {
    fn from(warning: Warning) -> Self {
        Self::Warning(warning)
    }
}

/// Compare the blocks of `function` in both reports.
pub fn compare_function<A, B>(
    report_a: &mut ResultReport<A>,
    report_b: &mut ResultReport<B>,
    function: &FunctionName,
) -> Result<Vec<ReportEvent>, ReportError>
where
    A: BufRead + Seek,
    B: BufRead + Seek,
{
    let mut events = Vec::new();

    let found_a = report_a.locate(function)?;
    let found_b = report_b.locate(function)?;
    if !found_a {
        events.push(not_found(function, report_a.name()));
    }
    if !found_b {
        events.push(not_found(function, report_b.name()));
    }
    if !(found_a && found_b) {
        return Ok(events);
    }

    let Some(block_a) = extract_or_warn(report_a, function, &mut events)? else {
        return Ok(events);
    };
    let Some(block_b) = extract_or_warn(report_b, function, &mut events)? else {
        return Ok(events);
    };

    let (rows_a, rows_b) = match (block_a.resolve(), block_b.resolve()) {
        (Ok(a), Ok(b)) => (a, b),
        (Err(e), _) | (_, Err(e)) => {
            tracing::debug!(function = %function, error = %e, "diff resolution failed");
            events.push(Warning::UnresolvedDiffs { function: function.clone() }.into());
            return Ok(events);
        }
    };

    if rows_a.len() != rows_b.len() {
        events.push(
            Warning::RowCountMismatch {
                function: function.clone(),
                rows_a: rows_a.len(),
                rows_b: rows_b.len(),
            }
            .into(),
        );
        // Every row of A needs a partner; surplus rows in B are ignored.
        if rows_b.len() < rows_a.len() {
            return Ok(events);
        }
    }
    if rows_a.is_empty() || rows_b.is_empty() {
        return Ok(events);
    }

    events.push(ReportEvent::Function(function.clone()));
    for (a, b) in rows_a.iter().zip(&rows_b) {
        if a.label == b.label {
            events.push(ReportEvent::Row(ComparisonRow::from_pair(a, b)));
        } else {
            events.push(
                Warning::ValueMismatch {
                    function: function.clone(),
                    label_a: a.label.clone(),
                    label_b: b.label.clone(),
                }
                .into(),
            );
        }
    }

    Ok(events)
}

fn not_found(function: &FunctionName, report: &str) -> ReportEvent {
    Warning::NotFound { function: function.clone(), report: report.to_string() }.into()
}

/// Extract the located block, turning a layout error into a warning.
fn extract_or_warn<R: BufRead + Seek>(
    report: &mut ResultReport<R>,
    function: &FunctionName,
    events: &mut Vec<ReportEvent>,
) -> Result<Option<FunctionBlock>, ReportError> {
    match report.extract_block() {
        Ok(block) => Ok(Some(block)),
        Err(ReportError::Block(source)) => {
            events.push(
                Warning::MalformedBlock {
                    function: function.clone(),
                    report: report.name().to_string(),
                    source,
                }
                .into(),
            );
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
