//! Core data model for harness result reports.
//!
//! A report is a sequence of function blocks. Each block carries a group
//! unit and a list of result rows; a row names one argument (its label) and
//! the difference metric the harness computed for it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Name of a function under test, as it appears after `Function` in a report.
///
/// Names may contain internal spaces and literal parentheses (full call
/// signatures). Surrounding whitespace is never significant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunctionName(String);

impl FunctionName {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(name.as_ref().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whitespace-separated tokens of the name.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.0.split_whitespace()
    }
}

impl fmt::Display for FunctionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Function names in order of first appearance in the reference report.
///
/// Duplicates are preserved: a name listed twice is compared twice.
pub type FunctionIndex = Vec<FunctionName>;

/// One result row as read from a report, before its diff is parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    pub label: String,
    pub diff_text: String,
    pub unit: String,
}

/// Rows of one function block, extracted from one report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionBlock {
    /// Unit declared for the whole block; rows may override it.
    pub group_unit: String,
    pub rows: Vec<RawRow>,
}

impl FunctionBlock {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn units(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.unit.as_str()).collect()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.label.as_str()).collect()
    }

    pub fn diffs(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.diff_text.as_str()).collect()
    }

    /// Parse every diff to `f64`. Fails on the first non-numeric diff.
    pub fn resolve(&self) -> Result<Vec<ResultRow>, DiffParseError> {
        self.rows
            .iter()
            .map(|row| {
                Ok(ResultRow {
                    label: row.label.clone(),
                    diff: parse_diff(&row.diff_text)?,
                    unit: row.unit.clone(),
                })
            })
            .collect()
    }
}

/// A result row with its difference value resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    pub label: String,
    pub diff: f64,
    pub unit: String,
}

/// Paired rows from both reports for the same argument label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub label: String,
    pub diff_a: f64,
    pub diff_b: f64,
    pub abs_diff: f64,
    pub unit: String,
}

impl ComparisonRow {
    /// Build a row from two aligned results. The unit is taken from `a`.
    pub fn from_pair(a: &ResultRow, b: &ResultRow) -> Self {
        Self {
            label: a.label.clone(),
            diff_a: a.diff,
            diff_b: b.diff,
            abs_diff: (a.diff - b.diff).abs(),
            unit: a.unit.clone(),
        }
    }
}

/// A diff value that is not numeric text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid difference value '{text}'")]
pub struct DiffParseError {
    pub text: String,
}

/// Parse a reported difference value.
///
/// Accepts the usual float syntax plus Fortran double-precision exponents
/// (`1.5D-10`), which some harnesses print verbatim.
pub fn parse_diff(text: &str) -> Result<f64, DiffParseError> {
    let trimmed = text.trim();
    let normalized = trimmed.replace(['D', 'd'], "e");
    normalized.parse::<f64>().map_err(|_| DiffParseError { text: trimmed.to_string() })
}
