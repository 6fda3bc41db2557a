use std::io::{BufRead, Seek};
use std::sync::LazyLock;

use regex::Regex;

use crate::model::{FunctionIndex, FunctionName};
use crate::report::{ReportError, ResultReport};

static RE_FUNCTION_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*Function\s").expect("static header pattern is valid"));

/// Function name on a header line, or `None` if the line is not a header.
///
/// All tokens after the word `Function` are rejoined with single spaces, so
/// a signature like `foo(int, int)` survives as one name.
pub fn parse_header_name(line: &str) -> Option<FunctionName> {
    if !RE_FUNCTION_HEADER.is_match(line) {
        return None;
    }
    let tokens: Vec<&str> = line.split_whitespace().skip(1).collect();
    if tokens.is_empty() {
        return None;
    }
    Some(FunctionName::new(tokens.join(" ")))
}

/// Scan `report` once and list every function it contains, in order.
///
/// The report is rewound before and after the scan.
pub fn build_index<R: BufRead + Seek>(
    report: &mut ResultReport<R>,
) -> Result<FunctionIndex, ReportError> {
    report.rewind()?;
    let mut index = FunctionIndex::new();
    while let Some(line) = report.next_line()? {
        if let Some(name) = parse_header_name(&line) {
            index.push(name);
        }
    }
    report.rewind()?;
    tracing::debug!(report = report.name(), functions = index.len(), "built function index");
    Ok(index)
}
