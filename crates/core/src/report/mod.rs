//! Report reader: locating function blocks and extracting result rows.
//!
//! A report looks like:
//!
//! ```text
//!  Function iers2010::pmsdnut2(double,double[])
//!  Abs. differences in microarcseconds:
//!  |pm(1)|  = 0.000000132875289438
//!  |pm(2)|  = 0.000000444179713455 (mas)
//! ```
//!
//! Each [`ResultReport`] owns its own read cursor; nothing is shared between
//! the two reports being compared.

pub mod index;

pub use index::{build_index, parse_header_name};

use std::fs::File;
use std::io::{self, BufRead, BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{FunctionBlock, FunctionName, RawRow};

/// Marker that starts every result row.
const ROW_MARKER: char = '|';

/// How `locate` positions itself before scanning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupMode {
    /// Always scan from the top of the report.
    #[default]
    Rewind,
    /// Scan forward from the current cursor, wrapping once to the top.
    Resume,
}

/// Error type for report operations.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to open report file {}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("I/O error while reading report: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid function header pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error(transparent)]
    Block(#[from] BlockError),
}

/// A function block whose layout cannot be read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockError {
    #[error("report ends before the unit line")]
    MissingUnitLine,

    #[error("unit line is empty")]
    EmptyUnitLine,

    #[error("unit line '{line}' has no unit before ':'")]
    MissingUnit { line: String },

    #[error("result row '{line}' has no difference value")]
    MalformedRow { line: String },
}

/// A harness result report with an explicit read cursor.
#[derive(Debug)]
pub struct ResultReport<R> {
    name: String,
    reader: R,
    mode: LookupMode,
    /// Last located header line; carries the unit when no unit line follows.
    header_line: String,
}

impl ResultReport<BufReader<File>> {
    /// Open a report file. The report is named after its path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ReportError> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|source| ReportError::Open { path: path.to_path_buf(), source })?;
        Ok(Self::new(path.display().to_string(), BufReader::new(file)))
    }
}

impl<R: BufRead + Seek> ResultReport<R> {
    pub fn new(name: impl Into<String>, reader: R) -> Self {
        Self {
            name: name.into(),
            reader,
            mode: LookupMode::default(),
            header_line: String::new(),
        }
    }

    pub fn with_lookup_mode(mut self, mode: LookupMode) -> Self {
        self.mode = mode;
        self
    }

    /// Display name used in warnings (usually the file path).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lookup_mode(&self) -> LookupMode {
        self.mode
    }

    /// Move the cursor back to the start of the report.
    pub fn rewind(&mut self) -> io::Result<()> {
        self.reader.seek(SeekFrom::Start(0))?;
        Ok(())
    }

    /// Consume the report and hand back the underlying reader.
    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Read the next line without its terminator. `None` at end of stream.
    ///
    /// Bytes that are not UTF-8 (Latin-1 unit names, for instance) are
    /// replaced rather than rejected.
    pub(crate) fn next_line(&mut self) -> io::Result<Option<String>> {
        let mut buf = Vec::new();
        if self.reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(None);
        }
        let mut line = String::from_utf8_lossy(&buf).into_owned();
        let trimmed_len = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed_len);
        Ok(Some(line))
    }

    fn position(&mut self) -> io::Result<u64> {
        self.reader.stream_position()
    }

    /// Find the header line of `function`.
    ///
    /// On success the cursor is left on the line following the header. On
    /// failure in [`LookupMode::Rewind`] the report is exhausted.
    pub fn locate(&mut self, function: &FunctionName) -> Result<bool, ReportError> {
        let pattern = header_pattern(function)?;
        let found = match self.mode {
            LookupMode::Rewind => {
                self.rewind()?;
                self.scan_for(&pattern, None)?
            }
            LookupMode::Resume => {
                let start = self.position()?;
                if self.scan_for(&pattern, None)? {
                    true
                } else {
                    self.rewind()?;
                    self.scan_for(&pattern, Some(start))?
                }
            }
        };
        tracing::debug!(report = %self.name, function = %function, found, "function lookup");
        Ok(found)
    }

    /// Scan forward for a header matching `pattern`, stopping at `limit`
    /// (a stream offset) or end of stream.
    fn scan_for(&mut self, pattern: &Regex, limit: Option<u64>) -> Result<bool, ReportError> {
        loop {
            if let Some(limit) = limit {
                if self.position()? >= limit {
                    return Ok(false);
                }
            }
            let Some(line) = self.next_line()? else {
                return Ok(false);
            };
            if pattern.is_match(&line) {
                self.header_line = line;
                return Ok(true);
            }
        }
    }

    /// Extract the rows of the block whose header was just located.
    ///
    /// Must follow a successful [`ResultReport::locate`]. The line that ends
    /// the block is left unread.
    pub fn extract_block(&mut self) -> Result<FunctionBlock, ReportError> {
        let Some(first) = self.next_line()? else {
            return Err(BlockError::MissingUnitLine.into());
        };

        let mut rows = Vec::new();
        let group_unit = if is_row(&first) {
            // No unit line: the header itself ends with the unit.
            let unit = parse_group_unit(&self.header_line)?;
            rows.push(parse_row(&first, &unit)?);
            unit
        } else {
            parse_group_unit(&first)?
        };

        loop {
            let pos = self.position()?;
            let Some(line) = self.next_line()? else {
                break;
            };
            if !is_row(&line) {
                self.reader.seek(SeekFrom::Start(pos))?;
                break;
            }
            let row = parse_row(&line, &group_unit)?;
            tracing::trace!(label = %row.label, diff = %row.diff_text, unit = %row.unit, "row");
            rows.push(row);
        }

        Ok(FunctionBlock { group_unit, rows })
    }
}

/// Regex matching the header line of `function`.
///
/// Every token of the name is escaped, so signatures such as
/// `foo(int,int)` match literally. The name must end at whitespace or end of
/// line: `foo` does not match a `Function foobar` header.
pub fn header_pattern(function: &FunctionName) -> Result<Regex, regex::Error> {
    let name = function.tokens().map(regex::escape).collect::<Vec<_>>().join(r"\s+");
    Regex::new(&format!(r"^\s*Function\s+{name}(?:\s|$)"))
}

fn is_row(line: &str) -> bool {
    line.trim_start().starts_with(ROW_MARKER)
}

/// Unit declared on a block's unit line.
///
/// The unit is the last token with any `:` removed, or the second-to-last
/// token when the last one is a bare `:`.
pub fn parse_group_unit(line: &str) -> Result<String, BlockError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let unit = match tokens.as_slice() {
        [] => return Err(BlockError::EmptyUnitLine),
        [":"] => return Err(BlockError::MissingUnit { line: line.trim().to_string() }),
        [.., unit, ":"] => unit,
        [.., unit] => unit,
    };
    Ok(unit.replace(':', ""))
}

/// Parse one `| <label> | = <diff> [(<unit>)]` row.
pub fn parse_row(line: &str, group_unit: &str) -> Result<RawRow, BlockError> {
    let body = line.trim_start();
    let bars_stripped = body.trim_start_matches(ROW_MARKER);
    let (label, rest): (String, Vec<&str>) = match bars_stripped.split_once(ROW_MARKER) {
        Some((label, rest)) => (label.trim().to_string(), rest.split_whitespace().collect()),
        None => {
            let mut tokens = bars_stripped.split_whitespace();
            let label = tokens.next().unwrap_or_default().replace(ROW_MARKER, "");
            (label, tokens.collect())
        }
    };

    let diff_text = match rest.get(1) {
        Some(diff) => diff.to_string(),
        None => return Err(BlockError::MalformedRow { line: body.trim_end().to_string() }),
    };
    let unit = rest
        .get(2)
        .map(|u| u.replace(['(', ')'], ""))
        .unwrap_or_else(|| group_unit.to_string());

    Ok(RawRow { label, diff_text, unit })
}
