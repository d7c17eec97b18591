//! Operator-facing report lines
//!
//! One line per file that was converted or left alone for lack of confidence:
//!
//! ```text
//! windows-1252 97.5% src/Legacy.cs
//! low confidence: shift_jis 40% src/Notes.cs
//! ```

use std::fmt;
use std::io::{self, Write};
use std::path::PathBuf;

use crate::label::CanonicalLabel;

/// Prefix distinguishing low-confidence lines
pub const LOW_CONFIDENCE_PREFIX: &str = "low confidence: ";

/// Which kind of report a file produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    /// Detected but below the confidence floor; file left untouched
    LowConfidence,
    /// Converted (or would be, in a dry run)
    Converted,
}

/// A single report line
#[derive(Debug, Clone, PartialEq)]
pub struct ReportEntry {
    pub kind: ReportKind,
    pub label: CanonicalLabel,
    pub confidence: f64,
    pub path: PathBuf,
}

impl fmt::Display for ReportEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kind == ReportKind::LowConfidence {
            f.write_str(LOW_CONFIDENCE_PREFIX)?;
        }
        write!(
            f,
            "{} {}% {}",
            self.label,
            format_percent(self.confidence),
            self.path.display()
        )
    }
}

/// Format a `[0, 1]` confidence as a percentage with at most two decimals
///
/// Trailing zeros are dropped: `0.4` → `40`, `0.125` → `12.5`.
pub fn format_percent(confidence: f64) -> String {
    let rounded = (confidence * 100.0 * 100.0).round() / 100.0;
    let text = format!("{:.2}", rounded);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Destination for report lines
pub trait ReportSink {
    fn report(&mut self, entry: &ReportEntry) -> io::Result<()>;
}

/// Collects entries in memory
impl ReportSink for Vec<ReportEntry> {
    fn report(&mut self, entry: &ReportEntry) -> io::Result<()> {
        self.push(entry.clone());
        Ok(())
    }
}

/// Writes one line per entry to any writer
pub struct WriterSink<W: Write> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ReportSink for WriterSink<W> {
    fn report(&mut self, entry: &ReportEntry) -> io::Result<()> {
        writeln!(self.writer, "{}", entry)
    }
}
