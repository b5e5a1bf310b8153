//! Collects findings line by line and turns them into a verdict.
//!
//! A [`LogCounter`] lives for exactly one file. Findings for the current
//! line are buffered until [`LogCounter::flush`] is called with that line's
//! number and text. Categories can be suppressed part way through a file;
//! suppressed findings are dropped before they are counted.

use std::collections::HashSet;
use std::fmt;

use tracing::debug;

use crate::category::DiagnosticCategory;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

impl Severity {
    fn prefix(self) -> &'static str {
        match self {
            Severity::Warning => "W",
            Severity::Error => "E",
        }
    }
}

/// One message about one line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Finding {
    pub category: DiagnosticCategory,
    pub severity: Severity,
    pub message: String,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.category, self.message)
    }
}

/// The findings for one line, in the order they were raised.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineReport {
    pub line_no: usize,
    pub line: String,
    pub findings: Vec<Finding>,
}

impl LineReport {
    pub fn has_errors(&self) -> bool {
        self.findings.iter().any(|f| f.severity == Severity::Error)
    }

    fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.severity == severity)
    }
}

impl fmt::Display for LineReport {
    /// Errors are listed before warnings, indented under the line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header = if self.has_errors() { "E" } else { "W" };
        writeln!(f, "{}: {}: {}", header, self.line_no, self.line)?;

        let pad = " ".repeat(self.line_no.to_string().len());
        for finding in self.with_severity(Severity::Error) {
            writeln!(f, "e: {}  {}", pad, finding)?;
        }
        for finding in self.with_severity(Severity::Warning) {
            writeln!(f, "w: {}  {}", pad, finding)?;
        }
        Ok(())
    }
}

/// Output in the order it was produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Entry {
    /// File-level message not tied to a line.
    Notice { severity: Severity, message: String },
    Line(LineReport),
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Notice { severity, message } => {
                writeln!(f, "{}: {}", severity.prefix(), message)
            }
            Entry::Line(report) => fmt::Display::fmt(report, f),
        }
    }
}

/// Overall result of checking a file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verdict {
    Clean = 0,
    Warnings = 1,
    Errors = 2,
}

impl Verdict {
    pub fn from_counts(error_count: usize, warn_count: usize) -> Verdict {
        if error_count > 0 {
            Verdict::Errors
        } else if warn_count > 0 {
            Verdict::Warnings
        } else {
            Verdict::Clean
        }
    }

    /// Process exit code: 0 clean, 1 warnings only, 2 errors.
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Per-file diagnostics state.
#[derive(Debug, Default)]
pub struct LogCounter {
    error_count: usize,
    warn_count: usize,
    suppressed: HashSet<DiagnosticCategory>,
    pending: Vec<Finding>,
    entries: Vec<Entry>,
}

impl LogCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stops recording `category` until [`unsuppress`](Self::unsuppress).
    pub fn suppress(&mut self, category: DiagnosticCategory) {
        if self.suppressed.insert(category) {
            debug!(%category, "suppressing message category");
        }
    }

    pub fn unsuppress(&mut self, category: DiagnosticCategory) {
        if self.suppressed.remove(&category) {
            debug!(%category, "re-enabling message category");
        }
    }

    pub fn is_suppressed(&self, category: DiagnosticCategory) -> bool {
        self.suppressed.contains(&category)
    }

    /// Buffers an error for the current line.
    pub fn line_error(&mut self, category: DiagnosticCategory, message: impl Into<String>) {
        self.record(category, Severity::Error, message.into());
    }

    /// Buffers a warning for the current line.
    pub fn line_warn(&mut self, category: DiagnosticCategory, message: impl Into<String>) {
        self.record(category, Severity::Warning, message.into());
    }

    fn record(&mut self, category: DiagnosticCategory, severity: Severity, message: String) {
        if self.is_suppressed(category) {
            return;
        }
        match severity {
            Severity::Error => self.error_count += 1,
            Severity::Warning => self.warn_count += 1,
        }
        self.pending.push(Finding {
            category,
            severity,
            message,
        });
    }

    /// Records a file-level error immediately, bypassing the line buffer.
    pub fn error(&mut self, message: impl Into<String>) {
        self.notice(Severity::Error, message.into());
    }

    /// Records a file-level warning immediately, bypassing the line buffer.
    pub fn warn(&mut self, message: impl Into<String>) {
        self.notice(Severity::Warning, message.into());
    }

    fn notice(&mut self, severity: Severity, message: String) {
        match severity {
            Severity::Error => self.error_count += 1,
            Severity::Warning => self.warn_count += 1,
        }
        self.entries.push(Entry::Notice { severity, message });
    }

    /// Attaches the buffered findings to a line and clears the buffer.
    ///
    /// Lines without findings leave no entry.
    pub fn flush(&mut self, line_no: usize, line: &str) {
        if self.pending.is_empty() {
            return;
        }
        let findings = std::mem::take(&mut self.pending);
        self.entries.push(Entry::Line(LineReport {
            line_no,
            line: line.to_string(),
            findings,
        }));
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn warn_count(&self) -> usize {
        self.warn_count
    }

    pub fn verdict(&self) -> Verdict {
        Verdict::from_counts(self.error_count, self.warn_count)
    }

    pub fn into_report(self) -> Report {
        Report {
            entries: self.entries,
            error_count: self.error_count,
            warn_count: self.warn_count,
        }
    }
}

/// Finished result of checking one file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report {
    pub entries: Vec<Entry>,
    pub error_count: usize,
    pub warn_count: usize,
}

impl Report {
    pub fn verdict(&self) -> Verdict {
        Verdict::from_counts(self.error_count, self.warn_count)
    }

    pub fn lines(&self) -> impl Iterator<Item = &LineReport> {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Line(report) => Some(report),
            Entry::Notice { .. } => None,
        })
    }

    /// All line findings, in file order.
    pub fn findings(&self) -> impl Iterator<Item = &Finding> {
        self.lines().flat_map(|report| report.findings.iter())
    }

    pub fn count(&self, category: DiagnosticCategory) -> usize {
        self.findings().filter(|f| f.category == category).count()
    }
}

impl fmt::Display for Report {
    /// Renders every entry followed by a summary line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            write!(f, "{}", entry)?;
        }
        match self.verdict() {
            Verdict::Errors => writeln!(
                f,
                "E: There were {} errors and {} warnings.",
                self.error_count, self.warn_count
            ),
            Verdict::Warnings => writeln!(f, "W: There were {} warnings.", self.warn_count),
            Verdict::Clean => Ok(()),
        }
    }
}
