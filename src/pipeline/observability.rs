use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::ParseError;

use super::source::Source;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ParseSeverity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal).
    Warning,
    /// Error-level event (run failed).
    Error,
    /// Critical error (typically I/O failures).
    Critical,
}

/// Context about a parse run.
#[derive(Debug, Clone)]
pub struct ParseContext {
    /// What the run read from.
    pub source: SourceLabel,
}

/// Printable identification of a parse source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLabel {
    /// A file path.
    Path(PathBuf),
    /// In-memory text content.
    Text,
}

impl SourceLabel {
    pub(crate) fn for_source(source: &Source) -> Self {
        match source {
            Source::Path(p) => SourceLabel::Path(p.clone()),
            Source::Text(_) => SourceLabel::Text,
        }
    }
}

impl fmt::Display for SourceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceLabel::Path(p) => write!(f, "{}", p.display()),
            SourceLabel::Text => write!(f, "<in-memory text>"),
        }
    }
}

/// Minimal stats reported on a successful parse run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseStats {
    /// Number of physical lines read.
    pub lines: usize,
    /// Number of records in the result (after filtering).
    pub records: usize,
}

/// Observer interface for parse outcomes.
///
/// Implementors can record metrics, logs, or trigger alerts.
pub trait ParseObserver: Send + Sync {
    /// Called when a parse run succeeds.
    fn on_success(&self, _ctx: &ParseContext, _stats: ParseStats) {}

    /// Called when a parse run fails.
    fn on_failure(&self, _ctx: &ParseContext, _severity: ParseSeverity, _error: &ParseError) {}

    /// Called when a failure meets the alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &ParseContext, severity: ParseSeverity, error: &ParseError) {
        self.on_failure(ctx, severity, error)
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn ParseObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn ParseObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl ParseObserver for CompositeObserver {
    fn on_success(&self, ctx: &ParseContext, stats: ParseStats) {
        for o in &self.observers {
            o.on_success(ctx, stats);
        }
    }

    fn on_failure(&self, ctx: &ParseContext, severity: ParseSeverity, error: &ParseError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &ParseContext, severity: ParseSeverity, error: &ParseError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

/// Logs parse events to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl ParseObserver for StdErrObserver {
    fn on_success(&self, ctx: &ParseContext, stats: ParseStats) {
        eprintln!(
            "[parse][ok] source={} lines={} records={}",
            ctx.source, stats.lines, stats.records
        );
    }

    fn on_failure(&self, ctx: &ParseContext, severity: ParseSeverity, error: &ParseError) {
        eprintln!(
            "[parse][{:?}] source={} err={}",
            severity, ctx.source, error
        );
    }

    fn on_alert(&self, ctx: &ParseContext, severity: ParseSeverity, error: &ParseError) {
        eprintln!(
            "[ALERT][parse][{:?}] source={} err={}",
            severity, ctx.source, error
        );
    }
}

pub(crate) fn severity_for_error(e: &ParseError) -> ParseSeverity {
    match e {
        ParseError::Io(_) => ParseSeverity::Critical,
        ParseError::UnknownEncoding { .. } => ParseSeverity::Error,
        ParseError::Transform { .. } => ParseSeverity::Error,
    }
}
