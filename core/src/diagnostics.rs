//! Recoverable conditions raised while indexing or querying.
//!
//! Nothing in the engine prints. Each condition is handed to a [`DiagnosticSink`]
//! and the caller decides whether to log, collect, or display it.

use parking_lot::Mutex;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Diagnostic {
    #[error("skipping document {name:?}: {reason}")]
    DocumentSkipped { name: String, reason: String },

    #[error("stop list {path:?} could not be read, indexing without stop words: {reason}")]
    StopListUnreadable { path: PathBuf, reason: String },

    #[error("word {term:?} not found in the index")]
    TermNotFound { term: String },

    #[error("ignoring invalid query line {line_no}: {line:?}")]
    MalformedQueryLine { line_no: usize, line: String },

    #[error("invalid weight {raw:?} for word {term:?} on line {line_no}, using default weight {default}")]
    WeightSubstituted { line_no: usize, term: String, raw: String, default: f64 },

    #[error("error reading query file {path:?}: {reason}")]
    QuerySourceUnreadable { path: PathBuf, reason: String },
}

/// Receiver for [`Diagnostic`]s.
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, diagnostic: Diagnostic);
}

impl<F> DiagnosticSink for F
where
    F: Fn(&Diagnostic) + Send + Sync,
{
    fn report(&self, diagnostic: Diagnostic) {
        self(&diagnostic)
    }
}

/// Forwards every diagnostic to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, diagnostic: Diagnostic) {
        match &diagnostic {
            Diagnostic::TermNotFound { term } => tracing::info!(term = %term, "{diagnostic}"),
            _ => tracing::warn!("{diagnostic}"),
        }
    }
}

pub(crate) static TRACING_SINK: TracingSink = TracingSink;

/// Keeps every reported diagnostic in arrival order.
#[derive(Debug, Default)]
pub struct CollectingSink {
    seen: Mutex<Vec<Diagnostic>>,
}

impl CollectingSink {
    pub fn new() -> Self { Self::default() }

    pub fn len(&self) -> usize { self.seen.lock().len() }

    pub fn is_empty(&self) -> bool { self.seen.lock().is_empty() }

    /// Snapshot of what has been reported so far.
    pub fn diagnostics(&self) -> Vec<Diagnostic> { self.seen.lock().clone() }

    /// Drain and return everything collected.
    pub fn take(&self) -> Vec<Diagnostic> { std::mem::take(&mut *self.seen.lock()) }
}

impl DiagnosticSink for CollectingSink {
    fn report(&self, diagnostic: Diagnostic) {
        self.seen.lock().push(diagnostic);
    }
}
