//! Advisory diagnostics.
//!
//! Some operations detect suspicious but recoverable inputs, e.g. intrinsic
//! coordinates passed where extrinsic coordinates are expected. They report
//! them through a [`DiagnosticsSink`] injected at construction and carry on.
//! The default sink forwards to `tracing`; [`CollectingSink`] keeps the
//! reports in memory.

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::fmt::{self, Debug};
use std::sync::Arc;

/// Category of an advisory diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// A point was given in intrinsic coordinates instead of extrinsic ones.
    IntrinsicCoordinates,
    /// A computation left its fast path for a general fallback.
    FallbackBranch,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IntrinsicCoordinates => write!(f, "intrinsic-coordinates"),
            Self::FallbackBranch => write!(f, "fallback-branch"),
        }
    }
}

/// A single advisory message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Category of the diagnostic
    pub kind: DiagnosticKind,
    /// Human-readable message
    pub message: String,
}

impl Diagnostic {
    /// Create a diagnostic.
    pub fn new<S: Into<String>>(kind: DiagnosticKind, message: S) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Receiver of advisory diagnostics.
///
/// Reporting never fails and never interrupts the calling operation.
pub trait DiagnosticsSink: Debug + Send + Sync {
    /// Record one diagnostic.
    fn report(&self, diagnostic: &Diagnostic);
}

/// Sink forwarding diagnostics to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
    fn report(&self, diagnostic: &Diagnostic) {
        match diagnostic.kind {
            DiagnosticKind::IntrinsicCoordinates => {
                tracing::warn!(kind = %diagnostic.kind, "{}", diagnostic.message);
            }
            DiagnosticKind::FallbackBranch => {
                tracing::debug!(kind = %diagnostic.kind, "{}", diagnostic.message);
            }
        }
    }
}

/// Sink storing every diagnostic it receives.
#[derive(Debug, Default)]
pub struct CollectingSink {
    records: Mutex<Vec<Diagnostic>>,
}

impl CollectingSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the diagnostics received so far.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.records.lock().clone()
    }

    /// Number of diagnostics of the given kind.
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.records.lock().iter().filter(|d| d.kind == kind).count()
    }

    /// Drop every stored diagnostic.
    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

impl DiagnosticsSink for CollectingSink {
    fn report(&self, diagnostic: &Diagnostic) {
        self.records.lock().push(diagnostic.clone());
    }
}

static DEFAULT_SINK: Lazy<Arc<dyn DiagnosticsSink>> = Lazy::new(|| Arc::new(TracingSink));

/// The process-wide default sink (a [`TracingSink`]).
pub fn default_sink() -> Arc<dyn DiagnosticsSink> {
    Arc::clone(&DEFAULT_SINK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collecting_sink() {
        let sink = CollectingSink::new();
        sink.report(&Diagnostic::new(
            DiagnosticKind::IntrinsicCoordinates,
            "use extrinsic coordinates",
        ));
        sink.report(&Diagnostic::new(DiagnosticKind::FallbackBranch, "general logm"));

        assert_eq!(sink.diagnostics().len(), 2);
        assert_eq!(sink.count(DiagnosticKind::IntrinsicCoordinates), 1);
        assert_eq!(sink.count(DiagnosticKind::FallbackBranch), 1);

        sink.clear();
        assert!(sink.diagnostics().is_empty());
    }

    #[test]
    fn test_default_sink_is_shared() {
        let a = default_sink();
        let b = default_sink();
        assert!(Arc::ptr_eq(&a, &b));
        // Reporting through tracing without a subscriber is a no-op.
        a.report(&Diagnostic::new(DiagnosticKind::FallbackBranch, "noop"));
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(
            DiagnosticKind::IntrinsicCoordinates.to_string(),
            "intrinsic-coordinates"
        );
    }
}
