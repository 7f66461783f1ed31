//! Diagnostic sink abstraction.
//!
//! The registry reports internal anomalies (stale removals, ownership
//! mismatches, premature teardown) without ever aborting the caller. It
//! does so through an injected sink rather than a hard-wired logger, so the
//! core logic stays testable without real log infrastructure. [`TracingSink`]
//! bridges reports into the `tracing` pipeline for production use.

use std::fmt;

use tracing::{error, info, warn};

/// Severity of a diagnostic event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticLevel {
    /// Informational, e.g. a table dump
    Info,
    /// Unexpected but benign, e.g. a lost race
    Warning,
    /// A correctness-violation signal worth operator attention
    Error,
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticLevel::Info => write!(f, "info"),
            DiagnosticLevel::Warning => write!(f, "warning"),
            DiagnosticLevel::Error => write!(f, "error"),
        }
    }
}

/// Receiver for diagnostic events.
///
/// Implementations must not fail and must not block for long; the registry
/// calls `report` synchronously from its hot paths and ignores nothing it
/// could return. When no sink is available, use [`NoopSink`].
pub trait DiagnosticSink: Send + Sync {
    /// Deliver one leveled text event.
    fn report(&self, level: DiagnosticLevel, message: &str);
}

/// Sink forwarding events to the `tracing` subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, level: DiagnosticLevel, message: &str) {
        match level {
            DiagnosticLevel::Info => info!(target: "pelican_quic::registry", "{message}"),
            DiagnosticLevel::Warning => warn!(target: "pelican_quic::registry", "{message}"),
            DiagnosticLevel::Error => error!(target: "pelican_quic::registry", "{message}"),
        }
    }
}

/// Sink that drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl DiagnosticSink for NoopSink {
    fn report(&self, _level: DiagnosticLevel, _message: &str) {}
}
