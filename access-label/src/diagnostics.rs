//! Diagnostic side channel.
//!
//! Extraction misses and evaluator failures are ordinary outcomes, so they are
//! returned as `None` or as a deny decision rather than as errors. They usually
//! point at a misconfigured label field though, so every one of them is also
//! reported as an [`Event`] to a [`Diagnostics`] sink.
//!
//! The crate ships a no-op sink and, behind the `slog` feature, an adapter that
//! writes events to a `slog::Logger`.

use crate::{document::ValueKind, error::EvaluationError, filter::Authorizations};

/// How loudly an event should be reported.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Routine detail, such as the outcome of an evaluation.
    Debug,
    /// Something an operator should see; usually a configuration problem.
    Info,
}

/// Something that happened while extracting a label or deciding access.
#[derive(Clone, Copy, Debug)]
pub enum Event<'a> {
    /// The field (or the first segment of a nested path) does not exist.
    FieldMissing { field: &'a str },
    /// The field exists but holds a value that cannot become a label.
    UnsupportedType { field: &'a str, kind: ValueKind },
    /// The field is a list without any string or number elements.
    NoValues { field: &'a str },
    /// The path reaches deeper than the configured recursion limit.
    DepthExceeded { field: &'a str, limit: usize },
    /// No label could be extracted for the document; access is denied.
    LabelMissing { label_field: &'a str },
    /// The evaluator answered.
    Evaluated {
        label_field: &'a str,
        label: &'a str,
        authorizations: &'a Authorizations,
        allowed: bool,
    },
    /// The evaluator rejected the label or the authorizations; access is denied.
    EvaluatorFailed {
        label_field: &'a str,
        label: &'a str,
        authorizations: &'a Authorizations,
        error: &'a EvaluationError,
    },
}

impl Event<'_> {
    pub fn severity(&self) -> Severity {
        match self {
            Event::Evaluated { .. } => Severity::Debug,
            _ => Severity::Info,
        }
    }

    /// A short human-readable message for the event.
    pub fn message(&self) -> &'static str {
        match self {
            Event::FieldMissing { .. } => "label field does not exist",
            Event::UnsupportedType { .. } => {
                "label field is expected to contain either a string, a number or a list"
            }
            Event::NoValues { .. } => "label field list contains no string or number values",
            Event::DepthExceeded { .. } => "label field path exceeds the maximum depth",
            Event::LabelMissing { .. } => "unable to determine label for label field",
            Event::Evaluated { .. } => "label evaluated",
            Event::EvaluatorFailed { .. } => "failed to evaluate label",
        }
    }
}

/// A sink for diagnostic events.
///
/// Implementations must be cheap and must not fail; they run once per
/// extraction miss on the document hot path.
pub trait Diagnostics: Send + Sync {
    fn record(&self, event: &Event<'_>);
}

/// Discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopDiagnostics;

impl Diagnostics for NoopDiagnostics {
    fn record(&self, _event: &Event<'_>) {}
}

impl<F> Diagnostics for F
where
    F: Fn(&Event<'_>) + Send + Sync,
{
    fn record(&self, event: &Event<'_>) {
        self(event);
    }
}
