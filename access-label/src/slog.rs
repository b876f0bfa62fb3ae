//! Adapters for reporting diagnostics through `slog`.
//!
//! This module connects [`crate::Diagnostics`] with `slog`. Each [`Event`] is
//! logged as one record whose message is [`Event::message`] and whose
//! key-value pairs carry the event's fields, so structured drains receive the
//! field path, value kind, label, and authorizations separately.
//!
//! Levels follow [`Event::severity`]: extraction misses and evaluator failures
//! are `info`, evaluation outcomes are `debug`.
//!
//! It does not configure `slog`; callers bring their own `Logger` and drain.

use slog::{Key, Logger, Record, Result as SlogResult, Serializer, Value as SlogValue, KV};

use crate::{
    diagnostics::{Diagnostics, Event, Severity},
    document::ValueKind,
};

/// A [`Diagnostics`] sink that writes to a `slog::Logger`.
#[derive(Clone, Debug)]
pub struct SlogDiagnostics {
    logger: Logger,
}

impl SlogDiagnostics {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }
}

impl Diagnostics for SlogDiagnostics {
    fn record(&self, event: &Event<'_>) {
        let message = event.message();
        let kv = EventKv(event);
        match event.severity() {
            Severity::Debug => slog::debug!(self.logger, "{}", message; kv),
            Severity::Info => slog::info!(self.logger, "{}", message; kv),
        }
    }
}

impl SlogValue for ValueKind {
    fn serialize(
        &self,
        _record: &Record<'_>,
        key: Key,
        serializer: &mut dyn Serializer,
    ) -> SlogResult {
        serializer.emit_str(key, self.as_str())
    }
}

/// The key-value pairs of one event.
///
/// Authorizations are emitted through `slog`'s nested-value support so JSON
/// drains receive them as a list rather than a joined string.
struct EventKv<'a>(&'a Event<'a>);

impl KV for EventKv<'_> {
    fn serialize(&self, record: &Record<'_>, serializer: &mut dyn Serializer) -> SlogResult {
        match *self.0 {
            Event::FieldMissing { field } | Event::NoValues { field } => {
                serializer.emit_str("field", field)
            }
            Event::UnsupportedType { field, kind } => {
                serializer.emit_str("field", field)?;
                SlogValue::serialize(&kind, record, "kind", serializer)
            }
            Event::DepthExceeded { field, limit } => {
                serializer.emit_str("field", field)?;
                serializer.emit_usize("limit", limit)
            }
            Event::LabelMissing { label_field } => serializer.emit_str("label_field", label_field),
            Event::Evaluated {
                label_field,
                label,
                authorizations,
                allowed,
            } => {
                serializer.emit_str("label_field", label_field)?;
                serializer.emit_str("label", label)?;
                let nested = slog::Serde(authorizations.clone());
                SlogValue::serialize(&nested, record, "authorizations", serializer)?;
                serializer.emit_bool("allowed", allowed)
            }
            Event::EvaluatorFailed {
                label_field,
                label,
                authorizations,
                error,
            } => {
                serializer.emit_str("label_field", label_field)?;
                serializer.emit_str("label", label)?;
                let nested = slog::Serde(authorizations.clone());
                SlogValue::serialize(&nested, record, "authorizations", serializer)?;
                serializer.emit_arguments("error", &format_args!("{error}"))
            }
        }
    }
}
