//! Per-document access decisions.
//!
//! [`AccessFilter`] is the integration point a host runtime calls once per
//! candidate document. It extracts the document's label, hands the label and
//! the configured [`Authorizations`] to an injected [`AccessEvaluator`], and
//! turns every data-dependent failure into a deny.
//!
//! The boolean expression grammar is not implemented here. Evaluators are
//! supplied by the caller, either as a type implementing [`AccessEvaluator`] or
//! as a closure.

use std::{collections::BTreeSet, fmt, str::FromStr, sync::Arc};

use serde::Serialize;
use serde_json::{Map, Value};

use crate::{
    config::FilterConfig,
    diagnostics::{Diagnostics, Event, NoopDiagnostics},
    error::{ConfigError, EvaluationError},
};

/// The authorizations held by a requester.
///
/// Tokens are kept in sorted order with duplicates removed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Authorizations(BTreeSet<String>);

impl Authorizations {
    /// Builds a set from individual tokens. Each token is trimmed and must not
    /// be empty; commas inside a token are kept.
    pub fn from_tokens<I, S>(tokens: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let raw: Vec<S> = tokens.into_iter().collect();
        let mut set = BTreeSet::new();
        for token in &raw {
            let token = token.as_ref().trim();
            if token.is_empty() {
                let list: Vec<&str> = raw.iter().map(|t| t.as_ref()).collect();
                return Err(ConfigError::EmptyAuthorization {
                    list: list.join(","),
                });
            }
            set.insert(token.to_string());
        }
        Ok(Self(set))
    }

    pub fn contains(&self, token: &str) -> bool {
        self.0.contains(token)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// Parses a comma-separated list.
///
/// The empty string is the empty set. Otherwise every comma-separated token is
/// trimmed and must be non-empty, so `"A,,B"` and `"A,"` are rejected.
impl FromStr for Authorizations {
    type Err = ConfigError;

    fn from_str(list: &str) -> Result<Self, Self::Err> {
        if list.trim().is_empty() {
            return Ok(Self::default());
        }
        Self::from_tokens(list.split(','))
    }
}

impl fmt::Display for Authorizations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, token) in self.iter().enumerate() {
            if idx > 0 {
                f.write_str(",")?;
            }
            f.write_str(token)?;
        }
        Ok(())
    }
}

/// The external boolean access-expression evaluator.
///
/// Implementations decide whether `authorizations` satisfy `expression`, or
/// return an error if either is malformed. They must be pure with respect to
/// their inputs; the filter calls them once per document, possibly from many
/// threads at once.
pub trait AccessEvaluator: Send + Sync {
    fn can_access(
        &self,
        authorizations: &Authorizations,
        expression: &str,
    ) -> Result<bool, EvaluationError>;
}

impl<F> AccessEvaluator for F
where
    F: Fn(&Authorizations, &str) -> Result<bool, EvaluationError> + Send + Sync,
{
    fn can_access(
        &self,
        authorizations: &Authorizations,
        expression: &str,
    ) -> Result<bool, EvaluationError> {
        self(authorizations, expression)
    }
}

/// Why a document was denied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DenyReason {
    /// No label could be extracted from the document.
    LabelMissing,
    /// The evaluator answered `false`.
    NotAuthorized { label: String },
    /// The evaluator failed; failures are never fatal.
    EvaluatorFailed {
        label: String,
        error: EvaluationError,
    },
}

/// The outcome of filtering one document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decision {
    Allow { label: String },
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow { .. })
    }

    /// The extracted label, when there was one.
    pub fn label(&self) -> Option<&str> {
        match self {
            Decision::Allow { label }
            | Decision::Deny(
                DenyReason::NotAuthorized { label } | DenyReason::EvaluatorFailed { label, .. },
            ) => Some(label.as_str()),
            Decision::Deny(DenyReason::LabelMissing) => None,
        }
    }
}

/// Decides access to documents for one requester.
///
/// The filter owns no mutable state. Share it by reference or behind an `Arc`
/// to evaluate documents concurrently.
pub struct AccessFilter<E> {
    config: FilterConfig,
    evaluator: E,
    diagnostics: Arc<dyn Diagnostics>,
}

impl<E> fmt::Debug for AccessFilter<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessFilter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<E> AccessFilter<E>
where
    E: AccessEvaluator,
{
    /// Creates a filter that discards diagnostics.
    pub fn new(config: FilterConfig, evaluator: E) -> Self {
        Self {
            config,
            evaluator,
            diagnostics: Arc::new(NoopDiagnostics),
        }
    }

    /// Validates a host parameter map and creates a filter from it.
    ///
    /// See [`FilterConfig::from_params`] for the accepted parameters.
    pub fn from_params(params: &Map<String, Value>, evaluator: E) -> Result<Self, ConfigError> {
        Ok(Self::new(FilterConfig::from_params(params)?, evaluator))
    }

    #[must_use]
    pub fn with_diagnostics<D>(mut self, diagnostics: D) -> Self
    where
        D: Diagnostics + 'static,
    {
        self.diagnostics = Arc::new(diagnostics);
        self
    }

    /// Reports diagnostics to `logger`.
    #[cfg(feature = "slog")]
    #[must_use]
    pub fn with_logger(self, logger: ::slog::Logger) -> Self {
        self.with_diagnostics(crate::slog::SlogDiagnostics::new(logger))
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Extracts the configured label from `document`.
    pub fn label(&self, document: &Value) -> Option<String> {
        self.config.extractor().extract_observed(
            document,
            self.config.label_field(),
            self.diagnostics.as_ref(),
        )
    }

    /// Decides access to `document`.
    pub fn decide(&self, document: &Value) -> Decision {
        let label_field = self.config.label_field();
        let authorizations = self.config.authorizations();

        let Some(label) = self.label(document) else {
            self.diagnostics.record(&Event::LabelMissing { label_field });
            return Decision::Deny(DenyReason::LabelMissing);
        };

        match self.evaluator.can_access(authorizations, &label) {
            Ok(allowed) => {
                self.diagnostics.record(&Event::Evaluated {
                    label_field,
                    label: &label,
                    authorizations,
                    allowed,
                });
                if allowed {
                    Decision::Allow { label }
                } else {
                    Decision::Deny(DenyReason::NotAuthorized { label })
                }
            }
            Err(error) => {
                self.diagnostics.record(&Event::EvaluatorFailed {
                    label_field,
                    label: &label,
                    authorizations,
                    error: &error,
                });
                Decision::Deny(DenyReason::EvaluatorFailed { label, error })
            }
        }
    }

    /// Returns whether `document` may be accessed.
    pub fn execute(&self, document: &Value) -> bool {
        self.decide(document).is_allowed()
    }

    /// Lazily keeps the documents this filter allows.
    pub fn filter_documents<'a, I>(&'a self, documents: I) -> impl Iterator<Item = &'a Value> + 'a
    where
        I: IntoIterator<Item = &'a Value>,
        I::IntoIter: 'a,
    {
        documents
            .into_iter()
            .filter(move |document| self.execute(document))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use serde_json::json;

    use super::{AccessEvaluator, AccessFilter, Authorizations, Decision, DenyReason};
    use crate::{
        config::FilterConfig,
        diagnostics::{Diagnostics, Event},
        error::{ConfigError, EvaluationError},
    };

    /// Allows when any `|`-separated alternative is a held authorization.
    fn any_of(auths: &Authorizations, expression: &str) -> Result<bool, EvaluationError> {
        Ok(expression.split('|').any(|token| auths.contains(token)))
    }

    fn evaluator<F>(f: F) -> impl AccessEvaluator
    where
        F: Fn(&Authorizations, &str) -> Result<bool, EvaluationError> + Send + Sync,
    {
        f
    }

    #[derive(Clone, Default)]
    struct Messages(Arc<Mutex<Vec<&'static str>>>);

    impl Diagnostics for Messages {
        fn record(&self, event: &Event<'_>) {
            self.0.lock().unwrap().push(event.message());
        }
    }

    fn config(field: &str, auths: &str) -> FilterConfig {
        FilterConfig::new(field, auths.parse().unwrap()).unwrap()
    }

    #[test]
    fn authorizations_parse_comma_lists() {
        let auths: Authorizations = "BLUE, GREEN,BLUE".parse().unwrap();
        assert_eq!(auths.len(), 2);
        assert_eq!(auths.to_string(), "BLUE,GREEN");
        assert!("".parse::<Authorizations>().unwrap().is_empty());
    }

    #[test]
    fn authorizations_reject_empty_tokens() {
        let err = "A,,B".parse::<Authorizations>().unwrap_err();
        assert_eq!(
            err,
            ConfigError::EmptyAuthorization {
                list: "A,,B".into()
            }
        );
        assert!("A,".parse::<Authorizations>().is_err());
    }

    #[test]
    fn authorization_tokens_may_contain_commas() {
        let auths = Authorizations::from_tokens(["\"IFSR,SDGT\""]).unwrap();
        assert!(auths.contains("\"IFSR,SDGT\""));
        assert_eq!(auths.len(), 1);
    }

    #[test]
    fn allows_when_evaluator_allows() {
        let filter = AccessFilter::new(config("labels", "BLUE"), any_of);
        let decision = filter.decide(&json!({"labels": ["RED", "BLUE"]}));
        assert_eq!(
            decision,
            Decision::Allow {
                label: "RED|BLUE".into()
            }
        );
        assert!(decision.is_allowed());
    }

    #[test]
    fn denies_when_evaluator_denies() {
        let filter = AccessFilter::new(config("labels", "GREEN"), any_of);
        let decision = filter.decide(&json!({"labels": "BLUE"}));
        assert_eq!(
            decision,
            Decision::Deny(DenyReason::NotAuthorized {
                label: "BLUE".into()
            })
        );
        assert_eq!(decision.label(), Some("BLUE"));
    }

    #[test]
    fn missing_label_denies_and_is_reported() {
        let messages = Messages::default();
        let filter = AccessFilter::new(config("labels", "BLUE"), any_of)
            .with_diagnostics(messages.clone());

        let decision = filter.decide(&json!({}));
        assert_eq!(decision, Decision::Deny(DenyReason::LabelMissing));
        assert_eq!(decision.label(), None);
        assert_eq!(
            *messages.0.lock().unwrap(),
            [
                "label field does not exist",
                "unable to determine label for label field"
            ]
        );
    }

    #[test]
    fn evaluator_failure_denies_and_is_reported() {
        let messages = Messages::default();
        let failing = evaluator(|_auths, expression| {
            Err(EvaluationError::invalid_expression(expression, "bad token"))
        });
        let filter = AccessFilter::new(config("labels", "BLUE"), failing)
            .with_diagnostics(messages.clone());

        let decision = filter.decide(&json!({"labels": "BLUE#GREEN"}));
        assert_eq!(
            decision,
            Decision::Deny(DenyReason::EvaluatorFailed {
                label: "BLUE#GREEN".into(),
                error: EvaluationError::invalid_expression("BLUE#GREEN", "bad token"),
            })
        );
        assert!(!filter.execute(&json!({"labels": "BLUE#GREEN"})));
        assert_eq!(
            messages.0.lock().unwrap().first().copied(),
            Some("failed to evaluate label")
        );
    }

    #[test]
    fn evaluator_receives_canonical_label() {
        let seen = Mutex::new(Vec::new());
        let recording = evaluator(|auths, expression| {
            seen.lock()
                .unwrap()
                .push((auths.to_string(), expression.to_string()));
            Ok(true)
        });
        let filter = AccessFilter::new(
            config("field", "IFSR,SDGT").with_policy(crate::Policy::SplitAnd),
            recording,
        );
        assert!(filter.execute(&json!({"field": "IFSR, SDGT"})));
        assert_eq!(
            *seen.lock().unwrap(),
            [("IFSR,SDGT".to_string(), "IFSR&SDGT".to_string())]
        );
    }

    #[test]
    fn filter_documents_keeps_allowed_ones() {
        let filter = AccessFilter::new(config("labels", "BLUE"), any_of);
        let docs = [
            json!({"labels": "BLUE"}),
            json!({"labels": "RED"}),
            json!({}),
            json!({"labels": ["RED", "BLUE"]}),
        ];
        let kept: Vec<_> = filter.filter_documents(&docs).collect();
        assert_eq!(kept, [&docs[0], &docs[3]]);
    }
}
