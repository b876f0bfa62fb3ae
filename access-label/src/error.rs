//! Error types.
//!
//! Only configuration problems are errors the caller has to handle. Anything
//! that depends on the content of a single document ends in a deny decision
//! instead; see [`crate::Decision`].

use thiserror::Error;

/// A filter could not be configured. Raised once, at construction time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("missing parameter [{0}]")]
    MissingParameter(&'static str),
    #[error("parameter [{name}] must be {expected}")]
    InvalidParameter {
        name: &'static str,
        expected: &'static str,
    },
    #[error("unknown label extraction policy [{0}], expected one of NONE, SPLIT_OR, SPLIT_AND")]
    UnknownPolicy(String),
    #[error("unknown policy scope [{0}], expected ALL_LEVELS or TOP_LEVEL_ONLY")]
    UnknownPolicyScope(String),
    #[error("label field must not be empty")]
    EmptyLabelField,
    #[error("authorization list [{list}] contains an empty authorization")]
    EmptyAuthorization { list: String },
}

/// The external evaluator could not decide.
///
/// Evaluators report malformed label expressions and authorization tokens they
/// do not accept through this type. The filter turns every variant into a deny.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluationError {
    #[error("invalid expression [{expression}]: {reason}")]
    InvalidExpression { expression: String, reason: String },
    #[error("invalid authorization [{0}]")]
    InvalidAuthorization(String),
    #[error("{0}")]
    Other(String),
}

impl EvaluationError {
    pub fn invalid_expression(expression: impl Into<String>, reason: impl Into<String>) -> Self {
        EvaluationError::InvalidExpression {
            expression: expression.into(),
            reason: reason.into(),
        }
    }
}
