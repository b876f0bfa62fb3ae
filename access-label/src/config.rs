//! Filter configuration.
//!
//! A [`FilterConfig`] is validated once, when the filter is built. Hosts that
//! hand over a loosely typed parameter map use [`FilterConfig::from_params`];
//! everything else can use the builder methods directly.

use serde_json::{Map, Value};

use crate::{
    error::ConfigError,
    filter::Authorizations,
    label::{LabelExtractor, Policy, PolicyScope},
};

/// Parameter naming the field path that holds the label.
pub const LABEL_FIELD_PARAM: &str = "labelField";
/// Parameter holding the requester's authorizations, comma separated.
pub const AUTHORIZATIONS_PARAM: &str = "authorizations";
/// Optional parameter selecting the [`Policy`]. Defaults to `NONE`.
pub const POLICY_PARAM: &str = "labelExtractionPolicy";
/// Optional parameter selecting the [`PolicyScope`]. Defaults to `ALL_LEVELS`.
pub const POLICY_SCOPE_PARAM: &str = "labelPolicyScope";
/// Optional parameter bounding drill-down depth.
pub const MAX_DEPTH_PARAM: &str = "maxDepth";

/// Validated settings for one [`crate::AccessFilter`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterConfig {
    label_field: String,
    authorizations: Authorizations,
    extractor: LabelExtractor,
}

impl FilterConfig {
    /// Creates a configuration with the default policy.
    pub fn new(
        label_field: impl Into<String>,
        authorizations: Authorizations,
    ) -> Result<Self, ConfigError> {
        let label_field = label_field.into();
        if label_field.is_empty() {
            return Err(ConfigError::EmptyLabelField);
        }
        Ok(Self {
            label_field,
            authorizations,
            extractor: LabelExtractor::default(),
        })
    }

    #[must_use]
    pub fn with_policy(mut self, policy: Policy) -> Self {
        self.extractor = LabelExtractor::new(policy)
            .with_scope(self.extractor.scope())
            .with_max_depth(self.extractor.max_depth());
        self
    }

    #[must_use]
    pub fn with_scope(mut self, scope: PolicyScope) -> Self {
        self.extractor = self.extractor.with_scope(scope);
        self
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.extractor = self.extractor.with_max_depth(max_depth);
        self
    }

    /// Builds a configuration from a host parameter map.
    ///
    /// `labelField` and `authorizations` are required. `authorizations` may be
    /// a comma-separated string or a list of strings. `labelExtractionPolicy`
    /// and `labelPolicyScope` must use the exact upper-case names when present.
    pub fn from_params(params: &Map<String, Value>) -> Result<Self, ConfigError> {
        let label_field = required_str(params, LABEL_FIELD_PARAM)?;
        let authorizations = match params.get(AUTHORIZATIONS_PARAM) {
            None => return Err(ConfigError::MissingParameter(AUTHORIZATIONS_PARAM)),
            Some(Value::String(list)) => list.parse::<Authorizations>()?,
            Some(Value::Array(items)) => authorizations_from_list(items)?,
            Some(_) => {
                return Err(ConfigError::InvalidParameter {
                    name: AUTHORIZATIONS_PARAM,
                    expected: "a comma-separated string or a list of strings",
                })
            }
        };

        let mut config = Self::new(label_field, authorizations)?;
        if let Some(policy) = optional_str(params, POLICY_PARAM)? {
            config = config.with_policy(policy.parse()?);
        }
        if let Some(scope) = optional_str(params, POLICY_SCOPE_PARAM)? {
            config = config.with_scope(scope.parse()?);
        }
        if let Some(depth) = params.get(MAX_DEPTH_PARAM) {
            let depth = depth
                .as_u64()
                .and_then(|depth| usize::try_from(depth).ok())
                .ok_or(ConfigError::InvalidParameter {
                    name: MAX_DEPTH_PARAM,
                    expected: "a non-negative integer",
                })?;
            config = config.with_max_depth(depth);
        }
        Ok(config)
    }

    pub fn label_field(&self) -> &str {
        &self.label_field
    }

    pub fn authorizations(&self) -> &Authorizations {
        &self.authorizations
    }

    pub fn extractor(&self) -> &LabelExtractor {
        &self.extractor
    }

    pub fn policy(&self) -> Policy {
        self.extractor.policy()
    }
}

fn required_str<'a>(
    params: &'a Map<String, Value>,
    name: &'static str,
) -> Result<&'a str, ConfigError> {
    optional_str(params, name)?.ok_or(ConfigError::MissingParameter(name))
}

fn optional_str<'a>(
    params: &'a Map<String, Value>,
    name: &'static str,
) -> Result<Option<&'a str>, ConfigError> {
    match params.get(name) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(_) => Err(ConfigError::InvalidParameter {
            name,
            expected: "a string",
        }),
    }
}

fn authorizations_from_list(items: &[Value]) -> Result<Authorizations, ConfigError> {
    let tokens = items
        .iter()
        .map(|item| {
            item.as_str().ok_or(ConfigError::InvalidParameter {
                name: AUTHORIZATIONS_PARAM,
                expected: "a comma-separated string or a list of strings",
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Authorizations::from_tokens(tokens)
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Map, Value};

    use super::FilterConfig;
    use crate::{error::ConfigError, label::DEFAULT_MAX_DEPTH, Policy, PolicyScope};

    fn params(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected an object, got {other}"),
        }
    }

    #[test]
    fn minimal_params_use_defaults() {
        let config = FilterConfig::from_params(&params(json!({
            "labelField": "labels",
            "authorizations": "BLUE,GREEN",
        })))
        .unwrap();

        assert_eq!(config.label_field(), "labels");
        assert_eq!(config.policy(), Policy::None);
        assert_eq!(config.extractor().scope(), PolicyScope::AllLevels);
        assert_eq!(config.extractor().max_depth(), DEFAULT_MAX_DEPTH);
        assert!(config.authorizations().contains("BLUE"));
        assert!(config.authorizations().contains("GREEN"));
    }

    #[test]
    fn optional_params_are_applied() {
        let config = FilterConfig::from_params(&params(json!({
            "labelField": "a.b",
            "authorizations": ["IFSR", "SDGT"],
            "labelExtractionPolicy": "SPLIT_AND",
            "labelPolicyScope": "TOP_LEVEL_ONLY",
            "maxDepth": 4,
        })))
        .unwrap();

        assert_eq!(config.policy(), Policy::SplitAnd);
        assert_eq!(config.extractor().scope(), PolicyScope::TopLevelOnly);
        assert_eq!(config.extractor().max_depth(), 4);
        assert_eq!(config.authorizations().len(), 2);
    }

    #[test]
    fn policy_survives_later_builder_calls() {
        let config = FilterConfig::new("labels", "BLUE".parse().unwrap())
            .unwrap()
            .with_max_depth(3)
            .with_policy(Policy::SplitOr)
            .with_scope(PolicyScope::TopLevelOnly);
        assert_eq!(config.policy(), Policy::SplitOr);
        assert_eq!(config.extractor().max_depth(), 3);
        assert_eq!(config.extractor().scope(), PolicyScope::TopLevelOnly);
    }

    #[test]
    fn missing_required_params_fail() {
        let err = FilterConfig::from_params(&params(json!({"authorizations": "A"}))).unwrap_err();
        assert_eq!(err, ConfigError::MissingParameter("labelField"));

        let err = FilterConfig::from_params(&params(json!({"labelField": "x"}))).unwrap_err();
        assert_eq!(err, ConfigError::MissingParameter("authorizations"));
    }

    #[test]
    fn wrongly_typed_params_fail() {
        let err = FilterConfig::from_params(&params(json!({
            "labelField": 7,
            "authorizations": "A",
        })))
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidParameter { name: "labelField", .. }
        ));

        let err = FilterConfig::from_params(&params(json!({
            "labelField": "x",
            "authorizations": ["A", 1],
        })))
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidParameter { name: "authorizations", .. }
        ));

        let err = FilterConfig::from_params(&params(json!({
            "labelField": "x",
            "authorizations": "A",
            "maxDepth": -1,
        })))
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidParameter { name: "maxDepth", .. }
        ));
    }

    #[test]
    fn unknown_policy_fails_at_construction() {
        let err = FilterConfig::from_params(&params(json!({
            "labelField": "x",
            "authorizations": "A",
            "labelExtractionPolicy": "split_or",
        })))
        .unwrap_err();
        assert_eq!(err, ConfigError::UnknownPolicy("split_or".into()));
    }

    #[test]
    fn empty_label_field_fails() {
        let err = FilterConfig::new("", "A".parse().unwrap()).unwrap_err();
        assert_eq!(err, ConfigError::EmptyLabelField);
    }
}
