//! Label policies.
//!
//! A [`Policy`] decides how one raw string value is decomposed before it joins
//! the label expression. A [`PolicyScope`] decides whether that policy still
//! applies once extraction has drilled below the first path segment.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// How a single raw string value is turned into label tokens.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Policy {
    /// The whole value is one token.
    #[default]
    None,
    /// Comma-separated pieces are OR-ed together (`a|b`).
    SplitOr,
    /// Comma-separated pieces are AND-ed together (`a&b`).
    SplitAnd,
}

impl Policy {
    /// Every policy, in declaration order.
    pub const ALL: [Policy; 3] = [Policy::None, Policy::SplitOr, Policy::SplitAnd];

    /// The configuration name of this policy.
    pub fn as_str(self) -> &'static str {
        match self {
            Policy::None => "NONE",
            Policy::SplitOr => "SPLIT_OR",
            Policy::SplitAnd => "SPLIT_AND",
        }
    }

    /// The operator used to join split pieces, if the policy splits at all.
    pub fn operator(self) -> Option<char> {
        match self {
            Policy::None => None,
            Policy::SplitOr => Some('|'),
            Policy::SplitAnd => Some('&'),
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses the exact configuration name. Unknown or differently cased names are
/// rejected rather than defaulted.
impl FromStr for Policy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Policy::ALL
            .into_iter()
            .find(|policy| policy.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownPolicy(s.to_string()))
    }
}

/// Which recursion levels a [`Policy`] applies to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PolicyScope {
    /// The policy applies at every depth of a nested path.
    #[default]
    AllLevels,
    /// The policy applies only to values found directly under the root
    /// document; nested drill-down falls back to [`Policy::None`].
    ///
    /// This reproduces the behaviour of earlier label filters, which did not
    /// forward the policy into nested objects.
    TopLevelOnly,
}

impl PolicyScope {
    pub fn as_str(self) -> &'static str {
        match self {
            PolicyScope::AllLevels => "ALL_LEVELS",
            PolicyScope::TopLevelOnly => "TOP_LEVEL_ONLY",
        }
    }

    /// The policy to use one level below a drill-down step.
    pub(crate) fn nested(self, policy: Policy) -> Policy {
        match self {
            PolicyScope::AllLevels => policy,
            PolicyScope::TopLevelOnly => Policy::None,
        }
    }
}

impl fmt::Display for PolicyScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyScope {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ALL_LEVELS" => Ok(PolicyScope::AllLevels),
            "TOP_LEVEL_ONLY" => Ok(PolicyScope::TopLevelOnly),
            other => Err(ConfigError::UnknownPolicyScope(other.to_string())),
        }
    }
}
