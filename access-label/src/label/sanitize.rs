//! Canonicalization of raw string values into label tokens.
//!
//! These are pure string transformations. They do not traverse documents or
//! decide which values are labels.
//!
//! Quoting is deliberately minimal: a token is wrapped in double quotes only
//! when it contains whitespace. Characters the downstream expression grammar
//! reserves (commas, `#`, backslashes) are passed through, and the evaluator
//! decides whether it accepts them.

use indexmap::IndexSet;

use super::policy::Policy;

/// Trims `token` and double-quotes it if whitespace remains inside.
///
/// ```rust
/// use access_label::quote;
///
/// assert_eq!(quote(" BLUE "), "BLUE");
/// assert_eq!(quote("GREEN, PINK"), "\"GREEN, PINK\"");
/// ```
#[must_use]
pub fn quote(token: &str) -> String {
    let trimmed = token.trim();
    if trimmed.contains(char::is_whitespace) {
        format!("\"{trimmed}\"")
    } else {
        trimmed.to_string()
    }
}

/// Applies `policy` to a raw string value.
///
/// Under [`Policy::None`] the whole value is one quoted token. The split
/// policies cut the value on `,`, quote each piece, and join the distinct
/// pieces in first-seen order with the policy's operator.
///
/// Empty pieces between commas are kept, so `A,,B` becomes `A||B` and the
/// evaluator rejects it. Only empty pieces at the very end are discarded.
#[must_use]
pub fn sanitize(value: &str, policy: Policy) -> String {
    let Some(operator) = policy.operator() else {
        return quote(value);
    };

    let mut pieces: Vec<&str> = value.split(',').collect();
    if pieces.len() > 1 {
        while pieces.last().is_some_and(|piece| piece.is_empty()) {
            pieces.pop();
        }
    }

    let tokens: IndexSet<String> = pieces.into_iter().map(quote).collect();
    join(tokens, operator)
}

/// Joins distinct tokens with a single-character operator.
pub(crate) fn join<I>(tokens: I, operator: char) -> String
where
    I: IntoIterator<Item = String>,
{
    let mut out = String::new();
    for (idx, token) in tokens.into_iter().enumerate() {
        if idx > 0 {
            out.push(operator);
        }
        out.push_str(&token);
    }
    out
}
