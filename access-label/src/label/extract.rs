//! Label extraction: resolving a dotted field path against a document.
//!
//! Resolution at each level tries, in order:
//!
//! 1. **Direct hit**: a key equal to the whole remaining path (`"a.b"` may be a
//!    literal key). Strings are sanitized, numbers are rendered as decoded, and
//!    lists fan out over their string and number elements.
//! 2. **Drill-down**: the first segment names a nested mapping, or a list of
//!    mappings, and the rest of the path is resolved inside it.
//!
//! Every fan-out collects into an insertion-ordered set, so the same document
//! always yields the same label and each distinct value appears once, at the
//! position it was first seen.

use indexmap::IndexSet;
use serde_json::Value;

use super::{
    policy::{Policy, PolicyScope},
    sanitize::{join, sanitize},
};
use crate::{
    diagnostics::{Diagnostics, Event, NoopDiagnostics},
    document::{FieldPath, Node},
};

/// Default limit on how many nested levels a path may descend.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Extracts the label at `path` using [`Policy::None`].
#[must_use]
pub fn extract(document: &Value, path: &str) -> Option<String> {
    extract_with(document, path, Policy::None)
}

/// Extracts the label at `path` using `policy`.
#[must_use]
pub fn extract_with(document: &Value, path: &str, policy: Policy) -> Option<String> {
    LabelExtractor::new(policy).extract(document, path)
}

/// Configured label extraction.
///
/// The extractor holds only configuration; every call builds and drops its own
/// intermediate state, so one extractor can serve any number of threads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LabelExtractor {
    policy: Policy,
    scope: PolicyScope,
    max_depth: usize,
}

impl Default for LabelExtractor {
    fn default() -> Self {
        Self::new(Policy::None)
    }
}

impl LabelExtractor {
    #[must_use]
    pub fn new(policy: Policy) -> Self {
        Self {
            policy,
            scope: PolicyScope::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    #[must_use]
    pub fn with_scope(mut self, scope: PolicyScope) -> Self {
        self.scope = scope;
        self
    }

    /// Sets how many drill-down steps a path may take before extraction gives up.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn policy(&self) -> Policy {
        self.policy
    }

    pub fn scope(&self) -> PolicyScope {
        self.scope
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Extracts the label at `path`, discarding diagnostics.
    #[must_use]
    pub fn extract(&self, document: &Value, path: &str) -> Option<String> {
        self.extract_observed(document, path, &NoopDiagnostics)
    }

    /// Extracts the label at `path`, reporting every miss to `diagnostics`.
    pub fn extract_observed(
        &self,
        document: &Value,
        path: &str,
        diagnostics: &dyn Diagnostics,
    ) -> Option<String> {
        let walk = Walk {
            scope: self.scope,
            max_depth: self.max_depth,
            diagnostics,
        };
        walk.resolve(Node::of(document), path, self.policy, 0)
    }
}

/// Per-call traversal state.
struct Walk<'d> {
    scope: PolicyScope,
    max_depth: usize,
    diagnostics: &'d dyn Diagnostics,
}

impl Walk<'_> {
    fn resolve(&self, node: Node<'_>, path: &str, policy: Policy, depth: usize) -> Option<String> {
        let map = node.as_mapping()?;

        if let Some(value) = map.get(path) {
            return self.leaf(Node::of(value), path, policy);
        }

        let field_path = FieldPath::parse(path);
        let Some((head, rest)) = field_path.split_first() else {
            self.diagnostics.record(&Event::FieldMissing { field: path });
            return None;
        };
        let Some(value) = map.get(head) else {
            self.diagnostics.record(&Event::FieldMissing { field: head });
            return None;
        };

        if depth >= self.max_depth {
            self.diagnostics.record(&Event::DepthExceeded {
                field: path,
                limit: self.max_depth,
            });
            return None;
        }

        let nested_policy = self.scope.nested(policy);
        match Node::of(value) {
            Node::Mapping(_) => self.resolve(Node::of(value), &rest, nested_policy, depth + 1),
            Node::List(items) if items.first().is_some_and(Value::is_object) => {
                let labels: IndexSet<String> = items
                    .iter()
                    .filter(|item| item.is_object())
                    .filter_map(|item| {
                        self.resolve(Node::of(item), &rest, nested_policy, depth + 1)
                    })
                    .collect();
                non_empty(labels)
            }
            _ => None,
        }
    }

    /// Resolves a value found under a key equal to the whole remaining path.
    fn leaf(&self, node: Node<'_>, field: &str, policy: Policy) -> Option<String> {
        match node {
            Node::String(s) => Some(sanitize(s, policy)),
            Node::Number(n) => Some(n.to_string()),
            Node::List(items) => {
                let values: IndexSet<String> = items
                    .iter()
                    .filter_map(|item| match Node::of(item) {
                        Node::String(s) => Some(sanitize(s, policy)),
                        Node::Number(n) => Some(n.to_string()),
                        _ => None,
                    })
                    .collect();
                let label = non_empty(values);
                if label.is_none() {
                    self.diagnostics.record(&Event::NoValues { field });
                }
                label
            }
            other => {
                self.diagnostics.record(&Event::UnsupportedType {
                    field,
                    kind: other.kind(),
                });
                None
            }
        }
    }
}

/// OR-joins a set of alternatives, or reports absence when there are none.
fn non_empty(labels: IndexSet<String>) -> Option<String> {
    if labels.is_empty() {
        None
    } else {
        Some(join(labels, '|'))
    }
}
