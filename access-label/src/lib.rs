//! Label extraction and canonicalization for attribute-based access filtering.
//!
//! Documents carry their access-control labels in ordinary fields. This crate
//! separates:
//! - **Extraction**: finding the label values at a dotted field path, fanning
//!   out over lists and nested objects.
//! - **Sanitization**: turning each raw value into label tokens according to a
//!   [`Policy`], quoting tokens that contain whitespace.
//! - **Filtering**: handing the canonical label and the requester's
//!   [`Authorizations`] to an external [`AccessEvaluator`] and turning every
//!   per-document problem into a deny.
//!
//! ```rust
//! use access_label::{extract, extract_with, Policy};
//! use serde_json::json;
//!
//! let doc = json!({"a": [{"b": "BLUE"}, {"b": "GREEN"}], "p": "IFSR,SDGT"});
//! assert_eq!(extract(&doc, "a.b").as_deref(), Some("BLUE|GREEN"));
//! assert_eq!(extract_with(&doc, "p", Policy::SplitAnd).as_deref(), Some("IFSR&SDGT"));
//! assert_eq!(extract(&doc, "missing"), None);
//! ```
//!
//! Key rules:
//! - The same document and path always produce the same label string.
//! - Each distinct value appears once, in the order it was first found.
//! - Absence is an ordinary outcome (`None`), reported through [`Diagnostics`].
//! - Only configuration problems are errors ([`ConfigError`]).
//!
//! What this crate does not do:
//! - parse or evaluate access expressions
//! - decode documents; it works on `serde_json::Value`
//! - configure logging; the `slog` feature only adapts to a caller's `Logger`

// <https://doc.rust-lang.org/rustc/lints/listing/allowed-by-default.html>
#![warn(
    anonymous_parameters,
    bare_trait_objects,
    elided_lifetimes_in_paths,
    missing_copy_implementations,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unsafe_code,
    unused_extern_crates,
    unused_import_braces
)]
// <https://rust-lang.github.io/rust-clippy/stable>
#![warn(
    clippy::all,
    clippy::cargo,
    clippy::dbg_macro,
    clippy::float_cmp_const,
    clippy::get_unwrap,
    clippy::mem_forget,
    clippy::nursery,
    clippy::pedantic,
    clippy::todo,
    clippy::unwrap_used,
    clippy::uninlined_format_args
)]
// Allow some clippy lints
#![allow(
    clippy::default_trait_access,
    clippy::doc_markdown,
    clippy::if_not_else,
    clippy::module_name_repetitions,
    clippy::multiple_crate_versions,
    clippy::must_use_candidate,
    clippy::needless_pass_by_value,
    clippy::use_self,
    clippy::cargo_common_metadata,
    clippy::missing_errors_doc,
    clippy::enum_glob_use,
    clippy::missing_const_for_fn,
    clippy::redundant_pub_crate,
    clippy::option_if_let_else
)]
// Allow some lints while testing
#![cfg_attr(test, allow(clippy::non_ascii_literal, clippy::unwrap_used))]

mod config;
mod diagnostics;
mod document;
mod error;
mod filter;
mod label;
#[cfg(feature = "slog")]
pub mod slog;

pub use config::{
    FilterConfig, AUTHORIZATIONS_PARAM, LABEL_FIELD_PARAM, MAX_DEPTH_PARAM, POLICY_PARAM,
    POLICY_SCOPE_PARAM,
};
pub use diagnostics::{Diagnostics, Event, NoopDiagnostics, Severity};
pub use document::{FieldPath, Node, ValueKind};
pub use error::{ConfigError, EvaluationError};
pub use filter::{AccessEvaluator, AccessFilter, Authorizations, Decision, DenyReason};
pub use label::{
    extract, extract_with, quote, sanitize, LabelExtractor, Policy, PolicyScope,
    DEFAULT_MAX_DEPTH,
};
