//! Label policies, sanitization, and extraction.
//!
//! This module ties the pieces together:
//!
//! - **`policy`**: how one raw string becomes tokens (`Policy`, `PolicyScope`)
//! - **`sanitize`**: the string transformations (`quote`, `sanitize`)
//! - **`extract`**: document traversal (`LabelExtractor`, `extract`)

mod extract;
mod policy;
mod sanitize;

pub use extract::{extract, extract_with, LabelExtractor, DEFAULT_MAX_DEPTH};
pub use policy::{Policy, PolicyScope};
pub use sanitize::{quote, sanitize};
