//! Error types for selector resolution.

use thiserror::Error;

/// Resolution failure enumeration.
///
/// Ambiguity is a distinguishable outcome, never silently collapsed into
/// "first match wins".
#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum ResolveError {
    /// No element in the document satisfies the selector
    #[error("No element matches selector: {selector}")]
    NotFound { selector: String },

    /// More than one element satisfies the selector
    #[error("Selector is ambiguous: {matches} elements match {selector}")]
    Ambiguous { selector: String, matches: usize },
}
