//! Labels that annotate source spans within a diagnostic.

use serde::{Deserialize, Serialize};
use strata_source::Span;

/// A secondary source span within a diagnostic, giving context for the
/// diagnostic's primary span.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    /// The source span this label annotates.
    pub span: Span,
    /// The message displayed next to the span.
    pub message: String,
}

impl Label {
    /// Creates a secondary label (additional context).
    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
        }
    }
}
