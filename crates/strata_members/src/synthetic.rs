//! Members materialized from fixed templates rather than source text.

use strata_common::Ident;
use strata_source::Span;

use crate::owner::{Member, MethodMember};

/// Source text of an enum's `values()` method.
pub fn values_method_text(enum_name: &str) -> String {
    format!("public static {enum_name}[] values() {{ }}")
}

/// Source text of an enum's `valueOf(String)` method.
pub fn value_of_method_text(enum_name: &str) -> String {
    format!(
        "public static {enum_name} valueOf(java.lang.String name) \
         throws java.lang.IllegalArgumentException {{ }}"
    )
}

/// A method that exists only in the model, never in source.
///
/// Wraps the parsed method and reports the span of the class it belongs to,
/// so navigation to it lands on the class declaration.
#[derive(Clone, Debug)]
pub struct SyntheticMethod<M> {
    method: M,
    anchor: Span,
}

impl<M: MethodMember> SyntheticMethod<M> {
    /// Wraps `method`, anchoring it at `anchor`.
    pub fn new(method: M, anchor: Span) -> Self {
        Self { method, anchor }
    }

    /// The parsed method.
    pub fn method(&self) -> &M {
        &self.method
    }

    /// Unwraps the parsed method.
    pub fn into_inner(self) -> M {
        self.method
    }

    /// Synthetic methods never correspond to source text.
    pub fn is_physical(&self) -> bool {
        false
    }

    /// Offset used for navigation: the start of the owning class.
    pub fn text_offset(&self) -> u32 {
        self.anchor.text_offset()
    }
}

impl<M: MethodMember> Member for SyntheticMethod<M> {
    fn name(&self) -> Option<Ident> {
        self.method.name()
    }

    fn is_externally_defined(&self) -> bool {
        false
    }

    fn span(&self) -> Span {
        self.anchor
    }
}

impl<M: MethodMember> MethodMember for SyntheticMethod<M> {
    fn is_constructor(&self) -> bool {
        self.method.is_constructor()
    }
}
