//! Element factory backed by the method signature parser.

use strata_common::{Interner, InternalError, StrataResult};
use strata_diagnostics::DiagnosticSink;
use strata_members::{ClassOwner, ElementFactory};

use crate::class::ClassNode;
use crate::decl::{MethodRef, Origin};
use crate::parser::{parse_method, MethodContext};

/// Builds method members from text in the context of a [`ClassNode`].
///
/// The created methods are not added to the class; they are marked
/// [`Origin::Synthetic`] and carry the class's span.
pub struct TreeElementFactory<'a> {
    interner: &'a Interner,
    sink: &'a DiagnosticSink,
}

impl<'a> TreeElementFactory<'a> {
    /// Creates a factory interning names into `interner` and reporting
    /// parse diagnostics to `sink`.
    pub fn new(interner: &'a Interner, sink: &'a DiagnosticSink) -> Self {
        Self { interner, sink }
    }
}

impl ElementFactory<ClassNode> for TreeElementFactory<'_> {
    fn create_method_from_text(&self, text: &str, context: &ClassNode) -> StrataResult<MethodRef> {
        let span = context.span();
        let method_context = MethodContext::of(context);
        match parse_method(text, span.file, &method_context, self.interner, self.sink) {
            Ok(mut decl) => {
                decl.origin = Origin::Synthetic;
                decl.span = span;
                Ok(MethodRef::new(decl))
            }
            Err(err) => {
                tracing::error!(class = ?context.id(), %err, text, "generated method text did not parse");
                Err(InternalError::new(format!("cannot create method from `{text}`: {err}")))
            }
        }
    }
}
