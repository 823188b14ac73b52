//! Diagnostic codes reported by member caches.

use strata_config::MalformedSeverity;
use strata_diagnostics::{Category, Diagnostic, DiagnosticCode, Label, Severity};
use strata_source::Span;

use crate::owner::MemberKind;

/// A member without a name was found while building a name index.
pub const E301: DiagnosticCode = DiagnosticCode::new(Category::Error, 301);

/// Creates an `E301` diagnostic for an unnamed member of `owner_name`.
pub fn unnamed_member(
    kind: MemberKind,
    owner_name: &str,
    member_span: Span,
    owner_span: Span,
    severity: MalformedSeverity,
) -> Diagnostic {
    let severity = match severity {
        MalformedSeverity::Error => Severity::Error,
        MalformedSeverity::Warning => Severity::Warning,
    };
    Diagnostic::new(
        severity,
        E301,
        format!("{kind} of `{owner_name}` has no name"),
        member_span,
    )
    .with_label(Label::secondary(owner_span, "declared in this class"))
    .with_note("the member is left out of name lookups")
}
