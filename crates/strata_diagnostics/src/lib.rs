//! Diagnostic creation and accumulation for the class model.
//!
//! This crate provides structured [`Diagnostic`] messages with severity
//! levels, codes, and source labels. The thread-safe [`DiagnosticSink`]
//! collects them from parsers and member caches without interrupting the
//! operation that noticed the problem.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod label;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use label::Label;
pub use severity::Severity;
pub use sink::DiagnosticSink;
