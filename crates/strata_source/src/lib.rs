//! Source positions for declarations in the class model.
//!
//! [`FileId`] names a source file, and [`Span`] a byte range within it.
//! Synthetic declarations that have no text of their own borrow the span of
//! the declaration they belong to.

#![warn(missing_docs)]

pub mod file_id;
pub mod span;

pub use file_id::FileId;
pub use span::Span;
