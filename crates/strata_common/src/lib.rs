//! Shared foundational types used across the strata class model.
//!
//! This crate provides interned identifiers for member and class names,
//! modification counters used to invalidate derived data, and the common
//! internal error type.

#![warn(missing_docs)]

pub mod ident;
pub mod modification;
pub mod result;

pub use ident::{Ident, Interner};
pub use modification::{Epoch, ModificationSource, ModificationTracker};
pub use result::{InternalError, StrataResult};
