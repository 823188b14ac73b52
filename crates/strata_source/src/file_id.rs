//! Opaque identifier for source files known to the host.

use serde::{Deserialize, Serialize};

/// Opaque identifier for a source file.
///
/// [`Span`](crate::Span)s carry a `FileId` to associate byte ranges with the
/// file they were parsed from.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct FileId(u32);

impl FileId {
    /// A dummy file ID used for text that never lived in a file, such as
    /// internally generated method signatures.
    pub const DUMMY: FileId = FileId(u32::MAX);

    /// Creates a `FileId` from a raw `u32` value.
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }
}
