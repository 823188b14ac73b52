//! Per-class member cache with modification-tracked invalidation.
//!
//! [`ClassMembers`] answers "what are this class's fields, methods,
//! constructors and inner types" for a [`ClassOwner`] owned by some host
//! tree. Results merge the owner's own members with those supplied by an
//! [`AugmentProvider`], are memoized against an [`Epoch`](strata_common::Epoch),
//! and are recomputed only after the host's modification count moves or
//! [`ClassMembers::drop_caches`] is called.
//!
//! The host supplies its collaborators through a [`MemberEnv`]: the
//! modification source, augmentation provider, element factory used for
//! synthetic enum methods, full-hierarchy resolver, and diagnostic sink.

#![warn(missing_docs)]

pub mod cache;
pub mod errors;
pub mod host;
pub mod memo;
pub mod owner;
pub mod synthetic;

pub use cache::ClassMembers;
pub use host::{AugmentProvider, ElementFactory, HierarchyResolver, MemberEnv, NoAugments};
pub use memo::Memo;
pub use owner::{ClassOwner, Member, MemberKind, MethodMember};
pub use synthetic::SyntheticMethod;
