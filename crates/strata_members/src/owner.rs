//! The view of a class-like declaration that member caches are built over.

use std::fmt;
use std::hash::Hash;

use strata_common::Ident;
use strata_source::Span;

/// A field, method, or inner type as seen by a member cache.
///
/// Members are opaque apart from their name and whether they were supplied
/// from outside the owner's own declaration. Cloning should be cheap (a
/// reference count bump or a copy of a handle).
pub trait Member: Clone {
    /// The declared name, or `None` for anonymous or malformed declarations.
    fn name(&self) -> Option<Ident>;

    /// Returns `true` if the member was supplied by an augmentation provider
    /// rather than declared by the owner.
    fn is_externally_defined(&self) -> bool;

    /// Where the member was declared.
    fn span(&self) -> Span {
        Span::DUMMY
    }
}

/// A method member.
pub trait MethodMember: Member {
    /// Returns `true` if the method is a constructor.
    fn is_constructor(&self) -> bool;
}

/// A class-like declaration whose members can be cached.
///
/// The own-member accessors report only what the owner itself declares, in
/// declaration order. Constructors are the own methods for which
/// [`MethodMember::is_constructor`] holds.
pub trait ClassOwner {
    /// Stable identity of the owner, used in log output.
    type Id: Copy + Eq + Hash + fmt::Debug;
    /// Field members.
    type Field: Member;
    /// Method and constructor members.
    type Method: MethodMember;
    /// Inner type members.
    type InnerType: Member;

    /// Returns the owner's identity.
    fn id(&self) -> Self::Id;

    /// Returns the declared name, or `None` for anonymous classes.
    fn name(&self) -> Option<Ident>;

    /// Returns `true` if the owner is an enum.
    fn is_enum(&self) -> bool;

    /// Where the owner was declared.
    fn span(&self) -> Span;

    /// Fields declared by the owner.
    fn own_fields(&self) -> Vec<Self::Field>;

    /// Methods and constructors declared by the owner.
    fn own_methods(&self) -> Vec<Self::Method>;

    /// Inner types declared by the owner.
    fn own_inner_types(&self) -> Vec<Self::InnerType>;
}

/// The kind of member a query is about.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum MemberKind {
    /// Constructors.
    Constructor,
    /// Fields.
    Field,
    /// Methods, constructors included.
    Method,
    /// Inner classes, interfaces, enums and annotation types.
    InnerType,
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberKind::Constructor => write!(f, "constructor"),
            MemberKind::Field => write!(f, "field"),
            MemberKind::Method => write!(f, "method"),
            MemberKind::InnerType => write!(f, "inner type"),
        }
    }
}
