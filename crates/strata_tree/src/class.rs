//! Class nodes and their member bodies.

use std::ops::Deref;
use std::sync::{Arc, PoisonError, RwLock};

use strata_common::Ident;
use strata_members::{ClassOwner, Member};
use strata_source::Span;

use crate::decl::{FieldRef, MethodRef, Origin};
use crate::ids::ClassId;

/// The flavor of a class-like declaration.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ClassKind {
    /// `class`
    Class,
    /// `interface`
    Interface,
    /// `enum`
    Enum,
    /// `@interface`
    Annotation,
}

/// Header of a class to be added to a [`ClassTree`](crate::ClassTree).
#[derive(Clone, Debug)]
pub struct ClassDecl {
    pub(crate) name: Option<Ident>,
    pub(crate) kind: ClassKind,
    pub(crate) super_class: Option<ClassId>,
    pub(crate) span: Span,
    pub(crate) origin: Origin,
}

impl ClassDecl {
    /// A named class of the given kind.
    pub fn new(name: Ident, kind: ClassKind) -> Self {
        Self {
            name: Some(name),
            kind,
            super_class: None,
            span: Span::DUMMY,
            origin: Origin::Source,
        }
    }

    /// An anonymous class.
    pub fn anonymous() -> Self {
        Self {
            name: None,
            kind: ClassKind::Class,
            super_class: None,
            span: Span::DUMMY,
            origin: Origin::Source,
        }
    }

    /// Sets the super class.
    pub fn extends(mut self, super_class: ClassId) -> Self {
        self.super_class = Some(super_class);
        self
    }

    /// Sets the declaration span.
    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Sets where the declaration came from.
    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }
}

#[derive(Debug, Default)]
pub(crate) struct ClassBody {
    pub(crate) fields: Vec<FieldRef>,
    pub(crate) methods: Vec<MethodRef>,
    pub(crate) inner: Vec<ClassRef>,
}

/// A class in the tree.
///
/// The header is fixed at creation. The body (fields, methods, and inner
/// classes in declaration order) is shared by readers and only changed
/// inside a [`write_command`](crate::ClassTree::write_command).
#[derive(Debug)]
pub struct ClassNode {
    id: ClassId,
    name: Option<Ident>,
    kind: ClassKind,
    span: Span,
    origin: Origin,
    super_class: Option<ClassId>,
    pub(crate) body: RwLock<ClassBody>,
}

impl ClassNode {
    pub(crate) fn new(id: ClassId, decl: ClassDecl) -> Self {
        Self {
            id,
            name: decl.name,
            kind: decl.kind,
            span: decl.span,
            origin: decl.origin,
            super_class: decl.super_class,
            body: RwLock::new(ClassBody::default()),
        }
    }

    /// The class kind.
    pub fn kind(&self) -> ClassKind {
        self.kind
    }

    /// Where the class came from.
    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// The direct super class, if any.
    pub fn super_class(&self) -> Option<ClassId> {
        self.super_class
    }

    pub(crate) fn read_body<R>(&self, f: impl FnOnce(&ClassBody) -> R) -> R {
        let body = self.body.read().unwrap_or_else(PoisonError::into_inner);
        f(&body)
    }

    pub(crate) fn write_body<R>(&self, f: impl FnOnce(&mut ClassBody) -> R) -> R {
        let mut body = self.body.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut body)
    }
}

impl ClassOwner for ClassNode {
    type Id = ClassId;
    type Field = FieldRef;
    type Method = MethodRef;
    type InnerType = ClassRef;

    fn id(&self) -> ClassId {
        self.id
    }

    fn name(&self) -> Option<Ident> {
        self.name
    }

    fn is_enum(&self) -> bool {
        self.kind == ClassKind::Enum
    }

    fn span(&self) -> Span {
        self.span
    }

    fn own_fields(&self) -> Vec<FieldRef> {
        self.read_body(|body| body.fields.clone())
    }

    fn own_methods(&self) -> Vec<MethodRef> {
        self.read_body(|body| body.methods.clone())
    }

    fn own_inner_types(&self) -> Vec<ClassRef> {
        self.read_body(|body| body.inner.clone())
    }
}

/// A shared handle to a [`ClassNode`].
///
/// Handles compare by identity.
#[derive(Clone, Debug)]
pub struct ClassRef(Arc<ClassNode>);

impl ClassRef {
    pub(crate) fn new(node: ClassNode) -> Self {
        Self(Arc::new(node))
    }
}

impl Deref for ClassRef {
    type Target = ClassNode;

    fn deref(&self) -> &ClassNode {
        &self.0
    }
}

impl PartialEq for ClassRef {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for ClassRef {}

impl Member for ClassRef {
    fn name(&self) -> Option<Ident> {
        self.0.name
    }

    fn is_externally_defined(&self) -> bool {
        self.0.origin == Origin::Augmented
    }

    fn span(&self) -> Span {
        self.0.span
    }
}
