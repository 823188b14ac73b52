//! Field and method declarations held by class nodes.

use std::fmt::Write as _;
use std::ops::{BitOr, BitOrAssign, Deref};
use std::sync::Arc;

use strata_common::{Ident, Interner};
use strata_members::{Member, MethodMember};
use strata_source::Span;

/// Where a declaration came from.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Origin {
    /// Written in source.
    Source,
    /// Supplied by an augmentation provider (externally defined).
    Augmented,
    /// Materialized from an internal template.
    Synthetic,
}

/// A set of declaration modifiers.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Modifiers(u16);

impl Modifiers {
    /// `public`
    pub const PUBLIC: Modifiers = Modifiers(1 << 0);
    /// `protected`
    pub const PROTECTED: Modifiers = Modifiers(1 << 1);
    /// `private`
    pub const PRIVATE: Modifiers = Modifiers(1 << 2);
    /// `static`
    pub const STATIC: Modifiers = Modifiers(1 << 3);
    /// `final`
    pub const FINAL: Modifiers = Modifiers(1 << 4);
    /// `abstract`
    pub const ABSTRACT: Modifiers = Modifiers(1 << 5);
    /// `native`
    pub const NATIVE: Modifiers = Modifiers(1 << 6);
    /// `synchronized`
    pub const SYNCHRONIZED: Modifiers = Modifiers(1 << 7);
    /// `default` (interface methods)
    pub const DEFAULT: Modifiers = Modifiers(1 << 8);

    const KEYWORDS: [(Modifiers, &'static str); 9] = [
        (Modifiers::PUBLIC, "public"),
        (Modifiers::PROTECTED, "protected"),
        (Modifiers::PRIVATE, "private"),
        (Modifiers::ABSTRACT, "abstract"),
        (Modifiers::DEFAULT, "default"),
        (Modifiers::STATIC, "static"),
        (Modifiers::FINAL, "final"),
        (Modifiers::SYNCHRONIZED, "synchronized"),
        (Modifiers::NATIVE, "native"),
    ];

    /// The empty set.
    pub const fn empty() -> Self {
        Modifiers(0)
    }

    /// Returns `true` if every modifier in `other` is set.
    pub fn contains(self, other: Modifiers) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns `true` if no modifier is set.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Keywords of the set modifiers, in conventional source order.
    pub fn keywords(self) -> impl Iterator<Item = &'static str> {
        Self::KEYWORDS
            .into_iter()
            .filter(move |(m, _)| self.contains(*m))
            .map(|(_, kw)| kw)
    }
}

impl BitOr for Modifiers {
    type Output = Modifiers;

    fn bitor(self, rhs: Modifiers) -> Modifiers {
        Modifiers(self.0 | rhs.0)
    }
}

impl BitOrAssign for Modifiers {
    fn bitor_assign(&mut self, rhs: Modifiers) {
        self.0 |= rhs.0;
    }
}

/// A reference to a type by (possibly qualified) name, with array dimensions.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct TypeRef {
    /// The type name as written, e.g. `java.lang.String` or `int`.
    pub name: Ident,
    /// Number of `[]` suffixes.
    pub dims: u32,
}

impl TypeRef {
    /// Creates a type reference.
    pub fn new(name: Ident, dims: u32) -> Self {
        Self { name, dims }
    }

    /// Renders the type as source text.
    pub fn render(&self, interner: &Interner) -> String {
        let mut out = interner.resolve(self.name).to_string();
        for _ in 0..self.dims {
            out.push_str("[]");
        }
        out
    }
}

/// A method parameter.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Param {
    /// Declared type; a varargs parameter has one extra dimension.
    pub ty: TypeRef,
    /// Parameter name.
    pub name: Ident,
}

/// A field declaration.
#[derive(Clone, Debug)]
pub struct FieldDecl {
    /// Field name.
    pub name: Ident,
    /// Declared type.
    pub ty: TypeRef,
    /// Modifiers.
    pub modifiers: Modifiers,
    /// Declaration span.
    pub span: Span,
    /// Where the declaration came from.
    pub origin: Origin,
}

impl FieldDecl {
    /// Creates a source field with no modifiers and a dummy span.
    pub fn new(name: Ident, ty: TypeRef) -> Self {
        Self {
            name,
            ty,
            modifiers: Modifiers::empty(),
            span: Span::DUMMY,
            origin: Origin::Source,
        }
    }

    /// Sets the modifiers.
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Sets the declaration span.
    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Marks the field as supplied by an augmentation provider.
    pub fn augmented(mut self) -> Self {
        self.origin = Origin::Augmented;
        self
    }
}

/// A method or constructor declaration.
///
/// Besides the signature, this carries the flags a stub index records for a
/// method: constructor, varargs, annotation method with its default value,
/// and deprecation.
#[derive(Clone, Debug)]
pub struct MethodDecl {
    /// Method name; for constructors, the class name.
    pub name: Ident,
    /// Return type, `None` for constructors.
    pub return_type: Option<TypeRef>,
    /// Parameters in declaration order.
    pub params: Vec<Param>,
    /// Modifiers.
    pub modifiers: Modifiers,
    /// Declared thrown exception types.
    pub throws: Vec<TypeRef>,
    /// `true` for constructors.
    pub is_constructor: bool,
    /// `true` if the last parameter is variadic.
    pub is_varargs: bool,
    /// `true` for methods of annotation types.
    pub is_annotation_method: bool,
    /// Source text of an annotation method's `default` value.
    pub default_value_text: Option<String>,
    /// `true` if annotated `@Deprecated`.
    pub is_deprecated: bool,
    /// Declaration span.
    pub span: Span,
    /// Where the declaration came from.
    pub origin: Origin,
}

impl MethodDecl {
    /// Creates a source method with no parameters, modifiers, or flags.
    pub fn new(name: Ident, return_type: Option<TypeRef>) -> Self {
        Self {
            name,
            return_type,
            params: Vec::new(),
            modifiers: Modifiers::empty(),
            throws: Vec::new(),
            is_constructor: false,
            is_varargs: false,
            is_annotation_method: false,
            default_value_text: None,
            is_deprecated: false,
            span: Span::DUMMY,
            origin: Origin::Source,
        }
    }

    /// Creates a constructor of the class named `class_name`.
    pub fn constructor(class_name: Ident) -> Self {
        Self {
            is_constructor: true,
            ..Self::new(class_name, None)
        }
    }

    /// Appends a parameter.
    pub fn with_param(mut self, ty: TypeRef, name: Ident) -> Self {
        self.params.push(Param { ty, name });
        self
    }

    /// Sets the modifiers.
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Marks the method as supplied by an augmentation provider.
    pub fn augmented(mut self) -> Self {
        self.origin = Origin::Augmented;
        self
    }

    /// Returns `true` if the method is `static`.
    pub fn is_static(&self) -> bool {
        self.modifiers.contains(Modifiers::STATIC)
    }

    /// Renders the signature without a body, e.g.
    /// `public static Color valueOf(java.lang.String name)`.
    pub fn signature(&self, interner: &Interner) -> String {
        let mut out = String::new();
        for keyword in self.modifiers.keywords() {
            out.push_str(keyword);
            out.push(' ');
        }
        if let Some(ret) = &self.return_type {
            out.push_str(&ret.render(interner));
            out.push(' ');
        }
        out.push_str(interner.resolve(self.name));
        out.push('(');
        let last = self.params.len().saturating_sub(1);
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            if self.is_varargs && i == last {
                let element = TypeRef::new(param.ty.name, param.ty.dims.saturating_sub(1));
                let _ = write!(out, "{}...", element.render(interner));
            } else {
                out.push_str(&param.ty.render(interner));
            }
            out.push(' ');
            out.push_str(interner.resolve(param.name));
        }
        out.push(')');
        if !self.throws.is_empty() {
            out.push_str(" throws ");
            let thrown: Vec<_> = self.throws.iter().map(|t| t.render(interner)).collect();
            out.push_str(&thrown.join(", "));
        }
        out
    }
}

/// A shared handle to a [`FieldDecl`] held by a class.
///
/// Handles compare by identity: two handles are equal only if they point to
/// the same declaration.
#[derive(Clone, Debug)]
pub struct FieldRef(Arc<FieldDecl>);

impl FieldRef {
    /// Wraps a declaration.
    pub fn new(decl: FieldDecl) -> Self {
        Self(Arc::new(decl))
    }
}

impl Deref for FieldRef {
    type Target = FieldDecl;

    fn deref(&self) -> &FieldDecl {
        &self.0
    }
}

impl PartialEq for FieldRef {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for FieldRef {}

impl Member for FieldRef {
    fn name(&self) -> Option<Ident> {
        Some(self.0.name)
    }

    fn is_externally_defined(&self) -> bool {
        self.0.origin == Origin::Augmented
    }

    fn span(&self) -> Span {
        self.0.span
    }
}

/// A shared handle to a [`MethodDecl`] held by a class.
///
/// Handles compare by identity, like [`FieldRef`].
#[derive(Clone, Debug)]
pub struct MethodRef(Arc<MethodDecl>);

impl MethodRef {
    /// Wraps a declaration.
    pub fn new(decl: MethodDecl) -> Self {
        Self(Arc::new(decl))
    }
}

impl Deref for MethodRef {
    type Target = MethodDecl;

    fn deref(&self) -> &MethodDecl {
        &self.0
    }
}

impl PartialEq for MethodRef {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for MethodRef {}

impl Member for MethodRef {
    fn name(&self) -> Option<Ident> {
        Some(self.0.name)
    }

    fn is_externally_defined(&self) -> bool {
        self.0.origin == Origin::Augmented
    }

    fn span(&self) -> Span {
        self.0.span
    }
}

impl MethodMember for MethodRef {
    fn is_constructor(&self) -> bool {
        self.0.is_constructor
    }
}
