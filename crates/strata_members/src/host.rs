//! Collaborators a member cache consumes from its host.

use strata_common::{Ident, Interner, ModificationSource, StrataResult};
use strata_config::MemberSettings;
use strata_diagnostics::DiagnosticSink;

use crate::owner::ClassOwner;

/// Supplies members that are not declared by the owner itself.
///
/// Every method defaults to "no extra members". Returned order is preserved
/// and appended after the owner's own members.
pub trait AugmentProvider<O: ClassOwner>: Send + Sync {
    /// Extra fields for `owner`.
    fn fields(&self, _owner: &O) -> Vec<O::Field> {
        Vec::new()
    }

    /// Extra methods and constructors for `owner`.
    fn methods(&self, _owner: &O) -> Vec<O::Method> {
        Vec::new()
    }

    /// Extra inner types for `owner`.
    fn inner_types(&self, _owner: &O) -> Vec<O::InnerType> {
        Vec::new()
    }
}

/// An augmentation provider that never adds anything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoAugments;

impl<O: ClassOwner> AugmentProvider<O> for NoAugments {}

/// Turns method source text into a method member attached to an owner.
pub trait ElementFactory<O: ClassOwner>: Send + Sync {
    /// Parses `text` as a single method declaration in the context of `context`.
    ///
    /// Only internally generated text is passed here, so a parse failure is
    /// an [`InternalError`](strata_common::InternalError).
    fn create_method_from_text(&self, text: &str, context: &O) -> StrataResult<O::Method>;
}

/// Looks up members across the owner's whole type hierarchy.
///
/// Used when a lookup asks to check bases; the member cache never answers
/// those queries from its own entries.
pub trait HierarchyResolver<O: ClassOwner>: Send + Sync {
    /// Finds the first field named `name` in `owner` or its supertypes.
    fn find_field(&self, owner: &O, name: Ident) -> Option<O::Field>;

    /// Finds all methods named `name` in `owner` and its supertypes.
    fn find_methods(&self, owner: &O, name: Ident) -> Vec<O::Method>;

    /// Finds the first inner type named `name` in `owner` or its supertypes.
    fn find_inner_type(&self, owner: &O, name: Ident) -> Option<O::InnerType>;
}

/// The collaborators and settings a [`ClassMembers`](crate::ClassMembers) works against.
pub struct MemberEnv<'a, O: ClassOwner> {
    /// The host's modification count.
    pub modifications: &'a dyn ModificationSource,
    /// Supplier of augmented members.
    pub augments: &'a dyn AugmentProvider<O>,
    /// Parser for synthetic method text.
    pub factory: &'a dyn ElementFactory<O>,
    /// Full-hierarchy lookups.
    pub resolver: &'a dyn HierarchyResolver<O>,
    /// Resolves owner names for synthetic method text.
    pub interner: &'a Interner,
    /// Receives malformed-member diagnostics.
    pub sink: &'a DiagnosticSink,
    /// Cache behavior loaded from configuration.
    pub settings: MemberSettings,
}

impl<'a, O: ClassOwner> MemberEnv<'a, O> {
    /// Creates an environment with no augmentations and default settings.
    pub fn new(
        modifications: &'a dyn ModificationSource,
        factory: &'a dyn ElementFactory<O>,
        resolver: &'a dyn HierarchyResolver<O>,
        interner: &'a Interner,
        sink: &'a DiagnosticSink,
    ) -> Self {
        Self {
            modifications,
            augments: &NoAugments,
            factory,
            resolver,
            interner,
            sink,
            settings: MemberSettings::default(),
        }
    }

    /// Uses `augments` as the augmentation provider.
    pub fn with_augments(mut self, augments: &'a dyn AugmentProvider<O>) -> Self {
        self.augments = augments;
        self
    }

    /// Replaces the settings.
    pub fn with_settings(mut self, settings: MemberSettings) -> Self {
        self.settings = settings;
        self
    }
}
