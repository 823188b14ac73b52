//! Hierarchy lookups over a class tree.

use std::collections::HashSet;

use strata_common::Ident;
use strata_members::{ClassOwner, HierarchyResolver, Member};

use crate::class::{ClassNode, ClassRef};
use crate::decl::{FieldRef, MethodRef};
use crate::ids::ClassId;
use crate::tree::ClassTree;

/// Resolves members through a class and its chain of super classes.
///
/// Only declared members are searched; augmented members of super classes
/// are not seen.
pub struct TreeResolver<'t> {
    tree: &'t ClassTree,
}

impl<'t> TreeResolver<'t> {
    /// Creates a resolver over `tree`.
    pub fn new(tree: &'t ClassTree) -> Self {
        Self { tree }
    }

    /// Visits `owner`, then each super class in turn, until `visit` returns
    /// `Some`. Stops at a class already visited.
    fn walk<T>(&self, owner: &ClassNode, mut visit: impl FnMut(&ClassNode) -> Option<T>) -> Option<T> {
        if let Some(found) = visit(owner) {
            return Some(found);
        }
        let mut seen: HashSet<ClassId> = HashSet::from([owner.id()]);
        let mut next = owner.super_class();
        while let Some(id) = next {
            if !seen.insert(id) {
                tracing::warn!(class = ?id, "cyclic super class chain");
                break;
            }
            let Some(class) = self.tree.class(id) else {
                break;
            };
            if let Some(found) = visit(&*class) {
                return Some(found);
            }
            next = class.super_class();
        }
        None
    }
}

impl HierarchyResolver<ClassNode> for TreeResolver<'_> {
    fn find_field(&self, owner: &ClassNode, name: Ident) -> Option<FieldRef> {
        self.walk(owner, |class| {
            class.own_fields().into_iter().find(|field| field.name == name)
        })
    }

    fn find_methods(&self, owner: &ClassNode, name: Ident) -> Vec<MethodRef> {
        let mut found = Vec::new();
        self.walk(owner, |class| {
            let inherited = class.id() != owner.id();
            found.extend(
                class
                    .own_methods()
                    .into_iter()
                    .filter(|method| method.name == name && !(inherited && method.is_constructor)),
            );
            None::<()>
        });
        found
    }

    fn find_inner_type(&self, owner: &ClassNode, name: Ident) -> Option<ClassRef> {
        self.walk(owner, |class| {
            class
                .own_inner_types()
                .into_iter()
                .find(|inner| Member::name(inner) == Some(name))
        })
    }
}
