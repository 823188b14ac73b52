//! The class tree and its write commands.

use std::sync::{Mutex, PoisonError, RwLock};

use strata_common::{Ident, ModificationSource, ModificationTracker};
use strata_members::ClassOwner;
use thiserror::Error;

use crate::arena::Arena;
use crate::class::{ClassDecl, ClassNode, ClassRef};
use crate::decl::{FieldDecl, FieldRef, MethodDecl, MethodRef};
use crate::ids::ClassId;

/// Errors raised by structural edits.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    /// The edit referred to a class that is not in this tree.
    #[error("unknown class {0:?}")]
    UnknownClass(ClassId),
}

/// A set of classes plus the modification count of their structure.
///
/// All structural changes go through [`write_command`](Self::write_command),
/// which serializes writers and advances the modification count once per
/// command that changed anything. Reads never block each other.
pub struct ClassTree {
    classes: RwLock<Arena<ClassId, ClassRef>>,
    modifications: ModificationTracker,
    writer: Mutex<()>,
}

impl ClassTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self {
            classes: RwLock::new(Arena::new()),
            modifications: ModificationTracker::new(),
            writer: Mutex::new(()),
        }
    }

    /// Returns the class with the given ID.
    pub fn class(&self, id: ClassId) -> Option<ClassRef> {
        let classes = self.classes.read().unwrap_or_else(PoisonError::into_inner);
        classes.get(id).cloned()
    }

    /// Returns the first class, in creation order, named `name`.
    pub fn find_class(&self, name: Ident) -> Option<ClassRef> {
        let classes = self.classes.read().unwrap_or_else(PoisonError::into_inner);
        let found = classes
            .values()
            .find(|class| class.name() == Some(name))
            .cloned();
        found
    }

    /// Returns the number of classes, inner and anonymous ones included.
    pub fn len(&self) -> usize {
        self.classes.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns `true` if the tree holds no classes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Runs `edit` as one structural change named `name`.
    ///
    /// Commands run one at a time. If the command changed anything, the
    /// modification count is advanced exactly once when it finishes, whether
    /// `edit` returned `Ok` or `Err`. Edits already applied are kept.
    pub fn write_command<R, E>(
        &self,
        name: &str,
        edit: impl FnOnce(&mut TreeWriter<'_>) -> Result<R, E>,
    ) -> Result<R, E> {
        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let span = tracing::info_span!("write_command", command = name);
        let _enter = span.enter();

        let mut writer = TreeWriter {
            tree: self,
            changed: false,
        };
        let result = edit(&mut writer);
        if writer.changed {
            let count = self.modifications.increment();
            tracing::debug!(modification_count = count, "structure changed");
        } else {
            tracing::debug!("no structural change");
        }
        result
    }

    fn alloc(&self, decl: ClassDecl) -> Result<ClassRef, TreeError> {
        let mut classes = self.classes.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(super_class) = decl.super_class {
            if classes.get(super_class).is_none() {
                return Err(TreeError::UnknownClass(super_class));
            }
        }
        let id = classes.next_id();
        let class = ClassRef::new(ClassNode::new(id, decl));
        classes.alloc(class.clone());
        Ok(class)
    }

    fn require(&self, id: ClassId) -> Result<ClassRef, TreeError> {
        self.class(id).ok_or(TreeError::UnknownClass(id))
    }
}

impl Default for ClassTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ModificationSource for ClassTree {
    fn modification_count(&self) -> u64 {
        self.modifications.modification_count()
    }
}

/// Structural edits available inside a [`ClassTree::write_command`].
pub struct TreeWriter<'t> {
    tree: &'t ClassTree,
    changed: bool,
}

impl TreeWriter<'_> {
    /// Adds a top-level class.
    pub fn add_class(&mut self, decl: ClassDecl) -> Result<ClassId, TreeError> {
        let class = self.tree.alloc(decl)?;
        self.changed = true;
        Ok(class.id())
    }

    /// Adds a class nested in `outer`, after its existing inner classes.
    pub fn add_inner_class(&mut self, outer: ClassId, decl: ClassDecl) -> Result<ClassId, TreeError> {
        let outer = self.tree.require(outer)?;
        let class = self.tree.alloc(decl)?;
        outer.write_body(|body| body.inner.push(class.clone()));
        self.changed = true;
        Ok(class.id())
    }

    /// Appends a field to `class`.
    pub fn add_field(&mut self, class: ClassId, decl: FieldDecl) -> Result<FieldRef, TreeError> {
        let class = self.tree.require(class)?;
        let field = FieldRef::new(decl);
        class.write_body(|body| body.fields.push(field.clone()));
        self.changed = true;
        Ok(field)
    }

    /// Appends a method or constructor to `class`.
    pub fn add_method(&mut self, class: ClassId, decl: MethodDecl) -> Result<MethodRef, TreeError> {
        let class = self.tree.require(class)?;
        let method = MethodRef::new(decl);
        class.write_body(|body| body.methods.push(method.clone()));
        self.changed = true;
        Ok(method)
    }

    /// Removes the first field of `class` named `name`.
    pub fn remove_field(&mut self, class: ClassId, name: Ident) -> Result<Option<FieldRef>, TreeError> {
        let class = self.tree.require(class)?;
        let removed = class.write_body(|body| {
            let pos = body.fields.iter().position(|field| field.name == name)?;
            Some(body.fields.remove(pos))
        });
        self.changed |= removed.is_some();
        Ok(removed)
    }

    /// Removes every method of `class` named `name`, returning them in
    /// declaration order.
    pub fn remove_method(&mut self, class: ClassId, name: Ident) -> Result<Vec<MethodRef>, TreeError> {
        let class = self.tree.require(class)?;
        let removed = class.write_body(|body| {
            let (removed, kept) = std::mem::take(&mut body.methods)
                .into_iter()
                .partition::<Vec<_>, _>(|method| method.name == name);
            body.methods = kept;
            removed
        });
        self.changed |= !removed.is_empty();
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::ClassKind;
    use crate::decl::TypeRef;
    use strata_common::Interner;

    fn point(tree: &ClassTree, interner: &Interner) -> ClassId {
        tree.write_command("add Point", |w| {
            w.add_class(ClassDecl::new(interner.get_or_intern("Point"), ClassKind::Class))
        })
        .unwrap()
    }

    #[test]
    fn each_changing_command_bumps_once() {
        let interner = Interner::new();
        let tree = ClassTree::new();
        assert_eq!(tree.modification_count(), 0);

        let id = point(&tree, &interner);
        assert_eq!(tree.modification_count(), 1);

        let int = TypeRef::new(interner.get_or_intern("int"), 0);
        tree.write_command("add fields", |w| {
            w.add_field(id, FieldDecl::new(interner.get_or_intern("x"), int))?;
            w.add_field(id, FieldDecl::new(interner.get_or_intern("y"), int))?;
            Ok::<_, TreeError>(())
        })
        .unwrap();
        assert_eq!(tree.modification_count(), 2);
        assert_eq!(tree.class(id).unwrap().own_fields().len(), 2);
    }

    #[test]
    fn no_op_command_does_not_bump() {
        let interner = Interner::new();
        let tree = ClassTree::new();
        let id = point(&tree, &interner);
        let removed = tree
            .write_command("remove missing", |w| w.remove_field(id, interner.get_or_intern("z")))
            .unwrap();
        assert!(removed.is_none());
        assert_eq!(tree.modification_count(), 1);
    }

    #[test]
    fn failed_command_keeps_applied_edits() {
        let interner = Interner::new();
        let tree = ClassTree::new();
        let id = point(&tree, &interner);
        let result = tree.write_command("partial", |w| {
            w.add_method(id, MethodDecl::constructor(interner.get_or_intern("Point")))?;
            w.add_method(ClassId::from_raw(99), MethodDecl::constructor(interner.get_or_intern("Point")))
        });
        assert_eq!(result, Err(TreeError::UnknownClass(ClassId::from_raw(99))));
        assert_eq!(tree.modification_count(), 2);
        assert_eq!(tree.class(id).unwrap().own_methods().len(), 1);
    }

    #[test]
    fn remove_method_takes_all_overloads() {
        let interner = Interner::new();
        let tree = ClassTree::new();
        let id = point(&tree, &interner);
        let move_by = interner.get_or_intern("moveBy");
        let int = TypeRef::new(interner.get_or_intern("int"), 0);
        tree.write_command("add overloads", |w| {
            w.add_method(id, MethodDecl::new(move_by, None).with_param(int, interner.get_or_intern("dx")))?;
            w.add_method(id, MethodDecl::new(interner.get_or_intern("norm"), None))?;
            w.add_method(id, MethodDecl::new(move_by, None))
        })
        .unwrap();
        let removed = tree.write_command("remove", |w| w.remove_method(id, move_by)).unwrap();
        assert_eq!(removed.len(), 2);
        assert_eq!(removed[0].params.len(), 1);
        let left = tree.class(id).unwrap().own_methods();
        assert_eq!(left.len(), 1);
        assert_eq!(interner.resolve(left[0].name), "norm");
    }

    #[test]
    fn inner_classes_and_lookup() {
        let interner = Interner::new();
        let tree = ClassTree::new();
        let outer = point(&tree, &interner);
        let inner = tree
            .write_command("add inner", |w| {
                w.add_inner_class(outer, ClassDecl::new(interner.get_or_intern("Polar"), ClassKind::Class))
            })
            .unwrap();
        assert_eq!(tree.len(), 2);
        let outer_node = tree.class(outer).unwrap();
        assert_eq!(outer_node.own_inner_types()[0].id(), inner);
        let found = tree.find_class(interner.get_or_intern("Polar")).unwrap();
        assert_eq!(found.id(), inner);
    }

    #[test]
    fn unknown_super_class_is_rejected() {
        let interner = Interner::new();
        let tree = ClassTree::new();
        let result = tree.write_command("bad extends", |w| {
            w.add_class(
                ClassDecl::new(interner.get_or_intern("Sub"), ClassKind::Class).extends(ClassId::from_raw(7)),
            )
        });
        assert_eq!(result, Err(TreeError::UnknownClass(ClassId::from_raw(7))));
        assert!(tree.is_empty());
        assert_eq!(tree.modification_count(), 0);
    }
}
