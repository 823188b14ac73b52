//! In-memory host for class member caches.
//!
//! This crate provides a mutable [`ClassTree`] of [`ClassNode`]s whose
//! structural changes are made through serialized write commands and
//! counted by a tree-wide modification tracker. It also provides the
//! collaborators a [`ClassMembers`](strata_members::ClassMembers) cache needs:
//! a method-signature parser exposed as an element factory, and a resolver
//! that searches the super-class chain.

#![warn(missing_docs)]

pub mod arena;
pub mod class;
pub mod decl;
pub mod factory;
pub mod ids;
pub mod lexer;
pub mod parser;
pub mod resolver;
pub mod token;
pub mod tree;

pub use class::{ClassDecl, ClassKind, ClassNode, ClassRef};
pub use decl::{FieldDecl, FieldRef, MethodDecl, MethodRef, Modifiers, Origin, Param, TypeRef};
pub use factory::TreeElementFactory;
pub use ids::ClassId;
pub use parser::{parse_method, MethodContext, ParseError};
pub use resolver::TreeResolver;
pub use tree::{ClassTree, TreeError, TreeWriter};
