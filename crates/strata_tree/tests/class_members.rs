//! Integration tests for member caches over a live class tree.
//!
//! These tests build classes through write commands, query them through
//! [`ClassMembers`], and check that results follow structural changes,
//! augmentation, hierarchy lookups, and project configuration.

use std::fs;

use strata_common::{Ident, Interner, ModificationSource};
use strata_config::{load_config, MalformedSeverity, MemberSettings};
use strata_diagnostics::{DiagnosticSink, Severity};
use strata_members::{AugmentProvider, ClassMembers, ClassOwner, MemberEnv, Member, MethodMember};
use strata_source::{FileId, Span};
use strata_tree::{
    ClassDecl, ClassId, ClassKind, ClassNode, ClassRef, ClassTree, FieldDecl, FieldRef, MethodDecl,
    MethodRef, Modifiers, Origin, TreeElementFactory, TreeError, TreeResolver, TypeRef,
};
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Fixture
// ---------------------------------------------------------------------------

struct Project {
    interner: Interner,
    sink: DiagnosticSink,
    tree: ClassTree,
}

impl Project {
    fn new() -> Self {
        Self {
            interner: Interner::new(),
            sink: DiagnosticSink::new(),
            tree: ClassTree::new(),
        }
    }

    fn ident(&self, name: &str) -> Ident {
        self.interner.get_or_intern(name)
    }

    fn ty(&self, name: &str) -> TypeRef {
        TypeRef::new(self.ident(name), 0)
    }

    fn class(&self, id: ClassId) -> ClassRef {
        self.tree.class(id).unwrap()
    }

    /// `enum Color { RED, GREEN; private final int rgb; Color(int rgb) {} }`
    fn color(&self) -> ClassId {
        let span = Span::new(FileId::from_raw(0), 120, 300);
        self.tree
            .write_command("add Color", |w| {
                let color = w.add_class(ClassDecl::new(self.ident("Color"), ClassKind::Enum).at(span))?;
                let mods = Modifiers::PUBLIC | Modifiers::STATIC | Modifiers::FINAL;
                w.add_field(color, FieldDecl::new(self.ident("RED"), self.ty("Color")).with_modifiers(mods))?;
                w.add_field(color, FieldDecl::new(self.ident("GREEN"), self.ty("Color")).with_modifiers(mods))?;
                w.add_field(
                    color,
                    FieldDecl::new(self.ident("rgb"), self.ty("int"))
                        .with_modifiers(Modifiers::PRIVATE | Modifiers::FINAL),
                )?;
                w.add_method(
                    color,
                    MethodDecl::constructor(self.ident("Color")).with_param(self.ty("int"), self.ident("rgb")),
                )?;
                Ok::<_, TreeError>(color)
            })
            .unwrap()
    }

    /// `class Point { int x; int y; Point() {} double norm() {} class Polar {} }`
    fn point(&self) -> ClassId {
        self.tree
            .write_command("add Point", |w| {
                let point = w.add_class(ClassDecl::new(self.ident("Point"), ClassKind::Class))?;
                w.add_field(point, FieldDecl::new(self.ident("x"), self.ty("int")))?;
                w.add_field(point, FieldDecl::new(self.ident("y"), self.ty("int")))?;
                w.add_method(point, MethodDecl::constructor(self.ident("Point")))?;
                w.add_method(point, MethodDecl::new(self.ident("norm"), Some(self.ty("double"))))?;
                w.add_inner_class(point, ClassDecl::new(self.ident("Polar"), ClassKind::Class))?;
                Ok::<_, TreeError>(point)
            })
            .unwrap()
    }
}

/// Adds what an accessor-generating annotation processor would: an
/// all-arguments constructor, a getter per field, and an `x` field that
/// collides with the declared one.
struct Accessors<'a> {
    interner: &'a Interner,
}

impl AugmentProvider<ClassNode> for Accessors<'_> {
    fn fields(&self, _owner: &ClassNode) -> Vec<FieldRef> {
        let int = TypeRef::new(self.interner.get_or_intern("int"), 0);
        vec![
            FieldRef::new(FieldDecl::new(self.interner.get_or_intern("x"), int).augmented()),
            FieldRef::new(FieldDecl::new(self.interner.get_or_intern("log"), int).augmented()),
        ]
    }

    fn methods(&self, owner: &ClassNode) -> Vec<MethodRef> {
        let Some(name) = ClassOwner::name(owner) else {
            return Vec::new();
        };
        let mut ctor = MethodDecl::constructor(name).augmented();
        let mut getters = Vec::new();
        for field in owner.own_fields() {
            ctor = ctor.with_param(field.ty, field.name);
            let getter = format!("get{}", capitalize(self.interner.resolve(field.name)));
            getters.push(MethodRef::new(
                MethodDecl::new(self.interner.get_or_intern(&getter), Some(field.ty)).augmented(),
            ));
        }
        let mut methods = vec![MethodRef::new(ctor)];
        methods.extend(getters);
        methods
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ---------------------------------------------------------------------------
// Member lists and invalidation
// ---------------------------------------------------------------------------

#[test]
fn members_follow_write_commands() {
    let p = Project::new();
    let id = p.point();
    let point = p.class(id);
    let factory = TreeElementFactory::new(&p.interner, &p.sink);
    let resolver = TreeResolver::new(&p.tree);
    let members = ClassMembers::new(
        &*point,
        MemberEnv::new(&p.tree, &factory, &resolver, &p.interner, &p.sink),
    );

    assert_eq!(members.fields().len(), 2);
    assert_eq!(members.methods().len(), 2);
    assert_eq!(members.constructors().len(), 1);
    assert_eq!(members.inner_types().len(), 1);
    let z = p.ident("z");
    assert!(members.find_field(z, false).is_none());

    p.tree
        .write_command("add z", |w| w.add_field(id, FieldDecl::new(z, p.ty("int"))))
        .unwrap();

    let fields = members.fields();
    assert_eq!(fields.len(), 3);
    assert_eq!(members.find_field(z, false), Some(fields[2].clone()));

    let norm = p.ident("norm");
    p.tree.write_command("remove norm", |w| w.remove_method(id, norm)).unwrap();
    assert!(members.find_methods(norm, false).is_empty());
    assert_eq!(members.methods().len(), 1);
}

#[test]
fn unrelated_command_without_changes_keeps_entries() {
    let p = Project::new();
    let id = p.point();
    let point = p.class(id);
    let factory = TreeElementFactory::new(&p.interner, &p.sink);
    let resolver = TreeResolver::new(&p.tree);
    let members = ClassMembers::new(
        &*point,
        MemberEnv::new(&p.tree, &factory, &resolver, &p.interner, &p.sink),
    );

    members.fields();
    let before = members.computations();
    let count = p.tree.modification_count();

    p.tree
        .write_command("remove nothing", |w| w.remove_field(id, p.ident("missing")))
        .unwrap();
    assert_eq!(p.tree.modification_count(), count);
    members.fields();
    assert_eq!(members.computations(), before);
}

#[test]
fn drop_caches_recomputes_without_tree_change() {
    let p = Project::new();
    let point = p.class(p.point());
    let factory = TreeElementFactory::new(&p.interner, &p.sink);
    let resolver = TreeResolver::new(&p.tree);
    let members = ClassMembers::new(
        &*point,
        MemberEnv::new(&p.tree, &factory, &resolver, &p.interner, &p.sink),
    );

    let first = members.methods();
    members.drop_caches();
    let second = members.methods();
    assert_eq!(first, second);
    assert_eq!(members.computations(), 2);
}

// ---------------------------------------------------------------------------
// Synthetic enum methods
// ---------------------------------------------------------------------------

#[test]
fn enum_values_and_value_of() {
    let p = Project::new();
    let color = p.class(p.color());
    let factory = TreeElementFactory::new(&p.interner, &p.sink);
    let resolver = TreeResolver::new(&p.tree);
    let members = ClassMembers::new(
        &*color,
        MemberEnv::new(&p.tree, &factory, &resolver, &p.interner, &p.sink),
    );

    let values = members.values_method().unwrap().unwrap();
    assert_eq!(values.method().signature(&p.interner), "public static Color[] values()");
    assert_eq!(values.method().origin, Origin::Synthetic);
    assert!(!values.is_physical());
    assert_eq!(values.span(), color.span());
    assert_eq!(values.text_offset(), 120);

    let value_of = members.value_of_method().unwrap().unwrap();
    assert_eq!(
        value_of.method().signature(&p.interner),
        "public static Color valueOf(java.lang.String name) throws java.lang.IllegalArgumentException"
    );
    assert!(!value_of.is_constructor());

    // neither is added to the class
    assert!(members.find_methods(p.ident("values"), false).is_empty());
    assert!(p.sink.is_empty());
}

#[test]
fn enum_methods_are_cached_per_modification() {
    let p = Project::new();
    let id = p.color();
    let color = p.class(id);
    let factory = TreeElementFactory::new(&p.interner, &p.sink);
    let resolver = TreeResolver::new(&p.tree);
    let members = ClassMembers::new(
        &*color,
        MemberEnv::new(&p.tree, &factory, &resolver, &p.interner, &p.sink),
    );

    let a = members.values_method().unwrap().unwrap();
    let b = members.values_method().unwrap().unwrap();
    assert_eq!(a.method(), b.method());

    p.tree
        .write_command("add BLUE", |w| w.add_field(id, FieldDecl::new(p.ident("BLUE"), p.ty("Color"))))
        .unwrap();
    let c = members.values_method().unwrap().unwrap();
    assert_ne!(a.method(), c.method());
}

#[test]
fn no_enum_methods_for_plain_classes() {
    let p = Project::new();
    let point = p.class(p.point());
    let factory = TreeElementFactory::new(&p.interner, &p.sink);
    let resolver = TreeResolver::new(&p.tree);
    let members = ClassMembers::new(
        &*point,
        MemberEnv::new(&p.tree, &factory, &resolver, &p.interner, &p.sink),
    );

    assert!(members.values_method().unwrap().is_none());
    assert!(members.value_of_method().unwrap().is_none());
}

#[test]
fn enum_methods_for_non_ascii_and_dollar_names() {
    let p = Project::new();
    for name in ["Größe", "Level$_2", "_État"] {
        let id = p
            .tree
            .write_command("add enum", |w| w.add_class(ClassDecl::new(p.ident(name), ClassKind::Enum)))
            .unwrap();
        let owner = p.class(id);
        let factory = TreeElementFactory::new(&p.interner, &p.sink);
        let resolver = TreeResolver::new(&p.tree);
        let members = ClassMembers::new(
            &*owner,
            MemberEnv::new(&p.tree, &factory, &resolver, &p.interner, &p.sink),
        );

        let values = members.values_method().unwrap().unwrap();
        assert_eq!(
            values.method().signature(&p.interner),
            format!("public static {name}[] values()")
        );
        let value_of = members.value_of_method().unwrap().unwrap();
        assert_eq!(
            value_of.method().signature(&p.interner),
            format!(
                "public static {name} valueOf(java.lang.String name) throws java.lang.IllegalArgumentException"
            )
        );
    }
    assert!(p.sink.is_empty());
}

// ---------------------------------------------------------------------------
// Augmentation and hierarchy
// ---------------------------------------------------------------------------

#[test]
fn augmented_members_are_appended() {
    let p = Project::new();
    let point = p.class(p.point());
    let factory = TreeElementFactory::new(&p.interner, &p.sink);
    let resolver = TreeResolver::new(&p.tree);
    let accessors = Accessors { interner: &p.interner };
    let env = MemberEnv::new(&p.tree, &factory, &resolver, &p.interner, &p.sink).with_augments(&accessors);
    let members = ClassMembers::new(&*point, env);

    let fields = members.fields();
    let names: Vec<_> = fields.iter().map(|f| p.interner.resolve(f.name)).collect();
    assert_eq!(names, vec!["x", "y", "x", "log"]);

    // the declared `x` shadows the augmented one
    let x = members.find_field(p.ident("x"), false).unwrap();
    assert!(!x.is_externally_defined());
    assert!(members.find_field(p.ident("log"), false).unwrap().is_externally_defined());

    let ctors = members.constructors();
    assert_eq!(ctors.len(), 2);
    assert!(ctors[1].is_externally_defined());
    assert_eq!(ctors[1].params.len(), 2);

    let getters = members.find_methods(p.ident("getY"), false);
    assert_eq!(getters.len(), 1);
    assert_eq!(p.interner.resolve(getters[0].return_type.unwrap().name), "int");
}

#[test]
fn check_bases_searches_super_classes() {
    let p = Project::new();
    let point = p.point();
    let labeled = p
        .tree
        .write_command("add LabeledPoint", |w| {
            let id = w.add_class(ClassDecl::new(p.ident("LabeledPoint"), ClassKind::Class).extends(point))?;
            w.add_field(id, FieldDecl::new(p.ident("label"), p.ty("String")))?;
            Ok::<_, TreeError>(id)
        })
        .unwrap();
    let labeled = p.class(labeled);
    let factory = TreeElementFactory::new(&p.interner, &p.sink);
    let resolver = TreeResolver::new(&p.tree);
    let members = ClassMembers::new(
        &*labeled,
        MemberEnv::new(&p.tree, &factory, &resolver, &p.interner, &p.sink),
    );

    let x = p.ident("x");
    assert!(members.find_field(x, false).is_none());
    assert_eq!(members.find_field(x, true), Some(p.class(point).own_fields()[0].clone()));

    let norm = p.ident("norm");
    assert!(members.find_methods(norm, false).is_empty());
    assert_eq!(members.find_methods(norm, true).len(), 1);

    let polar = p.ident("Polar");
    assert!(members.find_inner_type(polar, false).is_none());
    assert!(members.find_inner_type(polar, true).is_some());

    // bases lookups never fill the cache
    assert_eq!(members.computations(), 6);
}

// ---------------------------------------------------------------------------
// Malformed members
// ---------------------------------------------------------------------------

#[test]
fn anonymous_inner_class_reported_once_per_computation() {
    let p = Project::new();
    let id = p.point();
    p.tree
        .write_command("add anonymous", |w| w.add_inner_class(id, ClassDecl::anonymous()))
        .unwrap();
    let point = p.class(id);
    let factory = TreeElementFactory::new(&p.interner, &p.sink);
    let resolver = TreeResolver::new(&p.tree);
    let members = ClassMembers::new(
        &*point,
        MemberEnv::new(&p.tree, &factory, &resolver, &p.interner, &p.sink),
    );

    assert_eq!(members.inner_types().len(), 2);
    assert!(members.find_inner_type(p.ident("Polar"), false).is_some());
    assert!(members.find_inner_type(p.ident("Missing"), false).is_none());

    let diags = p.sink.take_all();
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].code.to_string(), "E301");
    assert_eq!(diags[0].message, "inner type of `Point` has no name");

    members.drop_caches();
    members.find_inner_type(p.ident("Polar"), false);
    assert_eq!(p.sink.len(), 1);
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[test]
fn settings_loaded_from_project_directory() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("strata.toml"),
        r#"
[project]
name = "palette"

[members]
collect_augments = false
synthesize_enum_methods = false
malformed_severity = "warning"
"#,
    )
    .unwrap();
    let config = load_config(dir.path()).unwrap();
    assert_eq!(config.members.malformed_severity, MalformedSeverity::Warning);

    let p = Project::new();
    let color_id = p.color();
    p.tree
        .write_command("add anonymous", |w| w.add_inner_class(color_id, ClassDecl::anonymous()))
        .unwrap();
    let color = p.class(color_id);
    let factory = TreeElementFactory::new(&p.interner, &p.sink);
    let resolver = TreeResolver::new(&p.tree);
    let accessors = Accessors { interner: &p.interner };
    let env = MemberEnv::new(&p.tree, &factory, &resolver, &p.interner, &p.sink)
        .with_augments(&accessors)
        .with_settings(config.members);
    let members = ClassMembers::new(&*color, env);

    assert_eq!(members.fields().len(), 3);
    assert_eq!(members.constructors().len(), 1);
    assert!(members.values_method().unwrap().is_none());
    assert!(members.value_of_method().unwrap().is_none());

    members.find_inner_type(p.ident("Shade"), false);
    let diags = p.sink.take_all();
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].severity, Severity::Warning);
}

#[test]
fn default_settings_collect_everything() {
    let settings = MemberSettings::default();
    assert!(settings.collect_augments);
    assert!(settings.synthesize_enum_methods);
    assert_eq!(settings.malformed_severity, MalformedSeverity::Error);
}

// ---------------------------------------------------------------------------
// Concurrency
// ---------------------------------------------------------------------------

#[test]
fn concurrent_readers_compute_once() {
    let p = Project::new();
    let color = p.class(p.color());
    let factory = TreeElementFactory::new(&p.interner, &p.sink);
    let resolver = TreeResolver::new(&p.tree);
    let members = ClassMembers::new(
        &*color,
        MemberEnv::new(&p.tree, &factory, &resolver, &p.interner, &p.sink),
    );
    let rgb = p.ident("rgb");

    std::thread::scope(|s| {
        for _ in 0..8 {
            s.spawn(|| {
                for _ in 0..50 {
                    assert!(members.find_field(rgb, false).is_some());
                    assert!(members.values_method().unwrap().is_some());
                }
            });
        }
    });

    // fields, field index, and values()
    assert_eq!(members.computations(), 3);
}
