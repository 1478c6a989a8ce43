//! End-to-end resolution through the `dexter` facade.
//!
//! Builds a small program hierarchy the way a class-file reader would (from
//! binary names and descriptors), then runs the queries an optimizer pass
//! issues while rewriting invokes.

use dexter::graph::ClassKind;
use dexter::tracing_config::LogFormat;
use dexter::{
    AccessFlags, ClassDef, ClassStore, GraphError, GraphOptions, HierarchySnapshot,
    HierarchyStore, MethodRef, ResolutionResult, TypeId, TypeInterner,
};
use std::sync::Arc;

const PUBLIC: AccessFlags = AccessFlags::PUBLIC;
const PUBLIC_ABSTRACT: AccessFlags = AccessFlags::PUBLIC.union(AccessFlags::ABSTRACT);

struct Program {
    interner: Arc<TypeInterner>,
    store: Arc<ClassStore>,
}

impl Program {
    fn new() -> Self {
        let interner = Arc::new(TypeInterner::new());
        let store = Arc::new(ClassStore::new());
        let object = ClassDef::class(TypeId::OBJECT, None)
            .with_kind(ClassKind::Library)
            .with_method(
                interner.method_sig("toString", "()Ljava/lang/String;").expect("descriptor"),
                PUBLIC,
            )
            .with_method(
                interner.method_sig("clone", "()Ljava/lang/Object;").expect("descriptor"),
                AccessFlags::PROTECTED | AccessFlags::NATIVE,
            );
        store.insert(&interner, object).expect("object");
        Self { interner, store }
    }

    fn ty(&self, name: &str) -> TypeId {
        self.interner.class_named(name)
    }

    fn define(&self, class: ClassDef) {
        self.store.insert(&self.interner, class).expect("new class");
    }

    fn snapshot(&self) -> HierarchySnapshot {
        let store: Arc<dyn HierarchyStore> = self.store.clone();
        HierarchySnapshot::new(Arc::clone(&self.interner), store)
    }
}

#[test]
fn test_collection_hierarchy() {
    let program = Program::new();
    let interner = &program.interner;
    let size = interner.method_sig("size", "()I").expect("descriptor");
    let is_empty = interner.method_sig("isEmpty", "()Z").expect("descriptor");
    let (collection, list, abstract_list, array_list) = (
        program.ty("demo/Collection"),
        program.ty("demo/List"),
        program.ty("demo/AbstractList"),
        program.ty("demo/ArrayList"),
    );

    program.define(
        ClassDef::interface(collection)
            .with_method(size, PUBLIC_ABSTRACT)
            .with_method(is_empty, PUBLIC),
    );
    program.define(ClassDef::interface(list).with_interfaces([collection]));
    program.define(
        ClassDef::class(abstract_list, Some(TypeId::OBJECT))
            .with_access_flags(PUBLIC_ABSTRACT)
            .with_interfaces([list]),
    );
    program.define(ClassDef::class(array_list, Some(abstract_list)).with_method(size, PUBLIC));
    let snapshot = program.snapshot();

    // invokevirtual ArrayList.size()I
    let result = snapshot.resolve_method_on_class(array_list, size);
    assert_eq!(result.resolved_holder(), Some(array_list));
    assert!(result.is_virtual_target());

    // invokevirtual ArrayList.isEmpty()Z picks the default method.
    let result = snapshot.resolve_method_on_class(array_list, is_empty);
    assert_eq!(result.initial_holder(), Some(array_list));
    assert_eq!(result.resolved_holder(), Some(collection));

    // invokeinterface List.toString()
    let to_string = interner.method_sig("toString", "()Ljava/lang/String;").expect("descriptor");
    let result = snapshot.resolve_method_on_interface(list, to_string);
    assert_eq!(result.resolved_holder(), Some(TypeId::OBJECT));
    assert_eq!(
        interner.display_method(&result.resolved_method().expect("single").method),
        "java.lang.Object.toString()Ljava/lang/String;"
    );

    // invokevirtual on an interface holder fails.
    assert_eq!(
        snapshot.resolve_method_on_class(list, size),
        ResolutionResult::incompatible_class()
    );

    // Array clone is special.
    let strings = interner.intern_descriptor("[Ljava/lang/String;").expect("descriptor");
    let clone = interner.method_sig("clone", "()Ljava/lang/Object;").expect("descriptor");
    assert!(snapshot.resolve_method_on_class(strings, clone).is_array_clone());
}

#[test]
fn test_optimizer_round() {
    let program = Program::new();
    let interner = &program.interner;
    let run = interner.method_sig("run", "()V").expect("descriptor");
    let task = program.ty("demo/Task");
    program.define(ClassDef::class(task, Some(TypeId::OBJECT)));

    let before = program.snapshot();
    assert_eq!(before.resolve_method_on_class(task, run), ResolutionResult::NoSuchMethod);

    // A pass adds a synthetic companion and a method on Task.
    let companion = program.ty("demo/Task$Companion");
    before
        .add_synthesized_class(ClassDef::class(companion, Some(TypeId::OBJECT)).with_method(run, PUBLIC))
        .expect("new class");
    program
        .store
        .replace(ClassDef::class(task, Some(TypeId::OBJECT)).with_method(run, PUBLIC));

    let after = before.new_snapshot(&[task]);
    assert!(before.is_obsolete());
    assert_eq!(after.resolve_method_on_class(task, run).resolved_holder(), Some(task));
    assert_eq!(
        after.resolve_method_on_class(companion, run).resolved_holder(),
        Some(companion)
    );
    assert!(
        after
            .lookup_direct_target_on_itself(&MethodRef::new(task, run), task)
            .is_none()
    );

    let err = after
        .add_synthesized_class(ClassDef::class(task, Some(TypeId::OBJECT)))
        .expect_err("task is a store class");
    assert!(matches!(err, GraphError::DuplicateClass { .. }));
}

#[test]
fn test_options_from_json() {
    let options = GraphOptions::from_json_str(r#"{ "maxHierarchyDepth": 2 }"#).expect("valid");
    let program = Program::new();
    let store: Arc<dyn HierarchyStore> = program.store.clone();
    let snapshot = HierarchySnapshot::with_options(Arc::clone(&program.interner), store, options);
    assert_eq!(snapshot.options().max_hierarchy_depth, 2);
}

#[test]
fn test_log_format_parsing() {
    assert_eq!(LogFormat::parse("tree"), LogFormat::Tree);
    assert_eq!(LogFormat::parse(" JSON "), LogFormat::Json);
    assert_eq!(LogFormat::parse("text"), LogFormat::Text);
    assert_eq!(LogFormat::parse("pretty"), LogFormat::Text);
    assert_eq!(LogFormat::default(), LogFormat::Text);
}
