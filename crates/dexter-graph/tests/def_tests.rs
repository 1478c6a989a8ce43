use super::*;
use crate::test_fixtures::{Fixture, PRIVATE, PUBLIC, PUBLIC_ABSTRACT, PUBLIC_STATIC};

#[test]
fn test_interface_defaults() {
    let fixture = Fixture::new();
    let iface = fixture.interface("p/I");
    assert!(iface.is_interface());
    assert!(iface.access_flags.is_abstract());
    assert_eq!(iface.super_type, Some(TypeId::OBJECT));
    assert_eq!(iface.kind, ClassKind::Program);

    let class = fixture.class("p/A", "java/lang/Object");
    assert!(!class.is_interface());
}

#[test]
fn test_with_method_rewrites_holder() {
    let fixture = Fixture::new();
    let run = fixture.sig("run", "()V");
    let class = fixture
        .class("p/A", "java/lang/Object")
        .with_method(run, PUBLIC);

    let method = class.lookup_method(&run).expect("declared");
    assert_eq!(method.holder(), fixture.ty("p/A"));
    assert_eq!(method.sig(), run);
    assert!(class.lookup_method(&fixture.sig("run", "()I")).is_none());
}

#[test]
fn test_methods_named_ignores_descriptor() {
    let fixture = Fixture::new();
    let class = fixture
        .class("p/A", "java/lang/Object")
        .with_method(fixture.sig("m", "()V"), PUBLIC)
        .with_method(fixture.sig("m", "(I)V"), PUBLIC)
        .with_method(fixture.sig("n", "()V"), PUBLIC);
    let name = fixture.interner.intern_string("m");
    assert_eq!(class.methods_named(name).count(), 2);
}

#[test]
fn test_non_abstract_virtual() {
    let fixture = Fixture::new();
    let holder = fixture.ty("p/A");
    let make = |flags| MethodDef::new(MethodRef::new(holder, fixture.sig("m", "()V")), flags);

    assert!(make(PUBLIC).is_non_abstract_virtual());
    assert!(!make(PUBLIC_ABSTRACT).is_non_abstract_virtual());
    assert!(!make(PUBLIC_STATIC).is_non_abstract_virtual());
    assert!(!make(PRIVATE).is_non_abstract_virtual());
}

#[test]
fn test_obsolete_marker_is_per_instance() {
    let fixture = Fixture::new();
    let method = MethodDef::new(
        MethodRef::new(fixture.ty("p/A"), fixture.sig("m", "()V")),
        PUBLIC,
    )
    .with_code(CodeRef(7));
    assert!(!method.is_obsolete());

    method.mark_obsolete();
    assert!(method.is_obsolete());

    let copy = method.clone();
    assert!(!copy.is_obsolete());
    assert_eq!(copy, method);
    assert_eq!(copy.code, Some(CodeRef(7)));
}

#[test]
fn test_member_def_accessors() {
    let fixture = Fixture::new();
    let holder = fixture.ty("p/A");
    let field = Arc::new(
        FieldDef::new(
            FieldRef::new(holder, fixture.field("VALUE", "I")),
            PUBLIC_STATIC,
        )
        .with_static_value(ValueRef(3)),
    );
    let member = MemberDef::Field(Arc::clone(&field));
    assert_eq!(member.as_field(), Some(&field));
    assert!(member.as_method().is_none());
    assert_eq!(member.holder(), holder);
    assert_eq!(field.static_value, Some(ValueRef(3)));
}
