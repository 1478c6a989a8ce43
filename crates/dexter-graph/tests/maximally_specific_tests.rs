use super::*;
use crate::test_fixtures::{Fixture, PRIVATE, PUBLIC, PUBLIC_ABSTRACT, PUBLIC_STATIC};

#[test]
fn test_empty_builder_is_no_such_method() {
    let fixture = Fixture::new();
    let view = fixture.view();
    let sig = fixture.sig("m", "()V");
    let class = fixture.add(fixture.class("p/A", "java/lang/Object"));

    let mut builder = MaximallySpecificMethodsBuilder::new(&view, sig);
    builder.collect_from_class(&class);
    assert!(builder.is_empty());
    assert_eq!(builder.resolve(class.ty), ResolutionResult::NoSuchMethod);
    assert!(builder.lookup().is_none());
}

#[test]
fn test_candidate_shadows_superinterfaces_transitively() {
    let fixture = Fixture::new();
    let view = fixture.view();
    let sig = fixture.sig("m", "()V");
    let (top, mid, low) = (fixture.ty("p/Top"), fixture.ty("p/Mid"), fixture.ty("p/Low"));
    fixture.add(fixture.interface("p/Top").with_method(sig, PUBLIC));
    fixture.add(fixture.interface("p/Mid").with_interfaces([top]));
    let low_def = fixture.add(
        fixture
            .interface("p/Low")
            .with_interfaces([mid])
            .with_method(sig, PUBLIC),
    );

    let method = low_def.lookup_method(&sig).cloned().expect("declared");
    let mut builder = MaximallySpecificMethodsBuilder::new(&view, sig);
    builder.add_candidate(&low_def, method);

    assert!(builder.is_candidate(low));
    assert!(builder.is_shadowed(mid));
    assert!(builder.is_shadowed(top));
    assert_eq!(builder.candidate_holders(), vec![low]);
}

#[test]
fn test_shadowing_overwrites_earlier_candidate() {
    let fixture = Fixture::new();
    let view = fixture.view();
    let sig = fixture.sig("m", "()V");
    let (general, specific) = (fixture.ty("p/General"), fixture.ty("p/Specific"));
    fixture.add(fixture.interface("p/General").with_method(sig, PUBLIC));
    fixture.add(
        fixture
            .interface("p/Specific")
            .with_interfaces([general])
            .with_method(sig, PUBLIC),
    );
    // General is listed first, so it is recorded as a candidate before
    // Specific shadows it.
    let class = fixture.add(
        fixture
            .class("p/C", "java/lang/Object")
            .with_interfaces([general, specific]),
    );

    let mut builder = MaximallySpecificMethodsBuilder::new(&view, sig);
    builder.collect_from_class(&class);
    assert!(builder.is_shadowed(general));
    assert_eq!(builder.candidate_holders(), vec![specific]);

    let result = builder.resolve(class.ty);
    assert_eq!(result.resolved_holder(), Some(specific));
    assert_eq!(result.initial_holder(), Some(class.ty));
}

#[test]
fn test_abstract_candidates_pick_first_recorded() {
    let fixture = Fixture::new();
    let view = fixture.view();
    let sig = fixture.sig("m", "()V");
    let (i1, i2) = (fixture.ty("p/I1"), fixture.ty("p/I2"));
    fixture.add(fixture.interface("p/I1").with_method(sig, PUBLIC_ABSTRACT));
    fixture.add(fixture.interface("p/I2").with_method(sig, PUBLIC_ABSTRACT));
    let class = fixture.add(
        fixture
            .class("p/C", "java/lang/Object")
            .with_interfaces([i2, i1]),
    );

    let mut builder = MaximallySpecificMethodsBuilder::new(&view, sig);
    builder.collect_from_class(&class);
    assert_eq!(builder.candidate_holders(), vec![i2, i1]);
    assert_eq!(builder.resolve(class.ty).resolved_holder(), Some(i2));
    assert_eq!(builder.lookup().map(|(ty, _)| ty), Some(i2));
}

#[test]
fn test_single_default_among_abstracts_wins() {
    let fixture = Fixture::new();
    let view = fixture.view();
    let sig = fixture.sig("m", "()V");
    let (a, d) = (fixture.ty("p/Abstract"), fixture.ty("p/Default"));
    fixture.add(fixture.interface("p/Abstract").with_method(sig, PUBLIC_ABSTRACT));
    fixture.add(fixture.interface("p/Default").with_method(sig, PUBLIC));
    let class = fixture.add(
        fixture
            .class("p/C", "java/lang/Object")
            .with_interfaces([a, d]),
    );

    let mut builder = MaximallySpecificMethodsBuilder::new(&view, sig);
    builder.collect_from_class(&class);
    let result = builder.resolve(class.ty);
    assert_eq!(result.resolved_holder(), Some(d));
    assert!(!result.resolved_method().expect("single").is_abstract());
}

#[test]
fn test_two_defaults_conflict_in_insertion_order() {
    let fixture = Fixture::new();
    let view = fixture.view();
    let sig = fixture.sig("m", "()V");
    let (i1, i2) = (fixture.ty("p/I1"), fixture.ty("p/I2"));
    fixture.add(fixture.interface("p/I1").with_method(sig, PUBLIC));
    fixture.add(fixture.interface("p/I2").with_method(sig, PUBLIC));
    let class = fixture.add(
        fixture
            .class("p/C", "java/lang/Object")
            .with_interfaces([i1, i2]),
    );

    let mut builder = MaximallySpecificMethodsBuilder::new(&view, sig);
    builder.collect_from_class(&class);
    let result = builder.resolve(class.ty);
    let holders: Vec<_> = result.conflicting().iter().map(|m| m.holder()).collect();
    assert_eq!(holders, vec![i1, i2]);
    assert!(builder.lookup().is_none());
}

#[test]
fn test_private_and_static_are_not_candidates() {
    let fixture = Fixture::new();
    let view = fixture.view();
    let sig = fixture.sig("m", "()V");
    let (base, hidden, util) = (
        fixture.ty("p/Base"),
        fixture.ty("p/Hidden"),
        fixture.ty("p/Util"),
    );
    fixture.add(fixture.interface("p/Base").with_method(sig, PUBLIC_ABSTRACT));
    // Neither method stops the search; both continue into Base.
    fixture.add(
        fixture
            .interface("p/Hidden")
            .with_interfaces([base])
            .with_method(sig, PRIVATE),
    );
    fixture.add(
        fixture
            .interface("p/Util")
            .with_interfaces([base])
            .with_method(sig, PUBLIC_STATIC),
    );
    let class = fixture.add(
        fixture
            .class("p/C", "java/lang/Object")
            .with_interfaces([hidden, util]),
    );

    let mut builder = MaximallySpecificMethodsBuilder::new(&view, sig);
    builder.collect_from_class(&class);
    assert_eq!(builder.candidate_holders(), vec![base]);
    assert!(!builder.is_candidate(hidden));
    assert!(!builder.is_candidate(util));
}

#[test]
fn test_superclass_interfaces_are_searched() {
    let fixture = Fixture::new();
    let view = fixture.view();
    let sig = fixture.sig("m", "()V");
    let iface = fixture.ty("p/I");
    fixture.add(fixture.interface("p/I").with_method(sig, PUBLIC));
    fixture.add(
        fixture
            .class("p/Base", "java/lang/Object")
            .with_interfaces([iface]),
    );
    let class = fixture.add(fixture.class("p/Sub", "p/Base"));

    let mut builder = MaximallySpecificMethodsBuilder::new(&view, sig);
    builder.collect_from_class(&class);
    assert_eq!(builder.resolve(class.ty).resolved_holder(), Some(iface));
}

#[test]
fn test_missing_interfaces_are_ignored() {
    let fixture = Fixture::new();
    let view = fixture.view();
    let sig = fixture.sig("m", "()V");
    let (missing, present) = (fixture.ty("p/Missing"), fixture.ty("p/Present"));
    fixture.add(fixture.interface("p/Present").with_method(sig, PUBLIC));
    let class = fixture.add(
        fixture
            .class("p/C", "java/lang/Object")
            .with_interfaces([missing, present]),
    );

    let mut builder = MaximallySpecificMethodsBuilder::new(&view, sig);
    builder.collect_from_class(&class);
    assert_eq!(builder.candidate_holders(), vec![present]);
}

#[test]
fn test_cyclic_interfaces_terminate() {
    let fixture = Fixture::new();
    let view = fixture.view();
    let sig = fixture.sig("m", "()V");
    let (a, b) = (fixture.ty("p/A"), fixture.ty("p/B"));
    fixture.add(fixture.interface("p/A").with_interfaces([b]));
    fixture.add(fixture.interface("p/B").with_interfaces([a]));
    let class = fixture.add(
        fixture
            .class("p/C", "java/lang/Object")
            .with_interfaces([a]),
    );

    let mut builder = MaximallySpecificMethodsBuilder::new(&view, sig);
    builder.collect_from_class(&class);
    assert_eq!(builder.resolve(class.ty), ResolutionResult::NoSuchMethod);
}
