//! Many readers sharing one snapshot.

use crate::resolution::ResolutionResult;
use crate::test_fixtures::{Fixture, PUBLIC, PUBLIC_ABSTRACT};
use crate::types::TypeId;
use rayon::prelude::*;
use std::sync::Arc;

fn diamond_fixture(width: usize) -> Fixture {
    let fixture = Fixture::new();
    let run = fixture.sig("run", "()V");
    let top = fixture.add(fixture.interface("p/Top").with_method(run, PUBLIC_ABSTRACT));
    for i in 0..width {
        let side = fixture.add(
            fixture
                .interface(&format!("p/Side{i}"))
                .with_interfaces([top.ty])
                .with_method(run, PUBLIC),
        );
        fixture.add(
            fixture
                .class(&format!("p/Impl{i}"), "java/lang/Object")
                .with_interfaces([side.ty, top.ty]),
        );
    }
    fixture
}

#[test]
fn test_parallel_readers_agree() {
    let width = 32;
    let fixture = diamond_fixture(width);
    let run = fixture.sig("run", "()V");
    let snapshot = fixture.snapshot();
    let sequential: Vec<ResolutionResult> = (0..width)
        .map(|i| snapshot.resolve_method_on_class(fixture.ty(&format!("p/Impl{i}")), run))
        .collect();

    let parallel: Vec<ResolutionResult> = (0..width * 8)
        .into_par_iter()
        .map(|n| snapshot.resolve_method_on_class(fixture.ty(&format!("p/Impl{}", n % width)), run))
        .collect();

    for (n, result) in parallel.iter().enumerate() {
        assert_eq!(result, &sequential[n % width]);
        assert_eq!(
            result.resolved_holder(),
            Some(fixture.ty(&format!("p/Side{}", n % width)))
        );
    }
    let stats = snapshot.cache_stats();
    assert!(stats.entries <= width * 3 + 2);
    assert!(stats.hits > 0);
}

#[test]
fn test_parallel_invalidation_and_reads() {
    let fixture = diamond_fixture(8);
    let run = fixture.sig("run", "()V");
    let snapshot = fixture.snapshot();
    let impls: Vec<TypeId> = (0..8).map(|i| fixture.ty(&format!("p/Impl{i}"))).collect();

    (0..256).into_par_iter().for_each(|n| {
        let ty = impls[n % impls.len()];
        if n % 5 == 0 {
            snapshot.invalidate(ty);
        }
        let result = snapshot.resolve_method_on_class(ty, run);
        assert!(result.is_single());
    });
}

#[test]
fn test_parallel_synthesis_of_identical_class() {
    let fixture = Fixture::new();
    let get = fixture.sig("get", "()I");
    let snapshot = fixture.snapshot();

    let outcomes: Vec<_> = (0..32)
        .into_par_iter()
        .map(|_| {
            snapshot.add_synthesized_class(
                fixture
                    .class("p/Holder", "java/lang/Object")
                    .with_method(get, PUBLIC),
            )
        })
        .collect();

    assert!(outcomes.iter().all(Result::is_ok));
    let synthesized = snapshot.synthesized_classes();
    assert_eq!(synthesized.len(), 1);
    assert!(Arc::ptr_eq(
        &snapshot.definition_for(fixture.ty("p/Holder")).expect("visible"),
        &synthesized[0]
    ));
}
