//! Property-based tests for the transition engine.
//!
//! These tests use proptest to verify the activation invariants hold
//! across many randomly generated transition sequences.

use canopy::{Machine, MachineBuilder, NodeKind, TransitionError};
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;

/// Every addressable node in the fixture, leaves and regions alike.
const TARGETS: &[&str] = &[
    "Solo", "Alpha", "A1", "A2", "ADeep", "D1", "D2", "Beta", "B1", "B2",
];

const ALPHA_LEAVES: &[&str] = &["A1", "A2", "D1", "D2"];

fn build_machine(seed: u64) -> Machine {
    MachineBuilder::new()
        .seed(seed)
        .state("Solo")
        .region("Alpha", |r| {
            r.state("A1");
            r.state_with("A2", |s| {
                s.utility(|_| 2.0);
            });
            r.region("ADeep", |r| {
                r.state_with("D1", |s| {
                    s.rank(|_| 1).utility(|_| 0.5);
                });
                r.state("D2");
            });
        })
        .region("Beta", |r| {
            r.state("B1");
            r.state("B2");
        })
        .build()
        .unwrap()
}

fn apply(machine: &mut Machine, target: &str, policy: usize) {
    let result = match policy {
        0 => machine.immediate_change_to(target),
        1 => machine.immediate_restart(target),
        2 => machine.immediate_resume(target),
        3 => machine.immediate_utilize(target),
        _ => machine.immediate_randomize(target),
    };
    result.expect("known target resolves");
}

fn snapshot(machine: &Machine) -> Vec<bool> {
    let hierarchy = machine.hierarchy();
    hierarchy
        .ids()
        .map(|id| machine.activation().is_active(id))
        .collect()
}

fn check_invariants(machine: &Machine) -> Result<(), TestCaseError> {
    let hierarchy = machine.hierarchy();
    let activation = machine.activation();

    prop_assert!(activation.is_active(hierarchy.root()), "root must stay active");

    for id in hierarchy.ids() {
        if activation.is_active(id) {
            if let Some(parent) = hierarchy.parent(id) {
                prop_assert!(
                    activation.is_active(parent),
                    "active node '{}' has an inactive parent",
                    hierarchy.name(id)
                );
            }
        }
        if hierarchy.kind(id) == NodeKind::Composite && activation.is_active(id) {
            let active_children = hierarchy
                .children(id)
                .iter()
                .filter(|&&child| activation.is_active(child))
                .count();
            prop_assert_eq!(
                active_children,
                1,
                "region '{}' must have exactly one active child",
                hierarchy.name(id)
            );
        }
    }
    Ok(())
}

prop_compose! {
    fn arbitrary_op()(target in 0..TARGETS.len(), policy in 0..5usize) -> (usize, usize) {
        (target, policy)
    }
}

proptest! {
    #[test]
    fn invariants_hold_after_any_transition_sequence(
        seed in any::<u64>(),
        ops in prop::collection::vec(arbitrary_op(), 1..24),
    ) {
        let mut machine = build_machine(seed);
        check_invariants(&machine)?;
        for (target, policy) in ops {
            apply(&mut machine, TARGETS[target], policy);
            check_invariants(&machine)?;
        }
    }

    #[test]
    fn any_leaf_is_reachable_with_its_ancestors(
        seed in any::<u64>(),
        ops in prop::collection::vec(arbitrary_op(), 0..12),
        leaf in 0..ALPHA_LEAVES.len(),
    ) {
        let mut machine = build_machine(seed);
        for (target, policy) in ops {
            apply(&mut machine, TARGETS[target], policy);
        }

        let name = ALPHA_LEAVES[leaf];
        machine.immediate_change_to(name).unwrap();
        prop_assert!(machine.is_active(name));

        let hierarchy = machine.hierarchy();
        let id = hierarchy.node(name).unwrap();
        for ancestor in hierarchy.path_from_root(id) {
            prop_assert!(machine.activation().is_active(ancestor));
        }
    }

    #[test]
    fn resume_recalls_any_leaf_after_leaving(
        seed in any::<u64>(),
        leaf in 0..ALPHA_LEAVES.len(),
    ) {
        let mut machine = build_machine(seed);
        let name = ALPHA_LEAVES[leaf];

        machine.immediate_change_to(name).unwrap();
        machine.immediate_change_to("Solo").unwrap();
        prop_assert!(!machine.is_active(name));

        machine.immediate_resume("Alpha").unwrap();
        prop_assert!(machine.is_active(name), "resume must recall '{}'", name);
    }

    #[test]
    fn failed_transitions_change_nothing(
        seed in any::<u64>(),
        ops in prop::collection::vec(arbitrary_op(), 0..12),
    ) {
        let mut machine = build_machine(seed);
        for (target, policy) in ops {
            apply(&mut machine, TARGETS[target], policy);
        }

        let before = snapshot(&machine);
        let err = machine.immediate_change_to("NoSuchState").unwrap_err();
        prop_assert!(matches!(err, TransitionError::UnknownTarget { .. }), "expected UnknownTarget error");
        prop_assert_eq!(snapshot(&machine), before);
    }

    #[test]
    fn deferred_batch_matches_sequential_immediates(
        seed in any::<u64>(),
        ops in prop::collection::vec(arbitrary_op(), 1..8),
    ) {
        let mut immediate = build_machine(seed);
        let mut deferred = build_machine(seed);

        for &(target, policy) in &ops {
            apply(&mut immediate, TARGETS[target], policy);
        }
        for &(target, policy) in &ops {
            let name = TARGETS[target];
            match policy {
                0 => deferred.change_to(name),
                1 => deferred.restart(name),
                2 => deferred.resume(name),
                3 => deferred.utilize(name),
                _ => deferred.randomize(name),
            }
        }
        deferred.update().unwrap();

        prop_assert_eq!(snapshot(&immediate), snapshot(&deferred));
    }

    #[test]
    fn identical_seeds_resolve_identically(
        seed in any::<u64>(),
        ops in prop::collection::vec(arbitrary_op(), 1..12),
    ) {
        let mut first = build_machine(seed);
        let mut second = build_machine(seed);
        for &(target, policy) in &ops {
            apply(&mut first, TARGETS[target], policy);
            apply(&mut second, TARGETS[target], policy);
        }
        prop_assert_eq!(snapshot(&first), snapshot(&second));
    }
}
