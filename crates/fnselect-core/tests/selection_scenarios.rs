//! End-to-end selection scenarios against an in-memory registry.

use fnselect_core::registry::{FunctionRegistry, UnitDescriptor, UnitRegistry};
use fnselect_core::selection::{SelectionError, apply_selection, evaluate_unit};
use fnselect_core::types::{Dimension, SelectionRequest};

fn registry(units: impl IntoIterator<Item = UnitDescriptor>) -> FunctionRegistry {
    units.into_iter().collect()
}

// =========================================================================
// Scenarios
// =========================================================================

#[test]
fn region_mismatch_removes_unit_in_full_set_mode() {
    let mut registry = registry([UnitDescriptor::unrestricted("A").with_regions(["us-east-1"])]);

    let request = SelectionRequest::new().with_region("us-west-2");
    let report = apply_selection(&mut registry, &request).unwrap();

    assert!(registry.is_empty());
    assert!(report.kept.is_empty());
    assert_eq!(report.removed[0].name, "A");
    assert_eq!(report.removed[0].dimension, Dimension::Region);
    assert_eq!(report.removed[0].requested, "us-west-2");
}

#[test]
fn unrestricted_unit_kept_alongside_matching_unit() {
    let mut registry = registry([
        UnitDescriptor::unrestricted("A").with_regions(["us-east-1"]),
        UnitDescriptor::unrestricted("B"),
    ]);

    let request = SelectionRequest::new().with_region("us-east-1");
    let report = apply_selection(&mut registry, &request).unwrap();

    assert!(report.is_unchanged());
    assert_eq!(registry.unit_names(), vec!["A", "B"]);
}

#[test]
fn single_unit_stage_mismatch_fails_and_removes_unit() {
    let mut registry = registry([UnitDescriptor::unrestricted("A").with_stages(["prod"])]);

    let request = SelectionRequest::new().with_stage("dev").for_function("A");
    let err = apply_selection(&mut registry, &request).unwrap_err();

    assert_eq!(
        err,
        SelectionError::Mismatch {
            unit: "A".to_string(),
            dimension: Dimension::Stage,
            requested: "dev".to_string(),
        }
    );
    assert_eq!(
        err.operator_message(),
        "Select: A not selected for deployment in dev stage."
    );
    assert!(registry.get_unit("A").is_none());
}

#[test]
fn unit_passing_both_checks_is_kept() {
    let mut registry = registry([UnitDescriptor::unrestricted("A")
        .with_regions(["eu-west-1"])
        .with_stages(["prod"])]);

    let request = SelectionRequest::new()
        .with_region("eu-west-1")
        .with_stage("prod");
    let report = apply_selection(&mut registry, &request).unwrap();

    assert_eq!(report.kept, vec!["A"]);
    assert_eq!(registry.len(), 1);
}

// =========================================================================
// Properties
// =========================================================================

#[test]
fn unrestricted_units_included_for_any_context() {
    let unit = UnitDescriptor::unrestricted("free");
    for region in [None, Some("us-east-1"), Some("ap-south-1")] {
        for stage in [None, Some("dev"), Some("prod")] {
            assert!(evaluate_unit(&unit, region, stage, true).included);
        }
    }
}

#[test]
fn region_exclusion_is_independent_of_stage_outcome() {
    let unit = UnitDescriptor::unrestricted("A")
        .with_regions(["us-east-1"])
        .with_stages(["prod"]);

    for stage in [None, Some("prod"), Some("dev")] {
        let decision = evaluate_unit(&unit, Some("eu-west-1"), stage, false);
        assert!(!decision.included);
        assert_eq!(decision.reason().unwrap().dimension, Dimension::Region);
    }
}

#[test]
fn omitted_region_disables_region_check() {
    let mut registry = registry([UnitDescriptor::unrestricted("A").with_regions(["us-east-1"])]);

    let report = apply_selection(&mut registry, &SelectionRequest::new().with_stage("dev")).unwrap();

    assert_eq!(report.kept, vec!["A"]);
}

#[test]
fn second_pass_is_a_no_op() {
    let units = [
        UnitDescriptor::unrestricted("a").with_stages(["prod"]),
        UnitDescriptor::unrestricted("b").with_stages(["dev"]),
        UnitDescriptor::unrestricted("c").with_regions(["us-east-1"]),
        UnitDescriptor::unrestricted("d"),
    ];
    let request = SelectionRequest::new()
        .with_region("us-east-1")
        .with_stage("dev");

    let mut once = registry(units.clone());
    apply_selection(&mut once, &request).unwrap();

    let mut twice = registry(units);
    apply_selection(&mut twice, &request).unwrap();
    let second = apply_selection(&mut twice, &request).unwrap();

    assert_eq!(once, twice);
    assert!(second.is_unchanged());
    assert_eq!(twice.unit_names(), vec!["b", "c", "d"]);
}

#[test]
fn full_set_exclusion_leaves_other_units_alone() {
    let mut registry = registry([
        UnitDescriptor::unrestricted("a"),
        UnitDescriptor::unrestricted("b").with_stages(["prod"]),
        UnitDescriptor::unrestricted("c").with_stages(["dev", "prod"]),
    ]);

    let report = apply_selection(&mut registry, &SelectionRequest::new().with_stage("dev")).unwrap();

    assert_eq!(report.kept, vec!["a", "c"]);
    assert_eq!(registry.unit_names(), vec!["a", "c"]);
}

#[test]
fn full_set_pass_may_empty_the_registry() {
    let mut registry = registry([
        UnitDescriptor::unrestricted("a").with_stages(["prod"]),
        UnitDescriptor::unrestricted("b").with_stages(["prod"]),
    ]);

    let report = apply_selection(&mut registry, &SelectionRequest::new().with_stage("dev")).unwrap();

    assert_eq!(report.removed.len(), 2);
    assert!(registry.is_empty());
}

#[test]
fn works_through_a_trait_object() {
    let mut registry = registry([UnitDescriptor::unrestricted("a").with_stages(["prod"])]);
    let dynamic: &mut dyn UnitRegistry = &mut registry;

    apply_selection(dynamic, &SelectionRequest::new().with_stage("dev")).unwrap();

    assert!(registry.is_empty());
}
