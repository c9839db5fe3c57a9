//! Property-based tests for suffix generation and resource naming.
//!
//! Uses `proptest` to verify invariants across many random inputs.

#![allow(clippy::expect_used)]

use proptest::prelude::*;

use tfcheck::domain::StackNames;
use tfcheck::domain::stack::validate_registry_name;
use tfcheck::domain::unique_id;
use tfcheck::domain::unique_id::UNIQUE_ID_LEN;

// ============================================================================
// unique_id() property tests
// ============================================================================

/// Generated suffixes are always 6 lowercase alphanumerics.
#[test]
fn test_unique_id_format_over_many_draws() {
    for _ in 0..1000 {
        let id = unique_id();
        assert_eq!(id.len(), UNIQUE_ID_LEN, "wrong length: {id}");
        assert!(
            id.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()),
            "invalid chars: {id}"
        );
    }
}

#[test]
fn test_unique_id_uniqueness_batch() {
    let ids: std::collections::HashSet<_> = (0..100).map(|_| unique_id()).collect();
    assert_eq!(ids.len(), 100, "duplicate suffixes generated");
}

// ============================================================================
// StackNames property tests
// ============================================================================

proptest! {
    /// Any dash-separated lowercase prefix yields names that embed the suffix
    /// and a registry name Azure accepts.
    #[test]
    fn prop_stack_names_valid_for_reasonable_prefixes(
        prefix in "[a-z]{2,10}(-[a-z0-9]{1,8}){0,2}",
    ) {
        let id = unique_id();
        let names = StackNames::new(&prefix, &id).expect("valid prefix");
        prop_assert!(names.resource_group.ends_with(&id));
        prop_assert!(names.cluster.ends_with(&id));
        prop_assert!(names.container_registry.ends_with(&id));
        prop_assert!(validate_registry_name(&names.container_registry).is_ok());
    }

    /// Prefixes containing characters other than letters, digits and dashes
    /// are rejected before any terraform call.
    #[test]
    fn prop_stack_names_reject_symbols(
        head in "[a-z]{2,6}",
        symbol in "[_.!@ ]",
    ) {
        let prefix = format!("{head}{symbol}x");
        prop_assert!(StackNames::new(&prefix, "abc123").is_err(), "accepted: {prefix}");
    }

    /// Two suffixes never produce the same resource group name.
    #[test]
    fn prop_distinct_suffixes_give_distinct_names(a in "[a-z0-9]{6}", b in "[a-z0-9]{6}") {
        prop_assume!(a != b);
        let left = StackNames::new("casino-test", &a).expect("valid");
        let right = StackNames::new("casino-test", &b).expect("valid");
        prop_assert_ne!(left.resource_group, right.resource_group);
        prop_assert_ne!(left.container_registry, right.container_registry);
    }
}

#[test]
fn test_overlong_prefix_is_rejected() {
    let prefix = "a".repeat(45);
    assert!(StackNames::new(&prefix, "abc123").is_err());
}
