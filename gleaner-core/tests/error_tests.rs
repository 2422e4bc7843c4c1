//! Integration tests for the shared error taxonomy.

use gleaner_core::{ApiError, ApiErrorKind};

#[test]
fn test_every_kind_round_trips_through_from_kind() {
    for kind in ApiErrorKind::all() {
        assert_eq!(ApiError::from_kind(*kind, "m").kind(), *kind);
    }
}

#[test]
fn test_kinds_are_usable_as_set_members() {
    use std::collections::HashSet;

    let retryable: HashSet<ApiErrorKind> = [ApiErrorKind::Network, ApiErrorKind::RateLimit]
        .into_iter()
        .collect();

    assert!(retryable.contains(&ApiError::network("x").kind()));
    assert!(!retryable.contains(&ApiError::unauthorized("x").kind()));
}

#[test]
fn test_error_is_send_sync_static() {
    fn assert_bounds<T: Send + Sync + 'static>() {}
    assert_bounds::<ApiError>();
}
