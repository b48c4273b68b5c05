// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Request Validation
//!
//! Generates create requests and worker group lists and checks that the
//! validator accepts exactly the well-formed ones and reports the first
//! failing worker group by index.

use cim_service_api::domain::invariants::{
    validate_create_service_request, validate_service_key, validate_worker_group,
};
use cim_service_api::domain::{ClusterSpec, HeadGroupSpec, Service, ValidationError, WorkerGroupSpec};
use cim_service_api::CreateServiceRequest;
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

fn identifier() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,15}"
}

/// Worker group that satisfies every per-group rule
fn valid_worker_group() -> impl Strategy<Value = WorkerGroupSpec> {
    (identifier(), identifier(), 1i32..100)
        .prop_flat_map(|(group_name, compute_template, max)| {
            (Just(group_name), Just(compute_template), Just(max), 0..=max)
        })
        .prop_map(|(group_name, compute_template, max, min)| WorkerGroupSpec {
            group_name,
            compute_template,
            replicas: min,
            min_replicas: min,
            max_replicas: max,
            ..Default::default()
        })
}

/// Worker group with replica bounds drawn independently
fn any_replica_bounds() -> impl Strategy<Value = WorkerGroupSpec> {
    (-5i32..20, -5i32..20).prop_map(|(min, max)| WorkerGroupSpec {
        group_name: "workers".to_string(),
        compute_template: "tpl".to_string(),
        min_replicas: min,
        max_replicas: max,
        ..Default::default()
    })
}

fn valid_request() -> impl Strategy<Value = CreateServiceRequest> {
    (
        identifier(),
        identifier(),
        identifier(),
        identifier(),
        prop::collection::vec(valid_worker_group(), 0..6),
    )
        .prop_map(|(namespace, name, user, head_template, workers)| CreateServiceRequest {
            namespace: namespace.clone(),
            service: Some(Service {
                name,
                namespace,
                user,
                cluster_spec: ClusterSpec {
                    head_group_spec: HeadGroupSpec {
                        compute_template: head_template,
                        ..Default::default()
                    },
                    worker_group_spec: workers,
                },
                ..Default::default()
            }),
        })
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_well_formed_requests_are_accepted(request in valid_request()) {
        prop_assert_eq!(validate_create_service_request(&request), Ok(()));
    }

    #[test]
    fn prop_namespace_mismatch_is_rejected(
        request in valid_request(),
        other in identifier(),
    ) {
        prop_assume!(request.namespace != other);
        let mut request = request;
        if let Some(service) = request.service.as_mut() {
            service.namespace = other.clone();
        }

        let result = validate_create_service_request(&request);
        prop_assert_eq!(
            result,
            Err(ValidationError::NamespaceMismatch {
                request: request.namespace.clone(),
                service: other,
            })
        );
    }

    #[test]
    fn prop_replica_bounds_rule(spec in any_replica_bounds()) {
        let result = validate_worker_group(3, &spec);

        if spec.max_replicas == 0 {
            prop_assert_eq!(result, Err(ValidationError::ZeroMaxReplicas { index: 3 }));
        } else if spec.min_replicas > spec.max_replicas {
            prop_assert_eq!(
                result,
                Err(ValidationError::MinExceedsMax {
                    index: 3,
                    min: spec.min_replicas,
                    max: spec.max_replicas,
                })
            );
        } else {
            prop_assert_eq!(result, Ok(()));
        }
    }

    #[test]
    fn prop_first_invalid_worker_group_is_reported(
        request in valid_request(),
        bad_at in 0usize..6,
    ) {
        let mut request = request;
        let workers = &mut request.service.as_mut().unwrap().cluster_spec.worker_group_spec;
        prop_assume!(bad_at < workers.len());
        workers[bad_at].max_replicas = 0;
        for later in workers.iter_mut().skip(bad_at + 1) {
            later.group_name.clear();
        }

        let err = validate_create_service_request(&request).unwrap_err();
        prop_assert_eq!(err.index(), Some(bad_at));
        prop_assert_eq!(err, ValidationError::ZeroMaxReplicas { index: bad_at });
    }

    #[test]
    fn prop_empty_outer_namespace_wins(request in valid_request()) {
        let mut request = request;
        request.namespace.clear();
        request.service = None;

        prop_assert_eq!(
            validate_create_service_request(&request),
            Err(ValidationError::EmptyNamespace)
        );
    }

    #[test]
    fn prop_service_key_requires_both_parts(
        name in prop::option::of(identifier()),
        namespace in prop::option::of(identifier()),
    ) {
        let name = name.unwrap_or_default();
        let namespace = namespace.unwrap_or_default();

        let result = validate_service_key(&name, &namespace);
        match (name.is_empty(), namespace.is_empty()) {
            (true, _) => prop_assert_eq!(result, Err(ValidationError::EmptyName)),
            (false, true) => prop_assert_eq!(result, Err(ValidationError::EmptyNamespace)),
            (false, false) => prop_assert_eq!(result, Ok(())),
        }
    }
}
