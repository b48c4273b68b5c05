// Copyright (c) 2025 - Cowboy AI, Inc.
//! Pure Validation Functions - Request Invariants
//!
//! Every lifecycle request is checked here before any store call is issued.
//! All functions are pure (no I/O, deterministic) and short-circuit on the
//! first failing rule.
//!
//! # Create Rules (in evaluation order)
//!
//! 1. Request namespace is non-empty
//! 2. Service payload is present
//! 3. Request namespace equals the payload namespace
//! 4. Service name is non-empty
//! 5. Service user is non-empty
//! 6. Head group compute template is non-empty
//! 7. For each worker group `i`: group name, compute template,
//!    `max_replicas != 0`, `min_replicas <= max_replicas`
//!
//! Get and delete only check the key (name first, then namespace). List only
//! checks the namespace, and list-all checks nothing.

use crate::api::CreateServiceRequest;
use crate::domain::WorkerGroupSpec;

/// Validation result with detailed error information
pub type ValidationResult = Result<(), ValidationError>;

/// Validation error with context
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("namespace is empty, please specify a valid value")]
    EmptyNamespace,

    #[error("service is empty, please input a valid payload")]
    MissingService,

    #[error("the namespace in the request ({request}) is different from the namespace in the service definition ({service})")]
    NamespaceMismatch { request: String, service: String },

    #[error("service name is empty, please specify a valid value")]
    EmptyName,

    #[error("user who creates the service is empty, please specify a valid value")]
    EmptyUser,

    #[error("head group compute template is empty, please specify a valid value")]
    EmptyHeadComputeTemplate,

    #[error("worker group {index} group name is empty, please specify a valid value")]
    EmptyWorkerGroupName { index: usize },

    #[error("worker group {index} compute template is empty, please specify a valid value")]
    EmptyWorkerComputeTemplate { index: usize },

    #[error("worker group {index} max_replicas can not be 0, please specify a valid value")]
    ZeroMaxReplicas { index: usize },

    #[error("worker group {index} min_replicas ({min}) > max_replicas ({max}), please specify a valid value")]
    MinExceedsMax { index: usize, min: i32, max: i32 },
}

impl ValidationError {
    /// Index of the offending worker group, if the failure concerns one
    pub fn index(&self) -> Option<usize> {
        match self {
            ValidationError::EmptyWorkerGroupName { index }
            | ValidationError::EmptyWorkerComputeTemplate { index }
            | ValidationError::ZeroMaxReplicas { index }
            | ValidationError::MinExceedsMax { index, .. } => Some(*index),
            _ => None,
        }
    }
}

/// Validate a create request
pub fn validate_create_service_request(request: &CreateServiceRequest) -> ValidationResult {
    validate_namespace(&request.namespace)?;

    let service = request.service.as_ref().ok_or(ValidationError::MissingService)?;

    if request.namespace != service.namespace {
        return Err(ValidationError::NamespaceMismatch {
            request: request.namespace.clone(),
            service: service.namespace.clone(),
        });
    }

    if service.name.is_empty() {
        return Err(ValidationError::EmptyName);
    }

    if service.user.is_empty() {
        return Err(ValidationError::EmptyUser);
    }

    if service.cluster_spec.head_group_spec.compute_template.is_empty() {
        return Err(ValidationError::EmptyHeadComputeTemplate);
    }

    service
        .cluster_spec
        .worker_group_spec
        .iter()
        .enumerate()
        .try_for_each(|(index, spec)| validate_worker_group(index, spec))
}

/// Validate one worker group at position `index`
pub fn validate_worker_group(index: usize, spec: &WorkerGroupSpec) -> ValidationResult {
    if spec.group_name.is_empty() {
        return Err(ValidationError::EmptyWorkerGroupName { index });
    }

    if spec.compute_template.is_empty() {
        return Err(ValidationError::EmptyWorkerComputeTemplate { index });
    }

    if spec.max_replicas == 0 {
        return Err(ValidationError::ZeroMaxReplicas { index });
    }

    if spec.min_replicas > spec.max_replicas {
        return Err(ValidationError::MinExceedsMax {
            index,
            min: spec.min_replicas,
            max: spec.max_replicas,
        });
    }

    Ok(())
}

/// Validate the key of a get/delete request (name before namespace)
pub fn validate_service_key(name: &str, namespace: &str) -> ValidationResult {
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    validate_namespace(namespace)
}

/// Validate the namespace of a namespaced request
pub fn validate_namespace(namespace: &str) -> ValidationResult {
    if namespace.is_empty() {
        return Err(ValidationError::EmptyNamespace);
    }
    Ok(())
}
