// Copyright (c) 2025 - Cowboy AI, Inc.
//! Service Domain Models
//!
//! Core concepts of the service lifecycle API: the managed `Service` resource,
//! the cluster shape backing it, the operational events attached to it, and the
//! pure invariants every request must satisfy.
//!
//! # Entities
//!
//! - [`Service`] - namespaced compute service resource, keyed by [`ServiceKey`]
//! - [`EnrichedService`] - a Service with its live events, as returned to callers
//! - [`Event`] - timestamped operational record, fetched best-effort
//!
//! # Value Objects
//!
//! - [`ClusterSpec`] - one [`HeadGroupSpec`] and any number of [`WorkerGroupSpec`]s
//! - [`ServiceStatus`] - store-assigned status, opaque to this layer

pub mod event;
pub mod invariants;
pub mod service;

pub use event::{Event, EventType};
pub use invariants::{ValidationError, ValidationResult};
pub use service::{
    ClusterSpec, EnrichedService, HeadGroupSpec, Service, ServiceKey, ServiceStatus,
    WorkerGroupSpec,
};
