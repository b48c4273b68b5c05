// Copyright (c) 2025 - Cowboy AI, Inc.
//! Test Fixtures for cim-service-api
//!
//! Provides deterministic test data for the lifecycle integration tests.
//! All timestamps are fixed constants so tests are reproducible.

#![allow(dead_code)]

use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};

use cim_service_api::domain::{
    ClusterSpec, Event, EventType, HeadGroupSpec, Service, ServiceKey, WorkerGroupSpec,
};
use cim_service_api::service::{EnrichmentWarning, ServiceObserver};
use cim_service_api::subjects::Operation;
use cim_service_api::{CreateServiceRequest, ErrorKind};

// Fixed test timestamp (2026-01-19T12:00:00Z)
pub const FIXED_TIMESTAMP: &str = "2026-01-19T12:00:00Z";

pub const HEAD_TEMPLATE: &str = "tpl-a";
pub const WORKER_TEMPLATE: &str = "tpl-b";

/// Parse the fixed timestamp
pub fn fixed_timestamp() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(FIXED_TIMESTAMP)
        .expect("Invalid timestamp in test fixture")
        .with_timezone(&Utc)
}

pub fn worker_group(group: &str, min: i32, max: i32) -> WorkerGroupSpec {
    WorkerGroupSpec {
        group_name: group.to_string(),
        compute_template: WORKER_TEMPLATE.to_string(),
        replicas: min,
        min_replicas: min,
        max_replicas: max,
        ..Default::default()
    }
}

/// A valid Service with one head group and the given workers
pub fn service_fixture(namespace: &str, name: &str, workers: Vec<WorkerGroupSpec>) -> Service {
    Service {
        name: name.to_string(),
        namespace: namespace.to_string(),
        user: "alice".to_string(),
        cluster_spec: ClusterSpec {
            head_group_spec: HeadGroupSpec {
                compute_template: HEAD_TEMPLATE.to_string(),
                ..Default::default()
            },
            worker_group_spec: workers,
        },
        ..Default::default()
    }
}

/// Create request whose payload namespace matches the outer namespace
pub fn create_request_fixture(namespace: &str, name: &str) -> CreateServiceRequest {
    CreateServiceRequest {
        namespace: namespace.to_string(),
        service: Some(service_fixture(
            namespace,
            name,
            vec![worker_group("w1", 1, 3)],
        )),
    }
}

pub fn event_fixture(key: &ServiceKey, reason: &str) -> Event {
    Event::new(
        key,
        EventType::Normal,
        reason,
        format!("{} for {}", reason, key),
        fixed_timestamp(),
    )
}

/// Observer that records everything it is told
#[derive(Default)]
pub struct RecordingObserver {
    pub warnings: Mutex<Vec<EnrichmentWarning>>,
    pub outcomes: Mutex<Vec<(Operation, Result<(), ErrorKind>)>>,
}

impl RecordingObserver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn warnings(&self) -> Vec<EnrichmentWarning> {
        self.warnings.lock().unwrap().clone()
    }

    pub fn outcomes(&self) -> Vec<(Operation, Result<(), ErrorKind>)> {
        self.outcomes.lock().unwrap().clone()
    }
}

impl ServiceObserver for RecordingObserver {
    fn enrichment_failed(&self, warning: &EnrichmentWarning) {
        self.warnings.lock().unwrap().push(warning.clone());
    }

    fn operation_completed(&self, operation: Operation, outcome: Result<(), ErrorKind>) {
        self.outcomes.lock().unwrap().push((operation, outcome));
    }
}
