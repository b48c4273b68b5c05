// Copyright (c) 2025 - Cowboy AI, Inc.
//! Observability Collaborators
//!
//! The façade reports what happened through an injected [`ServiceObserver`]
//! instead of a process-wide logger. Two observers ship with the crate:
//!
//! - [`TracingObserver`]: structured `tracing` records
//! - [`MetricsObserver`]: in-process counters, read back as [`ServiceMetrics`]
//!
//! [`CompositeObserver`] fans a report out to several observers.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::ServiceKey;
use crate::errors::{ErrorKind, StoreError};
use crate::subjects::Operation;

/// Event lookup failure for one Service
///
/// Never surfaced as an operation failure; the Service is returned with an
/// empty event list instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to get events of service {key}: {source}")]
pub struct EnrichmentWarning {
    pub key: ServiceKey,
    #[source]
    pub source: StoreError,
}

/// Receiver of façade outcomes
pub trait ServiceObserver: Send + Sync {
    /// An event lookup failed and was swallowed
    fn enrichment_failed(&self, warning: &EnrichmentWarning);

    /// A lifecycle operation finished
    fn operation_completed(&self, _operation: Operation, _outcome: Result<(), ErrorKind>) {}
}

/// Observer emitting structured `tracing` records
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ServiceObserver for TracingObserver {
    fn enrichment_failed(&self, warning: &EnrichmentWarning) {
        warn!(
            namespace = %warning.key.namespace,
            name = %warning.key.name,
            error = %warning.source,
            "Failed to get service events"
        );
    }

    fn operation_completed(&self, operation: Operation, outcome: Result<(), ErrorKind>) {
        match outcome {
            Ok(()) => debug!(%operation, "Service operation succeeded"),
            Err(ErrorKind::StoreFailure) => {
                warn!(%operation, "Service operation failed in the resource store")
            }
            Err(kind) => debug!(%operation, ?kind, "Service operation rejected"),
        }
    }
}

/// Snapshot of [`MetricsObserver`] counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServiceMetrics {
    pub succeeded: u64,
    pub invalid_input: u64,
    pub not_found: u64,
    pub store_failures: u64,
    pub enrichment_failures: u64,
}

impl ServiceMetrics {
    pub fn failed(&self) -> u64 {
        self.invalid_input + self.not_found + self.store_failures
    }
}

/// Observer counting outcomes in process memory
#[derive(Debug, Default)]
pub struct MetricsObserver {
    succeeded: AtomicU64,
    invalid_input: AtomicU64,
    not_found: AtomicU64,
    store_failures: AtomicU64,
    enrichment_failures: AtomicU64,
}

impl MetricsObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> ServiceMetrics {
        ServiceMetrics {
            succeeded: self.succeeded.load(Ordering::Relaxed),
            invalid_input: self.invalid_input.load(Ordering::Relaxed),
            not_found: self.not_found.load(Ordering::Relaxed),
            store_failures: self.store_failures.load(Ordering::Relaxed),
            enrichment_failures: self.enrichment_failures.load(Ordering::Relaxed),
        }
    }
}

impl ServiceObserver for MetricsObserver {
    fn enrichment_failed(&self, _warning: &EnrichmentWarning) {
        self.enrichment_failures.fetch_add(1, Ordering::Relaxed);
    }

    fn operation_completed(&self, _operation: Operation, outcome: Result<(), ErrorKind>) {
        let counter = match outcome {
            Ok(()) => &self.succeeded,
            Err(ErrorKind::InvalidInput) => &self.invalid_input,
            Err(ErrorKind::NotFound) => &self.not_found,
            Err(ErrorKind::StoreFailure) => &self.store_failures,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// Observer forwarding every report to each inner observer in order
#[derive(Clone, Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn ServiceObserver>>,
}

impl CompositeObserver {
    pub fn new(observers: Vec<Arc<dyn ServiceObserver>>) -> Self {
        Self { observers }
    }

    pub fn push(&mut self, observer: Arc<dyn ServiceObserver>) {
        self.observers.push(observer);
    }
}

impl ServiceObserver for CompositeObserver {
    fn enrichment_failed(&self, warning: &EnrichmentWarning) {
        for observer in &self.observers {
            observer.enrichment_failed(warning);
        }
    }

    fn operation_completed(&self, operation: Operation, outcome: Result<(), ErrorKind>) {
        for observer in &self.observers {
            observer.operation_completed(operation, outcome);
        }
    }
}
