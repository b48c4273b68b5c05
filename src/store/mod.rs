// Copyright (c) 2025 - Cowboy AI, Inc.
//! Resource Store Abstraction
//!
//! This module defines the two collaborators the service façade talks to:
//!
//! - [`ResourceStore`]: authoritative create/read/list/delete of Service
//!   resources in the orchestrator's storage
//! - [`EventSource`]: live lookup of the operational events of one Service
//!
//! # Architecture
//!
//! ```text
//! Façade → ResourceStore → orchestrator storage
//!    ↓
//! EventSource (best-effort, per resource)
//! ```
//!
//! Implementations own their timeouts. The façade never retries; dropping a
//! returned future must cancel the underlying call.
//!
//! # Example
//!
//! ```rust
//! use cim_service_api::store::{InMemoryResourceStore, ResourceStore};
//!
//! # tokio_test::block_on(async {
//! let store = InMemoryResourceStore::new();
//! assert!(store.list_all().await.unwrap().is_empty());
//! # });
//! ```

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{Event, Service};
use crate::errors::StoreResult;

pub mod memory;
pub mod nats;

pub use memory::InMemoryResourceStore;
pub use nats::NatsResourceStore;

/// Authoritative storage of Service resources
///
/// Errors distinguish at least `NotFound` from generic store failures.
#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// Create a Service, returning it with store-assigned fields filled in
    async fn create(&self, service: Service) -> StoreResult<Service>;

    /// Read one Service by key
    async fn get(&self, name: &str, namespace: &str) -> StoreResult<Service>;

    /// List the Services of one namespace
    async fn list(&self, namespace: &str) -> StoreResult<Vec<Service>>;

    /// List the Services of every namespace
    async fn list_all(&self) -> StoreResult<Vec<Service>>;

    /// Delete one Service by key
    async fn delete(&self, name: &str, namespace: &str) -> StoreResult<()>;
}

/// Operational history of Service resources
///
/// Callers treat failures as non-fatal.
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Events recorded for `service`, keyed by its namespace and name
    async fn get_events(&self, service: &Service) -> StoreResult<Vec<Event>>;
}

#[async_trait]
impl<T: ResourceStore + ?Sized> ResourceStore for Arc<T> {
    async fn create(&self, service: Service) -> StoreResult<Service> {
        (**self).create(service).await
    }

    async fn get(&self, name: &str, namespace: &str) -> StoreResult<Service> {
        (**self).get(name, namespace).await
    }

    async fn list(&self, namespace: &str) -> StoreResult<Vec<Service>> {
        (**self).list(namespace).await
    }

    async fn list_all(&self) -> StoreResult<Vec<Service>> {
        (**self).list_all().await
    }

    async fn delete(&self, name: &str, namespace: &str) -> StoreResult<()> {
        (**self).delete(name, namespace).await
    }
}

#[async_trait]
impl<T: EventSource + ?Sized> EventSource for Arc<T> {
    async fn get_events(&self, service: &Service) -> StoreResult<Vec<Event>> {
        (**self).get_events(service).await
    }
}
