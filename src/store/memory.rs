// Copyright (c) 2025 - Cowboy AI, Inc.
//! In-Memory Resource Store
//!
//! Keeps Services and their events in process memory. Used by the API server's
//! `memory` backend and by tests, which can also make event lookups or every
//! resource call fail on demand.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::{Event, EventType, Service, ServiceKey, ServiceStatus};
use crate::errors::{StoreError, StoreResult};
use crate::store::{EventSource, ResourceStore};

/// Status assigned to newly created Services
pub const INITIAL_SERVICE_STATUS: &str = "Pending";

/// Number of calls each store operation has received
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreCalls {
    pub create: usize,
    pub get: usize,
    pub list: usize,
    pub list_all: usize,
    pub delete: usize,
    pub events: usize,
}

impl StoreCalls {
    /// Calls made to the resource side (events excluded)
    pub fn resource_calls(&self) -> usize {
        self.create + self.get + self.list + self.list_all + self.delete
    }
}

#[derive(Default)]
struct Counters {
    create: AtomicUsize,
    get: AtomicUsize,
    list: AtomicUsize,
    list_all: AtomicUsize,
    delete: AtomicUsize,
    events: AtomicUsize,
}

/// In-memory implementation of [`ResourceStore`] and [`EventSource`]
#[derive(Default)]
pub struct InMemoryResourceStore {
    services: RwLock<BTreeMap<ServiceKey, Service>>,
    events: RwLock<HashMap<ServiceKey, Vec<Event>>>,
    failing_events: RwLock<HashSet<ServiceKey>>,
    unavailable: AtomicBool,
    counters: Counters,
}

impl InMemoryResourceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-existing Services without recording any events
    pub async fn seed(&self, services: impl IntoIterator<Item = Service>) {
        let mut guard = self.services.write().await;
        for service in services {
            guard.insert(service.key(), service);
        }
    }

    /// Append an event to a Service's history
    pub async fn record_event(&self, key: &ServiceKey, event: Event) {
        self.events
            .write()
            .await
            .entry(key.clone())
            .or_default()
            .push(event);
    }

    /// Make event lookups for `key` fail until cleared
    pub async fn fail_events_for(&self, key: ServiceKey) {
        self.failing_events.write().await.insert(key);
    }

    /// Let event lookups for every Service succeed again
    pub async fn clear_event_failures(&self) {
        self.failing_events.write().await.clear();
    }

    /// Make every resource call fail with [`StoreError::Unavailable`]
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn calls(&self) -> StoreCalls {
        let c = &self.counters;
        StoreCalls {
            create: c.create.load(Ordering::SeqCst),
            get: c.get.load(Ordering::SeqCst),
            list: c.list.load(Ordering::SeqCst),
            list_all: c.list_all.load(Ordering::SeqCst),
            delete: c.delete.load(Ordering::SeqCst),
            events: c.events.load(Ordering::SeqCst),
        }
    }

    fn check_available(&self) -> StoreResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("in-memory store marked unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ResourceStore for InMemoryResourceStore {
    async fn create(&self, mut service: Service) -> StoreResult<Service> {
        self.counters.create.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        let key = service.key();
        let now = Utc::now();
        {
            let mut guard = self.services.write().await;
            if guard.contains_key(&key) {
                return Err(StoreError::already_exists(&key));
            }

            service.created_at = Some(now);
            service.deleted_at = None;
            service.status = Some(ServiceStatus {
                service_status: INITIAL_SERVICE_STATUS.to_string(),
                cluster_name: Some(format!("{}-cluster", key.name)),
                ..Default::default()
            });
            guard.insert(key.clone(), service.clone());
        }

        let event = Event::new(
            &key,
            EventType::Normal,
            "ServiceCreated",
            format!("Created service {}", key),
            now,
        );
        self.record_event(&key, event).await;

        debug!(service = %key, "Stored service");
        Ok(service)
    }

    async fn get(&self, name: &str, namespace: &str) -> StoreResult<Service> {
        self.counters.get.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        let key = ServiceKey::new(namespace, name);
        self.services
            .read()
            .await
            .get(&key)
            .cloned()
            .ok_or_else(|| StoreError::not_found(&key))
    }

    async fn list(&self, namespace: &str) -> StoreResult<Vec<Service>> {
        self.counters.list.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        Ok(self
            .services
            .read()
            .await
            .values()
            .filter(|s| s.namespace == namespace)
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> StoreResult<Vec<Service>> {
        self.counters.list_all.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        Ok(self.services.read().await.values().cloned().collect())
    }

    async fn delete(&self, name: &str, namespace: &str) -> StoreResult<()> {
        self.counters.delete.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        let key = ServiceKey::new(namespace, name);
        self.services
            .write()
            .await
            .remove(&key)
            .ok_or_else(|| StoreError::not_found(&key))?;
        self.events.write().await.remove(&key);

        debug!(service = %key, "Removed service");
        Ok(())
    }
}

#[async_trait]
impl EventSource for InMemoryResourceStore {
    async fn get_events(&self, service: &Service) -> StoreResult<Vec<Event>> {
        self.counters.events.fetch_add(1, Ordering::SeqCst);

        let key = service.key();
        if self.failing_events.read().await.contains(&key) {
            return Err(StoreError::Failure(format!("event lookup failed for {}", key)));
        }

        Ok(self
            .events
            .read()
            .await
            .get(&key)
            .cloned()
            .unwrap_or_default())
    }
}
