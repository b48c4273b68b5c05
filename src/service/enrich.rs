// Copyright (c) 2025 - Cowboy AI, Inc.
//! Best-Effort Event Enrichment
//!
//! Attaches live events to Services without ever failing the primary
//! operation. A failed lookup is reported to the observer and the Service is
//! returned with an empty event list.

use futures::future;
use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use crate::domain::{EnrichedService, Event, Service, ServiceKey};
use crate::service::observer::{EnrichmentWarning, ServiceObserver};
use crate::store::EventSource;

/// Await a secondary lookup, turning its failure into `None`
///
/// `on_failure` receives the error; the caller's primary result is unaffected.
pub async fn best_effort<D, E, Fut>(lookup: Fut, on_failure: impl FnOnce(E)) -> Option<D>
where
    Fut: Future<Output = Result<D, E>>,
{
    match lookup.await {
        Ok(data) => Some(data),
        Err(err) => {
            on_failure(err);
            None
        }
    }
}

/// Attaches events from an [`EventSource`] to Services
pub struct EventEnricher<E> {
    events: E,
    observer: Arc<dyn ServiceObserver>,
    concurrency: usize,
}

impl<E: EventSource> EventEnricher<E> {
    /// `concurrency` bounds the lookups in flight for list operations (min 1)
    pub fn new(events: E, observer: Arc<dyn ServiceObserver>, concurrency: usize) -> Self {
        Self {
            events,
            observer,
            concurrency: concurrency.max(1),
        }
    }

    /// Events of one Service, or `None` if the lookup failed
    async fn lookup(&self, service: &Service) -> Option<Vec<Event>> {
        best_effort(self.events.get_events(service), |source| {
            self.observer.enrichment_failed(&EnrichmentWarning {
                key: service.key(),
                source,
            })
        })
        .await
    }

    pub async fn enrich_one(&self, service: Service) -> EnrichedService {
        let events = self.lookup(&service).await.unwrap_or_default();
        EnrichedService::new(service, events)
    }

    /// Enrich every Service, preserving the input order
    ///
    /// Lookups run concurrently and complete in any order; results are keyed
    /// by Service identity, and Services whose lookup failed are missing from
    /// the map and get an empty list.
    pub async fn enrich_all(&self, services: Vec<Service>) -> Vec<EnrichedService> {
        let events_by_key = self.events_by_key(&services).await;

        services
            .into_iter()
            .map(|service| {
                let events = events_by_key
                    .get(&service.key())
                    .cloned()
                    .unwrap_or_default();
                EnrichedService::new(service, events)
            })
            .collect()
    }

    async fn events_by_key(&self, services: &[Service]) -> HashMap<ServiceKey, Vec<Event>> {
        stream::iter(services.to_vec())
            .map(|service| async move {
                let events = self.lookup(&service).await;
                events.map(|events| (service.key(), events))
            })
            .buffer_unordered(self.concurrency)
            .filter_map(future::ready)
            .collect()
            .await
    }
}
