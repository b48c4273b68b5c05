// Copyright (c) 2025 - Cowboy AI, Inc.
//! Integration tests for the service lifecycle façade
//!
//! These tests verify the two-phase contract of every operation:
//! 1. Validation and the authoritative store call decide success or failure
//! 2. Event enrichment never fails an operation, it only degrades it

mod fixtures;

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use test_case::test_case;

use cim_service_api::domain::{Event, Service, ServiceKey, ValidationError};
use cim_service_api::service::{
    ServiceError, ServiceLifecycle, ServiceServer, ServiceServerOptions,
};
use cim_service_api::store::{EventSource, InMemoryResourceStore, ResourceStore};
use cim_service_api::subjects::Operation;
use cim_service_api::{ErrorKind, StoreError, StoreResult};

use fixtures::*;

type MemoryServer = ServiceServer<Arc<InMemoryResourceStore>, Arc<InMemoryResourceStore>>;

fn server_with(store: &Arc<InMemoryResourceStore>, observer: Arc<RecordingObserver>) -> MemoryServer {
    ServiceServer::with_observer(
        store.clone(),
        store.clone(),
        observer,
        ServiceServerOptions::default(),
    )
}

fn setup() -> (Arc<InMemoryResourceStore>, Arc<RecordingObserver>, MemoryServer) {
    let store = Arc::new(InMemoryResourceStore::new());
    let observer = RecordingObserver::new();
    let server = server_with(&store, observer.clone());
    (store, observer, server)
}

// ============================================================================
// Create
// ============================================================================

#[tokio::test]
async fn test_create_with_namespace_mismatch_makes_no_store_call() {
    let (store, _, server) = setup();
    let mut request = create_request_fixture("ns1", "serve-a");
    request.service.as_mut().unwrap().namespace = "ns2".to_string();

    let err = server.create_service(request).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert!(matches!(
        err.validation_error(),
        Some(ValidationError::NamespaceMismatch { .. })
    ));
    assert_eq!(store.calls().resource_calls(), 0);
    assert_eq!(store.calls().events, 0);
}

#[tokio::test]
async fn test_create_with_min_above_max_names_index() {
    let (store, _, server) = setup();
    let mut request = create_request_fixture("ns1", "serve-a");
    request
        .service
        .as_mut()
        .unwrap()
        .cluster_spec
        .worker_group_spec
        .push(worker_group("w2", 5, 2));

    let err = server.create_service(request).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert_eq!(err.validation_error().and_then(|v| v.index()), Some(1));
    assert!(err.to_string().contains("worker group 1"));
    assert_eq!(store.calls().create, 0);
}

#[tokio::test]
async fn test_create_without_payload() {
    let (store, _, server) = setup();
    let request = cim_service_api::CreateServiceRequest {
        namespace: "ns1".to_string(),
        service: None,
    };

    let err = server.create_service(request).await.unwrap_err();

    assert_eq!(err.validation_error(), Some(&ValidationError::MissingService));
    assert_eq!(store.calls().resource_calls(), 0);
}

#[tokio::test]
async fn test_create_stores_once_and_attaches_events() {
    let (store, observer, server) = setup();

    let created = server
        .create_service(create_request_fixture("ns1", "serve-a"))
        .await
        .unwrap();

    assert_eq!(store.calls().create, 1);
    assert_eq!(created.service.namespace, "ns1");
    assert_eq!(created.service.cluster_spec.head_group_spec.compute_template, HEAD_TEMPLATE);
    assert_eq!(created.events.len(), 1);
    assert_eq!(created.events[0].reason, "ServiceCreated");

    let stored = store.get("serve-a", "ns1").await.unwrap();
    assert_eq!(stored.namespace, "ns1");
    assert_eq!(observer.outcomes(), vec![(Operation::Create, Ok(()))]);
}

#[tokio::test]
async fn test_create_succeeds_when_event_lookup_fails() {
    let (store, observer, server) = setup();
    store.fail_events_for(ServiceKey::new("ns1", "serve-a")).await;

    let created = server
        .create_service(create_request_fixture("ns1", "serve-a"))
        .await
        .unwrap();

    assert!(created.events.is_empty());
    assert_eq!(observer.warnings().len(), 1);
    assert_eq!(observer.warnings()[0].key, ServiceKey::new("ns1", "serve-a"));
}

#[tokio::test]
async fn test_create_conflict_is_wrapped_store_failure() {
    let (_, _, server) = setup();
    server
        .create_service(create_request_fixture("ns1", "serve-a"))
        .await
        .unwrap();

    let err = server
        .create_service(create_request_fixture("ns1", "serve-a"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::StoreFailure);
    assert!(err.to_string().starts_with("create service failed: "));
    assert!(matches!(err.store_error(), Some(StoreError::AlreadyExists { .. })));
}

// ============================================================================
// Get / Delete key validation
// ============================================================================

#[test_case("", "ns1" ; "empty name")]
#[test_case("serve-a", "" ; "empty namespace")]
#[test_case("", "" ; "both empty")]
#[tokio::test]
async fn test_get_and_delete_reject_empty_key(name: &str, namespace: &str) {
    let (store, _, server) = setup();

    let get = server.get_service(name, namespace).await.unwrap_err();
    let delete = server.delete_service(name, namespace).await.unwrap_err();

    assert_eq!(get.kind(), ErrorKind::InvalidInput);
    assert_eq!(delete.kind(), ErrorKind::InvalidInput);
    assert_eq!(store.calls().resource_calls(), 0);
}

#[tokio::test]
async fn test_get_missing_stays_not_found() {
    let (store, _, server) = setup();

    let err = server.get_service("serve-a", "ns1").await.unwrap_err();

    assert_eq!(store.calls().get, 1);
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(
        err.store_error(),
        Some(&StoreError::not_found(&ServiceKey::new("ns1", "serve-a")))
    );
}

#[tokio::test]
async fn test_get_returns_events() {
    let (store, _, server) = setup();
    let service = service_fixture("ns1", "serve-a", Vec::new());
    store.seed(vec![service.clone()]).await;
    store
        .record_event(&service.key(), event_fixture(&service.key(), "ScaledUp"))
        .await;

    let fetched = server.get_service("serve-a", "ns1").await.unwrap();

    assert_eq!(fetched.service, service);
    assert_eq!(fetched.events.len(), 1);
    assert_eq!(fetched.events[0].last_timestamp, fixed_timestamp());
}

#[tokio::test]
async fn test_delete_missing_is_verbatim() {
    let (_, _, server) = setup();

    let err = server.delete_service("serve-a", "ns1").await.unwrap_err();

    let expected = StoreError::not_found(&ServiceKey::new("ns1", "serve-a"));
    assert!(matches!(err, ServiceError::Store(_)));
    assert_eq!(err.to_string(), expected.to_string());
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_delete_removes_service_without_enrichment() {
    let (store, _, server) = setup();
    server
        .create_service(create_request_fixture("ns1", "serve-a"))
        .await
        .unwrap();
    let events_before = store.calls().events;

    server.delete_service("serve-a", "ns1").await.unwrap();

    assert_eq!(store.calls().events, events_before);
    assert!(store.list("ns1").await.unwrap().is_empty());
}

// ============================================================================
// List / ListAll
// ============================================================================

#[tokio::test]
async fn test_list_with_failed_event_lookup_keeps_service() {
    let (store, observer, server) = setup();
    let a = service_fixture("ns1", "a", Vec::new());
    let b = service_fixture("ns1", "b", Vec::new());
    store.seed(vec![a.clone(), b.clone()]).await;
    store.record_event(&a.key(), event_fixture(&a.key(), "Ready")).await;
    store.record_event(&b.key(), event_fixture(&b.key(), "Ready")).await;
    store.fail_events_for(b.key()).await;

    let services = server.list_services("ns1").await.unwrap();

    assert_eq!(services.len(), 2);
    assert_eq!(services[0].service.name, "a");
    assert_eq!(services[0].events.len(), 1);
    assert_eq!(services[1].service.name, "b");
    assert!(services[1].events.is_empty());
    assert_eq!(observer.warnings().len(), 1);
    assert_eq!(observer.outcomes(), vec![(Operation::List, Ok(()))]);
}

#[tokio::test]
async fn test_list_requires_namespace() {
    let (store, _, server) = setup();

    let err = server.list_services("").await.unwrap_err();

    assert_eq!(err.validation_error(), Some(&ValidationError::EmptyNamespace));
    assert_eq!(store.calls().list, 0);
}

#[tokio::test]
async fn test_list_all_keeps_same_names_in_different_namespaces_apart() {
    let (store, _, server) = setup();
    let first = service_fixture("ns1", "serve", Vec::new());
    let second = service_fixture("ns2", "serve", Vec::new());
    store.seed(vec![first.clone(), second.clone()]).await;
    store
        .record_event(&first.key(), event_fixture(&first.key(), "OnlyInNs1"))
        .await;

    let services = server.list_all_services().await.unwrap();

    assert_eq!(services.len(), 2);
    assert_eq!(services[0].key(), first.key());
    assert_eq!(services[0].events[0].reason, "OnlyInNs1");
    assert_eq!(services[1].key(), second.key());
    assert!(services[1].events.is_empty());
}

#[tokio::test]
async fn test_store_failure_is_retryable_and_wrapped() {
    let (store, observer, server) = setup();
    store.set_unavailable(true);

    let err = server.list_all_services().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::StoreFailure);
    assert!(err.kind().is_retryable());
    assert!(err.to_string().starts_with("list all services failed: "));
    assert_eq!(
        observer.outcomes(),
        vec![(Operation::ListAll, Err(ErrorKind::StoreFailure))]
    );
}

// ============================================================================
// Concurrency and cancellation
// ============================================================================

/// Event source that sleeps on every lookup and tracks peak concurrency
#[derive(Default)]
struct SlowEvents {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

#[async_trait]
impl EventSource for SlowEvents {
    async fn get_events(&self, _service: &Service) -> StoreResult<Vec<Event>> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(10)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn test_list_event_lookups_are_bounded() {
    let store = Arc::new(InMemoryResourceStore::new());
    store
        .seed((0..6).map(|i| service_fixture("ns1", &format!("s{}", i), Vec::new())))
        .await;
    let events = Arc::new(SlowEvents::default());
    let server = ServiceServer::with_observer(
        store,
        events.clone(),
        RecordingObserver::new(),
        ServiceServerOptions {
            enrichment_concurrency: 2,
            ..Default::default()
        },
    );

    let services = server.list_services("ns1").await.unwrap();

    assert_eq!(services.len(), 6);
    assert_eq!(events.peak.load(Ordering::SeqCst), 2);
}

/// Resource store whose reads never complete; counts dropped calls
#[derive(Default)]
struct HangingStore {
    dropped: Arc<AtomicUsize>,
}

struct DropCounter(Arc<AtomicUsize>);

impl Drop for DropCounter {
    fn drop(&mut self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ResourceStore for HangingStore {
    async fn create(&self, service: Service) -> StoreResult<Service> {
        Ok(service)
    }

    async fn get(&self, _name: &str, _namespace: &str) -> StoreResult<Service> {
        let _guard = DropCounter(self.dropped.clone());
        std::future::pending().await
    }

    async fn list(&self, _namespace: &str) -> StoreResult<Vec<Service>> {
        Ok(Vec::new())
    }

    async fn list_all(&self) -> StoreResult<Vec<Service>> {
        Ok(Vec::new())
    }

    async fn delete(&self, _name: &str, _namespace: &str) -> StoreResult<()> {
        Ok(())
    }
}

#[tokio::test]
async fn test_cancelled_call_drops_in_flight_store_call() {
    let store = HangingStore::default();
    let dropped = store.dropped.clone();
    let server = ServiceServer::with_observer(
        store,
        Arc::new(InMemoryResourceStore::new()),
        RecordingObserver::new(),
        ServiceServerOptions::default(),
    );

    let result =
        tokio::time::timeout(Duration::from_millis(20), server.get_service("serve-a", "ns1")).await;

    assert!(result.is_err());
    assert_eq!(dropped.load(Ordering::SeqCst), 1);
}
