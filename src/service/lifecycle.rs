// Copyright (c) 2025 - Cowboy AI, Inc.
//! Service Lifecycle Façade
//!
//! Validates lifecycle requests and forwards them to the resource store,
//! attaching live events to every Service it returns.
//!
//! # Two-Phase Shape
//!
//! ```text
//! Request → Validator → ResourceStore (authoritative, hard-fail)
//!                            ↓
//!                       EventSource (best-effort, soft-fail)
//!                            ↓
//!                       EnrichedService(s)
//! ```
//!
//! A store failure fails the operation with a categorized [`ServiceError`].
//! An event lookup failure never does: it is reported to the observer and the
//! affected Service is returned with no events.
//!
//! The façade holds no mutable state. Dropping an operation's future cancels
//! the store calls in flight; nothing is retried.

use async_trait::async_trait;
use std::sync::Arc;

use crate::api::CreateServiceRequest;
use crate::domain::invariants::{
    validate_create_service_request, validate_namespace, validate_service_key,
};
use crate::domain::{EnrichedService, ValidationError};
use crate::errors::{ErrorKind, StoreError};
use crate::service::enrich::EventEnricher;
use crate::service::observer::{
    CompositeObserver, MetricsObserver, ServiceMetrics, ServiceObserver, TracingObserver,
};
use crate::store::{EventSource, ResourceStore};
use crate::subjects::Operation;

/// Default bound on concurrent event lookups during list operations
pub const DEFAULT_ENRICHMENT_CONCURRENCY: usize = 8;

const CREATE_VALIDATION_CONTEXT: &str = "validate create service request failed";
const CREATE_CONTEXT: &str = "create service failed";
const GET_VALIDATION_CONTEXT: &str = "invalid get service request";
const GET_CONTEXT: &str = "get service failed";
const LIST_VALIDATION_CONTEXT: &str = "invalid list services request";
const LIST_CONTEXT: &str = "list services failed";
const LIST_ALL_CONTEXT: &str = "list all services failed";
const DELETE_VALIDATION_CONTEXT: &str = "invalid delete service request";

/// Service layer result type
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service layer errors
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Request rejected before any store call
    #[error("{context}: {source}")]
    InvalidInput {
        context: &'static str,
        #[source]
        source: ValidationError,
    },

    /// Store call failed, wrapped with the operation it belonged to
    #[error("{context}: {source}")]
    StoreCall {
        context: &'static str,
        #[source]
        source: StoreError,
    },

    /// Store call failed, passed through as-is
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    pub fn invalid_input(context: &'static str, source: ValidationError) -> Self {
        ServiceError::InvalidInput { context, source }
    }

    pub fn store_call(context: &'static str, source: StoreError) -> Self {
        ServiceError::StoreCall { context, source }
    }

    /// Caller-visible category; wrapping never changes it
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::InvalidInput { .. } => ErrorKind::InvalidInput,
            ServiceError::StoreCall { source, .. } | ServiceError::Store(source) => source.kind(),
        }
    }

    pub fn validation_error(&self) -> Option<&ValidationError> {
        match self {
            ServiceError::InvalidInput { source, .. } => Some(source),
            _ => None,
        }
    }

    pub fn store_error(&self) -> Option<&StoreError> {
        match self {
            ServiceError::StoreCall { source, .. } | ServiceError::Store(source) => Some(source),
            ServiceError::InvalidInput { .. } => None,
        }
    }
}

/// Lifecycle operations on managed compute services
#[async_trait]
pub trait ServiceLifecycle: Send + Sync {
    /// Validate and create a Service in the request's namespace
    ///
    /// The payload's namespace is overwritten with the request namespace.
    async fn create_service(&self, request: CreateServiceRequest) -> ServiceResult<EnrichedService>;

    /// Read one Service
    async fn get_service(&self, name: &str, namespace: &str) -> ServiceResult<EnrichedService>;

    /// List the Services of one namespace, in store order
    async fn list_services(&self, namespace: &str) -> ServiceResult<Vec<EnrichedService>>;

    /// List the Services of every namespace, in store order
    async fn list_all_services(&self) -> ServiceResult<Vec<EnrichedService>>;

    /// Delete one Service
    ///
    /// Store failures are returned unwrapped.
    async fn delete_service(&self, name: &str, namespace: &str) -> ServiceResult<()>;
}

/// Options of [`ServiceServer`]
#[derive(Debug, Clone)]
pub struct ServiceServerOptions {
    /// Count operation outcomes in a [`MetricsObserver`]
    pub collect_metrics: bool,
    /// Bound on concurrent event lookups during list operations
    pub enrichment_concurrency: usize,
}

impl Default for ServiceServerOptions {
    fn default() -> Self {
        Self {
            collect_metrics: false,
            enrichment_concurrency: DEFAULT_ENRICHMENT_CONCURRENCY,
        }
    }
}

/// Stateless lifecycle façade over a resource store and an event source
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use cim_service_api::service::{ServiceLifecycle, ServiceServer, ServiceServerOptions};
/// use cim_service_api::store::InMemoryResourceStore;
///
/// # tokio_test::block_on(async {
/// let store = Arc::new(InMemoryResourceStore::new());
/// let server = ServiceServer::new(store.clone(), store, ServiceServerOptions::default());
///
/// let services = server.list_services("default").await.unwrap();
/// assert!(services.is_empty());
/// # });
/// ```
pub struct ServiceServer<S, E> {
    store: S,
    enricher: EventEnricher<E>,
    observer: Arc<dyn ServiceObserver>,
    metrics: Option<Arc<MetricsObserver>>,
}

impl<S, E> ServiceServer<S, E>
where
    S: ResourceStore,
    E: EventSource,
{
    /// Create a server reporting through [`TracingObserver`], plus a
    /// [`MetricsObserver`] when `collect_metrics` is set
    pub fn new(store: S, events: E, options: ServiceServerOptions) -> Self {
        let mut observer = CompositeObserver::default();
        observer.push(Arc::new(TracingObserver));

        let metrics = options.collect_metrics.then(|| Arc::new(MetricsObserver::new()));
        if let Some(metrics) = &metrics {
            observer.push(metrics.clone());
        }

        let mut server = Self::with_observer(store, events, Arc::new(observer), options);
        server.metrics = metrics;
        server
    }

    /// Create a server reporting only through `observer`
    pub fn with_observer(
        store: S,
        events: E,
        observer: Arc<dyn ServiceObserver>,
        options: ServiceServerOptions,
    ) -> Self {
        Self {
            store,
            enricher: EventEnricher::new(events, observer.clone(), options.enrichment_concurrency),
            observer,
            metrics: None,
        }
    }

    /// Outcome counters, if metrics collection is enabled
    pub fn metrics(&self) -> Option<ServiceMetrics> {
        self.metrics.as_ref().map(|m| m.snapshot())
    }

    fn observe<T>(&self, operation: Operation, result: ServiceResult<T>) -> ServiceResult<T> {
        let outcome = result.as_ref().map(|_| ()).map_err(ServiceError::kind);
        self.observer.operation_completed(operation, outcome);
        result
    }

    async fn create(&self, request: CreateServiceRequest) -> ServiceResult<EnrichedService> {
        validate_create_service_request(&request)
            .map_err(|e| ServiceError::invalid_input(CREATE_VALIDATION_CONTEXT, e))?;

        let CreateServiceRequest { namespace, service } = request;
        let Some(mut service) = service else {
            return Err(ServiceError::invalid_input(
                CREATE_VALIDATION_CONTEXT,
                ValidationError::MissingService,
            ));
        };
        service.namespace = namespace;

        let created = self
            .store
            .create(service)
            .await
            .map_err(|e| ServiceError::store_call(CREATE_CONTEXT, e))?;

        Ok(self.enricher.enrich_one(created).await)
    }

    async fn get(&self, name: &str, namespace: &str) -> ServiceResult<EnrichedService> {
        validate_service_key(name, namespace)
            .map_err(|e| ServiceError::invalid_input(GET_VALIDATION_CONTEXT, e))?;

        let service = self
            .store
            .get(name, namespace)
            .await
            .map_err(|e| ServiceError::store_call(GET_CONTEXT, e))?;

        Ok(self.enricher.enrich_one(service).await)
    }

    async fn list(&self, namespace: &str) -> ServiceResult<Vec<EnrichedService>> {
        validate_namespace(namespace)
            .map_err(|e| ServiceError::invalid_input(LIST_VALIDATION_CONTEXT, e))?;

        let services = self
            .store
            .list(namespace)
            .await
            .map_err(|e| ServiceError::store_call(LIST_CONTEXT, e))?;

        Ok(self.enricher.enrich_all(services).await)
    }

    async fn list_all(&self) -> ServiceResult<Vec<EnrichedService>> {
        let services = self
            .store
            .list_all()
            .await
            .map_err(|e| ServiceError::store_call(LIST_ALL_CONTEXT, e))?;

        Ok(self.enricher.enrich_all(services).await)
    }

    async fn delete(&self, name: &str, namespace: &str) -> ServiceResult<()> {
        validate_service_key(name, namespace)
            .map_err(|e| ServiceError::invalid_input(DELETE_VALIDATION_CONTEXT, e))?;

        self.store.delete(name, namespace).await?;
        Ok(())
    }
}

#[async_trait]
impl<S, E> ServiceLifecycle for ServiceServer<S, E>
where
    S: ResourceStore,
    E: EventSource,
{
    async fn create_service(&self, request: CreateServiceRequest) -> ServiceResult<EnrichedService> {
        let result = self.create(request).await;
        self.observe(Operation::Create, result)
    }

    async fn get_service(&self, name: &str, namespace: &str) -> ServiceResult<EnrichedService> {
        let result = self.get(name, namespace).await;
        self.observe(Operation::Get, result)
    }

    async fn list_services(&self, namespace: &str) -> ServiceResult<Vec<EnrichedService>> {
        let result = self.list(namespace).await;
        self.observe(Operation::List, result)
    }

    async fn list_all_services(&self) -> ServiceResult<Vec<EnrichedService>> {
        let result = self.list_all().await;
        self.observe(Operation::ListAll, result)
    }

    async fn delete_service(&self, name: &str, namespace: &str) -> ServiceResult<()> {
        let result = self.delete(name, namespace).await;
        self.observe(Operation::Delete, result)
    }
}
