// Copyright (c) 2025 - Cowboy AI, Inc.
//! NATS Resource Store Client
//!
//! Implements [`ResourceStore`] and [`EventSource`] against a remote resource
//! manager reachable over NATS request/reply. Each contract call is exactly
//! one request on `{prefix}.{operation}`; replies use the same
//! [`ApiReply`] envelope as the public API.
//!
//! Timeouts come from the client's [`NatsConfig::request_timeout`](crate::nats::NatsConfig).

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::api::{
    ApiError, ApiReply, DeleteServiceRequest, Empty, ErrorCode, GetServiceRequest,
    ListAllServicesRequest, ListServicesRequest,
};
use crate::domain::{Event, Service, ServiceKey};
use crate::errors::{StoreError, StoreResult};
use crate::nats::NatsClient;
use crate::store::{EventSource, ResourceStore};
use crate::subjects::{Operation, SubjectBuilder, STORE_ROOT};

/// Resource store backed by a remote resource manager on NATS
///
/// # Example
///
/// ```rust,no_run
/// use cim_service_api::nats::{NatsClient, NatsConfig};
/// use cim_service_api::store::{NatsResourceStore, ResourceStore};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = NatsClient::new(NatsConfig::default()).await?;
///     let store = NatsResourceStore::new(client);
///     let services = store.list("default").await?;
///     println!("{} services", services.len());
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct NatsResourceStore {
    client: NatsClient,
    subject_prefix: String,
}

impl NatsResourceStore {
    /// Create a store client using the default subject prefix
    pub fn new(client: NatsClient) -> Self {
        Self::with_prefix(client, STORE_ROOT)
    }

    pub fn with_prefix(client: NatsClient, subject_prefix: impl Into<String>) -> Self {
        Self {
            client,
            subject_prefix: subject_prefix.into(),
        }
    }

    fn subject(&self, operation: Operation) -> String {
        SubjectBuilder::new(&self.subject_prefix)
            .operation(operation)
            .build()
    }

    /// Send one request and unwrap the reply envelope
    ///
    /// `key` names the addressed resource so a `not_found` reply can be
    /// mapped back to [`StoreError::NotFound`].
    async fn call<T, R>(
        &self,
        operation: Operation,
        request: &T,
        key: Option<&ServiceKey>,
    ) -> StoreResult<R>
    where
        T: Serialize + Sync,
        R: DeserializeOwned + Send,
    {
        let subject = self.subject(operation);
        debug!(%subject, "Calling resource manager");

        let reply: ApiReply<R> = self.client.request(&subject, request).await?;
        reply
            .into_result()
            .map_err(|err| store_error_from_reply(err, key))
    }
}

/// Map an error reply of the resource manager onto the store contract
pub(crate) fn store_error_from_reply(err: ApiError, key: Option<&ServiceKey>) -> StoreError {
    match (err.code, key) {
        (ErrorCode::NotFound, Some(key)) => StoreError::not_found(key),
        (ErrorCode::AlreadyExists, Some(key)) => StoreError::already_exists(key),
        (ErrorCode::Unavailable, _) => StoreError::Unavailable(err.message),
        _ => StoreError::Failure(err.message),
    }
}

#[async_trait]
impl ResourceStore for NatsResourceStore {
    async fn create(&self, service: Service) -> StoreResult<Service> {
        let key = service.key();
        self.call(Operation::Create, &service, Some(&key)).await
    }

    async fn get(&self, name: &str, namespace: &str) -> StoreResult<Service> {
        let request = GetServiceRequest {
            name: name.to_string(),
            namespace: namespace.to_string(),
        };
        let key = ServiceKey::new(namespace, name);
        self.call(Operation::Get, &request, Some(&key)).await
    }

    async fn list(&self, namespace: &str) -> StoreResult<Vec<Service>> {
        let request = ListServicesRequest {
            namespace: namespace.to_string(),
        };
        self.call(Operation::List, &request, None).await
    }

    async fn list_all(&self) -> StoreResult<Vec<Service>> {
        self.call(Operation::ListAll, &ListAllServicesRequest {}, None)
            .await
    }

    async fn delete(&self, name: &str, namespace: &str) -> StoreResult<()> {
        let request = DeleteServiceRequest {
            name: name.to_string(),
            namespace: namespace.to_string(),
        };
        let key = ServiceKey::new(namespace, name);
        let _: Empty = self.call(Operation::Delete, &request, Some(&key)).await?;
        Ok(())
    }
}

#[async_trait]
impl EventSource for NatsResourceStore {
    async fn get_events(&self, service: &Service) -> StoreResult<Vec<Event>> {
        let key = service.key();
        self.call(Operation::Events, &key, Some(&key)).await
    }
}
