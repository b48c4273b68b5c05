// Copyright (c) 2025 - Cowboy AI, Inc.
//! NATS Request/Reply Server for the Lifecycle API
//!
//! Subscribes to `{prefix}.*` as a queue-group member and answers each
//! request on its own task:
//!
//! ```text
//! {prefix}.create    CreateServiceRequest    → EnrichedService
//! {prefix}.get       GetServiceRequest       → EnrichedService
//! {prefix}.list      ListServicesRequest     → ListServicesResponse
//! {prefix}.list_all  ListAllServicesRequest  → ListServicesResponse
//! {prefix}.delete    DeleteServiceRequest    → Empty
//! ```
//!
//! Every reply is an [`ApiReply`] envelope. At most `max_in_flight` requests
//! are handled at once; on shutdown, in-flight replies get `drain_timeout` to
//! finish before they are aborted.

use futures::StreamExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error, info, warn};

use crate::api::{
    ApiError, ApiReply, CreateServiceRequest, DeleteServiceRequest, Empty, ErrorCode,
    GetServiceRequest, ListAllServicesRequest, ListServicesRequest, ListServicesResponse,
};
use crate::errors::InfrastructureResult;
use crate::nats::NatsClient;
use crate::service::ServiceLifecycle;
use crate::subjects::{parse_operation, Operation, SubjectBuilder, API_ROOT};

/// Default queue group shared by API server replicas
pub const DEFAULT_QUEUE_GROUP: &str = "service-apiserver";

/// Default bound on requests handled concurrently
pub const DEFAULT_MAX_IN_FLIGHT: usize = 256;

/// Default time in-flight replies get to finish after shutdown
pub const DEFAULT_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Lifecycle API served over NATS
pub struct ServiceApiServer<L: ?Sized> {
    lifecycle: Arc<L>,
    client: NatsClient,
    subject_prefix: String,
    queue_group: String,
    max_in_flight: usize,
    drain_timeout: Duration,
}

impl<L> ServiceApiServer<L>
where
    L: ServiceLifecycle + ?Sized + 'static,
{
    pub fn new(lifecycle: Arc<L>, client: NatsClient) -> Self {
        Self {
            lifecycle,
            client,
            subject_prefix: API_ROOT.to_string(),
            queue_group: DEFAULT_QUEUE_GROUP.to_string(),
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
            drain_timeout: DEFAULT_DRAIN_TIMEOUT,
        }
    }

    pub fn with_subject_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.subject_prefix = prefix.into();
        self
    }

    pub fn with_queue_group(mut self, queue_group: impl Into<String>) -> Self {
        self.queue_group = queue_group.into();
        self
    }

    /// Stop reading requests while `max_in_flight` are being handled (min 1)
    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight.max(1);
        self
    }

    pub fn with_drain_timeout(mut self, drain_timeout: Duration) -> Self {
        self.drain_timeout = drain_timeout;
        self
    }

    /// Serve requests until `shutdown` resolves or the subscription ends
    pub async fn serve_until(&self, shutdown: impl Future<Output = ()>) -> InfrastructureResult<()> {
        let subject = SubjectBuilder::new(&self.subject_prefix).build_wildcard();
        let mut subscriber = self.client.queue_subscribe(&subject, &self.queue_group).await?;
        info!(%subject, queue_group = %self.queue_group, "Serving service lifecycle API");

        let mut tasks = JoinSet::new();
        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested, no longer accepting requests");
                    break;
                }
                Some(result) = tasks.join_next(), if !tasks.is_empty() => {
                    log_task_failure(result);
                }
                message = subscriber.next(), if tasks.len() < self.max_in_flight => {
                    let Some(message) = message else {
                        warn!("Subscription closed");
                        break;
                    };
                    self.spawn_reply(&mut tasks, message);
                }
            }
        }

        let aborted = drain(&mut tasks, self.drain_timeout).await;
        if aborted > 0 {
            warn!(aborted, "Aborted in-flight requests after drain timeout");
        }

        Ok(())
    }

    fn spawn_reply(&self, tasks: &mut JoinSet<()>, message: async_nats::Message) {
        let Some(reply_to) = message.reply.clone() else {
            warn!(subject = %message.subject, "Dropping request without reply subject");
            return;
        };

        let lifecycle = self.lifecycle.clone();
        let client = self.client.clone();
        let operation = parse_operation(&self.subject_prefix, message.subject.as_str());

        tasks.spawn(async move {
            let reply = match operation {
                Some(operation) => dispatch(lifecycle.as_ref(), operation, &message.payload).await,
                None => encode_error(ApiError::new(
                    ErrorCode::Internal,
                    format!("no operation is served on {}", message.subject),
                )),
            };

            if let Err(e) = client.publish_bytes(reply_to.as_str(), reply).await {
                error!(subject = %message.subject, "Failed to send reply: {}", e);
            }
        });
    }
}

/// Wait up to `timeout` for in-flight replies, then abort the rest
///
/// Returns the number of aborted tasks.
async fn drain(tasks: &mut JoinSet<()>, timeout: Duration) -> usize {
    if tasks.is_empty() {
        return 0;
    }
    info!(in_flight = tasks.len(), "Waiting for in-flight requests");

    let finished = tokio::time::timeout(timeout, async {
        while let Some(result) = tasks.join_next().await {
            log_task_failure(result);
        }
    })
    .await;
    if finished.is_ok() {
        return 0;
    }

    let remaining = tasks.len();
    tasks.shutdown().await;
    remaining
}

fn log_task_failure(result: Result<(), JoinError>) {
    if let Err(e) = result {
        if e.is_panic() {
            error!("Request handler panicked: {}", e);
        }
    }
}

/// Decode one request, run it against `lifecycle`, and encode the reply
pub async fn dispatch<L>(lifecycle: &L, operation: Operation, payload: &[u8]) -> Vec<u8>
where
    L: ServiceLifecycle + ?Sized,
{
    debug!(%operation, "Dispatching request");

    match operation {
        Operation::Create => match decode::<CreateServiceRequest>(payload) {
            Ok(request) => encode(ApiReply::from(lifecycle.create_service(request).await)),
            Err(err) => encode_error(err),
        },
        Operation::Get => match decode::<GetServiceRequest>(payload) {
            Ok(request) => encode(ApiReply::from(
                lifecycle.get_service(&request.name, &request.namespace).await,
            )),
            Err(err) => encode_error(err),
        },
        Operation::List => match decode::<ListServicesRequest>(payload) {
            Ok(request) => encode(ApiReply::from(
                lifecycle
                    .list_services(&request.namespace)
                    .await
                    .map(|services| ListServicesResponse { services }),
            )),
            Err(err) => encode_error(err),
        },
        Operation::ListAll => match decode::<ListAllServicesRequest>(payload) {
            Ok(_) => encode(ApiReply::from(
                lifecycle
                    .list_all_services()
                    .await
                    .map(|services| ListServicesResponse { services }),
            )),
            Err(err) => encode_error(err),
        },
        Operation::Delete => match decode::<DeleteServiceRequest>(payload) {
            Ok(request) => encode(ApiReply::from(
                lifecycle
                    .delete_service(&request.name, &request.namespace)
                    .await
                    .map(|()| Empty {}),
            )),
            Err(err) => encode_error(err),
        },
        Operation::Events => encode_error(ApiError::new(
            ErrorCode::Internal,
            "events are not served on the lifecycle API",
        )),
    }
}

/// Empty payloads decode as `{}` so argument-less requests need no body
fn decode<T: DeserializeOwned>(payload: &[u8]) -> Result<T, ApiError> {
    let payload = if payload.is_empty() { b"{}".as_slice() } else { payload };
    serde_json::from_slice(payload).map_err(|e| {
        ApiError::new(
            ErrorCode::InvalidArgument,
            format!("malformed request body: {}", e),
        )
    })
}

fn encode<T: Serialize>(reply: ApiReply<T>) -> Vec<u8> {
    serde_json::to_vec(&reply).unwrap_or_else(|e| {
        error!("Failed to encode reply: {}", e);
        encode_error(ApiError::new(ErrorCode::Internal, "failed to encode reply"))
    })
}

fn encode_error(err: ApiError) -> Vec<u8> {
    // An ApiError holds only strings and plain enums, so this cannot fail.
    serde_json::to_vec(&ApiReply::<Empty>::Error(err)).unwrap_or_default()
}
