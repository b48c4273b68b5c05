//! Lifecycle API for managed distributed compute services
//!
//! This crate validates create/get/list/delete requests for namespaced compute
//! Services, forwards them to a resource store, and enriches every returned
//! Service with its recent operational events on a best-effort basis. The API
//! is served over NATS request/reply.

pub mod api;
pub mod config;
pub mod domain;
pub mod errors;
pub mod nats;
pub mod server;
pub mod service;
pub mod store;
pub mod subjects;

// Re-export commonly used types
pub use api::CreateServiceRequest;
pub use config::{ApiServerConfig, StoreBackend};
pub use domain::{EnrichedService, Event, Service, ServiceKey};
pub use errors::{ErrorKind, InfrastructureError, InfrastructureResult, StoreError, StoreResult};
pub use nats::{NatsClient, NatsConfig};
pub use server::ServiceApiServer;
pub use service::{ServiceError, ServiceLifecycle, ServiceServer, ServiceServerOptions};
