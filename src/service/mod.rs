// Copyright (c) 2025 - Cowboy AI, Inc.
//! Service Layer for the Lifecycle API
//!
//! This module provides the application service layer that validates
//! lifecycle requests, calls the resource store, and enriches results with
//! live operational events.
//!
//! # Architecture
//!
//! ```text
//! Client Request
//!     ↓
//! Service Layer (this module)
//!     ↓
//! Validator → ResourceStore
//!     ↓
//! EventSource (best-effort)
//!     ↓
//! ServiceObserver (warnings, outcomes)
//! ```
//!
//! # Design Principles
//!
//! 1. **Stateless**: nothing is kept between calls
//! 2. **Hard-fail core, soft-fail enrichment**: store errors fail the call,
//!    event lookup errors never do
//! 3. **Injected observability**: no process-wide logger inside the façade
//! 4. **Async by Default**: All I/O is asynchronous
//!
//! # Example
//!
//! ```rust,ignore
//! use cim_service_api::service::{ServiceLifecycle, ServiceServer, ServiceServerOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let server = ServiceServer::new(store, events, ServiceServerOptions::default());
//!
//!     let created = server.create_service(request).await?;
//!     let services = server.list_services("default").await?;
//!
//!     Ok(())
//! }
//! ```

pub mod enrich;
pub mod lifecycle;
pub mod observer;

pub use enrich::{best_effort, EventEnricher};
pub use lifecycle::{
    ServiceError, ServiceLifecycle, ServiceResult, ServiceServer, ServiceServerOptions,
    DEFAULT_ENRICHMENT_CONCURRENCY,
};
pub use observer::{
    CompositeObserver, EnrichmentWarning, MetricsObserver, ServiceMetrics, ServiceObserver,
    TracingObserver,
};
