// Copyright (c) 2025 - Cowboy AI, Inc.
//! Service Lifecycle API Server
//!
//! Serves create/get/list/list_all/delete for managed compute services over
//! NATS request/reply, backed by either an in-memory store or a remote
//! resource manager on NATS.
//!
//! Run with: cargo run --bin service-apiserver
//!
//! Prerequisites:
//! 1. NATS server running (default: localhost:4222)
//! 2. For `SERVICE_STORE_BACKEND=nats`, a resource manager answering on
//!    `SERVICE_STORE_SUBJECT_PREFIX` (default: services.store)
//!
//! See `cim_service_api::config` for every environment variable.

use anyhow::{Context, Result};
use cim_service_api::{
    store::{EventSource, InMemoryResourceStore, NatsResourceStore, ResourceStore},
    ApiServerConfig, NatsClient, ServiceApiServer, ServiceServer, StoreBackend,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Interval between metrics log lines when metrics collection is enabled
const METRICS_LOG_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("🚀 Starting Service Lifecycle API Server");

    // Load configuration
    let config = ApiServerConfig::from_env().context("Failed to load configuration")?;
    info!("📋 Configuration loaded:");
    info!("  - NATS servers: {:?}", config.nats.servers);
    info!("  - API subjects: {}.*", config.api_subject_prefix);
    info!("  - Queue group: {}", config.queue_group);
    info!("  - Max in-flight requests: {}", config.max_in_flight);
    info!("  - Store backend: {}", config.store_backend);
    info!(
        "  - Enrichment concurrency: {}",
        config.options.enrichment_concurrency
    );
    info!("  - Collect metrics: {}", config.options.collect_metrics);

    // Connect to NATS
    info!("🔌 Connecting to NATS");
    let client = NatsClient::new(config.nats.clone())
        .await
        .context("Failed to connect to NATS")?;
    info!("✅ Connected to NATS");

    match config.store_backend {
        StoreBackend::Memory => {
            warn!("⚠️ Using in-memory store, services are lost on restart");
            let store = Arc::new(InMemoryResourceStore::new());
            let server = ServiceServer::new(store.clone(), store, config.options.clone());
            run(server, client, &config).await
        }
        StoreBackend::Nats => {
            info!(
                "📡 Using resource manager on {}.*",
                config.store_subject_prefix
            );
            let store =
                NatsResourceStore::with_prefix(client.clone(), &config.store_subject_prefix);
            let server = ServiceServer::new(store.clone(), store, config.options.clone());
            run(server, client, &config).await
        }
    }
}

async fn run<S, E>(
    server: ServiceServer<S, E>,
    client: NatsClient,
    config: &ApiServerConfig,
) -> Result<()>
where
    S: ResourceStore + 'static,
    E: EventSource + 'static,
{
    let server = Arc::new(server);

    let metrics_task = server.metrics().is_some().then(|| {
        let server = server.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(METRICS_LOG_INTERVAL);
            interval.tick().await;
            loop {
                interval.tick().await;
                if let Some(m) = server.metrics() {
                    info!(
                        "📊 Statistics: {} succeeded, {} invalid, {} not found, {} store failures, {} enrichment failures",
                        m.succeeded, m.invalid_input, m.not_found, m.store_failures, m.enrichment_failures
                    );
                }
            }
        })
    });

    let api = ServiceApiServer::new(server.clone(), client)
        .with_subject_prefix(&config.api_subject_prefix)
        .with_queue_group(&config.queue_group)
        .with_max_in_flight(config.max_in_flight);

    api.serve_until(async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("⚠️ Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    })
    .await
    .context("API server failed")?;

    if let Some(task) = metrics_task {
        task.abort();
    }
    if let Some(m) = server.metrics() {
        info!(
            "📊 Final statistics: {} succeeded, {} failed, {} enrichment failures",
            m.succeeded,
            m.failed(),
            m.enrichment_failures
        );
    }

    info!("👋 Service Lifecycle API Server stopped");
    Ok(())
}
