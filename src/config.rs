// Copyright (c) 2025 - Cowboy AI, Inc.
//! API Server Configuration
//!
//! Loaded from environment variables, each with a default:
//!
//! | Variable                          | Default                 |
//! |-----------------------------------|-------------------------|
//! | `NATS_URL`                        | `nats://localhost:4222` |
//! | `NATS_REQUEST_TIMEOUT_SECS`       | `5`                     |
//! | `SERVICE_API_SUBJECT_PREFIX`      | `services.api`          |
//! | `SERVICE_API_QUEUE_GROUP`         | `service-apiserver`     |
//! | `SERVICE_API_MAX_IN_FLIGHT`       | `256`                   |
//! | `SERVICE_STORE_BACKEND`           | `memory`                |
//! | `SERVICE_STORE_SUBJECT_PREFIX`    | `services.store`        |
//! | `SERVICE_ENRICHMENT_CONCURRENCY`  | `8`                     |
//! | `SERVICE_COLLECT_METRICS`         | `false`                 |

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::errors::{InfrastructureError, InfrastructureResult};
use crate::nats::NatsConfig;
use crate::server::{DEFAULT_MAX_IN_FLIGHT, DEFAULT_QUEUE_GROUP};
use crate::service::{ServiceServerOptions, DEFAULT_ENRICHMENT_CONCURRENCY};
use crate::subjects::{API_ROOT, STORE_ROOT};

/// Where Services are stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Process memory; contents are lost on restart
    Memory,
    /// Remote resource manager over NATS request/reply
    Nats,
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreBackend::Memory => write!(f, "memory"),
            StoreBackend::Nats => write!(f, "nats"),
        }
    }
}

impl FromStr for StoreBackend {
    type Err = InfrastructureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(StoreBackend::Memory),
            "nats" => Ok(StoreBackend::Nats),
            other => Err(InfrastructureError::Configuration(format!(
                "unknown store backend '{}', expected 'memory' or 'nats'",
                other
            ))),
        }
    }
}

/// Configuration of the `service-apiserver` binary
#[derive(Debug, Clone)]
pub struct ApiServerConfig {
    pub nats: NatsConfig,
    pub api_subject_prefix: String,
    pub queue_group: String,
    /// Requests handled concurrently by the API server
    pub max_in_flight: usize,
    pub store_backend: StoreBackend,
    pub store_subject_prefix: String,
    pub options: ServiceServerOptions,
}

impl Default for ApiServerConfig {
    fn default() -> Self {
        Self {
            nats: NatsConfig::default(),
            api_subject_prefix: API_ROOT.to_string(),
            queue_group: DEFAULT_QUEUE_GROUP.to_string(),
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
            store_backend: StoreBackend::Memory,
            store_subject_prefix: STORE_ROOT.to_string(),
            options: ServiceServerOptions::default(),
        }
    }
}

impl ApiServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> InfrastructureResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> InfrastructureResult<Self> {
        let defaults = Self::default();

        let mut nats = defaults.nats;
        if let Some(url) = lookup("NATS_URL") {
            nats.servers = url.split(',').map(|s| s.trim().to_string()).collect();
        }
        if let Some(secs) = parse_var::<u64>(&lookup, "NATS_REQUEST_TIMEOUT_SECS")? {
            nats.request_timeout = Duration::from_secs(secs);
        }

        let store_backend = match lookup("SERVICE_STORE_BACKEND") {
            Some(value) => value.parse()?,
            None => defaults.store_backend,
        };

        let options = ServiceServerOptions {
            collect_metrics: parse_var(&lookup, "SERVICE_COLLECT_METRICS")?
                .unwrap_or(defaults.options.collect_metrics),
            enrichment_concurrency: parse_var(&lookup, "SERVICE_ENRICHMENT_CONCURRENCY")?
                .unwrap_or(DEFAULT_ENRICHMENT_CONCURRENCY),
        };
        if options.enrichment_concurrency == 0 {
            return Err(InfrastructureError::Configuration(
                "SERVICE_ENRICHMENT_CONCURRENCY must be at least 1".to_string(),
            ));
        }

        let max_in_flight = parse_var(&lookup, "SERVICE_API_MAX_IN_FLIGHT")?
            .unwrap_or(defaults.max_in_flight);
        if max_in_flight == 0 {
            return Err(InfrastructureError::Configuration(
                "SERVICE_API_MAX_IN_FLIGHT must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            nats,
            api_subject_prefix: lookup("SERVICE_API_SUBJECT_PREFIX")
                .unwrap_or(defaults.api_subject_prefix),
            queue_group: lookup("SERVICE_API_QUEUE_GROUP").unwrap_or(defaults.queue_group),
            max_in_flight,
            store_backend,
            store_subject_prefix: lookup("SERVICE_STORE_SUBJECT_PREFIX")
                .unwrap_or(defaults.store_subject_prefix),
            options,
        })
    }
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> InfrastructureResult<Option<T>>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    lookup(key)
        .map(|value| {
            value.trim().parse().map_err(|e| {
                InfrastructureError::Configuration(format!("invalid {} '{}': {}", key, value, e))
            })
        })
        .transpose()
}
