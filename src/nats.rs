//! NATS client abstraction for the lifecycle API transport

use async_nats::{Client, ConnectOptions, Subscriber};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use crate::errors::{InfrastructureError, InfrastructureResult};

/// Configuration for NATS connection
#[derive(Debug, Clone)]
pub struct NatsConfig {
    /// NATS server URLs
    pub servers: Vec<String>,
    /// Client name
    pub name: String,
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Request timeout
    pub request_timeout: Duration,
}

impl Default for NatsConfig {
    fn default() -> Self {
        Self {
            servers: vec!["nats://localhost:4222".to_string()],
            name: "cim-service-api".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(5),
        }
    }
}

/// NATS client wrapper providing request/reply operations
#[derive(Clone)]
pub struct NatsClient {
    client: Client,
}

impl NatsClient {
    /// Create a new NATS client with the given configuration
    pub async fn new(config: NatsConfig) -> InfrastructureResult<Self> {
        let connect_options = ConnectOptions::new()
            .name(&config.name)
            .connection_timeout(config.connect_timeout)
            .request_timeout(Some(config.request_timeout));

        let client = async_nats::connect_with_options(config.servers.join(","), connect_options)
            .await
            .map_err(|e| InfrastructureError::NatsConnection(e.to_string()))?;

        info!("Connected to NATS at {:?}", config.servers);

        Ok(Self { client })
    }

    /// Publish a pre-encoded payload to a subject
    pub async fn publish_bytes(&self, subject: &str, payload: Vec<u8>) -> InfrastructureResult<()> {
        self.client
            .publish(subject.to_string(), payload.into())
            .await
            .map_err(|e| InfrastructureError::NatsPublish(e.to_string()))?;

        debug!("Published message to subject: {}", subject);
        Ok(())
    }

    /// Subscribe to a subject as a member of a queue group
    ///
    /// Each message is delivered to one member of the group, so several API
    /// servers can share the same subjects.
    pub async fn queue_subscribe(
        &self,
        subject: &str,
        queue_group: &str,
    ) -> InfrastructureResult<Subscriber> {
        let subscriber = self
            .client
            .queue_subscribe(subject.to_string(), queue_group.to_string())
            .await
            .map_err(|e| InfrastructureError::NatsSubscribe(e.to_string()))?;

        info!("Subscribed to subject: {} (queue group {})", subject, queue_group);
        Ok(subscriber)
    }

    /// Request-reply pattern
    pub async fn request<T, R>(&self, subject: &str, request: &T) -> InfrastructureResult<R>
    where
        T: Serialize,
        R: for<'de> Deserialize<'de>,
    {
        let payload = serde_json::to_vec(request)?;

        let response = self
            .client
            .request(subject.to_string(), payload.into())
            .await
            .map_err(|e| match e.kind() {
                async_nats::RequestErrorKind::TimedOut => {
                    InfrastructureError::Timeout(format!("request on {}", subject))
                }
                _ => InfrastructureError::NatsRequest(e.to_string()),
            })?;

        let result: R = serde_json::from_slice(&response.payload)
            .map_err(|e| InfrastructureError::Deserialization(e.to_string()))?;

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = NatsConfig::default();
        assert_eq!(config.servers, vec!["nats://localhost:4222".to_string()]);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }
}
