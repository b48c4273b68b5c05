// Copyright (c) 2025 - Cowboy AI, Inc.
//! Managed Compute Service Resource
//!
//! A `Service` is the unit this API manages: a named, namespaced request for a
//! distributed compute cluster (one head group, any number of worker groups)
//! owned by a user. Status fields are assigned by the resource store and are
//! carried through this layer untouched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use super::Event;

/// Unique identity of a Service within the store
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ServiceKey {
    pub namespace: String,
    pub name: String,
}

impl ServiceKey {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// Head group of a cluster
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadGroupSpec {
    /// Identifier of a predefined hardware profile
    pub compute_template: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_type: Option<String>,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub ray_start_params: HashMap<String, String>,
}

/// Autoscaled worker group of a cluster
///
/// # Invariants
/// - `max_replicas != 0`
/// - `min_replicas <= max_replicas`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerGroupSpec {
    pub group_name: String,
    pub compute_template: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(default)]
    pub replicas: i32,
    #[serde(default)]
    pub min_replicas: i32,
    #[serde(default)]
    pub max_replicas: i32,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub ray_start_params: HashMap<String, String>,
}

/// Desired shape of the compute backing a Service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterSpec {
    pub head_group_spec: HeadGroupSpec,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub worker_group_spec: Vec<WorkerGroupSpec>,
}

/// Store-assigned status, opaque to this layer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceStatus {
    #[serde(default)]
    pub service_status: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_name: Option<String>,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub service_endpoint: HashMap<String, String>,
}

/// Managed compute service resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub name: String,
    pub namespace: String,

    /// User who created the service
    pub user: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serve_config: Option<String>,

    pub cluster_spec: ClusterSpec,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ServiceStatus>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Service {
    pub fn key(&self) -> ServiceKey {
        ServiceKey::new(&self.namespace, &self.name)
    }
}

/// Service as returned to callers, with its recent events attached
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedService {
    #[serde(flatten)]
    pub service: Service,

    #[serde(default)]
    pub events: Vec<Event>,
}

impl EnrichedService {
    pub fn new(service: Service, events: Vec<Event>) -> Self {
        Self { service, events }
    }

    pub fn key(&self) -> ServiceKey {
        self.service.key()
    }
}
