// Copyright (c) 2025 - Cowboy AI, Inc.
//! Operational Events
//!
//! Timestamped records the orchestrator emits about a Service (scheduling,
//! scaling, failures). They are fetched live for each response and are never
//! persisted by this layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::ServiceKey;

/// Severity of an operational event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    #[default]
    Normal,
    Warning,
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventType::Normal => write!(f, "Normal"),
            EventType::Warning => write!(f, "Warning"),
        }
    }
}

/// Operational event attached to a Service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Unique event identifier (UUID v7 for time ordering)
    pub id: Uuid,

    /// Event object name as reported by the orchestrator
    pub name: String,

    /// Machine-readable reason, e.g. `ServiceCreated`
    pub reason: String,

    pub message: String,

    #[serde(rename = "type")]
    pub event_type: EventType,

    /// Number of times this event has occurred
    pub count: i32,

    pub first_timestamp: DateTime<Utc>,
    pub last_timestamp: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Event {
    /// Create a single-occurrence event for a Service
    pub fn new(
        key: &ServiceKey,
        event_type: EventType,
        reason: impl Into<String>,
        message: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let id = Uuid::now_v7();
        Self {
            id,
            name: format!("{}.{}", key.name, id.simple()),
            reason: reason.into(),
            message: message.into(),
            event_type,
            count: 1,
            first_timestamp: timestamp,
            last_timestamp: timestamp,
            created_at: timestamp,
        }
    }
}
