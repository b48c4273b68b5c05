// Copyright (c) 2025 - Cowboy AI, Inc.

//! NATS subject hierarchy for the service lifecycle API
//!
//! Both the public API and the remote resource manager are addressed through
//! request/reply subjects of the form:
//!
//! ```text
//! {prefix}.{operation}
//! ```
//!
//! The API prefix defaults to `services.api`; the resource manager prefix
//! defaults to `services.store`.
//!
//! # Examples
//!
//! ```rust
//! use cim_service_api::subjects::{Operation, SubjectBuilder};
//!
//! let subject = SubjectBuilder::new("services.api")
//!     .operation(Operation::ListAll)
//!     .build();
//! assert_eq!(subject, "services.api.list_all");
//!
//! let wildcard = SubjectBuilder::new("services.api").build_wildcard();
//! assert_eq!(wildcard, "services.api.*");
//! ```

use std::fmt;
use std::str::FromStr;

/// Default prefix for the public lifecycle API
pub const API_ROOT: &str = "services.api";

/// Default prefix for the remote resource manager
pub const STORE_ROOT: &str = "services.store";

/// Request/reply operations
///
/// The first five are served by the lifecycle API and the resource manager
/// alike; `Events` is only answered by the resource manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Create,
    Get,
    List,
    ListAll,
    Delete,
    /// Fetch the operational events of one service
    Events,
}

impl Operation {
    /// Operations exposed on the public API subjects
    pub const API: [Operation; 5] = [
        Operation::Create,
        Operation::Get,
        Operation::List,
        Operation::ListAll,
        Operation::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Get => "get",
            Operation::List => "list",
            Operation::ListAll => "list_all",
            Operation::Delete => "delete",
            Operation::Events => "events",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(Operation::Create),
            "get" => Ok(Operation::Get),
            "list" => Ok(Operation::List),
            "list_all" => Ok(Operation::ListAll),
            "delete" => Ok(Operation::Delete),
            "events" => Ok(Operation::Events),
            other => Err(format!("unknown operation: {}", other)),
        }
    }
}

/// Builder for lifecycle NATS subjects
#[derive(Debug, Clone)]
pub struct SubjectBuilder {
    prefix: String,
    operation: Option<Operation>,
}

impl SubjectBuilder {
    /// Create a new subject builder under `prefix`
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            operation: None,
        }
    }

    /// Set the operation
    pub fn operation(mut self, operation: Operation) -> Self {
        self.operation = Some(operation);
        self
    }

    /// Build the complete subject string
    ///
    /// # Panics
    ///
    /// Panics if operation is not set
    pub fn build(self) -> String {
        let operation = self.operation.expect("operation must be set");
        format!("{}.{}", self.prefix, operation)
    }

    /// Build a single-token wildcard covering every operation under the prefix
    ///
    /// Returns: `{prefix}.*`
    pub fn build_wildcard(self) -> String {
        format!("{}.*", self.prefix)
    }
}

/// Resolve the operation addressed by `subject` under `prefix`
///
/// Returns `None` if the subject is outside the prefix or names no operation.
pub fn parse_operation(prefix: &str, subject: &str) -> Option<Operation> {
    subject
        .strip_prefix(prefix)?
        .strip_prefix('.')?
        .parse()
        .ok()
}
