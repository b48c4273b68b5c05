// Copyright (c) 2025 - Cowboy AI, Inc.
//! Wire Messages for the Lifecycle API
//!
//! JSON request and reply bodies exchanged on the API subjects. Every reply is
//! an [`ApiReply`]: either `{"ok": ...}` or `{"error": {"code": ..., "message": ...}}`.
//! The error code tells the caller whether the request was at fault
//! (`invalid_argument`), the resource is missing (`not_found`) or already
//! exists (`already_exists`), the upstream store could not be reached and a
//! retry may help (`unavailable`), or anything else went wrong (`internal`).
//! Only `unavailable` replies are marked `retryable`.

use serde::{Deserialize, Serialize};

use crate::domain::{EnrichedService, Service};
use crate::errors::StoreError;
use crate::service::ServiceError;

/// Create a Service in a namespace
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateServiceRequest {
    pub namespace: String,

    #[serde(default)]
    pub service: Option<Service>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetServiceRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub namespace: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListServicesRequest {
    #[serde(default)]
    pub namespace: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListAllServicesRequest {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteServiceRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub namespace: String,
}

/// Reply body of list and list-all
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListServicesResponse {
    pub services: Vec<EnrichedService>,
}

/// Reply body of delete
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Empty {}

/// Wire error code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidArgument,
    NotFound,
    AlreadyExists,
    /// The store could not be reached or timed out
    Unavailable,
    /// The request could not be routed or decoded, or the store rejected it
    Internal,
}

impl From<&StoreError> for ErrorCode {
    fn from(err: &StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => ErrorCode::NotFound,
            StoreError::AlreadyExists { .. } => ErrorCode::AlreadyExists,
            StoreError::Unavailable(_) => ErrorCode::Unavailable,
            StoreError::Failure(_) => ErrorCode::Internal,
        }
    }
}

impl From<&ServiceError> for ErrorCode {
    fn from(err: &ServiceError) -> Self {
        match err.store_error() {
            Some(source) => source.into(),
            None => ErrorCode::InvalidArgument,
        }
    }
}

/// Categorized error reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
    /// Whether the caller may usefully retry
    pub retryable: bool,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            retryable: code == ErrorCode::Unavailable,
        }
    }
}

impl From<&ServiceError> for ApiError {
    fn from(err: &ServiceError) -> Self {
        ApiError::new(ErrorCode::from(err), err.to_string())
    }
}

/// Envelope of every reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiReply<T> {
    Ok(T),
    Error(ApiError),
}

impl<T> ApiReply<T> {
    pub fn into_result(self) -> Result<T, ApiError> {
        match self {
            ApiReply::Ok(value) => Ok(value),
            ApiReply::Error(err) => Err(err),
        }
    }
}

impl<T> From<Result<T, ServiceError>> for ApiReply<T> {
    fn from(result: Result<T, ServiceError>) -> Self {
        match result {
            Ok(value) => ApiReply::Ok(value),
            Err(err) => ApiReply::Error(ApiError::from(&err)),
        }
    }
}
