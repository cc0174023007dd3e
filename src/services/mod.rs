pub mod guard;
pub mod post_service;
pub mod profile_service;

use std::collections::HashMap;

use uuid::Uuid;

use crate::store::StoreError;

pub use post_service::PostService;
pub use profile_service::ProfileService;

/// Domain-level errors produced by the services, mapped to HTTP errors at
/// the handler boundary (see `From<ServiceError> for ApiError`).
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Every violated field, not just the first one found.
    #[error("validation failed")]
    Validation {
        field_errors: HashMap<String, String>,
    },
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    NotAuthorized(String),
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        ServiceError::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        ServiceError::Conflict(msg.into())
    }
}

/// Parse an externally-supplied identifier. A malformed id surfaces as the
/// same NotFound the caller would get for an absent resource, but the two
/// cases are logged distinctly.
pub(crate) fn parse_id(kind: &str, raw: &str) -> Result<Uuid, ServiceError> {
    Uuid::parse_str(raw.trim()).map_err(|_| {
        tracing::debug!(kind, raw, "malformed identifier in request path");
        ServiceError::NotFound(format!("{} not found", kind))
    })
}

/// Accumulates missing-field violations for a request payload.
#[derive(Default)]
pub(crate) struct FieldErrors {
    errors: HashMap<String, String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `field` as violated unless `value` is present and non-blank.
    pub fn require<'a>(&mut self, field: &str, value: Option<&'a str>) -> Option<&'a str> {
        match value {
            Some(v) if !v.trim().is_empty() => Some(v),
            _ => {
                self.errors
                    .insert(field.to_string(), format!("{} is required", field));
                None
            }
        }
    }

    /// Record `field` as violated when `value` is absent.
    pub fn require_value<T>(&mut self, field: &str, value: Option<T>) -> Option<T> {
        if value.is_none() {
            self.errors
                .insert(field.to_string(), format!("{} is required", field));
        }
        value
    }

    pub fn into_result(self) -> Result<(), ServiceError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ServiceError::Validation {
                field_errors: self.errors,
            })
        }
    }
}
