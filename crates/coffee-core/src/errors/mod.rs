// ABOUTME: Unified error handling system with standard error codes and HTTP responses
// ABOUTME: Every failure in the API is an AppError rendered as one JSON error shape
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Unified Error Handling System
//!
//! This module defines the error codes, the `AppError` type and the HTTP error
//! body shared by every route:
//!
//! ```json
//! {"success": false, "error": 404, "message": "resource not found", "code": "resource_not_found"}
//! ```

/// Authorization failure kinds raised by token validation and the permission gate
pub mod auth;

pub use auth::{AuthError, DenialStatus};

use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

#[cfg(feature = "http-response")]
use axum::response::{IntoResponse, Response};
#[cfg(feature = "http-response")]
use http::StatusCode;

/// Standard error codes used throughout the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    // Authentication & Authorization
    /// No `Authorization` header on a protected request
    #[serde(rename = "authorization_header_missing")]
    AuthRequired,
    /// Header is not `Bearer <token>`
    #[serde(rename = "invalid_header")]
    AuthMalformed,
    /// Token is not a decodable three-part JWT or carries no key id
    #[serde(rename = "malformed_token")]
    TokenMalformed,
    /// Token key id is not in the signing key set
    KeyNotFound,
    /// Signature verification failed
    #[serde(rename = "invalid_signature")]
    AuthInvalid,
    /// Token expiry is in the past
    #[serde(rename = "token_expired")]
    AuthExpired,
    /// Issuer or audience mismatch
    #[serde(rename = "invalid_claims")]
    ClaimsInvalid,
    /// Claims payload could not be decoded
    #[serde(rename = "malformed_claims")]
    ClaimsMalformed,
    /// Claims carry no permissions collection
    PermissionsMissing,
    /// Required permission absent, reported as 401
    #[serde(rename = "unauthorized")]
    PermissionDenied,
    /// Required permission absent, reported as 403
    Forbidden,
    /// Signing keys could not be fetched
    #[serde(rename = "jwks_unavailable")]
    KeySetUnavailable,

    // Validation
    /// Request body is missing fields or has invalid values
    #[serde(rename = "unprocessable")]
    InvalidInput,

    // Resource Management
    /// Requested resource does not exist
    ResourceNotFound,
    /// A resource with the same unique key exists
    ResourceAlreadyExists,

    // Transport
    /// Request handling exceeded the server's time limit
    RequestTimeout,

    // Internal
    /// Configuration is missing or invalid
    ConfigError,
    /// Database operation failed
    DatabaseError,
    /// JSON encoding or decoding failed
    SerializationError,
    /// Anything else
    InternalError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            // 400 Bad Request
            Self::AuthMalformed
            | Self::TokenMalformed
            | Self::ClaimsMalformed
            | Self::PermissionsMissing => 400,

            // 401 Unauthorized
            Self::AuthRequired
            | Self::KeyNotFound
            | Self::AuthInvalid
            | Self::AuthExpired
            | Self::ClaimsInvalid
            | Self::PermissionDenied => 401,

            // 403 Forbidden
            Self::Forbidden => 403,

            // 404 Not Found
            Self::ResourceNotFound => 404,

            // 408 Request Timeout
            Self::RequestTimeout => 408,

            // 409 Conflict
            Self::ResourceAlreadyExists => 409,

            // 422 Unprocessable Entity
            Self::InvalidInput => 422,

            // 503 Service Unavailable
            Self::KeySetUnavailable => 503,

            // 500 Internal Server Error
            Self::ConfigError
            | Self::DatabaseError
            | Self::SerializationError
            | Self::InternalError => 500,
        }
    }

    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::AuthRequired => "Authorization header is expected",
            Self::AuthMalformed => "Authorization header must be a bearer token",
            Self::TokenMalformed => "The authentication token is malformed",
            Self::KeyNotFound => "The token signing key is unknown",
            Self::AuthInvalid => "The token signature is invalid",
            Self::AuthExpired => "The authentication token has expired",
            Self::ClaimsInvalid => "The token claims are incorrect",
            Self::ClaimsMalformed => "The token claims are malformed",
            Self::PermissionsMissing => "Permissions are not included in the token",
            Self::PermissionDenied => "not authorized",
            Self::Forbidden => "forbidden",
            Self::KeySetUnavailable => "Signing keys are temporarily unavailable",
            Self::InvalidInput => "unprocessable",
            Self::ResourceNotFound => "resource not found",
            Self::ResourceAlreadyExists => "resource already exists",
            Self::RequestTimeout => "request timed out",
            Self::ConfigError => "Configuration error encountered",
            Self::DatabaseError | Self::SerializationError | Self::InternalError => {
                "internal server error"
            }
        }
    }

    /// Machine-readable name, identical to the serialized form
    #[must_use]
    pub fn as_str(self) -> String {
        serde_json::to_value(self)
            .ok()
            .and_then(|v| v.as_str().map(str::to_owned))
            .unwrap_or_else(|| "internal_error".to_owned())
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Unified error type for the application
#[derive(Debug, Error)]
#[error("{code}: {message}")]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message, returned to the client
    pub message: String,
    /// Additional detail returned to the client when present
    pub details: Option<String>,
    /// Source error for error chaining (never returned to the client)
    #[source]
    pub source: Option<Box<dyn StdError + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            source: None,
        }
    }

    /// Attach a client-visible detail string
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        self.code.http_status()
    }

    /// Resource not found
    #[must_use]
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceNotFound,
            ErrorCode::ResourceNotFound.description(),
        )
        .with_details(format!("{} not found", resource.into()))
    }

    /// Request could not be processed
    #[must_use]
    pub fn unprocessable(reason: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, ErrorCode::InvalidInput.description())
            .with_details(reason)
    }

    /// Unique constraint violated
    #[must_use]
    pub fn already_exists(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceAlreadyExists,
            ErrorCode::ResourceAlreadyExists.description(),
        )
        .with_details(format!("{} already exists", resource.into()))
    }

    /// Database error; the detail is logged, not returned
    #[must_use]
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Request exceeded the handling time limit
    #[must_use]
    pub fn timeout() -> Self {
        Self::new(
            ErrorCode::RequestTimeout,
            ErrorCode::RequestTimeout.description(),
        )
    }

    /// Internal server error
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Whether the message may be shown to clients
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        self.http_status() < 500
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// HTTP error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always `false`
    pub success: bool,
    /// HTTP status code
    pub error: u16,
    /// Human-readable message
    pub message: String,
    /// Machine-readable error code
    pub code: ErrorCode,
    /// Optional detail
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl From<&AppError> for ErrorResponse {
    fn from(error: &AppError) -> Self {
        // Server-side failures never leak their internal message
        let (message, details) = if error.is_client_error() {
            (error.message.clone(), error.details.clone())
        } else {
            (error.code.description().to_owned(), None)
        };
        Self {
            success: false,
            error: error.http_status(),
            message,
            code: error.code,
            details,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::new(
            ErrorCode::SerializationError,
            format!("JSON serialization failed: {error}"),
        )
        .with_source(error)
    }
}

#[cfg(feature = "http-response")]
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if self.is_client_error() {
            tracing::debug!(code = ?self.code, status = status.as_u16(), "Request rejected: {}", self.message);
        } else {
            tracing::error!(code = ?self.code, status = status.as_u16(), "Request failed: {}", self.message);
        }

        let body = ErrorResponse::from(&self);
        (status, axum::Json(body)).into_response()
    }
}
