// ABOUTME: Authorization failure kinds raised while validating bearer tokens and permissions
// ABOUTME: Each kind maps to one ErrorCode and therefore one HTTP status
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Authorization Errors
//!
//! Token validation fails fast: the first violated precondition is reported
//! and nothing after it runs. The kinds below are listed in check order.

use super::{AppError, ErrorCode};
use thiserror::Error;

/// How a missing permission is reported to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DenialStatus {
    /// 401, the status the drinks API has always returned
    #[default]
    Unauthorized,
    /// 403, the semantically correct status
    Forbidden,
}

/// A rejected authorization attempt
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No `Authorization` header
    #[error("Authorization header is expected.")]
    HeaderMissing,

    /// Wrong scheme or wrong number of parts
    #[error("{reason}")]
    HeaderMalformed {
        /// Which shape rule was broken
        reason: &'static str,
    },

    /// Token header segment is not decodable, or has no `kid`
    #[error("Unable to parse authentication token: {reason}")]
    TokenMalformed {
        /// Decoder message
        reason: String,
    },

    /// Token `kid` is not in the current key set
    #[error("Unable to find the appropriate key for key id '{kid}'.")]
    KeyNotFound {
        /// Key id named by the token
        kid: String,
    },

    /// Signature did not verify, or the algorithm is not RS256
    #[error("Token signature could not be verified.")]
    SignatureInvalid,

    /// `exp` is in the past
    #[error("Token expired.")]
    TokenExpired,

    /// Issuer or audience does not match
    #[error("Incorrect claims. Please, check the {claim}.")]
    ClaimsInvalid {
        /// Offending claim name
        claim: &'static str,
    },

    /// Payload could not be decoded into claims
    #[error("Unable to decode token claims: {reason}")]
    ClaimsMalformed {
        /// Decoder message
        reason: String,
    },

    /// Claims carry no `permissions` key at all
    #[error("Permissions not included in JWT.")]
    PermissionsMissing,

    /// Required permission is not granted
    #[error("Permission '{required}' not found.")]
    PermissionDenied {
        /// The permission the route requires
        required: String,
    },

    /// Signing keys could not be fetched or parsed
    #[error("Unable to fetch signing keys: {reason}")]
    KeySetUnavailable {
        /// Transport or decoding message
        reason: String,
    },
}

impl AuthError {
    /// Build a malformed-header error
    #[must_use]
    pub const fn header_malformed(reason: &'static str) -> Self {
        Self::HeaderMalformed { reason }
    }

    /// Build a malformed-token error
    #[must_use]
    pub fn token_malformed(reason: impl Into<String>) -> Self {
        Self::TokenMalformed {
            reason: reason.into(),
        }
    }

    /// Build a permission-denied error
    #[must_use]
    pub fn permission_denied(required: impl Into<String>) -> Self {
        Self::PermissionDenied {
            required: required.into(),
        }
    }

    /// Error code for this kind, reporting denials as 401
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        self.error_code_with(DenialStatus::Unauthorized)
    }

    /// Error code for this kind under the given denial policy
    #[must_use]
    pub const fn error_code_with(&self, denial: DenialStatus) -> ErrorCode {
        match self {
            Self::HeaderMissing => ErrorCode::AuthRequired,
            Self::HeaderMalformed { .. } => ErrorCode::AuthMalformed,
            Self::TokenMalformed { .. } => ErrorCode::TokenMalformed,
            Self::KeyNotFound { .. } => ErrorCode::KeyNotFound,
            Self::SignatureInvalid => ErrorCode::AuthInvalid,
            Self::TokenExpired => ErrorCode::AuthExpired,
            Self::ClaimsInvalid { .. } => ErrorCode::ClaimsInvalid,
            Self::ClaimsMalformed { .. } => ErrorCode::ClaimsMalformed,
            Self::PermissionsMissing => ErrorCode::PermissionsMissing,
            Self::PermissionDenied { .. } => match denial {
                DenialStatus::Unauthorized => ErrorCode::PermissionDenied,
                DenialStatus::Forbidden => ErrorCode::Forbidden,
            },
            Self::KeySetUnavailable { .. } => ErrorCode::KeySetUnavailable,
        }
    }

    /// HTTP status for this kind, reporting denials as 401
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        self.error_code().http_status()
    }

    /// Convert into an `AppError` under the given denial policy
    #[must_use]
    pub fn into_app_error(self, denial: DenialStatus) -> AppError {
        let code = self.error_code_with(denial);
        AppError::new(code, self.to_string())
    }
}

impl From<AuthError> for AppError {
    fn from(error: AuthError) -> Self {
        error.into_app_error(DenialStatus::default())
    }
}
