// ABOUTME: Permission gate that guards drink routes behind a required permission
// ABOUTME: Runs token validation then permission membership before the handler executes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Permission Gate
//!
//! Each protected route declares one required permission and is wrapped with
//! [`require_permission`] as a route layer. On success the [`DecodedClaims`]
//! are inserted as a request extension for the handler to extract; on failure
//! the request is rejected with the specific [`AuthError`] kind.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use coffee_core::errors::{AppError, AuthError, DenialStatus};
use http::HeaderMap;
use tracing::{debug, warn};

use super::claims::DecodedClaims;
use super::validator::TokenValidator;

/// Check that `claims` grant `permission`
///
/// # Errors
///
/// Returns `PermissionsMissing` if the claims have no permission set, and
/// `PermissionDenied` if the set does not contain `permission`
pub fn check_permissions(permission: &str, claims: &DecodedClaims) -> Result<(), AuthError> {
    let granted = claims
        .permissions
        .as_deref()
        .ok_or(AuthError::PermissionsMissing)?;

    if granted.iter().any(|p| p == permission) {
        Ok(())
    } else {
        Err(AuthError::permission_denied(permission))
    }
}

/// Validation plus one required permission, shared by a route layer
#[derive(Clone)]
pub struct AuthGate {
    validator: Arc<TokenValidator>,
    permission: &'static str,
    denial: DenialStatus,
}

impl AuthGate {
    /// Create a gate for `permission`
    #[must_use]
    pub const fn new(
        validator: Arc<TokenValidator>,
        permission: &'static str,
        denial: DenialStatus,
    ) -> Self {
        Self {
            validator,
            permission,
            denial,
        }
    }

    /// Validate the request's token and check the required permission
    ///
    /// # Errors
    ///
    /// Returns the first failed validation or permission check
    pub async fn authorize(&self, headers: &HeaderMap) -> Result<DecodedClaims, AuthError> {
        let claims = self.validator.validate(headers).await?;
        check_permissions(self.permission, &claims)?;
        Ok(claims)
    }
}

/// Route middleware enforcing an [`AuthGate`]
///
/// # Errors
///
/// Returns the rejection as an `AppError` rendered with the gate's denial status
pub async fn require_permission(
    State(gate): State<AuthGate>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let outcome = gate.authorize(request.headers()).await;
    match outcome {
        Ok(claims) => {
            debug!(
                sub = %claims.sub,
                permission = gate.permission,
                "Request authorized"
            );
            request.extensions_mut().insert(claims);
            Ok(next.run(request).await)
        }
        Err(error) => {
            warn!(
                code = %error.error_code_with(gate.denial).as_str(),
                permission = gate.permission,
                method = %request.method(),
                path = %request.uri().path(),
                "Authorization rejected: {error}"
            );
            Err(error.into_app_error(gate.denial))
        }
    }
}
