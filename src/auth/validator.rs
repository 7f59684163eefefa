// ABOUTME: Bearer token validation against the identity provider's RS256 signing keys
// ABOUTME: Extracts the token, verifies its signature, and checks issuer, audience, and expiry
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Token Validator
//!
//! Checks run in a fixed order and stop at the first failure:
//!
//! 1. `Authorization` header present
//! 2. `Bearer <token>` shape
//! 3. decodable token header carrying a `kid`
//! 4. `kid` present in the key set
//! 5. RS256 signature
//! 6. expiry, issuer, and audience

use std::sync::Arc;

use coffee_core::errors::AuthError;
use http::header::AUTHORIZATION;
use http::HeaderMap;
use jsonwebtoken::errors::{Error as JwtError, ErrorKind};
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use tracing::debug;

use super::claims::DecodedClaims;
use super::jwks::KeySetProvider;

/// Validates bearer tokens issued by one identity provider for one audience
pub struct TokenValidator {
    keys: Arc<dyn KeySetProvider>,
    issuer: String,
    audience: String,
}

impl TokenValidator {
    /// Create a validator
    #[must_use]
    pub fn new(
        keys: Arc<dyn KeySetProvider>,
        issuer: impl Into<String>,
        audience: impl Into<String>,
    ) -> Self {
        Self {
            keys,
            issuer: issuer.into(),
            audience: audience.into(),
        }
    }

    /// Extract the raw token from an `Authorization: Bearer <token>` header
    ///
    /// # Errors
    ///
    /// Returns `HeaderMissing` without a header and `HeaderMalformed` for any
    /// other scheme or shape
    pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
        let value = headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::HeaderMissing)?
            .to_str()
            .map_err(|_| {
                AuthError::header_malformed("Authorization header must be bearer token.")
            })?;

        // Exactly "<scheme> <token>" separated by a single space
        let parts: Vec<&str> = value.split(' ').collect();
        match parts.as_slice() {
            [scheme, ..] if !scheme.eq_ignore_ascii_case("bearer") => Err(
                AuthError::header_malformed("Authorization header must start with \"Bearer\"."),
            ),
            [_] | [_, ""] => Err(AuthError::header_malformed("Token not found.")),
            [_, token] => Ok(*token),
            _ => Err(AuthError::header_malformed(
                "Authorization header must be bearer token.",
            )),
        }
    }

    /// Validate the bearer token carried by a request's headers
    ///
    /// # Errors
    ///
    /// Returns the first failed check as an [`AuthError`]
    pub async fn validate(&self, headers: &HeaderMap) -> Result<DecodedClaims, AuthError> {
        let token = Self::extract_bearer_token(headers)?;
        self.validate_token(token).await
    }

    /// Validate a raw token
    ///
    /// # Errors
    ///
    /// Returns the first failed check as an [`AuthError`]
    pub async fn validate_token(&self, token: &str) -> Result<DecodedClaims, AuthError> {
        let header = decode_header(token).map_err(|e| {
            debug!(error = %e, "Failed to decode token header");
            AuthError::token_malformed(e.to_string())
        })?;

        let kid = header
            .kid
            .ok_or_else(|| AuthError::token_malformed("token header has no key id"))?;

        let key = self
            .keys
            .find_key(&kid)
            .await?
            .ok_or_else(|| AuthError::KeyNotFound { kid: kid.clone() })?;

        let decoding_key = DecodingKey::from_rsa_components(&key.n, &key.e).map_err(|e| {
            debug!(kid = %kid, error = %e, "Signing key components are not usable");
            AuthError::SignatureInvalid
        })?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.set_audience(&[self.audience.as_str()]);
        validation.leeway = 0;

        let token_data =
            decode::<DecodedClaims>(token, &decoding_key, &validation).map_err(|e| {
                debug!(kid = %kid, error = %e, "Token verification failed");
                classify_decode_error(&e)
            })?;

        debug!(sub = %token_data.claims.sub, kid = %kid, "Token validated");
        Ok(token_data.claims)
    }
}

/// Map a `jsonwebtoken` failure onto the authorization error kinds
fn classify_decode_error(error: &JwtError) -> AuthError {
    match error.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        ErrorKind::InvalidAudience => AuthError::ClaimsInvalid { claim: "audience" },
        ErrorKind::InvalidIssuer => AuthError::ClaimsInvalid { claim: "issuer" },
        ErrorKind::Json(_) | ErrorKind::Utf8(_) | ErrorKind::MissingRequiredClaim(_) => {
            AuthError::ClaimsMalformed {
                reason: error.to_string(),
            }
        }
        ErrorKind::InvalidToken | ErrorKind::Base64(_) => {
            AuthError::token_malformed(error.to_string())
        }
        _ => AuthError::SignatureInvalid,
    }
}
