// ABOUTME: JSON Web Key Set retrieval for RS256 bearer-token verification
// ABOUTME: Fetches the identity provider's JWKS over HTTPS with optional time-bounded caching
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! JWKS (JSON Web Key Set) Retrieval
//!
//! This module provides:
//! - The JWK and JWKS wire types
//! - The [`KeySetProvider`] seam the token validator looks keys up through
//! - [`JwksClient`], which fetches the key set from the identity provider
//! - [`StaticKeySet`], a fixed in-memory key set
//!
//! ## Caching
//!
//! With a zero TTL the key set is fetched on every lookup. With a positive
//! TTL the fetched set is reused until it expires, and a lookup for a `kid`
//! that is not in the cached set forces one refresh before giving up. Forced
//! refreshes are spaced by a minimum interval so tokens naming made-up key
//! ids cannot turn every validation into a fetch.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use coffee_core::constants::defaults;
use coffee_core::errors::{AppError, AppResult, AuthError};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::config::environment::AuthConfig;

/// JWK (JSON Web Key) as published by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonWebKey {
    /// Key type ("RSA")
    pub kty: String,
    /// Public key use ("sig")
    #[serde(rename = "use", default, skip_serializing_if = "Option::is_none")]
    pub key_use: Option<String>,
    /// Key ID referenced by token headers
    pub kid: String,
    /// Algorithm ("RS256")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,
    /// RSA modulus (base64url encoded)
    pub n: String,
    /// RSA exponent (base64url encoded)
    pub e: String,
}

impl JsonWebKey {
    /// Build an RS256 signing key from big-endian modulus and exponent bytes
    #[must_use]
    pub fn rsa(kid: impl Into<String>, modulus: &[u8], exponent: &[u8]) -> Self {
        Self {
            kty: "RSA".to_owned(),
            key_use: Some("sig".to_owned()),
            kid: kid.into(),
            alg: Some("RS256".to_owned()),
            n: URL_SAFE_NO_PAD.encode(modulus),
            e: URL_SAFE_NO_PAD.encode(exponent),
        }
    }
}

/// JWKS (JSON Web Key Set) container
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonWebKeySet {
    /// Published keys
    pub keys: Vec<JsonWebKey>,
}

impl JsonWebKeySet {
    /// Find the key with the given key id
    #[must_use]
    pub fn find(&self, kid: &str) -> Option<&JsonWebKey> {
        self.keys.iter().find(|key| key.kid == kid)
    }
}

/// Source of signing keys for token verification
#[async_trait]
pub trait KeySetProvider: Send + Sync {
    /// Current key set
    ///
    /// # Errors
    ///
    /// Returns `KeySetUnavailable` if the key set cannot be obtained
    async fn key_set(&self) -> Result<JsonWebKeySet, AuthError>;

    /// Look up one key by id; `Ok(None)` means the set has no such key
    ///
    /// # Errors
    ///
    /// Returns `KeySetUnavailable` if the key set cannot be obtained
    async fn find_key(&self, kid: &str) -> Result<Option<JsonWebKey>, AuthError> {
        Ok(self.key_set().await?.find(kid).cloned())
    }
}

/// Fixed key set held in memory
#[derive(Debug, Clone, Default)]
pub struct StaticKeySet {
    keys: JsonWebKeySet,
}

impl StaticKeySet {
    /// Wrap a key set
    #[must_use]
    pub const fn new(keys: JsonWebKeySet) -> Self {
        Self { keys }
    }
}

#[async_trait]
impl KeySetProvider for StaticKeySet {
    async fn key_set(&self) -> Result<JsonWebKeySet, AuthError> {
        Ok(self.keys.clone())
    }
}

/// Cached key set
struct CachedKeySet {
    keys: JsonWebKeySet,
    fetched_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

/// Fetches the key set from the identity provider's JWKS endpoint
///
/// Thread-safe via `Arc<RwLock<_>>`, so one client is shared by every request.
pub struct JwksClient {
    /// JWKS endpoint URL
    url: String,
    /// HTTP client with request and connect timeouts
    http_client: Client,
    /// Zero disables caching
    cache_ttl: Duration,
    /// Shortest gap between two fetches forced by unknown key ids
    min_refresh_interval: StdDuration,
    cached_keys: Arc<RwLock<Option<CachedKeySet>>>,
}

impl JwksClient {
    /// Create a client for the given endpoint
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built
    pub fn new(
        url: impl Into<String>,
        timeout: StdDuration,
        connect_timeout: StdDuration,
        cache_ttl: StdDuration,
    ) -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| AppError::config(format!("Failed to build JWKS HTTP client: {e}")))?;

        let cache_ttl = Duration::from_std(cache_ttl)
            .map_err(|e| AppError::config(format!("Invalid JWKS cache TTL: {e}")))?;

        Ok(Self {
            url: url.into(),
            http_client,
            cache_ttl,
            min_refresh_interval: StdDuration::from_secs(defaults::JWKS_MIN_REFRESH_SECS),
            cached_keys: Arc::new(RwLock::new(None)),
        })
    }

    /// Set the shortest gap between refreshes forced by unknown key ids
    #[must_use]
    pub fn with_min_refresh_interval(mut self, interval: StdDuration) -> Self {
        self.min_refresh_interval = interval;
        self
    }

    /// Create a client from the authorization configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built
    pub fn from_config(config: &AuthConfig) -> AppResult<Self> {
        Self::new(
            config.jwks_url.clone(),
            StdDuration::from_secs(config.jwks_timeout_secs),
            StdDuration::from_secs(config.jwks_connect_timeout_secs),
            StdDuration::from_secs(config.jwks_cache_ttl_secs),
        )
        .map(|client| {
            client.with_min_refresh_interval(StdDuration::from_secs(config.jwks_min_refresh_secs))
        })
    }

    /// JWKS endpoint URL
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    fn caching_enabled(&self) -> bool {
        self.cache_ttl > Duration::zero()
    }

    /// Fetch the key set from the endpoint
    async fn fetch(&self) -> Result<JsonWebKeySet, AuthError> {
        debug!(url = %self.url, "Fetching JWKS");

        let response = self
            .http_client
            .get(&self.url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| {
                warn!(url = %self.url, error = %e, "Failed to fetch JWKS");
                AuthError::KeySetUnavailable {
                    reason: e.to_string(),
                }
            })?;

        response.json::<JsonWebKeySet>().await.map_err(|e| {
            warn!(url = %self.url, error = %e, "Failed to parse JWKS response");
            AuthError::KeySetUnavailable {
                reason: format!("invalid key set: {e}"),
            }
        })
    }

    /// Try to get a key from the cache if it is still valid
    async fn try_get_cached_key(&self, kid: &str) -> Option<JsonWebKey> {
        let result = {
            let cache = self.cached_keys.read().await;
            cache.as_ref().and_then(|cached| {
                if cached.expires_at > Utc::now() {
                    cached.keys.find(kid).cloned()
                } else {
                    None
                }
            })
        };
        if result.is_some() {
            debug!(kid = %kid, "Using cached signing key");
        }
        result
    }

    /// Whether the cached set is still valid and too recent to force a refresh
    async fn refresh_throttled(&self) -> bool {
        let cache = self.cached_keys.read().await;
        cache.as_ref().is_some_and(|cached| {
            let now = Utc::now();
            let since_fetch = (now - cached.fetched_at).to_std().unwrap_or_default();
            cached.expires_at > now && since_fetch < self.min_refresh_interval
        })
    }

    /// Refresh the cache from the endpoint and return the fresh set
    async fn refresh_keys(&self) -> Result<JsonWebKeySet, AuthError> {
        let keys = self.fetch().await?;
        let fetched_at = Utc::now();
        let expires_at = fetched_at + self.cache_ttl;

        info!(
            num_keys = keys.keys.len(),
            cache_ttl_secs = self.cache_ttl.num_seconds(),
            expires_at = %expires_at,
            "Signing keys cached"
        );

        let mut cache = self.cached_keys.write().await;
        *cache = Some(CachedKeySet {
            keys: keys.clone(),
            fetched_at,
            expires_at,
        });
        Ok(keys)
    }
}

#[async_trait]
impl KeySetProvider for JwksClient {
    async fn key_set(&self) -> Result<JsonWebKeySet, AuthError> {
        if !self.caching_enabled() {
            return self.fetch().await;
        }

        {
            let cache = self.cached_keys.read().await;
            if let Some(cached) = cache.as_ref().filter(|c| c.expires_at > Utc::now()) {
                return Ok(cached.keys.clone());
            }
        }
        self.refresh_keys().await
    }

    async fn find_key(&self, kid: &str) -> Result<Option<JsonWebKey>, AuthError> {
        if !self.caching_enabled() {
            return Ok(self.fetch().await?.find(kid).cloned());
        }

        if let Some(key) = self.try_get_cached_key(kid).await {
            return Ok(Some(key));
        }

        if self.refresh_throttled().await {
            debug!(kid = %kid, "Signing key not cached; forced refresh throttled");
            return Ok(None);
        }

        // Expired cache or unknown kid: one forced refresh
        let keys = self.refresh_keys().await?;
        let key = keys.find(kid).cloned();
        if key.is_none() {
            debug!(kid = %kid, "Signing key not found after refresh");
        }
        Ok(key)
    }
}
