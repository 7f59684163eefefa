// ABOUTME: Environment-based configuration for the drinks API server
// ABOUTME: Loads listen address, database URL, Auth0 settings, and CORS origins from env vars
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-only configuration
//!
//! Every setting has a default except the identity tenant: either
//! `AUTH0_DOMAIN` or both `JWT_ISSUER` and `JWKS_URL` must be set.

use std::env;
use std::fmt::Display;
use std::str::FromStr;

use coffee_core::constants::defaults;
use coffee_core::errors::{AppError, AppResult, DenialStatus};
use tracing::info;

/// Top-level server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,
    /// Bind address
    pub host: String,
    /// Database settings
    pub database: DatabaseConfig,
    /// Token validation settings
    pub auth: AuthConfig,
    /// Cross-origin settings
    pub cors: CorsConfig,
}

/// Database settings
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// `SQLite` URL, e.g. `sqlite:./data/coffee_shop.db` or `sqlite::memory:`
    pub url: String,
}

/// Token validation settings
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Auth0 tenant domain, e.g. `coffee.eu.auth0.com`
    pub domain: Option<String>,
    /// Expected `aud` claim
    pub audience: String,
    /// Expected `iss` claim
    pub issuer: String,
    /// Key set endpoint
    pub jwks_url: String,
    /// Key set fetch timeout
    pub jwks_timeout_secs: u64,
    /// Key set connect timeout
    pub jwks_connect_timeout_secs: u64,
    /// Key set cache TTL; 0 fetches on every validation
    pub jwks_cache_ttl_secs: u64,
    /// Minimum gap between refreshes forced by unknown key ids
    pub jwks_min_refresh_secs: u64,
    /// Status used for a missing permission
    pub denial_status: DenialStatus,
}

/// Cross-origin settings
#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// `*` or a comma-separated origin list
    pub allowed_origins: String,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the identity tenant is missing or a
    /// numeric or boolean variable does not parse
    pub fn from_env() -> AppResult<Self> {
        info!("Loading configuration from environment variables");

        let config = Self {
            http_port: parse_env("HTTP_PORT", defaults::HTTP_PORT)?,
            host: env_var_or("HOST", defaults::HOST),
            database: DatabaseConfig {
                url: env_var_or("DATABASE_URL", defaults::DATABASE_URL),
            },
            auth: AuthConfig::from_env()?,
            cors: CorsConfig {
                allowed_origins: env_var_or("CORS_ALLOWED_ORIGINS", "*"),
            },
        };

        Ok(config)
    }

    /// Address to bind, `host:port`
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.http_port)
    }

    /// Get a summary of the configuration for logging (without secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Coffee Shop API Configuration:\n\
             - Listen: {}\n\
             - Database: {}\n\
             - Issuer: {}\n\
             - Audience: {}\n\
             - JWKS: {} (cache: {})\n\
             - Permission denial status: {}\n\
             - CORS origins: {}",
            self.bind_address(),
            self.database.url,
            self.auth.issuer,
            self.auth.audience,
            self.auth.jwks_url,
            if self.auth.jwks_cache_ttl_secs == 0 {
                "disabled".to_owned()
            } else {
                format!("{}s", self.auth.jwks_cache_ttl_secs)
            },
            match self.auth.denial_status {
                DenialStatus::Unauthorized => 401,
                DenialStatus::Forbidden => 403,
            },
            self.cors.allowed_origins,
        )
    }
}

impl AuthConfig {
    /// Load token validation settings from environment variables
    ///
    /// # Errors
    ///
    /// Returns a configuration error if neither `AUTH0_DOMAIN` nor both
    /// `JWT_ISSUER` and `JWKS_URL` are set
    pub fn from_env() -> AppResult<Self> {
        let domain = non_empty_var("AUTH0_DOMAIN").map(|d| normalize_domain(&d));

        let issuer = non_empty_var("JWT_ISSUER")
            .or_else(|| domain.as_ref().map(|d| format!("https://{d}/")))
            .ok_or_else(|| AppError::config("AUTH0_DOMAIN or JWT_ISSUER must be set"))?;

        let jwks_url = non_empty_var("JWKS_URL")
            .or_else(|| {
                domain
                    .as_ref()
                    .map(|d| format!("https://{d}/.well-known/jwks.json"))
            })
            .ok_or_else(|| AppError::config("AUTH0_DOMAIN or JWKS_URL must be set"))?;

        let denial_status = if parse_env("AUTH_FORBIDDEN_AS_403", false)? {
            DenialStatus::Forbidden
        } else {
            DenialStatus::Unauthorized
        };

        Ok(Self {
            domain,
            audience: env_var_or("API_AUDIENCE", defaults::API_AUDIENCE),
            issuer,
            jwks_url,
            jwks_timeout_secs: parse_env("JWKS_TIMEOUT_SECS", defaults::JWKS_TIMEOUT_SECS)?,
            jwks_connect_timeout_secs: defaults::JWKS_CONNECT_TIMEOUT_SECS,
            jwks_cache_ttl_secs: parse_env("JWKS_CACHE_TTL_SECS", defaults::JWKS_CACHE_TTL_SECS)?,
            jwks_min_refresh_secs: parse_env(
                "JWKS_MIN_REFRESH_SECS",
                defaults::JWKS_MIN_REFRESH_SECS,
            )?,
            denial_status,
        })
    }
}

/// Get environment variable with fallback to default
fn env_var_or(key: &str, default: &str) -> String {
    non_empty_var(key).unwrap_or_else(|| default.to_owned())
}

/// Environment variable, treating empty as unset
fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

/// Parse an environment variable, using `default` when unset
fn parse_env<T>(key: &str, default: T) -> AppResult<T>
where
    T: FromStr,
    T::Err: Display,
{
    non_empty_var(key).map_or(Ok(default), |raw| {
        raw.parse()
            .map_err(|e| AppError::config(format!("Invalid {key} value '{raw}': {e}")))
    })
}

/// Strip scheme and trailing slash from a tenant domain
fn normalize_domain(domain: &str) -> String {
    domain
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_end_matches('/')
        .to_owned()
}
