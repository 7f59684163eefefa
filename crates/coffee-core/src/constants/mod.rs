// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Permission names, drink field limits, and server defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Constants are grouped by domain rather than kept in one flat list.

/// Permission strings granted by the identity provider
pub mod permissions {
    /// Read the detailed (long) drink representation
    pub const GET_DRINKS_DETAIL: &str = "get:drinks-detail";
    /// Create drinks
    pub const POST_DRINKS: &str = "post:drinks";
    /// Edit drinks
    pub const PATCH_DRINKS: &str = "patch:drinks";
    /// Delete drinks
    pub const DELETE_DRINKS: &str = "delete:drinks";

    /// Every permission the API checks, in route order
    pub const ALL: [&str; 4] = [GET_DRINKS_DETAIL, POST_DRINKS, PATCH_DRINKS, DELETE_DRINKS];
}

/// Drink field limits, matching the `drink` table column sizes
pub mod limits {
    /// Maximum title length in characters
    pub const MAX_TITLE_LENGTH: usize = 80;
    /// Maximum serialized recipe length in characters
    pub const MAX_RECIPE_JSON_LENGTH: usize = 180;
}

/// API endpoints
pub mod endpoints {
    /// Public and write collection endpoint
    pub const DRINKS: &str = "/drinks";
    /// Detailed listing endpoint
    pub const DRINKS_DETAIL: &str = "/drinks-detail";
    /// Single drink endpoint
    pub const DRINK_BY_ID: &str = "/drinks/:id";
    /// Liveness check
    pub const HEALTH_CHECK: &str = "/health";
    /// Readiness check
    pub const READY_CHECK: &str = "/ready";
}

/// Server defaults
pub mod defaults {
    /// Default HTTP port
    pub const HTTP_PORT: u16 = 8080;
    /// Default bind host
    pub const HOST: &str = "127.0.0.1";
    /// Default `SQLite` database location
    pub const DATABASE_URL: &str = "sqlite:./data/coffee_shop.db";
    /// Default token audience
    pub const API_AUDIENCE: &str = "drinks";
    /// Default JWKS fetch timeout in seconds
    pub const JWKS_TIMEOUT_SECS: u64 = 5;
    /// Default JWKS connect timeout in seconds
    pub const JWKS_CONNECT_TIMEOUT_SECS: u64 = 3;
    /// Default JWKS cache TTL in seconds (0 disables caching)
    pub const JWKS_CACHE_TTL_SECS: u64 = 0;
    /// Default minimum seconds between key set refreshes forced by unknown key ids
    pub const JWKS_MIN_REFRESH_SECS: u64 = 30;
}

/// Service identifiers for structured logging
pub mod service_names {
    /// Server binary name
    pub const COFFEE_SHOP_API: &str = "coffee-shop-api";
}

/// HTTP header names used outside the `http` crate's constants
pub mod headers {
    /// Request correlation header
    pub const REQUEST_ID: &str = "x-request-id";
}
