// ABOUTME: Authorization module for Auth0-issued RS256 access tokens
// ABOUTME: Key set retrieval, token validation, and the per-route permission gate
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Authorization
//!
//! A request flows through the [`TokenValidator`] (bearer token, signature,
//! standard claims) and then the permission check of an [`AuthGate`] before
//! reaching a protected drink handler.

/// Decoded token claims
pub mod claims;
/// Permission gate route middleware
pub mod gate;
/// JWKS wire types and key set providers
pub mod jwks;
/// Bearer token validation
pub mod validator;

pub use claims::{Audience, DecodedClaims};
pub use gate::{check_permissions, require_permission, AuthGate};
pub use jwks::{JsonWebKey, JsonWebKeySet, JwksClient, KeySetProvider, StaticKeySet};
pub use validator::TokenValidator;
