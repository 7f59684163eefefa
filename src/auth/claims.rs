// ABOUTME: Decoded JWT claims produced by successful token validation
// ABOUTME: Carries issuer, subject, audience, expiry, the permission set, and any other claims verbatim
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `aud` claim: a single audience or a list of audiences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    /// One audience string
    Single(String),
    /// Several audience strings
    Multiple(Vec<String>),
}

impl Audience {
    /// Whether `audience` is named by this claim
    #[must_use]
    pub fn contains(&self, audience: &str) -> bool {
        match self {
            Self::Single(aud) => aud == audience,
            Self::Multiple(auds) => auds.iter().any(|aud| aud == audience),
        }
    }
}

/// Claims of a verified access token
///
/// Standard claims other than `exp` default when absent so that issuer and
/// audience problems surface as claim validation failures rather than
/// decoding failures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodedClaims {
    /// Issuer
    #[serde(default)]
    pub iss: String,
    /// Subject (identity provider user id)
    #[serde(default)]
    pub sub: String,
    /// Audience
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<Audience>,
    /// Expiration timestamp
    pub exp: i64,
    /// Issued at timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    /// Granted permissions; `None` when the token has no `permissions` claim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,
    /// Every other claim, untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DecodedClaims {
    /// Whether the permission set contains `permission`
    #[must_use]
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions
            .as_deref()
            .is_some_and(|granted| granted.iter().any(|p| p == permission))
    }
}
