// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides RSA signing keys, token minting, and in-memory server resources
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `coffee_shop_api`
//!
//! Tokens are signed with a locally generated RSA key whose public half is
//! served by a [`StaticKeySet`], so no identity provider is contacted.

use std::sync::{Arc, Once, OnceLock};

use axum::Router;
use chrono::Utc;
use coffee_shop_api::{
    auth::{JsonWebKey, JsonWebKeySet, StaticKeySet, TokenValidator},
    config::{AuthConfig, CorsConfig, DatabaseConfig, ServerConfig},
    database::Database,
    errors::DenialStatus,
    server::{self, ServerResources},
};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use rsa::pkcs8::{EncodePrivateKey, LineEnding};
use rsa::traits::PublicKeyParts;
use rsa::RsaPrivateKey;
use serde_json::{json, Value};

/// Key id of the trusted test signing key
pub const TEST_KID: &str = "test-key";
/// Issuer the test validator expects
pub const TEST_ISSUER: &str = "https://coffee.test/";
/// Audience the test validator expects
pub const TEST_AUDIENCE: &str = "drinks";

static INIT_LOGGER: Once = Once::new();
static TRUSTED_KEY: OnceLock<TestSigningKey> = OnceLock::new();
static UNTRUSTED_KEY: OnceLock<TestSigningKey> = OnceLock::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// RSA key pair usable for signing tokens and publishing the public half
pub struct TestSigningKey {
    encoding_key: EncodingKey,
    modulus: Vec<u8>,
    exponent: Vec<u8>,
}

impl TestSigningKey {
    fn generate() -> Self {
        let private_key = RsaPrivateKey::new(&mut rand::rngs::OsRng, 2048).unwrap();
        let pem = private_key.to_pkcs8_pem(LineEnding::LF).unwrap();
        let encoding_key = EncodingKey::from_rsa_pem(pem.as_bytes()).unwrap();

        Self {
            encoding_key,
            modulus: private_key.n().to_bytes_be(),
            exponent: private_key.e().to_bytes_be(),
        }
    }

    /// Public key published under `kid`
    pub fn jwk(&self, kid: &str) -> JsonWebKey {
        JsonWebKey::rsa(kid, &self.modulus, &self.exponent)
    }

    /// Sign `claims` with RS256 and the given `kid` header
    pub fn sign(&self, kid: Option<&str>, claims: &Value) -> String {
        let mut header = Header::new(Algorithm::RS256);
        header.kid = kid.map(str::to_owned);
        encode(&header, claims, &self.encoding_key).unwrap()
    }
}

/// Key the test validator trusts
pub fn trusted_key() -> &'static TestSigningKey {
    TRUSTED_KEY.get_or_init(TestSigningKey::generate)
}

/// Key the test validator has never seen
pub fn untrusted_key() -> &'static TestSigningKey {
    UNTRUSTED_KEY.get_or_init(TestSigningKey::generate)
}

/// Key set holding the trusted key under [`TEST_KID`]
pub fn test_key_set() -> JsonWebKeySet {
    JsonWebKeySet {
        keys: vec![trusted_key().jwk(TEST_KID)],
    }
}

/// Claims accepted by the test validator, granting `permissions`
pub fn valid_claims(permissions: &[&str]) -> Value {
    let now = Utc::now().timestamp();
    json!({
        "iss": TEST_ISSUER,
        "sub": "auth0|barista",
        "aud": TEST_AUDIENCE,
        "iat": now,
        "exp": now + 3600,
        "permissions": permissions,
    })
}

/// Token signed by the trusted key
pub fn mint_token(claims: &Value) -> String {
    trusted_key().sign(Some(TEST_KID), claims)
}

/// Token signed by the trusted key granting `permissions`
pub fn token_with_permissions(permissions: &[&str]) -> String {
    mint_token(&valid_claims(permissions))
}

/// Validator trusting only [`test_key_set`]
pub fn create_test_validator() -> TokenValidator {
    TokenValidator::new(
        Arc::new(StaticKeySet::new(test_key_set())),
        TEST_ISSUER,
        TEST_AUDIENCE,
    )
}

/// Configuration pointing at an in-memory database
pub fn create_test_config(denial_status: DenialStatus) -> ServerConfig {
    ServerConfig {
        http_port: 0,
        host: "127.0.0.1".to_owned(),
        database: DatabaseConfig {
            url: "sqlite::memory:".to_owned(),
        },
        auth: AuthConfig {
            domain: None,
            audience: TEST_AUDIENCE.to_owned(),
            issuer: TEST_ISSUER.to_owned(),
            jwks_url: "http://127.0.0.1:9/.well-known/jwks.json".to_owned(),
            jwks_timeout_secs: 1,
            jwks_connect_timeout_secs: 1,
            jwks_cache_ttl_secs: 0,
            jwks_min_refresh_secs: 30,
            denial_status,
        },
        cors: CorsConfig {
            allowed_origins: "*".to_owned(),
        },
    }
}

/// Standard test resources over an empty in-memory database
pub async fn create_test_resources(denial_status: DenialStatus) -> Arc<ServerResources> {
    init_test_logging();
    let database = Database::new("sqlite::memory:").await.unwrap();
    database.migrate().await.unwrap();

    Arc::new(ServerResources::new(
        Arc::new(database),
        Arc::new(create_test_validator()),
        Arc::new(create_test_config(denial_status)),
    ))
}

/// Full application router over the given resources
pub fn create_test_router(resources: &Arc<ServerResources>) -> Router {
    server::build_router(Arc::clone(resources))
}
