// ABOUTME: Integration tests for the drinks HTTP routes through the full router
// ABOUTME: Exercises the public listing, permission-gated endpoints, error bodies, and middleware
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use coffee_shop_api::{
    constants::permissions,
    errors::DenialStatus,
    models::{NewDrink, RecipePart},
    server::ServerResources,
};
use common::{create_test_resources, create_test_router, token_with_permissions};
use serde_json::{json, Value};
use tower::ServiceExt;

const ALL_PERMISSIONS: [&str; 4] = permissions::ALL;

struct TestApp {
    resources: Arc<ServerResources>,
    router: Router,
}

impl TestApp {
    async fn new() -> Self {
        Self::with_denial(DenialStatus::Unauthorized).await
    }

    async fn with_denial(denial: DenialStatus) -> Self {
        let resources = create_test_resources(denial).await;
        let router = create_test_router(&resources);
        Self { resources, router }
    }

    async fn seed(&self, title: &str) -> i64 {
        let drink = NewDrink {
            title: title.to_owned(),
            recipe: vec![
                RecipePart {
                    name: "espresso".to_owned(),
                    color: "brown".to_owned(),
                    parts: 1,
                },
                RecipePart {
                    name: "milk".to_owned(),
                    color: "white".to_owned(),
                    parts: 2,
                },
            ],
        };
        self.resources.database.drinks().create(&drink).await.unwrap().id
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<&Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }
}

fn latte_body() -> Value {
    json!({
        "title": "Latte",
        "recipe": [
            {"name": "espresso", "color": "brown", "parts": 1},
            {"name": "milk", "color": "white", "parts": 3}
        ]
    })
}

// ============================================================================
// Public listing
// ============================================================================

#[tokio::test]
async fn test_public_listing_needs_no_token_and_hides_names() {
    let app = TestApp::new().await;
    let id = app.seed("Cortado").await;

    let (status, body) = app.send(Method::GET, "/drinks", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["drinks"][0]["id"], id);
    assert_eq!(body["drinks"][0]["title"], "Cortado");
    assert_eq!(body["drinks"][0]["recipe"][1]["color"], "white");
    assert!(body["drinks"][0]["recipe"][0].get("name").is_none());
}

#[tokio::test]
async fn test_public_listing_empty_store() {
    let app = TestApp::new().await;

    let (status, body) = app.send(Method::GET, "/drinks", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["drinks"], json!([]));
}

// ============================================================================
// Detail listing
// ============================================================================

#[tokio::test]
async fn test_detail_listing_shows_full_recipe() {
    let app = TestApp::new().await;
    app.seed("Cortado").await;
    let token = token_with_permissions(&[permissions::GET_DRINKS_DETAIL]);

    let (status, body) = app
        .send(Method::GET, "/drinks-detail", Some(&token), None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["drinks"][0]["recipe"][0]["name"], "espresso");
}

#[tokio::test]
async fn test_detail_listing_empty_store_is_not_found() {
    let app = TestApp::new().await;
    let token = token_with_permissions(&[permissions::GET_DRINKS_DETAIL]);

    let (status, body) = app
        .send(Method::GET, "/drinks-detail", Some(&token), None)
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], 404);
    assert_eq!(body["message"], "resource not found");
}

#[tokio::test]
async fn test_detail_listing_without_header() {
    let app = TestApp::new().await;
    app.seed("Cortado").await;

    let (status, body) = app.send(Method::GET, "/drinks-detail", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], 401);
    assert_eq!(body["code"], "authorization_header_missing");
    assert_eq!(body["message"], "Authorization header is expected.");
}

#[tokio::test]
async fn test_wrong_scheme_is_bad_request() {
    let app = TestApp::new().await;
    let request = Request::builder()
        .uri("/drinks-detail")
        .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
        .body(Body::empty())
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["code"], "invalid_header");
}

// ============================================================================
// Create
// ============================================================================

#[tokio::test]
async fn test_create_returns_long_drink() {
    let app = TestApp::new().await;
    let token = token_with_permissions(&[permissions::POST_DRINKS]);

    let (status, body) = app
        .send(Method::POST, "/drinks", Some(&token), Some(&latte_body()))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["drinks"].as_array().unwrap().len(), 1);
    assert_eq!(body["drinks"][0]["title"], "Latte");
    assert_eq!(body["drinks"][0]["recipe"][1]["name"], "milk");

    let stored = app.resources.database.drinks().list().await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].title, "Latte");
}

#[tokio::test]
async fn test_create_accepts_single_recipe_object() {
    let app = TestApp::new().await;
    let token = token_with_permissions(&[permissions::POST_DRINKS]);
    let body = json!({
        "title": "water",
        "recipe": {"name": "water", "color": "blue", "parts": 1}
    });

    let (status, body) = app
        .send(Method::POST, "/drinks", Some(&token), Some(&body))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["drinks"][0]["recipe"][0]["color"], "blue");
}

#[tokio::test]
async fn test_create_without_permission_is_unauthorized() {
    let app = TestApp::new().await;
    let token = token_with_permissions(&[permissions::GET_DRINKS_DETAIL]);

    let (status, body) = app
        .send(Method::POST, "/drinks", Some(&token), Some(&latte_body()))
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "unauthorized");
    assert_eq!(body["message"], "Permission 'post:drinks' not found.");
    assert!(app.resources.database.drinks().list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_without_permission_is_forbidden_under_strict_policy() {
    let app = TestApp::with_denial(DenialStatus::Forbidden).await;
    let token = token_with_permissions(&[permissions::GET_DRINKS_DETAIL]);

    let (status, body) = app
        .send(Method::POST, "/drinks", Some(&token), Some(&latte_body()))
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], 403);
    assert_eq!(body["code"], "forbidden");
}

#[tokio::test]
async fn test_token_without_permissions_claim_is_bad_request() {
    let app = TestApp::new().await;
    let mut claims = common::valid_claims(&[]);
    claims.as_object_mut().unwrap().remove("permissions");
    let token = common::mint_token(&claims);

    let (status, body) = app
        .send(Method::POST, "/drinks", Some(&token), Some(&latte_body()))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "permissions_missing");
}

#[tokio::test]
async fn test_authorization_runs_before_body_validation() {
    let app = TestApp::new().await;

    let (status, _) = app
        .send(Method::POST, "/drinks", None, Some(&json!({"title": ""})))
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_missing_title_is_unprocessable() {
    let app = TestApp::new().await;
    let token = token_with_permissions(&[permissions::POST_DRINKS]);
    let body = json!({"recipe": [{"name": "milk", "color": "white", "parts": 1}]});

    let (status, body) = app
        .send(Method::POST, "/drinks", Some(&token), Some(&body))
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], 422);
    assert_eq!(body["message"], "unprocessable");
    assert_eq!(body["details"], "title is required");
}

#[tokio::test]
async fn test_create_invalid_json_is_unprocessable() {
    let app = TestApp::new().await;
    let token = token_with_permissions(&[permissions::POST_DRINKS]);
    let request = Request::builder()
        .method(Method::POST)
        .uri("/drinks")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_create_duplicate_title_conflicts() {
    let app = TestApp::new().await;
    let token = token_with_permissions(&[permissions::POST_DRINKS]);

    let (first, _) = app
        .send(Method::POST, "/drinks", Some(&token), Some(&latte_body()))
        .await;
    let (second, body) = app
        .send(Method::POST, "/drinks", Some(&token), Some(&latte_body()))
        .await;

    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::CONFLICT);
    assert_eq!(body["code"], "resource_already_exists");
}

// ============================================================================
// Update
// ============================================================================

#[tokio::test]
async fn test_patch_title_keeps_recipe() {
    let app = TestApp::new().await;
    let id = app.seed("Cortado").await;
    let token = token_with_permissions(&[permissions::PATCH_DRINKS]);

    let (status, body) = app
        .send(
            Method::PATCH,
            &format!("/drinks/{id}"),
            Some(&token),
            Some(&json!({"title": "Gibraltar"})),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["drinks"][0]["id"], id);
    assert_eq!(body["drinks"][0]["title"], "Gibraltar");
    assert_eq!(body["drinks"][0]["recipe"][0]["name"], "espresso");
    assert_eq!(body["drinks"][0]["recipe"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_patch_recipe_keeps_title() {
    let app = TestApp::new().await;
    let id = app.seed("Cortado").await;
    let token = token_with_permissions(&[permissions::PATCH_DRINKS]);
    let body = json!({"recipe": [{"name": "oat milk", "color": "beige", "parts": 2}]});

    let (status, body) = app
        .send(
            Method::PATCH,
            &format!("/drinks/{id}"),
            Some(&token),
            Some(&body),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["drinks"][0]["title"], "Cortado");
    assert_eq!(body["drinks"][0]["recipe"][0]["name"], "oat milk");
}

#[tokio::test]
async fn test_patch_missing_drink() {
    let app = TestApp::new().await;
    let token = token_with_permissions(&[permissions::PATCH_DRINKS]);

    let (status, body) = app
        .send(
            Method::PATCH,
            "/drinks/999",
            Some(&token),
            Some(&json!({"title": "Ghost"})),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "resource not found");
}

#[tokio::test]
async fn test_patch_empty_body_is_unprocessable() {
    let app = TestApp::new().await;
    let id = app.seed("Cortado").await;
    let token = token_with_permissions(&[permissions::PATCH_DRINKS]);

    let (status, _) = app
        .send(
            Method::PATCH,
            &format!("/drinks/{id}"),
            Some(&token),
            Some(&json!({})),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

// ============================================================================
// Delete
// ============================================================================

#[tokio::test]
async fn test_delete_removes_drink() {
    let app = TestApp::new().await;
    let id = app.seed("Cortado").await;
    let token = token_with_permissions(&[permissions::DELETE_DRINKS]);

    let (status, body) = app
        .send(Method::DELETE, &format!("/drinks/{id}"), Some(&token), None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "delete": id}));
    assert!(app.resources.database.drinks().get(id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete_missing_drink() {
    let app = TestApp::new().await;
    let token = token_with_permissions(&ALL_PERMISSIONS);

    let (status, body) = app
        .send(Method::DELETE, "/drinks/999", Some(&token), None)
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], 404);
}

#[tokio::test]
async fn test_delete_non_numeric_id_is_not_found() {
    let app = TestApp::new().await;
    let token = token_with_permissions(&[permissions::DELETE_DRINKS]);

    let (status, _) = app
        .send(Method::DELETE, "/drinks/latte", Some(&token), None)
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_with_patch_permission_is_denied() {
    let app = TestApp::new().await;
    let id = app.seed("Cortado").await;
    let token = token_with_permissions(&[permissions::PATCH_DRINKS]);

    let (status, _) = app
        .send(Method::DELETE, &format!("/drinks/{id}"), Some(&token), None)
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(app.resources.database.drinks().get(id).await.unwrap().is_some());
}

// ============================================================================
// Middleware and fallbacks
// ============================================================================

#[tokio::test]
async fn test_responses_carry_request_id() {
    let app = TestApp::new().await;
    let request = Request::builder()
        .uri("/drinks")
        .body(Body::empty())
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();

    let request_id = response.headers().get("x-request-id").unwrap();
    assert!(request_id.to_str().unwrap().starts_with("req_"));
}

#[tokio::test]
async fn test_incoming_request_id_is_propagated() {
    let app = TestApp::new().await;
    let request = Request::builder()
        .uri("/drinks")
        .header("x-request-id", "client-supplied-id")
        .body(Body::empty())
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();

    assert_eq!(
        response.headers().get("x-request-id").unwrap(),
        "client-supplied-id"
    );
}

#[tokio::test]
async fn test_cors_preflight_allows_authorization_header() {
    let app = TestApp::new().await;
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/drinks/1")
        .header(header::ORIGIN, "http://localhost:8100")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PATCH")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization")
        .body(Body::empty())
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();

    assert!(response.status().is_success());
    let allowed_methods = response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_METHODS)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(allowed_methods.contains("PATCH"));
    let allowed_headers = response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_HEADERS)
        .unwrap()
        .to_str()
        .unwrap()
        .to_lowercase();
    assert!(allowed_headers.contains("authorization"));
}

#[tokio::test]
async fn test_unknown_route_is_json_not_found() {
    let app = TestApp::new().await;

    let (status, body) = app.send(Method::GET, "/coffee-beans", None, None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "resource not found");
}

#[tokio::test]
async fn test_health_and_ready() {
    let app = TestApp::new().await;

    let (status, body) = app.send(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "coffee-shop-api");

    let (status, body) = app.send(Method::GET, "/ready", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");

    app.resources.database.close().await;
    let (status, body) = app.send(Method::GET, "/ready", None, None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "not_ready");
}
