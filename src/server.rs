// ABOUTME: HTTP server assembly for the drinks API
// ABOUTME: Shared server resources, router construction with middleware layers, and the serve loop
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Server
//!
//! [`ServerResources`] is built once at startup and shared with every
//! handler as `State<Arc<ServerResources>>`.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::error_handling::HandleErrorLayer;
use axum::{BoxError, Router};
use coffee_core::errors::AppError;
use tokio::net::TcpListener;
use tower::timeout::error::Elapsed;
use tower::ServiceBuilder;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::auth::TokenValidator;
use crate::config::environment::ServerConfig;
use crate::database::Database;
use crate::middleware::{make_request_span, setup_cors, RequestIdGenerator};
use crate::routes::{DrinksRoutes, HealthRoutes};

/// Upper bound on handling one request, key set fetch included
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Resources shared by every request
pub struct ServerResources {
    /// Drink storage
    pub database: Arc<Database>,
    /// Bearer token validation
    pub token_validator: Arc<TokenValidator>,
    /// Loaded configuration
    pub config: Arc<ServerConfig>,
}

impl ServerResources {
    /// Bundle the shared resources
    #[must_use]
    pub const fn new(
        database: Arc<Database>,
        token_validator: Arc<TokenValidator>,
        config: Arc<ServerConfig>,
    ) -> Self {
        Self {
            database,
            token_validator,
            config,
        }
    }
}

/// Build the application router with all routes and middleware layers
///
/// Layers run outermost first: request id assignment, the request span,
/// request id propagation, CORS, then the timeout nearest the routes.
pub fn build_router(resources: Arc<ServerResources>) -> Router {
    let cors = setup_cors(&resources.config.cors);

    Router::new()
        .merge(HealthRoutes::routes(Arc::clone(&resources)))
        .merge(DrinksRoutes::routes(Arc::clone(&resources)))
        .fallback(handle_unknown_route)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(RequestIdGenerator))
                .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(cors)
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .timeout(REQUEST_TIMEOUT),
        )
}

/// Unknown paths answer with the standard 404 body
async fn handle_unknown_route() -> AppError {
    AppError::not_found("Route")
}

/// Render failures raised by the middleware stack with the standard error body
async fn handle_middleware_error(error: BoxError) -> AppError {
    if error.is::<Elapsed>() {
        warn!(timeout_secs = REQUEST_TIMEOUT.as_secs(), "Request timed out");
        AppError::timeout()
    } else {
        AppError::internal(format!("Unhandled middleware error: {error}"))
    }
}

/// Bind the configured address and serve until Ctrl-C
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails
pub async fn run(resources: Arc<ServerResources>) -> Result<()> {
    let address = resources.config.bind_address();
    let listener = TcpListener::bind(&address).await?;
    info!("HTTP server listening on http://{}", listener.local_addr()?);

    let router = build_router(resources);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");
}
