// ABOUTME: Main library entry point for the coffee shop drinks API
// ABOUTME: Drinks CRUD over SQLite guarded by Auth0 RS256 bearer tokens and per-route permissions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Coffee Shop API
//!
//! A small REST backend for a coffee shop menu. Anyone can list drinks in
//! their short form; baristas and managers holding the right permissions can
//! see recipes in full and create, edit, or delete drinks.
//!
//! ## Architecture
//!
//! - **Auth**: JWKS retrieval, bearer token validation, permission gate
//! - **Database**: `SQLite` drink storage via `sqlx`
//! - **Routes**: axum handlers for drinks and health checks
//! - **Server**: shared resources, middleware layers, serve loop
//! - **Config**: environment-driven configuration
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use coffee_shop_api::config::environment::ServerConfig;
//! use coffee_shop_api::errors::AppResult;
//!
//! fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("Coffee shop API will listen on {}", config.bind_address());
//!     Ok(())
//! }
//! ```

/// Bearer token validation and the permission gate
pub mod auth;

/// Environment configuration
pub mod config;

/// `SQLite` drink storage
pub mod database;

/// Structured logging setup
pub mod logging;

/// HTTP middleware layers
pub mod middleware;

/// HTTP route handlers
pub mod routes;

/// Router assembly and serve loop
pub mod server;

pub use coffee_core::{constants, errors, models};
