// ABOUTME: Route module organization for the coffee shop HTTP endpoints
// ABOUTME: Drinks CRUD routes and service health routes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Route module
//!
//! Each domain module contains route definitions and thin handler functions
//! that delegate to the database layer.

/// Drinks CRUD routes
pub mod drinks;
/// Health check and readiness routes
pub mod health;

pub use drinks::DrinksRoutes;
pub use health::HealthRoutes;
