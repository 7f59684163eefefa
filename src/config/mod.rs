// ABOUTME: Configuration management module for centralized server settings
// ABOUTME: Re-exports the environment-driven server configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//! Configuration module for the coffee shop API

/// Environment and server configuration
pub mod environment;

pub use environment::{AuthConfig, CorsConfig, DatabaseConfig, ServerConfig};
