// ABOUTME: Core types and constants for the coffee shop drinks API
// ABOUTME: Foundation crate with error handling, drink models, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Coffee Core
//!
//! Foundation crate providing shared types and constants for the coffee shop
//! drinks API. This crate changes rarely, so the server crate recompiles
//! without touching it.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and `AuthError`
//! - **constants**: Permission names, limits, and defaults
//! - **models**: The drink resource and its short/long representations

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Drink data models and their public representations
pub mod models;
