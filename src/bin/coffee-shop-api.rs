// ABOUTME: Server binary for the coffee shop drinks API
// ABOUTME: Loads configuration, prepares the database, and serves HTTP until shutdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Coffee Shop API Server Binary
//!
//! Configuration comes from the environment; see `ServerConfig::from_env`.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use coffee_shop_api::{
    auth::{JwksClient, TokenValidator},
    config::environment::ServerConfig,
    database::Database,
    logging,
    server::{self, ServerResources},
};
use tracing::{info, warn};

/// Command-line overrides for the environment configuration
#[derive(Parser)]
#[command(name = "coffee-shop-api")]
#[command(about = "Coffee shop drinks API with Auth0 permission checks")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Drop every drink and seed the default one before serving
    #[arg(long)]
    reset_database: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_from_env()?;

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    info!("{}", config.summary());

    let database = Database::new(&config.database.url).await?;
    database.migrate().await?;
    if args.reset_database {
        warn!("Resetting drink table; all stored drinks are removed");
        database.reset().await?;
    }
    info!(url = %config.database.url, "Database ready");

    let key_set = JwksClient::from_config(&config.auth)?;
    info!(url = %key_set.url(), "Signing keys will be fetched from JWKS endpoint");
    let validator = TokenValidator::new(
        Arc::new(key_set),
        config.auth.issuer.clone(),
        config.auth.audience.clone(),
    );

    let resources = Arc::new(ServerResources::new(
        Arc::new(database),
        Arc::new(validator),
        Arc::new(config),
    ));

    server::run(resources).await
}
