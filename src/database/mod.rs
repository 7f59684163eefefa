// ABOUTME: SQLite database handle for the drinks API
// ABOUTME: Connection pool setup, schema creation, reset with seed data, and health checks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Database
//!
//! One `drink` table:
//!
//! ```sql
//! id INTEGER PRIMARY KEY AUTOINCREMENT, title TEXT NOT NULL UNIQUE, recipe TEXT NOT NULL
//! ```
//!
//! `recipe` holds the JSON-encoded list of recipe parts.

/// Drink persistence
pub mod drinks;

pub use drinks::DrinksManager;

use std::path::Path;
use std::str::FromStr;

use coffee_core::errors::{AppError, AppResult};
use coffee_core::models::{NewDrink, RecipePart};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::{debug, info};

/// Connection pool size for file-backed databases
const MAX_CONNECTIONS: u32 = 5;

const CREATE_DRINK_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS drink (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL UNIQUE,
        recipe TEXT NOT NULL
    )
";

/// Shared database handle
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect to `database_url`, creating the file and its directory if needed
    ///
    /// In-memory databases use a single long-lived connection, since every
    /// `SQLite` memory connection is its own database.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the connection fails
    pub async fn new(database_url: &str) -> AppResult<Self> {
        let in_memory = database_url.contains(":memory:");

        if !in_memory {
            ensure_parent_dir(database_url).await?;
        }

        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::config(format!("Invalid DATABASE_URL '{database_url}': {e}")))?
            .create_if_missing(true);

        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(MAX_CONNECTIONS)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to connect to database: {e}")))?;

        debug!(url = %database_url, in_memory, "Database pool created");
        Ok(Self { pool })
    }

    /// Create the schema if it does not exist
    ///
    /// # Errors
    ///
    /// Returns an error if the schema statement fails
    pub async fn migrate(&self) -> AppResult<()> {
        sqlx::query(CREATE_DRINK_TABLE)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to create drink table: {e}")))?;
        Ok(())
    }

    /// Drop and recreate the drink table, then seed the default drink
    ///
    /// Destroys every stored drink.
    ///
    /// # Errors
    ///
    /// Returns an error if any statement fails
    pub async fn reset(&self) -> AppResult<()> {
        sqlx::query("DROP TABLE IF EXISTS drink")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to drop drink table: {e}")))?;
        self.migrate().await?;

        let seed = NewDrink {
            title: "water".to_owned(),
            recipe: vec![RecipePart {
                name: "water".to_owned(),
                color: "blue".to_owned(),
                parts: 1,
            }],
        };
        self.drinks().create(&seed).await?;

        info!("Drink table reset and seeded");
        Ok(())
    }

    /// Run a trivial query to confirm the database answers
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn health_check(&self) -> AppResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Database health check failed: {e}")))?;
        Ok(())
    }

    /// Drink operations over this pool
    #[must_use]
    pub fn drinks(&self) -> DrinksManager {
        DrinksManager::new(self.pool.clone())
    }

    /// Close every pooled connection
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Create the directory holding a file-backed database
async fn ensure_parent_dir(database_url: &str) -> AppResult<()> {
    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:");
    let path = path.split('?').next().unwrap_or(path);

    if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(|e| {
            AppError::config(format!(
                "Failed to create database directory {}: {e}",
                parent.display()
            ))
        })?;
    }
    Ok(())
}
