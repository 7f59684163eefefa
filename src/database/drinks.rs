// ABOUTME: Database operations for drinks
// ABOUTME: List, get, create, partial update, and delete over the drink table
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use coffee_core::errors::{AppError, AppResult};
use coffee_core::models::{Drink, DrinkChanges, NewDrink};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

/// Drink database operations manager
pub struct DrinksManager {
    pool: SqlitePool,
}

impl DrinksManager {
    /// Create a new drinks manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List every drink in id order
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list(&self) -> AppResult<Vec<Drink>> {
        let rows = sqlx::query("SELECT id, title, recipe FROM drink ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list drinks: {e}")))?;

        rows.iter().map(row_to_drink).collect()
    }

    /// Get a drink by id
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get(&self, id: i64) -> AppResult<Option<Drink>> {
        let row = sqlx::query("SELECT id, title, recipe FROM drink WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get drink: {e}")))?;

        row.map(|r| row_to_drink(&r)).transpose()
    }

    /// Insert a new drink
    ///
    /// # Errors
    ///
    /// Returns `ResourceAlreadyExists` if the title is taken, or a database error
    pub async fn create(&self, drink: &NewDrink) -> AppResult<Drink> {
        let recipe_json = serde_json::to_string(&drink.recipe)?;

        let result = sqlx::query("INSERT INTO drink (title, recipe) VALUES ($1, $2)")
            .bind(&drink.title)
            .bind(&recipe_json)
            .execute(&self.pool)
            .await
            .map_err(|e| write_error(e, &drink.title, "create"))?;

        Ok(Drink {
            id: result.last_insert_rowid(),
            title: drink.title.clone(),
            recipe: drink.recipe.clone(),
        })
    }

    /// Apply the given changes to a drink, leaving other fields untouched
    ///
    /// Returns `None` if no drink has this id.
    ///
    /// # Errors
    ///
    /// Returns `ResourceAlreadyExists` if the new title is taken, or a database error
    pub async fn update(&self, id: i64, changes: &DrinkChanges) -> AppResult<Option<Drink>> {
        let recipe_json = changes
            .recipe
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let result = sqlx::query(
            r"
            UPDATE drink
            SET title = COALESCE($1, title), recipe = COALESCE($2, recipe)
            WHERE id = $3
            ",
        )
        .bind(changes.title.as_deref())
        .bind(recipe_json.as_deref())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| write_error(e, changes.title.as_deref().unwrap_or_default(), "update"))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get(id).await
    }

    /// Delete a drink; returns whether a row was removed
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM drink WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete drink: {e}")))?;

        Ok(result.rows_affected() > 0)
    }
}

/// Map an insert or update failure, reporting title collisions as conflicts
fn write_error(error: sqlx::Error, title: &str, action: &str) -> AppError {
    let is_duplicate = matches!(&error, sqlx::Error::Database(db) if db.is_unique_violation());
    if is_duplicate {
        AppError::already_exists(format!("Drink '{title}'"))
    } else {
        AppError::database(format!("Failed to {action} drink: {error}")).with_source(error)
    }
}

/// Convert a database row to a Drink
fn row_to_drink(row: &SqliteRow) -> AppResult<Drink> {
    let recipe_json: String = row.get("recipe");
    Ok(Drink {
        id: row.get("id"),
        title: row.get("title"),
        recipe: serde_json::from_str(&recipe_json)?,
    })
}
