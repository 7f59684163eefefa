// ABOUTME: Drink resource model with short (public) and long (detailed) representations
// ABOUTME: Validates titles and recipes before they reach the database
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Drink model
//!
//! A drink is a titled recipe: an ordered list of coloured ingredient parts.
//! The public listing hides ingredient names ([`DrinkShort`]); callers with
//! the detail permission see everything ([`DrinkLong`]).

use crate::constants::limits::{MAX_RECIPE_JSON_LENGTH, MAX_TITLE_LENGTH};
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// One ingredient of a recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipePart {
    /// Ingredient name
    pub name: String,
    /// Display colour of the layer
    pub color: String,
    /// Relative quantity
    pub parts: u32,
}

/// Ingredient as shown on the public listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortRecipePart {
    /// Display colour of the layer
    pub color: String,
    /// Relative quantity
    pub parts: u32,
}

/// A stored drink
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drink {
    /// Row id
    pub id: i64,
    /// Unique title
    pub title: String,
    /// Ordered recipe parts
    pub recipe: Vec<RecipePart>,
}

/// Public representation: ingredient names are hidden
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrinkShort {
    /// Row id
    pub id: i64,
    /// Unique title
    pub title: String,
    /// Colours and quantities only
    pub recipe: Vec<ShortRecipePart>,
}

/// Detailed representation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrinkLong {
    /// Row id
    pub id: i64,
    /// Unique title
    pub title: String,
    /// Full recipe
    pub recipe: Vec<RecipePart>,
}

impl Drink {
    /// Public representation
    #[must_use]
    pub fn short(&self) -> DrinkShort {
        DrinkShort {
            id: self.id,
            title: self.title.clone(),
            recipe: self
                .recipe
                .iter()
                .map(|part| ShortRecipePart {
                    color: part.color.clone(),
                    parts: part.parts,
                })
                .collect(),
        }
    }

    /// Detailed representation
    #[must_use]
    pub fn long(&self) -> DrinkLong {
        DrinkLong {
            id: self.id,
            title: self.title.clone(),
            recipe: self.recipe.clone(),
        }
    }
}

/// Recipe as accepted in request bodies: one part or a list of parts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecipeInput {
    /// A single ingredient object
    One(RecipePart),
    /// A list of ingredients
    Many(Vec<RecipePart>),
}

impl RecipeInput {
    /// Normalize to a list of parts
    #[must_use]
    pub fn into_parts(self) -> Vec<RecipePart> {
        match self {
            Self::One(part) => vec![part],
            Self::Many(parts) => parts,
        }
    }
}

/// Validated input for creating a drink
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDrink {
    /// Unique title
    pub title: String,
    /// Recipe parts
    pub recipe: Vec<RecipePart>,
}

impl NewDrink {
    /// Validate and build a new drink
    ///
    /// # Errors
    ///
    /// Returns an unprocessable error if the title or recipe is missing or invalid
    pub fn new(title: Option<String>, recipe: Option<RecipeInput>) -> AppResult<Self> {
        let title = title.ok_or_else(|| AppError::unprocessable("title is required"))?;
        let recipe = recipe
            .ok_or_else(|| AppError::unprocessable("recipe is required"))?
            .into_parts();

        Ok(Self {
            title: validate_title(&title)?,
            recipe: validate_recipe(recipe)?,
        })
    }
}

/// Validated partial update of a drink
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DrinkChanges {
    /// New title, if changing
    pub title: Option<String>,
    /// New recipe, if changing
    pub recipe: Option<Vec<RecipePart>>,
}

impl DrinkChanges {
    /// Validate and build an update
    ///
    /// # Errors
    ///
    /// Returns an unprocessable error if no field is given or a given field is invalid
    pub fn new(title: Option<String>, recipe: Option<RecipeInput>) -> AppResult<Self> {
        if title.is_none() && recipe.is_none() {
            return Err(AppError::unprocessable(
                "at least one of title or recipe is required",
            ));
        }

        Ok(Self {
            title: title.as_deref().map(validate_title).transpose()?,
            recipe: recipe
                .map(|r| validate_recipe(r.into_parts()))
                .transpose()?,
        })
    }
}

/// Trim and bound-check a title
fn validate_title(title: &str) -> AppResult<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(AppError::unprocessable("title must not be empty"));
    }
    if trimmed.chars().count() > MAX_TITLE_LENGTH {
        return Err(AppError::unprocessable(format!(
            "title must be at most {MAX_TITLE_LENGTH} characters"
        )));
    }
    Ok(trimmed.to_owned())
}

/// Check a recipe has parts, named parts, and fits the stored column
fn validate_recipe(recipe: Vec<RecipePart>) -> AppResult<Vec<RecipePart>> {
    if recipe.is_empty() {
        return Err(AppError::unprocessable("recipe must not be empty"));
    }
    if recipe.iter().any(|part| part.name.trim().is_empty()) {
        return Err(AppError::unprocessable(
            "every recipe part needs a name",
        ));
    }

    let encoded_len = serde_json::to_string(&recipe)?.chars().count();
    if encoded_len > MAX_RECIPE_JSON_LENGTH {
        return Err(AppError::unprocessable(format!(
            "recipe must encode to at most {MAX_RECIPE_JSON_LENGTH} characters"
        )));
    }
    Ok(recipe)
}
