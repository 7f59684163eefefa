// ABOUTME: Core data models for the drinks API
// ABOUTME: Re-exports the drink resource and its request and response shapes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Drink resource, recipe parts, and their representations
pub mod drink;

pub use drink::{
    Drink, DrinkChanges, DrinkLong, DrinkShort, NewDrink, RecipeInput, RecipePart, ShortRecipePart,
};
