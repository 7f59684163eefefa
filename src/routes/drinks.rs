// ABOUTME: Route handlers for the drinks REST API
// ABOUTME: Public short listing plus permission-gated detail listing, create, update, and delete
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Drinks routes
//!
//! `GET /drinks` is public. Every other endpoint is wrapped in an
//! [`AuthGate`] for its permission and receives the caller's
//! [`DecodedClaims`] as its first parameter.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
    Extension, Json, Router,
};
use coffee_core::constants::{endpoints, permissions};
use coffee_core::errors::AppError;
use coffee_core::models::{Drink, DrinkChanges, DrinkLong, DrinkShort, NewDrink, RecipeInput};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::{require_permission, AuthGate, DecodedClaims};
use crate::server::ServerResources;

/// Drink list response
#[derive(Debug, Serialize, Deserialize)]
pub struct DrinksResponse<T> {
    /// Always `true`
    pub success: bool,
    /// Drinks in the requested representation
    pub drinks: Vec<T>,
}

impl<T> DrinksResponse<T> {
    fn new(drinks: Vec<T>) -> Self {
        Self {
            success: true,
            drinks,
        }
    }
}

/// Delete response
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    /// Always `true`
    pub success: bool,
    /// Id of the removed drink
    pub delete: i64,
}

/// Body for POST /drinks
#[derive(Debug, Deserialize)]
pub struct CreateDrinkBody {
    /// Drink title
    pub title: Option<String>,
    /// One recipe part or a list of parts
    pub recipe: Option<RecipeInput>,
}

/// Body for PATCH /drinks/:id
#[derive(Debug, Deserialize)]
pub struct UpdateDrinkBody {
    /// New title
    pub title: Option<String>,
    /// New recipe
    pub recipe: Option<RecipeInput>,
}

/// Drinks routes handler
pub struct DrinksRoutes;

impl DrinksRoutes {
    /// Create all drinks routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        let gate = |permission| {
            from_fn_with_state(
                AuthGate::new(
                    resources.token_validator.clone(),
                    permission,
                    resources.config.auth.denial_status,
                ),
                require_permission,
            )
        };

        Router::new()
            .route(endpoints::DRINKS, get(Self::handle_list))
            .route(
                endpoints::DRINKS_DETAIL,
                get(Self::handle_list_detail).route_layer(gate(permissions::GET_DRINKS_DETAIL)),
            )
            .route(
                endpoints::DRINKS,
                post(Self::handle_create).route_layer(gate(permissions::POST_DRINKS)),
            )
            .route(
                endpoints::DRINK_BY_ID,
                patch(Self::handle_update).route_layer(gate(permissions::PATCH_DRINKS)),
            )
            .route(
                endpoints::DRINK_BY_ID,
                delete(Self::handle_delete).route_layer(gate(permissions::DELETE_DRINKS)),
            )
            .with_state(resources)
    }

    /// Parse a path id; anything that is not an integer names no drink
    fn parse_id(raw: &str) -> Result<i64, AppError> {
        raw.parse()
            .map_err(|_| AppError::not_found(format!("Drink {raw}")))
    }

    /// Handle GET /drinks - public short listing
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Response, AppError> {
        let drinks = resources.database.drinks().list().await?;
        let response: DrinksResponse<DrinkShort> =
            DrinksResponse::new(drinks.iter().map(Drink::short).collect());
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle GET /drinks-detail - detailed listing, 404 when there are no drinks
    async fn handle_list_detail(
        Extension(_claims): Extension<DecodedClaims>,
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Response, AppError> {
        let drinks = resources.database.drinks().list().await?;
        if drinks.is_empty() {
            return Err(AppError::not_found("Drinks"));
        }

        let response: DrinksResponse<DrinkLong> =
            DrinksResponse::new(drinks.iter().map(Drink::long).collect());
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle POST /drinks - create a drink
    async fn handle_create(
        Extension(claims): Extension<DecodedClaims>,
        State(resources): State<Arc<ServerResources>>,
        body: Result<Json<CreateDrinkBody>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let Json(body) = body.map_err(|e| AppError::unprocessable(e.body_text()))?;
        let new_drink = NewDrink::new(body.title, body.recipe)?;

        let drink = resources.database.drinks().create(&new_drink).await?;
        info!(drink_id = drink.id, sub = %claims.sub, "Drink created");

        let response = DrinksResponse::new(vec![drink.long()]);
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle PATCH /drinks/:id - update title and/or recipe
    async fn handle_update(
        Extension(claims): Extension<DecodedClaims>,
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
        body: Result<Json<UpdateDrinkBody>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let id = Self::parse_id(&id)?;
        let Json(body) = body.map_err(|e| AppError::unprocessable(e.body_text()))?;
        let changes = DrinkChanges::new(body.title, body.recipe)?;

        let drink = resources
            .database
            .drinks()
            .update(id, &changes)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Drink {id}")))?;
        info!(drink_id = id, sub = %claims.sub, "Drink updated");

        let response = DrinksResponse::new(vec![drink.long()]);
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle DELETE /drinks/:id - delete a drink
    async fn handle_delete(
        Extension(claims): Extension<DecodedClaims>,
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let id = Self::parse_id(&id)?;
        let deleted = resources.database.drinks().delete(id).await?;

        if !deleted {
            return Err(AppError::not_found(format!("Drink {id}")));
        }
        info!(drink_id = id, sub = %claims.sub, "Drink deleted");

        let response = DeleteResponse {
            success: true,
            delete: id,
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }
}
