//! Favorites route handlers.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use drip_bloom_core::ProductId;

use super::MessageResponse;
use crate::catalog::Catalog;
use crate::db::FavoriteRepository;
use crate::error::{AppError, Result};
use crate::extract::Path;
use crate::middleware::CurrentUser;
use crate::models::{Favorite, FavoriteEntry};
use crate::state::AppState;
use crate::validation::{ValidJson, Validate, ValidationErrors};

/// Add-favorite request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddFavoriteRequest {
    pub product_id: String,
}

impl Validate for AddFavoriteRequest {
    fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require(!self.product_id.trim().is_empty(), "productId", "Required");
        errors.into_result()
    }
}

/// Favorite state after a toggle.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleFavoriteResponse {
    pub product_id: ProductId,
    pub favorite: bool,
}

/// Resolve a product ID that must exist in the catalog.
fn known_product(catalog: &Catalog, id: &str) -> Result<ProductId> {
    let product_id = ProductId::new(id.trim());
    if catalog.product(&product_id).is_none() {
        return Err(AppError::NotFound("Product not found".to_string()));
    }
    Ok(product_id)
}

/// List favorites with product details.
///
/// GET /api/favorites
///
/// # Errors
///
/// Returns `AppError::Database` if the store fails.
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<FavoriteEntry>>> {
    let favorites = FavoriteRepository::new(state.store(), state.catalog(), user.id);
    Ok(Json(favorites.list()?))
}

/// Number of favorites.
///
/// GET /api/favorites/count
///
/// # Errors
///
/// Returns `AppError::Database` if the store fails.
#[instrument(skip_all)]
pub async fn count(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<usize>> {
    let favorites = FavoriteRepository::new(state.store(), state.catalog(), user.id);
    Ok(Json(favorites.count()?))
}

/// Add a product to favorites.
///
/// POST /api/favorites
///
/// # Errors
///
/// Returns `AppError::NotFound` for an unknown product.
#[instrument(skip_all, fields(product_id = %body.product_id))]
pub async fn add(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidJson(body): ValidJson<AddFavoriteRequest>,
) -> Result<Json<Favorite>> {
    let product_id = known_product(state.catalog(), &body.product_id)?;
    let favorites = FavoriteRepository::new(state.store(), state.catalog(), user.id);
    Ok(Json(favorites.add(&product_id)?))
}

/// Flip a product's favorite state.
///
/// POST /api/favorites/{product_id}/toggle
///
/// # Errors
///
/// Returns `AppError::NotFound` for an unknown product.
#[instrument(skip(state, user))]
pub async fn toggle(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(product_id): Path<String>,
) -> Result<Json<ToggleFavoriteResponse>> {
    let product_id = known_product(state.catalog(), &product_id)?;
    let favorites = FavoriteRepository::new(state.store(), state.catalog(), user.id);
    let favorite = favorites.toggle(&product_id)?;
    Ok(Json(ToggleFavoriteResponse {
        product_id,
        favorite,
    }))
}

/// Remove a product from favorites. Removing a non-favorite succeeds.
///
/// DELETE /api/favorites/{product_id}
///
/// # Errors
///
/// Returns `AppError::Database` if the store fails.
#[instrument(skip(state, user))]
pub async fn remove(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(product_id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let favorites = FavoriteRepository::new(state.store(), state.catalog(), user.id);
    favorites.remove(&ProductId::new(product_id))?;
    Ok(Json(MessageResponse::new("Removed from favorites")))
}
