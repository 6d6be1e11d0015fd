//! Catalog route handlers.

use axum::{Json, extract::State};
use serde::Deserialize;
use tracing::instrument;

use drip_bloom_core::ProductId;

use crate::error::{AppError, Result};
use crate::extract::{Path, Query};
use crate::models::{Category, Product};
use crate::state::AppState;

/// Product listing filters.
#[derive(Debug, Deserialize)]
pub struct ProductQuery {
    /// Category slug.
    pub category: Option<String>,
}

/// List products, optionally restricted to one category.
///
/// GET /api/products
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Json<Vec<Product>> {
    let catalog = state.catalog();
    let products = match query.category.as_deref().filter(|slug| !slug.is_empty()) {
        Some(slug) => catalog.products_in_category(slug).cloned().collect(),
        None => catalog.products().to_vec(),
    };
    Json(products)
}

/// Show one product.
///
/// GET /api/products/{id}
///
/// # Errors
///
/// Returns `AppError::NotFound` if the product is not in the catalog.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Product>> {
    state
        .catalog()
        .product(&ProductId::new(id))
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))
}

/// List categories.
///
/// GET /api/categories
#[instrument(skip(state))]
pub async fn categories(State(state): State<AppState>) -> Json<Vec<Category>> {
    Json(state.catalog().categories().to_vec())
}
