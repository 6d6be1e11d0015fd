//! Cart route handlers.
//!
//! All handlers act on the calling shopper's cart only.

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use drip_bloom_core::{CartItemId, ProductId, Quantity};

use super::MessageResponse;
use crate::db::CartRepository;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::extract::Path;
use crate::middleware::CurrentUser;
use crate::models::{CartItem, CartLine};
use crate::state::AppState;
use crate::validation::{ValidJson, Validate, ValidationErrors};

/// Add-to-cart request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: String,
    pub size: String,
    /// Defaults to 1.
    #[serde(default)]
    pub quantity: Option<i64>,
}

impl AddToCartRequest {
    fn quantity(&self) -> std::result::Result<Quantity, ValidationErrors> {
        self.quantity.map_or(Ok(Quantity::ONE), |q| {
            Quantity::new(q).map_err(|e| ValidationErrors::single("quantity", e.to_string()))
        })
    }
}

impl Validate for AddToCartRequest {
    fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require(!self.product_id.trim().is_empty(), "productId", "Required");
        errors.require(!self.size.trim().is_empty(), "size", "Required");
        if let Err(quantity_errors) = self.quantity() {
            for error in quantity_errors.errors() {
                errors.push(error.path.clone(), error.message.clone());
            }
        }
        errors.into_result()
    }
}

/// Quantity update request body.
///
/// Zero or a negative number removes the row.
#[derive(Debug, Deserialize)]
pub struct UpdateCartItemRequest {
    pub quantity: i64,
}

impl Validate for UpdateCartItemRequest {
    fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require(
            self.quantity <= i64::from(Quantity::MAX_REQUEST),
            "quantity",
            format!("quantity must be at most {}", Quantity::MAX_REQUEST),
        );
        errors.into_result()
    }
}

fn cart_item_not_found() -> AppError {
    AppError::NotFound("Cart item not found".to_string())
}

/// List the cart with product details.
///
/// GET /api/cart
///
/// # Errors
///
/// Returns `AppError::Database` if the store fails.
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<CartLine>>> {
    let cart = CartRepository::new(state.store(), state.catalog(), user.id);
    Ok(Json(cart.items()?))
}

/// Total units in the cart.
///
/// GET /api/cart/count
///
/// # Errors
///
/// Returns `AppError::Database` if the store fails.
#[instrument(skip_all)]
pub async fn count(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<u64>> {
    let cart = CartRepository::new(state.store(), state.catalog(), user.id);
    Ok(Json(cart.count()?))
}

/// Add a product in a size to the cart.
///
/// POST /api/cart
///
/// # Errors
///
/// Returns `AppError::NotFound` for an unknown product and
/// `AppError::BadRequest` for a size the product is not offered in.
#[instrument(skip_all, fields(product_id = %body.product_id, size = %body.size))]
pub async fn add(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidJson(body): ValidJson<AddToCartRequest>,
) -> Result<Json<CartItem>> {
    let quantity = body.quantity()?;
    let product_id = ProductId::new(body.product_id.trim());
    let size = body.size.trim().to_string();

    let product = state
        .catalog()
        .product(&product_id)
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;
    if !product.offers_size(&size) {
        return Err(AppError::BadRequest(format!(
            "Size {size} is not available for this product"
        )));
    }

    let cart = CartRepository::new(state.store(), state.catalog(), user.id);
    let item = cart.add(product_id, size, quantity)?;

    add_breadcrumb(
        "cart",
        "Added to cart",
        Some(&[("product_id", item.product_id.as_str())]),
    );
    Ok(Json(item))
}

/// Change a row's quantity, removing it at zero or below.
///
/// PATCH /api/cart/{id}
///
/// # Errors
///
/// Returns `AppError::NotFound` if the row is not in the caller's cart.
#[instrument(skip(state, user, body))]
pub async fn update(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    ValidJson(body): ValidJson<UpdateCartItemRequest>,
) -> Result<Response> {
    let id: CartItemId = id.parse().map_err(|_| cart_item_not_found())?;
    let cart = CartRepository::new(state.store(), state.catalog(), user.id);

    let Ok(quantity) = Quantity::new(body.quantity) else {
        if !cart.remove(id)? {
            return Err(cart_item_not_found());
        }
        return Ok(Json(MessageResponse::new("Item removed from cart")).into_response());
    };

    let item = cart.update(id, quantity)?.ok_or_else(cart_item_not_found)?;
    Ok(Json(item).into_response())
}

/// Remove a row. Removing a missing row succeeds.
///
/// DELETE /api/cart/{id}
///
/// # Errors
///
/// Returns `AppError::Database` if the store fails.
#[instrument(skip(state, user))]
pub async fn remove(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    if let Ok(id) = id.parse::<CartItemId>() {
        CartRepository::new(state.store(), state.catalog(), user.id).remove(id)?;
    }
    Ok(Json(MessageResponse::new("Item removed from cart")))
}

/// Empty the cart.
///
/// DELETE /api/cart
///
/// # Errors
///
/// Returns `AppError::Database` if the store fails.
#[instrument(skip_all)]
pub async fn clear(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<MessageResponse>> {
    let removed = CartRepository::new(state.store(), state.catalog(), user.id).clear()?;
    tracing::debug!(user_id = %user.id, removed, "Cart cleared");
    Ok(Json(MessageResponse::new("Cart cleared")))
}
