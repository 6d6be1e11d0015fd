//! Order route handlers.
//!
//! Placing an order stores a snapshot of the submitted items, empties the
//! caller's cart, and notifies the seller in the background.

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use drip_bloom_core::{OrderId, Price, ProductId, Quantity, TelegramUserId};

use crate::db::OrderRepository;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::extract::Path;
use crate::middleware::CurrentUser;
use crate::models::{Order, OrderItem};
use crate::services::CustomerInfo;
use crate::state::AppState;
use crate::validation::{JsonBody, ValidationErrors};

/// One submitted order line.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    pub product_id: String,
    pub product_name: String,
    pub size: String,
    pub quantity: i64,
    /// Unit price, as a decimal string or number.
    pub price: Decimal,
}

/// Place-order request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub items: Vec<OrderItemRequest>,
    pub total_amount: Decimal,
    #[serde(default)]
    pub shipping_amount: Option<Decimal>,
    #[serde(default)]
    pub telegram_order_id: Option<String>,
    #[serde(default)]
    pub telegram_user_id: Option<i64>,
    #[serde(default)]
    pub customer_first_name: Option<String>,
    #[serde(default)]
    pub customer_last_name: Option<String>,
    #[serde(default)]
    pub customer_username: Option<String>,
}

/// Validated order contents.
#[derive(Debug)]
struct OrderDraft {
    items: Vec<OrderItem>,
    total_amount: Price,
    shipping_amount: Price,
}

fn required(errors: &mut ValidationErrors, value: &str, path: String) {
    errors.require(!value.trim().is_empty(), path, "Required");
}

fn price(errors: &mut ValidationErrors, amount: Decimal, path: String) -> Option<Price> {
    Price::new(amount)
        .map_err(|e| errors.push(path, e.to_string()))
        .ok()
}

impl CreateOrderRequest {
    /// Check every field and build the order contents.
    fn draft(&self) -> std::result::Result<OrderDraft, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.items.is_empty() {
            errors.push("items", "Order must contain at least one item");
        }

        let mut items = Vec::with_capacity(self.items.len());
        for (index, item) in self.items.iter().enumerate() {
            let path = |field: &str| format!("items.{index}.{field}");

            required(&mut errors, &item.product_id, path("productId"));
            required(&mut errors, &item.product_name, path("productName"));
            required(&mut errors, &item.size, path("size"));
            let quantity = Quantity::new(item.quantity)
                .map_err(|e| errors.push(path("quantity"), e.to_string()))
                .ok();
            let unit_price = price(&mut errors, item.price, path("price"));

            if let (Some(quantity), Some(unit_price)) = (quantity, unit_price) {
                items.push(OrderItem {
                    product_id: ProductId::new(item.product_id.trim()),
                    product_name: item.product_name.trim().to_string(),
                    size: item.size.trim().to_string(),
                    quantity,
                    price: unit_price,
                });
            }
        }

        let total_amount = price(&mut errors, self.total_amount, "totalAmount".to_string());
        let shipping_amount = price(
            &mut errors,
            self.shipping_amount.unwrap_or(Decimal::ZERO),
            "shippingAmount".to_string(),
        );

        if let Some(telegram_user_id) = self.telegram_user_id {
            errors.require(
                telegram_user_id > 0,
                "telegramUserId",
                "Must be a positive integer",
            );
        }

        if let (Some(total), Some(shipping)) = (total_amount, shipping_amount) {
            errors.require(
                total.checked_add(shipping).is_some(),
                "totalAmount",
                "Order total is too large",
            );
        }

        errors.into_result()?;
        match (total_amount, shipping_amount) {
            (Some(total_amount), Some(shipping_amount)) => Ok(OrderDraft {
                items,
                total_amount,
                shipping_amount,
            }),
            _ => Err(ValidationErrors::single("totalAmount", "Invalid amount")),
        }
    }

    /// Customer details sent with the order, if any.
    fn customer(&self) -> Option<CustomerInfo> {
        Some(CustomerInfo {
            telegram_id: TelegramUserId::new(self.telegram_user_id?),
            first_name: self.customer_first_name.clone(),
            last_name: self.customer_last_name.clone(),
            username: self.customer_username.clone(),
        })
    }
}

/// Place an order.
///
/// POST /api/orders
///
/// # Errors
///
/// Returns `AppError::Validation` for an invalid body and
/// `AppError::Database` if the store fails.
#[instrument(skip_all, fields(items = body.items.len()))]
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    JsonBody(body): JsonBody<CreateOrderRequest>,
) -> Result<Json<Order>> {
    let draft = body.draft()?;

    let order = OrderRepository::new(state.store(), user.id).place(
        draft.items,
        draft.total_amount,
        draft.shipping_amount,
        body.telegram_order_id.clone(),
    )?;

    add_breadcrumb(
        "order",
        "Order placed",
        Some(&[("order_id", order.id.to_string().as_str())]),
    );

    let customer = body.customer().or_else(|| CustomerInfo::from_user(&user));
    state.notifier().notify(&order, customer.as_ref());

    Ok(Json(order))
}

/// Show one of the caller's orders.
///
/// GET /api/orders/{id}
///
/// # Errors
///
/// Returns `AppError::NotFound` if the order does not exist or belongs to
/// someone else.
#[instrument(skip(state, user))]
pub async fn show(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Order>> {
    let not_found = || AppError::NotFound("Order not found".to_string());
    let id: OrderId = id.parse().map_err(|_| not_found())?;

    OrderRepository::new(state.store(), user.id)
        .get(id)?
        .map(Json)
        .ok_or_else(not_found)
}
