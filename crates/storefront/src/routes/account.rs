//! Calling-shopper route handlers.

use axum::Json;
use tracing::instrument;

use crate::middleware::CurrentUser;
use crate::models::User;

/// Show the user the request acts as.
///
/// GET /api/me
#[instrument(skip_all)]
pub async fn me(CurrentUser(user): CurrentUser) -> Json<User> {
    Json(user)
}
