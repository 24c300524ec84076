use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use crate::models::api::ApiResponse;
use crate::models::cart::ShoppingCart;
use crate::store::StoreError;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CartQuery {
    #[serde(default)]
    user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CartUpdateQuery {
    #[serde(default)]
    user_id: Option<String>,
    menu_item_id: i64,
    update_quantity_by: i64,
}

fn bad_request(message: impl Into<String>) -> (StatusCode, Json<ApiResponse>) {
    (StatusCode::BAD_REQUEST, Json(ApiResponse::error(message)))
}

/// GET /api/ShoppingCart?userId=...
async fn get_cart(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CartQuery>,
) -> (StatusCode, Json<ApiResponse>) {
    let Some(user_id) = query.user_id.filter(|u| !u.is_empty()) else {
        return bad_request("User id is required");
    };

    match state.store.get_cart(&user_id) {
        Ok(Some(cart)) => (StatusCode::OK, Json(ApiResponse::ok(cart))),
        Ok(None) => (
            StatusCode::OK,
            Json(ApiResponse::ok(ShoppingCart::empty(&user_id))),
        ),
        Err(e) => bad_request(e.to_string()),
    }
}

/// POST /api/ShoppingCart?userId=...&menuItemId=...&updateQuantityBy=...
///
/// Upserts one cart line: creates the cart on first add, accumulates
/// quantity on repeat adds, and removes the line (and an emptied cart) when
/// the quantity drops to zero or below.
async fn add_or_update_item(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CartUpdateQuery>,
) -> (StatusCode, Json<ApiResponse>) {
    let Some(user_id) = query.user_id.filter(|u| !u.is_empty()) else {
        return bad_request("User id is required");
    };

    match state.store.get_menu_item(query.menu_item_id) {
        Ok(Some(_)) => {}
        Ok(None) => return bad_request("Cannot find the item"),
        Err(e) => return bad_request(e.to_string()),
    }

    match apply_update(&state, &user_id, query.menu_item_id, query.update_quantity_by) {
        Ok(true) => (StatusCode::OK, Json(ApiResponse::ok_empty())),
        Ok(false) => bad_request("Cannot update an empty cart"),
        Err(e) => bad_request(e.to_string()),
    }
}

/// Returns false when there is nothing to update (no cart and a non-positive
/// quantity delta).
fn apply_update(
    state: &AppState,
    user_id: &str,
    menu_item_id: i64,
    delta: i64,
) -> Result<bool, StoreError> {
    let Some(cart) = state.store.get_cart(user_id)? else {
        if delta <= 0 {
            return Ok(false);
        }
        let cart_id = state.store.create_cart(user_id)?;
        state.store.add_cart_item(cart_id, menu_item_id, delta)?;
        return Ok(true);
    };

    let existing = cart
        .cart_items
        .iter()
        .find(|item| item.menu_item_id == menu_item_id);

    match existing {
        None => {
            if delta <= 0 {
                return Ok(false);
            }
            state.store.add_cart_item(cart.id, menu_item_id, delta)?;
        }
        Some(item) => {
            let new_quantity = item.quantity + delta;
            if delta == 0 || new_quantity <= 0 {
                state.store.remove_cart_item(item.id)?;
                // Dropping the last line removes the cart itself.
                if cart.cart_items.len() == 1 {
                    state.store.delete_cart(cart.id)?;
                }
            } else {
                state.store.set_cart_item_quantity(item.id, new_quantity)?;
            }
        }
    }

    Ok(true)
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/ShoppingCart", get(get_cart).post(add_or_update_item))
        .with_state(state)
}
