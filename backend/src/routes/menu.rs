use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};

use crate::models::api::ApiResponse;
use crate::models::menu_item::{MenuItem, MenuItemCreate, MenuItemUpdate};
use crate::AppState;

fn bad_request(message: impl Into<String>) -> (StatusCode, Json<ApiResponse>) {
    (StatusCode::BAD_REQUEST, Json(ApiResponse::error(message)))
}

/// GET /api/MenuItem
async fn get_menu_items(State(state): State<Arc<AppState>>) -> (StatusCode, Json<ApiResponse>) {
    match state.store.list_menu_items() {
        Ok(items) => (StatusCode::OK, Json(ApiResponse::ok(items))),
        Err(e) => bad_request(e.to_string()),
    }
}

/// GET /api/MenuItem/{id}
async fn get_menu_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> (StatusCode, Json<ApiResponse>) {
    // Id 0 is the invalid sentinel, rejected before any lookup.
    if id == 0 {
        return bad_request("Id cannot be 0");
    }

    match state.store.get_menu_item(id) {
        Ok(Some(item)) => (StatusCode::OK, Json(ApiResponse::ok(item))),
        Ok(None) => bad_request("Cannot find the item"),
        Err(e) => bad_request(e.to_string()),
    }
}

/// POST /api/MenuItem
async fn create_menu_item(
    State(state): State<Arc<AppState>>,
    Json(request): Json<MenuItemCreate>,
) -> Response {
    match state.store.insert_menu_item(request) {
        Ok(item) => {
            let location = format!("/api/MenuItem/{}", item.id);
            (
                StatusCode::CREATED,
                [(header::LOCATION, location)],
                Json(ApiResponse::created(item)),
            )
                .into_response()
        }
        Err(e) => bad_request(e.to_string()).into_response(),
    }
}

/// PUT /api/MenuItem/{id}
async fn update_menu_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(request): Json<MenuItemUpdate>,
) -> (StatusCode, Json<ApiResponse>) {
    if id != request.id {
        return bad_request("Item id does not match the route id");
    }

    match state.store.get_menu_item(id) {
        Ok(Some(_)) => {}
        Ok(None) => return bad_request("Cannot find the item to update"),
        Err(e) => return bad_request(e.to_string()),
    }

    let item = MenuItem::from(request);
    match state.store.update_menu_item(&item) {
        // Transport status stays 200; the envelope reports the 201 outcome.
        Ok(()) => (StatusCode::OK, Json(ApiResponse::created(item))),
        Err(e) => bad_request(e.to_string()),
    }
}

/// DELETE /api/MenuItem/{id}
async fn delete_menu_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> (StatusCode, Json<ApiResponse>) {
    if id == 0 {
        return bad_request("Id cannot be 0");
    }

    match state.store.get_menu_item(id) {
        Ok(Some(_)) => {}
        Ok(None) => return bad_request("Cannot find the item to delete"),
        Err(e) => return bad_request(e.to_string()),
    }

    match state.store.delete_menu_item(id) {
        Ok(()) => (StatusCode::OK, Json(ApiResponse::no_content())),
        Err(e) => bad_request(e.to_string()),
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/MenuItem", get(get_menu_items).post(create_menu_item))
        .route(
            "/api/MenuItem/:id",
            get(get_menu_item)
                .put(update_menu_item)
                .delete(delete_menu_item),
        )
        .with_state(state)
}
