// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use super::extract::{JsonBody, PathParam, QueryParams};
use crate::{
    auth::Auth,
    error::ApiError,
    models::{
        ApiResponse, ListPayload, ListQuery, MessageResponse, UpdateStatusRequest,
        WishlistItemView, WishlistRequest, WishlistStatistics,
    },
    state::AppState,
    storage::WishlistItem,
};

#[utoipa::path(
    get,
    path = "/api/wishlist",
    params(ListQuery),
    tag = "Wishlist",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = ApiResponse<ListPayload>),
        (status = 400, description = "Unknown sort key or order"),
        (status = 401, description = "Missing or invalid session")
    )
)]
pub async fn list_items(
    Auth(user): Auth,
    State(state): State<AppState>,
    QueryParams(query): QueryParams<ListQuery>,
) -> Result<Json<ApiResponse<ListPayload>>, ApiError> {
    let payload = state.wishlists.list(user.user_id, &query.into_filter())?;
    Ok(Json(ApiResponse::ok("Wishlist retrieved", payload)))
}

#[utoipa::path(
    get,
    path = "/api/wishlist/stats",
    tag = "Wishlist",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = ApiResponse<WishlistStatistics>),
        (status = 401, description = "Missing or invalid session")
    )
)]
pub async fn statistics(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<WishlistStatistics>>, ApiError> {
    let stats = state.wishlists.statistics(user.user_id)?;
    Ok(Json(ApiResponse::ok("Statistics retrieved", stats)))
}

#[utoipa::path(
    get,
    path = "/api/wishlist/{id}",
    params(("id" = u64, Path, description = "Wishlist item id")),
    tag = "Wishlist",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = ApiResponse<WishlistItemView>),
        (status = 401, description = "Missing or invalid session"),
        (status = 404, description = "No such item owned by the caller")
    )
)]
pub async fn get_item(
    Auth(user): Auth,
    State(state): State<AppState>,
    PathParam(id): PathParam<u64>,
) -> Result<Json<ApiResponse<WishlistItemView>>, ApiError> {
    let item = state.wishlists.get(user.user_id, id)?;
    let view = state.wishlists.with_owner(item)?;
    Ok(Json(ApiResponse::ok("Wishlist item retrieved", view)))
}

#[utoipa::path(
    post,
    path = "/api/wishlist",
    request_body = WishlistRequest,
    tag = "Wishlist",
    security(("bearer_auth" = [])),
    responses(
        (status = 201, body = ApiResponse<WishlistItemView>),
        (status = 400, description = "Validation failed or price out of range"),
        (status = 401, description = "Missing or invalid session")
    )
)]
pub async fn create_item(
    Auth(user): Auth,
    State(state): State<AppState>,
    JsonBody(request): JsonBody<WishlistRequest>,
) -> Result<(StatusCode, Json<ApiResponse<WishlistItemView>>), ApiError> {
    request.validate()?;
    let item = state.wishlists.create(user.user_id, request)?;
    let view = state.wishlists.with_owner(item)?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Wishlist item created", view)),
    ))
}

#[utoipa::path(
    put,
    path = "/api/wishlist/{id}",
    params(("id" = u64, Path, description = "Wishlist item id")),
    request_body = WishlistRequest,
    tag = "Wishlist",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = ApiResponse<WishlistItem>),
        (status = 400, description = "Validation failed or price out of range"),
        (status = 401, description = "Missing or invalid session"),
        (status = 404, description = "No such item owned by the caller")
    )
)]
pub async fn update_item(
    Auth(user): Auth,
    State(state): State<AppState>,
    PathParam(id): PathParam<u64>,
    JsonBody(request): JsonBody<WishlistRequest>,
) -> Result<Json<ApiResponse<WishlistItem>>, ApiError> {
    request.validate()?;
    let item = state.wishlists.update(user.user_id, id, request)?;
    Ok(Json(ApiResponse::ok("Wishlist item updated", item)))
}

#[utoipa::path(
    patch,
    path = "/api/wishlist/{id}/status",
    params(("id" = u64, Path, description = "Wishlist item id")),
    request_body = UpdateStatusRequest,
    tag = "Wishlist",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = ApiResponse<WishlistItem>),
        (status = 400, description = "Unknown status"),
        (status = 401, description = "Missing or invalid session"),
        (status = 404, description = "No such item owned by the caller")
    )
)]
pub async fn set_status(
    Auth(user): Auth,
    State(state): State<AppState>,
    PathParam(id): PathParam<u64>,
    JsonBody(request): JsonBody<UpdateStatusRequest>,
) -> Result<Json<ApiResponse<WishlistItem>>, ApiError> {
    let item = state
        .wishlists
        .set_status(user.user_id, id, &request.status)?;
    let message = format!("Status changed to {}", item.status);
    Ok(Json(ApiResponse::ok(message, item)))
}

#[utoipa::path(
    delete,
    path = "/api/wishlist/{id}",
    params(("id" = u64, Path, description = "Wishlist item id")),
    tag = "Wishlist",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = MessageResponse),
        (status = 401, description = "Missing or invalid session"),
        (status = 404, description = "No such item owned by the caller")
    )
)]
pub async fn delete_item(
    Auth(user): Auth,
    State(state): State<AppState>,
    PathParam(id): PathParam<u64>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.wishlists.delete(user.user_id, id)?;
    Ok(Json(MessageResponse::new("Wishlist item deleted")))
}
