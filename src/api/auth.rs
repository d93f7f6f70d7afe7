// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use super::extract::JsonBody;
use crate::{
    auth::Auth,
    error::ApiError,
    models::{
        ApiResponse, AuthPayload, ChangePasswordRequest, LoginRequest, MessageResponse,
        RegisterRequest, UpdateProfileRequest, UserView,
    },
    state::AppState,
};

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    tag = "Auth",
    responses(
        (status = 201, description = "Account created", body = ApiResponse<AuthPayload>),
        (status = 400, description = "Validation failed or email already registered")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthPayload>>), ApiError> {
    request.validate()?;
    let payload = state
        .identity
        .register(&request.name, &request.email, &request.password)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Registration successful", payload)),
    ))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    tag = "Auth",
    responses(
        (status = 200, description = "Session issued", body = ApiResponse<AuthPayload>),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Invalid email or password")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> Result<Json<ApiResponse<AuthPayload>>, ApiError> {
    request.validate()?;
    let payload = state.identity.login(&request.email, &request.password).await?;
    Ok(Json(ApiResponse::ok("Login successful", payload)))
}

#[utoipa::path(
    get,
    path = "/api/auth/profile",
    tag = "Auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = ApiResponse<UserView>),
        (status = 401, description = "Missing or invalid session"),
        (status = 404, description = "User no longer exists")
    )
)]
pub async fn get_profile(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<UserView>>, ApiError> {
    let profile = state.identity.get_profile(user.user_id)?;
    Ok(Json(ApiResponse::ok("Profile retrieved", profile)))
}

#[utoipa::path(
    put,
    path = "/api/auth/profile",
    request_body = UpdateProfileRequest,
    tag = "Auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = ApiResponse<UserView>),
        (status = 400, description = "Validation failed or email already registered"),
        (status = 401, description = "Missing or invalid session")
    )
)]
pub async fn update_profile(
    Auth(user): Auth,
    State(state): State<AppState>,
    JsonBody(request): JsonBody<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<UserView>>, ApiError> {
    request.validate()?;
    let profile = state.identity.update_profile(
        user.user_id,
        request.name.as_deref(),
        request.email.as_deref(),
    )?;
    Ok(Json(ApiResponse::ok("Profile updated", profile)))
}

#[utoipa::path(
    put,
    path = "/api/auth/change-password",
    request_body = ChangePasswordRequest,
    tag = "Auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = MessageResponse),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Missing session or wrong current password")
    )
)]
pub async fn change_password(
    Auth(user): Auth,
    State(state): State<AppState>,
    JsonBody(request): JsonBody<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    request.validate()?;
    state
        .identity
        .change_password(user.user_id, &request.old_password, &request.new_password)
        .await?;
    Ok(Json(MessageResponse::new("Password changed")))
}
