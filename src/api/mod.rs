// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    body::Body,
    http::Request,
    middleware,
    routing::{get, patch, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::require_session,
    error::{ApiError, FieldError},
    models::{
        AuthPayload, ChangePasswordRequest, ListPayload, ListStats, LoginRequest,
        MessageResponse, OwnerSummary, RegisterRequest, UpdateProfileRequest, UpdateStatusRequest,
        UserView, WishlistItemView, WishlistRequest, WishlistStatistics,
    },
    state::AppState,
    storage::{SortKey, SortOrder, WishlistItem, WishlistStatus},
};

pub mod auth;
pub mod extract;
pub mod health;
pub mod wishlists;

pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login));

    let protected_routes = Router::new()
        .route(
            "/api/auth/profile",
            get(auth::get_profile).put(auth::update_profile),
        )
        .route("/api/auth/change-password", put(auth::change_password))
        .route(
            "/api/wishlist",
            get(wishlists::list_items).post(wishlists::create_item),
        )
        .route("/api/wishlist/stats", get(wishlists::statistics))
        .route(
            "/api/wishlist/{id}",
            get(wishlists::get_item)
                .put(wishlists::update_item)
                .delete(wishlists::delete_item),
        )
        .route("/api/wishlist/{id}/status", patch(wishlists::set_status))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .fallback(route_not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                        let request_id = request
                            .headers()
                            .get("x-request-id")
                            .and_then(|v| v.to_str().ok())
                            .unwrap_or("-");
                        tracing::info_span!(
                            "http_request",
                            method = %request.method(),
                            uri = %request.uri(),
                            request_id,
                        )
                    }),
                )
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(CorsLayer::permissive()),
        )
}

async fn route_not_found() -> ApiError {
    ApiError::not_found("Route not found")
}

async fn method_not_allowed() -> ApiError {
    ApiError::method_not_allowed()
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::root,
        health::health,
        health::liveness,
        health::readiness,
        auth::register,
        auth::login,
        auth::get_profile,
        auth::update_profile,
        auth::change_password,
        wishlists::list_items,
        wishlists::statistics,
        wishlists::get_item,
        wishlists::create_item,
        wishlists::update_item,
        wishlists::set_status,
        wishlists::delete_item
    ),
    components(
        schemas(
            UserView,
            AuthPayload,
            RegisterRequest,
            LoginRequest,
            UpdateProfileRequest,
            ChangePasswordRequest,
            MessageResponse,
            FieldError,
            WishlistItem,
            WishlistItemView,
            OwnerSummary,
            WishlistStatus,
            WishlistRequest,
            UpdateStatusRequest,
            SortKey,
            SortOrder,
            ListPayload,
            ListStats,
            WishlistStatistics
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Registration, login and account management"),
        (name = "Wishlist", description = "Personal wishlist items and statistics"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
