// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! This module defines the request and response data structures used by
//! the REST API. All types derive `ToSchema` for OpenAPI documentation.
//!
//! ## Response Envelope
//!
//! Every successful response is wrapped in [`ApiResponse`]:
//! `{ "success": true, "message": "...", "data": ... }`. Failures use the
//! same shape with `success: false` (see [`crate::error::ApiError`]).
//!
//! ## Model Categories
//!
//! - **Accounts**: registration, login, profile and password payloads
//! - **Wishlist**: item payloads, list query, aggregate statistics
//!
//! ## Validation
//!
//! Request bodies derive [`Validate`]; handlers run it before calling the
//! services and every failing field is reported at once.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::storage::{
    SortKey, SortOrder, StoredUser, WishlistFilter, WishlistItem, WishlistStatus,
};

// =============================================================================
// Envelope
// =============================================================================

/// Success envelope.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Always `true` for this type.
    pub success: bool,
    /// Human-readable outcome.
    pub message: String,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
        }
    }
}

/// Acknowledgement without a payload.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

// =============================================================================
// Account Models
// =============================================================================

/// Sanitized user view. Never contains the password hash.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct UserView {
    pub id: u64,
    #[schema(example = "Rina Wulandari")]
    pub name: String,
    #[schema(example = "rina@example.com")]
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<StoredUser> for UserView {
    fn from(user: StoredUser) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Returned by register and login.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthPayload {
    pub user: UserView,
    /// Signed session token for the `Authorization: Bearer` header.
    pub token: String,
    #[schema(example = "Bearer")]
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
}

/// Registration request. Missing fields deserialize as empty and are
/// reported by validation.
#[derive(Debug, Clone, Default, Deserialize, ToSchema, Validate)]
pub struct RegisterRequest {
    #[serde(default)]
    #[schema(example = "Rina Wulandari")]
    #[validate(custom(function = "not_blank", message = "Name is required"))]
    #[validate(length(min = 3, message = "Name must be at least 3 characters"))]
    pub name: String,
    #[serde(default)]
    #[schema(example = "rina@example.com")]
    #[validate(custom(function = "not_blank", message = "Email is required"))]
    #[validate(email(message = "Email format is invalid"))]
    pub email: String,
    #[serde(default)]
    #[schema(example = "s3cret!")]
    #[validate(custom(function = "not_empty", message = "Password is required"))]
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[schema(example = "rina@example.com")]
    #[validate(custom(function = "not_blank", message = "Email is required"))]
    #[validate(email(message = "Email format is invalid"))]
    pub email: String,
    #[serde(default)]
    #[validate(custom(function = "not_empty", message = "Password is required"))]
    pub password: String,
}

/// Partial profile update. Omitted fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, ToSchema, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 3, message = "Name must be at least 3 characters"))]
    pub name: Option<String>,
    #[validate(email(message = "Email format is invalid"))]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema, Validate)]
pub struct ChangePasswordRequest {
    /// Current password, re-verified before the change.
    #[serde(default)]
    #[validate(custom(function = "not_empty", message = "Old password is required"))]
    pub old_password: String,
    #[serde(default)]
    #[validate(custom(function = "not_empty", message = "New password is required"))]
    #[validate(length(min = 6, message = "New password must be at least 6 characters"))]
    pub new_password: String,
}

// =============================================================================
// Wishlist Models
// =============================================================================

/// Body of create and full update.
#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct WishlistRequest {
    #[serde(default)]
    #[schema(example = "Mechanical keyboard")]
    #[validate(custom(function = "not_blank", message = "Item name is required"))]
    #[validate(length(min = 3, message = "Item name must be at least 3 characters"))]
    pub name: String,
    #[serde(default)]
    #[schema(example = "Hot-swappable, brown switches")]
    #[validate(custom(function = "not_blank", message = "Description is required"))]
    pub description: String,
    /// Number or decimal string, 0 to 99999999.99.
    #[schema(value_type = String, example = "1250000.00")]
    pub target_price: Decimal,
    /// Defaults to `pending` on create; kept as-is on update when omitted.
    pub status: Option<WishlistStatus>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    /// `pending` or `purchased`.
    #[serde(default)]
    #[schema(example = "purchased")]
    pub status: String,
}

/// Query string of the list operation.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// `pending` or `purchased`; any other value is ignored.
    pub status: Option<String>,
    /// Case-insensitive match against name or description.
    pub search: Option<String>,
    /// Sort field, default `created_at`.
    pub sort_by: Option<SortKey>,
    /// `asc` or `desc`, default `desc`.
    pub order: Option<SortOrder>,
}

impl ListQuery {
    /// Unknown status values and empty searches are dropped rather than
    /// rejected. A non-empty search is matched exactly as supplied.
    pub fn into_filter(self) -> WishlistFilter {
        WishlistFilter {
            status: self.status.as_deref().and_then(|s| s.parse().ok()),
            search: self.search.filter(|s| !s.is_empty()),
            sort: self.sort_by.unwrap_or_default(),
            order: self.order.unwrap_or_default(),
        }
    }
}

/// Aggregates over the items returned by a list call.
#[derive(Debug, Clone, Default, Serialize, ToSchema, PartialEq, Eq)]
pub struct ListStats {
    pub total: usize,
    pub pending: usize,
    pub purchased: usize,
    #[schema(value_type = String, example = "60.00")]
    pub total_price: Decimal,
    #[schema(value_type = String, example = "30.00")]
    pub total_pending_price: Decimal,
}

/// Owner details embedded in item responses.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct OwnerSummary {
    pub id: u64,
    #[schema(example = "Rina Wulandari")]
    pub name: String,
    #[schema(example = "rina@example.com")]
    pub email: String,
}

impl From<StoredUser> for OwnerSummary {
    fn from(user: StoredUser) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

/// An item together with its owner, as returned by list, get and create.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct WishlistItemView {
    #[serde(flatten)]
    pub item: WishlistItem,
    pub user: OwnerSummary,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListPayload {
    pub items: Vec<WishlistItemView>,
    pub stats: ListStats,
}

/// Aggregates over every item the caller owns.
#[derive(Debug, Clone, Default, Serialize, ToSchema, PartialEq, Eq)]
pub struct WishlistStatistics {
    pub total_wishlist: usize,
    pub total_pending: usize,
    pub total_purchased: usize,
    #[schema(value_type = String, example = "60.00")]
    pub total_target_price: Decimal,
    #[schema(value_type = String, example = "30.00")]
    pub total_pending_price: Decimal,
    #[schema(value_type = String, example = "30.00")]
    pub total_purchased_price: Decimal,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

fn not_empty(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;

    fn failing_fields(result: Result<(), validator::ValidationErrors>) -> Vec<(String, String)> {
        match result.map_err(ServiceError::from) {
            Ok(()) => Vec::new(),
            Err(ServiceError::ValidationFailed(errors)) => errors
                .into_iter()
                .map(|e| (e.field, e.message))
                .collect(),
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }

    fn pair(field: &str, message: &str) -> (String, String) {
        (field.to_string(), message.to_string())
    }

    fn item_named(name: &str) -> WishlistItem {
        let now = Utc::now();
        WishlistItem {
            id: 1,
            user_id: 1,
            name: name.to_string(),
            description: "Desk light".to_string(),
            target_price: Decimal::new(1999, 2),
            status: WishlistStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn message_only_response_omits_data() {
        let json = serde_json::to_value(MessageResponse::new("Wishlist item deleted")).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "Wishlist item deleted");
        assert!(json.get("data").is_none());
    }

    #[test]
    fn user_view_drops_password_hash() {
        let now = Utc::now();
        let view = UserView::from(StoredUser {
            id: 1,
            name: "Rina".into(),
            email: "rina@example.com".into(),
            password_hash: "$argon2id$secret".into(),
            created_at: now,
            updated_at: now,
        });
        let json = serde_json::to_string(&view).unwrap();
        assert!(!json.contains("argon2"));
        assert!(!json.contains("password"));
    }

    #[test]
    fn target_price_accepts_number_or_string() {
        let from_number: WishlistRequest =
            serde_json::from_str(r#"{"name":"Lamp","description":"Desk","target_price":19.5}"#)
                .unwrap();
        let from_string: WishlistRequest = serde_json::from_str(
            r#"{"name":"Lamp","description":"Desk","target_price":"19.50"}"#,
        )
        .unwrap();
        assert_eq!(from_number.target_price, from_string.target_price);
        assert!(from_number.status.is_none());
    }

    #[test]
    fn list_query_ignores_unknown_status_and_empty_search() {
        let filter = ListQuery {
            status: Some("dibeli".into()),
            search: Some(String::new()),
            sort_by: None,
            order: None,
        }
        .into_filter();
        assert_eq!(filter, WishlistFilter::default());

        let filter = ListQuery {
            status: Some("purchased".into()),
            search: Some("lamp".into()),
            sort_by: Some(SortKey::Name),
            order: Some(SortOrder::Asc),
        }
        .into_filter();
        assert_eq!(filter.status, Some(WishlistStatus::Purchased));
        assert_eq!(filter.search.as_deref(), Some("lamp"));
        assert_eq!(filter.sort, SortKey::Name);
        assert_eq!(filter.order, SortOrder::Asc);
    }

    #[test]
    fn missing_register_fields_default_to_empty() {
        let request: RegisterRequest = serde_json::from_str("{}").unwrap();
        assert!(request.name.is_empty());
        assert!(request.email.is_empty());
        assert!(request.password.is_empty());
    }

    #[test]
    fn search_keeps_surrounding_whitespace() {
        let filter = ListQuery {
            search: Some(" lamp".into()),
            ..Default::default()
        }
        .into_filter();
        assert_eq!(filter.search.as_deref(), Some(" lamp"));
        assert!(!filter.matches(&item_named("Lamplight")));
        assert!(filter.matches(&item_named("Reading Lamp")));
    }

    #[test]
    fn item_view_flattens_item_and_embeds_owner() {
        let view = WishlistItemView {
            item: item_named("Lamp"),
            user: OwnerSummary {
                id: 1,
                name: "Rina".into(),
                email: "rina@example.com".into(),
            },
        };
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["name"], "Lamp");
        assert_eq!(json["target_price"], "19.99");
        assert_eq!(json["user"]["email"], "rina@example.com");
        assert!(json.get("item").is_none());
    }

    #[test]
    fn register_reports_every_failing_field() {
        let request = RegisterRequest {
            name: "Al".into(),
            email: "not-an-email".into(),
            password: "12345".into(),
        };
        assert_eq!(
            failing_fields(request.validate()),
            [
                pair("email", "Email format is invalid"),
                pair("name", "Name must be at least 3 characters"),
                pair("password", "Password must be at least 6 characters"),
            ]
        );
    }

    #[test]
    fn blank_fields_report_required() {
        assert_eq!(
            failing_fields(RegisterRequest::default().validate()),
            [
                pair("email", "Email is required"),
                pair("name", "Name is required"),
                pair("password", "Password is required"),
            ]
        );
    }

    #[test]
    fn register_accepts_valid_payload() {
        let request = RegisterRequest {
            name: "Rina".into(),
            email: "first.last+tag@sub.example.co.id".into(),
            password: "123456".into(),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn email_rule_rejects_malformed_addresses() {
        for email in ["rina.example.com", "@example.com", "rina @example.com", "<script>@x.io"] {
            let request = LoginRequest {
                email: email.into(),
                password: "anything".into(),
            };
            assert_eq!(
                failing_fields(request.validate()),
                [pair("email", "Email format is invalid")],
                "{email}"
            );
        }
    }

    #[test]
    fn login_requires_both_fields() {
        let fields: Vec<String> = failing_fields(LoginRequest::default().validate())
            .into_iter()
            .map(|(field, _)| field)
            .collect();
        assert_eq!(fields, ["email", "password"]);
    }

    #[test]
    fn password_length_counts_whitespace() {
        let request = RegisterRequest {
            name: "Rina".into(),
            email: "rina@example.com".into(),
            password: "  abcd  ".into(),
        };
        assert!(request.validate().is_ok());

        let change = ChangePasswordRequest {
            old_password: " ".into(),
            new_password: "  abcd  ".into(),
        };
        assert!(change.validate().is_ok());
    }

    #[test]
    fn profile_update_checks_only_supplied_fields() {
        assert!(UpdateProfileRequest::default().validate().is_ok());

        let request = UpdateProfileRequest {
            name: Some("Jo".into()),
            email: None,
        };
        assert_eq!(
            failing_fields(request.validate()),
            [pair("name", "Name must be at least 3 characters")]
        );
    }

    #[test]
    fn change_password_enforces_new_length() {
        let request = ChangePasswordRequest {
            old_password: "anything".into(),
            new_password: "short".into(),
        };
        assert_eq!(
            failing_fields(request.validate()),
            [pair("new_password", "New password must be at least 6 characters")]
        );
    }

    #[test]
    fn wishlist_item_needs_name_and_description() {
        let request = WishlistRequest {
            name: "TV".into(),
            description: "   ".into(),
            target_price: Decimal::ONE,
            status: None,
        };
        assert_eq!(
            failing_fields(request.validate()),
            [
                pair("description", "Description is required"),
                pair("name", "Item name must be at least 3 characters"),
            ]
        );
    }
}
