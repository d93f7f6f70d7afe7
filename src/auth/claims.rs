// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session token claims and authenticated user representation.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::AuthError;

/// Claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionClaims {
    /// Subject: the user id as a decimal string.
    pub sub: String,
    /// Email at the time the token was issued.
    pub email: String,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expiration (unix seconds)
    pub exp: i64,
}

/// Identity resolved from a verified session token.
///
/// This is what handlers receive after the authorization gate has run.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Authenticated user's id
    pub user_id: u64,
    /// Email embedded in the token. May be stale after a profile change.
    pub email: String,
    /// Token expiration timestamp (unix seconds)
    pub expires_at: i64,
}

impl AuthenticatedUser {
    /// Build from verified claims. A non-numeric subject is a malformed token.
    pub fn from_claims(claims: SessionClaims) -> Result<Self, AuthError> {
        let user_id = claims
            .sub
            .parse::<u64>()
            .map_err(|_| AuthError::MalformedToken)?;
        Ok(Self {
            user_id,
            email: claims.email,
            expires_at: claims.exp,
        })
    }
}
