// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Local email/password accounts with stateless session tokens.
//!
//! ## Auth Flow
//!
//! 1. Client registers or logs in with email and password
//! 2. Server verifies the Argon2id hash and issues an HS256 JWT (7 days)
//! 3. Client sends `Authorization: Bearer <token>` on protected routes
//! 4. The gate verifies signature and expiry, then attaches:
//!    - `sub` → canonical `user_id`
//!    - `email`
//!
//! ## Security
//!
//! - All `/api/wishlist` routes and the profile/password routes require a session
//! - No clock-skew leeway on expiry
//! - Passwords are never logged or returned

pub mod claims;
pub mod error;
pub mod extractor;
pub mod middleware;
pub mod password;
pub mod session;

pub use claims::{AuthenticatedUser, SessionClaims};
pub use error::AuthError;
pub use extractor::Auth;
pub use middleware::require_session;
pub use password::{PasswordError, PasswordHasher};
pub use session::{IssuedSession, SessionIssuer, SESSION_TTL};
