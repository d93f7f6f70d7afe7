// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Business operations behind the HTTP handlers.
//!
//! - [`IdentityService`]: registration, login, profile and password changes
//! - [`WishlistService`]: ownership-scoped item CRUD and aggregates
//!
//! Both assume their input already passed `api::validation`, and both report
//! failures as [`crate::error::ServiceError`].

pub mod identity;
pub mod wishlist;

pub use identity::IdentityService;
pub use wishlist::WishlistService;
