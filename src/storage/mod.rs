// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage Module
//!
//! Persistent state lives in a single redb file under the configured data
//! directory. Repositories borrow the shared [`DataStore`] and expose typed
//! operations; they never leak redb types to callers.
//!
//! ## Ownership
//!
//! Wishlist items are always addressed as `(caller, item_id)`. A record that
//! belongs to someone else is reported as absent, see [`ownership`].

pub mod database;
pub mod ownership;
pub mod repository;

pub use database::{DataStore, DbError, DbResult};
pub use ownership::{OwnedResource, OwnershipCheck};
pub use repository::{
    NewUser, NewWishlistItem, SortKey, SortOrder, StoredUser, UserRepository, WishlistChanges,
    WishlistFilter, WishlistItem, WishlistRepository, WishlistStatus,
};
