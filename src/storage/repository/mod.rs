// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Repository layer providing typed access to the database.
//!
//! Each repository owns one entity type and runs every operation in a
//! single redb transaction.

pub mod users;
pub mod wishlists;

pub use users::{NewUser, StoredUser, UserRepository};
pub use wishlists::{
    NewWishlistItem, SortKey, SortOrder, WishlistChanges, WishlistFilter, WishlistItem,
    WishlistRepository, WishlistStatus,
};
