// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wishlist repository.
//!
//! Items are keyed by id and indexed by owner. Every read and write that
//! names an item id also names the caller; a mismatch behaves exactly like
//! a missing item.

use std::cmp::Ordering;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use redb::ReadableTable;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::super::database::{
    decode, encode, next_id, DataStore, DbError, DbResult, OWNER_INDEX, USERS, WISHLISTS,
    WISHLIST_SEQUENCE,
};
use super::super::ownership::{OwnedResource, OwnershipCheck};

/// Purchase status of a wishlist item.
///
/// Transitions are free in both directions; there is no terminal state.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq, PartialOrd, Ord,
)]
#[serde(rename_all = "lowercase")]
pub enum WishlistStatus {
    #[default]
    Pending,
    Purchased,
}

impl WishlistStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WishlistStatus::Pending => "pending",
            WishlistStatus::Purchased => "purchased",
        }
    }
}

impl FromStr for WishlistStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(WishlistStatus::Pending),
            "purchased" => Ok(WishlistStatus::Purchased),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for WishlistStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wishlist item stored in the database and returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct WishlistItem {
    /// Unique item identifier.
    pub id: u64,
    /// Owning user. Set at creation, never changed.
    pub user_id: u64,
    /// Item name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Target price, two fractional digits.
    #[schema(value_type = String, example = "199.99")]
    pub target_price: Decimal,
    /// Purchase status.
    pub status: WishlistStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OwnedResource for WishlistItem {
    fn owner_user_id(&self) -> u64 {
        self.user_id
    }
}

/// Fields required to create an item.
#[derive(Debug, Clone)]
pub struct NewWishlistItem {
    pub user_id: u64,
    pub name: String,
    pub description: String,
    pub target_price: Decimal,
    pub status: WishlistStatus,
}

/// Full replacement of the editable fields. `status: None` keeps the current one.
#[derive(Debug, Clone)]
pub struct WishlistChanges {
    pub name: String,
    pub description: String,
    pub target_price: Decimal,
    pub status: Option<WishlistStatus>,
}

// =============================================================================
// Filter Criteria
// =============================================================================

/// Field a listing is ordered by.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    CreatedAt,
    UpdatedAt,
    Name,
    TargetPrice,
    Status,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[serde(alias = "ASC")]
    Asc,
    #[default]
    #[serde(alias = "DESC")]
    Desc,
}

/// Criteria for listing one user's items.
///
/// Status and search both apply when both are present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WishlistFilter {
    /// Exact status match.
    pub status: Option<WishlistStatus>,
    /// Case-insensitive substring of name or description.
    pub search: Option<String>,
    pub sort: SortKey,
    pub order: SortOrder,
}

impl WishlistFilter {
    /// Whether `item` satisfies the status and search criteria.
    pub fn matches(&self, item: &WishlistItem) -> bool {
        if self.status.is_some_and(|status| item.status != status) {
            return false;
        }
        match self.search.as_deref().map(str::to_lowercase) {
            Some(needle) if !needle.is_empty() => {
                item.name.to_lowercase().contains(&needle)
                    || item.description.to_lowercase().contains(&needle)
            }
            _ => true,
        }
    }

    /// Ordering of two items under this filter's sort key and direction.
    /// Ties fall back to the item id.
    pub fn compare(&self, a: &WishlistItem, b: &WishlistItem) -> Ordering {
        let by_key = match self.sort {
            SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
            SortKey::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortKey::TargetPrice => a.target_price.cmp(&b.target_price),
            SortKey::Status => a.status.cmp(&b.status),
        };
        let ordering = by_key.then_with(|| a.id.cmp(&b.id));
        match self.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for wishlist items.
pub struct WishlistRepository<'a> {
    store: &'a DataStore,
}

impl<'a> WishlistRepository<'a> {
    /// Create a new WishlistRepository.
    pub fn new(store: &'a DataStore) -> Self {
        Self { store }
    }

    /// Insert a new item. The owning user must exist.
    pub fn create(&self, new_item: NewWishlistItem) -> DbResult<WishlistItem> {
        let write_txn = self.store.begin_write()?;
        let item = {
            let users = write_txn.open_table(USERS)?;
            if users.get(new_item.user_id)?.is_none() {
                return Err(DbError::NotFound("User"));
            }

            let id = next_id(&write_txn, WISHLIST_SEQUENCE)?;
            let now = Utc::now();
            let item = WishlistItem {
                id,
                user_id: new_item.user_id,
                name: new_item.name,
                description: new_item.description,
                target_price: new_item.target_price,
                status: new_item.status,
                created_at: now,
                updated_at: now,
            };

            let mut items = write_txn.open_table(WISHLISTS)?;
            items.insert(id, encode(&item)?.as_slice())?;
            let mut index = write_txn.open_table(OWNER_INDEX)?;
            index.insert((item.user_id, id), ())?;
            item
        };
        write_txn.commit()?;
        Ok(item)
    }

    /// Get an item owned by `user_id`.
    pub fn get_owned(&self, user_id: u64, item_id: u64) -> DbResult<Option<WishlistItem>> {
        let read_txn = self.store.begin_read()?;
        let items = read_txn.open_table(WISHLISTS)?;
        let item: Option<WishlistItem> = match items.get(item_id)? {
            Some(value) => Some(decode(value.value())?),
            None => None,
        };
        Ok(item.owned_by(user_id))
    }

    /// List the items of `user_id` that match `filter`, in the filter's order.
    pub fn list_by_owner(
        &self,
        user_id: u64,
        filter: &WishlistFilter,
    ) -> DbResult<Vec<WishlistItem>> {
        let read_txn = self.store.begin_read()?;
        let index = read_txn.open_table(OWNER_INDEX)?;
        let items = read_txn.open_table(WISHLISTS)?;

        let mut matched = Vec::new();
        for entry in index.range((user_id, 0)..=(user_id, u64::MAX))? {
            let (key, _) = entry?;
            let (_, item_id) = key.value();
            let Some(value) = items.get(item_id)? else {
                tracing::warn!(user_id, item_id, "Owner index points at a missing item");
                continue;
            };
            let item: WishlistItem = decode(value.value())?;
            if filter.matches(&item) {
                matched.push(item);
            }
        }

        matched.sort_by(|a, b| filter.compare(a, b));
        Ok(matched)
    }

    /// Replace the editable fields of an owned item.
    pub fn update_owned(
        &self,
        user_id: u64,
        item_id: u64,
        changes: WishlistChanges,
    ) -> DbResult<Option<WishlistItem>> {
        self.modify_owned(user_id, item_id, |item| {
            item.name = changes.name;
            item.description = changes.description;
            item.target_price = changes.target_price;
            if let Some(status) = changes.status {
                item.status = status;
            }
        })
    }

    /// Set only the status of an owned item.
    pub fn set_status_owned(
        &self,
        user_id: u64,
        item_id: u64,
        status: WishlistStatus,
    ) -> DbResult<Option<WishlistItem>> {
        self.modify_owned(user_id, item_id, |item| item.status = status)
    }

    /// Permanently delete an owned item. Returns `false` if there was nothing to delete.
    pub fn delete_owned(&self, user_id: u64, item_id: u64) -> DbResult<bool> {
        let write_txn = self.store.begin_write()?;
        {
            let mut items = write_txn.open_table(WISHLISTS)?;
            let existing: Option<WishlistItem> = match items.get(item_id)? {
                Some(value) => Some(decode(value.value())?),
                None => None,
            };
            if existing.owned_by(user_id).is_none() {
                return Ok(false);
            }

            items.remove(item_id)?;
            let mut index = write_txn.open_table(OWNER_INDEX)?;
            index.remove((user_id, item_id))?;
        }
        write_txn.commit()?;
        Ok(true)
    }

    /// Load, check ownership, mutate and store an item in one write transaction.
    fn modify_owned<F>(&self, user_id: u64, item_id: u64, apply: F) -> DbResult<Option<WishlistItem>>
    where
        F: FnOnce(&mut WishlistItem),
    {
        let write_txn = self.store.begin_write()?;
        let updated = {
            let mut items = write_txn.open_table(WISHLISTS)?;
            let existing: Option<WishlistItem> = match items.get(item_id)? {
                Some(value) => Some(decode(value.value())?),
                None => None,
            };
            let Some(mut item) = existing.owned_by(user_id) else {
                return Ok(None);
            };

            apply(&mut item);
            item.updated_at = Utc::now();
            items.insert(item_id, encode(&item)?.as_slice())?;
            item
        };
        write_txn.commit()?;
        Ok(Some(updated))
    }
}
