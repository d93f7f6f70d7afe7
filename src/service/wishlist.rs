// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wishlist Service: ownership-scoped CRUD, listing and aggregates.
//!
//! Every operation takes the caller's user id from the authorization gate.
//! An item owned by someone else is reported exactly like a missing one.

use std::sync::Arc;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{ServiceError, ServiceResult};
use crate::models::{
    ListPayload, ListStats, OwnerSummary, WishlistItemView, WishlistRequest, WishlistStatistics,
};
use crate::storage::{
    DataStore, NewWishlistItem, UserRepository, WishlistChanges, WishlistFilter, WishlistItem,
    WishlistRepository, WishlistStatus,
};

const ITEM: &str = "Wishlist item";

/// Largest accepted target price (ten digits, two of them fractional).
fn max_target_price() -> Decimal {
    Decimal::new(9_999_999_999, 2)
}

pub struct WishlistService {
    store: Arc<DataStore>,
}

impl WishlistService {
    pub fn new(store: Arc<DataStore>) -> Self {
        Self { store }
    }

    /// Items matching `filter`, with aggregates over exactly those items.
    pub fn list(&self, user_id: u64, filter: &WishlistFilter) -> ServiceResult<ListPayload> {
        let items = WishlistRepository::new(&self.store).list_by_owner(user_id, filter)?;
        let totals = Totals::over(&items);

        let stats = ListStats {
            total: items.len(),
            pending: totals.pending,
            purchased: totals.purchased,
            total_price: money(totals.pending_price + totals.purchased_price),
            total_pending_price: money(totals.pending_price),
        };

        let owner = self.owner(user_id)?;
        let items = items
            .into_iter()
            .map(|item| WishlistItemView {
                item,
                user: owner.clone(),
            })
            .collect();
        Ok(ListPayload { items, stats })
    }

    /// Attach the owner's summary to an item for responses.
    pub fn with_owner(&self, item: WishlistItem) -> ServiceResult<WishlistItemView> {
        let user = self.owner(item.user_id)?;
        Ok(WishlistItemView { item, user })
    }

    pub fn get(&self, user_id: u64, item_id: u64) -> ServiceResult<WishlistItem> {
        WishlistRepository::new(&self.store)
            .get_owned(user_id, item_id)?
            .ok_or(ServiceError::NotFound(ITEM))
    }

    pub fn create(&self, user_id: u64, request: WishlistRequest) -> ServiceResult<WishlistItem> {
        let target_price = normalize_price(request.target_price)?;
        let item = WishlistRepository::new(&self.store).create(NewWishlistItem {
            user_id,
            name: request.name,
            description: request.description,
            target_price,
            status: request.status.unwrap_or_default(),
        })?;

        tracing::info!(user_id, item_id = item.id, "Wishlist item created");
        Ok(item)
    }

    /// Replace name, description and price. Status changes only when supplied.
    pub fn update(
        &self,
        user_id: u64,
        item_id: u64,
        request: WishlistRequest,
    ) -> ServiceResult<WishlistItem> {
        let target_price = normalize_price(request.target_price)?;
        let changes = WishlistChanges {
            name: request.name,
            description: request.description,
            target_price,
            status: request.status,
        };

        let item = WishlistRepository::new(&self.store)
            .update_owned(user_id, item_id, changes)?
            .ok_or(ServiceError::NotFound(ITEM))?;

        tracing::info!(user_id, item_id, "Wishlist item updated");
        Ok(item)
    }

    /// Move an item between `pending` and `purchased`.
    pub fn set_status(&self, user_id: u64, item_id: u64, status: &str) -> ServiceResult<WishlistItem> {
        let status: WishlistStatus = status.parse().map_err(|_| {
            ServiceError::InvalidInput(
                r#"Invalid status. Use "pending" or "purchased""#.to_string(),
            )
        })?;

        let item = WishlistRepository::new(&self.store)
            .set_status_owned(user_id, item_id, status)?
            .ok_or(ServiceError::NotFound(ITEM))?;

        tracing::info!(user_id, item_id, status = %status, "Wishlist item status changed");
        Ok(item)
    }

    pub fn delete(&self, user_id: u64, item_id: u64) -> ServiceResult<()> {
        if !WishlistRepository::new(&self.store).delete_owned(user_id, item_id)? {
            return Err(ServiceError::NotFound(ITEM));
        }
        tracing::info!(user_id, item_id, "Wishlist item deleted");
        Ok(())
    }

    /// Aggregates over every item the caller owns, ignoring any filter.
    pub fn statistics(&self, user_id: u64) -> ServiceResult<WishlistStatistics> {
        let items = WishlistRepository::new(&self.store)
            .list_by_owner(user_id, &WishlistFilter::default())?;
        let totals = Totals::over(&items);

        Ok(WishlistStatistics {
            total_wishlist: items.len(),
            total_pending: totals.pending,
            total_purchased: totals.purchased,
            total_target_price: money(totals.pending_price + totals.purchased_price),
            total_pending_price: money(totals.pending_price),
            total_purchased_price: money(totals.purchased_price),
        })
    }

    fn owner(&self, user_id: u64) -> ServiceResult<OwnerSummary> {
        UserRepository::new(&self.store)
            .get(user_id)?
            .map(OwnerSummary::from)
            .ok_or(ServiceError::NotFound("User"))
    }
}

#[derive(Default)]
struct Totals {
    pending: usize,
    purchased: usize,
    pending_price: Decimal,
    purchased_price: Decimal,
}

impl Totals {
    fn over(items: &[WishlistItem]) -> Self {
        items.iter().fold(Self::default(), |mut totals, item| {
            match item.status {
                WishlistStatus::Pending => {
                    totals.pending += 1;
                    totals.pending_price += item.target_price;
                }
                WishlistStatus::Purchased => {
                    totals.purchased += 1;
                    totals.purchased_price += item.target_price;
                }
            }
            totals
        })
    }
}

/// Round to cents and reject values outside `0 ..= 99999999.99`.
fn normalize_price(price: Decimal) -> ServiceResult<Decimal> {
    let mut rounded = price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }
    if rounded.is_sign_negative() {
        return Err(ServiceError::InvalidInput(
            "Target price must not be negative".to_string(),
        ));
    }
    if rounded > max_target_price() {
        return Err(ServiceError::InvalidInput(
            "Target price must not exceed 99999999.99".to_string(),
        ));
    }
    Ok(money(rounded))
}

/// Fix the scale at two fractional digits so `60` renders as `60.00`.
fn money(mut value: Decimal) -> Decimal {
    value.rescale(2);
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{NewUser, SortKey, SortOrder, UserRepository};
    use crate::test_support::TestContext;

    fn add_user(ctx: &TestContext, email: &str) -> u64 {
        UserRepository::new(&ctx.state.store)
            .create(NewUser {
                name: "Test User",
                email,
                password_hash: "$argon2id$fake",
            })
            .unwrap()
            .id
    }

    fn request(name: &str, price: i64) -> WishlistRequest {
        WishlistRequest {
            name: name.to_string(),
            description: format!("{name} description"),
            target_price: Decimal::from(price),
            status: None,
        }
    }

    #[test]
    fn create_defaults_to_pending_with_two_decimals() {
        let ctx = TestContext::new();
        let user = add_user(&ctx, "a@example.com");

        let item = ctx.state.wishlists.create(user, request("Lamp", 60)).unwrap();
        assert_eq!(item.status, WishlistStatus::Pending);
        assert_eq!(item.user_id, user);
        assert_eq!(item.target_price.to_string(), "60.00");
    }

    #[test]
    fn price_is_rounded_to_cents() {
        let ctx = TestContext::new();
        let user = add_user(&ctx, "a@example.com");

        let mut req = request("Lamp", 0);
        req.target_price = Decimal::new(19_995, 3);
        let item = ctx.state.wishlists.create(user, req).unwrap();
        assert_eq!(item.target_price.to_string(), "20.00");
    }

    #[test]
    fn out_of_range_prices_are_invalid_input() {
        let ctx = TestContext::new();
        let user = add_user(&ctx, "a@example.com");
        let wishlists = &ctx.state.wishlists;

        let negative = wishlists.create(user, request("Lamp", -1));
        assert!(matches!(negative, Err(ServiceError::InvalidInput(_))));

        let mut too_big = request("Yacht", 0);
        too_big.target_price = Decimal::new(100_000_000, 0);
        assert!(matches!(
            wishlists.create(user, too_big),
            Err(ServiceError::InvalidInput(_))
        ));

        let mut at_limit = request("House", 0);
        at_limit.target_price = Decimal::new(9_999_999_999, 2);
        assert!(wishlists.create(user, at_limit).is_ok());

        assert!(wishlists.create(user, request("Freebie", 0)).is_ok());
    }

    #[test]
    fn list_and_statistics_aggregate_prices() {
        let ctx = TestContext::new();
        let user = add_user(&ctx, "a@example.com");
        let wishlists = &ctx.state.wishlists;

        wishlists.create(user, request("Ten", 10)).unwrap();
        wishlists.create(user, request("Twenty", 20)).unwrap();
        let thirty = wishlists.create(user, request("Thirty", 30)).unwrap();
        wishlists.set_status(user, thirty.id, "purchased").unwrap();

        let listed = wishlists.list(user, &WishlistFilter::default()).unwrap();
        assert_eq!(
            listed.stats,
            ListStats {
                total: 3,
                pending: 2,
                purchased: 1,
                total_price: Decimal::new(6000, 2),
                total_pending_price: Decimal::new(3000, 2),
            }
        );
        assert_eq!(listed.stats.total_price.to_string(), "60.00");

        let stats = wishlists.statistics(user).unwrap();
        assert_eq!(stats.total_wishlist, 3);
        assert_eq!(stats.total_pending, 2);
        assert_eq!(stats.total_purchased, 1);
        assert_eq!(stats.total_target_price, Decimal::new(6000, 2));
        assert_eq!(stats.total_pending_price, Decimal::new(3000, 2));
        assert_eq!(stats.total_purchased_price, Decimal::new(3000, 2));
    }

    #[test]
    fn filtered_list_stats_cover_only_returned_items() {
        let ctx = TestContext::new();
        let user = add_user(&ctx, "a@example.com");
        let wishlists = &ctx.state.wishlists;

        wishlists.create(user, request("Ten", 10)).unwrap();
        let twenty = wishlists.create(user, request("Twenty", 20)).unwrap();
        wishlists.set_status(user, twenty.id, "purchased").unwrap();

        let filter = WishlistFilter {
            status: Some(WishlistStatus::Pending),
            ..Default::default()
        };
        let listed = wishlists.list(user, &filter).unwrap();
        assert_eq!(listed.items.len(), 1);
        assert_eq!(listed.stats.total, 1);
        assert_eq!(listed.stats.pending, 1);
        assert_eq!(listed.stats.purchased, 0);
        assert_eq!(listed.stats.total_price, Decimal::new(1000, 2));

        // Statistics ignore filters
        assert_eq!(wishlists.statistics(user).unwrap().total_wishlist, 2);
    }

    #[test]
    fn empty_collection_has_zero_totals() {
        let ctx = TestContext::new();
        let user = add_user(&ctx, "a@example.com");

        let stats = ctx.state.wishlists.statistics(user).unwrap();
        assert_eq!(stats.total_wishlist, 0);
        assert_eq!(stats.total_target_price.to_string(), "0.00");
    }

    #[test]
    fn status_round_trips_both_directions() {
        let ctx = TestContext::new();
        let user = add_user(&ctx, "a@example.com");
        let wishlists = &ctx.state.wishlists;
        let item = wishlists.create(user, request("Bike", 300)).unwrap();

        let purchased = wishlists.set_status(user, item.id, "purchased").unwrap();
        assert_eq!(purchased.status, WishlistStatus::Purchased);
        assert_eq!(purchased.name, item.name);
        assert_eq!(purchased.target_price, item.target_price);

        let pending = wishlists.set_status(user, item.id, "pending").unwrap();
        assert_eq!(pending.status, WishlistStatus::Pending);
    }

    #[test]
    fn setting_the_current_status_changes_nothing_else() {
        let ctx = TestContext::new();
        let user = add_user(&ctx, "a@example.com");
        let wishlists = &ctx.state.wishlists;
        let item = wishlists.create(user, request("Bike", 300)).unwrap();

        let again = wishlists.set_status(user, item.id, "pending").unwrap();
        assert_eq!(again.status, WishlistStatus::Pending);
        assert_eq!(again.name, item.name);
        assert_eq!(again.description, item.description);
        assert_eq!(again.target_price, item.target_price);
        assert_eq!(again.created_at, item.created_at);

        let purchased = wishlists.set_status(user, item.id, "purchased").unwrap();
        let twice = wishlists.set_status(user, item.id, "purchased").unwrap();
        assert_eq!(twice.status, WishlistStatus::Purchased);
        assert_eq!(twice.name, purchased.name);
        assert_eq!(twice.target_price, purchased.target_price);
        assert_eq!(twice.created_at, item.created_at);
        assert_eq!(wishlists.statistics(user).unwrap().total_purchased, 1);
    }

    #[test]
    fn create_honours_explicit_status() {
        let ctx = TestContext::new();
        let user = add_user(&ctx, "a@example.com");

        let mut already_bought = request("Kettle", 25);
        already_bought.status = Some(WishlistStatus::Purchased);
        let item = ctx.state.wishlists.create(user, already_bought).unwrap();
        assert_eq!(item.status, WishlistStatus::Purchased);

        let stats = ctx.state.wishlists.statistics(user).unwrap();
        assert_eq!(stats.total_purchased, 1);
        assert_eq!(stats.total_purchased_price.to_string(), "25.00");
    }

    #[test]
    fn listed_items_carry_owner_summary() {
        let ctx = TestContext::new();
        let user = add_user(&ctx, "owner@example.com");
        let wishlists = &ctx.state.wishlists;
        let item = wishlists.create(user, request("Lamp", 40)).unwrap();

        let listed = wishlists.list(user, &WishlistFilter::default()).unwrap();
        assert_eq!(listed.items[0].item, item);
        assert_eq!(listed.items[0].user.id, user);
        assert_eq!(listed.items[0].user.email, "owner@example.com");

        let view = wishlists.with_owner(item.clone()).unwrap();
        assert_eq!(view.user.name, "Test User");
        assert_eq!(view.item, item);
    }

    #[test]
    fn unknown_status_is_invalid_input() {
        let ctx = TestContext::new();
        let user = add_user(&ctx, "a@example.com");
        let item = ctx.state.wishlists.create(user, request("Bike", 300)).unwrap();

        let result = ctx.state.wishlists.set_status(user, item.id, "shipped");
        assert!(matches!(result, Err(ServiceError::InvalidInput(_))));
    }

    #[test]
    fn foreign_items_are_not_found() {
        let ctx = TestContext::new();
        let owner = add_user(&ctx, "owner@example.com");
        let intruder = add_user(&ctx, "intruder@example.com");
        let wishlists = &ctx.state.wishlists;
        let item = wishlists.create(owner, request("Camera", 500)).unwrap();

        assert!(matches!(
            wishlists.get(intruder, item.id),
            Err(ServiceError::NotFound(ITEM))
        ));
        assert!(matches!(
            wishlists.update(intruder, item.id, request("Mine now", 1)),
            Err(ServiceError::NotFound(ITEM))
        ));
        assert!(matches!(
            wishlists.set_status(intruder, item.id, "purchased"),
            Err(ServiceError::NotFound(ITEM))
        ));
        assert!(matches!(
            wishlists.delete(intruder, item.id),
            Err(ServiceError::NotFound(ITEM))
        ));

        assert_eq!(wishlists.get(owner, item.id).unwrap(), item);
    }

    #[test]
    fn update_keeps_status_unless_supplied() {
        let ctx = TestContext::new();
        let user = add_user(&ctx, "a@example.com");
        let wishlists = &ctx.state.wishlists;
        let item = wishlists.create(user, request("Bike", 300)).unwrap();
        wishlists.set_status(user, item.id, "purchased").unwrap();

        let updated = wishlists.update(user, item.id, request("Road bike", 450)).unwrap();
        assert_eq!(updated.name, "Road bike");
        assert_eq!(updated.target_price.to_string(), "450.00");
        assert_eq!(updated.status, WishlistStatus::Purchased);

        let mut back_to_pending = request("Road bike", 450);
        back_to_pending.status = Some(WishlistStatus::Pending);
        let updated = wishlists.update(user, item.id, back_to_pending).unwrap();
        assert_eq!(updated.status, WishlistStatus::Pending);
    }

    #[test]
    fn delete_then_get_is_not_found() {
        let ctx = TestContext::new();
        let user = add_user(&ctx, "a@example.com");
        let wishlists = &ctx.state.wishlists;
        let item = wishlists.create(user, request("Bike", 300)).unwrap();

        wishlists.delete(user, item.id).unwrap();
        assert!(matches!(
            wishlists.get(user, item.id),
            Err(ServiceError::NotFound(ITEM))
        ));
        assert!(matches!(
            wishlists.delete(user, item.id),
            Err(ServiceError::NotFound(ITEM))
        ));
    }

    #[test]
    fn list_honours_sort_order() {
        let ctx = TestContext::new();
        let user = add_user(&ctx, "a@example.com");
        let wishlists = &ctx.state.wishlists;
        wishlists.create(user, request("Mid", 20)).unwrap();
        wishlists.create(user, request("Cheap", 5)).unwrap();
        wishlists.create(user, request("Dear", 90)).unwrap();

        let filter = WishlistFilter {
            sort: SortKey::TargetPrice,
            order: SortOrder::Desc,
            ..Default::default()
        };
        let names: Vec<String> = wishlists
            .list(user, &filter)
            .unwrap()
            .items
            .into_iter()
            .map(|view| view.item.name)
            .collect();
        assert_eq!(names, vec!["Dear", "Mid", "Cheap"]);
    }
}
