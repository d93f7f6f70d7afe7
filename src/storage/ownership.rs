// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ownership enforcement for all storage operations.
//!
//! Every ownership-scoped read or write goes through [`OwnershipCheck`]. A
//! record owned by someone else is indistinguishable from a missing one: the
//! check yields `None`, never a permission error, so callers cannot probe for
//! the existence of other users' records.

/// Trait for resources that have an owner.
pub trait OwnedResource {
    /// Get the owner's user ID.
    fn owner_user_id(&self) -> u64;

    /// Whether the given user owns this resource.
    fn is_owned_by(&self, user_id: u64) -> bool {
        self.owner_user_id() == user_id
    }
}

/// Narrow a lookup result to resources owned by the caller.
pub trait OwnershipCheck<T> {
    /// Keep the resource only when `user_id` owns it.
    fn owned_by(self, user_id: u64) -> Option<T>;
}

impl<T: OwnedResource> OwnershipCheck<T> for Option<T> {
    fn owned_by(self, user_id: u64) -> Option<T> {
        self.filter(|resource| resource.is_owned_by(user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestResource {
        owner: u64,
    }

    impl OwnedResource for TestResource {
        fn owner_user_id(&self) -> u64 {
            self.owner
        }
    }

    #[test]
    fn ownership_check_passes_for_owner() {
        let resource = Some(TestResource { owner: 7 });
        assert!(resource.owned_by(7).is_some());
    }

    #[test]
    fn foreign_resource_looks_missing() {
        let resource = Some(TestResource { owner: 7 });
        assert!(resource.owned_by(8).is_none());
    }

    #[test]
    fn missing_resource_stays_missing() {
        let resource: Option<TestResource> = None;
        assert!(resource.owned_by(7).is_none());
    }
}
