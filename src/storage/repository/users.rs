// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User repository (the credential store).
//!
//! The email index and the user record are written in the same redb write
//! transaction, so two concurrent registrations with one email cannot both
//! commit.

use chrono::{DateTime, Utc};
use redb::ReadableTable;
use serde::{Deserialize, Serialize};

use super::super::database::{
    decode, encode, next_id, DataStore, DbError, DbResult, OWNER_INDEX, USERS, USER_EMAILS,
    USER_SEQUENCE, WISHLISTS,
};

/// User record as persisted. Never serialized onto the wire.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredUser {
    pub id: u64,
    pub name: String,
    /// Unique, stored exactly as registered.
    pub email: String,
    /// Argon2 PHC string.
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl std::fmt::Debug for StoredUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredUser")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// Fields required to create a user.
#[derive(Debug, Clone, Copy)]
pub struct NewUser<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
}

/// Repository for user records.
pub struct UserRepository<'a> {
    store: &'a DataStore,
}

impl<'a> UserRepository<'a> {
    /// Create a new UserRepository.
    pub fn new(store: &'a DataStore) -> Self {
        Self { store }
    }

    /// Insert a new user, failing with `DuplicateEmail` if the email is taken.
    pub fn create(&self, new_user: NewUser<'_>) -> DbResult<StoredUser> {
        let write_txn = self.store.begin_write()?;
        let user = {
            let mut emails = write_txn.open_table(USER_EMAILS)?;
            if emails.get(new_user.email)?.is_some() {
                return Err(DbError::DuplicateEmail);
            }

            let id = next_id(&write_txn, USER_SEQUENCE)?;
            let now = Utc::now();
            let user = StoredUser {
                id,
                name: new_user.name.to_string(),
                email: new_user.email.to_string(),
                password_hash: new_user.password_hash.to_string(),
                created_at: now,
                updated_at: now,
            };

            let mut users = write_txn.open_table(USERS)?;
            users.insert(id, encode(&user)?.as_slice())?;
            emails.insert(new_user.email, id)?;
            user
        };
        write_txn.commit()?;
        Ok(user)
    }

    /// Get a user by ID.
    pub fn get(&self, user_id: u64) -> DbResult<Option<StoredUser>> {
        let read_txn = self.store.begin_read()?;
        let users = read_txn.open_table(USERS)?;
        match users.get(user_id)? {
            Some(value) => Ok(Some(decode(value.value())?)),
            None => Ok(None),
        }
    }

    /// Look up a user by exact email.
    pub fn find_by_email(&self, email: &str) -> DbResult<Option<StoredUser>> {
        let read_txn = self.store.begin_read()?;
        let emails = read_txn.open_table(USER_EMAILS)?;
        let Some(user_id) = emails.get(email)?.map(|v| v.value()) else {
            return Ok(None);
        };

        let users = read_txn.open_table(USERS)?;
        match users.get(user_id)? {
            Some(value) => Ok(Some(decode(value.value())?)),
            None => Ok(None),
        }
    }

    /// Update name and/or email.
    ///
    /// Re-submitting the user's own email is not a conflict.
    pub fn update_profile(
        &self,
        user_id: u64,
        name: Option<&str>,
        email: Option<&str>,
    ) -> DbResult<StoredUser> {
        let write_txn = self.store.begin_write()?;
        let user = {
            let mut users = write_txn.open_table(USERS)?;
            let existing_bytes = users
                .get(user_id)?
                .ok_or(DbError::NotFound("User"))?
                .value()
                .to_vec();
            let mut user: StoredUser = decode(&existing_bytes)?;

            if let Some(email) = email.filter(|email| *email != user.email) {
                let mut emails = write_txn.open_table(USER_EMAILS)?;
                if emails.get(email)?.is_some() {
                    return Err(DbError::DuplicateEmail);
                }
                emails.remove(user.email.as_str())?;
                emails.insert(email, user_id)?;
                user.email = email.to_string();
            }

            if let Some(name) = name {
                user.name = name.to_string();
            }

            user.updated_at = Utc::now();
            users.insert(user_id, encode(&user)?.as_slice())?;
            user
        };
        write_txn.commit()?;
        Ok(user)
    }

    /// Replace the stored password hash.
    pub fn update_password(&self, user_id: u64, password_hash: &str) -> DbResult<()> {
        let write_txn = self.store.begin_write()?;
        {
            let mut users = write_txn.open_table(USERS)?;
            let existing_bytes = users
                .get(user_id)?
                .ok_or(DbError::NotFound("User"))?
                .value()
                .to_vec();
            let mut user: StoredUser = decode(&existing_bytes)?;
            user.password_hash = password_hash.to_string();
            user.updated_at = Utc::now();
            users.insert(user_id, encode(&user)?.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Delete a user together with every wishlist item they own.
    ///
    /// Returns the number of items removed.
    pub fn delete(&self, user_id: u64) -> DbResult<usize> {
        let write_txn = self.store.begin_write()?;
        let removed = {
            let mut users = write_txn.open_table(USERS)?;
            let existing_bytes = users
                .remove(user_id)?
                .ok_or(DbError::NotFound("User"))?
                .value()
                .to_vec();
            let user: StoredUser = decode(&existing_bytes)?;

            let mut emails = write_txn.open_table(USER_EMAILS)?;
            emails.remove(user.email.as_str())?;

            let mut index = write_txn.open_table(OWNER_INDEX)?;
            let item_ids = index
                .range((user_id, 0)..=(user_id, u64::MAX))?
                .map(|entry| entry.map(|(key, _)| key.value().1))
                .collect::<Result<Vec<u64>, _>>()?;

            let mut items = write_txn.open_table(WISHLISTS)?;
            for item_id in &item_ids {
                index.remove((user_id, *item_id))?;
                items.remove(*item_id)?;
            }
            item_ids.len()
        };
        write_txn.commit()?;

        tracing::info!(user_id, items_removed = removed, "User deleted");
        Ok(removed)
    }
}
