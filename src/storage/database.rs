// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded database backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `users`: user_id → serialized StoredUser
//! - `user_emails`: email → user_id (uniqueness constraint)
//! - `wishlists`: item_id → serialized WishlistItem
//! - `wishlist_owner_index`: (user_id, item_id) → ()
//! - `sequences`: sequence name → last assigned id
//!
//! redb admits one write transaction at a time, so a check performed inside a
//! write transaction still holds when that transaction commits.

use std::path::Path;

use redb::{
    Database, ReadTransaction, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction,
};
use serde::{de::DeserializeOwned, Serialize};

// =============================================================================
// Table Definitions
// =============================================================================

pub(super) const USERS: TableDefinition<u64, &[u8]> = TableDefinition::new("users");

/// Email → user id. Emails are stored exactly as registered (case-sensitive).
pub(super) const USER_EMAILS: TableDefinition<&str, u64> = TableDefinition::new("user_emails");

pub(super) const WISHLISTS: TableDefinition<u64, &[u8]> = TableDefinition::new("wishlists");

/// Owner index: (user_id, item_id) → (). Range scans yield one user's items.
pub(super) const OWNER_INDEX: TableDefinition<(u64, u64), ()> =
    TableDefinition::new("wishlist_owner_index");

const SEQUENCES: TableDefinition<&str, u64> = TableDefinition::new("sequences");

pub(super) const USER_SEQUENCE: &str = "users";
pub(super) const WISHLIST_SEQUENCE: &str = "wishlists";

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("email is already registered")]
    DuplicateEmail,

    #[error("{0} not found")]
    NotFound(&'static str),
}

pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// DataStore
// =============================================================================

/// Handle to the embedded database shared by all repositories.
pub struct DataStore {
    db: Database,
}

impl DataStore {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> DbResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            write_txn.open_table(USERS)?;
            write_txn.open_table(USER_EMAILS)?;
            write_txn.open_table(WISHLISTS)?;
            write_txn.open_table(OWNER_INDEX)?;
            write_txn.open_table(SEQUENCES)?;
        }
        write_txn.commit()?;

        tracing::info!(path = %path.display(), "Database opened");
        Ok(Self { db })
    }

    pub(super) fn begin_read(&self) -> DbResult<ReadTransaction> {
        Ok(self.db.begin_read()?)
    }

    pub(super) fn begin_write(&self) -> DbResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    /// Cheap liveness probe: opens and drops a read transaction.
    pub fn check(&self) -> DbResult<()> {
        let read_txn = self.begin_read()?;
        read_txn.open_table(USERS)?;
        Ok(())
    }
}

/// Allocate the next value of an autoincrement sequence.
///
/// Must be called inside the write transaction that uses the id, so a
/// rollback also releases it.
pub(super) fn next_id(txn: &WriteTransaction, sequence: &str) -> DbResult<u64> {
    let mut table = txn.open_table(SEQUENCES)?;
    let current = table.get(sequence)?.map(|v| v.value()).unwrap_or(0);
    let next = current + 1;
    table.insert(sequence, next)?;
    Ok(next)
}

pub(super) fn encode<T: Serialize>(record: &T) -> DbResult<Vec<u8>> {
    Ok(serde_json::to_vec(record)?)
}

pub(super) fn decode<T: DeserializeOwned>(bytes: &[u8]) -> DbResult<T> {
    Ok(serde_json::from_slice(bytes)?)
}

// =============================================================================
// Tests
// =============================================================================
