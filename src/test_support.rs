// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shared fixtures for unit and router tests.

use tempfile::TempDir;

use crate::auth::{PasswordHasher, SessionIssuer};
use crate::config::HashingCost;
use crate::state::AppState;
use crate::storage::DataStore;

pub const TEST_SECRET: &[u8] = b"unit-test-signing-secret-0123456789abcdef";

/// Application state over a throw-away database.
///
/// Keeps the temporary directory alive for as long as the state is used.
pub struct TestContext {
    pub state: AppState,
    _dir: TempDir,
}

impl TestContext {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let store = DataStore::open(&dir.path().join("test.redb")).unwrap();
        let hasher = PasswordHasher::new(HashingCost {
            memory_kib: 8,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap();
        let state = AppState::new(store, SessionIssuer::new(TEST_SECRET), hasher);
        Self { state, _dir: dir }
    }
}
