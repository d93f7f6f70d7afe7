// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::{PasswordHasher, SessionIssuer};
use crate::service::{IdentityService, WishlistService};
use crate::storage::DataStore;

/// Shared state handed to every handler. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<DataStore>,
    pub sessions: Arc<SessionIssuer>,
    pub identity: Arc<IdentityService>,
    pub wishlists: Arc<WishlistService>,
}

impl AppState {
    pub fn new(store: DataStore, sessions: SessionIssuer, hasher: PasswordHasher) -> Self {
        let store = Arc::new(store);
        let sessions = Arc::new(sessions);
        Self {
            identity: Arc::new(IdentityService::new(
                Arc::clone(&store),
                Arc::clone(&sessions),
                hasher,
            )),
            wishlists: Arc::new(WishlistService::new(Arc::clone(&store))),
            store,
            sessions,
        }
    }
}
