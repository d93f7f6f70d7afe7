// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Identity Service: accounts, credentials and session issuance.

use std::sync::Arc;

use crate::auth::{PasswordHasher, SessionIssuer};
use crate::error::{ServiceError, ServiceResult};
use crate::models::{AuthPayload, UserView};
use crate::storage::{DataStore, NewUser, StoredUser, UserRepository};

pub struct IdentityService {
    store: Arc<DataStore>,
    sessions: Arc<SessionIssuer>,
    hasher: PasswordHasher,
}

impl IdentityService {
    pub fn new(store: Arc<DataStore>, sessions: Arc<SessionIssuer>, hasher: PasswordHasher) -> Self {
        Self {
            store,
            sessions,
            hasher,
        }
    }

    /// Create an account and open a session for it.
    ///
    /// The email pre-check only avoids paying the hash cost for an obvious
    /// duplicate; the write transaction is what guarantees uniqueness.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> ServiceResult<AuthPayload> {
        if UserRepository::new(&self.store).find_by_email(email)?.is_some() {
            tracing::info!("Registration rejected: email already registered");
            return Err(ServiceError::DuplicateEmail);
        }

        let password_hash = self.hash_password(password).await?;
        let user = UserRepository::new(&self.store).create(NewUser {
            name,
            email,
            password_hash: &password_hash,
        })?;

        tracing::info!(user_id = user.id, "User registered");
        self.open_session(user)
    }

    /// Verify credentials and open a session.
    ///
    /// Unknown email and wrong password fail identically, and both pay for
    /// one Argon2 verification.
    pub async fn login(&self, email: &str, password: &str) -> ServiceResult<AuthPayload> {
        let Some(user) = UserRepository::new(&self.store).find_by_email(email)? else {
            let decoy = self.hasher.decoy_hash().to_owned();
            self.verify_password(password, &decoy).await?;
            tracing::info!("Login failed: unknown email");
            return Err(ServiceError::InvalidCredentials);
        };

        if !self.verify_password(password, &user.password_hash).await? {
            tracing::info!(user_id = user.id, "Login failed: wrong password");
            return Err(ServiceError::InvalidCredentials);
        }

        tracing::info!(user_id = user.id, "User logged in");
        self.open_session(user)
    }

    pub fn get_profile(&self, user_id: u64) -> ServiceResult<UserView> {
        UserRepository::new(&self.store)
            .get(user_id)?
            .map(UserView::from)
            .ok_or(ServiceError::NotFound("User"))
    }

    /// Change name and/or email. Omitted fields keep their value.
    pub fn update_profile(
        &self,
        user_id: u64,
        name: Option<&str>,
        email: Option<&str>,
    ) -> ServiceResult<UserView> {
        let user = UserRepository::new(&self.store).update_profile(user_id, name, email)?;
        tracing::info!(user_id, "Profile updated");
        Ok(user.into())
    }

    /// Replace the password after re-verifying the current one.
    ///
    /// Sessions issued before the change stay valid until they expire.
    pub async fn change_password(
        &self,
        user_id: u64,
        old_password: &str,
        new_password: &str,
    ) -> ServiceResult<()> {
        let user = UserRepository::new(&self.store)
            .get(user_id)?
            .ok_or(ServiceError::NotFound("User"))?;

        if !self.verify_password(old_password, &user.password_hash).await? {
            tracing::info!(user_id, "Password change rejected: wrong current password");
            return Err(ServiceError::InvalidCredentials);
        }

        let password_hash = self.hash_password(new_password).await?;
        UserRepository::new(&self.store).update_password(user_id, &password_hash)?;

        tracing::info!(user_id, "Password changed");
        Ok(())
    }

    fn open_session(&self, user: StoredUser) -> ServiceResult<AuthPayload> {
        let session = self
            .sessions
            .issue(user.id, &user.email)
            .map_err(|e| ServiceError::Internal(e.to_string()))?;

        Ok(AuthPayload {
            user: user.into(),
            token: session.token,
            token_type: "Bearer".to_string(),
            expires_at: session.expires_at,
        })
    }

    async fn hash_password(&self, password: &str) -> ServiceResult<String> {
        let hasher = self.hasher.clone();
        let password = password.to_owned();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| ServiceError::Internal(format!("hashing task failed: {e}")))?
            .map_err(ServiceError::from)
    }

    async fn verify_password(&self, password: &str, stored_hash: &str) -> ServiceResult<bool> {
        let hasher = self.hasher.clone();
        let password = password.to_owned();
        let stored_hash = stored_hash.to_owned();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &stored_hash))
            .await
            .map_err(|e| ServiceError::Internal(format!("verification task failed: {e}")))?
            .map_err(ServiceError::from)
    }
}
