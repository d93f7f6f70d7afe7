// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Password hashing with Argon2id.
//!
//! Hashes are PHC strings, so the cost parameters travel with each hash and
//! verification keeps working after the configured cost changes.

use std::sync::Arc;

use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use ring::rand::{SecureRandom, SystemRandom};

use crate::config::HashingCost;

const SALT_LEN: usize = 16;
const DECOY_PASSWORD: &str = "wishmate-decoy-password";

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("invalid hashing parameters: {0}")]
    Params(argon2::Error),

    #[error("failed to generate salt")]
    Salt,

    #[error("password hash error: {0}")]
    Hash(password_hash::Error),
}

/// Argon2id hasher with a fixed cost.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
    rng: SystemRandom,
    decoy: Arc<str>,
}

impl PasswordHasher {
    pub fn new(cost: HashingCost) -> Result<Self, PasswordError> {
        let params = Params::new(cost.memory_kib, cost.iterations, cost.parallelism, None)
            .map_err(PasswordError::Params)?;
        let mut hasher = Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
            rng: SystemRandom::new(),
            decoy: Arc::from(""),
        };
        hasher.decoy = Arc::from(hasher.hash(DECOY_PASSWORD)?);
        Ok(hasher)
    }

    /// A hash at the configured cost that belongs to no account. Verifying
    /// against it makes an unknown-email login cost the same as a wrong password.
    pub fn decoy_hash(&self) -> &str {
        &self.decoy
    }

    /// Hash a plaintext password with a fresh random salt.
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let mut salt_bytes = [0u8; SALT_LEN];
        self.rng
            .fill(&mut salt_bytes)
            .map_err(|_| PasswordError::Salt)?;
        let salt = SaltString::encode_b64(&salt_bytes).map_err(PasswordError::Hash)?;

        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(PasswordError::Hash)?;
        Ok(hash.to_string())
    }

    /// Check a plaintext password against a stored hash.
    ///
    /// A mismatch is `Ok(false)`; an unparseable stored hash is an error.
    pub fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, PasswordError> {
        let parsed = PasswordHash::new(stored_hash).map_err(PasswordError::Hash)?;
        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(PasswordError::Hash(e)),
        }
    }
}
