// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! WishMate - Personal Wishlist Tracker Service
//!
//! Users register with email and password, receive a session token, and
//! manage a private wishlist. Everything is persisted in one embedded redb
//! database.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Password hashing, session tokens and the authorization gate
//! - `service` - Identity and wishlist business operations
//! - `storage` - Embedded database and typed repositories

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod state;
pub mod storage;

#[cfg(test)]
pub(crate) mod test_support;
