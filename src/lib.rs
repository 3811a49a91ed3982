// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! MealMate client: a session-authenticated API client for the MealMate
//! recipe and meal-planning backend.
//!
//! [`ApiClient`] issues typed, token-authenticated requests and normalizes
//! their failures; [`SessionManager`] derives application-wide
//! authentication state from it.

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod store;

pub use config::Config;
pub use error::ApiError;
pub use services::{ApiClient, Session, SessionManager, SessionStatus};
