// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - transport and session layers.

pub mod api;
pub mod session;

pub use api::{ApiClient, RequestOptions};
pub use session::{
    FailurePolicy, Notifier, Operation, Session, SessionManager, SessionState, SessionStatus,
    TracingNotifier,
};
