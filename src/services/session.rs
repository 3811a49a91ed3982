// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session lifecycle.
//!
//! [`SessionManager`] is the only supported way to change authentication
//! state. It derives "who is logged in" from the [`ApiClient`] and publishes
//! it through a `watch` channel that pages subscribe to.

use crate::error::{ApiError, Result};
use crate::models::{LoginCredentials, RegisterData, User, UserUpdate};
use crate::services::api::ApiClient;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Loading,
    Authenticated,
    Anonymous,
}

/// Client-side authentication state. A user is present exactly when authenticated.
#[derive(Debug, Clone, PartialEq)]
pub enum Session {
    Loading,
    Authenticated(User),
    Anonymous,
}

impl Session {
    pub fn status(&self) -> SessionStatus {
        match self {
            Session::Loading => SessionStatus::Loading,
            Session::Authenticated(_) => SessionStatus::Authenticated,
            Session::Anonymous => SessionStatus::Anonymous,
        }
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            Session::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated(_))
    }
}

/// Snapshot published to subscribers.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub session: Session,
    /// Raised while an operation whose [`Operation::toggles_loading`] is set
    /// runs; protected UI waits on it.
    pub is_loading: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            session: Session::Loading,
            is_loading: true,
        }
    }
}

// ─── Failure Policy ──────────────────────────────────────────────────────────

/// Session-affecting operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Initialize,
    Login,
    Register,
    Logout,
    UpdateProfile,
    RefreshUser,
}

/// What happens to a failed operation's error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Notify the user and return the error to the caller.
    Surface,
    /// Log it; the operation still ends in a defined state.
    Absorb,
}

impl Operation {
    pub const fn failure_policy(self) -> FailurePolicy {
        match self {
            Operation::Login | Operation::Register | Operation::UpdateProfile => {
                FailurePolicy::Surface
            }
            Operation::Initialize | Operation::Logout | Operation::RefreshUser => {
                FailurePolicy::Absorb
            }
        }
    }

    /// Whether the loading indicator is raised while the operation runs.
    pub const fn toggles_loading(self) -> bool {
        matches!(self, Operation::Initialize | Operation::Login)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Operation::Initialize => "initialize",
            Operation::Login => "login",
            Operation::Register => "register",
            Operation::Logout => "logout",
            Operation::UpdateProfile => "update_profile",
            Operation::RefreshUser => "refresh_user",
        }
    }

    /// Fallback shown when an error carries no message of its own.
    const fn failure_message(self) -> &'static str {
        match self {
            Operation::Initialize => "Session check failed",
            Operation::Login => "Login failed",
            Operation::Register => "Registration failed",
            Operation::Logout => "Logout failed",
            Operation::UpdateProfile => "Profile update failed",
            Operation::RefreshUser => "Failed to refresh user data",
        }
    }
}

// ─── Notifications ───────────────────────────────────────────────────────────

/// User-facing success and failure notices.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

/// Notifier that only logs.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, message: &str) {
        tracing::info!(notice = message, "Success");
    }

    fn error(&self, message: &str) {
        tracing::error!(notice = message, "Error");
    }
}

// ─── SessionManager ──────────────────────────────────────────────────────────

/// Owns the session and the operations that change it.
///
/// Operations are serialized: each holds `op_lock` for its whole duration, so
/// overlapping calls run in invocation order and the last one invoked decides
/// the final state. Plain data calls through [`SessionManager::client`] are
/// not serialized.
pub struct SessionManager {
    client: Arc<ApiClient>,
    notifier: Arc<dyn Notifier>,
    state: watch::Sender<SessionState>,
    op_lock: Mutex<()>,
}

impl SessionManager {
    /// Create a manager in the `Loading` state. Call [`initialize`](Self::initialize) next.
    pub fn new(client: Arc<ApiClient>, notifier: Arc<dyn Notifier>) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self {
            client,
            notifier,
            state,
            op_lock: Mutex::new(()),
        }
    }

    pub fn with_tracing(client: Arc<ApiClient>) -> Self {
        Self::new(client, Arc::new(TracingNotifier))
    }

    /// Client for data calls (recipes, pantry, meal plans, search).
    pub fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn session(&self) -> Session {
        self.state.borrow().session.clone()
    }

    pub fn user(&self) -> Option<User> {
        self.state.borrow().session.user().cloned()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().session.is_authenticated()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    fn set_session(&self, session: Session) {
        self.state.send_modify(|s| s.session = session);
    }

    /// Raise the loading flag if `op` gates protected UI.
    fn begin(&self, op: Operation) {
        if op.toggles_loading() {
            self.state.send_modify(|s| s.is_loading = true);
        }
    }

    fn finish(&self, op: Operation) {
        if op.toggles_loading() {
            self.state.send_modify(|s| s.is_loading = false);
        }
    }

    /// Log and notify a failure according to the operation's policy.
    ///
    /// Surfaced failures reach the user through the notifier; absorbed ones
    /// are only logged.
    fn report(&self, op: Operation, err: &ApiError) {
        match op.failure_policy() {
            FailurePolicy::Surface => {
                tracing::error!(operation = op.name(), error = %err, "Session operation failed");
                let message = err.to_string();
                self.notifier.error(if message.is_empty() {
                    op.failure_message()
                } else {
                    &message
                });
            }
            FailurePolicy::Absorb => {
                tracing::warn!(
                    operation = op.name(),
                    error = %err,
                    "{}",
                    op.failure_message()
                );
            }
        }
    }

    // ─── Operations ──────────────────────────────────────────────────────────

    /// Validate any persisted token and settle on `Authenticated` or `Anonymous`.
    ///
    /// Never leaves the session in `Loading`.
    pub async fn initialize(&self) -> Session {
        let _guard = self.op_lock.lock().await;
        self.begin(Operation::Initialize);

        let session = match self.client.restore_token() {
            Ok(Some(_)) => match self.client.get_current_user().await {
                Ok(user) => {
                    tracing::info!(user_id = user.id, "Restored session");
                    Session::Authenticated(user)
                }
                Err(e) => {
                    self.report(Operation::Initialize, &e);
                    // Stored token is invalid or expired
                    if let Err(e) = self.client.clear_token() {
                        tracing::warn!(error = %e, "Failed to clear stored token");
                    }
                    Session::Anonymous
                }
            },
            Ok(None) => Session::Anonymous,
            Err(e) => {
                self.report(Operation::Initialize, &e);
                Session::Anonymous
            }
        };

        self.set_session(session.clone());
        self.finish(Operation::Initialize);
        session
    }

    /// Log in, then fetch the profile. On failure the session is unchanged.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<User> {
        let _guard = self.op_lock.lock().await;
        self.begin(Operation::Login);

        let previous_token = self.client.access_token();
        let result = match self.client.login(credentials).await {
            Ok(_) => match self.client.get_current_user().await {
                Ok(user) => Ok(user),
                Err(e) => {
                    self.restore_previous_token(previous_token);
                    Err(e)
                }
            },
            Err(e) => Err(e),
        };

        let outcome = match result {
            Ok(user) => {
                tracing::info!(user_id = user.id, "Logged in");
                self.set_session(Session::Authenticated(user.clone()));
                self.notifier.success("Successfully logged in!");
                Ok(user)
            }
            Err(e) => {
                self.report(Operation::Login, &e);
                Err(e)
            }
        };

        self.finish(Operation::Login);
        outcome
    }

    /// Put back the credential that was active before a half-finished login.
    fn restore_previous_token(&self, previous: Option<String>) {
        let restored = match previous {
            Some(token) => self.client.set_token(&token),
            None => self.client.clear_token(),
        };
        if let Err(e) = restored {
            tracing::warn!(error = %e, "Failed to restore previous token");
        }
    }

    /// Create an account. Does not log in.
    pub async fn register(&self, data: &RegisterData) -> Result<User> {
        let _guard = self.op_lock.lock().await;
        self.begin(Operation::Register);

        let outcome = match self.client.register(data).await {
            Ok(user) => {
                tracing::info!(user_id = user.id, "Registered");
                self.notifier.success("Registration successful! Please log in.");
                Ok(user)
            }
            Err(e) => {
                self.report(Operation::Register, &e);
                Err(e)
            }
        };

        self.finish(Operation::Register);
        outcome
    }

    /// Log out. Always ends `Anonymous` with no stored tokens.
    pub async fn logout(&self) {
        let _guard = self.op_lock.lock().await;
        self.begin(Operation::Logout);

        if let Err(e) = self.client.logout().await {
            self.report(Operation::Logout, &e);
        }

        self.set_session(Session::Anonymous);
        self.finish(Operation::Logout);
        self.notifier.success("Successfully logged out");
    }

    /// Send a partial profile update and adopt the server's record.
    pub async fn update_profile(&self, update: &UserUpdate) -> Result<User> {
        let _guard = self.op_lock.lock().await;
        self.begin(Operation::UpdateProfile);

        let outcome = match self.client.update_profile(update).await {
            Ok(user) => {
                let replaced = self.state.send_if_modified(|s| {
                    if s.session.is_authenticated() {
                        s.session = Session::Authenticated(user.clone());
                        true
                    } else {
                        false
                    }
                });
                if !replaced {
                    tracing::warn!("Profile updated while not authenticated, session unchanged");
                }
                self.notifier.success("Profile updated successfully!");
                Ok(user)
            }
            Err(e) => {
                self.report(Operation::UpdateProfile, &e);
                Err(e)
            }
        };

        self.finish(Operation::UpdateProfile);
        outcome
    }

    /// Re-fetch the current user. No-op unless authenticated; failures are logged only.
    pub async fn refresh_user(&self) {
        let _guard = self.op_lock.lock().await;

        if !self.is_authenticated() {
            return;
        }
        self.begin(Operation::RefreshUser);

        match self.client.get_current_user().await {
            Ok(user) => self.set_session(Session::Authenticated(user)),
            Err(e) => self.report(Operation::RefreshUser, &e),
        }
        self.finish(Operation::RefreshUser);
    }
}
