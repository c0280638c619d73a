// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session store: who is logged in, and the operations that change it.
//!
//! The store is the only writer of persisted credentials and the only
//! component that sets the gateway's bearer token. State is broadcast over a
//! `watch` channel; user and token are replaced in the same update so no
//! observer ever sees a user without a token or the other way round.
//!
//! None of the public operations return transport errors. Login and
//! registration report failures through [`AuthFailure`]; logout and startup
//! verification always complete.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::{watch, Mutex, MutexGuard};
use validator::{Validate, ValidationErrors};

use crate::error::ClientError;
use crate::models::{ApiResponse, AuthPayload, LoginRequest, RegisterRequest, User};
use crate::services::guard::{self, GuardDecision, PageAccess};
use crate::services::navigation::{routes, Navigator};
use crate::services::AuthGateway;
use crate::storage::{keys, CredentialStore};

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// Nothing checked yet.
    #[default]
    Unknown,
    /// Reading persisted credentials / waiting on the service.
    Verifying,
    Authenticated,
    Unauthenticated,
}

/// Everything observers get to see.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub user: Option<User>,
    pub auth_token: Option<String>,
    pub is_loading: bool,
}

impl SessionSnapshot {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

/// Why a login or registration did not go through.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthFailure {
    /// The service said no; message passed through verbatim.
    #[error("{0}")]
    Rejected(String),

    /// Could not get an answer from the service.
    #[error("{}", ClientError::NETWORK_ERROR)]
    Network,

    /// Input failed client-side validation; nothing was sent.
    #[error("{0}")]
    Invalid(String),
}

const LOGIN_FAILED: &str = "Login failed";
const REGISTRATION_FAILED: &str = "Registration failed";

/// Authenticated-user lifecycle over an [`AuthGateway`].
pub struct SessionStore<G> {
    gateway: Arc<G>,
    storage: Arc<dyn CredentialStore>,
    navigator: Arc<dyn Navigator>,
    state: watch::Sender<SessionSnapshot>,
    /// Operations currently holding `is_loading` up.
    in_flight: AtomicUsize,
    /// Present only when session-mutating operations are serialized.
    op_lock: Option<Mutex<()>>,
}

impl<G: AuthGateway> SessionStore<G> {
    /// Empty session in the `Unknown` phase. Nothing is read until
    /// [`check_auth_status`](Self::check_auth_status) runs.
    pub fn new(
        gateway: Arc<G>,
        storage: Arc<dyn CredentialStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let (state, _) = watch::channel(SessionSnapshot::default());
        Self {
            gateway,
            storage,
            navigator,
            state,
            in_flight: AtomicUsize::new(0),
            op_lock: None,
        }
    }

    /// Serialize login/register/logout/verification instead of letting them
    /// race. Either way the last operation to finish decides the state.
    pub fn with_serialized_ops(mut self, serialize: bool) -> Self {
        self.op_lock = serialize.then(|| Mutex::new(()));
        self
    }

    // ─── Observation ─────────────────────────────────────────────────────────

    /// Receiver that sees every state change.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }

    pub fn current_user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    pub fn gateway(&self) -> &Arc<G> {
        &self.gateway
    }

    /// Apply a page's access rule to the current state, redirecting if the
    /// rule says so.
    pub fn enforce(&self, access: PageAccess) -> GuardDecision {
        let decision = guard::evaluate(access, &self.state.borrow());
        if let GuardDecision::Redirect(path) = decision {
            self.navigator.navigate(path);
        }
        decision
    }

    // ─── Operations ──────────────────────────────────────────────────────────

    /// Restore the session from persisted credentials.
    ///
    /// - No token or no user record: signed out.
    /// - Service confirms the token: signed in as the verified user.
    /// - Service rejects the token: persisted credentials cleared, signed out.
    /// - Service unreachable: signed in as the persisted user.
    pub async fn check_auth_status(&self) {
        let _serial = self.serialize().await;
        let _loading = self.begin_loading();
        self.state.send_modify(|s| s.phase = SessionPhase::Verifying);

        let Some((token, stored_user)) = self.read_credentials() else {
            self.sign_out();
            return;
        };

        self.gateway.set_token(Some(token.clone()));

        match self.gateway.verify_token().await {
            Ok(response) if response.success => {
                let user = response
                    .data
                    .and_then(|payload| payload.user)
                    .unwrap_or(stored_user);
                tracing::info!(user_id = %user.id, "Stored session verified");
                self.sign_in(user, token);
            }
            Ok(response) => {
                tracing::info!(
                    reason = response.failure_reason().unwrap_or("unspecified"),
                    "Stored session rejected"
                );
                self.sign_out();
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    transport = e.is_transport(),
                    user_id = %stored_user.id,
                    "Session verification failed, using stored user"
                );
                self.sign_in(stored_user, token);
            }
        }
    }

    /// Log in with email and password.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthFailure> {
        let credentials = LoginRequest::new(email, password);
        credentials.validate().map_err(|e| invalid(&e))?;

        let _serial = self.serialize().await;
        let _loading = self.begin_loading();

        let response = self
            .gateway
            .login_user(&credentials)
            .await
            .map_err(|e| request_failed("Login", e))?;

        self.adopt(response, LOGIN_FAILED)
    }

    /// Create an account and log in as it.
    pub async fn register(&self, user: &RegisterRequest) -> Result<User, AuthFailure> {
        user.validate().map_err(|e| invalid(&e))?;

        let _serial = self.serialize().await;
        let _loading = self.begin_loading();

        let response = self
            .gateway
            .register_user(user)
            .await
            .map_err(|e| request_failed("Registration", e))?;

        self.adopt(response, REGISTRATION_FAILED)
    }

    /// Log out.
    ///
    /// Tells the service when a token is held in memory or persisted (a
    /// logout can arrive before the stored session was restored), but
    /// cleans up locally no matter what it says. Always ends signed out
    /// with a redirect to the login page.
    pub async fn logout(&self) {
        {
            let _serial = self.serialize().await;
            let _loading = self.begin_loading();

            let held_token = self.state.borrow().auth_token.clone();
            let token = held_token
                .or_else(|| self.read_key(keys::TOKEN))
                .filter(|t| !t.is_empty());
            if let Some(token) = token {
                self.gateway.set_token(Some(token));
                if let Err(e) = self.gateway.logout_user().await {
                    tracing::warn!(error = %e, "Logout request failed, clearing local session anyway");
                }
            }

            self.sign_out();
            tracing::info!("Logged out");
        }

        self.navigator.navigate(routes::LOGIN);
    }

    // ─── Internals ───────────────────────────────────────────────────────────

    fn adopt(
        &self,
        response: ApiResponse<AuthPayload>,
        fallback: &str,
    ) -> Result<User, AuthFailure> {
        let reason = response.failure_reason().unwrap_or(fallback).to_string();

        let Some(AuthPayload { user, token }) = response.into_data() else {
            tracing::info!(reason = %reason, "Authentication refused");
            return Err(AuthFailure::Rejected(reason));
        };

        tracing::info!(user_id = %user.id, "Authenticated");
        self.sign_in(user.clone(), token);
        Ok(user)
    }

    async fn serialize(&self) -> Option<MutexGuard<'_, ()>> {
        match &self.op_lock {
            Some(lock) => Some(lock.lock().await),
            None => None,
        }
    }

    fn begin_loading(&self) -> LoadingGuard<'_> {
        self.state.send_modify(|s| {
            self.in_flight.fetch_add(1, Ordering::SeqCst);
            s.is_loading = true;
        });
        LoadingGuard {
            state: &self.state,
            in_flight: &self.in_flight,
        }
    }

    /// Storage, gateway token and snapshot change together, with no await in
    /// between.
    fn sign_in(&self, user: User, token: String) {
        self.write_credentials(&token, &user);
        self.gateway.set_token(Some(token.clone()));
        self.state.send_modify(|s| {
            s.phase = SessionPhase::Authenticated;
            s.user = Some(user);
            s.auth_token = Some(token);
        });
    }

    fn sign_out(&self) {
        self.clear_credentials();
        self.gateway.set_token(None);
        self.state.send_modify(|s| {
            s.phase = SessionPhase::Unauthenticated;
            s.user = None;
            s.auth_token = None;
        });
    }

    /// Persisted token and user, if both are present and readable. A partial
    /// or unreadable record is removed.
    fn read_credentials(&self) -> Option<(String, User)> {
        let token = self.read_key(keys::TOKEN);
        let user_json = self.read_key(keys::USER);

        let user = user_json.as_deref().and_then(|raw| {
            serde_json::from_str::<User>(raw)
                .map_err(|e| tracing::warn!(error = %e, "Discarding unreadable stored user"))
                .ok()
        });

        match (token, user) {
            (Some(token), Some(user)) if !token.is_empty() => Some((token, user)),
            (None, None) if user_json.is_none() => None,
            _ => {
                self.clear_credentials();
                None
            }
        }
    }

    fn read_key(&self, key: &str) -> Option<String> {
        self.storage.get(key).unwrap_or_else(|e| {
            tracing::error!(error = %e, key, "Credential read failed");
            None
        })
    }

    fn write_credentials(&self, token: &str, user: &User) {
        let user_json = match serde_json::to_string(user) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize user record");
                return;
            }
        };

        if let Err(e) = self
            .storage
            .set_all(&[(keys::TOKEN, token), (keys::USER, &user_json)])
        {
            tracing::error!(error = %e, "Failed to persist credentials");
        }
    }

    fn clear_credentials(&self) {
        if let Err(e) = self.storage.delete_all(&[keys::TOKEN, keys::USER]) {
            tracing::error!(error = %e, "Failed to clear persisted credentials");
        }
    }
}

/// Keeps `is_loading` true until dropped.
struct LoadingGuard<'a> {
    state: &'a watch::Sender<SessionSnapshot>,
    in_flight: &'a AtomicUsize,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.state.send_modify(|s| {
            let remaining = self.in_flight.fetch_sub(1, Ordering::SeqCst) - 1;
            s.is_loading = remaining > 0;
        });
    }
}

/// Transport failures become `Network`; anything else the gateway refused
/// to send is reported like a validation failure.
fn request_failed(operation: &str, err: ClientError) -> AuthFailure {
    tracing::warn!(error = %err, operation, "Auth request failed");
    if err.is_transport() {
        AuthFailure::Network
    } else {
        AuthFailure::Invalid(err.to_string())
    }
}

/// First human-readable validation message, by field name.
fn invalid(errors: &ValidationErrors) -> AuthFailure {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    let message = fields
        .iter()
        .flat_map(|(_, errs)| errs.iter())
        .find_map(|e| e.message.as_ref().map(ToString::to_string))
        .unwrap_or_else(|| errors.to_string());

    AuthFailure::Invalid(message)
}
