//! Session state machine.
//!
//! Owns the bearer token, the cached user profile, and the loading flag,
//! and orchestrates the credential API on behalf of the UI: sign-in,
//! registration, logout, profile refresh, startup restoration, and the
//! session-orthogonal password-reset and code-request flows.
//!
//! ## Design
//! - Collaborators are constructor-injected trait objects
//!   ([`CredentialApi`], [`Notifier`], [`Navigator`], [`TokenStore`]),
//!   so the store is unit-testable with fakes and holds no globals.
//! - The loading flag is acquired immediately before each network call
//!   and released by a scope guard on every exit path — success, business
//!   rejection, or transport failure — before any notification or
//!   navigation fires.
//! - The flag is an indicator, not a lock: callers are expected to
//!   serialize authentication-affecting operations (typically by
//!   disabling the triggering control while loading is true).
//! - Clearing the token always clears the profile in the same operation;
//!   a profile never outlives its token.

use parking_lot::Mutex;
use std::sync::Arc;

use crate::api::{
    ApiResult, AuthGrant, CredentialApi, LoginParams, RegisterParams, ResetPasswordParams,
    SendCodeParams, User, WechatLoginParams,
};
use crate::session::TokenStore;
use crate::surface::{Navigator, Notifier, Route};

const MSG_LOGIN_OK: &str = "Signed in";
const MSG_LOGIN_FAILED: &str = "Sign-in failed, please try again";
const MSG_REGISTER_OK: &str = "Account created";
const MSG_REGISTER_FAILED: &str = "Registration failed, please try again";
const MSG_LOGOUT_OK: &str = "Signed out";
const MSG_RESET_OK: &str = "Password reset";
const MSG_RESET_REJECTED: &str = "Password reset failed";
const MSG_RESET_FAILED: &str = "Password reset failed, please try again";
const MSG_CODE_SENT: &str = "Verification code sent";
const MSG_CODE_REJECTED: &str = "Could not send verification code";
const MSG_CODE_FAILED: &str = "Could not send verification code, please try again";

// ── State ────────────────────────────────────────────────────────

/// Where the session currently stands, derived from (token, loading).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No token, nothing in flight.
    Anonymous,
    /// No token, a sign-in or registration is in flight.
    Authenticating,
    /// Token present, nothing in flight.
    Authenticated,
    /// Token present, a token-bearing operation is in flight.
    Refreshing,
}

/// Result pair for session-orthogonal operations (password reset,
/// verification codes): the caller decides how to display it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpOutcome {
    pub success: bool,
    pub message: String,
}

struct SessionState {
    token: Option<String>,
    profile: Option<User>,
    loading: bool,
}

// ── Store ────────────────────────────────────────────────────────

/// The single local session of a client instance.
pub struct SessionStore {
    state: Mutex<SessionState>,
    api: Arc<dyn CredentialApi>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    tokens: Arc<dyn TokenStore>,
}

impl SessionStore {
    /// Construct the session, restoring any persisted token. The profile
    /// is not restored here; call [`SessionStore::initialize`] at startup
    /// to verify the token and re-fetch it.
    pub fn new(
        api: Arc<dyn CredentialApi>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
        tokens: Arc<dyn TokenStore>,
    ) -> Self {
        let token = tokens.load().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "failed to read persisted token");
            None
        });

        Self {
            state: Mutex::new(SessionState {
                token,
                profile: None,
                loading: false,
            }),
            api,
            notifier,
            navigator,
            tokens,
        }
    }

    // ── Accessors ───────────────────────────────────────────────

    pub fn token(&self) -> Option<String> {
        self.state.lock().token.clone()
    }

    pub fn profile(&self) -> Option<User> {
        self.state.lock().profile.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.lock().token.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().loading
    }

    pub fn phase(&self) -> SessionPhase {
        let state = self.state.lock();
        match (state.token.is_some(), state.loading) {
            (false, false) => SessionPhase::Anonymous,
            (false, true) => SessionPhase::Authenticating,
            (true, false) => SessionPhase::Authenticated,
            (true, true) => SessionPhase::Refreshing,
        }
    }

    // ── Direct mutations ────────────────────────────────────────

    /// Adopt a token: in-memory first, then persisted. Persistence
    /// failures are logged, not surfaced — the in-memory session stays
    /// valid for the rest of the process.
    pub fn set_token(&self, token: &str) {
        self.state.lock().token = Some(token.to_string());
        if let Err(err) = self.tokens.save(token) {
            tracing::warn!(error = %err, "failed to persist session token");
        }
    }

    /// Drop token and profile together and remove the persisted copy.
    pub fn clear_token(&self) {
        {
            let mut state = self.state.lock();
            state.token = None;
            state.profile = None;
        }
        if let Err(err) = self.tokens.clear() {
            tracing::warn!(error = %err, "failed to clear persisted token");
        }
    }

    /// Replace the cached profile wholesale.
    pub fn set_profile(&self, user: User) {
        self.state.lock().profile = Some(user);
    }

    // ── Operations ──────────────────────────────────────────────

    /// Sign in with email/password, phone/code, or a wechat grant.
    /// On success: token persisted, profile replaced, success notified,
    /// navigation to home. On rejection or transport failure the session
    /// stays anonymous and the user sees the server message or a generic
    /// fallback.
    pub async fn login(&self, params: LoginParams) -> bool {
        let outcome = {
            let _busy = self.begin_op();
            self.api.login(&params).await
        };
        self.settle_grant(outcome, "login", MSG_LOGIN_OK, MSG_LOGIN_FAILED)
    }

    /// Exchange a wechat OAuth grant for a session. Same outcome handling
    /// as [`SessionStore::login`].
    pub async fn wechat_login(&self, params: WechatLoginParams) -> bool {
        let outcome = {
            let _busy = self.begin_op();
            self.api.wechat_login(&params).await
        };
        self.settle_grant(outcome, "wechat login", MSG_LOGIN_OK, MSG_LOGIN_FAILED)
    }

    /// Create an account. Mirrors login's transitions and exit paths.
    pub async fn register(&self, params: RegisterParams) -> bool {
        let outcome = {
            let _busy = self.begin_op();
            self.api.register(&params).await
        };
        self.settle_grant(outcome, "register", MSG_REGISTER_OK, MSG_REGISTER_FAILED)
    }

    /// End the session. The remote call is attempted but its failure is
    /// only logged: the local session ends unconditionally, and the user
    /// lands on the login screen either way.
    pub async fn logout(&self) {
        let outcome = {
            let _busy = self.begin_op();
            self.api.logout().await
        };
        match outcome {
            Ok(resp) if !resp.success => {
                tracing::debug!(
                    reason = resp.message.as_deref().unwrap_or_default(),
                    "remote logout rejected"
                );
            }
            Err(err) => tracing::warn!(error = %err, "logout request failed"),
            Ok(_) => {}
        }

        self.clear_token();
        self.notifier.notify_success(MSG_LOGOUT_OK);
        self.navigator.navigate_to(Route::Login);
    }

    /// Re-fetch the profile for the current token. Returns false on any
    /// failure without touching the token; the caller decides whether a
    /// stale profile is acceptable.
    pub async fn fetch_profile(&self) -> bool {
        let outcome = {
            let _busy = self.begin_op();
            self.api.fetch_profile().await
        };
        match outcome {
            Ok(resp) => match (resp.success, resp.data) {
                (true, Some(user)) => {
                    self.set_profile(user);
                    true
                }
                _ => false,
            },
            Err(err) => {
                tracing::warn!(error = %err, "profile fetch failed");
                false
            }
        }
    }

    /// Startup restoration. Without a persisted token this returns false
    /// immediately, with no network call. With one, the profile fetch
    /// doubles as token verification: a failure silently downgrades to
    /// anonymous.
    pub async fn initialize(&self) -> bool {
        if !self.is_authenticated() {
            return false;
        }

        let fetched = self.fetch_profile().await;
        if !fetched {
            self.clear_token();
        }
        fetched
    }

    /// Swap the current token for a fresh one. Silent: no notification,
    /// no navigation. Any failure leaves the current token in place.
    pub async fn refresh_token(&self) -> bool {
        if !self.is_authenticated() {
            return false;
        }

        let outcome = {
            let _busy = self.begin_op();
            self.api.refresh_token().await
        };
        match outcome {
            Ok(resp) => match (resp.success, resp.data) {
                (true, Some(refresh)) => {
                    self.set_token(&refresh.token);
                    true
                }
                _ => false,
            },
            Err(err) => {
                tracing::warn!(error = %err, "token refresh failed");
                false
            }
        }
    }

    /// Reset a password by phone + verification code. Orthogonal to the
    /// session state machine: the target account need not be the current
    /// session's, so token and profile are never touched.
    pub async fn reset_password(&self, params: ResetPasswordParams) -> OpOutcome {
        let outcome = {
            let _busy = self.begin_op();
            self.api.reset_password(&params).await
        };
        match outcome {
            Ok(resp) if resp.success => {
                self.notifier.notify_success(MSG_RESET_OK);
                OpOutcome {
                    success: true,
                    message: MSG_RESET_OK.to_string(),
                }
            }
            Ok(resp) => OpOutcome {
                success: false,
                message: resp.message.unwrap_or_else(|| MSG_RESET_REJECTED.to_string()),
            },
            Err(err) => {
                tracing::warn!(error = %err, "password reset request failed");
                OpOutcome {
                    success: false,
                    message: MSG_RESET_FAILED.to_string(),
                }
            }
        }
    }

    /// Request a verification code. No state mutation, no notification;
    /// the caller drives the resend countdown from the outcome.
    pub async fn send_code(&self, params: SendCodeParams) -> OpOutcome {
        let outcome = {
            let _busy = self.begin_op();
            self.api.send_code(&params).await
        };
        match outcome {
            Ok(resp) if resp.success => OpOutcome {
                success: true,
                message: MSG_CODE_SENT.to_string(),
            },
            Ok(resp) => OpOutcome {
                success: false,
                message: resp.message.unwrap_or_else(|| MSG_CODE_REJECTED.to_string()),
            },
            Err(err) => {
                tracing::warn!(error = %err, "send code request failed");
                OpOutcome {
                    success: false,
                    message: MSG_CODE_FAILED.to_string(),
                }
            }
        }
    }

    // ── Internals ───────────────────────────────────────────────

    /// Raise the loading flag; the returned guard lowers it on drop, so
    /// every exit path — including panics in response handling — releases
    /// it before notifications or navigation run.
    fn begin_op(&self) -> impl Drop + '_ {
        self.state.lock().loading = true;
        scopeguard::guard(&self.state, |state| state.lock().loading = false)
    }

    /// Shared outcome handling for the three grant-producing operations.
    /// A `success = true` envelope without a grant payload counts as a
    /// rejection.
    fn settle_grant(
        &self,
        outcome: ApiResult<AuthGrant>,
        op: &'static str,
        ok_msg: &str,
        fallback: &str,
    ) -> bool {
        match outcome {
            Ok(resp) => match (resp.success, resp.data) {
                (true, Some(grant)) => {
                    self.set_token(&grant.token);
                    self.set_profile(grant.user);
                    self.notifier.notify_success(ok_msg);
                    self.navigator.navigate_to(Route::Home);
                    true
                }
                _ => {
                    let message = resp.message.unwrap_or_else(|| fallback.to_string());
                    self.notifier.notify_error(&message);
                    false
                }
            },
            Err(err) => {
                tracing::warn!(error = %err, "{op} request failed");
                self.notifier.notify_error(fallback);
                false
            }
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────
