//! Client authentication subsystem.
//!
//! Manages the single local session of a client application: a persisted
//! bearer token, the in-memory user profile, and the transitions between
//! anonymous/authenticating/authenticated states driven by asynchronous
//! calls to a remote credential service.
//!
//! ## Design
//! - [`session::SessionStore`] is the state machine. Its collaborators
//!   (credential API, notifier, navigator, token store) are
//!   constructor-injected trait objects, so the store is unit-testable
//!   with fakes and carries no process-wide singletons.
//! - [`api::CredentialApi`] is the request/response contract to the remote
//!   service; [`api::HttpCredentialApi`] is the reqwest implementation.
//!   Business rejections (`success = false` envelopes) are ordinary `Ok`
//!   values the store branches on; transport failures are `Err`.
//! - [`validate`] holds the pure pre-submission form checks. Validation
//!   errors never reach the network layer.
//! - Exactly one session per store instance. Callers serialize
//!   authentication-affecting operations; the loading flag is an
//!   indicator, not a lock.

pub mod api;
pub mod config;
pub mod session;
pub mod surface;
pub mod validate;

pub use api::{ApiError, ApiResponse, CredentialApi, HttpCredentialApi, User};
pub use config::AuthConfig;
pub use session::{
    FileTokenStore, MemoryTokenStore, OpOutcome, SessionPhase, SessionStore, TokenStore,
};
pub use surface::{Navigator, Notifier, Route};
