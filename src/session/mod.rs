//! The local session: token persistence and the session state machine.
//!
//! Provides:
//! - [`SessionStore`] — the state machine owning the bearer token, the
//!   in-memory profile, and the loading flag
//! - [`TokenStore`] — durable single-slot token persistence, with a
//!   file-backed and an in-memory implementation
//!
//! ## Design Decisions
//! - One session per store instance; the store lives for the process
//!   lifetime and cycles between anonymous and authenticated, it is
//!   never destroyed.
//! - The token is the only persisted session datum. The profile is
//!   re-fetched on startup, never written to disk.

pub mod store;
pub mod token;

pub use store::{OpOutcome, SessionPhase, SessionStore};
pub use token::{FileTokenStore, MemoryTokenStore, TokenStore};
