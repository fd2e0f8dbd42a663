//! Driven port for the single persisted session record.
//!
//! Stores are synchronous: a read reflects the last successful write
//! immediately. Absence is the only "signed out" signal; there is no expiry.

use super::define_port_error;
use crate::domain::Session;

/// Fixed storage key holding the signed-in user's email.
pub const SESSION_STORAGE_KEY: &str = "userEmail";

define_port_error! {
    /// Errors surfaced by session storage backends.
    pub enum SessionStoreError {
        /// The storage medium could not be read or written.
        Io {
            /// Underlying I/O error text.
            message: String,
        } => "session storage unavailable: {message}",
        /// A stored record exists but cannot be decoded.
        Corrupt {
            /// Decoder error text.
            message: String,
        } => "stored session is unreadable: {message}",
    }
}

/// Port owning the persisted session.
///
/// The auth client is the only writer; workflow operations only read.
#[cfg_attr(test, mockall::automock)]
pub trait SessionStore: Send + Sync {
    /// Return the current session, if any.
    fn get(&self) -> Result<Option<Session>, SessionStoreError>;

    /// Replace the current session.
    fn set(&self, session: &Session) -> Result<(), SessionStoreError>;

    /// Remove the current session.
    fn clear(&self) -> Result<(), SessionStoreError>;
}
