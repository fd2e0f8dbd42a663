//! Session primitives shared by the auth and workflow services.
//!
//! A session is nothing more than the signed-in user's email address. It is
//! sent verbatim as the `email` field of every workflow request and is an
//! account key, not a credential.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Validation error raised when a session identifier is blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionValidationError {
    /// Identifier was missing or blank once trimmed.
    EmptyIdentifier,
}

impl fmt::Display for SessionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyIdentifier => write!(f, "session identifier must not be empty"),
        }
    }
}

impl std::error::Error for SessionValidationError {}

/// Identifier of the signed-in user.
///
/// ## Invariants
/// - Trimmed and non-empty.
///
/// # Examples
/// ```
/// use codelab_client::domain::UserIdentifier;
///
/// let id = UserIdentifier::new("  a@x.com ").unwrap();
/// assert_eq!(id.as_str(), "a@x.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserIdentifier(String);

impl UserIdentifier {
    /// Validate and construct an identifier from raw input.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, SessionValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(SessionValidationError::EmptyIdentifier);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the identifier text.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for UserIdentifier {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for UserIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for UserIdentifier {
    type Error = SessionValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserIdentifier> for String {
    fn from(value: UserIdentifier) -> Self {
        value.0
    }
}

/// Record of the signed-in user held by a session store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    identifier: UserIdentifier,
}

impl Session {
    /// Create a session for the given user.
    #[must_use]
    pub const fn new(identifier: UserIdentifier) -> Self {
        Self { identifier }
    }

    /// Identifier used as the account key for workflow calls.
    #[must_use]
    pub const fn identifier(&self) -> &UserIdentifier {
        &self.identifier
    }
}
