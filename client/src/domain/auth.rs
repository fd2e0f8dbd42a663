//! Sign-up and sign-in credentials.
//!
//! Constructors validate raw form values before the auth client talks to the
//! gateway, so a blank field never reaches the network. Every field is
//! trimmed, the password included, and the trimmed values are what the
//! backend receives.

use std::fmt;

use zeroize::Zeroizing;

use crate::domain::UserIdentifier;

/// Status message shown when any credential field is blank.
pub const ALL_FIELDS_REQUIRED: &str = "All fields are required!";

/// Domain error returned when a credential form is incomplete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialValidationError {
    /// Display name was blank once trimmed.
    EmptyName,
    /// Email was blank once trimmed.
    EmptyEmail,
    /// Password was blank once trimmed.
    EmptyPassword,
}

impl CredentialValidationError {
    /// Message rendered in the status area for any missing field.
    #[must_use]
    pub const fn status_message(&self) -> &'static str {
        ALL_FIELDS_REQUIRED
    }
}

impl fmt::Display for CredentialValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for CredentialValidationError {}

fn required<'a>(
    raw: &'a str,
    missing: CredentialValidationError,
) -> Result<&'a str, CredentialValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        Err(missing)
    } else {
        Ok(trimmed)
    }
}

fn required_email(raw: &str) -> Result<UserIdentifier, CredentialValidationError> {
    UserIdentifier::new(raw).map_err(|_| CredentialValidationError::EmptyEmail)
}

/// Validated sign-up form.
///
/// ## Invariants
/// - `name`, `email` and `password` are trimmed and non-empty.
///
/// # Examples
/// ```
/// use codelab_client::domain::SignupCredentials;
///
/// let creds = SignupCredentials::try_from_parts(" A ", "a@x.com", "p").unwrap();
/// assert_eq!(creds.name(), "A");
/// assert_eq!(creds.email().as_str(), "a@x.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupCredentials {
    name: String,
    email: UserIdentifier,
    password: Zeroizing<String>,
}

impl SignupCredentials {
    /// Construct sign-up credentials from raw form values.
    pub fn try_from_parts(
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, CredentialValidationError> {
        let trimmed_name = required(name, CredentialValidationError::EmptyName)?;
        let identifier = required_email(email)?;
        let secret = required(password, CredentialValidationError::EmptyPassword)?;
        Ok(Self {
            name: trimmed_name.to_owned(),
            email: identifier,
            password: Zeroizing::new(secret.to_owned()),
        })
    }

    /// Display name for the new account.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Email that becomes the session identifier on success.
    #[must_use]
    pub const fn email(&self) -> &UserIdentifier {
        &self.email
    }

    /// Password supplied by the user.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated sign-in form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigninCredentials {
    email: UserIdentifier,
    password: Zeroizing<String>,
}

impl SigninCredentials {
    /// Construct sign-in credentials from raw form values.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialValidationError> {
        let identifier = required_email(email)?;
        let secret = required(password, CredentialValidationError::EmptyPassword)?;
        Ok(Self {
            email: identifier,
            password: Zeroizing::new(secret.to_owned()),
        })
    }

    /// Email that becomes the session identifier on success.
    #[must_use]
    pub const fn email(&self) -> &UserIdentifier {
        &self.email
    }

    /// Password supplied by the user.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}
