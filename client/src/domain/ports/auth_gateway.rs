//! Driven port for the sign-up and sign-in endpoints.

use async_trait::async_trait;

use super::GatewayError;
use crate::domain::{SigninCredentials, SignupCredentials};

/// Backend verdict on a sign-up or sign-in attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthReply {
    /// The backend reported success.
    Accepted,
    /// The backend refused the attempt.
    Rejected {
        /// Human-readable reason, when the backend supplied one.
        message: Option<String>,
    },
}

/// Port for submitting credentials to the backend.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Register a new account.
    async fn sign_up(&self, credentials: &SignupCredentials) -> Result<AuthReply, GatewayError>;

    /// Authenticate an existing account.
    async fn sign_in(&self, credentials: &SigninCredentials) -> Result<AuthReply, GatewayError>;
}
