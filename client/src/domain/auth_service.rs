//! Sign-up, sign-in and sign-out use-cases.
//!
//! The auth client is the only writer of the session store. Each attempt is
//! terminal: a rejection or transport failure leaves the form as it was and
//! the user resubmits. Concurrent submissions are not de-duplicated.

use std::sync::Arc;

use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

use crate::domain::ports::{
    AuthGateway, AuthReply, AuthView, GatewayError, Navigator, SessionStore, SessionStoreError,
    View,
};
use crate::domain::{
    CredentialValidationError, GENERIC_FAILURE, Session, SigninCredentials, SignupCredentials,
    UserIdentifier,
};

/// Confirmation raised after a successful sign-up.
pub const SIGNUP_NOTICE: &str = "Sign-up successful! Redirecting to dashboard...";
/// Confirmation raised after a successful sign-in.
pub const SIGNIN_NOTICE: &str = "Login successful! Redirecting to dashboard...";
/// Status shown after the session is cleared.
pub const SIGNOUT_STATUS: &str = "Signed out.";

/// Result of one auth attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// The session was stored and navigation happened.
    SignedIn(Session),
    /// The attempt failed; the reason is already on the status line.
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AuthAction {
    SignUp,
    SignIn,
}

impl AuthAction {
    const fn as_str(self) -> &'static str {
        match self {
            Self::SignUp => "signup",
            Self::SignIn => "signin",
        }
    }

    const fn notice(self) -> &'static str {
        match self {
            Self::SignUp => SIGNUP_NOTICE,
            Self::SignIn => SIGNIN_NOTICE,
        }
    }
}

/// Auth use-case service.
#[derive(Clone)]
pub struct AuthClient<S, G, V, N> {
    sessions: Arc<S>,
    gateway: Arc<G>,
    view: Arc<V>,
    navigator: Arc<N>,
}

impl<S, G, V, N> AuthClient<S, G, V, N> {
    /// Create a client over the given ports.
    #[must_use]
    pub const fn new(sessions: Arc<S>, gateway: Arc<G>, view: Arc<V>, navigator: Arc<N>) -> Self {
        Self {
            sessions,
            gateway,
            view,
            navigator,
        }
    }
}

impl<S, G, V, N> AuthClient<S, G, V, N>
where
    S: SessionStore,
    G: AuthGateway,
    V: AuthView,
    N: Navigator,
{
    /// Register a new account from raw form values.
    pub async fn signup(&self, name: &str, email: &str, password: &str) -> AuthOutcome {
        let action = AuthAction::SignUp;
        let credentials = match SignupCredentials::try_from_parts(name, email, password) {
            Ok(credentials) => credentials,
            Err(error) => return self.reject_locally(action, &error),
        };

        let span = info_span!("auth.signup", request_id = %Uuid::new_v4());
        let reply = self
            .gateway
            .sign_up(&credentials)
            .instrument(span.clone())
            .await;
        span.in_scope(|| self.complete(action, credentials.email().clone(), reply))
    }

    /// Sign in to an existing account from raw form values.
    pub async fn signin(&self, email: &str, password: &str) -> AuthOutcome {
        let action = AuthAction::SignIn;
        let credentials = match SigninCredentials::try_from_parts(email, password) {
            Ok(credentials) => credentials,
            Err(error) => return self.reject_locally(action, &error),
        };

        let span = info_span!("auth.signin", request_id = %Uuid::new_v4());
        let reply = self
            .gateway
            .sign_in(&credentials)
            .instrument(span.clone())
            .await;
        span.in_scope(|| self.complete(action, credentials.email().clone(), reply))
    }

    /// Forget the stored session and return to the landing view.
    ///
    /// # Errors
    ///
    /// Returns the store error when the session cannot be removed; nothing
    /// is rendered or navigated in that case.
    pub fn signout(&self) -> Result<(), SessionStoreError> {
        self.sessions.clear()?;
        info!("session cleared");
        self.view.show_status(SIGNOUT_STATUS);
        self.navigator.navigate(View::Landing);
        Ok(())
    }

    fn reject_locally(&self, action: AuthAction, error: &CredentialValidationError) -> AuthOutcome {
        info!(action = action.as_str(), reason = %error, "credential form incomplete");
        self.view.show_status(error.status_message());
        AuthOutcome::Rejected
    }

    fn complete(
        &self,
        action: AuthAction,
        identifier: UserIdentifier,
        reply: Result<AuthReply, GatewayError>,
    ) -> AuthOutcome {
        match reply {
            Ok(AuthReply::Accepted) => self.establish(action, identifier),
            Ok(AuthReply::Rejected { message }) => {
                info!(action = action.as_str(), "backend rejected credentials");
                self.view
                    .show_status(message.as_deref().unwrap_or(GENERIC_FAILURE));
                AuthOutcome::Rejected
            }
            Err(error) => {
                warn!(action = action.as_str(), error = %error, "auth request failed");
                self.view.show_status(&format!("Network error: {error}"));
                AuthOutcome::Rejected
            }
        }
    }

    fn establish(&self, action: AuthAction, identifier: UserIdentifier) -> AuthOutcome {
        let session = Session::new(identifier);
        if let Err(error) = self.sessions.set(&session) {
            warn!(action = action.as_str(), error = %error, "failed to persist session");
            self.view
                .show_status(&format!("Unable to save session: {error}"));
            return AuthOutcome::Rejected;
        }

        info!(action = action.as_str(), user = %session.identifier(), "session established");
        self.view.notify(action.notice());
        self.navigator.navigate(View::Dashboard);
        AuthOutcome::SignedIn(session)
    }
}

#[cfg(test)]
#[path = "auth_service_tests.rs"]
mod tests;
