//! Switching between the sign-up and sign-in forms.

use std::sync::Arc;

use crate::domain::ports::AuthView;

/// Which credential form is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// The sign-up form.
    Signup,
    /// The sign-in form.
    Signin,
}

impl ViewMode {
    /// Title label shown above the visible form.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Signup => "Sign Up",
            Self::Signin => "Sign In",
        }
    }
}

/// Presentational controller for the credential forms. Never touches the
/// network.
pub struct ViewModeController<V> {
    view: Arc<V>,
}

impl<V> ViewModeController<V>
where
    V: AuthView,
{
    /// Create a controller driving `view`.
    #[must_use]
    pub const fn new(view: Arc<V>) -> Self {
        Self { view }
    }

    /// Show the form for `mode`, retitle it and clear any stale status.
    ///
    /// Idempotent: repeating a mode leaves the same visible state.
    pub fn toggle(&self, mode: ViewMode) {
        self.view.clear_status();
        self.view.set_title(mode.title());
        self.view.show_form(mode);
    }
}
