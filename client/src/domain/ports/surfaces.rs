//! Driven ports for the rendering surfaces.
//!
//! These stand in for the page regions the client writes to: the sign-up
//! and sign-in forms with their title and status line, the shared workflow
//! output region, and client-side navigation. Implementations must be cheap
//! and synchronous; they are called while rendering state is settled.

use crate::domain::{OutputFragment, ViewMode};

/// Views the client can navigate between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Unauthenticated landing page with the credential forms.
    Landing,
    /// Authenticated dashboard with the code editor.
    Dashboard,
}

impl View {
    /// Path of the view relative to the site root.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Landing => "/index.html",
            Self::Dashboard => "/dashboard.html",
        }
    }
}

/// Surface showing the credential forms and their status line.
pub trait AuthView: Send + Sync {
    /// Show the form for `mode` and hide the other one.
    fn show_form(&self, mode: ViewMode);

    /// Replace the form title.
    fn set_title(&self, title: &str);

    /// Replace the status line with plain text.
    fn show_status(&self, message: &str);

    /// Blank the status line.
    fn clear_status(&self);

    /// Raise a one-off confirmation to the user.
    fn notify(&self, message: &str);
}

/// The shared workflow output region.
///
/// Every operation overwrites it unconditionally when it renders.
pub trait OutputRegion: Send + Sync {
    /// Replace the region's content and styling.
    fn render(&self, fragment: &OutputFragment);
}

/// Client-side navigation.
pub trait Navigator: Send + Sync {
    /// Move to `view`.
    fn navigate(&self, view: View);
}
