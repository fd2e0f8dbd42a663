//! Line-oriented surfaces for the command-line client.
//!
//! One [`TerminalSurface`] stands in for the auth form, the output region
//! and the navigator. Markup is projected to plain text before writing, and
//! write failures are logged rather than propagated because the surface
//! ports are infallible.

use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use crate::domain::ports::{AuthView, Navigator, OutputRegion, View};
use crate::domain::{OutputFragment, ViewMode};

/// Plain-text surface over any writer.
#[derive(Debug)]
pub struct TerminalSurface<W> {
    out: Mutex<W>,
}

impl TerminalSurface<io::Stdout> {
    /// Surface writing to standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> TerminalSurface<W> {
    /// Wrap `out`.
    #[must_use]
    pub const fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Recover the writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    fn writer(&self) -> MutexGuard<'_, W> {
        self.out.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn line(&self, text: &str) {
        let mut out = self.writer();
        if let Err(error) = writeln!(out, "{text}").and_then(|()| out.flush()) {
            warn!(error = %error, "terminal write failed");
        }
    }
}

impl<W: Write + Send> AuthView for TerminalSurface<W> {
    fn show_form(&self, mode: ViewMode) {
        debug!(form = mode.title(), "form shown");
    }

    fn set_title(&self, title: &str) {
        self.line(&format!("== {title} =="));
    }

    fn show_status(&self, message: &str) {
        self.line(message);
    }

    fn clear_status(&self) {}

    fn notify(&self, message: &str) {
        self.line(message);
    }
}

impl<W: Write + Send> OutputRegion for TerminalSurface<W> {
    fn render(&self, fragment: &OutputFragment) {
        self.line(&fragment.plain_text());
    }
}

impl<W: Write + Send> Navigator for TerminalSurface<W> {
    fn navigate(&self, view: View) {
        debug!(path = view.path(), "navigating");
        self.line(&format!("-> {}", view.path()));
    }
}
