//! Recording surfaces and scripted gateways for tests.
//!
//! Compiled for unit tests and, through the `test-support` feature, for the
//! integration suites. Doubles record what they were asked to do behind
//! `Mutex`es so they satisfy the `Send + Sync` port bounds.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::ports::{AuthView, GatewayError, Navigator, OutputRegion, View, WorkflowGateway};
use crate::domain::{
    AnalyzeResult, CodeSubmission, CompileResult, OptimizeResult, OutputFragment, UserIdentifier,
    ViewMode,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Default)]
struct AuthViewState {
    visible: Option<ViewMode>,
    title: Option<String>,
    status: Option<String>,
    notices: Vec<String>,
}

/// Auth surface that remembers its visible state.
#[derive(Debug, Default)]
pub struct RecordingAuthView {
    state: Mutex<AuthViewState>,
}

impl RecordingAuthView {
    /// Form currently shown, if any.
    #[must_use]
    pub fn visible_form(&self) -> Option<ViewMode> {
        lock(&self.state).visible
    }

    /// Current title label.
    #[must_use]
    pub fn title(&self) -> Option<String> {
        lock(&self.state).title.clone()
    }

    /// Current status line; `None` once cleared.
    #[must_use]
    pub fn status(&self) -> Option<String> {
        lock(&self.state).status.clone()
    }

    /// Every confirmation raised so far.
    #[must_use]
    pub fn notices(&self) -> Vec<String> {
        lock(&self.state).notices.clone()
    }
}

impl AuthView for RecordingAuthView {
    fn show_form(&self, mode: ViewMode) {
        lock(&self.state).visible = Some(mode);
    }

    fn set_title(&self, title: &str) {
        lock(&self.state).title = Some(title.to_owned());
    }

    fn show_status(&self, message: &str) {
        lock(&self.state).status = Some(message.to_owned());
    }

    fn clear_status(&self) {
        lock(&self.state).status = None;
    }

    fn notify(&self, message: &str) {
        lock(&self.state).notices.push(message.to_owned());
    }
}

/// Output region that keeps every fragment it was given.
#[derive(Debug, Default)]
pub struct RecordingOutputRegion {
    renders: Mutex<Vec<OutputFragment>>,
}

impl RecordingOutputRegion {
    /// Fragments in render order, transient statuses included.
    #[must_use]
    pub fn renders(&self) -> Vec<OutputFragment> {
        lock(&self.renders).clone()
    }

    /// What the region shows now.
    #[must_use]
    pub fn current(&self) -> Option<OutputFragment> {
        lock(&self.renders).last().cloned()
    }
}

impl OutputRegion for RecordingOutputRegion {
    fn render(&self, fragment: &OutputFragment) {
        lock(&self.renders).push(fragment.clone());
    }
}

/// Navigator that records each visit.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    visits: Mutex<Vec<View>>,
}

impl RecordingNavigator {
    /// Views navigated to, in order.
    #[must_use]
    pub fn visits(&self) -> Vec<View> {
        lock(&self.visits).clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, view: View) {
        lock(&self.visits).push(view);
    }
}

/// One call observed by [`ScriptedWorkflowGateway`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    /// `check` with the submitted code.
    Check {
        /// Submitted code.
        code: String,
    },
    /// `analyze` for an account.
    Analyze {
        /// Account key.
        email: String,
        /// Submitted code.
        code: String,
    },
    /// `optimize` for an account.
    Optimize {
        /// Account key.
        email: String,
        /// Submitted code.
        code: String,
    },
    /// Post-compile `register` for an account.
    Register {
        /// Account key.
        email: String,
        /// Submitted code.
        code: String,
    },
}

#[derive(Debug)]
struct Script {
    check: Result<CompileResult, GatewayError>,
    analyze: Result<AnalyzeResult, GatewayError>,
    optimize: Result<OptimizeResult, GatewayError>,
    register: Result<(), GatewayError>,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            check: Ok(CompileResult::Valid),
            analyze: Ok(AnalyzeResult::Success {
                complexity: "O(1)".to_owned(),
            }),
            optimize: Ok(OptimizeResult::Success {
                optimized_code: String::new(),
                complexity: None,
            }),
            register: Ok(()),
        }
    }
}

/// Workflow gateway answering from a script and recording every call.
#[derive(Debug, Default)]
pub struct ScriptedWorkflowGateway {
    script: Mutex<Script>,
    calls: Mutex<Vec<GatewayCall>>,
}

impl ScriptedWorkflowGateway {
    /// Set the compile-check reply.
    pub fn reply_to_check(&self, reply: Result<CompileResult, GatewayError>) {
        lock(&self.script).check = reply;
    }

    /// Set the analysis reply.
    pub fn reply_to_analyze(&self, reply: Result<AnalyzeResult, GatewayError>) {
        lock(&self.script).analyze = reply;
    }

    /// Set the optimization reply.
    pub fn reply_to_optimize(&self, reply: Result<OptimizeResult, GatewayError>) {
        lock(&self.script).optimize = reply;
    }

    /// Set the bookkeeping reply.
    pub fn reply_to_register(&self, reply: Result<(), GatewayError>) {
        lock(&self.script).register = reply;
    }

    /// Calls observed so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<GatewayCall> {
        lock(&self.calls).clone()
    }

    fn record(&self, call: GatewayCall) {
        lock(&self.calls).push(call);
    }
}

#[async_trait]
impl WorkflowGateway for ScriptedWorkflowGateway {
    async fn check(&self, code: &CodeSubmission) -> Result<CompileResult, GatewayError> {
        self.record(GatewayCall::Check {
            code: code.as_str().to_owned(),
        });
        lock(&self.script).check.clone()
    }

    async fn analyze(
        &self,
        identifier: &UserIdentifier,
        code: &CodeSubmission,
    ) -> Result<AnalyzeResult, GatewayError> {
        self.record(GatewayCall::Analyze {
            email: identifier.to_string(),
            code: code.as_str().to_owned(),
        });
        lock(&self.script).analyze.clone()
    }

    async fn optimize(
        &self,
        identifier: &UserIdentifier,
        code: &CodeSubmission,
    ) -> Result<OptimizeResult, GatewayError> {
        self.record(GatewayCall::Optimize {
            email: identifier.to_string(),
            code: code.as_str().to_owned(),
        });
        lock(&self.script).optimize.clone()
    }

    async fn register(
        &self,
        identifier: &UserIdentifier,
        code: &CodeSubmission,
    ) -> Result<(), GatewayError> {
        self.record(GatewayCall::Register {
            email: identifier.to_string(),
            code: code.as_str().to_owned(),
        });
        lock(&self.script).register.clone()
    }
}
