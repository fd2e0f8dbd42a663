//! Compile, analyze and optimize orchestration.
//!
//! Each operation is an independent, user-triggered request/response cycle:
//! session check, optional code check, transient status, one backend call,
//! then a rendered outcome. Nothing here retries, queues or cancels; a fast
//! double trigger races two requests against the shared output region.
//!
//! Two ordering policies decide who owns that region when responses cross:
//!
//! - [`OrderingPolicy::LastArrival`] renders every response as it lands, so
//!   whichever resolves last wins.
//! - [`OrderingPolicy::LatestInvocation`] stamps each invocation with a
//!   monotonic generation and drops responses that a newer invocation has
//!   superseded.
//!
//! A clean compile also registers the code through a detached bookkeeping
//! task. Its outcome is discarded on purpose and never reaches the renderer.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::task::JoinHandle;
use tracing::{Instrument, Span, debug, info, info_span, warn};
use uuid::Uuid;

use crate::domain::ports::{GatewayError, OutputRegion, SessionStore, WorkflowGateway};
use crate::domain::{
    CodeSubmission, CompileResult, LOGIN_REQUIRED, OperationKind, OutputFragment, ResultRenderer,
    Session, UserIdentifier, WorkflowResult,
};

/// Lifecycle of one operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OperationPhase {
    /// Never invoked.
    #[default]
    Idle,
    /// A request is in flight.
    Pending,
    /// The latest invocation ended in success.
    SuccessRendered,
    /// The latest invocation ended in a local, backend or transport failure.
    FailureRendered,
}

/// How crossing responses share the output region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderingPolicy {
    /// Every response overwrites the region when it arrives.
    #[default]
    LastArrival,
    /// Responses from superseded invocations are discarded.
    LatestInvocation,
}

/// Handle to the detached post-compile bookkeeping task.
///
/// Dropping the handle leaves the task running.
#[derive(Debug)]
pub struct BookkeepingHandle(JoinHandle<()>);

impl BookkeepingHandle {
    /// Wait for the bookkeeping call to settle.
    ///
    /// The call's own outcome is swallowed inside the task; this only
    /// reports whether the task itself ran to completion.
    pub async fn finished(self) -> bool {
        match self.0.await {
            Ok(()) => true,
            Err(error) => {
                warn!(error = %error, "bookkeeping task did not complete");
                false
            }
        }
    }
}

/// Summary of one invocation.
#[derive(Debug)]
pub struct OperationReport {
    /// Operation that ran.
    pub kind: OperationKind,
    /// Terminal phase reached by this invocation.
    ///
    /// The phase reflects the response's outcome. Under
    /// [`OrderingPolicy::LatestInvocation`] it is recorded even when the
    /// render was discarded; check [`OperationReport::rendered`] to see
    /// whether the outcome is what the region shows.
    pub phase: OperationPhase,
    /// Whether the outcome reached the output region.
    pub rendered: bool,
    /// Bookkeeping task spawned by a clean compile.
    pub bookkeeping: Option<BookkeepingHandle>,
}

#[derive(Debug, Clone, Copy, Default)]
struct KindSlot {
    ticket: u64,
    phase: OperationPhase,
}

#[derive(Debug, Default)]
struct Board {
    latest: u64,
    slots: [KindSlot; 3],
}

/// Workflow use-case service.
pub struct WorkflowOrchestrator<S, G, O> {
    sessions: Arc<S>,
    gateway: Arc<G>,
    output: Arc<O>,
    policy: OrderingPolicy,
    board: Mutex<Board>,
}

impl<S, G, O> WorkflowOrchestrator<S, G, O> {
    /// Create an orchestrator with [`OrderingPolicy::LastArrival`].
    #[must_use]
    pub fn new(sessions: Arc<S>, gateway: Arc<G>, output: Arc<O>) -> Self {
        Self {
            sessions,
            gateway,
            output,
            policy: OrderingPolicy::default(),
            board: Mutex::new(Board::default()),
        }
    }

    /// Replace the ordering policy.
    #[must_use]
    pub const fn with_policy(mut self, policy: OrderingPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Current phase of `kind`.
    #[must_use]
    pub fn phase(&self, kind: OperationKind) -> OperationPhase {
        self.board()
            .slots
            .get(kind.index())
            .map(|slot| slot.phase)
            .unwrap_or_default()
    }

    fn board(&self) -> MutexGuard<'_, Board> {
        self.board.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S, G, O> WorkflowOrchestrator<S, G, O>
where
    S: SessionStore,
    G: WorkflowGateway + 'static,
    O: OutputRegion,
{
    /// Compile-check `code`; a clean result also registers it.
    pub async fn compile(&self, code: CodeSubmission) -> OperationReport {
        let kind = OperationKind::Compile;
        let ticket = self.open(kind);
        let Some(session) = self.require_session(kind) else {
            return self.reject_locally(kind, ticket, LOGIN_REQUIRED);
        };

        let span = operation_span(kind, session.identifier());
        self.begin(kind, ticket);
        let outcome = self
            .gateway
            .check(&code)
            .instrument(span.clone())
            .await
            .map(WorkflowResult::Compile);

        let compiled = matches!(outcome, Ok(WorkflowResult::Compile(CompileResult::Valid)));
        let mut report = span.in_scope(|| self.finish(kind, ticket, outcome));
        // Registration follows every clean compile, even one whose render was superseded.
        if compiled {
            report.bookkeeping =
                Some(self.spawn_bookkeeping(session.identifier().clone(), code, span));
        }
        report
    }

    /// Ask the backend for the time complexity of `code`.
    pub async fn analyze(&self, code: CodeSubmission) -> OperationReport {
        let kind = OperationKind::Analyze;
        self.run_for_account(kind, code, |gateway, identifier, code| async move {
            gateway
                .analyze(&identifier, &code)
                .await
                .map(WorkflowResult::Analyze)
        })
        .await
    }

    /// Ask the backend for an optimized rewrite of `code`.
    pub async fn optimize(&self, code: CodeSubmission) -> OperationReport {
        let kind = OperationKind::Optimize;
        self.run_for_account(kind, code, |gateway, identifier, code| async move {
            gateway
                .optimize(&identifier, &code)
                .await
                .map(WorkflowResult::Optimize)
        })
        .await
    }

    async fn run_for_account<F, Fut>(
        &self,
        kind: OperationKind,
        code: CodeSubmission,
        call: F,
    ) -> OperationReport
    where
        F: FnOnce(Arc<G>, UserIdentifier, CodeSubmission) -> Fut,
        Fut: Future<Output = Result<WorkflowResult, GatewayError>>,
    {
        let ticket = self.open(kind);
        let Some(session) = self.require_session(kind) else {
            return self.reject_locally(kind, ticket, LOGIN_REQUIRED);
        };
        if let Some(message) = kind.empty_code_message().filter(|_| code.is_empty()) {
            return self.reject_locally(kind, ticket, message);
        }

        let span = operation_span(kind, session.identifier());
        self.begin(kind, ticket);
        let outcome = call(self.gateway.clone(), session.identifier().clone(), code)
            .instrument(span.clone())
            .await;
        span.in_scope(|| self.finish(kind, ticket, outcome))
    }

    fn require_session(&self, kind: OperationKind) -> Option<Session> {
        match self.sessions.get() {
            Ok(session) => session,
            Err(error) => {
                warn!(operation = kind.as_str(), error = %error, "session unreadable; treating as signed out");
                None
            }
        }
    }

    fn spawn_bookkeeping(
        &self,
        identifier: UserIdentifier,
        code: CodeSubmission,
        span: Span,
    ) -> BookkeepingHandle {
        let gateway = self.gateway.clone();
        let task = async move {
            match gateway.register(&identifier, &code).await {
                Ok(()) => debug!("compiled code registered"),
                Err(error) => debug!(error = %error, "bookkeeping call failed; ignored"),
            }
        };
        BookkeepingHandle(tokio::spawn(task.instrument(span)))
    }
}

impl<S, G, O> WorkflowOrchestrator<S, G, O>
where
    O: OutputRegion,
{
    fn open(&self, kind: OperationKind) -> u64 {
        let mut board = self.board();
        board.latest += 1;
        let ticket = board.latest;
        if let Some(slot) = board.slots.get_mut(kind.index()) {
            slot.ticket = ticket;
        }
        ticket
    }

    fn begin(&self, kind: OperationKind, ticket: u64) {
        info!(operation = kind.as_str(), "dispatching request");
        self.settle(kind, ticket, OperationPhase::Pending, &ResultRenderer::pending(kind));
    }

    fn reject_locally(&self, kind: OperationKind, ticket: u64, message: &str) -> OperationReport {
        info!(operation = kind.as_str(), reason = message, "rejected before dispatch");
        let phase = OperationPhase::FailureRendered;
        let rendered = self.settle(kind, ticket, phase, &ResultRenderer::local_error(message));
        OperationReport {
            kind,
            phase,
            rendered,
            bookkeeping: None,
        }
    }

    fn finish(
        &self,
        kind: OperationKind,
        ticket: u64,
        outcome: Result<WorkflowResult, GatewayError>,
    ) -> OperationReport {
        let (phase, fragment) = match &outcome {
            Ok(result) => {
                let phase = if result.is_success() {
                    OperationPhase::SuccessRendered
                } else {
                    OperationPhase::FailureRendered
                };
                info!(operation = kind.as_str(), success = result.is_success(), "response received");
                (phase, ResultRenderer::render(result))
            }
            Err(error) => {
                warn!(operation = kind.as_str(), error = %error, "request failed");
                (
                    OperationPhase::FailureRendered,
                    ResultRenderer::transport_failure(error),
                )
            }
        };
        let rendered = self.settle(kind, ticket, phase, &fragment);
        OperationReport {
            kind,
            phase,
            rendered,
            bookkeeping: None,
        }
    }

    /// Record `phase` and render `fragment` unless the policy says the
    /// invocation is stale. Rendering happens under the board lock so the
    /// region always reflects the last settled invocation.
    fn settle(
        &self,
        kind: OperationKind,
        ticket: u64,
        phase: OperationPhase,
        fragment: &OutputFragment,
    ) -> bool {
        let mut board = self.board();
        let latest = board.latest;
        let (owns_region, owns_slot) = match self.policy {
            OrderingPolicy::LastArrival => (true, true),
            OrderingPolicy::LatestInvocation => {
                let slot_ticket = board.slots.get(kind.index()).map(|slot| slot.ticket);
                (ticket == latest, slot_ticket == Some(ticket))
            }
        };
        if owns_slot {
            if let Some(slot) = board.slots.get_mut(kind.index()) {
                slot.phase = phase;
            }
        }
        if owns_region {
            self.output.render(fragment);
        } else {
            debug!(
                operation = kind.as_str(),
                ticket,
                latest,
                "discarding superseded response"
            );
        }
        owns_region
    }
}

fn operation_span(kind: OperationKind, identifier: &UserIdentifier) -> Span {
    info_span!(
        "workflow.operation",
        operation = kind.as_str(),
        request_id = %Uuid::new_v4(),
        user = %identifier,
    )
}

#[cfg(test)]
#[path = "workflow_tests.rs"]
mod tests;
