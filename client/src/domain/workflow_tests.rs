//! Tests for the workflow orchestrator.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Notify;

use super::*;
use crate::domain::ports::MockWorkflowGateway;
use crate::domain::{AnalyzeResult, OptimizeResult, OutputClass};
use crate::outbound::session::InMemorySessionStore;
use crate::test_support::RecordingOutputRegion;
use rstest::rstest;

type TestOrchestrator<G> = WorkflowOrchestrator<InMemorySessionStore, G, RecordingOutputRegion>;

fn signed_in_store() -> InMemorySessionStore {
    let store = InMemorySessionStore::default();
    let identifier = UserIdentifier::new("a@x.com").expect("identifier");
    store
        .set(&Session::new(identifier))
        .expect("memory store never fails");
    store
}

fn orchestrator<G>(
    store: InMemorySessionStore,
    gateway: G,
) -> (TestOrchestrator<G>, Arc<RecordingOutputRegion>) {
    let output = Arc::new(RecordingOutputRegion::default());
    let orchestrator = WorkflowOrchestrator::new(Arc::new(store), Arc::new(gateway), output.clone());
    (orchestrator, output)
}

fn silent_gateway() -> MockWorkflowGateway {
    let mut gateway = MockWorkflowGateway::new();
    gateway.expect_check().times(0);
    gateway.expect_analyze().times(0);
    gateway.expect_optimize().times(0);
    gateway.expect_register().times(0);
    gateway
}

fn current_markup(output: &RecordingOutputRegion) -> String {
    output
        .current()
        .expect("region should have content")
        .markup()
        .to_owned()
}

#[rstest]
#[case(OperationKind::Compile)]
#[case(OperationKind::Analyze)]
#[case(OperationKind::Optimize)]
#[tokio::test]
async fn operations_without_session_never_reach_the_network(#[case] kind: OperationKind) {
    let (orchestrator, output) = orchestrator(InMemorySessionStore::default(), silent_gateway());
    let code = CodeSubmission::new("int x = 1;");

    let report = match kind {
        OperationKind::Compile => orchestrator.compile(code).await,
        OperationKind::Analyze => orchestrator.analyze(code).await,
        OperationKind::Optimize => orchestrator.optimize(code).await,
    };

    assert_eq!(report.phase, OperationPhase::FailureRendered);
    assert_eq!(output.renders().len(), 1, "no transient status is shown");
    assert_eq!(
        current_markup(&output),
        "<span class=\"error\">Error: Please log in first!</span>"
    );
    assert_eq!(orchestrator.phase(kind), OperationPhase::FailureRendered);
}

#[rstest]
#[case(OperationKind::Analyze, "Please enter code to analyze!")]
#[case(OperationKind::Optimize, "Please enter code to optimize!")]
#[tokio::test]
async fn empty_code_is_rejected_locally(#[case] kind: OperationKind, #[case] message: &str) {
    let (orchestrator, output) = orchestrator(signed_in_store(), silent_gateway());

    let report = match kind {
        OperationKind::Analyze => orchestrator.analyze(CodeSubmission::new("")).await,
        _ => orchestrator.optimize(CodeSubmission::new("")).await,
    };

    assert_eq!(report.phase, OperationPhase::FailureRendered);
    assert!(current_markup(&output).contains(message));
}

#[tokio::test]
async fn empty_code_is_sent_for_compile() {
    let mut gateway = MockWorkflowGateway::new();
    gateway
        .expect_check()
        .withf(|code| code.is_empty())
        .times(1)
        .return_once(|_| Ok(CompileResult::invalid(vec!["empty program".to_owned()], None)));
    gateway.expect_register().times(0);
    let (orchestrator, _output) = orchestrator(signed_in_store(), gateway);

    let report = orchestrator.compile(CodeSubmission::new("")).await;

    assert_eq!(report.phase, OperationPhase::FailureRendered);
    assert!(report.bookkeeping.is_none());
}

#[tokio::test]
async fn valid_compile_renders_success_then_registers_the_code() {
    let mut gateway = MockWorkflowGateway::new();
    gateway
        .expect_check()
        .withf(|code| code.as_str() == "int x = 1;")
        .times(1)
        .return_once(|_| Ok(CompileResult::Valid));
    gateway
        .expect_register()
        .withf(|identifier, code| identifier.as_str() == "a@x.com" && code.as_str() == "int x = 1;")
        .times(1)
        .return_once(|_, _| Ok(()));
    let (orchestrator, output) = orchestrator(signed_in_store(), gateway);

    let report = orchestrator.compile(CodeSubmission::new("int x = 1;")).await;

    assert_eq!(report.phase, OperationPhase::SuccessRendered);
    assert!(report.rendered);
    let renders = output.renders();
    let [pending, outcome] = renders.as_slice() else {
        panic!("expected a transient status and an outcome, got {renders:?}");
    };
    assert_eq!(pending.plain_text(), "Compiling code...");
    assert_eq!(pending.class(), OutputClass::Plain);
    assert_eq!(
        outcome.markup(),
        "<span class=\"success\">\u{2713} Compilation successful!</span>"
    );

    let handle = report.bookkeeping.expect("bookkeeping should be spawned");
    assert!(handle.finished().await);
}

#[tokio::test]
async fn bookkeeping_failure_is_not_surfaced() {
    let mut gateway = MockWorkflowGateway::new();
    gateway
        .expect_check()
        .times(1)
        .return_once(|_| Ok(CompileResult::Valid));
    gateway
        .expect_register()
        .times(1)
        .return_once(|_, _| Err(GatewayError::transport("connection reset")));
    let (orchestrator, output) = orchestrator(signed_in_store(), gateway);

    let report = orchestrator.compile(CodeSubmission::new("int x = 1;")).await;
    let handle = report.bookkeeping.expect("bookkeeping should be spawned");
    assert!(handle.finished().await);

    assert_eq!(orchestrator.phase(OperationKind::Compile), OperationPhase::SuccessRendered);
    assert!(current_markup(&output).contains("Compilation successful!"));
}

#[tokio::test]
async fn invalid_compile_lists_diagnostics_without_bookkeeping() {
    let mut gateway = MockWorkflowGateway::new();
    gateway.expect_check().times(1).return_once(|_| {
        Ok(CompileResult::invalid(
            vec!["Warning: x".to_owned(), "y".to_owned()],
            None,
        ))
    });
    gateway.expect_register().times(0);
    let (orchestrator, output) = orchestrator(signed_in_store(), gateway);

    let report = orchestrator.compile(CodeSubmission::new("x")).await;

    assert!(report.bookkeeping.is_none());
    assert_eq!(report.phase, OperationPhase::FailureRendered);
    let current = output.current().expect("rendered");
    assert_eq!(current.class(), OutputClass::Plain, "diagnostics leave the region unstyled");
    let markup = current_markup(&output);
    let warning = markup.find("<li class=\"warning\">Warning: x</li>");
    let error = markup.find("<li class=\"error\">y</li>");
    assert!(warning.is_some() && error.is_some(), "markup: {markup}");
    assert!(warning < error, "diagnostics must keep backend order");
}

#[tokio::test]
async fn compile_transport_failure_skips_bookkeeping() {
    let mut gateway = MockWorkflowGateway::new();
    gateway
        .expect_check()
        .times(1)
        .return_once(|_| Err(GatewayError::decode("expected value at line 1")));
    gateway.expect_register().times(0);
    let (orchestrator, output) = orchestrator(signed_in_store(), gateway);

    let report = orchestrator.compile(CodeSubmission::new("x")).await;

    assert_eq!(report.phase, OperationPhase::FailureRendered);
    assert!(report.bookkeeping.is_none());
    assert!(current_markup(&output).contains("expected value at line 1"));
}

#[tokio::test]
async fn analysis_success_renders_complexity_for_the_session_account() {
    let mut gateway = MockWorkflowGateway::new();
    gateway
        .expect_analyze()
        .withf(|identifier, code| identifier.as_str() == "a@x.com" && code.as_str() == "for(;;){}")
        .times(1)
        .return_once(|_, _| {
            Ok(AnalyzeResult::Success {
                complexity: "O(n)".to_owned(),
            })
        });
    let (orchestrator, output) = orchestrator(signed_in_store(), gateway);

    let report = orchestrator.analyze(CodeSubmission::new("for(;;){}")).await;

    assert_eq!(report.phase, OperationPhase::SuccessRendered);
    let pending = output.renders().first().map(OutputFragment::plain_text);
    assert_eq!(pending.as_deref(), Some("Analyzing code..."));
    assert_eq!(
        current_markup(&output),
        "<span class=\"success\">Time Complexity: O(n)</span>"
    );
}

#[tokio::test]
async fn optimize_failure_message_is_rendered() {
    let mut gateway = MockWorkflowGateway::new();
    gateway.expect_optimize().times(1).return_once(|_, _| {
        Ok(OptimizeResult::Failure {
            error: "timeout".to_owned(),
        })
    });
    let (orchestrator, output) = orchestrator(signed_in_store(), gateway);

    let report = orchestrator.optimize(CodeSubmission::new("x")).await;

    assert_eq!(report.phase, OperationPhase::FailureRendered);
    let fragment = output.current().expect("rendered");
    assert_eq!(fragment.class(), OutputClass::Error);
    assert!(fragment.markup().contains("timeout"));
}

#[tokio::test]
async fn optimized_script_tags_are_escaped() {
    let mut gateway = MockWorkflowGateway::new();
    gateway.expect_optimize().times(1).return_once(|_, _| {
        Ok(OptimizeResult::Success {
            optimized_code: "<script>alert(1)</script>".to_owned(),
            complexity: None,
        })
    });
    let (orchestrator, output) = orchestrator(signed_in_store(), gateway);

    orchestrator.optimize(CodeSubmission::new("x")).await;

    let markup = current_markup(&output);
    assert!(!markup.contains("<script>"), "markup: {markup}");
    assert!(markup.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
}

#[tokio::test]
async fn unreadable_session_counts_as_signed_out() {
    use crate::domain::ports::{MockSessionStore, SessionStoreError};

    let mut store = MockSessionStore::new();
    store
        .expect_get()
        .returning(|| Err(SessionStoreError::corrupt("not json")));
    let output = Arc::new(RecordingOutputRegion::default());
    let orchestrator = WorkflowOrchestrator::new(
        Arc::new(store),
        Arc::new(silent_gateway()),
        output.clone(),
    );

    let report = orchestrator.analyze(CodeSubmission::new("x")).await;

    assert_eq!(report.phase, OperationPhase::FailureRendered);
    assert!(current_markup(&output).contains(LOGIN_REQUIRED));
}

/// Gateway whose analysis waits for a signal; optimization answers at once.
struct GatedGateway {
    release: Notify,
}

#[async_trait]
impl WorkflowGateway for GatedGateway {
    async fn check(&self, _code: &CodeSubmission) -> Result<CompileResult, GatewayError> {
        Ok(CompileResult::Valid)
    }

    async fn analyze(
        &self,
        _identifier: &UserIdentifier,
        _code: &CodeSubmission,
    ) -> Result<AnalyzeResult, GatewayError> {
        self.release.notified().await;
        Ok(AnalyzeResult::Success {
            complexity: "O(n)".to_owned(),
        })
    }

    async fn optimize(
        &self,
        _identifier: &UserIdentifier,
        _code: &CodeSubmission,
    ) -> Result<OptimizeResult, GatewayError> {
        Ok(OptimizeResult::Success {
            optimized_code: "y".to_owned(),
            complexity: None,
        })
    }

    async fn register(
        &self,
        _identifier: &UserIdentifier,
        _code: &CodeSubmission,
    ) -> Result<(), GatewayError> {
        Ok(())
    }
}

async fn race_slow_analysis_against_fast_optimize(
    policy: OrderingPolicy,
) -> (OperationReport, OperationReport, Arc<RecordingOutputRegion>) {
    let gated = GatedGateway {
        release: Notify::new(),
    };
    let (unordered, output) = orchestrator(signed_in_store(), gated);
    let ordered = unordered.with_policy(policy);
    let gateway = ordered.gateway.clone();

    let slow = ordered.analyze(CodeSubmission::new("x"));
    let fast = async {
        let report = ordered.optimize(CodeSubmission::new("x")).await;
        gateway.release.notify_one();
        report
    };
    let (slow_report, fast_report) = tokio::join!(slow, fast);
    (slow_report, fast_report, output)
}

#[tokio::test]
async fn last_arrival_lets_the_slow_response_win() {
    let (slow, fast, output) =
        race_slow_analysis_against_fast_optimize(OrderingPolicy::LastArrival).await;

    assert!(slow.rendered && fast.rendered);
    assert!(current_markup(&output).contains("Time Complexity: O(n)"));
}

#[tokio::test]
async fn latest_invocation_discards_the_superseded_response() {
    let (slow, fast, output) =
        race_slow_analysis_against_fast_optimize(OrderingPolicy::LatestInvocation).await;

    assert!(!slow.rendered, "stale analysis must not render");
    assert!(fast.rendered);
    assert_eq!(slow.phase, OperationPhase::SuccessRendered);
    assert!(current_markup(&output).contains("Optimized Code:"));
}
