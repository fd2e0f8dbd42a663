//! Domain primitives and use-case services.
//!
//! Purpose: define the strongly typed values the client works with and the
//! services that orchestrate them. Everything here is transport agnostic;
//! adapters under `outbound` translate to HTTP, files and terminals.
//!
//! Public surface:
//! - Session and UserIdentifier: the signed-in account.
//! - SignupCredentials and SigninCredentials: validated forms.
//! - CompileResult, AnalyzeResult, OptimizeResult: per-endpoint results.
//! - ResultRenderer and escape_for_display: the sanitising renderer.
//! - AuthClient, ViewModeController, WorkflowOrchestrator: use-cases.

pub mod auth;
pub mod auth_service;
pub mod code;
pub mod ports;
pub mod render;
pub mod results;
pub mod session;
pub mod view_mode;
pub mod workflow;

pub use self::auth::{
    ALL_FIELDS_REQUIRED, CredentialValidationError, SigninCredentials, SignupCredentials,
};
pub use self::auth_service::{AuthClient, AuthOutcome, SIGNIN_NOTICE, SIGNOUT_STATUS, SIGNUP_NOTICE};
pub use self::code::{CodeSubmission, LOGIN_REQUIRED, OperationKind};
pub use self::render::{OutputClass, OutputFragment, ResultRenderer, escape_for_display};
pub use self::results::{
    AnalyzeResult, CompileDiagnostic, CompileResult, CompileStats, GENERIC_FAILURE,
    OptimizeResult, Severity, WorkflowResult,
};
pub use self::session::{Session, SessionValidationError, UserIdentifier};
pub use self::view_mode::{ViewMode, ViewModeController};
pub use self::workflow::{
    BookkeepingHandle, OperationPhase, OperationReport, OrderingPolicy, WorkflowOrchestrator,
};
