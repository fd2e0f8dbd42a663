//! Driven port for the compile, analyze and optimize endpoints.

use async_trait::async_trait;

use super::GatewayError;
use crate::domain::{AnalyzeResult, CodeSubmission, CompileResult, OptimizeResult, UserIdentifier};

/// Port for the code workflow endpoints.
///
/// # Examples
///
/// ```rust,ignore
/// use codelab_client::domain::ports::WorkflowGateway;
/// use codelab_client::domain::{CodeSubmission, CompileResult};
///
/// let result = gateway.check(&CodeSubmission::new("int x = 1;")).await?;
/// assert_eq!(result, CompileResult::Valid);
/// ```
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WorkflowGateway: Send + Sync {
    /// Compile-check the submitted code.
    async fn check(&self, code: &CodeSubmission) -> Result<CompileResult, GatewayError>;

    /// Analyze the code's time complexity on behalf of `identifier`.
    async fn analyze(
        &self,
        identifier: &UserIdentifier,
        code: &CodeSubmission,
    ) -> Result<AnalyzeResult, GatewayError>;

    /// Request an optimized rewrite on behalf of `identifier`.
    async fn optimize(
        &self,
        identifier: &UserIdentifier,
        code: &CodeSubmission,
    ) -> Result<OptimizeResult, GatewayError>;

    /// Register compiled code for later analysis.
    ///
    /// The response body is not interpreted; only transport failures are
    /// reported.
    async fn register(
        &self,
        identifier: &UserIdentifier,
        code: &CodeSubmission,
    ) -> Result<(), GatewayError>;
}
