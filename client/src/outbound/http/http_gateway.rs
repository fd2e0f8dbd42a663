//! Reqwest-backed gateway for the backend's JSON endpoints.
//!
//! This adapter owns transport details only: endpoint resolution, request
//! serialisation, timeout and status mapping, and decoding into the domain
//! result unions.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::dto::{
    AccountCodeRequestDto, AnalyzeResponseDto, AuthResponseDto, CheckRequestDto,
    CheckResponseDto, OptimizeResponseDto, SigninRequestDto, SignupRequestDto,
};
use crate::domain::ports::{AuthGateway, AuthReply, GatewayError, WorkflowGateway};
use crate::domain::{
    AnalyzeResult, CodeSubmission, CompileResult, OptimizeResult, SigninCredentials,
    SignupCredentials, UserIdentifier,
};

const SIGNUP_PATH: &str = "auth/signup";
const SIGNIN_PATH: &str = "auth/signin";
const CHECK_PATH: &str = "api/check";
const ANALYZE_PATH: &str = "code/analyze";
const OPTIMIZE_PATH: &str = "code/optimize";

/// Gateway that POSTs JSON to endpoints resolved against one base URL.
#[derive(Debug, Clone)]
pub struct HttpBackendGateway {
    client: Client,
    base: Url,
}

impl HttpBackendGateway {
    /// Build a gateway rooted at `base`.
    ///
    /// `base` may carry a path prefix; a trailing slash is added so endpoint
    /// paths resolve beneath it. With `timeout` unset requests may wait
    /// indefinitely.
    ///
    /// ```rust,ignore
    /// let gateway = HttpBackendGateway::new(Url::parse("http://localhost:8080/")?, None)?;
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base: Url, timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base: with_trailing_slash(base),
        })
    }

    /// Base URL endpoints are resolved against.
    #[must_use]
    pub const fn base(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url, GatewayError> {
        self.base
            .join(path)
            .map_err(|error| GatewayError::transport(format!("invalid endpoint {path}: {error}")))
    }

    async fn post_raw<B>(&self, path: &str, body: &B) -> Result<(StatusCode, Vec<u8>), GatewayError>
    where
        B: Serialize + Sync + ?Sized,
    {
        let url = self.endpoint(path)?;
        let response = self
            .client
            .post(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(body)
            .send()
            .await
            .map_err(map_transport_error)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(map_transport_error)?;
        debug!(path, status = status.as_u16(), bytes = bytes.len(), "backend responded");
        Ok((status, bytes.to_vec()))
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, GatewayError>
    where
        B: Serialize + Sync + ?Sized,
        R: DeserializeOwned,
    {
        let (status, bytes) = self.post_raw(path, body).await?;
        decode_body(status, &bytes)
    }
}

#[async_trait]
impl AuthGateway for HttpBackendGateway {
    async fn sign_up(&self, credentials: &SignupCredentials) -> Result<AuthReply, GatewayError> {
        let request = SignupRequestDto {
            name: credentials.name(),
            email: credentials.email().as_str(),
            password: credentials.password(),
        };
        let response: AuthResponseDto = self.post_json(SIGNUP_PATH, &request).await?;
        Ok(response.into_reply())
    }

    async fn sign_in(&self, credentials: &SigninCredentials) -> Result<AuthReply, GatewayError> {
        let request = SigninRequestDto {
            email: credentials.email().as_str(),
            password: credentials.password(),
        };
        let response: AuthResponseDto = self.post_json(SIGNIN_PATH, &request).await?;
        Ok(response.into_reply())
    }
}

#[async_trait]
impl WorkflowGateway for HttpBackendGateway {
    async fn check(&self, code: &CodeSubmission) -> Result<CompileResult, GatewayError> {
        let request = CheckRequestDto {
            code: code.as_str(),
        };
        let response: CheckResponseDto = self.post_json(CHECK_PATH, &request).await?;
        Ok(response.into_result())
    }

    async fn analyze(
        &self,
        identifier: &UserIdentifier,
        code: &CodeSubmission,
    ) -> Result<AnalyzeResult, GatewayError> {
        let request = account_request(identifier, code);
        let response: AnalyzeResponseDto = self.post_json(ANALYZE_PATH, &request).await?;
        response.into_result().map_err(GatewayError::decode)
    }

    async fn optimize(
        &self,
        identifier: &UserIdentifier,
        code: &CodeSubmission,
    ) -> Result<OptimizeResult, GatewayError> {
        let request = account_request(identifier, code);
        let response: OptimizeResponseDto = self.post_json(OPTIMIZE_PATH, &request).await?;
        response.into_result().map_err(GatewayError::decode)
    }

    async fn register(
        &self,
        identifier: &UserIdentifier,
        code: &CodeSubmission,
    ) -> Result<(), GatewayError> {
        let request = account_request(identifier, code);
        let (status, body) = self.post_raw(ANALYZE_PATH, &request).await?;
        if status.is_success() {
            Ok(())
        } else {
            Err(map_status_error(status, &body))
        }
    }
}

fn account_request<'a>(
    identifier: &'a UserIdentifier,
    code: &'a CodeSubmission,
) -> AccountCodeRequestDto<'a> {
    AccountCodeRequestDto {
        email: identifier.as_str(),
        code: code.as_str(),
    }
}

fn with_trailing_slash(mut base: Url) -> Url {
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base
}

/// Decode `body` whatever the status; a non-success status whose body is
/// not the expected shape becomes a status error instead.
fn decode_body<R: DeserializeOwned>(status: StatusCode, body: &[u8]) -> Result<R, GatewayError> {
    match serde_json::from_slice(body) {
        Ok(decoded) => Ok(decoded),
        Err(_) if !status.is_success() => Err(map_status_error(status, body)),
        Err(error) => Err(GatewayError::decode(format!("invalid JSON payload: {error}"))),
    }
}

fn map_transport_error(error: reqwest::Error) -> GatewayError {
    if error.is_timeout() {
        GatewayError::timeout(error.to_string())
    } else {
        GatewayError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> GatewayError {
    let preview = body_preview(body);
    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            GatewayError::timeout(format!("status {}: {preview}", status.as_u16()))
        }
        _ => GatewayError::status(status.as_u16(), preview),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if compact.is_empty() {
        return "empty body".to_owned();
    }
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    //! Coverage for the non-network mapping helpers.

    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::bare_host("http://localhost:8080", "http://localhost:8080/api/check")]
    #[case::prefix_without_slash("http://host/backend", "http://host/backend/api/check")]
    #[case::prefix_with_slash("http://host/backend/", "http://host/backend/api/check")]
    fn endpoints_resolve_beneath_the_base(#[case] raw_base: &str, #[case] expected: &str) {
        let base = Url::parse(raw_base).expect("url");
        let gateway = HttpBackendGateway::new(base, None).expect("client");
        let url = gateway.endpoint(CHECK_PATH).expect("endpoint");
        assert_eq!(url.as_str(), expected);
    }

    #[test]
    fn non_success_status_with_expected_json_is_still_decoded() {
        let body = br#"{"success": false, "error": "Email and Code are required!"}"#;
        let dto: AnalyzeResponseDto =
            decode_body(StatusCode::BAD_REQUEST, body).expect("body should decode");
        assert_eq!(
            dto.into_result(),
            Ok(AnalyzeResult::Failure {
                error: "Email and Code are required!".to_owned()
            })
        );
    }

    #[test]
    fn non_success_status_with_html_maps_to_status_error() {
        let body = b"<html>\n  <body>Bad Gateway</body>\n</html>";
        let error = decode_body::<AnalyzeResponseDto>(StatusCode::BAD_GATEWAY, body)
            .expect_err("html should not decode");
        assert_eq!(
            error,
            GatewayError::status(502_u16, "<html> <body>Bad Gateway</body> </html>")
        );
    }

    #[test]
    fn success_status_with_garbage_maps_to_decode_error() {
        let error = decode_body::<AnalyzeResponseDto>(StatusCode::OK, b"not json")
            .expect_err("garbage should not decode");
        assert!(matches!(error, GatewayError::Decode { .. }), "got {error:?}");
    }

    #[rstest]
    #[case::request_timeout(StatusCode::REQUEST_TIMEOUT)]
    #[case::gateway_timeout(StatusCode::GATEWAY_TIMEOUT)]
    fn timeout_statuses_map_to_timeout(#[case] status: StatusCode) {
        let error = map_status_error(status, b"");
        assert!(matches!(error, GatewayError::Timeout { .. }), "got {error:?}");
    }

    #[test]
    fn long_bodies_are_truncated_in_previews() {
        let body = "x".repeat(400);
        let preview = body_preview(body.as_bytes());
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), 163);
    }
}
