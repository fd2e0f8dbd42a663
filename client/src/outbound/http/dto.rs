//! Wire shapes for the backend's JSON endpoints.
//!
//! Responses decode into these DTOs first and are then folded into one
//! domain union per endpoint. Success indicators go through `FlagDto`,
//! which accepts a JSON boolean or the strings `"true"`/`"false"`.

use serde::{Deserialize, Serialize};

use crate::domain::ports::AuthReply;
use crate::domain::{AnalyzeResult, CompileResult, CompileStats, GENERIC_FAILURE, OptimizeResult};

#[derive(Debug, Serialize)]
pub(super) struct SignupRequestDto<'a> {
    pub(super) name: &'a str,
    pub(super) email: &'a str,
    pub(super) password: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct SigninRequestDto<'a> {
    pub(super) email: &'a str,
    pub(super) password: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct CheckRequestDto<'a> {
    pub(super) code: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct AccountCodeRequestDto<'a> {
    pub(super) email: &'a str,
    pub(super) code: &'a str,
}

/// Success indicator as the backend actually sends it.
#[derive(Debug, Deserialize, Default)]
#[serde(transparent)]
pub(super) struct FlagDto(serde_json::Value);

impl FlagDto {
    /// Only `true` and `"true"` count as set.
    pub(super) fn is_set(&self) -> bool {
        match &self.0 {
            serde_json::Value::Bool(flag) => *flag,
            serde_json::Value::String(text) => text == "true",
            _ => false,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct AuthResponseDto {
    #[serde(default)]
    pub(super) success: FlagDto,
    pub(super) message: Option<String>,
}

impl AuthResponseDto {
    pub(super) fn into_reply(self) -> AuthReply {
        if self.success.is_set() {
            AuthReply::Accepted
        } else {
            AuthReply::Rejected {
                message: self.message.filter(|message| !message.trim().is_empty()),
            }
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct StatsDto {
    #[serde(default)]
    pub(super) lexical_errors: u64,
    #[serde(default)]
    pub(super) syntax_errors: u64,
    #[serde(default)]
    pub(super) semantic_errors: u64,
}

impl From<StatsDto> for CompileStats {
    fn from(value: StatsDto) -> Self {
        Self {
            lexical: value.lexical_errors,
            syntax: value.syntax_errors,
            semantic: value.semantic_errors,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct CheckResponseDto {
    #[serde(default)]
    pub(super) valid: FlagDto,
    #[serde(default)]
    pub(super) errors: Vec<String>,
    pub(super) stats: Option<StatsDto>,
}

impl CheckResponseDto {
    pub(super) fn into_result(self) -> CompileResult {
        if self.valid.is_set() {
            CompileResult::Valid
        } else {
            CompileResult::invalid(self.errors, self.stats.map(CompileStats::from))
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct AnalyzeResponseDto {
    #[serde(default)]
    pub(super) success: FlagDto,
    pub(super) complexity: Option<String>,
    pub(super) error: Option<String>,
}

impl AnalyzeResponseDto {
    pub(super) fn into_result(self) -> Result<AnalyzeResult, String> {
        if !self.success.is_set() {
            return Ok(AnalyzeResult::Failure {
                error: failure_text(self.error),
            });
        }
        let complexity = self
            .complexity
            .ok_or_else(|| "analysis succeeded without a complexity".to_owned())?;
        Ok(AnalyzeResult::Success { complexity })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct OptimizeResponseDto {
    #[serde(default)]
    pub(super) success: FlagDto,
    pub(super) optimized_code: Option<String>,
    pub(super) complexity: Option<String>,
    pub(super) error: Option<String>,
}

impl OptimizeResponseDto {
    pub(super) fn into_result(self) -> Result<OptimizeResult, String> {
        if !self.success.is_set() {
            return Ok(OptimizeResult::Failure {
                error: failure_text(self.error),
            });
        }
        let optimized_code = self
            .optimized_code
            .ok_or_else(|| "optimization succeeded without optimizedCode".to_owned())?;
        Ok(OptimizeResult::Success {
            optimized_code,
            complexity: self.complexity,
        })
    }
}

fn failure_text(error: Option<String>) -> String {
    error
        .filter(|text| !text.trim().is_empty())
        .unwrap_or_else(|| GENERIC_FAILURE.to_owned())
}
