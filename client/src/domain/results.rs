//! Canonical result unions for each workflow endpoint.
//!
//! Adapters decode backend JSON into these types at the boundary; nothing
//! past the boundary inspects raw response shapes.

/// Fallback text when a backend failure carries no message of its own.
pub const GENERIC_FAILURE: &str = "Request failed";

/// Presentation severity of one compile diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The diagnostic text mentions `Warning`.
    Warning,
    /// Any other diagnostic.
    Error,
}

impl Severity {
    /// Classify diagnostic text by a case-sensitive `Warning` substring match.
    ///
    /// # Examples
    /// ```
    /// use codelab_client::domain::Severity;
    ///
    /// assert_eq!(Severity::classify("Warning: unused x"), Severity::Warning);
    /// assert_eq!(Severity::classify("warning: lower case"), Severity::Error);
    /// ```
    #[must_use]
    pub fn classify(text: &str) -> Self {
        if text.contains("Warning") {
            Self::Warning
        } else {
            Self::Error
        }
    }

    /// CSS class used when rendering the diagnostic.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// One line of compiler output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileDiagnostic {
    message: String,
    severity: Severity,
}

impl CompileDiagnostic {
    /// Wrap backend text, classifying it on construction.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        let message = text.into();
        let severity = Severity::classify(&message);
        Self { message, severity }
    }

    /// Backend-supplied diagnostic text.
    #[must_use]
    pub const fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Presentation severity.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        self.severity
    }
}

/// Diagnostic counts the checker reports alongside its error list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompileStats {
    /// Illegal-character errors.
    pub lexical: u64,
    /// Missing or extraneous token errors.
    pub syntax: u64,
    /// Type-mismatch and undefined-symbol errors.
    pub semantic: u64,
}

/// Outcome of the compile-check endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileResult {
    /// The code compiled cleanly.
    Valid,
    /// The checker returned diagnostics, in backend order.
    Invalid {
        /// Ordered diagnostics.
        diagnostics: Vec<CompileDiagnostic>,
        /// Optional per-category counts.
        stats: Option<CompileStats>,
    },
}

impl CompileResult {
    /// Build an invalid result from raw diagnostic strings.
    #[must_use]
    pub fn invalid(errors: impl IntoIterator<Item = String>, stats: Option<CompileStats>) -> Self {
        Self::Invalid {
            diagnostics: errors.into_iter().map(CompileDiagnostic::new).collect(),
            stats,
        }
    }
}

/// Outcome of the analysis endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalyzeResult {
    /// Analysis succeeded.
    Success {
        /// Time-complexity descriptor, for example `O(n^2)`.
        complexity: String,
    },
    /// The backend refused or failed the analysis.
    Failure {
        /// Backend-supplied failure text.
        error: String,
    },
}

/// Outcome of the optimization endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptimizeResult {
    /// Optimization succeeded.
    Success {
        /// Rewritten source, rendered verbatim after escaping.
        optimized_code: String,
        /// Complexity of the rewritten source, when reported.
        complexity: Option<String>,
    },
    /// The backend refused or failed the optimization.
    Failure {
        /// Backend-supplied failure text.
        error: String,
    },
}

/// Any workflow result, tagged by the operation that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowResult {
    /// Compile-check result.
    Compile(CompileResult),
    /// Analysis result.
    Analyze(AnalyzeResult),
    /// Optimization result.
    Optimize(OptimizeResult),
}

impl WorkflowResult {
    /// Whether the result renders as a success.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(
            self,
            Self::Compile(CompileResult::Valid)
                | Self::Analyze(AnalyzeResult::Success { .. })
                | Self::Optimize(OptimizeResult::Success { .. })
        )
    }
}
