//! Workflow operation kinds and the code buffer they submit.

use std::fmt;

/// Local status shown when a workflow is triggered without a session.
pub const LOGIN_REQUIRED: &str = "Please log in first!";

/// One of the three user-triggered workflow operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Compile-check the buffer; a clean result registers the code.
    Compile,
    /// Ask the backend for the buffer's time complexity.
    Analyze,
    /// Ask the backend for an optimized rewrite of the buffer.
    Optimize,
}

impl OperationKind {
    /// Every operation kind, in workflow order.
    pub const ALL: [Self; 3] = [Self::Compile, Self::Analyze, Self::Optimize];

    /// Stable lowercase name used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Compile => "compile",
            Self::Analyze => "analyze",
            Self::Optimize => "optimize",
        }
    }

    /// Transient status rendered while the request is in flight.
    #[must_use]
    pub const fn pending_message(self) -> &'static str {
        match self {
            Self::Compile => "Compiling code...",
            Self::Analyze => "Analyzing code...",
            Self::Optimize => "Optimizing code...",
        }
    }

    /// Local error for an empty buffer, when the operation requires code.
    ///
    /// Compile accepts an empty buffer and lets the backend judge it.
    #[must_use]
    pub const fn empty_code_message(self) -> Option<&'static str> {
        match self {
            Self::Compile => None,
            Self::Analyze => Some("Please enter code to analyze!"),
            Self::Optimize => Some("Please enter code to optimize!"),
        }
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            Self::Compile => 0,
            Self::Analyze => 1,
            Self::Optimize => 2,
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Full text of the editor buffer.
///
/// The buffer is submitted exactly as typed. Emptiness means the empty
/// string; whitespace-only code is sent to the backend unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CodeSubmission {
    code: String,
}

impl CodeSubmission {
    /// Wrap editor text for submission.
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }

    /// Borrow the submitted text.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.code.as_str()
    }

    /// Whether the buffer holds no text at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.code.is_empty()
    }
}

impl From<&str> for CodeSubmission {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for CodeSubmission {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}
