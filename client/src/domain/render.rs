//! Mapping from workflow results to sanitised output fragments.
//!
//! Every piece of backend-supplied text passes through
//! [`escape_for_display`] before it is placed in markup, so the rendering
//! surface never interprets backend output as structure. Fragments are
//! plain values; surfaces decide whether to show the markup or its text
//! projection ([`OutputFragment::plain_text`]).

use std::fmt;

use crate::domain::{
    AnalyzeResult, CompileResult, CompileStats, OperationKind, OptimizeResult, WorkflowResult,
};

/// Styling class applied to the output region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputClass {
    /// No styling; used for transient status.
    #[default]
    Plain,
    /// Success styling.
    Success,
    /// Error styling.
    Error,
}

impl OutputClass {
    /// CSS class name, empty for [`OutputClass::Plain`].
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Plain => "",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// Sanitised fragment written to the shared output region.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OutputFragment {
    markup: String,
    class: OutputClass,
}

impl OutputFragment {
    const fn new(markup: String, class: OutputClass) -> Self {
        Self { markup, class }
    }

    /// Markup safe to insert into a markup-bearing surface.
    #[must_use]
    pub const fn markup(&self) -> &str {
        self.markup.as_str()
    }

    /// Styling class for the region.
    #[must_use]
    pub const fn class(&self) -> OutputClass {
        self.class
    }

    /// Text projection for surfaces that cannot display markup.
    #[must_use]
    pub fn plain_text(&self) -> String {
        markup_to_text(&self.markup)
    }
}

/// Replace the five HTML-significant characters with entities.
///
/// # Examples
/// ```
/// use codelab_client::domain::escape_for_display;
///
/// assert_eq!(
///     escape_for_display(r#"<a href="x">'&'</a>"#),
///     "&lt;a href=&quot;x&quot;&gt;&#039;&amp;&#039;&lt;/a&gt;"
/// );
/// ```
#[must_use]
pub fn escape_for_display(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Pure renderer for every output shape the workflow produces.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultRenderer;

impl ResultRenderer {
    /// Transient in-flight status for an operation.
    #[must_use]
    pub fn pending(kind: OperationKind) -> OutputFragment {
        OutputFragment::new(escape_for_display(kind.pending_message()), OutputClass::Plain)
    }

    /// Local, pre-network error such as a missing session.
    #[must_use]
    pub fn local_error(message: &str) -> OutputFragment {
        error_span(message)
    }

    /// Transport or protocol failure, carrying the underlying description.
    #[must_use]
    pub fn transport_failure(detail: &dyn fmt::Display) -> OutputFragment {
        error_span(&detail.to_string())
    }

    /// Render a decoded backend result.
    ///
    /// Compile diagnostics leave the region unstyled; only the list items
    /// carry a severity class.
    #[must_use]
    pub fn render(result: &WorkflowResult) -> OutputFragment {
        match result {
            WorkflowResult::Compile(compiled) => Self::compile(compiled),
            WorkflowResult::Analyze(analysis) => Self::analyze(analysis),
            WorkflowResult::Optimize(optimization) => Self::optimize(optimization),
        }
    }

    fn compile(result: &CompileResult) -> OutputFragment {
        match result {
            CompileResult::Valid => OutputFragment::new(
                "<span class=\"success\">\u{2713} Compilation successful!</span>".to_owned(),
                OutputClass::Success,
            ),
            CompileResult::Invalid { diagnostics, stats } => {
                let mut markup = String::from("<h4>Compilation errors:</h4><ul>");
                for diagnostic in diagnostics {
                    markup.push_str(&format!(
                        "<li class=\"{}\">{}</li>",
                        diagnostic.severity().css_class(),
                        escape_for_display(diagnostic.message())
                    ));
                }
                markup.push_str("</ul>");
                if let Some(counts) = stats {
                    markup.push_str(&stats_summary(counts));
                }
                OutputFragment::new(markup, OutputClass::Plain)
            }
        }
    }

    fn analyze(result: &AnalyzeResult) -> OutputFragment {
        match result {
            AnalyzeResult::Success { complexity } => OutputFragment::new(
                complexity_span(complexity),
                OutputClass::Success,
            ),
            AnalyzeResult::Failure { error } => error_span(error),
        }
    }

    fn optimize(result: &OptimizeResult) -> OutputFragment {
        match result {
            OptimizeResult::Success {
                optimized_code,
                complexity,
            } => {
                let mut markup = format!(
                    "<span class=\"success\">Optimized Code:</span><pre>{}</pre>",
                    escape_for_display(optimized_code)
                );
                if let Some(descriptor) = complexity {
                    markup.push_str(&complexity_span(descriptor));
                }
                OutputFragment::new(markup, OutputClass::Success)
            }
            OptimizeResult::Failure { error } => error_span(error),
        }
    }
}

fn error_span(message: &str) -> OutputFragment {
    OutputFragment::new(
        format!(
            "<span class=\"error\">Error: {}</span>",
            escape_for_display(message)
        ),
        OutputClass::Error,
    )
}

fn complexity_span(complexity: &str) -> String {
    format!(
        "<span class=\"success\">Time Complexity: {}</span>",
        escape_for_display(complexity)
    )
}

fn stats_summary(stats: &CompileStats) -> String {
    format!(
        "<p class=\"stats\">Lexical: {}, Syntax: {}, Semantic: {}</p>",
        stats.lexical, stats.syntax, stats.semantic
    )
}

// Markup here only ever comes from this module, so any `<` opens a tag.
fn markup_to_text(markup: &str) -> String {
    let mut text = String::with_capacity(markup.len());
    let mut rest = markup;
    while let Some((before, after)) = rest.split_once('<') {
        text.push_str(&decode_entities(before));
        let Some((tag, tail)) = after.split_once('>') else {
            rest = after;
            break;
        };
        let closing = tag.starts_with('/');
        let name = tag
            .trim_start_matches('/')
            .split_whitespace()
            .next()
            .unwrap_or_default();
        match (name, closing) {
            ("li", false) => {
                break_line(&mut text);
                text.push_str("- ");
            }
            ("h4" | "ul" | "pre" | "p" | "li", _) => break_line(&mut text),
            ("span", true) => {
                if !text.is_empty() && !text.ends_with('\n') {
                    text.push(' ');
                }
            }
            _ => {}
        }
        rest = tail;
    }
    text.push_str(&decode_entities(rest));
    text.trim().to_owned()
}

fn break_line(text: &mut String) {
    while text.ends_with(' ') {
        text.pop();
    }
    if !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }
}

fn decode_entities(escaped: &str) -> String {
    const ENTITIES: [(&str, char); 5] = [
        ("amp;", '&'),
        ("lt;", '<'),
        ("gt;", '>'),
        ("quot;", '"'),
        ("#039;", '\''),
    ];

    let mut decoded = String::with_capacity(escaped.len());
    let mut rest = escaped;
    while let Some((before, candidate)) = rest.split_once('&') {
        decoded.push_str(before);
        let entity = ENTITIES.iter().find_map(|(name, ch)| {
            candidate.strip_prefix(name).map(|tail| (*ch, tail))
        });
        match entity {
            Some((ch, tail)) => {
                decoded.push(ch);
                rest = tail;
            }
            None => {
                decoded.push('&');
                rest = candidate;
            }
        }
    }
    decoded.push_str(rest);
    decoded
}
