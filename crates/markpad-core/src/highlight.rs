//! Regex-driven syntax overlay for markup and script text.
//!
//! Rendering is a pure pipeline: `content -> escape -> fold(rules)`. Each rule
//! runs over the output of the previous one, so a later rule can match inside
//! markup inserted by an earlier one (a keyword inside a highlighted string
//! gets its own nested span). That is the intended, lexical behavior.

use anyhow::{Context, Result};
use regex::{Captures, Regex};

/// Built-in rules as `(pattern, tag)`, applied in this order.
///
/// Patterns run against HTML-escaped text, hence `&lt;`/`&gt;`/`&quot;`.
/// Keyword boundaries are ASCII-only, so an accented letter next to a
/// keyword does not hide it.
pub const MARKUP_RULES: &[(&str, &str)] = &[
    (r"&lt;!--.*?--&gt;", "html-comment"),
    (r"&quot;[^&quot;]*&quot;", "html-string"),
    (r"'[^']*'", "html-string"),
    (r"&lt;/?[a-zA-Z][a-zA-Z0-9]*[^&]*?&gt;", "html-tag"),
    (
        r"(?-u:\b)(function|const|let|var|if|else|for|while|return|true|false|null|undefined)(?-u:\b)",
        "js-keyword",
    ),
    (r"([a-zA-Z-]+)\s*:", "css-property"),
    (r"(?m)//.*$", "js-comment"),
];

/// Escapes `&`, `<`, `>` and `"`, in that order.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// One lexical rule: every match gets wrapped in `<span class="{tag}">`.
#[derive(Debug, Clone)]
pub struct HighlightRule {
    pattern: Regex,
    tag: String,
}

impl HighlightRule {
    /// Compiles a rule.
    ///
    /// # Errors
    ///
    /// Returns an error if `pattern` is not a valid regex.
    pub fn new(pattern: &str, tag: &str) -> Result<Self> {
        let pattern = Regex::new(pattern)
            .with_context(|| format!("invalid highlight pattern for '{tag}': {pattern}"))?;
        Ok(Self {
            pattern,
            tag: tag.to_string(),
        })
    }

    /// Wraps every non-overlapping match in `input`.
    pub fn apply(&self, input: &str) -> String {
        self.pattern
            .replace_all(input, |caps: &Captures<'_>| {
                format!("<span class=\"{}\">{}</span>", self.tag, &caps[0])
            })
            .into_owned()
    }
}

/// An ordered, immutable rule list.
#[derive(Debug, Clone)]
pub struct Highlighter {
    rules: Vec<HighlightRule>,
}

impl Highlighter {
    /// Builds the highlighter with [`MARKUP_RULES`].
    pub fn new() -> Result<Self> {
        Self::from_rules(MARKUP_RULES)
    }

    /// Builds a highlighter from `(pattern, tag)` pairs, keeping their order.
    pub fn from_rules(specs: &[(&str, &str)]) -> Result<Self> {
        let rules = specs
            .iter()
            .map(|(pattern, tag)| HighlightRule::new(pattern, tag))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    /// Renders `content` as overlay markup.
    ///
    /// Every literal `&`, `<`, `>` and `"` is escaped before any span is added.
    pub fn render(&self, content: &str) -> String {
        self.rules
            .iter()
            .fold(escape_html(content), |markup, rule| rule.apply(&markup))
    }
}
