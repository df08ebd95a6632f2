/// Indent unit and auto-indent rules for new lines.
use markpad_config::AppConfig;

/// Indentation style inserted by Tab and added by auto-indent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentStyle {
    /// Use N spaces for indentation.
    Spaces(usize),
    /// Use a tab character for indentation.
    Tabs,
}

impl Default for IndentStyle {
    fn default() -> Self {
        Self::Spaces(2)
    }
}

impl IndentStyle {
    /// The style configured in `config`.
    pub fn from_config(config: &AppConfig) -> Self {
        if config.indent_with_tabs {
            Self::Tabs
        } else {
            Self::Spaces(config.indent_width)
        }
    }

    /// Returns the string to insert for one level of indentation.
    pub fn indent_text(&self) -> String {
        match self {
            Self::Spaces(n) => " ".repeat(*n),
            Self::Tabs => "\t".to_string(),
        }
    }
}

/// Returns the leading whitespace run of `line`.
pub fn leading_whitespace(line: &str) -> &str {
    let end = line
        .char_indices()
        .find(|(_, c)| !c.is_whitespace())
        .map_or(line.len(), |(i, _)| i);
    &line[..end]
}

/// True when `line` ends with an opening tag such as `<div class="x">`.
fn ends_with_open_tag(line: &str) -> bool {
    if !line.ends_with('>') {
        return false;
    }
    let body = &line[..line.len() - 1];
    match body.rfind('<') {
        Some(start) => !body[start + 1..].contains(|c: char| c == '/' || c == '>'),
        None => false,
    }
}

/// True when the next line after `line` should be indented one level deeper.
///
/// That is the case when the trimmed line ends with `{` or `>`, or ends
/// with an unclosed opening tag.
pub fn opens_block(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.ends_with('{') || trimmed.ends_with('>') || ends_with_open_tag(trimmed)
}

/// Indentation for a new line split off after `line_before_caret`.
///
/// Carries the current indentation forward and adds one level when the
/// line opens a block.
pub fn next_line_indent(line_before_caret: &str, style: IndentStyle) -> String {
    let mut indent = leading_whitespace(line_before_caret).to_string();
    if opens_block(line_before_caret) {
        indent.push_str(&style.indent_text());
    }
    indent
}
