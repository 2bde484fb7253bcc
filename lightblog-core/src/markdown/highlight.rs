//! Code syntax highlighting using syntect.
//!
//! Output is a self-contained table with inline styles: one row per source
//! line, the line number in the first cell and the highlighted code in the
//! second. No stylesheet is needed to display it.

use std::sync::OnceLock;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{styled_line_to_highlighted_html, IncludeBackground};
use syntect::parsing::{SyntaxReference, SyntaxSet};

static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
static THEME_SET: OnceLock<ThemeSet> = OnceLock::new();

const LINE_NUMBER_STYLE: &str = "-moz-user-select: none;-ms-user-select: none;\
                                 -webkit-user-select: none;user-select: none;";

fn syntax_set() -> &'static SyntaxSet {
    // Lines are fed without their trailing newline
    SYNTAX_SET.get_or_init(SyntaxSet::load_defaults_nonewlines)
}

fn theme_set() -> &'static ThemeSet {
    THEME_SET.get_or_init(ThemeSet::load_defaults)
}

/// Whether a theme of that name ships with the highlighter
pub fn has_theme(name: &str) -> bool {
    theme_set().themes.contains_key(name)
}

/// Highlighter bound to one theme
#[derive(Debug, Clone)]
pub struct CodeHighlighter {
    theme: Theme,
}

impl CodeHighlighter {
    /// Returns `None` for an unknown theme name
    pub fn new(theme_name: &str) -> Option<Self> {
        theme_set()
            .themes
            .get(theme_name)
            .cloned()
            .map(|theme| Self { theme })
    }

    /// Render `source` as a numbered, highlighted table wrapped in
    /// `<div class="highlighted-code">`. Unknown languages are rendered as
    /// plain text.
    pub fn highlight(&self, language: &str, source: &str) -> String {
        let ss = syntax_set();
        let syntax = find_syntax(ss, language);
        let mut highlighter = HighlightLines::new(syntax, &self.theme);

        let mut html = String::from(
            r#"<div class="highlighted-code"><table style="font-family: monospace"><tbody>"#,
        );
        for (idx, line) in source.lines().enumerate() {
            let code = highlighter
                .highlight_line(line, ss)
                .ok()
                .and_then(|regions| {
                    styled_line_to_highlighted_html(&regions, IncludeBackground::No).ok()
                })
                .unwrap_or_else(|| html_escape(line));

            html.push_str(&format!(
                "<tr><td style=\"{}\">{}</td><td style=\"white-space: pre\">{}\n</td></tr>",
                LINE_NUMBER_STYLE,
                idx + 1,
                code
            ));
        }
        html.push_str("</tbody></table></div>");
        html
    }
}

fn find_syntax<'a>(ss: &'a SyntaxSet, language: &str) -> &'a SyntaxReference {
    ss.find_syntax_by_token(language)
        .or_else(|| ss.find_syntax_by_extension(language))
        .unwrap_or_else(|| {
            tracing::debug!("No syntax for '{}', falling back to plain text", language);
            ss.find_syntax_plain_text()
        })
}

pub(crate) fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
