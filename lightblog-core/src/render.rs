//! Two-stage content rendering: optional template stage, then Markdown.

use crate::config::{Config, ConfigError};
use crate::markdown::{CodeHighlighter, MarkdownProcessor};
use crate::template::TemplateStage;

/// Stateless renderer shared by every article of a collection
pub struct ContentRenderer {
    allow_templating: bool,
    templates: TemplateStage,
    markdown: MarkdownProcessor,
}

impl ContentRenderer {
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let highlighter = CodeHighlighter::new(&config.highlight_theme)
            .ok_or_else(|| ConfigError::UnknownTheme(config.highlight_theme.clone()))?;

        Ok(Self {
            allow_templating: config.allow_templating,
            templates: TemplateStage::new(config.static_prefix()),
            markdown: MarkdownProcessor::new(highlighter),
        })
    }

    /// Render an article body to HTML.
    ///
    /// The template stage only runs when the article asks for it and the
    /// configuration allows it.
    pub fn render(&self, body: &str, templating: bool) -> String {
        if templating && self.allow_templating {
            let expanded = self.templates.render(body);
            self.markdown.convert(&expanded)
        } else {
            self.markdown.convert(body)
        }
    }
}

impl std::fmt::Debug for ContentRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentRenderer")
            .field("allow_templating", &self.allow_templating)
            .finish_non_exhaustive()
    }
}
