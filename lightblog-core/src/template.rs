//! Sandboxed template stage for articles that opt into templating.
//!
//! Templates see no variables and exactly one helper, `static_path`. A
//! template that fails to render is replaced by an inline error block, so
//! one broken article never takes the rest of the collection down with it.

use crate::markdown::highlight::html_escape;
use minijinja::{context, Environment, UndefinedBehavior};

pub struct TemplateStage {
    env: Environment<'static>,
}

impl TemplateStage {
    /// `static_prefix` is the URL prefix of article static assets ("/static").
    pub fn new(static_prefix: impl Into<String>) -> Self {
        let static_prefix = static_prefix.into();
        // No built-in filters, tests or globals: only `static_path`.
        let mut env = Environment::empty();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.add_function("static_path", move |path: String| -> String {
            static_path(&static_prefix, &path)
        });

        Self { env }
    }

    /// Evaluate `body` as a template. Never fails.
    pub fn render(&self, body: &str) -> String {
        match self.env.render_str(body, context! {}) {
            Ok(rendered) => rendered,
            Err(err) => {
                tracing::warn!("Invalid article template source: {}", err);
                error_block(&err)
            }
        }
    }
}

fn static_path(prefix: &str, path: &str) -> String {
    format!("{}/{}", prefix.trim_end_matches('/'), path.trim_start_matches('/'))
}

// Kept on one line so the Markdown stage treats it as a single HTML block.
fn error_block(err: &minijinja::Error) -> String {
    format!(
        "<p>Invalid article template source: {}.</p><div><pre>{}</pre></div>",
        html_escape(&err.to_string()),
        html_escape(&err.display_debug_info().to_string()).replace('\n', "&#10;")
    )
}
