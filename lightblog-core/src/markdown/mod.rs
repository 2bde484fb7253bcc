//! Markdown processing with the `@@@` code fence extension.

pub mod fences;
pub mod highlight;

use fences::{split_fences, Segment};
use pulldown_cmark::{html, CowStr, Event, Options, Parser};

pub use highlight::CodeHighlighter;

/// Markdown processor with custom extensions
pub struct MarkdownProcessor {
    options: Options,
    highlighter: CodeHighlighter,
}

impl MarkdownProcessor {
    pub fn new(highlighter: CodeHighlighter) -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);

        Self {
            options,
            highlighter,
        }
    }

    /// Convert an article body to HTML.
    ///
    /// `@@@ <lang>` fences become highlighted tables and `---` becomes an em
    /// dash; both happen before block parsing, so neither reaches the
    /// Markdown parser as syntax.
    pub fn convert(&self, body: &str) -> String {
        let source = self.preprocess(body);

        let parser = Parser::new_ext(&source, self.options);
        let events = dash_entities(separate_blocks(parser));

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());
        html_output
    }

    fn preprocess(&self, body: &str) -> String {
        let mut out = String::with_capacity(body.len());
        for segment in split_fences(body) {
            match segment {
                Segment::Text(text) => out.push_str(&text.replace("---", "&mdash;")),
                Segment::Code { language, source } => {
                    // blank lines keep neighbouring text out of the HTML block
                    out.push_str("\n\n");
                    out.push_str(&self.highlighter.highlight(language, source));
                    out.push_str("\n\n");
                }
            }
        }
        out
    }
}

/// Write em dashes as `&mdash;`; the parser decodes the entity produced by
/// `---` into the bare character.
fn dash_entities(events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    let mut result = Vec::with_capacity(events.len());
    for event in events {
        let text = match event {
            Event::Text(text) if text.contains('\u{2014}') => text,
            other => {
                result.push(other);
                continue;
            }
        };
        for (idx, part) in text.split('\u{2014}').enumerate() {
            if idx > 0 {
                result.push(Event::InlineHtml(CowStr::Borrowed("&mdash;")));
            }
            if !part.is_empty() {
                result.push(Event::Text(CowStr::from(part.to_string())));
            }
        }
    }
    result
}

/// Put a blank line between top-level blocks in the rendered output.
fn separate_blocks<'a>(events: impl Iterator<Item = Event<'a>>) -> Vec<Event<'a>> {
    let mut result = Vec::new();
    let mut depth = 0usize;
    let mut seen_block = false;

    for event in events {
        let opens_block = depth == 0 && matches!(event, Event::Start(_) | Event::Rule);
        if opens_block {
            if seen_block {
                result.push(Event::Html(CowStr::Borrowed("\n")));
            }
            seen_block = true;
        }

        match event {
            Event::Start(_) => depth += 1,
            Event::End(_) => depth = depth.saturating_sub(1),
            _ => {}
        }
        result.push(event);
    }

    result
}
