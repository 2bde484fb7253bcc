//! Content model structs for articles.

use crate::render::ContentRenderer;
use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::Value;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

/// Metadata block of an article file.
///
/// Only these keys are read; anything else in the block is ignored. Scalar
/// values of any YAML type are taken as their string form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArticleHeader {
    #[serde(default, deserialize_with = "scalar_string")]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "scalar_string")]
    pub created_at: Option<String>,

    #[serde(default, deserialize_with = "scalar_string")]
    pub updated_at: Option<String>,

    #[serde(default, deserialize_with = "scalar_list")]
    pub tags: Vec<String>,

    #[serde(default, deserialize_with = "scalar_string")]
    pub summary: Option<String>,

    /// Run the body through the template stage before Markdown
    #[serde(default, alias = "process_erb", deserialize_with = "truthy")]
    pub process_template: bool,
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(scalar_to_string))
}

/// `true`, a non-zero number or a "true"/"yes"/"on" string; anything else,
/// including null and sequences, is false.
fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(b)) => b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(s)) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "true" | "yes" | "on"
        ),
        _ => false,
    })
}

fn scalar_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Sequence(items)) => items.iter().filter_map(scalar_to_string).collect(),
        _ => Vec::new(),
    })
}

/// A single article of the collection.
///
/// Immutable once parsed. The HTML is rendered on first access and cached.
pub struct Article {
    pub(crate) filename: PathBuf,
    pub(crate) title: String,
    pub(crate) created_at: NaiveDateTime,
    pub(crate) updated_at: Option<NaiveDateTime>,
    pub(crate) tags: Vec<String>,
    pub(crate) summary: Option<String>,
    pub(crate) templating: bool,
    pub(crate) slug: String,
    pub(crate) path: String,
    pub(crate) raw_body: String,
    pub(crate) renderer: Arc<ContentRenderer>,
    pub(crate) rendered: OnceLock<String>,
}

impl Article {
    /// Absolute source path
    pub fn filename(&self) -> &Path {
        &self.filename
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }

    /// `None` means the article was never updated
    pub fn updated_at(&self) -> Option<NaiveDateTime> {
        self.updated_at
    }

    /// Date to show readers: last update, or creation
    pub fn display_date(&self) -> NaiveDateTime {
        self.updated_at.unwrap_or(self.created_at)
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    /// Whether the article asked for the template stage
    pub fn templating(&self) -> bool {
        self.templating
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// URL path: base mount path followed by the slug
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn raw_body(&self) -> &str {
        &self.raw_body
    }

    /// Rendered HTML, computed once.
    ///
    /// Concurrent first readers block on the same computation instead of
    /// rendering twice.
    pub fn rendered_content(&self) -> &str {
        self.rendered
            .get_or_init(|| self.renderer.render(&self.raw_body, self.templating))
    }

    pub fn is_rendered(&self) -> bool {
        self.rendered.get().is_some()
    }
}

impl PartialEq for Article {
    // Content equality; the render cache is not part of it.
    fn eq(&self, other: &Self) -> bool {
        self.filename == other.filename
            && self.title == other.title
            && self.created_at == other.created_at
            && self.updated_at == other.updated_at
            && self.tags == other.tags
            && self.summary == other.summary
            && self.templating == other.templating
            && self.slug == other.slug
            && self.path == other.path
            && self.raw_body == other.raw_body
    }
}

impl std::fmt::Debug for Article {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Article")
            .field("filename", &self.filename)
            .field("title", &self.title)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .field("tags", &self.tags)
            .field("slug", &self.slug)
            .field("path", &self.path)
            .field("rendered", &self.is_rendered())
            .finish_non_exhaustive()
    }
}
