//! Turns one article file into an [`Article`].

use crate::config::Config;
use crate::frontmatter::{
    filter_valid_tags, parse_date, parse_header, split_article, FrontmatterError,
};
use crate::models::Article;
use crate::render::ContentRenderer;
use crate::slug;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use thiserror::Error;

/// Why an article file could not become an [`Article`].
///
/// Every variant means "invalid article": the collection skips the file and
/// carries on.
#[derive(Error, Debug)]
pub enum ArticleError {
    #[error("Could not read article {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid metadata in {path:?}: {source}")]
    Metadata {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Article must have title and created_at ({field} is missing or unparsable): {path:?}")]
    Invalid { path: PathBuf, field: &'static str },

    #[error("Article path yields an empty slug: {0:?}")]
    EmptySlug(PathBuf),
}

impl ArticleError {
    pub fn path(&self) -> &Path {
        match self {
            ArticleError::Read { path, .. }
            | ArticleError::Metadata { path, .. }
            | ArticleError::Invalid { path, .. } => path,
            ArticleError::EmptySlug(path) => path,
        }
    }
}

/// Article parser bound to one configuration and renderer
#[derive(Clone)]
pub struct ArticleParser {
    config: Arc<Config>,
    renderer: Arc<ContentRenderer>,
}

impl ArticleParser {
    pub fn new(config: Arc<Config>, renderer: Arc<ContentRenderer>) -> Self {
        Self { config, renderer }
    }

    /// Read and parse an article file. Rendering is deferred to the first
    /// [`Article::rendered_content`] call.
    pub fn parse(&self, path: &Path) -> Result<Article, ArticleError> {
        let content = fs::read_to_string(path).map_err(|source| ArticleError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        self.parse_str(path, &content)
    }

    /// Parse already loaded file content as if it came from `path`.
    pub fn parse_str(&self, path: &Path, content: &str) -> Result<Article, ArticleError> {
        let (metadata, body) = split_article(content);

        let header = parse_header(metadata).map_err(|e| match e {
            FrontmatterError::YamlError(source) => ArticleError::Metadata {
                path: path.to_path_buf(),
                source,
            },
            FrontmatterError::MissingField(field) => ArticleError::Invalid {
                path: path.to_path_buf(),
                field,
            },
        })?;

        let date_format = &self.config.date_format;
        let created_at = header
            .created_at
            .as_deref()
            .and_then(|raw| parse_date(raw, date_format))
            .ok_or_else(|| ArticleError::Invalid {
                path: path.to_path_buf(),
                field: "created_at",
            })?;
        let updated_at = header
            .updated_at
            .as_deref()
            .and_then(|raw| parse_date(raw, date_format));

        let slug = self.slug_for(path);
        if slug.is_empty() {
            return Err(ArticleError::EmptySlug(path.to_path_buf()));
        }
        let url_path = format!("{}{}", self.config.base_mount_path(), slug);

        Ok(Article {
            filename: path.to_path_buf(),
            title: header.title.unwrap_or_default(),
            created_at,
            updated_at,
            tags: filter_valid_tags(&header.tags),
            summary: header.summary,
            templating: header.process_template,
            slug,
            path: url_path,
            raw_body: body.to_string(),
            renderer: Arc::clone(&self.renderer),
            rendered: OnceLock::new(),
        })
    }

    /// Slug from the path relative to the articles directory, extension removed
    fn slug_for(&self, path: &Path) -> String {
        let articles_dir = self.config.articles_dir();
        let relative = path.strip_prefix(&articles_dir).unwrap_or(path);
        let without_ext = relative.with_extension("");

        let joined = without_ext
            .components()
            .filter_map(|c| match c {
                std::path::Component::Normal(part) => Some(part.to_string_lossy()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/");

        slug::normalize(&joined, self.config.keep_article_path)
    }
}
