//! Collection building: discovery, per-file parsing and indexing.

use crate::collection::{Collection, SkippedArticle};
use crate::config::{Config, ConfigError};
use crate::models::Article;
use crate::parser::{ArticleError, ArticleParser};
use crate::render::ContentRenderer;
use glob::{MatchOptions, Pattern};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use walkdir::WalkDir;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// Builds complete [`Collection`] snapshots from the articles directory
pub struct CollectionBuilder {
    config: Arc<Config>,
    pattern: Pattern,
    parser: ArticleParser,
}

impl CollectionBuilder {
    pub fn new(config: Arc<Config>) -> Result<Self, ConfigError> {
        let renderer = Arc::new(ContentRenderer::from_config(&config)?);
        Self::with_renderer(config, renderer)
    }

    pub fn with_renderer(
        config: Arc<Config>,
        renderer: Arc<ContentRenderer>,
    ) -> Result<Self, ConfigError> {
        let glob = config.articles_glob();
        let pattern = Pattern::new(&glob).map_err(|source| ConfigError::InvalidGlob {
            pattern: glob.clone(),
            source,
        })?;
        let parser = ArticleParser::new(Arc::clone(&config), renderer);

        Ok(Self {
            config,
            pattern,
            parser,
        })
    }

    /// Discover, parse and index every article.
    ///
    /// Files that fail to parse are logged and listed in
    /// [`Collection::skipped`]; they never abort the build.
    pub fn build(&self) -> Collection {
        let files = self.discover_article_files();
        tracing::debug!("Found {} article files", files.len());

        let mut articles: Vec<Article> = Vec::with_capacity(files.len());
        let mut skipped = Vec::new();
        let mut slugs: HashMap<String, PathBuf> = HashMap::new();

        for path in files {
            match self.parser.parse(&path) {
                Ok(article) => {
                    if let Some(owner) = slugs.get(article.slug()) {
                        tracing::warn!(
                            "Duplicate slug '{}': {:?} is skipped, {:?} keeps it",
                            article.slug(),
                            path,
                            owner
                        );
                        skipped.push(SkippedArticle {
                            reason: format!(
                                "Duplicate slug '{}' already used by {:?}",
                                article.slug(),
                                owner
                            ),
                            path,
                        });
                        continue;
                    }
                    slugs.insert(article.slug().to_string(), path);
                    articles.push(article);
                }
                Err(e @ ArticleError::Read { .. }) => {
                    tracing::error!("{}", e);
                    skipped.push(SkippedArticle {
                        path,
                        reason: e.to_string(),
                    });
                }
                Err(e) => {
                    tracing::warn!("Could not process article at {:?}: {}", path, e);
                    skipped.push(SkippedArticle {
                        path,
                        reason: e.to_string(),
                    });
                }
            }
        }

        Collection::from_articles(articles, skipped)
    }

    /// Files under the articles directory matching the glob, sorted by path
    pub fn discover_article_files(&self) -> Vec<PathBuf> {
        let articles_dir = self.config.articles_dir();
        let mut files = Vec::new();

        for entry in WalkDir::new(&articles_dir).follow_links(true) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!("Skipping unreadable entry under {:?}: {}", articles_dir, err);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let Ok(relative) = entry.path().strip_prefix(&articles_dir) else {
                continue;
            };
            if self.pattern.matches_path_with(relative, MATCH_OPTIONS) {
                files.push(entry.path().to_path_buf());
            }
        }

        files.sort();
        files
    }
}
