//! Immutable, sorted and tag-indexed snapshot of all articles.

use crate::models::Article;
use std::borrow::Cow;
use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;
use std::sync::Arc;

/// A file discovery matched but could not turn into an article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedArticle {
    pub path: PathBuf,
    pub reason: String,
}

/// One complete generation of the article collection.
///
/// Articles are sorted by `created_at` descending, ties broken by title
/// ascending. A snapshot never changes; a refresh produces a new one.
#[derive(Debug, Default)]
pub struct Collection {
    articles: Vec<Arc<Article>>,
    tags: BTreeSet<String>,
    by_slug: HashMap<String, usize>,
    skipped: Vec<SkippedArticle>,
}

impl Collection {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Sort and index parsed articles. Slugs are expected to be unique.
    pub fn from_articles(articles: Vec<Article>, skipped: Vec<SkippedArticle>) -> Self {
        let mut articles: Vec<Arc<Article>> = articles.into_iter().map(Arc::new).collect();
        articles.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| a.title().cmp(b.title()))
        });

        let tags = articles
            .iter()
            .flat_map(|a| a.tags().iter().cloned())
            .collect();

        let by_slug = articles
            .iter()
            .enumerate()
            .map(|(idx, a)| (a.slug().to_string(), idx))
            .collect();

        Self {
            articles,
            tags,
            by_slug,
            skipped,
        }
    }

    /// All articles in collection order
    pub fn articles(&self) -> &[Arc<Article>] {
        &self.articles
    }

    /// Every distinct tag used by at least one article
    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    pub fn sorted_tags(&self) -> Vec<&str> {
        self.tags.iter().map(String::as_str).collect()
    }

    /// Articles carrying `tag`, in collection order.
    ///
    /// An empty tag borrows the full article slice itself rather than a copy.
    pub fn filter(&self, tag: &str) -> Cow<'_, [Arc<Article>]> {
        if tag.is_empty() {
            return Cow::Borrowed(&self.articles);
        }

        Cow::Owned(
            self.articles
                .iter()
                .filter(|a| a.has_tag(tag))
                .cloned()
                .collect(),
        )
    }

    /// Find an article by slug
    pub fn find(&self, slug: &str) -> Option<&Arc<Article>> {
        self.by_slug.get(slug).map(|&idx| &self.articles[idx])
    }

    /// Files skipped while this snapshot was built
    pub fn skipped(&self) -> &[SkippedArticle] {
        &self.skipped
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}

impl PartialEq for Collection {
    fn eq(&self, other: &Self) -> bool {
        self.tags == other.tags
            && self.articles.len() == other.articles.len()
            && self
                .articles
                .iter()
                .zip(&other.articles)
                .all(|(a, b)| a.as_ref() == b.as_ref())
    }
}
