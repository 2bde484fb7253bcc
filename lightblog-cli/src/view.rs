//! JSON shapes printed by the `--json` variants of the commands.

use chrono::NaiveDateTime;
use lightblog_core::{Article, Config, SkippedArticle};
use serde::Serialize;

#[derive(Serialize)]
pub struct ArticleSummary<'a> {
    pub slug: &'a str,
    pub title: &'a str,
    pub path: &'a str,
    pub tags: &'a [String],
    pub summary: Option<&'a str>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

#[derive(Serialize)]
pub struct ArticleFull<'a> {
    #[serde(flatten)]
    pub summary: ArticleSummary<'a>,
    pub filename: String,
    pub raw_body: &'a str,
    pub content_html: &'a str,
}

#[derive(Serialize)]
pub struct ArticleList<'a> {
    pub tag: Option<&'a str>,
    pub total: usize,
    pub articles: Vec<ArticleSummary<'a>>,
}

#[derive(Serialize)]
pub struct CheckReport<'a> {
    pub articles: usize,
    pub tags: usize,
    pub skipped: Vec<SkippedEntry<'a>>,
}

#[derive(Serialize)]
pub struct SkippedEntry<'a> {
    pub path: String,
    pub reason: &'a str,
}

pub fn summary<'a>(article: &'a Article, config: &Config) -> ArticleSummary<'a> {
    ArticleSummary {
        slug: article.slug(),
        title: article.title(),
        path: article.path(),
        tags: article.tags(),
        summary: article.summary(),
        created_at: format_date(article.created_at(), config),
        updated_at: article.updated_at().map(|d| format_date(d, config)),
    }
}

pub fn full<'a>(article: &'a Article, config: &Config) -> ArticleFull<'a> {
    ArticleFull {
        summary: summary(article, config),
        filename: article.filename().display().to_string(),
        raw_body: article.raw_body(),
        content_html: article.rendered_content(),
    }
}

pub fn skipped(entry: &SkippedArticle) -> SkippedEntry<'_> {
    SkippedEntry {
        path: entry.path.display().to_string(),
        reason: &entry.reason,
    }
}

pub fn format_date(date: NaiveDateTime, config: &Config) -> String {
    date.format(&config.date_format).to_string()
}
