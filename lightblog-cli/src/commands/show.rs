//! Print a single article.

use super::open_store;
use crate::{view, ShowFormat};
use anyhow::{Context, Result};
use lightblog_core::slug;
use std::path::Path;

pub fn show_article(config_path: &Path, query: &str, format: ShowFormat) -> Result<()> {
    let store = open_store(config_path)?;
    let config = store.config();
    let collection = store.snapshot();

    let slug = normalize_query(query, &config.article_extension, config.keep_article_path);
    let article = collection
        .find(&slug)
        .with_context(|| format!("Article '{}' not found", query))?;

    match format {
        ShowFormat::Html => println!("{}", article.rendered_content()),
        ShowFormat::Raw => println!("{}", article.raw_body()),
        ShowFormat::Json => {
            let payload = view::full(article, config);
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
    }

    Ok(())
}

/// Accept a slug or a file name relative to the articles directory.
fn normalize_query(query: &str, extension: &str, keep_article_path: bool) -> String {
    let trimmed = query.trim().trim_matches('/');
    let suffix = format!(".{}", extension.trim_start_matches('.'));
    let without_ext = trimmed.strip_suffix(suffix.as_str()).unwrap_or(trimmed);
    slug::normalize(without_ext, keep_article_path)
}
