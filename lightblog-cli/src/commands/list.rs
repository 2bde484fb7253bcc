//! List articles, optionally restricted to one tag.

use super::open_store;
use crate::view;
use anyhow::Result;
use std::path::Path;

pub fn list_articles(config_path: &Path, tag: Option<&str>, json: bool) -> Result<()> {
    let store = open_store(config_path)?;
    let config = store.config();
    let collection = store.snapshot();
    let articles = collection.filter(tag.unwrap_or(""));

    if json {
        let payload = view::ArticleList {
            tag,
            total: articles.len(),
            articles: articles
                .iter()
                .map(|article| view::summary(article, config))
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    if articles.is_empty() {
        match tag {
            Some(tag) => println!("No articles tagged '{}'", tag),
            None => println!("No articles"),
        }
        return Ok(());
    }

    for article in articles.iter() {
        let tags = if article.tags().is_empty() {
            String::new()
        } else {
            format!("  [{}]", article.tags().join(", "))
        };
        println!(
            "{}  {}  {}{}",
            view::format_date(article.display_date(), config),
            article.path(),
            article.title(),
            tags
        );
    }

    Ok(())
}
