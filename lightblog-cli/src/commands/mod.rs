//! CLI command implementations.

pub mod check;
pub mod list;
pub mod show;
pub mod tags;
pub mod watch;

pub use check::check_articles;
pub use list::list_articles;
pub use show::show_article;
pub use tags::list_tags;
pub use watch::watch_articles;

use anyhow::{Context, Result};
use lightblog_core::{ArticleStore, Config};
use std::path::Path;

/// Load and validate the configuration, then build the first snapshot.
pub(crate) fn open_store(config_path: &Path) -> Result<ArticleStore> {
    let config = Config::load(config_path)
        .with_context(|| format!("Failed to load configuration from {:?}", config_path))?;
    ArticleStore::open(config).context("Failed to open article store")
}
