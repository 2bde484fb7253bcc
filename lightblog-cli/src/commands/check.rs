//! Parse every article and report the skipped ones.

use super::open_store;
use crate::view;
use anyhow::{bail, Result};
use std::path::Path;

/// Exits with an error when any article file was skipped.
pub fn check_articles(config_path: &Path, json: bool) -> Result<()> {
    let store = open_store(config_path)?;
    let collection = store.snapshot();
    let skipped = collection.skipped();

    if json {
        let report = view::CheckReport {
            articles: collection.len(),
            tags: collection.tags().len(),
            skipped: skipped.iter().map(view::skipped).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "Check complete: {} articles, {} tags, {} skipped",
            collection.len(),
            collection.tags().len(),
            skipped.len()
        );
        for entry in skipped {
            println!("  - {}: {}", entry.path.display(), entry.reason);
        }
    }

    if !skipped.is_empty() {
        bail!("{} article file(s) could not be processed", skipped.len());
    }
    Ok(())
}
