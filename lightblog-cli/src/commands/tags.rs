//! List every tag with its article count.

use super::open_store;
use anyhow::Result;
use std::path::Path;

pub fn list_tags(config_path: &Path, json: bool) -> Result<()> {
    let store = open_store(config_path)?;
    let collection = store.snapshot();

    if json {
        println!("{}", serde_json::to_string_pretty(&collection.sorted_tags())?);
    } else {
        for tag in collection.sorted_tags() {
            println!("{} ({})", tag, collection.filter(tag).len());
        }
    }

    Ok(())
}
