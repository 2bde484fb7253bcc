//! Rebuild the collection whenever the version marker changes.

use super::open_store;
use anyhow::{Context, Result};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc;

pub async fn watch_articles(config_path: &Path) -> Result<()> {
    let store = Arc::new(open_store(config_path)?);
    if !store.config().watch_for_changes {
        tracing::debug!("watch_for_changes is off in the configuration; watching anyway");
    }

    store.on_refresh(|collection| {
        println!(
            "Rebuilt: {} articles, {} tags, {} skipped",
            collection.len(),
            collection.tags().len(),
            collection.skipped().len()
        );
    });

    let marker = store.version().clone();
    let trigger = store.trigger();
    let watch_dir = marker.watch_dir().to_path_buf();

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut watcher = RecommendedWatcher::new(
        move |res| {
            let _ = tx.send(res);
        },
        notify::Config::default(),
    )
    .context("Failed to initialize watcher")?;

    watcher
        .watch(&watch_dir, RecursiveMode::NonRecursive)
        .with_context(|| format!("Failed to watch {:?}", watch_dir))?;

    println!("Watching {:?} for changes (Ctrl+C to stop)...", marker.path());

    loop {
        tokio::select! {
            event = rx.recv() => {
                let Some(event) = event else { break };
                match event {
                    Ok(event) if touches_marker(&event, |p| marker.is_marker(p)) => {
                        if let Ok(stamp) = marker.stamp() {
                            tracing::info!("Version marker changed (now '{}')", stamp.content);
                        }
                        let trigger = trigger.clone();
                        tokio::task::spawn_blocking(move || trigger.fire())
                            .await
                            .context("Refresh task panicked")?;
                    }
                    Ok(_) => {}
                    Err(err) => tracing::warn!("Watcher error: {}", err),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!("\nStopping watcher");
                break;
            }
        }
    }

    Ok(())
}

fn touches_marker(event: &Event, is_marker: impl Fn(&Path) -> bool) -> bool {
    matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_))
        && event.paths.iter().any(|p| is_marker(p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, ModifyKind};
    use std::path::PathBuf;

    fn event(kind: EventKind, path: &str) -> Event {
        Event::new(kind).add_path(PathBuf::from(path))
    }

    #[test]
    fn test_touches_marker() {
        let is_marker = |p: &Path| p == Path::new("/blog/version");

        assert!(touches_marker(
            &event(EventKind::Modify(ModifyKind::Any), "/blog/version"),
            is_marker
        ));
        assert!(touches_marker(
            &event(EventKind::Create(CreateKind::File), "/blog/version"),
            is_marker
        ));
        assert!(!touches_marker(
            &event(EventKind::Modify(ModifyKind::Any), "/blog/post.md"),
            is_marker
        ));
        assert!(!touches_marker(
            &event(EventKind::Access(AccessKind::Any), "/blog/version"),
            is_marker
        ));
    }
}
