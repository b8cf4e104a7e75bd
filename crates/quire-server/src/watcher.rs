//! File watching for live reload.

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc as async_mpsc;

/// Events emitted by the file watcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// A Markdown post was modified
    ContentModified(PathBuf),

    /// An image referenced by posts was modified
    AssetModified(PathBuf),

    /// File was created
    Created(PathBuf),

    /// File was deleted
    Deleted(PathBuf),
}

impl WatchEvent {
    pub fn path(&self) -> &Path {
        match self {
            WatchEvent::ContentModified(path)
            | WatchEvent::AssetModified(path)
            | WatchEvent::Created(path)
            | WatchEvent::Deleted(path) => path,
        }
    }
}

/// File watcher for detecting content changes.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
    watched: Vec<PathBuf>,
}

impl FileWatcher {
    /// Create a new file watcher for the given paths.
    ///
    /// Returns the watcher and a channel to receive events. Paths that do not
    /// exist yet are skipped and get no live reload until restart.
    pub fn new(paths: &[PathBuf]) -> Result<(Self, async_mpsc::Receiver<WatchEvent>), std::io::Error> {
        let (sync_tx, sync_rx) = mpsc::channel();
        let (async_tx, async_rx) = async_mpsc::channel(100);

        let mut watcher = notify::recommended_watcher(move |res: Result<notify::Event, _>| {
            if let Ok(event) = res {
                let _ = sync_tx.send(event);
            }
        })
        .map_err(std::io::Error::other)?;

        let mut watched = Vec::new();
        for path in paths {
            if !path.exists() {
                tracing::info!(
                    "{} does not exist, live reload disabled for it until restart",
                    path.display()
                );
                continue;
            }

            watcher
                .watch(path, RecursiveMode::Recursive)
                .map_err(std::io::Error::other)?;
            watched.push(path.clone());
        }

        std::thread::spawn(move || {
            let mut last_event_time: Option<Instant> = None;

            while let Ok(event) = sync_rx.recv() {
                // Editors emit bursts of events per save
                let now = Instant::now();
                if last_event_time.is_some_and(|last| now.duration_since(last) < DEBOUNCE) {
                    continue;
                }

                let events: Vec<WatchEvent> = event
                    .paths
                    .iter()
                    .filter_map(|path| classify_event(path, &event.kind))
                    .collect();

                if events.is_empty() {
                    continue;
                }
                last_event_time = Some(now);

                for e in events {
                    if async_tx.blocking_send(e).is_err() {
                        return;
                    }
                }
            }
        });

        Ok((
            Self {
                _watcher: watcher,
                watched,
            },
            async_rx,
        ))
    }

    /// Paths actually being watched.
    pub fn watched(&self) -> &[PathBuf] {
        &self.watched
    }
}

const DEBOUNCE: Duration = Duration::from_millis(100);

/// Classify a notify event into a [`WatchEvent`].
fn classify_event(path: &Path, kind: &notify::EventKind) -> Option<WatchEvent> {
    use notify::EventKind;

    match kind {
        EventKind::Create(_) => Some(WatchEvent::Created(path.to_path_buf())),
        EventKind::Remove(_) => Some(WatchEvent::Deleted(path.to_path_buf())),
        EventKind::Modify(_) => {
            if is_markdown(path) {
                Some(WatchEvent::ContentModified(path.to_path_buf()))
            } else if quire_content::mime_for_path(path).is_some() {
                Some(WatchEvent::AssetModified(path.to_path_buf()))
            } else {
                None
            }
        }
        _ => None,
    }
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md") || ext.eq_ignore_ascii_case("markdown"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, DataChange, ModifyKind, RemoveKind};
    use notify::EventKind;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn classifies_events() {
        let modify = EventKind::Modify(ModifyKind::Data(DataChange::Content));

        assert_eq!(
            classify_event(Path::new("content/a.md"), &modify),
            Some(WatchEvent::ContentModified(PathBuf::from("content/a.md")))
        );
        assert_eq!(
            classify_event(Path::new("content/cat.PNG"), &modify),
            Some(WatchEvent::AssetModified(PathBuf::from("content/cat.PNG")))
        );
        assert_eq!(classify_event(Path::new("content/.a.md.swp"), &modify), None);
        assert_eq!(
            classify_event(Path::new("content/b.md"), &EventKind::Create(CreateKind::File)),
            Some(WatchEvent::Created(PathBuf::from("content/b.md")))
        );
        assert_eq!(
            classify_event(Path::new("content/b.md"), &EventKind::Remove(RemoveKind::File)),
            Some(WatchEvent::Deleted(PathBuf::from("content/b.md")))
        );
    }

    #[test]
    fn skips_missing_paths() {
        let temp = tempdir().unwrap();
        let missing = temp.path().join("content");

        let (watcher, _rx) =
            FileWatcher::new(&[missing, temp.path().to_path_buf()]).unwrap();

        assert_eq!(watcher.watched(), &[temp.path().to_path_buf()]);
    }

    #[tokio::test]
    async fn watches_file_changes() {
        let temp = tempdir().unwrap();
        let test_file = temp.path().join("post.md");

        let (watcher, mut rx) = FileWatcher::new(&[temp.path().to_path_buf()]).unwrap();

        // Give inotify time to set up
        tokio::time::sleep(Duration::from_millis(100)).await;

        fs::write(&test_file, "# Created").unwrap();

        let event = tokio::time::timeout(Duration::from_secs(3), rx.recv()).await;

        drop(watcher);

        assert!(event.is_ok(), "timeout waiting for file watch event");
        assert!(event.unwrap().is_some(), "channel should not be closed");
    }
}
