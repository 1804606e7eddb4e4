// Shader source file watching for hot reload
//
// The notify callback runs on its own thread, so it only records which
// tracked files changed. Rebuilding happens on the thread that owns the GL
// context, when it drains the set with take_changed().

use anyhow::{Context, Result};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Tracked files plus the changes recorded since the last drain
struct WatchState {
    tracked: HashSet<PathBuf>,
    changed: Mutex<HashSet<PathBuf>>,
}

impl WatchState {
    fn new(tracked: HashSet<PathBuf>) -> Self {
        Self { tracked, changed: Mutex::new(HashSet::new()) }
    }

    fn record(&self, event: &Event) {
        if !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)) {
            return;
        }

        let mut changed = self.changed.lock();
        for path in &event.paths {
            let path = normalize_path(path);
            if self.tracked.contains(&path) {
                log::debug!("Shader source changed: {:?}", path);
                changed.insert(path);
            }
        }
    }
}

/// Watches shader source files and remembers which ones changed
pub struct ShaderWatcher {
    state: Arc<WatchState>,
    // Dropping the watcher stops event delivery
    _watcher: RecommendedWatcher,
}

impl ShaderWatcher {
    /// Start watching the given source files.
    ///
    /// Parent directories are watched rather than the files themselves, so
    /// editors that save by replacing the file are still seen.
    pub fn new<I, P>(paths: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let tracked: HashSet<PathBuf> = paths.into_iter().map(|p| normalize_path(p.as_ref())).collect();
        let state = Arc::new(WatchState::new(tracked));

        let handler_state = Arc::clone(&state);
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
            Ok(event) => handler_state.record(&event),
            Err(e) => log::warn!("Shader watch error: {}", e),
        })
        .context("Failed to create shader file watcher")?;

        let dirs: HashSet<&Path> = state.tracked.iter().filter_map(|p| p.parent()).collect();
        for dir in &dirs {
            watcher
                .watch(dir, RecursiveMode::NonRecursive)
                .with_context(|| format!("Failed to watch shader directory: {:?}", dir))?;
        }

        log::info!("Watching {} shader source(s) in {} directories", state.tracked.len(), dirs.len());

        Ok(Self { state, _watcher: watcher })
    }

    /// Drain the files changed since the last call
    pub fn take_changed(&self) -> HashSet<PathBuf> {
        std::mem::take(&mut *self.state.changed.lock())
    }

    pub fn is_tracked(&self, path: &Path) -> bool {
        self.state.tracked.contains(&normalize_path(path))
    }
}

/// Canonical form used to compare watched paths with event paths.
///
/// Falls back to canonicalizing only the parent, so a file that was just
/// removed still maps to the same key.
pub fn normalize_path(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }

    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    match (parent.canonicalize(), path.file_name()) {
        (Ok(parent), Some(name)) => parent.join(name),
        _ => path.to_path_buf(),
    }
}
