//! File system watcher for auto-rebuild.
//!
//! Monitors the content and theme directories (and the config file) and
//! triggers one generator run per burst of changes. Events from all watched
//! roots share a single debounce window, so an editor touching many files on
//! save produces exactly one rebuild.
//!
//! The rebuild runs synchronously inside the event loop: events arriving
//! while the generator is busy accumulate and form the next window, so
//! rebuilds never overlap. A failed rebuild is logged and the loop keeps
//! watching; the previously built output stays served and no reload
//! notification goes out.

use crate::{build::build_site, config::SiteConfig, log, reload::ReloadHub};
use anyhow::{Context, Result};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use rustc_hash::FxHashSet;
use std::{
    path::{Path, PathBuf},
    sync::{
        Arc,
        mpsc::{Receiver, RecvTimeoutError, channel},
    },
    time::{Duration, Instant},
};

/// Coalescing window: changes within this span trigger a single rebuild.
const DEBOUNCE: Duration = Duration::from_millis(300);

/// Idle receive timeout when nothing is pending.
const IDLE_TIMEOUT: Duration = Duration::from_secs(60);

// =============================================================================
// Path Utilities
// =============================================================================

/// Check if path is a temp/backup file (editor artifacts).
fn is_temp_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    matches!(ext, "bck" | "bak" | "backup" | "swp" | "swo" | "tmp")
        || name.ends_with('~')
        || name.starts_with('.')
}

/// Creations, modifications and removals matter for rebuilds. Access events
/// and metadata churn are noise.
const fn is_relevant(event: &Event) -> bool {
    matches!(
        event.kind,
        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
    )
}

// =============================================================================
// Debounce State
// =============================================================================

/// Batches rapid file events into one rebuild trigger per window.
struct Debouncer {
    pending: FxHashSet<PathBuf>,
    last_event: Option<Instant>,
}

impl Debouncer {
    fn new() -> Self {
        Self {
            pending: FxHashSet::default(),
            last_event: None,
        }
    }

    fn add(&mut self, event: Event) {
        for path in event.paths {
            if !is_temp_file(&path) {
                self.pending.insert(path);
            }
        }
        if !self.pending.is_empty() {
            self.last_event = Some(Instant::now());
        }
    }

    fn ready(&self) -> bool {
        !self.pending.is_empty() && self.last_event.is_some_and(|t| t.elapsed() >= DEBOUNCE)
    }

    fn take(&mut self) -> Vec<PathBuf> {
        self.last_event = None;
        self.pending.drain().collect()
    }

    fn timeout(&self) -> Duration {
        if self.pending.is_empty() {
            IDLE_TIMEOUT
        } else {
            DEBOUNCE
        }
    }
}

// =============================================================================
// Rebuild Loop
// =============================================================================

/// A registered watcher plus its event stream, ready to run.
///
/// Construction registers every watch target and is fatal on failure; the
/// blocking loop itself is meant for a background thread.
pub struct RebuildLoop {
    // Held for its side effect: dropping the watcher stops event delivery.
    _watcher: RecommendedWatcher,
    rx: Receiver<notify::Result<Event>>,
}

impl RebuildLoop {
    /// Register watches on the content directory (required), the theme
    /// directory (when present) and the config file.
    pub fn new(config: &SiteConfig) -> Result<Self> {
        let (tx, rx) = channel();
        let mut watcher =
            notify::recommended_watcher(tx).context("Failed to create file watcher")?;

        let content = config.content_dir();
        watcher
            .watch(&content, RecursiveMode::Recursive)
            .with_context(|| format!("Failed to watch content: {}", content.display()))?;
        log!("watch"; "{}", content.display());

        let theme = config.theme_dir();
        if theme.is_dir() {
            watcher
                .watch(&theme, RecursiveMode::Recursive)
                .with_context(|| format!("Failed to watch theme: {}", theme.display()))?;
            log!("watch"; "{}", theme.display());
        }

        if config.config_path.is_file() {
            watcher
                .watch(&config.config_path, RecursiveMode::NonRecursive)
                .with_context(|| {
                    format!("Failed to watch config: {}", config.config_path.display())
                })?;
        }

        Ok(Self {
            _watcher: watcher,
            rx,
        })
    }

    /// Block forever, rebuilding once per change burst.
    ///
    /// Exits only when the watcher backend disconnects.
    pub fn run(self, config: &SiteConfig, reload: Option<Arc<ReloadHub>>) -> Result<()> {
        let mut debouncer = Debouncer::new();

        loop {
            match self.rx.recv_timeout(debouncer.timeout()) {
                Ok(Ok(event)) if is_relevant(&event) => debouncer.add(event),
                Ok(Ok(_)) => {}
                Ok(Err(err)) => log!("watch"; "error: {err}"),
                Err(RecvTimeoutError::Timeout) => {
                    if debouncer.ready() {
                        let changed = debouncer.take();
                        rebuild(config, &changed, reload.as_deref());
                    }
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        Ok(())
    }
}

/// Run one generator invocation for a change burst.
///
/// On success, notify connected browsers. On failure, log and keep the
/// previous output serving; no notification goes out.
fn rebuild(config: &SiteConfig, changed: &[PathBuf], reload: Option<&ReloadHub>) {
    let root = config.root();
    let first = changed
        .first()
        .map(|p| p.strip_prefix(root).unwrap_or(p).display().to_string())
        .unwrap_or_default();

    match changed.len() {
        0 => return,
        1 => log!("watch"; "{first} changed, rebuilding..."),
        n => log!("watch"; "{first} (+{} more) changed, rebuilding...", n - 1),
    }

    match build_site(config) {
        Ok(()) => {
            if let Some(hub) = reload {
                hub.broadcast_reload();
            }
        }
        Err(err) => log!("watch"; "rebuild failed: {err}"),
    }
}
