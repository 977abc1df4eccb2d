use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

use crate::source::AssetSource;
use crate::texture::DecodedImage;
use crate::AssetError;

/// Identifies one requested load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoadId(pub u64);

/// Completion of a requested load.
#[derive(Debug)]
pub enum LoadEvent {
    Loaded {
        id: LoadId,
        name: String,
        path: String,
        image: DecodedImage,
    },
    Failed {
        id: LoadId,
        name: String,
        path: String,
        error: AssetError,
    },
}

impl LoadEvent {
    pub fn name(&self) -> &str {
        match self {
            Self::Loaded { name, .. } | Self::Failed { name, .. } => name,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            Self::Loaded { path, .. } | Self::Failed { path, .. } => path,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Counters of requested and finished loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    pub items_total: usize,
    pub items_loaded: usize,
    pub items_failed: usize,
}

impl Progress {
    pub fn finished(&self) -> usize {
        self.items_loaded + self.items_failed
    }

    pub fn pending(&self) -> usize {
        self.items_total - self.finished()
    }
}

/// Coordinates background loads and hands their results back to the owner.
///
/// Each request runs on its own worker thread: read through the
/// [`AssetSource`], then decode. Results queue up until [`LoadingManager::poll`].
pub struct LoadingManager {
    source: Arc<dyn AssetSource>,
    tx: Sender<LoadEvent>,
    rx: Receiver<LoadEvent>,
    progress: Progress,
    next_id: u64,
}

impl std::fmt::Debug for LoadingManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadingManager")
            .field("progress", &self.progress)
            .finish_non_exhaustive()
    }
}

impl LoadingManager {
    pub fn new(source: Arc<dyn AssetSource>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            source,
            tx,
            rx,
            progress: Progress::default(),
            next_id: 0,
        }
    }

    pub fn progress(&self) -> Progress {
        self.progress
    }

    /// True when every requested load has finished (or none was requested).
    pub fn is_idle(&self) -> bool {
        self.progress.pending() == 0
    }

    /// Start reading and decoding an image in the background.
    pub fn request_image(&mut self, name: &str, path: &str) -> LoadId {
        let id = LoadId(self.next_id);
        self.next_id += 1;
        self.progress.items_total += 1;

        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        let (job_name, job_path) = (name.to_string(), path.to_string());
        tracing::debug!(name, path, "load started");

        let spawned = std::thread::Builder::new()
            .name(format!("load-{name}"))
            .spawn(move || {
                let event = match read_image(source.as_ref(), &job_path) {
                    Ok(image) => LoadEvent::Loaded {
                        id,
                        name: job_name,
                        path: job_path,
                        image,
                    },
                    Err(error) => LoadEvent::Failed {
                        id,
                        name: job_name,
                        path: job_path,
                        error,
                    },
                };
                // The manager may already be gone; nobody is waiting then.
                let _ = tx.send(event);
            });

        if spawned.is_err() {
            let _ = self.tx.send(LoadEvent::Failed {
                id,
                name: name.to_string(),
                path: path.to_string(),
                error: AssetError::Spawn(name.to_string()),
            });
        }
        id
    }

    /// Drain every completion that has arrived, without blocking.
    pub fn poll(&mut self) -> Vec<LoadEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            self.record(&event);
            events.push(event);
        }
        events
    }

    /// Block until every pending load finished or `timeout` elapsed.
    pub fn wait_idle(&mut self, timeout: Duration) -> Vec<LoadEvent> {
        let deadline = Instant::now() + timeout;
        let mut events = self.poll();
        while !self.is_idle() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(event) => {
                    self.record(&event);
                    events.push(event);
                }
                Err(RecvTimeoutError::Timeout) => {
                    tracing::warn!(pending = self.progress.pending(), "timed out waiting for loads");
                    break;
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        events
    }

    fn record(&mut self, event: &LoadEvent) {
        match event {
            LoadEvent::Loaded { .. } => self.progress.items_loaded += 1,
            LoadEvent::Failed { .. } => self.progress.items_failed += 1,
        }
        tracing::debug!(
            path = event.path(),
            finished = self.progress.finished(),
            total = self.progress.items_total,
            "load progress"
        );
        if self.is_idle() {
            tracing::info!(
                loaded = self.progress.items_loaded,
                failed = self.progress.items_failed,
                "all requested assets finished"
            );
        }
    }
}

fn read_image(source: &dyn AssetSource, path: &str) -> Result<DecodedImage, AssetError> {
    let bytes = source.read(path)?;
    DecodedImage::decode(&bytes).map_err(|source| AssetError::Decode {
        path: path.to_string(),
        source,
    })
}
