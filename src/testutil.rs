//! In-memory doubles for the network, the clock and the output sink.
//!
//! Used by unit tests and by the end-to-end tests under `tests/`.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{RawPage, Sheet};
use crate::services::{Clock, Transport};
use crate::storage::{OutputSink, render_csv};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Clock whose time only moves when slept on or advanced.
#[derive(Debug)]
pub struct FakeClock {
    now: Mutex<Instant>,
    sleeps: Mutex<Vec<Duration>>,
}

impl FakeClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Instant::now()),
            sleeps: Mutex::new(Vec::new()),
        }
    }

    /// Move time forward without recording a sleep.
    pub fn advance(&self, duration: Duration) {
        *lock(&self.now) += duration;
    }

    /// Every sleep requested so far, in order.
    pub fn sleeps(&self) -> Vec<Duration> {
        lock(&self.sleeps).clone()
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Clock for FakeClock {
    fn now(&self) -> Instant {
        *lock(&self.now)
    }

    async fn sleep(&self, duration: Duration) {
        lock(&self.sleeps).push(duration);
        self.advance(duration);
    }
}

#[derive(Debug, Default)]
struct Routes {
    /// Queued responses per URL; the last one repeats.
    responses: HashMap<String, VecDeque<(u16, String)>>,
    requests: Vec<String>,
}

/// Canned responses keyed by URL. Unknown URLs answer 404.
///
/// Clones share state, so a test can keep a handle after moving one into
/// a fetcher.
#[derive(Debug, Clone, Default)]
pub struct StaticTransport {
    routes: Arc<Mutex<Routes>>,
}

impl StaticTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.sequence(url, vec![(200, body.into())])
    }

    pub fn status(self, url: impl Into<String>, status: u16) -> Self {
        self.sequence(url, vec![(status, String::new())])
    }

    pub fn sequence<B: Into<String>>(self, url: impl Into<String>, responses: Vec<(u16, B)>) -> Self {
        let queue = responses.into_iter().map(|(s, b)| (s, b.into())).collect();
        lock(&self.routes).responses.insert(url.into(), queue);
        self
    }

    /// Number of requests made for `url`.
    pub fn hits(&self, url: &str) -> usize {
        lock(&self.routes).requests.iter().filter(|u| *u == url).count()
    }

    /// Every requested URL, in request order.
    pub fn requests(&self) -> Vec<String> {
        lock(&self.routes).requests.clone()
    }
}

#[async_trait]
impl Transport for StaticTransport {
    async fn get(&self, url: &str) -> Result<RawPage> {
        let mut routes = lock(&self.routes);
        routes.requests.push(url.to_string());

        let (status, body) = match routes.responses.get_mut(url) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap_or_default(),
            Some(queue) => queue.front().cloned().unwrap_or_default(),
            None => (404, String::new()),
        };
        Ok(RawPage::new(url, status, body))
    }
}

/// Sink that keeps rendered CSV in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    files: Arc<Mutex<BTreeMap<PathBuf, Vec<u8>>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paths written so far, sorted.
    pub fn paths(&self) -> Vec<PathBuf> {
        lock(&self.files).keys().cloned().collect()
    }

    pub fn contents(&self, path: impl AsRef<Path>) -> Option<String> {
        lock(&self.files)
            .get(path.as_ref())
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }
}

#[async_trait]
impl OutputSink for MemorySink {
    async fn write(&self, path: &Path, sheet: &Sheet) -> Result<()> {
        let bytes = render_csv(sheet)?;
        lock(&self.files).insert(path.to_path_buf(), bytes);
        Ok(())
    }
}
