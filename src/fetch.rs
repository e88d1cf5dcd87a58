//! Concurrent text acquisition over scanned pages.
//!
//! Separated from UI concerns - emits events for progress tracking.
//!
//! [`TextFetcher`] turns an ordered page list into one recognized text. Pages
//! already resolved by this instance come out of a write-once cache; the rest
//! are recognized in parallel, one engine instance per page, and drained
//! strictly in page order so the output is page-ordered no matter which
//! recognition call finishes first.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::ocr::{OcrConfig, OcrEngine, OcrEngineFactory, RecognitionError};
use crate::page::{Page, PageId};

/// Default output-buffer capacity before any fetch has completed.
const DEFAULT_CAPACITY: usize = 1000;

/// Events emitted during a fetch.
#[derive(Debug, Clone)]
pub enum FetchEvent {
    /// Fetch started.
    Started { total: usize },
    /// A page was served from the cache (fired synchronously at dispatch).
    PageCached {
        position: usize,
        total: usize,
        text: String,
    },
    /// A page was recognized by an engine.
    PageRecognized {
        position: usize,
        total: usize,
        text: String,
    },
    /// A page contributed nothing because the fetch was cancelled.
    PageSkipped { position: usize, total: usize },
}

/// Errors from a fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Recognition(#[from] RecognitionError),

    #[error("recognition worker failed: {0}")]
    Worker(String),
}

/// Outcome of one recognition unit.
type UnitResult = Result<Option<String>, RecognitionError>;

enum Slot {
    Cached(String),
    Pending(JoinHandle<UnitResult>),
}

/// Concurrent, caching text fetcher.
///
/// One instance owns one cache; recognized text for a page identity is
/// written at most once and never invalidated for the instance's lifetime.
pub struct TextFetcher {
    factory: Arc<dyn OcrEngineFactory>,
    config: OcrConfig,
    workers: usize,
    cache: Mutex<HashMap<PageId, String>>,
    in_flight: Arc<Mutex<Vec<Arc<dyn OcrEngine>>>>,
    cancel_requested: Arc<AtomicBool>,
    returned_lengths: Mutex<Vec<usize>>,
}

impl TextFetcher {
    /// Create a fetcher with the given engine factory and configuration.
    pub fn new(factory: Arc<dyn OcrEngineFactory>, config: OcrConfig) -> Self {
        Self {
            factory,
            config,
            workers: 0,
            cache: Mutex::new(HashMap::new()),
            in_flight: Arc::new(Mutex::new(Vec::new())),
            cancel_requested: Arc::new(AtomicBool::new(false)),
            returned_lengths: Mutex::new(Vec::new()),
        }
    }

    /// Bound the number of in-flight recognition units. The default (0) keeps
    /// one unit in flight per uncached page.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Fetch the concatenated recognized text for `pages`, in page order.
    ///
    /// Cached pages are appended without dispatching work. Uncached pages are
    /// recognized concurrently and drained in submission order. A
    /// recognition failure is fatal; already-dispatched units still drain to
    /// completion (and their cache writes stand) before the error is
    /// returned.
    pub async fn fetch(
        &self,
        pages: &[Page],
        event_tx: mpsc::Sender<FetchEvent>,
    ) -> Result<String, FetchError> {
        self.cancel_requested.store(false, Ordering::SeqCst);
        self.in_flight.lock().unwrap().clear();

        let total = pages.len();
        let _ = event_tx.send(FetchEvent::Started { total }).await;

        let bound = if self.workers == 0 {
            total.max(1)
        } else {
            self.workers
        };

        let mut out = String::with_capacity(self.initial_capacity());
        let mut queue: VecDeque<(usize, PageId, Slot)> = VecDeque::with_capacity(total);
        let mut pending = 0usize;
        let mut first_err: Option<FetchError> = None;

        for (idx, page) in pages.iter().enumerate() {
            let cached = self.cache.lock().unwrap().get(&page.id()).cloned();
            match cached {
                Some(text) => {
                    let _ = event_tx
                        .send(FetchEvent::PageCached {
                            position: idx + 1,
                            total,
                            text: text.clone(),
                        })
                        .await;
                    queue.push_back((idx, page.id(), Slot::Cached(text)));
                }
                None => {
                    queue.push_back((idx, page.id(), Slot::Pending(self.dispatch(page))));
                    pending += 1;
                }
            }

            while pending >= bound {
                self.drain_one(&mut queue, &mut pending, &mut out, &mut first_err, total, &event_tx)
                    .await;
            }
        }

        while !queue.is_empty() {
            self.drain_one(&mut queue, &mut pending, &mut out, &mut first_err, total, &event_tx)
                .await;
        }

        self.in_flight.lock().unwrap().clear();

        if let Some(err) = first_err {
            return Err(err);
        }

        self.returned_lengths.lock().unwrap().push(out.len());
        Ok(out)
    }

    /// Request cancellation of an in-flight fetch.
    ///
    /// Sets the cooperative flag and drains the in-flight registry, invoking
    /// best-effort cancel on every engine already started. Units that have
    /// not started observe the flag and contribute nothing without invoking
    /// recognition.
    pub fn cancel_fetch(&self) {
        self.cancel_requested.store(true, Ordering::SeqCst);
        let engines: Vec<Arc<dyn OcrEngine>> =
            self.in_flight.lock().unwrap().drain(..).collect();
        tracing::debug!(engines = engines.len(), "fetch cancellation requested");
        for engine in engines {
            engine.cancel();
        }
    }

    /// Spawn one recognition unit for a page.
    fn dispatch(&self, page: &Page) -> JoinHandle<UnitResult> {
        let cancel = self.cancel_requested.clone();
        let in_flight = self.in_flight.clone();
        let factory = self.factory.clone();
        let config = self.config.clone();
        let image = page.image().clone();
        tokio::task::spawn_blocking(move || {
            // Cooperative cancellation: checked once, immediately before the
            // unit starts. In-flight units run to completion.
            if cancel.load(Ordering::SeqCst) {
                return Ok(None);
            }
            let engine = factory.create(&config)?;
            in_flight.lock().unwrap().push(engine.clone());
            engine.recognize(&image)
        })
    }

    /// Drain the front slot, writing its result into the cache and output.
    async fn drain_one(
        &self,
        queue: &mut VecDeque<(usize, PageId, Slot)>,
        pending: &mut usize,
        out: &mut String,
        first_err: &mut Option<FetchError>,
        total: usize,
        event_tx: &mpsc::Sender<FetchEvent>,
    ) {
        let Some((idx, page_id, slot)) = queue.pop_front() else {
            return;
        };
        match slot {
            Slot::Cached(text) => append_page(out, &text),
            Slot::Pending(handle) => {
                *pending -= 1;
                match handle.await {
                    Ok(Ok(Some(text))) => {
                        self.cache
                            .lock()
                            .unwrap()
                            .entry(page_id)
                            .or_insert_with(|| text.clone());
                        append_page(out, &text);
                        let _ = event_tx
                            .send(FetchEvent::PageRecognized {
                                position: idx + 1,
                                total,
                                text,
                            })
                            .await;
                    }
                    Ok(Ok(None)) => {
                        let _ = event_tx
                            .send(FetchEvent::PageSkipped {
                                position: idx + 1,
                                total,
                            })
                            .await;
                    }
                    Ok(Err(e)) => {
                        tracing::warn!(page = %page_id, error = %e, "recognition failed");
                        if first_err.is_none() {
                            *first_err = Some(FetchError::Recognition(e));
                        }
                    }
                    Err(e) => {
                        if first_err.is_none() {
                            *first_err = Some(FetchError::Worker(e.to_string()));
                        }
                    }
                }
            }
        }
    }

    /// Output capacity heuristic: median of previously returned lengths + 1.
    fn initial_capacity(&self) -> usize {
        let lengths = self.returned_lengths.lock().unwrap();
        if lengths.is_empty() {
            return DEFAULT_CAPACITY;
        }
        let mut sorted = lengths.clone();
        sorted.sort_unstable();
        sorted[sorted.len() / 2] + 1
    }
}

fn append_page(out: &mut String, text: &str) {
    if !out.is_empty() {
        out.push('\n');
    }
    out.push_str(text);
}
