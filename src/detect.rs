//! Value detection over recognized text.
//!
//! The engine tokenizes the text on whitespace and slides a bounded window
//! over the tokens: for every start index, every window up to the
//! catalog-derived maximum is evaluated, longest first, against every
//! descriptor of every format family. Each successful parse becomes a
//! [`Candidate`]; all matches at all window lengths are retained, so the same
//! quantity may surface at several granularities and downstream consumers
//! resolve the ambiguity.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::formats::{DetectedValue, FormatCatalog, FormatDescriptor, FormatError, ValueKind};

/// Upper bound on waiting for dispatched window units to drain. Generous on
/// purpose: it exists to tolerate pathological inputs, not to pace work.
const DRAIN_CEILING: Duration = Duration::from_secs(24 * 60 * 60);

/// A successfully parsed value and where it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    /// The source substring (single-space-joined window).
    pub text: String,
    /// The parsed typed value.
    pub value: DetectedValue,
    /// Which format family matched.
    pub kind: ValueKind,
    /// Canonical rendering of the descriptor that matched.
    pub rendering: String,
}

/// Events emitted during a detection run.
#[derive(Debug, Clone)]
pub enum DetectEvent {
    /// Detection started; `total` is the number of windows to evaluate.
    Started { total: usize },
    /// One window was fully evaluated. Carries the window's most recent
    /// candidate, if any format matched it.
    WindowScanned {
        position: usize,
        total: usize,
        candidate: Option<Candidate>,
    },
}

/// Errors from a detection run.
#[derive(Debug, Error)]
pub enum DetectError {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("detection worker failed: {0}")]
    Worker(String),

    #[error("detection did not drain within the ceiling")]
    DrainCeiling,
}

struct FamilySnapshot {
    kind: ValueKind,
    descriptors: Vec<FormatDescriptor>,
}

/// Sliding-window value detection engine.
pub struct DetectionEngine {
    workers: usize,
    cancel_requested: Arc<AtomicBool>,
}

impl DetectionEngine {
    /// Create an engine with the default worker bound of twice the available
    /// parallelism.
    pub fn new() -> Self {
        let parallelism = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self {
            workers: parallelism * 2,
            cancel_requested: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Override the worker bound.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Find every substring of `text` that some catalog formatter parses.
    ///
    /// Candidates come back as an unordered collection; two runs over the
    /// same input yield the same multiset of (text, value, kind) triples. A
    /// fatal format failure aborts the run all-or-nothing: dispatched
    /// sibling units drain to completion first, accumulated candidates are
    /// discarded, and the caller receives the error.
    pub async fn detect(
        &self,
        text: &str,
        catalog: &FormatCatalog,
        event_tx: mpsc::Sender<DetectEvent>,
    ) -> Result<Vec<Candidate>, DetectError> {
        self.cancel_requested.store(false, Ordering::SeqCst);

        let tokens: Arc<Vec<String>> =
            Arc::new(text.split_whitespace().map(String::from).collect());
        let n = tokens.len();
        if n == 0 {
            let _ = event_tx.send(DetectEvent::Started { total: 0 }).await;
            return Ok(Vec::new());
        }

        let max_window = catalog.max_window_words().max(1);
        let snapshot: Arc<Vec<FamilySnapshot>> = Arc::new(
            catalog
                .families()
                .iter()
                .map(|f| FamilySnapshot {
                    kind: f.kind(),
                    descriptors: f.descriptors().to_vec(),
                })
                .collect(),
        );

        let total: usize = (0..n).map(|i| n.min(i + max_window) - i).sum();
        let _ = event_tx.send(DetectEvent::Started { total }).await;
        tracing::debug!(tokens = n, max_window, windows = total, "detection started");

        let results: Arc<Mutex<Vec<Candidate>>> = Arc::new(Mutex::new(Vec::new()));
        let position = Arc::new(AtomicUsize::new(0));
        let deadline = tokio::time::Instant::now() + DRAIN_CEILING;

        let mut first_err: Option<DetectError> = None;
        let mut handles: Vec<JoinHandle<Result<(), FormatError>>> =
            Vec::with_capacity(self.workers);

        for i in 0..n {
            let hi = n.min(i + max_window);
            // Longest windows first; shorter matches are still evaluated.
            for j in (i + 1..=hi).rev() {
                let handle = self.dispatch(
                    i,
                    j,
                    total,
                    tokens.clone(),
                    snapshot.clone(),
                    results.clone(),
                    position.clone(),
                    event_tx.clone(),
                );
                handles.push(handle);

                if handles.len() >= self.workers {
                    for handle in handles.drain(..) {
                        join_unit(handle, deadline, &mut first_err).await;
                    }
                }
            }
        }

        for handle in handles {
            join_unit(handle, deadline, &mut first_err).await;
        }

        if let Some(err) = first_err {
            return Err(err);
        }

        let candidates = Arc::try_unwrap(results)
            .map(|m| m.into_inner().unwrap())
            .unwrap_or_else(|arc| arc.lock().unwrap().clone());
        Ok(candidates)
    }

    /// Request cancellation of an in-flight detection run. Windows not yet
    /// started become no-ops; in-flight windows run to completion.
    pub fn cancel_detection(&self) {
        self.cancel_requested.store(true, Ordering::SeqCst);
        tracing::debug!("detection cancellation requested");
    }

    #[allow(clippy::too_many_arguments)]
    fn dispatch(
        &self,
        i: usize,
        j: usize,
        total: usize,
        tokens: Arc<Vec<String>>,
        snapshot: Arc<Vec<FamilySnapshot>>,
        results: Arc<Mutex<Vec<Candidate>>>,
        position: Arc<AtomicUsize>,
        event_tx: mpsc::Sender<DetectEvent>,
    ) -> JoinHandle<Result<(), FormatError>> {
        let cancel = self.cancel_requested.clone();
        tokio::task::spawn_blocking(move || {
            // Cooperative cancellation: checked once, immediately before the
            // unit evaluates its window.
            if cancel.load(Ordering::SeqCst) {
                return Ok(());
            }

            let window = tokens[i..j].join(" ");
            let mut latest: Option<Candidate> = None;
            for family in snapshot.iter() {
                for descriptor in &family.descriptors {
                    if let Some(value) = descriptor.format().parse(&window)? {
                        let candidate = Candidate {
                            text: window.clone(),
                            value,
                            kind: family.kind,
                            rendering: descriptor.rendering().to_string(),
                        };
                        results.lock().unwrap().push(candidate.clone());
                        latest = Some(candidate);
                    }
                }
            }

            let position = position.fetch_add(1, Ordering::SeqCst) + 1;
            let _ = futures::executor::block_on(event_tx.send(DetectEvent::WindowScanned {
                position,
                total,
                candidate: latest,
            }));
            Ok(())
        })
    }
}

impl Default for DetectionEngine {
    fn default() -> Self {
        Self::new()
    }
}

async fn join_unit(
    handle: JoinHandle<Result<(), FormatError>>,
    deadline: tokio::time::Instant,
    first_err: &mut Option<DetectError>,
) {
    match tokio::time::timeout_at(deadline, handle).await {
        Ok(Ok(Ok(()))) => {}
        Ok(Ok(Err(e))) => {
            if first_err.is_none() {
                *first_err = Some(DetectError::Format(e));
            }
        }
        Ok(Err(e)) => {
            if first_err.is_none() {
                *first_err = Some(DetectError::Worker(e.to_string()));
            }
        }
        Err(_) => {
            if first_err.is_none() {
                *first_err = Some(DetectError::DrainCeiling);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::{FamilyCatalog, ValueFormat};
    use std::time::Duration;

    fn channel() -> (mpsc::Sender<DetectEvent>, mpsc::Receiver<DetectEvent>) {
        mpsc::channel(256)
    }

    /// Format that records every window it is offered and never matches.
    struct Recorder {
        canonical: &'static str,
        seen: Arc<Mutex<Vec<String>>>,
        delay_ms: u64,
    }

    impl ValueFormat for Recorder {
        fn canonical(&self) -> String {
            self.canonical.to_string()
        }

        fn parse(&self, text: &str) -> Result<Option<DetectedValue>, FormatError> {
            self.seen.lock().unwrap().push(text.to_string());
            if self.delay_ms > 0 {
                std::thread::sleep(Duration::from_millis(self.delay_ms));
            }
            Ok(None)
        }
    }

    fn recorder_catalog(canonical: &'static str, delay_ms: u64) -> (FormatCatalog, Arc<Mutex<Vec<String>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let format = Arc::new(Recorder {
            canonical,
            seen: seen.clone(),
            delay_ms,
        });
        let descriptor = FormatDescriptor::new(canonical, vec!["xx_XX"], format);
        let catalog = FormatCatalog::from_families(vec![FamilyCatalog::new(
            ValueKind::Number,
            vec![descriptor],
        )]);
        (catalog, seen)
    }

    #[tokio::test]
    async fn empty_input_invokes_no_parser() {
        let (catalog, seen) = recorder_catalog("1 2 3", 0);
        let engine = DetectionEngine::new();
        let (tx, _rx) = channel();
        let candidates = engine.detect("", &catalog, tx).await.unwrap();
        assert!(candidates.is_empty());
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn window_bound_is_respected() {
        // Canonical "1 2 3" puts the window bound at 3 for a 2-token input.
        let (catalog, seen) = recorder_catalog("1 2 3", 0);
        let engine = DetectionEngine::new();
        let (tx, _rx) = channel();
        engine.detect("t1 t2", &catalog, tx).await.unwrap();

        let mut windows = seen.lock().unwrap().clone();
        windows.sort();
        assert_eq!(windows, vec!["t1", "t1 t2", "t2"]);
    }

    #[tokio::test]
    async fn every_window_fires_one_event() {
        let (catalog, _) = recorder_catalog("1 2", 0);
        let engine = DetectionEngine::new();
        let (tx, mut rx) = channel();
        // 3 tokens, max window 2: windows (0,2) (0,1) (1,3) (1,2) (2,3).
        engine.detect("a b c", &catalog, tx).await.unwrap();

        let mut started_total = None;
        let mut scanned = 0;
        while let Ok(event) = rx.try_recv() {
            match event {
                DetectEvent::Started { total } => started_total = Some(total),
                DetectEvent::WindowScanned { .. } => scanned += 1,
            }
        }
        assert_eq!(started_total, Some(5));
        assert_eq!(scanned, 5);
    }

    #[tokio::test]
    async fn detection_is_idempotent() {
        let catalog = FormatCatalog::global();
        let engine = DetectionEngine::new();
        let text = "Rechnung vom 15.03.2021 über 1.234,56 € fällig";

        let (tx, _rx) = channel();
        let first = engine.detect(text, catalog, tx).await.unwrap();
        let (tx, _rx) = channel();
        let second = engine.detect(text, catalog, tx).await.unwrap();

        let key = |c: &Candidate| (c.text.clone(), c.kind.as_str(), format!("{:?}", c.value));
        let mut a: Vec<_> = first.iter().map(key).collect();
        let mut b: Vec<_> = second.iter().map(key).collect();
        a.sort();
        b.sort();
        assert!(!a.is_empty());
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn dollar_amount_is_detected() {
        let catalog = FormatCatalog::global();
        let engine = DetectionEngine::new();
        let (tx, _rx) = channel();
        let candidates = engine
            .detect("total $12.00 due", catalog, tx)
            .await
            .unwrap();

        let hit = candidates
            .iter()
            .find(|c| c.kind == ValueKind::Currency && c.text == "$12.00")
            .expect("currency candidate");
        assert_eq!(
            hit.value,
            DetectedValue::Currency {
                amount: 12.0,
                symbol: "$".to_string()
            }
        );
    }

    #[tokio::test]
    async fn matches_are_retained_at_all_granularities() {
        let catalog = FormatCatalog::global();
        let engine = DetectionEngine::new();
        let (tx, _rx) = channel();
        // "1 234" is a space-grouped number as a whole and two plain numbers
        // as single tokens; all three survive.
        let candidates = engine.detect("1 234", catalog, tx).await.unwrap();

        let numbers: Vec<f64> = candidates
            .iter()
            .filter(|c| c.kind == ValueKind::Number)
            .filter_map(|c| match c.value {
                DetectedValue::Number(v) => Some(v),
                _ => None,
            })
            .collect();
        assert!(numbers.contains(&1234.0));
        assert!(numbers.contains(&1.0));
        assert!(numbers.contains(&234.0));
    }

    #[tokio::test]
    async fn cancellation_skips_unstarted_windows() {
        let (catalog, seen) = recorder_catalog("1", 50);
        let engine = Arc::new(DetectionEngine::new().with_workers(1));
        let (tx, _rx) = channel();

        let run = {
            let engine = engine.clone();
            tokio::spawn(async move { engine.detect("a b c d", &catalog, tx).await })
        };
        tokio::time::sleep(Duration::from_millis(75)).await;
        engine.cancel_detection();

        let candidates = run.await.unwrap().unwrap();
        assert!(candidates.is_empty());
        // 4 single-token windows total; at least one never started.
        let calls = seen.lock().unwrap().len();
        assert!(calls >= 1);
        assert!(calls < 4, "expected at least one skipped window, got {calls} calls");
    }

    #[tokio::test]
    async fn fatal_parse_failure_aborts_the_run() {
        struct Defective;

        impl ValueFormat for Defective {
            fn canonical(&self) -> String {
                "defect".to_string()
            }

            fn parse(&self, text: &str) -> Result<Option<DetectedValue>, FormatError> {
                Err(FormatError::Malformed {
                    input: text.to_string(),
                    detail: "intentionally defective".to_string(),
                })
            }
        }

        let descriptor = FormatDescriptor::new("defect", vec!["xx_XX"], Arc::new(Defective));
        let catalog = FormatCatalog::from_families(vec![FamilyCatalog::new(
            ValueKind::Number,
            vec![descriptor],
        )]);

        let engine = DetectionEngine::new();
        let (tx, _rx) = channel();
        let err = engine.detect("a b", &catalog, tx).await.unwrap_err();
        assert!(matches!(err, DetectError::Format(_)));
    }
}
