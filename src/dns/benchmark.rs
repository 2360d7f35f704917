//! Benchmark orchestrator.
//!
//! A run probes every resolver entry as an independent unit of work on the
//! tokio runtime, bounded by a semaphore, and reports back over a channel:
//!
//! - [`BenchEvent::Started`] once probing begins
//! - [`BenchEvent::Progress`] as each resolver finishes, in completion order
//! - [`BenchEvent::Completed`] with the final ranking, or
//!   [`BenchEvent::Failed`] if the run could not start at all
//!
//! Each run carries an identity. Starting a newer run, calling
//! [`Benchmark::invalidate`], or cancelling/dropping the [`RunHandle`] makes
//! the run stale, and nothing from a stale run is ever handed to the caller.

#![allow(clippy::missing_errors_doc)]

use crate::config::BenchConfig;
use crate::dns::probe::{parse_record_type, Probe, ResolverProbe};
use crate::dns::summary::{rank, summarize};
use crate::dns::types::{RankedResult, ResolverEntry, ResolverSummary};
use crate::error::{Error, Result};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Semaphore};
use trust_dns_resolver::proto::rr::RecordType;

/// Identity of one benchmark run.
pub type RunId = u64;

/// Default number of resolvers probed at the same time.
pub const DEFAULT_MAX_CONCURRENT: usize = 8;

/// Inputs shared by every resolver in a run.
#[derive(Debug, Clone)]
pub struct BenchOptions {
    /// Domains queried against every resolver, in order
    pub domains: Vec<String>,
    /// Record type name, e.g. `"A"`
    pub record_type: String,
    /// Per-query timeout
    pub timeout: Duration,
    /// Resolvers probed concurrently; 1 means sequential
    pub max_concurrent: usize,
}

impl BenchOptions {
    /// Options with the built-in defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::from(&BenchConfig::default())
    }
}

impl Default for BenchOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&BenchConfig> for BenchOptions {
    fn from(config: &BenchConfig) -> Self {
        Self {
            domains: config.domains.clone(),
            record_type: config.record_type.clone(),
            timeout: config.timeout(),
            max_concurrent: config.max_concurrent,
        }
    }
}

/// Notifications delivered to the caller of [`Benchmark::start`].
#[derive(Debug, Clone)]
pub enum BenchEvent {
    /// Probing has begun.
    Started { run: RunId, total: usize },
    /// One resolver finished. `result.rank` is its provisional position
    /// in entry order; the final position comes with `Completed`.
    Progress {
        run: RunId,
        result: RankedResult,
        done: usize,
        total: usize,
    },
    /// All resolvers reported.
    Completed {
        run: RunId,
        results: Vec<RankedResult>,
    },
    /// The run could not start probing.
    Failed { run: RunId, error: String },
}

/// Shared run-identity bookkeeping.
#[derive(Debug, Default)]
struct RunRegistry {
    current: AtomicU64,
}

impl RunRegistry {
    fn begin(&self) -> RunId {
        self.current.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, run: RunId) -> bool {
        self.current.load(Ordering::SeqCst) == run
    }

    /// Invalidate `run` if it is still the current one.
    fn retire(&self, run: RunId) {
        let _ = self
            .current
            .compare_exchange(run, run + 1, Ordering::SeqCst, Ordering::SeqCst);
    }

    fn invalidate_all(&self) {
        self.current.fetch_add(1, Ordering::SeqCst);
    }
}

/// Sends events for one run, but only while that run is current.
#[derive(Clone)]
struct Reporter {
    run: RunId,
    registry: Arc<RunRegistry>,
    tx: mpsc::UnboundedSender<BenchEvent>,
}

impl Reporter {
    fn is_live(&self) -> bool {
        self.registry.is_current(self.run)
    }

    fn deliver(&self, event: BenchEvent) {
        if self.is_live() {
            let _ = self.tx.send(event);
        } else {
            tracing::debug!("Dropping event for stale run {}", self.run);
        }
    }
}

/// Caller's side of a running benchmark.
///
/// Dropping the handle abandons the run.
#[derive(Debug)]
pub struct RunHandle {
    run: RunId,
    registry: Arc<RunRegistry>,
    rx: mpsc::UnboundedReceiver<BenchEvent>,
}

impl RunHandle {
    /// Identity of this run.
    #[must_use]
    pub fn id(&self) -> RunId {
        self.run
    }

    /// Whether events of this run are still being delivered.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.registry.is_current(self.run)
    }

    /// Abandon the run. In-flight queries finish on their own; their
    /// results are discarded.
    pub fn cancel(&self) {
        self.registry.retire(self.run);
    }

    /// Next event of this run, or `None` once the run is over or stale.
    pub async fn next_event(&mut self) -> Option<BenchEvent> {
        if !self.is_valid() {
            return None;
        }
        let event = self.rx.recv().await?;
        // The run may have gone stale while the event sat in the channel.
        self.is_valid().then_some(event)
    }

    /// Wait for the final ranking, skipping progress events.
    pub async fn wait(mut self) -> Result<Vec<RankedResult>> {
        while let Some(event) = self.next_event().await {
            match event {
                BenchEvent::Completed { results, .. } => return Ok(results),
                BenchEvent::Failed { error, .. } => return Err(Error::RunFailed(error)),
                BenchEvent::Started { .. } | BenchEvent::Progress { .. } => {}
            }
        }
        Err(Error::Cancelled)
    }
}

impl Drop for RunHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Resolver benchmark.
///
/// # Example
///
/// ```ignore
/// let bench = Benchmark::new();
/// let entries = vec![ResolverEntry::new("Google DNS", "8.8.8.8")];
/// let ranked = bench.run(entries, BenchOptions::default()).await?;
/// for r in &ranked {
///     println!("{}: {}", r.label, r.summary_text());
/// }
/// ```
#[derive(Clone)]
pub struct Benchmark {
    probe: Arc<dyn Probe>,
    registry: Arc<RunRegistry>,
}

impl Benchmark {
    /// Create a benchmark that queries real resolvers.
    #[must_use]
    pub fn new() -> Self {
        Self::with_probe(Arc::new(ResolverProbe::new()))
    }

    /// Create a benchmark driven by a custom probe engine.
    #[must_use]
    pub fn with_probe(probe: Arc<dyn Probe>) -> Self {
        Self {
            probe,
            registry: Arc::new(RunRegistry::default()),
        }
    }

    /// Invalidate whatever run is in flight.
    pub fn invalidate(&self) {
        self.registry.invalidate_all();
    }

    /// Start a run in the background and return immediately.
    ///
    /// Any earlier run of this benchmark becomes stale. Must be called from
    /// within a tokio runtime.
    pub fn start(&self, entries: Vec<ResolverEntry>, options: BenchOptions) -> RunHandle {
        let run = self.registry.begin();
        let (tx, rx) = mpsc::unbounded_channel();
        let reporter = Reporter {
            run,
            registry: self.registry.clone(),
            tx,
        };

        let probe = self.probe.clone();
        tokio::spawn(async move {
            drive(probe, reporter, entries, options).await;
        });

        RunHandle {
            run,
            registry: self.registry.clone(),
            rx,
        }
    }

    /// Run to completion and return the ranking.
    pub async fn run(
        &self,
        entries: Vec<ResolverEntry>,
        options: BenchOptions,
    ) -> Result<Vec<RankedResult>> {
        self.start(entries, options).wait().await
    }
}

impl Default for Benchmark {
    fn default() -> Self {
        Self::new()
    }
}

/// Check everything that would keep the run from probing at all.
fn validate(entries: &[ResolverEntry], options: &BenchOptions) -> Result<RecordType> {
    if entries.is_empty() {
        return Err(Error::run_failed("no resolver entries"));
    }
    if options.domains.is_empty() {
        return Err(Error::run_failed("empty domain list"));
    }
    if options.max_concurrent == 0 {
        return Err(Error::run_failed("concurrency limit must be at least 1"));
    }
    if options.timeout.is_zero() {
        return Err(Error::run_failed("timeout must be a positive number of seconds"));
    }
    parse_record_type(&options.record_type).map_err(|e| Error::run_failed(e.to_string()))
}

/// Body of the background task behind [`Benchmark::start`].
async fn drive(
    probe: Arc<dyn Probe>,
    reporter: Reporter,
    entries: Vec<ResolverEntry>,
    options: BenchOptions,
) {
    let run = reporter.run;
    let record_type = match validate(&entries, &options) {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Run {run} failed: {e}");
            reporter.deliver(BenchEvent::Failed {
                run,
                error: e.to_string(),
            });
            return;
        }
    };

    let total = entries.len();
    tracing::info!(
        "Run {run}: {} resolvers x {} domains ({record_type}, timeout {:?}, concurrency {})",
        total,
        options.domains.len(),
        options.timeout,
        options.max_concurrent
    );
    reporter.deliver(BenchEvent::Started { run, total });

    let domains: Arc<[String]> = options.domains.into();
    let semaphore = Arc::new(Semaphore::new(options.max_concurrent));
    let done = Arc::new(AtomicUsize::new(0));
    let mut summaries: Vec<Option<ResolverSummary>> = vec![None; total];
    let mut handles = Vec::new();

    for (idx, entry) in entries.iter().enumerate() {
        if entry.is_missing_address() {
            let summary = ResolverSummary::MissingAddress;
            summaries[idx] = Some(summary);
            let count = done.fetch_add(1, Ordering::SeqCst) + 1;
            report_progress(&reporter, idx, entry, summary, count, total);
            continue;
        }

        let probe = probe.clone();
        let reporter = reporter.clone();
        let entry = entry.clone();
        let domains = domains.clone();
        let semaphore = semaphore.clone();
        let done = done.clone();
        let timeout = options.timeout;

        let handle = tokio::spawn(async move {
            let Ok(_permit) = semaphore.acquire_owned().await else {
                return None;
            };
            // Units still waiting for a permit skip probing once stale
            if !reporter.is_live() {
                return None;
            }

            let samples = probe
                .probe(&entry.address, &domains, record_type, timeout)
                .await;
            let summary = if samples.len() == domains.len() {
                summarize(&samples)
            } else {
                tracing::warn!(
                    "Probe for {} returned {} samples for {} domains",
                    entry.label,
                    samples.len(),
                    domains.len()
                );
                ResolverSummary::NoData {
                    errors: domains.len(),
                }
            };

            let count = done.fetch_add(1, Ordering::SeqCst) + 1;
            report_progress(&reporter, idx, &entry, summary, count, total);
            Some(summary)
        });
        handles.push((idx, handle));
    }

    for (idx, handle) in handles {
        match handle.await {
            Ok(Some(summary)) => summaries[idx] = Some(summary),
            Ok(None) => {}
            Err(e) => {
                // A crashed unit only costs its own resolver
                tracing::warn!("Probe task for {} failed: {e}", entries[idx].label);
                let summary = ResolverSummary::NoData {
                    errors: domains.len(),
                };
                summaries[idx] = Some(summary);
                let count = done.fetch_add(1, Ordering::SeqCst) + 1;
                report_progress(&reporter, idx, &entries[idx], summary, count, total);
            }
        }
    }

    if !reporter.is_live() {
        tracing::info!("Run {run} was abandoned; discarding results");
        return;
    }

    let collected: Vec<(ResolverEntry, ResolverSummary)> = entries
        .into_iter()
        .zip(summaries)
        .filter_map(|(entry, summary)| summary.map(|s| (entry, s)))
        .collect();
    let results = rank(collected);

    if let Some(best) = results.first().filter(|r| r.summary.is_measured()) {
        tracing::info!("Run {run} complete; fastest: {} ({})", best.label, best.summary);
    } else {
        tracing::info!("Run {run} complete; no resolver answered");
    }
    reporter.deliver(BenchEvent::Completed { run, results });
}

fn report_progress(
    reporter: &Reporter,
    idx: usize,
    entry: &ResolverEntry,
    summary: ResolverSummary,
    done: usize,
    total: usize,
) {
    tracing::debug!("[{done}/{total}] {} @ {} -> {summary}", entry.label, entry.address);
    reporter.deliver(BenchEvent::Progress {
        run: reporter.run,
        result: RankedResult {
            rank: idx + 1,
            label: entry.label.clone(),
            address: entry.address.clone(),
            summary,
        },
        done,
        total,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::types::{ProbeErrorKind, ProbeSample};
    use futures::future::BoxFuture;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Engine returning canned samples per address.
    #[derive(Default)]
    struct MockProbe {
        samples: HashMap<String, Vec<ProbeSample>>,
        delay: Duration,
        calls: Mutex<Vec<String>>,
    }

    impl MockProbe {
        fn with(mut self, address: &str, samples: Vec<ProbeSample>) -> Self {
            self.samples.insert(address.to_string(), samples);
            self
        }

        fn delayed(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl Probe for MockProbe {
        fn probe<'a>(
            &'a self,
            address: &'a str,
            domains: &'a [String],
            _record_type: RecordType,
            _timeout: Duration,
        ) -> BoxFuture<'a, Vec<ProbeSample>> {
            Box::pin(async move {
                self.calls.lock().unwrap().push(address.to_string());
                if !self.delay.is_zero() {
                    tokio::time::sleep(self.delay).await;
                }
                self.samples.get(address).cloned().unwrap_or_else(|| {
                    vec![ProbeSample::Error(ProbeErrorKind::Timeout); domains.len()]
                })
            })
        }
    }

    /// Engine that panics, to check unit isolation.
    struct PanickingProbe;

    impl Probe for PanickingProbe {
        fn probe<'a>(
            &'a self,
            address: &'a str,
            _domains: &'a [String],
            _record_type: RecordType,
            _timeout: Duration,
        ) -> BoxFuture<'a, Vec<ProbeSample>> {
            Box::pin(async move {
                assert!(address != "6.6.6.6", "engine fault");
                vec![ProbeSample::Latency(5.0)]
            })
        }
    }

    fn options(domains: &[&str]) -> BenchOptions {
        BenchOptions {
            domains: domains.iter().map(|d| (*d).to_string()).collect(),
            record_type: "A".to_string(),
            timeout: Duration::from_millis(200),
            max_concurrent: 4,
        }
    }

    fn texts(results: &[RankedResult]) -> Vec<(String, String)> {
        results
            .iter()
            .map(|r| (r.label.clone(), r.summary_text()))
            .collect()
    }

    #[tokio::test]
    async fn test_missing_address_is_not_probed() {
        let probe = Arc::new(MockProbe::default().with("8.8.8.8", vec![ProbeSample::Latency(10.0)]));
        let bench = Benchmark::with_probe(probe.clone());

        let results = bench
            .run(
                vec![ResolverEntry::new("A", "8.8.8.8"), ResolverEntry::new("B", "")],
                options(&["x.com"]),
            )
            .await
            .unwrap();

        assert_eq!(
            texts(&results),
            vec![
                (
                    "A".to_string(),
                    "avg 10.0 ms | best 10.0 ms | worst 10.0 ms".to_string()
                ),
                ("B".to_string(), "missing address".to_string()),
            ]
        );
        assert_eq!(probe.calls(), vec!["8.8.8.8".to_string()]);
    }

    #[tokio::test]
    async fn test_all_timeouts_is_no_data() {
        let probe = MockProbe::default().with(
            "1.1.1.1",
            vec![ProbeSample::Error(ProbeErrorKind::Timeout)],
        );
        let bench = Benchmark::with_probe(Arc::new(probe));

        let results = bench
            .run(vec![ResolverEntry::new("A", "1.1.1.1")], options(&["x.com"]))
            .await
            .unwrap();

        assert_eq!(
            texts(&results),
            vec![("A".to_string(), "no successful responses".to_string())]
        );
    }

    #[tokio::test]
    async fn test_ranking_by_average_with_error_suffix() {
        let probe = MockProbe::default()
            .with(
                "9.9.9.9",
                vec![
                    ProbeSample::Latency(40.0),
                    ProbeSample::Latency(60.0),
                    ProbeSample::Error(ProbeErrorKind::NotFound),
                ],
            )
            .with(
                "1.1.1.1",
                vec![
                    ProbeSample::Latency(5.0),
                    ProbeSample::Latency(10.0),
                    ProbeSample::Latency(15.0),
                ],
            );
        let bench = Benchmark::with_probe(Arc::new(probe));

        let results = bench
            .run(
                vec![
                    ResolverEntry::new("A", "9.9.9.9"),
                    ResolverEntry::new("B", "1.1.1.1"),
                ],
                options(&["a.com", "b.com", "c.com"]),
            )
            .await
            .unwrap();

        assert_eq!(results[0].label, "B");
        assert_eq!(results[1].label, "A");
        assert!(results[1].summary_text().contains("| errors 1"));
        assert!(!results[0].summary_text().contains("errors"));
        assert_eq!(results[1].summary.avg_ms(), Some(50.0));
    }

    #[tokio::test]
    async fn test_repeated_runs_are_identical() {
        let probe = Arc::new(
            MockProbe::default()
                .with("1.1.1.1", vec![ProbeSample::Latency(20.0), ProbeSample::Latency(22.0)])
                .with("8.8.8.8", vec![ProbeSample::Latency(20.0), ProbeSample::Latency(22.0)])
                .with(
                    "9.9.9.9",
                    vec![
                        ProbeSample::Latency(3.0),
                        ProbeSample::Error(ProbeErrorKind::NoAnswer),
                    ],
                ),
        );
        let bench = Benchmark::with_probe(probe);
        let entries = vec![
            ResolverEntry::new("dead", "10.255.255.1"),
            ResolverEntry::new("cf", "1.1.1.1"),
            ResolverEntry::new("google", "8.8.8.8"),
            ResolverEntry::new("quad9", "9.9.9.9"),
        ];

        let first = bench
            .run(entries.clone(), options(&["a.com", "b.com"]))
            .await
            .unwrap();
        for _ in 0..5 {
            let again = bench
                .run(entries.clone(), options(&["a.com", "b.com"]))
                .await
                .unwrap();
            assert_eq!(texts(&first), texts(&again));
        }

        let labels: Vec<&str> = first.iter().map(|r| r.label.as_str()).collect();
        // cf and google tie and keep entry order; dead has no data
        assert_eq!(labels, ["quad9", "cf", "google", "dead"]);
    }

    #[tokio::test]
    async fn test_progress_then_completion() {
        let probe = MockProbe::default()
            .with("1.1.1.1", vec![ProbeSample::Latency(10.0)])
            .with("8.8.8.8", vec![ProbeSample::Latency(30.0)]);
        let bench = Benchmark::with_probe(Arc::new(probe));

        let mut handle = bench.start(
            vec![
                ResolverEntry::new("google", "8.8.8.8"),
                ResolverEntry::new("cf", "1.1.1.1"),
                ResolverEntry::new("blank", " "),
            ],
            options(&["x.com"]),
        );

        let mut progress = Vec::new();
        let mut completed = None;
        while let Some(event) = handle.next_event().await {
            match event {
                BenchEvent::Started { run, total } => {
                    assert_eq!(run, handle.id());
                    assert_eq!(total, 3);
                }
                BenchEvent::Progress { result, done, total, .. } => {
                    assert_eq!(total, 3);
                    progress.push((result.label, done));
                }
                BenchEvent::Completed { results, .. } => {
                    completed = Some(results);
                    break;
                }
                BenchEvent::Failed { error, .. } => panic!("unexpected failure: {error}"),
            }
        }

        assert_eq!(progress.len(), 3);
        let mut counts: Vec<usize> = progress.iter().map(|(_, done)| *done).collect();
        counts.sort_unstable();
        assert_eq!(counts, vec![1, 2, 3]);

        let results = completed.unwrap();
        let labels: Vec<&str> = results.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, ["cf", "google", "blank"]);
    }

    #[tokio::test]
    async fn test_sequential_execution() {
        let probe = Arc::new(
            MockProbe::default()
                .with("1.1.1.1", vec![ProbeSample::Latency(10.0)])
                .with("8.8.8.8", vec![ProbeSample::Latency(12.0)])
                .delayed(Duration::from_millis(5)),
        );
        let bench = Benchmark::with_probe(probe.clone());
        let mut opts = options(&["x.com"]);
        opts.max_concurrent = 1;

        let results = bench
            .run(
                vec![
                    ResolverEntry::new("google", "8.8.8.8"),
                    ResolverEntry::new("cf", "1.1.1.1"),
                ],
                opts,
            )
            .await
            .unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(probe.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_engine_fault_is_isolated() {
        let bench = Benchmark::with_probe(Arc::new(PanickingProbe));

        let results = bench
            .run(
                vec![
                    ResolverEntry::new("broken", "6.6.6.6"),
                    ResolverEntry::new("fine", "1.1.1.1"),
                ],
                options(&["x.com"]),
            )
            .await
            .unwrap();

        assert_eq!(
            texts(&results),
            vec![
                (
                    "fine".to_string(),
                    "avg 5.0 ms | best 5.0 ms | worst 5.0 ms".to_string()
                ),
                ("broken".to_string(), "no successful responses".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_run_level_faults_are_reported() {
        let bench = Benchmark::with_probe(Arc::new(MockProbe::default()));
        let entries = vec![ResolverEntry::new("A", "1.1.1.1")];

        let err = bench.run(entries.clone(), options(&[])).await.unwrap_err();
        assert!(matches!(err, Error::RunFailed(_)));

        let mut bad_type = options(&["x.com"]);
        bad_type.record_type = "NOPE".to_string();
        let err = bench.run(entries.clone(), bad_type).await.unwrap_err();
        assert!(matches!(err, Error::RunFailed(_)));

        let err = bench.run(vec![], options(&["x.com"])).await.unwrap_err();
        assert!(matches!(err, Error::RunFailed(_)));

        let mut no_workers = options(&["x.com"]);
        no_workers.max_concurrent = 0;
        let err = bench.run(entries.clone(), no_workers).await.unwrap_err();
        assert!(matches!(err, Error::RunFailed(_)));
    }

    #[tokio::test]
    async fn test_invalid_timeout_is_reported() {
        let probe = Arc::new(MockProbe::default());
        let bench = Benchmark::with_probe(probe.clone());
        let entries = vec![ResolverEntry::new("A", "1.1.1.1")];

        for timeout_secs in [0.0, -1.0, f64::NAN] {
            let config = BenchConfig {
                domains: vec!["x.com".to_string()],
                timeout_secs,
                ..BenchConfig::default()
            };
            let err = bench
                .run(entries.clone(), BenchOptions::from(&config))
                .await
                .unwrap_err();
            assert!(matches!(err, Error::RunFailed(_)), "{timeout_secs}");
        }
        assert!(probe.calls().is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_run_delivers_nothing() {
        let probe = Arc::new(
            MockProbe::default()
                .with("1.1.1.1", vec![ProbeSample::Latency(10.0)])
                .delayed(Duration::from_millis(50)),
        );
        let bench = Benchmark::with_probe(probe);

        let mut handle = bench.start(
            vec![ResolverEntry::new("A", "1.1.1.1")],
            options(&["x.com"]),
        );
        handle.cancel();
        assert!(!handle.is_valid());

        // Give the background task time to run and try to report
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(handle.rx.try_recv().is_err());
        assert!(handle.next_event().await.is_none());
    }

    #[tokio::test]
    async fn test_in_flight_results_are_discarded_after_cancel() {
        let probe = Arc::new(
            MockProbe::default()
                .with("1.1.1.1", vec![ProbeSample::Latency(10.0)])
                .delayed(Duration::from_millis(50)),
        );
        let bench = Benchmark::with_probe(probe.clone());

        let mut handle = bench.start(
            vec![ResolverEntry::new("A", "1.1.1.1")],
            options(&["x.com"]),
        );
        assert!(matches!(
            handle.next_event().await,
            Some(BenchEvent::Started { .. })
        ));
        handle.cancel();

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(handle.rx.try_recv().is_err());
        assert!(handle.next_event().await.is_none());
    }

    #[tokio::test]
    async fn test_new_run_invalidates_previous() {
        let probe = Arc::new(
            MockProbe::default()
                .with("1.1.1.1", vec![ProbeSample::Latency(10.0)])
                .delayed(Duration::from_millis(30)),
        );
        let bench = Benchmark::with_probe(probe);
        let entries = vec![ResolverEntry::new("A", "1.1.1.1")];

        let stale = bench.start(entries.clone(), options(&["x.com"]));
        let fresh = bench.start(entries, options(&["x.com"]));

        assert!(!stale.is_valid());
        assert!(matches!(stale.wait().await, Err(Error::Cancelled)));

        let results = fresh.wait().await.unwrap();
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn test_invalidate_from_benchmark() {
        let probe = Arc::new(
            MockProbe::default()
                .with("1.1.1.1", vec![ProbeSample::Latency(10.0)])
                .delayed(Duration::from_millis(30)),
        );
        let bench = Benchmark::with_probe(probe);

        let handle = bench.start(vec![ResolverEntry::new("A", "1.1.1.1")], options(&["x.com"]));
        bench.invalidate();
        assert!(matches!(handle.wait().await, Err(Error::Cancelled)));
    }
}
