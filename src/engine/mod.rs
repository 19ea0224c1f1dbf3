//! Cracking engine - drive a candidate source against the target set

mod parallel;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::Result;
use crate::hash::HashFunction;
use crate::source::CandidateSource;
use crate::targets::TargetHashSet;
use crate::types::{CrackMode, Digest, HashAlgorithm, PerformanceMetrics};

/// Engine options
#[derive(Debug, Clone, Copy, Default)]
pub struct EngineConfig {
    /// Stop as soon as every target has a plaintext.
    ///
    /// Off by default: the run normally consumes the whole source.
    pub stop_when_resolved: bool,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// The source produced its last candidate
    Exhausted,
    /// Every target was resolved and `stop_when_resolved` was set
    AllResolved,
    /// The cancel flag was raised
    Cancelled,
}

impl std::fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunOutcome::Exhausted => write!(f, "exhausted"),
            RunOutcome::AllResolved => write!(f, "all resolved"),
            RunOutcome::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// A plaintext recovered during a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Match {
    pub digest: Digest,
    pub plaintext: String,
    /// 0-based position of the candidate among those tried in the run
    pub index: u64,
}

/// Progress after one candidate
#[derive(Debug, Clone, Copy)]
pub struct Progress<'a> {
    /// Candidates tried so far, monotonically increasing
    pub tried: u64,
    pub resolved: usize,
    pub unresolved: usize,
    /// Candidates the source announced up front, if any
    pub total: Option<u64>,
    /// Set when this candidate resolved a target
    pub matched: Option<&'a Match>,
}

/// Result of one run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub mode: CrackMode,
    pub algorithm: HashAlgorithm,
    pub candidates_tried: u64,
    /// Targets resolved by this run, in discovery order
    pub matches: Vec<Match>,
    pub outcome: RunOutcome,
    pub targets: usize,
    pub unresolved: usize,
    /// First candidate index a resumed run must start from, for partitioned runs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_index: Option<u64>,
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn candidates_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.candidates_tried as f64 / secs
        } else {
            0.0
        }
    }
}

/// Sequential hash-matching engine
pub struct CrackingEngine {
    hasher: Arc<dyn HashFunction>,
    config: EngineConfig,
    cancel: Arc<AtomicBool>,
    metrics: Arc<PerformanceMetrics>,
}

impl CrackingEngine {
    /// Create an engine with default options
    pub fn new(hasher: Arc<dyn HashFunction>) -> Self {
        Self::with_config(hasher, EngineConfig::default())
    }

    /// Create an engine with custom options
    pub fn with_config(hasher: Arc<dyn HashFunction>, config: EngineConfig) -> Self {
        Self {
            hasher,
            config,
            cancel: Arc::new(AtomicBool::new(false)),
            metrics: Arc::new(PerformanceMetrics::new()),
        }
    }

    /// Share an externally owned cancel flag
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn hasher(&self) -> &dyn HashFunction {
        &*self.hasher
    }

    /// Flag checked once per candidate; raising it ends the run
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }

    /// Counters readable from other threads while a run is in progress
    pub fn metrics(&self) -> Arc<PerformanceMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Run `source` to exhaustion against `targets`
    pub fn run<S>(&self, source: &mut S, targets: &mut TargetHashSet) -> Result<RunSummary>
    where
        S: CandidateSource + ?Sized,
    {
        self.run_with_progress(source, targets, |_| {})
    }

    /// Run `source` against `targets`, calling `on_progress` after every candidate.
    ///
    /// A hash failure or unreadable source aborts the run with an error;
    /// plaintexts recorded before that stay in `targets`.
    pub fn run_with_progress<S, F>(
        &self,
        source: &mut S,
        targets: &mut TargetHashSet,
        mut on_progress: F,
    ) -> Result<RunSummary>
    where
        S: CandidateSource + ?Sized,
        F: FnMut(&Progress<'_>),
    {
        let started_at = Utc::now();
        let start = Instant::now();
        let mode = source.mode();
        let total = source.total_hint();

        tracing::info!(
            mode = %mode,
            algorithm = %self.hasher.algorithm(),
            targets = targets.len(),
            unresolved = targets.unresolved_count(),
            total = ?total,
            "Starting cracking run"
        );

        let mut tried = 0u64;
        let mut matches: Vec<Match> = Vec::new();

        let outcome = loop {
            if self.is_cancelled() {
                break RunOutcome::Cancelled;
            }
            if self.config.stop_when_resolved && targets.unresolved_count() == 0 {
                break RunOutcome::AllResolved;
            }

            let candidate = match source.next_candidate()? {
                Some(candidate) => candidate,
                None => break RunOutcome::Exhausted,
            };

            let digest = self.hasher.digest(&candidate)?;
            let index = tried;
            tried += 1;
            self.metrics.add_candidates(1);

            let mut matched = false;
            if targets.contains(&digest) && targets.record_match(&digest, &candidate)? {
                self.metrics.increment_matches();
                tracing::info!(
                    digest = %digest,
                    plaintext = %candidate,
                    index,
                    "Recovered plaintext"
                );
                matches.push(Match {
                    digest,
                    plaintext: candidate,
                    index,
                });
                matched = true;
            }

            on_progress(&Progress {
                tried,
                resolved: targets.resolved_count(),
                unresolved: targets.unresolved_count(),
                total,
                matched: if matched { matches.last() } else { None },
            });
        };

        let summary = RunSummary {
            mode,
            algorithm: self.hasher.algorithm(),
            candidates_tried: tried,
            matches,
            outcome,
            targets: targets.len(),
            unresolved: targets.unresolved_count(),
            resume_index: None,
            started_at,
            elapsed: start.elapsed(),
        };

        tracing::info!(
            outcome = %summary.outcome,
            tried = summary.candidates_tried,
            recovered = summary.matches.len(),
            unresolved = summary.unresolved,
            elapsed_ms = %summary.elapsed.as_millis(),
            "Cracking run finished"
        );

        Ok(summary)
    }
}
