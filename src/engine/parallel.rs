//! Partitioned brute-force across worker threads

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Instant;

use chrono::Utc;
use parking_lot::Mutex;

use super::{CrackingEngine, Match, RunOutcome, RunSummary};
use crate::brute::{partition, Alphabet, OdometerGenerator};
use crate::error::{CrackError, Result};
use crate::targets::TargetHashSet;
use crate::types::{CrackMode, Digest};

/// Candidates a worker tries between metric flushes
const METRICS_BATCH: u64 = 4096;

#[derive(Default)]
struct Collected {
    matches: Vec<Match>,
    resolved: HashSet<Digest>,
    error: Option<CrackError>,
}

impl CrackingEngine {
    /// Brute-force indices `start_index..A^L` split across `workers` threads.
    ///
    /// Each worker owns a contiguous range and its own generator. Matches are
    /// applied to `targets` in index order once every worker has stopped, so
    /// a run that reaches the end records the same plaintexts as a
    /// sequential run. With `stop_when_resolved` the workers stop as soon as
    /// every target has some match, which may not be the lowest-index one.
    pub fn run_partitioned(
        &self,
        alphabet: &Alphabet,
        length: usize,
        start_index: u64,
        workers: usize,
        targets: &mut TargetHashSet,
    ) -> Result<RunSummary> {
        let started_at = Utc::now();
        let start = Instant::now();

        let total = alphabet.total_combinations(length).ok_or_else(|| {
            CrackError::config(format!(
                "{} symbols at length {} is too large a space to split across workers",
                alphabet.size(),
                length
            ))
        })?;
        let start_index = start_index.min(total);
        let remaining = total - start_index;

        let lookup: HashSet<Digest> = targets.unresolved_digests().cloned().collect();
        let wanted = lookup.len();

        let ranges: Vec<_> = partition(remaining, workers)
            .into_iter()
            .filter(|r| !r.is_empty())
            .map(|r| (r.start + start_index)..(r.end + start_index))
            .collect();

        tracing::info!(
            algorithm = %self.hasher.algorithm(),
            length,
            start_index,
            remaining,
            workers = ranges.len(),
            unresolved = wanted,
            "Starting partitioned brute-force run"
        );

        let stop = AtomicBool::new(self.config.stop_when_resolved && wanted == 0);
        let all_resolved = AtomicBool::new(stop.load(Ordering::Relaxed));
        let collected = Mutex::new(Collected::default());
        let cursors: Vec<AtomicU64> = ranges.iter().map(|r| AtomicU64::new(r.start)).collect();

        std::thread::scope(|scope| {
            for (worker, range) in ranges.iter().enumerate() {
                let range = range.clone();
                let cursor = &cursors[worker];
                let lookup = &lookup;
                let stop = &stop;
                let all_resolved = &all_resolved;
                let collected = &collected;

                scope.spawn(move || {
                    let result = self.scan_range(
                        alphabet,
                        length,
                        range.clone(),
                        start_index,
                        lookup,
                        stop,
                        cursor,
                        |found| {
                            let mut guard = collected.lock();
                            guard.resolved.insert(found.digest.clone());
                            guard.matches.push(found);
                            if self.config.stop_when_resolved && guard.resolved.len() >= wanted {
                                all_resolved.store(true, Ordering::Relaxed);
                                stop.store(true, Ordering::Relaxed);
                            }
                        },
                    );

                    if let Err(e) = result {
                        tracing::error!(worker, error = %e, "Worker failed");
                        stop.store(true, Ordering::Relaxed);
                        let mut guard = collected.lock();
                        if guard.error.is_none() {
                            guard.error = Some(e);
                        }
                    } else {
                        tracing::debug!(
                            worker,
                            start = range.start,
                            end = range.end,
                            "Worker finished"
                        );
                    }
                });
            }
        });

        let Collected {
            mut matches, error, ..
        } = collected.into_inner();
        if let Some(e) = error {
            return Err(e);
        }

        matches.sort_by_key(|m| m.index);
        let mut applied = Vec::with_capacity(matches.len());
        for found in matches {
            if targets.record_match(&found.digest, &found.plaintext)? {
                tracing::info!(
                    digest = %found.digest,
                    plaintext = %found.plaintext,
                    index = found.index,
                    "Recovered plaintext"
                );
                applied.push(found);
            }
        }

        // Every index below the slowest unfinished worker has been tried.
        let resume_index = ranges
            .iter()
            .zip(&cursors)
            .filter_map(|(range, cursor)| {
                let at = cursor.load(Ordering::Relaxed);
                (at < range.end).then_some(at)
            })
            .min()
            .unwrap_or(total);
        let tried: u64 = ranges
            .iter()
            .zip(&cursors)
            .map(|(range, cursor)| cursor.load(Ordering::Relaxed) - range.start)
            .sum();

        let outcome = if all_resolved.load(Ordering::Relaxed) {
            RunOutcome::AllResolved
        } else if resume_index < total {
            RunOutcome::Cancelled
        } else {
            RunOutcome::Exhausted
        };

        let summary = RunSummary {
            mode: CrackMode::BruteForce,
            algorithm: self.hasher.algorithm(),
            candidates_tried: tried,
            matches: applied,
            outcome,
            targets: targets.len(),
            unresolved: targets.unresolved_count(),
            resume_index: Some(resume_index),
            started_at,
            elapsed: start.elapsed(),
        };

        tracing::info!(
            outcome = %summary.outcome,
            tried = summary.candidates_tried,
            recovered = summary.matches.len(),
            resume_index,
            elapsed_ms = %summary.elapsed.as_millis(),
            "Partitioned run finished"
        );

        Ok(summary)
    }

    #[allow(clippy::too_many_arguments)]
    fn scan_range<F>(
        &self,
        alphabet: &Alphabet,
        length: usize,
        range: std::ops::Range<u64>,
        start_index: u64,
        lookup: &HashSet<Digest>,
        stop: &AtomicBool,
        cursor: &AtomicU64,
        mut on_match: F,
    ) -> Result<()>
    where
        F: FnMut(Match),
    {
        let mut generator = OdometerGenerator::with_range(alphabet.clone(), length, range)?;
        let mut pending = 0u64;

        loop {
            if stop.load(Ordering::Relaxed) || self.is_cancelled() {
                break;
            }
            let index = generator.current_index();
            let candidate = match generator.next_candidate()? {
                Some(candidate) => candidate,
                None => break,
            };

            let digest = self.hasher.digest(&candidate)?;
            cursor.store(index + 1, Ordering::Relaxed);
            pending += 1;
            if pending == METRICS_BATCH {
                self.metrics.add_candidates(pending);
                pending = 0;
            }

            if lookup.contains(&digest) {
                self.metrics.increment_matches();
                on_match(Match {
                    digest,
                    plaintext: candidate,
                    index: index - start_index,
                });
            }
        }

        self.metrics.add_candidates(pending);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineConfig;
    use crate::hash::{HashFunction, Md5Hasher};
    use crate::source::BruteForceSource;
    use crate::types::HashAlgorithm;
    use std::sync::Arc;

    fn md5(text: &str) -> Digest {
        Md5Hasher.digest(text).unwrap()
    }

    fn targets(words: &[&str]) -> TargetHashSet {
        let mut targets = TargetHashSet::new();
        for word in words {
            targets.load(md5(word));
        }
        targets
    }

    /// Maps candidates to the digest of their last character, so many collide
    struct LastCharHasher;

    impl HashFunction for LastCharHasher {
        fn digest(&self, candidate: &str) -> Result<Digest> {
            Ok(Digest::new(candidate.as_bytes().last().copied().into_iter().collect::<Vec<u8>>()))
        }

        fn algorithm(&self) -> HashAlgorithm {
            HashAlgorithm::Md5
        }
    }

    #[test]
    fn test_matches_sequential_results() {
        let alphabet = Alphabet::parse("a-f").unwrap();
        let words = ["abc", "fed", "aaa", "fff", "zzz"];

        let mut sequential = targets(&words);
        let engine = CrackingEngine::new(Arc::new(Md5Hasher));
        let mut source = BruteForceSource::new(alphabet.clone(), 3).unwrap();
        let seq = engine.run(&mut source, &mut sequential).unwrap();

        let mut parallel = targets(&words);
        let par = CrackingEngine::new(Arc::new(Md5Hasher))
            .run_partitioned(&alphabet, 3, 0, 4, &mut parallel)
            .unwrap();

        assert_eq!(par.candidates_tried, 216);
        assert_eq!(par.candidates_tried, seq.candidates_tried);
        assert_eq!(par.outcome, RunOutcome::Exhausted);
        assert_eq!(par.resume_index, Some(216));
        assert_eq!(parallel.report(), sequential.report());
        assert_eq!(par.matches, seq.matches);
        assert_eq!(parallel.unresolved_count(), 1);
    }

    #[test]
    fn test_collisions_resolve_to_lowest_index() {
        let alphabet = Alphabet::parse("0-9").unwrap();
        let mut targets = TargetHashSet::new();
        targets.load(Digest::new(vec![b'7']));

        CrackingEngine::new(Arc::new(LastCharHasher))
            .run_partitioned(&alphabet, 3, 0, 8, &mut targets)
            .unwrap();

        assert_eq!(targets.plaintext(&Digest::new(vec![b'7'])), Some("007"));
    }

    #[test]
    fn test_resume_from_index() {
        let alphabet = Alphabet::new(['0', '1']).unwrap();
        let mut targets = targets(&["00", "11"]);

        let summary = CrackingEngine::new(Arc::new(Md5Hasher))
            .run_partitioned(&alphabet, 2, 2, 3, &mut targets)
            .unwrap();

        assert_eq!(summary.candidates_tried, 2);
        assert_eq!(targets.plaintext(&md5("11")), Some("11"));
        assert_eq!(targets.plaintext(&md5("00")), None);
        assert_eq!(summary.matches[0].index, 1);
    }

    #[test]
    fn test_more_workers_than_candidates() {
        let alphabet = Alphabet::new(['x', 'y']).unwrap();
        let mut targets = targets(&["y"]);
        let summary = CrackingEngine::new(Arc::new(Md5Hasher))
            .run_partitioned(&alphabet, 1, 0, 16, &mut targets)
            .unwrap();
        assert_eq!(summary.candidates_tried, 2);
        assert_eq!(targets.plaintext(&md5("y")), Some("y"));
    }

    #[test]
    fn test_cancelled_run_reports_resume_point() {
        let alphabet = Alphabet::parse("a-z").unwrap();
        let mut targets = targets(&["zzzz"]);
        let engine = CrackingEngine::new(Arc::new(Md5Hasher));
        engine.cancel();

        let summary = engine.run_partitioned(&alphabet, 4, 0, 4, &mut targets).unwrap();
        assert_eq!(summary.outcome, RunOutcome::Cancelled);
        assert_eq!(summary.candidates_tried, 0);
        assert_eq!(summary.resume_index, Some(0));
    }

    #[test]
    fn test_stop_when_resolved() {
        let alphabet = Alphabet::parse("a-z").unwrap();
        let mut targets = targets(&["aaab"]);
        let engine = CrackingEngine::with_config(
            Arc::new(Md5Hasher),
            EngineConfig {
                stop_when_resolved: true,
            },
        );

        let summary = engine.run_partitioned(&alphabet, 4, 0, 2, &mut targets).unwrap();
        assert_eq!(summary.outcome, RunOutcome::AllResolved);
        assert!(summary.candidates_tried < 26u64.pow(4));
        assert_eq!(targets.plaintext(&md5("aaab")), Some("aaab"));
    }

    #[test]
    fn test_space_too_large() {
        let alphabet = Alphabet::parse("a-z").unwrap();
        let mut targets = targets(&["a"]);
        let err = CrackingEngine::new(Arc::new(Md5Hasher))
            .run_partitioned(&alphabet, 20, 0, 2, &mut targets)
            .unwrap_err();
        assert!(matches!(err, CrackError::Config { .. }));
    }
}
