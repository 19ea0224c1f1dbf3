//! Brute-force state persistence for resume capability

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::engine::Progress;
use crate::error::{CrackError, Result};
use crate::types::HashAlgorithm;

/// Persistent brute-force progress
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BruteState {
    /// Run identifier
    pub run_id: String,
    /// Hash algorithm of the targets
    pub algorithm: HashAlgorithm,
    /// Alphabet symbols, in order
    pub alphabet: String,
    /// Candidate length
    pub length: usize,
    /// Index of the next candidate to try
    pub next_index: u64,
    /// Size of the space, if it fits in u64
    pub total_combinations: Option<u64>,
    /// Plaintexts recovered so far
    #[serde(default)]
    pub recovered: Vec<RecoveredEntry>,
    /// Target digests (sorted lowercase hex) searched for below `next_index`
    #[serde(default)]
    pub targets: Vec<String>,
    /// Run start time
    pub started_at: DateTime<Utc>,
    /// Last update time
    pub updated_at: DateTime<Utc>,
    /// Whole space tried
    pub completed: bool,
}

/// A recovered digest/plaintext pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveredEntry {
    pub hash: String,
    pub plaintext: String,
    pub found_at: DateTime<Utc>,
}

impl BruteState {
    /// Create a new state at index 0
    pub fn new(
        algorithm: HashAlgorithm,
        alphabet: &str,
        length: usize,
        total_combinations: Option<u64>,
    ) -> Self {
        let now = Utc::now();
        Self {
            run_id: format!("brute_{}_{}", length, now.format("%Y%m%d_%H%M%S")),
            algorithm,
            alphabet: alphabet.to_string(),
            length,
            next_index: 0,
            total_combinations,
            recovered: Vec::new(),
            targets: Vec::new(),
            started_at: now,
            updated_at: now,
            completed: false,
        }
    }

    /// Load state from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CrackError::io(e.to_string(), Some(path.to_string_lossy().to_string()))
        })?;

        serde_json::from_str(&content).map_err(|e| CrackError::parse(e.to_string(), Some(content)))
    }

    /// Save state to file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    CrackError::io(e.to_string(), Some(parent.to_string_lossy().to_string()))
                })?;
            }
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| CrackError::internal(format!("Failed to serialize state: {}", e)))?;

        std::fs::write(path, content).map_err(|e| {
            CrackError::io(e.to_string(), Some(path.to_string_lossy().to_string()))
        })
    }

    /// Get default state file path
    pub fn default_path(length: usize) -> PathBuf {
        PathBuf::from(format!("output/brute_{}char.json", length))
    }

    /// Refuse to resume a run made with different search parameters
    pub fn ensure_compatible(
        &self,
        algorithm: HashAlgorithm,
        alphabet: &str,
        length: usize,
    ) -> Result<()> {
        if self.algorithm != algorithm || self.alphabet != alphabet || self.length != length {
            return Err(CrackError::config(format!(
                "State file was written for {} over '{}' with length {}, \
                 not {} over '{}' with length {}",
                self.algorithm, self.alphabet, self.length, algorithm, alphabet, length
            )));
        }
        Ok(())
    }

    /// Remember which digests the search is running for
    pub fn set_targets<I, S>(&mut self, digests: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut targets: Vec<String> = digests.into_iter().map(Into::into).collect();
        targets.sort();
        targets.dedup();
        self.targets = targets;
    }

    /// Digests from `digests` that the recorded progress never searched for.
    ///
    /// Candidates below `next_index` were only compared against
    /// `self.targets`, so any digest returned here may have a preimage there.
    pub fn uncovered_targets<'a, I>(&self, digests: I) -> Vec<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        digests
            .into_iter()
            .filter(|digest| self.targets.binary_search_by(|t| t.as_str().cmp(digest)).is_err())
            .collect()
    }

    /// Go back to the first candidate, keeping recovered plaintexts
    pub fn restart(&mut self) {
        self.next_index = 0;
        self.completed = false;
        self.updated_at = Utc::now();
    }

    /// Record a recovered plaintext, ignoring digests already present
    pub fn add_recovered(&mut self, hash: impl Into<String>, plaintext: impl Into<String>) {
        let hash = hash.into();
        if self.recovered.iter().any(|e| e.hash == hash) {
            return;
        }
        self.recovered.push(RecoveredEntry {
            hash,
            plaintext: plaintext.into(),
            found_at: Utc::now(),
        });
        self.updated_at = Utc::now();
    }

    /// Update progress
    pub fn update_progress(&mut self, next_index: u64) {
        self.next_index = next_index;
        self.updated_at = Utc::now();
    }

    /// Mark as completed
    pub fn mark_completed(&mut self) {
        self.completed = true;
        self.updated_at = Utc::now();
    }

    /// Get progress percentage
    pub fn progress_percent(&self) -> Option<f64> {
        match self.total_combinations {
            Some(0) => Some(100.0),
            Some(total) => Some((self.next_index as f64 / total as f64) * 100.0),
            None => None,
        }
    }

    /// Get elapsed time
    pub fn elapsed(&self) -> chrono::Duration {
        Utc::now() - self.started_at
    }
}

/// Saves a [`BruteState`] every `interval` candidates of a sequential run
pub struct Checkpointer<'a> {
    state: &'a mut BruteState,
    path: &'a Path,
    start_index: u64,
    interval: u64,
}

impl<'a> Checkpointer<'a> {
    /// Checkpoint a run that starts at `state.next_index`
    pub fn new(state: &'a mut BruteState, path: &'a Path, interval: u64) -> Self {
        let start_index = state.next_index;
        Self {
            state,
            path,
            start_index,
            interval: interval.max(1),
        }
    }

    /// Feed one progress report from the engine.
    ///
    /// A failed save is logged and the run goes on; the final save reports errors.
    pub fn record(&mut self, progress: &Progress<'_>) {
        if let Some(found) = progress.matched {
            self.state.add_recovered(found.digest.to_string(), found.plaintext.clone());
        }
        if progress.tried % self.interval == 0 {
            self.state.update_progress(self.start_index + progress.tried);
            if let Err(e) = self.state.save(self.path) {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Failed to save brute-force state"
                );
            }
        }
    }
}
