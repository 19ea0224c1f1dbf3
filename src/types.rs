//! Core types and structures for hashcrack

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crate::error::{CrackError, Result};

/// Hash algorithm used to digest candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Md5,
    Sha1,
    Sha256,
}

impl HashAlgorithm {
    /// Digest length in bytes
    pub fn digest_len(&self) -> usize {
        match self {
            HashAlgorithm::Md5 => 16,
            HashAlgorithm::Sha1 => 20,
            HashAlgorithm::Sha256 => 32,
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashAlgorithm::Md5 => write!(f, "md5"),
            HashAlgorithm::Sha1 => write!(f, "sha1"),
            HashAlgorithm::Sha256 => write!(f, "sha256"),
        }
    }
}

/// Attack strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CrackMode {
    Dictionary,
    BruteForce,
}

impl fmt::Display for CrackMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrackMode::Dictionary => write!(f, "dictionary"),
            CrackMode::BruteForce => write!(f, "brute-force"),
        }
    }
}

/// Raw output of a hash function.
///
/// Displays and parses as lowercase hex.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digest(Vec<u8>);

impl Digest {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Parse a hex encoded digest of any length
    pub fn from_hex(text: &str) -> Result<Self> {
        let text = text.trim();
        hex::decode(text)
            .map(Self)
            .map_err(|e| CrackError::validation(format!("'{}' is not a hex digest: {}", text, e)))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl From<&[u8]> for Digest {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl FromStr for Digest {
    type Err = CrackError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

/// One row of the final results table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub hash: String,
    pub plaintext: Option<String>,
}

/// Configuration for a cracking run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrackConfig {
    pub mode: CrackMode,
    pub algorithm: HashAlgorithm,
    pub hash_file: PathBuf,
    pub dictionary: PathBuf,
    /// Brute-force symbols in enumeration order, ranges already expanded
    pub alphabet: String,
    pub length: usize,
    pub workers: usize,
    pub stop_when_resolved: bool,
}

impl Default for CrackConfig {
    fn default() -> Self {
        Self {
            mode: CrackMode::Dictionary,
            algorithm: HashAlgorithm::Md5,
            hash_file: PathBuf::new(),
            dictionary: PathBuf::from(crate::DEFAULT_DICTIONARY),
            alphabet: crate::DEFAULT_ALPHABET.to_string(),
            length: crate::DEFAULT_LENGTH,
            workers: 1,
            stop_when_resolved: false,
        }
    }
}

impl CrackConfig {
    /// Reject parameters that cannot describe a search, before any work starts
    pub fn validate(&self) -> Result<()> {
        if self.hash_file.as_os_str().is_empty() {
            return Err(CrackError::config("A target hash file is required"));
        }
        if self.workers == 0 {
            return Err(CrackError::config("Worker count must be at least 1"));
        }
        match self.mode {
            CrackMode::Dictionary => {
                if self.dictionary.as_os_str().is_empty() {
                    return Err(CrackError::config("A dictionary path is required"));
                }
            }
            CrackMode::BruteForce => {
                if self.length == 0 {
                    return Err(CrackError::config("Candidate length must be at least 1"));
                }
                crate::brute::Alphabet::new(self.alphabet.chars())?;
            }
        }
        Ok(())
    }
}

/// Counters shared between the engine and whoever observes it
#[derive(Debug)]
pub struct PerformanceMetrics {
    candidates_tried: AtomicU64,
    matches_found: AtomicU64,
    started_at: Instant,
}

impl PerformanceMetrics {
    pub fn new() -> Self {
        Self {
            candidates_tried: AtomicU64::new(0),
            matches_found: AtomicU64::new(0),
            started_at: Instant::now(),
        }
    }

    pub fn add_candidates(&self, count: u64) {
        self.candidates_tried.fetch_add(count, Ordering::Relaxed);
    }

    pub fn increment_matches(&self) {
        self.matches_found.fetch_add(1, Ordering::Relaxed);
    }

    pub fn candidates_tried(&self) -> u64 {
        self.candidates_tried.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            candidates_tried: self.candidates_tried.load(Ordering::Relaxed),
            matches_found: self.matches_found.load(Ordering::Relaxed),
            elapsed: self.started_at.elapsed(),
        }
    }
}

impl Default for PerformanceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time copy of [`PerformanceMetrics`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricsSnapshot {
    pub candidates_tried: u64,
    pub matches_found: u64,
    pub elapsed: Duration,
}

impl MetricsSnapshot {
    pub fn candidates_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.candidates_tried as f64 / secs
        } else {
            0.0
        }
    }
}
