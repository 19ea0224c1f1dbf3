//! hashcrack - recover plaintexts for unsalted password digests
//!
//! Dictionary and brute-force attacks against a list of MD5 (optionally SHA-1
//! or SHA-256) hex digests, one candidate at a time.

pub mod brute;
pub mod engine;
pub mod error;
pub mod hash;
pub mod source;
pub mod targets;
pub mod types;

// Re-export commonly used types
pub use error::{CrackError, Result};
pub use types::{
    CrackConfig, CrackMode, Digest, HashAlgorithm, MetricsSnapshot, PerformanceMetrics,
    ReportEntry,
};

// Re-export main functionality
pub use brute::{Alphabet, BruteState, Charset, OdometerGenerator};
pub use engine::{CrackingEngine, EngineConfig, Match, Progress, RunOutcome, RunSummary};
pub use hash::{hasher_for, HashFunction};
pub use source::{BruteForceSource, CandidateSource, DictionarySource};
pub use targets::TargetHashSet;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Word list used when none is given
pub const DEFAULT_DICTIONARY: &str = "top-10-million-passwords.txt";

/// Brute-force symbols used when none are given
pub const DEFAULT_ALPHABET: &str = "0123456789abcdefghijklmnopqrstuvwxyz";

/// Brute-force candidate length used when none is given
pub const DEFAULT_LENGTH: usize = 5;

/// Initialize the library
pub fn init() -> Result<()> {
    // Load .env file if it exists
    dotenv::dotenv().ok();
    Ok(())
}
