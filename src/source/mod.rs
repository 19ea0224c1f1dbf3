//! Candidate sources
//!
//! Both attack strategies hand the engine one candidate at a time through
//! [`CandidateSource`].

mod brute;
mod dictionary;

pub use brute::BruteForceSource;
pub use dictionary::DictionarySource;

use crate::error::Result;
use crate::types::CrackMode;

/// A finite, lazily produced stream of password candidates
pub trait CandidateSource {
    /// Produce the next candidate, or `None` at end of sequence
    fn next_candidate(&mut self) -> Result<Option<String>>;

    /// Which strategy this source implements
    fn mode(&self) -> CrackMode;

    /// Total candidates this source will produce, when known up front
    fn total_hint(&self) -> Option<u64> {
        None
    }
}

impl<S: CandidateSource + ?Sized> CandidateSource for Box<S> {
    fn next_candidate(&mut self) -> Result<Option<String>> {
        (**self).next_candidate()
    }

    fn mode(&self) -> CrackMode {
        (**self).mode()
    }

    fn total_hint(&self) -> Option<u64> {
        (**self).total_hint()
    }
}
