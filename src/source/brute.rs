//! Brute-force candidate source

use super::CandidateSource;
use crate::brute::{Alphabet, OdometerGenerator};
use crate::error::Result;
use crate::types::CrackMode;

/// Exhaustive source over all strings of one length
pub struct BruteForceSource {
    generator: OdometerGenerator,
}

impl BruteForceSource {
    pub fn new(alphabet: Alphabet, length: usize) -> Result<Self> {
        Ok(Self {
            generator: OdometerGenerator::new(alphabet, length)?,
        })
    }

    /// Resume at candidate `index`
    pub fn starting_at(alphabet: Alphabet, length: usize, index: u64) -> Result<Self> {
        let mut generator = OdometerGenerator::new(alphabet, length)?;
        generator.set_index(index);
        Ok(Self { generator })
    }

    pub fn from_generator(generator: OdometerGenerator) -> Self {
        Self { generator }
    }

    pub fn generator(&self) -> &OdometerGenerator {
        &self.generator
    }

    /// Index of the next candidate in the full space
    pub fn current_index(&self) -> u64 {
        self.generator.current_index()
    }
}

impl CandidateSource for BruteForceSource {
    fn next_candidate(&mut self) -> Result<Option<String>> {
        self.generator.next_candidate()
    }

    fn mode(&self) -> CrackMode {
        CrackMode::BruteForce
    }

    fn total_hint(&self) -> Option<u64> {
        self.generator.remaining()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_produces_whole_space_once() {
        let alphabet = Alphabet::new(['0', '1']).unwrap();
        let mut source = BruteForceSource::new(alphabet, 2).unwrap();
        assert_eq!(source.total_hint(), Some(4));

        let mut seen = Vec::new();
        while let Some(candidate) = source.next_candidate().unwrap() {
            seen.push(candidate);
        }
        assert_eq!(seen, vec!["00", "01", "10", "11"]);
        assert_eq!(source.total_hint(), Some(0));
    }

    #[test]
    fn test_starting_at() {
        let alphabet = Alphabet::parse("0-9").unwrap();
        let mut source = BruteForceSource::starting_at(alphabet, 2, 98).unwrap();
        assert_eq!(source.total_hint(), Some(2));
        assert_eq!(source.next_candidate().unwrap().as_deref(), Some("98"));
        assert_eq!(source.next_candidate().unwrap().as_deref(), Some("99"));
        assert_eq!(source.next_candidate().unwrap(), None);
        assert_eq!(source.current_index(), 100);
    }
}
