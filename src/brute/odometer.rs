//! Odometer-order generator for fixed-length candidates

use std::ops::Range;

use super::Alphabet;
use crate::error::{CrackError, Result};

/// Generator for every string of a fixed length over an [`Alphabet`].
///
/// The state is one symbol index per output position, position 0 being the
/// least significant (rightmost) character. Candidates come out in counting
/// order: with alphabet `01` and length 2 the sequence is `00`, `01`, `10`,
/// `11`. State size depends only on the length, never on how many
/// candidates have been produced.
#[derive(Debug, Clone)]
pub struct OdometerGenerator {
    alphabet: Alphabet,
    positions: Vec<usize>,
    /// Index of the first candidate this generator produced
    start: u64,
    produced: u64,
    /// Candidates this generator may produce, `None` for "until wraparound"
    limit: Option<u64>,
    exhausted: bool,
}

impl OdometerGenerator {
    /// Create a generator over the full space of `length`-symbol strings
    pub fn new(alphabet: Alphabet, length: usize) -> Result<Self> {
        if length == 0 {
            return Err(CrackError::config("Candidate length must be at least 1"));
        }

        Ok(Self {
            alphabet,
            positions: vec![0; length],
            start: 0,
            produced: 0,
            limit: None,
            exhausted: false,
        })
    }

    /// Create a generator for the candidates with indices in `range`
    pub fn with_range(alphabet: Alphabet, length: usize, range: Range<u64>) -> Result<Self> {
        let mut gen = Self::new(alphabet, length)?;
        gen.set_index(range.start);
        gen.limit = Some(range.end.saturating_sub(range.start));
        if range.is_empty() {
            gen.exhausted = true;
        }
        Ok(gen)
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn length(&self) -> usize {
        self.positions.len()
    }

    /// Size of the whole space, `None` if it exceeds u64
    pub fn total(&self) -> Option<u64> {
        self.alphabet.total_combinations(self.positions.len())
    }

    /// Candidates produced since construction or the last `set_index`
    pub fn produced(&self) -> u64 {
        self.produced
    }

    /// Index of the next candidate in the full space
    pub fn current_index(&self) -> u64 {
        self.start.saturating_add(self.produced)
    }

    /// Remaining candidates, `None` if the space is too large to count
    pub fn remaining(&self) -> Option<u64> {
        if self.exhausted {
            return Some(0);
        }
        match self.limit {
            Some(limit) => Some(limit.saturating_sub(self.produced)),
            None => self.total().map(|t| t.saturating_sub(self.current_index())),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Position the generator at candidate `index` (for resume).
    ///
    /// An index past the end of the space leaves the generator exhausted.
    pub fn set_index(&mut self, index: u64) {
        let base = self.alphabet.size() as u64;
        let mut n = index;
        for position in self.positions.iter_mut() {
            *position = (n % base) as usize;
            n /= base;
        }

        self.start = index;
        self.produced = 0;
        self.exhausted = n != 0;
        if self.exhausted {
            self.positions.fill(0);
        }
    }

    /// Render the current candidate without advancing
    pub fn peek(&self) -> Result<String> {
        self.positions
            .iter()
            .rev()
            .map(|&index| self.alphabet.symbol_at(index))
            .collect()
    }

    /// Return the current candidate and advance like an odometer.
    ///
    /// This always produces a value: once every position carries over, the
    /// state is back at the all-first-symbol string and the generator is
    /// marked exhausted, so the call after the last candidate repeats the
    /// first one. Use [`next_candidate`](Self::next_candidate) to stop there.
    pub fn generate_next(&mut self) -> Result<String> {
        let candidate = self.peek()?;
        self.advance();
        Ok(candidate)
    }

    /// Next candidate, or `None` once the space (or range) is used up
    pub fn next_candidate(&mut self) -> Result<Option<String>> {
        if self.exhausted {
            return Ok(None);
        }
        self.generate_next().map(Some)
    }

    fn advance(&mut self) {
        self.produced += 1;

        let mut carried_out = true;
        for position in self.positions.iter_mut() {
            if self.alphabet.is_last(*position) {
                *position = 0;
            } else {
                *position += 1;
                carried_out = false;
                break;
            }
        }

        if carried_out {
            self.exhausted = true;
        }
        if let Some(limit) = self.limit {
            if self.produced >= limit {
                self.exhausted = true;
            }
        }
    }

    /// Get progress percentage, `None` when the space is too large to count
    pub fn progress_percent(&self) -> Option<f64> {
        let total = self.total()?;
        if total == 0 {
            Some(100.0)
        } else {
            Some((self.current_index() as f64 / total as f64) * 100.0)
        }
    }
}

impl Iterator for OdometerGenerator {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_candidate().transpose()
    }
}

/// Split `0..total` into at most `parts` contiguous, non-empty ranges
pub fn partition(total: u64, parts: usize) -> Vec<Range<u64>> {
    let parts = (parts.max(1) as u64).min(total.max(1));
    let chunk = total / parts;
    let extra = total % parts;

    let mut ranges = Vec::with_capacity(parts as usize);
    let mut start = 0;
    for i in 0..parts {
        let len = chunk + u64::from(i < extra);
        if len == 0 {
            continue;
        }
        ranges.push(start..start + len);
        start += len;
    }
    ranges
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn binary() -> Alphabet {
        Alphabet::new(['0', '1']).unwrap()
    }

    fn as_number(candidate: &str, alphabet: &Alphabet) -> u64 {
        let base = alphabet.size() as u64;
        candidate
            .chars()
            .fold(0, |acc, c| acc * base + alphabet.index_of(c).unwrap() as u64)
    }

    #[test]
    fn test_binary_length_two_sequence() {
        let mut gen = OdometerGenerator::new(binary(), 2).unwrap();
        let seq: Vec<String> = (0..4).map(|_| gen.generate_next().unwrap()).collect();
        assert_eq!(seq, vec!["00", "01", "10", "11"]);
        assert!(gen.is_exhausted());
        // The raw odometer wraps back to the start.
        assert_eq!(gen.generate_next().unwrap(), "00");
    }

    #[test]
    fn test_completeness_and_distinctness() {
        let alphabet = Alphabet::parse("abc").unwrap();
        let gen = OdometerGenerator::new(alphabet.clone(), 4).unwrap();
        let all: Vec<String> = gen.map(|c| c.unwrap()).collect();

        assert_eq!(all.len(), 81);
        let unique: HashSet<&String> = all.iter().collect();
        assert_eq!(unique.len(), 81);
        for candidate in &all {
            assert_eq!(candidate.chars().count(), 4);
            assert!(candidate.chars().all(|c| alphabet.index_of(c).is_some()));
        }
    }

    #[test]
    fn test_counting_order() {
        let alphabet = Alphabet::parse("0-4").unwrap();
        let gen = OdometerGenerator::new(alphabet.clone(), 3).unwrap();
        for (expected, candidate) in gen.enumerate() {
            assert_eq!(as_number(&candidate.unwrap(), &alphabet), expected as u64);
        }
    }

    #[test]
    fn test_first_call_after_full_cycle_repeats_first_output() {
        let alphabet = Alphabet::parse("xyz").unwrap();
        let mut gen = OdometerGenerator::new(alphabet, 3).unwrap();
        let first = gen.generate_next().unwrap();
        for _ in 1..27 {
            gen.generate_next().unwrap();
        }
        assert!(gen.is_exhausted());
        assert_eq!(gen.generate_next().unwrap(), first);
        assert_eq!(first, "xxx");
    }

    #[test]
    fn test_next_candidate_stops_after_exact_count() {
        let mut gen = OdometerGenerator::new(binary(), 3).unwrap();
        let mut count = 0;
        while let Some(_) = gen.next_candidate().unwrap() {
            count += 1;
        }
        assert_eq!(count, 8);
        assert_eq!(gen.next_candidate().unwrap(), None);
        assert_eq!(gen.remaining(), Some(0));
    }

    #[test]
    fn test_restartable() {
        let alphabet = Alphabet::parse("a-e").unwrap();
        let a: Vec<String> = OdometerGenerator::new(alphabet.clone(), 3)
            .unwrap()
            .map(|c| c.unwrap())
            .collect();
        let b: Vec<String> = OdometerGenerator::new(alphabet, 3)
            .unwrap()
            .map(|c| c.unwrap())
            .collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_length_rejected() {
        assert!(matches!(
            OdometerGenerator::new(binary(), 0),
            Err(CrackError::Config { .. })
        ));
    }

    #[test]
    fn test_resume_from_index() {
        let alphabet = Alphabet::parse("0-9").unwrap();
        let mut gen = OdometerGenerator::new(alphabet, 4).unwrap();
        gen.set_index(1234);
        assert_eq!(gen.current_index(), 1234);
        assert_eq!(gen.next_candidate().unwrap().as_deref(), Some("1234"));
        assert_eq!(gen.current_index(), 1235);
        assert_eq!(gen.remaining(), Some(10_000 - 1235));
    }

    #[test]
    fn test_set_index_past_end_exhausts() {
        let mut gen = OdometerGenerator::new(binary(), 2).unwrap();
        gen.set_index(4);
        assert!(gen.is_exhausted());
        assert_eq!(gen.next_candidate().unwrap(), None);
    }

    #[test]
    fn test_ranges_cover_space_without_overlap() {
        let alphabet = Alphabet::parse("abcd").unwrap();
        let whole: Vec<String> = OdometerGenerator::new(alphabet.clone(), 3)
            .unwrap()
            .map(|c| c.unwrap())
            .collect();

        let mut stitched = Vec::new();
        for range in partition(64, 5) {
            let gen = OdometerGenerator::with_range(alphabet.clone(), 3, range).unwrap();
            stitched.extend(gen.map(|c| c.unwrap()));
        }
        assert_eq!(stitched, whole);
    }

    #[test]
    fn test_partition_shapes() {
        assert_eq!(partition(10, 3), vec![0..4, 4..7, 7..10]);
        assert_eq!(partition(2, 8), vec![0..1, 1..2]);
        assert_eq!(partition(5, 0), vec![0..5]);
        assert!(partition(0, 4).is_empty());
    }

    #[test]
    fn test_empty_range_is_exhausted() {
        let gen = OdometerGenerator::with_range(binary(), 2, 3..3).unwrap();
        assert!(gen.is_exhausted());
    }

    #[test]
    fn test_progress() {
        let mut gen = OdometerGenerator::new(binary(), 2).unwrap();
        assert_eq!(gen.progress_percent(), Some(0.0));
        gen.next_candidate().unwrap();
        gen.next_candidate().unwrap();
        assert_eq!(gen.progress_percent(), Some(50.0));
    }
}
