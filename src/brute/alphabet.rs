//! Ordered symbol set for brute-force candidates

use std::collections::HashSet;

use crate::error::{CrackError, Result};

/// Fixed, ordered set of at least two distinct symbols.
///
/// Index 0 is the first symbol; `symbol_at` and `index_of` are inverses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<char>,
}

impl Alphabet {
    /// Create an alphabet from symbols in order
    pub fn new(symbols: impl IntoIterator<Item = char>) -> Result<Self> {
        let symbols: Vec<char> = symbols.into_iter().collect();
        if symbols.len() < 2 {
            return Err(CrackError::config(format!(
                "Alphabet needs at least 2 symbols, got {}",
                symbols.len()
            )));
        }

        let mut seen = HashSet::with_capacity(symbols.len());
        for &symbol in &symbols {
            if !seen.insert(symbol) {
                return Err(CrackError::config(format!(
                    "Alphabet contains '{}' more than once",
                    symbol
                )));
            }
        }

        Ok(Self { symbols })
    }

    /// Parse an alphabet description such as `0-9a-z` or `abc!?`.
    ///
    /// `x-y` expands to the inclusive character range; a `-` at either end
    /// is taken literally.
    pub fn parse(spec: &str) -> Result<Self> {
        let chars: Vec<char> = spec.chars().collect();
        let mut symbols = Vec::with_capacity(chars.len());
        let mut i = 0;

        while i < chars.len() {
            if i + 2 < chars.len() && chars[i + 1] == '-' {
                let (low, high) = (chars[i], chars[i + 2]);
                if low > high {
                    return Err(CrackError::config(format!(
                        "Descending range '{}-{}' in alphabet",
                        low, high
                    )));
                }
                symbols.extend(low..=high);
                i += 3;
            } else {
                symbols.push(chars[i]);
                i += 1;
            }
        }

        Self::new(symbols)
    }

    /// Built-in symbol strings are known to be valid
    pub(crate) fn from_static(symbols: &'static str) -> Self {
        Self {
            symbols: symbols.chars().collect(),
        }
    }

    pub fn size(&self) -> usize {
        self.symbols.len()
    }

    pub fn symbol_at(&self, index: usize) -> Result<char> {
        self.symbols
            .get(index)
            .copied()
            .ok_or_else(|| CrackError::enumeration(index, self.symbols.len()))
    }

    pub fn index_of(&self, symbol: char) -> Option<usize> {
        self.symbols.iter().position(|&s| s == symbol)
    }

    pub fn is_last(&self, index: usize) -> bool {
        index + 1 == self.symbols.len()
    }

    pub fn first(&self) -> char {
        self.symbols[0]
    }

    pub fn last(&self) -> char {
        self.symbols[self.symbols.len() - 1]
    }

    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }

    /// Symbols as a string, in order
    pub fn as_string(&self) -> String {
        self.symbols.iter().collect()
    }

    /// `size^length`, or `None` when it overflows u64
    pub fn total_combinations(&self, length: usize) -> Option<u64> {
        let exp = u32::try_from(length).ok()?;
        (self.symbols.len() as u64).checked_pow(exp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_and_index_are_inverse() {
        let alphabet = Alphabet::parse("0-9a-z").unwrap();
        assert_eq!(alphabet.size(), 36);
        for i in 0..alphabet.size() {
            let symbol = alphabet.symbol_at(i).unwrap();
            assert_eq!(alphabet.index_of(symbol), Some(i));
        }
        assert_eq!(alphabet.first(), '0');
        assert_eq!(alphabet.last(), 'z');
    }

    #[test]
    fn test_symbol_at_out_of_range() {
        let alphabet = Alphabet::new(['0', '1']).unwrap();
        let err = alphabet.symbol_at(2).unwrap_err();
        assert!(matches!(err, CrackError::Enumeration { index: 2, size: 2 }));
    }

    #[test]
    fn test_is_last() {
        let alphabet = Alphabet::new(['x', 'y', 'z']).unwrap();
        assert!(!alphabet.is_last(0));
        assert!(!alphabet.is_last(1));
        assert!(alphabet.is_last(2));
    }

    #[test]
    fn test_rejects_small_and_duplicate_alphabets() {
        assert!(Alphabet::new(Vec::new()).is_err());
        assert!(Alphabet::new(['a']).is_err());
        assert!(Alphabet::parse("aba").is_err());
        assert!(Alphabet::parse("a-cb").is_err());
    }

    #[test]
    fn test_parse_ranges_and_literal_dash() {
        assert_eq!(Alphabet::parse("a-c").unwrap().as_string(), "abc");
        assert_eq!(Alphabet::parse("-ab").unwrap().as_string(), "-ab");
        assert_eq!(Alphabet::parse("ab-").unwrap().as_string(), "ab-");
        assert!(Alphabet::parse("z-a").is_err());
    }

    #[test]
    fn test_total_combinations() {
        let alphabet = Alphabet::parse("01").unwrap();
        assert_eq!(alphabet.total_combinations(2), Some(4));
        assert_eq!(alphabet.total_combinations(64), None);
    }
}
