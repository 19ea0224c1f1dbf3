//! Target digest parsing and validation

use crate::error::{CrackError, Result};
use crate::types::{Digest, HashAlgorithm};
use regex::Regex;

/// Parses hex digests for one algorithm
pub struct DigestValidator {
    algorithm: HashAlgorithm,
    hex_pattern: Regex,
}

/// Outcome of classifying one line of a hash list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetLine {
    Digest(Digest),
    Skip,
}

impl DigestValidator {
    /// Create a validator for `algorithm`
    pub fn new(algorithm: HashAlgorithm) -> Result<Self> {
        let hex_pattern = Regex::new(r"^[0-9A-Fa-f]+$")
            .map_err(|e| CrackError::internal(format!("Invalid regex: {}", e)))?;

        Ok(Self {
            algorithm,
            hex_pattern,
        })
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Parse a single digest
    pub fn validate(&self, text: &str) -> Result<Digest> {
        let text = text.trim();

        if text.is_empty() {
            return Err(CrackError::validation("Digest cannot be empty"));
        }

        if !self.hex_pattern.is_match(text) {
            return Err(CrackError::validation(format!(
                "'{}' contains non-hex characters",
                text
            )));
        }

        let expected = self.algorithm.digest_len() * 2;
        if text.len() != expected {
            return Err(CrackError::validation(format!(
                "'{}' has {} hex digits, {} needs {}",
                text,
                text.len(),
                self.algorithm,
                expected
            )));
        }

        Digest::from_hex(text)
    }

    /// Classify one line of a hash list. `line_number` is 1-based.
    ///
    /// Blank lines and `#` comments are skipped.
    pub fn parse_line(&self, line: &str, line_number: usize) -> Result<TargetLine> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(TargetLine::Skip);
        }

        self.validate(trimmed)
            .map(TargetLine::Digest)
            .map_err(|e| match e {
                CrackError::Validation { message } => {
                    CrackError::invalid_target(line_number, message)
                }
                other => other,
            })
    }
}
