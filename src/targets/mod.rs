//! Target digests and their recovered plaintexts

pub mod validator;

pub use validator::{DigestValidator, TargetLine};

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{CrackError, Result};
use crate::types::{Digest, HashAlgorithm, ReportEntry};

/// Mapping from target digest to an optional recovered plaintext.
///
/// A plaintext is recorded at most once per digest; later matches for an
/// already resolved digest are ignored. Entries iterate in first-load order.
#[derive(Debug, Clone, Default)]
pub struct TargetHashSet {
    entries: HashMap<Digest, Option<String>>,
    order: Vec<Digest>,
    unresolved: usize,
}

impl TargetHashSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a hash list from `path`
    pub fn load_file(path: &Path, algorithm: HashAlgorithm) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            CrackError::target_file(path.to_string_lossy(), e.to_string())
        })?;

        let targets =
            Self::from_reader(BufReader::new(file), algorithm, &path.to_string_lossy())?;
        tracing::info!(
            path = %path.display(),
            targets = targets.len(),
            algorithm = %algorithm,
            "Loaded target hashes"
        );
        Ok(targets)
    }

    /// Read a hash list, one hex digest per line. `name` labels I/O errors.
    pub fn from_reader<R: BufRead>(
        reader: R,
        algorithm: HashAlgorithm,
        name: &str,
    ) -> Result<Self> {
        let validator = DigestValidator::new(algorithm)?;
        let mut targets = Self::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| CrackError::target_file(name, e.to_string()))?;
            if let TargetLine::Digest(digest) = validator.parse_line(&line, index + 1)? {
                if !targets.load(digest) {
                    tracing::debug!(line = index + 1, "Duplicate target hash ignored");
                }
            }
        }

        Ok(targets)
    }

    /// Insert `digest` as unresolved. Returns false if it was already present.
    pub fn load(&mut self, digest: Digest) -> bool {
        if self.entries.contains_key(&digest) {
            return false;
        }
        self.order.push(digest.clone());
        self.entries.insert(digest, None);
        self.unresolved += 1;
        true
    }

    pub fn contains(&self, digest: &Digest) -> bool {
        self.entries.contains_key(digest)
    }

    /// Record `plaintext` for `digest`.
    ///
    /// Returns `Ok(true)` if this resolved the digest and `Ok(false)` if it
    /// was already resolved (first match wins).
    pub fn record_match(&mut self, digest: &Digest, plaintext: &str) -> Result<bool> {
        let slot = self
            .entries
            .get_mut(digest)
            .ok_or_else(|| CrackError::unknown_digest(digest))?;

        if slot.is_some() {
            return Ok(false);
        }
        *slot = Some(plaintext.to_string());
        self.unresolved -= 1;
        Ok(true)
    }

    pub fn plaintext(&self, digest: &Digest) -> Option<&str> {
        self.entries.get(digest).and_then(|p| p.as_deref())
    }

    pub fn is_resolved(&self, digest: &Digest) -> bool {
        self.plaintext(digest).is_some()
    }

    pub fn unresolved_count(&self) -> usize {
        self.unresolved
    }

    pub fn resolved_count(&self) -> usize {
        self.order.len() - self.unresolved
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// All entries in load order
    pub fn all_entries(&self) -> impl Iterator<Item = (&Digest, Option<&str>)> + '_ {
        self.order
            .iter()
            .map(move |digest| (digest, self.plaintext(digest)))
    }

    /// Digests without a plaintext yet, in load order
    pub fn unresolved_digests(&self) -> impl Iterator<Item = &Digest> + '_ {
        self.order.iter().filter(move |d| !self.is_resolved(d))
    }

    /// Rows for presentation, in load order
    pub fn report(&self) -> Vec<ReportEntry> {
        self.all_entries()
            .map(|(digest, plaintext)| ReportEntry {
                hash: digest.to_string(),
                plaintext: plaintext.map(str::to_string),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn digest(byte: u8) -> Digest {
        Digest::new(vec![byte; 16])
    }

    #[test]
    fn test_load_is_idempotent() {
        let mut targets = TargetHashSet::new();
        assert!(targets.load(digest(1)));
        assert_eq!(targets.unresolved_count(), 1);
        assert!(!targets.load(digest(1)));
        assert_eq!(targets.unresolved_count(), 1);
        assert_eq!(targets.len(), 1);
    }

    #[test]
    fn test_first_match_wins() {
        let mut targets = TargetHashSet::new();
        targets.load(digest(1));

        assert!(targets.record_match(&digest(1), "first").unwrap());
        assert!(!targets.record_match(&digest(1), "second").unwrap());
        assert_eq!(targets.plaintext(&digest(1)), Some("first"));
        assert_eq!(targets.unresolved_count(), 0);
        assert_eq!(targets.resolved_count(), 1);
    }

    #[test]
    fn test_record_unknown_digest() {
        let mut targets = TargetHashSet::new();
        let err = targets.record_match(&digest(9), "x").unwrap_err();
        assert!(matches!(err, CrackError::UnknownDigest { .. }));
        assert!(targets.is_empty());
    }

    #[test]
    fn test_entries_keep_load_order() {
        let mut targets = TargetHashSet::new();
        for b in [5, 3, 8] {
            targets.load(digest(b));
        }
        targets.record_match(&digest(3), "three").unwrap();

        let entries: Vec<_> = targets.all_entries().collect();
        assert_eq!(entries[0], (&digest(5), None));
        assert_eq!(entries[1], (&digest(3), Some("three")));
        assert_eq!(entries[2], (&digest(8), None));

        let unresolved: Vec<_> = targets.unresolved_digests().cloned().collect();
        assert_eq!(unresolved, vec![digest(5), digest(8)]);
    }

    #[test]
    fn test_from_reader() {
        let list = "\
# leaked admin hashes
5f4dcc3b5aa765d61d8327deb882cf99

5F4DCC3B5AA765D61D8327DEB882CF99
d41d8cd98f00b204e9800998ecf8427e
";
        let targets =
            TargetHashSet::from_reader(Cursor::new(list), HashAlgorithm::Md5, "list").unwrap();
        assert_eq!(targets.len(), 2);
        assert_eq!(targets.unresolved_count(), 2);
    }

    #[test]
    fn test_from_reader_reports_bad_line() {
        let list = "5f4dcc3b5aa765d61d8327deb882cf99\nnope\n";
        let err =
            TargetHashSet::from_reader(Cursor::new(list), HashAlgorithm::Md5, "list").unwrap_err();
        assert!(matches!(err, CrackError::InvalidTarget { line: 2, .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let err = TargetHashSet::load_file(Path::new("/nonexistent/hashes.txt"), HashAlgorithm::Md5)
            .unwrap_err();
        assert!(matches!(err, CrackError::TargetFile { .. }));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_report() {
        let mut targets = TargetHashSet::new();
        targets.load(digest(0xab));
        targets.record_match(&digest(0xab), "pw").unwrap();
        let report = targets.report();
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].hash, "ab".repeat(16));
        assert_eq!(report[0].plaintext.as_deref(), Some("pw"));
    }
}
