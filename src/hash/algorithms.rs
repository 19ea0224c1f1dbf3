//! RustCrypto-backed hash functions

use md5::{Digest as _, Md5};

use super::HashFunction;
use crate::error::Result;
use crate::types::{Digest, HashAlgorithm};

/// MD5, the reference algorithm
#[derive(Debug, Clone, Copy, Default)]
pub struct Md5Hasher;

impl HashFunction for Md5Hasher {
    fn digest(&self, candidate: &str) -> Result<Digest> {
        Ok(Digest::from(Md5::digest(candidate.as_bytes()).as_slice()))
    }

    fn algorithm(&self) -> HashAlgorithm {
        HashAlgorithm::Md5
    }
}

#[cfg(feature = "sha")]
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha1Hasher;

#[cfg(feature = "sha")]
impl HashFunction for Sha1Hasher {
    fn digest(&self, candidate: &str) -> Result<Digest> {
        use sha1::{Digest as _, Sha1};
        Ok(Digest::from(Sha1::digest(candidate.as_bytes()).as_slice()))
    }

    fn algorithm(&self) -> HashAlgorithm {
        HashAlgorithm::Sha1
    }
}

#[cfg(feature = "sha")]
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hasher;

#[cfg(feature = "sha")]
impl HashFunction for Sha256Hasher {
    fn digest(&self, candidate: &str) -> Result<Digest> {
        use sha2::{Digest as _, Sha256};
        Ok(Digest::from(Sha256::digest(candidate.as_bytes()).as_slice()))
    }

    fn algorithm(&self) -> HashAlgorithm {
        HashAlgorithm::Sha256
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_md5_known_vectors() {
        let hasher = Md5Hasher;
        assert_eq!(
            hasher.digest("").unwrap().to_string(),
            "d41d8cd98f00b204e9800998ecf8427e"
        );
        assert_eq!(
            hasher.digest("abc").unwrap().to_string(),
            "900150983cd24fb0d6963f7d28e17f72"
        );
    }

    #[cfg(feature = "sha")]
    #[test]
    fn test_sha_known_vectors() {
        assert_eq!(
            Sha1Hasher.digest("abc").unwrap().to_string(),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
        assert_eq!(
            Sha256Hasher.digest("abc").unwrap().to_string(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
