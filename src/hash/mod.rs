//! Hash capability used to digest candidates

mod algorithms;

pub use algorithms::Md5Hasher;
#[cfg(feature = "sha")]
pub use algorithms::{Sha1Hasher, Sha256Hasher};

use crate::error::{CrackError, Result};
use crate::types::{Digest, HashAlgorithm};

/// A fixed-output, unkeyed hash function
pub trait HashFunction: Send + Sync {
    /// Digest one candidate
    fn digest(&self, candidate: &str) -> Result<Digest>;

    /// Algorithm this function implements
    fn algorithm(&self) -> HashAlgorithm;
}

impl<H: HashFunction + ?Sized> HashFunction for Box<H> {
    fn digest(&self, candidate: &str) -> Result<Digest> {
        (**self).digest(candidate)
    }

    fn algorithm(&self) -> HashAlgorithm {
        (**self).algorithm()
    }
}

/// Algorithms compiled into this build
pub fn available_algorithms() -> Vec<HashAlgorithm> {
    let mut algorithms = vec![HashAlgorithm::Md5];
    if cfg!(feature = "sha") {
        algorithms.push(HashAlgorithm::Sha1);
        algorithms.push(HashAlgorithm::Sha256);
    }
    algorithms
}

/// Create a hash function for `algorithm`
pub fn hasher_for(algorithm: HashAlgorithm) -> Result<Box<dyn HashFunction>> {
    match algorithm {
        HashAlgorithm::Md5 => Ok(Box::new(Md5Hasher)),
        #[cfg(feature = "sha")]
        HashAlgorithm::Sha1 => Ok(Box::new(Sha1Hasher)),
        #[cfg(feature = "sha")]
        HashAlgorithm::Sha256 => Ok(Box::new(Sha256Hasher)),
        #[allow(unreachable_patterns)]
        other => Err(CrackError::config(format!(
            "Hash algorithm {} is not available in this build. Available: {}",
            other,
            available_algorithms()
                .iter()
                .map(|a| a.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hasher_for_md5() {
        let hasher = hasher_for(HashAlgorithm::Md5).unwrap();
        assert_eq!(hasher.algorithm(), HashAlgorithm::Md5);
        assert_eq!(
            hasher.digest("password").unwrap().to_string(),
            "5f4dcc3b5aa765d61d8327deb882cf99"
        );
    }

    #[test]
    fn test_available_algorithms_all_construct() {
        for algorithm in available_algorithms() {
            let hasher = hasher_for(algorithm).unwrap();
            assert_eq!(hasher.digest("x").unwrap().len(), algorithm.digest_len());
        }
    }
}
