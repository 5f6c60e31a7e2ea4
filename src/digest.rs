//! Ring-backed DS digest verifiers and the NSEC3 hashed-owner-name
//! computation.

use ring::digest;

use crate::registry::{DigestVerifier, Nsec3Hasher};

/// DS digest verifier backed by a ring digest algorithm.
pub struct RingDigest {
    alg: &'static digest::Algorithm,
}

impl RingDigest {
    /// SHA-1 (digest type 1).
    pub fn sha1() -> Self {
        Self {
            alg: &digest::SHA1_FOR_LEGACY_USE_ONLY,
        }
    }

    /// SHA-256 (digest type 2).
    pub fn sha256() -> Self {
        Self {
            alg: &digest::SHA256,
        }
    }

    /// SHA-384 (digest type 4).
    pub fn sha384() -> Self {
        Self {
            alg: &digest::SHA384,
        }
    }
}

impl DigestVerifier for RingDigest {
    fn verify(&self, data: &[u8], expected: &[u8]) -> bool {
        digest::digest(self.alg, data).as_ref() == expected
    }
}

/// RFC 5155 iterated SHA-1 hashed-owner-name computation (NSEC3 hash
/// algorithm 1). The 20-byte digest lands left-aligned in the 32-byte word.
pub struct Sha1Nsec3Hasher;

impl Nsec3Hasher for Sha1Nsec3Hasher {
    fn hash(&self, salt: &[u8], name: &[u8], iterations: u16) -> [u8; 32] {
        // Initial hash is H(name || salt), then iterate H(h || salt).
        let mut input = Vec::with_capacity(name.len() + salt.len());
        input.extend_from_slice(name);
        input.extend_from_slice(salt);
        let mut hash = digest::digest(&digest::SHA1_FOR_LEGACY_USE_ONLY, &input);

        for _ in 0..iterations {
            let mut next = Vec::with_capacity(hash.as_ref().len() + salt.len());
            next.extend_from_slice(hash.as_ref());
            next.extend_from_slice(salt);
            hash = digest::digest(&digest::SHA1_FOR_LEGACY_USE_ONLY, &next);
        }

        let mut word = [0u8; 32];
        word[..hash.as_ref().len()].copy_from_slice(hash.as_ref());
        word
    }
}
