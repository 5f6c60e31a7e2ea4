//! Pluggable verifier registries.
//!
//! The oracle never inlines cryptography: signature checks, DS digest
//! checks, and NSEC3 hashing are dispatched through three independent
//! tables keyed by the IANA algorithm / digest-type id. A missing
//! registration makes the relevant verification fail rather than abort.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::algorithm::{EcdsaVerifier, Ed25519Verifier, RsaVerifier};
use crate::digest::{RingDigest, Sha1Nsec3Hasher};

/// Verifies a DNSSEC signature with a DNSKEY in wire rdata form.
pub trait SignatureVerifier: Send + Sync {
    /// True iff `signature` over `data` verifies under the key in
    /// `key_rdata` (full DNSKEY rdata: flags, protocol, algorithm, key).
    fn verify(&self, key_rdata: &[u8], data: &[u8], signature: &[u8]) -> bool;
}

/// Computes a digest of `data` and compares it against an expected value.
pub trait DigestVerifier: Send + Sync {
    /// True iff the digest of `data` equals `expected`.
    fn verify(&self, data: &[u8], expected: &[u8]) -> bool;
}

/// RFC 5155 iterated hashed-owner-name computation.
pub trait Nsec3Hasher: Send + Sync {
    /// Hash the wire-format `name` with `salt` over `iterations` rounds,
    /// returning the digest left-aligned in a 32-byte word.
    fn hash(&self, salt: &[u8], name: &[u8], iterations: u16) -> [u8; 32];
}

/// The three id-to-verifier tables.
pub struct Registry {
    algorithms: RwLock<HashMap<u8, Arc<dyn SignatureVerifier>>>,
    digests: RwLock<HashMap<u8, Arc<dyn DigestVerifier>>>,
    nsec3_digests: RwLock<HashMap<u8, Arc<dyn Nsec3Hasher>>>,
}

impl Registry {
    /// A registry with no verifiers installed.
    pub fn empty() -> Self {
        Self {
            algorithms: RwLock::new(HashMap::new()),
            digests: RwLock::new(HashMap::new()),
            nsec3_digests: RwLock::new(HashMap::new()),
        }
    }

    /// A registry covering the commonly deployed algorithm set: RSA/SHA-1
    /// (5 and its NSEC3 alias 7), RSA/SHA-256 (8), RSA/SHA-512 (10),
    /// ECDSA P-256 (13), ECDSA P-384 (14), Ed25519 (15); DS digests SHA-1
    /// (1), SHA-256 (2), SHA-384 (4); NSEC3 hash SHA-1 (1).
    pub fn with_defaults() -> Self {
        let registry = Self::empty();
        registry.set_algorithm(5, Arc::new(RsaVerifier::sha1()));
        registry.set_algorithm(7, Arc::new(RsaVerifier::sha1()));
        registry.set_algorithm(8, Arc::new(RsaVerifier::sha256()));
        registry.set_algorithm(10, Arc::new(RsaVerifier::sha512()));
        registry.set_algorithm(13, Arc::new(EcdsaVerifier::p256_sha256()));
        registry.set_algorithm(14, Arc::new(EcdsaVerifier::p384_sha384()));
        registry.set_algorithm(15, Arc::new(Ed25519Verifier));
        registry.set_digest(1, Arc::new(RingDigest::sha1()));
        registry.set_digest(2, Arc::new(RingDigest::sha256()));
        registry.set_digest(4, Arc::new(RingDigest::sha384()));
        registry.set_nsec3_digest(1, Arc::new(Sha1Nsec3Hasher));
        registry
    }

    /// Register or replace the signature verifier for algorithm `id`.
    pub fn set_algorithm(&self, id: u8, verifier: Arc<dyn SignatureVerifier>) {
        self.algorithms.write().insert(id, verifier);
    }

    /// Register or replace the DS digest verifier for digest type `id`.
    pub fn set_digest(&self, id: u8, verifier: Arc<dyn DigestVerifier>) {
        self.digests.write().insert(id, verifier);
    }

    /// Register or replace the NSEC3 hasher for hash algorithm `id`.
    pub fn set_nsec3_digest(&self, id: u8, hasher: Arc<dyn Nsec3Hasher>) {
        self.nsec3_digests.write().insert(id, hasher);
    }

    /// Whether a signature verifier is registered for algorithm `id`.
    pub fn has_algorithm(&self, id: u8) -> bool {
        self.algorithms.read().contains_key(&id)
    }

    /// Whether a digest verifier is registered for digest type `id`.
    pub fn has_digest(&self, id: u8) -> bool {
        self.digests.read().contains_key(&id)
    }

    /// Whether an NSEC3 hasher is registered for hash algorithm `id`.
    pub fn has_nsec3_digest(&self, id: u8) -> bool {
        self.nsec3_digests.read().contains_key(&id)
    }

    /// Verify a signature under algorithm `id`; false when unregistered.
    pub fn verify_signature(&self, id: u8, key_rdata: &[u8], data: &[u8], sig: &[u8]) -> bool {
        let verifier = self.algorithms.read().get(&id).cloned();
        match verifier {
            Some(v) => v.verify(key_rdata, data, sig),
            None => false,
        }
    }

    /// Verify a digest under digest type `id`; false when unregistered.
    pub fn verify_digest(&self, id: u8, data: &[u8], expected: &[u8]) -> bool {
        let verifier = self.digests.read().get(&id).cloned();
        match verifier {
            Some(v) => v.verify(data, expected),
            None => false,
        }
    }

    /// Hash a name under NSEC3 hash algorithm `id`; `None` when
    /// unregistered.
    pub fn nsec3_hash(&self, id: u8, salt: &[u8], name: &[u8], iterations: u16) -> Option<[u8; 32]> {
        let hasher = self.nsec3_digests.read().get(&id).cloned();
        hasher.map(|h| h.hash(salt, name, iterations))
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
