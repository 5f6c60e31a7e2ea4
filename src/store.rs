//! The authenticated (name, type) → RRSet map.

use std::collections::HashMap;

use ring::digest;
use serde::{Deserialize, Serialize};

use crate::constants::{ANCHOR_NAME, TYPE_DS};

/// Authenticated summary of a validated RRSET.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RrSet {
    /// RRSIG inception of the accepted submission, in seconds.
    pub inception: u32,
    /// Oracle wall-clock seconds at insertion; nonzero iff the entry exists.
    pub inserted: u64,
    /// Truncated digest of the canonical RR bytes the signature covered.
    pub fingerprint: [u8; 20],
}

impl RrSet {
    /// The zero triple returned for names that have no entry.
    pub const ABSENT: RrSet = RrSet {
        inception: 0,
        inserted: 0,
        fingerprint: [0; 20],
    };

    /// Whether this entry exists in the store.
    pub fn exists(&self) -> bool {
        self.inserted > 0
    }
}

/// 20-byte content fingerprint: SHA-256 truncated.
pub fn fingerprint(data: &[u8]) -> [u8; 20] {
    let digest = digest::digest(&digest::SHA256, data);
    let mut out = [0u8; 20];
    out.copy_from_slice(&digest.as_ref()[..20]);
    out
}

/// Fixed-width store key: SHA-256 of the exact wire-form name. Names are
/// compared byte for byte; case folding is the caller's concern.
fn name_key(name: &[u8]) -> [u8; 32] {
    let digest = digest::digest(&digest::SHA256, name);
    let mut out = [0u8; 32];
    out.copy_from_slice(digest.as_ref());
    out
}

/// Flat map from (hashed name, record type) to the authenticated summary,
/// bootstrapped with the configured trust anchors.
pub struct RrSetStore {
    entries: HashMap<([u8; 32], u16), RrSet>,
    anchors: Vec<u8>,
}

impl RrSetStore {
    /// Create a store holding only the anchor entry: the DS records in
    /// `anchors`, fingerprinted under the sentinel name.
    pub fn new(anchors: Vec<u8>, now: u64) -> Self {
        let mut store = Self {
            entries: HashMap::new(),
            anchors,
        };
        let entry = RrSet {
            inception: 0,
            inserted: now,
            fingerprint: fingerprint(&store.anchors),
        };
        store.entries.insert((name_key(ANCHOR_NAME), TYPE_DS), entry);
        store
    }

    /// Look up the entry for `(name, dnstype)`, or the zero triple.
    pub fn get(&self, name: &[u8], dnstype: u16) -> RrSet {
        self.entries
            .get(&(name_key(name), dnstype))
            .copied()
            .unwrap_or(RrSet::ABSENT)
    }

    /// Write the entry for `(name, dnstype)` unconditionally. Monotonicity
    /// is the validation engine's responsibility.
    pub fn insert(&mut self, name: &[u8], dnstype: u16, entry: RrSet) {
        self.entries.insert((name_key(name), dnstype), entry);
    }

    /// Remove the entry for `(name, dnstype)` if present.
    pub fn remove(&mut self, name: &[u8], dnstype: u16) {
        self.entries.remove(&(name_key(name), dnstype));
    }

    /// The installed trust anchor byte string.
    pub fn anchors(&self) -> &[u8] {
        &self.anchors
    }
}
