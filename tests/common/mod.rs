//! Common test utilities for oracle integration tests.
//!
//! Wire builders for names, records and signed inputs, stub verifiers that
//! isolate the state machine from real cryptography, and a pre-wired chain
//! of trust from the anchors down to an example zone.

#![allow(dead_code)] // These helpers are shared by several test files.

use std::sync::Arc;

use mimir::{
    calculate_key_tag, DigestVerifier, Nsec3Hasher, Oracle, OracleConfig, SignatureVerifier,
};

/// Algorithm / digest-type / NSEC3-hash ids the stub verifiers register
/// under. Chosen in the private-use range so the ring defaults never match.
pub const TEST_ALGORITHM: u8 = 230;
pub const TEST_DIGEST: u8 = 230;
pub const TEST_NSEC3_ALG: u8 = 230;

/// The oracle's clock during tests, and a validity window around it.
pub const NOW: u64 = 1_700_000_000;
pub const INCEPTION: u32 = 1_699_990_000;
pub const EXPIRATION: u32 = 1_700_010_000;

pub const TYPE_A: u16 = 1;
pub const TYPE_TXT: u16 = 16;
pub const TYPE_DS: u16 = 43;
pub const TYPE_NSEC: u16 = 47;
pub const TYPE_DNSKEY: u16 = 48;
pub const TYPE_NSEC3: u16 = 50;

/// Signature verifier that accepts everything.
pub struct AcceptAll;

impl SignatureVerifier for AcceptAll {
    fn verify(&self, _: &[u8], _: &[u8], _: &[u8]) -> bool {
        true
    }
}

impl DigestVerifier for AcceptAll {
    fn verify(&self, _: &[u8], _: &[u8]) -> bool {
        true
    }
}

/// Signature verifier that rejects everything.
pub struct RejectAll;

impl SignatureVerifier for RejectAll {
    fn verify(&self, _: &[u8], _: &[u8], _: &[u8]) -> bool {
        false
    }
}

/// Stand-in NSEC3 hasher: the hash of a name is its leading bytes, which
/// lets tests choose hash order by choosing names.
pub struct LeadingBytesHasher;

impl Nsec3Hasher for LeadingBytesHasher {
    fn hash(&self, _salt: &[u8], name: &[u8], _iterations: u16) -> [u8; 32] {
        let mut word = [0u8; 32];
        let n = name.len().min(20);
        word[..n].copy_from_slice(&name[..n]);
        word
    }
}

/// Encode labels into an uncompressed wire-format name.
pub fn name(labels: &[&str]) -> Vec<u8> {
    let mut out = Vec::new();
    for label in labels {
        out.push(label.len() as u8);
        out.extend_from_slice(label.as_bytes());
    }
    out.push(0);
    out
}

/// One wire-format resource record, class IN.
pub fn record(owner: &[u8], dnstype: u16, ttl: u32, rdata: &[u8]) -> Vec<u8> {
    record_with_class(owner, dnstype, 1, ttl, rdata)
}

pub fn record_with_class(owner: &[u8], dnstype: u16, class: u16, ttl: u32, rdata: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(owner);
    out.extend_from_slice(&dnstype.to_be_bytes());
    out.extend_from_slice(&class.to_be_bytes());
    out.extend_from_slice(&ttl.to_be_bytes());
    out.extend_from_slice(&(rdata.len() as u16).to_be_bytes());
    out.extend_from_slice(rdata);
    out
}

/// The `input` argument of a submission: the RRSIG rdata minus the
/// signature (fixed prefix plus signer name) followed by the covered RRs.
pub fn signed_input(
    typecovered: u16,
    algorithm: u8,
    labels: u8,
    expiration: u32,
    inception: u32,
    key_tag: u16,
    signer: &[u8],
    rrs: &[u8],
) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&typecovered.to_be_bytes());
    out.push(algorithm);
    out.push(labels);
    out.extend_from_slice(&3600u32.to_be_bytes()); // original TTL
    out.extend_from_slice(&expiration.to_be_bytes());
    out.extend_from_slice(&inception.to_be_bytes());
    out.extend_from_slice(&key_tag.to_be_bytes());
    out.extend_from_slice(signer);
    out.extend_from_slice(rrs);
    out
}

/// DNSKEY rdata with protocol 3.
pub fn dnskey_rdata(flags: u16, algorithm: u8, key: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&flags.to_be_bytes());
    out.push(3);
    out.push(algorithm);
    out.extend_from_slice(key);
    out
}

/// DS rdata.
pub fn ds_rdata(key_tag: u16, algorithm: u8, digest_type: u8, digest: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&key_tag.to_be_bytes());
    out.push(algorithm);
    out.push(digest_type);
    out.extend_from_slice(digest);
    out
}

/// Owner name for an NSEC3 record: base32hex of `hash_bytes` as the first
/// label, followed by the zone labels.
pub fn hashed_owner(hash_bytes: &[u8], zone: &[&str]) -> Vec<u8> {
    let label =
        base32::encode(base32::Alphabet::Rfc4648Hex { padding: false }, hash_bytes).to_lowercase();
    let mut out = vec![label.len() as u8];
    out.extend_from_slice(label.as_bytes());
    for part in zone {
        out.push(part.len() as u8);
        out.extend_from_slice(part.as_bytes());
    }
    out.push(0);
    out
}

pub fn root_dnskey_rdata() -> Vec<u8> {
    dnskey_rdata(0x0101, TEST_ALGORITHM, b"root zone key material")
}

pub fn root_key_tag() -> u16 {
    calculate_key_tag(&root_dnskey_rdata())
}

/// The anchor byte string: one DS record at the root covering the root key.
pub fn root_anchors() -> Vec<u8> {
    record(
        &name(&[]),
        TYPE_DS,
        3600,
        &ds_rdata(root_key_tag(), TEST_ALGORITHM, TEST_DIGEST, b"root ds digest"),
    )
}

pub fn root_dnskey_rrs() -> Vec<u8> {
    record(&name(&[]), TYPE_DNSKEY, 3600, &root_dnskey_rdata())
}

pub fn root_dnskey_input() -> Vec<u8> {
    signed_input(
        TYPE_DNSKEY,
        TEST_ALGORITHM,
        0,
        EXPIRATION,
        INCEPTION,
        root_key_tag(),
        &name(&[]),
        &root_dnskey_rrs(),
    )
}

pub fn example_dnskey_rdata() -> Vec<u8> {
    dnskey_rdata(0x0100, TEST_ALGORITHM, b"example zone key material")
}

pub fn example_key_tag() -> u16 {
    calculate_key_tag(&example_dnskey_rdata())
}

pub fn example_ds_rrs() -> Vec<u8> {
    record(
        &name(&["example"]),
        TYPE_DS,
        3600,
        &ds_rdata(
            example_key_tag(),
            TEST_ALGORITHM,
            TEST_DIGEST,
            b"example ds digest",
        ),
    )
}

pub fn example_dnskey_rrs() -> Vec<u8> {
    record(&name(&["example"]), TYPE_DNSKEY, 3600, &example_dnskey_rdata())
}

/// An oracle with the stub verifiers installed and the clock pinned.
pub fn test_oracle(anchors: Vec<u8>) -> Oracle {
    let mut oracle = Oracle::new(OracleConfig {
        admin: "admin".to_string(),
        anchors,
    });
    oracle.set_current_time(NOW);
    oracle
        .set_algorithm("admin", TEST_ALGORITHM, Arc::new(AcceptAll))
        .unwrap();
    oracle
        .set_digest("admin", TEST_DIGEST, Arc::new(AcceptAll))
        .unwrap();
    oracle
        .set_nsec3_digest("admin", TEST_NSEC3_ALG, Arc::new(LeadingBytesHasher))
        .unwrap();
    oracle.drain_events();
    oracle
}

/// An oracle already holding the root DNSKEY, the example DS set and the
/// example DNSKEY, i.e. a full chain of trust down to the example zone.
pub fn oracle_with_example_zone() -> Oracle {
    let mut oracle = test_oracle(root_anchors());

    oracle
        .submit_rrset(&root_dnskey_input(), b"sig", &root_anchors())
        .expect("root DNSKEY accepted");

    let ds_input = signed_input(
        TYPE_DS,
        TEST_ALGORITHM,
        1,
        EXPIRATION,
        INCEPTION,
        root_key_tag(),
        &name(&[]),
        &example_ds_rrs(),
    );
    oracle
        .submit_rrset(&ds_input, b"sig", &root_dnskey_rrs())
        .expect("example DS accepted");

    let dnskey_input = signed_input(
        TYPE_DNSKEY,
        TEST_ALGORITHM,
        1,
        EXPIRATION,
        INCEPTION,
        example_key_tag(),
        &name(&["example"]),
        &example_dnskey_rrs(),
    );
    oracle
        .submit_rrset(&dnskey_input, b"sig", &example_ds_rrs())
        .expect("example DNSKEY accepted");

    oracle.drain_events();
    oracle
}

/// Submit an A RRSET under the example zone, signed by the example key.
pub fn submit_a_rrset(oracle: &mut Oracle, owner: &[u8], labels: u8, inception: u32) -> mimir::Result<()> {
    let rrs = record(owner, TYPE_A, 300, &[192, 0, 2, 1]);
    let input = signed_input(
        TYPE_A,
        TEST_ALGORITHM,
        labels,
        EXPIRATION,
        inception,
        example_key_tag(),
        &name(&["example"]),
        &rrs,
    );
    oracle.submit_rrset(&input, b"sig", &example_dnskey_rrs())
}
