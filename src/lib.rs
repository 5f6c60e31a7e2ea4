//! A DNSSEC validating oracle.
//!
//! The oracle ingests signed DNS record sets in uncompressed wire format,
//! verifies them against a chain of trust rooted at a configured set of DS
//! trust anchors, and stores a compact authenticated summary (signature
//! inception, insertion time, content fingerprint) keyed by owner name and
//! record type. Records can later be removed by submitting an NSEC or NSEC3
//! proof of non-existence.
//!
//! Cryptographic primitives are pluggable: signature verification, DS digest
//! checking, and NSEC3 hashing are looked up in admin-mutable registries
//! keyed by their IANA ids. A default registry backed by *ring* covers the
//! commonly deployed algorithms.

pub mod algorithm;
pub mod config;
mod denial;
pub mod digest;
pub mod errors;
pub mod events;
pub mod key_tag;
mod oracle;
pub mod registry;
pub mod store;
pub mod wire;

pub use config::OracleConfig;
pub use errors::{OracleError, Result};
pub use events::Event;
pub use key_tag::calculate_key_tag;
pub use oracle::Oracle;
pub use registry::{DigestVerifier, Nsec3Hasher, Registry, SignatureVerifier};
pub use store::{fingerprint, RrSet};

/// Wire-format constants used on the validation path.
pub mod constants {
    /// DNS class IN.
    pub const CLASS_IN: u16 = 1;

    /// DS record type.
    pub const TYPE_DS: u16 = 43;
    /// RRSIG record type.
    pub const TYPE_RRSIG: u16 = 46;
    /// NSEC record type.
    pub const TYPE_NSEC: u16 = 47;
    /// DNSKEY record type.
    pub const TYPE_DNSKEY: u16 = 48;
    /// NSEC3 record type.
    pub const TYPE_NSEC3: u16 = 50;

    /// Maximum iterations for NSEC3 (RFC 5155).
    pub const MAX_NSEC3_ITERATIONS: u16 = 2500;

    /// Zone-key bit in the DNSKEY flags field (RFC 4034).
    pub const DNSKEY_FLAG_ZONE_KEY: u16 = 0x0100;
    /// The only protocol value valid in a DNSKEY (RFC 4034).
    pub const DNSKEY_PROTOCOL: u8 = 3;

    /// Offset of the flags field in DNSKEY rdata.
    pub const DNSKEY_FLAGS_OFFSET: usize = 0;
    /// Offset of the protocol field in DNSKEY rdata.
    pub const DNSKEY_PROTOCOL_OFFSET: usize = 2;
    /// Offset of the algorithm field in DNSKEY rdata.
    pub const DNSKEY_ALGORITHM_OFFSET: usize = 3;
    /// Offset of the public key in DNSKEY rdata.
    pub const DNSKEY_PUBKEY_OFFSET: usize = 4;

    /// Offset of the type-covered field in RRSIG rdata. The same offsets
    /// apply to the signed-data prefix, which is RRSIG rdata with the
    /// trailing signature stripped.
    pub const RRSIG_TYPE_COVERED: usize = 0;
    /// Offset of the algorithm field in RRSIG rdata.
    pub const RRSIG_ALGORITHM: usize = 2;
    /// Offset of the labels field in RRSIG rdata.
    pub const RRSIG_LABELS: usize = 3;
    /// Offset of the original-TTL field in RRSIG rdata.
    pub const RRSIG_ORIGINAL_TTL: usize = 4;
    /// Offset of the expiration field in RRSIG rdata.
    pub const RRSIG_EXPIRATION: usize = 8;
    /// Offset of the inception field in RRSIG rdata.
    pub const RRSIG_INCEPTION: usize = 12;
    /// Offset of the key-tag field in RRSIG rdata.
    pub const RRSIG_KEY_TAG: usize = 16;
    /// Offset of the signer name in RRSIG rdata.
    pub const RRSIG_SIGNER_NAME: usize = 18;

    /// Offset of the key-tag field in DS rdata.
    pub const DS_KEY_TAG_OFFSET: usize = 0;
    /// Offset of the algorithm field in DS rdata.
    pub const DS_ALGORITHM_OFFSET: usize = 2;
    /// Offset of the digest-type field in DS rdata.
    pub const DS_DIGEST_TYPE_OFFSET: usize = 3;
    /// Offset of the digest in DS rdata.
    pub const DS_DIGEST_OFFSET: usize = 4;

    /// Wire form of the root name.
    pub const ROOT_NAME: &[u8] = &[0];

    /// Synthetic owner name the trust anchors are stored under. A parsed
    /// wire name can never be this single byte: a leading 0x20 would demand
    /// a 32-octet label plus terminator.
    pub const ANCHOR_NAME: &[u8] = b" ";

    /// First two bytes of a wildcard owner name, as a big-endian u16.
    pub const WILDCARD_LABEL: u16 = 0x012A;
}
