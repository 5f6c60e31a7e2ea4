//! The validation engine.
//!
//! Each public entry point is transactional: it either runs to completion
//! and commits its single store mutation (plus one event), or it aborts
//! with an error and no observable state change. External verifiers are
//! synchronous and treated as pure functions.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, trace, warn};

use crate::config::OracleConfig;
use crate::constants::{
    ANCHOR_NAME, CLASS_IN, DNSKEY_ALGORITHM_OFFSET, DNSKEY_FLAGS_OFFSET, DNSKEY_FLAG_ZONE_KEY,
    DNSKEY_PROTOCOL, DNSKEY_PROTOCOL_OFFSET, DS_ALGORITHM_OFFSET, DS_DIGEST_OFFSET,
    DS_DIGEST_TYPE_OFFSET, DS_KEY_TAG_OFFSET, ROOT_NAME, RRSIG_ALGORITHM, RRSIG_EXPIRATION,
    RRSIG_INCEPTION, RRSIG_KEY_TAG, RRSIG_LABELS, RRSIG_SIGNER_NAME, RRSIG_TYPE_COVERED,
    TYPE_DNSKEY, TYPE_DS, TYPE_NSEC, TYPE_NSEC3, WILDCARD_LABEL,
};
use crate::denial;
use crate::errors::{OracleError, Result};
use crate::events::Event;
use crate::key_tag::calculate_key_tag;
use crate::registry::{DigestVerifier, Nsec3Hasher, Registry, SignatureVerifier};
use crate::store::{fingerprint, RrSet, RrSetStore};
use crate::wire::{self, iterator::RecordIterator};

/// A DNSSEC validating oracle.
///
/// Accepts signed RRSETs whose chain of trust reaches the configured
/// anchors and maintains an authenticated summary per (owner name, record
/// type). See [`Oracle::submit_rrset`] and [`Oracle::delete_rrset`].
pub struct Oracle {
    admin: String,
    store: RrSetStore,
    registry: Registry,
    events: Vec<Event>,
    /// Current time override (for testing).
    current_time: Option<u64>,
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

impl Oracle {
    /// Create an oracle with the default *ring*-backed verifier registry.
    pub fn new(config: OracleConfig) -> Self {
        Self::with_registry(config, Registry::with_defaults())
    }

    /// Create an oracle with a caller-supplied verifier registry.
    pub fn with_registry(config: OracleConfig, registry: Registry) -> Self {
        Self {
            admin: config.admin,
            store: RrSetStore::new(config.anchors, unix_now()),
            registry,
            events: Vec::new(),
            current_time: None,
        }
    }

    /// Set current time for testing.
    pub fn set_current_time(&mut self, time: u64) {
        self.current_time = Some(time);
    }

    fn now(&self) -> u64 {
        self.current_time.unwrap_or_else(unix_now)
    }

    /// The installed trust anchor byte string.
    pub fn anchors(&self) -> &[u8] {
        self.store.anchors()
    }

    /// The verifier registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Look up the authenticated summary for `(name, dnstype)`. Returns the
    /// zero triple when no entry exists.
    pub fn rrdata(&self, dnstype: u16, name: &[u8]) -> (u32, u64, [u8; 20]) {
        let entry = self.store.get(name, dnstype);
        (entry.inception, entry.inserted, entry.fingerprint)
    }

    /// Drain the events emitted since the last call.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    /// Register or replace the signature verifier for algorithm `id`.
    /// Privileged.
    pub fn set_algorithm(
        &mut self,
        caller: &str,
        id: u8,
        verifier: Arc<dyn SignatureVerifier>,
    ) -> Result<()> {
        self.require_admin(caller)?;
        self.registry.set_algorithm(id, verifier);
        debug!(id, caller, "algorithm verifier updated");
        self.events.push(Event::AlgorithmUpdated {
            id,
            identity: caller.to_string(),
        });
        Ok(())
    }

    /// Register or replace the DS digest verifier for digest type `id`.
    /// Privileged.
    pub fn set_digest(
        &mut self,
        caller: &str,
        id: u8,
        verifier: Arc<dyn DigestVerifier>,
    ) -> Result<()> {
        self.require_admin(caller)?;
        self.registry.set_digest(id, verifier);
        debug!(id, caller, "digest verifier updated");
        self.events.push(Event::DigestUpdated {
            id,
            identity: caller.to_string(),
        });
        Ok(())
    }

    /// Register or replace the NSEC3 hasher for hash algorithm `id`.
    /// Privileged.
    pub fn set_nsec3_digest(
        &mut self,
        caller: &str,
        id: u8,
        hasher: Arc<dyn Nsec3Hasher>,
    ) -> Result<()> {
        self.require_admin(caller)?;
        self.registry.set_nsec3_digest(id, hasher);
        debug!(id, caller, "NSEC3 hasher updated");
        self.events.push(Event::Nsec3DigestUpdated {
            id,
            identity: caller.to_string(),
        });
        Ok(())
    }

    fn require_admin(&self, caller: &str) -> Result<()> {
        if caller == self.admin {
            Ok(())
        } else {
            warn!(caller, "unauthorized admin operation");
            Err(OracleError::Unauthorized)
        }
    }

    /// Submit a signed RRSET for validation and storage.
    ///
    /// `input` is the RRSIG rdata minus the trailing signature (the 18-byte
    /// fixed prefix and the signer name) followed by the canonical RR bytes
    /// the signature covers. `sig` is the signature itself. `proof` is a
    /// previously trusted DNSKEY or DS RRSET in wire form that authenticates
    /// the signing key.
    ///
    /// On success the entry for (owner name, covered type) holds the
    /// signature's inception, the current time, and the fingerprint of the
    /// covered RRs, and one [`Event::RRSetUpdated`] is emitted. Re-submitting
    /// identical content is accepted without mutation or event.
    pub fn submit_rrset(&mut self, input: &[u8], sig: &[u8], proof: &[u8]) -> Result<()> {
        let (name, rrs) = self.validate_signed_set(input, sig, proof)?;
        let inception = wire::read_u32(input, RRSIG_INCEPTION)?;
        let typecovered = wire::read_u16(input, RRSIG_TYPE_COVERED)?;

        let existing = self.store.get(name, typecovered);
        if existing.exists() && inception < existing.inception {
            warn!(
                dnstype = typecovered,
                "replay rejected: submitted inception is older than stored"
            );
            return Err(OracleError::ReplayRejected {
                stored: existing.inception,
                submitted: inception,
            });
        }

        let fp = fingerprint(rrs);
        if existing.exists() && existing.fingerprint == fp {
            trace!(dnstype = typecovered, "rrset unchanged, skipping update");
            return Ok(());
        }

        let entry = RrSet {
            inception,
            inserted: self.now(),
            fingerprint: fp,
        };
        self.store.insert(name, typecovered, entry);
        debug!(dnstype = typecovered, inception, "rrset accepted");
        self.events.push(Event::RRSetUpdated {
            name: name.to_vec(),
            rrs: rrs.to_vec(),
        });
        Ok(())
    }

    /// Delete a stored RRSET through an NSEC or NSEC3 proof of
    /// non-existence.
    ///
    /// `nsec`, `sig` and `proof` form a signed RRSET submission exactly as
    /// in [`Oracle::submit_rrset`], whose content must be an NSEC or NSEC3
    /// record covering `delete_name` without `delete_type`.
    pub fn delete_rrset(
        &mut self,
        delete_type: u16,
        delete_name: &[u8],
        nsec: &[u8],
        sig: &[u8],
        proof: &[u8],
    ) -> Result<()> {
        let (nsec_name, rrs) = self.validate_signed_set(nsec, sig, proof)?;

        // An old denial must not delete a record accepted after it.
        let nsec_inception = wire::read_u32(nsec, RRSIG_INCEPTION)?;
        let existing = self.store.get(delete_name, delete_type);
        if existing.inception > nsec_inception {
            return Err(OracleError::ReplayRejected {
                stored: existing.inception,
                submitted: nsec_inception,
            });
        }

        // Only the first record of the proof set is examined.
        let mut records = RecordIterator::new(rrs, 0);
        let record = records
            .next()
            .ok_or(OracleError::DenialOfExistenceFailed)??;
        match record.dnstype {
            TYPE_NSEC => denial::check_nsec_name(&record, nsec_name, delete_name, delete_type)?,
            TYPE_NSEC3 => denial::check_nsec3_name(
                &self.registry,
                &record,
                nsec_name,
                delete_name,
                delete_type,
            )?,
            other => return Err(OracleError::UnrecognizedRecordType(other)),
        }

        self.store.remove(delete_name, delete_type);
        debug!(dnstype = delete_type, "rrset deleted");
        self.events.push(Event::RRSetDeleted {
            name: delete_name.to_vec(),
            dnstype: delete_type,
        });
        Ok(())
    }

    /// Validate a signed RRSET against a trusted proof, returning the owner
    /// name and the covered RR bytes.
    fn validate_signed_set<'a>(
        &self,
        input: &'a [u8],
        sig: &[u8],
        proof: &[u8],
    ) -> Result<(&'a [u8], &'a [u8])> {
        let signer_len = wire::name_length(input, RRSIG_SIGNER_NAME)?;
        let signer_name = wire::substring(input, RRSIG_SIGNER_NAME, signer_len)?;
        self.check_proof(signer_name, proof)?;

        let inception = wire::read_u32(input, RRSIG_INCEPTION)?;
        let expiration = wire::read_u32(input, RRSIG_EXPIRATION)?;
        let typecovered = wire::read_u16(input, RRSIG_TYPE_COVERED)?;
        let labels = wire::read_u8(input, RRSIG_LABELS)?;

        let rrs = &input[RRSIG_SIGNER_NAME + signer_len..];
        let name = Self::validate_rrs(rrs, typecovered)?;
        Self::check_name_labels(name, labels)?;
        self.verify_signature(name, input, sig, proof)?;

        // TODO: switch to RFC 1982 serial number arithmetic for these
        // comparisons.
        let now = self.now() as u32;
        if expiration <= now {
            return Err(OracleError::SignatureExpired);
        }
        if inception >= now {
            return Err(OracleError::SignatureNotYetValid);
        }

        trace!(dnstype = typecovered, "signed set validated");
        Ok((name, rrs))
    }

    /// Check that `proof` matches a trusted entry for `name` and the
    /// proof's own record type.
    fn check_proof(&self, name: &[u8], proof: &[u8]) -> Result<()> {
        let owner_len = wire::name_length(proof, 0)?;
        let proof_type = wire::read_u16(proof, owner_len)?;

        // The root's DS set is the installed trust anchor, stored under a
        // sentinel key no wire-format name can collide with.
        let entry = if name == ROOT_NAME && proof_type == TYPE_DS {
            self.store.get(ANCHOR_NAME, TYPE_DS)
        } else {
            self.store.get(name, proof_type)
        };

        if !entry.exists() || entry.fingerprint != fingerprint(proof) {
            warn!(dnstype = proof_type, "proof is not trusted");
            return Err(OracleError::UntrustedProof);
        }
        Ok(())
    }

    /// Walk the covered RRs: all class IN, all the covered type, all sharing
    /// one owner name. Returns that owner name (empty for an empty set).
    fn validate_rrs(rrs: &[u8], typecovered: u16) -> Result<&[u8]> {
        let mut name: &[u8] = &[];
        for record in RecordIterator::new(rrs, 0) {
            let record = record?;
            if record.class != CLASS_IN {
                return Err(OracleError::UnsupportedClass(record.class));
            }
            if name.is_empty() {
                name = record.name();
            } else if record.name() != name {
                return Err(OracleError::NameMismatch);
            }
            if record.dnstype != typecovered {
                return Err(OracleError::TypeMismatch {
                    expected: typecovered,
                    found: record.dnstype,
                });
            }
        }
        Ok(name)
    }

    /// Check the owner name's label count against the RRSIG labels field,
    /// allowing one extra label when the name is a wildcard expansion.
    fn check_name_labels(name: &[u8], labels: u8) -> Result<()> {
        let count = wire::label_count(name, 0)?;
        let labels = labels as usize;
        if count == labels {
            return Ok(());
        }
        if count == labels + 1 && wire::read_u16(name, 0)? == WILDCARD_LABEL {
            return Ok(());
        }
        Err(OracleError::LabelCountMismatch)
    }

    /// Verify the signature over `data` using the proof, dispatching on the
    /// proof's record type.
    fn verify_signature(&self, name: &[u8], data: &[u8], sig: &[u8], proof: &[u8]) -> Result<()> {
        let signer_len = wire::name_length(data, RRSIG_SIGNER_NAME)?;

        // The signer's zone must contain the record.
        if name.len() < signer_len
            || !wire::equals(name, name.len() - signer_len, data, RRSIG_SIGNER_NAME, signer_len)
        {
            return Err(OracleError::SignerNameMismatch);
        }

        let proof_name_len = wire::name_length(proof, 0)?;
        match wire::read_u16(proof, proof_name_len)? {
            TYPE_DS => self.verify_with_ds(data, sig, RRSIG_SIGNER_NAME + signer_len, proof),
            TYPE_DNSKEY => self.verify_with_known_key(data, sig, proof),
            other => Err(OracleError::UnsupportedProofType(other)),
        }
    }

    /// Verify against a trusted DNSKEY RRSET: every key must be owned by
    /// the signer; the first key that validates the signature wins.
    fn verify_with_known_key(&self, data: &[u8], sig: &[u8], proof: &[u8]) -> Result<()> {
        let signer_len = wire::name_length(data, RRSIG_SIGNER_NAME)?;
        let algorithm = wire::read_u8(data, RRSIG_ALGORITHM)?;
        let key_tag = wire::read_u16(data, RRSIG_KEY_TAG)?;

        for record in RecordIterator::new(proof, 0) {
            let record = record?;
            let keyname = record.name();
            if keyname.len() != signer_len
                || !wire::equals(keyname, 0, data, RRSIG_SIGNER_NAME, signer_len)
            {
                return Err(OracleError::NameMismatch);
            }
            if self.verify_signature_with_key(record.rdata(), algorithm, key_tag, data, sig) {
                trace!(key_tag, "signature verified with known key");
                return Ok(());
            }
        }
        Err(OracleError::SignatureVerificationFailed)
    }

    /// Verify a DNSKEY RRSET against a trusted DS RRSET: find the covered
    /// DNSKEY that validates the signature, then require a DS record to
    /// vouch for that exact key. A valid signature from a key without a
    /// matching DS is conclusively a failure.
    fn verify_with_ds(&self, data: &[u8], sig: &[u8], offset: usize, proof: &[u8]) -> Result<()> {
        let algorithm = wire::read_u8(data, RRSIG_ALGORITHM)?;
        let key_tag = wire::read_u16(data, RRSIG_KEY_TAG)?;

        for record in RecordIterator::new(data, offset) {
            let record = record?;
            if record.dnstype != TYPE_DNSKEY {
                return Err(OracleError::TypeMismatch {
                    expected: TYPE_DNSKEY,
                    found: record.dnstype,
                });
            }
            if self.verify_signature_with_key(record.rdata(), algorithm, key_tag, data, sig) {
                trace!(key_tag, "signature verified, checking DS coverage");
                return self.verify_key_with_ds(
                    record.name(),
                    record.rdata(),
                    key_tag,
                    algorithm,
                    proof,
                );
            }
        }
        Err(OracleError::SignatureVerificationFailed)
    }

    /// Pre-check a candidate DNSKEY (protocol, algorithm, key tag, zone-key
    /// flag) and hand it to the registered verifier.
    fn verify_signature_with_key(
        &self,
        key_rdata: &[u8],
        algorithm: u8,
        key_tag: u16,
        data: &[u8],
        sig: &[u8],
    ) -> bool {
        if !self.registry.has_algorithm(algorithm) {
            return false;
        }
        let (Ok(flags), Ok(protocol), Ok(key_algorithm)) = (
            wire::read_u16(key_rdata, DNSKEY_FLAGS_OFFSET),
            wire::read_u8(key_rdata, DNSKEY_PROTOCOL_OFFSET),
            wire::read_u8(key_rdata, DNSKEY_ALGORITHM_OFFSET),
        ) else {
            return false;
        };
        if protocol != DNSKEY_PROTOCOL {
            return false;
        }
        if key_algorithm != algorithm {
            return false;
        }
        if calculate_key_tag(key_rdata) != key_tag {
            return false;
        }
        if flags & DNSKEY_FLAG_ZONE_KEY == 0 {
            return false;
        }
        self.registry.verify_signature(algorithm, key_rdata, data, sig)
    }

    /// Find a DS record vouching for `(keyname, key_rdata)`: matching key
    /// tag and algorithm, and a registered digest over name-plus-rdata that
    /// matches the DS digest field.
    fn verify_key_with_ds(
        &self,
        keyname: &[u8],
        key_rdata: &[u8],
        key_tag: u16,
        algorithm: u8,
        proof: &[u8],
    ) -> Result<()> {
        let mut material = Vec::with_capacity(keyname.len() + key_rdata.len());
        material.extend_from_slice(keyname);
        material.extend_from_slice(key_rdata);

        for record in RecordIterator::new(proof, 0) {
            let record = record?;
            let ds = record.rdata();
            if wire::read_u16(ds, DS_KEY_TAG_OFFSET)? != key_tag {
                continue;
            }
            if wire::read_u8(ds, DS_ALGORITHM_OFFSET)? != algorithm {
                continue;
            }
            let digest_type = wire::read_u8(ds, DS_DIGEST_TYPE_OFFSET)?;
            if self
                .registry
                .verify_digest(digest_type, &material, &ds[DS_DIGEST_OFFSET..])
            {
                trace!(key_tag, digest_type, "DS record vouches for key");
                return Ok(());
            }
        }
        Err(OracleError::DsDigestMismatch)
    }
}
