//! Ring-backed DNSSEC signature verifiers.
//!
//! Each verifier adapts one family of DNSKEY public-key encodings to the
//! corresponding *ring* verification algorithm. They report plain booleans:
//! a key that fails to parse simply does not verify.

use ring::signature::{self, RsaPublicKeyComponents};

use crate::constants::DNSKEY_PUBKEY_OFFSET;
use crate::registry::SignatureVerifier;

/// RSA verifier over RFC 3110 wire-format public keys
/// (exponent length, exponent, modulus).
pub struct RsaVerifier {
    params: &'static signature::RsaParameters,
}

impl RsaVerifier {
    /// RSA/SHA-1 (algorithm 5) and RSASHA1-NSEC3-SHA1 (algorithm 7).
    pub fn sha1() -> Self {
        Self {
            params: &signature::RSA_PKCS1_1024_8192_SHA1_FOR_LEGACY_USE_ONLY,
        }
    }

    /// RSA/SHA-256 (algorithm 8).
    pub fn sha256() -> Self {
        Self {
            params: &signature::RSA_PKCS1_1024_8192_SHA256_FOR_LEGACY_USE_ONLY,
        }
    }

    /// RSA/SHA-512 (algorithm 10).
    pub fn sha512() -> Self {
        Self {
            params: &signature::RSA_PKCS1_1024_8192_SHA512_FOR_LEGACY_USE_ONLY,
        }
    }
}

/// Split an RFC 3110 public key into (exponent, modulus). The exponent
/// length is one octet, or three when the first octet is zero.
fn parse_rfc3110(key: &[u8]) -> Option<(&[u8], &[u8])> {
    let (exponent_len, offset) = match *key.first()? {
        0 => {
            if key.len() < 3 {
                return None;
            }
            (u16::from_be_bytes([key[1], key[2]]) as usize, 3)
        }
        n => (n as usize, 1),
    };
    if exponent_len == 0 || key.len() <= offset + exponent_len {
        return None;
    }
    let e = &key[offset..offset + exponent_len];
    let n = &key[offset + exponent_len..];
    Some((e, n))
}

impl SignatureVerifier for RsaVerifier {
    fn verify(&self, key_rdata: &[u8], data: &[u8], signature: &[u8]) -> bool {
        let Some(key) = key_rdata.get(DNSKEY_PUBKEY_OFFSET..) else {
            return false;
        };
        let Some((e, n)) = parse_rfc3110(key) else {
            return false;
        };
        RsaPublicKeyComponents { n, e }
            .verify(self.params, data, signature)
            .is_ok()
    }
}

/// ECDSA verifier over raw `x || y` public keys with fixed-width `r || s`
/// signatures (RFC 6605).
pub struct EcdsaVerifier {
    alg: &'static signature::EcdsaVerificationAlgorithm,
    point_len: usize,
}

impl EcdsaVerifier {
    /// ECDSA P-256 with SHA-256 (algorithm 13).
    pub fn p256_sha256() -> Self {
        Self {
            alg: &signature::ECDSA_P256_SHA256_FIXED,
            point_len: 64,
        }
    }

    /// ECDSA P-384 with SHA-384 (algorithm 14).
    pub fn p384_sha384() -> Self {
        Self {
            alg: &signature::ECDSA_P384_SHA384_FIXED,
            point_len: 96,
        }
    }
}

impl SignatureVerifier for EcdsaVerifier {
    fn verify(&self, key_rdata: &[u8], data: &[u8], signature: &[u8]) -> bool {
        let Some(key) = key_rdata.get(DNSKEY_PUBKEY_OFFSET..) else {
            return false;
        };
        if key.len() != self.point_len {
            return false;
        }
        // Ring wants the SEC 1 uncompressed-point tag in front.
        let mut point = Vec::with_capacity(1 + key.len());
        point.push(0x04);
        point.extend_from_slice(key);
        signature::UnparsedPublicKey::new(self.alg, &point)
            .verify(data, signature)
            .is_ok()
    }
}

/// Ed25519 verifier over raw 32-byte public keys (RFC 8080, algorithm 15).
pub struct Ed25519Verifier;

impl SignatureVerifier for Ed25519Verifier {
    fn verify(&self, key_rdata: &[u8], data: &[u8], signature: &[u8]) -> bool {
        let Some(key) = key_rdata.get(DNSKEY_PUBKEY_OFFSET..) else {
            return false;
        };
        signature::UnparsedPublicKey::new(&signature::ED25519, key)
            .verify(data, signature)
            .is_ok()
    }
}
