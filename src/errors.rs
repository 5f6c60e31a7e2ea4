use thiserror::Error;

/// Unified error type for the oracle.
///
/// Every failure aborts the whole operation: no store mutation and no event
/// emission happens on the error path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OracleError {
    /// A read past the end of a wire buffer.
    #[error("wire data out of bounds: need {needed} bytes at offset {offset}, have {len}")]
    OutOfBounds {
        offset: usize,
        needed: usize,
        len: usize,
    },

    /// A compression pointer where only uncompressed names are valid.
    #[error("compressed names are not supported")]
    CompressedName,

    /// A label length outside 1..=63.
    #[error("invalid label length {0}")]
    InvalidLabel(u8),

    /// A base32hex label that does not decode.
    #[error("invalid base32hex label")]
    InvalidBase32,

    /// Any record class other than IN.
    #[error("unsupported record class: {0}")]
    UnsupportedClass(u16),

    /// A record type that disagrees with the type the signature covers, or a
    /// non-DNSKEY record where DS verification requires one.
    #[error("record type {found} does not match expected type {expected}")]
    TypeMismatch { expected: u16, found: u16 },

    /// Owner names disagree across the RRSET, or a DNSKEY owner differs from
    /// the signer name.
    #[error("owner name does not match")]
    NameMismatch,

    /// The signer name is not a parent of the record owner name.
    #[error("signer name does not contain the record name")]
    SignerNameMismatch,

    /// The owner name's label count disagrees with the RRSIG labels field.
    #[error("owner name label count does not match the RRSIG labels field")]
    LabelCountMismatch,

    /// A submission older than the stored record, or a denial proof older
    /// than the record it would delete.
    #[error("signature inception {submitted} predates stored inception {stored}")]
    ReplayRejected { stored: u32, submitted: u32 },

    /// The proof does not match any trusted record in the store.
    #[error("proof does not match any trusted record")]
    UntrustedProof,

    /// No candidate DNSKEY verified the signature.
    #[error("DNSSEC signature verification failed")]
    SignatureVerificationFailed,

    /// No DS record vouches for the DNSKEY that verified the signature.
    #[error("DS record digest does not match DNSKEY")]
    DsDigestMismatch,

    /// DNSSEC signature has expired.
    #[error("DNSSEC signature has expired")]
    SignatureExpired,

    /// DNSSEC signature is not yet valid.
    #[error("DNSSEC signature is not yet valid")]
    SignatureNotYetValid,

    /// The proof record is neither a DNSKEY nor a DS record.
    #[error("proof record type {0} is neither DNSKEY nor DS")]
    UnsupportedProofType(u16),

    /// The deletion proof record is neither an NSEC nor an NSEC3 record.
    #[error("denial record type {0} is neither NSEC nor NSEC3")]
    UnrecognizedRecordType(u16),

    /// The NSEC/NSEC3 record does not prove non-existence of the name/type.
    #[error("NSEC/NSEC3 denial of existence validation failed")]
    DenialOfExistenceFailed,

    /// NSEC3 iteration count above the supported maximum.
    #[error("NSEC3 iteration count {0} exceeds the supported maximum")]
    TooManyIterations(u16),

    /// Invalid NSEC3 parameters (oversized hash, bad salt bounds).
    #[error("invalid NSEC3 parameters")]
    InvalidNsec3Parameters,

    /// An admin operation invoked by a caller other than the administrator.
    #[error("caller is not the oracle administrator")]
    Unauthorized,
}

/// Result type alias for oracle operations.
pub type Result<T> = std::result::Result<T, OracleError>;
