//! Base32hex decoding of NSEC3 hashed owner labels.

use base32::Alphabet;

use crate::errors::{OracleError, Result};

const BASE32HEX: Alphabet = Alphabet::Rfc4648Hex { padding: false };

/// Decode `len` base32hex characters at `offset` into a 32-byte word,
/// zero-padded on the right. This is how the first label of an NSEC3 owner
/// name becomes a hashed-name value comparable against hash output.
pub fn decode_word(data: &[u8], offset: usize, len: usize) -> Result<[u8; 32]> {
    let chars = super::substring(data, offset, len)?;
    // NSEC3 owner labels are conventionally lowercase; the alphabet is not.
    let upper: Vec<u8> = chars.iter().map(|c| c.to_ascii_uppercase()).collect();
    let text = std::str::from_utf8(&upper).map_err(|_| OracleError::InvalidBase32)?;
    let bytes = base32::decode(BASE32HEX, text).ok_or(OracleError::InvalidBase32)?;
    if bytes.len() > 32 {
        return Err(OracleError::InvalidBase32);
    }
    let mut word = [0u8; 32];
    word[..bytes.len()].copy_from_slice(&bytes);
    Ok(word)
}
