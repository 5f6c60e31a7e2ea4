use crate::constants::DNSKEY_ALGORITHM_OFFSET;

/// Calculate the key tag for a DNSKEY record (RFC 4034 Appendix B).
///
/// Takes the whole DNSKEY rdata: flags, protocol, algorithm, public key.
/// An odd trailing byte counts as the high octet of a final 16-bit word.
pub fn calculate_key_tag(rdata: &[u8]) -> u16 {
    // RSAMD5 uses the low 16 bits of the modulus instead of the checksum.
    if rdata.len() > DNSKEY_ALGORITHM_OFFSET && rdata[DNSKEY_ALGORITHM_OFFSET] == 1 {
        if rdata.len() >= 6 {
            return u16::from_be_bytes([rdata[rdata.len() - 2], rdata[rdata.len() - 1]]);
        }
        return 0;
    }

    let mut accumulator: u32 = 0;
    for (i, &byte) in rdata.iter().enumerate() {
        if i % 2 == 0 {
            accumulator += u32::from(byte) << 8;
        } else {
            accumulator += u32::from(byte);
        }
    }

    // Fold the carries and mask to 16 bits.
    accumulator += accumulator >> 16;
    (accumulator & 0xFFFF) as u16
}
