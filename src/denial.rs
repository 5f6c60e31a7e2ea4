//! NSEC / NSEC3 denial-of-existence checks backing record deletion.
//!
//! Both checks answer the same question: does this (already validated)
//! record prove that `delete_name` owns no record of `delete_type`? Either
//! the name matches the record owner and the type bitmap omits the type, or
//! the name falls strictly inside the interval to the next owner, with the
//! last interval of the zone wrapping around to the apex.

use std::cmp::Ordering;

use tracing::{debug, trace};

use crate::constants::MAX_NSEC3_ITERATIONS;
use crate::errors::{OracleError, Result};
use crate::registry::Registry;
use crate::wire::{self, base32, iterator::RecordView};

/// Check that an NSEC record proves non-existence of
/// `(delete_name, delete_type)`.
pub(crate) fn check_nsec_name(
    record: &RecordView<'_>,
    nsec_name: &[u8],
    delete_name: &[u8],
    delete_type: u16,
) -> Result<()> {
    let rdata = record.rdata();
    let next_len = wire::name_length(rdata, 0)?;
    // A type bitmap must follow the next owner name.
    if rdata.len() <= next_len {
        return Err(OracleError::DenialOfExistenceFailed);
    }

    let cmp = wire::compare_names(delete_name, nsec_name)?;
    if cmp == Ordering::Equal {
        // The name exists; the record is a proof only if the bitmap omits
        // the type.
        if wire::check_type_bitmap(&rdata[next_len..], delete_type) {
            return Err(OracleError::DenialOfExistenceFailed);
        }
        trace!("NSEC owner matches, type absent from bitmap");
        return Ok(());
    }

    let next_name = &rdata[..next_len];
    if wire::compare_names(nsec_name, next_name)? == Ordering::Less {
        // Normal interval: owner < deleted name < next.
        if cmp == Ordering::Greater
            && wire::compare_names(delete_name, next_name)? == Ordering::Less
        {
            debug!("NSEC interval covers deleted name");
            return Ok(());
        }
    } else {
        // Wrap-around interval; the next name is the zone apex.
        if cmp == Ordering::Greater {
            debug!("NSEC wrap-around interval covers deleted name");
            return Ok(());
        }
    }
    Err(OracleError::DenialOfExistenceFailed)
}

/// Check that an NSEC3 record proves non-existence of
/// `(delete_name, delete_type)`. The deleted name is hashed with the
/// record's parameters and compared against the interval formed by the
/// record's hashed owner label and next-hashed-owner field.
pub(crate) fn check_nsec3_name(
    registry: &Registry,
    record: &RecordView<'_>,
    nsec_name: &[u8],
    delete_name: &[u8],
    delete_type: u16,
) -> Result<()> {
    let rdata = record.rdata();
    let hash_algorithm = wire::read_u8(rdata, 0)?;
    let iterations = wire::read_u16(rdata, 2)?;
    if iterations > MAX_NSEC3_ITERATIONS {
        return Err(OracleError::TooManyIterations(iterations));
    }
    let salt_len = wire::read_u8(rdata, 4)? as usize;
    let salt = wire::substring(rdata, 5, salt_len)?;

    let delete_hash = registry
        .nsec3_hash(hash_algorithm, salt, delete_name, iterations)
        .ok_or(OracleError::DenialOfExistenceFailed)?;

    let next_len_offset = 5 + salt_len;
    let next_len = wire::read_u8(rdata, next_len_offset)? as usize;
    if next_len > 32 {
        return Err(OracleError::InvalidNsec3Parameters);
    }
    let next_hash = wire::read_bytes32(rdata, next_len_offset + 1, next_len)?;

    // The record's own hashed name is base32hex in its first label.
    let owner_label_len = wire::read_u8(nsec_name, 0)? as usize;
    let nsec_hash = base32::decode_word(nsec_name, 1, owner_label_len)?;

    trace!(
        iterations,
        salt_len,
        "NSEC3 hash comparison for deletion proof"
    );

    if delete_hash == nsec_hash {
        let bitmap_offset = next_len_offset + 1 + next_len;
        let bitmap_len = rdata
            .len()
            .checked_sub(bitmap_offset)
            .ok_or(OracleError::DenialOfExistenceFailed)?;
        let bitmap = wire::substring(rdata, bitmap_offset, bitmap_len)?;
        if wire::check_type_bitmap(bitmap, delete_type) {
            return Err(OracleError::DenialOfExistenceFailed);
        }
        trace!("NSEC3 owner hash matches, type absent from bitmap");
        return Ok(());
    }

    if next_hash > nsec_hash {
        // Normal interval: owner hash < deleted hash < next hash.
        if delete_hash > nsec_hash && delete_hash < next_hash {
            debug!("NSEC3 interval covers deleted name");
            return Ok(());
        }
    } else {
        // Wrap-around interval.
        if delete_hash > nsec_hash {
            debug!("NSEC3 wrap-around interval covers deleted name");
            return Ok(());
        }
    }
    Err(OracleError::DenialOfExistenceFailed)
}
