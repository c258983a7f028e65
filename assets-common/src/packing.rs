//! Fixed-width field packing
//!
//! Both firmware formats store names in 32-byte slots and integers as
//! little-endian. The two formats disagree on how a name becomes bytes:
//! - asset table: UTF-8 bytes ([`pack_name_utf8`])
//! - model bundle: one byte per UTF-16 code unit ([`pack_name_latin1`])
//!
//! No terminator byte is reserved. A name of exactly 32 bytes fills the slot.

use crate::PackError;

/// Width of every name slot in both formats
pub const NAME_FIELD_LEN: usize = 32;

// ============================================================================
// Names
// ============================================================================

/// Pack a name as UTF-8, truncated at 32 bytes and zero padded.
///
/// Truncation is byte-based and may split a multi-byte character.
pub fn pack_name_utf8(name: &str) -> [u8; NAME_FIELD_LEN] {
    let mut field = [0u8; NAME_FIELD_LEN];
    let bytes = name.as_bytes();
    let len = bytes.len().min(NAME_FIELD_LEN);
    field[..len].copy_from_slice(&bytes[..len]);
    field
}

/// Pack a name keeping the low 8 bits of each UTF-16 code unit.
///
/// Matches the Python `pack_model.py` ASCII packing that the model bundle
/// loader was written against. Only the first 32 code units are kept.
pub fn pack_name_latin1(name: &str) -> [u8; NAME_FIELD_LEN] {
    let mut field = [0u8; NAME_FIELD_LEN];
    for (slot, unit) in field.iter_mut().zip(name.encode_utf16()) {
        *slot = (unit & 0xFF) as u8;
    }
    field
}

/// Whether a name will be cut short by [`pack_name_utf8`]
#[inline]
pub fn exceeds_name_field(name: &str) -> bool {
    name.len() > NAME_FIELD_LEN
}

// ============================================================================
// Integers
// ============================================================================

/// Convert a length or offset into a u32 field value
pub fn to_u32_field(value: usize, what: &'static str) -> Result<u32, PackError> {
    u32::try_from(value).map_err(|_| PackError::TooLarge { what, value })
}

/// 16-bit additive checksum over a sequence of byte regions
pub fn checksum16<'a>(regions: impl IntoIterator<Item = &'a [u8]>) -> u16 {
    regions
        .into_iter()
        .flat_map(|region| region.iter())
        .fold(0u16, |sum, &byte| sum.wrapping_add(u16::from(byte)))
}

// ============================================================================
// Compatibility self-check
// ============================================================================

/// Probe string used by [`compatibility_report`]
pub const PROBE_STRING: &str = "test_model";

/// Probe integer used by [`compatibility_report`]
pub const PROBE_INT: u32 = 0x1234_5678;

/// Result of packing the probe values
#[derive(Debug, Clone)]
pub struct CompatibilityReport {
    /// Probe string packed into a name slot
    pub packed_string: [u8; NAME_FIELD_LEN],
    /// Every packed byte equals the source character code
    pub string_is_ascii: bool,
    /// Probe integer as written to the blob
    pub packed_int: [u8; 4],
    /// LSB first, MSB last
    pub int_is_little_endian: bool,
}

/// Pack known probe values and check they land the way the firmware
/// loaders expect.
pub fn compatibility_report() -> CompatibilityReport {
    let packed_string = pack_name_latin1(PROBE_STRING);
    let string_is_ascii = PROBE_STRING
        .bytes()
        .enumerate()
        .all(|(i, b)| packed_string[i] == b)
        && packed_string[PROBE_STRING.len()..].iter().all(|&b| b == 0);

    let packed_int = PROBE_INT.to_le_bytes();
    let int_is_little_endian = packed_int[0] == 0x78 && packed_int[3] == 0x12;

    CompatibilityReport {
        packed_string,
        string_is_ascii,
        packed_int,
        int_is_little_endian,
    }
}
