#![forbid(unsafe_code)]

//! One-byte persistence of the navigation index.
//!
//! The snapshot is exactly one byte: the current catalog index truncated to
//! 0-255. Catalogs with more than 256 entries wrap modulo 256 on round-trip;
//! that is the accepted cost of the format, not a defect, and widening it is
//! a deliberate non-goal.

/// Encode a catalog index as a snapshot.
#[must_use]
pub fn encode(index: usize) -> Vec<u8> {
    vec![index as u8]
}

/// Decode a snapshot back to a seed index.
///
/// An empty snapshot (first run) decodes to 0.
#[must_use]
pub fn decode(bytes: &[u8]) -> usize {
    bytes.first().copied().map_or(0, usize::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_all_byte_values() {
        for index in 0..=255usize {
            assert_eq!(decode(&encode(index)), index);
        }
    }

    #[test]
    fn empty_snapshot_decodes_to_zero() {
        assert_eq!(decode(&[]), 0);
    }

    #[test]
    fn large_index_wraps_modulo_256() {
        assert_eq!(decode(&encode(300)), 44);
        assert_eq!(decode(&encode(256)), 0);
    }

    #[test]
    fn snapshot_is_one_byte() {
        assert_eq!(encode(17).len(), 1);
        assert_eq!(encode(9999).len(), 1);
    }
}
