//! Byte order and revision detection (component D), grounded on
//! `header_reader.py::set_order_and_version`.
//!
//! The original tries both byte orders, sorts `(revision, order)` pairs and
//! takes the smallest -- without filtering out negative readings first. The
//! spec's invariant is stricter: the chosen order is the one producing the
//! smallest *positive* revision. This implementation applies that filter
//! explicitly (DESIGN.md Open Question 1).

use crate::byte_order::ByteOrder;
use crate::errors::{AcqError, Result};
use crate::revision::V_400B;
use std::io::{Read, Seek, SeekFrom};

pub struct Bootstrap {
    pub revision: i32,
    pub order: ByteOrder,
    pub utf8: bool,
}

/// Reads the raw `lVersion` field (offset 6: 2-byte `nItemHeaderLen` then a
/// 4-byte `lVersion`) under the given byte order, without committing to a
/// full graph header read -- this is all `set_order_and_version` actually
/// needs from the struct.
fn probe_revision(source: &mut (impl Read + Seek), order: ByteOrder) -> Result<i32> {
    source.seek(SeekFrom::Start(0))?;
    let mut header = [0u8; 6];
    source.read_exact(&mut header)?;
    let mut cursor = std::io::Cursor::new(&header[2..6]);
    Ok(order.read_i32(&mut cursor)?)
}

pub fn detect(source: &mut (impl Read + Seek)) -> Result<Bootstrap> {
    let candidates = [
        (probe_revision(source, ByteOrder::Little)?, ByteOrder::Little),
        (probe_revision(source, ByteOrder::Big)?, ByteOrder::Big),
    ];

    let chosen = candidates
        .iter()
        .filter(|(revision, _)| *revision > 0)
        .min_by_key(|(revision, _)| *revision);

    let (revision, order) = match chosen {
        Some((revision, order)) => (*revision, *order),
        None => return Err(AcqError::BootstrapFailed),
    };

    // Files before 4.0 beta are Latin-1; 4.0 beta onward is UTF-8.
    let utf8 = revision >= V_400B;

    source.seek(SeekFrom::Start(0))?;
    Ok(Bootstrap { revision, order, utf8 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn graph_header_prefix(revision: i32, order: ByteOrder) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&42i16.to_le_bytes());
        let mut rev_bytes = [0u8; 4];
        match order {
            ByteOrder::Little => rev_bytes.copy_from_slice(&revision.to_le_bytes()),
            ByteOrder::Big => rev_bytes.copy_from_slice(&revision.to_be_bytes()),
        }
        buf.extend_from_slice(&rev_bytes);
        buf
    }

    #[test]
    fn picks_smallest_positive_revision() {
        let bytes = graph_header_prefix(45, ByteOrder::Little);
        let mut cursor = Cursor::new(bytes);
        let bootstrap = detect(&mut cursor).unwrap();
        assert_eq!(bootstrap.revision, 45);
        assert_eq!(bootstrap.order, ByteOrder::Little);
        assert!(!bootstrap.utf8);
    }

    #[test]
    fn negative_candidate_is_excluded() {
        // A little-endian 45 interpreted as big-endian reads as a huge
        // (and here, negative-looking under certain byte patterns) value;
        // regardless of sign, only positive candidates are eligible.
        let bytes = graph_header_prefix(68, ByteOrder::Big);
        let mut cursor = Cursor::new(bytes);
        let bootstrap = detect(&mut cursor).unwrap();
        assert_eq!(bootstrap.revision, 68);
        assert_eq!(bootstrap.order, ByteOrder::Big);
        assert!(bootstrap.utf8);
    }

    #[test]
    fn fails_when_no_order_yields_a_positive_revision() {
        let bytes = vec![0u8; 6];
        let mut cursor = Cursor::new(bytes);
        let err = detect(&mut cursor).unwrap_err();
        assert!(matches!(err, AcqError::BootstrapFailed));
    }
}
